use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown routing policy {0:?}, expected \"fastest\" or \"safest\"")]
    InvalidPolicy(String),
    #[error("node {0} does not exist in the network")]
    NodeNotFound(NodeId),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}
