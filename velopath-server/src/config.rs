//! Server configuration from a TOML file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Exported network edge file (GeoJSON)
    pub network: PathBuf,
    /// Geocoded crash export (CSV); crash linking is skipped without it
    pub incidents: Option<PathBuf>,
    /// Terrain raster (ESRI ASCII grid); grade derivation is skipped
    /// without it
    pub terrain: Option<PathBuf>,
    /// Tag recorded with the derived elevation generation
    pub terrain_source: String,
    pub crash_link_distance_m: f64,
    pub crash_link_max_edges: usize,
    pub request_timeout_s: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: ([0, 0, 0, 0], 5001).into(),
            network: PathBuf::from("data/network.geojson"),
            incidents: None,
            terrain: None,
            terrain_source: "default".to_owned(),
            crash_link_distance_m: 50.0,
            crash_link_max_edges: 5,
            request_timeout_s: 10,
        }
    }
}

impl ServerConfig {
    /// Read a config file; a missing file just means defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            tracing::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
