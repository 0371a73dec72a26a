//! Bicycle-friendly routing over a real street network.
//!
//! The crate blends three independent geospatial layers, road
//! classification, terrain elevation and historical crash incidents,
//! into a single traversal cost, then answers shortest-path queries
//! annotated with per-segment metadata for client display.
//!
//! The base graph (nodes, edges, geometry, road class) is immutable
//! after loading. Two offline batch stages enrich it:
//!
//! * [`derive::elevation`] samples a terrain raster at edge endpoints
//!   and writes per-edge grades,
//! * [`derive::crashes`] links crash incidents to nearby edges through
//!   a spatial index.
//!
//! Both write their output into a [`store::NetworkStore`] as a full
//! atomic replace, so they are idempotent and safe to re-run. Route
//! queries read the enriched store through a [`model::RoutingModel`].

pub mod cost;
pub mod derive;
pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod store;
pub mod terrain;

pub use cost::Policy;
pub use error::Error;
pub use model::RoutingModel;
pub use store::{MemoryStore, NetworkStore};

/// Stable node identifier assigned during network ingestion.
pub type NodeId = i64;

/// Stable edge identifier assigned during network ingestion.
pub type EdgeId = i64;

/// Stable incident identifier assigned during crash import.
pub type IncidentId = i64;
