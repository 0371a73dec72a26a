//! Data model for bicycle routing.
//!
//! Contains the street network components, derived attribute records, and
//! the in-memory graph view that route queries run against.

pub mod components;
pub mod network;

pub use components::{CrashExposure, CrashLink, Edge, ElevationGrade, Incident, Node, Severity};
pub use network::RoutingModel;
