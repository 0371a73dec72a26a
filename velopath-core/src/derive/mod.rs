//! Offline batch stages that populate the derived attribute layers.
//!
//! Both stages follow the same shape: a parallel, side-effect-free compute
//! phase scattered over independent units (edges or incidents), then a single
//! bulk atomic replace into the store. Killing a run mid-way leaves the
//! previous generation intact; the next run replaces rather than appends.

pub mod crashes;
pub mod elevation;

pub use crashes::{CrashLinkParams, CrashLinkSummary, link_crash_incidents};
pub use elevation::{ElevationRunSummary, derive_elevation_grades};
