#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road network graph and road accessibility analysis.
//!
//! The network is a directed graph of road nodes and classified edges
//! with an R-tree over node coordinates for O(log n) nearest-node
//! queries. Once built the network is read-only; concurrent queries from
//! parallel candidate processing are safe.

pub mod access;
pub mod network;

pub use access::{RoadAccess, assess};
pub use network::{RoadNetwork, RoadSegment};

use thiserror::Error;

/// Errors from road network operations.
#[derive(Debug, Error)]
pub enum RoadError {
    /// The road network has no nodes. Analysis cannot proceed without a
    /// road layer, so this is fatal to the whole request.
    #[error("road network is empty: no nodes to query")]
    EmptyNetwork,
}
