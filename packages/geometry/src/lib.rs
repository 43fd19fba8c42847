#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planar geometry stages of the launch-site analysis pipeline.
//!
//! Provides the local metric projection shared by every stage, the
//! obstacle-union/study-area builder, the morphological alley extractor,
//! and the candidate aggregator that merges alley, vegetation, and
//! building candidate sets into one homogeneous collection.

pub mod aggregate;
pub mod alleys;
pub mod projection;
pub mod study;

pub use projection::LocalProjection;
