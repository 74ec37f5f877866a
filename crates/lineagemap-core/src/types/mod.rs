//! Types for the lineage mapping API.
//!
//! A [`LineageRequest`] goes in, a validated [`LineageResult`] comes out, and
//! a [`GraphModel`] is derived from the result for visualization.

mod graph;
mod request;
mod response;

pub use graph::{GraphEdge, GraphModel, GraphNode};
pub use request::{LineageRequest, SourceType};
pub use response::{ColumnMapping, LineageResult, MAX_CONFIDENCE, MIN_CONFIDENCE};
