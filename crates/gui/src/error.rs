//! Error types for trail edits and persistence

use crate::state::trails::{TrailId, VertexId};

/// Why an edit gesture was refused.
///
/// Every variant leaves the trail store untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("point is within {threshold} of an existing vertex")]
    TooClose { threshold: f64, existing: VertexId },
    #[error("trail {0} not found")]
    TrailNotFound(TrailId),
    #[error("vertex {0:?} not found")]
    VertexNotFound(VertexId),
    #[error("segment not found")]
    SegmentNotFound,
    #[error("no ground position under the pointer")]
    NoGroundPosition,
    #[error("{0} is not allowed right now")]
    NotAllowed(&'static str),
    #[error("cancelled by the user")]
    Cancelled,
}

/// Autosave / restore failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid trail file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data directory available on this platform")]
    NoDataDir,
}
