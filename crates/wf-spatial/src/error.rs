//! Spatial-subsystem error type.

use thiserror::Error;

use wf_core::CoreError;

/// Errors produced by `wf-spatial`.
///
/// Only malformed input is returned as `Err` from routing.  A search that
/// finds no path is reported through `RouteResult { valid: false, .. }`;
/// [`SpatialError::NoPath`] exists for callers that want to turn such a
/// result into an error with [`RouteResult::into_result`](crate::RouteResult::into_result).
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("graph has no nodes; nothing to snap to")]
    NoGraph,

    #[error("no path found: {reason}")]
    NoPath { reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
