//! Error types for wf-repair.

use thiserror::Error;

use wf_core::CoreError;

/// Errors that can occur while repairing or writing a corridor dataset.
///
/// A dataset that is still disconnected after repair is not an error; see
/// [`RepairStatus::NeedsReview`](crate::RepairStatus::NeedsReview).
#[derive(Debug, Error)]
pub enum RepairError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "geojson")]
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

/// Alias for `Result<T, RepairError>`.
pub type RepairResult<T> = Result<T, RepairError>;
