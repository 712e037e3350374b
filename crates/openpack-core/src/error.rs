//! Error types for the materialization pipeline.

use openpack_archive::ArchiveError;

/// Pipeline errors.
///
/// Absence of a description or operation is not an error; the gateway and
/// the operation index express that as `None`. Errors here are internal
/// faults: they abort the whole request and surface as an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Archive encoding or compression failed.
    #[error("archive materialization failed: {0}")]
    Archive(#[from] ArchiveError),

    /// HTTP client construction failed.
    #[error("gateway initialization failed: {message}")]
    Gateway { message: String },

    /// Manifest or package file serialization failed.
    #[error("manifest serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for pipeline operations.
pub type CoreResult<T> = Result<T, CoreError>;
