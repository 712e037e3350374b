//! Error types for archive encoding.

/// Archive encoding errors.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// An entry path occurred more than once in the same archive.
    #[error("duplicate archive entry path: {path}")]
    DuplicatePath { path: String },

    /// Compression of the finished tar stream failed.
    #[error("gzip compression failed: {0}")]
    Compress(#[from] std::io::Error),
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
