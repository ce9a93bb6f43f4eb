use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or writing the storage slot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The slot holds something that is not a snapshot. `load` treats this
    /// like an empty slot.
    #[error("stored snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("I/O error on {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Failure importing a snapshot from a standalone file. The document is left
/// unchanged.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid file format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Outcome of a generation call that did not produce content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Please provide a book reference or paste verses.")]
    EmptyInput,

    #[error("A generation request is already running.")]
    Busy,

    /// Network error, malformed response or missing credential. The reason
    /// is for the log only.
    #[error("Failed to generate content. Please try again.")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to create {path}: {error}")]
    CreateDir {
        path: PathBuf,
        error: std::io::Error,
    },
}
