//! Unified error types for forum-harvest.
//!
//! Driver failures live in `harvest_client::render::RenderError`; everything the
//! extraction and storage layers can raise is collected here.

use std::path::PathBuf;

/// Unified error type shared by the harvest crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a selector that does not parse).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Reading or writing a file failed.
    #[error("IO_ERROR: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON_ERROR: {0}")]
    Json(#[from] serde_json::Error),

    /// The session state file could not be used.
    #[error("SESSION_ERROR: {0}")]
    Session(String),
}

impl Error {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
