//! Error types for NERDm schema resolution and document assembly.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during schema loading, merging and resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Schema errors (exit code 2)
    #[error("unknown definition \"{name}\"")]
    UnknownDefinition { name: String },

    #[error("schema has no definitions mapping")]
    MissingDefinitions,
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::FileNotFound { .. } | ResolveError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            ResolveError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during metadata document assembly.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("document root must be a JSON object")]
    NotAnObject,
}

impl DocumentError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DocumentError::Resolve(e) => e.exit_code(),
            DocumentError::NotAnObject => 2,
        }
    }
}
