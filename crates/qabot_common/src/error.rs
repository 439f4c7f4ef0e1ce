//! Error types for qabot.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or persisting the knowledge base.
///
/// None of these are fatal to a session: loading falls back to an empty
/// knowledge base and a failed save keeps the in-memory copy.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{}' is not a valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("File '{}' does not contain a valid knowledge base structure: {reason}", path.display())]
    InvalidStructure { path: PathBuf, reason: String },

    #[error("Unable to save knowledge base to file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize knowledge base: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Short machine-friendly tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::Read { .. } => "read",
            StoreError::Json { .. } => "json",
            StoreError::InvalidStructure { .. } => "invalid_structure",
            StoreError::Write { .. } => "write",
            StoreError::Serialize(_) => "serialize",
        }
    }
}
