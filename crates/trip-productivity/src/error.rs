//! Error types for loading record collections

use thiserror::Error;

/// Failure to load one record collection.
///
/// This is the only failure a report request can hit: normalization and
/// aggregation degrade to defaults instead of erroring.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read '{resource}': {source}")]
    Io {
        resource: String,
        source: std::io::Error,
    },

    #[error("Failed to parse '{resource}' as JSON: {source}")]
    Json {
        resource: String,
        source: serde_json::Error,
    },

    #[error("Request for '{resource}' failed: {source}")]
    Http {
        resource: String,
        source: reqwest::Error,
    },

    #[error("Record store returned {status} for '{resource}': {body}")]
    Status {
        resource: String,
        status: u16,
        body: String,
    },

    #[error("'{resource}' did not contain a list of records")]
    NotAList { resource: String },
}

impl LoadError {
    /// Name of the collection that failed to load
    pub fn resource(&self) -> &str {
        match self {
            LoadError::Io { resource, .. }
            | LoadError::Json { resource, .. }
            | LoadError::Http { resource, .. }
            | LoadError::Status { resource, .. }
            | LoadError::NotAList { resource } => resource,
        }
    }
}
