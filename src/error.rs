use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring the model or encoder artifact into memory.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema mismatch in {path}: {reason}")]
    Schema { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub(crate) fn schema(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Per-request failures surfaced by the prediction path.
#[derive(Debug, Error)]
pub enum EtaError {
    #[error("model not loaded: {0}")]
    NotLoaded(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown category {label:?} for {feature}")]
    UnknownCategory { feature: &'static str, label: String },
    #[error("model error: {0}")]
    Model(String),
}
