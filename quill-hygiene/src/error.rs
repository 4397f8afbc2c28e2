use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HygieneError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a subscriber export: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
