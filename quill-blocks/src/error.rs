//! Block error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("unknown block kind: {0}")]
    UnknownKind(String),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("{block} block does not accept {input}")]
    UnsupportedInput { block: &'static str, input: String },

    #[error("column {slot} failed to save: {message}")]
    ChildSave { slot: usize, message: String },

    #[error("session error: {0}")]
    Session(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unsupported column count: {0} (expected 1 to 4)")]
    UnsupportedColumnCount(usize),
}
