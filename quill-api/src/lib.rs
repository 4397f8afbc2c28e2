//! Quill API - Shared types for the Quill content blocks.
//!
//! Everything here is plain data: block kinds, toolbox metadata, the
//! persisted payload shapes, countdown snapshots and sanitization policies.
//! Behavior lives in `quill-blocks`.

mod block;
mod sanitize;
mod snapshot;

pub use block::*;
pub use sanitize::*;
pub use snapshot::*;
