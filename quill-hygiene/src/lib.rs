//! Quill Hygiene - Cleans bot and junk signups out of subscriber exports.
//!
//! Works on a JSON array export of the subscriber collection: every record
//! whose email is malformed, or whose local part is a dotted-quad IP, is
//! dropped and reported.

mod classify;
mod error;
mod report;

pub use classify::{Classifier, Reason, Verdict};
pub use error::HygieneError;
pub use report::{Removal, Report, Subscriber, load_export, partition, write_export};
