//! Session accumulator.
//!
//! Draws comparison pairs from a [`Catalog`](crate::Catalog), records the
//! rater's choices as [`Judgment`]s and exports the pending judgments through an
//! [`UploadSink`](crate::UploadSink). The state is an owned value held by the
//! caller; nothing here is global.

pub mod export;
pub mod options;
pub mod state;
pub mod types;

pub use export::{
    encode_judgments, export_filename, parse_judgments, ExportFormatError, ExportReceipt,
    EXPORT_HEADER,
};
pub use options::SessionOptions;
pub use state::{SessionError, SessionState};
pub use types::{ComparisonPair, Judgment, SessionPhase, Side};
