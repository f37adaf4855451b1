#![forbid(unsafe_code)]

//! # ailabel
//!
//! Pairwise preference labeling for product-title variants.
//!
//! A [`Catalog`] holds items with six candidate title variants each. A
//! [`SessionState`] draws random two-variant comparisons from it, records
//! which side the rater preferred, and exports the accumulated judgments as a
//! timestamped CSV file through an [`UploadSink`] (a GitHub repository or a
//! local directory). Pending judgments are cleared only once an upload
//! succeeds, so a failed upload can simply be retried.

pub mod catalog;
pub mod console;
pub mod session;
pub mod upload;

pub use catalog::{Catalog, CatalogError, CatalogRow, Item, DISPLAY_IMAGE_COUNT, SLOT_COUNT};
pub use session::{
    encode_judgments, export_filename, parse_judgments, ComparisonPair, ExportReceipt, Judgment,
    SessionError, SessionOptions, SessionPhase, SessionState, Side,
};
pub use upload::{GithubContentsSink, LocalDirSink, UploadError, UploadReceipt, UploadSink};
