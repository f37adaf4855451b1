//! Upload sinks for exported judgment files.
//!
//! A sink receives a filename and the encoded bytes and either creates a new
//! file at its destination or fails. Sinks never retry; the session keeps its
//! pending judgments when an upload fails so the user can retry by hand.

pub mod error;
pub mod github;
pub mod local;

pub use error::{ErrorContext, UploadError};
pub use github::{GithubContentsSink, GithubDestination};
pub use local::LocalDirSink;

/// Where a sink put an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Path or URL of the created file.
    pub location: String,
}

#[async_trait::async_trait]
pub trait UploadSink: Send + Sync {
    async fn upload(&self, filename: &str, payload: &[u8]) -> Result<UploadReceipt, UploadError>;
}
