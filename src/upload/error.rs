//! Error types for upload sinks.

use thiserror::Error;

/// Additional context from a remote rejection.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// HTTP status code returned by the destination.
    pub http_status: Option<u16>,
    /// Request ID from the destination (x-github-request-id header).
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing or invalid sink configuration (token, repository, directory).
    #[error("configuration error: {0}")]
    Config(String),

    /// The destination answered but refused to create the file.
    #[error("{destination} rejected upload: {message}")]
    Rejected {
        destination: &'static str,
        message: String,
        context: Option<ErrorContext>,
    },

    /// A file already exists at the target path.
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    /// HTTP/network error, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn rejected(
        destination: &'static str,
        message: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Self::Rejected {
            destination,
            message: message.into(),
            context: Some(context),
        }
    }

    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Rejected { .. } => "rejected",
            Self::AlreadyExists(_) => "already_exists",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "http_error",
            Self::Io(_) => "io_error",
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Rejected { context, .. } => context.as_ref(),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.context().and_then(|c| c.request_id.as_deref())
    }
}
