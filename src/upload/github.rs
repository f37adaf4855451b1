//! GitHub contents API sink.
//!
//! Creates each export as a new file on a branch via
//! `PUT /repos/{owner}/{repo}/contents/{path}`. The request carries no `sha`,
//! so GitHub refuses to overwrite an existing path.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ErrorContext, UploadError};
use super::{UploadReceipt, UploadSink};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_DIR: &str = "results";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Repository, branch and directory that receive exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubDestination {
    /// `owner/name`.
    pub repo: String,
    pub branch: String,
    /// Directory inside the repository; empty for the root.
    pub dir: String,
}

impl GithubDestination {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            branch: DEFAULT_BRANCH.to_string(),
            dir: DEFAULT_DIR.to_string(),
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    fn validate(&self) -> Result<(), UploadError> {
        let mut parts = self.repo.split('/');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid {
            return Err(UploadError::config(format!(
                "repository must be `owner/name`, got `{}`",
                self.repo
            )));
        }
        if self.branch.trim().is_empty() {
            return Err(UploadError::config("branch must not be empty"));
        }
        Ok(())
    }

    fn file_path(&self, filename: &str) -> String {
        let dir = self.dir.trim_matches('/');
        if dir.is_empty() {
            filename.to_string()
        } else {
            format!("{dir}/{filename}")
        }
    }
}

#[derive(Debug, Clone)]
pub struct GithubContentsSink {
    client: reqwest::Client,
    api_url: String,
    destination: GithubDestination,
}

impl GithubContentsSink {
    /// Create from a token and destination against the public API.
    pub fn new(token: &str, destination: GithubDestination) -> Result<Self, UploadError> {
        Self::with_config(
            token,
            destination,
            DEFAULT_API_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create from environment variables:
    /// `AILABEL_GITHUB_TOKEN`, `AILABEL_GITHUB_REPO` (required),
    /// `AILABEL_GITHUB_BRANCH`, `AILABEL_GITHUB_DIR`, `AILABEL_GITHUB_API_URL`,
    /// `AILABEL_UPLOAD_TIMEOUT_SECONDS` (optional).
    pub fn from_env() -> Result<Self, UploadError> {
        let token = std::env::var("AILABEL_GITHUB_TOKEN")
            .map_err(|_| UploadError::config("AILABEL_GITHUB_TOKEN not set"))?;
        let repo = std::env::var("AILABEL_GITHUB_REPO")
            .map_err(|_| UploadError::config("AILABEL_GITHUB_REPO not set"))?;

        let mut destination = GithubDestination::new(repo);
        if let Ok(branch) = std::env::var("AILABEL_GITHUB_BRANCH") {
            destination = destination.branch(branch);
        }
        if let Ok(dir) = std::env::var("AILABEL_GITHUB_DIR") {
            destination = destination.dir(dir);
        }

        let api_url =
            std::env::var("AILABEL_GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let timeout = std::env::var("AILABEL_UPLOAD_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self::with_config(&token, destination, api_url, timeout)
    }

    pub fn with_config(
        token: &str,
        destination: GithubDestination,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UploadError> {
        destination.validate()?;
        if token.trim().is_empty() {
            return Err(UploadError::config("GitHub token is empty"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ailabel/", env!("CARGO_PKG_VERSION"))),
        );
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| UploadError::config("Invalid token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| UploadError::config(format!("Failed to create HTTP client: {e}")))?;

        let api_url: String = api_url.into();
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            destination,
        })
    }

    pub fn destination(&self) -> &GithubDestination {
        &self.destination
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{path}", self.api_url, self.destination.repo)
    }

    fn extract_request_id(headers: &HeaderMap) -> Option<String> {
        headers
            .get("x-github-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct CreateFileRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
}

#[derive(Deserialize)]
struct CreateFileResponse {
    content: Option<ContentInfo>,
}

#[derive(Deserialize)]
struct ContentInfo {
    path: Option<String>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[async_trait]
impl UploadSink for GithubContentsSink {
    async fn upload(&self, filename: &str, payload: &[u8]) -> Result<UploadReceipt, UploadError> {
        let path = self.destination.file_path(filename);
        let body = CreateFileRequest {
            message: format!("Add {filename}"),
            content: BASE64.encode(payload),
            branch: &self.destination.branch,
        };

        debug!(repo = %self.destination.repo, %path, bytes = payload.len(), "uploading export");
        let response = self
            .client
            .put(self.contents_url(&path))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let request_id = Self::extract_request_id(response.headers());
        let text = response.text().await?;

        if !status.is_success() {
            let ctx = ErrorContext::new().with_status(status.as_u16());
            let ctx = match request_id {
                Some(id) => ctx.with_request_id(id),
                None => ctx,
            };
            let message = serde_json::from_str::<ApiError>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(UploadError::rejected("github", message, ctx));
        }

        let location = serde_json::from_str::<CreateFileResponse>(&text)
            .ok()
            .and_then(|r| r.content)
            .and_then(|c| c.html_url.or(c.path))
            .unwrap_or(path);

        Ok(UploadReceipt { location })
    }
}
