//! Local directory sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::error::UploadError;
use super::{UploadReceipt, UploadSink};

/// Writes each export as a new file under a directory. Existing files are
/// never overwritten.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, UploadError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl UploadSink for LocalDirSink {
    async fn upload(&self, filename: &str, payload: &[u8]) -> Result<UploadReceipt, UploadError> {
        if filename.contains(|c: char| c == '/' || c == '\\') || filename.starts_with('.') {
            return Err(UploadError::config(format!(
                "refusing to write outside the export directory: {filename}"
            )));
        }

        let path = self.dir.join(filename);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(UploadError::AlreadyExists(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(payload).await?;
        file.flush().await?;

        Ok(UploadReceipt {
            location: path.display().to_string(),
        })
    }
}
