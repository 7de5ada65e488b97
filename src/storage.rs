use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

use crate::parser;

/// Keeps temp names distinct when uploads land in the same millisecond
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Client filename characters kept in a temp name
const TEMP_CLIENT_CHARS: usize = 100;

/// Directory that receives uploads and later serves them for download
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Name an upload is stored under until its log has been read:
    /// `{unix_millis}-{seq}-{client file name}`
    pub fn temp_name(original_name: &str) -> String {
        let client = parser::client_file_name(original_name);
        // Keep the tail so the name stays short but keeps its extension
        let skip = client.chars().count().saturating_sub(TEMP_CLIENT_CHARS);
        let client: String = client.chars().skip(skip).collect();
        format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed),
            client
        )
    }

    /// Write upload bytes under a fresh temporary name and return the path.
    ///
    /// Never reuses an existing file.
    pub async fn save_temp(&self, original_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(Self::temp_name(original_name));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(path)
    }

    /// Read a stored upload as text, replacing invalid UTF-8
    pub async fn read_lossy(&self, path: &Path) -> io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Move a stored upload to its final name inside the directory.
    ///
    /// An existing file with the same name is replaced.
    pub async fn rename(&self, from: &Path, final_name: &str) -> io::Result<PathBuf> {
        let target = self.dir.join(final_name);
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tracing::warn!(filename = final_name, "overwriting existing log with the same name");
        }
        tokio::fs::rename(from, &target).await?;
        Ok(target)
    }

    /// Remove a stored upload that will not be kept
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove rejected upload");
        }
    }
}
