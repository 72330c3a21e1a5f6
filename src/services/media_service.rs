use std::{
    env,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::fs;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub media_dir: PathBuf,
    pub base_url: String,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/assets")),
            base_url: env::var("MEDIA_BASE_URL").unwrap_or_else(|_| "/assets/".to_string()),
        }
    }
}

/// A file received in a multipart request, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Lower-cased extension of the original file name.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub key: String,
    pub url: String,
}

/// Media files on local disk, addressed by opaque keys.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    config: MediaConfig,
}

impl MediaStorage {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    pub fn media_dir(&self) -> &Path {
        &self.config.media_dir
    }

    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.config.media_dir).await?;
        Ok(())
    }

    /// Public URL of a stored key. Plain concatenation with the base URL.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{}", self.config.base_url, key)
    }

    pub async fn store(&self, file: &UploadedFile) -> Result<StoredMedia> {
        let key = Self::storage_key(&file.file_name)?;
        let path = self.config.media_dir.join(&key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &file.bytes).await?;

        tracing::debug!("Stored media {} ({} bytes)", key, file.bytes.len());

        Ok(StoredMedia {
            url: self.url_for(&key),
            key,
        })
    }

    /// Key of a URL produced by [`Self::url_for`], if it is one of ours.
    pub fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.config.base_url.as_str())
    }

    /// Removes the file behind a stored URL. Default pictures are shared and
    /// never removed.
    pub async fn remove_url(&self, url: &str) {
        match self.key_for_url(url) {
            Some(key) if !key.starts_with("default-") => self.remove(key).await,
            _ => {}
        }
    }

    /// Best-effort removal; failures are logged and swallowed.
    pub async fn remove(&self, key: &str) {
        if key.is_empty() || Path::new(key).file_name().map(|n| n != key).unwrap_or(true) {
            return;
        }

        let path = self.config.media_dir.join(key);
        if let Err(err) = fs::remove_file(&path).await {
            tracing::warn!("Failed to delete media file {:?}: {}", path, err);
        }
    }

    /// `<unix-millis>-<file name>`, with any directory part and whitespace stripped.
    fn storage_key(original_name: &str) -> Result<String> {
        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
            .filter(|name| !name.is_empty() && name != "." && name != "..")
            .ok_or_else(|| Error::InvalidInput {
                reason: format!("Invalid file name '{original_name}'"),
            })?;

        Ok(format!("{}-{}", Utc::now().timestamp_millis(), file_name))
    }
}
