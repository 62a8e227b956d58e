//! Local filesystem avatar store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::AvatarStore;
use crate::{ForumError, Result};

/// Writes avatars into a directory served under a public URL prefix.
#[derive(Debug, Clone)]
pub struct LocalAvatarStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalAvatarStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>, public_base_url: &str) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn file_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ForumError::Storage(format!("invalid object key: {key}")));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn put_avatar(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        let path = self.file_path(key)?;
        fs::write(&path, &data)
            .await
            .map_err(|e| ForumError::Storage(format!("failed to write {}: {e}", path.display())))?;
        debug!("Stored avatar {} ({} bytes)", path.display(), data.len());
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
