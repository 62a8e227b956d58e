//! Avatar storage.
//!
//! Uploaded avatar images are handed to an [`AvatarStore`], which persists
//! the bytes and returns the public URL the image can be fetched from.
//! Objects are keyed `{user_id}.{ext}`, so a new upload with the same
//! extension replaces the previous one.

mod local;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalAvatarStore;
#[cfg(feature = "s3")]
pub use s3::S3AvatarStore;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AvatarBackend, AvatarConfig};
use crate::{ForumError, Result};

/// Image extensions accepted for avatars.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Destination for uploaded avatar images.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn put_avatar(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build the storage key for a user's avatar from the uploaded file name.
///
/// The extension is lowercased and must be one of [`ALLOWED_EXTENSIONS`].
pub fn avatar_key(user_id: &str, filename: &str) -> Result<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .ok_or_else(|| ForumError::Validation("file has no extension".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ForumError::Validation(format!(
            "unsupported image type '.{ext}', expected one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    Ok(format!("{user_id}.{ext}"))
}

/// Guess the MIME type of an avatar key from its extension.
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Create the avatar store selected by the configuration.
pub async fn build_store(config: &AvatarConfig) -> Result<Arc<dyn AvatarStore>> {
    match config.backend {
        AvatarBackend::Local => Ok(Arc::new(LocalAvatarStore::new(
            &config.local_path,
            &config.public_base_url,
        )?)),
        #[cfg(feature = "s3")]
        AvatarBackend::S3 => Ok(Arc::new(S3AvatarStore::from_config(config).await?)),
        #[cfg(not(feature = "s3"))]
        AvatarBackend::S3 => Err(ForumError::Config(
            "avatars.backend = \"s3\" requires the `s3` cargo feature".to_string(),
        )),
    }
}
