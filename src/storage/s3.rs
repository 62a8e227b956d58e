//! S3-compatible avatar store.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use super::AvatarStore;
use crate::config::AvatarConfig;
use crate::{ForumError, Result};

/// Uploads avatars as public-read objects to an S3 bucket.
///
/// Credentials come from the standard AWS provider chain (environment,
/// profile, instance metadata).
pub struct S3AvatarStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3AvatarStore {
    /// Build a client from the avatar configuration.
    ///
    /// A non-empty `s3_endpoint` selects an S3-compatible service with
    /// path-style addressing.
    pub async fn from_config(config: &AvatarConfig) -> Result<Self> {
        if config.s3_bucket.is_empty() {
            return Err(ForumError::Config("avatars.s3_bucket is required".to_string()));
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        let public_base_url = if config.s3_endpoint.is_empty() {
            format!(
                "https://{}.s3.{}.amazonaws.com",
                config.s3_bucket, config.s3_region
            )
        } else {
            builder = builder
                .endpoint_url(config.s3_endpoint.clone())
                .force_path_style(true);
            format!(
                "{}/{}",
                config.s3_endpoint.trim_end_matches('/'),
                config.s3_bucket
            )
        };

        info!(
            "Using S3 avatar store (bucket: {}, region: {})",
            config.s3_bucket, config.s3_region
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.s3_bucket.clone(),
            public_base_url,
        })
    }
}

#[async_trait]
impl AvatarStore for S3AvatarStore {
    async fn put_avatar(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| ForumError::Storage(format!("S3 upload of {key} failed: {e}")))?;

        debug!("Uploaded avatar {} to bucket {} ({} bytes)", key, self.bucket, size);
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
