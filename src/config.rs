//! Configuration module for the forum server.

use serde::Deserialize;
use std::path::Path;

use crate::{ForumError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    2814
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (e.g. `sqlite://data/forum.db`).
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_url() -> String {
    "sqlite://data/forum.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Level for events on the `audit` target.
    #[serde(default = "default_log_level")]
    pub audit_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/forum.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            audit_level: default_log_level(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key (required).
    #[serde(default)]
    pub jwt_secret: String,
    /// JWT issuer claim.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_token_expiry_secs: u64,
}

fn default_jwt_issuer() -> String {
    "forum-server".to_string()
}

fn default_jwt_access_expiry() -> u64 {
    3600
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            jwt_secret: String::new(),
            jwt_issuer: default_jwt_issuer(),
            jwt_access_token_expiry_secs: default_jwt_access_expiry(),
        }
    }
}

/// Avatar storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvatarBackend {
    /// Local filesystem.
    #[default]
    Local,
    /// S3-compatible object storage (requires the `s3` feature).
    S3,
}

/// Avatar upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: AvatarBackend,
    /// Directory for the local backend.
    #[serde(default = "default_avatar_path")]
    pub local_path: String,
    /// Base URL under which stored avatars are publicly reachable.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Bucket name for the S3 backend.
    #[serde(default)]
    pub s3_bucket: String,
    /// Endpoint URL for the S3 backend.
    #[serde(default)]
    pub s3_endpoint: String,
    /// Region for the S3 backend.
    #[serde(default = "default_s3_region")]
    pub s3_region: String,
}

fn default_avatar_path() -> String {
    "data/avatars".to_string()
}

fn default_public_base_url() -> String {
    "/avatars".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            backend: AvatarBackend::default(),
            local_path: default_avatar_path(),
            public_base_url: default_public_base_url(),
            max_upload_size_mb: default_max_upload_size(),
            s3_bucket: String::new(),
            s3_endpoint: String::new(),
            s3_region: default_s3_region(),
        }
    }
}

/// Bootstrap administrator account, created at startup if missing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin username.
    pub username: String,
    /// Admin email address.
    pub email: String,
    /// Admin password (plain text, hashed on creation).
    #[serde(default)]
    pub password: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Avatar storage configuration.
    #[serde(default)]
    pub avatars: AvatarConfig,
    /// Optional bootstrap admin account.
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ForumError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ForumError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// - `FORUM_JWT_SECRET` overrides `web.jwt_secret`
    /// - `FORUM_DATABASE_URL` overrides `database.url`
    /// - `FORUM_ADMIN_PASSWORD` overrides `admin.password`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("FORUM_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
        if let Ok(url) = std::env::var("FORUM_DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
        if let Ok(password) = std::env::var("FORUM_ADMIN_PASSWORD") {
            if let Some(admin) = self.admin.as_mut() {
                if !password.is_empty() {
                    admin.password = password;
                }
            }
        }
    }

    /// Validate settings that have no usable default.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(ForumError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via FORUM_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.avatars.backend == AvatarBackend::S3 && self.avatars.s3_bucket.is_empty() {
            return Err(ForumError::Config(
                "avatars.backend is s3 but avatars.s3_bucket is not set".to_string(),
            ));
        }
        if let Some(admin) = &self.admin {
            if admin.password.is_empty() {
                return Err(ForumError::Config(
                    "admin account configured without a password".to_string(),
                ));
            }
        }
        Ok(())
    }
}
