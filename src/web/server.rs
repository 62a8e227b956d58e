//! Web server for the forum API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{AvatarConfig, ServerConfig, WebConfig};
use crate::error::{ForumError, Result};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::create_app;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// Web configuration.
    web_config: WebConfig,
    /// Avatar configuration, used to mount local avatar files.
    avatar_config: AvatarConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        server: &ServerConfig,
        web: &WebConfig,
        avatars: &AvatarConfig,
        app_state: AppState,
    ) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse()
            .map_err(|e| ForumError::Config(format!("invalid server address: {e}")))?;

        let jwt_state = Arc::new(JwtState::new(&web.jwt_secret, &web.jwt_issuer));

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            jwt_state,
            web_config: web.clone(),
            avatar_config: avatars.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn into_parts(self) -> (SocketAddr, Router) {
        let router = create_app(
            self.app_state,
            self.jwt_state,
            &self.web_config.cors_origins,
            &self.avatar_config,
        );
        (self.addr, router)
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::io::Result<()> {
        let (addr, router) = self.into_parts();
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (addr, router) = self.into_parts();
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
