//! HTTP API for the forum.
//!
//! JSON handlers over axum, bearer-token authentication and the server
//! that binds them together.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
