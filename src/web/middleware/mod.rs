//! Middleware for the Web API.

pub mod auth;
pub mod cors;

pub use auth::{bearer_token, jwt_auth, AuthUser, JwtClaims, JwtState};
pub use cors::create_cors_layer;
