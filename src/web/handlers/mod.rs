//! API handlers.

pub mod auth;
pub mod board;
pub mod comment;
pub mod post;
pub mod user;

pub use auth::*;
pub use board::*;
pub use comment::*;
pub use post::*;
pub use user::*;
