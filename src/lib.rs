//! Forum server
//!
//! A discussion-forum REST backend: accounts with roles, boards, posts and
//! threaded comments, served as JSON over HTTP.

pub mod audit;
pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use audit::{AuditAction, Auditor};
pub use auth::{
    decide, hash_password, validate_password, verify_password, Action, Decision, Identity,
    PasswordError, Reason, ResourceKind,
};
pub use board::{
    Board, BoardRepository, Comment, CommentRepository, NewBoard, NewComment, NewPost, Post,
    PostRepository,
};
pub use config::Config;
pub use db::{Database, NewUser, PublicUser, Role, User, UserRepository, UserUpdate};
pub use error::{ForumError, Result};
pub use storage::{AvatarStore, LocalAvatarStore};
pub use web::{AppState, WebServer};
