//! Board module.
//!
//! This module provides the forum content store:
//! - Boards (admin-managed containers)
//! - Posts inside boards, owned by their author
//! - Comments on posts, with an optional flat parent pointer
//!
//! Deleting a board removes its posts, and deleting a post removes its
//! comments.

mod comment;
mod comment_repository;
mod post;
mod post_repository;
mod repository;
mod types;

pub use comment::{Comment, NewComment};
pub use comment_repository::CommentRepository;
pub use post::{NewPost, Post, PostUpdate};
pub use post_repository::PostRepository;
pub use repository::BoardRepository;
pub use types::{Board, BoardUpdate, LastActivity, NewBoard};
