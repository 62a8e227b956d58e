//! Comment model.
//!
//! Comments hang off a post. A comment may point at another comment on the
//! same post through `parent_id`; there is no deeper threading.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Comment entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID.
    pub id: String,
    /// ID of the user who wrote the comment.
    pub author_id: String,
    /// ID of the post being commented on.
    pub post_id: String,
    /// Comment being replied to, if any.
    pub parent_id: Option<String>,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    #[serde(rename = "create_date")]
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    #[serde(rename = "update_date")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: String,
    pub author_id: String,
    pub parent_id: Option<String>,
    pub content: String,
}

impl NewComment {
    /// Create a top-level comment.
    pub fn new(
        post_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            author_id: author_id.into(),
            parent_id: None,
            content: content.into(),
        }
    }

    /// Make this comment a reply to another comment.
    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}
