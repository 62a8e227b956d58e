//! Post model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Post entity. The author owns the post for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: String,
    /// ID of the user who created the post.
    pub author_id: String,
    /// ID of the board this post belongs to.
    pub board_id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Creation timestamp.
    #[serde(rename = "create_date")]
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp, if ever edited.
    #[serde(rename = "update_date")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// ID of the board.
    pub board_id: String,
    /// ID of the author.
    pub author_id: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(
        board_id: impl Into<String>,
        author_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            author_id: author_id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Data for updating an existing post.
///
/// There is deliberately no author field: ownership never changes.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set new body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
