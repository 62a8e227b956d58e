//! Comment repository.

use chrono::Utc;

use super::comment::{Comment, NewComment};
use crate::db::{new_id, DbPool};
use crate::{ForumError, Result};

const COMMENT_COLUMNS: &str =
    "id, author_id, post_id, parent_id, content, created_at, updated_at";

/// Repository for comment CRUD operations.
pub struct CommentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment.
    ///
    /// The post must exist. A parent, when given, must be a comment on the
    /// same post.
    pub async fn create(&self, new_comment: &NewComment) -> Result<Comment> {
        if let Some(ref parent_id) = new_comment.parent_id {
            let parent_post: Option<String> =
                sqlx::query_scalar("SELECT post_id FROM comments WHERE id = ?")
                    .bind(parent_id)
                    .fetch_optional(self.pool)
                    .await?;
            match parent_post {
                None => return Err(ForumError::NotFound("parent comment".to_string())),
                Some(post_id) if post_id != new_comment.post_id => {
                    return Err(ForumError::Validation(
                        "parent comment belongs to a different post".to_string(),
                    ))
                }
                Some(_) => {}
            }
        }

        let id = new_id();
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, parent_id, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_comment.post_id)
        .bind(&new_comment.author_id)
        .bind(&new_comment.parent_id)
        .bind(&new_comment.content)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ForumError::NotFound("post".to_string())
            }
            _ => ForumError::Database(e.to_string()),
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| ForumError::NotFound("comment".to_string()))
    }

    /// Get a comment by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Comment>> {
        let comment =
            sqlx::query_as(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(comment)
    }

    /// Get only the author of a comment.
    pub async fn owner_of(&self, id: &str) -> Result<Option<String>> {
        let owner = sqlx::query_scalar("SELECT author_id FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(owner)
    }

    /// Replace the body of a comment and stamp the edit time.
    ///
    /// Returns the updated comment, or None if not found.
    pub async fn update_content(&self, id: &str, content: &str) -> Result<Option<Comment>> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a comment by ID.
    ///
    /// Replies to it are kept; their parent pointer is left dangling.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List comments on a post, oldest first.
    pub async fn list_by_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?
             ORDER BY created_at, id"
        ))
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;
        Ok(comments)
    }

    /// List comments by author, newest first.
    pub async fn list_by_author(&self, author_id: &str) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE author_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(author_id)
        .fetch_all(self.pool)
        .await?;
        Ok(comments)
    }
}
