//! Post repository.
//!
//! This module provides CRUD operations for posts in the database.

use chrono::Utc;
use sqlx::QueryBuilder;

use super::post::{NewPost, Post, PostUpdate};
use super::types::LastActivity;
use crate::db::{new_id, DbPool};
use crate::{ForumError, Result};

const POST_COLUMNS: &str = "id, author_id, board_id, title, content, created_at, updated_at";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// The board must exist; a missing board yields `ForumError::NotFound`.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id = new_id();
        sqlx::query(
            "INSERT INTO posts (id, board_id, author_id, title, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_post.board_id)
        .bind(&new_post.author_id)
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ForumError::NotFound("board".to_string())
            }
            _ => ForumError::Database(e.to_string()),
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| ForumError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Get only the author of a post.
    pub async fn owner_of(&self, id: &str) -> Result<Option<String>> {
        let owner = sqlx::query_scalar("SELECT author_id FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(owner)
    }

    /// Update a post by ID.
    ///
    /// Only fields that are set in the update will be modified, and the edit
    /// time is stamped. Returns the updated post, or None if not found.
    pub async fn update(&self, id: &str, update: &PostUpdate) -> Result<Option<Post>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref content) = update.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a post by ID, together with its comments.
    ///
    /// Returns true if a post was deleted, false if not found.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts in a board, newest first.
    pub async fn list_by_board(&self, board_id: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE board_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(board_id)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// List posts by author, newest first.
    pub async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(author_id)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// Count posts in a board.
    pub async fn count_by_board(&self, board_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE board_id = ?")
            .bind(board_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Summary of the newest comment on a post.
    ///
    /// Returns None when the post has no comments.
    pub async fn last_comment(&self, post_id: &str) -> Result<Option<LastActivity>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(self.pool)
            .await?;
        if count == 0 {
            return Ok(None);
        }

        let latest: Option<(Option<String>, chrono::DateTime<Utc>)> = sqlx::query_as(
            "SELECT u.username, c.created_at
             FROM comments c LEFT JOIN users u ON u.id = c.author_id
             WHERE c.post_id = ?
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT 1",
        )
        .bind(post_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(latest.map(|(author, date_time)| LastActivity {
            author: author.unwrap_or_default(),
            date_time,
            count,
        }))
    }
}
