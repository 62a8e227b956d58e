//! Board repository.
//!
//! This module provides CRUD operations for boards in the database.

use chrono::Utc;
use sqlx::QueryBuilder;

use super::types::{Board, BoardUpdate, LastActivity, NewBoard};
use super::PostRepository;
use crate::db::{new_id, DbPool};
use crate::{ForumError, Result};

const BOARD_COLUMNS: &str = "id, name, description, created_at";

/// Repository for board CRUD operations.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board in the database.
    ///
    /// Returns the created board with its generated ID. A taken name yields
    /// `ForumError::Conflict`.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let id = new_id();
        sqlx::query("INSERT INTO boards (id, name, description, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&new_board.name)
            .bind(&new_board.description)
            .bind(Utc::now())
            .execute(self.pool)
            .await
            .map_err(|e| ForumError::from_write(e, "board name"))?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| ForumError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Board>> {
        let board = sqlx::query_as(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(board)
    }

    /// Get a board by name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Board>> {
        let board = sqlx::query_as(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE name = ?"))
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(board)
    }

    /// Whether a board with the given ID exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Update a board by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated board, or None if not found.
    pub async fn update(&self, id: &str, update: &BoardUpdate) -> Result<Option<Board>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE boards SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| ForumError::from_write(e, "board name"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a board by ID, together with its posts and their comments.
    ///
    /// Returns true if a board was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all boards in creation order.
    pub async fn list_all(&self) -> Result<Vec<Board>> {
        let boards = sqlx::query_as(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards ORDER BY created_at, id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(boards)
    }

    /// Summary of the newest post in a board.
    ///
    /// Returns None when the board has no posts. Posts whose author no
    /// longer exists are reported with an empty author name.
    pub async fn last_post(&self, board_id: &str) -> Result<Option<LastActivity>> {
        let count = PostRepository::new(self.pool)
            .count_by_board(board_id)
            .await?;
        if count == 0 {
            return Ok(None);
        }

        let latest: Option<(Option<String>, chrono::DateTime<Utc>)> = sqlx::query_as(
            "SELECT u.username, p.created_at
             FROM posts p LEFT JOIN users u ON u.id = p.author_id
             WHERE p.board_id = ?
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT 1",
        )
        .bind(board_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(latest.map(|(author, date_time)| LastActivity {
            author: author.unwrap_or_default(),
            date_time,
            count,
        }))
    }
}
