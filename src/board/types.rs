//! Board model.
//!
//! This module defines the Board entity and its create/update payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Board entity. Boards have no owner; only admins mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: String,
    /// Board name (unique).
    pub name: String,
    /// Board description.
    pub description: String,
    /// Board creation timestamp.
    #[serde(rename = "create_date")]
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
}

impl NewBoard {
    /// Create a new board with an empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Data for updating an existing board.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl BoardUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set new description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Summary of the most recent entry in a collection: who wrote it, when, and
/// how many entries the collection holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastActivity {
    /// Username of the author of the latest entry.
    pub author: String,
    /// Creation time of the latest entry.
    pub date_time: DateTime<Utc>,
    /// Total number of entries.
    pub count: i64,
}
