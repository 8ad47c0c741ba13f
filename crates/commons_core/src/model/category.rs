//! Category domain model.
//!
//! # Responsibility
//! - Define the usage record kept for every category the user has picked.
//! - Provide the usage bump applied when a category is selected again.
//!
//! # Invariants
//! - `id` is `None` until the first save and never changes afterwards.
//! - `name` is the logical key; one stored row per name is expected.
//! - `last_used` is Unix epoch milliseconds.

use crate::channel::RowLocator;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for `Category` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    /// Name is empty or whitespace only.
    EmptyName,
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name cannot be empty"),
        }
    }
}

impl Error for CategoryValidationError {}

/// Usage record for one category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned row locator. `None` while the category is transient.
    pub id: Option<RowLocator>,
    /// Category name, used as lookup key.
    pub name: String,
    /// Unix epoch milliseconds of the most recent use.
    pub last_used: i64,
    /// Number of times the category has been used.
    pub times_used: u32,
}

impl Category {
    /// Creates a transient category that has never been used.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_usage(name, 0, 0)
    }

    /// Creates a transient category with known usage counters.
    ///
    /// Used by import paths where usage history already exists.
    pub fn with_usage(name: impl Into<String>, last_used: i64, times_used: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            last_used,
            times_used,
        }
    }

    /// Records one more use at `now_ms`.
    pub fn increment_times_used(&mut self, now_ms: i64) {
        self.times_used = self.times_used.saturating_add(1);
        self.last_used = now_ms;
    }

    /// Checks the invariants a category must hold before it is written.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        Ok(())
    }

    /// Returns whether the store has assigned an identity to this category.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
