//! Category usage service.
//!
//! # Responsibility
//! - Record a category selection as one get-or-create plus usage bump.
//! - Expose lookup and recency listing to core callers.
//!
//! # Invariants
//! - Service APIs own input validation; repositories persist values as given.
//! - Service layer remains storage-agnostic.

use crate::model::category::Category;
use crate::repo::category_repo::{CategoryRepository, RepoResult};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of recent names returned when the caller does not choose a limit.
pub const RECENT_DEFAULT_LIMIT: i64 = 10;

/// Use-case service wrapper for category usage tracking.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records that `name` was used at `now_ms`.
    ///
    /// # Contract
    /// - Rejects blank names before touching the repository.
    /// - Loads the stored category by name, or starts a new one.
    /// - Increments `times_used` and sets `last_used = now_ms`.
    /// - Returns the saved category with its identity assigned.
    pub fn record_use(&self, name: &str, now_ms: i64) -> RepoResult<Category> {
        let mut category = Category::new(name);
        category.validate()?;

        if let Some(existing) = self.repo.find(name)? {
            category = existing;
        }

        category.increment_times_used(now_ms);
        self.repo.save(&mut category)?;

        info!(
            "event=category_use module=service status=ok times_used={}",
            category.times_used
        );
        Ok(category)
    }

    /// Saves a category as-is.
    pub fn save(&self, category: &mut Category) -> RepoResult<()> {
        self.repo.save(category)
    }

    /// Gets one category by exact name.
    pub fn find(&self, name: &str) -> RepoResult<Option<Category>> {
        self.repo.find(name)
    }

    /// Lists up to `limit` recently used names, newest first.
    pub fn recent_categories(&self, limit: i64) -> RepoResult<Vec<String>> {
        self.repo.recent_categories(limit)
    }

    /// Same as `recent_categories`, falling back to `RECENT_DEFAULT_LIMIT`.
    pub fn recent_category_names(&self, limit: Option<i64>) -> RepoResult<Vec<String>> {
        self.repo.recent_categories(limit.unwrap_or(RECENT_DEFAULT_LIMIT))
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch read as `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
