//! Core persistence for recently used upload categories.
//! This crate owns the `categories` table and every read/write against it.

pub mod channel;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use channel::{
    ChannelError, ChannelResult, FieldValues, Filter, RowLocator, RowQuery, RowValues,
    SqliteChannel, StorageChannel, TableLocator,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryValidationError};
pub use repo::category_repo::{
    category_from_row, CategoryDao, CategoryRepository, RepoError, RepoResult,
};
pub use service::category_service::{now_epoch_ms, CategoryService, RECENT_DEFAULT_LIMIT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
