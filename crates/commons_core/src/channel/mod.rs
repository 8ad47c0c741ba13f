//! Storage channel contract between repositories and the backing store.
//!
//! # Responsibility
//! - Define the insert/update/query surface repositories talk to.
//! - Carry column values by name in both directions.
//!
//! # Invariants
//! - Query results are fully materialized before a call returns, so no
//!   statement or cursor outlives the call on any exit path.
//! - Every channel failure is reported as `ChannelError` and propagated
//!   unchanged; channels never retry.
//!
//! # See also
//! - `repo::category_repo` for the main consumer.

use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod locator;
mod sqlite;

pub use locator::{
    LocatorError, RowLocator, TableLocator, CATEGORY_AUTHORITY, CATEGORY_BASE_PATH,
};
pub use sqlite::SqliteChannel;

/// Identity column every channel-managed table carries.
pub const ROW_ID_COLUMN: &str = "_id";

pub type ChannelResult<T> = Result<T, ChannelError>;

/// Transport failure: the store is unreachable or rejected the request.
#[derive(Debug)]
pub enum ChannelError {
    Sqlite(rusqlite::Error),
    Rejected(String),
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "storage channel failure: {err}"),
            Self::Rejected(message) => write!(f, "storage channel rejected request: {message}"),
        }
    }
}

impl Error for ChannelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<rusqlite::Error> for ChannelError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<LocatorError> for ChannelError {
    fn from(value: LocatorError) -> Self {
        Self::Rejected(value.to_string())
    }
}

/// Column values written by insert/update, in insertion order.
///
/// Putting the same column twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(String, Value)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One decoded result row, addressed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    columns: Vec<(String, Value)>,
}

impl RowValues {
    pub fn from_pairs(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

/// Row filter: a selection clause with `?` placeholders plus bound args.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub selection: String,
    pub args: Vec<Value>,
}

impl Filter {
    pub fn new(selection: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            selection: selection.into(),
            args,
        }
    }

    /// Exact-match filter on one column.
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(format!("{column} = ?"), vec![value.into()])
    }
}

/// Query options for one read against a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    /// Projected columns; empty selects every column.
    pub columns: Vec<String>,
    pub filter: Option<Filter>,
    /// Raw ordering clause, e.g. `last_used DESC`.
    pub order_by: Option<String>,
    /// Store-level row limit.
    pub limit: Option<u32>,
}

impl RowQuery {
    pub fn columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Request/response surface of the backing store.
///
/// Calls are synchronous and self-contained; implementations rely on the
/// store for write serialization and hold no state between calls.
pub trait StorageChannel {
    /// Inserts one row and returns the locator the store assigned to it.
    fn insert(&self, table: &TableLocator, values: &FieldValues) -> ChannelResult<RowLocator>;
    /// Updates the row at `row`, optionally narrowed by `filter`.
    /// Returns the number of affected rows.
    fn update(
        &self,
        row: &RowLocator,
        values: &FieldValues,
        filter: Option<&Filter>,
    ) -> ChannelResult<usize>;
    /// Runs one read and returns every produced row.
    fn query(&self, table: &TableLocator, query: &RowQuery) -> ChannelResult<Vec<RowValues>>;
}

impl<T: StorageChannel + ?Sized> StorageChannel for &T {
    fn insert(&self, table: &TableLocator, values: &FieldValues) -> ChannelResult<RowLocator> {
        (**self).insert(table, values)
    }

    fn update(
        &self,
        row: &RowLocator,
        values: &FieldValues,
        filter: Option<&Filter>,
    ) -> ChannelResult<usize> {
        (**self).update(row, values, filter)
    }

    fn query(&self, table: &TableLocator, query: &RowQuery) -> ChannelResult<Vec<RowValues>> {
        (**self).query(table, query)
    }
}
