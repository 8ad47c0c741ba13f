//! Category repository contract and channel-backed implementation.
//!
//! # Responsibility
//! - Save categories as insert-or-update depending on assigned identity.
//! - Look categories up by name and list recently used names.
//! - Decode stored rows into `Category` values.
//!
//! # Invariants
//! - Any name is stored as given, including blank ones; input policy lives
//!   in the service layer.
//! - Rows are decoded by column name; invalid persisted state is rejected
//!   instead of masked.
//! - Transport failures propagate unchanged as `RepoError::Transport`.
//!
//! # Known gaps
//! - `name` is not unique at the schema level. When duplicates exist, `find`
//!   returns the earliest inserted row.

use crate::channel::{
    ChannelError, FieldValues, Filter, RowQuery, RowValues, StorageChannel, TableLocator,
};
use crate::db::schema::{
    ALL_FIELDS, COLUMN_ID, COLUMN_LAST_USED, COLUMN_NAME, COLUMN_TIMES_USED,
};
use crate::model::category::{Category, CategoryValidationError};
use log::{debug, error, warn};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by category persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Rejected caller input. Raised by services, never by `CategoryDao`.
    Validation(CategoryValidationError),
    Transport(ChannelError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted category data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ChannelError> for RepoError {
    fn from(value: ChannelError) -> Self {
        Self::Transport(value)
    }
}

/// Repository interface for category usage records.
pub trait CategoryRepository {
    /// Inserts a transient category (assigning its `id`) or overwrites the
    /// mutable fields of a persisted one.
    fn save(&self, category: &mut Category) -> RepoResult<()>;
    /// Exact-match lookup by name. `Ok(None)` when nothing matches.
    fn find(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Names of the `limit` most recently used categories, newest first.
    /// Non-positive limits yield an empty list.
    fn recent_categories(&self, limit: i64) -> RepoResult<Vec<String>>;
}

/// Category repository speaking to any storage channel.
pub struct CategoryDao<C> {
    channel: C,
    table: TableLocator,
}

impl<C: StorageChannel> CategoryDao<C> {
    /// Builds a repository targeting the `categories` table of `channel`.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            table: TableLocator::categories(),
        }
    }

    /// Table locator this repository reads and writes.
    pub fn table(&self) -> &TableLocator {
        &self.table
    }
}

impl<C: StorageChannel> CategoryRepository for CategoryDao<C> {
    fn save(&self, category: &mut Category) -> RepoResult<()> {
        let values = to_field_values(category);

        match category.id.clone() {
            None => {
                let id = self
                    .channel
                    .insert(&self.table, &values)
                    .map_err(|err| transport_failure("insert", err))?;
                debug!("event=category_save module=repo status=ok op=insert id={id}");
                category.id = Some(id);
            }
            Some(id) => {
                if id.table() != &self.table {
                    return Err(RepoError::InvalidData(format!(
                        "locator `{id}` does not belong to `{}`",
                        self.table
                    )));
                }

                let changed = self
                    .channel
                    .update(&id, &values, None)
                    .map_err(|err| transport_failure("update", err))?;
                if changed == 0 {
                    warn!("event=category_save module=repo status=missing op=update id={id}");
                } else {
                    debug!("event=category_save module=repo status=ok op=update id={id}");
                }
            }
        }

        Ok(())
    }

    fn find(&self, name: &str) -> RepoResult<Option<Category>> {
        let query = RowQuery::columns(ALL_FIELDS)
            .filter(Filter::eq(COLUMN_NAME, name.to_string()))
            .order_by(format!("{COLUMN_ID} ASC"))
            .limit(1);

        let rows = self
            .channel
            .query(&self.table, &query)
            .map_err(|err| transport_failure("find", err))?;

        rows.first()
            .map(|row| category_from_row(row, &self.table))
            .transpose()
    }

    fn recent_categories(&self, limit: i64) -> RepoResult<Vec<String>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let query = RowQuery::columns(&[COLUMN_NAME])
            .order_by(format!("{COLUMN_LAST_USED} DESC, {COLUMN_ID} ASC"))
            .limit(u32::try_from(limit).unwrap_or(u32::MAX));

        let rows = self
            .channel
            .query(&self.table, &query)
            .map_err(|err| transport_failure("recent", err))?;

        rows.iter()
            .map(|row| required_text(row, COLUMN_NAME))
            .collect()
    }
}

/// Decodes one `categories` row into a persisted `Category`.
///
/// # Errors
/// - `InvalidData` when a column is missing, null, has the wrong type, or
///   `times_used` does not fit a non-negative counter.
pub fn category_from_row(row: &RowValues, table: &TableLocator) -> RepoResult<Category> {
    let raw_id = required_integer(row, COLUMN_ID)?;
    let id = table.row(raw_id).map_err(|err| {
        RepoError::InvalidData(format!("invalid row id `{raw_id}` in categories._id: {err}"))
    })?;

    let raw_times_used = required_integer(row, COLUMN_TIMES_USED)?;
    let times_used = u32::try_from(raw_times_used).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid times_used value `{raw_times_used}` in categories.times_used"
        ))
    })?;

    Ok(Category {
        id: Some(id),
        name: required_text(row, COLUMN_NAME)?,
        last_used: required_integer(row, COLUMN_LAST_USED)?,
        times_used,
    })
}

fn to_field_values(category: &Category) -> FieldValues {
    let mut values = FieldValues::new();
    values.put(COLUMN_NAME, category.name.clone());
    values.put(COLUMN_LAST_USED, category.last_used);
    values.put(COLUMN_TIMES_USED, i64::from(category.times_used));
    values
}

fn required_integer(row: &RowValues, column: &str) -> RepoResult<i64> {
    match row.get(column) {
        Some(Value::Integer(value)) => Ok(*value),
        Some(other) => Err(RepoError::InvalidData(format!(
            "expected integer in categories.{column}, got {other:?}"
        ))),
        None => Err(RepoError::InvalidData(format!(
            "missing column categories.{column}"
        ))),
    }
}

fn required_text(row: &RowValues, column: &str) -> RepoResult<String> {
    match row.get(column) {
        Some(Value::Text(value)) => Ok(value.clone()),
        Some(other) => Err(RepoError::InvalidData(format!(
            "expected text in categories.{column}, got {other:?}"
        ))),
        None => Err(RepoError::InvalidData(format!(
            "missing column categories.{column}"
        ))),
    }
}

fn transport_failure(op: &str, err: ChannelError) -> RepoError {
    error!("event=category_{op} module=repo status=error error={err}");
    RepoError::Transport(err)
}

#[cfg(test)]
mod tests {
    use super::{category_from_row, RepoError};
    use crate::channel::{RowValues, TableLocator};
    use rusqlite::types::Value;

    fn row(columns: &[(&str, Value)]) -> RowValues {
        RowValues::from_pairs(
            columns
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn decoding_is_independent_of_column_order() {
        let reordered = row(&[
            ("times_used", Value::Integer(4)),
            ("last_used", Value::Integer(1_700_000_000_000)),
            ("name", Value::Text("Lighthouses".to_string())),
            ("_id", Value::Integer(12)),
        ]);

        let category = category_from_row(&reordered, &TableLocator::categories()).unwrap();
        assert_eq!(category.name, "Lighthouses");
        assert_eq!(category.last_used, 1_700_000_000_000);
        assert_eq!(category.times_used, 4);
        assert_eq!(category.id.map(|id| id.id()), Some(12));
    }

    #[test]
    fn decoding_rejects_missing_and_mistyped_columns() {
        let missing = row(&[
            ("_id", Value::Integer(1)),
            ("name", Value::Text("A".to_string())),
            ("last_used", Value::Integer(1)),
        ]);
        let err = category_from_row(&missing, &TableLocator::categories()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("times_used")));

        let null_name = row(&[
            ("_id", Value::Integer(1)),
            ("name", Value::Null),
            ("last_used", Value::Integer(1)),
            ("times_used", Value::Integer(1)),
        ]);
        let err = category_from_row(&null_name, &TableLocator::categories()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("name")));
    }

    #[test]
    fn decoding_rejects_negative_counter() {
        let negative = row(&[
            ("_id", Value::Integer(1)),
            ("name", Value::Text("A".to_string())),
            ("last_used", Value::Integer(1)),
            ("times_used", Value::Integer(-1)),
        ]);
        let err = category_from_row(&negative, &TableLocator::categories()).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
