//! Content-style locators for tables and rows.
//!
//! # Responsibility
//! - Name the table a request targets (`content://<authority>/<table>`).
//! - Name one stored row (`content://<authority>/<table>/<id>`).
//!
//! # Invariants
//! - Authority and table segments never contain `/`.
//! - Table segments are plain SQL identifiers, so channels may splice them
//!   into statements.
//! - Row ids are non-negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SCHEME_PREFIX: &str = "content://";

/// Authority under which category rows are published.
pub const CATEGORY_AUTHORITY: &str = "fr.free.nrw.commons.categories.contentprovider";
/// Path segment (and table name) of the category relation.
pub const CATEGORY_BASE_PATH: &str = "categories";

/// Error returned when a locator cannot be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    MissingScheme(String),
    InvalidAuthority(String),
    InvalidTable(String),
    InvalidRowId(String),
}

impl Display for LocatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingScheme(value) => {
                write!(f, "locator `{value}` must start with `content://`")
            }
            Self::InvalidAuthority(value) => write!(f, "invalid locator authority `{value}`"),
            Self::InvalidTable(value) => write!(f, "invalid locator table `{value}`"),
            Self::InvalidRowId(value) => write!(f, "invalid locator row id `{value}`"),
        }
    }
}

impl Error for LocatorError {}

/// Locator of one table behind a storage channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableLocator {
    authority: String,
    table: String,
}

impl TableLocator {
    /// Builds a table locator after validating both segments.
    pub fn new(
        authority: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, LocatorError> {
        let authority = authority.into();
        let table = table.into();

        if authority.is_empty()
            || authority.contains('/')
            || authority.contains(char::is_whitespace)
        {
            return Err(LocatorError::InvalidAuthority(authority));
        }
        if !is_sql_identifier(&table) {
            return Err(LocatorError::InvalidTable(table));
        }

        Ok(Self { authority, table })
    }

    /// Locator of the `categories` table.
    pub fn categories() -> Self {
        Self {
            authority: CATEGORY_AUTHORITY.to_string(),
            table: CATEGORY_BASE_PATH.to_string(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the locator of row `id` inside this table.
    pub fn row(&self, id: i64) -> Result<RowLocator, LocatorError> {
        RowLocator::new(self.clone(), id)
    }
}

impl Display for TableLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}/{}", self.authority, self.table)
    }
}

impl FromStr for TableLocator {
    type Err = LocatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rest = strip_scheme(value)?;
        let (authority, table) = rest
            .split_once('/')
            .ok_or_else(|| LocatorError::InvalidTable(value.to_string()))?;
        Self::new(authority, table)
    }
}

/// Locator of one stored row. Assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowLocator {
    table: TableLocator,
    id: i64,
}

impl RowLocator {
    pub fn new(table: TableLocator, id: i64) -> Result<Self, LocatorError> {
        if id < 0 {
            return Err(LocatorError::InvalidRowId(id.to_string()));
        }
        Ok(Self { table, id })
    }

    /// Table this row belongs to.
    pub fn table(&self) -> &TableLocator {
        &self.table
    }

    /// Store-assigned row id.
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Display for RowLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.table, self.id)
    }
}

impl FromStr for RowLocator {
    type Err = LocatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rest = strip_scheme(value)?;
        let (table_part, id_part) = rest
            .rsplit_once('/')
            .ok_or_else(|| LocatorError::InvalidRowId(value.to_string()))?;
        let (authority, table) = table_part
            .split_once('/')
            .ok_or_else(|| LocatorError::InvalidRowId(value.to_string()))?;

        let id = id_part
            .parse::<i64>()
            .map_err(|_| LocatorError::InvalidRowId(id_part.to_string()))?;
        Self::new(TableLocator::new(authority, table)?, id)
    }
}

impl TryFrom<String> for RowLocator {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RowLocator> for String {
    fn from(value: RowLocator) -> Self {
        value.to_string()
    }
}

/// Returns whether `value` can be spliced into SQL as a bare identifier.
pub(crate) fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn strip_scheme(value: &str) -> Result<&str, LocatorError> {
    value
        .strip_prefix(SCHEME_PREFIX)
        .ok_or_else(|| LocatorError::MissingScheme(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{is_sql_identifier, LocatorError, RowLocator, TableLocator};

    #[test]
    fn category_row_locator_formats_as_content_uri() {
        let row = TableLocator::categories().row(42).unwrap();
        assert_eq!(
            row.to_string(),
            "content://fr.free.nrw.commons.categories.contentprovider/categories/42"
        );
    }

    #[test]
    fn row_locator_parses_its_own_display_form() {
        let row = TableLocator::categories().row(7).unwrap();
        let parsed: RowLocator = row.to_string().parse().unwrap();
        assert_eq!(parsed, row);
        assert_eq!(parsed.table(), &TableLocator::categories());
    }

    #[test]
    fn row_locator_rejects_bad_input() {
        assert!(matches!(
            "http://x/categories/1".parse::<RowLocator>(),
            Err(LocatorError::MissingScheme(_))
        ));
        assert!(matches!(
            "content://x/categories/abc".parse::<RowLocator>(),
            Err(LocatorError::InvalidRowId(_))
        ));
        assert!(matches!(
            "content://x/categories/-3".parse::<RowLocator>(),
            Err(LocatorError::InvalidRowId(_))
        ));
        assert!(matches!(
            "content://x/1".parse::<RowLocator>(),
            Err(LocatorError::InvalidRowId(_))
        ));
    }

    #[test]
    fn table_locator_rejects_non_identifier_tables() {
        let err = TableLocator::new("x", "categories; DROP TABLE x").unwrap_err();
        assert!(matches!(err, LocatorError::InvalidTable(_)));
        assert!(TableLocator::new("", "categories").is_err());
    }

    #[test]
    fn table_locator_parses() {
        let table: TableLocator = "content://a.b/things".parse().unwrap();
        assert_eq!(table.authority(), "a.b");
        assert_eq!(table.table(), "things");
    }

    #[test]
    fn sql_identifier_check() {
        assert!(is_sql_identifier("_id"));
        assert!(is_sql_identifier("last_used"));
        assert!(!is_sql_identifier("1abc"));
        assert!(!is_sql_identifier("name = 1"));
        assert!(!is_sql_identifier(""));
    }
}
