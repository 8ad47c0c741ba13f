//! SQLite implementation of the storage channel.
//!
//! # Responsibility
//! - Translate channel requests into parameterized SQL on one connection.
//!
//! # Invariants
//! - Table and column names are checked as bare identifiers before they are
//!   spliced into SQL; values always travel as bound parameters.
//! - Statements are dropped before each call returns.

use super::locator::is_sql_identifier;
use super::{
    ChannelError, ChannelResult, FieldValues, Filter, RowLocator, RowQuery, RowValues,
    StorageChannel, TableLocator, ROW_ID_COLUMN,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Storage channel backed by a migrated SQLite connection.
pub struct SqliteChannel<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChannel<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StorageChannel for SqliteChannel<'_> {
    fn insert(&self, table: &TableLocator, values: &FieldValues) -> ChannelResult<RowLocator> {
        let sql = if values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES;", table.table())
        } else {
            let columns = checked_columns(values.iter().map(|(name, _)| name))?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({placeholders});",
                table.table(),
                columns.join(", ")
            )
        };

        self.conn
            .execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))?;

        Ok(table.row(self.conn.last_insert_rowid())?)
    }

    fn update(
        &self,
        row: &RowLocator,
        values: &FieldValues,
        filter: Option<&Filter>,
    ) -> ChannelResult<usize> {
        if values.is_empty() {
            return Err(ChannelError::Rejected(format!(
                "update of `{row}` has no field values"
            )));
        }

        let columns = checked_columns(values.iter().map(|(name, _)| name))?;
        let assignments = columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "UPDATE {} SET {assignments} WHERE {ROW_ID_COLUMN} = ?",
            row.table().table()
        );

        let mut bind_values: Vec<Value> = values.iter().map(|(_, value)| value.clone()).collect();
        bind_values.push(Value::Integer(row.id()));
        if let Some(filter) = filter {
            sql.push_str(&format!(" AND ({})", filter.selection));
            bind_values.extend(filter.args.iter().cloned());
        }

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn query(&self, table: &TableLocator, query: &RowQuery) -> ChannelResult<Vec<RowValues>> {
        let projection = if query.columns.is_empty() {
            "*".to_string()
        } else {
            checked_columns(query.columns.iter().map(String::as_str))?.join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {}", table.table());
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = &query.filter {
            sql.push_str(&format!(" WHERE {}", filter.selection));
            bind_values.extend(filter.args.iter().cloned());
        }

        if let Some(order_by) = &query.order_by {
            if !is_order_clause(order_by) {
                return Err(ChannelError::Rejected(format!(
                    "invalid order clause `{order_by}`"
                )));
            }
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                columns.push((name.clone(), row.get::<_, Value>(index)?));
            }
            result.push(RowValues::from_pairs(columns));
        }

        Ok(result)
    }
}

fn checked_columns<'a>(names: impl Iterator<Item = &'a str>) -> ChannelResult<Vec<&'a str>> {
    names
        .map(|name| {
            if is_sql_identifier(name) {
                Ok(name)
            } else {
                Err(ChannelError::Rejected(format!("invalid column name `{name}`")))
            }
        })
        .collect()
}

fn is_order_clause(value: &str) -> bool {
    value.split(',').all(|term| {
        let mut parts = term.split_whitespace();
        let column_ok = parts.next().is_some_and(is_sql_identifier);
        let direction_ok = match parts.next() {
            None => true,
            Some(direction) => {
                direction.eq_ignore_ascii_case("ASC") || direction.eq_ignore_ascii_case("DESC")
            }
        };
        column_ok && direction_ok && parts.next().is_none()
    })
}
