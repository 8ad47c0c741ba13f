//! `categories` table definition.
//!
//! Column names here are the only place the table layout is spelled out;
//! row decoding looks columns up by these names, never by position.

use super::DbResult;
use log::info;
use rusqlite::Connection;

pub const TABLE_NAME: &str = "categories";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_LAST_USED: &str = "last_used";
pub const COLUMN_TIMES_USED: &str = "times_used";

/// Every column of the table, in declaration order.
pub const ALL_FIELDS: &[&str] = &[COLUMN_ID, COLUMN_NAME, COLUMN_LAST_USED, COLUMN_TIMES_USED];

pub(crate) const CREATE_TABLE_SQL: &str = include_str!("migrations/0005_categories.sql");
const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS categories;";

/// Creates the `categories` table. Fails if it already exists.
pub fn create(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

/// Drops and recreates the `categories` table, discarding every row.
pub fn reset(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(DROP_TABLE_SQL)?;
    create(conn)?;
    info!("event=db_reset module=db status=ok table={TABLE_NAME}");
    Ok(())
}
