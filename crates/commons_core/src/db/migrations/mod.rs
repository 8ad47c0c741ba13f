//! Versioned schema steps and their executor.
//!
//! # Responsibility
//! - Register one step per schema version in strictly increasing order.
//! - Apply the steps between two versions in a single forward loop.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Versions before 5 predate the `categories` table and change nothing.
//! - There is no downgrade path: `from >= to` applies nothing.
//! - Applied version is mirrored to `PRAGMA user_version`.

use crate::db::schema::CREATE_TABLE_SQL;
use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: Option<&'static str>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: None,
    },
    Migration {
        version: 2,
        sql: None,
    },
    Migration {
        version: 3,
        sql: None,
    },
    Migration {
        version: 4,
        sql: None,
    },
    Migration {
        version: 5,
        sql: Some(CREATE_TABLE_SQL),
    },
    // Reserved for future category columns.
    Migration {
        version: 6,
        sql: None,
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies every step with `from < version <= to`, in order.
pub fn upgrade(conn: &Connection, from: u32, to: u32) -> DbResult<()> {
    for migration in MIGRATIONS {
        if migration.version <= from || migration.version > to {
            continue;
        }

        match migration.sql {
            Some(sql) => conn.execute_batch(sql)?,
            None => debug!(
                "event=db_migrate module=db status=skip version={}",
                migration.version
            ),
        }
    }

    Ok(())
}

/// Brings the connection's schema up to `latest_version()` atomically.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    upgrade(&tx, current_version, latest)?;
    tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={current_version} to_version={latest}"
    );
    Ok(())
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
