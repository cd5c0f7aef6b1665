//! Collection bootstrap for the `pokemons` store.
//!
//! The store has a single schema shape. Bootstrapping creates the collection
//! with its `no`/`name` uniqueness constraints and stamps `PRAGMA user_version`.
//! A store stamped by a newer binary is refused rather than guessed at.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the collection when missing and verifies the stored version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = stored_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            supported: SCHEMA_VERSION,
        });
    }

    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Reads the schema version stamped on the store.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
