//! Key/value storage backed by the `local_storage` table.
//!
//! Values are opaque strings; callers own their encoding.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Reads the value stored under `key`.
///
/// Returns `None` if the key is absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read local_storage key {key}"))
}

/// Stores `value` under `key`, overwriting any previous value.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )
    .with_context(|| format!("failed to write local_storage key {key}"))?;
    Ok(())
}

/// Deletes the value stored under `key`. Missing keys are ignored.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_item(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])
        .with_context(|| format!("failed to delete local_storage key {key}"))?;
    Ok(())
}
