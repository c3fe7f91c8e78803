//! Durable key-value slot contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/put/remove over named slots holding serialized text.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `put_slot` replaces any previous value for the same key.
//! - `remove_slot` on a missing key is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotRepoError>;

/// Error for slot persistence operations.
#[derive(Debug)]
pub enum SlotRepoError {
    /// Slot key is blank after trim.
    InvalidKey,
    Db(DbError),
    /// Backend-specific failure (quota, I/O) reported as text.
    Backend(String),
}

impl Display for SlotRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "slot key must not be blank"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "slot backend failure: {message}"),
        }
    }
}

impl Error for SlotRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey | Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for SlotRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named durable slots.
pub trait SlotRepository {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>>;
    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()>;
    fn remove_slot(&self, key: &str) -> SlotResult<()>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).get_slot(key)
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).put_slot(key, value)
    }

    fn remove_slot(&self, key: &str) -> SlotResult<()> {
        (**self).remove_slot(key)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> SlotResult<()> {
        let key = normalize_key(key)?;
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn normalize_key(key: &str) -> SlotResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(SlotRepoError::InvalidKey);
    }
    Ok(trimmed)
}
