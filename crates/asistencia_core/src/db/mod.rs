//! SQLite file that holds the durable session slot.
//!
//! The whole attendance session lives in one row of `kv_slots`, keyed by slot
//! name (`attendanceData` unless configured otherwise), with the JSON
//! snapshot in `value`. This module only opens the file and brings the
//! schema up to date; reading and writing rows is `repo::slot_repo`'s job.
//!
//! # Invariants
//! - `kv_slots.key` is the primary key, so a slot has at most one row and a
//!   write replaces the previous snapshot.
//! - Schema version lives in `PRAGMA user_version`; a file written by a newer
//!   build is refused rather than read with the wrong layout.
//! - Callers get a connection only after migrations committed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The slot file was migrated by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
