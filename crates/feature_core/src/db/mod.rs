//! SQLite storage for the `features` table.
//!
//! # Responsibility
//! - Open file or in-memory connections with pragmas and busy timeout applied.
//! - Bring the `features` schema up to the version this build understands.
//!
//! # Schema
//! - `features.id` is a UUID text primary key, assigned by the repository.
//! - `document_id` is NOT NULL. `well_id` and the descriptive columns
//!   (`name`, `content`, `depth_top`, `depth_bottom`) are nullable.
//! - `status` defaults to `1` (active). `0` marks a soft-deleted row.
//! - `create_time`/`update_time` hold epoch milliseconds and are mirrored by
//!   the `create_date`/`update_date` text columns.
//! - `well_id`, `document_id` and `status` are indexed for the lookup and
//!   batch soft-delete paths.
//!
//! # Invariants
//! - The applied schema version lives in `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_with_config};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// Any SQLite failure, including constraint and transaction errors.
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` is ahead of `migrations::latest_version()`.
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
                "feature schema version {db_version} is newer than supported {latest_supported}"
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
