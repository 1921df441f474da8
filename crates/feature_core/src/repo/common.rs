//! Shared repository plumbing generic over the stored record type.
//!
//! # Responsibility
//! - Define the repository error surface shared by all tables.
//! - Provide single-row lookup and connection readiness checks that
//!   concrete repositories reuse instead of re-implementing.
//!
//! # Invariants
//! - Single-row lookups never pick one of several matches silently.
//! - Column names reaching SQL text come from `Record::COLUMNS`, never from callers.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use log::error;
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    /// A query named a column that the record type does not map.
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },
    /// More than one row matched a lookup that expects at most one.
    AmbiguousLookup {
        table: &'static str,
        column: &'static str,
        value: String,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "`{column}` is not a mapped column of {table}")
            }
            Self::AmbiguousLookup {
                table,
                column,
                value,
            } => write!(f, "multiple {table} rows match {column} = `{value}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A row type stored in one table.
pub trait Record: Sized {
    const TABLE: &'static str;
    /// Columns selected for `from_row`, in select order.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Returns the `SELECT <columns> FROM <table>` prefix for `T`.
pub fn select_sql<T: Record>() -> String {
    format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

/// Fetches the single `T` whose `column` equals `value`.
///
/// Returns `Ok(None)` when nothing matches and `RepoError::AmbiguousLookup`
/// when more than one row does. A `column` outside `T::COLUMNS` is rejected
/// with `RepoError::UnknownColumn` before any SQL is built.
pub fn find_one_by<T: Record>(
    conn: &Connection,
    column: &'static str,
    value: &str,
) -> RepoResult<Option<T>> {
    if !T::COLUMNS.contains(&column) {
        return Err(RepoError::UnknownColumn {
            table: T::TABLE,
            column,
        });
    }

    let mut stmt = conn.prepare(&format!(
        "{} WHERE {column} = ?1 LIMIT 2;",
        select_sql::<T>()
    ))?;
    let mut rows = stmt.query([value])?;

    let record = match rows.next()? {
        Some(row) => T::from_row(row)?,
        None => return Ok(None),
    };

    if rows.next()?.is_some() {
        error!(
            "event=lookup_one module=repo status=error table={} column={} error_code=ambiguous_lookup",
            T::TABLE,
            column
        );
        return Err(RepoError::AmbiguousLookup {
            table: T::TABLE,
            column,
            value: value.to_string(),
        });
    }

    Ok(Some(record))
}

/// Verifies `conn` is migrated and `table` carries every listed column.
pub fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &'static [&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{find_one_by, RepoError};
    use crate::db::open_db_in_memory;
    use crate::model::feature::Feature;

    #[test]
    fn find_one_by_rejects_unmapped_column() {
        let conn = open_db_in_memory().unwrap();

        let err = find_one_by::<Feature>(&conn, "create_tiem", "0").unwrap_err();
        assert!(matches!(
            err,
            RepoError::UnknownColumn {
                table: "features",
                column: "create_tiem"
            }
        ));
        assert!(err.to_string().contains("not a mapped column"));
    }

    #[test]
    fn find_one_by_accepts_mapped_column() {
        let conn = open_db_in_memory().unwrap();

        let found = find_one_by::<Feature>(&conn, "document_id", "doc-1").unwrap();
        assert!(found.is_none());
    }
}
