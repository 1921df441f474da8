//! Environment loading runs in its own test binary so variable changes
//! cannot leak into tests that read configuration concurrently.

use feature_core::config::{ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH, ENV_LOG_LEVEL};
use feature_core::db::open_db_with_config;
use feature_core::{ConfigError, CoreConfig};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn from_env_reads_process_variables_and_reports_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("env.sqlite3");

    std::env::set_var(ENV_DB_PATH, &db_path);
    std::env::set_var(ENV_BUSY_TIMEOUT_MS, "750");
    std::env::set_var(ENV_LOG_LEVEL, "error");

    let config = CoreConfig::from_env().unwrap();
    assert_eq!(config.db_path.as_deref(), Some(db_path.as_path()));
    assert_eq!(config.busy_timeout, Duration::from_millis(750));
    assert_eq!(config.log_level, "error");

    let conn = open_db_with_config(&config).unwrap();
    let busy_timeout: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(busy_timeout, 750);
    drop(conn);
    assert!(Connection::open(&db_path).is_ok());

    std::env::set_var(ENV_BUSY_TIMEOUT_MS, "later");
    let err = CoreConfig::from_env().unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidValue {
            key: ENV_BUSY_TIMEOUT_MS,
            value: "later".to_string(),
        }
    );

    std::env::remove_var(ENV_DB_PATH);
    std::env::remove_var(ENV_BUSY_TIMEOUT_MS);
    std::env::remove_var(ENV_LOG_LEVEL);
}
