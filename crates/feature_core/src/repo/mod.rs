//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections opened through `db::open_*`.
//! - Single-row lookups report "absent" as `Ok(None)`, not as an error.

pub mod common;
pub mod feature_repo;
