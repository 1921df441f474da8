//! Feature repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup/insert/soft-delete/update APIs over `features` storage.
//! - Own create/update audit stamping so callers never set timestamps.
//!
//! # Invariants
//! - Inserts are plain `INSERT`s; an existing id is a storage error, never a replace.
//! - Multi-row writes run inside one immediate transaction.
//! - Soft delete only flips `status`; it leaves `update_time`/`update_date` as they were.

use crate::clock::{Clock, SystemClock};
use crate::model::feature::{
    Feature, FeatureUpdate, NewFeature, STATUS_ACTIVE, STATUS_DELETED,
};
use crate::repo::common::{ensure_connection_ready, find_one_by, Record, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const FEATURE_COLUMNS: &[&str] = &[
    "id",
    "well_id",
    "document_id",
    "status",
    "name",
    "content",
    "depth_top",
    "depth_bottom",
    "create_time",
    "create_date",
    "update_time",
    "update_date",
];

/// Upper bound of bound ids per `IN (...)` statement.
const SOFT_DELETE_CHUNK: usize = 500;

impl Record for Feature {
    const TABLE: &'static str = "features";
    const COLUMNS: &'static [&'static str] = FEATURE_COLUMNS;

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id_text: String = row.get("id")?;
        let id = Uuid::parse_str(&id_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{id_text}` in features.id"))
        })?;

        Ok(Self {
            id,
            well_id: row.get("well_id")?,
            document_id: row.get("document_id")?,
            status: row.get("status")?,
            name: row.get("name")?,
            content: row.get("content")?,
            depth_top: row.get("depth_top")?,
            depth_bottom: row.get("depth_bottom")?,
            create_time: row.get("create_time")?,
            create_date: row.get("create_date")?,
            update_time: row.get("update_time")?,
            update_date: row.get("update_date")?,
        })
    }
}

/// Repository interface for feature persistence.
pub trait FeatureRepository {
    /// Gets the feature owned by `well_id`, if any.
    fn get_by_well_id(&self, well_id: &str) -> RepoResult<Option<Feature>>;
    /// Gets the feature owned by `document_id`, if any.
    fn get_by_document_id(&self, document_id: &str) -> RepoResult<Option<Feature>>;
    /// Inserts a new feature and returns it as persisted.
    fn insert(&self, input: &NewFeature) -> RepoResult<Feature>;
    /// Sets `status = 0` on every feature of the given documents.
    ///
    /// Returns the number of rows moved from active to deleted, so repeated
    /// ids and already-deleted rows are not counted. Timestamps are not refreshed.
    fn soft_delete_by_document_ids(&mut self, document_ids: &[String]) -> RepoResult<usize>;
    /// Applies `update` to every feature of `document_id`.
    ///
    /// An empty update returns `Ok(0)` without touching storage.
    fn update_by_document_id(
        &mut self,
        document_id: &str,
        update: &FeatureUpdate,
    ) -> RepoResult<usize>;
}

/// SQLite-backed feature repository.
pub struct SqliteFeatureRepository<'conn, C: Clock = SystemClock> {
    conn: &'conn mut Connection,
    clock: C,
}

impl<'conn> SqliteFeatureRepository<'conn, SystemClock> {
    /// Constructs a repository from a migrated connection using wall-clock time.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteFeatureRepository<'conn, C> {
    /// Constructs a repository stamping audit columns from `clock`.
    pub fn with_clock(conn: &'conn mut Connection, clock: C) -> RepoResult<Self> {
        ensure_connection_ready(conn, Feature::TABLE, FEATURE_COLUMNS)?;
        Ok(Self { conn, clock })
    }
}

impl<C: Clock> FeatureRepository for SqliteFeatureRepository<'_, C> {
    fn get_by_well_id(&self, well_id: &str) -> RepoResult<Option<Feature>> {
        find_one_by(self.conn, "well_id", well_id)
    }

    fn get_by_document_id(&self, document_id: &str) -> RepoResult<Option<Feature>> {
        find_one_by(self.conn, "document_id", document_id)
    }

    fn insert(&self, input: &NewFeature) -> RepoResult<Feature> {
        let stamp = self.clock.now();
        let feature = Feature {
            id: Uuid::new_v4(),
            well_id: input.well_id.clone(),
            document_id: input.document_id.clone(),
            status: input.status.unwrap_or(STATUS_ACTIVE),
            name: input.name.clone(),
            content: input.content.clone(),
            depth_top: input.depth_top,
            depth_bottom: input.depth_bottom,
            create_time: stamp.epoch_ms,
            create_date: stamp.date.clone(),
            update_time: stamp.epoch_ms,
            update_date: stamp.date,
        };

        self.conn.execute(
            "INSERT INTO features (
                id,
                well_id,
                document_id,
                status,
                name,
                content,
                depth_top,
                depth_bottom,
                create_time,
                create_date,
                update_time,
                update_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                feature.id.to_string(),
                feature.well_id.as_deref(),
                feature.document_id.as_str(),
                feature.status,
                feature.name.as_deref(),
                feature.content.as_deref(),
                feature.depth_top,
                feature.depth_bottom,
                feature.create_time,
                feature.create_date.as_str(),
                feature.update_time,
                feature.update_date.as_str(),
            ],
        )?;

        Ok(feature)
    }

    fn soft_delete_by_document_ids(&mut self, document_ids: &[String]) -> RepoResult<usize> {
        if document_ids.is_empty() {
            return Ok(0);
        }

        let unique_ids: Vec<&str> = document_ids
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut changed = 0;
        for chunk in unique_ids.chunks(SOFT_DELETE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "UPDATE features
                 SET status = {STATUS_DELETED}
                 WHERE status != {STATUS_DELETED}
                   AND document_id IN ({placeholders});"
            );
            changed += tx.execute(&sql, params_from_iter(chunk.iter()))?;
        }
        tx.commit()?;

        Ok(changed)
    }

    fn update_by_document_id(
        &mut self,
        document_id: &str,
        update: &FeatureUpdate,
    ) -> RepoResult<usize> {
        if update.is_empty() {
            return Ok(0);
        }

        let stamp = self.clock.now();
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(well_id) = update.well_id.as_ref() {
            assignments.push("well_id = ?");
            bind_values.push(nullable_text(well_id));
        }
        if let Some(status) = update.status {
            assignments.push("status = ?");
            bind_values.push(Value::Integer(status));
        }
        if let Some(name) = update.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(nullable_text(name));
        }
        if let Some(content) = update.content.as_ref() {
            assignments.push("content = ?");
            bind_values.push(nullable_text(content));
        }
        if let Some(depth_top) = update.depth_top {
            assignments.push("depth_top = ?");
            bind_values.push(nullable_real(depth_top));
        }
        if let Some(depth_bottom) = update.depth_bottom {
            assignments.push("depth_bottom = ?");
            bind_values.push(nullable_real(depth_bottom));
        }

        assignments.push("update_time = ?");
        bind_values.push(Value::Integer(stamp.epoch_ms));
        assignments.push("update_date = ?");
        bind_values.push(Value::Text(stamp.date));
        bind_values.push(Value::Text(document_id.to_string()));

        let sql = format!(
            "UPDATE features SET {} WHERE document_id = ?;",
            assignments.join(", ")
        );

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        tx.commit()?;

        Ok(changed)
    }
}

fn nullable_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}

fn nullable_real(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::Real)
}
