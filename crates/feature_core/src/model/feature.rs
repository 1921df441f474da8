//! Well feature domain model.
//!
//! # Responsibility
//! - Define the persisted `Feature` record and its write-side inputs.
//! - Keep repository-owned audit columns out of caller-constructible types.
//!
//! # Invariants
//! - `status == STATUS_DELETED` is the only tombstone marker; rows are never removed.
//! - `create_time`/`create_date` exist only on `Feature`, so no write input can change them.
//! - Write inputs reject unknown keys when deserialized.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier of one feature row.
pub type FeatureId = Uuid;

/// Status value of a soft-deleted feature.
pub const STATUS_DELETED: i64 = 0;
/// Status assigned at insert when the caller does not pick one.
pub const STATUS_ACTIVE: i64 = 1;

/// Persisted feature record, as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    /// Owning well. Features extracted before well assignment have none.
    pub well_id: Option<String>,
    /// Owning document.
    pub document_id: String,
    /// `0` means soft-deleted; any other value is active.
    pub status: i64,
    pub name: Option<String>,
    pub content: Option<String>,
    /// Interval top, metres along hole.
    pub depth_top: Option<f64>,
    /// Interval bottom, metres along hole.
    pub depth_bottom: Option<f64>,
    /// Unix epoch milliseconds, set once at insert.
    pub create_time: i64,
    pub create_date: String,
    /// Unix epoch milliseconds, refreshed by updates.
    pub update_time: i64,
    pub update_date: String,
}

impl Feature {
    /// Returns whether this feature has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.status != STATUS_DELETED
    }
}

/// Insert input. Audit columns and the id are assigned by the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewFeature {
    pub document_id: String,
    #[serde(default)]
    pub well_id: Option<String>,
    /// Defaults to `STATUS_ACTIVE`.
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub depth_top: Option<f64>,
    #[serde(default)]
    pub depth_bottom: Option<f64>,
}

impl NewFeature {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            ..Self::default()
        }
    }

    pub fn with_well_id(mut self, well_id: impl Into<String>) -> Self {
        self.well_id = Some(well_id.into());
        self
    }
}

/// Partial update applied to every row of one document.
///
/// For nullable columns the outer `Option` selects the column and the inner
/// one is the new value: `None` leaves it untouched, `Some(None)` clears it.
/// When deserialized, an absent key maps to `None` and an explicit `null`
/// maps to `Some(None)`. An all-`None` patch is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureUpdate {
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub well_id: Option<Option<String>>,
    /// `status` is NOT NULL, so it can only be replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Option<String>>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Option<String>>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub depth_top: Option<Option<f64>>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub depth_bottom: Option<Option<f64>>,
}

impl FeatureUpdate {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.well_id.is_none()
            && self.status.is_none()
            && self.name.is_none()
            && self.content.is_none()
            && self.depth_top.is_none()
            && self.depth_bottom.is_none()
    }
}

/// Only called for keys present in the input, so `null` becomes `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{FeatureUpdate, NewFeature};

    #[test]
    fn default_update_is_empty() {
        assert!(FeatureUpdate::default().is_empty());
    }

    #[test]
    fn any_set_field_makes_update_non_empty() {
        let update = FeatureUpdate {
            depth_bottom: Some(Some(1520.5)),
            ..FeatureUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn clearing_a_column_makes_update_non_empty() {
        let update = FeatureUpdate {
            well_id: Some(None),
            ..FeatureUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn explicit_null_is_distinct_from_absent_key() {
        let cleared: FeatureUpdate = serde_json::from_str(r#"{"well_id": null}"#).unwrap();
        assert_eq!(cleared.well_id, Some(None));
        assert!(!cleared.is_empty());

        let set: FeatureUpdate = serde_json::from_str(r#"{"depth_top": 12.5}"#).unwrap();
        assert_eq!(set.depth_top, Some(Some(12.5)));
        assert!(set.well_id.is_none());

        let absent: FeatureUpdate = serde_json::from_str("{}").unwrap();
        assert!(absent.is_empty());
    }

    #[test]
    fn serialized_update_keeps_clears_and_omits_untouched_columns() {
        let update = FeatureUpdate {
            name: Some(None),
            status: Some(2),
            ..FeatureUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": null, "status": 2}));
    }

    #[test]
    fn new_feature_builder_sets_keys() {
        let input = NewFeature::new("doc-1").with_well_id("well-7");
        assert_eq!(input.document_id, "doc-1");
        assert_eq!(input.well_id.as_deref(), Some("well-7"));
        assert!(input.status.is_none());
    }
}
