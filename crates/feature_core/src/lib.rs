//! Core data access for well/document features.
//! This crate owns the `features` table and its audit and soft-delete rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, SystemClock, Timestamp};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::feature::{
    Feature, FeatureId, FeatureUpdate, NewFeature, STATUS_ACTIVE, STATUS_DELETED,
};
pub use repo::common::{RepoError, RepoResult};
pub use repo::feature_repo::{FeatureRepository, SqliteFeatureRepository};
pub use service::feature_service::FeatureService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
