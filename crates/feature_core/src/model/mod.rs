//! Domain model for well/document features.
//!
//! # Invariants
//! - Every feature is identified by a stable `FeatureId`.
//! - Deletion is represented by a zero status, not hard delete.

pub mod feature;
