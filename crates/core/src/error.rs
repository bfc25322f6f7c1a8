//! Error types for the fire core
//!
//! Failures are always scoped to the single entity or attempt that caused
//! them. The simulation tick itself never fails; operations invoked by a host
//! return these errors so the host can log or surface them.

use crate::config::FireSize;
use crate::core_types::entity::EntityHandle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a [`SpatialQuery`](crate::core_types::SpatialQuery) service
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum QueryError {
    /// The backing service cannot answer right now (e.g. physics scene not loaded)
    #[error("spatial query service unavailable: {0}")]
    Unavailable(String),
    /// Radius was negative or not finite
    #[error("invalid query radius {0}")]
    InvalidRadius(f32),
}

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field is outside its allowed range
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Human readable constraint (e.g. "finite and non-negative")
        constraint: &'static str,
        /// Value that was supplied
        value: f32,
    },
    /// Configuration text could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(String),
}

/// Errors returned by simulation operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireError {
    /// No entity is registered under this handle
    #[error("unknown entity {0}")]
    UnknownEntity(EntityHandle),
    /// The entity exists but cannot burn
    #[error("entity {0} is not flammable")]
    NotFlammable(EntityHandle),
    /// No effect profile is bound for the requested fire size
    #[error("no effect profile configured for {0:?} fires")]
    MissingConfiguration(FireSize),
    /// An argument was out of range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
    /// The spatial query service failed
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure while saving or loading a simulation snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot could not be serialized
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Snapshot text could not be parsed
    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),
    /// Snapshot file could not be read or written
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot content is inconsistent with the configuration
    #[error(transparent)]
    Invalid(#[from] FireError),
}
