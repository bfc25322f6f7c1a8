//! Fire Spread Core Library
//!
//! A timer-driven fire lifecycle engine for interactive worlds. Combustible
//! objects catch fire after an ignition delay, grow a visible fire effect,
//! spread to nearby combustibles on a fixed cadence and can be put out by
//! suppression agents.
//!
//! ## Model
//!
//! - [`FlammableEntity`]: `Idle → Igniting → Burning → Extinguishing → Extinguished`
//! - [`FireEffect`]: intensity in `[min_intensity, 1]` plus a growth animation
//! - [`SpreadCoordinator`]: periodic spread attempts bounded by a generation cap
//! - [`SuppressionAgent`] and [`IgnitionSource`]: actors that put out and start fires
//! - [`FireSimulation`]: the world that owns all of the above and advances them
//!   one explicit tick at a time
//!
//! Collision detection and rendering stay with the host: neighbors come from a
//! [`SpatialQuery`] and visuals go out through a [`RenderHook`].

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod effect;
pub mod error;
pub mod flammable;
pub mod ignition;
pub mod render;
pub mod simulation;
pub mod spread;
pub mod suppression;

// Re-export core types
pub use core_types::{EffectId, EntityHandle, Seconds, SpatialIndex, SpatialQuery, Vec3};

pub use config::{EffectProfile, FireSize, FlammableConfig, ProfileRegistry, SimulationConfig, SpreadConfig};
pub use effect::{ContactVolume, FireEffect, Growth};
pub use error::{ConfigError, FireError, QueryError, SnapshotError};
pub use flammable::{FireState, FlammableEntity};
pub use ignition::{IgnitionSource, IgnitionSourceConfig};
pub use render::{FrameRecorder, NullRenderer, RenderFrame, RenderHook};
pub use simulation::{
    FireEvent, FireEventKind, FireSimulation, SimulationSnapshot, SimulationStats, TickContext,
};
pub use spread::{SpreadCoordinator, SpreadOutcome};
pub use suppression::{SuppressionAgent, SuppressionAgentConfig, SuppressionOutcome};
