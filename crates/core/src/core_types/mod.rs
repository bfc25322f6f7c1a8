//! Core types and utilities

pub mod entity;
pub mod spatial;
pub mod units;
pub mod vec3;

pub use entity::{EffectId, EntityHandle};
pub use spatial::{SpatialIndex, SpatialQuery};
pub use units::Seconds;
pub use vec3::Vec3;
