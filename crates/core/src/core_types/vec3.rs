//! Vector type alias for 3D positions, offsets and scales.

use nalgebra::Vector3;

/// 3D vector type for positions, fire offsets and effect scales.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the simulation for entity positions, effect anchors and visual scale.
pub type Vec3 = Vector3<f32>;
