//! Renderer boundary
//!
//! The core never draws anything. Each tick it hands a [`RenderFrame`] per
//! live effect to a [`RenderHook`], and reports every destroyed effect once so
//! the host can tear down particles and lights.

use crate::config::FireSize;
use crate::core_types::entity::{EffectId, EntityHandle};
use crate::core_types::vec3::Vec3;
use crate::flammable::FireState;

/// Visual state of one live fire effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    /// Owning entity
    pub entity: EntityHandle,
    /// Effect id
    pub effect: EffectId,
    /// Size variant the effect was created with
    pub profile: FireSize,
    /// World position of the flames
    pub position: Vec3,
    /// Current intensity in `[min_intensity, 1]`
    pub intensity: f32,
    /// Transform scale (`base_scale × intensity`)
    pub scale: Vec3,
    /// Owner state, Burning or Extinguishing
    pub state: FireState,
}

impl RenderFrame {
    /// Particle start size for an emitter authored at `initial`
    pub fn particle_size(&self, initial: f32) -> f32 {
        initial * self.intensity
    }

    /// Light intensity for a light authored at `initial`
    pub fn light_intensity(&self, initial: f32) -> f32 {
        initial * self.intensity
    }
}

/// Receives visual updates from the simulation
pub trait RenderHook {
    /// Called once per tick for every live effect
    fn render(&mut self, frame: &RenderFrame);

    /// Called exactly once when an effect is destroyed
    fn effect_destroyed(&mut self, _entity: EntityHandle, _effect: EffectId) {}
}

/// Discards all output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderHook for NullRenderer {
    fn render(&mut self, _frame: &RenderFrame) {}
}

/// Records everything it receives; handy for tests and replays
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    /// Frames in the order they were rendered
    pub frames: Vec<RenderFrame>,
    /// Destroyed effects in notification order
    pub destroyed: Vec<(EntityHandle, EffectId)>,
}

impl FrameRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame rendered for an entity
    pub fn last_frame(&self, entity: EntityHandle) -> Option<&RenderFrame> {
        self.frames.iter().rev().find(|f| f.entity == entity)
    }

    /// Forget recorded frames, keeping destruction notices
    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }
}

impl RenderHook for FrameRecorder {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames.push(*frame);
    }

    fn effect_destroyed(&mut self, entity: EntityHandle, effect: EffectId) {
        self.destroyed.push((entity, effect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_multipliers_follow_intensity() {
        let frame = RenderFrame {
            entity: EntityHandle::new(1),
            effect: EffectId::new(1),
            profile: FireSize::Medium,
            position: Vec3::zeros(),
            intensity: 0.5,
            scale: Vec3::new(1.0, 1.0, 1.0),
            state: FireState::Extinguishing,
        };
        assert_eq!(frame.particle_size(0.8), 0.4);
        assert_eq!(frame.light_intensity(3.0), 1.5);
    }

    #[test]
    fn test_recorder_keeps_last_frame_per_entity() {
        let mut rec = FrameRecorder::new();
        let mut frame = RenderFrame {
            entity: EntityHandle::new(4),
            effect: EffectId::new(9),
            profile: FireSize::Small,
            position: Vec3::zeros(),
            intensity: 1.0,
            scale: Vec3::zeros(),
            state: FireState::Burning,
        };
        rec.render(&frame);
        frame.intensity = 0.7;
        rec.render(&frame);
        rec.effect_destroyed(EntityHandle::new(4), EffectId::new(9));

        assert_eq!(rec.last_frame(EntityHandle::new(4)).unwrap().intensity, 0.7);
        assert_eq!(rec.destroyed, vec![(EntityHandle::new(4), EffectId::new(9))]);
    }
}
