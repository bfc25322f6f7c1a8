//! Per-object fire lifecycle state machine
//!
//! ```text
//! Idle --ignite--> Igniting --deadline--> Burning --suppression--> Extinguishing
//!                                            |                          |
//!                                            +------ minimum reached ---+--> Extinguished
//! ```
//!
//! The entity only mutates its own state. Scheduling its ignition deadline,
//! starting its spread coordinator and notifying renderers is the job of
//! [`FireSimulation`](crate::simulation::FireSimulation), which drives these
//! transitions.

use crate::config::{EffectProfile, FireSize, FlammableConfig};
use crate::core_types::entity::{EffectId, EntityHandle};
use crate::core_types::units::Seconds;
use crate::core_types::vec3::Vec3;
use crate::effect::FireEffect;
use crate::simulation::TickContext;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a flammable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireState {
    /// Not burning, may be ignited
    Idle,
    /// Caught fire; the effect appears at `ignite_at`
    Igniting {
        /// Deadline at which the entity starts burning
        ignite_at: Seconds,
    },
    /// Burning with a live effect
    Burning,
    /// Burning, but suppression has been applied; intensity is decaying
    Extinguishing,
    /// Put out. Terminal.
    Extinguished,
}

impl FireState {
    /// Whether `ignite` would start a new ignition
    pub fn is_idle(&self) -> bool {
        matches!(self, FireState::Idle)
    }

    /// Burning or Extinguishing: a live effect exists
    pub fn is_alight(&self) -> bool {
        matches!(self, FireState::Burning | FireState::Extinguishing)
    }

    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, FireState::Extinguished)
    }

    /// Stable numeric code for FFI
    pub fn as_u8(&self) -> u8 {
        match self {
            FireState::Idle => 0,
            FireState::Igniting { .. } => 1,
            FireState::Burning => 2,
            FireState::Extinguishing => 3,
            FireState::Extinguished => 4,
        }
    }

    /// Short lowercase name for logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            FireState::Idle => "idle",
            FireState::Igniting { .. } => "igniting",
            FireState::Burning => "burning",
            FireState::Extinguishing => "extinguishing",
            FireState::Extinguished => "extinguished",
        }
    }
}

/// Result of applying suppression to one entity, before the simulation
/// performs any resulting cleanup
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SuppressStep {
    /// No live effect to suppress
    Ignored,
    /// Intensity lowered but still above the minimum
    Reduced {
        intensity: f32,
        entered_extinguishing: bool,
    },
    /// Intensity hit the minimum; the entity must be extinguished
    Depleted { entered_extinguishing: bool },
}

/// A combustible object and its fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlammableEntity {
    handle: EntityHandle,
    position: Vec3,
    config: FlammableConfig,
    state: FireState,
    /// Profile requested by the ignition currently in progress
    requested_size: Option<FireSize>,
    effect: Option<FireEffect>,
    ignited_at: Option<Seconds>,
    burning_since: Option<Seconds>,
    extinguished_at: Option<Seconds>,
}

impl FlammableEntity {
    pub(crate) fn new(handle: EntityHandle, position: Vec3, config: FlammableConfig) -> Self {
        Self {
            handle,
            position,
            config,
            state: FireState::Idle,
            requested_size: None,
            effect: None,
            ignited_at: None,
            burning_since: None,
            extinguished_at: None,
        }
    }

    /// `Idle -> Igniting`. Returns the ignition deadline, or `None` when the
    /// entity was not idle (repeated ignition is a no-op).
    pub(crate) fn begin_ignition(&mut self, now: Seconds, size: FireSize) -> Option<Seconds> {
        if !self.state.is_idle() {
            return None;
        }

        let ignite_at = now + Seconds::from(self.config.ignition_delay);
        self.state = FireState::Igniting { ignite_at };
        self.requested_size = Some(size);
        self.ignited_at = Some(now);
        Some(ignite_at)
    }

    /// `Igniting -> Burning`. Creates the effect at `position + fire_offset`.
    /// Returns `None` when the entity is no longer igniting.
    pub(crate) fn complete_ignition(
        &mut self,
        effect_id: EffectId,
        profile: &EffectProfile,
        at: Seconds,
    ) -> Option<&FireEffect> {
        if !matches!(self.state, FireState::Igniting { .. }) {
            return None;
        }

        let effect = FireEffect::spawn(
            effect_id,
            self.fire_size(),
            profile,
            self.fire_position(),
            self.config.target_fire_scale,
            self.config.fire_growth_duration,
            self.config.min_intensity,
            at,
        );

        self.state = FireState::Burning;
        self.burning_since = Some(at);
        self.effect = Some(effect);
        self.effect.as_ref()
    }

    /// `Igniting -> Idle` when the ignition cannot be completed
    pub(crate) fn abort_ignition(&mut self) {
        if matches!(self.state, FireState::Igniting { .. }) {
            self.state = FireState::Idle;
            self.requested_size = None;
            self.ignited_at = None;
        }
    }

    /// Apply a suppression amount. Entering Extinguishing needs no explicit
    /// call: any suppression while Burning moves the entity there.
    pub(crate) fn suppress(&mut self, amount: f32) -> SuppressStep {
        let Some(effect) = self.effect.as_mut() else {
            return SuppressStep::Ignored;
        };

        let entered_extinguishing = match self.state {
            FireState::Burning => {
                self.state = FireState::Extinguishing;
                true
            }
            FireState::Extinguishing => false,
            _ => return SuppressStep::Ignored,
        };

        if effect.reduce_intensity(amount) {
            SuppressStep::Depleted {
                entered_extinguishing,
            }
        } else {
            SuppressStep::Reduced {
                intensity: effect.intensity(),
                entered_extinguishing,
            }
        }
    }

    /// Per-tick update: growth animation and, while Extinguishing, the
    /// duration-based decay. Returns `true` when intensity reached the minimum.
    pub(crate) fn tick(&mut self, ctx: &TickContext) -> bool {
        let Some(effect) = self.effect.as_mut() else {
            return false;
        };

        effect.advance_growth(ctx.now);

        if self.state != FireState::Extinguishing {
            return false;
        }

        match self.config.extinguish_duration {
            Some(duration) if duration > 0.0 => {
                let rate = (1.0 - self.config.min_intensity) / duration;
                effect.reduce_intensity(rate * ctx.dt)
            }
            Some(_) => effect.reduce_intensity(1.0),
            None => false,
        }
    }

    /// Move to the terminal state, handing back the effect to be destroyed.
    pub(crate) fn extinguish(&mut self, at: Seconds) -> Option<FireEffect> {
        if self.state.is_terminal() {
            return None;
        }
        self.state = FireState::Extinguished;
        self.requested_size = None;
        self.extinguished_at = Some(at);
        self.effect.take()
    }

    /// Entity handle
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// World position of the object
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Where the fire effect appears
    pub fn fire_position(&self) -> Vec3 {
        self.position + self.config.fire_offset
    }

    /// Fire parameters
    pub fn config(&self) -> &FlammableConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> FireState {
        self.state
    }

    /// Live effect, present while Burning or Extinguishing
    pub fn effect(&self) -> Option<&FireEffect> {
        self.effect.as_ref()
    }

    /// Profile the current (or next) fire uses
    pub fn fire_size(&self) -> FireSize {
        self.requested_size.unwrap_or(self.config.fire_size)
    }

    /// When `ignite` took effect
    pub fn ignited_at(&self) -> Option<Seconds> {
        self.ignited_at
    }

    /// When the effect appeared
    pub fn burning_since(&self) -> Option<Seconds> {
        self.burning_since
    }

    /// When the entity was put out
    pub fn extinguished_at(&self) -> Option<Seconds> {
        self.extinguished_at
    }
}
