//! Handheld extinguisher
//!
//! The agent sprays while it is held and its trigger is pressed past the
//! activation threshold. Each tick the host calls [`SuppressionAgent::spray`],
//! which applies `extinguish_speed × dt` to every live effect whose contact
//! volume lies inside the spray cone.

use super::SuppressionOutcome;
use crate::core_types::entity::EffectId;
use crate::core_types::vec3::Vec3;
use crate::effect::ContactVolume;
use crate::error::FireError;
use crate::simulation::FireSimulation;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stick deflection below which steering input is ignored
const STICK_DEADZONE: f32 = 0.1;

/// Extinguisher parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionAgentConfig {
    /// Intensity removed per second of contact
    pub extinguish_speed: f32,
    /// Maximum spray distance (m)
    pub reach: f32,
    /// Half angle of the spray cone (degrees)
    pub cone_half_angle_deg: f32,
    /// Trigger value above which the agent sprays, in `[0, 1]`
    pub activation_threshold: f32,
}

impl Default for SuppressionAgentConfig {
    fn default() -> Self {
        Self {
            extinguish_speed: 0.5,
            reach: 4.0,
            cone_half_angle_deg: 25.0,
            activation_threshold: 0.5,
        }
    }
}

/// An extinguisher held by an external actor
#[derive(Debug, Clone, PartialEq)]
pub struct SuppressionAgent {
    config: SuppressionAgentConfig,
    position: Vec3,
    /// Unit spray direction
    direction: Vec3,
    held: bool,
    spraying: bool,
}

impl SuppressionAgent {
    /// Create an idle agent pointing along +Z
    pub fn new(config: SuppressionAgentConfig) -> Self {
        Self {
            config,
            position: Vec3::zeros(),
            direction: Vec3::z(),
            held: false,
            spraying: false,
        }
    }

    /// Move and aim the agent. A zero direction keeps the previous aim.
    pub fn set_pose(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        if let Some(dir) = direction.try_normalize(f32::EPSILON) {
            self.direction = dir;
        }
    }

    /// Aim horizontally from a thumbstick reading.
    ///
    /// The stick's x/y map to yaw around the vertical axis; small deflections
    /// are ignored.
    pub fn steer(&mut self, stick: Vector2<f32>) {
        if stick.norm() < STICK_DEADZONE {
            return;
        }
        let yaw = stick.x.atan2(stick.y);
        self.direction = Vec3::new(yaw.sin(), 0.0, yaw.cos());
    }

    /// Picked up by an actor
    pub fn grab(&mut self) {
        self.held = true;
    }

    /// Dropped; spraying stops
    pub fn release(&mut self) {
        self.held = false;
        self.stop();
    }

    /// Feed the trigger value. Returns `true` when spraying just started.
    pub fn set_trigger(&mut self, value: f32) -> bool {
        if self.held && value > self.config.activation_threshold {
            self.start()
        } else {
            self.stop();
            false
        }
    }

    // Returns `true` if it was not spraying before.
    fn start(&mut self) -> bool {
        let started = !self.spraying;
        self.spraying = true;
        if started {
            debug!("Extinguisher started");
        }
        started
    }

    /// Stop spraying
    pub fn stop(&mut self) {
        if self.spraying {
            debug!("Extinguisher stopped");
        }
        self.spraying = false;
    }

    /// Whether the agent is spraying
    pub fn is_spraying(&self) -> bool {
        self.spraying
    }

    /// Whether the agent is held
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Agent position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit spray direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Agent parameters
    pub fn config(&self) -> &SuppressionAgentConfig {
        &self.config
    }

    /// Whether the spray cone reaches a contact volume
    pub fn covers(&self, volume: &ContactVolume) -> bool {
        if volume.contains(self.position) {
            return true;
        }
        if volume.distance_to(self.position) > self.config.reach {
            return false;
        }

        // Aim at the closest point of the volume
        let lower = volume.center - volume.half_extents;
        let upper = volume.center + volume.half_extents;
        let closest = self.position.sup(&lower).inf(&upper);
        let Some(to_target) = (closest - self.position).try_normalize(f32::EPSILON) else {
            return true;
        };

        let cos_limit = self.config.cone_half_angle_deg.to_radians().cos();
        to_target.dot(&self.direction) >= cos_limit
    }

    /// Apply one tick of spray to every covered effect.
    ///
    /// Does nothing unless held and spraying. Returns the outcome per effect hit.
    ///
    /// # Errors
    ///
    /// [`FireError::InvalidParameter`] if `dt` is negative or not finite,
    /// whether or not anything is covered.
    pub fn spray(
        &self,
        sim: &mut FireSimulation,
        dt: f32,
    ) -> Result<Vec<(EffectId, SuppressionOutcome)>, FireError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FireError::InvalidParameter {
                name: "dt",
                reason: format!("must be finite and non-negative, got {dt}"),
            });
        }
        if !(self.held && self.spraying) {
            return Ok(Vec::new());
        }

        let amount = self.config.extinguish_speed * dt;
        let targets: Vec<EffectId> = sim
            .live_effects()
            .into_iter()
            .filter(|(_, effect)| self.covers(effect.contact()))
            .map(|(_, effect)| effect.id())
            .collect();

        targets
            .into_iter()
            .map(|id| Ok((id, sim.contact(id, amount)?)))
            .collect()
    }
}
