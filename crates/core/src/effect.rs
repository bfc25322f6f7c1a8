//! Fire effect: the visible, suppressible part of a burning entity
//!
//! A [`FireEffect`] exists only while its owner is Burning or Extinguishing.
//! It carries two independent quantities:
//!
//! - **Growth**: `base_scale` animates linearly from zero to the target scale
//!   over the growth duration, measured from the instant the effect was
//!   created, then stays pinned to the target.
//! - **Intensity**: starts at 1 and is only ever reduced by suppression,
//!   clamped to `[min_intensity, 1]`.
//!
//! The rendered scale is `base_scale × intensity`; renderers scale particle
//! size and light output by intensity as well.

use crate::config::{EffectProfile, FireSize};
use crate::core_types::entity::EffectId;
use crate::core_types::units::Seconds;
use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Smallest half extent of a default contact volume (m)
const MIN_CONTACT_HALF_EXTENT: f32 = 0.25;

/// Intensities this close to the floor count as depleted
const DEPLETION_EPSILON: f32 = 1e-5;

/// Growth animation sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Growth {
    /// Animating from zero towards the target scale
    Growing {
        /// Instant the effect was created
        started_at: Seconds,
        /// Animation length (s), always positive
        duration: f32,
    },
    /// Pinned at the target scale
    Steady,
}

/// Axis-aligned volume suppression agents must reach to hit the fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactVolume {
    /// Volume center (the effect position)
    pub center: Vec3,
    /// Half size along each axis
    pub half_extents: Vec3,
}

impl ContactVolume {
    /// Distance from a point to the volume surface (0 inside)
    pub fn distance_to(&self, point: Vec3) -> f32 {
        let outside = (point - self.center).abs() - self.half_extents;
        outside.sup(&Vec3::zeros()).norm()
    }

    /// Whether a point lies inside the volume
    pub fn contains(&self, point: Vec3) -> bool {
        self.distance_to(point) <= 0.0
    }
}

/// Live fire effect owned by a burning entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEffect {
    id: EffectId,
    profile: FireSize,
    position: Vec3,
    intensity: f32,
    min_intensity: f32,
    target_scale: Vec3,
    base_scale: Vec3,
    growth: Growth,
    contact: ContactVolume,
}

impl FireEffect {
    /// Create an effect at full intensity, with the growth animation armed.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        id: EffectId,
        size: FireSize,
        profile: &EffectProfile,
        position: Vec3,
        target_fire_scale: Vec3,
        growth_duration: f32,
        min_intensity: f32,
        created_at: Seconds,
    ) -> Self {
        let target_scale = target_fire_scale * profile.scale_multiplier;

        let (growth, base_scale) = if growth_duration > 0.0 {
            (
                Growth::Growing {
                    started_at: created_at,
                    duration: growth_duration,
                },
                Vec3::zeros(),
            )
        } else {
            (Growth::Steady, target_scale)
        };

        // Attach a contact volume matching the flames when the profile has none
        let half_extents = profile.contact_half_extents.unwrap_or_else(|| {
            target_scale.map(|c| (c.abs() * 0.5).max(MIN_CONTACT_HALF_EXTENT))
        });

        Self {
            id,
            profile: size,
            position,
            intensity: 1.0,
            min_intensity,
            target_scale,
            base_scale,
            growth,
            contact: ContactVolume {
                center: position,
                half_extents,
            },
        }
    }

    /// Advance the growth animation to `now`
    pub(crate) fn advance_growth(&mut self, now: Seconds) {
        let Growth::Growing {
            started_at,
            duration,
        } = self.growth
        else {
            return;
        };

        let elapsed = (now - started_at).as_f32().max(0.0);
        if elapsed >= duration {
            self.base_scale = self.target_scale;
            self.growth = Growth::Steady;
        } else {
            self.base_scale = self.target_scale * (elapsed / duration);
        }
    }

    /// Reduce intensity by `amount`, clamped to `[min_intensity, 1]`.
    ///
    /// Returns `true` once the minimum has been reached. Rounding residue
    /// within [`DEPLETION_EPSILON`] of the floor snaps onto it.
    pub(crate) fn reduce_intensity(&mut self, amount: f32) -> bool {
        self.intensity = (self.intensity - amount).clamp(self.min_intensity, 1.0);
        if self.intensity - self.min_intensity <= DEPLETION_EPSILON {
            self.intensity = self.min_intensity;
            return true;
        }
        false
    }

    /// Effect id
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Size variant this effect was instantiated with
    pub fn profile(&self) -> FireSize {
        self.profile
    }

    /// World position of the flames
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current intensity in `[min_intensity, 1]`
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Intensity floor
    pub fn min_intensity(&self) -> f32 {
        self.min_intensity
    }

    /// Growth-animated scale before intensity is applied
    pub fn base_scale(&self) -> Vec3 {
        self.base_scale
    }

    /// Final scale after growth completes
    pub fn target_scale(&self) -> Vec3 {
        self.target_scale
    }

    /// Rendered scale: `base_scale × intensity`
    pub fn scale(&self) -> Vec3 {
        self.base_scale * self.intensity
    }

    /// Growth sub-state
    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Whether the growth animation is still running
    pub fn is_growing(&self) -> bool {
        matches!(self.growth, Growth::Growing { .. })
    }

    /// Suppression contact volume
    pub fn contact(&self) -> &ContactVolume {
        &self.contact
    }
}
