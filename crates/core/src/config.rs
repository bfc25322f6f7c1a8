//! Configuration for flammable entities, effect profiles and the simulation
//!
//! Every struct has a `Default` matching the tuning the engine ships with and
//! derives serde so scenarios can be authored as JSON. Call `validate()` (or
//! let the simulation do it) before use; invalid durations would otherwise
//! produce timers that never fire or fire every tick.

use crate::core_types::vec3::Vec3;
use crate::error::ConfigError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size variant selecting which effect profile a fire is instantiated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireSize {
    /// Large, fast-spreading fire
    Big = 0,
    /// Standard fire
    #[default]
    Medium = 1,
    /// Small, slow fire
    Small = 2,
}

impl FireSize {
    /// All size variants
    pub const ALL: [FireSize; 3] = [FireSize::Big, FireSize::Medium, FireSize::Small];

    /// Convert from u8 for FFI
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Big),
            1 => Some(Self::Medium),
            2 => Some(Self::Small),
            _ => None,
        }
    }

    /// Convert to u8 for FFI
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

fn check_duration(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            constraint: "finite and non-negative",
            value,
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            constraint: "finite and positive",
            value,
        })
    }
}

fn check_vector(field: &'static str, value: &Vec3) -> Result<(), ConfigError> {
    match value.iter().find(|c| !c.is_finite()) {
        Some(&bad) => Err(ConfigError::OutOfRange {
            field,
            constraint: "finite in every component",
            value: bad,
        }),
        None => Ok(()),
    }
}

/// Periodic spread behaviour of a burning fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Radius in which the fire tries to spread (m)
    pub spread_radius: f32,
    /// Delay between spread attempts (s). Must be positive.
    pub spread_delay: f32,
    /// Number of successful spread generations before the fire stops spreading
    pub max_spread_count: u32,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            spread_radius: 5.0,
            spread_delay: 3.0,
            max_spread_count: 5,
        }
    }
}

impl SpreadConfig {
    /// Check ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] for a negative radius or a non-positive delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("spread_radius", self.spread_radius)?;
        check_positive("spread_delay", self.spread_delay)
    }
}

/// Appearance and behaviour shared by every fire of one size variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectProfile {
    /// Multiplier applied to the entity's target fire scale
    pub scale_multiplier: f32,
    /// Half extents of the suppression contact volume.
    /// `None` attaches a default volume sized from the target scale.
    pub contact_half_extents: Option<Vec3>,
    /// Spread coordinator settings for fires of this profile
    pub spread: SpreadConfig,
}

impl Default for EffectProfile {
    fn default() -> Self {
        Self::medium()
    }
}

impl EffectProfile {
    /// Large fire: bigger flames, wider and faster spread
    pub fn big() -> Self {
        Self {
            scale_multiplier: 1.5,
            contact_half_extents: None,
            spread: SpreadConfig {
                spread_radius: 7.0,
                spread_delay: 2.5,
                max_spread_count: 6,
            },
        }
    }

    /// Standard fire
    pub fn medium() -> Self {
        Self {
            scale_multiplier: 1.0,
            contact_half_extents: None,
            spread: SpreadConfig::default(),
        }
    }

    /// Small fire: short reach, slow and shallow spread
    pub fn small() -> Self {
        Self {
            scale_multiplier: 0.6,
            contact_half_extents: None,
            spread: SpreadConfig {
                spread_radius: 3.5,
                spread_delay: 4.0,
                max_spread_count: 3,
            },
        }
    }

    /// Preset for a size variant
    pub fn preset(size: FireSize) -> Self {
        match size {
            FireSize::Big => Self::big(),
            FireSize::Medium => Self::medium(),
            FireSize::Small => Self::small(),
        }
    }

    /// Check ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] when a field is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("scale_multiplier", self.scale_multiplier)?;
        if let Some(extents) = &self.contact_half_extents {
            check_vector("contact_half_extents", extents)?;
        }
        self.spread.validate()
    }
}

/// Effect profiles bound per fire size.
///
/// A size with no profile is a configuration hole: ignitions requesting it are
/// aborted with [`FireError::MissingConfiguration`](crate::FireError::MissingConfiguration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRegistry(FxHashMap<FireSize, EffectProfile>);

impl Default for ProfileRegistry {
    fn default() -> Self {
        FireSize::ALL
            .iter()
            .map(|&size| (size, EffectProfile::preset(size)))
            .collect()
    }
}

impl FromIterator<(FireSize, EffectProfile)> for ProfileRegistry {
    fn from_iter<I: IntoIterator<Item = (FireSize, EffectProfile)>>(iter: I) -> Self {
        ProfileRegistry(iter.into_iter().collect())
    }
}

impl ProfileRegistry {
    /// Registry with no profiles bound
    pub fn empty() -> Self {
        ProfileRegistry(FxHashMap::default())
    }

    /// Profile bound for a size
    pub fn get(&self, size: FireSize) -> Option<&EffectProfile> {
        self.0.get(&size)
    }

    /// Whether a profile is bound for a size
    pub fn contains(&self, size: FireSize) -> bool {
        self.0.contains_key(&size)
    }

    /// Bind (or replace) a profile, returning the previous one
    pub fn insert(&mut self, size: FireSize, profile: EffectProfile) -> Option<EffectProfile> {
        self.0.insert(size, profile)
    }

    /// Unbind a profile
    pub fn remove(&mut self, size: FireSize) -> Option<EffectProfile> {
        self.0.remove(&size)
    }

    /// Number of bound profiles
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no profile is bound
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest spread radius among bound profiles
    pub fn max_spread_radius(&self) -> f32 {
        self.0
            .values()
            .map(|p| p.spread.spread_radius)
            .fold(0.0, f32::max)
    }

    /// Check every bound profile
    ///
    /// # Errors
    /// Returns the first profile error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.0.values().try_for_each(EffectProfile::validate)
    }
}

/// Per-entity fire parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlammableConfig {
    /// Delay between catching fire and the fire effect appearing (s)
    pub ignition_delay: f32,
    /// Offset from the entity position where the fire appears (m)
    pub fire_offset: Vec3,
    /// Time to grow the fire from zero to its target scale (s)
    pub fire_growth_duration: f32,
    /// Target scale of the fire effect, before the profile multiplier
    pub target_fire_scale: Vec3,
    /// Time for an unattended, already suppressed fire to decay from full
    /// intensity to the minimum (s). `None` disables passive decay so only
    /// applied suppression reduces intensity.
    pub extinguish_duration: Option<f32>,
    /// Intensity at which the fire is considered out, in `[0, 1)`
    pub min_intensity: f32,
    /// Profile used when an ignition does not request one explicitly
    pub fire_size: FireSize,
}

impl Default for FlammableConfig {
    fn default() -> Self {
        Self {
            ignition_delay: 1.0,
            fire_offset: Vec3::new(0.0, 1.0, 0.0),
            fire_growth_duration: 0.01,
            target_fire_scale: Vec3::new(2.0, 2.0, 2.0),
            extinguish_duration: Some(1.0),
            min_intensity: 0.1,
            fire_size: FireSize::Medium,
        }
    }
}

impl FlammableConfig {
    /// Check ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] when a field is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("ignition_delay", self.ignition_delay)?;
        check_duration("fire_growth_duration", self.fire_growth_duration)?;
        check_vector("fire_offset", &self.fire_offset)?;
        check_vector("target_fire_scale", &self.target_fire_scale)?;
        if let Some(duration) = self.extinguish_duration {
            check_duration("extinguish_duration", duration)?;
        }
        if !(0.0..1.0).contains(&self.min_intensity) {
            return Err(ConfigError::OutOfRange {
                field: "min_intensity",
                constraint: "within [0, 1)",
                value: self.min_intensity,
            });
        }
        Ok(())
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cell size of the built-in spatial index (m)
    pub spatial_cell_size: f32,
    /// Effect profiles per fire size
    pub profiles: ProfileRegistry,
    /// Parameters used by hosts that register entities without their own
    pub default_flammable: FlammableConfig,
    /// Number of events retained in the history
    pub event_history: usize,
    /// Undrained events kept before the oldest are dropped
    pub max_pending_events: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spatial_cell_size: 10.0,
            profiles: ProfileRegistry::default(),
            default_flammable: FlammableConfig::default(),
            event_history: 10_000,
            max_pending_events: 10_000,
        }
    }
}

impl SimulationConfig {
    /// Check every nested configuration
    ///
    /// # Errors
    /// Returns the first range violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("spatial_cell_size", self.spatial_cell_size)?;
        if self.max_pending_events == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_pending_events",
                constraint: "at least 1",
                value: 0.0,
            });
        }
        self.profiles.validate()?;
        self.default_flammable.validate()
    }

    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and range errors from `validate`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as `from_json_str`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&contents)
    }
}
