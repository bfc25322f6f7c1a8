//! One-shot ignition sources
//!
//! An [`IgnitionSource`] is placed in the world to start a fire: when
//! activated it ignites every flammable within its start radius, using the
//! effect profile of its own fire size, and is spent afterwards.

use crate::config::FireSize;
use crate::core_types::entity::EntityHandle;
use crate::core_types::vec3::Vec3;
use crate::error::FireError;
use crate::simulation::FireSimulation;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Ignition source parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnitionSourceConfig {
    /// Radius in which flammables are ignited (m)
    pub start_radius: f32,
    /// Effect profile used for every fire this source starts
    pub fire_size: FireSize,
}

impl Default for IgnitionSourceConfig {
    fn default() -> Self {
        Self {
            start_radius: 3.0,
            fire_size: FireSize::Medium,
        }
    }
}

/// Fire starter that fires exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnitionSource {
    position: Vec3,
    config: IgnitionSourceConfig,
    fired: bool,
}

impl IgnitionSource {
    /// Place a source at `position`
    pub fn new(position: Vec3, config: IgnitionSourceConfig) -> Self {
        Self {
            position,
            config,
            fired: false,
        }
    }

    /// Ignite every flammable within the start radius.
    ///
    /// Returns the entities that transitioned to Igniting. A spent source
    /// returns an empty list. Inert objects and entities that are already
    /// alight are skipped.
    ///
    /// # Errors
    ///
    /// [`FireError::MissingConfiguration`] when no profile is bound for the
    /// source's fire size, [`FireError::Query`] when the spatial query fails.
    /// Either way nothing is ignited and the source stays armed.
    pub fn activate(&mut self, sim: &mut FireSimulation) -> Result<Vec<EntityHandle>, FireError> {
        if self.fired {
            return Ok(Vec::new());
        }

        let size = self.config.fire_size;
        if !sim.profiles().contains(size) {
            error!(?size, "No effect profile configured, ignition source not fired");
            return Err(FireError::MissingConfiguration(size));
        }

        let mut found = sim.query_radius(self.position, self.config.start_radius)?;
        found.sort_unstable();
        found.dedup();
        debug!(found = found.len(), "Ignition source found potential flammables");

        let mut ignited = Vec::new();
        for handle in found {
            match sim.ignite_with(handle, size) {
                Ok(true) => ignited.push(handle),
                Ok(false) => {}
                Err(err) => debug!(entity = %handle, error = %err, "Skipping ignition target"),
            }
        }

        self.fired = true;
        info!(
            x = self.position.x,
            y = self.position.y,
            z = self.position.z,
            ignited = ignited.len(),
            "Ignition source fired"
        );
        Ok(ignited)
    }

    /// Whether the source has already fired
    pub fn is_spent(&self) -> bool {
        self.fired
    }

    /// Source position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Source parameters
    pub fn config(&self) -> &IgnitionSourceConfig {
        &self.config
    }
}
