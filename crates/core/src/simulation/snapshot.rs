//! Saving and restoring simulation state
//!
//! Every piece of lifecycle state is plain data (states carry their own
//! deadlines, coordinators their next attempt), so a snapshot is just the
//! registry and coordinators serialized as JSON. Restoring rebuilds the
//! scheduler from those deadlines.

use super::{Counters, EventLog, FireSimulation, RegisteredEntity, ScheduledAction, Scheduler};
use crate::config::SimulationConfig;
use crate::core_types::entity::EntityHandle;
use crate::core_types::spatial::{SpatialIndex, SpatialQuery};
use crate::core_types::units::Seconds;
use crate::error::{FireError, SnapshotError};
use crate::flammable::FireState;
use crate::spread::SpreadCoordinator;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One registered object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Handle the object is registered under
    pub handle: EntityHandle,
    /// Position and fire state
    pub entity: RegisteredEntity,
}

/// Complete serializable simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Simulation clock
    pub simulation_time: Seconds,
    /// Configuration in effect
    pub config: SimulationConfig,
    /// Registered objects in handle order
    pub entities: Vec<EntitySnapshot>,
    /// Spread coordinators in origin order
    pub coordinators: Vec<SpreadCoordinator>,
    /// Next handle to mint
    pub next_entity: u32,
    /// Next effect id to mint
    pub next_effect: u32,
    /// Running totals
    pub totals: Counters,
}

impl SimulationSnapshot {
    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns [`SnapshotError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Serialize)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns [`SnapshotError::Parse`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }

    /// Save snapshot to file
    ///
    /// # Errors
    /// Returns error if the snapshot cannot be serialized or the file written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load snapshot from file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl FireSimulation {
    /// Capture the current state
    pub fn snapshot(&self) -> SimulationSnapshot {
        let entities = self
            .handles()
            .into_iter()
            .filter_map(|handle| {
                Some(EntitySnapshot {
                    handle,
                    entity: self.entities.get(&handle)?.clone(),
                })
            })
            .collect();

        let mut coordinators: Vec<SpreadCoordinator> = self.coordinators.values().cloned().collect();
        coordinators.sort_unstable_by_key(SpreadCoordinator::origin);

        SimulationSnapshot {
            simulation_time: self.simulation_time,
            config: self.config.clone(),
            entities,
            coordinators,
            next_entity: self.next_entity,
            next_effect: self.next_effect,
            totals: self.totals,
        }
    }

    /// Restore a simulation using the built-in spatial index.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Invalid`] if the configuration is rejected or a
    /// coordinator refers to an entity that is not in the snapshot.
    pub fn from_snapshot(snapshot: SimulationSnapshot) -> Result<Self, SnapshotError> {
        let index = SpatialIndex::new(snapshot.config.spatial_cell_size);
        Self::restore_with_spatial_query(snapshot, Box::new(index))
    }

    /// Restore a simulation that asks `query` for neighbors.
    ///
    /// Pending ignitions and spread attempts are rescheduled at the deadlines
    /// recorded in the snapshot. The event history starts empty.
    ///
    /// # Errors
    ///
    /// As [`FireSimulation::from_snapshot`].
    pub fn restore_with_spatial_query(
        snapshot: SimulationSnapshot,
        query: Box<dyn SpatialQuery>,
    ) -> Result<Self, SnapshotError> {
        snapshot.config.validate().map_err(FireError::from)?;

        let mut sim = FireSimulation {
            events: EventLog::new(
                snapshot.config.event_history,
                snapshot.config.max_pending_events,
            ),
            config: snapshot.config,
            entities: FxHashMap::default(),
            coordinators: FxHashMap::default(),
            effect_owners: FxHashMap::default(),
            spatial: query,
            scheduler: Scheduler::new(),
            destroyed_effects: Vec::new(),
            next_entity: snapshot.next_entity,
            next_effect: snapshot.next_effect,
            simulation_time: snapshot.simulation_time,
            totals: snapshot.totals,
        };

        for EntitySnapshot { handle, entity } in snapshot.entities {
            if let Some(flammable) = &entity.flammable {
                if let FireState::Igniting { ignite_at } = flammable.state() {
                    sim.scheduler
                        .schedule(ignite_at, handle, ScheduledAction::CompleteIgnition);
                }
                if let Some(effect) = flammable.effect() {
                    sim.effect_owners.insert(effect.id(), handle);
                }
            }
            sim.next_entity = sim.next_entity.max(handle.raw() + 1);
            sim.register(handle, entity);
        }

        for coordinator in snapshot.coordinators {
            let origin = coordinator.origin();
            if !sim.entities.contains_key(&origin) {
                return Err(FireError::UnknownEntity(origin).into());
            }
            if let (true, Some(next)) = (coordinator.is_active(), coordinator.next_attempt_at()) {
                sim.scheduler
                    .schedule(next, origin, ScheduledAction::SpreadAttempt);
            }
            sim.coordinators.insert(origin, coordinator);
        }

        if let Some(max_effect) = sim.effect_owners.keys().map(|id| id.raw()).max() {
            sim.next_effect = sim.next_effect.max(max_effect + 1);
        }

        info!(
            entities = sim.entities.len(),
            pending = sim.scheduler.len(),
            t = %sim.simulation_time,
            "Restored fire simulation from snapshot"
        );
        Ok(sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlammableConfig;
    use crate::core_types::vec3::Vec3;

    #[test]
    fn test_restore_reschedules_pending_ignition() {
        let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
        let a = sim
            .add_flammable(Vec3::zeros(), FlammableConfig::default())
            .unwrap();
        sim.ignite(a).unwrap();
        sim.update(0.5);

        let mut restored = FireSimulation::from_snapshot(sim.snapshot()).unwrap();
        assert_eq!(
            restored.scheduler().pending_for(a),
            vec![(Seconds::new(1.0), ScheduledAction::CompleteIgnition)]
        );

        restored.update(0.5);
        assert_eq!(restored.state_of(a), Some(FireState::Burning));
    }

    #[test]
    fn test_restored_handles_are_not_reused() {
        let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
        let a = sim.add_inert(Vec3::zeros());

        let mut restored = FireSimulation::from_snapshot(sim.snapshot()).unwrap();
        let b = restored.add_inert(Vec3::zeros());
        assert_ne!(a, b);
    }

    #[test]
    fn test_dangling_coordinator_rejected() {
        let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
        let a = sim
            .add_flammable(Vec3::zeros(), FlammableConfig::default())
            .unwrap();
        sim.ignite(a).unwrap();
        sim.update(1.0);

        let mut snapshot = sim.snapshot();
        snapshot.entities.clear();
        assert!(matches!(
            FireSimulation::from_snapshot(snapshot),
            Err(SnapshotError::Invalid(FireError::UnknownEntity(_)))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
        let a = sim
            .add_flammable(Vec3::zeros(), FlammableConfig::default())
            .unwrap();
        sim.ignite(a).unwrap();
        sim.update(1.5);

        let snapshot = sim.snapshot();
        let parsed = SimulationSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
