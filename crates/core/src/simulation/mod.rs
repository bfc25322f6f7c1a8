//! Fire simulation world
//!
//! `FireSimulation` owns everything that burns:
//! - the entity registry (flammable and inert objects)
//! - the deadline scheduler driving ignition delays and spread attempts
//! - one spread coordinator per entity that has started burning
//! - the spatial query used to find neighbors
//! - the event log hosts drain once per frame
//!
//! The host advances it with [`FireSimulation::update`] once per frame. A
//! tick never fails: problems are logged, recorded as events and confined to
//! the entity or attempt that caused them.

pub mod events;
pub mod scheduler;
pub mod snapshot;

pub use events::{EventLog, FireEvent, FireEventKind};
pub use scheduler::{Due, ScheduledAction, Scheduler};
pub use snapshot::{EntitySnapshot, SimulationSnapshot};

use crate::config::{EffectProfile, FireSize, FlammableConfig, ProfileRegistry, SimulationConfig};
use crate::core_types::entity::{EffectId, EntityHandle};
use crate::core_types::spatial::{SpatialIndex, SpatialQuery};
use crate::core_types::units::Seconds;
use crate::core_types::vec3::Vec3;
use crate::effect::FireEffect;
use crate::error::FireError;
use crate::flammable::{FireState, FlammableEntity, SuppressStep};
use crate::render::{NullRenderer, RenderFrame, RenderHook};
use crate::spread::{SpreadCoordinator, SpreadOutcome};
use crate::suppression::SuppressionOutcome;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

/// Clock values for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Simulation time at the end of the tick
    pub now: Seconds,
    /// Length of the tick (s)
    pub dt: f32,
}

/// An object known to the simulation.
///
/// Inert objects have no fire capability; spatial query results naming them
/// are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredEntity {
    position: Vec3,
    flammable: Option<FlammableEntity>,
}

impl RegisteredEntity {
    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Fire capability, if the object can burn
    pub fn flammable(&self) -> Option<&FlammableEntity> {
        self.flammable.as_ref()
    }

    /// Whether the object can burn
    pub fn is_flammable(&self) -> bool {
        self.flammable.is_some()
    }
}

/// Running totals since the simulation was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Entities that entered Igniting
    pub ignitions: u64,
    /// Ignitions started by spread coordinators
    pub spread_ignitions: u64,
    /// Entities that reached Extinguished
    pub extinguished: u64,
    /// Ignitions aborted for a missing effect profile
    pub aborted: u64,
}

/// Statistics for the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub simulation_time: Seconds,
    pub registered: usize,
    pub flammable: usize,
    pub idle: usize,
    pub igniting: usize,
    pub burning: usize,
    pub extinguishing: usize,
    pub extinguished: usize,
    pub active_coordinators: usize,
    pub pending_actions: usize,
    pub pending_events: usize,
    pub dropped_events: u64,
    pub totals: Counters,
}

/// Timer-driven fire lifecycle and spread simulation
pub struct FireSimulation {
    config: SimulationConfig,
    entities: FxHashMap<EntityHandle, RegisteredEntity>,
    coordinators: FxHashMap<EntityHandle, SpreadCoordinator>,
    effect_owners: FxHashMap<EffectId, EntityHandle>,
    spatial: Box<dyn SpatialQuery>,
    scheduler: Scheduler,
    events: EventLog,
    /// Effects destroyed since the renderer was last notified
    destroyed_effects: Vec<(EntityHandle, EffectId)>,
    next_entity: u32,
    next_effect: u32,
    simulation_time: Seconds,
    totals: Counters,
}

impl FireSimulation {
    /// Create a simulation using the built-in spatial index.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::Config`] if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, FireError> {
        let index = SpatialIndex::new(config.spatial_cell_size);
        Self::with_spatial_query(config, Box::new(index))
    }

    /// Create a simulation that asks `query` for neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::Config`] if the configuration is invalid.
    pub fn with_spatial_query(
        config: SimulationConfig,
        query: Box<dyn SpatialQuery>,
    ) -> Result<Self, FireError> {
        config.validate()?;

        info!(
            profiles = config.profiles.len(),
            cell_size = config.spatial_cell_size,
            "Creating fire simulation"
        );

        Ok(Self {
            events: EventLog::new(config.event_history, config.max_pending_events),
            config,
            entities: FxHashMap::default(),
            coordinators: FxHashMap::default(),
            effect_owners: FxHashMap::default(),
            spatial: query,
            scheduler: Scheduler::new(),
            destroyed_effects: Vec::new(),
            next_entity: 1,
            next_effect: 1,
            simulation_time: Seconds::ZERO,
            totals: Counters::default(),
        })
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a combustible object.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::Config`] if `config` is out of range.
    pub fn add_flammable(
        &mut self,
        position: Vec3,
        config: FlammableConfig,
    ) -> Result<EntityHandle, FireError> {
        config.validate()?;
        let handle = self.mint_handle();
        self.register(
            handle,
            RegisteredEntity {
                position,
                flammable: Some(FlammableEntity::new(handle, position, config)),
            },
        );
        trace!(entity = %handle, "Registered flammable");
        Ok(handle)
    }

    /// Register a combustible object with the configured default parameters
    pub fn add_default_flammable(&mut self, position: Vec3) -> EntityHandle {
        let handle = self.mint_handle();
        let config = self.config.default_flammable;
        self.register(
            handle,
            RegisteredEntity {
                position,
                flammable: Some(FlammableEntity::new(handle, position, config)),
            },
        );
        handle
    }

    /// Register an object that cannot burn
    pub fn add_inert(&mut self, position: Vec3) -> EntityHandle {
        let handle = self.mint_handle();
        self.register(
            handle,
            RegisteredEntity {
                position,
                flammable: None,
            },
        );
        trace!(entity = %handle, "Registered inert object");
        handle
    }

    /// Remove an object, cancelling its timers and destroying its fire.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::UnknownEntity`] if nothing is registered under `handle`.
    pub fn remove_entity(&mut self, handle: EntityHandle) -> Result<(), FireError> {
        let mut entity = self
            .entities
            .remove(&handle)
            .ok_or(FireError::UnknownEntity(handle))?;

        self.scheduler.forget_owner(handle);
        self.coordinators.remove(&handle);
        self.spatial.untrack(handle);

        if let Some(effect) = entity
            .flammable
            .as_mut()
            .and_then(|f| f.extinguish(self.simulation_time))
        {
            self.effect_owners.remove(&effect.id());
            self.destroyed_effects.push((handle, effect.id()));
        }

        debug!(entity = %handle, "Removed entity");
        Ok(())
    }

    /// Put an entity out immediately, from any non-terminal state.
    ///
    /// Returns `false` if it was already extinguished.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::UnknownEntity`] or [`FireError::NotFlammable`].
    pub fn stop_entity(&mut self, handle: EntityHandle) -> Result<bool, FireError> {
        let flammable = self.flammable(handle)?;
        if flammable.state().is_terminal() {
            return Ok(false);
        }
        self.finish_extinguish(handle);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Ignition
    // ------------------------------------------------------------------

    /// Ignite an entity with its own fire size.
    ///
    /// Returns `Ok(false)` when the entity is not Idle; repeated ignition
    /// never restarts a running timer.
    ///
    /// # Errors
    ///
    /// [`FireError::UnknownEntity`], [`FireError::NotFlammable`], or
    /// [`FireError::MissingConfiguration`] when no profile is bound for the
    /// entity's fire size (the ignition is aborted and the entity stays Idle).
    pub fn ignite(&mut self, handle: EntityHandle) -> Result<bool, FireError> {
        self.try_ignite(handle, None, self.simulation_time)
    }

    /// Ignite an entity using the profile for `size` instead of its own.
    ///
    /// # Errors
    ///
    /// As [`FireSimulation::ignite`].
    pub fn ignite_with(&mut self, handle: EntityHandle, size: FireSize) -> Result<bool, FireError> {
        self.try_ignite(handle, Some(size), self.simulation_time)
    }

    fn try_ignite(
        &mut self,
        handle: EntityHandle,
        size: Option<FireSize>,
        at: Seconds,
    ) -> Result<bool, FireError> {
        let flammable = self
            .entities
            .get_mut(&handle)
            .ok_or(FireError::UnknownEntity(handle))?
            .flammable
            .as_mut()
            .ok_or(FireError::NotFlammable(handle))?;

        if !flammable.state().is_idle() {
            return Ok(false);
        }

        let size = size.unwrap_or(flammable.config().fire_size);
        if !self.config.profiles.contains(size) {
            error!(entity = %handle, ?size, "No effect profile configured, ignition aborted");
            self.totals.aborted += 1;
            self.events
                .push(at, handle, FireEventKind::IgnitionAborted { size });
            return Err(FireError::MissingConfiguration(size));
        }

        let Some(ignite_at) = flammable.begin_ignition(at, size) else {
            return Ok(false);
        };

        self.scheduler
            .schedule(ignite_at, handle, ScheduledAction::CompleteIgnition);
        self.totals.ignitions += 1;
        self.events.push(
            at,
            handle,
            FireEventKind::IgnitionStarted { size, ignite_at },
        );
        debug!(entity = %handle, ?size, %ignite_at, "Ignition started");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Suppression
    // ------------------------------------------------------------------

    /// Reduce the intensity of an entity's fire by `amount`.
    ///
    /// Any application to a Burning entity moves it to Extinguishing.
    /// Reaching the minimum intensity extinguishes it within this call.
    ///
    /// # Errors
    ///
    /// [`FireError::InvalidParameter`] for a negative or non-finite amount,
    /// [`FireError::UnknownEntity`] or [`FireError::NotFlammable`].
    pub fn apply_suppression(
        &mut self,
        handle: EntityHandle,
        amount: f32,
    ) -> Result<SuppressionOutcome, FireError> {
        check_amount(amount)?;

        let now = self.simulation_time;
        let flammable = self
            .entities
            .get_mut(&handle)
            .ok_or(FireError::UnknownEntity(handle))?
            .flammable
            .as_mut()
            .ok_or(FireError::NotFlammable(handle))?;

        let (outcome, entered) = match flammable.suppress(amount) {
            SuppressStep::Ignored => return Ok(SuppressionOutcome::Ignored),
            SuppressStep::Reduced {
                intensity,
                entered_extinguishing,
            } => (
                SuppressionOutcome::Reduced { intensity },
                entered_extinguishing,
            ),
            SuppressStep::Depleted {
                entered_extinguishing,
            } => (SuppressionOutcome::Extinguished, entered_extinguishing),
        };

        if entered {
            self.events
                .push(now, handle, FireEventKind::SuppressionStarted);
            debug!(entity = %handle, "Suppression started");
        }
        if outcome == SuppressionOutcome::Extinguished {
            self.finish_extinguish(handle);
        }
        Ok(outcome)
    }

    /// Suppression addressed by effect id, as delivered by a contact volume.
    ///
    /// Contacts with an effect that no longer exists are ignored.
    ///
    /// # Errors
    ///
    /// [`FireError::InvalidParameter`] for a negative or non-finite amount.
    pub fn contact(&mut self, effect: EffectId, amount: f32) -> Result<SuppressionOutcome, FireError> {
        check_amount(amount)?;
        match self.effect_owners.get(&effect) {
            Some(&owner) => self.apply_suppression(owner, amount),
            None => Ok(SuppressionOutcome::Ignored),
        }
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.update_with(dt, &mut NullRenderer);
    }

    /// Advance the simulation by `dt` seconds, reporting visuals to `renderer`.
    ///
    /// Order within a tick:
    /// 1. advance the clock
    /// 2. run every scheduled action whose deadline has passed
    /// 3. advance growth and suppression decay of live effects
    /// 4. render live effects, then report destroyed ones
    pub fn update_with(&mut self, dt: f32, renderer: &mut dyn RenderHook) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "Ignoring invalid time step");
            0.0
        };

        self.simulation_time += Seconds::from(dt);
        let now = self.simulation_time;

        while let Some(due) = self.scheduler.pop_due(now) {
            match due.action {
                ScheduledAction::CompleteIgnition => self.complete_ignition(due.owner, due.deadline),
                ScheduledAction::SpreadAttempt => self.run_spread_attempt(due.owner, due.deadline),
            }
        }

        let ctx = TickContext { now, dt };
        let mut alight: Vec<EntityHandle> = self
            .entities
            .iter()
            .filter(|(_, e)| e.flammable.as_ref().is_some_and(|f| f.state().is_alight()))
            .map(|(&h, _)| h)
            .collect();
        alight.sort_unstable();

        for handle in alight {
            let depleted = self
                .entities
                .get_mut(&handle)
                .and_then(|e| e.flammable.as_mut())
                .is_some_and(|f| f.tick(&ctx));

            if depleted {
                self.finish_extinguish(handle);
            } else if let Some(frame) = self.render_frame(handle) {
                renderer.render(&frame);
            }
        }

        for (entity, effect) in self.destroyed_effects.drain(..) {
            renderer.effect_destroyed(entity, effect);
        }

        trace!(t = %now, dt, pending = self.scheduler.len(), "Tick complete");
    }

    fn complete_ignition(&mut self, handle: EntityHandle, at: Seconds) {
        let Some(flammable) = self
            .entities
            .get_mut(&handle)
            .and_then(|e| e.flammable.as_mut())
        else {
            return;
        };
        if !matches!(flammable.state(), FireState::Igniting { .. }) {
            return;
        }

        let size = flammable.fire_size();
        let Some(profile) = self.config.profiles.get(size).copied() else {
            // Profile was unbound while the ignition timer ran
            error!(entity = %handle, ?size, "No effect profile configured, ignition aborted");
            flammable.abort_ignition();
            self.totals.aborted += 1;
            self.events
                .push(at, handle, FireEventKind::IgnitionAborted { size });
            return;
        };

        let effect_id = EffectId::new(self.next_effect);
        self.next_effect += 1;

        let Some(center) = flammable
            .complete_ignition(effect_id, &profile, at)
            .map(FireEffect::position)
        else {
            return;
        };

        self.effect_owners.insert(effect_id, handle);
        self.events
            .push(at, handle, FireEventKind::Burning { effect: effect_id });
        debug!(entity = %handle, effect = %effect_id, "Burning");

        self.start_spreading(handle, center, &profile, at);
    }

    fn start_spreading(&mut self, handle: EntityHandle, center: Vec3, profile: &EffectProfile, at: Seconds) {
        let coordinator = SpreadCoordinator::new(handle, center, profile.spread, at);
        match coordinator.next_attempt_at() {
            Some(next) => {
                self.scheduler
                    .schedule(next, handle, ScheduledAction::SpreadAttempt);
            }
            None => {
                self.events
                    .push(at, handle, FireEventKind::SpreadExhausted { generation: 0 });
                debug!(entity = %handle, "Spreading disabled for this profile");
            }
        }
        self.coordinators.insert(handle, coordinator);
    }

    fn run_spread_attempt(&mut self, handle: EntityHandle, at: Seconds) {
        let Some(coordinator) = self.coordinators.get(&handle) else {
            return;
        };
        if !coordinator.is_active() {
            return;
        }

        let candidates = match coordinator.candidates(self.spatial.as_ref()) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(entity = %handle, error = %err, "Spatial query failed, spread attempt skipped");
                self.events
                    .push(at, handle, FireEventKind::QueryFailed { error: err });
                if let Some(coordinator) = self.coordinators.get_mut(&handle) {
                    let next = coordinator.skip_attempt(at);
                    self.scheduler
                        .schedule(next, handle, ScheduledAction::SpreadAttempt);
                }
                return;
            }
        };

        let mut ignited = Vec::new();
        for candidate in candidates {
            match self.try_ignite(candidate, None, at) {
                Ok(true) => ignited.push(candidate),
                Ok(false) | Err(FireError::NotFlammable(_) | FireError::MissingConfiguration(_)) => {}
                Err(err) => {
                    trace!(entity = %candidate, error = %err, "Skipping spread candidate");
                }
            }
        }
        self.totals.spread_ignitions += ignited.len() as u64;

        let Some(coordinator) = self.coordinators.get_mut(&handle) else {
            return;
        };
        let outcome = coordinator.record_attempt(ignited.len(), at);
        let generation = coordinator.generation();

        debug!(
            entity = %handle,
            ignited = ignited.len(),
            generation,
            "Spread attempt"
        );
        self.events.push(
            at,
            handle,
            FireEventKind::SpreadAttempted {
                ignited,
                generation,
            },
        );

        match outcome {
            SpreadOutcome::Continue { next } => {
                self.scheduler
                    .schedule(next, handle, ScheduledAction::SpreadAttempt);
            }
            SpreadOutcome::Exhausted => {
                info!(entity = %handle, generation, "Spread exhausted");
                self.events
                    .push(at, handle, FireEventKind::SpreadExhausted { generation });
            }
        }
    }

    /// Terminal transition: destroy the effect, stop spreading, cancel timers
    fn finish_extinguish(&mut self, handle: EntityHandle) {
        let now = self.simulation_time;
        let Some(flammable) = self
            .entities
            .get_mut(&handle)
            .and_then(|e| e.flammable.as_mut())
        else {
            return;
        };
        if flammable.state().is_terminal() {
            return;
        }

        let effect = flammable.extinguish(now).map(|e| e.id());
        self.scheduler.cancel_owner(handle);
        if let Some(coordinator) = self.coordinators.get_mut(&handle) {
            coordinator.stop();
        }
        if let Some(id) = effect {
            self.effect_owners.remove(&id);
            self.destroyed_effects.push((handle, id));
        }

        self.totals.extinguished += 1;
        self.events
            .push(now, handle, FireEventKind::Extinguished { effect });
        info!(entity = %handle, "Extinguished");
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Bind (or replace) the effect profile for a fire size.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::Config`] if the profile is out of range.
    pub fn set_profile(&mut self, size: FireSize, profile: EffectProfile) -> Result<(), FireError> {
        profile.validate()?;
        self.config.profiles.insert(size, profile);
        Ok(())
    }

    /// Unbind the effect profile for a fire size.
    ///
    /// Later ignitions with this size abort with
    /// [`FireError::MissingConfiguration`].
    pub fn remove_profile(&mut self, size: FireSize) -> Option<EffectProfile> {
        self.config.profiles.remove(size)
    }

    /// Bound effect profiles
    pub fn profiles(&self) -> &ProfileRegistry {
        &self.config.profiles
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Elapsed simulation time
    pub fn simulation_time(&self) -> Seconds {
        self.simulation_time
    }

    /// Registered object, flammable or not
    pub fn registered(&self, handle: EntityHandle) -> Option<&RegisteredEntity> {
        self.entities.get(&handle)
    }

    /// Flammable entity
    pub fn entity(&self, handle: EntityHandle) -> Option<&FlammableEntity> {
        self.entities.get(&handle)?.flammable.as_ref()
    }

    /// Lifecycle state of a flammable entity
    pub fn state_of(&self, handle: EntityHandle) -> Option<FireState> {
        self.entity(handle).map(FlammableEntity::state)
    }

    /// Live effect of an entity
    pub fn effect_of(&self, handle: EntityHandle) -> Option<&FireEffect> {
        self.entity(handle)?.effect()
    }

    /// Spread coordinator of an entity that has burned
    pub fn coordinator_of(&self, handle: EntityHandle) -> Option<&SpreadCoordinator> {
        self.coordinators.get(&handle)
    }

    /// Handles of all registered objects, in ascending order
    pub fn handles(&self) -> Vec<EntityHandle> {
        let mut handles: Vec<_> = self.entities.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Every live effect with its owner, in handle order
    pub fn live_effects(&self) -> Vec<(EntityHandle, &FireEffect)> {
        let mut effects: Vec<_> = self
            .entities
            .iter()
            .filter_map(|(&h, e)| Some((h, e.flammable.as_ref()?.effect()?)))
            .collect();
        effects.sort_unstable_by_key(|(h, _)| *h);
        effects
    }

    /// Live effects whose contact volume lies within `radius` of `center`
    pub fn effects_within(&self, center: Vec3, radius: f32) -> Vec<&FireEffect> {
        self.live_effects()
            .into_iter()
            .filter(|(_, effect)| effect.contact().distance_to(center) <= radius)
            .map(|(_, effect)| effect)
            .collect()
    }

    /// Ask the spatial query service for objects near a point.
    ///
    /// # Errors
    ///
    /// Returns [`FireError::Query`] when the service fails.
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Result<Vec<EntityHandle>, FireError> {
        Ok(self.spatial.query_radius(center, radius)?)
    }

    /// Visual state of an entity's live effect
    pub fn render_frame(&self, handle: EntityHandle) -> Option<RenderFrame> {
        let flammable = self.entity(handle)?;
        let effect = flammable.effect()?;
        Some(RenderFrame {
            entity: handle,
            effect: effect.id(),
            profile: effect.profile(),
            position: effect.position(),
            intensity: effect.intensity(),
            scale: effect.scale(),
            state: flammable.state(),
        })
    }

    /// Pending scheduled actions
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<FireEvent> {
        self.events.drain()
    }

    /// Running totals
    pub fn totals(&self) -> Counters {
        self.totals
    }

    /// Get statistics about the current simulation state
    pub fn stats(&self) -> SimulationStats {
        let mut stats = SimulationStats {
            simulation_time: self.simulation_time,
            registered: self.entities.len(),
            flammable: 0,
            idle: 0,
            igniting: 0,
            burning: 0,
            extinguishing: 0,
            extinguished: 0,
            active_coordinators: self.coordinators.values().filter(|c| c.is_active()).count(),
            pending_actions: self.scheduler.len(),
            pending_events: self.events.pending_len(),
            dropped_events: self.events.dropped(),
            totals: self.totals,
        };

        for flammable in self.entities.values().filter_map(|e| e.flammable.as_ref()) {
            stats.flammable += 1;
            match flammable.state() {
                FireState::Idle => stats.idle += 1,
                FireState::Igniting { .. } => stats.igniting += 1,
                FireState::Burning => stats.burning += 1,
                FireState::Extinguishing => stats.extinguishing += 1,
                FireState::Extinguished => stats.extinguished += 1,
            }
        }
        stats
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn mint_handle(&mut self) -> EntityHandle {
        let handle = EntityHandle::new(self.next_entity);
        self.next_entity += 1;
        handle
    }

    fn register(&mut self, handle: EntityHandle, entity: RegisteredEntity) {
        self.spatial.track(handle, entity.position);
        self.entities.insert(handle, entity);
    }

    fn flammable(&self, handle: EntityHandle) -> Result<&FlammableEntity, FireError> {
        self.entities
            .get(&handle)
            .ok_or(FireError::UnknownEntity(handle))?
            .flammable
            .as_ref()
            .ok_or(FireError::NotFlammable(handle))
    }
}

fn check_amount(amount: f32) -> Result<(), FireError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(FireError::InvalidParameter {
            name: "amount",
            reason: format!("must be finite and non-negative, got {amount}"),
        })
    }
}
