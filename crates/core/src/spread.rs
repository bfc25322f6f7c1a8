//! Spread coordinator: periodic propagation from one burning entity
//!
//! A coordinator is created when its origin starts burning. Every
//! `spread_delay` seconds it asks the spatial query for neighbors within
//! `spread_radius` and the simulation ignites the idle flammables among them.
//! Attempts that ignite at least one entity advance the generation; once the
//! generation reaches `max_spread_count` the coordinator is exhausted for good.

use crate::config::SpreadConfig;
use crate::core_types::entity::EntityHandle;
use crate::core_types::spatial::SpatialQuery;
use crate::core_types::units::Seconds;
use crate::core_types::vec3::Vec3;
use crate::error::QueryError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// What happens after a spread attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadOutcome {
    /// Next attempt due at this deadline
    Continue {
        /// Deadline of the next attempt
        next: Seconds,
    },
    /// Generation cap reached, no further attempts
    Exhausted,
}

/// Periodic spread attempts scoped to a single origin entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadCoordinator {
    origin: EntityHandle,
    center: Vec3,
    config: SpreadConfig,
    generation: u32,
    active: bool,
    attempts: u32,
    next_attempt_at: Option<Seconds>,
}

impl SpreadCoordinator {
    /// Start a coordinator for an entity that began burning at `now`.
    ///
    /// The first attempt is due at `now + spread_delay`. A zero
    /// `max_spread_count` yields a coordinator that is exhausted from the start.
    pub fn new(origin: EntityHandle, center: Vec3, config: SpreadConfig, now: Seconds) -> Self {
        let active = config.max_spread_count > 0;
        Self {
            origin,
            center,
            config,
            generation: 0,
            active,
            attempts: 0,
            next_attempt_at: active.then(|| now + Seconds::from(config.spread_delay)),
        }
    }

    /// Candidate entities for one attempt: deduplicated, origin excluded,
    /// sorted by handle so processing order is reproducible.
    ///
    /// # Errors
    ///
    /// Propagates the query service failure.
    pub fn candidates(&self, query: &dyn SpatialQuery) -> Result<Vec<EntityHandle>, QueryError> {
        let found = query.query_radius(self.center, self.config.spread_radius)?;

        let mut seen = FxHashSet::default();
        let mut candidates: Vec<EntityHandle> = found
            .into_iter()
            .filter(|&handle| handle != self.origin && seen.insert(handle))
            .collect();
        candidates.sort_unstable();
        Ok(candidates)
    }

    /// Record a finished attempt that ignited `ignited` new entities.
    ///
    /// `at` is the deadline the attempt was scheduled for, so the cadence does
    /// not drift with tick length.
    pub fn record_attempt(&mut self, ignited: usize, at: Seconds) -> SpreadOutcome {
        self.attempts += 1;
        if ignited > 0 {
            self.generation += 1;
        }

        if self.generation >= self.config.max_spread_count {
            self.active = false;
            self.next_attempt_at = None;
            return SpreadOutcome::Exhausted;
        }

        let next = at + Seconds::from(self.config.spread_delay);
        self.next_attempt_at = Some(next);
        SpreadOutcome::Continue { next }
    }

    /// Skip an attempt whose query failed; the cadence continues.
    pub fn skip_attempt(&mut self, at: Seconds) -> Seconds {
        let next = at + Seconds::from(self.config.spread_delay);
        self.next_attempt_at = Some(next);
        next
    }

    /// Stop permanently (origin extinguished or removed)
    pub fn stop(&mut self) {
        self.active = false;
        self.next_attempt_at = None;
    }

    /// Entity this coordinator spreads from
    pub fn origin(&self) -> EntityHandle {
        self.origin
    }

    /// Query center
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Spread settings
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Number of attempts that ignited something
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Total attempts, successful or not
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether further attempts will be made
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deadline of the next attempt while active
    pub fn next_attempt_at(&self) -> Option<Seconds> {
        self.next_attempt_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::spatial::SpatialIndex;

    fn config(max: u32) -> SpreadConfig {
        SpreadConfig {
            spread_radius: 5.0,
            spread_delay: 3.0,
            max_spread_count: max,
        }
    }

    struct Repeating(Vec<EntityHandle>);

    impl SpatialQuery for Repeating {
        fn query_radius(&self, _: Vec3, _: f32) -> Result<Vec<EntityHandle>, QueryError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_first_attempt_after_delay() {
        let c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(2), Seconds::new(1.0));
        assert!(c.is_active());
        assert_eq!(c.next_attempt_at(), Some(Seconds::new(4.0)));
    }

    #[test]
    fn test_zero_max_is_exhausted_on_creation() {
        let c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(0), Seconds::ZERO);
        assert!(!c.is_active());
        assert_eq!(c.next_attempt_at(), None);
    }

    #[test]
    fn test_candidates_dedup_and_skip_origin() {
        let origin = EntityHandle::new(1);
        let query = Repeating(vec![
            EntityHandle::new(3),
            origin,
            EntityHandle::new(2),
            EntityHandle::new(3),
        ]);
        let c = SpreadCoordinator::new(origin, Vec3::zeros(), config(2), Seconds::ZERO);

        let found = c.candidates(&query).unwrap();
        assert_eq!(found, vec![EntityHandle::new(2), EntityHandle::new(3)]);
    }

    #[test]
    fn test_candidates_respect_radius() {
        let mut index = SpatialIndex::new(10.0);
        index.insert(EntityHandle::new(1), Vec3::zeros());
        index.insert(EntityHandle::new(2), Vec3::new(4.0, 0.0, 0.0));
        index.insert(EntityHandle::new(3), Vec3::new(6.0, 0.0, 0.0));

        let c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(2), Seconds::ZERO);
        assert_eq!(c.candidates(&index).unwrap(), vec![EntityHandle::new(2)]);
    }

    #[test]
    fn test_generation_only_counts_successful_attempts() {
        let mut c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(2), Seconds::ZERO);

        assert_eq!(
            c.record_attempt(1, Seconds::new(3.0)),
            SpreadOutcome::Continue {
                next: Seconds::new(6.0)
            }
        );
        assert_eq!(c.generation(), 1);

        for i in 2..10 {
            let at = Seconds::new(3.0 * f64::from(i));
            assert!(matches!(c.record_attempt(0, at), SpreadOutcome::Continue { .. }));
        }
        assert_eq!(c.generation(), 1);
        assert_eq!(c.attempts(), 9);
        assert!(c.is_active());
    }

    #[test]
    fn test_exhausts_at_cap() {
        let mut c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(2), Seconds::ZERO);
        c.record_attempt(3, Seconds::new(3.0));
        assert_eq!(c.record_attempt(1, Seconds::new(6.0)), SpreadOutcome::Exhausted);
        assert_eq!(c.generation(), 2);
        assert!(!c.is_active());
        assert_eq!(c.next_attempt_at(), None);
    }

    #[test]
    fn test_skip_keeps_cadence() {
        let mut c = SpreadCoordinator::new(EntityHandle::new(1), Vec3::zeros(), config(2), Seconds::ZERO);
        assert_eq!(c.skip_attempt(Seconds::new(3.0)), Seconds::new(6.0));
        assert_eq!(c.generation(), 0);
        assert_eq!(c.attempts(), 0);
    }
}
