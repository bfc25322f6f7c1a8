//! Spread coordinator behaviour inside a running simulation

use ctor::ctor;
use fire_spread_core::{
    EffectProfile, EntityHandle, FireEventKind, FireSimulation, FireSize, FireState,
    FlammableConfig, SimulationConfig, SpreadConfig, Vec3,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fires appear at the entity position so distances are easy to reason about
fn grounded() -> FlammableConfig {
    FlammableConfig {
        ignition_delay: 1.0,
        fire_offset: Vec3::zeros(),
        fire_growth_duration: 0.0,
        extinguish_duration: None,
        ..Default::default()
    }
}

fn sim_with_spread(spread: SpreadConfig) -> FireSimulation {
    let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
    sim.set_profile(
        FireSize::Medium,
        EffectProfile {
            spread,
            ..EffectProfile::medium()
        },
    )
    .unwrap();
    sim
}

fn run(sim: &mut FireSimulation, seconds: f32, dt: f32) {
    let steps = (seconds / dt).round() as usize;
    for _ in 0..steps {
        sim.update(dt);
    }
}

#[test]
fn test_generation_counts_only_new_ignitions() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 5.0,
        spread_delay: 3.0,
        max_spread_count: 2,
    });
    let origin = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    let idle = sim.add_flammable(Vec3::new(4.0, 0.0, 0.0), grounded()).unwrap();
    let burning = sim.add_flammable(Vec3::new(-4.0, 0.0, 0.0), grounded()).unwrap();

    sim.ignite(burning).unwrap();
    sim.ignite(origin).unwrap();
    sim.update(1.0);
    assert_eq!(sim.state_of(burning), Some(FireState::Burning));

    // First attempt at t = 4
    sim.update(3.0);
    assert!(matches!(sim.state_of(idle), Some(FireState::Igniting { .. })));
    assert_eq!(sim.coordinator_of(origin).unwrap().generation(), 1);

    run(&mut sim, 30.0, 0.5);
    let coordinator = sim.coordinator_of(origin).unwrap();
    assert_eq!(coordinator.generation(), 1);
    assert!(coordinator.is_active());
    assert!(coordinator.attempts() >= 10);
}

#[test]
fn test_exhausted_coordinator_stops_spreading() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 5.0,
        spread_delay: 2.0,
        max_spread_count: 1,
    });
    let origin = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    let first = sim.add_flammable(Vec3::new(3.0, 0.0, 0.0), grounded()).unwrap();

    sim.ignite(origin).unwrap();
    sim.update(3.0);
    assert!(!sim.coordinator_of(origin).unwrap().is_active());

    // A newcomer next to the exhausted origin only burns if `first` reaches it
    let late = sim.add_flammable(Vec3::new(-3.0, 0.0, 0.0), grounded()).unwrap();
    run(&mut sim, 20.0, 0.5);
    assert_eq!(sim.state_of(late), Some(FireState::Idle));
    assert!(sim.state_of(first).is_some_and(|s| s.is_alight()));

    let exhausted = sim
        .drain_events()
        .into_iter()
        .filter(|e| e.entity == origin && matches!(e.kind, FireEventKind::SpreadExhausted { .. }))
        .count();
    assert_eq!(exhausted, 1);
}

#[test]
fn test_zero_max_spread_never_spreads() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 5.0,
        spread_delay: 1.0,
        max_spread_count: 0,
    });
    let origin = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    let neighbor = sim.add_flammable(Vec3::new(1.0, 0.0, 0.0), grounded()).unwrap();

    sim.ignite(origin).unwrap();
    run(&mut sim, 10.0, 0.5);

    assert_eq!(sim.state_of(neighbor), Some(FireState::Idle));
    let coordinator = sim.coordinator_of(origin).unwrap();
    assert!(!coordinator.is_active());
    assert_eq!(coordinator.attempts(), 0);
}

#[test]
fn test_fire_travels_along_a_line() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 2.5,
        spread_delay: 1.0,
        max_spread_count: 3,
    });
    let line: Vec<EntityHandle> = (0..6)
        .map(|i| {
            sim.add_flammable(Vec3::new(2.0 * i as f32, 0.0, 0.0), grounded())
                .unwrap()
        })
        .collect();

    sim.ignite(line[0]).unwrap();
    // Each hop takes ignition delay + spread delay = 2 s
    run(&mut sim, 12.0, 0.25);

    for handle in &line {
        assert!(sim.state_of(*handle).is_some_and(|s| s.is_alight()), "{handle} not burning");
    }
    assert_eq!(sim.stats().totals.spread_ignitions, 5);
}

#[test]
fn test_inert_objects_block_nothing_and_never_burn() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 5.0,
        spread_delay: 1.0,
        max_spread_count: 3,
    });
    let origin = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    let rock = sim.add_inert(Vec3::new(1.0, 0.0, 0.0));
    let bush = sim.add_flammable(Vec3::new(2.0, 0.0, 0.0), grounded()).unwrap();

    sim.ignite(origin).unwrap();
    run(&mut sim, 3.0, 0.5);

    assert!(sim.state_of(rock).is_none());
    assert!(sim.registered(rock).is_some());
    assert!(sim.state_of(bush).is_some_and(|s| !s.is_idle()));
}

#[test]
fn test_extinguishing_fire_keeps_spreading_until_out() {
    let mut sim = sim_with_spread(SpreadConfig {
        spread_radius: 5.0,
        spread_delay: 1.0,
        max_spread_count: 3,
    });
    let origin = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    let neighbor = sim.add_flammable(Vec3::new(3.0, 0.0, 0.0), grounded()).unwrap();

    sim.ignite(origin).unwrap();
    sim.update(1.0);
    sim.apply_suppression(origin, 0.2).unwrap();
    assert_eq!(sim.state_of(origin), Some(FireState::Extinguishing));

    sim.update(1.0);
    assert!(!sim.state_of(neighbor).unwrap().is_idle());

    sim.apply_suppression(origin, 1.0).unwrap();
    let coordinator = sim.coordinator_of(origin).unwrap();
    assert!(!coordinator.is_active());
    assert_eq!(coordinator.next_attempt_at(), None);
}

#[test]
fn test_undrained_events_stay_bounded_while_spreading() {
    let mut sim = FireSimulation::new(SimulationConfig {
        max_pending_events: 16,
        ..SimulationConfig::default()
    })
    .unwrap();
    sim.set_profile(
        FireSize::Medium,
        EffectProfile {
            spread: SpreadConfig {
                spread_radius: 5.0,
                spread_delay: 0.5,
                max_spread_count: 5,
            },
            ..EffectProfile::medium()
        },
    )
    .unwrap();
    let a = sim.add_flammable(Vec3::zeros(), grounded()).unwrap();
    sim.add_flammable(Vec3::new(3.0, 0.0, 0.0), grounded()).unwrap();
    sim.ignite(a).unwrap();

    // Both coordinators stay active forever and attempt every 0.5 s
    run(&mut sim, 200.0, 0.1);

    let stats = sim.stats();
    assert_eq!(stats.active_coordinators, 2);
    assert_eq!(stats.pending_events, 16);
    assert!(stats.dropped_events > 100);

    let drained = sim.drain_events();
    assert_eq!(drained.len(), 16);
    assert!(drained
        .iter()
        .all(|e| matches!(e.kind, FireEventKind::SpreadAttempted { .. })));
    assert_eq!(sim.stats().pending_events, 0);
}
