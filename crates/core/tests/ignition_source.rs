//! Ignition sources and missing effect profiles

use ctor::ctor;
use fire_spread_core::{
    FireError, FireEventKind, FireSimulation, FireSize, FireState, FlammableConfig,
    IgnitionSource, IgnitionSourceConfig, SimulationConfig, Vec3,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn cluster(sim: &mut FireSimulation) -> Vec<fire_spread_core::EntityHandle> {
    [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, -2.5),
    ]
    .into_iter()
    .map(|p| sim.add_flammable(p, FlammableConfig::default()).unwrap())
    .collect()
}

#[test]
fn test_source_fires_once_with_its_profile() {
    let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
    let handles = cluster(&mut sim);
    let mut source = IgnitionSource::new(
        Vec3::zeros(),
        IgnitionSourceConfig {
            start_radius: 3.0,
            fire_size: FireSize::Big,
        },
    );

    let ignited = source.activate(&mut sim).unwrap();
    assert_eq!(ignited, handles);

    sim.update(1.0);
    for handle in &handles {
        assert_eq!(sim.effect_of(*handle).unwrap().profile(), FireSize::Big);
    }

    // Spent: nothing happens even after the fires are out
    for handle in &handles {
        sim.stop_entity(*handle).unwrap();
    }
    assert!(source.activate(&mut sim).unwrap().is_empty());
}

#[test]
fn test_source_with_missing_profile_ignites_nothing() {
    let mut config = SimulationConfig::default();
    config.profiles.remove(FireSize::Small);
    let mut sim = FireSimulation::new(config).unwrap();
    let handles = cluster(&mut sim);

    let mut source = IgnitionSource::new(
        Vec3::zeros(),
        IgnitionSourceConfig {
            start_radius: 3.0,
            fire_size: FireSize::Small,
        },
    );

    assert_eq!(
        source.activate(&mut sim),
        Err(FireError::MissingConfiguration(FireSize::Small))
    );
    sim.update(5.0);
    for handle in &handles {
        assert_eq!(sim.state_of(*handle), Some(FireState::Idle));
    }

    // Binding the profile later lets the still-armed source fire
    sim.set_profile(FireSize::Small, fire_spread_core::EffectProfile::small())
        .unwrap();
    assert_eq!(source.activate(&mut sim).unwrap().len(), 3);
}

#[test]
fn test_spread_skips_entities_with_missing_profile() {
    let mut config = SimulationConfig::default();
    config.profiles.remove(FireSize::Small);
    let mut sim = FireSimulation::new(config).unwrap();

    let origin = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    let small = sim
        .add_flammable(
            Vec3::new(2.0, 0.0, 0.0),
            FlammableConfig {
                fire_size: FireSize::Small,
                ..Default::default()
            },
        )
        .unwrap();

    sim.ignite(origin).unwrap();
    sim.update(1.0);
    sim.update(3.0);

    assert_eq!(sim.state_of(small), Some(FireState::Idle));
    assert_eq!(sim.coordinator_of(origin).unwrap().generation(), 0);
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| e.entity == small && matches!(e.kind, FireEventKind::IgnitionAborted { .. })));
}

#[test]
fn test_world_sized_radius_returns_promptly() {
    let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
    let handles = cluster(&mut sim);
    let far = sim
        .add_flammable(Vec3::new(250_000.0, 0.0, 0.0), FlammableConfig::default())
        .unwrap();
    let mut source = IgnitionSource::new(
        Vec3::zeros(),
        IgnitionSourceConfig {
            start_radius: 100_000.0,
            fire_size: FireSize::Medium,
        },
    );

    let started = std::time::Instant::now();
    let ignited = source.activate(&mut sim).unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
    assert_eq!(ignited, handles);
    assert_eq!(sim.state_of(far), Some(FireState::Idle));
}
