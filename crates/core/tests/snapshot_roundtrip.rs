//! Saving and restoring a running simulation

use ctor::ctor;
use fire_spread_core::{
    FireSimulation, FireState, FlammableConfig, SimulationConfig, SimulationSnapshot, Vec3,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn running_world() -> FireSimulation {
    let mut sim = FireSimulation::new(SimulationConfig::default()).unwrap();
    for i in 0..5 {
        sim.add_flammable(Vec3::new(3.0 * i as f32, 0.0, 0.0), FlammableConfig::default())
            .unwrap();
    }
    sim.add_inert(Vec3::new(1.5, 0.0, 0.0));
    let first = sim.handles()[0];
    sim.ignite(first).unwrap();
    for _ in 0..10 {
        sim.update(0.5);
    }
    sim
}

#[test]
fn test_round_trip_preserves_states_and_generations() {
    let sim = running_world();
    let json = sim.snapshot().to_json().unwrap();
    let restored = FireSimulation::from_snapshot(SimulationSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.simulation_time(), sim.simulation_time());
    for handle in sim.handles() {
        assert_eq!(restored.state_of(handle), sim.state_of(handle));
        assert_eq!(
            restored.coordinator_of(handle).map(|c| c.generation()),
            sim.coordinator_of(handle).map(|c| c.generation())
        );
    }
}

#[test]
fn test_restored_simulation_continues_identically() {
    let mut sim = running_world();
    let mut restored = FireSimulation::from_snapshot(sim.snapshot()).unwrap();

    for _ in 0..20 {
        sim.update(0.5);
        restored.update(0.5);
    }

    for handle in sim.handles() {
        assert_eq!(restored.state_of(handle), sim.state_of(handle), "{handle}");
        assert_eq!(
            restored.effect_of(handle).map(|e| e.intensity()),
            sim.effect_of(handle).map(|e| e.intensity())
        );
    }
    assert!(sim
        .handles()
        .iter()
        .filter_map(|&h| sim.state_of(h))
        .any(|s| s == FireState::Burning));
}

#[test]
fn test_save_and_load_file() {
    let sim = running_world();
    let path = std::env::temp_dir().join(format!("fire-spread-snapshot-{}.json", std::process::id()));

    sim.snapshot().save(&path).unwrap();
    let loaded = SimulationSnapshot::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, sim.snapshot());
}
