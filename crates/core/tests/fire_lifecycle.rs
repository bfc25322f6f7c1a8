//! End-to-end lifecycle of single fires: ignition delay, growth, suppression
//! and renderer notifications.

use approx::assert_relative_eq;
use ctor::ctor;
use fire_spread_core::{
    FireError, FireEventKind, FireSimulation, FireState, FlammableConfig, FrameRecorder,
    SimulationConfig, SuppressionOutcome, Vec3,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sim() -> FireSimulation {
    FireSimulation::new(SimulationConfig::default()).expect("default config is valid")
}

#[test]
fn test_no_effect_before_ignition_delay() {
    let mut sim = sim();
    let a = sim
        .add_flammable(
            Vec3::zeros(),
            FlammableConfig {
                ignition_delay: 1.0,
                fire_growth_duration: 2.0,
                ..Default::default()
            },
        )
        .unwrap();

    assert!(sim.ignite(a).unwrap());
    for _ in 0..9 {
        sim.update(0.1);
        assert!(sim.effect_of(a).is_none(), "effect appeared early");
    }

    sim.update(0.1);

    let effect = sim.effect_of(a).expect("burning after the delay");
    assert_eq!(effect.intensity(), 1.0);
    assert_relative_eq!(effect.scale(), Vec3::zeros(), epsilon = 1e-5);
}

#[test]
fn test_effect_created_exactly_at_deadline() {
    let mut sim = sim();
    let a = sim
        .add_flammable(
            Vec3::zeros(),
            FlammableConfig {
                ignition_delay: 1.0,
                fire_growth_duration: 2.0,
                ..Default::default()
            },
        )
        .unwrap();
    sim.ignite(a).unwrap();

    sim.update(0.5);
    assert!(sim.effect_of(a).is_none());
    sim.update(0.5);

    let effect = sim.effect_of(a).unwrap();
    assert_eq!(effect.intensity(), 1.0);
    assert_eq!(effect.scale(), Vec3::zeros());
    assert_eq!(effect.position(), Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_growth_interpolates_then_pins() {
    let mut sim = sim();
    let a = sim
        .add_flammable(
            Vec3::zeros(),
            FlammableConfig {
                ignition_delay: 1.0,
                fire_growth_duration: 2.0,
                target_fire_scale: Vec3::new(2.0, 2.0, 2.0),
                ..Default::default()
            },
        )
        .unwrap();
    sim.ignite(a).unwrap();
    sim.update(1.0);

    sim.update(1.0);
    assert_relative_eq!(
        sim.effect_of(a).unwrap().scale(),
        Vec3::new(1.0, 1.0, 1.0),
        epsilon = 1e-5
    );

    sim.update(1.0);
    assert_eq!(sim.effect_of(a).unwrap().scale(), Vec3::new(2.0, 2.0, 2.0));

    sim.update(5.0);
    assert_eq!(sim.effect_of(a).unwrap().scale(), Vec3::new(2.0, 2.0, 2.0));
}

#[test]
fn test_single_large_suppression_extinguishes() {
    let mut sim = sim();
    let a = sim
        .add_flammable(
            Vec3::zeros(),
            FlammableConfig {
                min_intensity: 0.1,
                ..Default::default()
            },
        )
        .unwrap();
    sim.ignite(a).unwrap();
    sim.update(1.0);

    assert_eq!(sim.apply_suppression(a, 0.95), Ok(SuppressionOutcome::Extinguished));
    assert_eq!(sim.state_of(a), Some(FireState::Extinguished));
    assert!(sim.effect_of(a).is_none());

    let kinds: Vec<_> = sim.drain_events().into_iter().map(|e| e.kind).collect();
    let started = kinds
        .iter()
        .position(|k| matches!(k, FireEventKind::SuppressionStarted))
        .expect("passes through Extinguishing");
    let ended = kinds
        .iter()
        .position(|k| matches!(k, FireEventKind::Extinguished { effect: Some(_) }))
        .expect("ends Extinguished");
    assert!(started < ended);
}

#[test]
fn test_partial_suppression_then_passive_decay() {
    let mut sim = sim();
    let a = sim
        .add_flammable(
            Vec3::zeros(),
            FlammableConfig {
                extinguish_duration: Some(2.0),
                min_intensity: 0.1,
                ..Default::default()
            },
        )
        .unwrap();
    sim.ignite(a).unwrap();
    sim.update(1.0);

    match sim.apply_suppression(a, 0.3).unwrap() {
        SuppressionOutcome::Reduced { intensity } => assert_relative_eq!(intensity, 0.7, epsilon = 1e-6),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(sim.state_of(a), Some(FireState::Extinguishing));

    // Decays at 0.45/s: 0.7 -> 0.25 after one second
    sim.update(1.0);
    assert_relative_eq!(sim.effect_of(a).unwrap().intensity(), 0.25, epsilon = 1e-5);

    sim.update(1.0);
    assert_eq!(sim.state_of(a), Some(FireState::Extinguished));
}

#[test]
fn test_repeated_ignite_yields_single_fire() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();

    assert!(sim.ignite(a).unwrap());
    sim.update(0.5);
    assert!(!sim.ignite(a).unwrap());
    sim.update(0.5);
    assert!(!sim.ignite(a).unwrap());
    sim.update(1.0);

    let burning = sim
        .drain_events()
        .into_iter()
        .filter(|e| e.entity == a && matches!(e.kind, FireEventKind::Burning { .. }))
        .count();
    assert_eq!(burning, 1);
    assert_eq!(sim.stats().totals.ignitions, 1);
}

#[test]
fn test_extinguished_entity_cannot_reignite() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    sim.ignite(a).unwrap();
    sim.update(1.0);
    sim.stop_entity(a).unwrap();

    assert!(!sim.ignite(a).unwrap());
    sim.update(5.0);
    assert_eq!(sim.state_of(a), Some(FireState::Extinguished));
}

#[test]
fn test_removed_igniting_entity_never_burns() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    sim.ignite(a).unwrap();
    sim.update(0.5);
    sim.remove_entity(a).unwrap();
    sim.update(5.0);

    assert!(sim.entity(a).is_none());
    assert!(!sim.drain_events().iter().any(|e| matches!(e.kind, FireEventKind::Burning { .. })));
    assert_eq!(sim.stats().pending_actions, 0);
}

#[test]
fn test_stopped_igniting_entity_never_burns() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    sim.ignite(a).unwrap();
    sim.stop_entity(a).unwrap();
    sim.update(5.0);

    assert_eq!(sim.state_of(a), Some(FireState::Extinguished));
    assert!(!sim.drain_events().iter().any(|e| matches!(e.kind, FireEventKind::Burning { .. })));
}

#[test]
fn test_renderer_sees_frames_and_single_destruction() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    let mut renderer = FrameRecorder::new();

    sim.ignite(a).unwrap();
    sim.update_with(1.0, &mut renderer);
    let frame = *renderer.last_frame(a).expect("frame for the new effect");
    assert_eq!(frame.state, FireState::Burning);
    assert_eq!(frame.intensity, 1.0);

    sim.apply_suppression(a, 0.5).unwrap();
    sim.update_with(0.1, &mut renderer);
    let frame = *renderer.last_frame(a).unwrap();
    assert_eq!(frame.state, FireState::Extinguishing);
    assert!(frame.intensity < 0.5);
    assert!(frame.light_intensity(2.0) < 1.0);

    sim.apply_suppression(a, 1.0).unwrap();
    assert!(renderer.destroyed.is_empty(), "notified on the next tick");
    sim.update_with(0.1, &mut renderer);
    sim.update_with(0.1, &mut renderer);

    assert_eq!(renderer.destroyed, vec![(a, frame.effect)]);
}

#[test]
fn test_suppression_on_non_burning_entities() {
    let mut sim = sim();
    let a = sim
        .add_flammable(Vec3::zeros(), FlammableConfig::default())
        .unwrap();
    let rock = sim.add_inert(Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(sim.apply_suppression(a, 0.5), Ok(SuppressionOutcome::Ignored));
    sim.ignite(a).unwrap();
    assert_eq!(sim.apply_suppression(a, 0.5), Ok(SuppressionOutcome::Ignored));
    assert_eq!(sim.apply_suppression(rock, 0.5), Err(FireError::NotFlammable(rock)));

    sim.update(1.0);
    assert_eq!(sim.effect_of(a).unwrap().intensity(), 1.0);
}

#[test]
fn test_split_suppression_totalling_threshold_extinguishes() {
    for (first, second) in [(0.45, 0.45), (0.7, 0.2), (0.2, 0.7)] {
        let mut sim = sim();
        let a = sim
            .add_flammable(
                Vec3::zeros(),
                FlammableConfig {
                    extinguish_duration: None,
                    min_intensity: 0.1,
                    ..Default::default()
                },
            )
            .unwrap();
        sim.ignite(a).unwrap();
        sim.update(1.0);
        assert_eq!(sim.state_of(a), Some(FireState::Burning));

        assert!(matches!(
            sim.apply_suppression(a, first).unwrap(),
            SuppressionOutcome::Reduced { .. }
        ));
        assert_eq!(
            sim.apply_suppression(a, second).unwrap(),
            SuppressionOutcome::Extinguished,
            "{first} + {second}"
        );
        assert_eq!(sim.state_of(a), Some(FireState::Extinguished));
        assert!(sim.effect_of(a).is_none());
    }
}
