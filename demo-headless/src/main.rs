use clap::Parser;
use fire_spread_core::{
    EffectId, EntityHandle, FireEventKind, FireSimulation, FireSize, FlammableConfig, IgnitionSource,
    IgnitionSourceConfig, RenderFrame, RenderHook, SimulationConfig, SuppressionAgent,
    SuppressionAgentConfig, Vec3,
};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Fire spread demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fire-spread-demo")]
#[command(about = "Headless fire ignition, spread and suppression demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Update step in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Scenario JSON file (overrides the generated grid)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Simulation config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of combustibles per grid side
    #[arg(long, default_value_t = 10)]
    grid_size: u32,

    /// Grid spacing in meters
    #[arg(long, default_value_t = 3.0)]
    spacing: f32,

    /// Fraction of grid slots holding an inert object instead of a combustible
    #[arg(long, default_value_t = 0.1)]
    inert_ratio: f32,

    /// Random jitter applied to grid positions (m)
    #[arg(long, default_value_t = 0.5)]
    jitter: f32,

    /// Seed for grid placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ignition source radius (m)
    #[arg(long, default_value_t = 3.0)]
    start_radius: f32,

    /// Fire size of the ignition source (big, medium, small)
    #[arg(long, default_value = "medium")]
    fire_size: String,

    /// Sweep an extinguisher across the grid, starting at this time (s)
    #[arg(long)]
    extinguish_at: Option<f32>,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f32,
}

/// Hand-authored scenario loaded from JSON
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: SimulationConfig,
    entities: Vec<ScenarioEntity>,
    ignition: ScenarioIgnition,
}

#[derive(Debug, Deserialize)]
struct ScenarioEntity {
    position: Vec3,
    #[serde(default = "default_flammable")]
    flammable: bool,
    #[serde(default)]
    config: Option<FlammableConfig>,
}

#[derive(Debug, Deserialize)]
struct ScenarioIgnition {
    position: Vec3,
    #[serde(default)]
    source: IgnitionSourceConfig,
}

fn default_flammable() -> bool {
    true
}

/// Tracks visual output the way a host renderer would
#[derive(Debug, Default)]
struct ConsoleRenderer {
    live: usize,
    peak_live: usize,
    intensity_sum: f32,
    destroyed: usize,
}

impl ConsoleRenderer {
    fn begin_tick(&mut self) {
        self.live = 0;
        self.intensity_sum = 0.0;
    }

    fn end_tick(&mut self) {
        self.peak_live = self.peak_live.max(self.live);
    }

    fn mean_intensity(&self) -> f32 {
        if self.live == 0 {
            0.0
        } else {
            self.intensity_sum / self.live as f32
        }
    }
}

impl RenderHook for ConsoleRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        self.live += 1;
        self.intensity_sum += frame.intensity;
    }

    fn effect_destroyed(&mut self, entity: EntityHandle, effect: EffectId) {
        self.destroyed += 1;
        tracing::debug!(entity = %entity, effect = %effect, "Effect torn down");
    }
}

fn parse_fire_size(name: &str) -> FireSize {
    match name.to_lowercase().as_str() {
        "big" | "large" => FireSize::Big,
        "small" => FireSize::Small,
        "medium" => FireSize::Medium,
        other => {
            warn!("Unknown fire size '{}', using medium", other);
            FireSize::Medium
        }
    }
}

fn load_config(args: &Args) -> SimulationConfig {
    let Some(path) = &args.config else {
        return SimulationConfig::default();
    };
    match SimulationConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config {}: {}; using defaults", path.display(), e);
            SimulationConfig::default()
        }
    }
}

/// Build a jittered grid of combustibles centered on the origin
fn build_grid(args: &Args, sim: &mut FireSimulation) -> (usize, usize) {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let n = args.grid_size.max(1);
    let offset = (n as f32 - 1.0) * args.spacing / 2.0;
    let jitter = args.jitter.abs();
    let mut flammable = 0;
    let mut inert = 0;

    for row in 0..n {
        for col in 0..n {
            let mut position = Vec3::new(
                col as f32 * args.spacing - offset,
                0.0,
                row as f32 * args.spacing - offset,
            );
            if jitter > 0.0 {
                position.x += rng.random_range(-jitter..=jitter);
                position.z += rng.random_range(-jitter..=jitter);
            }

            if rng.random::<f32>() < args.inert_ratio {
                sim.add_inert(position);
                inert += 1;
            } else {
                sim.add_default_flammable(position);
                flammable += 1;
            }
        }
    }

    (flammable, inert)
}

/// Register scenario entities, returning the ignition source
fn build_scenario(scenario: &Scenario, sim: &mut FireSimulation) -> IgnitionSource {
    for entity in &scenario.entities {
        if !entity.flammable {
            sim.add_inert(entity.position);
            continue;
        }
        let result = match entity.config {
            Some(config) => sim.add_flammable(entity.position, config).map(|_| ()),
            None => {
                sim.add_default_flammable(entity.position);
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!("Skipping entity at {:?}: {}", entity.position, e);
        }
    }
    IgnitionSource::new(scenario.ignition.position, scenario.ignition.source)
}

fn load_scenario(path: &Path) -> Option<Scenario> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read scenario {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(scenario) => Some(scenario),
        Err(e) => {
            error!("Failed to parse scenario {}: {}", path.display(), e);
            None
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if !args.dt.is_finite() || args.dt <= 0.0 {
        error!("--dt must be positive, got {}", args.dt);
        std::process::exit(2);
    }

    println!("=== Fire Spread Demo ===\n");

    let scenario = args.scenario.as_deref().and_then(load_scenario);
    let config = scenario
        .as_ref()
        .map_or_else(|| load_config(&args), |s| s.config.clone());

    let mut sim = match FireSimulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Invalid simulation config: {}", e);
            std::process::exit(1);
        }
    };

    let mut source = if let Some(scenario) = &scenario {
        println!("Loaded scenario with {} entities", scenario.entities.len());
        build_scenario(scenario, &mut sim)
    } else {
        let (flammable, inert) = build_grid(&args, &mut sim);
        println!(
            "Built {0}x{0} grid: {1} combustibles, {2} inert objects, {3:.1}m spacing",
            args.grid_size, flammable, inert, args.spacing
        );
        IgnitionSource::new(
            Vec3::zeros(),
            IgnitionSourceConfig {
                start_radius: args.start_radius,
                fire_size: parse_fire_size(&args.fire_size),
            },
        )
    };

    match source.activate(&mut sim) {
        Ok(ignited) => println!(
            "Ignition source at {:?} lit {} object(s)\n",
            source.position(),
            ignited.len()
        ),
        Err(e) => error!("Ignition source failed: {}", e),
    }

    // Extinguisher walks from one edge of the area to the other
    let sweep_extent = (args.grid_size as f32 * args.spacing / 2.0).max(5.0);
    let sweep_speed = 1.5;
    let mut agent = SuppressionAgent::new(SuppressionAgentConfig {
        reach: 6.0,
        cone_half_angle_deg: 45.0,
        ..SuppressionAgentConfig::default()
    });
    agent.grab();
    agent.steer(Vector2::new(0.0, 1.0));

    let mut renderer = ConsoleRenderer::default();

    println!("Running simulation...\n");
    println!("Time(s) | Igniting | Burning | Extinguishing | Extinguished | Effects | Mean I");
    println!("--------|----------|---------|---------------|--------------|---------|-------");

    let mut time = 0.0;
    let mut next_report = 0.0;
    let mut spread_waves = 0u32;

    while time < args.duration {
        if let Some(start) = args.extinguish_at {
            if time >= start {
                let walked = (time - start) * sweep_speed;
                let x = -sweep_extent + walked;
                if x <= sweep_extent {
                    let direction = agent.direction();
                    agent.set_pose(Vec3::new(x, 1.0, -sweep_extent - 2.0), direction);
                    agent.set_trigger(1.0);
                } else {
                    agent.set_trigger(0.0);
                }
            }
        }
        if let Err(e) = agent.spray(&mut sim, args.dt) {
            warn!("Spray failed: {}", e);
        }

        renderer.begin_tick();
        sim.update_with(args.dt, &mut renderer);
        renderer.end_tick();
        time += args.dt;

        for event in sim.drain_events() {
            match event.kind {
                FireEventKind::SpreadAttempted { ignited, .. } if !ignited.is_empty() => {
                    spread_waves += 1;
                }
                FireEventKind::QueryFailed { error } => {
                    warn!(entity = %event.entity, %error, "Spread query failed");
                }
                _ => {}
            }
        }

        if time >= next_report {
            let stats = sim.stats();
            println!(
                "{:7.1} | {:8} | {:7} | {:13} | {:12} | {:7} | {:6.2}",
                time,
                stats.igniting,
                stats.burning,
                stats.extinguishing,
                stats.extinguished,
                renderer.live,
                renderer.mean_intensity()
            );
            next_report += args.report_interval;
        }

        let stats = sim.stats();
        let quiet = stats.igniting + stats.burning + stats.extinguishing == 0;
        if quiet && sim.scheduler().is_empty() {
            info!(time, "Fire activity ended");
            break;
        }
    }

    let stats = sim.stats();
    println!("\n=== Simulation Complete ===");
    println!("Final time: {}", stats.simulation_time);
    println!("Total ignitions: {}", stats.totals.ignitions);
    println!("Spread ignitions: {}", stats.totals.spread_ignitions);
    println!("Spread waves: {}", spread_waves);
    println!("Extinguished: {}", stats.totals.extinguished);
    println!("Aborted ignitions: {}", stats.totals.aborted);
    println!("Peak live effects: {}", renderer.peak_live);
    println!("Effects torn down: {}", renderer.destroyed);
    println!(
        "Untouched combustibles: {} of {}",
        stats.idle, stats.flammable
    );
}
