//! Slope Roller - headless entry point
//!
//! Loads a scene and settings, rolls the ball until it rests, and prints the
//! final pose as JSON.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use slope_roller::{Scene, Settings, Simulation, logging};

/// Roll a ball down a ramp or drawn paths
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene JSON with paths and obstacles (default: empty, uses the ramp)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stop after this many frames even if the ball is still moving
    #[arg(long, default_value_t = 10_000)]
    max_frames: u32,

    /// Ramp angle in degrees, overrides the settings file
    #[arg(long)]
    angle: Option<f32>,

    /// Friction coefficient, overrides the settings file
    #[arg(long)]
    friction: Option<f32>,

    /// Log the ball pose every frame
    #[arg(long)]
    trace: bool,

    /// More log output; repeat for more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("Slope Roller starting...");

    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(angle) = args.angle {
        settings.slope_angle_deg = angle;
    }
    if let Some(friction) = args.friction {
        settings.friction = friction;
    }

    let scene = match &args.scene {
        Some(path) => {
            Scene::load_from(path).with_context(|| format!("loading scene from {}", path.display()))?
        }
        None => Scene::new(),
    };
    log::info!(
        "Scene has {} paths and {} obstacles; slope {}°, friction {}",
        scene.paths.len(),
        scene.obstacles.len(),
        settings.slope_angle_deg,
        settings.friction
    );

    let mut sim = Simulation::new(settings, scene);
    let summary = sim.run_headless(args.max_frames, Instant::now(), args.trace);

    if summary.halted {
        log::info!("Ball at rest after {} frames", summary.frames);
    } else {
        log::warn!("Ball still moving after {} frames", summary.frames);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing run summary")?
    );
    Ok(())
}
