//! Headless frame driver for the flock.
//!
//! Stands in for a render loop: builds the flock from layered settings, steps
//! it a fixed number of frames, logs aggregate motion and optionally streams
//! per-frame render state as JSON lines.

use anyhow::{bail, Context, Result};
use boid_core::{Bounds, Flock, FlockConfig, FlockStats, NeighborSearch};
use boid_shared::{FlockSettings, FrameSnapshot};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Run a boid flock without a display", long_about = None)]
pub struct Args {
    /// JSON settings file (camelCase keys); command-line values override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    pub frames: u64,

    /// Domain width
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Domain height
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Number of boids
    #[arg(short, long)]
    pub population: Option<usize>,

    /// Separation weight
    #[arg(long)]
    pub separation: Option<f32>,

    /// Alignment weight
    #[arg(long)]
    pub alignment: Option<f32>,

    /// Cohesion weight
    #[arg(long)]
    pub cohesion: Option<f32>,

    /// Global speed cap
    #[arg(long)]
    pub max_speed: Option<f32>,

    /// Seed for the initial placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the spatial grid for neighbour lookups
    #[arg(long)]
    pub grid: bool,

    /// Write a JSON-lines frame snapshot stream to this file
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Snapshot every N frames
    #[arg(long, default_value_t = 1)]
    pub snapshot_every: u64,

    /// Log flock statistics every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    pub stats_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Everything [`run`] needs, resolved from defaults, the settings file and
/// the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub settings: FlockSettings,
    pub bounds: Bounds,
    pub frames: u64,
    pub seed: Option<u64>,
    pub search: NeighborSearch,
    /// `None` disables snapshot output.
    pub snapshot_every: Option<u64>,
    pub stats_every: u64,
}

impl RunnerConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => load_settings(path)?,
            None => FlockSettings::default(),
        };

        if let Some(population) = args.population {
            settings.population = population;
        }
        if let Some(weight) = args.separation {
            settings.separation_weight = weight;
        }
        if let Some(weight) = args.alignment {
            settings.alignment_weight = weight;
        }
        if let Some(weight) = args.cohesion {
            settings.cohesion_weight = weight;
        }
        if let Some(speed) = args.max_speed {
            settings.max_speed = speed;
        }

        let clamped = settings.clamped();
        if clamped != settings {
            log::warn!("Settings clamped to allowed ranges: {:?}", clamped);
        }

        if args.frames == 0 {
            bail!("--frames must be at least 1");
        }
        if !(args.width > 0.0 && args.height > 0.0) {
            bail!(
                "Domain must have positive size, got {}x{}",
                args.width,
                args.height
            );
        }
        if args.snapshot.is_some() && args.snapshot_every == 0 {
            bail!("--snapshot-every must be at least 1");
        }

        Ok(Self {
            settings: clamped,
            bounds: Bounds::new(args.width, args.height),
            frames: args.frames,
            seed: args.seed,
            search: if args.grid {
                NeighborSearch::Grid
            } else {
                NeighborSearch::BruteForce
            },
            snapshot_every: args.snapshot.as_ref().map(|_| args.snapshot_every),
            stats_every: args.stats_every,
        })
    }
}

pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = FlockSettings::from_json(&json)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
    log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// Steps the flock `config.frames` times, writing snapshots to `out` when
/// enabled, and returns the statistics of the final frame.
pub fn run<W: Write>(config: &RunnerConfig, out: &mut W) -> Result<FlockStats> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let flock_config = FlockConfig::from(config.settings);
    let mut flock = Flock::new(config.bounds, flock_config.population_size, &mut rng);
    flock.set_neighbor_search(config.search);

    log::info!(
        "Simulating {} boids for {} frames in {}x{} ({:?})",
        flock.len(),
        config.frames,
        config.bounds.width,
        config.bounds.height,
        config.search
    );

    for frame in 1..=config.frames {
        flock.update(&flock_config);

        if let Some(every) = config.snapshot_every {
            if frame % every == 0 {
                let line = FrameSnapshot::capture(frame, &flock.boids)
                    .to_json_line()
                    .context("Failed to encode frame snapshot")?;
                writeln!(out, "{}", line).context("Failed to write frame snapshot")?;
            }
        }

        if config.stats_every > 0 && frame % config.stats_every == 0 {
            log_stats(frame, &flock.stats());
        }
    }

    let stats = flock.stats();
    log_stats(config.frames, &stats);
    Ok(stats)
}

fn log_stats(frame: u64, stats: &FlockStats) {
    log::info!(
        "frame {}: {} boids, mean speed {:.2}, top speed {:.2}, polarization {:.3}, centroid ({:.1}, {:.1})",
        frame,
        stats.count,
        stats.mean_speed,
        stats.top_speed,
        stats.polarization,
        stats.centroid.x,
        stats.centroid.y
    );
}
