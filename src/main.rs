mod config;
mod core;
mod error;
mod particle;
mod random;
mod render;
mod scheduler;
mod spatial;
mod spawner;
mod types;
mod ui;

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{config::Settings, types::MotionMode};

#[derive(Parser)]
#[command(name = "particlefield")]
#[command(about = "Animated particle field in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Target number of live particles
    #[arg(long, default_value_t = config::DEFAULT_POPULATION)]
    population: usize,

    /// Stop after this many frames (runs until quit when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Motion policy
    #[arg(long, value_enum, default_value_t = MotionMode::Social)]
    mode: MotionMode,

    /// Delay between consecutive spawns, in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_FREQUENCY_MS)]
    frequency_ms: u64,

    /// Multiplier applied to every particle's speed
    #[arg(long, default_value_t = config::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            population: cli.population,
            frame_limit: cli.frames,
            mode: cli.mode,
            frequency_ms: cli.frequency_ms,
            temperature: cli.temperature,
            seed: cli.seed,
            log_file: cli.log_file,
        }
    }
}

fn main() -> Result<()> {
    let settings: Settings = Cli::parse().into();
    settings.validate()?;
    init_logging(&settings)?;
    ui::run(&settings)
}

fn init_logging(settings: &Settings) -> Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
