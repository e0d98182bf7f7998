//! # PYRO Headless
//!
//! Runs the fireworks simulation without a renderer and logs population and
//! step timing.
//!
//! Usage: `pyro_headless [config.toml]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`; `debug` logs every tick).

use std::process::ExitCode;

use pyro_core::SimulationConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_file(&path),
        None => Ok(SimulationConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        capacity = config.capacity,
        ticks = config.ticks,
        spawn_rate = config.spawn_rate,
        explosion_particles = config.explosion_particles,
        "starting headless run"
    );

    match pyro::run(&config) {
        Ok(summary) => {
            tracing::info!(
                seed = summary.seed,
                peak_live = summary.overall.peak_live,
                final_live = summary.final_live,
                avg_step_us = summary.overall.average_step().as_micros() as u64,
                max_step_us = summary.overall.max_step.as_micros() as u64,
                "summary"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "invalid config");
            ExitCode::FAILURE
        }
    }
}
