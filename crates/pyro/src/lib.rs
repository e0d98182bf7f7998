//! # PYRO Headless Driver
//!
//! Stands in for the interactive frame loop: advances a [`World`] one frame
//! per step and reports population and timing per interval. Rendering,
//! windowing and frame pacing are left to whatever consumes the draw list.

use std::time::{Duration, Instant};

use pyro_core::{ConfigResult, Diagnostics, Drawable, SimulationConfig, World};

/// Population and timing over one report interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntervalStats {
    /// Frames stepped in this interval.
    pub frames: u64,
    /// Highest live entity count after any step.
    pub peak_live: usize,
    /// Highest draw-list length.
    pub peak_drawables: usize,
    /// Summed step time.
    pub total_step: Duration,
    /// Slowest step.
    pub max_step: Duration,
}

impl IntervalStats {
    /// Folds one step into the interval.
    pub fn record(&mut self, live: usize, drawables: usize, elapsed: Duration) {
        self.frames += 1;
        self.peak_live = self.peak_live.max(live);
        self.peak_drawables = self.peak_drawables.max(drawables);
        self.total_step += elapsed;
        self.max_step = self.max_step.max(elapsed);
    }

    /// Mean step time, zero for an empty interval.
    #[must_use]
    pub fn average_step(&self) -> Duration {
        u32::try_from(self.frames)
            .ok()
            .filter(|&n| n > 0)
            .map_or(Duration::ZERO, |n| self.total_step / n)
    }
}

/// Outcome of a full run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Seed the world ran with.
    pub seed: u64,
    /// Whole-run statistics.
    pub overall: IntervalStats,
    /// One entry per completed or trailing report interval.
    pub intervals: Vec<IntervalStats>,
    /// Live entities after the last frame.
    pub final_live: usize,
    /// Pipeline counters at the end of the run.
    pub diagnostics: Diagnostics,
}

/// Steps a world built from `config` for `config.ticks` frames.
///
/// Logs each interval at `info` level as it closes.
///
/// # Errors
///
/// Returns an error if the config fails validation.
pub fn run(config: &SimulationConfig) -> ConfigResult<RunSummary> {
    let mut world = World::from_config(config)?;
    let mut drawables: Vec<Drawable> = Vec::with_capacity(config.capacity);

    let mut overall = IntervalStats::default();
    let mut interval = IntervalStats::default();
    let mut intervals = Vec::new();

    for frame in 0..config.ticks {
        let start = Instant::now();
        world.step_into(
            frame,
            config.spawn_rate,
            config.explosion_particles,
            &mut drawables,
        );
        let elapsed = start.elapsed();

        overall.record(world.size(), drawables.len(), elapsed);
        interval.record(world.size(), drawables.len(), elapsed);

        if (frame + 1) % config.report_interval == 0 {
            log_interval(frame, &interval);
            intervals.push(std::mem::take(&mut interval));
        }
    }
    if interval.frames > 0 {
        log_interval(config.ticks - 1, &interval);
        intervals.push(interval);
    }

    let diag = *world.diagnostics();
    tracing::info!(
        ticks = diag.ticks,
        spawned = diag.spawned,
        killed = diag.killed,
        explosions = diag.explosions,
        rockets_dropped = diag.rockets_dropped,
        debris_dropped = diag.debris_dropped,
        explosions_skipped = diag.explosions_skipped,
        "run complete"
    );
    if diag.hit_capacity() {
        tracing::warn!(
            capacity = config.capacity,
            "population hit capacity; raise `capacity` to avoid dropped particles"
        );
    }

    Ok(RunSummary {
        seed: world.seed(),
        overall,
        intervals,
        final_live: world.size(),
        diagnostics: diag,
    })
}

fn log_interval(frame: u64, stats: &IntervalStats) {
    tracing::info!(
        frame,
        peak_live = stats.peak_live,
        peak_drawables = stats.peak_drawables,
        avg_step_us = stats.average_step().as_micros() as u64,
        max_step_us = stats.max_step.as_micros() as u64,
        "interval"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_stats() {
        let mut stats = IntervalStats::default();
        assert_eq!(stats.average_step(), Duration::ZERO);
        stats.record(3, 2, Duration::from_micros(10));
        stats.record(7, 5, Duration::from_micros(30));
        stats.record(1, 1, Duration::from_micros(20));
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.peak_live, 7);
        assert_eq!(stats.peak_drawables, 5);
        assert_eq!(stats.max_step, Duration::from_micros(30));
        assert_eq!(stats.average_step(), Duration::from_micros(20));
    }

    #[test]
    fn test_run_splits_intervals() {
        let config = SimulationConfig {
            capacity: 64,
            seed: Some(3),
            ticks: 25,
            report_interval: 10,
            ..SimulationConfig::default()
        };
        let summary = run(&config).unwrap();
        assert_eq!(summary.seed, 3);
        assert_eq!(summary.overall.frames, 25);
        let frames: Vec<u64> = summary.intervals.iter().map(|i| i.frames).collect();
        assert_eq!(frames, [10, 10, 5]);
        assert!(summary.overall.peak_live <= 64);
        assert!(summary.final_live <= summary.overall.peak_live);
    }

    #[test]
    fn test_run_reports_capacity_pressure() {
        let crowded = SimulationConfig {
            capacity: 2,
            seed: Some(1),
            spawn_rate: 3.0,
            ticks: 5,
            ..SimulationConfig::default()
        };
        let summary = run(&crowded).unwrap();
        assert!(summary.diagnostics.hit_capacity());
        assert_eq!(summary.diagnostics.ticks, 5);

        let roomy = SimulationConfig {
            capacity: 512,
            seed: Some(1),
            spawn_rate: 0.1,
            ticks: 5,
            ..SimulationConfig::default()
        };
        assert!(!run(&roomy).unwrap().diagnostics.hit_capacity());
    }

    #[test]
    fn test_bundled_config_parses() {
        let config = SimulationConfig::from_toml_str(include_str!("../pyro.toml")).unwrap();
        assert_eq!(config.capacity, 512);
        assert_eq!(config.seed, None);
        assert_eq!(config.report_interval, 60);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = SimulationConfig {
            report_interval: 0,
            ..SimulationConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
