//! # Simulation Configuration
//!
//! All tuning lives in TOML, loaded once at startup. Every field has a
//! default, so an empty file is a valid config.
//!
//! ```toml
//! capacity = 1024
//! seed = 7
//! spawn_rate = 0.1
//! explosion_particles = 24
//!
//! [params]
//! gravity = 0.0004
//! flash_lifetime = [12, 28]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Constants used by the tick pipeline.
///
/// Two-element arrays are `[min, max]`. Integer ranges are inclusive; float
/// ranges are half-open except `screen_cross_fraction`, whose ends are
/// truncated to whole ticks and then treated as inclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParams {
    /// Subtracted from `velocity.dy` each tick for gravity-bound entities.
    pub gravity: f32,
    /// Launch speed of explosion debris.
    pub debris_speed: f32,
    /// Flash lifetime in ticks.
    pub flash_lifetime: [u32; 2],
    /// Lifetime at which a flash has scale 1.
    pub flash_scale_reference: f32,
    /// Flash alpha fade rate at scale 1.
    pub flash_alpha_rate: f32,
    /// Floor for flash and debris alpha.
    pub flash_alpha_min: u8,
    /// Flash accent-channel fade rate at scale 1.
    pub flash_accent_rate: f32,
    /// Floor for the faded accent channel.
    pub flash_accent_min: u8,
    /// Flash radius at scale 1.
    pub flash_radius: f32,
    /// Debris radius at scale 1.
    pub debris_radius: f32,
    /// Debris lifetime as a multiple of the flash lifetime.
    pub debris_lifetime_multiplier: f32,
    /// Extra debris lifetime in ticks.
    pub debris_extra_lifetime: [u32; 2],
    /// Rocket rise speed per tick.
    pub rise_speed: [f32; 2],
    /// Share of the screen a rocket crosses before dying.
    pub screen_cross_fraction: [f32; 2],
    /// Rocket horizontal start position.
    pub spawn_x: [f32; 2],
    /// Rocket radius.
    pub rocket_radius: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gravity: 0.0003,
            debris_speed: 0.01,
            flash_lifetime: [10, 30],
            flash_scale_reference: 10.0,
            flash_alpha_rate: 30.0,
            flash_alpha_min: 50,
            flash_accent_rate: 40.0,
            flash_accent_min: 100,
            flash_radius: 0.03,
            debris_radius: 0.015,
            debris_lifetime_multiplier: 1.5,
            debris_extra_lifetime: [0, 10],
            rise_speed: [0.01, 0.025],
            screen_cross_fraction: [0.6, 0.95],
            spawn_x: [0.05, 0.95],
            rocket_radius: 0.02,
        }
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_positive(name: &str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and > 0, got {value}")))
    }
}

fn check_open_range(name: &str, [min, max]: [f32; 2]) -> ConfigResult<()> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(invalid(format!("{name} must satisfy min < max, got [{min}, {max}]")))
    }
}

impl SimulationParams {
    /// Rejects values the pipeline cannot sample from.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite"));
        }
        check_positive("debris_speed", self.debris_speed)?;
        check_positive("flash_scale_reference", self.flash_scale_reference)?;
        check_positive("flash_radius", self.flash_radius)?;
        check_positive("debris_radius", self.debris_radius)?;
        check_positive("rocket_radius", self.rocket_radius)?;
        for (name, value) in [
            ("flash_alpha_rate", self.flash_alpha_rate),
            ("flash_accent_rate", self.flash_accent_rate),
            ("debris_lifetime_multiplier", self.debris_lifetime_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }

        let [life_min, life_max] = self.flash_lifetime;
        if life_min == 0 || life_min > life_max {
            return Err(invalid(format!(
                "flash_lifetime must satisfy 1 <= min <= max, got [{life_min}, {life_max}]"
            )));
        }
        let [extra_min, extra_max] = self.debris_extra_lifetime;
        if extra_min > extra_max {
            return Err(invalid(format!(
                "debris_extra_lifetime must satisfy min <= max, got [{extra_min}, {extra_max}]"
            )));
        }

        check_open_range("rise_speed", self.rise_speed)?;
        check_positive("rise_speed min", self.rise_speed[0])?;
        check_open_range("spawn_x", self.spawn_x)?;

        let [cross_min, cross_max] = self.screen_cross_fraction;
        if !(cross_min.is_finite() && cross_max.is_finite() && cross_min >= 0.0 && cross_min <= cross_max) {
            return Err(invalid(format!(
                "screen_cross_fraction must satisfy 0 <= min <= max, got [{cross_min}, {cross_max}]"
            )));
        }
        Ok(())
    }
}

/// Everything needed to build and drive a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Maximum live entities.
    pub capacity: usize,
    /// Fixed seed for replay. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Expected rockets per tick.
    pub spawn_rate: f32,
    /// Debris requested per explosion.
    pub explosion_particles: u32,
    /// Ticks the headless driver runs.
    pub ticks: u64,
    /// Ticks between driver reports.
    pub report_interval: u64,
    /// Pipeline constants.
    pub params: SimulationParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 512,
            seed: None,
            spawn_rate: 1.0 / 15.0,
            explosion_particles: 16,
            ticks: 3600,
            report_interval: 60,
            params: SimulationParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML or unknown fields,
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the driver or pipeline cannot use.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(invalid(format!(
                "spawn_rate must be finite and >= 0, got {}",
                self.spawn_rate
            )));
        }
        if self.ticks == 0 {
            return Err(invalid("ticks must be > 0"));
        }
        if self.report_interval == 0 {
            return Err(invalid("report_interval must be > 0"));
        }
        self.params.validate()
    }
}
