//! # Error Types
//!
//! The tick pipeline itself never fails. These errors surface only at the
//! edges: direct entity insertion and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::Signature;

/// Errors returned when inserting an entity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// The world already holds `capacity` live entities.
    #[error("world at capacity ({capacity} entities)")]
    CapacityExhausted {
        /// Configured entity capacity.
        capacity: usize,
    },

    /// The supplied component values do not match the signature.
    ///
    /// This is a caller bug, not a runtime condition.
    #[error("component values {provided:?} do not match signature {expected:?}")]
    SignatureMismatch {
        /// Signature the entity was declared with.
        expected: Signature,
        /// Signature implied by the values that were actually supplied.
        provided: Signature,
    },
}

/// Result type for entity insertion.
pub type SpawnResult<T> = Result<T, SpawnError>;

/// Errors that can occur while loading a simulation config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
