//! # PYRO Core Engine
//!
//! Archetype-based Entity Component System driving a fireworks particle
//! simulation. Rockets rise, die, burst into a flash plus colored debris,
//! fade, and fall under gravity. Every call to [`World::step`] advances the
//! population by one tick and hands back a fresh draw list.
//!
//! ## Architecture Rules
//!
//! 1. **Archetype storage** - entities sharing a [`Signature`] live in one
//!    [`Archetype`] as parallel dense arrays, one per component kind
//! 2. **Fixed pipeline** - death, explosion, fade, move, gravity, spawn,
//!    draw extraction; always in that order
//! 3. **A tick never fails** - capacity exhaustion is a silent no-op,
//!    counted in [`Diagnostics`]
//! 4. **One random stream** - owned by the world, seeded once
//!
//! ## Example
//!
//! ```rust
//! use pyro_core::World;
//!
//! let mut world = World::with_seed(512, 42);
//! for frame in 0..120 {
//!     let drawables = world.step(frame, 1.0 / 15.0, 16);
//!     assert!(drawables.len() <= world.size());
//! }
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod diagnostics;
pub mod ecs;
pub mod error;
pub mod systems;

pub use config::{SimulationConfig, SimulationParams};
pub use diagnostics::Diagnostics;
pub use ecs::{
    Archetype, ArchetypeId, ArchetypeStore, Capability, Color, Component, Components, DeathTime,
    Drawable, EntityHandle, Explodes, Fades, Frame, Graphics, Position, RemovedEntity, Signature,
    SignatureFlags, Velocity, World,
};
pub use error::{ConfigError, ConfigResult, SpawnError, SpawnResult};
