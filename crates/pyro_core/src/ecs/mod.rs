//! # Entity Component System
//!
//! Archetype storage for a fixed, closed set of component kinds.
//!
//! ## Design Philosophy
//!
//! - Entities with the same [`Signature`] share one [`Archetype`]
//! - Components live in dense parallel arrays, one per kind
//! - Systems filter archetypes by signature, never individual entities
//! - Handles are plain indices, invalidated by removal

pub mod archetype;
mod component;
mod entity;
mod signature;
pub mod storage;
mod world;

pub use archetype::{Archetype, Components, RemovedEntity};
pub use component::{
    Color, Component, DeathTime, Drawable, Explodes, Fades, Frame, Graphics, Position, Velocity,
};
pub use entity::{ArchetypeId, EntityHandle};
pub use signature::{Capability, Signature, SignatureFlags};
pub use storage::{ArchetypeStore, DEFAULT_ARCHETYPE_RESERVE};
pub use world::World;
