//! Gravity system.

use crate::ecs::{ArchetypeStore, Capability, Signature};

/// Archetypes visited by this system.
pub const REQUIRES: Signature = Signature::of(&[Capability::Velocity, Capability::FeelsGravity]);

/// Subtracts `gravity` from `dy` of every gravity-bound entity.
pub fn run(store: &mut ArchetypeStore, gravity: f32) {
    for archetype in store.matching_mut(REQUIRES) {
        for v in archetype.velocities_mut() {
            v.dy -= gravity;
        }
    }
}
