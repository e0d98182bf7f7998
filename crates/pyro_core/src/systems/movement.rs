//! Movement system: integrates velocity into position.

use crate::ecs::{ArchetypeStore, Capability, Signature};

/// Archetypes visited by this system.
pub const REQUIRES: Signature = Signature::of(&[Capability::Position, Capability::Velocity]);

/// Adds each entity's velocity to its position.
pub fn run(store: &mut ArchetypeStore) {
    for archetype in store.matching_mut(REQUIRES) {
        let (positions, velocities) = archetype.positions_mut_and_velocities();
        for (p, v) in positions.iter_mut().zip(velocities) {
            p.x += v.dx;
            p.y += v.dy;
        }
    }
}
