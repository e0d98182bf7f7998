//! # Systems
//!
//! Stateless functions over the archetype store. Each one filters
//! archetypes by a required [`Signature`] and reads or writes the matching
//! arrays directly.
//!
//! [`World::step`](crate::World::step) runs them in this fixed order:
//!
//! ```text
//! 1. death      DeathTime                    remove expired, snapshot them
//! 2. explosion  (killed) Explodes+Graphics+Position   flash + debris
//! 3. fade       Fades+Graphics               channel = max(c - rate, min)
//! 4. movement   Position+Velocity            position += velocity
//! 5. gravity    Velocity+FeelsGravity        velocity.dy -= G
//! 6. spawn      -                            new rockets
//! 7. draw       Graphics+Position            emit the draw list
//! ```

pub mod death;
pub mod draw;
pub mod explosion;
pub mod fade;
pub mod gravity;
pub mod movement;
pub mod spawn;

use crate::diagnostics::Diagnostics;
use crate::ecs::{ArchetypeStore, Components, Signature};
use crate::error::SpawnError;

/// Inserts a pipeline-created entity. Returns false if the world is full.
pub(crate) fn spawn_entity(
    store: &mut ArchetypeStore,
    signature: Signature,
    components: Components,
    diag: &mut Diagnostics,
) -> bool {
    match store.add_entity(signature, components) {
        Ok(_) => {
            diag.spawned += 1;
            true
        }
        Err(SpawnError::CapacityExhausted { .. }) => false,
        Err(err @ SpawnError::SignatureMismatch { .. }) => {
            tracing::error!(%err, "pipeline built a malformed entity");
            false
        }
    }
}
