//! Death system: removes every entity whose death frame has arrived.

use crate::ecs::{
    ArchetypeId, ArchetypeStore, Capability, EntityHandle, Frame, RemovedEntity, Signature,
};

/// Archetypes visited by this system.
pub const REQUIRES: Signature = Signature::of(&[Capability::DeathTime]);

/// Removes entities with `frame >= dead_frame`, pushing a snapshot of each
/// into `killed` (cleared first). Returns the number removed.
pub fn run(store: &mut ArchetypeStore, frame: Frame, killed: &mut Vec<RemovedEntity>) -> usize {
    killed.clear();

    for index in 0..store.archetypes().len() {
        if !store.archetypes()[index].matches(REQUIRES) {
            continue;
        }
        let id = ArchetypeId(index as u32);

        let mut slot = 0;
        while slot < store.archetypes()[index].len() {
            if frame >= store.archetypes()[index].death_times()[slot].dead_frame {
                // Swap-pop refills `slot` with the former last entity; look at it again.
                killed.push(store.remove_entity(EntityHandle::new(id, slot)));
            } else {
                slot += 1;
            }
        }
    }

    tracing::trace!(frame, removed = killed.len(), "death system");
    killed.len()
}
