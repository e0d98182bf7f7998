//! Draw system: flattens everything visible into a [`Drawable`] list.

use crate::ecs::{ArchetypeStore, Capability, Drawable, Signature};

/// Archetypes visited by this system.
pub const REQUIRES: Signature = Signature::of(&[Capability::Graphics, Capability::Position]);

/// Replaces the contents of `out` with one record per visible entity.
///
/// Order follows archetype creation order, then slot order.
pub fn run(store: &ArchetypeStore, out: &mut Vec<Drawable>) {
    out.clear();
    out.reserve(store.len());
    for archetype in store.matching(REQUIRES) {
        out.extend(
            archetype
                .graphics()
                .iter()
                .zip(archetype.positions())
                .map(|(g, p)| Drawable {
                    color: g.color,
                    radius: g.radius,
                    x: p.x,
                    y: p.y,
                }),
        );
    }
}
