//! # Entity Handles
//!
//! Entities have no identity beyond where they are stored. A handle is the
//! pair `(archetype, slot)` and is only good until the next removal from
//! that archetype: swap-pop moves a different entity into the vacated slot.
//!
//! Nothing outside the engine holds an entity across ticks, so no
//! generation table is kept. Persistent external references would need an
//! indirection `index -> {archetype, slot, generation}` instead of raw slots.

/// Index of an archetype inside its store.
///
/// Stable until the store is reset by `set_max_entities`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ArchetypeId(pub u32);

impl ArchetypeId {
    /// Position in the archetype list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Location of a live entity.
///
/// Invalidated by any removal within the same archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    /// Archetype the entity lives in.
    pub archetype: ArchetypeId,
    /// Row within that archetype.
    pub slot: usize,
}

impl EntityHandle {
    /// Creates a handle.
    #[inline]
    #[must_use]
    pub const fn new(archetype: ArchetypeId, slot: usize) -> Self {
        Self { archetype, slot }
    }
}
