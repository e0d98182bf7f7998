//! # Archetype Store
//!
//! Owns every archetype plus the capacity and live-count bookkeeping.
//!
//! The archetype set is small and stable (a handful of shapes for the whole
//! run), so lookup by signature is a linear scan over a `Vec` rather than a
//! hash map.

use super::archetype::{Archetype, Components, RemovedEntity};
use super::entity::{ArchetypeId, EntityHandle};
use super::signature::Signature;
use crate::error::{SpawnError, SpawnResult};

/// Rows reserved per claimed array when an archetype is first created.
pub const DEFAULT_ARCHETYPE_RESERVE: usize = 128;

/// Capacity-bounded collection of archetypes.
#[derive(Debug, Clone)]
pub struct ArchetypeStore {
    archetypes: Vec<Archetype>,
    live_count: usize,
    capacity: usize,
}

impl ArchetypeStore {
    /// Creates an empty store that admits at most `capacity` live entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            archetypes: Vec::new(),
            live_count: 0,
            capacity,
        }
    }

    /// Drops every archetype and entity and sets a new capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.archetypes.clear();
        self.live_count = 0;
        self.capacity = capacity;
    }

    /// Maximum number of live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live_count
    }

    /// True if there are no live entities.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// `len() < capacity()`.
    #[inline]
    #[must_use]
    pub const fn can_add(&self) -> bool {
        self.live_count < self.capacity
    }

    /// Entities that can still be added before hitting capacity.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.live_count)
    }

    /// All archetypes, in creation order.
    #[inline]
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// The archetype with the given id.
    #[inline]
    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    /// Archetypes whose signature matches `required`.
    pub fn matching(&self, required: Signature) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter().filter(move |a| a.matches(required))
    }

    /// Mutable archetypes whose signature matches `required`.
    pub fn matching_mut(&mut self, required: Signature) -> impl Iterator<Item = &mut Archetype> {
        self.archetypes.iter_mut().filter(move |a| a.matches(required))
    }

    /// Finds the archetype with exactly this signature.
    #[must_use]
    pub fn find(&self, signature: Signature) -> Option<ArchetypeId> {
        self.archetypes
            .iter()
            .position(|a| a.signature() == signature)
            .map(|i| ArchetypeId(i as u32))
    }

    /// Adds an entity to the archetype for `signature`, creating it if needed.
    ///
    /// # Errors
    ///
    /// - [`SpawnError::CapacityExhausted`] if the store is full
    /// - [`SpawnError::SignatureMismatch`] if `components` does not fit `signature`
    ///
    /// Neither error changes the store.
    pub fn add_entity(
        &mut self,
        signature: Signature,
        components: Components,
    ) -> SpawnResult<EntityHandle> {
        if !self.can_add() {
            return Err(SpawnError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        if !components.fits(signature) {
            return Err(SpawnError::SignatureMismatch {
                expected: signature,
                provided: components.signature(),
            });
        }

        let id = match self.find(signature) {
            Some(id) => id,
            None => {
                let reserve = self.capacity.min(DEFAULT_ARCHETYPE_RESERVE);
                self.archetypes.push(Archetype::new(signature, reserve));
                tracing::trace!(?signature, "created archetype");
                ArchetypeId((self.archetypes.len() - 1) as u32)
            }
        };

        let slot = self.archetypes[id.index()].add_entity(components)?;
        self.live_count += 1;
        Ok(EntityHandle::new(id, slot))
    }

    /// Swap-pop removes the entity at `handle`.
    ///
    /// Invalidates every other handle into the same archetype.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not point at a live entity.
    pub fn remove_entity(&mut self, handle: EntityHandle) -> RemovedEntity {
        let removed = self.archetypes[handle.archetype.index()].remove_entity(handle.slot);
        self.live_count -= 1;
        removed
    }

    /// Reads the components of a live entity.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<Components> {
        self.archetype(handle.archetype)?.get(handle.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{DeathTime, Position};
    use crate::ecs::signature::Capability;

    fn dot(frame: u64) -> (Signature, Components) {
        (
            Signature::of(&[Capability::DeathTime, Capability::Position]),
            Components {
                death_time: Some(DeathTime { dead_frame: frame }),
                position: Some(Position::new(0.5, 0.5)),
                ..Components::default()
            },
        )
    }

    #[test]
    fn test_store_creation() {
        let store = ArchetypeStore::new(10);
        assert_eq!(store.capacity(), 10);
        assert_eq!(store.len(), 0);
        assert!(store.can_add());
        assert_eq!(store.remaining(), 10);
    }

    #[test]
    fn test_same_signature_shares_archetype() {
        let mut store = ArchetypeStore::new(10);
        let (sig, comps) = dot(1);
        let a = store.add_entity(sig, comps).unwrap();
        let b = store.add_entity(sig, comps).unwrap();
        assert_eq!(a.archetype, b.archetype);
        assert_eq!(b.slot, 1);
        assert_eq!(store.archetypes().len(), 1);

        let gravity_sig = sig.with(Capability::FeelsGravity);
        let c = store.add_entity(gravity_sig, comps).unwrap();
        assert_ne!(c.archetype, a.archetype);
        assert_eq!(store.archetypes().len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_capacity_exhausted_is_noop() {
        let mut store = ArchetypeStore::new(1);
        let (sig, comps) = dot(1);
        store.add_entity(sig, comps).unwrap();

        let other = sig.with(Capability::FeelsGravity);
        assert_eq!(
            store.add_entity(other, comps),
            Err(SpawnError::CapacityExhausted { capacity: 1 })
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.archetypes().len(), 1);
    }

    #[test]
    fn test_mismatch_creates_nothing() {
        let mut store = ArchetypeStore::new(4);
        let (_, comps) = dot(1);
        let wrong = Signature::of(&[Capability::Position]);
        assert!(store.add_entity(wrong, comps).is_err());
        assert!(store.archetypes().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_and_reset() {
        let mut store = ArchetypeStore::new(4);
        let (sig, comps) = dot(7);
        let handle = store.add_entity(sig, comps).unwrap();
        assert_eq!(store.get(handle), Some(comps));

        let removed = store.remove_entity(handle);
        assert_eq!(removed.components, comps);
        assert!(store.is_empty());
        assert!(store.get(handle).is_none());

        store.add_entity(sig, comps).unwrap();
        store.reset(2);
        assert_eq!(store.capacity(), 2);
        assert!(store.is_empty());
        assert!(store.archetypes().is_empty());
    }
}
