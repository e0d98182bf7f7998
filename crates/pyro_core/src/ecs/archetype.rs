//! # Archetype-based Entity Storage
//!
//! Entities with the same [`Signature`] are stored together, one dense array
//! per component kind:
//!
//! ```text
//! Archetype {DeathTime, Graphics, Position}:
//! death_time: [D0, D1, D2, ...]
//! graphics:   [G0, G1, G2, ...]
//! position:   [P0, P1, P2, ...]
//! velocity:   []                  <- unclaimed, stays empty
//! ```
//!
//! Systems iterate the arrays linearly with no per-entity dispatch.
//!
//! ## Removal
//!
//! Removal is swap-pop: the last entity moves into the vacated slot and every
//! array shrinks by one. Array order is not preserved, and any traversal by
//! increasing index must re-examine the current index after a removal.

use super::component::{Component, DeathTime, Explodes, Fades, Graphics, Position, Velocity};
use super::signature::{Capability, Signature};
use crate::error::{SpawnError, SpawnResult};

/// Per-component optional values for one entity.
///
/// Used both to create an entity and as the payload of a removal snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Components {
    /// Death time, if claimed.
    pub death_time: Option<DeathTime>,
    /// Fade rule, if claimed.
    pub fades: Option<Fades>,
    /// Explosion, if claimed.
    pub explodes: Option<Explodes>,
    /// Graphics, if claimed.
    pub graphics: Option<Graphics>,
    /// Position, if claimed.
    pub position: Option<Position>,
    /// Velocity, if claimed.
    pub velocity: Option<Velocity>,
}

impl Components {
    /// Signature implied by which values are present.
    ///
    /// Never includes [`Capability::FeelsGravity`], which has no data.
    #[must_use]
    pub fn signature(&self) -> Signature {
        let mut sig = Signature::EMPTY;
        sig.set(Capability::DeathTime, self.death_time.is_some());
        sig.set(Capability::Fades, self.fades.is_some());
        sig.set(Capability::Explodes, self.explodes.is_some());
        sig.set(Capability::Graphics, self.graphics.is_some());
        sig.set(Capability::Position, self.position.is_some());
        sig.set(Capability::Velocity, self.velocity.is_some());
        sig
    }

    /// True if exactly the data-carrying capabilities of `signature` are present.
    #[must_use]
    pub fn fits(&self, signature: Signature) -> bool {
        self.signature() == signature.without(Capability::FeelsGravity)
    }
}

/// Full snapshot of an entity taken out of an archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemovedEntity {
    /// Signature of the archetype it lived in.
    pub signature: Signature,
    /// The evicted component values.
    pub components: Components,
}

impl RemovedEntity {
    /// Delegates to [`Signature::matches`].
    #[inline]
    #[must_use]
    pub const fn matches(&self, required: Signature) -> bool {
        self.signature.matches(required)
    }
}

/// All entities sharing one signature, stored as parallel dense arrays.
///
/// Invariant: every array the signature claims has length [`len`](Self::len);
/// every other array is empty.
#[derive(Debug, Clone)]
pub struct Archetype {
    signature: Signature,
    len: usize,
    death_time: Vec<DeathTime>,
    fades: Vec<Fades>,
    explodes: Vec<Explodes>,
    graphics: Vec<Graphics>,
    position: Vec<Position>,
    velocity: Vec<Velocity>,
}

fn reserve_claimed<C: Component>(signature: Signature, column: &mut Vec<C>, capacity: usize) {
    if signature.has(C::CAPABILITY) {
        column.reserve(capacity);
    }
}

fn push_claimed<C: Component>(column: &mut Vec<C>, value: Option<C>) {
    if let Some(value) = value {
        column.push(value);
    }
}

fn swap_pop_claimed<C: Component>(signature: Signature, column: &mut Vec<C>, slot: usize) -> Option<C> {
    signature.has(C::CAPABILITY).then(|| column.swap_remove(slot))
}

impl Archetype {
    /// Creates an empty archetype, reserving `capacity` rows in each claimed array.
    #[must_use]
    pub fn new(signature: Signature, capacity: usize) -> Self {
        let mut archetype = Self {
            signature,
            len: 0,
            death_time: Vec::new(),
            fades: Vec::new(),
            explodes: Vec::new(),
            graphics: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
        };
        reserve_claimed(signature, &mut archetype.death_time, capacity);
        reserve_claimed(signature, &mut archetype.fades, capacity);
        reserve_claimed(signature, &mut archetype.explodes, capacity);
        reserve_claimed(signature, &mut archetype.graphics, capacity);
        reserve_claimed(signature, &mut archetype.position, capacity);
        reserve_claimed(signature, &mut archetype.velocity, capacity);
        archetype
    }

    /// Signature identifying this archetype.
    #[inline]
    #[must_use]
    pub const fn signature(&self) -> Signature {
        self.signature
    }

    /// Number of entities stored.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if no entities are stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delegates to [`Signature::matches`].
    #[inline]
    #[must_use]
    pub const fn matches(&self, required: Signature) -> bool {
        self.signature.matches(required)
    }

    /// Appends an entity and returns its slot.
    ///
    /// # Errors
    ///
    /// [`SpawnError::SignatureMismatch`] if `components` does not carry
    /// exactly the values this signature claims. Nothing is stored.
    pub fn add_entity(&mut self, components: Components) -> SpawnResult<usize> {
        if !components.fits(self.signature) {
            return Err(SpawnError::SignatureMismatch {
                expected: self.signature,
                provided: components.signature(),
            });
        }

        push_claimed(&mut self.death_time, components.death_time);
        push_claimed(&mut self.fades, components.fades);
        push_claimed(&mut self.explodes, components.explodes);
        push_claimed(&mut self.graphics, components.graphics);
        push_claimed(&mut self.position, components.position);
        push_claimed(&mut self.velocity, components.velocity);

        let slot = self.len;
        self.len += 1;
        debug_assert!(self.is_coherent(), "archetype arrays diverged after add");
        Ok(slot)
    }

    /// Swap-pop removes the entity at `slot` and returns its snapshot.
    ///
    /// The entity formerly at the last slot now occupies `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= self.len()`.
    pub fn remove_entity(&mut self, slot: usize) -> RemovedEntity {
        assert!(slot < self.len, "slot {slot} out of bounds (len {})", self.len);

        let sig = self.signature;
        let components = Components {
            death_time: swap_pop_claimed(sig, &mut self.death_time, slot),
            fades: swap_pop_claimed(sig, &mut self.fades, slot),
            explodes: swap_pop_claimed(sig, &mut self.explodes, slot),
            graphics: swap_pop_claimed(sig, &mut self.graphics, slot),
            position: swap_pop_claimed(sig, &mut self.position, slot),
            velocity: swap_pop_claimed(sig, &mut self.velocity, slot),
        };
        self.len -= 1;
        debug_assert!(self.is_coherent(), "archetype arrays diverged after remove");

        RemovedEntity {
            signature: sig,
            components,
        }
    }

    /// Drops every entity, keeping the allocations.
    pub fn clear(&mut self) {
        self.death_time.clear();
        self.fades.clear();
        self.explodes.clear();
        self.graphics.clear();
        self.position.clear();
        self.velocity.clear();
        self.len = 0;
    }

    /// Checks the equal-length invariant.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        let expect = |cap: Capability, len: usize| {
            if self.signature.has(cap) {
                len == self.len
            } else {
                len == 0
            }
        };
        expect(Capability::DeathTime, self.death_time.len())
            && expect(Capability::Fades, self.fades.len())
            && expect(Capability::Explodes, self.explodes.len())
            && expect(Capability::Graphics, self.graphics.len())
            && expect(Capability::Position, self.position.len())
            && expect(Capability::Velocity, self.velocity.len())
    }

    /// Reads the full component set at `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<Components> {
        if slot >= self.len {
            return None;
        }
        Some(Components {
            death_time: self.death_time.get(slot).copied(),
            fades: self.fades.get(slot).copied(),
            explodes: self.explodes.get(slot).copied(),
            graphics: self.graphics.get(slot).copied(),
            position: self.position.get(slot).copied(),
            velocity: self.velocity.get(slot).copied(),
        })
    }

    // ========================================================================
    // COLUMN ACCESS
    // ========================================================================

    /// Death times (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn death_times(&self) -> &[DeathTime] {
        &self.death_time
    }

    /// Fade rules (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn fades(&self) -> &[Fades] {
        &self.fades
    }

    /// Explosions (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn explodes(&self) -> &[Explodes] {
        &self.explodes
    }

    /// Graphics (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn graphics(&self) -> &[Graphics] {
        &self.graphics
    }

    /// Positions (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.position
    }

    /// Velocities (empty unless claimed).
    #[inline]
    #[must_use]
    pub fn velocities(&self) -> &[Velocity] {
        &self.velocity
    }

    /// Mutable velocities.
    #[inline]
    pub fn velocities_mut(&mut self) -> &mut [Velocity] {
        &mut self.velocity
    }

    /// Fade rules alongside mutable graphics.
    #[inline]
    pub fn fades_and_graphics_mut(&mut self) -> (&[Fades], &mut [Graphics]) {
        (&self.fades, &mut self.graphics)
    }

    /// Mutable positions alongside velocities.
    #[inline]
    pub fn positions_mut_and_velocities(&mut self) -> (&mut [Position], &[Velocity]) {
        (&mut self.position, &self.velocity)
    }
}
