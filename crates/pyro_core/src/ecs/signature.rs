//! # Signatures
//!
//! A signature is a fixed-width capability bitset. It keys archetypes
//! (two entities share an archetype iff their signatures are equal) and
//! filters systems (a system visits an archetype iff the archetype's
//! signature [`matches`](Signature::matches) the system's requirement).

use std::fmt;

/// One capability bit. The set is closed; there are no runtime-defined flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    /// Carries a [`DeathTime`](super::DeathTime).
    DeathTime = 0,
    /// Carries a [`Fades`](super::Fades).
    Fades = 1,
    /// Carries an [`Explodes`](super::Explodes).
    Explodes = 2,
    /// Carries a [`Graphics`](super::Graphics).
    Graphics = 3,
    /// Carries a [`Position`](super::Position).
    Position = 4,
    /// Carries a [`Velocity`](super::Velocity).
    Velocity = 5,
    /// Pulled down by gravity. Flag only, no component array.
    FeelsGravity = 6,
}

impl Capability {
    /// Number of capability bits.
    pub const COUNT: usize = 7;

    /// Every capability, in bit order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::DeathTime,
        Self::Fades,
        Self::Explodes,
        Self::Graphics,
        Self::Position,
        Self::Velocity,
        Self::FeelsGravity,
    ];

    /// Bit index of this capability.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Named boolean flags for building a [`Signature`].
///
/// ```rust
/// use pyro_core::{Signature, SignatureFlags};
///
/// let sig = Signature::new(SignatureFlags {
///     has_position: true,
///     has_velocity: true,
///     ..SignatureFlags::default()
/// });
/// assert!(sig.matches(Signature::new(SignatureFlags {
///     has_position: true,
///     ..SignatureFlags::default()
/// })));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureFlags {
    /// Has a death time.
    pub has_death_time: bool,
    /// Has a fade rule.
    pub has_fades: bool,
    /// Explodes on death.
    pub has_explodes: bool,
    /// Has graphics.
    pub has_graphics: bool,
    /// Has a position.
    pub has_position: bool,
    /// Has a velocity.
    pub has_velocity: bool,
    /// Feels gravity.
    pub feels_gravity: bool,
}

/// Capability bitset. See the [module docs](self).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u8);

impl Signature {
    /// The empty signature. Matched by every signature.
    pub const EMPTY: Self = Self(0);

    /// Builds a signature from named flags.
    #[must_use]
    pub const fn new(flags: SignatureFlags) -> Self {
        Self::EMPTY
            .with_if(Capability::DeathTime, flags.has_death_time)
            .with_if(Capability::Fades, flags.has_fades)
            .with_if(Capability::Explodes, flags.has_explodes)
            .with_if(Capability::Graphics, flags.has_graphics)
            .with_if(Capability::Position, flags.has_position)
            .with_if(Capability::Velocity, flags.has_velocity)
            .with_if(Capability::FeelsGravity, flags.feels_gravity)
    }

    /// Builds a signature from a list of capabilities.
    #[must_use]
    pub const fn of(capabilities: &[Capability]) -> Self {
        let mut sig = Self::EMPTY;
        let mut i = 0;
        while i < capabilities.len() {
            sig = sig.with(capabilities[i]);
            i += 1;
        }
        sig
    }

    /// Returns a copy with `capability` set.
    #[inline]
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.mask())
    }

    /// Returns a copy with `capability` cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, capability: Capability) -> Self {
        Self(self.0 & !capability.mask())
    }

    #[inline]
    const fn with_if(self, capability: Capability, on: bool) -> Self {
        if on {
            self.with(capability)
        } else {
            self
        }
    }

    /// Indexed bit read.
    #[inline]
    #[must_use]
    pub const fn has(self, capability: Capability) -> bool {
        self.0 & capability.mask() != 0
    }

    /// Indexed bit write.
    #[inline]
    pub fn set(&mut self, capability: Capability, on: bool) {
        *self = if on {
            self.with(capability)
        } else {
            self.without(capability)
        };
    }

    /// Subset test: true iff every capability in `required` is also in `self`.
    #[inline]
    #[must_use]
    pub const fn matches(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Raw bits, capability `i` at bit `i`.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Number of capabilities set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no capability is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the capabilities that are set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl From<SignatureFlags> for Signature {
    fn from(flags: SignatureFlags) -> Self {
        Self::new(flags)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
