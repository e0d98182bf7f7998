//! # Diagnostics
//!
//! Non-fatal counters. Capacity exhaustion never fails a tick; it only
//! shows up here.

/// Cumulative pipeline counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Ticks stepped.
    pub ticks: u64,
    /// Entities created by the pipeline (rockets, flashes, debris).
    pub spawned: u64,
    /// Entities removed by the death system.
    pub killed: u64,
    /// Killed entities that burst into a flash.
    pub explosions: u64,
    /// Rockets not spawned because the world was full.
    pub rockets_dropped: u64,
    /// Debris not spawned because the world was full.
    pub debris_dropped: u64,
    /// Killed explosive entities left unprocessed because the world was full.
    pub explosions_skipped: u64,
}

impl Diagnostics {
    /// True if any spawn was ever refused for lack of capacity.
    #[must_use]
    pub const fn hit_capacity(&self) -> bool {
        self.rockets_dropped > 0 || self.debris_dropped > 0 || self.explosions_skipped > 0
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
