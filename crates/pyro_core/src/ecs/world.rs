//! # World
//!
//! Owns the archetype store, the random stream and the scratch buffers, and
//! runs the fixed system pipeline once per [`World::step`].
//!
//! Everything is single-threaded and synchronous. A `World` is `Send`, so
//! it can be moved to a simulation thread, but it is never shared.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::archetype::{Archetype, Components, RemovedEntity};
use super::component::{Drawable, Frame};
use super::entity::EntityHandle;
use super::signature::Signature;
use super::storage::ArchetypeStore;
use crate::config::{SimulationConfig, SimulationParams};
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigResult, SpawnResult};
use crate::systems;

/// The simulation state: entities, random stream, counters.
///
/// # Example
///
/// ```rust
/// use pyro_core::World;
///
/// let mut world = World::with_seed(64, 7);
/// let drawables = world.step(0, 2.0, 8);
/// assert_eq!(drawables.len(), 2);
/// assert_eq!(world.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct World {
    store: ArchetypeStore,
    rng: ChaCha8Rng,
    seed: u64,
    params: SimulationParams,
    diagnostics: Diagnostics,
    /// Snapshots from the death system, consumed by the explosion system.
    /// Empty between ticks; kept only for its allocation.
    killed: Vec<RemovedEntity>,
}

impl World {
    /// Creates an empty world seeded from OS entropy.
    ///
    /// The seed is logged and available from [`seed`](Self::seed).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, OsRng.next_u64(), SimulationParams::default())
    }

    /// Creates an empty world with a fixed seed for deterministic replay.
    #[must_use]
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::build(capacity, seed, SimulationParams::default())
    }

    /// Creates an empty world with custom pipeline constants.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`](crate::ConfigError::Invalid) if `params`
    /// fails validation.
    pub fn with_params(
        capacity: usize,
        seed: Option<u64>,
        params: SimulationParams,
    ) -> ConfigResult<Self> {
        params.validate()?;
        let seed = seed.unwrap_or_else(|| OsRng.next_u64());
        Ok(Self::build(capacity, seed, params))
    }

    /// Creates an empty world from a loaded config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`](crate::ConfigError::Invalid) if the config
    /// fails validation.
    pub fn from_config(config: &SimulationConfig) -> ConfigResult<Self> {
        config.validate()?;
        Self::with_params(config.capacity, config.seed, config.params.clone())
    }

    fn build(capacity: usize, seed: u64, params: SimulationParams) -> Self {
        tracing::info!(capacity, seed, "world created");
        Self {
            store: ArchetypeStore::new(capacity),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            params,
            diagnostics: Diagnostics::default(),
            killed: Vec::new(),
        }
    }

    /// Discards every entity and archetype and sets a new capacity.
    ///
    /// The random stream and diagnostics carry on.
    pub fn set_max_entities(&mut self, capacity: usize) {
        tracing::info!(
            old = self.store.capacity(),
            new = capacity,
            discarded = self.store.len(),
            "entity capacity reset"
        );
        self.store.reset(capacity);
        self.killed.clear();
    }

    /// True if one more entity fits.
    #[inline]
    #[must_use]
    pub const fn can_add(&self) -> bool {
        self.store.can_add()
    }

    /// Inserts an entity with the given signature.
    ///
    /// `FeelsGravity` is taken from `signature` as-is; it has no component
    /// value in `components`.
    ///
    /// # Errors
    ///
    /// See [`ArchetypeStore::add_entity`].
    pub fn add_entity(
        &mut self,
        signature: Signature,
        components: Components,
    ) -> SpawnResult<EntityHandle> {
        self.store.add_entity(signature, components)
    }

    /// Reads a live entity.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<Components> {
        self.store.get(handle)
    }

    /// Advances one tick and returns the draw list.
    ///
    /// Never fails. Running out of capacity only shows up in
    /// [`diagnostics`](Self::diagnostics).
    pub fn step(
        &mut self,
        frame: Frame,
        spawn_rate: f32,
        explosion_particle_count: u32,
    ) -> Vec<Drawable> {
        let mut out = Vec::new();
        self.step_into(frame, spawn_rate, explosion_particle_count, &mut out);
        out
    }

    /// [`step`](Self::step), writing into a reused buffer.
    ///
    /// `out` is cleared first.
    pub fn step_into(
        &mut self,
        frame: Frame,
        spawn_rate: f32,
        explosion_particle_count: u32,
        out: &mut Vec<Drawable>,
    ) {
        let spawned_before = self.diagnostics.spawned;

        let killed = systems::death::run(&mut self.store, frame, &mut self.killed);
        systems::explosion::run(
            &mut self.store,
            &mut self.rng,
            &self.params,
            frame,
            &self.killed,
            &mut self.diagnostics,
        );
        self.killed.clear();
        systems::fade::run(&mut self.store);
        systems::movement::run(&mut self.store);
        systems::gravity::run(&mut self.store, self.params.gravity);
        systems::spawn::run(
            &mut self.store,
            &mut self.rng,
            &self.params,
            frame,
            spawn_rate,
            explosion_particle_count,
            &mut self.diagnostics,
        );
        systems::draw::run(&self.store, out);

        self.diagnostics.ticks += 1;
        self.diagnostics.killed += killed as u64;
        tracing::debug!(
            frame,
            killed,
            spawned = self.diagnostics.spawned - spawned_before,
            live = self.store.len(),
            "tick"
        );
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.store.len()
    }

    /// Maximum live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Entities that can still be added.
    #[inline]
    #[must_use]
    pub const fn remaining_capacity(&self) -> usize {
        self.store.remaining()
    }

    /// Archetypes in creation order.
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        self.store.archetypes()
    }

    /// Number of distinct archetypes created since the last reset.
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.store.archetypes().len()
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &ArchetypeStore {
        &self.store
    }

    /// Pipeline constants.
    #[must_use]
    pub const fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Seed of the random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Cumulative counters.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Zeroes the counters.
    pub fn reset_diagnostics(&mut self) {
        self.diagnostics.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Capability, Color, DeathTime, Explodes, Graphics, Position, Velocity};
    use crate::systems::explosion::{DEBRIS, FLASH};

    fn rocket(dead_frame: Frame, particles: u32) -> Components {
        Components {
            death_time: Some(DeathTime { dead_frame }),
            explodes: Some(Explodes {
                num_particles: particles,
            }),
            graphics: Some(Graphics {
                color: Color::GREEN,
                radius: 0.02,
            }),
            position: Some(Position::new(0.5, 0.5)),
            velocity: Some(Velocity::new(0.0, 0.01)),
            ..Components::default()
        }
    }

    #[test]
    fn test_new_world_is_empty() {
        let world = World::with_seed(16, 1);
        assert_eq!(world.size(), 0);
        assert_eq!(world.capacity(), 16);
        assert_eq!(world.remaining_capacity(), 16);
        assert_eq!(world.archetype_count(), 0);
        assert_eq!(world.seed(), 1);
        assert!(world.can_add());
    }

    #[test]
    fn test_seed_is_recorded_for_os_entropy() {
        let world = World::new(4);
        let mut replay = World::with_seed(4, world.seed());
        let mut first = world;
        for frame in 0..50 {
            assert_eq!(first.step(frame, 0.5, 4), replay.step(frame, 0.5, 4));
        }
    }

    #[test]
    fn test_explosion_in_same_tick_as_death() {
        let mut world = World::with_seed(64, 3);
        world
            .add_entity(crate::systems::spawn::ROCKET, rocket(5, 6))
            .unwrap();

        let drawables = world.step(4, 0.0, 0);
        assert_eq!(drawables.len(), 1);

        let drawables = world.step(5, 0.0, 0);
        assert_eq!(world.size(), 7);
        assert_eq!(drawables.len(), 7);
        assert!(drawables.iter().all(|d| d.color.g == 255 || d.color.b == 255));

        let flash = &world.archetypes()[world.store().find(FLASH).unwrap().index()];
        assert_eq!(flash.len(), 1);
        let debris = &world.archetypes()[world.store().find(DEBRIS).unwrap().index()];
        assert_eq!(debris.len(), 6);
        assert!(debris.signature().has(Capability::FeelsGravity));
        assert_eq!(world.diagnostics().explosions, 1);
        assert_eq!(world.diagnostics().killed, 1);
    }

    #[test]
    fn test_killed_snapshots_not_retained_between_ticks() {
        let mut world = World::with_seed(64, 3);
        world
            .add_entity(crate::systems::spawn::ROCKET, rocket(2, 4))
            .unwrap();
        world.step(2, 0.0, 0);
        assert_eq!(world.diagnostics().killed, 1);
        assert!(world.killed.is_empty());
    }

    #[test]
    fn test_steps_near_frame_limit() {
        let mut world = World::with_seed(4, 1);
        let start = u64::MAX - 5;
        world.step(start, 1.0, 3);
        assert_eq!(world.size(), 1);

        let rocket = world.archetypes()[0].death_times()[0];
        assert_eq!(rocket.dead_frame, u64::MAX);

        for frame in start + 1..u64::MAX {
            world.step(frame, 0.0, 3);
            assert_eq!(world.size(), 1);
        }
        // The rocket dies on the last frame, bursting into a flash and debris.
        world.step(u64::MAX, 0.0, 3);
        assert_eq!(world.diagnostics().explosions, 1);
        assert_eq!(world.size(), 4);
        for archetype in world.archetypes() {
            assert!(archetype.death_times().iter().all(|d| d.dead_frame == u64::MAX));
        }
    }

    #[test]
    fn test_set_max_entities_discards_everything() {
        let mut world = World::with_seed(32, 9);
        for frame in 0..10 {
            world.step(frame, 1.0, 4);
        }
        assert!(world.size() > 0);

        world.set_max_entities(0);
        assert_eq!(world.size(), 0);
        assert_eq!(world.capacity(), 0);
        assert_eq!(world.archetype_count(), 0);

        let drawables = world.step(10, 3.0, 4);
        assert!(drawables.is_empty());
        assert_eq!(world.size(), 0);
        assert!(world.diagnostics().rockets_dropped >= 3);
    }

    #[test]
    fn test_step_into_reuses_buffer() {
        let mut world = World::with_seed(32, 2);
        let mut out = Vec::with_capacity(64);
        world.step_into(0, 2.0, 0, &mut out);
        assert_eq!(out.len(), 2);
        world.step_into(1, 0.0, 0, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = SimulationParams {
            flash_lifetime: [30, 10],
            ..SimulationParams::default()
        };
        assert!(World::with_params(8, Some(1), params).is_err());
    }

    #[test]
    fn test_from_config_uses_seed() {
        let config = SimulationConfig {
            capacity: 100,
            seed: Some(77),
            ..SimulationConfig::default()
        };
        let world = World::from_config(&config).unwrap();
        assert_eq!(world.seed(), 77);
        assert_eq!(world.capacity(), 100);
    }

    #[test]
    fn test_diagnostics_reset() {
        let mut world = World::with_seed(8, 2);
        world.step(0, 1.0, 0);
        assert_eq!(world.diagnostics().ticks, 1);
        world.reset_diagnostics();
        assert_eq!(*world.diagnostics(), Diagnostics::default());
    }
}
