//! Explosion system: turns entities killed this tick into a flash and debris.
//!
//! Each qualifying snapshot from the death system produces, at its death
//! position:
//!
//! - one **flash**: lifetime uniform in `flash_lifetime`, recolored by the
//!   dominant channel of the original color, with radius and fade rates
//!   scaled by `reference / lifetime` so every flash reads the same on screen;
//! - up to `num_particles` **debris**: launch angles stratified over
//!   `[0, 2π)`, fade rates derived from the flash's, pulled by gravity.
//!
//! Spawning stops at capacity. Once the world is full the remaining
//! snapshots of this tick are left unprocessed.

use std::f32::consts::TAU;
use std::ops::Range;

use rand::Rng;

use super::spawn_entity;
use crate::config::SimulationParams;
use crate::diagnostics::Diagnostics;
use crate::ecs::{
    ArchetypeStore, Capability, Color, Components, DeathTime, Fades, Frame, Graphics, Position,
    RemovedEntity, Signature, Velocity,
};

/// Killed entities this system reacts to.
pub const REQUIRES: Signature =
    Signature::of(&[Capability::Explodes, Capability::Graphics, Capability::Position]);

/// Signature of a flash entity.
pub const FLASH: Signature = Signature::of(&[
    Capability::DeathTime,
    Capability::Fades,
    Capability::Graphics,
    Capability::Position,
]);

/// Signature of a debris entity.
pub const DEBRIS: Signature = Signature::of(&[
    Capability::DeathTime,
    Capability::Fades,
    Capability::Graphics,
    Capability::Position,
    Capability::Velocity,
    Capability::FeelsGravity,
]);

/// Color channel that dominates a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
}

impl Channel {
    /// Largest of r, g, b. Ties go to red, then green.
    #[must_use]
    pub const fn dominant(color: Color) -> Self {
        if color.r >= color.g && color.r >= color.b {
            Self::Red
        } else if color.g >= color.b {
            Self::Green
        } else {
            Self::Blue
        }
    }
}

/// Everything about a flash that follows from its color and lifetime roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flash {
    /// Lifetime in ticks.
    pub lifetime: u32,
    /// `flash_scale_reference / lifetime`.
    pub scale: f32,
    /// Display color.
    pub color: Color,
    /// Fade rule.
    pub fades: Fades,
    /// Radius.
    pub radius: f32,
}

impl Flash {
    /// Derives the flash for a dying entity of `color` living `lifetime` ticks.
    ///
    /// Red-dominant bursts turn yellow and fade green, green-dominant turn
    /// cyan and fade blue, the rest turn magenta and fade red. Alpha always
    /// fades.
    #[must_use]
    pub fn new(color: Color, lifetime: u32, params: &SimulationParams) -> Self {
        let scale = params.flash_scale_reference / lifetime as f32;
        let accent_rate = (params.flash_accent_rate * scale) as u8;
        let accent_min = params.flash_accent_min;

        let mut fades = Fades {
            a_rate: (params.flash_alpha_rate * scale) as u8,
            a_min: params.flash_alpha_min,
            ..Fades::default()
        };
        let color = match Channel::dominant(color) {
            Channel::Red => {
                fades.g_rate = accent_rate;
                fades.g_min = accent_min;
                Color::YELLOW
            }
            Channel::Green => {
                fades.b_rate = accent_rate;
                fades.b_min = accent_min;
                Color::CYAN
            }
            Channel::Blue => {
                fades.r_rate = accent_rate;
                fades.r_min = accent_min;
                Color::MAGENTA
            }
        };

        Self {
            lifetime,
            scale,
            color,
            fades,
            radius: params.flash_radius / scale,
        }
    }

    /// Debris fade: color rates quartered, alpha rate halved, same floors.
    #[must_use]
    pub const fn debris_fades(&self) -> Fades {
        Fades {
            r_rate: self.fades.r_rate >> 2,
            g_rate: self.fades.g_rate >> 2,
            b_rate: self.fades.b_rate >> 2,
            a_rate: self.fades.a_rate >> 1,
            ..self.fades
        }
    }
}

/// Splits `[0, 2π)` into `n` equal contiguous slices.
///
/// Debris `i` samples its launch angle uniformly within slice `i`, which
/// spreads a burst evenly around the circle while keeping each angle random.
pub fn angular_slices(n: usize) -> impl Iterator<Item = Range<f32>> {
    let chunk = if n == 0 { 0.0 } else { TAU / n as f32 };
    (0..n).map(move |i| (i as f32 * chunk)..((i + 1) as f32 * chunk))
}

/// Spawns flashes and debris for the killed entities of this tick.
pub fn run<R: Rng>(
    store: &mut ArchetypeStore,
    rng: &mut R,
    params: &SimulationParams,
    frame: Frame,
    killed: &[RemovedEntity],
    diag: &mut Diagnostics,
) {
    for (index, dead) in killed.iter().enumerate() {
        let Components {
            explodes: Some(explodes),
            graphics: Some(graphics),
            position: Some(position),
            ..
        } = dead.components
        else {
            continue;
        };

        if !store.can_add() {
            let skipped = killed[index..].iter().filter(|k| k.matches(REQUIRES)).count();
            diag.explosions_skipped = diag.explosions_skipped.saturating_add(skipped as u64);
            tracing::trace!(frame, skipped, "explosion system out of capacity");
            return;
        }

        let lifetime = rng.gen_range(params.flash_lifetime[0]..=params.flash_lifetime[1]);
        let flash = Flash::new(graphics.color, lifetime, params);
        let flash_entity = Components {
            death_time: Some(DeathTime {
                dead_frame: frame.saturating_add(u64::from(lifetime)),
            }),
            fades: Some(flash.fades),
            graphics: Some(Graphics {
                color: flash.color,
                radius: flash.radius,
            }),
            position: Some(position),
            ..Components::default()
        };
        if !spawn_entity(store, FLASH, flash_entity, diag) {
            continue;
        }
        diag.explosions += 1;

        let requested = explodes.num_particles as usize;
        let count = requested.min(store.remaining());
        diag.debris_dropped += (requested - count) as u64;
        spawn_debris(store, rng, params, frame, &flash, position, count, diag);
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_debris<R: Rng>(
    store: &mut ArchetypeStore,
    rng: &mut R,
    params: &SimulationParams,
    frame: Frame,
    flash: &Flash,
    position: Position,
    count: usize,
    diag: &mut Diagnostics,
) {
    let fades = flash.debris_fades();
    let graphics = Graphics {
        color: flash.color,
        radius: params.debris_radius / flash.scale,
    };
    let base_life = (params.debris_lifetime_multiplier * flash.lifetime as f32) as u64;

    for slice in angular_slices(count) {
        let angle = if slice.start < slice.end {
            rng.gen_range(slice)
        } else {
            slice.start
        };
        let extra = rng.gen_range(params.debris_extra_lifetime[0]..=params.debris_extra_lifetime[1]);
        let (sin, cos) = angle.sin_cos();

        let debris = Components {
            death_time: Some(DeathTime {
                dead_frame: frame.saturating_add(base_life + u64::from(extra)),
            }),
            fades: Some(fades),
            graphics: Some(graphics),
            position: Some(position),
            velocity: Some(Velocity::new(cos * params.debris_speed, sin * params.debris_speed)),
            ..Components::default()
        };
        if !spawn_entity(store, DEBRIS, debris, diag) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Explodes;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rocket(color: Color, num_particles: u32) -> RemovedEntity {
        RemovedEntity {
            signature: Signature::of(&[
                Capability::DeathTime,
                Capability::Explodes,
                Capability::Graphics,
                Capability::Position,
                Capability::Velocity,
            ]),
            components: Components {
                death_time: Some(DeathTime { dead_frame: 5 }),
                explodes: Some(Explodes { num_particles }),
                graphics: Some(Graphics { color, radius: 0.02 }),
                position: Some(Position::new(0.25, 0.75)),
                velocity: Some(Velocity::new(0.0, 0.02)),
                ..Components::default()
            },
        }
    }

    #[test]
    fn test_dominant_channel_priority() {
        assert_eq!(Channel::dominant(Color::RED), Channel::Red);
        assert_eq!(Channel::dominant(Color::GREEN), Channel::Green);
        assert_eq!(Channel::dominant(Color::BLUE), Channel::Blue);
        assert_eq!(Channel::dominant(Color::rgba(200, 200, 10, 255)), Channel::Red);
        assert_eq!(Channel::dominant(Color::rgba(10, 200, 200, 255)), Channel::Green);
        assert_eq!(Channel::dominant(Color::rgba(0, 0, 0, 255)), Channel::Red);
    }

    #[test]
    fn test_flash_recolor_and_scaling() {
        let params = SimulationParams::default();

        let red = Flash::new(Color::RED, 10, &params);
        assert_eq!(red.color, Color::YELLOW);
        assert!((red.scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(red.fades.g_rate, 40);
        assert_eq!(red.fades.g_min, 100);
        assert_eq!(red.fades.a_rate, 30);
        assert_eq!(red.fades.a_min, 50);
        assert_eq!(red.fades.r_rate, 0);
        assert!((red.radius - 0.03).abs() < 1e-6);

        let green = Flash::new(Color::GREEN, 20, &params);
        assert_eq!(green.color, Color::CYAN);
        assert_eq!(green.fades.b_rate, 20);
        assert_eq!(green.fades.a_rate, 15);
        assert!((green.radius - 0.06).abs() < 1e-6);

        let blue = Flash::new(Color::BLUE, 30, &params);
        assert_eq!(blue.color, Color::MAGENTA);
        assert_eq!(blue.fades.r_min, 100);
        assert_eq!(blue.fades.r_rate, 13);
    }

    #[test]
    fn test_debris_fades_shifted() {
        let params = SimulationParams::default();
        let flash = Flash::new(Color::RED, 10, &params);
        let debris = flash.debris_fades();
        assert_eq!(debris.g_rate, 40 >> 2);
        assert_eq!(debris.a_rate, 30 >> 1);
        assert_eq!(debris.g_min, 100);
        assert_eq!(debris.a_min, 50);
    }

    #[test]
    fn test_angular_slices_cover_circle() {
        for n in [1_usize, 2, 3, 7, 16, 100] {
            let slices: Vec<_> = angular_slices(n).collect();
            assert_eq!(slices.len(), n);
            assert_eq!(slices[0].start, 0.0);
            for pair in slices.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            let width = TAU / n as f32;
            for s in &slices {
                assert!((s.end - s.start - width).abs() < 1e-4);
            }
            assert!((slices[n - 1].end - TAU).abs() < 1e-4);
        }
        assert_eq!(angular_slices(0).count(), 0);
    }

    #[test]
    fn test_one_flash_plus_debris() {
        let params = SimulationParams::default();
        let mut store = ArchetypeStore::new(100);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut diag = Diagnostics::default();

        run(&mut store, &mut rng, &params, 5, &[rocket(Color::RED, 8)], &mut diag);

        assert_eq!(store.len(), 9);
        let flash = store.find(FLASH).and_then(|id| store.archetype(id)).unwrap();
        assert_eq!(flash.len(), 1);
        assert_eq!(flash.positions()[0], Position::new(0.25, 0.75));
        let life = flash.death_times()[0].dead_frame - 5;
        assert!((10..=30).contains(&life));

        let debris = store.find(DEBRIS).and_then(|id| store.archetype(id)).unwrap();
        assert_eq!(debris.len(), 8);
        for (i, v) in debris.velocities().iter().enumerate() {
            let speed = v.dx.hypot(v.dy);
            assert!((speed - 0.01).abs() < 1e-5);
            let mut angle = v.dy.atan2(v.dx);
            if angle < 0.0 {
                angle += TAU;
            }
            let width = TAU / 8.0;
            assert!(angle >= i as f32 * width - 1e-4 && angle <= (i + 1) as f32 * width + 1e-4);
        }
        for d in debris.death_times() {
            let debris_life = d.dead_frame - 5;
            let base = (1.5 * life as f32) as u64;
            assert!(debris_life >= base && debris_life <= base + 10);
        }
        assert_eq!(diag.explosions, 1);
        assert_eq!(diag.spawned, 9);
    }

    #[test]
    fn test_non_explosive_snapshot_ignored() {
        let params = SimulationParams::default();
        let mut store = ArchetypeStore::new(10);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut diag = Diagnostics::default();
        let mut dud = rocket(Color::RED, 4);
        dud.signature = dud.signature.without(Capability::Explodes);
        dud.components.explodes = None;

        run(&mut store, &mut rng, &params, 5, &[dud], &mut diag);
        assert!(store.is_empty());
    }

    #[test]
    fn test_debris_truncated_at_capacity() {
        let params = SimulationParams::default();
        let mut store = ArchetypeStore::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut diag = Diagnostics::default();
        let killed = [rocket(Color::GREEN, 10), rocket(Color::BLUE, 10)];

        run(&mut store, &mut rng, &params, 5, &killed, &mut diag);

        assert_eq!(store.len(), 4);
        assert_eq!(diag.debris_dropped, 7);
        assert_eq!(diag.explosions, 1);
        assert_eq!(diag.explosions_skipped, 1);
    }

    #[test]
    fn test_zero_capacity_spawns_nothing() {
        let params = SimulationParams::default();
        let mut store = ArchetypeStore::new(0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut diag = Diagnostics::default();

        run(&mut store, &mut rng, &params, 5, &[rocket(Color::RED, 3)], &mut diag);
        assert!(store.is_empty());
        assert!(store.archetypes().is_empty());
        assert_eq!(diag.explosions_skipped, 1);
    }
}
