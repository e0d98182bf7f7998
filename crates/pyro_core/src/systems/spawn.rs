//! Spawn system: launches new rockets from the bottom of the screen.
//!
//! A rate of `2.4` means two guaranteed rockets this tick plus a third with
//! probability `0.4`. Each rocket gets a random rise speed and a lifetime
//! long enough to cross 60%-95% of the screen before it dies and bursts.

use rand::Rng;

use super::spawn_entity;
use crate::config::SimulationParams;
use crate::diagnostics::Diagnostics;
use crate::ecs::{
    ArchetypeStore, Capability, Color, Components, DeathTime, Explodes, Frame, Graphics, Position,
    Signature, Velocity,
};

/// Signature of a rocket.
pub const ROCKET: Signature = Signature::of(&[
    Capability::DeathTime,
    Capability::Explodes,
    Capability::Graphics,
    Capability::Position,
    Capability::Velocity,
]);

/// Rocket hues, chosen uniformly.
pub const PALETTE: [Color; 3] = [Color::RED, Color::GREEN, Color::BLUE];

/// Rolls one rocket born at `frame`.
pub fn rocket<R: Rng>(
    rng: &mut R,
    params: &SimulationParams,
    frame: Frame,
    explosion_particles: u32,
) -> Components {
    let rise = rng.gen_range(params.rise_speed[0]..params.rise_speed[1]);
    let ticks_to_top = 1.0 / rise;
    let [cross_min, cross_max] = params.screen_cross_fraction;
    let life = rng.gen_range((ticks_to_top * cross_min) as u64..=(ticks_to_top * cross_max) as u64);
    let color = PALETTE[rng.gen_range(0..PALETTE.len())];
    let x = rng.gen_range(params.spawn_x[0]..params.spawn_x[1]);

    Components {
        death_time: Some(DeathTime {
            dead_frame: frame.saturating_add(life),
        }),
        explodes: Some(Explodes {
            num_particles: explosion_particles,
        }),
        graphics: Some(Graphics {
            color,
            radius: params.rocket_radius,
        }),
        position: Some(Position::new(x, 0.0)),
        velocity: Some(Velocity::new(0.0, rise)),
        ..Components::default()
    }
}

/// Spawns `floor(spawn_rate)` rockets plus one more with probability
/// `fract(spawn_rate)`. Returns how many were created.
///
/// Negative and NaN rates spawn nothing. Stops at capacity; the fractional
/// roll is drawn, even for whole rates, only if every guaranteed rocket fit.
pub fn run<R: Rng>(
    store: &mut ArchetypeStore,
    rng: &mut R,
    params: &SimulationParams,
    frame: Frame,
    spawn_rate: f32,
    explosion_particles: u32,
    diag: &mut Diagnostics,
) -> usize {
    let rate = spawn_rate.max(0.0);
    let whole = rate.floor();
    let fraction = rate - whole;
    // Saturates for huge or infinite rates; capacity ends the loop long before.
    let guaranteed = whole as u64;

    let mut spawned = 0;
    for i in 0..guaranteed {
        if !store.can_add() {
            diag.rockets_dropped = diag.rockets_dropped.saturating_add(guaranteed - i);
            tracing::trace!(frame, spawned, "spawn system out of capacity");
            return spawned;
        }
        let components = rocket(rng, params, frame, explosion_particles);
        if !spawn_entity(store, ROCKET, components, diag) {
            diag.rockets_dropped = diag.rockets_dropped.saturating_add(guaranteed - i);
            return spawned;
        }
        spawned += 1;
    }

    // Drawn even when `fraction` is zero so the stream advances the same way
    // for every rate.
    if rng.gen::<f32>() < fraction {
        if store.can_add() {
            let components = rocket(rng, params, frame, explosion_particles);
            if spawn_entity(store, ROCKET, components, diag) {
                spawned += 1;
            }
        } else {
            diag.rockets_dropped = diag.rockets_dropped.saturating_add(1);
        }
    }

    tracing::trace!(frame, spawned, "spawn system");
    spawned
}
