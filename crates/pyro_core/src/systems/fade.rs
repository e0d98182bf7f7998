//! Fade system: lowers color channels toward their floors.

use crate::ecs::{ArchetypeStore, Capability, Color, Fades, Signature};

/// Archetypes visited by this system.
pub const REQUIRES: Signature = Signature::of(&[Capability::Fades, Capability::Graphics]);

/// `max(value - rate, floor)` without wrapping.
///
/// A channel already below its floor is raised to it.
#[inline]
#[must_use]
pub const fn fade_channel(value: u8, rate: u8, floor: u8) -> u8 {
    let faded = value.saturating_sub(rate);
    if faded > floor {
        faded
    } else {
        floor
    }
}

/// Applies one tick of `fades` to `color`.
#[inline]
pub fn apply(color: &mut Color, fades: &Fades) {
    color.r = fade_channel(color.r, fades.r_rate, fades.r_min);
    color.g = fade_channel(color.g, fades.g_rate, fades.g_min);
    color.b = fade_channel(color.b, fades.b_rate, fades.b_min);
    color.a = fade_channel(color.a, fades.a_rate, fades.a_min);
}

/// Fades every matching entity once.
pub fn run(store: &mut ArchetypeStore) {
    for archetype in store.matching_mut(REQUIRES) {
        let (fades, graphics) = archetype.fades_and_graphics_mut();
        for (fade, graphic) in fades.iter().zip(graphics.iter_mut()) {
            apply(&mut graphic.color, fade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Components, Graphics};

    #[test]
    fn test_fade_channel() {
        assert_eq!(fade_channel(200, 30, 50), 170);
        assert_eq!(fade_channel(60, 30, 50), 50);
        assert_eq!(fade_channel(10, 30, 0), 0);
        assert_eq!(fade_channel(10, 0, 50), 50);
        assert_eq!(fade_channel(255, 0, 0), 255);
    }

    #[test]
    fn test_reaches_floor_and_stays() {
        let mut store = ArchetypeStore::new(2);
        let fades = Fades {
            a_rate: 30,
            a_min: 50,
            g_rate: 40,
            g_min: 100,
            ..Fades::default()
        };
        store
            .add_entity(
                REQUIRES,
                Components {
                    fades: Some(fades),
                    graphics: Some(Graphics {
                        color: Color::YELLOW,
                        radius: 0.03,
                    }),
                    ..Components::default()
                },
            )
            .unwrap();

        for _ in 0..20 {
            run(&mut store);
        }
        let color = store.archetypes()[0].graphics()[0].color;
        assert_eq!(color, Color::rgba(255, 100, 0, 50));
    }
}
