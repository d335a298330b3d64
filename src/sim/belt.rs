//! Procedural belt generation
//!
//! Each evolution pushes a new ring of planets ("belt") further out from the
//! sun. A belt holds exactly one treasure planet and up to
//! `belt_planet_count` regular planets placed in evenly spaced angular
//! slots. Slots too close (in angle) to the treasure are left empty instead
//! of being resampled, so generation cost is fixed.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::entity::PlanetKind;
use crate::{angular_distance, polar_to_cartesian};

/// Base planet size, in player radii
const BASE_SIZE_FACTOR: f32 = 4.0;
/// Belt width, in base planet sizes
const SPACING_FACTOR: f32 = 3.0;
/// Treasure planet radius, in player radii
const TREASURE_SIZE_FACTOR: f32 = 8.0;

/// A planet to be placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PlanetKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// Generated belt, treasure first
#[derive(Debug, Clone, Default)]
pub struct Belt {
    pub inner_radius: f32,
    pub spacing: f32,
    pub treasure_angle: f32,
    /// No regular planet is placed closer than this (radians) to the treasure
    pub exclusion_half_width: f32,
    pub planets: Vec<Placement>,
}

impl Belt {
    pub fn treasure(&self) -> Option<&Placement> {
        self.planets.iter().find(|p| p.kind == PlanetKind::Treasure)
    }

    pub fn regular(&self) -> impl Iterator<Item = &Placement> {
        self.planets.iter().filter(|p| p.kind == PlanetKind::Regular)
    }
}

/// Angular half-width around the treasure kept free of regular planets
fn exclusion_half_width(treasure_radius: f32, treasure_dist: f32) -> f32 {
    if treasure_dist <= 0.0 {
        return PI;
    }
    (treasure_radius * 2.0 / treasure_dist).min(1.0).asin()
}

/// Generate the belt for `evolution_index` around a player of `player_radius`
pub fn spawn_next_belt(
    evolution_index: u32,
    player_radius: f32,
    planet_count: u32,
    rng: &mut impl Rng,
) -> Belt {
    if !(player_radius.is_finite() && player_radius > 0.0) {
        log::warn!("Belt {evolution_index}: degenerate player radius {player_radius}, skipping");
        return Belt::default();
    }

    let base_size = player_radius * BASE_SIZE_FACTOR;
    let spacing = base_size * SPACING_FACTOR;
    let inner_radius = evolution_index as f32 * spacing + base_size;

    let treasure_radius = player_radius * TREASURE_SIZE_FACTOR;
    let treasure_dist = inner_radius + rng.random::<f32>() * spacing;
    let treasure_angle = rng.random::<f32>() * TAU;
    let half_width = exclusion_half_width(treasure_radius, treasure_dist);

    let mut planets = Vec::with_capacity(planet_count as usize + 1);
    planets.push(Placement {
        kind: PlanetKind::Treasure,
        pos: polar_to_cartesian(treasure_dist, treasure_angle),
        radius: treasure_radius,
    });

    let step = TAU / planet_count.max(1) as f32;
    let offset = rng.random::<f32>() * TAU;
    for i in 0..planet_count {
        let angle = offset + i as f32 * step;
        if angular_distance(angle, treasure_angle) < half_width {
            continue;
        }

        let dist = inner_radius + rng.random::<f32>() * spacing;
        // Coin flip between the edible and the barely-too-big size band
        let size = if rng.random_bool(0.5) {
            rng.random_range(0.5f32..0.75)
        } else {
            rng.random_range(0.75f32..1.0)
        };

        planets.push(Placement {
            kind: PlanetKind::Regular,
            pos: polar_to_cartesian(dist, angle),
            radius: player_radius * size,
        });
    }

    log::info!(
        "Belt {}: inner={:.0}, width={:.0}, planets={} (+1 treasure)",
        evolution_index,
        inner_radius,
        spacing,
        planets.len() - 1
    );

    Belt {
        inner_radius,
        spacing,
        treasure_angle,
        exclusion_half_width: half_width,
        planets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_belt_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        let belt = spawn_next_belt(2, 50.0, 20, &mut rng);

        assert_eq!(belt.inner_radius, 2.0 * 600.0 + 200.0);
        assert_eq!(belt.planets.iter().filter(|p| p.kind == PlanetKind::Treasure).count(), 1);
        assert_eq!(belt.planets[0].kind, PlanetKind::Treasure);
        assert_eq!(belt.treasure().unwrap().radius, 400.0);

        let regular: Vec<_> = belt.regular().collect();
        assert!(!regular.is_empty() && regular.len() < 20);
        for p in regular {
            assert!(p.radius >= 25.0 && p.radius <= 50.0);
            let d = p.pos.length();
            assert!(d >= belt.inner_radius - 1e-2 && d <= belt.inner_radius + belt.spacing + 1e-2);
        }
    }

    #[test]
    fn test_degenerate_inputs_do_not_hang() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(spawn_next_belt(3, 0.0, 20, &mut rng).planets.is_empty());
        assert!(spawn_next_belt(3, f32::NAN, 20, &mut rng).planets.is_empty());

        // Index 0 puts the treasure so close that half the ring is excluded
        let belt = spawn_next_belt(0, 50.0, 20, &mut rng);
        assert_eq!(belt.treasure().map(|t| t.radius), Some(400.0));
        assert!(belt.exclusion_half_width.is_finite());
    }

    #[test]
    fn test_same_seed_same_belt() {
        let a = spawn_next_belt(4, 70.0, 20, &mut Pcg32::seed_from_u64(9));
        let b = spawn_next_belt(4, 70.0, 20, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a.planets, b.planets);
    }

    proptest! {
        #[test]
        fn prop_no_planet_in_treasure_exclusion(
            seed in any::<u64>(),
            index in 0u32..40,
            radius in 5.0f32..400.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let belt = spawn_next_belt(index, radius, 20, &mut rng);
            prop_assert!(belt.treasure().is_some());
            for p in belt.regular() {
                let angle = p.pos.y.atan2(p.pos.x);
                prop_assert!(angular_distance(angle, belt.treasure_angle) >= belt.exclusion_half_width - 1e-3);
            }
        }
    }
}
