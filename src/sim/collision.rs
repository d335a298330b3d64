//! Collision detection and response for circles
//!
//! Everything in the universe is a circle. Detection is a plain
//! distance-vs-radius-sum check; the interesting part is deciding what an
//! overlap means for the player (eat, ram, or bounce off).

use glam::Vec2;

use super::entity::Body;

/// Entities at most this fraction of the player's radius can be eaten
pub const EDIBLE_RATIO: f32 = 0.75;
/// Entities at least this fraction of the player's radius give full credit
pub const FULL_CREDIT_RATIO: f32 = 0.5;
/// Impacts faster than this fraction of max speed cost fuel
pub const HARD_IMPACT_RATIO: f32 = 0.5;
/// Charge damage scale against bigger targets
pub const CHARGE_DAMAGE_SCALE: f32 = 50.0;
/// Extra separation added when pushing the player out of an obstacle
const CONTACT_SKIN: f32 = 0.01;

/// Result of a circle-vs-circle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal from the obstacle's center toward the mover's center
    pub normal: Vec2,
    /// Center distance
    pub distance: f32,
    /// Overlap depth (radius sum - distance)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            distance: 0.0,
            penetration: 0.0,
        }
    }
}

/// Indices of every live entity overlapping the circle at `pos`.
///
/// Touching circles (distance exactly equal to the radius sum) do not count.
pub fn overlapping<T: Body>(entities: &[T], pos: Vec2, radius: f32) -> Vec<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_dead() && pos.distance(e.pos()) < radius + e.radius())
        .map(|(i, _)| i)
        .collect()
}

/// Every live entity overlapping the circle at `pos`
pub fn detect<'a, T: Body>(entities: &'a [T], pos: Vec2, radius: f32) -> Vec<&'a T> {
    overlapping(entities, pos, radius)
        .into_iter()
        .map(|i| &entities[i])
        .collect()
}

/// Circle-vs-circle contact, with the normal pointing from `b` to `a`.
///
/// Coincident centers have no usable normal and are reported as a miss.
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let offset = a_pos - b_pos;
    let distance = offset.length();
    let radius_sum = a_radius + b_radius;

    if distance >= radius_sum || distance <= f32::EPSILON {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        normal: offset / distance,
        distance,
        penetration: radius_sum - distance,
    }
}

/// Can a player of `player_radius` eat something of `radius`?
#[inline]
pub fn is_edible(radius: f32, player_radius: f32) -> bool {
    radius <= player_radius * EDIBLE_RATIO
}

/// Fullness earned by eating something of `radius`.
///
/// Full credit down to half the player's size, then halved for every
/// further halving in size.
pub fn fullness_gain(radius: f32, player_radius: f32) -> f32 {
    if radius >= player_radius * FULL_CREDIT_RATIO {
        return 1.0;
    }
    let level_diff = (player_radius / radius).log2().floor() as i32;
    0.5f32.powi(level_diff)
}

/// Damage a charging player deals to something it cannot eat
pub fn charge_damage(radius: f32, player_radius: f32) -> f32 {
    if player_radius > radius {
        f32::INFINITY
    } else {
        (CHARGE_DAMAGE_SCALE * player_radius / radius).floor().max(1.0)
    }
}

/// Outcome of bouncing off a solid obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashResponse {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Speed along the contact normal before the bounce
    pub impact_speed: f32,
}

impl CrashResponse {
    /// Was this hit hard enough to hurt?
    pub fn is_hard(&self, max_speed: f32) -> bool {
        self.impact_speed > max_speed * HARD_IMPACT_RATIO
    }
}

/// Knock the player straight out along the contact normal.
///
/// The tangential part of the velocity is dropped; the player leaves at the
/// normal impact speed, is moved out of the overlap, then advanced one step.
/// Returns `None` for non-overlapping or coincident circles.
pub fn crash_response(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    obstacle_pos: Vec2,
    obstacle_radius: f32,
    dt: f32,
) -> Option<CrashResponse> {
    let contact = circle_contact(pos, radius, obstacle_pos, obstacle_radius);
    if !contact.hit {
        return None;
    }

    let impact_speed = vel.dot(contact.normal).abs();
    let new_vel = contact.normal * impact_speed;
    let pushed = pos + contact.normal * (contact.penetration + CONTACT_SKIN);

    Some(CrashResponse {
        pos: pushed + new_vel * dt,
        vel: new_vel,
        impact_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Planet, PlanetKind};
    use proptest::prelude::*;

    fn planet(id: u32, x: f32, y: f32, r: f32) -> Planet {
        Planet::new(id, PlanetKind::Regular, Vec2::new(x, y), r, 100.0)
    }

    #[test]
    fn test_detect_returns_every_overlap() {
        let planets = vec![
            planet(1, 10.0, 0.0, 5.0),
            planet(2, -10.0, 0.0, 5.0),
            planet(3, 100.0, 0.0, 5.0),
        ];
        let hits: Vec<u32> = detect(&planets, Vec2::ZERO, 6.0).iter().map(|p| p.id()).collect();
        assert_eq!(hits, vec![1, 2]);
    }

    #[test]
    fn test_touching_is_not_colliding() {
        let planets = vec![planet(1, 10.0, 0.0, 4.0)];
        assert!(detect(&planets, Vec2::ZERO, 6.0).is_empty());
        assert_eq!(detect(&planets, Vec2::ZERO, 6.001).len(), 1);
    }

    #[test]
    fn test_dead_entities_are_ignored() {
        let mut planets = vec![planet(1, 1.0, 0.0, 4.0)];
        planets[0].entity.kill();
        assert!(overlapping(&planets, Vec2::ZERO, 6.0).is_empty());
    }

    #[test]
    fn test_edibility_threshold() {
        let r = 40.0;
        assert!(is_edible(0.75 * r, r));
        assert!(!is_edible(0.75 * r + 0.001, r));
    }

    #[test]
    fn test_fullness_gain() {
        let r = 64.0;
        assert_eq!(fullness_gain(r * 0.5, r), 1.0);
        assert_eq!(fullness_gain(r * 0.7, r), 1.0);
        assert_eq!(fullness_gain(r / 4.0, r), 0.25);
        assert_eq!(fullness_gain(r / 2.0 - 0.01, r), 0.5);
        assert_eq!(fullness_gain(r / 8.0, r), 0.125);
    }

    #[test]
    fn test_charge_damage() {
        assert_eq!(charge_damage(40.0, 50.0), f32::INFINITY);
        assert_eq!(charge_damage(100.0, 50.0), 25.0);
        assert_eq!(charge_damage(50.0, 50.0), 50.0);
        assert_eq!(charge_damage(10_000.0, 50.0), 1.0);
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        assert!(!circle_contact(Vec2::ONE, 5.0, Vec2::ONE, 5.0).hit);
        assert!(crash_response(Vec2::ONE, Vec2::X, 5.0, Vec2::ONE, 5.0, 0.016).is_none());
    }

    #[test]
    fn test_crash_drops_tangential_velocity() {
        // Obstacle to the right, player moving right and up
        let resp = crash_response(
            Vec2::new(0.0, 0.0),
            Vec2::new(300.0, 100.0),
            10.0,
            Vec2::new(15.0, 0.0),
            10.0,
            0.0,
        )
        .unwrap();
        assert!((resp.impact_speed - 300.0).abs() < 1e-3);
        assert!((resp.vel - Vec2::new(-300.0, 0.0)).length() < 1e-3);
        assert!(resp.is_hard(400.0));
        assert!(!resp.is_hard(800.0));
    }

    proptest! {
        #[test]
        fn prop_detect_matches_radius_sum(
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0, r1 in 0.1f32..100.0,
            x2 in -500.0f32..500.0, y2 in -500.0f32..500.0, r2 in 0.1f32..100.0,
        ) {
            let planets = vec![planet(1, x2, y2, r2)];
            let a = Vec2::new(x1, y1);
            let d = a.distance(Vec2::new(x2, y2));
            let hit = !detect(&planets, a, r1).is_empty();
            prop_assert_eq!(hit, d < r1 + r2);
        }

        #[test]
        fn prop_knockback_leaves_no_penetration(
            angle in 0.0f32..std::f32::consts::TAU,
            overlap_frac in 0.01f32..0.99,
            vx in -800.0f32..800.0, vy in -800.0f32..800.0,
            r1 in 5.0f32..100.0, r2 in 5.0f32..300.0,
            ox in -1000.0f32..1000.0, oy in -1000.0f32..1000.0,
        ) {
            let obstacle = Vec2::new(ox, oy);
            let dist = (r1 + r2) * (1.0 - overlap_frac);
            let pos = obstacle + Vec2::from_angle(angle) * dist;
            let resp = crash_response(pos, Vec2::new(vx, vy), r1, obstacle, r2, 1.0 / 60.0).unwrap();
            prop_assert!(resp.pos.distance(obstacle) >= r1 + r2);
        }
    }
}
