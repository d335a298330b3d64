//! Frank, the player
//!
//! Owns movement, the charge dash, fuel, held items and progression. Each
//! tick the sim calls [`Frank::update`] (steering, charger, thrust,
//! integration) and then [`Frank::resolve_collisions`] against the
//! universe's entity lists.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::charger::{ChargeParams, ChargeState, ChargeTransition, Charger};
use super::collision::{charge_damage, crash_response, fullness_gain, is_edible, overlapping};
use super::entity::{Body, EntityKind};
use super::events::{DAMAGE_VARIANTS, EAT_VARIANTS, EventQueue, GameEvent, RoundRobin, SoundId};
use super::items::{Inventory, Stat};
use super::jetpack::Jetpack;
use super::state::{GamePhase, Keys};
use super::timers::Timers;
use super::universe::Universe;
use crate::error::{SimError, check_radius};
use crate::tuning::Tuning;

/// Fraction of the tank lost on a hard crash
const CRASH_FUEL_FRACTION: f32 = 1.0 / 16.0;
/// Reverse thrust is weaker than forward thrust
const REVERSE_THRUST: f32 = 0.5;

/// Running totals for the end-of-run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub planets_eaten: u32,
    pub enemies_eaten: u32,
    pub crashes: u32,
    pub fuel_lost: f32,
    pub items_collected: u32,
}

/// Radius for a player level.
///
/// Grows as `base + early * ln(level + 1)` up to the seam level, then keeps
/// growing from there with the steeper `late` coefficient.
pub fn radius_for_level(level: u32, tuning: &Tuning) -> f32 {
    let seam = tuning.growth_seam_level;
    if level < seam {
        tuning.base_radius + tuning.growth_early * ((level + 1) as f32).ln()
    } else {
        let at_seam = tuning.base_radius + tuning.growth_early * ((seam + 1) as f32).ln();
        at_seam + tuning.growth_late * ((level + 1) as f32 / (seam + 1) as f32).ln()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frank {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians)
    pub angle: f32,
    pub radius: f32,
    pub fullness: f32,
    pub level: u32,
    pub items: Inventory,
    pub jetpack: Jetpack,
    pub stats: PlayerStats,
    charger: Charger,
    eat_sounds: RoundRobin,
    damage_sounds: RoundRobin,
}

impl Frank {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: -std::f32::consts::FRAC_PI_2,
            radius: radius_for_level(0, tuning),
            fullness: 0.0,
            level: 0,
            items: Inventory::default(),
            jetpack: Jetpack::new(tuning.max_fuel),
            stats: PlayerStats::default(),
            charger: Charger::default(),
            eat_sounds: RoundRobin::default(),
            damage_sounds: RoundRobin::default(),
        }
    }

    pub fn state(&self) -> ChargeState {
        self.charger.state()
    }

    pub fn charger(&self) -> &Charger {
        &self.charger
    }

    /// Radius relative to the starting size; multiplies acceleration and max speed
    fn size_scale(&self, tuning: &Tuning) -> f32 {
        self.radius / tuning.base_radius
    }

    fn base_acceleration(&self, tuning: &Tuning) -> f32 {
        self.items.apply(Stat::Acceleration, tuning.acceleration * self.size_scale(tuning))
    }

    fn base_max_speed(&self, tuning: &Tuning) -> f32 {
        self.items.apply(Stat::MaxSpeed, tuning.max_speed * self.size_scale(tuning))
    }

    /// Acceleration for the current charge state
    pub fn acceleration(&self, tuning: &Tuning) -> f32 {
        match self.charger.state() {
            ChargeState::Charging => self.base_acceleration(tuning) * tuning.charge_accel_mult,
            _ => self.base_acceleration(tuning),
        }
    }

    /// Speed cap for the current charge state
    pub fn max_speed(&self, tuning: &Tuning) -> f32 {
        match self.charger.state() {
            ChargeState::Charging => self.charge_max_speed(tuning),
            _ => self.base_max_speed(tuning),
        }
    }

    pub fn charge_max_speed(&self, tuning: &Tuning) -> f32 {
        self.base_max_speed(tuning) * tuning.charge_speed_mult
    }

    pub fn charge_up_duration(&self, tuning: &Tuning) -> f32 {
        self.items.apply(Stat::ChargeUpDuration, tuning.charge_up_duration_ms)
    }

    pub fn charge_cooldown_duration(&self, tuning: &Tuning) -> f32 {
        self.items.apply(Stat::ChargeCooldown, tuning.charge_cooldown_ms)
    }

    pub fn max_fuel(&self, tuning: &Tuning) -> f32 {
        self.items.apply(Stat::MaxFuel, tuning.max_fuel)
    }

    /// Steering, charger, thrust and integration for one tick
    pub fn update(
        &mut self,
        keys: &Keys,
        phase: GamePhase,
        delta_ms: f32,
        tuning: &Tuning,
        timers: &mut Timers,
        events: &mut EventQueue,
    ) -> Result<(), SimError> {
        let dt = delta_ms / 1000.0;

        if phase == GamePhase::Playing {
            if keys.left {
                self.angle -= tuning.turn_rate * dt;
            }
            if keys.right {
                self.angle += tuning.turn_rate * dt;
            }
        }

        self.update_charger(keys.charge, delta_ms, tuning, timers, events);

        let wants_thrust = keys.up || keys.down;
        let was_thrusting = self.jetpack.is_thrusting();
        let thrust = self.jetpack.burn(wants_thrust, delta_ms, tuning.fuel_burn_per_sec);
        if thrust != was_thrusting {
            events.emit(GameEvent::Loop {
                sound: SoundId::Thruster,
                volume: if thrust { 1.0 } else { 0.0 },
            });
        }

        let mut accel = Vec2::ZERO;
        if thrust {
            let forward = Vec2::from_angle(self.angle) * self.acceleration(tuning);
            if keys.up {
                accel += forward;
            }
            if keys.down {
                accel -= forward * REVERSE_THRUST;
            }
        }

        self.integrate(accel, dt, self.max_speed(tuning));

        if !(self.pos.is_finite() && self.vel.is_finite()) {
            return Err(SimError::NonFinite { context: "player kinematics" });
        }
        Ok(())
    }

    fn update_charger(
        &mut self,
        held: bool,
        delta_ms: f32,
        tuning: &Tuning,
        timers: &mut Timers,
        events: &mut EventQueue,
    ) {
        let params = ChargeParams {
            charge_up_duration: self.charge_up_duration(tuning),
            charge_duration: tuning.charge_duration_ms,
            tail_interval: tuning.tail_replay_interval_ms,
        };
        let step = self.charger.update(held, timers.charge_cooldown, delta_ms, &params);

        match step.transition {
            Some(ChargeTransition::Primed) => {
                events.emit(GameEvent::Loop { sound: SoundId::Charging, volume: 1.0 });
            }
            Some(ChargeTransition::Cancelled) => {
                events.emit(GameEvent::Loop { sound: SoundId::Charging, volume: 0.0 });
            }
            Some(ChargeTransition::Released) => {
                self.vel = Vec2::from_angle(self.angle) * self.charge_max_speed(tuning);
                timers.charge_cooldown = self.charge_cooldown_duration(tuning);
                events.emit(GameEvent::Loop { sound: SoundId::Charging, volume: 0.0 });
                events.emit(GameEvent::Play(SoundId::Kick));
                log::debug!("Charge released at level {}", self.level);
            }
            Some(ChargeTransition::Finished) | None => {}
        }

        if step.tail_replay {
            events.emit(GameEvent::Play(SoundId::Charging));
        }
    }

    /// Explicit Euler step with a uniform speed clamp
    fn integrate(&mut self, accel: Vec2, dt: f32, max_speed: f32) {
        self.vel += accel * dt;
        self.vel = self.vel.clamp_length_max(max_speed);
        self.pos += self.vel * dt;
    }

    /// Eat, ram or bounce off everything the player overlaps
    pub fn resolve_collisions(
        &mut self,
        universe: &mut Universe,
        delta_ms: f32,
        tuning: &Tuning,
        timers: &mut Timers,
        events: &mut EventQueue,
    ) -> Result<(), SimError> {
        check_radius("player", self.radius)?;
        let dt = delta_ms / 1000.0;

        for idx in overlapping(&universe.planets, self.pos, self.radius) {
            self.collide(&mut universe.planets[idx], dt, tuning, timers, events)?;
        }
        for idx in overlapping(&universe.enemies, self.pos, self.radius) {
            self.collide(&mut universe.enemies[idx], dt, tuning, timers, events)?;
        }

        for idx in overlapping(&universe.projectiles, self.pos, self.radius) {
            let projectile = &mut universe.projectiles[idx];
            projectile.entity.kill();
            let lost = self.jetpack.damage(projectile.damage);
            self.stats.fuel_lost += lost;
            timers.damage_flash = tuning.damage_flash_ms;
            events.emit(GameEvent::Damaged { amount: lost });
            events.emit(GameEvent::Play(SoundId::Damage(self.damage_sounds.next(DAMAGE_VARIANTS))));
        }

        for idx in overlapping(&universe.items, self.pos, self.radius) {
            let item = &mut universe.items[idx];
            if item.acquired {
                continue;
            }
            item.acquired = true;
            let level = self.items.acquire(item.item);
            self.stats.items_collected += 1;
            self.jetpack.clamp(self.max_fuel(tuning));
            log::debug!("Picked up {} (level {})", item.item.id(), level);
            events.emit(GameEvent::ItemAcquired { item: item.item, level });
            events.emit(GameEvent::Play(SoundId::Pickup));
        }

        Ok(())
    }

    /// Classify one overlap with a planet or enemy
    fn collide<T: Body>(
        &mut self,
        target: &mut T,
        dt: f32,
        tuning: &Tuning,
        timers: &mut Timers,
        events: &mut EventQueue,
    ) -> Result<(), SimError> {
        let radius = target.radius();
        check_radius("collision target", radius)?;

        // Overlaps are gathered up front, a bounce may have moved us clear since
        if self.pos.distance(target.pos()) >= self.radius + radius {
            return Ok(());
        }

        if is_edible(radius, self.radius) {
            self.eat(target, events);
            return Ok(());
        }

        if self.charger.is_charging() {
            let damage = charge_damage(radius, self.radius);
            if target.entity_mut().take_damage(damage) {
                self.eat(target, events);
            } else {
                self.knock_back(target, dt, true, tuning, timers, events);
            }
        } else {
            self.knock_back(target, dt, false, tuning, timers, events);
        }
        Ok(())
    }

    fn eat<T: Body>(&mut self, target: &mut T, events: &mut EventQueue) {
        target.entity_mut().kill();
        self.fullness += fullness_gain(target.radius(), self.radius);
        match target.kind() {
            EntityKind::Enemy => self.stats.enemies_eaten += 1,
            _ => self.stats.planets_eaten += 1,
        }
        events.emit(GameEvent::Play(SoundId::Eat(self.eat_sounds.next(EAT_VARIANTS))));
    }

    fn knock_back<T: Body>(
        &mut self,
        target: &T,
        dt: f32,
        invulnerable: bool,
        tuning: &Tuning,
        timers: &mut Timers,
        events: &mut EventQueue,
    ) {
        if self.pos == target.pos() {
            log::warn!("Player coincides with entity {}; skipping crash", target.id());
            return;
        }
        // An earlier bounce this tick may already have pushed us clear
        let Some(resp) = crash_response(self.pos, self.vel, self.radius, target.pos(), target.radius(), dt) else {
            return;
        };

        if !invulnerable && resp.is_hard(self.max_speed(tuning)) {
            let lost = self.jetpack.damage(self.max_fuel(tuning) * CRASH_FUEL_FRACTION);
            self.stats.fuel_lost += lost;
            self.stats.crashes += 1;
            timers.damage_flash = tuning.damage_flash_ms;
            events.emit(GameEvent::Damaged { amount: lost });
            events.emit(GameEvent::Play(SoundId::Damage(self.damage_sounds.next(DAMAGE_VARIANTS))));
        } else {
            events.emit(GameEvent::Play(SoundId::Kick));
        }

        self.pos = resp.pos;
        self.vel = resp.vel;
    }

    /// Level up: reset fullness, grow, refill the tank
    pub fn evolve(&mut self, tuning: &Tuning) {
        self.level += 1;
        self.fullness = 0.0;
        self.radius = radius_for_level(self.level, tuning);
        self.jetpack.refill(self.max_fuel(tuning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Enemy, Entity, Planet, PlanetKind, Projectile, WorldItem};
    use crate::sim::items::ItemKind;

    struct Rig {
        tuning: Tuning,
        timers: Timers,
        events: EventQueue,
        universe: Universe,
        frank: Frank,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = Tuning::default();
            Self {
                frank: Frank::new(&tuning),
                tuning,
                timers: Timers::default(),
                events: EventQueue::default(),
                universe: Universe::default(),
            }
        }

        fn step(&mut self, keys: Keys, delta_ms: f32) {
            self.timers.tick(delta_ms);
            self.frank
                .update(&keys, GamePhase::Playing, delta_ms, &self.tuning, &mut self.timers, &mut self.events)
                .unwrap();
        }

        fn collide(&mut self) {
            self.frank
                .resolve_collisions(&mut self.universe, 16.0, &self.tuning, &mut self.timers, &mut self.events)
                .unwrap();
        }

        fn add_planet(&mut self, pos: Vec2, radius: f32) {
            let id = self.universe.next_entity_id();
            self.universe.planets.push(Planet::new(id, PlanetKind::Regular, pos, radius, 100.0));
        }
    }

    fn hold(charge: bool) -> Keys {
        Keys { charge, ..Default::default() }
    }

    #[test]
    fn test_radius_curve() {
        let t = Tuning::default();
        assert_eq!(radius_for_level(0, &t), 50.0);
        assert!((radius_for_level(1, &t) - (50.0 + 35.0 * 2f32.ln())).abs() < 1e-4);
        // Continuous at the seam, steeper after it
        let before = radius_for_level(146, &t);
        let at = radius_for_level(147, &t);
        let after = radius_for_level(148, &t);
        assert!(at > before);
        assert!(after - at > at - before);
    }

    #[test]
    fn test_charge_state_table() {
        let mut rig = Rig::new();
        assert_eq!(rig.frank.state(), ChargeState::Normal);

        rig.step(hold(true), 16.0);
        assert_eq!(rig.frank.state(), ChargeState::PreCharging);

        // Release early
        rig.step(hold(true), 100.0);
        rig.step(hold(false), 16.0);
        assert_eq!(rig.frank.state(), ChargeState::Normal);
        assert_eq!(rig.frank.charger().charge_up_timer(), 0.0);
        assert_eq!(rig.timers.charge_cooldown, 0.0);

        // Hold through a full charge
        rig.step(hold(true), 16.0);
        for _ in 0..70 {
            rig.step(hold(true), 16.0);
        }
        rig.step(hold(false), 16.0);
        assert_eq!(rig.frank.state(), ChargeState::Charging);
        let expected = rig.frank.charge_max_speed(&rig.tuning);
        assert!((rig.frank.vel.length() - expected).abs() < 1e-2);
        assert!(rig.timers.charge_cooldown > 0.0);

        // Returns on its own after the fixed duration
        let ticks = (rig.tuning.charge_duration_ms / 16.0).ceil() as usize;
        for _ in 0..ticks {
            assert_eq!(rig.frank.state(), ChargeState::Charging);
            rig.step(hold(true), 16.0);
        }
        assert_eq!(rig.frank.state(), ChargeState::Normal);
        assert!(rig.frank.vel.length() <= rig.frank.max_speed(&rig.tuning) + 1e-3);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut rig = Rig::new();
        let keys = Keys { up: true, ..Default::default() };
        for _ in 0..600 {
            rig.step(keys, 16.0);
        }
        assert!(rig.frank.vel.length() <= rig.frank.max_speed(&rig.tuning) + 1e-3);
        assert!(rig.frank.jetpack.fuel() < rig.tuning.max_fuel);
    }

    #[test]
    fn test_eating_credits_fullness() {
        let mut rig = Rig::new();
        rig.add_planet(Vec2::new(10.0, 0.0), 30.0);
        rig.add_planet(Vec2::new(-10.0, 0.0), 12.5);
        rig.collide();
        assert!(rig.universe.planets.iter().all(|p| p.entity.dead));
        assert!((rig.frank.fullness - 1.25).abs() < 1e-6);
        assert_eq!(rig.frank.stats.planets_eaten, 2);
    }

    #[test]
    fn test_soft_crash_pushes_out_without_damage() {
        let mut rig = Rig::new();
        rig.frank.vel = Vec2::new(10.0, 0.0);
        rig.add_planet(Vec2::new(100.0, 0.0), 60.0);
        rig.collide();
        let planet = &rig.universe.planets[0];
        assert!(!planet.entity.dead);
        assert!(rig.frank.pos.distance(planet.entity.pos) >= rig.frank.radius + 60.0);
        assert_eq!(rig.frank.jetpack.fuel(), rig.tuning.max_fuel);
        assert!(rig.events.iter().any(|e| *e == GameEvent::Play(SoundId::Kick)));
    }

    #[test]
    fn test_hard_crash_costs_fuel() {
        let mut rig = Rig::new();
        rig.frank.vel = Vec2::new(350.0, 0.0);
        rig.add_planet(Vec2::new(100.0, 0.0), 60.0);
        rig.collide();
        assert_eq!(rig.frank.jetpack.fuel(), rig.tuning.max_fuel * (1.0 - CRASH_FUEL_FRACTION));
        assert!(rig.timers.damage_flash > 0.0);
        assert!(rig.frank.vel.x < 0.0);
    }

    #[test]
    fn test_charging_destroys_smaller_target() {
        let mut rig = Rig::new();
        rig.step(hold(true), 16.0);
        for _ in 0..70 {
            rig.step(hold(true), 16.0);
        }
        rig.step(hold(false), 16.0);
        assert!(rig.frank.charger().is_charging());

        // 0.75R < 45 < R: not edible but instantly killed while charging
        let id = rig.universe.next_entity_id();
        let pos = rig.frank.pos + Vec2::new(60.0, 0.0);
        rig.universe.enemies.push(Enemy {
            entity: Entity::new(id, pos, 45.0, 100.0),
            vel: Vec2::ZERO,
            angle: 0.0,
            acceleration: 0.0,
            max_speed: 0.0,
            attack_timer: 0.0,
            attack_range: 0.0,
        });
        rig.collide();
        assert!(rig.universe.enemies[0].entity.dead);
        assert_eq!(rig.frank.fullness, 1.0);
        assert_eq!(rig.frank.stats.enemies_eaten, 1);
    }

    #[test]
    fn test_charging_into_big_planet_is_invulnerable() {
        let mut rig = Rig::new();
        rig.step(hold(true), 16.0);
        for _ in 0..70 {
            rig.step(hold(true), 16.0);
        }
        rig.step(hold(false), 16.0);

        let pos = rig.frank.pos + Vec2::new(200.0, 0.0);
        rig.add_planet(pos, 200.0);
        rig.frank.vel = Vec2::new(1500.0, 0.0);
        rig.collide();
        let planet = &rig.universe.planets[0];
        // floor(50 * 50 / 200) = 12
        assert_eq!(planet.entity.health, 88.0);
        assert!(!planet.entity.dead);
        assert_eq!(rig.frank.jetpack.fuel(), rig.tuning.max_fuel);
    }

    #[test]
    fn test_projectile_hit() {
        let mut rig = Rig::new();
        let id = rig.universe.next_entity_id();
        rig.universe.projectiles.push(Projectile {
            entity: Entity::new(id, Vec2::new(5.0, 0.0), 5.0, 1.0),
            angle: 0.0,
            ttl: 1000.0,
            speed: 100.0,
            damage: 40.0,
        });
        rig.collide();
        assert!(rig.universe.projectiles[0].entity.dead);
        assert_eq!(rig.frank.jetpack.fuel(), rig.tuning.max_fuel - 40.0);
        assert!(rig.timers.damage_flash > 0.0);
    }

    #[test]
    fn test_item_stacking_on_pickup() {
        let mut rig = Rig::new();
        for _ in 0..2 {
            let id = rig.universe.next_entity_id();
            rig.universe.items.push(WorldItem {
                entity: Entity::new(id, Vec2::new(5.0, 0.0), 10.0, 1.0),
                item: ItemKind::FuelTank,
                acquired: false,
            });
            rig.collide();
        }
        assert_eq!(rig.frank.items.len(), 1);
        let tank = rig.frank.items.get(ItemKind::FuelTank).unwrap();
        assert_eq!(tank.level, 2);
        assert!((tank.modify_max_fuel(1000.0) - 1200.0).abs() < 1e-3);
        assert!(rig.universe.items.iter().all(|i| i.acquired));
    }

    #[test]
    fn test_evolve_resets_and_grows() {
        let mut rig = Rig::new();
        rig.frank.fullness = 10.0;
        rig.frank.jetpack.damage(500.0);
        rig.frank.evolve(&rig.tuning);
        assert_eq!(rig.frank.level, 1);
        assert_eq!(rig.frank.fullness, 0.0);
        assert!((rig.frank.radius - (50.0 + 35.0 * 2f32.ln())).abs() < 1e-4);
        assert_eq!(rig.frank.jetpack.fuel(), rig.tuning.max_fuel);
    }

    #[test]
    fn test_bounce_clears_later_overlaps() {
        let mut rig = Rig::new();
        rig.add_planet(Vec2::new(80.0, 0.0), 60.0);
        rig.add_planet(Vec2::new(55.0, 0.0), 10.0);
        rig.collide();

        assert!(rig.frank.pos.x < -29.0);
        let snack = &rig.universe.planets[1];
        assert!(rig.frank.pos.distance(snack.entity.pos) > rig.frank.radius + 10.0);
        assert!(!snack.entity.dead);
        assert_eq!(rig.frank.fullness, 0.0);
        assert_eq!(rig.frank.stats.planets_eaten, 0);
    }

    #[test]
    fn test_movement_scales_with_radius() {
        let mut rig = Rig::new();
        let base_speed = rig.frank.max_speed(&rig.tuning);
        let base_accel = rig.frank.acceleration(&rig.tuning);
        assert_eq!(base_speed, rig.tuning.max_speed);

        rig.frank.evolve(&rig.tuning);
        let scale = rig.frank.radius / rig.tuning.base_radius;
        assert!(scale > 1.0);
        assert!((rig.frank.max_speed(&rig.tuning) - base_speed * scale).abs() < 1e-3);
        assert!((rig.frank.acceleration(&rig.tuning) - base_accel * scale).abs() < 1e-3);
    }
}
