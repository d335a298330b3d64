//! The universe: every live entity except the player
//!
//! Each collection is swept of dead entities before it is updated, so no
//! update ever touches something killed earlier in the tick or the
//! previous one.

use glam::Vec2;
use rand::Rng;

use super::belt::spawn_next_belt;
use super::entity::{Body, Enemy, Entity, EntityId, Planet, Projectile, WorldItem};
use super::events::{EventQueue, GameEvent};
use super::items::ItemKind;
use super::player::Frank;
use super::state::Camera;
use super::timers::Timers;
use crate::error::{SimError, check_radius};
use crate::tuning::Tuning;

/// Spawn distance past the camera edge, in enemy radii
const ENEMY_SPAWN_MARGIN: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct Universe {
    pub planets: Vec<Planet>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub items: Vec<WorldItem>,
    /// Belts generated so far
    pub belts_spawned: u32,
    next_id: EntityId,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            planets: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            belts_spawned: 0,
            next_id: 1,
        }
    }
}

fn announce<T: Body>(entity: &T, events: &mut EventQueue) {
    events.emit(GameEvent::Spawned {
        id: entity.id(),
        kind: entity.kind(),
        pos: entity.pos(),
        radius: entity.radius(),
    });
}

/// Drop dead entities, emitting a despawn for each. Returns the removed ones.
fn sweep<T: Body>(list: &mut Vec<T>, events: &mut EventQueue) -> Vec<T> {
    let (dead, live): (Vec<T>, Vec<T>) = list.drain(..).partition(|e| e.is_dead());
    *list = live;
    for e in &dead {
        events.emit(GameEvent::Despawned { id: e.id() });
    }
    dead
}

impl Universe {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Total live entity count
    pub fn len(&self) -> usize {
        self.planets.len() + self.enemies.len() + self.projectiles.len() + self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generate a belt and add its planets. Returns how many were placed.
    pub fn spawn_belt(
        &mut self,
        evolution_index: u32,
        player_radius: f32,
        tuning: &Tuning,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> usize {
        let belt = spawn_next_belt(evolution_index, player_radius, tuning.belt_planet_count, rng);
        for placed in &belt.planets {
            let id = self.next_entity_id();
            let planet = Planet::new(id, placed.kind, placed.pos, placed.radius, tuning.planet_health);
            announce(&planet, events);
            self.planets.push(planet);
        }
        self.belts_spawned += 1;
        belt.planets.len()
    }

    /// Place a pickup in the world
    pub fn add_item(&mut self, pos: Vec2, item: ItemKind, radius: f32, events: &mut EventQueue) -> EntityId {
        let id = self.next_entity_id();
        let item = WorldItem {
            entity: Entity::new(id, pos, radius, 1.0),
            item,
            acquired: false,
        };
        announce(&item, events);
        self.items.push(item);
        id
    }

    /// Advance everything but the player by one tick
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        player: &Frank,
        camera: &Camera,
        delta_ms: f32,
        tuning: &Tuning,
        timers: &mut Timers,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> Result<(), SimError> {
        self.maybe_spawn_enemy(player, camera, tuning, timers, rng, events);
        self.update_enemies(player, camera, delta_ms, tuning, events)?;
        self.update_projectiles(delta_ms, events);
        self.update_planets(delta_ms, tuning, rng, events);
        self.update_items(events);
        Ok(())
    }

    fn maybe_spawn_enemy(
        &mut self,
        player: &Frank,
        camera: &Camera,
        tuning: &Tuning,
        timers: &mut Timers,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) {
        if timers.enemy_spawn > 0.0 || self.enemies.len() >= tuning.enemy_cap(player.level) {
            return;
        }

        let scale = player.radius / tuning.base_radius;
        let radius = player.radius * tuning.enemy_radius_factor;
        let pos = camera.perimeter_point(rng, radius * ENEMY_SPAWN_MARGIN);
        let id = self.next_entity_id();
        let enemy = Enemy {
            entity: Entity::new(id, pos, radius, tuning.enemy_health),
            vel: Vec2::ZERO,
            angle: 0.0,
            acceleration: tuning.enemy_acceleration * scale,
            max_speed: tuning.enemy_max_speed * scale,
            attack_timer: tuning.enemy_attack_interval_ms,
            attack_range: tuning.enemy_attack_range * scale,
        };
        log::debug!("Enemy {} spawned at ({:.0}, {:.0})", id, pos.x, pos.y);
        announce(&enemy, events);
        self.enemies.push(enemy);
        timers.enemy_spawn = tuning.enemy_spawn_interval_ms;
    }

    /// Chase/retreat around a sweet-spot distance and shoot when in range
    fn update_enemies(
        &mut self,
        player: &Frank,
        camera: &Camera,
        delta_ms: f32,
        tuning: &Tuning,
        events: &mut EventQueue,
    ) -> Result<(), SimError> {
        sweep(&mut self.enemies, events);

        let dt = delta_ms / 1000.0;
        let scale = player.radius / tuning.base_radius;
        let sweet_spot = tuning.enemy_sweet_spot / camera.zoom;
        let mut shots = Vec::new();

        for enemy in &mut self.enemies {
            check_radius("enemy", enemy.entity.radius)?;

            let to_player = player.pos - enemy.entity.pos;
            let dist = to_player.length();
            let dir = to_player.normalize_or_zero();

            let push = if dist > sweet_spot { dir } else { -dir };
            enemy.vel += push * enemy.acceleration * dt;
            enemy.vel = enemy.vel.clamp_length_max(enemy.max_speed);
            enemy.entity.pos += enemy.vel * dt;
            if enemy.vel != Vec2::ZERO {
                enemy.angle = enemy.vel.y.atan2(enemy.vel.x);
            }

            enemy.attack_timer = (enemy.attack_timer - delta_ms).max(0.0);
            if dist <= enemy.attack_range && enemy.attack_timer <= 0.0 {
                enemy.attack_timer = tuning.enemy_attack_interval_ms;
                let muzzle = enemy.entity.pos + dir * enemy.entity.radius;
                shots.push((muzzle, to_player.y.atan2(to_player.x), enemy.entity.radius));
                log::trace!("Enemy {} fired", enemy.entity.id);
            }
        }

        for (pos, angle, shooter_radius) in shots {
            let id = self.next_entity_id();
            let projectile = Projectile {
                entity: Entity::new(id, pos, shooter_radius * tuning.projectile_radius_factor, 1.0),
                angle,
                ttl: tuning.projectile_ttl_ms,
                speed: tuning.projectile_speed * scale,
                damage: tuning.projectile_damage,
            };
            announce(&projectile, events);
            self.projectiles.push(projectile);
        }

        Ok(())
    }

    fn update_projectiles(&mut self, delta_ms: f32, events: &mut EventQueue) {
        for p in &mut self.projectiles {
            if p.ttl <= 0.0 {
                p.entity.kill();
            }
        }
        sweep(&mut self.projectiles, events);

        for p in &mut self.projectiles {
            if !p.advance(delta_ms) {
                p.entity.kill();
            }
        }
    }

    fn update_items(&mut self, events: &mut EventQueue) {
        for item in &mut self.items {
            if item.acquired {
                item.entity.kill();
            }
        }
        sweep(&mut self.items, events);
    }

    fn update_planets(&mut self, delta_ms: f32, tuning: &Tuning, rng: &mut impl Rng, events: &mut EventQueue) {
        for planet in sweep(&mut self.planets, events) {
            if planet.is_treasure() {
                let item = ItemKind::random(rng);
                log::debug!("Treasure planet {} destroyed, dropping {}", planet.id(), item.id());
                events.emit(GameEvent::SpawnItem { pos: planet.pos(), item });
            }
        }

        let spin = tuning.planet_spin * delta_ms / 1000.0;
        for planet in &mut self.planets {
            planet.angle += spin;
        }
    }
}
