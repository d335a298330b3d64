//! World entities
//!
//! Every live thing in the universe shares an [`Entity`] core (id, position,
//! radius, health, dead flag). Concrete types embed it and expose it through
//! [`Body`], which is all the collision code needs to know about them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::items::ItemKind;

/// Stable handle shared with the presenter
pub type EntityId = u32;

/// Entity kinds, used by presenters to pick a visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Planet,
    TreasurePlanet,
    Enemy,
    Projectile,
    Item,
}

/// Shared entity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    /// Marked for removal on the owning collection's next sweep
    pub dead: bool,
    pub health: f32,
    pub max_health: f32,
}

impl Entity {
    pub fn new(id: EntityId, pos: Vec2, radius: f32, health: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            dead: false,
            health,
            max_health: health,
        }
    }

    /// Subtract health, returns true when the entity is out of health
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.health <= 0.0
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }
}

/// Anything that can show up in a collision query
pub trait Body {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;
    fn kind(&self) -> EntityKind;

    /// Visual rotation
    fn rotation(&self) -> f32 {
        0.0
    }

    fn id(&self) -> EntityId {
        self.entity().id
    }

    fn pos(&self) -> Vec2 {
        self.entity().pos
    }

    fn radius(&self) -> f32 {
        self.entity().radius
    }

    fn is_dead(&self) -> bool {
        self.entity().dead
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetKind {
    Regular,
    /// Drops an item when destroyed
    Treasure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub entity: Entity,
    pub kind: PlanetKind,
    /// Cosmetic spin
    pub angle: f32,
}

impl Planet {
    pub fn new(id: EntityId, kind: PlanetKind, pos: Vec2, radius: f32, health: f32) -> Self {
        Self {
            entity: Entity::new(id, pos, radius, health),
            kind,
            angle: 0.0,
        }
    }

    pub fn is_treasure(&self) -> bool {
        self.kind == PlanetKind::Treasure
    }
}

impl Body for Planet {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        match self.kind {
            PlanetKind::Regular => EntityKind::Planet,
            PlanetKind::Treasure => EntityKind::TreasurePlanet,
        }
    }

    fn rotation(&self) -> f32 {
        self.angle
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub entity: Entity,
    pub vel: Vec2,
    /// Facing (follows velocity)
    pub angle: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    /// Countdown until the next shot (ms)
    pub attack_timer: f32,
    pub attack_range: f32,
}

impl Body for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn rotation(&self) -> f32 {
        self.angle
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub entity: Entity,
    /// Fixed heading
    pub angle: f32,
    /// Remaining lifetime (ms)
    pub ttl: f32,
    pub speed: f32,
    /// Fuel removed from the player on hit
    pub damage: f32,
}

impl Projectile {
    /// Fly along the heading and burn lifetime. Returns false once expired.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        let dt = delta_ms / 1000.0;
        self.entity.pos += Vec2::from_angle(self.angle) * self.speed * dt;
        self.ttl -= delta_ms;
        self.ttl > 0.0
    }
}

impl Body for Projectile {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn rotation(&self) -> f32 {
        self.angle
    }
}

/// An item floating in space, waiting to be picked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldItem {
    pub entity: Entity,
    pub item: ItemKind,
    pub acquired: bool,
}

impl Body for WorldItem {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }
}
