//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the `GameState`
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies; those are reached
//!   through the event queue

pub mod belt;
pub mod charger;
pub mod collision;
pub mod entity;
pub mod events;
pub mod items;
pub mod jetpack;
pub mod player;
pub mod state;
pub mod tick;
pub mod timers;
pub mod universe;

pub use belt::{Belt, Placement, spawn_next_belt};
pub use charger::{ChargeState, Charger};
pub use collision::{CollisionResult, circle_contact, detect, fullness_gain, is_edible};
pub use entity::{Body, Enemy, Entity, EntityId, EntityKind, Planet, PlanetKind, Projectile, WorldItem};
pub use events::{EventQueue, GameEvent, SoundId};
pub use items::{Inventory, ItemKind, SpaceItem, Stat};
pub use jetpack::Jetpack;
pub use player::{Frank, PlayerStats, radius_for_level};
pub use state::{Camera, GamePhase, GameState, Keys};
pub use tick::{TickInput, tick};
pub use timers::Timers;
pub use universe::Universe;
