//! Stat-modifying items
//!
//! Items are held in acquisition order; every stat query runs the base value
//! through each held item's modifier in that order. Picking up an item the
//! player already owns bumps its level instead of adding a second entry.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest factor a shrinking modifier can reach
const MIN_FACTOR: f32 = 0.1;

/// Per-level strength of every modifier
const STEP_PER_LEVEL: f32 = 0.1;

/// Item catalogue. The kind doubles as the item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Bigger fuel pool
    FuelTank,
    /// Stronger thrust
    Booster,
    /// Higher top speed
    Engine,
    /// Faster charge-up
    Capacitor,
    /// Shorter charge cooldown
    Coolant,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::FuelTank,
        ItemKind::Booster,
        ItemKind::Engine,
        ItemKind::Capacitor,
        ItemKind::Coolant,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ItemKind::FuelTank => "fuel_tank",
            ItemKind::Booster => "booster",
            ItemKind::Engine => "engine",
            ItemKind::Capacitor => "capacitor",
            ItemKind::Coolant => "coolant",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ItemKind::FuelTank => "Increases maximum fuel",
            ItemKind::Booster => "Increases jetpack acceleration",
            ItemKind::Engine => "Increases maximum speed",
            ItemKind::Capacitor => "Shortens charge-up time",
            ItemKind::Coolant => "Shortens charge cooldown",
        }
    }

    /// Uniformly random item (treasure drops)
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Which stat a modifier applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Acceleration,
    MaxSpeed,
    ChargeUpDuration,
    ChargeCooldown,
    MaxFuel,
}

/// A held item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceItem {
    pub kind: ItemKind,
    pub level: u32,
}

impl SpaceItem {
    pub fn new(kind: ItemKind) -> Self {
        Self { kind, level: 1 }
    }

    fn grow(&self) -> f32 {
        1.0 + STEP_PER_LEVEL * self.level as f32
    }

    fn shrink(&self) -> f32 {
        (1.0 - STEP_PER_LEVEL * self.level as f32).max(MIN_FACTOR)
    }

    /// Apply this item to `value` if it affects `stat`, identity otherwise
    pub fn modify(&self, stat: Stat, value: f32) -> f32 {
        match (self.kind, stat) {
            (ItemKind::FuelTank, Stat::MaxFuel) => value * self.grow(),
            (ItemKind::Booster, Stat::Acceleration) => value * self.grow(),
            (ItemKind::Engine, Stat::MaxSpeed) => value * self.grow(),
            (ItemKind::Capacitor, Stat::ChargeUpDuration) => value * self.shrink(),
            (ItemKind::Coolant, Stat::ChargeCooldown) => value * self.shrink(),
            _ => value,
        }
    }

    pub fn modify_acceleration(&self, value: f32) -> f32 {
        self.modify(Stat::Acceleration, value)
    }

    pub fn modify_max_speed(&self, value: f32) -> f32 {
        self.modify(Stat::MaxSpeed, value)
    }

    pub fn modify_charge_up_duration(&self, value: f32) -> f32 {
        self.modify(Stat::ChargeUpDuration, value)
    }

    pub fn modify_charge_cooldown(&self, value: f32) -> f32 {
        self.modify(Stat::ChargeCooldown, value)
    }

    pub fn modify_max_fuel(&self, value: f32) -> f32 {
        self.modify(Stat::MaxFuel, value)
    }
}

/// Items held by the player, in acquisition order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<SpaceItem>,
}

impl Inventory {
    /// Add an item or stack it onto the existing one. Returns the resulting level.
    pub fn acquire(&mut self, kind: ItemKind) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|i| i.kind == kind) {
            existing.level += 1;
            existing.level
        } else {
            self.items.push(SpaceItem::new(kind));
            1
        }
    }

    pub fn get(&self, kind: ItemKind) -> Option<&SpaceItem> {
        self.items.iter().find(|i| i.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpaceItem> {
        self.items.iter()
    }

    /// Run `base` through every held item in acquisition order
    pub fn apply(&self, stat: Stat, base: f32) -> f32 {
        self.items.iter().fold(base, |value, item| item.modify(stat, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fuel_tank_stacks() {
        let mut inv = Inventory::default();
        assert_eq!(inv.acquire(ItemKind::FuelTank), 1);
        assert_eq!(inv.acquire(ItemKind::FuelTank), 2);
        assert_eq!(inv.len(), 1);

        let tank = inv.get(ItemKind::FuelTank).unwrap();
        assert_eq!(tank.level, 2);
        assert!((tank.modify_max_fuel(1000.0) - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_unrelated_stats_are_identity() {
        let item = SpaceItem::new(ItemKind::Engine);
        assert_eq!(item.modify_acceleration(600.0), 600.0);
        assert_eq!(item.modify_max_fuel(1000.0), 1000.0);
        assert!((item.modify_max_speed(400.0) - 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_shrinking_modifier_floors() {
        let item = SpaceItem { kind: ItemKind::Coolant, level: 50 };
        assert!((item.modify_charge_cooldown(2000.0) - 200.0).abs() < 1e-3);
        let item = SpaceItem { kind: ItemKind::Capacitor, level: 3 };
        assert!((item.modify_charge_up_duration(1000.0) - 700.0).abs() < 1e-3);
    }

    #[test]
    fn test_pipeline_keeps_acquisition_order() {
        let mut inv = Inventory::default();
        inv.acquire(ItemKind::Coolant);
        inv.acquire(ItemKind::Booster);
        inv.acquire(ItemKind::Coolant);
        let order: Vec<_> = inv.iter().map(|i| i.kind).collect();
        assert_eq!(order, vec![ItemKind::Coolant, ItemKind::Booster]);
    }

    proptest! {
        #[test]
        fn prop_multiplicative_pipeline_is_order_independent(
            picks in prop::collection::vec(0usize..5, 0..12),
            base in 1.0f32..5000.0,
        ) {
            let mut forward = Inventory::default();
            let mut backward = Inventory::default();
            for &p in &picks {
                forward.acquire(ItemKind::ALL[p]);
            }
            for &p in picks.iter().rev() {
                backward.acquire(ItemKind::ALL[p]);
            }
            for stat in [Stat::Acceleration, Stat::MaxSpeed, Stat::ChargeUpDuration, Stat::ChargeCooldown, Stat::MaxFuel] {
                let a = forward.apply(stat, base);
                let b = backward.apply(stat, base);
                prop_assert!((a - b).abs() <= a.abs() * 1e-5);
            }
        }
    }
}
