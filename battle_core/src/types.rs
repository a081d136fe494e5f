//! Core types shared across the battle engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Character archetype. Each class carries a fixed per-level bonus table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Marksman,
    Assassin,
    Tank,
    Support,
    Bruiser,
    Necromancer,
}

impl CharacterClass {
    /// Get all character classes
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Marksman,
            CharacterClass::Assassin,
            CharacterClass::Tank,
            CharacterClass::Support,
            CharacterClass::Bruiser,
            CharacterClass::Necromancer,
        ]
    }
}

/// Who controls a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Enemy,
}

/// Enemy strength tier. Drives exp, gold and spawn level tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyTier {
    Minion,
    Elite,
    Boss,
    Legend,
}

impl EnemyTier {
    /// Base experience before level and level-gap scaling
    pub fn base_exp(self) -> f64 {
        match self {
            EnemyTier::Minion => 5.0,
            EnemyTier::Elite => 12.0,
            EnemyTier::Boss => 30.0,
            EnemyTier::Legend => 60.0,
        }
    }

    /// Base gold before floor and gold-gain scaling
    pub fn base_gold(self) -> f64 {
        match self {
            EnemyTier::Minion => 10.0,
            EnemyTier::Elite => 25.0,
            EnemyTier::Boss => 60.0,
            EnemyTier::Legend => 150.0,
        }
    }

    /// Spawn level on floor 0
    pub fn base_level(self) -> u32 {
        match self {
            EnemyTier::Minion => 1,
            EnemyTier::Elite => 3,
            EnemyTier::Boss => 5,
            EnemyTier::Legend => 8,
        }
    }

    /// Whether enemies of this tier roll randomized loot
    pub fn drops_random_loot(self) -> bool {
        !matches!(self, EnemyTier::Legend)
    }
}

/// Enemy faction, used to pick thematically matching enemies for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Undead,
    Beast,
    Bandit,
    Arcane,
    Demon,
}

/// Item rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// Steps above common (0 for common)
    pub fn step(self) -> u32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

/// Identifier for an item in the content catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inventory line: an item and how many copies are owned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl InventoryEntry {
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        InventoryEntry {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Add copies of an item to an inventory, merging with an existing line
pub fn add_to_inventory(inventory: &mut Vec<InventoryEntry>, item_id: &ItemId, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match inventory.iter_mut().find(|e| &e.item_id == item_id) {
        Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
        None => inventory.push(InventoryEntry::new(item_id.clone(), quantity)),
    }
}
