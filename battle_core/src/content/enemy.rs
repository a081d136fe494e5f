//! Enemy templates, typed spawn requests and spawning

use super::ContentCatalog;
use crate::character::Character;
use crate::damage::Ability;
use crate::progression::enemy_level;
use crate::stat_block::CharacterStats;
use crate::types::{CharacterClass, EnemyTier, Faction, InventoryEntry, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Static description of an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub tier: EnemyTier,
    pub faction: Faction,
    pub class: CharacterClass,
    #[serde(default = "CharacterStats::starter")]
    pub base_stats: CharacterStats,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl EnemyTemplate {
    pub const PLACEHOLDER_ID: &'static str = "placeholder";

    /// Generic enemy used when content lookups fail
    pub fn placeholder(tier: EnemyTier) -> Self {
        EnemyTemplate {
            id: Self::PLACEHOLDER_ID.to_string(),
            name: "Wandering Shade".to_string(),
            tier,
            faction: Faction::Undead,
            class: CharacterClass::Warrior,
            base_stats: CharacterStats::starter(),
            inventory: Vec::new(),
            abilities: Vec::new(),
        }
    }
}

/// Typed "any enemy of this tier (and faction)" request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyRequest {
    pub tier: EnemyTier,
    /// `None` accepts any faction
    #[serde(default)]
    pub faction: Option<Faction>,
}

impl EnemyRequest {
    pub fn new(tier: EnemyTier, faction: Option<Faction>) -> Self {
        EnemyRequest { tier, faction }
    }

    pub fn matches(&self, template: &EnemyTemplate) -> bool {
        template.tier == self.tier && self.faction.map_or(true, |f| template.faction == f)
    }
}

/// Create a battle-ready enemy for a floor
///
/// The enemy's level comes from the floor and tier; its inventory's flat
/// bonuses are folded in from the catalog and it starts at full health.
pub fn spawn_enemy(template: &EnemyTemplate, floor: u32, catalog: &ContentCatalog) -> Character {
    let level = enemy_level(floor, template.tier);
    let mut enemy = Character::new(
        format!("{}_f{}", template.id, floor),
        template.name.clone(),
        Role::Enemy,
        template.class,
        level,
        template.base_stats,
    );
    enemy.tier = Some(template.tier);
    enemy.inventory = template.inventory.clone();
    enemy.abilities = template.abilities.clone();
    enemy.refresh_equipment(catalog);
    enemy.restore_full(&[]);
    debug!(enemy = %enemy.id, level, tier = ?template.tier, "enemy spawned");
    enemy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ItemDefinition;
    use crate::stat_block::StatKind;
    use crate::types::{ItemId, Rarity};
    use std::collections::HashMap;

    #[test]
    fn test_spawn_scales_level_with_floor() {
        let catalog = ContentCatalog::new();
        let template = EnemyTemplate::placeholder(EnemyTier::Elite);
        let enemy = spawn_enemy(&template, 6, &catalog);

        assert_eq!(enemy.level, 6);
        assert_eq!(enemy.role, Role::Enemy);
        assert_eq!(enemy.tier, Some(EnemyTier::Elite));
        // starter 100 + warrior 12/level * 6
        assert!((enemy.current_health - 172.0).abs() < f64::EPSILON);
        assert!((enemy.max_health(&[]) - 172.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_spawn_applies_inventory_bonuses() {
        let mut catalog = ContentCatalog::new();
        catalog.add_item(ItemDefinition {
            id: ItemId::from("bone_plate"),
            name: "Bone Plate".to_string(),
            rarity: Rarity::Common,
            stats: HashMap::from([(StatKind::Armor, 15.0)]),
            passive: None,
            classes: vec![],
            lootable: false,
        });
        let mut template = EnemyTemplate::placeholder(EnemyTier::Minion);
        template.inventory = vec![InventoryEntry::new("bone_plate", 2)];

        let enemy = spawn_enemy(&template, 0, &catalog);
        let stats = enemy.scaled_stats(&[]);
        // starter 10 + 30 from items + warrior 1.5 * 1 rounded
        assert!((stats.armor - 42.0).abs() < f64::EPSILON);
        assert!((enemy.base_stats.armor - 10.0).abs() < f64::EPSILON);
    }
}
