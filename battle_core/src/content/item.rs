//! Item definitions

use crate::passive::PassiveId;
use crate::stat_block::StatKind;
use crate::types::{CharacterClass, ItemId, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// A catalog item: flat stats plus an optional passive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub rarity: Rarity,
    /// Flat bonuses per copy owned
    #[serde(default)]
    pub stats: HashMap<StatKind, f64>,
    /// Passive name as written in content
    #[serde(default)]
    pub passive: Option<String>,
    /// Classes that can roll this item; empty means every class
    #[serde(default)]
    pub classes: Vec<CharacterClass>,
    /// Whether the item can appear in random loot and milestone offers
    #[serde(default = "default_lootable")]
    pub lootable: bool,
}

fn default_lootable() -> bool {
    true
}

impl ItemDefinition {
    /// The item's passive, if it names one the engine implements
    pub fn passive_id(&self) -> Option<PassiveId> {
        let name = self.passive.as_deref()?;
        match name.parse() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(item_id = %self.id, %err, "item passive has no behavior, ignoring");
                None
            }
        }
    }

    pub fn fits_class(&self, class: CharacterClass) -> bool {
        self.classes.is_empty() || self.classes.contains(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(passive: Option<&str>) -> ItemDefinition {
        ItemDefinition {
            id: ItemId::from("trinket"),
            name: "Trinket".to_string(),
            rarity: Rarity::Uncommon,
            stats: HashMap::new(),
            passive: passive.map(str::to_string),
            classes: vec![CharacterClass::Tank],
            lootable: true,
        }
    }

    #[test]
    fn test_passive_id_parsing() {
        assert_eq!(item(Some("reap")).passive_id(), Some(PassiveId::Reap));
        assert_eq!(item(Some("thorns")).passive_id(), None);
        assert_eq!(item(None).passive_id(), None);
    }

    #[test]
    fn test_fits_class() {
        assert!(item(None).fits_class(CharacterClass::Tank));
        assert!(!item(None).fits_class(CharacterClass::Mage));
    }
}
