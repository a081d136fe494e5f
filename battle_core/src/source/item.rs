//! ItemSource - Flat stat bonuses from owned items

use crate::content::{ContentCatalog, ItemDefinition};
use crate::source::StatSource;
use crate::stat_block::CharacterStats;
use crate::types::InventoryEntry;
use tracing::warn;

/// Stats from one inventory line
pub struct ItemSource<'a> {
    pub item: &'a ItemDefinition,
    pub quantity: u32,
}

impl<'a> ItemSource<'a> {
    pub fn new(item: &'a ItemDefinition, quantity: u32) -> Self {
        ItemSource { item, quantity }
    }
}

impl StatSource for ItemSource<'_> {
    fn id(&self) -> &str {
        &self.item.id.0
    }

    fn apply(&self, stats: &CharacterStats) -> CharacterStats {
        apply_item(stats, self.item, self.quantity)
    }
}

/// Add an item's flat bonuses, once per copy, returning a new stat record
pub fn apply_item(stats: &CharacterStats, item: &ItemDefinition, quantity: u32) -> CharacterStats {
    let copies = f64::from(quantity);
    item.stats
        .iter()
        .fold(*stats, |acc, (&kind, &value)| acc.plus(kind, value * copies))
}

/// Fold every owned item's bonuses into `base`
///
/// Inventory lines whose item is missing from the catalog are skipped.
pub fn equipped_bonuses(
    base: &CharacterStats,
    inventory: &[InventoryEntry],
    catalog: &ContentCatalog,
) -> CharacterStats {
    inventory
        .iter()
        .filter(|entry| entry.quantity > 0)
        .fold(*base, |acc, entry| match catalog.item(&entry.item_id) {
            Some(item) => ItemSource::new(item, entry.quantity).apply(&acc),
            None => {
                warn!(item_id = %entry.item_id, "unknown item in inventory, ignoring its stats");
                acc
            }
        })
}
