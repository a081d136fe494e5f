//! Content catalog - read-only item and enemy lookups loaded from TOML

mod enemy;
mod item;

pub use enemy::{spawn_enemy, EnemyRequest, EnemyTemplate};
pub use item::ItemDefinition;

use crate::types::{CharacterClass, ItemId, Rarity};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Content loading error
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse content TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),
    #[error("Duplicate enemy id: {0}")]
    DuplicateEnemy(String),
}

/// On-disk shape of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    items: Vec<ItemDefinition>,
    enemies: Vec<EnemyTemplate>,
}

/// Read-only item and enemy tables
///
/// Items are kept in id order so pools built from the catalog are stable
/// for a given seed.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    items: BTreeMap<ItemId, ItemDefinition>,
    enemies: Vec<EnemyTemplate>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item definition
    pub fn add_item(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    /// Insert or replace an enemy template
    pub fn add_enemy(&mut self, template: EnemyTemplate) {
        match self.enemies.iter_mut().find(|e| e.id == template.id) {
            Some(existing) => *existing = template,
            None => self.enemies.push(template),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemies(&self) -> &[EnemyTemplate] {
        &self.enemies
    }

    /// Enemy by id, or the generic placeholder when the id is unknown
    pub fn enemy_or_placeholder(&self, id: &str, request: EnemyRequest) -> EnemyTemplate {
        match self.enemy(id) {
            Some(template) => template.clone(),
            None => {
                warn!(enemy_id = id, "unknown enemy id, using placeholder");
                EnemyTemplate::placeholder(request.tier)
            }
        }
    }

    /// Pick a random enemy matching a typed request
    ///
    /// Falls back to any enemy of the tier when no faction match exists,
    /// then to the placeholder.
    pub fn resolve_request(&self, request: EnemyRequest, rng: &mut impl Rng) -> EnemyTemplate {
        let exact: Vec<&EnemyTemplate> = self.enemies.iter().filter(|e| request.matches(e)).collect();
        if let Some(template) = exact.choose(rng) {
            return (*template).clone();
        }

        let same_tier: Vec<&EnemyTemplate> = self.enemies.iter().filter(|e| e.tier == request.tier).collect();
        if let Some(template) = same_tier.choose(rng) {
            warn!(?request, enemy_id = %template.id, "no enemy for faction, using same tier");
            return (*template).clone();
        }

        warn!(?request, "no enemy matches request, using placeholder");
        EnemyTemplate::placeholder(request.tier)
    }

    /// Lootable items of one rarity a class can use
    pub fn loot_pool(&self, class: CharacterClass, rarity: Rarity) -> Vec<&ItemDefinition> {
        self.items
            .values()
            .filter(|item| item.lootable && item.rarity == rarity && item.fits_class(class))
            .collect()
    }

    /// Lootable items at or above a rarity a class can use
    pub fn milestone_pool(&self, class: CharacterClass, min_rarity: Rarity) -> Vec<&ItemDefinition> {
        self.items
            .values()
            .filter(|item| item.lootable && item.rarity >= min_rarity && item.fits_class(class))
            .collect()
    }
}

/// Parse a catalog from TOML (`[[items]]` and `[[enemies]]` tables)
pub fn parse_catalog(content: &str) -> Result<ContentCatalog, ContentError> {
    let file: CatalogFile = toml::from_str(content)?;
    let mut catalog = ContentCatalog::new();

    for item in file.items {
        if catalog.items.contains_key(&item.id) {
            return Err(ContentError::DuplicateItem(item.id));
        }
        catalog.add_item(item);
    }
    for enemy in file.enemies {
        if catalog.enemy(&enemy.id).is_some() {
            return Err(ContentError::DuplicateEnemy(enemy.id));
        }
        catalog.add_enemy(enemy);
    }

    Ok(catalog)
}

/// Load a catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<ContentCatalog, ContentError> {
    let content = fs::read_to_string(path)?;
    parse_catalog(&content)
}
