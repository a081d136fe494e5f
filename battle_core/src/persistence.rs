//! Persistence boundary - Run snapshots and the profile store
//!
//! The engine never touches storage directly. It hands a [`RunSnapshot`] to a
//! [`ProfileStore`] at flush points (battle end, victory, run save) and reads
//! one back at run start.

use crate::character::Character;
use crate::combat::BattleSummary;
use crate::passive::PassiveId;
use crate::types::{add_to_inventory, InventoryEntry, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("No snapshot stored for {0}")]
    NotFound(RunKey),
}

/// Snapshots are keyed per user and run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunKey {
    pub user_id: String,
    pub run_id: String,
}

impl RunKey {
    pub fn new(user_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        RunKey {
            user_id: user_id.into(),
            run_id: run_id.into(),
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.run_id)
    }
}

/// Run state that survives between battles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSnapshot {
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    pub inventory: Vec<InventoryEntry>,
    pub permanent_stacks: HashMap<PassiveId, u32>,
    pub floor: u32,
    pub region: String,
    pub visited_regions: Vec<String>,
}

impl Default for RunSnapshot {
    fn default() -> Self {
        RunSnapshot {
            level: 1,
            experience: 0,
            gold: 0,
            inventory: Vec::new(),
            permanent_stacks: HashMap::new(),
            floor: 1,
            region: String::new(),
            visited_regions: Vec::new(),
        }
    }
}

impl RunSnapshot {
    /// Fresh run starting on floor 1 of `region`
    pub fn new(region: impl Into<String>) -> Self {
        let mut snapshot = RunSnapshot::default();
        snapshot.enter_region(region);
        snapshot
    }

    pub fn add_item(&mut self, item_id: &ItemId, quantity: u32) {
        add_to_inventory(&mut self.inventory, item_id, quantity);
    }

    pub fn advance_floor(&mut self) -> u32 {
        self.floor = self.floor.saturating_add(1);
        self.floor
    }

    /// Move to a region, recording it the first time it is visited
    pub fn enter_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if !self.visited_regions.contains(&region) {
            self.visited_regions.push(region.clone());
        }
        self.region = region;
    }

    /// Copy the player's progression into the snapshot
    pub fn capture(&mut self, player: &Character) {
        self.level = player.level;
        self.experience = player.experience;
        self.inventory = player.inventory.clone();
    }

    /// Carry a finished battle's persistent passive stacks
    pub fn record_battle(&mut self, summary: &BattleSummary) {
        for (id, count) in &summary.permanent_stacks {
            self.permanent_stacks.insert(*id, *count);
        }
        debug!(stacks = self.permanent_stacks.len(), turns = summary.turns, "battle recorded");
    }
}

/// Get/set storage for run snapshots
pub trait ProfileStore {
    fn get(&self, key: &RunKey) -> Result<Option<RunSnapshot>, StoreError>;

    fn set(&mut self, key: &RunKey, snapshot: &RunSnapshot) -> Result<(), StoreError>;

    /// Read-modify-write of an existing snapshot
    fn update<F>(&mut self, key: &RunKey, f: F) -> Result<RunSnapshot, StoreError>
    where
        F: FnOnce(&mut RunSnapshot),
        Self: Sized,
    {
        let mut snapshot = self.get(key)?.ok_or_else(|| StoreError::NotFound(key.clone()))?;
        f(&mut snapshot);
        self.set(key, &snapshot)?;
        Ok(snapshot)
    }
}

/// Store that keeps serialized snapshots in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    entries: HashMap<RunKey, String>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, key: &RunKey) -> Result<Option<RunSnapshot>, StoreError> {
        self.entries
            .get(key)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    fn set(&mut self, key: &RunKey, snapshot: &RunSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        debug!(key = %key, bytes = json.len(), "snapshot saved");
        self.entries.insert(key.clone(), json);
        Ok(())
    }
}
