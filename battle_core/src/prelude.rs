//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Core types
pub use crate::character::Character;
pub use crate::stat_block::{CharacterStats, StatKind};
pub use crate::types::{CharacterClass, EnemyTier, Faction, InventoryEntry, ItemId, Rarity, Role};

// Combat
pub use crate::combat::{ActionKind, ActionOutcome, Battle, BattleSummary, Side};
pub use crate::damage::{Ability, DamagePacket};
pub use crate::crowd_control::{CrowdControlEffect, CrowdControlKind};

// Passives
pub use crate::passive::{PassiveId, PassiveManager};

// Content and config
pub use crate::config::GameConstants;
pub use crate::content::{spawn_enemy, ContentCatalog, EnemyRequest};

// Progression and rewards
pub use crate::progression::LevelUp;
pub use crate::reward::{RewardContext, RewardFlow};

// Persistence
pub use crate::persistence::{InMemoryProfileStore, ProfileStore, RunKey, RunSnapshot};
