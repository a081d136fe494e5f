//! battle_core - Combat resolution and character progression for a turn-based roguelike
//!
//! This library provides:
//! - Stat aggregation: class scaling, item bonuses, status effects and passives
//! - Damage resolution: damage packets, crits, resistance mitigation and shields
//! - Crowd control: tenacity-reduced durations, immunity and action gating
//! - Passives: item-granted effects with event hooks and persistent stacks
//! - Progression: the experience curve and level-up boosts
//! - Rewards: loot, gold, experience and milestone offers after a kill
//! - Persistence boundary: run snapshots behind a `ProfileStore`

pub mod character;
pub mod combat;
pub mod config;
pub mod content;
pub mod crowd_control;
pub mod damage;
pub mod defense;
pub mod passive;
pub mod persistence;
pub mod prelude;
pub mod progression;
pub mod reward;
pub mod source;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use character::{Character, CrowdControlApplication, TurnEnd};
pub use combat::{resolve_action, ActionKind, ActionOutcome, Battle, BattleSummary, DamageTaken, Side};
pub use config::{ConfigError, GameConstants};
pub use content::{ContentCatalog, ContentError, EnemyRequest, EnemyTemplate, ItemDefinition};
pub use crowd_control::{CrowdControlEffect, CrowdControlKind};
pub use damage::{Ability, DamagePacket};
pub use defense::{MitigatedDamage, ShieldInstance};
pub use passive::{PassiveId, PassiveManager, PassiveTrigger};
pub use persistence::{InMemoryProfileStore, ProfileStore, RunKey, RunSnapshot, StoreError};
pub use progression::LevelUp;
pub use reward::{BattleRewardResult, RewardContext, RewardError, RewardFlow, RewardState};
pub use source::{StatSource, StatusEffect};
pub use stat_block::{aggregate, CharacterStats, StatKind};
pub use types::{CharacterClass, EnemyTier, Faction, InventoryEntry, ItemId, Rarity, Role};
