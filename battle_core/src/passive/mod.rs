//! Item passives - registry, trigger dispatch and stack tracking

mod context;
mod manager;
mod registry;

pub use context::{EffectTarget, PassiveAction, PassiveContext, PassiveStacks};
pub use manager::{PassiveInstance, PassiveManager};
pub use registry::{EventHookFn, PassiveBehavior, PassiveRegistry};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for every implemented item passive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveId {
    LifeDraining,
    EnduringFocus,
    Drain,
    Pathfinder,
    MagicalOpus,
    Reap,
    Glory,
    GloryUpgraded,
}

impl PassiveId {
    pub fn all() -> &'static [PassiveId] {
        &[
            PassiveId::LifeDraining,
            PassiveId::EnduringFocus,
            PassiveId::Drain,
            PassiveId::Pathfinder,
            PassiveId::MagicalOpus,
            PassiveId::Reap,
            PassiveId::Glory,
            PassiveId::GloryUpgraded,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PassiveId::LifeDraining => "life_draining",
            PassiveId::EnduringFocus => "enduring_focus",
            PassiveId::Drain => "drain",
            PassiveId::Pathfinder => "pathfinder",
            PassiveId::MagicalOpus => "magical_opus",
            PassiveId::Reap => "reap",
            PassiveId::Glory => "glory",
            PassiveId::GloryUpgraded => "glory_upgraded",
        }
    }
}

impl fmt::Display for PassiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized passive name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown passive: {0}")]
pub struct UnknownPassive(pub String);

impl FromStr for PassiveId {
    type Err = UnknownPassive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassiveId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownPassive(s.to_string()))
    }
}

/// Battle events passives can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveTrigger {
    BattleStart,
    TurnStart,
    TurnEnd,
    OnHit,
    OnDamageTaken,
    OnKill,
    OnHeal,
    StatCalculation,
    BattleEnd,
}
