//! Action outcomes - What a resolved action did, for the presentation layer

use crate::crowd_control::CrowdControlKind;
use crate::defense::MitigatedDamage;
use serde::{Deserialize, Serialize};

/// Damage a character absorbed after mitigation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageTaken {
    /// Soaked by shields
    pub absorbed_by_shields: f64,
    /// Removed from current health
    pub health_damage: f64,
    /// Damage beyond remaining health
    pub overkill: f64,
    /// Crowd control that ended because damage was taken
    pub broken_crowd_control: Vec<CrowdControlKind>,
}

impl DamageTaken {
    pub fn total(&self) -> f64 {
        self.absorbed_by_shields + self.health_damage
    }
}

/// Effect produced by an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppliedEffect {
    CrowdControl { kind: CrowdControlKind, turns: f64 },
    CrowdControlResisted { kind: CrowdControlKind },
    CrowdControlImmune { kind: CrowdControlKind },
    CrowdControlBroken { kind: CrowdControlKind },
    Shield { target: String, amount: f64 },
    Status { target: String, id: String },
}

/// Result of one action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Damage that landed on the defender (shields plus health)
    pub damage_dealt: f64,
    /// Per-type mitigation breakdown of the hit
    pub mitigation: MitigatedDamage,
    /// Healing received by the attacker
    pub healing_done: f64,
    pub is_critical: bool,
    pub effects_applied: Vec<AppliedEffect>,
    /// Player-facing battle log lines
    pub log_messages: Vec<String>,
    /// The action could not be taken (crowd control or mana)
    pub blocked: bool,
    /// The defender died from this action
    pub killed: bool,
    /// Flat gold added to the kill reward by on-kill passives
    pub bonus_gold: f64,
}

impl ActionOutcome {
    pub(crate) fn blocked(message: String) -> Self {
        ActionOutcome {
            blocked: true,
            log_messages: vec![message],
            ..Self::default()
        }
    }

    pub(crate) fn log(&mut self, message: impl Into<String>) {
        self.log_messages.push(message.into());
    }
}
