//! Ability - Data-driven description of how an action deals damage

use crate::crowd_control::CrowdControlKind;
use serde::{Deserialize, Serialize};

/// Describes how an ability calculates its damage and side effects
/// Loadable from TOML content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Unique ability identifier
    pub id: String,
    /// Display name
    pub name: String,

    // === Base Damage ===
    #[serde(default)]
    pub base_physical: f64,
    #[serde(default)]
    pub base_magic: f64,
    #[serde(default)]
    pub base_true: f64,

    // === Scaling ===
    /// Fraction of attack damage added as physical damage
    #[serde(default)]
    pub ad_ratio: f64,
    /// Fraction of ability power added as magic damage
    #[serde(default)]
    pub ap_ratio: f64,

    // === Crit ===
    /// Whether the ability can critically strike
    #[serde(default)]
    pub can_crit: bool,

    // === Side Effects ===
    /// Crowd control applied to the target on hit: (kind, base turns)
    #[serde(default)]
    pub crowd_control: Option<(CrowdControlKind, f64)>,
    /// Shield granted to the caster, before heal/shield power
    #[serde(default)]
    pub self_shield: f64,
    /// Mana cost
    #[serde(default)]
    pub mana_cost: f64,
}

impl Ability {
    /// A plain magic nuke scaling with ability power
    pub fn bolt(id: &str, name: &str, base_magic: f64, ap_ratio: f64) -> Self {
        Ability {
            id: id.to_string(),
            name: name.to_string(),
            base_physical: 0.0,
            base_magic,
            base_true: 0.0,
            ad_ratio: 0.0,
            ap_ratio,
            can_crit: false,
            crowd_control: None,
            self_shield: 0.0,
            mana_cost: 0.0,
        }
    }

    /// Attach crowd control to this ability
    pub fn with_crowd_control(mut self, kind: CrowdControlKind, turns: f64) -> Self {
        self.crowd_control = Some((kind, turns));
        self
    }

    /// Attach a self shield to this ability
    pub fn with_self_shield(mut self, amount: f64) -> Self {
        self.self_shield = amount;
        self
    }

    /// Whether casting this ability counts as a spell (blocked by silence)
    pub fn is_spell(&self) -> bool {
        self.base_magic > 0.0 || self.ap_ratio > 0.0 || self.crowd_control.is_some() || self.self_shield > 0.0
    }
}
