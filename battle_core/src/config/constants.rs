//! Game constants configuration

use super::ConfigError;
use crate::types::Rarity;
use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    pub mitigation: MitigationConstants,
    pub attack: AttackConstants,
    pub crit: CritConstants,
    pub leveling: LevelUpBoost,
    pub rewards: RewardConstants,
}

impl GameConstants {
    /// Reject values that would break the formulas
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mitigation;
        if !(0.0..1.0).contains(&m.max_reduction) {
            return Err(ConfigError::ValidationError(format!(
                "mitigation.max_reduction must be in [0, 1), got {}",
                m.max_reduction
            )));
        }
        if m.resistance_constant <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "mitigation.resistance_constant must be positive, got {}",
                m.resistance_constant
            )));
        }
        if !(0.0..=1.0).contains(&self.attack.variance) {
            return Err(ConfigError::ValidationError(format!(
                "attack.variance must be in [0, 1], got {}",
                self.attack.variance
            )));
        }
        if self.crit.base_critical_damage.is_nan() || self.crit.base_critical_damage < 100.0 {
            return Err(ConfigError::ValidationError(format!(
                "crit.base_critical_damage must be at least 100, got {}",
                self.crit.base_critical_damage
            )));
        }
        if self.rewards.milestone_interval == 0 {
            return Err(ConfigError::ValidationError(
                "rewards.milestone_interval must be at least 1".to_string(),
            ));
        }
        if self.rewards.rarity_weights.total() <= 0.0 {
            return Err(ConfigError::ValidationError(
                "rewards.rarity_weights must not all be zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationConstants {
    /// reduction = resistance / (resistance + constant)
    #[serde(default = "default_resistance_constant")]
    pub resistance_constant: f64,
    /// Hard cap on the reduction fraction
    #[serde(default = "default_max_reduction")]
    pub max_reduction: f64,
}

impl Default for MitigationConstants {
    fn default() -> Self {
        MitigationConstants {
            resistance_constant: default_resistance_constant(),
            max_reduction: default_max_reduction(),
        }
    }
}

fn default_resistance_constant() -> f64 {
    1000.0
}
fn default_max_reduction() -> f64 {
    0.90
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackConstants {
    /// Basic attacks roll a uniform multiplier in `1 ± variance`
    #[serde(default = "default_variance")]
    pub variance: f64,
}

impl Default for AttackConstants {
    fn default() -> Self {
        AttackConstants {
            variance: default_variance(),
        }
    }
}

fn default_variance() -> f64 {
    0.10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical damage percentage characters start with (200 = 2x)
    #[serde(default = "default_base_critical_damage")]
    pub base_critical_damage: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            base_critical_damage: default_base_critical_damage(),
        }
    }
}

fn default_base_critical_damage() -> f64 {
    200.0
}

/// Flat base stat increments granted per level gained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpBoost {
    pub health: f64,
    pub attack_damage: f64,
    pub ability_power: f64,
    pub armor: f64,
    pub magic_resist: f64,
}

impl Default for LevelUpBoost {
    fn default() -> Self {
        LevelUpBoost {
            health: 5.0,
            attack_damage: 2.0,
            ability_power: 2.0,
            armor: 1.0,
            magic_resist: 1.0,
        }
    }
}

/// Relative drop weight per rarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityWeights {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl Default for RarityWeights {
    fn default() -> Self {
        RarityWeights {
            common: 60.0,
            uncommon: 25.0,
            rare: 10.0,
            epic: 4.0,
            legendary: 1.0,
        }
    }
}

impl RarityWeights {
    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }

    pub fn total(&self) -> f64 {
        Rarity::all().iter().map(|&r| self.get(r).max(0.0)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConstants {
    /// Gold multiplier gained per floor: `1 + scaling * floor`
    #[serde(default = "default_floor_gold_scaling")]
    pub floor_gold_scaling: f64,
    /// Every n-th floor is a milestone
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: u32,
    /// Items offered at a milestone
    #[serde(default = "default_milestone_choices")]
    pub milestone_choices: usize,
    #[serde(default)]
    pub rarity_weights: RarityWeights,
    /// Relative weight added per magic find point, per rarity step above common
    #[serde(default = "default_magic_find_bias")]
    pub magic_find_bias: f64,
}

impl Default for RewardConstants {
    fn default() -> Self {
        RewardConstants {
            floor_gold_scaling: default_floor_gold_scaling(),
            milestone_interval: default_milestone_interval(),
            milestone_choices: default_milestone_choices(),
            rarity_weights: RarityWeights::default(),
            magic_find_bias: default_magic_find_bias(),
        }
    }
}

fn default_floor_gold_scaling() -> f64 {
    0.1
}
fn default_milestone_interval() -> u32 {
    5
}
fn default_milestone_choices() -> usize {
    3
}
fn default_magic_find_bias() -> f64 {
    0.01
}
