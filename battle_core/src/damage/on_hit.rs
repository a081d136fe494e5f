//! On-hit healing - flat heal on hit, life steal and omnivamp

use crate::stat_block::CharacterStats;
use serde::{Deserialize, Serialize};

/// Breakdown of healing produced by landing a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OnHitHealing {
    pub flat: f64,
    pub life_steal: f64,
    pub omnivamp: f64,
    /// Extra healing contributed by passives
    pub bonus: f64,
    /// Healing actually applied after the max-health cap
    pub applied: f64,
}

impl OnHitHealing {
    /// Healing before the max-health cap
    pub fn uncapped(&self) -> f64 {
        self.flat + self.life_steal + self.omnivamp + self.bonus
    }
}

/// Compute on-hit healing for an attacker
///
/// Nothing heals unless `total_dealt > 0`. Life steal applies to physical
/// damage dealt, omnivamp to all damage dealt; both stack additively with
/// the flat heal. The result is capped so `current_health` cannot exceed
/// `max_health`.
pub fn resolve_on_hit_healing(
    attacker: &CharacterStats,
    physical_dealt: f64,
    total_dealt: f64,
    bonus: f64,
    current_health: f64,
    max_health: f64,
) -> OnHitHealing {
    if total_dealt.is_nan() || total_dealt <= 0.0 {
        return OnHitHealing::default();
    }

    let mut healing = OnHitHealing {
        flat: attacker.healing_on_hit.max(0.0),
        life_steal: attacker.life_steal.max(0.0) / 100.0 * physical_dealt.max(0.0),
        omnivamp: attacker.omnivamp.max(0.0) / 100.0 * total_dealt,
        bonus: if bonus.is_finite() { bonus.max(0.0) } else { 0.0 },
        applied: 0.0,
    };

    let missing = (max_health - current_health).max(0.0);
    healing.applied = healing.uncapped().min(missing);
    healing
}
