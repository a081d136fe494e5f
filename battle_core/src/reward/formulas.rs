//! Gold, experience and milestone formulas

use crate::types::EnemyTier;

/// Default per-floor gold scaling
const FLOOR_GOLD_SCALING: f64 = 0.1;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Gold for a defeated enemy
///
/// `floor(tier_base * (1 + 0.1 * floor) * (1 + gold_gain / 100) + reap_bonus)`,
/// never negative.
pub fn gold_reward(tier: EnemyTier, floor: u32, gold_gain: f64, reap_bonus: f64) -> u64 {
    gold_reward_with(tier, floor, gold_gain, reap_bonus, FLOOR_GOLD_SCALING)
}

/// [`gold_reward`] with an explicit per-floor scaling
pub fn gold_reward_with(tier: EnemyTier, floor: u32, gold_gain: f64, reap_bonus: f64, floor_scaling: f64) -> u64 {
    let floor_multiplier = 1.0 + floor_scaling * f64::from(floor);
    let gain_multiplier = 1.0 + finite_or_zero(gold_gain) / 100.0;
    let gold = (tier.base_gold() * floor_multiplier * gain_multiplier + finite_or_zero(reap_bonus)).floor();
    gold.max(0.0) as u64
}

/// Experience after xp_gain: `floor(base * (1 + xp_gain / 100))`, never negative
pub fn final_exp(base_exp: u64, xp_gain: f64) -> u64 {
    let exp = (base_exp as f64 * (1.0 + finite_or_zero(xp_gain) / 100.0)).floor();
    exp.max(0.0) as u64
}

/// Every `interval`-th floor past zero is a milestone
pub fn is_milestone_floor(floor: u32, interval: u32) -> bool {
    interval > 0 && floor > 0 && floor % interval == 0
}
