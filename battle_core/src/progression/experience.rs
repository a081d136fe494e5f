//! Experience curve and enemy scaling

use crate::types::EnemyTier;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lower bound on the level-gap exp multiplier
const MIN_LEVEL_GAP_MULTIPLIER: f64 = 0.5;
/// Exp multiplier change per level of difference between enemy and player
const LEVEL_GAP_STEP: f64 = 0.05;

/// Total experience needed to reach `level`
///
/// `level^3` for levels above 1; level 1 (and 0) need nothing.
pub fn exp_required_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        u64::from(level).saturating_pow(3)
    }
}

/// Experience granted for defeating an enemy, before xp_gain
///
/// `floor(tier_base * enemy_level * max(0.5, 1 + 0.05 * (enemy_level - player_level)))`
pub fn exp_reward(tier: EnemyTier, enemy_level: u32, player_level: u32) -> u64 {
    let gap = f64::from(enemy_level) - f64::from(player_level);
    let multiplier = (1.0 + LEVEL_GAP_STEP * gap).max(MIN_LEVEL_GAP_MULTIPLIER);
    (tier.base_exp() * f64::from(enemy_level) * multiplier).floor().max(0.0) as u64
}

/// Spawn level for an enemy: tier base level plus one per two floors
pub fn enemy_level(floor: u32, tier: EnemyTier) -> u32 {
    tier.base_level().saturating_add(floor / 2)
}

/// Result of crossing one or more level thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub new_level: u32,
    pub levels_gained: u32,
    /// Experience carried after leveling (totals are cumulative, nothing is spent)
    pub remaining_exp: u64,
}

/// Check whether `current_exp` reaches the next level
///
/// Keeps advancing while the threshold for `level + 1` is still met, so one
/// large award can grant several levels. Returns `None` when no threshold is
/// crossed.
pub fn check_level_up(current_exp: u64, current_level: u32) -> Option<LevelUp> {
    let mut level = current_level.max(1);
    while level < u32::MAX {
        let next = exp_required_for_level(level + 1);
        // Past this point the curve is saturated and no longer a threshold
        if next == u64::MAX || current_exp < next {
            break;
        }
        level += 1;
    }
    if level <= current_level {
        return None;
    }
    debug!(from = current_level, to = level, exp = current_exp, "level up");
    Some(LevelUp {
        new_level: level,
        levels_gained: level - current_level,
        remaining_exp: current_exp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_curve_values() {
        assert_eq!(exp_required_for_level(0), 0);
        assert_eq!(exp_required_for_level(1), 0);
        assert_eq!(exp_required_for_level(2), 8);
        assert_eq!(exp_required_for_level(5), 125);
    }

    #[test]
    fn test_level_up_scenario() {
        let level_up = check_level_up(10, 1).unwrap();
        assert_eq!(level_up.new_level, 2);
        assert_eq!(level_up.levels_gained, 1);
        assert_eq!(level_up.remaining_exp, 10);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        assert_eq!(check_level_up(7, 1), None);
        assert_eq!(check_level_up(26, 2), None);
    }

    #[test]
    fn test_multi_level_jump() {
        // 130 exp: level 5 needs 125, level 6 needs 216
        let level_up = check_level_up(130, 1).unwrap();
        assert_eq!(level_up.new_level, 5);
        assert_eq!(level_up.levels_gained, 4);
    }

    #[test]
    fn test_saturated_exp_stops_at_last_reachable_level() {
        // 2_642_245^3 fits in u64, the next cube does not
        let capped = check_level_up(u64::MAX, 1).unwrap();
        assert_eq!(capped.new_level, 2_642_245);
        assert_eq!(check_level_up(u64::MAX - 1, 1).map(|l| l.new_level), Some(2_642_245));
        assert_eq!(check_level_up(u64::MAX, 2_642_245), None);
    }

    #[test]
    fn test_exp_reward_level_gap() {
        // minion lvl 3 vs player lvl 1: 5 * 3 * 1.1 = 16.5 -> 16
        assert_eq!(exp_reward(EnemyTier::Minion, 3, 1), 16);
        // boss lvl 5 vs player lvl 5: 30 * 5 = 150
        assert_eq!(exp_reward(EnemyTier::Boss, 5, 5), 150);
        // huge gap floors the multiplier at 0.5: 12 * 1 * 0.5 = 6
        assert_eq!(exp_reward(EnemyTier::Elite, 1, 40), 6);
    }

    #[test]
    fn test_enemy_level_scales_with_floor() {
        assert_eq!(enemy_level(0, EnemyTier::Minion), 1);
        assert_eq!(enemy_level(5, EnemyTier::Minion), 3);
        assert_eq!(enemy_level(10, EnemyTier::Legend), 13);
    }

    proptest! {
        #[test]
        fn prop_level_curve_strictly_increasing(level in 1u32..2000) {
            prop_assert!(exp_required_for_level(level + 1) > exp_required_for_level(level));
        }

        #[test]
        fn prop_level_up_lands_between_thresholds(exp in 0u64..10_000_000, level in 1u32..50) {
            let start = exp_required_for_level(level);
            let exp = exp.max(start);
            let reached = check_level_up(exp, level).map_or(level, |l| l.new_level);
            prop_assert!(exp >= exp_required_for_level(reached));
            prop_assert!(exp < exp_required_for_level(reached + 1));
        }
    }
}
