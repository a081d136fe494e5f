//! Level-up stat boosts

use super::{check_level_up, LevelUp};
use crate::config::LevelUpBoost;
use crate::stat_block::{CharacterStats, StatKind};

/// Base stats after `levels_gained` flat boosts
pub fn level_up_stats(base: &CharacterStats, levels_gained: u32, boost: &LevelUpBoost) -> CharacterStats {
    let n = f64::from(levels_gained);
    base.plus(StatKind::Health, boost.health * n)
        .plus(StatKind::AttackDamage, boost.attack_damage * n)
        .plus(StatKind::AbilityPower, boost.ability_power * n)
        .plus(StatKind::Armor, boost.armor * n)
        .plus(StatKind::MagicResist, boost.magic_resist * n)
}

/// Add experience and report any level-up it causes
///
/// Returns the new experience total alongside the level-up, if any.
pub fn award_experience(current_exp: u64, current_level: u32, gained: u64) -> (u64, Option<LevelUp>) {
    let total = current_exp.saturating_add(gained);
    (total, check_level_up(total, current_level))
}
