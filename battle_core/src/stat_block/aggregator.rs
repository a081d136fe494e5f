//! Stat aggregation - base stats + class bonuses + passive modifiers

use super::class_table::class_bonus;
use super::{CharacterStats, StatKind, StatPatch};
use crate::crowd_control::MAX_TENACITY;
use crate::passive::PassiveId;
use crate::types::CharacterClass;
use std::fmt;

/// Signature of a passive's stat-calculation hook: `(stats_so_far, level, stacks, copies)`
pub type StatModifierFn = fn(&CharacterStats, u32, u32, u32) -> StatPatch;

/// A stat-calculation passive ready to be applied, with its current stack state
#[derive(Clone, Copy)]
pub struct ActiveStatModifier {
    pub passive: PassiveId,
    pub modifier: StatModifierFn,
    pub stacks: u32,
    pub copies: u32,
}

impl fmt::Debug for ActiveStatModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveStatModifier")
            .field("passive", &self.passive)
            .field("stacks", &self.stacks)
            .field("copies", &self.copies)
            .finish()
    }
}

impl ActiveStatModifier {
    pub fn patch(&self, stats: &CharacterStats, level: u32) -> StatPatch {
        (self.modifier)(stats, level, self.stacks, self.copies)
    }
}

/// Replace NaN/infinite values with zero and clamp unsigned stats at zero
pub fn sanitize(stats: &CharacterStats) -> CharacterStats {
    stats.iter().fold(*stats, |acc, (kind, value)| {
        let value = if value.is_finite() { value } else { 0.0 };
        let value = if kind.allows_negative() { value } else { value.max(0.0) };
        acc.with(kind, value)
    })
}

fn finalize(stats: &CharacterStats) -> CharacterStats {
    let cleaned = sanitize(stats);
    let rounded = cleaned
        .iter()
        .fold(cleaned, |acc, (kind, value)| acc.with(kind, kind.round(value)));
    rounded.with(StatKind::Tenacity, rounded.tenacity.clamp(0.0, MAX_TENACITY))
}

/// Compute the scaled stats for a character
///
/// Order is fixed:
/// 1. Copy of `base` (already carries item and status flat bonuses)
/// 2. Add linear per-level class bonuses
/// 3. Apply each passive modifier in registration order; each sees the
///    results of the ones before it
/// 4. Clamp tenacity to `[0, 100]`
///
/// Enemies and players share this path. `base` is never modified.
pub fn aggregate(
    base: &CharacterStats,
    level: u32,
    class: CharacterClass,
    passives: &[ActiveStatModifier],
) -> CharacterStats {
    let mut stats = sanitize(base);

    for &kind in StatKind::all() {
        let bonus = class_bonus(class, kind, level);
        stats = stats.with(kind, kind.round(stats.get(kind) + bonus));
    }

    for passive in passives {
        let patch = passive.patch(&stats, level);
        stats = patch.apply_to(&stats);
    }

    finalize(&stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_tenacity(stats: &CharacterStats, _level: u32, _stacks: u32, copies: u32) -> StatPatch {
        StatPatch::new().add(stats, StatKind::Tenacity, 60.0 * f64::from(copies))
    }

    fn double_ap(stats: &CharacterStats, _level: u32, _stacks: u32, _copies: u32) -> StatPatch {
        StatPatch::new().scale(stats, StatKind::AbilityPower, 2.0)
    }

    fn ap_per_stack(stats: &CharacterStats, _level: u32, stacks: u32, _copies: u32) -> StatPatch {
        StatPatch::new().add(stats, StatKind::AbilityPower, 10.0 * f64::from(stacks))
    }

    fn modifier(passive: PassiveId, f: StatModifierFn, stacks: u32, copies: u32) -> ActiveStatModifier {
        ActiveStatModifier {
            passive,
            modifier: f,
            stacks,
            copies,
        }
    }

    #[test]
    fn test_class_bonus_added() {
        let base = CharacterStats::starter();
        let stats = aggregate(&base, 10, CharacterClass::Warrior, &[]);
        // 100 + 12 * 10
        assert!((stats.health - 220.0).abs() < f64::EPSILON);
        // 10 + round(2.5 * 10)
        assert!((stats.attack_damage - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_is_not_mutated() {
        let base = CharacterStats::starter();
        let copy = base;
        let _ = aggregate(&base, 30, CharacterClass::Tank, &[]);
        assert_eq!(base, copy);
    }

    #[test]
    fn test_growth_is_linear() {
        let base = CharacterStats::default();
        let l10 = aggregate(&base, 10, CharacterClass::Tank, &[]);
        let l20 = aggregate(&base, 20, CharacterClass::Tank, &[]);
        let l40 = aggregate(&base, 40, CharacterClass::Tank, &[]);
        assert!((l20.health - 2.0 * l10.health).abs() < f64::EPSILON);
        assert!((l40.health - 4.0 * l10.health).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tenacity_clamped() {
        let base = CharacterStats::default().with(StatKind::Tenacity, 50.0);
        let mods = [modifier(PassiveId::EnduringFocus, plus_tenacity, 0, 2)];
        let stats = aggregate(&base, 1, CharacterClass::Mage, &mods);
        assert!((stats.tenacity - MAX_TENACITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_passive_order_matters() {
        let base = CharacterStats::default().with(StatKind::AbilityPower, 10.0);

        // +10 AP (1 stack) then double: (10 + 4 + 10) * 2 at Mage level 1
        let add_then_double = [
            modifier(PassiveId::Glory, ap_per_stack, 1, 1),
            modifier(PassiveId::MagicalOpus, double_ap, 0, 1),
        ];
        let a = aggregate(&base, 1, CharacterClass::Mage, &add_then_double);
        assert!((a.ability_power - 48.0).abs() < f64::EPSILON);

        let double_then_add = [
            modifier(PassiveId::MagicalOpus, double_ap, 0, 1),
            modifier(PassiveId::Glory, ap_per_stack, 1, 1),
        ];
        let b = aggregate(&base, 1, CharacterClass::Mage, &double_then_add);
        assert!((b.ability_power - 38.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_and_negative_inputs_sanitized() {
        let base = CharacterStats::default()
            .with(StatKind::Health, f64::NAN)
            .with(StatKind::Armor, -40.0)
            .with(StatKind::GoldGain, -30.0);
        let stats = aggregate(&base, 1, CharacterClass::Support, &[]);

        assert!(stats.health.is_finite());
        assert!(stats.armor >= 0.0);
        assert!((stats.gold_gain + 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decimal_stats_preserved() {
        let base = CharacterStats::default().with(StatKind::AttackSpeed, 0.63);
        let stats = aggregate(&base, 3, CharacterClass::Marksman, &[]);
        // 0.63 + 0.02 * 3
        assert!((stats.attack_speed - 0.69).abs() < 1e-9);
    }
}
