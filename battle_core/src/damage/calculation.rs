//! Damage calculation - turning an action + attacker stats into a DamagePacket

use super::{Ability, DamagePacket};
use crate::stat_block::CharacterStats;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of a critical strike roll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CritRoll {
    pub is_critical: bool,
    /// Damage multiplier (1.0 when not critical)
    pub multiplier: f64,
}

/// Roll a critical strike
///
/// `critical_chance` is a probability clamped to `[0, 1]`; `critical_damage`
/// is a percentage (200 = double damage).
pub fn roll_critical(critical_chance: f64, critical_damage: f64, rng: &mut impl Rng) -> CritRoll {
    let chance = if critical_chance.is_nan() {
        0.0
    } else {
        critical_chance.clamp(0.0, 1.0)
    };
    if rng.gen::<f64>() < chance {
        let multiplier = if critical_damage.is_finite() {
            (critical_damage / 100.0).max(1.0)
        } else {
            1.0
        };
        CritRoll {
            is_critical: true,
            multiplier,
        }
    } else {
        CritRoll {
            is_critical: false,
            multiplier: 1.0,
        }
    }
}

/// Apply a uniform `±variance` multiplier to raw damage
pub fn apply_attack_variance(raw: f64, variance: f64, rng: &mut impl Rng) -> f64 {
    let variance = variance.clamp(0.0, 1.0);
    if variance <= 0.0 {
        return raw;
    }
    raw * rng.gen_range((1.0 - variance)..=(1.0 + variance))
}

fn apply_crit(packet: DamagePacket, stats: &CharacterStats, rng: &mut impl Rng) -> DamagePacket {
    let crit = roll_critical(stats.critical_chance, stats.critical_damage, rng);
    let mut packet = packet.scaled(crit.multiplier);
    packet.is_critical = crit.is_critical;
    packet
}

/// Raw packet for a basic attack: attack damage with variance, then crit
pub fn basic_attack_packet(stats: &CharacterStats, variance: f64, rng: &mut impl Rng) -> DamagePacket {
    let raw = apply_attack_variance(stats.attack_damage.max(0.0), variance, rng);
    apply_crit(DamagePacket::physical(raw), stats, rng)
}

/// Raw packet for an ability: base damage plus AD/AP ratios, crit if allowed
pub fn ability_packet(ability: &Ability, stats: &CharacterStats, rng: &mut impl Rng) -> DamagePacket {
    let packet = DamagePacket::new(
        (ability.base_physical + ability.ad_ratio * stats.attack_damage).max(0.0),
        (ability.base_magic + ability.ap_ratio * stats.ability_power).max(0.0),
        ability.base_true.max(0.0),
    );
    if ability.can_crit {
        apply_crit(packet, stats, rng)
    } else {
        packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::StatKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_crit_chance_never_crits() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(!roll_critical(0.0, 200.0, &mut rng).is_critical);
        }
    }

    #[test]
    fn test_full_crit_chance_always_crits() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let roll = roll_critical(5.0, 250.0, &mut rng);
            assert!(roll.is_critical);
            assert!((roll.multiplier - 2.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_crit_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let rolls_a: Vec<bool> = (0..50).map(|_| roll_critical(0.3, 200.0, &mut a).is_critical).collect();
        let rolls_b: Vec<bool> = (0..50).map(|_| roll_critical(0.3, 200.0, &mut b).is_critical).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_variance_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let dmg = apply_attack_variance(100.0, 0.1, &mut rng);
            assert!((90.0..=110.0).contains(&dmg));
        }
    }

    #[test]
    fn test_basic_attack_without_variance_or_crit() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let stats = CharacterStats::default().with(StatKind::AttackDamage, 50.0);
        let packet = basic_attack_packet(&stats, 0.0, &mut rng);
        assert!((packet.physical - 50.0).abs() < f64::EPSILON);
        assert!(!packet.is_critical);
    }

    #[test]
    fn test_ability_scaling() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let stats = CharacterStats::default()
            .with(StatKind::AbilityPower, 100.0)
            .with(StatKind::AttackDamage, 40.0);
        let mut ability = Ability::bolt("bolt", "Bolt", 30.0, 0.5);
        ability.ad_ratio = 0.25;
        let packet = ability_packet(&ability, &stats, &mut rng);
        assert!((packet.magic - 80.0).abs() < f64::EPSILON);
        assert!((packet.physical - 10.0).abs() < f64::EPSILON);
    }
}
