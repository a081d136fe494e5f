//! Mitigation - Armor / magic resist damage reduction with diminishing returns
//!
//! Formula:
//! - effective_resist = max(0, resistance - penetration)
//! - reduction = min(0.90, effective_resist / (effective_resist + 1000))
//! - damage_taken = floor(max(1, damage * (1 - reduction)))
//!
//! True damage is never mitigated.

use super::constants::{MAX_DAMAGE_REDUCTION, RESISTANCE_CONSTANT};
use crate::config::MitigationConstants;
use crate::damage::DamagePacket;
use serde::{Deserialize, Serialize};

/// Resistance left after flat penetration, never below zero
pub fn effective_resistance(resistance: f64, penetration: f64) -> f64 {
    let resistance = if resistance.is_finite() { resistance } else { 0.0 };
    let penetration = if penetration.is_finite() { penetration.max(0.0) } else { 0.0 };
    (resistance - penetration).max(0.0)
}

/// Fraction of damage removed by a resistance value, capped at 90%
pub fn reduction_fraction(resistance: f64) -> f64 {
    reduction_fraction_with(resistance, RESISTANCE_CONSTANT, MAX_DAMAGE_REDUCTION)
}

/// [`reduction_fraction`] with explicit tuning constants
pub fn reduction_fraction_with(resistance: f64, constant: f64, max_reduction: f64) -> f64 {
    if resistance.is_nan() || resistance <= 0.0 {
        return 0.0;
    }
    if resistance.is_infinite() {
        return max_reduction;
    }
    (resistance / (resistance + constant)).min(max_reduction)
}

/// Mitigate one damage type
///
/// Returns 0 for no incoming damage; otherwise at least 1.
pub fn mitigate(raw_damage: f64, resistance: f64, penetration: f64) -> f64 {
    mitigate_with(raw_damage, resistance, penetration, &MitigationConstants::default())
}

/// [`mitigate`] with loaded tuning constants
pub fn mitigate_with(
    raw_damage: f64,
    resistance: f64,
    penetration: f64,
    constants: &MitigationConstants,
) -> f64 {
    if raw_damage.is_nan() || raw_damage <= 0.0 {
        return 0.0;
    }
    let raw_damage = raw_damage.min(f64::MAX);
    let reduction = reduction_fraction_with(
        effective_resistance(resistance, penetration),
        constants.resistance_constant,
        constants.max_reduction,
    );
    (raw_damage * (1.0 - reduction)).max(1.0).floor()
}

/// Per-type breakdown of a mitigated damage packet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MitigatedDamage {
    pub physical: f64,
    pub magic: f64,
    pub true_damage: f64,
    /// Raw damage removed by armor and magic resist
    pub mitigated: f64,
}

impl MitigatedDamage {
    pub fn total(&self) -> f64 {
        self.physical + self.magic + self.true_damage
    }
}

/// Resolve a full packet against a defender's resistances
pub fn resolve_mitigation(
    packet: &DamagePacket,
    defender_armor: f64,
    defender_magic_resist: f64,
    attacker_lethality: f64,
    attacker_magic_pen: f64,
) -> MitigatedDamage {
    resolve_mitigation_with(
        packet,
        defender_armor,
        defender_magic_resist,
        attacker_lethality,
        attacker_magic_pen,
        &MitigationConstants::default(),
    )
}

/// [`resolve_mitigation`] with loaded tuning constants
pub fn resolve_mitigation_with(
    packet: &DamagePacket,
    defender_armor: f64,
    defender_magic_resist: f64,
    attacker_lethality: f64,
    attacker_magic_pen: f64,
    constants: &MitigationConstants,
) -> MitigatedDamage {
    let physical = mitigate_with(packet.physical, defender_armor, attacker_lethality, constants);
    let magic = mitigate_with(packet.magic, defender_magic_resist, attacker_magic_pen, constants);
    let true_damage = if packet.true_damage.is_finite() && packet.true_damage > 0.0 {
        packet.true_damage.max(1.0).floor()
    } else {
        0.0
    };

    let raw = packet.physical.max(0.0) + packet.magic.max(0.0);
    let mitigated = (raw - physical - magic).max(0.0);

    MitigatedDamage {
        physical,
        magic,
        true_damage,
        mitigated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_resistance() {
        assert!((mitigate(100.0, 0.0, 0.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_damage() {
        assert!(mitigate(0.0, 50.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_basic_attack_scenario() {
        // 20 armor -> 20 / 1020 = 1.96% reduction
        // 50 * 0.9804 = 49.02 -> 49
        assert!((mitigate(50.0, 20.0, 0.0) - 49.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimum_one_damage() {
        // Capped 90% of 5 = 0.5 -> raised to 1
        assert!((mitigate(5.0, 1_000_000.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reduction_hard_cap() {
        // 9000 / 10000 = 0.9 exactly, anything above is capped
        assert!((reduction_fraction(9000.0) - 0.9).abs() < 1e-12);
        assert!((reduction_fraction(1e12) - 0.9).abs() < f64::EPSILON);
        assert!((reduction_fraction(f64::INFINITY) - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_penetration_never_goes_negative() {
        assert!(effective_resistance(20.0, 50.0).abs() < f64::EPSILON);
        assert!((effective_resistance(80.0, 30.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_true_damage_unmitigated() {
        let packet = DamagePacket::new(0.0, 0.0, 37.0);
        let result = resolve_mitigation(&packet, 5000.0, 5000.0, 0.0, 0.0);
        assert!((result.total() - 37.0).abs() < f64::EPSILON);
        assert!(result.mitigated.abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_true_damage_deals_one() {
        let result = resolve_mitigation(&DamagePacket::new(0.0, 0.0, 0.5), 0.0, 0.0, 0.0, 0.0);
        assert!((result.true_damage - 1.0).abs() < f64::EPSILON);
        assert!((result.total() - 1.0).abs() < f64::EPSILON);

        let none = resolve_mitigation(&DamagePacket::new(0.0, 0.0, 0.0), 0.0, 0.0, 0.0, 0.0);
        assert!(none.total().abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_constants() {
        let constants = MitigationConstants {
            resistance_constant: 100.0,
            max_reduction: 0.5,
        };
        // 100 / 200 = 0.5 -> 50
        assert!((mitigate_with(100.0, 100.0, 0.0, &constants) - 50.0).abs() < f64::EPSILON);
        // capped at 0.5 even with huge resistance
        assert!((mitigate_with(100.0, 1e9, 0.0, &constants) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mixed_packet() {
        let packet = DamagePacket::new(100.0, 100.0, 10.0);
        let result = resolve_mitigation(&packet, 1000.0, 0.0, 0.0, 0.0);
        // physical: 50% reduction -> 50; magic: none -> 100; true: 10
        assert!((result.physical - 50.0).abs() < f64::EPSILON);
        assert!((result.magic - 100.0).abs() < f64::EPSILON);
        assert!((result.total() - 160.0).abs() < f64::EPSILON);
        assert!((result.mitigated - 50.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_reduction_never_exceeds_cap(resistance in 0.0f64..1e15) {
            prop_assert!(reduction_fraction(resistance) <= MAX_DAMAGE_REDUCTION);
        }

        #[test]
        fn prop_penetration_is_monotonic(
            raw in 1.0f64..10_000.0,
            resistance in 0.0f64..20_000.0,
            pen in 0.0f64..500.0,
            extra in 0.0f64..500.0,
        ) {
            let low = mitigate(raw, resistance, pen);
            let high = mitigate(raw, resistance, pen + extra);
            prop_assert!(high >= low);
        }

        #[test]
        fn prop_nonzero_damage_deals_at_least_one(raw in 0.001f64..1e6, resistance in 0.0f64..1e9) {
            prop_assert!(mitigate(raw, resistance, 0.0) >= 1.0);
        }
    }
}
