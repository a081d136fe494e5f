//! Per-level class bonus tables

use super::{round2, StatKind};
use crate::types::CharacterClass;

/// Per-level multipliers for a class. Stats not listed get no class bonus.
pub fn class_multipliers(class: CharacterClass) -> &'static [(StatKind, f64)] {
    use StatKind::*;
    match class {
        CharacterClass::Warrior => &[
            (Health, 12.0),
            (AttackDamage, 2.5),
            (Armor, 1.5),
            (MagicResist, 0.8),
            (AttackSpeed, 0.01),
        ],
        CharacterClass::Mage => &[
            (Health, 7.0),
            (Mana, 8.0),
            (AbilityPower, 4.0),
            (MagicResist, 1.0),
            (AbilityHaste, 0.5),
            (MagicPenetration, 0.4),
        ],
        CharacterClass::Marksman => &[
            (Health, 8.0),
            (AttackDamage, 3.0),
            (AttackSpeed, 0.02),
            (CriticalChance, 0.01),
            (Armor, 0.8),
        ],
        CharacterClass::Assassin => &[
            (Health, 8.0),
            (AttackDamage, 3.2),
            (Lethality, 0.6),
            (CriticalChance, 0.008),
            (MovementSpeed, 0.5),
        ],
        CharacterClass::Tank => &[
            (Health, 18.0),
            (Armor, 2.5),
            (MagicResist, 2.0),
            (Tenacity, 0.5),
            (HealthRegen, 0.15),
        ],
        CharacterClass::Support => &[
            (Health, 10.0),
            (Mana, 6.0),
            (AbilityPower, 2.0),
            (HealShieldPower, 0.5),
            (Armor, 1.0),
            (MagicResist, 1.0),
        ],
        CharacterClass::Bruiser => &[
            (Health, 14.0),
            (AttackDamage, 2.0),
            (Armor, 1.2),
            (MagicResist, 1.2),
            (Omnivamp, 0.2),
        ],
        CharacterClass::Necromancer => &[
            (Health, 8.0),
            (Mana, 7.0),
            (AbilityPower, 3.5),
            (Omnivamp, 0.3),
            (MagicResist, 0.8),
        ],
    }
}

/// Flat bonus a class grants to one stat at a level
///
/// Linear in level: `round(multiplier * level)`, kept to two decimals for
/// decimal-preserving stats.
pub fn class_bonus(class: CharacterClass, kind: StatKind, level: u32) -> f64 {
    class_multipliers(class)
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, mult)| {
            let raw = mult * f64::from(level);
            if kind.is_decimal_preserving() {
                round2(raw)
            } else {
                raw.round()
            }
        })
        .unwrap_or(0.0)
}
