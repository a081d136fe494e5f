//! CharacterStats - The flat attribute record every computation reads from

mod aggregator;
mod class_table;
mod patch;

pub use aggregator::{aggregate, sanitize, ActiveStatModifier, StatModifierFn};
pub use class_table::{class_bonus, class_multipliers};
pub use patch::StatPatch;

use serde::{Deserialize, Serialize};

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Identifies a single field of [`CharacterStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Health,
    Mana,
    HealthRegen,
    ManaRegen,
    Armor,
    MagicResist,
    AttackDamage,
    AbilityPower,
    AttackSpeed,
    CriticalChance,
    CriticalDamage,
    LifeSteal,
    Omnivamp,
    HealingOnHit,
    Lethality,
    MagicPenetration,
    AbilityHaste,
    Tenacity,
    MovementSpeed,
    HealShieldPower,
    GoldGain,
    XpGain,
    MagicFind,
}

impl StatKind {
    /// Get all stat kinds in declaration order
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::Health,
            StatKind::Mana,
            StatKind::HealthRegen,
            StatKind::ManaRegen,
            StatKind::Armor,
            StatKind::MagicResist,
            StatKind::AttackDamage,
            StatKind::AbilityPower,
            StatKind::AttackSpeed,
            StatKind::CriticalChance,
            StatKind::CriticalDamage,
            StatKind::LifeSteal,
            StatKind::Omnivamp,
            StatKind::HealingOnHit,
            StatKind::Lethality,
            StatKind::MagicPenetration,
            StatKind::AbilityHaste,
            StatKind::Tenacity,
            StatKind::MovementSpeed,
            StatKind::HealShieldPower,
            StatKind::GoldGain,
            StatKind::XpGain,
            StatKind::MagicFind,
        ]
    }

    /// Stats that keep two decimal places instead of rounding to an integer
    pub fn is_decimal_preserving(self) -> bool {
        matches!(
            self,
            StatKind::AttackSpeed
                | StatKind::LifeSteal
                | StatKind::Tenacity
                | StatKind::CriticalChance
                | StatKind::CriticalDamage
                | StatKind::AbilityHaste
                | StatKind::GoldGain
                | StatKind::XpGain
                | StatKind::MagicFind
                | StatKind::HealthRegen
                | StatKind::HealShieldPower
        )
    }

    /// Economy stats may legitimately go below zero (curses, penalties)
    pub fn allows_negative(self) -> bool {
        matches!(self, StatKind::GoldGain | StatKind::XpGain | StatKind::MagicFind)
    }

    /// Round a value the way aggregation stores this stat
    pub fn round(self, value: f64) -> f64 {
        if self.is_decimal_preserving() {
            round2(value)
        } else {
            value.round()
        }
    }
}

/// Complete numeric attribute set for a character at a point in time
///
/// Percent-style stats (`life_steal`, `omnivamp`, `gold_gain`, `xp_gain`,
/// `heal_shield_power`) are stored as whole percentages. `critical_chance`
/// is a probability in `0..=1` and `critical_damage` is a percentage where
/// 200 means double damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    // === Resources ===
    pub health: f64,
    pub mana: f64,
    pub health_regen: f64,
    pub mana_regen: f64,

    // === Defenses ===
    pub armor: f64,
    pub magic_resist: f64,
    pub tenacity: f64,

    // === Offense ===
    pub attack_damage: f64,
    pub ability_power: f64,
    pub attack_speed: f64,
    pub critical_chance: f64,
    pub critical_damage: f64,
    pub lethality: f64,
    pub magic_penetration: f64,
    pub ability_haste: f64,

    // === Sustain ===
    pub life_steal: f64,
    pub omnivamp: f64,
    pub healing_on_hit: f64,
    pub heal_shield_power: f64,

    // === Utility ===
    pub movement_speed: f64,
    pub gold_gain: f64,
    pub xp_gain: f64,
    pub magic_find: f64,
}

impl Default for CharacterStats {
    fn default() -> Self {
        CharacterStats {
            health: 0.0,
            mana: 0.0,
            health_regen: 0.0,
            mana_regen: 0.0,
            armor: 0.0,
            magic_resist: 0.0,
            tenacity: 0.0,
            attack_damage: 0.0,
            ability_power: 0.0,
            attack_speed: 0.0,
            critical_chance: 0.0,
            critical_damage: 200.0,
            lethality: 0.0,
            magic_penetration: 0.0,
            ability_haste: 0.0,
            life_steal: 0.0,
            omnivamp: 0.0,
            healing_on_hit: 0.0,
            heal_shield_power: 0.0,
            movement_speed: 0.0,
            gold_gain: 0.0,
            xp_gain: 0.0,
            magic_find: 0.0,
        }
    }
}

impl CharacterStats {
    /// Starting stats for a fresh level 1 character before class bonuses
    pub fn starter() -> Self {
        CharacterStats {
            health: 100.0,
            mana: 50.0,
            health_regen: 1.0,
            armor: 10.0,
            magic_resist: 10.0,
            attack_damage: 10.0,
            attack_speed: 0.65,
            movement_speed: 100.0,
            ..Self::default()
        }
    }

    /// Read a stat by kind
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Health => self.health,
            StatKind::Mana => self.mana,
            StatKind::HealthRegen => self.health_regen,
            StatKind::ManaRegen => self.mana_regen,
            StatKind::Armor => self.armor,
            StatKind::MagicResist => self.magic_resist,
            StatKind::AttackDamage => self.attack_damage,
            StatKind::AbilityPower => self.ability_power,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::CriticalChance => self.critical_chance,
            StatKind::CriticalDamage => self.critical_damage,
            StatKind::LifeSteal => self.life_steal,
            StatKind::Omnivamp => self.omnivamp,
            StatKind::HealingOnHit => self.healing_on_hit,
            StatKind::Lethality => self.lethality,
            StatKind::MagicPenetration => self.magic_penetration,
            StatKind::AbilityHaste => self.ability_haste,
            StatKind::Tenacity => self.tenacity,
            StatKind::MovementSpeed => self.movement_speed,
            StatKind::HealShieldPower => self.heal_shield_power,
            StatKind::GoldGain => self.gold_gain,
            StatKind::XpGain => self.xp_gain,
            StatKind::MagicFind => self.magic_find,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::Mana => &mut self.mana,
            StatKind::HealthRegen => &mut self.health_regen,
            StatKind::ManaRegen => &mut self.mana_regen,
            StatKind::Armor => &mut self.armor,
            StatKind::MagicResist => &mut self.magic_resist,
            StatKind::AttackDamage => &mut self.attack_damage,
            StatKind::AbilityPower => &mut self.ability_power,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::CriticalChance => &mut self.critical_chance,
            StatKind::CriticalDamage => &mut self.critical_damage,
            StatKind::LifeSteal => &mut self.life_steal,
            StatKind::Omnivamp => &mut self.omnivamp,
            StatKind::HealingOnHit => &mut self.healing_on_hit,
            StatKind::Lethality => &mut self.lethality,
            StatKind::MagicPenetration => &mut self.magic_penetration,
            StatKind::AbilityHaste => &mut self.ability_haste,
            StatKind::Tenacity => &mut self.tenacity,
            StatKind::MovementSpeed => &mut self.movement_speed,
            StatKind::HealShieldPower => &mut self.heal_shield_power,
            StatKind::GoldGain => &mut self.gold_gain,
            StatKind::XpGain => &mut self.xp_gain,
            StatKind::MagicFind => &mut self.magic_find,
        }
    }

    /// Return a copy with one stat replaced
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        *self.slot(kind) = value;
        self
    }

    /// Return a copy with `delta` added to one stat
    pub fn plus(mut self, kind: StatKind, delta: f64) -> Self {
        *self.slot(kind) += delta;
        self
    }

    /// Field-wise sum of two stat records
    pub fn combined(&self, other: &CharacterStats) -> Self {
        StatKind::all()
            .iter()
            .fold(*self, |acc, &kind| acc.plus(kind, other.get(kind)))
    }

    /// Iterate over every (kind, value) pair
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::all().iter().map(move |&kind| (kind, self.get(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(1.23456) - 1.23).abs() < f64::EPSILON);
        assert!((round2(0.005) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_get_and_with_cover_every_kind() {
        for (i, &kind) in StatKind::all().iter().enumerate() {
            let stats = CharacterStats::default().with(kind, i as f64 + 1.0);
            assert!((stats.get(kind) - (i as f64 + 1.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_with_returns_new_value() {
        let base = CharacterStats::starter();
        let changed = base.with(StatKind::Armor, 99.0);
        assert!((base.armor - 10.0).abs() < f64::EPSILON);
        assert!((changed.armor - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_combined_sums_fields() {
        let a = CharacterStats::default().with(StatKind::AttackDamage, 10.0);
        let b = CharacterStats::default()
            .with(StatKind::AttackDamage, 5.0)
            .with(StatKind::CriticalDamage, 0.0);
        let sum = a.combined(&b);
        assert!((sum.attack_damage - 15.0).abs() < f64::EPSILON);
        assert!((sum.critical_damage - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decimal_preserving_rounding() {
        assert!((StatKind::AttackSpeed.round(0.6789) - 0.68).abs() < 1e-9);
        assert!((StatKind::Armor.round(12.6) - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_partial_stats() {
        let stats: CharacterStats = toml::from_str("health = 250\narmor = 30").unwrap();
        assert!((stats.health - 250.0).abs() < f64::EPSILON);
        assert!((stats.critical_damage - 200.0).abs() < f64::EPSILON);
    }
}
