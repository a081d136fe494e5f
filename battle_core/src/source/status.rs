//! StatusEffect - Timed buffs and debuffs measured in turns

use crate::source::StatSource;
use crate::stat_block::{CharacterStats, StatKind};
use serde::{Deserialize, Serialize};

/// A flat stat modifier carried by a status effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusModifier {
    pub stat: StatKind,
    /// Value per stack
    pub value_per_stack: f64,
}

/// Temporary buff/debuff on a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect identifier; reapplying the same id refreshes instead of stacking
    pub id: String,
    /// Display name
    pub name: String,
    /// Turns remaining
    pub duration_in_turns: i32,
    /// Current stack count
    pub stacks: u32,
    /// Whether this is a debuff
    pub is_debuff: bool,
    #[serde(default)]
    pub modifiers: Vec<StatusModifier>,
}

impl StatusEffect {
    /// Create a new status effect with one stack
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_in_turns: i32, is_debuff: bool) -> Self {
        StatusEffect {
            id: id.into(),
            name: name.into(),
            duration_in_turns,
            stacks: 1,
            is_debuff,
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier to this effect
    pub fn with_modifier(mut self, stat: StatKind, value_per_stack: f64) -> Self {
        self.modifiers.push(StatusModifier {
            stat,
            value_per_stack,
        });
        self
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    /// Refresh duration, keeping the longer of the two
    pub fn refresh(&mut self, duration_in_turns: i32) {
        self.duration_in_turns = self.duration_in_turns.max(duration_in_turns);
    }

    /// Advance one turn. Returns true if the effect is still active.
    pub fn tick(&mut self) -> bool {
        self.duration_in_turns -= 1;
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        self.duration_in_turns > 0 && self.stacks > 0
    }
}

impl StatSource for StatusEffect {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        200
    }

    fn apply(&self, stats: &CharacterStats) -> CharacterStats {
        if !self.is_active() {
            return *stats;
        }
        let stack_mult = f64::from(self.stacks);
        self.modifiers.iter().fold(*stats, |acc, m| {
            acc.plus(m.stat, m.value_per_stack * stack_mult)
        })
    }
}

/// Common status effect presets
pub struct StatusPresets;

impl StatusPresets {
    /// Armor and magic resist shred
    pub fn sunder(amount: f64, turns: i32) -> StatusEffect {
        StatusEffect::new("debuff_sunder", "Sunder", turns, true)
            .with_modifier(StatKind::Armor, -amount)
            .with_modifier(StatKind::MagicResist, -amount)
    }

    /// Attack damage boost
    pub fn battle_cry(amount: f64, turns: i32) -> StatusEffect {
        StatusEffect::new("buff_battle_cry", "Battle Cry", turns, false)
            .with_modifier(StatKind::AttackDamage, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tick() {
        let mut effect = StatusEffect::new("test", "Test", 2, false);
        assert!(effect.is_active());
        assert!(effect.tick());
        assert!(!effect.tick());
        assert!(!effect.is_active());
    }

    #[test]
    fn test_status_stacks() {
        let effect = StatusEffect::new("test", "Test", 3, false)
            .with_modifier(StatKind::AttackDamage, 4.0)
            .with_stacks(3);
        let stats = effect.apply(&CharacterStats::default());
        assert!((stats.attack_damage - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expired_status_contributes_nothing() {
        let mut effect = StatusPresets::battle_cry(20.0, 1);
        effect.tick();
        let stats = effect.apply(&CharacterStats::default());
        assert!(stats.attack_damage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_refresh_keeps_longer_duration() {
        let mut effect = StatusPresets::sunder(10.0, 3);
        effect.refresh(1);
        assert_eq!(effect.duration_in_turns, 3);
        effect.refresh(5);
        assert_eq!(effect.duration_in_turns, 5);
    }

    #[test]
    fn test_status_priority() {
        assert_eq!(StatusPresets::battle_cry(10.0, 2).priority(), 200);
    }
}
