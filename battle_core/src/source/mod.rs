//! StatSource - Upstream flat bonuses folded into a character's base stats

mod item;
mod status;

pub use item::{apply_item, equipped_bonuses, ItemSource};
pub use status::{StatusEffect, StatusModifier, StatusPresets};

use crate::stat_block::CharacterStats;

/// Trait for anything that contributes flat stats before aggregation
pub trait StatSource {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Suggested priorities:
    /// - Items: 0
    /// - Status effects: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Return a new stat record with this source's bonuses added
    fn apply(&self, stats: &CharacterStats) -> CharacterStats;
}

/// Fold every source into `base`, lowest priority first
pub fn apply_sources(base: &CharacterStats, sources: &[&dyn StatSource]) -> CharacterStats {
    let mut ordered: Vec<&&dyn StatSource> = sources.iter().collect();
    ordered.sort_by_key(|s| s.priority());
    ordered.iter().fold(*base, |acc, source| source.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::StatKind;

    struct Doubler;

    impl StatSource for Doubler {
        fn id(&self) -> &str {
            "doubler"
        }

        fn priority(&self) -> i32 {
            500
        }

        fn apply(&self, stats: &CharacterStats) -> CharacterStats {
            stats.with(StatKind::Armor, stats.armor * 2.0)
        }
    }

    struct PlusTen;

    impl StatSource for PlusTen {
        fn id(&self) -> &str {
            "plus_ten"
        }

        fn apply(&self, stats: &CharacterStats) -> CharacterStats {
            stats.plus(StatKind::Armor, 10.0)
        }
    }

    #[test]
    fn test_sources_apply_by_priority() {
        let base = CharacterStats::default();
        // Doubler listed first but runs last
        let stats = apply_sources(&base, &[&Doubler, &PlusTen]);
        assert!((stats.armor - 20.0).abs() < f64::EPSILON);
        assert!(base.armor.abs() < f64::EPSILON);
    }
}
