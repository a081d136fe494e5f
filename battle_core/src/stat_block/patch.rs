//! StatPatch - Partial stat override returned by passive stat modifiers

use super::{CharacterStats, StatKind};

/// A partial set of absolute stat values
///
/// Fields not present in the patch are left untouched when it is applied.
/// When the same stat is set twice, the later value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatPatch {
    entries: Vec<(StatKind, f64)>,
}

impl StatPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a stat with an absolute value
    pub fn set(mut self, kind: StatKind, value: f64) -> Self {
        self.entries.push((kind, value));
        self
    }

    /// Override a stat with its current value plus `delta`
    pub fn add(self, stats: &CharacterStats, kind: StatKind, delta: f64) -> Self {
        let current = self.value_or(stats, kind);
        self.set(kind, current + delta)
    }

    /// Override a stat with its current value times `factor`
    pub fn scale(self, stats: &CharacterStats, kind: StatKind, factor: f64) -> Self {
        let current = self.value_or(stats, kind);
        self.set(kind, current * factor)
    }

    fn value_or(&self, stats: &CharacterStats, kind: StatKind) -> f64 {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
            .unwrap_or_else(|| stats.get(kind))
    }

    /// Produce a new stat record with this patch applied
    pub fn apply_to(&self, stats: &CharacterStats) -> CharacterStats {
        self.entries
            .iter()
            .fold(*stats, |acc, &(kind, value)| acc.with(kind, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_listed_fields() {
        let stats = CharacterStats::starter();
        let patched = StatPatch::new().set(StatKind::Tenacity, 40.0).apply_to(&stats);

        assert!((patched.tenacity - 40.0).abs() < f64::EPSILON);
        assert!((patched.health - stats.health).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_and_scale_chain() {
        let stats = CharacterStats::default().with(StatKind::AbilityPower, 100.0);
        let patched = StatPatch::new()
            .add(&stats, StatKind::AbilityPower, 20.0)
            .scale(&stats, StatKind::AbilityPower, 1.5)
            .apply_to(&stats);

        // (100 + 20) * 1.5
        assert!((patched.ability_power - 180.0).abs() < f64::EPSILON);
    }
}
