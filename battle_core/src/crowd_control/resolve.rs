//! Tenacity resolution and action-restriction predicates

use super::{ActiveCrowdControl, CrowdControlEffect, CrowdControlKind};
use crate::stat_block::round2;

/// Tenacity at which reducible crowd control is fully negated
pub const MAX_TENACITY: f64 = 100.0;

fn clamp_tenacity(tenacity: f64) -> f64 {
    if tenacity.is_nan() {
        0.0
    } else {
        tenacity.clamp(0.0, MAX_TENACITY)
    }
}

/// Effective CC duration after tenacity
///
/// Tenacity-immune kinds keep their base duration. Everything else is
/// reduced proportionally, rounded to two decimals and floored at zero.
pub fn resolve_cc_duration(base_duration: f64, tenacity: f64, kind: CrowdControlKind) -> f64 {
    let base_duration = if base_duration.is_finite() { base_duration } else { 0.0 };
    if kind.is_tenacity_immune() {
        return base_duration.max(0.0);
    }
    round2(base_duration * (1.0 - clamp_tenacity(tenacity) / 100.0)).max(0.0)
}

/// Duration for a concrete effect, honoring its `reduced_by_tenacity` flag
pub fn resolve_effect_duration(effect: &CrowdControlEffect, tenacity: f64) -> f64 {
    if effect.reduced_by_tenacity {
        resolve_cc_duration(effect.base_duration_in_turns, tenacity, effect.kind)
    } else {
        effect.base_duration_in_turns.max(0.0)
    }
}

/// True when tenacity fully negates this kind
pub fn is_immune(tenacity: f64, kind: CrowdControlKind) -> bool {
    tenacity >= MAX_TENACITY && !kind.is_tenacity_immune()
}

pub fn can_move(active: &[ActiveCrowdControl]) -> bool {
    !active
        .iter()
        .any(|cc| cc.is_active() && cc.effect.kind.prevents_movement())
}

pub fn can_attack(active: &[ActiveCrowdControl]) -> bool {
    !active
        .iter()
        .any(|cc| cc.is_active() && cc.effect.kind.prevents_attacks())
}

pub fn can_cast(active: &[ActiveCrowdControl]) -> bool {
    !active
        .iter()
        .any(|cc| cc.is_active() && cc.effect.kind.prevents_spells())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn active(kind: CrowdControlKind, turns: f64) -> ActiveCrowdControl {
        ActiveCrowdControl {
            effect: CrowdControlEffect::new(kind, turns, "test"),
            remaining_turns: turns,
        }
    }

    #[test]
    fn test_tenacity_bounds() {
        assert!((resolve_cc_duration(2.0, 0.0, CrowdControlKind::Stun) - 2.0).abs() < f64::EPSILON);
        assert!(resolve_cc_duration(2.0, 100.0, CrowdControlKind::Stun).abs() < f64::EPSILON);
        assert!((resolve_cc_duration(2.0, 100.0, CrowdControlKind::Knockup) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_tenacity() {
        // 2 * (1 - 0.35) = 1.3
        assert!((resolve_cc_duration(2.0, 35.0, CrowdControlKind::Root) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_over_cap_tenacity_clamped() {
        assert!(resolve_cc_duration(3.0, 250.0, CrowdControlKind::Silence).abs() < f64::EPSILON);
        assert!((resolve_cc_duration(3.0, -50.0, CrowdControlKind::Silence) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_is_immune() {
        assert!(is_immune(100.0, CrowdControlKind::Stun));
        assert!(!is_immune(99.0, CrowdControlKind::Stun));
        assert!(!is_immune(100.0, CrowdControlKind::Suppression));
    }

    #[test]
    fn test_effect_flag_overrides_kind() {
        let mut effect = CrowdControlEffect::new(CrowdControlKind::Stun, 2.0, "x");
        effect.reduced_by_tenacity = false;
        assert!((resolve_effect_duration(&effect, 100.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_predicates() {
        let rooted = [active(CrowdControlKind::Root, 2.0)];
        assert!(!can_move(&rooted));
        assert!(can_attack(&rooted));
        assert!(can_cast(&rooted));

        let silenced = [active(CrowdControlKind::Silence, 2.0)];
        assert!(can_move(&silenced));
        assert!(can_attack(&silenced));
        assert!(!can_cast(&silenced));

        let stunned = [active(CrowdControlKind::Stun, 1.0)];
        assert!(!can_move(&stunned) && !can_attack(&stunned) && !can_cast(&stunned));

        let expired = [active(CrowdControlKind::Stun, 0.0)];
        assert!(can_attack(&expired));
    }

    proptest! {
        #[test]
        fn prop_duration_never_exceeds_base(base in 0.0f64..100.0, tenacity in -500.0f64..500.0) {
            for &kind in CrowdControlKind::all() {
                let d = resolve_cc_duration(base, tenacity, kind);
                prop_assert!(d >= 0.0);
                prop_assert!(d <= round2(base) + 0.01);
            }
        }
    }
}
