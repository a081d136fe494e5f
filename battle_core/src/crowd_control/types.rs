//! Crowd control kinds and instances

use serde::{Deserialize, Serialize};

/// The fifteen crowd control kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdControlKind {
    // Hard CC
    Stun,
    Sleep,
    Charm,
    Fear,
    Taunt,
    Polymorph,
    Knockback,
    Knockup,
    Suppression,
    // Soft CC
    Root,
    Snare,
    Slow,
    // Action denial
    Silence,
    Disarm,
    Blind,
}

impl CrowdControlKind {
    pub fn all() -> &'static [CrowdControlKind] {
        &[
            CrowdControlKind::Stun,
            CrowdControlKind::Sleep,
            CrowdControlKind::Charm,
            CrowdControlKind::Fear,
            CrowdControlKind::Taunt,
            CrowdControlKind::Polymorph,
            CrowdControlKind::Knockback,
            CrowdControlKind::Knockup,
            CrowdControlKind::Suppression,
            CrowdControlKind::Root,
            CrowdControlKind::Snare,
            CrowdControlKind::Slow,
            CrowdControlKind::Silence,
            CrowdControlKind::Disarm,
            CrowdControlKind::Blind,
        ]
    }

    /// Full action denial: no moving, attacking or casting
    pub fn is_hard(self) -> bool {
        matches!(
            self,
            CrowdControlKind::Stun
                | CrowdControlKind::Sleep
                | CrowdControlKind::Charm
                | CrowdControlKind::Fear
                | CrowdControlKind::Taunt
                | CrowdControlKind::Polymorph
                | CrowdControlKind::Knockback
                | CrowdControlKind::Knockup
                | CrowdControlKind::Suppression
        )
    }

    /// Movement impairment only
    pub fn is_soft(self) -> bool {
        matches!(
            self,
            CrowdControlKind::Root | CrowdControlKind::Snare | CrowdControlKind::Slow
        )
    }

    /// Blocks one specific kind of action
    pub fn is_action_denial(self) -> bool {
        matches!(
            self,
            CrowdControlKind::Silence | CrowdControlKind::Disarm | CrowdControlKind::Blind
        )
    }

    /// Ignores tenacity entirely
    pub fn is_tenacity_immune(self) -> bool {
        matches!(self, CrowdControlKind::Knockup | CrowdControlKind::Suppression)
    }

    /// Ends as soon as the target takes damage
    pub fn breaks_on_damage(self) -> bool {
        matches!(self, CrowdControlKind::Sleep)
    }

    pub fn prevents_movement(self) -> bool {
        self.is_hard() || matches!(self, CrowdControlKind::Root | CrowdControlKind::Snare)
    }

    pub fn prevents_attacks(self) -> bool {
        self.is_hard() || matches!(self, CrowdControlKind::Disarm | CrowdControlKind::Blind)
    }

    pub fn prevents_spells(self) -> bool {
        self.is_hard() || matches!(self, CrowdControlKind::Silence)
    }
}

/// A crowd control instance about to be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdControlEffect {
    pub kind: CrowdControlKind,
    pub base_duration_in_turns: f64,
    /// Who applied it
    pub source: String,
    pub reduced_by_tenacity: bool,
    pub breaks_on_damage: bool,
    /// Stackable effects add a new instance instead of refreshing
    pub stackable: bool,
}

impl CrowdControlEffect {
    /// Create an effect with the kind's default flags
    pub fn new(kind: CrowdControlKind, base_duration_in_turns: f64, source: impl Into<String>) -> Self {
        CrowdControlEffect {
            kind,
            base_duration_in_turns,
            source: source.into(),
            reduced_by_tenacity: !kind.is_tenacity_immune(),
            breaks_on_damage: kind.breaks_on_damage(),
            stackable: matches!(kind, CrowdControlKind::Slow),
        }
    }

    pub fn stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }
}

/// A crowd control instance currently affecting a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCrowdControl {
    pub effect: CrowdControlEffect,
    /// Turns left after tenacity
    pub remaining_turns: f64,
}

impl ActiveCrowdControl {
    pub fn is_active(&self) -> bool {
        self.remaining_turns > 0.0
    }

    /// Advance one turn. Returns true if still active.
    pub fn tick(&mut self) -> bool {
        self.remaining_turns = (self.remaining_turns - 1.0).max(0.0);
        self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_there_are_fifteen_kinds() {
        assert_eq!(CrowdControlKind::all().len(), 15);
    }

    #[test]
    fn test_every_kind_has_a_category() {
        for &kind in CrowdControlKind::all() {
            assert!(
                kind.is_hard() || kind.is_soft() || kind.is_action_denial(),
                "{:?} has no category",
                kind
            );
        }
    }

    #[test]
    fn test_tenacity_immune_kinds_are_hard() {
        for &kind in CrowdControlKind::all() {
            if kind.is_tenacity_immune() {
                assert!(kind.is_hard());
            }
        }
    }

    #[test]
    fn test_restriction_table() {
        use CrowdControlKind::*;
        assert!(Stun.prevents_movement() && Stun.prevents_attacks() && Stun.prevents_spells());
        assert!(Root.prevents_movement() && !Root.prevents_attacks() && !Root.prevents_spells());
        assert!(Snare.prevents_movement() && !Snare.prevents_spells());
        assert!(!Slow.prevents_movement() && !Slow.prevents_attacks());
        assert!(Disarm.prevents_attacks() && !Disarm.prevents_movement() && !Disarm.prevents_spells());
        assert!(Blind.prevents_attacks() && !Blind.prevents_spells());
        assert!(Silence.prevents_spells() && !Silence.prevents_attacks() && !Silence.prevents_movement());
    }

    #[test]
    fn test_default_flags() {
        let knockup = CrowdControlEffect::new(CrowdControlKind::Knockup, 1.0, "boss");
        assert!(!knockup.reduced_by_tenacity);

        let sleep = CrowdControlEffect::new(CrowdControlKind::Sleep, 2.0, "witch");
        assert!(sleep.breaks_on_damage);
        assert!(sleep.reduced_by_tenacity);
    }

    #[test]
    fn test_active_tick() {
        let mut active = ActiveCrowdControl {
            effect: CrowdControlEffect::new(CrowdControlKind::Root, 1.5, "x"),
            remaining_turns: 1.5,
        };
        assert!(active.tick());
        assert!(!active.tick());
        assert!(active.remaining_turns.abs() < f64::EPSILON);
    }
}
