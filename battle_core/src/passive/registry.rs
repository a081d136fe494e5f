//! PassiveRegistry - PassiveId to behavior mapping

use super::{EffectTarget, PassiveContext, PassiveId, PassiveStacks, PassiveTrigger};
use crate::stat_block::{CharacterStats, StatKind, StatModifierFn, StatPatch};
use std::collections::HashMap;
use std::fmt;

/// Signature of a passive's event hook
pub type EventHookFn = fn(&mut PassiveContext<'_>, &mut PassiveStacks<'_>);

/// Everything the engine needs to know about one passive
#[derive(Clone, Copy)]
pub struct PassiveBehavior {
    pub id: PassiveId,
    pub name: &'static str,
    pub triggers: &'static [PassiveTrigger],
    /// Stack ceiling; `None` means unbounded
    pub max_stacks: Option<u32>,
    /// Stacks are carried into the next battle of the run
    pub persists_between_battles: bool,
    /// Effect scales with every owned copy instead of being unique
    pub additive_per_copy: bool,
    pub stat_modifier: Option<StatModifierFn>,
    pub on_event: Option<EventHookFn>,
}

impl fmt::Debug for PassiveBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassiveBehavior")
            .field("id", &self.id)
            .field("triggers", &self.triggers)
            .field("max_stacks", &self.max_stacks)
            .field("persists_between_battles", &self.persists_between_battles)
            .field("additive_per_copy", &self.additive_per_copy)
            .finish_non_exhaustive()
    }
}

impl PassiveBehavior {
    pub fn listens_to(&self, trigger: PassiveTrigger) -> bool {
        self.triggers.contains(&trigger)
    }
}

/// Lookup table of passive behaviors
#[derive(Debug, Clone, Default)]
pub struct PassiveRegistry {
    behaviors: HashMap<PassiveId, PassiveBehavior>,
}

impl PassiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in passive
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for &id in PassiveId::all() {
            registry.register(standard_behavior(id));
        }
        registry
    }

    /// Register or replace a behavior
    pub fn register(&mut self, behavior: PassiveBehavior) {
        self.behaviors.insert(behavior.id, behavior);
    }

    pub fn get(&self, id: PassiveId) -> Option<&PassiveBehavior> {
        self.behaviors.get(&id)
    }
}

fn standard_behavior(id: PassiveId) -> PassiveBehavior {
    use PassiveTrigger::*;
    match id {
        PassiveId::LifeDraining => PassiveBehavior {
            id,
            name: "Life Draining",
            triggers: &[StatCalculation],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: true,
            stat_modifier: Some(life_draining_stats),
            on_event: None,
        },
        PassiveId::EnduringFocus => PassiveBehavior {
            id,
            name: "Enduring Focus",
            triggers: &[StatCalculation],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: false,
            stat_modifier: Some(enduring_focus_stats),
            on_event: None,
        },
        PassiveId::Drain => PassiveBehavior {
            id,
            name: "Drain",
            triggers: &[OnHit],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: true,
            stat_modifier: None,
            on_event: Some(drain_on_hit),
        },
        PassiveId::Pathfinder => PassiveBehavior {
            id,
            name: "Pathfinder",
            triggers: &[StatCalculation],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: true,
            stat_modifier: Some(pathfinder_stats),
            on_event: None,
        },
        PassiveId::MagicalOpus => PassiveBehavior {
            id,
            name: "Magical Opus",
            triggers: &[StatCalculation],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: false,
            stat_modifier: Some(magical_opus_stats),
            on_event: None,
        },
        PassiveId::Reap => PassiveBehavior {
            id,
            name: "Reap",
            triggers: &[OnKill],
            max_stacks: None,
            persists_between_battles: false,
            additive_per_copy: true,
            stat_modifier: None,
            on_event: Some(reap_on_kill),
        },
        PassiveId::Glory => PassiveBehavior {
            id,
            name: "Glory",
            triggers: &[OnKill, StatCalculation],
            max_stacks: Some(10),
            persists_between_battles: true,
            additive_per_copy: false,
            stat_modifier: Some(glory_stats),
            on_event: Some(glory_on_kill),
        },
        PassiveId::GloryUpgraded => PassiveBehavior {
            id,
            name: "Glory (Upgraded)",
            triggers: &[OnKill, StatCalculation],
            max_stacks: Some(25),
            persists_between_battles: true,
            additive_per_copy: false,
            stat_modifier: Some(glory_upgraded_stats),
            on_event: Some(glory_upgraded_on_kill),
        },
    }
}

const LIFE_DRAINING_LIFE_STEAL: f64 = 5.0;
const ENDURING_FOCUS_TENACITY: f64 = 20.0;
const ENDURING_FOCUS_REGEN: f64 = 1.5;
const DRAIN_RATIO: f64 = 0.06;
const PATHFINDER_XP_GAIN: f64 = 10.0;
const PATHFINDER_MOVE_SPEED: f64 = 5.0;
const MAGICAL_OPUS_MULTIPLIER: f64 = 1.30;
const REAP_GOLD: f64 = 5.0;
const GLORY_AP_PER_STACK: f64 = 4.0;
const GLORY_UPGRADED_AP_PER_STACK: f64 = 5.0;
const GLORY_UPGRADED_SPEED_THRESHOLD: u32 = 10;
const GLORY_UPGRADED_MOVE_SPEED: f64 = 10.0;

fn life_draining_stats(stats: &CharacterStats, _level: u32, _stacks: u32, copies: u32) -> StatPatch {
    StatPatch::new().add(stats, StatKind::LifeSteal, LIFE_DRAINING_LIFE_STEAL * f64::from(copies))
}

fn enduring_focus_stats(stats: &CharacterStats, _level: u32, _stacks: u32, _copies: u32) -> StatPatch {
    StatPatch::new()
        .add(stats, StatKind::Tenacity, ENDURING_FOCUS_TENACITY)
        .add(stats, StatKind::HealthRegen, ENDURING_FOCUS_REGEN)
}

fn drain_on_hit(ctx: &mut PassiveContext<'_>, stacks: &mut PassiveStacks<'_>) {
    if ctx.damage <= 0.0 {
        return;
    }
    let amount = ctx.damage * DRAIN_RATIO * f64::from(stacks.copies);
    ctx.healing += amount;
    ctx.log(format!("Drain restores {:.0} health", amount));
}

fn pathfinder_stats(stats: &CharacterStats, _level: u32, _stacks: u32, copies: u32) -> StatPatch {
    StatPatch::new()
        .add(stats, StatKind::XpGain, PATHFINDER_XP_GAIN * f64::from(copies))
        .add(stats, StatKind::MovementSpeed, PATHFINDER_MOVE_SPEED)
}

fn magical_opus_stats(stats: &CharacterStats, _level: u32, _stacks: u32, _copies: u32) -> StatPatch {
    StatPatch::new().scale(stats, StatKind::AbilityPower, MAGICAL_OPUS_MULTIPLIER)
}

fn reap_on_kill(ctx: &mut PassiveContext<'_>, stacks: &mut PassiveStacks<'_>) {
    let gold = REAP_GOLD * f64::from(stacks.copies);
    ctx.gold_bonus += gold;
    ctx.log(format!("Reap collects {:.0} bonus gold", gold));
}

fn glory_stats(stats: &CharacterStats, _level: u32, stacks: u32, _copies: u32) -> StatPatch {
    StatPatch::new().add(stats, StatKind::AbilityPower, GLORY_AP_PER_STACK * f64::from(stacks))
}

fn glory_on_kill(ctx: &mut PassiveContext<'_>, stacks: &mut PassiveStacks<'_>) {
    if stacks.is_maxed() {
        return;
    }
    let now = stacks.add(1);
    ctx.log(format!("Glory grows to {} stacks", now));
}

fn glory_upgraded_stats(stats: &CharacterStats, _level: u32, stacks: u32, _copies: u32) -> StatPatch {
    let patch = StatPatch::new().add(
        stats,
        StatKind::AbilityPower,
        GLORY_UPGRADED_AP_PER_STACK * f64::from(stacks),
    );
    if stacks >= GLORY_UPGRADED_SPEED_THRESHOLD {
        patch.add(stats, StatKind::MovementSpeed, GLORY_UPGRADED_MOVE_SPEED)
    } else {
        patch
    }
}

fn glory_upgraded_on_kill(ctx: &mut PassiveContext<'_>, stacks: &mut PassiveStacks<'_>) {
    if stacks.is_maxed() {
        return;
    }
    let now = stacks.add(2);
    ctx.log(format!("Glory grows to {} stacks", now));
    if now >= GLORY_UPGRADED_SPEED_THRESHOLD {
        ctx.apply_status(
            EffectTarget::Owner,
            crate::source::StatusEffect::new("buff_glorious_haste", "Glorious Haste", 2, false)
                .with_modifier(StatKind::MovementSpeed, GLORY_UPGRADED_MOVE_SPEED),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_id() {
        let registry = PassiveRegistry::standard();
        for &id in PassiveId::all() {
            let behavior = registry.get(id).unwrap();
            assert_eq!(behavior.id, id);
            assert!(!behavior.triggers.is_empty());
        }
    }

    #[test]
    fn test_stat_passives_have_modifiers() {
        let registry = PassiveRegistry::standard();
        for &id in PassiveId::all() {
            let behavior = registry.get(id).unwrap();
            assert_eq!(
                behavior.listens_to(PassiveTrigger::StatCalculation),
                behavior.stat_modifier.is_some(),
                "{:?}",
                id
            );
        }
    }

    #[test]
    fn test_only_glory_persists() {
        let registry = PassiveRegistry::standard();
        let persistent: Vec<PassiveId> = PassiveId::all()
            .iter()
            .copied()
            .filter(|id| registry.get(*id).unwrap().persists_between_battles)
            .collect();
        assert_eq!(persistent, vec![PassiveId::Glory, PassiveId::GloryUpgraded]);
    }

    #[test]
    fn test_magical_opus_scales_current_ap() {
        let stats = CharacterStats::default().with(StatKind::AbilityPower, 100.0);
        let patched = magical_opus_stats(&stats, 1, 0, 1).apply_to(&stats);
        assert!((patched.ability_power - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_glory_upgraded_speed_threshold() {
        let stats = CharacterStats::default();
        let below = glory_upgraded_stats(&stats, 1, 9, 1).apply_to(&stats);
        let at = glory_upgraded_stats(&stats, 1, 10, 1).apply_to(&stats);
        assert!(below.movement_speed.abs() < f64::EPSILON);
        assert!((at.movement_speed - 10.0).abs() < f64::EPSILON);
        assert!((at.ability_power - 50.0).abs() < f64::EPSILON);
    }
}
