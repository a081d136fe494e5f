//! PassiveContext - Mutable event payload handed to passive hooks

use super::{PassiveId, PassiveTrigger};
use crate::source::StatusEffect;
use crate::stat_block::CharacterStats;
use std::collections::HashMap;

/// Which side of an event an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    /// The character that owns the passive
    Owner,
    /// The other character in the event
    Target,
}

/// Side effect requested by a passive, applied by the combat flow
#[derive(Debug, Clone, PartialEq)]
pub enum PassiveAction {
    ApplyStatus { target: EffectTarget, effect: StatusEffect },
    DealDamage { target: EffectTarget, amount: f64 },
    Heal { target: EffectTarget, amount: f64 },
    Log(String),
}

/// Event payload shared by every passive triggered for one event
///
/// Passives run in registration order and see earlier passives' changes to
/// `damage`, `healing` and `gold_bonus`.
#[derive(Debug, Clone)]
pub struct PassiveContext<'a> {
    pub trigger: PassiveTrigger,
    pub owner_id: &'a str,
    pub target_id: Option<&'a str>,
    /// Owner's scaled stats at the time of the event
    pub owner_stats: &'a CharacterStats,
    pub owner_level: u32,
    /// Damage of the current hit (post-mitigation on hit)
    pub damage: f64,
    /// Extra healing for the owner accumulated by passives
    pub healing: f64,
    /// Flat gold added to the kill reward
    pub gold_bonus: f64,
    actions: Vec<PassiveAction>,
}

impl<'a> PassiveContext<'a> {
    pub fn new(
        trigger: PassiveTrigger,
        owner_id: &'a str,
        owner_stats: &'a CharacterStats,
        owner_level: u32,
    ) -> Self {
        PassiveContext {
            trigger,
            owner_id,
            target_id: None,
            owner_stats,
            owner_level,
            damage: 0.0,
            healing: 0.0,
            gold_bonus: 0.0,
            actions: Vec::new(),
        }
    }

    pub fn with_target(mut self, target_id: &'a str) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = damage;
        self
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.actions.push(PassiveAction::Log(message.into()));
    }

    pub fn apply_status(&mut self, target: EffectTarget, effect: StatusEffect) {
        self.actions.push(PassiveAction::ApplyStatus { target, effect });
    }

    pub fn deal_damage(&mut self, target: EffectTarget, amount: f64) {
        self.actions.push(PassiveAction::DealDamage { target, amount });
    }

    pub fn heal(&mut self, target: EffectTarget, amount: f64) {
        self.actions.push(PassiveAction::Heal { target, amount });
    }

    pub fn actions(&self) -> &[PassiveAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<PassiveAction> {
        std::mem::take(&mut self.actions)
    }
}

/// Stack counter view handed to one passive's hook
pub struct PassiveStacks<'a> {
    pub(super) ledger: &'a mut HashMap<PassiveId, u32>,
    pub(super) id: PassiveId,
    pub(super) max: Option<u32>,
    /// Copies of the item that granted this passive
    pub copies: u32,
}

impl PassiveStacks<'_> {
    pub fn get(&self) -> u32 {
        self.ledger.get(&self.id).copied().unwrap_or(0)
    }

    /// Add stacks, clamping at the passive's maximum. Returns the new count.
    pub fn add(&mut self, amount: u32) -> u32 {
        let raw = self.get().saturating_add(amount);
        let clamped = self.max.map_or(raw, |max| raw.min(max));
        self.ledger.insert(self.id, clamped);
        clamped
    }

    pub fn is_maxed(&self) -> bool {
        self.max.is_some_and(|max| self.get() >= max)
    }
}
