//! Battle - One player against one enemy, owning both passive managers

use super::resolution::{apply_passive_actions, resolve_action};
use super::{ActionKind, ActionOutcome};
use crate::character::Character;
use crate::config::GameConstants;
use crate::content::ContentCatalog;
use crate::passive::{PassiveContext, PassiveId, PassiveManager, PassiveTrigger};
use crate::stat_block::{ActiveStatModifier, CharacterStats, StatKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Which combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// What a finished battle hands back to the run
#[derive(Debug, Clone)]
pub struct BattleSummary {
    /// `None` when the battle ended without a victor
    pub winner: Option<Side>,
    pub player: Character,
    pub enemy: Character,
    /// Persistent passive stacks to carry into the next battle
    pub permanent_stacks: HashMap<PassiveId, u32>,
    /// On-kill gold bonuses collected by the player
    pub bonus_gold: f64,
    pub turns: u32,
    pub log: Vec<String>,
}

/// A battle session
///
/// Exclusively owns both characters and their passive managers; callers act
/// through [`Battle::take_turn`] and read state through accessors.
#[derive(Debug, Clone)]
pub struct Battle {
    player: Character,
    enemy: Character,
    player_passives: PassiveManager,
    enemy_passives: PassiveManager,
    constants: GameConstants,
    turn: u32,
    bonus_gold: f64,
    log: Vec<String>,
}

impl Battle {
    /// Set up passives from both inventories and fire `BattleStart`
    ///
    /// Both sides fight with the configured base critical damage; item
    /// bonuses still add on top.
    pub fn start(
        mut player: Character,
        mut enemy: Character,
        catalog: &ContentCatalog,
        permanent_stacks: &HashMap<PassiveId, u32>,
        constants: GameConstants,
    ) -> Self {
        let base_crit = constants.crit.base_critical_damage;
        player.set_base_stat(StatKind::CriticalDamage, base_crit);
        enemy.set_base_stat(StatKind::CriticalDamage, base_crit);

        let mut player_passives = PassiveManager::default();
        player_passives.initialize(&player.inventory, catalog, permanent_stacks);
        let mut enemy_passives = PassiveManager::default();
        enemy_passives.initialize(&enemy.inventory, catalog, &HashMap::new());

        let mut battle = Battle {
            player,
            enemy,
            player_passives,
            enemy_passives,
            constants,
            turn: 0,
            bonus_gold: 0.0,
            log: Vec::new(),
        };
        battle.clamp_health(Side::Player);
        battle.clamp_health(Side::Enemy);

        let mut outcome = ActionOutcome::default();
        battle.notify(Side::Player, PassiveTrigger::BattleStart, &mut outcome);
        battle.notify(Side::Enemy, PassiveTrigger::BattleStart, &mut outcome);
        battle.log.push(format!("{} engages {}", battle.player.name, battle.enemy.name));
        battle.log.extend(outcome.log_messages);

        info!(player = %battle.player.id, enemy = %battle.enemy.id, "battle started");
        battle
    }

    pub fn character(&self, side: Side) -> &Character {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn stat_modifiers(&self, side: Side) -> Vec<ActiveStatModifier> {
        self.passives(side).stat_modifiers()
    }

    /// Current scaled stats, passives included
    pub fn scaled_stats(&self, side: Side) -> CharacterStats {
        self.character(side).scaled_stats(&self.stat_modifiers(side))
    }

    pub fn total_shield(&self, side: Side) -> f64 {
        self.character(side).total_shield()
    }

    pub fn passive_stacks(&self, side: Side, id: PassiveId) -> u32 {
        self.passives(side).stacks(id)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn bonus_gold(&self) -> f64 {
        self.bonus_gold
    }

    /// The surviving side once the other has fallen
    pub fn winner(&self) -> Option<Side> {
        match (self.player.is_alive(), self.enemy.is_alive()) {
            (true, false) => Some(Side::Player),
            (false, _) => Some(Side::Enemy),
            (true, true) => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// First ability the side can use right now, otherwise a basic attack
    pub fn auto_action(&self, side: Side) -> ActionKind {
        let actor = self.character(side);
        actor
            .abilities
            .iter()
            .find(|a| {
                let allowed = if a.is_spell() { actor.can_cast() } else { actor.can_attack() };
                allowed && a.mana_cost <= actor.current_mana
            })
            .cloned()
            .map_or(ActionKind::BasicAttack, ActionKind::Ability)
    }

    /// Run one full turn for `side`: turn start, the action, turn end
    pub fn take_turn(&mut self, side: Side, action: &ActionKind, rng: &mut impl Rng) -> ActionOutcome {
        if self.is_over() {
            return ActionOutcome::blocked("The battle is already over".to_string());
        }
        self.turn += 1;

        let stats = self.scaled_stats(side);
        let mut outcome = ActionOutcome::default();
        let regen = self.character_mut(side).start_turn(&stats);
        if regen > 0.0 {
            outcome.log(format!("{} regenerates {:.0} health", self.character(side).name, regen));
        }
        self.notify(side, PassiveTrigger::TurnStart, &mut outcome);

        let resolved = {
            let constants = &self.constants;
            let (actor, actor_passives, target, target_passives) = match side {
                Side::Player => (
                    &mut self.player,
                    &mut self.player_passives,
                    &mut self.enemy,
                    &mut self.enemy_passives,
                ),
                Side::Enemy => (
                    &mut self.enemy,
                    &mut self.enemy_passives,
                    &mut self.player,
                    &mut self.player_passives,
                ),
            };
            let resolution = resolve_action(actor, actor_passives, target, target_passives, action, constants, rng);
            *actor = resolution.attacker;
            *target = resolution.defender;
            resolution.outcome
        };
        merge_outcome(&mut outcome, resolved);

        let report = self.character_mut(side).end_turn();
        for name in &report.expired_effects {
            outcome.log(format!("{} fades from {}", name, self.character(side).name));
        }
        self.notify(side, PassiveTrigger::TurnEnd, &mut outcome);

        if side == Side::Player {
            self.bonus_gold += outcome.bonus_gold;
        }
        self.log.extend(outcome.log_messages.iter().cloned());
        debug!(turn = self.turn, ?side, over = self.is_over(), "turn finished");
        outcome
    }

    /// Alternate auto actions until someone falls or `max_turns` pass
    pub fn run_auto(&mut self, first: Side, max_turns: u32, rng: &mut impl Rng) -> Option<Side> {
        let mut side = first;
        while !self.is_over() && self.turn < max_turns {
            let action = self.auto_action(side);
            self.take_turn(side, &action, rng);
            side = side.opponent();
        }
        self.winner()
    }

    /// Fire `BattleEnd` and hand the persistent results back
    pub fn finish(mut self) -> BattleSummary {
        let mut outcome = ActionOutcome::default();
        self.notify(Side::Player, PassiveTrigger::BattleEnd, &mut outcome);
        self.notify(Side::Enemy, PassiveTrigger::BattleEnd, &mut outcome);
        self.log.extend(outcome.log_messages);

        let winner = self.winner();
        info!(?winner, turns = self.turn, "battle finished");
        BattleSummary {
            winner,
            permanent_stacks: self.player_passives.permanent_stacks(),
            player: self.player,
            enemy: self.enemy,
            bonus_gold: self.bonus_gold,
            turns: self.turn,
            log: self.log,
        }
    }

    fn passives(&self, side: Side) -> &PassiveManager {
        match side {
            Side::Player => &self.player_passives,
            Side::Enemy => &self.enemy_passives,
        }
    }

    fn character_mut(&mut self, side: Side) -> &mut Character {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    fn split_mut(&mut self, side: Side) -> (&mut Character, &mut PassiveManager, &mut Character, &mut PassiveManager) {
        match side {
            Side::Player => (
                &mut self.player,
                &mut self.player_passives,
                &mut self.enemy,
                &mut self.enemy_passives,
            ),
            Side::Enemy => (
                &mut self.enemy,
                &mut self.enemy_passives,
                &mut self.player,
                &mut self.player_passives,
            ),
        }
    }

    fn clamp_health(&mut self, side: Side) {
        let max = self.scaled_stats(side).health;
        let character = self.character_mut(side);
        character.current_health = character.current_health.min(max);
    }

    /// Fire a trigger with no hit attached and carry out queued actions
    fn notify(&mut self, side: Side, trigger: PassiveTrigger, outcome: &mut ActionOutcome) {
        let owner_stats = self.scaled_stats(side);
        let other_stats = self.scaled_stats(side.opponent());
        let (owner, passives, other, _) = self.split_mut(side);

        let mut ctx = PassiveContext::new(trigger, &owner.id, &owner_stats, owner.level).with_target(&other.id);
        if passives.trigger(&mut ctx) == 0 {
            return;
        }
        let healing = ctx.healing;
        let actions = ctx.take_actions();
        if healing > 0.0 {
            owner.heal(healing, owner_stats.health);
        }
        apply_passive_actions(actions, owner, owner_stats.health, other, other_stats.health, outcome);
    }
}

fn merge_outcome(into: &mut ActionOutcome, from: ActionOutcome) {
    let mut logs = std::mem::take(&mut into.log_messages);
    logs.extend(from.log_messages);
    let mut effects = std::mem::take(&mut into.effects_applied);
    effects.extend(from.effects_applied);
    *into = ActionOutcome {
        log_messages: logs,
        effects_applied: effects,
        ..from
    };
}
