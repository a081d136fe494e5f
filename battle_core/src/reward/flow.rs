//! RewardFlow - Alive -> Defeated -> RewardComputed -> RewardApplied

use super::formulas::{final_exp, gold_reward_with, is_milestone_floor};
use super::loot::{milestone_choices, roll_loot};
use crate::character::Character;
use crate::config::RewardConstants;
use crate::content::ContentCatalog;
use crate::persistence::RunSnapshot;
use crate::progression::{award_experience, exp_reward, LevelUp};
use crate::stat_block::CharacterStats;
use crate::types::{CharacterClass, EnemyTier, ItemId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Illegal reward state transition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("Enemy has not been defeated yet")]
    NotDefeated,
    #[error("Enemy was already defeated")]
    AlreadyDefeated,
    #[error("Reward has not been computed yet")]
    NotComputed,
    #[error("Reward was already computed")]
    AlreadyComputed,
    #[error("Reward was already applied")]
    AlreadyApplied,
}

/// Everything reward computation reads about the fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardContext {
    pub enemy_tier: EnemyTier,
    pub enemy_level: u32,
    pub floor: u32,
    pub player_level: u32,
    pub player_class: CharacterClass,
    /// Percent bonuses from the player's aggregated stats
    pub gold_gain: f64,
    pub xp_gain: f64,
    pub magic_find: f64,
    /// Flat gold from on-kill passives
    pub reap_bonus: f64,
}

impl RewardContext {
    pub fn new(
        enemy_tier: EnemyTier,
        enemy_level: u32,
        floor: u32,
        player: &Character,
        player_stats: &CharacterStats,
    ) -> Self {
        RewardContext {
            enemy_tier,
            enemy_level,
            floor,
            player_level: player.level,
            player_class: player.class,
            gold_gain: player_stats.gold_gain,
            xp_gain: player_stats.xp_gain,
            magic_find: player_stats.magic_find,
            reap_bonus: 0.0,
        }
    }

    pub fn with_reap_bonus(mut self, reap_bonus: f64) -> Self {
        self.reap_bonus = reap_bonus;
        self
    }
}

/// Rewards for one defeated enemy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleRewardResult {
    pub loot_items: Vec<ItemId>,
    pub gold_amount: u64,
    pub exp_amount: u64,
    /// The floor is a milestone and the player should pick a reward
    pub milestone_triggered: bool,
    /// Distinct items offered when the milestone triggered
    pub milestone_choices: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RewardState {
    Alive,
    Defeated,
    RewardComputed(BattleRewardResult),
    RewardApplied,
}

/// What applying a reward changed
#[derive(Debug, Clone, PartialEq)]
pub struct RewardApplication {
    pub reward: BattleRewardResult,
    pub level_up: Option<LevelUp>,
}

/// Reward lifecycle for one enemy; each reward is applied at most once
#[derive(Debug, Clone)]
pub struct RewardFlow {
    context: RewardContext,
    state: RewardState,
}

impl RewardFlow {
    pub fn new(context: RewardContext) -> Self {
        RewardFlow {
            context,
            state: RewardState::Alive,
        }
    }

    pub fn state(&self) -> &RewardState {
        &self.state
    }

    pub fn context(&self) -> &RewardContext {
        &self.context
    }

    /// The computed reward, until it is applied
    pub fn reward(&self) -> Option<&BattleRewardResult> {
        match &self.state {
            RewardState::RewardComputed(reward) => Some(reward),
            _ => None,
        }
    }

    pub fn defeat(&mut self) -> Result<(), RewardError> {
        match self.state {
            RewardState::Alive => {
                self.state = RewardState::Defeated;
                Ok(())
            }
            RewardState::RewardApplied => Err(RewardError::AlreadyApplied),
            _ => Err(RewardError::AlreadyDefeated),
        }
    }

    /// Roll loot and compute gold, exp and milestone offers
    pub fn compute(
        &mut self,
        catalog: &ContentCatalog,
        constants: &RewardConstants,
        rng: &mut impl Rng,
    ) -> Result<BattleRewardResult, RewardError> {
        match self.state {
            RewardState::Defeated => {}
            RewardState::Alive => return Err(RewardError::NotDefeated),
            RewardState::RewardComputed(_) => return Err(RewardError::AlreadyComputed),
            RewardState::RewardApplied => return Err(RewardError::AlreadyApplied),
        }

        let ctx = &self.context;
        let gold_amount = gold_reward_with(
            ctx.enemy_tier,
            ctx.floor,
            ctx.gold_gain,
            ctx.reap_bonus,
            constants.floor_gold_scaling,
        );
        let exp_amount = final_exp(exp_reward(ctx.enemy_tier, ctx.enemy_level, ctx.player_level), ctx.xp_gain);
        let loot_items: Vec<ItemId> = roll_loot(
            ctx.enemy_tier,
            ctx.player_class,
            ctx.magic_find,
            catalog,
            constants,
            rng,
        )
        .into_iter()
        .collect();

        let milestone_triggered = is_milestone_floor(ctx.floor, constants.milestone_interval);
        let milestone_choices = if milestone_triggered {
            milestone_choices(
                ctx.enemy_tier,
                ctx.player_class,
                constants.milestone_choices,
                catalog,
                rng,
            )
        } else {
            Vec::new()
        };

        let reward = BattleRewardResult {
            loot_items,
            gold_amount,
            exp_amount,
            milestone_triggered,
            milestone_choices,
        };
        debug!(?reward, floor = ctx.floor, "reward computed");
        self.state = RewardState::RewardComputed(reward.clone());
        Ok(reward)
    }

    /// Write the computed reward into the run state
    ///
    /// Adds gold, experience and loot. Milestone choices are left for the
    /// player to pick. Returns the level-up the experience caused, if any.
    pub fn apply(&mut self, run: &mut RunSnapshot) -> Result<RewardApplication, RewardError> {
        let reward = match std::mem::replace(&mut self.state, RewardState::RewardApplied) {
            RewardState::RewardComputed(reward) => reward,
            RewardState::RewardApplied => return Err(RewardError::AlreadyApplied),
            other => {
                self.state = other;
                return Err(RewardError::NotComputed);
            }
        };

        run.gold = run.gold.saturating_add(reward.gold_amount);
        let (experience, level_up) = award_experience(run.experience, run.level, reward.exp_amount);
        run.experience = experience;
        if let Some(level_up) = level_up {
            run.level = level_up.new_level;
        }
        for item in &reward.loot_items {
            run.add_item(item, 1);
        }

        info!(
            gold = reward.gold_amount,
            exp = reward.exp_amount,
            loot = reward.loot_items.len(),
            level = run.level,
            "reward applied"
        );
        Ok(RewardApplication { reward, level_up })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ItemDefinition;
    use crate::types::Rarity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn catalog() -> ContentCatalog {
        let mut catalog = ContentCatalog::new();
        for (id, rarity) in [
            ("dagger", Rarity::Common),
            ("boots", Rarity::Uncommon),
            ("tome", Rarity::Uncommon),
            ("kindlegem", Rarity::Rare),
            ("zhonyas", Rarity::Epic),
        ] {
            catalog.add_item(ItemDefinition {
                id: ItemId::from(id),
                name: id.to_string(),
                rarity,
                stats: HashMap::new(),
                passive: None,
                classes: vec![],
                lootable: true,
            });
        }
        catalog
    }

    fn context(tier: EnemyTier, floor: u32) -> RewardContext {
        let player = Character::new_player("hero", "Hero", CharacterClass::Mage);
        let stats = player.scaled_stats(&[]);
        RewardContext::new(tier, 3, floor, &player, &stats)
    }

    #[test]
    fn test_full_lifecycle() {
        let mut flow = RewardFlow::new(context(EnemyTier::Minion, 2).with_reap_bonus(5.0));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut run = RunSnapshot::new("forest");

        flow.defeat().unwrap();
        let reward = flow.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        // 10 * 1.2 + 5
        assert_eq!(reward.gold_amount, 17);
        // 5 * 3 * 1.1 = 16.5
        assert_eq!(reward.exp_amount, 16);
        assert_eq!(reward.loot_items.len(), 1);
        assert!(!reward.milestone_triggered);

        let applied = flow.apply(&mut run).unwrap();
        assert_eq!(run.gold, 17);
        assert_eq!(run.experience, 16);
        assert_eq!(run.level, 2);
        assert_eq!(applied.level_up.map(|l| l.new_level), Some(2));
        assert_eq!(run.inventory.len(), 1);
        assert_eq!(flow.state(), &RewardState::RewardApplied);
    }

    #[test]
    fn test_reward_applied_only_once() {
        let mut flow = RewardFlow::new(context(EnemyTier::Elite, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut run = RunSnapshot::new("forest");

        flow.defeat().unwrap();
        flow.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        flow.apply(&mut run).unwrap();
        let gold = run.gold;

        assert_eq!(flow.apply(&mut run), Err(RewardError::AlreadyApplied));
        assert_eq!(run.gold, gold);
        assert_eq!(flow.defeat(), Err(RewardError::AlreadyApplied));
    }

    #[test]
    fn test_transitions_out_of_order() {
        let mut flow = RewardFlow::new(context(EnemyTier::Elite, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut run = RunSnapshot::new("forest");

        assert_eq!(
            flow.compute(&catalog(), &RewardConstants::default(), &mut rng),
            Err(RewardError::NotDefeated)
        );
        flow.defeat().unwrap();
        assert_eq!(flow.defeat(), Err(RewardError::AlreadyDefeated));
        assert_eq!(flow.apply(&mut run), Err(RewardError::NotComputed));
        assert_eq!(flow.state(), &RewardState::Defeated);

        flow.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        assert!(flow.reward().is_some());
        assert_eq!(
            flow.compute(&catalog(), &RewardConstants::default(), &mut rng),
            Err(RewardError::AlreadyComputed)
        );
    }

    #[test]
    fn test_milestone_scenario() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let mut on_ten = RewardFlow::new(context(EnemyTier::Minion, 10));
        on_ten.defeat().unwrap();
        let reward = on_ten.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        assert!(reward.milestone_triggered);
        assert_eq!(reward.milestone_choices.len(), 3);

        let mut on_seven = RewardFlow::new(context(EnemyTier::Minion, 7));
        on_seven.defeat().unwrap();
        let reward = on_seven.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        assert!(!reward.milestone_triggered);
        assert!(reward.milestone_choices.is_empty());
    }

    #[test]
    fn test_legend_gives_no_random_loot() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut flow = RewardFlow::new(context(EnemyTier::Legend, 3));
        flow.defeat().unwrap();
        let reward = flow.compute(&catalog(), &RewardConstants::default(), &mut rng).unwrap();
        assert!(reward.loot_items.is_empty());
        assert!(reward.gold_amount > 0);
    }
}
