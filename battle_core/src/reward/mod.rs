//! Battle rewards - gold, loot, milestones and the per-enemy reward state machine

mod flow;
mod formulas;
mod loot;

pub use flow::{BattleRewardResult, RewardApplication, RewardContext, RewardError, RewardFlow, RewardState};
pub use formulas::{final_exp, gold_reward, gold_reward_with, is_milestone_floor};
pub use loot::{milestone_choices, rarity_weights, roll_loot, roll_rarity};
