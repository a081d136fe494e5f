//! Experience & leveling - cubic curve, exp rewards and level-up boosts

mod experience;
mod level_up;

pub use experience::{check_level_up, enemy_level, exp_required_for_level, exp_reward, LevelUp};
pub use level_up::{award_experience, level_up_stats};
