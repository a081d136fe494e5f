//! Combat - Action resolution and the per-battle session

mod battle;
mod resolution;
mod result;

pub use battle::{Battle, BattleSummary, Side};
pub use resolution::{resolve_action, ActionKind, ActionResolution};
pub use result::{ActionOutcome, AppliedEffect, DamageTaken};
