//! Crowd control - CC kinds, tenacity resolution and action restrictions

mod resolve;
mod types;

pub use resolve::{
    can_attack, can_cast, can_move, is_immune, resolve_cc_duration, resolve_effect_duration, MAX_TENACITY,
};
pub use types::{ActiveCrowdControl, CrowdControlEffect, CrowdControlKind};
