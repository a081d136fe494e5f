//! Damage system - Abilities, damage packets, crits and on-hit healing

mod calculation;
mod generator;
mod on_hit;
mod packet;

pub use calculation::{
    ability_packet, apply_attack_variance, basic_attack_packet, roll_critical, CritRoll,
};
pub use generator::Ability;
pub use on_hit::{resolve_on_hit_healing, OnHitHealing};
pub use packet::DamagePacket;
