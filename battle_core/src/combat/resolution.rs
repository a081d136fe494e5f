//! Action resolution - One attacker acting on one defender (immutable API)

use super::result::{ActionOutcome, AppliedEffect};
use crate::character::{Character, CrowdControlApplication};
use crate::config::GameConstants;
use crate::crowd_control::CrowdControlEffect;
use crate::damage::{ability_packet, basic_attack_packet, resolve_on_hit_healing, Ability, DamagePacket};
use crate::defense::resolve_mitigation_with;
use crate::passive::{EffectTarget, PassiveAction, PassiveContext, PassiveManager, PassiveTrigger};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Turns a shield granted by an ability lasts
const ABILITY_SHIELD_TURNS: i32 = 2;

/// What the attacker does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    BasicAttack,
    Ability(Ability),
}

impl ActionKind {
    pub fn name(&self) -> &str {
        match self {
            ActionKind::BasicAttack => "basic attack",
            ActionKind::Ability(ability) => &ability.name,
        }
    }
}

/// New attacker and defender states plus what happened
#[derive(Debug, Clone)]
pub struct ActionResolution {
    pub attacker: Character,
    pub defender: Character,
    pub outcome: ActionOutcome,
}

/// Resolve one action
///
/// Order of operations:
/// 1. action restrictions (crowd control, mana)
/// 2. raw packet: variance (basic attacks only), then crit
/// 3. mitigation against the defender's armor / magic resist
/// 4. attacker `OnHit` passives, which may change damage and add healing
/// 5. shields then health; defender `OnDamageTaken` passives
/// 6. on-hit healing (flat, life steal, omnivamp, passive bonus)
/// 7. ability side effects (crowd control, self shield)
/// 8. kill check and attacker `OnKill` passives
///
/// Passive stack state lives in the managers and is updated in place; the
/// characters are returned as new values.
pub fn resolve_action(
    attacker: &Character,
    attacker_passives: &mut PassiveManager,
    defender: &Character,
    defender_passives: &mut PassiveManager,
    action: &ActionKind,
    constants: &GameConstants,
    rng: &mut impl Rng,
) -> ActionResolution {
    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    let outcome = resolve_in_place(
        &mut attacker,
        attacker_passives,
        &mut defender,
        defender_passives,
        action,
        constants,
        rng,
    );

    ActionResolution {
        attacker,
        defender,
        outcome,
    }
}

fn check_restrictions(attacker: &mut Character, defender: &Character, action: &ActionKind) -> Result<(), String> {
    if !attacker.is_alive() {
        return Err(format!("{} cannot act", attacker.name));
    }
    if !defender.is_alive() {
        return Err(format!("{} is already defeated", defender.name));
    }
    match action {
        ActionKind::BasicAttack => {
            if !attacker.can_attack() {
                return Err(format!("{} is unable to attack", attacker.name));
            }
        }
        ActionKind::Ability(ability) => {
            let allowed = if ability.is_spell() {
                attacker.can_cast()
            } else {
                attacker.can_attack()
            };
            if !allowed {
                return Err(format!("{} cannot use {}", attacker.name, ability.name));
            }
            if !attacker.spend_mana(ability.mana_cost) {
                return Err(format!("{} lacks the mana for {}", attacker.name, ability.name));
            }
        }
    }
    Ok(())
}

fn resolve_in_place(
    attacker: &mut Character,
    attacker_passives: &mut PassiveManager,
    defender: &mut Character,
    defender_passives: &mut PassiveManager,
    action: &ActionKind,
    constants: &GameConstants,
    rng: &mut impl Rng,
) -> ActionOutcome {
    if let Err(message) = check_restrictions(attacker, defender, action) {
        return ActionOutcome::blocked(message);
    }

    let attacker_stats = attacker.scaled_stats(&attacker_passives.stat_modifiers());
    let defender_stats = defender.scaled_stats(&defender_passives.stat_modifiers());
    let attacker_id = attacker.id.clone();
    let defender_id = defender.id.clone();

    let packet: DamagePacket = match action {
        ActionKind::BasicAttack => basic_attack_packet(&attacker_stats, constants.attack.variance, rng),
        ActionKind::Ability(ability) => ability_packet(ability, &attacker_stats, rng),
    };
    let mitigation = resolve_mitigation_with(
        &packet,
        defender_stats.armor,
        defender_stats.magic_resist,
        attacker_stats.lethality,
        attacker_stats.magic_penetration,
        &constants.mitigation,
    );

    let mut outcome = ActionOutcome {
        mitigation,
        is_critical: packet.is_critical,
        ..ActionOutcome::default()
    };

    // On-hit passives see post-mitigation damage
    let mut hit = PassiveContext::new(PassiveTrigger::OnHit, &attacker_id, &attacker_stats, attacker.level)
        .with_target(&defender_id)
        .with_damage(mitigation.total());
    if mitigation.total() > 0.0 {
        attacker_passives.trigger(&mut hit);
    }
    let dealt = if hit.damage.is_finite() { hit.damage.max(0.0).floor() } else { 0.0 };
    let passive_healing = hit.healing;
    let hit_actions = hit.take_actions();

    let taken = defender.take_damage(dealt);
    outcome.damage_dealt = taken.total();
    for &kind in &taken.broken_crowd_control {
        outcome.effects_applied.push(AppliedEffect::CrowdControlBroken { kind });
    }
    outcome.log(describe_hit(attacker, defender, action, outcome.damage_dealt, packet.is_critical));

    let (extra_damage, extra_healing) = apply_passive_actions(
        hit_actions,
        attacker,
        attacker_stats.health,
        defender,
        defender_stats.health,
        &mut outcome,
    );
    outcome.damage_dealt += extra_damage;
    outcome.healing_done += extra_healing;

    if taken.total() > 0.0 {
        let mut struck = PassiveContext::new(PassiveTrigger::OnDamageTaken, &defender_id, &defender_stats, defender.level)
            .with_target(&attacker_id)
            .with_damage(taken.total());
        defender_passives.trigger(&mut struck);
        let actions = struck.take_actions();
        apply_passive_actions(
            actions,
            defender,
            defender_stats.health,
            attacker,
            attacker_stats.health,
            &mut outcome,
        );
    }

    // Shield damage counts as dealt; physical share scales with any passive change
    let physical_dealt = if mitigation.total() > 0.0 {
        mitigation.physical * outcome.damage_dealt / mitigation.total()
    } else {
        0.0
    };
    let healing = resolve_on_hit_healing(
        &attacker_stats,
        physical_dealt,
        outcome.damage_dealt,
        passive_healing,
        attacker.current_health,
        attacker_stats.health,
    );
    let healed = attacker.heal(healing.applied, attacker_stats.health);
    if healed > 0.0 {
        outcome.healing_done += healed;
        outcome.log(format!("{} recovers {:.0} health", attacker.name, healed));
    }

    if let ActionKind::Ability(ability) = action {
        apply_ability_effects(
            ability,
            attacker,
            attacker_stats.heal_shield_power,
            defender,
            defender_stats.tenacity,
            &mut outcome,
        );
    }

    if !defender.is_alive() {
        outcome.killed = true;
        outcome.log(format!("{} defeats {}", attacker.name, defender.name));

        let mut kill = PassiveContext::new(PassiveTrigger::OnKill, &attacker_id, &attacker_stats, attacker.level)
            .with_target(&defender_id);
        attacker_passives.trigger(&mut kill);
        outcome.bonus_gold = kill.gold_bonus.max(0.0);
        let actions = kill.take_actions();
        apply_passive_actions(
            actions,
            attacker,
            attacker_stats.health,
            defender,
            defender_stats.health,
            &mut outcome,
        );
    }

    debug!(
        attacker = %attacker_id,
        defender = %defender_id,
        action = action.name(),
        damage = outcome.damage_dealt,
        healing = outcome.healing_done,
        killed = outcome.killed,
        "action resolved"
    );
    outcome
}

fn describe_hit(attacker: &Character, defender: &Character, action: &ActionKind, damage: f64, critical: bool) -> String {
    let verb = match action {
        ActionKind::BasicAttack => "strikes".to_string(),
        ActionKind::Ability(ability) => format!("uses {} on", ability.name),
    };
    let crit = if critical { " (critical)" } else { "" };
    format!("{} {} {} for {:.0} damage{}", attacker.name, verb, defender.name, damage, crit)
}

fn apply_ability_effects(
    ability: &Ability,
    attacker: &mut Character,
    heal_shield_power: f64,
    defender: &mut Character,
    defender_tenacity: f64,
    outcome: &mut ActionOutcome,
) {
    if let Some((kind, turns)) = ability.crowd_control {
        if defender.is_alive() {
            let effect = CrowdControlEffect::new(kind, turns, attacker.id.clone());
            let applied = match defender.apply_crowd_control(effect, defender_tenacity) {
                CrowdControlApplication::Immune => AppliedEffect::CrowdControlImmune { kind },
                CrowdControlApplication::Resisted => AppliedEffect::CrowdControlResisted { kind },
                CrowdControlApplication::Applied { turns } | CrowdControlApplication::Refreshed { turns } => {
                    outcome.log(format!("{} is afflicted by {:?} for {} turns", defender.name, kind, turns));
                    AppliedEffect::CrowdControl { kind, turns }
                }
            };
            outcome.effects_applied.push(applied);
        }
    }

    if ability.self_shield > 0.0 {
        let amount = attacker.add_shield(
            format!("{}_shield", ability.id),
            ability.self_shield,
            ABILITY_SHIELD_TURNS,
            heal_shield_power,
        );
        if amount > 0.0 {
            outcome.log(format!("{} gains a {:.0} point shield", attacker.name, amount));
            outcome.effects_applied.push(AppliedEffect::Shield {
                target: attacker.id.clone(),
                amount,
            });
        }
    }
}

/// Carry out actions queued by passive hooks
///
/// Returns (damage dealt to `other`, healing received by `owner`).
pub(crate) fn apply_passive_actions(
    actions: Vec<PassiveAction>,
    owner: &mut Character,
    owner_max_health: f64,
    other: &mut Character,
    other_max_health: f64,
    outcome: &mut ActionOutcome,
) -> (f64, f64) {
    let mut damage_to_other = 0.0;
    let mut healing_to_owner = 0.0;

    for action in actions {
        match action {
            PassiveAction::Log(message) => outcome.log(message),
            PassiveAction::ApplyStatus { target, effect } => {
                let character = match target {
                    EffectTarget::Owner => &mut *owner,
                    EffectTarget::Target => &mut *other,
                };
                outcome.effects_applied.push(AppliedEffect::Status {
                    target: character.id.clone(),
                    id: effect.id.clone(),
                });
                character.apply_status_effect(effect);
            }
            PassiveAction::DealDamage { target, amount } => match target {
                EffectTarget::Owner => {
                    owner.take_damage(amount);
                }
                EffectTarget::Target => {
                    damage_to_other += other.take_damage(amount).total();
                }
            },
            PassiveAction::Heal { target, amount } => match target {
                EffectTarget::Owner => healing_to_owner += owner.heal(amount, owner_max_health),
                EffectTarget::Target => {
                    other.heal(amount, other_max_health);
                }
            },
        }
    }

    (damage_to_other, healing_to_owner)
}
