//! Character - Identity, base stats and in-battle state of one combatant
//!
//! Stat transformations never touch `base_stats` in place: derived records
//! (`flat_stats`, `scaled_stats`) are recomputed from it on demand, and class
//! changes return a new character.

use crate::combat::DamageTaken;
use crate::config::LevelUpBoost;
use crate::content::ContentCatalog;
use crate::crowd_control::{self, ActiveCrowdControl, CrowdControlEffect, CrowdControlKind};
use crate::damage::Ability;
use crate::defense::{absorb_with_shields, tick_shields, total_shield, ShieldInstance};
use crate::progression::{check_level_up, level_up_stats, LevelUp};
use crate::source::{apply_sources, equipped_bonuses, StatSource, StatusEffect};
use crate::stat_block::{aggregate, ActiveStatModifier, CharacterStats, StatKind};
use crate::types::{add_to_inventory, CharacterClass, EnemyTier, InventoryEntry, ItemId, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happened when a crowd control effect was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrowdControlApplication {
    /// Tenacity at 100 negated it
    Immune,
    /// Tenacity reduced it to zero turns
    Resisted,
    /// Added as a new instance
    Applied { turns: f64 },
    /// An existing instance of the same kind was refreshed
    Refreshed { turns: f64 },
}

impl CrowdControlApplication {
    pub fn landed(&self) -> bool {
        matches!(self, Self::Applied { .. } | Self::Refreshed { .. })
    }
}

/// Per-turn bookkeeping reported by [`Character::end_turn`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnEnd {
    pub expired_effects: Vec<String>,
    pub expired_crowd_control: Vec<CrowdControlKind>,
    pub expired_shields: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub class: CharacterClass,
    /// Set for spawned enemies
    #[serde(default)]
    pub tier: Option<EnemyTier>,
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    pub current_health: f64,
    #[serde(default)]
    pub current_mana: f64,
    /// Attribute snapshot without items, class bonuses or effects
    pub base_stats: CharacterStats,
    /// `base_stats` plus owned item bonuses, refreshed from the catalog
    pub equipped_stats: CharacterStats,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub shields: Vec<ShieldInstance>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub crowd_control: Vec<ActiveCrowdControl>,
}

impl Character {
    /// Create a character at full health and mana with no items
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        class: CharacterClass,
        level: u32,
        base_stats: CharacterStats,
    ) -> Self {
        let mut character = Character {
            id: id.into(),
            name: name.into(),
            role,
            class,
            tier: None,
            level: level.max(1),
            experience: 0,
            current_health: 0.0,
            current_mana: 0.0,
            base_stats,
            equipped_stats: base_stats,
            inventory: Vec::new(),
            abilities: Vec::new(),
            shields: Vec::new(),
            status_effects: Vec::new(),
            crowd_control: Vec::new(),
        };
        character.restore_full(&[]);
        character
    }

    /// Fresh level 1 player with starter stats
    pub fn new_player(id: impl Into<String>, name: impl Into<String>, class: CharacterClass) -> Self {
        Self::new(id, name, Role::Player, class, 1, CharacterStats::starter())
    }

    // === Stats ===

    /// Equipped stats plus active status effect modifiers, before class and passives
    pub fn flat_stats(&self) -> CharacterStats {
        let sources: Vec<&dyn StatSource> = self
            .status_effects
            .iter()
            .map(|e| e as &dyn StatSource)
            .collect();
        apply_sources(&self.equipped_stats, &sources)
    }

    /// Final stats for this moment of the battle
    pub fn scaled_stats(&self, passives: &[ActiveStatModifier]) -> CharacterStats {
        aggregate(&self.flat_stats(), self.level, self.class, passives)
    }

    pub fn max_health(&self, passives: &[ActiveStatModifier]) -> f64 {
        self.scaled_stats(passives).health
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    /// Fill health and mana to their current maximums
    pub fn restore_full(&mut self, passives: &[ActiveStatModifier]) {
        let stats = self.scaled_stats(passives);
        self.current_health = stats.health;
        self.current_mana = stats.mana;
    }

    /// Recompute item bonuses from the catalog after the inventory changed
    pub fn refresh_equipment(&mut self, catalog: &ContentCatalog) {
        self.equipped_stats = equipped_bonuses(&self.base_stats, &self.inventory, catalog);
    }

    /// Replace `base_stats`, carrying the current item bonuses over
    fn rebase(&mut self, new_base: CharacterStats) {
        let old_base = self.base_stats;
        self.equipped_stats = StatKind::all().iter().fold(new_base, |acc, &kind| {
            acc.plus(kind, self.equipped_stats.get(kind) - old_base.get(kind))
        });
        self.base_stats = new_base;
    }

    // === Health, mana and shields ===

    /// Push damage through shields (oldest first), then health
    ///
    /// Any damage wakes the character from crowd control that breaks on damage.
    pub fn take_damage(&mut self, amount: f64) -> DamageTaken {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let absorption = absorb_with_shields(&self.shields, amount);
        self.shields = absorption.shields;

        let health_damage = absorption.overflow.min(self.current_health.max(0.0));
        self.current_health = (self.current_health - absorption.overflow).max(0.0);

        let mut broken = Vec::new();
        if amount > 0.0 {
            self.crowd_control.retain(|cc| {
                if cc.effect.breaks_on_damage {
                    broken.push(cc.effect.kind);
                    false
                } else {
                    true
                }
            });
        }

        DamageTaken {
            absorbed_by_shields: absorption.absorbed,
            health_damage,
            overkill: absorption.overflow - health_damage,
            broken_crowd_control: broken,
        }
    }

    /// Heal up to `max_health`. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f64, max_health: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 || !self.is_alive() {
            return 0.0;
        }
        let before = self.current_health;
        self.current_health = (self.current_health + amount).min(max_health.max(before));
        self.current_health - before
    }

    /// Spend mana if there is enough. Returns false otherwise.
    pub fn spend_mana(&mut self, cost: f64) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if self.current_mana + f64::EPSILON < cost {
            return false;
        }
        self.current_mana = (self.current_mana - cost).max(0.0);
        true
    }

    /// Grant a shield, scaled by heal/shield power. Returns the shield amount.
    pub fn add_shield(
        &mut self,
        id: impl Into<String>,
        amount: f64,
        duration_in_turns: i32,
        heal_shield_power: f64,
    ) -> f64 {
        let scaled = amount * (1.0 + heal_shield_power.max(0.0) / 100.0);
        let shield = ShieldInstance::new(id, scaled, duration_in_turns);
        let granted = shield.current_amount;
        if shield.is_active() {
            self.shields.push(shield);
        }
        granted
    }

    pub fn total_shield(&self) -> f64 {
        total_shield(&self.shields)
    }

    // === Effects ===

    /// Apply a status effect; an existing effect with the same id is refreshed
    pub fn apply_status_effect(&mut self, effect: StatusEffect) {
        match self.status_effects.iter_mut().find(|e| e.id == effect.id) {
            Some(existing) => {
                existing.refresh(effect.duration_in_turns);
                existing.stacks = existing.stacks.max(effect.stacks);
            }
            None => self.status_effects.push(effect),
        }
    }

    /// Apply crowd control against this character's tenacity
    ///
    /// Non-stackable kinds refresh an existing instance to the longer duration.
    pub fn apply_crowd_control(&mut self, effect: CrowdControlEffect, tenacity: f64) -> CrowdControlApplication {
        if effect.reduced_by_tenacity && crowd_control::is_immune(tenacity, effect.kind) {
            return CrowdControlApplication::Immune;
        }
        let turns = crowd_control::resolve_effect_duration(&effect, tenacity);
        if turns <= 0.0 {
            return CrowdControlApplication::Resisted;
        }

        debug!(target = %self.id, kind = ?effect.kind, turns, "crowd control applied");
        if !effect.stackable {
            if let Some(existing) = self
                .crowd_control
                .iter_mut()
                .find(|cc| cc.effect.kind == effect.kind && cc.is_active())
            {
                existing.remaining_turns = existing.remaining_turns.max(turns);
                return CrowdControlApplication::Refreshed {
                    turns: existing.remaining_turns,
                };
            }
        }

        self.crowd_control.push(ActiveCrowdControl {
            effect,
            remaining_turns: turns,
        });
        CrowdControlApplication::Applied { turns }
    }

    pub fn can_move(&self) -> bool {
        crowd_control::can_move(&self.crowd_control)
    }

    pub fn can_attack(&self) -> bool {
        crowd_control::can_attack(&self.crowd_control)
    }

    pub fn can_cast(&self) -> bool {
        crowd_control::can_cast(&self.crowd_control)
    }

    // === Turn flow ===

    /// Regenerate health and mana. Returns the health restored.
    pub fn start_turn(&mut self, stats: &CharacterStats) -> f64 {
        if !self.is_alive() {
            return 0.0;
        }
        self.current_mana = (self.current_mana + stats.mana_regen.max(0.0)).min(stats.mana.max(self.current_mana));
        self.heal(stats.health_regen, stats.health)
    }

    /// Tick every timed effect by one turn and drop what expired
    pub fn end_turn(&mut self) -> TurnEnd {
        let mut report = TurnEnd::default();

        self.status_effects.retain_mut(|effect| {
            let active = effect.tick();
            if !active {
                report.expired_effects.push(effect.name.clone());
            }
            active
        });

        self.crowd_control.retain_mut(|cc| {
            let active = cc.tick();
            if !active {
                report.expired_crowd_control.push(cc.effect.kind);
            }
            active
        });

        let before = self.shields.len();
        self.shields = tick_shields(&self.shields);
        report.expired_shields = before - self.shields.len();

        report
    }

    // === Progression ===

    /// Same character with a different class; base stats are shared, not changed
    pub fn change_class(&self, class: CharacterClass) -> Character {
        Character {
            class,
            ..self.clone()
        }
    }

    /// Replace one base stat, keeping item bonuses on top
    pub fn set_base_stat(&mut self, kind: StatKind, value: f64) {
        self.rebase(self.base_stats.with(kind, value));
    }

    /// Apply flat level-up boosts
    ///
    /// Current health rises by exactly the change in max health; it is not
    /// refilled.
    pub fn apply_level_ups(
        &mut self,
        new_level: u32,
        levels_gained: u32,
        boost: &LevelUpBoost,
        passives: &[ActiveStatModifier],
    ) {
        if levels_gained == 0 {
            return;
        }
        let old_max = self.max_health(passives);
        self.rebase(level_up_stats(&self.base_stats, levels_gained, boost));
        self.level = new_level.max(self.level);
        let new_max = self.max_health(passives);
        self.current_health = (self.current_health + (new_max - old_max)).clamp(0.0, new_max);
        debug!(character = %self.id, level = self.level, max_health = new_max, "leveled up");
    }

    /// Add experience and apply any resulting level-ups
    pub fn gain_experience(
        &mut self,
        amount: u64,
        boost: &LevelUpBoost,
        passives: &[ActiveStatModifier],
    ) -> Option<LevelUp> {
        self.experience = self.experience.saturating_add(amount);
        let level_up = check_level_up(self.experience, self.level)?;
        self.apply_level_ups(level_up.new_level, level_up.levels_gained, boost, passives);
        Some(level_up)
    }

    /// Add items to the inventory and refresh item bonuses
    pub fn add_item(&mut self, item_id: &ItemId, quantity: u32, catalog: &ContentCatalog) {
        add_to_inventory(&mut self.inventory, item_id, quantity);
        self.refresh_equipment(catalog);
    }
}
