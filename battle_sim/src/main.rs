//! Battle Sim - A headless seeded run demonstrating battle_core
//!
//! This run shows:
//! - Loading items and enemies from a TOML catalog
//! - Spawning floor-scaled enemies from typed requests
//! - Auto-resolved battles with passives, shields and crowd control
//! - Reward flow: loot, gold, experience and milestone picks
//! - Saving the run through a profile store between floors
//!
//! Usage: `battle_sim [seed] [floors]`. Set `RUST_LOG=debug` for engine traces.

use battle_core::config::{load_constants, GameConstants};
use battle_core::content::{load_catalog, parse_catalog, spawn_enemy, ContentCatalog, EnemyRequest};
use battle_core::passive::PassiveManager;
use battle_core::persistence::{InMemoryProfileStore, ProfileStore, RunKey, RunSnapshot};
use battle_core::reward::{RewardContext, RewardFlow};
use battle_core::{Ability, Battle, Character, CharacterClass, EnemyTier, Faction, ItemId, Side};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BUILTIN_CATALOG: &str = include_str!("../content/catalog.toml");
const DEFAULT_SEED: u64 = 42;
const DEFAULT_FLOORS: u32 = 10;
const MAX_TURNS: u32 = 80;

/// Region the run starts in and the faction its enemies come from
const REGIONS: &[(&str, Faction)] = &[
    ("whispering_woods", Faction::Beast),
    ("sunken_crypt", Faction::Undead),
    ("ember_rift", Faction::Demon),
];

fn load_content() -> ContentCatalog {
    let paths = ["battle_sim/content/catalog.toml", "content/catalog.toml"];
    for p in &paths {
        let path = Path::new(p);
        if !path.exists() {
            continue;
        }
        match load_catalog(path) {
            Ok(catalog) => {
                info!(path = p, "catalog loaded");
                return catalog;
            }
            Err(e) => warn!(path = p, error = %e, "failed to load catalog"),
        }
    }
    match parse_catalog(BUILTIN_CATALOG) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, "built-in catalog is invalid, running without content");
            ContentCatalog::new()
        }
    }
}

fn load_game_constants() -> GameConstants {
    let paths = ["battle_sim/content/constants.toml", "content/constants.toml"];
    paths
        .iter()
        .map(Path::new)
        .filter(|path| path.exists())
        .find_map(|path| match load_constants(path) {
            Ok(constants) => Some(constants),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid constants, using defaults");
                None
            }
        })
        .unwrap_or_default()
}

fn tier_for_floor(floor: u32, milestone_interval: u32) -> EnemyTier {
    if floor % milestone_interval.saturating_mul(2) == 0 {
        EnemyTier::Boss
    } else if floor % milestone_interval == 0 {
        EnemyTier::Elite
    } else {
        EnemyTier::Minion
    }
}

fn region_for_floor(floor: u32, milestone_interval: u32) -> (&'static str, Faction) {
    let index = (floor.saturating_sub(1) / milestone_interval) as usize % REGIONS.len();
    REGIONS[index]
}

fn print_stats(player: &Character, catalog: &ContentCatalog, run: &RunSnapshot) {
    let mut passives = PassiveManager::default();
    passives.initialize(&player.inventory, catalog, &run.permanent_stacks);
    let stats = player.scaled_stats(&passives.stat_modifiers());
    println!(
        "  {} lv{} | HP {:.0}/{:.0} | AD {:.0} AP {:.0} | Armor {:.0} MR {:.0} | gold {}",
        player.name,
        player.level,
        player.current_health,
        stats.health,
        stats.attack_damage,
        stats.ability_power,
        stats.armor,
        stats.magic_resist,
        run.gold
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
    let floors = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_FLOORS);

    let catalog = load_content();
    let constants = load_game_constants();
    let interval = constants.rewards.milestone_interval.max(1);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let key = RunKey::new("local", format!("seed-{seed}"));
    let mut store = InMemoryProfileStore::new();
    let (start_region, _) = region_for_floor(1, interval);
    let mut run = RunSnapshot::new(start_region);

    let mut player = Character::new_player("hero", "Hero", CharacterClass::Mage);
    player.abilities = vec![Ability {
        mana_cost: 10.0,
        ..Ability::bolt("arcane_bolt", "Arcane Bolt", 30.0, 0.7)
    }];
    player.add_item(&ItemId::from("dark_seal"), 1, &catalog);
    player.restore_full(&[]);
    run.capture(&player);
    store.set(&key, &run)?;

    println!("=== Run {key} ({} items, {} enemies) ===", catalog.items().count(), catalog.enemies().len());

    while run.floor <= floors {
        let floor = run.floor;
        let (region, faction) = region_for_floor(floor, interval);
        if region != run.region {
            run.enter_region(region);
        }

        let tier = tier_for_floor(floor, interval);
        let template = catalog.resolve_request(EnemyRequest::new(tier, Some(faction)), &mut rng);
        let enemy = spawn_enemy(&template, floor, &catalog);
        println!();
        println!("--- Floor {floor} [{region}]: {} ({tier:?}, lv{}) ---", enemy.name, enemy.level);
        print_stats(&player, &catalog, &run);

        let mut battle = Battle::start(player.clone(), enemy, &catalog, &run.permanent_stacks, constants.clone());
        battle.run_auto(Side::Player, MAX_TURNS, &mut rng);
        let final_stats = battle.scaled_stats(Side::Player);
        let summary = battle.finish();
        for line in &summary.log {
            println!("  {line}");
        }
        run.record_battle(&summary);
        player = summary.player.clone();

        match summary.winner {
            Some(Side::Player) => {}
            Some(Side::Enemy) => {
                println!("Hero fell on floor {floor} after {} turns.", summary.turns);
                break;
            }
            None => {
                println!("Stalemate on floor {floor} after {} turns, retreating.", summary.turns);
                break;
            }
        }

        let context = RewardContext::new(tier, summary.enemy.level, floor, &player, &final_stats)
            .with_reap_bonus(summary.bonus_gold);
        let mut flow = RewardFlow::new(context);
        flow.defeat()?;
        let reward = flow.compute(&catalog, &constants.rewards, &mut rng)?;
        let applied = flow.apply(&mut run)?;
        println!(
            "  Reward: {} gold, {} exp, loot {:?}",
            reward.gold_amount, reward.exp_amount, reward.loot_items
        );

        let mut passives = PassiveManager::default();
        passives.initialize(&player.inventory, &catalog, &run.permanent_stacks);
        player.experience = run.experience;
        if let Some(level_up) = applied.level_up {
            player.apply_level_ups(
                level_up.new_level,
                level_up.levels_gained,
                &constants.leveling,
                &passives.stat_modifiers(),
            );
            println!("  Level up! Now level {}", player.level);
        }
        for item in &reward.loot_items {
            player.add_item(item, 1, &catalog);
        }
        if reward.milestone_triggered {
            println!("  Milestone! Choices: {:?}", reward.milestone_choices);
            if let Some(pick) = reward.milestone_choices.first() {
                player.add_item(pick, 1, &catalog);
                println!("  Picked {pick}");
            }
        }

        passives.initialize(&player.inventory, &catalog, &run.permanent_stacks);
        player.restore_full(&passives.stat_modifiers());
        run.capture(&player);
        run.advance_floor();
        store.set(&key, &run)?;
    }

    let saved = store.get(&key)?.unwrap_or_default();
    println!();
    println!(
        "=== Saved run: floor {}, level {}, {} exp, {} gold, regions {:?} ===",
        saved.floor, saved.level, saved.experience, saved.gold, saved.visited_regions
    );
    for entry in &saved.inventory {
        println!("  {} x{}", entry.item_id, entry.quantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_floor() {
        assert_eq!(tier_for_floor(3, 5), EnemyTier::Minion);
        assert_eq!(tier_for_floor(5, 5), EnemyTier::Elite);
        assert_eq!(tier_for_floor(10, 5), EnemyTier::Boss);
    }

    #[test]
    fn test_huge_interval_does_not_overflow() {
        assert_eq!(tier_for_floor(7, u32::MAX), EnemyTier::Minion);
        assert_eq!(tier_for_floor(u32::MAX, u32::MAX), EnemyTier::Boss);
    }
}
