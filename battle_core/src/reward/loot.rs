//! Loot rolls - magic-find-weighted rarity and milestone offers

use crate::config::RewardConstants;
use crate::content::ContentCatalog;
use crate::types::{CharacterClass, EnemyTier, ItemId, Rarity};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Rarity weights after magic find
///
/// Each point of magic find adds `magic_find_bias` relative weight per rarity
/// step above common; negative magic find shrinks the higher rarities.
pub fn rarity_weights(magic_find: f64, constants: &RewardConstants) -> Vec<(Rarity, f64)> {
    let magic_find = if magic_find.is_finite() { magic_find } else { 0.0 };
    Rarity::all()
        .iter()
        .map(|&rarity| {
            let base = constants.rarity_weights.get(rarity).max(0.0);
            let bias = 1.0 + constants.magic_find_bias * magic_find * f64::from(rarity.step());
            (rarity, base * bias.max(0.0))
        })
        .collect()
}

/// Draw a rarity; all-zero weights fall back to common
pub fn roll_rarity(weights: &[(Rarity, f64)], rng: &mut impl Rng) -> Rarity {
    match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(_) => Rarity::Common,
    }
}

/// Roll one randomized drop for a defeated enemy
///
/// Legend-tier enemies never drop random loot. When no item of the rolled
/// rarity fits the class, the next lower rarity is tried.
pub fn roll_loot(
    tier: EnemyTier,
    class: CharacterClass,
    magic_find: f64,
    catalog: &ContentCatalog,
    constants: &RewardConstants,
    rng: &mut impl Rng,
) -> Option<ItemId> {
    if !tier.drops_random_loot() {
        return None;
    }
    let rolled = roll_rarity(&rarity_weights(magic_find, constants), rng);

    for &rarity in Rarity::all().iter().rev().filter(|r| **r <= rolled) {
        if let Some(item) = catalog.loot_pool(class, rarity).choose(rng) {
            debug!(item = %item.id, ?rolled, ?rarity, "loot rolled");
            return Some(item.id.clone());
        }
    }
    None
}

fn milestone_min_rarity(tier: EnemyTier) -> Rarity {
    match tier {
        EnemyTier::Minion | EnemyTier::Elite => Rarity::Uncommon,
        EnemyTier::Boss => Rarity::Rare,
        EnemyTier::Legend => Rarity::Epic,
    }
}

/// Up to `count` distinct items offered at a milestone floor
///
/// Drawn without replacement from items at or above the tier's rarity floor,
/// widening to every rarity when that pool is too small.
pub fn milestone_choices(
    tier: EnemyTier,
    class: CharacterClass,
    count: usize,
    catalog: &ContentCatalog,
    rng: &mut impl Rng,
) -> Vec<ItemId> {
    let mut pool = catalog.milestone_pool(class, milestone_min_rarity(tier));
    if pool.len() < count {
        pool = catalog.milestone_pool(class, Rarity::Common);
    }
    pool.choose_multiple(rng, count).map(|item| item.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ItemDefinition;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn item(id: &str, rarity: Rarity) -> ItemDefinition {
        ItemDefinition {
            id: ItemId::from(id),
            name: id.to_string(),
            rarity,
            stats: HashMap::new(),
            passive: None,
            classes: vec![],
            lootable: true,
        }
    }

    fn catalog() -> ContentCatalog {
        let mut catalog = ContentCatalog::new();
        catalog.add_item(item("dagger", Rarity::Common));
        catalog.add_item(item("cloth_armor", Rarity::Common));
        catalog.add_item(item("amplifying_tome", Rarity::Uncommon));
        catalog.add_item(item("kindlegem", Rarity::Rare));
        catalog.add_item(item("phage", Rarity::Rare));
        catalog.add_item(item("rabadons", Rarity::Legendary));
        catalog
    }

    #[test]
    fn test_magic_find_shifts_weights() {
        let constants = RewardConstants::default();
        let base = rarity_weights(0.0, &constants);
        let boosted = rarity_weights(100.0, &constants);

        assert!((base[0].1 - 60.0).abs() < 1e-9);
        assert!((boosted[0].1 - 60.0).abs() < 1e-9);
        // uncommon x2, legendary x5
        assert!((boosted[1].1 - 50.0).abs() < 1e-9);
        assert!((boosted[4].1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_magic_find_never_negative_weight() {
        let weights = rarity_weights(-1000.0, &RewardConstants::default());
        assert!(weights.iter().all(|(_, w)| *w >= 0.0));
        assert!((weights[0].1 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_common() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let weights: Vec<(Rarity, f64)> = Rarity::all().iter().map(|&r| (r, 0.0)).collect();
        assert_eq!(roll_rarity(&weights, &mut rng), Rarity::Common);
    }

    #[test]
    fn test_legend_tier_drops_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let constants = RewardConstants::default();
        for _ in 0..20 {
            let drop = roll_loot(EnemyTier::Legend, CharacterClass::Mage, 0.0, &catalog(), &constants, &mut rng);
            assert!(drop.is_none());
        }
    }

    #[test]
    fn test_loot_is_reproducible() {
        let constants = RewardConstants::default();
        let catalog = catalog();
        let roll = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..10)
                .map(|_| roll_loot(EnemyTier::Minion, CharacterClass::Mage, 50.0, &catalog, &constants, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(roll(9), roll(9));
        assert!(roll(9).iter().all(Option::is_some));
    }

    #[test]
    fn test_missing_rarity_falls_down_the_ladder() {
        let mut only_common = ContentCatalog::new();
        only_common.add_item(item("dagger", Rarity::Common));
        let mut constants = RewardConstants::default();
        constants.rarity_weights.common = 0.0;
        constants.rarity_weights.uncommon = 0.0;
        constants.rarity_weights.rare = 0.0;
        constants.rarity_weights.epic = 0.0;

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let drop = roll_loot(EnemyTier::Boss, CharacterClass::Tank, 0.0, &only_common, &constants, &mut rng);
        assert_eq!(drop, Some(ItemId::from("dagger")));
    }

    #[test]
    fn test_milestone_choices_are_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let choices = milestone_choices(EnemyTier::Minion, CharacterClass::Mage, 3, &catalog(), &mut rng);
        assert_eq!(choices.len(), 3);
        let unique: HashSet<&ItemId> = choices.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_milestone_widens_small_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // Boss floor wants rare+, only three exist
        let choices = milestone_choices(EnemyTier::Boss, CharacterClass::Mage, 3, &catalog(), &mut rng);
        assert_eq!(choices.len(), 3);
        let choices = milestone_choices(EnemyTier::Legend, CharacterClass::Mage, 3, &catalog(), &mut rng);
        assert_eq!(choices.len(), 3);
    }
}
