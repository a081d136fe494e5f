//! PassiveManager - Per-battle passive state for one character

use super::{PassiveBehavior, PassiveContext, PassiveId, PassiveRegistry, PassiveStacks, PassiveTrigger};
use crate::content::ContentCatalog;
use crate::stat_block::ActiveStatModifier;
use crate::types::{InventoryEntry, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One registered passive, in registration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveInstance {
    pub id: PassiveId,
    /// Item that granted the passive
    pub source_item: ItemId,
    /// Copies counted by additive passives (always 1 for unique ones)
    pub copies: u32,
}

/// Registry of a character's active passives and their stacks
///
/// Built from the inventory at battle start. Ephemeral stacks start at zero
/// every battle; persistent passives resume from the carried-over counts and
/// hand them back through [`PassiveManager::permanent_stacks`].
#[derive(Debug, Clone)]
pub struct PassiveManager {
    registry: PassiveRegistry,
    instances: Vec<PassiveInstance>,
    stacks: HashMap<PassiveId, u32>,
}

impl Default for PassiveManager {
    fn default() -> Self {
        Self::new(PassiveRegistry::standard())
    }
}

impl PassiveManager {
    pub fn new(registry: PassiveRegistry) -> Self {
        PassiveManager {
            registry,
            instances: Vec::new(),
            stacks: HashMap::new(),
        }
    }

    /// Rebuild the active passive set from an inventory
    ///
    /// Items that are missing from the catalog, grant no passive or grant an
    /// unregistered passive are skipped with a warning.
    pub fn initialize(
        &mut self,
        inventory: &[InventoryEntry],
        catalog: &ContentCatalog,
        permanent_stacks: &HashMap<PassiveId, u32>,
    ) {
        self.instances.clear();
        self.stacks.clear();

        for entry in inventory.iter().filter(|e| e.quantity > 0) {
            let Some(item) = catalog.item(&entry.item_id) else {
                warn!(item_id = %entry.item_id, "unknown item while loading passives");
                continue;
            };
            if let Some(id) = item.passive_id() {
                self.register(id, entry.item_id.clone(), entry.quantity);
            }
        }

        for instance in &self.instances {
            let Some(behavior) = self.registry.get(instance.id) else {
                continue;
            };
            let restored = if behavior.persists_between_battles {
                permanent_stacks.get(&instance.id).copied().unwrap_or(0)
            } else {
                0
            };
            let clamped = behavior.max_stacks.map_or(restored, |max| restored.min(max));
            self.stacks.insert(instance.id, clamped);
        }

        debug!(passives = self.instances.len(), "passives initialized");
    }

    /// Register a passive granted by `quantity` copies of an item
    ///
    /// Unique passives register once no matter how many items grant them.
    /// Returns false when the passive was not registered.
    pub fn register(&mut self, id: PassiveId, source_item: ItemId, quantity: u32) -> bool {
        let Some(behavior) = self.registry.get(id) else {
            warn!(passive = %id, "no behavior registered for passive, ignoring");
            return false;
        };
        if quantity == 0 {
            return false;
        }
        if !behavior.additive_per_copy && self.has(id) {
            return false;
        }
        let copies = if behavior.additive_per_copy { quantity } else { 1 };
        self.instances.push(PassiveInstance {
            id,
            source_item,
            copies,
        });
        self.stacks.entry(id).or_insert(0);
        true
    }

    pub fn has(&self, id: PassiveId) -> bool {
        self.instances.iter().any(|i| i.id == id)
    }

    pub fn instances(&self) -> &[PassiveInstance] {
        &self.instances
    }

    /// Distinct active passive ids in registration order
    pub fn active_ids(&self) -> Vec<PassiveId> {
        let mut ids = Vec::new();
        for instance in &self.instances {
            if !ids.contains(&instance.id) {
                ids.push(instance.id);
            }
        }
        ids
    }

    pub fn stacks(&self, id: PassiveId) -> u32 {
        self.stacks.get(&id).copied().unwrap_or(0)
    }

    /// Add stacks, clamping at the passive's maximum. Returns the new count.
    pub fn add_stacks(&mut self, id: PassiveId, amount: u32) -> u32 {
        let max = self.registry.get(id).and_then(|b| b.max_stacks);
        let mut view = PassiveStacks {
            ledger: &mut self.stacks,
            id,
            max,
            copies: 1,
        };
        view.add(amount)
    }

    /// Stat-calculation passives in registration order, ready for aggregation
    pub fn stat_modifiers(&self) -> Vec<ActiveStatModifier> {
        self.instances
            .iter()
            .filter_map(|instance| {
                let behavior = self.registry.get(instance.id)?;
                if !behavior.listens_to(PassiveTrigger::StatCalculation) {
                    return None;
                }
                let modifier = behavior.stat_modifier?;
                Some(ActiveStatModifier {
                    passive: instance.id,
                    modifier,
                    stacks: self.stacks(instance.id),
                    copies: instance.copies,
                })
            })
            .collect()
    }

    /// Notify every passive listening for `ctx.trigger`, in registration order
    ///
    /// Returns the number of hooks invoked.
    pub fn trigger(&mut self, ctx: &mut PassiveContext<'_>) -> usize {
        let mut fired = 0;
        for instance in &self.instances {
            let Some(behavior) = self.registry.get(instance.id) else {
                continue;
            };
            let Some(hook) = hooked(behavior, ctx.trigger) else {
                continue;
            };
            let mut view = PassiveStacks {
                ledger: &mut self.stacks,
                id: instance.id,
                max: behavior.max_stacks,
                copies: instance.copies,
            };
            hook(ctx, &mut view);
            fired += 1;
        }
        if fired > 0 {
            debug!(trigger = ?ctx.trigger, owner = ctx.owner_id, fired, "passives triggered");
        }
        fired
    }

    /// Stack counts of persistent passives, to be saved at a flush point
    pub fn permanent_stacks(&self) -> HashMap<PassiveId, u32> {
        self.active_ids()
            .into_iter()
            .filter(|id| {
                self.registry
                    .get(*id)
                    .is_some_and(|b| b.persists_between_battles)
            })
            .map(|id| (id, self.stacks(id)))
            .collect()
    }

    /// Merge this battle's persistent stacks into a run-wide map
    pub fn write_back(&self, carried: &mut HashMap<PassiveId, u32>) {
        for (id, count) in self.permanent_stacks() {
            carried.insert(id, count);
        }
    }
}

fn hooked(behavior: &PassiveBehavior, trigger: PassiveTrigger) -> Option<super::EventHookFn> {
    if behavior.listens_to(trigger) {
        behavior.on_event
    } else {
        None
    }
}
