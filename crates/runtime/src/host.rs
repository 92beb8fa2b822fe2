//! In-process collaborators backing the session worker.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use skill_core::{
    EconomyOracle, GrantedReward, HostEvent, InventoryOracle, PlayerOracle, QuestOracle,
    RewardKind, RngOracle, SkillEnv,
};

/// Gold, inventory, quest log and player level of a single local player.
///
/// All state sits behind interior mutability so a shared borrow can be lent
/// to the skill engines through a [`SkillEnv`].
pub struct LocalHost {
    gold: AtomicU64,
    items: RwLock<BTreeMap<String, u64>>,
    quests: RwLock<BTreeSet<String>>,
    player_level: AtomicU32,
    rng: Arc<dyn RngOracle>,
    seed: u64,
}

impl LocalHost {
    pub fn new(rng: Arc<dyn RngOracle>, seed: u64) -> Self {
        Self {
            gold: AtomicU64::new(0),
            items: RwLock::new(BTreeMap::new()),
            quests: RwLock::new(BTreeSet::new()),
            player_level: AtomicU32::new(1),
            rng,
            seed,
        }
    }

    #[must_use]
    pub fn with_gold(self, gold: u64) -> Self {
        self.gold.store(gold, Ordering::SeqCst);
        self
    }

    /// Environment lending every collaborator of this host.
    pub fn env(&self) -> SkillEnv<'_> {
        SkillEnv::with_rng(self.rng.as_ref())
            .economy(self)
            .inventory(self)
            .quests(self)
            .player(self)
            .seed(self.seed)
    }

    pub fn gold(&self) -> u64 {
        self.gold.load(Ordering::SeqCst)
    }

    pub fn item_count(&self, item: &str) -> u64 {
        self.items
            .read()
            .map(|items| items.get(item).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn give_item(&self, item: &str, amount: u64) {
        if amount == 0 {
            return;
        }
        match self.items.write() {
            Ok(mut items) => {
                let held = items.entry(item.to_owned()).or_insert(0);
                *held = held.saturating_add(amount);
            }
            Err(_) => tracing::warn!(item, amount, "inventory lock poisoned; item dropped"),
        }
    }

    /// Adds the item rewards of a resolved action to the inventory.
    ///
    /// Gold was already credited through [`EconomyOracle::add_gold`] and
    /// experience through the registry.
    pub fn receive_rewards(&self, rewards: &[GrantedReward]) {
        for reward in rewards.iter().filter(|reward| reward.kind == RewardKind::Item) {
            self.give_item(&reward.target, reward.amount);
        }
    }

    /// Records the host-side effect of an event before skills re-evaluate it.
    pub fn apply(&self, event: &HostEvent) {
        match event {
            HostEvent::PlayerLevelUp { level } => {
                self.player_level.fetch_max(*level, Ordering::SeqCst);
            }
            HostEvent::QuestCompleted { quest_id } => match self.quests.write() {
                Ok(mut quests) => {
                    quests.insert(quest_id.clone());
                }
                Err(_) => tracing::warn!(quest_id = %quest_id, "quest log lock poisoned"),
            },
        }
    }
}

impl EconomyOracle for LocalHost {
    fn has_gold(&self, amount: u64) -> bool {
        self.gold() >= amount
    }

    fn remove_gold(&self, amount: u64) -> bool {
        self.gold
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |balance| {
                balance.checked_sub(amount)
            })
            .is_ok()
    }

    fn add_gold(&self, amount: u64) {
        // Saturate instead of wrapping on overflow.
        let _ = self
            .gold
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |balance| {
                Some(balance.saturating_add(amount))
            });
    }
}

impl InventoryOracle for LocalHost {
    fn has_item(&self, item: &str, amount: u64) -> bool {
        self.item_count(item) >= amount
    }
}

impl QuestOracle for LocalHost {
    fn has_completed_quest(&self, quest: &str) -> bool {
        self.quests
            .read()
            .is_ok_and(|quests| quests.contains(quest))
    }
}

impl PlayerOracle for LocalHost {
    fn player_level(&self) -> u32 {
        self.player_level.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHost")
            .field("gold", &self.gold())
            .field("items", &self.items)
            .field("quests", &self.quests)
            .field("player_level", &self.player_level())
            .field("seed", &self.seed)
            .finish()
    }
}
