//! Mutable per-skill progress.
//!
//! A [`SkillState`] is owned by exactly one [`SkillEngine`] and mutated only
//! through it. Callers receive clones via `get_state()`.
//!
//! [`SkillEngine`]: crate::engine::SkillEngine
mod active;

use std::collections::BTreeMap;

pub use active::{ActionContext, ActiveAction, EquippedTool};

use crate::ids::ActionId;

/// Level, experience, counters, unlocks, and the in-flight action of a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillState {
    pub(crate) level: u32,
    pub(crate) experience: u64,
    pub(crate) experience_to_next: u64,
    pub(crate) total_experience: u64,
    pub(crate) actions_completed: u64,
    pub(crate) time_spent_ms: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) successes: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) failures: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) criticals: u64,
    /// Catalog order, appended as levels unlock more actions.
    pub(crate) unlocked_actions: Vec<ActionId>,
    pub(crate) active_action: Option<ActiveAction>,
    /// Skill-specific tallies written by behaviors (e.g. trees felled).
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) counters: BTreeMap<String, u64>,
}

impl SkillState {
    /// Level 1, zero experience, nothing unlocked yet.
    pub(crate) fn initial(experience_to_next: u64) -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next,
            total_experience: 0,
            actions_completed: 0,
            time_spent_ms: 0,
            successes: 0,
            failures: 0,
            criticals: 0,
            unlocked_actions: Vec::new(),
            active_action: None,
            counters: BTreeMap::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn experience_to_next(&self) -> u64 {
        self.experience_to_next
    }

    pub fn total_experience(&self) -> u64 {
        self.total_experience
    }

    pub fn actions_completed(&self) -> u64 {
        self.actions_completed
    }

    pub fn time_spent_ms(&self) -> u64 {
        self.time_spent_ms
    }

    pub fn unlocked_actions(&self) -> &[ActionId] {
        &self.unlocked_actions
    }

    pub fn is_unlocked(&self, action: &ActionId) -> bool {
        self.unlocked_actions.contains(action)
    }

    pub fn active_action(&self) -> Option<&ActiveAction> {
        self.active_action.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.active_action.is_some()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    pub fn statistics(&self) -> SkillStatistics {
        SkillStatistics {
            level: self.level,
            total_experience: self.total_experience,
            actions_completed: self.actions_completed,
            time_spent_ms: self.time_spent_ms,
            successes: self.successes,
            failures: self.failures,
            criticals: self.criticals,
        }
    }
}

/// Lifetime totals of a skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillStatistics {
    pub level: u32,
    pub total_experience: u64,
    pub actions_completed: u64,
    pub time_spent_ms: u64,
    pub successes: u64,
    pub failures: u64,
    pub criticals: u64,
}

impl SkillStatistics {
    /// Share of resolved attempts that succeeded, 0 before the first attempt.
    pub fn success_rate(&self) -> f64 {
        if self.actions_completed == 0 {
            0.0
        } else {
            self.successes as f64 / self.actions_completed as f64
        }
    }
}
