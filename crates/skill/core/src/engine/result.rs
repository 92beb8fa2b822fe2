//! Values returned from starting and resolving actions.
use std::collections::BTreeMap;

use super::ActionFailure;
use crate::definition::RewardKind;
use crate::ids::{ActionId, SkillId, Timestamp};

/// Reward actually granted by a resolution, after drops, criticals and hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantedReward {
    pub kind: RewardKind,
    pub target: String,
    pub amount: u64,
}

/// Confirmation that an action was parked as the engine's active action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionStarted {
    pub skill_id: SkillId,
    pub action_id: ActionId,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
    pub duration_ms: u64,
}

/// Outcome of one resolved attempt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub skill_id: SkillId,
    pub action_id: ActionId,
    pub success: bool,
    pub failure: Option<ActionFailure>,
    pub rewards: Vec<GrantedReward>,
    /// Experience granted to the acting skill, keyed by skill id.
    pub experience: BTreeMap<SkillId, u64>,
    /// Multiplier applied when the attempt was critical.
    pub crit_bonus: Option<f64>,
    pub duration_ms: u64,
    pub resolved_at: Timestamp,
}

impl ActionResult {
    pub(crate) fn failed(
        skill_id: SkillId,
        action_id: ActionId,
        failure: ActionFailure,
        duration_ms: u64,
        resolved_at: Timestamp,
    ) -> Self {
        Self {
            skill_id,
            action_id,
            success: false,
            failure: Some(failure),
            rewards: Vec::new(),
            experience: BTreeMap::new(),
            crit_bonus: None,
            duration_ms,
            resolved_at,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.crit_bonus.is_some()
    }

    /// Experience this attempt granted to `skill`.
    pub fn experience_for(&self, skill: &SkillId) -> u64 {
        self.experience.get(skill).copied().unwrap_or(0)
    }

    /// Total granted amount of item `item`.
    pub fn item_amount(&self, item: &str) -> u64 {
        self.rewards
            .iter()
            .filter(|reward| reward.kind == RewardKind::Item && reward.target == item)
            .map(|reward| reward.amount)
            .sum()
    }

    /// Total gold granted.
    pub fn gold(&self) -> u64 {
        self.rewards
            .iter()
            .filter(|reward| reward.kind == RewardKind::Gold)
            .map(|reward| reward.amount)
            .sum()
    }
}
