//! Notifications emitted by engines and the registry.
//!
//! Nothing is broadcast from here. Engines append to an outbox that the
//! registry drains, and the registry's outbox is drained by the host through
//! `SkillRegistry::drain_events`.

use crate::engine::GrantedReward;
use crate::ids::{ActionId, SkillId};

/// One notification with the payload the host may render.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEvent {
    ActionStarted {
        skill_id: SkillId,
        action_id: ActionId,
        duration_ms: u64,
    },
    ActionCompleted {
        skill_id: SkillId,
        action_id: ActionId,
        rewards: Vec<GrantedReward>,
    },
    ActionFailed {
        skill_id: SkillId,
        action_id: ActionId,
        reason: String,
    },
    LevelUp {
        skill_id: SkillId,
        new_level: u32,
    },
    ActionUnlocked {
        skill_id: SkillId,
        action_id: ActionId,
    },
    SkillUnlocked {
        skill_id: SkillId,
    },
    ToolBroken {
        skill_id: SkillId,
        tool_id: String,
    },
}

impl SkillEvent {
    /// Topic string of the notification, e.g. `action:started`.
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::ActionStarted { .. } => "action:started",
            Self::ActionCompleted { .. } => "action:completed",
            Self::ActionFailed { .. } => "action:failed",
            Self::LevelUp { .. } => "skill:level_up",
            Self::ActionUnlocked { .. } => "skill:action_unlocked",
            Self::SkillUnlocked { .. } => "skill:unlocked",
            Self::ToolBroken { .. } => "tool:broken",
        }
    }

    pub fn skill_id(&self) -> &SkillId {
        match self {
            Self::ActionStarted { skill_id, .. }
            | Self::ActionCompleted { skill_id, .. }
            | Self::ActionFailed { skill_id, .. }
            | Self::LevelUp { skill_id, .. }
            | Self::ActionUnlocked { skill_id, .. }
            | Self::SkillUnlocked { skill_id }
            | Self::ToolBroken { skill_id, .. } => skill_id,
        }
    }
}

/// Notification from the host that may unlock skills.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostEvent {
    /// `player:level_up`
    PlayerLevelUp { level: u32 },
    /// `quest:completed`
    QuestCompleted { quest_id: String },
}

impl HostEvent {
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::PlayerLevelUp { .. } => "player:level_up",
            Self::QuestCompleted { .. } => "quest:completed",
        }
    }
}
