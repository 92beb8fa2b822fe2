//! Action catalog entries: requirements, rewards, and timing.

use crate::ids::{ActionId, SkillId};

/// What an [`ActionRequirement`] is checked against.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RequirementKind {
    /// Level of the skill named by `target`.
    SkillLevel,
    /// Overall player level.
    PlayerLevel,
    /// At least `amount` of item `target` in the inventory.
    Item,
    /// At least `amount` gold. Debited when an action starts.
    Gold,
    /// Quest `target` completed.
    Quest,
}

/// A precondition gating an action or a skill unlock.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequirement {
    pub kind: RequirementKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub amount: u64,
}

impl ActionRequirement {
    pub fn skill_level(skill: impl Into<String>, level: u32) -> Self {
        Self {
            kind: RequirementKind::SkillLevel,
            target: skill.into(),
            amount: level as u64,
        }
    }

    pub fn player_level(level: u32) -> Self {
        Self {
            kind: RequirementKind::PlayerLevel,
            target: String::new(),
            amount: level as u64,
        }
    }

    pub fn item(item: impl Into<String>, amount: u64) -> Self {
        Self {
            kind: RequirementKind::Item,
            target: item.into(),
            amount,
        }
    }

    pub fn gold(amount: u64) -> Self {
        Self {
            kind: RequirementKind::Gold,
            target: String::new(),
            amount,
        }
    }

    pub fn quest(quest: impl Into<String>) -> Self {
        Self {
            kind: RequirementKind::Quest,
            target: quest.into(),
            amount: 1,
        }
    }

    /// Returns the level threshold if this is a level requirement on `skill`.
    pub fn level_for(&self, skill: &SkillId) -> Option<u32> {
        (self.kind == RequirementKind::SkillLevel && skill == self.target.as_str())
            .then(|| u32::try_from(self.amount).unwrap_or(u32::MAX))
    }
}

/// What an [`ActionReward`] grants.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RewardKind {
    /// Experience for the skill named by `target`.
    Experience,
    /// Item `target`, handed back to the host.
    Item,
    /// Gold, credited through the economy collaborator.
    Gold,
}

/// A configured reward line of an action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReward {
    pub kind: RewardKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: String,
    pub amount: u64,
    /// Independent drop chance in `[0, 1]`. `None` always drops.
    #[cfg_attr(feature = "serde", serde(default))]
    pub drop_chance: Option<f64>,
}

impl ActionReward {
    pub fn experience(skill: impl Into<String>, amount: u64) -> Self {
        Self {
            kind: RewardKind::Experience,
            target: skill.into(),
            amount,
            drop_chance: None,
        }
    }

    pub fn item(item: impl Into<String>, amount: u64) -> Self {
        Self {
            kind: RewardKind::Item,
            target: item.into(),
            amount,
            drop_chance: None,
        }
    }

    pub fn gold(amount: u64) -> Self {
        Self {
            kind: RewardKind::Gold,
            target: String::new(),
            amount,
            drop_chance: None,
        }
    }

    #[must_use]
    pub fn with_drop_chance(mut self, chance: f64) -> Self {
        self.drop_chance = Some(chance);
        self
    }

    /// True for experience rewards aimed at `skill`.
    pub fn is_experience_for(&self, skill: &SkillId) -> bool {
        self.kind == RewardKind::Experience && skill == self.target.as_str()
    }
}

/// A timed, randomized task a skill can attempt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillAction {
    pub id: ActionId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: Vec<ActionRequirement>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: Vec<ActionReward>,
    /// Duration at level 1 before any modifier, in milliseconds.
    pub base_duration_ms: u64,
    /// Fractional speed-up gained per level above 1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub level_scaling: f64,
}

impl SkillAction {
    pub fn new(id: impl Into<ActionId>, name: impl Into<String>, base_duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            requirements: Vec::new(),
            rewards: Vec::new(),
            base_duration_ms,
            level_scaling: 0.0,
        }
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: ActionRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    #[must_use]
    pub fn with_reward(mut self, reward: ActionReward) -> Self {
        self.rewards.push(reward);
        self
    }

    #[must_use]
    pub fn with_level_scaling(mut self, level_scaling: f64) -> Self {
        self.level_scaling = level_scaling;
        self
    }

    /// Level of `skill` this action demands, 1 when it has no such gate.
    ///
    /// When several level requirements target the same skill the highest wins.
    pub fn required_level(&self, skill: &SkillId) -> u32 {
        self.requirements
            .iter()
            .filter_map(|req| req.level_for(skill))
            .max()
            .unwrap_or(1)
            .max(1)
    }
}
