//! Static skill configuration.
//!
//! A [`SkillDefinition`] is immutable once an engine is built from it. It is
//! validated when a skill is registered; malformed definitions never reach an
//! engine.
mod action;
mod curve;

use std::collections::HashSet;

pub use action::{
    ActionRequirement, ActionReward, RequirementKind, RewardKind, SkillAction,
};
pub use curve::{CurveKind, LevelingCurve, exponential_requirement};

use crate::error::{ErrorSeverity, SkillError};
use crate::ids::{ActionId, SkillId};

/// Identity, leveling curve, and action catalog of one skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default = "SkillDefinition::default_max_level"))]
    pub max_level: u32,
    pub curve: LevelingCurve,
    pub actions: Vec<SkillAction>,
}

impl SkillDefinition {
    pub const DEFAULT_MAX_LEVEL: u32 = 99;

    #[cfg(feature = "serde")]
    fn default_max_level() -> u32 {
        Self::DEFAULT_MAX_LEVEL
    }

    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, curve: LevelingCurve) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            max_level: Self::DEFAULT_MAX_LEVEL,
            curve,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: SkillAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn action(&self, id: &ActionId) -> Option<&SkillAction> {
        self.actions.iter().find(|action| &action.id == id)
    }

    /// Checks the structural rules every definition must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.is_empty() {
            return Err(DefinitionError::MissingId);
        }
        if self.max_level == 0 {
            return Err(DefinitionError::InvalidMaxLevel(self.id.clone()));
        }
        if self.curve.base_experience == 0 {
            return Err(DefinitionError::InvalidCurve {
                skill: self.id.clone(),
                reason: "base experience must be positive",
            });
        }
        if self.curve.kind != CurveKind::Linear
            && !(self.curve.multiplier.is_finite() && self.curve.multiplier >= 1.0)
        {
            return Err(DefinitionError::InvalidCurve {
                skill: self.id.clone(),
                reason: "multiplier must be a finite value of at least 1.0",
            });
        }
        if self.actions.is_empty() {
            return Err(DefinitionError::EmptyCatalog(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for action in &self.actions {
            if action.id.is_empty() {
                return Err(DefinitionError::MissingActionId(self.id.clone()));
            }
            if !seen.insert(&action.id) {
                return Err(DefinitionError::DuplicateAction {
                    skill: self.id.clone(),
                    action: action.id.clone(),
                });
            }
            if action.base_duration_ms == 0 {
                return Err(DefinitionError::InvalidAction {
                    action: action.id.clone(),
                    reason: "base duration must be positive",
                });
            }
            if !(action.level_scaling.is_finite() && action.level_scaling >= 0.0) {
                return Err(DefinitionError::InvalidAction {
                    action: action.id.clone(),
                    reason: "level scaling must be a non-negative finite value",
                });
            }
            let bad_drop = action.rewards.iter().any(|reward| {
                reward
                    .drop_chance
                    .is_some_and(|chance| !(0.0..=1.0).contains(&chance))
            });
            if bad_drop {
                return Err(DefinitionError::InvalidAction {
                    action: action.id.clone(),
                    reason: "drop chance must lie in [0, 1]",
                });
            }
        }

        Ok(())
    }
}

/// A malformed [`SkillDefinition`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("skill definition is missing an id")]
    MissingId,

    #[error("skill '{0}' must allow at least level 1")]
    InvalidMaxLevel(SkillId),

    #[error("skill '{skill}' has an invalid leveling curve: {reason}")]
    InvalidCurve {
        skill: SkillId,
        reason: &'static str,
    },

    #[error("skill '{0}' has an empty action catalog")]
    EmptyCatalog(SkillId),

    #[error("skill '{0}' contains an action without an id")]
    MissingActionId(SkillId),

    #[error("skill '{skill}' defines action '{action}' more than once")]
    DuplicateAction { skill: SkillId, action: ActionId },

    #[error("action '{action}' is invalid: {reason}")]
    InvalidAction {
        action: ActionId,
        reason: &'static str,
    },
}

impl SkillError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use DefinitionError::*;
        match self {
            MissingId => "DEFINITION_MISSING_ID",
            InvalidMaxLevel(_) => "DEFINITION_INVALID_MAX_LEVEL",
            InvalidCurve { .. } => "DEFINITION_INVALID_CURVE",
            EmptyCatalog(_) => "DEFINITION_EMPTY_CATALOG",
            MissingActionId(_) => "DEFINITION_MISSING_ACTION_ID",
            DuplicateAction { .. } => "DEFINITION_DUPLICATE_ACTION",
            InvalidAction { .. } => "DEFINITION_INVALID_ACTION",
        }
    }
}
