//! Failure reasons surfaced by the engine and registry.

use crate::error::{ErrorSeverity, SkillError};
use crate::ids::{ActionId, SkillId};

/// Why an action could not start or did not succeed.
///
/// The display strings are part of the notification contract
/// (`action:failed{reason}`) and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionFailure {
    #[error("Action not found")]
    NotFound,

    #[error("Action not unlocked")]
    NotUnlocked,

    #[error("Requirements not met")]
    RequirementsNotMet,

    #[error("Already performing an action")]
    AlreadyBusy,

    /// The success roll failed.
    #[error("Action failed")]
    Failed,

    /// No registered skill under the requested id.
    #[error("Skill not found")]
    SkillNotFound,

    /// The skill is registered but still locked.
    #[error("Skill is locked")]
    SkillLocked,
}

impl SkillError for ActionFailure {
    fn severity(&self) -> ErrorSeverity {
        use ActionFailure::*;
        match self {
            AlreadyBusy | Failed => ErrorSeverity::Recoverable,
            RequirementsNotMet | SkillLocked => ErrorSeverity::Recoverable,
            NotFound | NotUnlocked | SkillNotFound => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionFailure::*;
        match self {
            NotFound => "ACTION_NOT_FOUND",
            NotUnlocked => "ACTION_NOT_UNLOCKED",
            RequirementsNotMet => "ACTION_REQUIREMENTS_NOT_MET",
            AlreadyBusy => "ACTION_ALREADY_BUSY",
            Failed => "ACTION_FAILED",
            SkillNotFound => "ACTION_SKILL_NOT_FOUND",
            SkillLocked => "ACTION_SKILL_LOCKED",
        }
    }
}

/// A saved engine snapshot that cannot be restored.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot belongs to skill '{found}', expected '{expected}'")]
    SkillMismatch { expected: SkillId, found: SkillId },

    #[error("level {level} outside [1, {max_level}]")]
    LevelOutOfRange { level: u32, max_level: u32 },

    #[error("experience {experience} not below threshold {threshold} at level {level}")]
    ExperienceOutOfRange {
        level: u32,
        experience: u64,
        threshold: u64,
    },

    #[error("active action '{0}' is not in the catalog")]
    UnknownAction(ActionId),
}

impl SkillError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use SnapshotError::*;
        match self {
            SkillMismatch { .. } => "SNAPSHOT_SKILL_MISMATCH",
            LevelOutOfRange { .. } => "SNAPSHOT_LEVEL_OUT_OF_RANGE",
            ExperienceOutOfRange { .. } => "SNAPSHOT_EXPERIENCE_OUT_OF_RANGE",
            UnknownAction(_) => "SNAPSHOT_UNKNOWN_ACTION",
        }
    }
}
