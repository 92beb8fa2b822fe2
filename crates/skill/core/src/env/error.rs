//! Collaborator availability errors.

use crate::error::{ErrorSeverity, SkillError};

/// A collaborator required by a lookup was not supplied in the [`SkillEnv`].
///
/// Requirement checks treat a missing collaborator as an unmet requirement;
/// this error only surfaces through the accessors on the environment.
///
/// [`SkillEnv`]: super::SkillEnv
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("EconomyOracle not available")]
    EconomyNotAvailable,

    #[error("InventoryOracle not available")]
    InventoryNotAvailable,

    #[error("QuestOracle not available")]
    QuestsNotAvailable,

    #[error("PlayerOracle not available")]
    PlayerNotAvailable,

    #[error("SkillLevels not available")]
    SkillLevelsNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl SkillError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Resolution cannot draw a single roll without randomness
            RngNotAvailable => ErrorSeverity::Fatal,
            EconomyNotAvailable | InventoryNotAvailable | QuestsNotAvailable
            | PlayerNotAvailable | SkillLevelsNotAvailable => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            EconomyNotAvailable => "ORACLE_ECONOMY_NOT_AVAILABLE",
            InventoryNotAvailable => "ORACLE_INVENTORY_NOT_AVAILABLE",
            QuestsNotAvailable => "ORACLE_QUESTS_NOT_AVAILABLE",
            PlayerNotAvailable => "ORACLE_PLAYER_NOT_AVAILABLE",
            SkillLevelsNotAvailable => "ORACLE_SKILL_LEVELS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
