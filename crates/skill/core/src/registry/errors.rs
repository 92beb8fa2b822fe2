use crate::definition::DefinitionError;
use crate::error::{ErrorSeverity, SkillError};
use crate::ids::SkillId;

/// Errors raised while registering or addressing skills.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("skill '{0}' is already registered")]
    Duplicate(SkillId),

    #[error("invalid skill definition: {0}")]
    InvalidDefinition(#[from] DefinitionError),

    #[error("skill '{0}' is not registered")]
    UnknownSkill(SkillId),
}

impl SkillError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Duplicate(_) | Self::UnknownSkill(_) => ErrorSeverity::Validation,
            Self::InvalidDefinition(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "REGISTRY_DUPLICATE_SKILL",
            Self::InvalidDefinition(error) => error.error_code(),
            Self::UnknownSkill(_) => "REGISTRY_UNKNOWN_SKILL",
        }
    }
}
