//! Persisted form of a single engine.

use super::SnapshotError;
use crate::config::SkillConfig;
use crate::definition::SkillDefinition;
use crate::ids::SkillId;
use crate::state::SkillState;

/// Everything needed to restore a [`SkillEngine`](super::SkillEngine).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineSnapshot {
    pub skill_id: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: SkillConfig,
    pub state: SkillState,
    pub initialized: bool,
}

impl EngineSnapshot {
    /// Checks the snapshot against the definition it is about to be loaded into.
    ///
    /// `threshold` returns the experience needed to leave a given level.
    pub(crate) fn validate(
        &self,
        definition: &SkillDefinition,
        threshold: impl Fn(u32) -> u64,
    ) -> Result<(), SnapshotError> {
        if self.skill_id != definition.id {
            return Err(SnapshotError::SkillMismatch {
                expected: definition.id.clone(),
                found: self.skill_id.clone(),
            });
        }

        let level = self.state.level;
        if level == 0 || level > definition.max_level {
            return Err(SnapshotError::LevelOutOfRange {
                level,
                max_level: definition.max_level,
            });
        }

        if level < definition.max_level {
            let threshold = threshold(level);
            if self.state.experience >= threshold {
                return Err(SnapshotError::ExperienceOutOfRange {
                    level,
                    experience: self.state.experience,
                    threshold,
                });
            }
        }

        if let Some(active) = &self.state.active_action
            && definition.action(&active.action_id).is_none()
        {
            return Err(SnapshotError::UnknownAction(active.action_id.clone()));
        }

        Ok(())
    }
}
