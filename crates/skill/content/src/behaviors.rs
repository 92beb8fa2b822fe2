//! Mapping from data-file behavior names to [`SkillBehavior`] implementations.

use std::sync::Arc;

use skill_core::{SkillBehavior, SkillDefinition, SkillEngine, StandardBehavior};

use crate::woodcutting::WoodcuttingBehavior;

/// Behavior a skill is built with, as named in the manifest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorKind {
    #[default]
    Standard,
    Woodcutting,
}

impl BehaviorKind {
    pub fn instantiate(self) -> Arc<dyn SkillBehavior> {
        match self {
            Self::Standard => Arc::new(StandardBehavior),
            Self::Woodcutting => Arc::new(WoodcuttingBehavior),
        }
    }

    /// Engine for `definition` driven by this behavior.
    pub fn engine(self, definition: SkillDefinition) -> SkillEngine {
        SkillEngine::new(definition, self.instantiate())
    }
}
