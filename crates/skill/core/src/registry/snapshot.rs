use std::collections::BTreeMap;

use crate::engine::{EngineSnapshot, SnapshotError};
use crate::ids::SkillId;

/// Saved form of one registered skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSaveEntry {
    pub state: EngineSnapshot,
    pub is_unlocked: bool,
}

/// Saved form of the whole registry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistrySnapshot {
    pub skills: BTreeMap<SkillId, SkillSaveEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlock_order: Vec<SkillId>,
}

/// What `load_all_skills` did with each skill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Restored from the snapshot.
    pub loaded: Vec<SkillId>,
    /// Registered but absent from the snapshot; left at their current state.
    pub missing: Vec<SkillId>,
    /// Present in the snapshot but not registered; ignored.
    pub unknown: Vec<SkillId>,
    /// Present but inconsistent; reset to the initial state.
    pub rejected: Vec<(SkillId, SnapshotError)>,
}

impl LoadReport {
    /// True if every registered skill was restored.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.rejected.is_empty()
    }
}
