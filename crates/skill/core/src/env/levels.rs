use std::collections::BTreeMap;

use crate::ids::SkillId;

/// Cross-skill level lookup for `skill-level` requirements naming another skill.
pub trait SkillLevels: Send + Sync {
    /// Current level of `skill`, or `None` if the skill is unknown.
    fn level_of(&self, skill: &str) -> Option<u32>;
}

/// Owned snapshot of skill levels taken before an engine call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelTable {
    levels: BTreeMap<SkillId, u32>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill: SkillId, level: u32) {
        self.levels.insert(skill, level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(SkillId, u32)> for LevelTable {
    fn from_iter<T: IntoIterator<Item = (SkillId, u32)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

impl SkillLevels for LevelTable {
    fn level_of(&self, skill: &str) -> Option<u32> {
        self.levels.get(&SkillId::from(skill)).copied()
    }
}
