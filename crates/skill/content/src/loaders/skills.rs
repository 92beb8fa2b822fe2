//! Skill definition loader.

use std::path::Path;

use skill_core::SkillDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for one skill definition per RON file.
pub struct SkillLoader;

impl SkillLoader {
    /// Load a skill definition from a RON file.
    ///
    /// The definition is parsed but not validated; validation happens when
    /// the skill is registered.
    pub fn load(path: &Path) -> LoadResult<SkillDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill RON at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<SkillDefinition> {
        let definition: SkillDefinition = ron::from_str(content)?;
        Ok(definition)
    }
}
