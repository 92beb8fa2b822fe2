//! Skill manifest loader.
//!
//! The manifest lists which skill files to register, with which behavior,
//! and behind which unlock requirements.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skill_core::{ActionRequirement, SkillDetails};

use crate::behaviors::BehaviorKind;
use crate::loaders::{LoadResult, read_file};

/// One skill to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the skill RON file, relative to the data directory.
    pub file: String,
    #[serde(default)]
    pub behavior: BehaviorKind,
    /// Display data; defaults to the definition's name and description.
    #[serde(default)]
    pub details: Option<SkillDetails>,
    #[serde(default)]
    pub unlock_requirements: Vec<ActionRequirement>,
}

/// Manifest structure for RON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillManifest {
    pub skills: Vec<ManifestEntry>,
}

/// Loader for the skill manifest.
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn load(path: &Path) -> LoadResult<SkillManifest> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SkillManifest> {
        let manifest: SkillManifest = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill manifest RON: {}", e))?;

        Ok(manifest)
    }
}
