//! Content factory for building a skill registry from data files.

use std::path::{Path, PathBuf};

use skill_core::{RegistryConfig, SkillDefinition, SkillDetails, SkillError, SkillRegistry};
use tracing::{debug, error};

use crate::loaders::{ConfigLoader, LoadResult, ManifestLoader, SkillLoader, SkillManifest, read_file};

/// Data files compiled into the crate.
const EMBEDDED: &[(&str, &str)] = &[
    ("config.toml", include_str!("../../data/config.toml")),
    ("manifest.ron", include_str!("../../data/manifest.ron")),
    ("skills/woodcutting.ron", include_str!("../../data/skills/woodcutting.ron")),
    ("skills/firemaking.ron", include_str!("../../data/skills/firemaking.ron")),
    ("skills/fletching.ron", include_str!("../../data/skills/fletching.ron")),
];

enum Source {
    Directory(PathBuf),
    Embedded,
}

/// Content factory that loads all skill content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── manifest.ron
/// └── skills/
///     ├── woodcutting.ron
///     └── firemaking.ron
/// ```
pub struct ContentFactory {
    source: Source,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Directory(data_dir.into()),
        }
    }

    /// Content bundled with this crate.
    pub fn embedded() -> Self {
        Self {
            source: Source::Embedded,
        }
    }

    /// Returns the data directory path, `None` for embedded content.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Directory(dir) => Some(dir.as_path()),
            Source::Embedded => None,
        }
    }

    fn read(&self, relative: &str) -> LoadResult<String> {
        match &self.source {
            Source::Directory(dir) => read_file(&dir.join(relative)),
            Source::Embedded => EMBEDDED
                .iter()
                .find(|(name, _)| *name == relative)
                .map(|(_, content)| (*content).to_owned())
                .ok_or_else(|| anyhow::anyhow!("No embedded content file {}", relative)),
        }
    }

    /// Load registry configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<RegistryConfig> {
        ConfigLoader::parse(&self.read("config.toml")?)
    }

    /// Load the skill list from `manifest.ron`.
    pub fn load_manifest(&self) -> LoadResult<SkillManifest> {
        ManifestLoader::parse(&self.read("manifest.ron")?)
    }

    /// Load one skill definition, e.g. `skills/woodcutting.ron`.
    pub fn load_skill(&self, file: &str) -> LoadResult<SkillDefinition> {
        SkillLoader::parse(&self.read(file)?)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill RON {}: {}", file, e))
    }

    /// Builds a registry with every manifest skill registered.
    ///
    /// A skill file that fails to parse, or a definition the registry
    /// rejects, is logged and skipped; the remaining skills still load.
    /// Missing configuration or manifest files are errors.
    pub fn build_registry(&self) -> LoadResult<SkillRegistry> {
        let config = self.load_config()?;
        let manifest = self.load_manifest()?;
        self.build_registry_with(config, &manifest)
    }

    /// Like [`build_registry`](Self::build_registry) with caller-supplied
    /// configuration.
    pub fn build_registry_with(
        &self,
        config: RegistryConfig,
        manifest: &SkillManifest,
    ) -> LoadResult<SkillRegistry> {
        let mut registry = SkillRegistry::new(config);

        for entry in &manifest.skills {
            let definition = match self.load_skill(&entry.file) {
                Ok(definition) => definition,
                Err(err) => {
                    error!(file = %entry.file, error = %err, "skipping unreadable skill");
                    continue;
                }
            };
            let details = entry
                .details
                .clone()
                .unwrap_or_else(|| SkillDetails::from_definition(&definition));
            let engine = entry.behavior.engine(definition);

            match registry.register_skill(engine, details, entry.unlock_requirements.clone()) {
                Ok(()) => debug!(file = %entry.file, "skill loaded"),
                Err(err) => error!(
                    file = %entry.file,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    error = %err,
                    "skill not registered"
                ),
            }
        }

        Ok(registry)
    }
}
