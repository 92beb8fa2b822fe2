//! Registry configuration loader.

use std::path::Path;

use skill_core::RegistryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for registry configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing RegistryConfig
    pub fn load(path: &Path) -> LoadResult<RegistryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RegistryConfig> {
        let config: RegistryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
