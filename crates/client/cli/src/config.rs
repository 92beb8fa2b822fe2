//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::RuntimeConfig;

/// Configuration for a scripted idle session.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub seed: u64,
    pub tick_interval: Duration,
    /// Registry configuration TOML overriding the bundled one.
    pub config_path: Option<PathBuf>,
    /// Content directory replacing the bundled data.
    pub data_dir: Option<PathBuf>,
    /// How many trees the session chops.
    pub chops: u32,
    pub save_slot: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            tick_interval: Duration::from_millis(100),
            config_path: None,
            data_dir: None,
            chops: 5,
            save_slot: "cli".to_owned(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKILLS_SEED` - Session seed for every roll (default: 0x5EED)
    /// - `SKILLS_TICK_MS` - Resolution tick period in ms (default: 100)
    /// - `SKILLS_CONFIG` - Path to a registry config TOML (default: bundled)
    /// - `SKILLS_DATA_DIR` - Content directory with manifest and skills (default: bundled)
    /// - `SKILLS_CHOPS` - Number of chops in the scripted session (default: 5)
    /// - `SKILLS_SAVE_SLOT` - Slot written at the end of the session (default: cli)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("SKILLS_SEED") {
            config.seed = seed;
        }

        if let Some(tick_ms) = read_env::<u64>("SKILLS_TICK_MS") {
            config.tick_interval = Duration::from_millis(tick_ms.max(1));
        }

        config.config_path = env::var("SKILLS_CONFIG").ok().map(PathBuf::from);
        config.data_dir = env::var("SKILLS_DATA_DIR").ok().map(PathBuf::from);

        if let Some(chops) = read_env::<u32>("SKILLS_CHOPS") {
            config.chops = chops.max(1);
        }

        if let Ok(slot) = env::var("SKILLS_SAVE_SLOT")
            && !slot.trim().is_empty()
        {
            config.save_slot = slot;
        }

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            tick_interval: self.tick_interval,
            seed: self.seed,
            save_slot: self.save_slot.clone(),
            ..RuntimeConfig::default()
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
