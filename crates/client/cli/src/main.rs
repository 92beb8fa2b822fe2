//! Skill system client binary.
//!
//! Composition root that loads skill content, starts the runtime, and plays a
//! short scripted woodcutting session.
//!
//! ```bash
//! SKILLS_SEED=42 SKILLS_CHOPS=10 cargo run -p client-cli
//! ```
mod config;
mod session;

use anyhow::{Context, Result};
use runtime::Runtime;
use skill_content::{ConfigLoader, ContentFactory};
use skill_core::SkillRegistry;

use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = CliConfig::from_env();
    tracing::info!(seed = config.seed, chops = config.chops, "starting skill session");

    let registry = build_registry(&config)?;
    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .registry(registry)
        .build()
        .await?;

    let result = session::run(&runtime.handle(), &config).await;
    runtime.shutdown().await?;
    result
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(config: &CliConfig) -> Result<SkillRegistry> {
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::embedded(),
    };

    let registry_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => factory.load_config()?,
    };
    let manifest = factory.load_manifest()?;

    factory.build_registry_with(registry_config, &manifest)
}
