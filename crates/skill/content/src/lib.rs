//! Concrete skills and data loaders.
//!
//! This crate houses the skill behaviors and the RON/TOML data they are built
//! from:
//! - Woodcutting behavior (tool speed, bonus logs, durability)
//! - Skill catalogs (data-driven via RON)
//! - Skill manifest with unlock gates (data-driven via RON)
//! - Registry configuration (data-driven via TOML)
//!
//! All loaders use skill-core types directly with serde for deserialization.

pub mod behaviors;
pub mod woodcutting;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use behaviors::BehaviorKind;
pub use woodcutting::{WOODCUTTING, WoodcuttingBehavior};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, ManifestEntry, ManifestLoader, SkillLoader,
    SkillManifest,
};
