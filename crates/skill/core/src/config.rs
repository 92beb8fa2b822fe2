use crate::ids::SkillId;

/// Resolver constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillConfig {
    /// Multiplier applied to rewards and experience on a critical success.
    pub critical_multiplier: f64,
}

impl SkillConfig {
    // ===== success roll =====
    pub const BASE_SUCCESS: f64 = 0.5;
    pub const SUCCESS_PER_LEVEL: f64 = 0.01;
    pub const MAX_LEVEL_SUCCESS_BONUS: f64 = 0.4;
    pub const MIN_SUCCESS: f64 = 0.05;
    pub const MAX_SUCCESS: f64 = 0.95;

    // ===== critical roll =====
    pub const BASE_CRITICAL: f64 = 0.05;
    pub const CRITICAL_PER_LEVEL: f64 = 0.001;
    pub const MAX_CRITICAL: f64 = 0.25;

    // ===== duration =====
    /// Level scaling never shortens an action below this share of its base time.
    pub const MIN_DURATION_FACTOR: f64 = 0.1;

    // ===== overlevel experience penalty, in basis points =====
    pub const OVERLEVEL_PENALTY_PER_LEVEL_BP: u64 = 200;
    pub const MAX_OVERLEVEL_PENALTY_BP: u64 = 5_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRITICAL_MULTIPLIER: f64 = 2.0;

    pub fn new() -> Self {
        Self {
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
        }
    }

    pub fn with_critical_multiplier(critical_multiplier: f64) -> Self {
        Self {
            critical_multiplier,
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry-wide configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
    /// Preferred display and registration order of skills.
    ///
    /// Skills absent from this list are appended after it in registration order.
    pub unlock_order: Vec<SkillId>,

    /// Resolver parameters handed to every engine the registry owns.
    pub skill: SkillConfig,
}

impl RegistryConfig {
    pub fn new(unlock_order: impl IntoIterator<Item = impl Into<SkillId>>) -> Self {
        Self {
            unlock_order: unlock_order.into_iter().map(Into::into).collect(),
            skill: SkillConfig::default(),
        }
    }

    pub fn with_skill_config(mut self, skill: SkillConfig) -> Self {
        self.skill = skill;
        self
    }

    /// Position of `skill` in the configured unlock order, if listed.
    pub fn order_of(&self, skill: &SkillId) -> Option<usize> {
        self.unlock_order.iter().position(|id| id == skill)
    }
}
