use crate::definition::{ActionRequirement, SkillDefinition};
use crate::engine::SkillEngine;
use crate::ids::SkillId;

/// Presentation data the host shows next to a skill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDetails {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
}

impl SkillDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name and description taken from the definition.
    pub fn from_definition(definition: &SkillDefinition) -> Self {
        Self::new(definition.name.clone()).with_description(definition.description.clone())
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A registered skill: its engine plus registry-owned bookkeeping.
#[derive(Debug)]
pub struct SkillRegistration {
    pub(super) engine: SkillEngine,
    pub(super) details: SkillDetails,
    pub(super) is_unlocked: bool,
    pub(super) unlock_requirements: Vec<ActionRequirement>,
    /// Sort key: index in the configured unlock order, or past its end.
    pub(super) position: usize,
}

impl SkillRegistration {
    pub fn id(&self) -> &SkillId {
        self.engine.id()
    }

    pub fn engine(&self) -> &SkillEngine {
        &self.engine
    }

    pub fn details(&self) -> &SkillDetails {
        &self.details
    }

    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    pub fn unlock_requirements(&self) -> &[ActionRequirement] {
        &self.unlock_requirements
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn level(&self) -> u32 {
        self.engine.level()
    }
}
