//! Skill progression and action resolution.
//!
//! Each skill is a [`SkillEngine`]: a declarative [`SkillDefinition`] plus a
//! [`SkillBehavior`] strategy and the mutable [`SkillState`] it owns. Actions
//! are parked by `perform_action` and resolved on the tick where their end
//! time is reached. A [`SkillRegistry`] owns every engine, orders them, gates
//! them behind unlock requirements, and aggregates their progress.
//!
//! The crate performs no I/O and reads no clock. Time arrives as a
//! [`Timestamp`] argument, randomness through the [`RngOracle`] in the
//! [`SkillEnv`], and notifications leave through outboxes the host drains.
pub mod config;
pub mod definition;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod ids;
pub mod registry;
pub mod state;

pub use config::{RegistryConfig, SkillConfig};
pub use definition::{
    ActionRequirement, ActionReward, CurveKind, DefinitionError, LevelingCurve, RequirementKind,
    RewardKind, SkillAction, SkillDefinition,
};
pub use engine::{
    ActionEffects, ActionFailure, ActionResult, ActionScope, ActionStarted, EngineSnapshot,
    GrantedReward, SkillBehavior, SkillEngine, SnapshotError, StandardBehavior,
};
pub use env::{
    EconomyOracle, InventoryOracle, LevelTable, OracleError, PcgRng, PlayerOracle, QuestOracle,
    RngOracle, ScriptedRng, SkillEnv, SkillLevels,
};
pub use error::{ErrorSeverity, SkillError};
pub use event::{HostEvent, SkillEvent};
pub use ids::{ActionId, SkillId, Timestamp};
pub use registry::{
    LoadReport, RegistryError, RegistrySnapshot, SkillDetails, SkillRegistration, SkillRegistry,
    SkillSaveEntry,
};
pub use state::{ActionContext, ActiveAction, EquippedTool, SkillState, SkillStatistics};
