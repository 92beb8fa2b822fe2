//! Runtime orchestration layer for the skill system.
//!
//! This crate wires `skill-core` into an async host:
//! - a session worker that owns the [`SkillRegistry`](skill_core::SkillRegistry)
//!   and drives it on a fixed tick
//! - a cloneable [`RuntimeHandle`] for commands and event subscriptions
//! - a save repository seam and the checksummed save codec
//!
//! Modules are organized by responsibility:
//! - [`api`]: public surface (handle, events, errors)
//! - [`host`]: in-process economy, inventory, quest and player collaborators
//! - [`repository`]: save slot storage
//! - [`codec`]: snapshot encoding
//! - [`workers`]: background tasks
pub mod api;
pub mod codec;
pub mod host;
pub mod repository;
pub mod runtime;
pub mod workers;

pub use api::{Result, RuntimeError, RuntimeEvent, RuntimeHandle, SkillSummary};
pub use codec::{CodecError, SaveCodec, SaveFile};
pub use host::LocalHost;
pub use repository::{InMemorySaveRepository, RepositoryError, SaveRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
