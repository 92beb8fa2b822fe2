//! Error types surfaced by the runtime API.

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use skill_core::{ActionFailure, RegistryError};

use crate::codec::CodecError;
use crate::repository::RepositoryError;

/// Result alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the runtime orchestrator and its workers.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("command channel closed")]
    CommandChannelClosed,

    #[error("reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker task failed")]
    WorkerJoin(#[source] JoinError),

    #[error("action rejected: {0}")]
    Action(#[from] ActionFailure),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Skill content could not be read while building the default registry.
    #[error(transparent)]
    Content(anyhow::Error),
}
