//! Runtime orchestrator wiring the session worker to its handle.
//!
//! [`RuntimeBuilder`] assembles the registry, host collaborators, and save
//! repository, then spawns the [`SessionWorker`](crate::workers::SessionWorker)
//! on the current tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use skill_content::ContentFactory;
use skill_core::{PcgRng, RngOracle, SkillRegistry};

use crate::api::{Result, RuntimeError, RuntimeEvent, RuntimeHandle};
use crate::host::LocalHost;
use crate::repository::{InMemorySaveRepository, SaveRepository};
use crate::workers::{Autosave, Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Period of the resolution tick.
    pub tick_interval: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Session seed mixed into every roll.
    pub seed: u64,
    pub starting_gold: u64,
    /// Slot used by autosave and by `resume`.
    pub save_slot: String,
    /// Periodic save into `save_slot`; also saves on shutdown when set.
    pub autosave_interval: Option<Duration>,
    /// Restore `save_slot` before the first tick.
    pub resume: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            command_buffer_size: 32,
            event_buffer_size: 100,
            seed: 0,
            starting_gold: 0,
            save_slot: "autosave".to_owned(),
            autosave_interval: None,
            resume: false,
        }
    }
}

/// Main runtime that owns the session worker.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Start a runtime over the bundled skill content.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        RuntimeBuilder::new().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.handle.subscribe()
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// With autosave configured the session is saved one last time.
    pub async fn shutdown(self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .handle
            .command_sender()
            .send(Command::Shutdown { reply: reply_tx })
            .await
            .is_ok()
        {
            // A dropped reply means the worker is already gone; join reports why.
            let _ = reply_rx.await;
        }
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`].
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    registry: Option<SkillRegistry>,
    repository: Option<Arc<dyn SaveRepository>>,
    rng: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a prepared registry instead of the bundled content.
    pub fn registry(mut self, registry: SkillRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Replace the default [`PcgRng`].
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            registry,
            repository,
            rng,
        } = self;

        let registry = match registry {
            Some(registry) => registry,
            None => ContentFactory::embedded()
                .build_registry()
                .map_err(RuntimeError::Content)?,
        };
        let repository = repository.unwrap_or_else(|| Arc::new(InMemorySaveRepository::new()));
        let rng = rng.unwrap_or_else(|| Arc::new(PcgRng));
        let host = LocalHost::new(rng, config.seed).with_gold(config.starting_gold);

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let (event_tx, _) = broadcast::channel(config.event_buffer_size.max(1));

        let autosave = config.autosave_interval.map(|interval| Autosave {
            interval,
            slot: config.save_slot.clone(),
        });
        let mut worker = SessionWorker::new(
            registry,
            host,
            repository,
            config.tick_interval,
            command_rx,
            event_tx.clone(),
        )
        .with_autosave(autosave);

        if config.resume {
            match worker.load(&config.save_slot)? {
                Some(report) if !report.is_complete() => {
                    warn!(slot = %config.save_slot, "save restored only partially");
                }
                Some(_) => info!(slot = %config.save_slot, "save restored"),
                None => info!(slot = %config.save_slot, "starting fresh"),
            }
        }

        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_tx),
            worker_handle,
        })
    }
}
