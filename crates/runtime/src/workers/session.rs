//! Session worker that owns the skill registry.
//!
//! Receives commands from clients, resolves due actions on a fixed tick, and
//! broadcasts everything the registry reports.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use skill_core::{
    ActionContext, ActionFailure, ActionId, ActionStarted, HostEvent, LoadReport, RegistryError,
    SkillError, SkillId, SkillRegistry,
};

use super::clock::SessionClock;
use crate::api::{Result, RuntimeEvent, SkillSummary};
use crate::codec::{SaveCodec, SaveFile};
use crate::host::LocalHost;
use crate::repository::SaveRepository;

/// Commands that can be sent to the session worker.
pub enum Command {
    PerformAction {
        skill_id: SkillId,
        action_id: ActionId,
        context: ActionContext,
        reply: oneshot::Sender<std::result::Result<ActionStarted, ActionFailure>>,
    },
    UnlockSkill {
        skill_id: SkillId,
        reply: oneshot::Sender<bool>,
    },
    Notify {
        event: HostEvent,
        reply: oneshot::Sender<Vec<SkillId>>,
    },
    GrantExperience {
        skill_id: SkillId,
        amount: u64,
        reply: oneshot::Sender<std::result::Result<u32, RegistryError>>,
    },
    GiveItem {
        item: String,
        amount: u64,
        reply: oneshot::Sender<()>,
    },
    ItemCount {
        item: String,
        reply: oneshot::Sender<u64>,
    },
    Gold {
        reply: oneshot::Sender<u64>,
    },
    QuerySkill {
        skill_id: SkillId,
        reply: oneshot::Sender<Option<SkillSummary>>,
    },
    ListSkills {
        reply: oneshot::Sender<Vec<SkillSummary>>,
    },
    Save {
        slot: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Load {
        slot: String,
        reply: oneshot::Sender<Result<Option<LoadReport>>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Autosave period and the slot it writes to.
#[derive(Clone, Debug)]
pub struct Autosave {
    pub interval: Duration,
    pub slot: String,
}

/// Background worker that owns the registry and host state.
pub struct SessionWorker {
    registry: SkillRegistry,
    host: LocalHost,
    repository: Arc<dyn SaveRepository>,
    clock: SessionClock,
    tick_interval: Duration,
    autosave: Option<Autosave>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<RuntimeEvent>,
}

impl SessionWorker {
    pub fn new(
        registry: SkillRegistry,
        host: LocalHost,
        repository: Arc<dyn SaveRepository>,
        tick_interval: Duration,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            registry,
            host,
            repository,
            clock: SessionClock::start(),
            tick_interval,
            autosave: None,
            command_rx,
            event_tx,
        }
    }

    #[must_use]
    pub fn with_autosave(mut self, autosave: Option<Autosave>) -> Self {
        self.autosave = autosave;
        self
    }

    /// Runs the worker until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut autosave_timer = self.autosave.as_ref().map(|autosave| {
            let first = time::Instant::now() + autosave.interval;
            let mut timer = time::interval_at(first, autosave.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });

        info!(
            skills = self.registry.len(),
            tick_ms = self.tick_interval.as_millis() as u64,
            "session worker started"
        );

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        self.autosave_now();
                        if reply.send(()).is_err() {
                            debug!("Shutdown reply channel closed");
                        }
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        self.autosave_now();
                        break;
                    }
                },
                _ = ticker.tick() => self.tick(),
                _ = next_autosave(&mut autosave_timer) => self.autosave_now(),
            }
        }

        info!("session worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::PerformAction {
                skill_id,
                action_id,
                context,
                reply,
            } => {
                let now = self.clock.now();
                let env = self.host.env();
                let result = self
                    .registry
                    .perform_action(&skill_id, &action_id, context, &env, now);
                if let Err(failure) = &result {
                    debug!(
                        skill = %skill_id,
                        action = %action_id,
                        code = failure.error_code(),
                        %failure,
                        "action rejected"
                    );
                }
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("PerformAction reply channel closed");
                }
            }
            Command::UnlockSkill { skill_id, reply } => {
                let env = self.host.env();
                let unlocked = self.registry.unlock_skill(&skill_id, &env);
                self.publish_pending();
                if reply.send(unlocked).is_err() {
                    debug!("UnlockSkill reply channel closed");
                }
            }
            Command::Notify { event, reply } => {
                self.host.apply(&event);
                let env = self.host.env();
                let unlocked = self.registry.handle_host_event(&event, &env);
                debug!(topic = event.topic(), unlocked = unlocked.len(), "host event handled");
                self.publish_pending();
                if reply.send(unlocked).is_err() {
                    debug!("Notify reply channel closed");
                }
            }
            Command::GrantExperience {
                skill_id,
                amount,
                reply,
            } => {
                let result = self.registry.grant_experience(&skill_id, amount);
                if result.is_ok() {
                    // Levels moved; locked skills may now qualify.
                    let env = self.host.env();
                    self.registry.unlock_ready(&env);
                }
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("GrantExperience reply channel closed");
                }
            }
            Command::GiveItem {
                item,
                amount,
                reply,
            } => {
                self.host.give_item(&item, amount);
                if reply.send(()).is_err() {
                    debug!("GiveItem reply channel closed");
                }
            }
            Command::ItemCount { item, reply } => {
                if reply.send(self.host.item_count(&item)).is_err() {
                    debug!("ItemCount reply channel closed");
                }
            }
            Command::Gold { reply } => {
                if reply.send(self.host.gold()).is_err() {
                    debug!("Gold reply channel closed");
                }
            }
            Command::QuerySkill { skill_id, reply } => {
                let now = self.clock.now();
                let summary = self
                    .registry
                    .get(&skill_id)
                    .map(|skill| SkillSummary::from_registration(skill, now));
                if reply.send(summary).is_err() {
                    debug!("QuerySkill reply channel closed");
                }
            }
            Command::ListSkills { reply } => {
                let now = self.clock.now();
                let summaries = self
                    .registry
                    .skills()
                    .map(|skill| SkillSummary::from_registration(skill, now))
                    .collect();
                if reply.send(summaries).is_err() {
                    debug!("ListSkills reply channel closed");
                }
            }
            Command::Save { slot, reply } => {
                let result = self.save(&slot);
                if reply.send(result).is_err() {
                    debug!("Save reply channel closed");
                }
            }
            Command::Load { slot, reply } => {
                let result = self.load(&slot);
                if reply.send(result).is_err() {
                    debug!("Load reply channel closed");
                }
            }
            Command::Shutdown { reply } => {
                // Intercepted by `run`.
                if reply.send(()).is_err() {
                    debug!("Shutdown reply channel closed");
                }
            }
        }
    }

    /// Resolves every due action and hands item rewards to the host.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let env = self.host.env();
        let results = self.registry.tick(now, &env);

        for result in results.iter().filter(|result| result.success) {
            self.host.receive_rewards(&result.rewards);
        }

        self.publish_pending();
        for result in results {
            self.publish(RuntimeEvent::ActionResolved(result));
        }
    }

    /// Encodes the registry and stores it under `slot`.
    pub fn save(&mut self, slot: &str) -> Result<()> {
        let file = SaveFile {
            saved_at: self.clock.now(),
            snapshot: self.registry.save_all_skills(),
        };
        let blob = SaveCodec::encode(&file)?;
        self.repository.save(slot, &blob)?;

        info!(slot, bytes = blob.len(), at = %file.saved_at, "session saved");
        self.publish(RuntimeEvent::Saved {
            slot: slot.to_owned(),
            at: file.saved_at,
        });
        Ok(())
    }

    /// Restores the registry from `slot`.
    ///
    /// An empty slot or a blob that fails to decode leaves the session as it
    /// is and yields `Ok(None)`. Repository failures are errors.
    pub fn load(&mut self, slot: &str) -> Result<Option<LoadReport>> {
        let Some(blob) = self.repository.load(slot)? else {
            warn!(slot, "no save in slot; keeping current progress");
            return Ok(None);
        };

        let file = match SaveCodec::decode(&blob) {
            Ok(file) => file,
            Err(err) => {
                warn!(slot, error = %err, "save rejected; keeping current progress");
                return Ok(None);
            }
        };

        self.clock.advance_to(file.saved_at);
        let report = self.registry.load_all_skills(file.snapshot);
        for (skill, err) in &report.rejected {
            warn!(slot, skill = %skill, error = %err, "skill progress reset");
        }
        info!(
            slot,
            loaded = report.loaded.len(),
            missing = report.missing.len(),
            rejected = report.rejected.len(),
            "session loaded"
        );

        self.publish_pending();
        self.publish(RuntimeEvent::Loaded {
            slot: slot.to_owned(),
            report: report.clone(),
        });
        Ok(Some(report))
    }

    fn autosave_now(&mut self) {
        let Some(slot) = self.autosave.as_ref().map(|autosave| autosave.slot.clone()) else {
            return;
        };
        if let Err(err) = self.save(&slot) {
            warn!(slot, error = %err, "autosave failed");
        }
    }

    fn publish_pending(&mut self) {
        for event in self.registry.drain_events() {
            self.publish(RuntimeEvent::Skill(event));
        }
    }

    fn publish(&self, event: RuntimeEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("No subscribers for runtime events");
        }
    }
}

async fn next_autosave(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySaveRepository;
    use skill_core::{
        ActionReward, LevelingCurve, PcgRng, RegistryConfig, SkillAction, SkillDefinition,
        SkillDetails, SkillEngine,
    };

    fn worker(repository: Arc<dyn SaveRepository>) -> SessionWorker {
        let action = SkillAction::new("mine_copper", "Mine copper", 2_000)
            .with_reward(ActionReward::experience("mining", 30));
        let definition =
            SkillDefinition::new("mining", "Mining", LevelingCurve::linear(100)).with_action(action);
        let mut registry = SkillRegistry::new(RegistryConfig::default());
        registry
            .register_skill(SkillEngine::standard(definition), SkillDetails::new("Mining"), vec![])
            .unwrap();

        let (_command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, _) = broadcast::channel(16);
        SessionWorker::new(
            registry,
            LocalHost::new(Arc::new(PcgRng), 1),
            repository,
            Duration::from_millis(100),
            command_rx,
            event_tx,
        )
    }

    fn mining_level(worker: &SessionWorker) -> Option<u32> {
        worker.registry.engine(&"mining".into()).map(|engine| engine.level())
    }

    #[tokio::test(start_paused = true)]
    async fn stray_shutdown_is_acknowledged() {
        let mut worker = worker(Arc::new(InMemorySaveRepository::new()));

        let (reply, reply_rx) = oneshot::channel();
        worker.handle_command(Command::Shutdown { reply });
        assert!(reply_rx.await.is_ok());

        // A caller that already gave up does not disturb the worker
        let (reply, reply_rx) = oneshot::channel();
        drop(reply_rx);
        worker.handle_command(Command::Shutdown { reply });
        assert_eq!(mining_level(&worker), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn save_then_load_restores_progress() {
        let repository = Arc::new(InMemorySaveRepository::new());
        let mut worker = worker(repository.clone());
        worker.registry.grant_experience(&"mining".into(), 250).unwrap();
        worker.save("slot").unwrap();

        let mut fresh = self::worker(repository);
        let report = fresh.load("slot").unwrap().expect("save present");
        assert!(report.is_complete());
        assert_eq!(mining_level(&fresh), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn corrupt_save_keeps_fresh_state() {
        let repository = Arc::new(InMemorySaveRepository::new());
        repository.save("slot", b"{broken").unwrap();

        let mut worker = worker(repository);
        assert_eq!(worker.load("slot").unwrap(), None);
        assert_eq!(mining_level(&worker), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_slot_loads_nothing() {
        let mut worker = worker(Arc::new(InMemorySaveRepository::new()));
        assert_eq!(worker.load("missing").unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_a_later_save_moves_the_clock_forward() {
        let repository = Arc::new(InMemorySaveRepository::new());
        let mut worker = worker(repository.clone());
        worker.clock.advance_to(skill_core::Timestamp(60_000));
        worker.save("slot").unwrap();

        let mut fresh = self::worker(repository);
        fresh.load("slot").unwrap();
        assert!(fresh.clock.now() >= skill_core::Timestamp(60_000));
    }
}
