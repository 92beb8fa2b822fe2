//! Cloneable client-facing handle to the session worker.

use tokio::sync::{broadcast, mpsc, oneshot};

use skill_core::{ActionContext, ActionId, ActionStarted, HostEvent, LoadReport, SkillId};

use super::errors::{Result, RuntimeError};
use super::events::{RuntimeEvent, SkillSummary};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime.
///
/// Every method is a request/reply round trip to the session worker, so calls
/// from different clones are applied in the order the worker receives them.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<RuntimeEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    pub(crate) fn command_sender(&self) -> &mpsc::Sender<Command> {
        &self.command_tx
    }

    async fn request<T>(&self, command: Command, reply_rx: oneshot::Receiver<T>) -> Result<T> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start an action on a skill at the worker's current clock.
    pub async fn perform_action(
        &self,
        skill_id: impl Into<SkillId>,
        action_id: impl Into<ActionId>,
        context: ActionContext,
    ) -> Result<ActionStarted> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::PerformAction {
            skill_id: skill_id.into(),
            action_id: action_id.into(),
            context,
            reply: reply_tx,
        };
        Ok(self.request(command, reply_rx).await??)
    }

    /// Try to unlock a skill whose requirements are met.
    pub async fn unlock_skill(&self, skill_id: impl Into<SkillId>) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::UnlockSkill {
            skill_id: skill_id.into(),
            reply: reply_tx,
        };
        self.request(command, reply_rx).await
    }

    /// Record a host event and return the skills it unlocked.
    pub async fn notify(&self, event: HostEvent) -> Result<Vec<SkillId>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::Notify {
            event,
            reply: reply_tx,
        };
        self.request(command, reply_rx).await
    }

    /// Grant experience directly, bypassing actions. Returns levels gained.
    pub async fn grant_experience(&self, skill_id: impl Into<SkillId>, amount: u64) -> Result<u32> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::GrantExperience {
            skill_id: skill_id.into(),
            amount,
            reply: reply_tx,
        };
        Ok(self.request(command, reply_rx).await??)
    }

    /// Put items into the host inventory.
    pub async fn give_item(&self, item: impl Into<String>, amount: u64) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::GiveItem {
            item: item.into(),
            amount,
            reply: reply_tx,
        };
        self.request(command, reply_rx).await
    }

    /// Current amount of an item in the host inventory.
    pub async fn item_count(&self, item: impl Into<String>) -> Result<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::ItemCount {
            item: item.into(),
            reply: reply_tx,
        };
        self.request(command, reply_rx).await
    }

    /// Current gold balance of the host.
    pub async fn gold(&self) -> Result<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(Command::Gold { reply: reply_tx }, reply_rx).await
    }

    pub async fn query_skill(&self, skill_id: impl Into<SkillId>) -> Result<Option<SkillSummary>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::QuerySkill {
            skill_id: skill_id.into(),
            reply: reply_tx,
        };
        self.request(command, reply_rx).await
    }

    /// Every registered skill in display order.
    pub async fn list_skills(&self) -> Result<Vec<SkillSummary>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(Command::ListSkills { reply: reply_tx }, reply_rx)
            .await
    }

    /// Encode the registry and store it under `slot`.
    pub async fn save(&self, slot: impl Into<String>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::Save {
            slot: slot.into(),
            reply: reply_tx,
        };
        self.request(command, reply_rx).await?
    }

    /// Restore the registry from `slot`.
    ///
    /// Returns `None` when the slot is empty or its blob does not decode; the
    /// session then keeps its current state.
    pub async fn load(&self, slot: impl Into<String>) -> Result<Option<LoadReport>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::Load {
            slot: slot.into(),
            reply: reply_tx,
        };
        self.request(command, reply_rx).await?
    }

    /// Subscribe to runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_tx.subscribe()
    }
}
