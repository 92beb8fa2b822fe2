//! The single in-flight action of an engine and the context it runs with.

use crate::ids::{ActionId, Timestamp};

/// Tool the host equipped for an action, e.g. an axe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedTool {
    pub id: String,
    /// Fractional duration reduction, e.g. `0.15` for 15% faster.
    pub speed_bonus: f64,
    /// Flat quality rating skills may turn into success bonuses.
    pub power: u32,
    /// Remaining uses before the tool breaks.
    pub durability: u32,
}

impl EquippedTool {
    pub fn new(id: impl Into<String>, speed_bonus: f64, power: u32, durability: u32) -> Self {
        Self {
            id: id.into(),
            speed_bonus,
            power,
            durability,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.durability == 0
    }
}

/// Host-supplied parameters for one `perform_action` call.
///
/// The context is stored in the [`ActiveAction`] so resolution, repeats, and
/// save/load all see exactly what the action was started with.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionContext {
    #[cfg_attr(feature = "serde", serde(default))]
    pub tool: Option<EquippedTool>,
    /// Total attempts to run back to back; 0 and 1 both mean a single attempt.
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeat: u32,
}

impl ActionContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tool(mut self, tool: EquippedTool) -> Self {
        self.tool = Some(tool);
        self
    }

    #[must_use]
    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = times;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.repeat.max(1)
    }
}

/// Action currently being performed by an engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveAction {
    pub action_id: ActionId,
    pub started_at: Timestamp,
    pub ends_at: Timestamp,
    /// Attempts requested for this run, at least 1.
    pub repeat_total: u32,
    /// Attempts already resolved in this run.
    pub repeat_done: u32,
    pub context: ActionContext,
}

impl ActiveAction {
    pub fn duration_ms(&self) -> u64 {
        self.ends_at.saturating_since(self.started_at)
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.ends_at
    }

    pub fn remaining_ms(&self, now: Timestamp) -> u64 {
        self.ends_at.saturating_since(now)
    }

    /// True if another attempt follows the one currently in flight.
    pub fn has_more_repeats(&self) -> bool {
        self.repeat_done + 1 < self.repeat_total
    }
}
