//! Notifications broadcast to runtime subscribers.

use skill_core::{
    ActionResult, LoadReport, SkillEvent, SkillId, SkillRegistration, SkillStatistics, Timestamp,
};

/// Everything the session worker publishes on its broadcast channel.
#[derive(Clone, Debug)]
pub enum RuntimeEvent {
    /// Notification drained from the registry outbox.
    Skill(SkillEvent),
    /// An active action finished; rewards are already applied.
    ActionResolved(ActionResult),
    Saved {
        slot: String,
        at: Timestamp,
    },
    Loaded {
        slot: String,
        report: LoadReport,
    },
}

impl RuntimeEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Skill(event) => event.topic(),
            Self::ActionResolved(_) => "action:resolved",
            Self::Saved { .. } => "session:saved",
            Self::Loaded { .. } => "session:loaded",
        }
    }
}

/// Read-only view of one registered skill.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillSummary {
    pub id: SkillId,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    pub progress: f64,
    pub unlocked: bool,
    pub busy: bool,
    /// Milliseconds until the active action resolves.
    pub remaining_ms: Option<u64>,
    pub statistics: SkillStatistics,
}

impl SkillSummary {
    pub fn from_registration(skill: &SkillRegistration, now: Timestamp) -> Self {
        let engine = skill.engine();
        let state = engine.state();
        Self {
            id: skill.id().clone(),
            name: skill.details().name.clone(),
            level: state.level(),
            experience: state.experience(),
            experience_to_next: state.experience_to_next(),
            progress: engine.progress_to_next(),
            unlocked: skill.is_unlocked(),
            busy: engine.is_busy(),
            remaining_ms: engine.remaining_ms(now),
            statistics: engine.get_statistics(),
        }
    }
}
