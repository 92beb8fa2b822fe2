//! Per-skill customization points.
//!
//! A [`SkillBehavior`] is injected into the one concrete [`SkillEngine`] type.
//! Every hook has a neutral default, so a skill only overrides what makes it
//! different.
//!
//! [`SkillEngine`]: super::SkillEngine

use std::collections::BTreeMap;

use super::ActionResult;
use crate::definition::{ActionReward, LevelingCurve, SkillAction, exponential_requirement};
use crate::event::SkillEvent;
use crate::ids::SkillId;
use crate::state::ActionContext;

/// Read-only view of the attempt a hook is asked about.
#[derive(Clone, Copy, Debug)]
pub struct ActionScope<'a> {
    pub skill_id: &'a SkillId,
    pub action: &'a SkillAction,
    /// Current level of the acting skill.
    pub level: u32,
    /// Level of the acting skill the action demands.
    pub required_level: u32,
    pub context: &'a ActionContext,
}

impl ActionScope<'_> {
    /// Levels above the action's requirement, never negative.
    pub fn levels_over_requirement(&self) -> u32 {
        self.level.saturating_sub(self.required_level)
    }
}

/// Mutable access granted to [`SkillBehavior::apply_action_effects`].
pub struct ActionEffects<'a> {
    pub skill_id: &'a SkillId,
    pub action: &'a SkillAction,
    pub level: u32,
    pub result: &'a ActionResult,
    /// Context of the running action; changes carry over to repeats.
    pub context: &'a mut ActionContext,
    counters: &'a mut BTreeMap<String, u64>,
    events: &'a mut Vec<SkillEvent>,
}

impl<'a> ActionEffects<'a> {
    pub(crate) fn new(
        skill_id: &'a SkillId,
        action: &'a SkillAction,
        level: u32,
        result: &'a ActionResult,
        context: &'a mut ActionContext,
        counters: &'a mut BTreeMap<String, u64>,
        events: &'a mut Vec<SkillEvent>,
    ) -> Self {
        Self {
            skill_id,
            action,
            level,
            result,
            context,
            counters,
            events,
        }
    }

    /// Adds `by` to the skill counter `name`.
    pub fn increment(&mut self, name: &str, by: u64) {
        let counter = self.counters.entry(name.to_owned()).or_insert(0);
        *counter = counter.saturating_add(by);
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Queues a notification behind the engine's own.
    pub fn emit(&mut self, event: SkillEvent) {
        self.events.push(event);
    }
}

/// Override points of a skill.
///
/// Modifiers multiply the values computed by the resolver; the defaults are
/// all neutral.
pub trait SkillBehavior: Send + Sync {
    /// Multiplies the level-scaled duration.
    fn duration_modifier(&self, _scope: &ActionScope<'_>) -> f64 {
        1.0
    }

    /// Multiplies the clamped success chance.
    fn success_modifier(&self, _scope: &ActionScope<'_>) -> f64 {
        1.0
    }

    /// Multiplies the clamped critical chance.
    fn critical_modifier(&self, _scope: &ActionScope<'_>) -> f64 {
        1.0
    }

    /// Adjusts one reward amount that survived its drop roll.
    ///
    /// Item and gold amounts arrive critical-multiplied. The acting skill's
    /// own experience arrives raw and is penalized and critical-multiplied
    /// afterwards. Results that floor to zero or below are dropped.
    fn modify_reward_amount(
        &self,
        _scope: &ActionScope<'_>,
        _reward: &ActionReward,
        amount: f64,
    ) -> f64 {
        amount
    }

    /// Applies side effects of a successful attempt (durability, counters).
    fn apply_action_effects(&self, _effects: &mut ActionEffects<'_>) {}

    /// Experience from `level` to `level + 1` for [`CurveKind::Custom`].
    ///
    /// Defaults to the exponential formula so a custom curve without an
    /// override still levels.
    ///
    /// [`CurveKind::Custom`]: crate::definition::CurveKind::Custom
    fn custom_experience_for_level(&self, curve: &LevelingCurve, level: u32) -> u64 {
        exponential_requirement(curve.base_experience, curve.multiplier, level)
    }
}

/// Behavior with every hook left at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBehavior;

impl SkillBehavior for StandardBehavior {}
