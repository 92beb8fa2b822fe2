//! Per-skill state machine: leveling, action parking, and resolution.
mod behavior;
mod errors;
mod requirements;
mod resolver;
mod result;
mod snapshot;

use std::sync::Arc;

pub use behavior::{ActionEffects, ActionScope, SkillBehavior, StandardBehavior};
pub use errors::{ActionFailure, SnapshotError};
pub use requirements::{Subject, gold_cost, requirement_met, requirements_met};
pub use resolver::{ActionResolver, AttemptDice, Drops, Resolution};
pub use result::{ActionResult, ActionStarted, GrantedReward};
pub use snapshot::EngineSnapshot;

use tracing::{debug, info, warn};

use crate::config::SkillConfig;
use crate::definition::{RewardKind, SkillAction, SkillDefinition};
use crate::env::{PcgRng, RngOracle, SkillEnv};
use crate::event::SkillEvent;
use crate::ids::{ActionId, SkillId, Timestamp};
use crate::state::{ActionContext, ActiveAction, SkillState, SkillStatistics};

/// Runs one skill.
///
/// The engine exclusively owns its [`SkillState`]. Actions are validated and
/// parked by [`perform_action`](Self::perform_action) and resolved by
/// [`tick`](Self::tick) once the host clock reaches their end time.
/// Notifications accumulate in an outbox drained with
/// [`drain_events`](Self::drain_events).
pub struct SkillEngine {
    definition: Arc<SkillDefinition>,
    behavior: Arc<dyn SkillBehavior>,
    config: SkillConfig,
    state: SkillState,
    initialized: bool,
    outbox: Vec<SkillEvent>,
}

impl SkillEngine {
    pub fn new(definition: impl Into<Arc<SkillDefinition>>, behavior: Arc<dyn SkillBehavior>) -> Self {
        let definition = definition.into();
        let mut engine = Self {
            definition,
            behavior,
            config: SkillConfig::default(),
            state: SkillState::initial(1),
            initialized: false,
            outbox: Vec::new(),
        };
        engine.state = engine.fresh_state();
        engine
    }

    /// Engine with the default [`StandardBehavior`].
    pub fn standard(definition: impl Into<Arc<SkillDefinition>>) -> Self {
        Self::new(definition, Arc::new(StandardBehavior))
    }

    #[must_use]
    pub fn with_config(mut self, config: SkillConfig) -> Self {
        self.config = config;
        self
    }

    /// Unlocks every action the starting level qualifies for.
    ///
    /// Idempotent. No notifications are emitted for the initial catalog.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.unlock_new_actions();
        self.initialized = true;
        debug!(
            skill = %self.definition.id,
            unlocked = self.state.unlocked_actions.len(),
            "skill engine initialized"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn id(&self) -> &SkillId {
        &self.definition.id
    }

    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: SkillConfig) {
        self.config = config;
    }

    // ===== leveling =====

    /// Experience needed to advance from `level` to `level + 1`, at least 1.
    pub fn experience_for_level(&self, level: u32) -> u64 {
        let curve = &self.definition.curve;
        curve
            .builtin_requirement(level)
            .unwrap_or_else(|| self.behavior.custom_experience_for_level(curve, level.max(1)))
            .max(1)
    }

    /// Cumulative experience needed to reach `level` from level 1.
    pub fn total_experience_for_level(&self, level: u32) -> u64 {
        (1..level.min(self.definition.max_level))
            .map(|level| self.experience_for_level(level))
            .fold(0, u64::saturating_add)
    }

    /// Fraction of the current level completed, exactly 1 at max level.
    pub fn progress_to_next(&self) -> f64 {
        if self.state.level >= self.definition.max_level {
            return 1.0;
        }
        let threshold = self.state.experience_to_next.max(1);
        (self.state.experience as f64 / threshold as f64).clamp(0.0, 1.0)
    }

    /// Adds experience and applies every level-up it pays for.
    ///
    /// Returns the number of levels gained. One `skill:level_up` is emitted
    /// per level, ascending, followed by the `skill:action_unlocked` events
    /// of that level. Experience beyond max level is counted in the lifetime
    /// total but not kept.
    pub fn handle_experience_gained(&mut self, amount: u64) -> u32 {
        self.assert_initialized();
        let max_level = self.definition.max_level;
        self.state.total_experience = self.state.total_experience.saturating_add(amount);

        if self.state.level >= max_level {
            self.state.experience = 0;
            return 0;
        }

        self.state.experience = self.state.experience.saturating_add(amount);

        let mut gained = 0;
        while self.state.level < max_level && self.state.experience >= self.state.experience_to_next {
            self.state.experience -= self.state.experience_to_next;
            self.state.level += 1;
            self.state.experience_to_next = self.experience_for_level(self.state.level);
            gained += 1;

            info!(skill = %self.definition.id, level = self.state.level, "level up");
            self.outbox.push(SkillEvent::LevelUp {
                skill_id: self.definition.id.clone(),
                new_level: self.state.level,
            });

            for action_id in self.unlock_new_actions() {
                debug!(skill = %self.definition.id, action = %action_id, "action unlocked");
                self.outbox.push(SkillEvent::ActionUnlocked {
                    skill_id: self.definition.id.clone(),
                    action_id,
                });
            }
        }

        if self.state.level >= max_level {
            self.state.experience = 0;
        }

        gained
    }

    // ===== actions =====

    /// Validates and parks an action as the engine's active action.
    ///
    /// # Errors
    ///
    /// Preconditions are checked in order: the action exists, is unlocked,
    /// its requirements hold, and the engine is idle. A failure leaves the
    /// state untouched. Gold requirements are debited only after all four
    /// hold; a refused debit also reports
    /// [`ActionFailure::RequirementsNotMet`].
    pub fn perform_action(
        &mut self,
        action_id: &ActionId,
        context: ActionContext,
        env: &SkillEnv<'_>,
        now: Timestamp,
    ) -> Result<ActionStarted, ActionFailure> {
        self.assert_initialized();
        let definition = Arc::clone(&self.definition);
        let action = self.admit(&definition, action_id, env)?;
        let repeat_total = context.attempts();
        self.start(action, context, repeat_total, 0, env, now)
    }

    /// Resolves the active action, and any repeats, that are due at `now`.
    pub fn tick(&mut self, now: Timestamp, env: &SkillEnv<'_>) -> Vec<ActionResult> {
        self.assert_initialized();
        let mut results = Vec::new();
        while self
            .state
            .active_action
            .as_ref()
            .is_some_and(|active| active.is_due(now))
        {
            let Some(active) = self.state.active_action.take() else {
                break;
            };
            results.push(self.resolve(active, env));
        }
        results
    }

    /// Unlocked actions whose requirements currently hold.
    pub fn performable_actions(&self, env: &SkillEnv<'_>) -> Vec<ActionId> {
        let subject = self.subject();
        self.definition
            .actions
            .iter()
            .filter(|action| self.state.is_unlocked(&action.id))
            .filter(|action| requirements_met(&action.requirements, Some(subject), env))
            .map(|action| action.id.clone())
            .collect()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn active_action(&self) -> Option<&ActiveAction> {
        self.state.active_action.as_ref()
    }

    /// Time left on the active action, `None` when idle.
    pub fn remaining_ms(&self, now: Timestamp) -> Option<u64> {
        self.state
            .active_action
            .as_ref()
            .map(|active| active.remaining_ms(now))
    }

    // ===== state access =====

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn state(&self) -> &SkillState {
        &self.state
    }

    /// Copy of the current state.
    pub fn get_state(&self) -> SkillState {
        self.state.clone()
    }

    pub fn get_statistics(&self) -> SkillStatistics {
        self.state.statistics()
    }

    /// Takes every notification queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SkillEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ===== persistence =====

    /// Back to level 1 with the starting catalog unlocked.
    pub fn reset(&mut self) {
        self.state = self.fresh_state();
        self.unlock_new_actions();
    }

    pub fn save_state(&self) -> EngineSnapshot {
        EngineSnapshot {
            skill_id: self.definition.id.clone(),
            config: self.config.clone(),
            state: self.state.clone(),
            initialized: self.initialized,
        }
    }

    /// Restores a snapshot produced by [`save_state`](Self::save_state).
    ///
    /// The experience threshold is recomputed from the definition, and the
    /// unlocked set is rebuilt: saved ids that still qualify keep their
    /// order, newly qualifying ids are appended in catalog order.
    ///
    /// # Errors
    ///
    /// An inconsistent snapshot is rejected and the engine falls back to the
    /// fresh initial state.
    pub fn load_state(&mut self, snapshot: EngineSnapshot) -> Result<(), SnapshotError> {
        if let Err(error) = snapshot.validate(&self.definition, |level| self.experience_for_level(level)) {
            warn!(
                skill = %self.definition.id,
                %error,
                "discarding saved skill state, starting fresh"
            );
            self.reset();
            self.initialized = true;
            return Err(error);
        }

        let EngineSnapshot { config, mut state, .. } = snapshot;
        state.experience_to_next = self.experience_for_level(state.level);

        let saved_unlocks = std::mem::take(&mut state.unlocked_actions);
        let definition = Arc::clone(&self.definition);
        state.unlocked_actions = saved_unlocks
            .into_iter()
            .filter(|id| {
                definition
                    .action(id)
                    .is_some_and(|action| action.required_level(&definition.id) <= state.level)
            })
            .collect();

        self.config = config;
        self.state = state;
        self.unlock_new_actions();
        self.initialized = true;
        Ok(())
    }

    // ===== internals =====

    fn fresh_state(&self) -> SkillState {
        SkillState::initial(self.experience_for_level(1))
    }

    fn assert_initialized(&self) {
        debug_assert!(
            self.initialized,
            "skill engine '{}' used before initialize()",
            self.definition.id
        );
    }

    fn subject(&self) -> Subject<'_> {
        Subject {
            skill_id: &self.definition.id,
            level: self.state.level,
        }
    }

    /// Appends newly qualifying actions in catalog order and returns them.
    fn unlock_new_actions(&mut self) -> Vec<ActionId> {
        let level = self.state.level;
        let skill = &self.definition.id;
        let newly: Vec<ActionId> = self
            .definition
            .actions
            .iter()
            .filter(|action| action.required_level(skill) <= level)
            .filter(|action| !self.state.unlocked_actions.contains(&action.id))
            .map(|action| action.id.clone())
            .collect();
        self.state.unlocked_actions.extend(newly.iter().cloned());
        newly
    }

    fn admit<'d>(
        &self,
        definition: &'d SkillDefinition,
        action_id: &ActionId,
        env: &SkillEnv<'_>,
    ) -> Result<&'d SkillAction, ActionFailure> {
        let action = definition.action(action_id).ok_or(ActionFailure::NotFound)?;
        if !self.state.is_unlocked(action_id) {
            return Err(ActionFailure::NotUnlocked);
        }
        if !requirements_met(&action.requirements, Some(self.subject()), env) {
            return Err(ActionFailure::RequirementsNotMet);
        }
        if self.state.is_busy() {
            return Err(ActionFailure::AlreadyBusy);
        }
        Ok(action)
    }

    fn start(
        &mut self,
        action: &SkillAction,
        context: ActionContext,
        repeat_total: u32,
        repeat_done: u32,
        env: &SkillEnv<'_>,
        now: Timestamp,
    ) -> Result<ActionStarted, ActionFailure> {
        let cost = gold_cost(&action.requirements);
        if cost > 0 {
            let economy = env
                .economy_oracle()
                .map_err(|_| ActionFailure::RequirementsNotMet)?;
            if !economy.remove_gold(cost) {
                return Err(ActionFailure::RequirementsNotMet);
            }
        }

        let scope = ActionScope {
            skill_id: &self.definition.id,
            action,
            level: self.state.level,
            required_level: action.required_level(&self.definition.id),
            context: &context,
        };
        let duration_ms =
            ActionResolver::new(&self.config, self.behavior.as_ref()).compute_duration(&scope);

        let ends_at = now + duration_ms;
        self.state.active_action = Some(ActiveAction {
            action_id: action.id.clone(),
            started_at: now,
            ends_at,
            repeat_total,
            repeat_done,
            context,
        });
        self.outbox.push(SkillEvent::ActionStarted {
            skill_id: self.definition.id.clone(),
            action_id: action.id.clone(),
            duration_ms,
        });

        Ok(ActionStarted {
            skill_id: self.definition.id.clone(),
            action_id: action.id.clone(),
            started_at: now,
            ends_at,
            duration_ms,
        })
    }

    fn resolve(&mut self, active: ActiveAction, env: &SkillEnv<'_>) -> ActionResult {
        let definition = Arc::clone(&self.definition);
        let behavior = Arc::clone(&self.behavior);
        let skill_id = &definition.id;
        let duration_ms = active.duration_ms();
        let resolved_at = active.ends_at;

        let Some(action) = definition.action(&active.action_id) else {
            warn!(skill = %skill_id, action = %active.action_id, "active action vanished from catalog");
            return ActionResult::failed(
                skill_id.clone(),
                active.action_id,
                ActionFailure::NotFound,
                duration_ms,
                resolved_at,
            );
        };

        let fallback = PcgRng;
        let rng: &dyn RngOracle = match env.rng_oracle() {
            Ok(rng) => rng,
            Err(_) => {
                warn!(skill = %skill_id, "no rng oracle supplied, using PcgRng");
                &fallback
            }
        };

        let level = self.state.level;
        let required_level = action.required_level(skill_id);
        let mut context = active.context.clone();
        let resolution = {
            let scope = ActionScope {
                skill_id,
                action,
                level,
                required_level,
                context: &context,
            };
            let dice = AttemptDice::new(rng, env.session_seed(), self.state.actions_completed, skill_id);
            ActionResolver::new(&self.config, behavior.as_ref()).resolve(&scope, &dice)
        };

        self.state.actions_completed = self.state.actions_completed.saturating_add(1);
        self.state.time_spent_ms = self.state.time_spent_ms.saturating_add(duration_ms);

        let result = if resolution.success {
            self.state.successes += 1;
            if resolution.critical {
                self.state.criticals += 1;
            }

            let result = ActionResult {
                skill_id: skill_id.clone(),
                action_id: action.id.clone(),
                success: true,
                failure: None,
                rewards: resolution.rewards,
                experience: resolution.experience,
                crit_bonus: resolution.critical.then_some(self.config.critical_multiplier),
                duration_ms,
                resolved_at,
            };

            let gold = result.gold();
            if gold > 0 {
                match env.economy_oracle() {
                    Ok(economy) => economy.add_gold(gold),
                    Err(error) => warn!(skill = %skill_id, gold, %error, "gold reward dropped"),
                }
            }

            let mut effects = ActionEffects::new(
                skill_id,
                action,
                level,
                &result,
                &mut context,
                &mut self.state.counters,
                &mut self.outbox,
            );
            behavior.apply_action_effects(&mut effects);

            self.outbox.push(SkillEvent::ActionCompleted {
                skill_id: skill_id.clone(),
                action_id: action.id.clone(),
                rewards: result.rewards.clone(),
            });

            let gained = result.experience_for(skill_id);
            if gained > 0 {
                self.handle_experience_gained(gained);
            }
            result
        } else {
            self.state.failures += 1;
            self.outbox.push(SkillEvent::ActionFailed {
                skill_id: skill_id.clone(),
                action_id: action.id.clone(),
                reason: ActionFailure::Failed.to_string(),
            });
            ActionResult::failed(
                skill_id.clone(),
                action.id.clone(),
                ActionFailure::Failed,
                duration_ms,
                resolved_at,
            )
        };

        if active.has_more_repeats() {
            let next = self
                .admit(&definition, &active.action_id, env)
                .and_then(|action| {
                    self.start(
                        action,
                        context,
                        active.repeat_total,
                        active.repeat_done + 1,
                        env,
                        resolved_at,
                    )
                });
            if let Err(reason) = next {
                debug!(skill = %skill_id, action = %active.action_id, %reason, "repeat stopped");
            }
        }

        result
    }
}

impl std::fmt::Debug for SkillEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillEngine")
            .field("skill", &self.definition.id)
            .field("level", &self.state.level)
            .field("initialized", &self.initialized)
            .field("busy", &self.state.is_busy())
            .field("pending_events", &self.outbox.len())
            .finish()
    }
}

/// Rewards granted to skills other than the acting one.
pub(crate) fn foreign_experience(result: &ActionResult) -> impl Iterator<Item = (SkillId, u64)> + '_ {
    result
        .rewards
        .iter()
        .filter(|reward| reward.kind == RewardKind::Experience)
        .filter(move |reward| result.skill_id != reward.target.as_str())
        .map(|reward| (SkillId::from(reward.target.as_str()), reward.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ActionRequirement, ActionReward, LevelingCurve};
    use crate::env::{EconomyOracle, ScriptedRng};
    use crate::state::EquippedTool;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn woodcutting() -> SkillDefinition {
        SkillDefinition::new("woodcutting", "Woodcutting", LevelingCurve::exponential(100, 1.1))
            .with_action(
                SkillAction::new("chop_oak", "Chop Oak", 2_000)
                    .with_requirement(ActionRequirement::skill_level("woodcutting", 1))
                    .with_reward(ActionReward::experience("woodcutting", 25))
                    .with_reward(ActionReward::item("oak_log", 1))
                    .with_level_scaling(0.01),
            )
            .with_action(
                SkillAction::new("chop_willow", "Chop Willow", 3_000)
                    .with_requirement(ActionRequirement::skill_level("woodcutting", 15))
                    .with_reward(ActionReward::experience("woodcutting", 45))
                    .with_reward(ActionReward::item("willow_log", 1)),
            )
    }

    fn engine() -> SkillEngine {
        let mut engine = SkillEngine::standard(woodcutting());
        engine.initialize();
        engine
    }

    fn oak() -> ActionId {
        ActionId::from("chop_oak")
    }

    #[test]
    fn initialize_unlocks_starting_catalog() {
        let engine = engine();
        assert_eq!(engine.state().unlocked_actions(), &[oak()]);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.state().experience_to_next(), 100);
    }

    #[test]
    fn second_action_while_busy_is_rejected() {
        let mut engine = engine();
        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng);

        engine
            .perform_action(&oak(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("first start");
        let err = engine
            .perform_action(&oak(), ActionContext::new(), &env, Timestamp::ZERO)
            .unwrap_err();
        assert_eq!(err, ActionFailure::AlreadyBusy);
        assert_eq!(err.to_string(), "Already performing an action");
    }

    #[test]
    fn precondition_failures_are_ordered() {
        let mut engine = engine();
        let env = SkillEnv::empty();

        assert_eq!(
            engine.perform_action(&"nope".into(), ActionContext::new(), &env, Timestamp::ZERO),
            Err(ActionFailure::NotFound)
        );
        assert_eq!(
            engine.perform_action(&"chop_willow".into(), ActionContext::new(), &env, Timestamp::ZERO),
            Err(ActionFailure::NotUnlocked)
        );
        assert!(!engine.is_busy());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn experience_with_drop_chance_can_miss() {
        let definition = SkillDefinition::new(
            "woodcutting",
            "Woodcutting",
            LevelingCurve::exponential(100, 1.1),
        )
        .with_action(
            SkillAction::new("shake_tree", "Shake Tree", 1_000)
                .with_reward(ActionReward::experience("woodcutting", 25).with_drop_chance(0.5)),
        );
        let mut engine = SkillEngine::standard(definition);
        engine.initialize();
        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng);

        engine
            .perform_action(&"shake_tree".into(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("start");
        let results = engine.tick(Timestamp(1_000), &env);
        assert!(results[0].success);
        assert_eq!(results[0].experience_for(&"woodcutting".into()), 0);
        assert_eq!(engine.state().experience(), 0);
        assert_eq!(engine.state().actions_completed(), 1);
    }

    #[test]
    fn chop_oak_baseline_at_level_one() {
        let mut engine = engine();
        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng);

        let started = engine
            .perform_action(&oak(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("start");
        assert_eq!(started.duration_ms, 2_000);

        assert!(engine.tick(Timestamp(1_999), &env).is_empty());
        let results = engine.tick(Timestamp(2_000), &env);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.success);
        assert!(!result.is_critical());
        assert_eq!(result.experience_for(&"woodcutting".into()), 25);
        assert_eq!(result.item_amount("oak_log"), 1);
        assert_eq!(result.duration_ms, 2_000);

        assert!(!engine.is_busy());
        assert_eq!(engine.state().experience(), 25);
        assert_eq!(engine.state().actions_completed(), 1);
        assert_eq!(engine.state().time_spent_ms(), 2_000);

        let topics: Vec<_> = engine.drain_events().iter().map(SkillEvent::topic).collect();
        assert_eq!(topics, ["action:started", "action:completed"]);
    }

    #[test]
    fn overlevel_penalty_at_level_21() {
        let mut engine = engine();
        let total = engine.total_experience_for_level(21);
        engine.handle_experience_gained(total);
        assert_eq!(engine.level(), 21);
        assert_eq!(engine.state().experience(), 0);

        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng);
        engine
            .perform_action(&oak(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("start");
        let results = engine.tick(Timestamp(10_000), &env);
        assert_eq!(results[0].experience_for(&"woodcutting".into()), 15);
        assert_eq!(results[0].duration_ms, 1_600);
    }

    #[test]
    fn failed_roll_reports_reason() {
        let mut engine = engine();
        let rng = ScriptedRng::always(ScriptedRng::FAIL);
        let env = SkillEnv::with_rng(&rng);

        engine
            .perform_action(&oak(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("start");
        let results = engine.tick(Timestamp(2_000), &env);
        assert!(!results[0].success);
        assert_eq!(results[0].failure, Some(ActionFailure::Failed));
        assert!(results[0].rewards.is_empty());
        assert_eq!(engine.get_statistics().failures, 1);
        assert_eq!(engine.state().actions_completed(), 1);

        let events = engine.drain_events();
        assert!(matches!(
            events.last(),
            Some(SkillEvent::ActionFailed { reason, .. }) if reason == "Action failed"
        ));
    }

    #[test]
    fn multi_level_up_emits_each_level_in_order() {
        let mut engine = engine();
        let gained = engine.handle_experience_gained(engine.total_experience_for_level(16));
        assert_eq!(gained, 15);
        assert_eq!(engine.level(), 16);

        let events = engine.drain_events();
        let levels: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                SkillEvent::LevelUp { new_level, .. } => Some(*new_level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, (2..=16).collect::<Vec<_>>());

        let unlocked: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                SkillEvent::ActionUnlocked { action_id, .. } => Some(action_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unlocked, ["chop_willow"]);
        assert!(engine.state().is_unlocked(&"chop_willow".into()));
    }

    #[test]
    fn max_level_discards_surplus() {
        let def = woodcutting().with_max_level(3);
        let mut engine = SkillEngine::standard(def);
        engine.initialize();

        engine.handle_experience_gained(10_000);
        assert_eq!(engine.level(), 3);
        assert_eq!(engine.state().experience(), 0);
        assert_eq!(engine.state().total_experience(), 10_000);
        assert_eq!(engine.progress_to_next(), 1.0);
        assert_eq!(engine.handle_experience_gained(50), 0);
    }

    #[test]
    fn repeats_reschedule_from_previous_end() {
        let mut engine = engine();
        let rng = ScriptedRng::new(
            [ScriptedRng::PASS, ScriptedRng::FAIL, ScriptedRng::PASS, ScriptedRng::FAIL],
            ScriptedRng::FAIL,
        );
        let env = SkillEnv::with_rng(&rng);

        engine
            .perform_action(&oak(), ActionContext::new().repeat(3), &env, Timestamp::ZERO)
            .expect("start");

        let results = engine.tick(Timestamp(4_500), &env);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|result| result.success));

        let active = engine.active_action().expect("third attempt parked");
        assert_eq!(active.started_at, Timestamp(4_000));
        assert_eq!(active.repeat_done, 2);
        assert_eq!(engine.remaining_ms(Timestamp(4_500)), Some(1_500));

        let results = engine.tick(Timestamp(6_000), &env);
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(!engine.is_busy());
    }

    #[test]
    fn gold_cost_is_debited_at_start() {
        struct Bank(AtomicU64);
        impl EconomyOracle for Bank {
            fn has_gold(&self, amount: u64) -> bool {
                self.0.load(Ordering::SeqCst) >= amount
            }
            fn remove_gold(&self, amount: u64) -> bool {
                self.0
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |gold| gold.checked_sub(amount))
                    .is_ok()
            }
            fn add_gold(&self, amount: u64) {
                self.0.fetch_add(amount, Ordering::SeqCst);
            }
        }

        let def = SkillDefinition::new("trading", "Trading", LevelingCurve::linear(50)).with_action(
            SkillAction::new("haggle", "Haggle", 1_000)
                .with_requirement(ActionRequirement::gold(30))
                .with_reward(ActionReward::gold(100)),
        );
        let mut engine = SkillEngine::standard(def);
        engine.initialize();

        let bank = Bank(AtomicU64::new(40));
        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng).economy(&bank);

        engine
            .perform_action(&"haggle".into(), ActionContext::new(), &env, Timestamp::ZERO)
            .expect("start");
        assert_eq!(bank.0.load(Ordering::SeqCst), 10);

        engine.tick(Timestamp(1_000), &env);
        assert_eq!(bank.0.load(Ordering::SeqCst), 110);

        let poor = Bank(AtomicU64::new(5));
        let env = SkillEnv::with_rng(&rng).economy(&poor);
        assert_eq!(
            engine.perform_action(&"haggle".into(), ActionContext::new(), &env, Timestamp::ZERO),
            Err(ActionFailure::RequirementsNotMet)
        );
        assert_eq!(poor.0.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut engine = engine();
        engine.handle_experience_gained(engine.total_experience_for_level(15) + 7);
        let rng = ScriptedRng::success_without_critical();
        let env = SkillEnv::with_rng(&rng);
        let tool = EquippedTool::new("bronze_axe", 0.1, 2, 10);
        engine
            .perform_action(&oak(), ActionContext::new().with_tool(tool), &env, Timestamp(500))
            .expect("start");

        let snapshot = engine.save_state();

        let mut restored = SkillEngine::standard(woodcutting());
        restored.load_state(snapshot).expect("load");
        assert_eq!(restored.level(), engine.level());
        assert_eq!(restored.state().experience(), 7);
        assert_eq!(
            restored.state().unlocked_actions(),
            engine.state().unlocked_actions()
        );
        assert_eq!(restored.active_action(), engine.active_action());
        assert!(restored.is_initialized());
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_fresh_state() {
        let mut engine = engine();
        engine.handle_experience_gained(500);
        let mut snapshot = engine.save_state();
        snapshot.state.level = 500;

        let mut restored = SkillEngine::standard(woodcutting());
        let err = restored.load_state(snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::LevelOutOfRange { level: 500, .. }));
        assert_eq!(restored.level(), 1);
        assert_eq!(restored.state().unlocked_actions(), &[oak()]);
        assert!(restored.is_initialized());
    }

    #[test]
    fn snapshot_for_other_skill_is_rejected() {
        let mut snapshot = engine().save_state();
        snapshot.skill_id = "fishing".into();
        let mut restored = SkillEngine::standard(woodcutting());
        assert!(matches!(
            restored.load_state(snapshot),
            Err(SnapshotError::SkillMismatch { .. })
        ));
    }

    #[test]
    fn reset_returns_to_level_one() {
        let mut engine = engine();
        engine.handle_experience_gained(5_000);
        engine.reset();
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.state().total_experience(), 0);
        assert_eq!(engine.state().unlocked_actions(), &[oak()]);
    }

    #[test]
    fn performable_actions_filter_requirements() {
        let engine = engine();
        assert_eq!(engine.performable_actions(&SkillEnv::empty()), vec![oak()]);
    }

    proptest! {
        #[test]
        fn experience_curve_is_non_decreasing(base in 1u64..1_000, mult in 1.0f64..1.5) {
            for curve in [LevelingCurve::linear(base), LevelingCurve::exponential(base, mult)] {
                let def = SkillDefinition::new("s", "S", curve)
                    .with_action(SkillAction::new("a", "A", 1_000));
                let engine = SkillEngine::standard(def);
                for level in 1..98 {
                    prop_assert!(engine.experience_for_level(level) <= engine.experience_for_level(level + 1));
                }
            }
        }

        #[test]
        fn progress_stays_in_unit_range(gains in proptest::collection::vec(0u64..5_000, 0..20)) {
            let mut engine = engine();
            for gain in gains {
                engine.handle_experience_gained(gain);
                let progress = engine.progress_to_next();
                prop_assert!((0.0..=1.0).contains(&progress));
            }
        }
    }
}
