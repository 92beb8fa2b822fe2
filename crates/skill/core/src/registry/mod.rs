//! Ordered collection of skills and the unlock gates between them.
//!
//! The registry is built by the host's composition root and passed around by
//! reference; there is no process-wide instance. It exclusively owns its
//! engines, hands each engine a level table of every skill before a call, and
//! forwards engine notifications into its own outbox.
mod errors;
mod registration;
mod snapshot;

pub use errors::RegistryError;
pub use registration::{SkillDetails, SkillRegistration};
pub use snapshot::{LoadReport, RegistrySnapshot, SkillSaveEntry};

use tracing::{debug, error, info, warn};

use crate::config::RegistryConfig;
use crate::definition::ActionRequirement;
use crate::engine::{ActionFailure, ActionResult, ActionStarted, SkillEngine, requirements_met};
use crate::env::{LevelTable, SkillEnv};
use crate::error::SkillError;
use crate::event::{HostEvent, SkillEvent};
use crate::ids::{ActionId, SkillId, Timestamp};
use crate::state::ActionContext;

pub struct SkillRegistry {
    config: RegistryConfig,
    /// Sorted by `position`.
    skills: Vec<SkillRegistration>,
    /// Skills registered so far that are absent from the unlock order.
    appended: usize,
    outbox: Vec<SkillEvent>,
}

impl SkillRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            skills: Vec::new(),
            appended: 0,
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Validates, positions, and initializes a skill.
    ///
    /// A skill with no unlock requirements starts unlocked. Skills missing
    /// from the configured unlock order are appended after it.
    ///
    /// # Errors
    ///
    /// A malformed definition is logged and the skill is skipped. Registering
    /// an id twice is rejected.
    pub fn register_skill(
        &mut self,
        mut engine: SkillEngine,
        details: SkillDetails,
        unlock_requirements: Vec<ActionRequirement>,
    ) -> Result<(), RegistryError> {
        if let Err(err) = engine.definition().validate() {
            error!(
                skill = %engine.id(),
                code = err.error_code(),
                error = %err,
                "skipping malformed skill definition"
            );
            return Err(RegistryError::InvalidDefinition(err));
        }
        if self.contains(engine.id()) {
            return Err(RegistryError::Duplicate(engine.id().clone()));
        }

        let position = match self.config.order_of(engine.id()) {
            Some(index) => index,
            None => {
                warn!(
                    skill = %engine.id(),
                    "skill missing from unlock order, appending"
                );
                let position = self.config.unlock_order.len() + self.appended;
                self.appended += 1;
                position
            }
        };

        engine.set_config(self.config.skill.clone());
        engine.initialize();

        let registration = SkillRegistration {
            is_unlocked: unlock_requirements.is_empty(),
            engine,
            details,
            unlock_requirements,
            position,
        };
        debug!(
            skill = %registration.id(),
            position,
            unlocked = registration.is_unlocked,
            "skill registered"
        );

        let index = self.skills.partition_point(|skill| skill.position <= position);
        self.skills.insert(index, registration);
        Ok(())
    }

    // ===== lookup =====

    pub fn contains(&self, skill_id: &SkillId) -> bool {
        self.get(skill_id).is_some()
    }

    pub fn get(&self, skill_id: &SkillId) -> Option<&SkillRegistration> {
        self.skills.iter().find(|skill| skill.id() == skill_id)
    }

    pub fn engine(&self, skill_id: &SkillId) -> Option<&SkillEngine> {
        self.get(skill_id).map(SkillRegistration::engine)
    }

    fn get_mut(&mut self, skill_id: &SkillId) -> Option<&mut SkillRegistration> {
        self.skills.iter_mut().find(|skill| skill.id() == skill_id)
    }

    /// Every registered skill in display order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillRegistration> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn is_unlocked(&self, skill_id: &SkillId) -> bool {
        self.get(skill_id).is_some_and(SkillRegistration::is_unlocked)
    }

    /// Current level of every registered skill.
    pub fn level_table(&self) -> LevelTable {
        self.skills
            .iter()
            .map(|skill| (skill.id().clone(), skill.level()))
            .collect()
    }

    // ===== unlocking =====

    /// Unlocks a skill once its requirements hold.
    ///
    /// Returns true if the skill is unlocked afterwards, including when it
    /// already was. `skill:unlocked` is emitted only on the transition.
    pub fn unlock_skill(&mut self, skill_id: &SkillId, env: &SkillEnv<'_>) -> bool {
        let table = self.level_table();
        let env = env.with_skill_levels(&table);

        let Some(skill) = self.get_mut(skill_id) else {
            warn!(skill = %skill_id, "unlock requested for unknown skill");
            return false;
        };
        if skill.is_unlocked {
            return true;
        }
        if !requirements_met(&skill.unlock_requirements, None, &env) {
            info!(skill = %skill_id, "unlock requirements not met");
            return false;
        }

        skill.is_unlocked = true;
        info!(skill = %skill_id, "skill unlocked");
        self.outbox.push(SkillEvent::SkillUnlocked {
            skill_id: skill_id.clone(),
        });
        true
    }

    /// Re-evaluates locked skills after a host notification.
    ///
    /// Returns the skills unlocked by it.
    pub fn handle_host_event(&mut self, event: &HostEvent, env: &SkillEnv<'_>) -> Vec<SkillId> {
        debug!(topic = event.topic(), "host event");
        self.unlock_ready(env)
    }

    /// Unlocks every locked skill whose requirements now hold.
    ///
    /// Returns the skills unlocked by this call.
    pub fn unlock_ready(&mut self, env: &SkillEnv<'_>) -> Vec<SkillId> {
        let table = self.level_table();
        let scoped = env.with_skill_levels(&table);

        let ready: Vec<SkillId> = self
            .skills
            .iter()
            .filter(|skill| !skill.is_unlocked)
            .filter(|skill| requirements_met(&skill.unlock_requirements, None, &scoped))
            .map(|skill| skill.id().clone())
            .collect();

        for skill_id in &ready {
            self.unlock_skill(skill_id, env);
        }
        ready
    }

    // ===== actions =====

    /// Starts an action on an unlocked skill.
    ///
    /// # Errors
    ///
    /// [`ActionFailure::SkillNotFound`] and [`ActionFailure::SkillLocked`] for
    /// the skill itself, otherwise whatever the engine reports.
    pub fn perform_action(
        &mut self,
        skill_id: &SkillId,
        action_id: &ActionId,
        context: ActionContext,
        env: &SkillEnv<'_>,
        now: Timestamp,
    ) -> Result<ActionStarted, ActionFailure> {
        let table = self.level_table();
        let env = env.with_skill_levels(&table);

        let skill = self.get_mut(skill_id).ok_or(ActionFailure::SkillNotFound)?;
        if !skill.is_unlocked {
            return Err(ActionFailure::SkillLocked);
        }
        let started = skill.engine.perform_action(action_id, context, &env, now);
        let events = skill.engine.drain_events();
        self.outbox.extend(events);
        started
    }

    /// Resolves every due action across all skills.
    ///
    /// Experience rewards naming another skill are credited to it, and
    /// locked skills are re-evaluated once levels moved.
    pub fn tick(&mut self, now: Timestamp, env: &SkillEnv<'_>) -> Vec<ActionResult> {
        let table = self.level_table();
        let scoped = env.with_skill_levels(&table);

        let mut results = Vec::new();
        for skill in &mut self.skills {
            if !skill.engine.is_busy() {
                continue;
            }
            results.extend(skill.engine.tick(now, &scoped));
            self.outbox.extend(skill.engine.drain_events());
        }

        for result in &results {
            for (target, amount) in crate::engine::foreign_experience(result) {
                if let Err(err) = self.grant_experience(&target, amount) {
                    warn!(from = %result.skill_id, error = %err, "experience reward dropped");
                }
            }
        }

        if results.iter().any(|result| result.success) {
            self.unlock_ready(env);
        }
        results
    }

    /// Credits experience to a skill directly.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSkill`] if `skill_id` is not registered.
    pub fn grant_experience(&mut self, skill_id: &SkillId, amount: u64) -> Result<u32, RegistryError> {
        let skill = self
            .get_mut(skill_id)
            .ok_or_else(|| RegistryError::UnknownSkill(skill_id.clone()))?;
        let gained = skill.engine.handle_experience_gained(amount);
        let events = skill.engine.drain_events();
        self.outbox.extend(events);
        Ok(gained)
    }

    // ===== aggregates =====

    /// Sum of levels across unlocked skills.
    pub fn total_skill_level(&self) -> u32 {
        self.unlocked().map(SkillRegistration::level).sum()
    }

    /// Highest level among unlocked skills, 0 if none is unlocked.
    pub fn highest_skill_level(&self) -> u32 {
        self.unlocked().map(SkillRegistration::level).max().unwrap_or(0)
    }

    /// Every `(skill, action)` pair that could start right now.
    pub fn performable_actions(&self, env: &SkillEnv<'_>) -> Vec<(SkillId, ActionId)> {
        let table = self.level_table();
        let env = env.with_skill_levels(&table);
        self.unlocked()
            .filter(|skill| !skill.engine.is_busy())
            .flat_map(|skill| {
                skill
                    .engine
                    .performable_actions(&env)
                    .into_iter()
                    .map(|action| (skill.id().clone(), action))
            })
            .collect()
    }

    fn unlocked(&self) -> impl Iterator<Item = &SkillRegistration> {
        self.skills.iter().filter(|skill| skill.is_unlocked)
    }

    /// Takes every notification queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SkillEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ===== persistence =====

    pub fn save_all_skills(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            skills: self
                .skills
                .iter()
                .map(|skill| {
                    (
                        skill.id().clone(),
                        SkillSaveEntry {
                            state: skill.engine.save_state(),
                            is_unlocked: skill.is_unlocked,
                        },
                    )
                })
                .collect(),
            unlock_order: self.skills.iter().map(|skill| skill.id().clone()).collect(),
        }
    }

    /// Restores skills from a snapshot.
    ///
    /// Registered skills without an entry keep their current state; entries
    /// for unregistered skills are ignored; inconsistent entries reset their
    /// skill. None of these stop the load.
    pub fn load_all_skills(&mut self, snapshot: RegistrySnapshot) -> LoadReport {
        let RegistrySnapshot { mut skills, .. } = snapshot;
        let mut report = LoadReport::default();

        for skill in &mut self.skills {
            let skill_id = skill.id().clone();
            let Some(entry) = skills.remove(&skill_id) else {
                debug!(skill = %skill_id, "no saved entry, keeping current state");
                report.missing.push(skill_id);
                continue;
            };

            match skill.engine.load_state(entry.state) {
                Ok(()) => {
                    skill.is_unlocked = entry.is_unlocked || skill.unlock_requirements.is_empty();
                    report.loaded.push(skill_id);
                }
                Err(err) => {
                    skill.is_unlocked = skill.unlock_requirements.is_empty();
                    report.rejected.push((skill_id, err));
                }
            }
        }

        for skill_id in skills.into_keys() {
            warn!(skill = %skill_id, "saved entry for unregistered skill ignored");
            report.unknown.push(skill_id);
        }

        info!(
            loaded = report.loaded.len(),
            missing = report.missing.len(),
            rejected = report.rejected.len(),
            "skills loaded"
        );
        report
    }

    /// Resets every engine and reapplies the original unlock gates.
    pub fn reset_all_skills(&mut self) {
        for skill in &mut self.skills {
            skill.engine.reset();
            skill.is_unlocked = skill.unlock_requirements.is_empty();
        }
        self.outbox.clear();
    }
}

impl std::fmt::Debug for SkillRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillRegistry")
            .field("skills", &self.skills.len())
            .field("unlocked", &self.unlocked().count())
            .field("pending_events", &self.outbox.len())
            .finish()
    }
}
