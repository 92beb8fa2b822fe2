//! Pure computation for one action attempt.
//!
//! [`ActionResolver`] owns no state. Given an [`ActionScope`] it computes
//! duration, chances, rewards and experience; all randomness comes from the
//! [`AttemptDice`] handed to it, which wrap the environment's single
//! [`RngOracle`].

use std::collections::BTreeMap;

use super::behavior::{ActionScope, SkillBehavior};
use super::result::GrantedReward;
use crate::config::SkillConfig;
use crate::definition::SkillAction;
use crate::env::{RngOracle, compute_seed};
use crate::ids::SkillId;

/// Roll context of the success roll.
const SUCCESS_ROLL: u32 = 0;
/// Roll context of the critical roll.
const CRITICAL_ROLL: u32 = 1;
/// First roll context of per-reward drop rolls.
const DROP_ROLL_BASE: u32 = 2;

/// Seeded draws for a single attempt.
pub struct AttemptDice<'a> {
    rng: &'a dyn RngOracle,
    session_seed: u64,
    nonce: u64,
    skill_tag: u32,
}

impl<'a> AttemptDice<'a> {
    pub fn new(rng: &'a dyn RngOracle, session_seed: u64, nonce: u64, skill: &SkillId) -> Self {
        Self {
            rng,
            session_seed,
            nonce,
            skill_tag: skill.tag(),
        }
    }

    fn roll(&self, context: u32, chance: f64) -> bool {
        let seed = compute_seed(self.session_seed, self.nonce, self.skill_tag, context);
        self.rng.chance(seed, chance)
    }

    pub fn succeeds(&self, chance: f64) -> bool {
        self.roll(SUCCESS_ROLL, chance)
    }

    pub fn critical(&self, chance: f64) -> bool {
        self.roll(CRITICAL_ROLL, chance)
    }

    pub fn drops(&self, reward_index: usize, chance: f64) -> bool {
        let context = DROP_ROLL_BASE.saturating_add(reward_index as u32);
        self.roll(context, chance)
    }
}

/// Success and critical outcome plus what the attempt pays out.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub success: bool,
    pub critical: bool,
    pub rewards: Vec<GrantedReward>,
    pub experience: BTreeMap<SkillId, u64>,
}

/// Which catalog rewards survived their drop roll, by reward index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Drops(Vec<bool>);

impl Drops {
    /// Rolls every reward that carries a drop chance, in catalog order.
    pub fn roll(action: &SkillAction, dice: &AttemptDice<'_>) -> Self {
        let kept = action
            .rewards
            .iter()
            .enumerate()
            .map(|(index, reward)| match reward.drop_chance {
                Some(chance) => dice.drops(index, chance),
                None => true,
            })
            .collect();
        Self(kept)
    }

    /// Keeps every reward, as if each drop roll passed.
    pub fn all(action: &SkillAction) -> Self {
        Self(vec![true; action.rewards.len()])
    }

    pub fn kept(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

/// Floors `amount`, rejecting anything below one (NaN included).
fn whole_amount(amount: f64) -> Option<u64> {
    let amount = amount.floor();
    if !(amount >= 1.0) {
        return None;
    }
    Some(if amount >= u64::MAX as f64 {
        u64::MAX
    } else {
        amount as u64
    })
}

/// Formula set shared by every skill, parameterized by its behavior.
#[derive(Clone, Copy)]
pub struct ActionResolver<'a> {
    config: &'a SkillConfig,
    behavior: &'a dyn SkillBehavior,
}

impl<'a> ActionResolver<'a> {
    pub fn new(config: &'a SkillConfig, behavior: &'a dyn SkillBehavior) -> Self {
        Self { config, behavior }
    }

    /// `floor(base * max(0.1, 1 - (level - 1) * scaling) * duration_modifier)`
    pub fn compute_duration(&self, scope: &ActionScope<'_>) -> u64 {
        let levels_gained = scope.level.saturating_sub(1) as f64;
        let level_factor = (1.0 - levels_gained * scope.action.level_scaling)
            .max(SkillConfig::MIN_DURATION_FACTOR);
        let modifier = self.behavior.duration_modifier(scope).max(0.0);
        let duration = (scope.action.base_duration_ms as f64 * level_factor * modifier).floor();
        if duration.is_finite() { duration as u64 } else { 0 }
    }

    /// `clamp(0.5 + min(0.4, (level - required) * 0.01), 0.05, 0.95) * success_modifier`
    pub fn compute_success_chance(&self, scope: &ActionScope<'_>) -> f64 {
        let level_diff = scope.level as f64 - scope.required_level as f64;
        let bonus = (level_diff * SkillConfig::SUCCESS_PER_LEVEL)
            .min(SkillConfig::MAX_LEVEL_SUCCESS_BONUS);
        let base = (SkillConfig::BASE_SUCCESS + bonus)
            .clamp(SkillConfig::MIN_SUCCESS, SkillConfig::MAX_SUCCESS);
        base * self.behavior.success_modifier(scope)
    }

    /// `clamp(0.05 + level * 0.001, 0, 0.25) * critical_modifier`
    pub fn compute_critical_chance(&self, scope: &ActionScope<'_>) -> f64 {
        let base = (SkillConfig::BASE_CRITICAL + scope.level as f64 * SkillConfig::CRITICAL_PER_LEVEL)
            .clamp(0.0, SkillConfig::MAX_CRITICAL);
        base * self.behavior.critical_modifier(scope)
    }

    /// Rewards other than the acting skill's own experience.
    ///
    /// Each reward kept by `drops` is critical-multiplied, passed through the
    /// reward hook, floored, and dropped unless positive.
    pub fn compute_rewards(
        &self,
        scope: &ActionScope<'_>,
        critical: bool,
        drops: &Drops,
    ) -> Vec<GrantedReward> {
        let mut granted = Vec::new();

        for (index, reward) in scope.action.rewards.iter().enumerate() {
            if reward.is_experience_for(scope.skill_id) || !drops.kept(index) {
                continue;
            }

            let mut amount = reward.amount as f64;
            if critical {
                amount *= self.config.critical_multiplier;
            }
            let amount = self.behavior.modify_reward_amount(scope, reward, amount);

            if let Some(amount) = whole_amount(amount) {
                granted.push(GrantedReward {
                    kind: reward.kind,
                    target: reward.target.clone(),
                    amount,
                });
            }
        }

        granted
    }

    /// Experience for the acting skill.
    ///
    /// Each own-skill experience reward kept by `drops` goes through the
    /// reward hook, then the overlevel penalty and critical multiplier, and is
    /// floored once.
    pub fn compute_experience(&self, scope: &ActionScope<'_>, critical: bool, drops: &Drops) -> u64 {
        let penalty_bp = (scope.levels_over_requirement() as u64
            * SkillConfig::OVERLEVEL_PENALTY_PER_LEVEL_BP)
            .min(SkillConfig::MAX_OVERLEVEL_PENALTY_BP);
        let kept_bp = (10_000 - penalty_bp) as f64;
        let multiplier = if critical {
            self.config.critical_multiplier
        } else {
            1.0
        };

        scope
            .action
            .rewards
            .iter()
            .enumerate()
            .filter(|(index, reward)| reward.is_experience_for(scope.skill_id) && drops.kept(*index))
            .filter_map(|(_, reward)| {
                let amount = self
                    .behavior
                    .modify_reward_amount(scope, reward, reward.amount as f64);
                whole_amount(amount * kept_bp * multiplier / 10_000.0)
            })
            .fold(0, u64::saturating_add)
    }

    /// Rolls success and critical, then computes the payout.
    ///
    /// The critical roll is only drawn after a success, and drop rolls only
    /// for rewards that carry a drop chance, in catalog order.
    pub fn resolve(&self, scope: &ActionScope<'_>, dice: &AttemptDice<'_>) -> Resolution {
        if !dice.succeeds(self.compute_success_chance(scope)) {
            return Resolution {
                success: false,
                critical: false,
                rewards: Vec::new(),
                experience: BTreeMap::new(),
            };
        }

        let critical = dice.critical(self.compute_critical_chance(scope));
        let drops = Drops::roll(scope.action, dice);
        let rewards = self.compute_rewards(scope, critical, &drops);

        let mut experience = BTreeMap::new();
        let gained = self.compute_experience(scope, critical, &drops);
        if gained > 0 {
            experience.insert(scope.skill_id.clone(), gained);
        }

        Resolution {
            success: true,
            critical,
            rewards,
            experience,
        }
    }
}
