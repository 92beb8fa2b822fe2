//! Woodcutting: tool-driven speed and success, bonus logs, durability wear.

use skill_core::definition::exponential_requirement;
use skill_core::{
    ActionEffects, ActionReward, ActionScope, LevelingCurve, RewardKind, SkillBehavior, SkillEvent,
};

/// Skill id the woodcutting catalog is registered under.
pub const WOODCUTTING: &str = "woodcutting";

/// Behavior of the woodcutting skill.
///
/// - An equipped axe shortens chops by its speed bonus (capped at 90%) and
///   adds 1% success chance per point of power.
/// - Every 25 levels above an action's requirement yields one extra log.
/// - Each successful chop costs the axe one durability. When it reaches zero
///   the axe is dropped from the context and `tool:broken` is emitted; that
///   chop still pays out in full.
/// - Early levels follow a gentler curve than the definition's multiplier.
#[derive(Clone, Copy, Debug, Default)]
pub struct WoodcuttingBehavior;

impl WoodcuttingBehavior {
    pub const MAX_TOOL_SPEED_BONUS: f64 = 0.9;
    pub const SUCCESS_PER_TOOL_POWER: f64 = 0.01;
    pub const LEVELS_PER_BONUS_LOG: u32 = 25;
    /// Levels below this use [`EARLY_MULTIPLIER`](Self::EARLY_MULTIPLIER).
    pub const EARLY_LEVELS: u32 = 10;
    pub const EARLY_MULTIPLIER: f64 = 1.08;
    /// Counter incremented once per successful chop.
    pub const TREES_FELLED: &'static str = "trees_felled";

    fn is_log(reward: &ActionReward) -> bool {
        reward.kind == RewardKind::Item && reward.target.ends_with("_log")
    }
}

impl SkillBehavior for WoodcuttingBehavior {
    fn duration_modifier(&self, scope: &ActionScope<'_>) -> f64 {
        match &scope.context.tool {
            Some(tool) => 1.0 - tool.speed_bonus.clamp(0.0, Self::MAX_TOOL_SPEED_BONUS),
            None => 1.0,
        }
    }

    fn success_modifier(&self, scope: &ActionScope<'_>) -> f64 {
        match &scope.context.tool {
            Some(tool) => 1.0 + tool.power as f64 * Self::SUCCESS_PER_TOOL_POWER,
            None => 1.0,
        }
    }

    fn modify_reward_amount(&self, scope: &ActionScope<'_>, reward: &ActionReward, amount: f64) -> f64 {
        if !Self::is_log(reward) {
            return amount;
        }
        let bonus = scope.levels_over_requirement() / Self::LEVELS_PER_BONUS_LOG;
        amount + bonus as f64
    }

    fn apply_action_effects(&self, effects: &mut ActionEffects<'_>) {
        effects.increment(Self::TREES_FELLED, 1);

        let Some(tool) = effects.context.tool.as_mut() else {
            return;
        };
        tool.durability = tool.durability.saturating_sub(1);
        if tool.durability > 0 {
            return;
        }

        let tool_id = tool.id.clone();
        effects.context.tool = None;
        tracing::info!(skill = %effects.skill_id, tool = %tool_id, "tool broke");
        let skill_id = effects.skill_id.clone();
        effects.emit(SkillEvent::ToolBroken { skill_id, tool_id });
    }

    fn custom_experience_for_level(&self, curve: &LevelingCurve, level: u32) -> u64 {
        let early = exponential_requirement(
            curve.base_experience,
            Self::EARLY_MULTIPLIER,
            level.min(Self::EARLY_LEVELS),
        );
        if level <= Self::EARLY_LEVELS {
            early
        } else {
            exponential_requirement(early, curve.multiplier, level - Self::EARLY_LEVELS + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use skill_core::{ActionContext, EquippedTool, SkillAction, SkillId};

    fn chop() -> SkillAction {
        SkillAction::new("chop_oak", "Chop Oak", 2_000)
            .with_reward(ActionReward::item("oak_log", 1))
            .with_reward(ActionReward::item("bird_nest", 1))
    }

    fn scope<'a>(
        skill: &'a SkillId,
        action: &'a SkillAction,
        context: &'a ActionContext,
        level: u32,
    ) -> ActionScope<'a> {
        ActionScope {
            skill_id: skill,
            action,
            level,
            required_level: 1,
            context,
        }
    }

    #[test]
    fn axe_speeds_up_and_improves_success() {
        let skill = SkillId::from(WOODCUTTING);
        let action = chop();
        let context = ActionContext::new().with_tool(EquippedTool::new("steel_axe", 0.25, 10, 50));
        let scope = scope(&skill, &action, &context, 1);

        assert!((WoodcuttingBehavior.duration_modifier(&scope) - 0.75).abs() < 1e-12);
        assert!((WoodcuttingBehavior.success_modifier(&scope) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn speed_bonus_is_capped() {
        let skill = SkillId::from(WOODCUTTING);
        let action = chop();
        let context = ActionContext::new().with_tool(EquippedTool::new("dragon_axe", 3.0, 0, 50));
        let scope = scope(&skill, &action, &context, 1);
        assert!((WoodcuttingBehavior.duration_modifier(&scope) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn bonus_logs_every_25_levels_over() {
        let skill = SkillId::from(WOODCUTTING);
        let action = chop();
        let context = ActionContext::new();
        let log = &action.rewards[0];
        let nest = &action.rewards[1];

        let at_25 = scope(&skill, &action, &context, 25);
        assert_eq!(WoodcuttingBehavior.modify_reward_amount(&at_25, log, 1.0), 1.0);
        let at_26 = scope(&skill, &action, &context, 26);
        assert_eq!(WoodcuttingBehavior.modify_reward_amount(&at_26, log, 1.0), 2.0);
        let at_60 = scope(&skill, &action, &context, 60);
        assert_eq!(WoodcuttingBehavior.modify_reward_amount(&at_60, log, 2.0), 4.0);
        assert_eq!(WoodcuttingBehavior.modify_reward_amount(&at_60, nest, 1.0), 1.0);
    }

    #[test]
    fn early_curve_is_gentler() {
        let curve = LevelingCurve::custom(100, 1.12);
        assert_eq!(WoodcuttingBehavior.custom_experience_for_level(&curve, 1), 100);
        assert_eq!(WoodcuttingBehavior.custom_experience_for_level(&curve, 2), 108);
        let ten = WoodcuttingBehavior.custom_experience_for_level(&curve, 10);
        let eleven = WoodcuttingBehavior.custom_experience_for_level(&curve, 11);
        assert_eq!(eleven, (ten as f64 * 1.12).floor() as u64);
    }

    proptest! {
        #[test]
        fn custom_curve_never_decreases(level in 1u32..98) {
            let curve = LevelingCurve::custom(100, 1.12);
            let here = WoodcuttingBehavior.custom_experience_for_level(&curve, level);
            let next = WoodcuttingBehavior.custom_experience_for_level(&curve, level + 1);
            prop_assert!(here <= next);
        }
    }
}
