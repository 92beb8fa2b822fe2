//! Requirement evaluation against the acting skill and host collaborators.

use crate::definition::{ActionRequirement, RequirementKind};
use crate::env::SkillEnv;
use crate::ids::SkillId;

/// The skill a requirement is evaluated for, if any.
///
/// Level requirements naming `skill_id` are answered from `level` directly;
/// every other skill is looked up through the environment's level table.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'a> {
    pub skill_id: &'a SkillId,
    pub level: u32,
}

/// True if `requirement` currently holds.
///
/// A collaborator missing from `env` makes its requirement unmet.
pub fn requirement_met(
    requirement: &ActionRequirement,
    subject: Option<Subject<'_>>,
    env: &SkillEnv<'_>,
) -> bool {
    match requirement.kind {
        RequirementKind::SkillLevel => {
            let own = subject
                .filter(|subject| subject.skill_id == requirement.target.as_str())
                .map(|subject| subject.level);
            let level = match own {
                Some(level) => Some(level),
                None => env
                    .skill_level_oracle()
                    .ok()
                    .and_then(|levels| levels.level_of(&requirement.target)),
            };
            level.is_some_and(|level| level as u64 >= requirement.amount)
        }
        RequirementKind::PlayerLevel => env
            .player_oracle()
            .is_ok_and(|player| player.player_level() as u64 >= requirement.amount),
        RequirementKind::Item => env
            .inventory_oracle()
            .is_ok_and(|inventory| inventory.has_item(&requirement.target, requirement.amount)),
        RequirementKind::Gold => {
            requirement.amount == 0
                || env
                    .economy_oracle()
                    .is_ok_and(|economy| economy.has_gold(requirement.amount))
        }
        RequirementKind::Quest => env
            .quest_oracle()
            .is_ok_and(|quests| quests.has_completed_quest(&requirement.target)),
    }
}

/// True if every requirement holds.
pub fn requirements_met(
    requirements: &[ActionRequirement],
    subject: Option<Subject<'_>>,
    env: &SkillEnv<'_>,
) -> bool {
    requirements
        .iter()
        .all(|requirement| requirement_met(requirement, subject, env))
}

/// Total gold the requirements debit when an action starts.
pub fn gold_cost(requirements: &[ActionRequirement]) -> u64 {
    requirements
        .iter()
        .filter(|requirement| requirement.kind == RequirementKind::Gold)
        .map(|requirement| requirement.amount)
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{LevelTable, PlayerOracle, QuestOracle};

    struct Player(u32);

    impl PlayerOracle for Player {
        fn player_level(&self) -> u32 {
            self.0
        }
    }

    struct Quests(&'static [&'static str]);

    impl QuestOracle for Quests {
        fn has_completed_quest(&self, quest: &str) -> bool {
            self.0.contains(&quest)
        }
    }

    #[test]
    fn own_level_wins_over_table() {
        let skill = SkillId::from("woodcutting");
        let table: LevelTable = [(skill.clone(), 1)].into_iter().collect();
        let env = SkillEnv::empty().skill_levels(&table);
        let requirement = ActionRequirement::skill_level("woodcutting", 10);
        let subject = Subject {
            skill_id: &skill,
            level: 10,
        };
        assert!(requirement_met(&requirement, Some(subject), &env));
        assert!(!requirement_met(&requirement, None, &env));
    }

    #[test]
    fn other_skill_levels_come_from_table() {
        let table: LevelTable = [(SkillId::from("woodcutting"), 5)].into_iter().collect();
        let env = SkillEnv::empty().skill_levels(&table);
        assert!(requirement_met(
            &ActionRequirement::skill_level("woodcutting", 5),
            None,
            &env
        ));
        assert!(!requirement_met(
            &ActionRequirement::skill_level("fishing", 1),
            None,
            &env
        ));
    }

    #[test]
    fn missing_collaborators_fail_closed() {
        let env = SkillEnv::empty();
        assert!(!requirement_met(&ActionRequirement::player_level(1), None, &env));
        assert!(!requirement_met(&ActionRequirement::quest("intro"), None, &env));
        assert!(!requirement_met(&ActionRequirement::item("axe", 1), None, &env));
        assert!(!requirement_met(&ActionRequirement::gold(5), None, &env));
        assert!(requirement_met(&ActionRequirement::gold(0), None, &env));
    }

    #[test]
    fn player_and_quest_requirements() {
        let player = Player(7);
        let quests = Quests(&["bowyers_apprentice"]);
        let env = SkillEnv::empty().player(&player).quests(&quests);
        assert!(requirements_met(
            &[
                ActionRequirement::player_level(5),
                ActionRequirement::quest("bowyers_apprentice"),
            ],
            None,
            &env
        ));
        assert!(!requirement_met(&ActionRequirement::player_level(8), None, &env));
    }

    #[test]
    fn gold_cost_sums_gold_requirements() {
        let requirements = [
            ActionRequirement::gold(10),
            ActionRequirement::skill_level("woodcutting", 3),
            ActionRequirement::gold(5),
        ];
        assert_eq!(gold_cost(&requirements), 15);
    }
}
