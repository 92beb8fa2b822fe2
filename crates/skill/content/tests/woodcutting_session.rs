//! End-to-end sessions against the bundled skill data.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use skill_content::{ContentFactory, WoodcuttingBehavior};
use skill_core::{
    ActionContext, ActionFailure, ActionId, EquippedTool, HostEvent, InventoryOracle, PlayerOracle,
    QuestOracle, ScriptedRng, SkillEnv, SkillEvent, SkillId, SkillRegistry, Timestamp,
};

#[derive(Default)]
struct Host {
    items: Mutex<Vec<(String, u64)>>,
    quests: Mutex<Vec<String>>,
    player_level: AtomicU32,
}

impl Host {
    fn give(&self, item: &str, amount: u64) {
        if let Ok(mut items) = self.items.lock() {
            items.push((item.to_owned(), amount));
        }
    }
    fn complete(&self, quest: &str) {
        if let Ok(mut quests) = self.quests.lock() {
            quests.push(quest.to_owned());
        }
    }
}

impl InventoryOracle for Host {
    fn has_item(&self, item: &str, amount: u64) -> bool {
        self.items.lock().is_ok_and(|items| {
            items
                .iter()
                .filter(|(id, _)| id == item)
                .map(|(_, n)| *n)
                .sum::<u64>()
                >= amount
        })
    }
}

impl QuestOracle for Host {
    fn has_completed_quest(&self, quest: &str) -> bool {
        self.quests.lock().is_ok_and(|quests| quests.iter().any(|q| q == quest))
    }
}

impl PlayerOracle for Host {
    fn player_level(&self) -> u32 {
        self.player_level.load(Ordering::SeqCst)
    }
}

fn registry() -> SkillRegistry {
    ContentFactory::embedded()
        .build_registry()
        .expect("bundled content loads")
}

fn woodcutting() -> SkillId {
    SkillId::from("woodcutting")
}

fn chop_oak() -> ActionId {
    ActionId::from("chop_oak")
}

fn raise_to(registry: &mut SkillRegistry, skill: &SkillId, level: u32) {
    let needed = registry
        .engine(skill)
        .map(|engine| engine.total_experience_for_level(level) - engine.state().total_experience())
        .expect("skill registered");
    registry.grant_experience(skill, needed).expect("grant");
}

#[test]
fn chop_oak_at_level_one() {
    let mut registry = registry();
    let rng = ScriptedRng::success_without_critical();
    let env = SkillEnv::with_rng(&rng);

    let started = registry
        .perform_action(&woodcutting(), &chop_oak(), ActionContext::new(), &env, Timestamp::ZERO)
        .expect("start");
    assert_eq!(started.duration_ms, 2_000);
    assert_eq!(started.ends_at, Timestamp(2_000));

    let results = registry.tick(Timestamp(2_000), &env);
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].experience_for(&woodcutting()), 25);
    assert_eq!(results[0].item_amount("oak_log"), 1);
    assert_eq!(results[0].item_amount("bird_nest"), 0);
}

#[test]
fn chop_oak_at_level_21_is_penalized() {
    let mut registry = registry();
    raise_to(&mut registry, &woodcutting(), 21);
    assert_eq!(registry.engine(&woodcutting()).map(|e| e.level()), Some(21));

    let rng = ScriptedRng::success_without_critical();
    let env = SkillEnv::with_rng(&rng);
    let started = registry
        .perform_action(&woodcutting(), &chop_oak(), ActionContext::new(), &env, Timestamp::ZERO)
        .expect("start");
    assert_eq!(started.duration_ms, 1_600);

    let results = registry.tick(Timestamp(1_600), &env);
    assert_eq!(results[0].experience_for(&woodcutting()), 15);
}

#[test]
fn critical_doubles_experience_and_logs() {
    let mut registry = registry();
    let rng = ScriptedRng::critical_success();
    let env = SkillEnv::with_rng(&rng);

    registry
        .perform_action(&woodcutting(), &chop_oak(), ActionContext::new(), &env, Timestamp::ZERO)
        .expect("start");
    let results = registry.tick(Timestamp(2_000), &env);
    assert!(results[0].is_critical());
    assert_eq!(results[0].crit_bonus, Some(2.0));
    assert_eq!(results[0].experience_for(&woodcutting()), 50);
    assert_eq!(results[0].item_amount("oak_log"), 2);
}

#[test]
fn axe_breaks_but_chop_pays_in_full() {
    let mut registry = registry();
    let rng = ScriptedRng::new(
        [ScriptedRng::PASS, ScriptedRng::FAIL, ScriptedRng::FAIL],
        ScriptedRng::FAIL,
    );
    let env = SkillEnv::with_rng(&rng);
    let axe = EquippedTool::new("bronze_axe", 0.5, 0, 1);

    let started = registry
        .perform_action(
            &woodcutting(),
            &chop_oak(),
            ActionContext::new().with_tool(axe).repeat(2),
            &env,
            Timestamp::ZERO,
        )
        .expect("start");
    assert_eq!(started.duration_ms, 1_000);

    let results = registry.tick(Timestamp(1_000), &env);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].experience_for(&woodcutting()), 25);

    let events = registry.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        SkillEvent::ToolBroken { tool_id, .. } if tool_id == "bronze_axe"
    )));

    let engine = registry.engine(&woodcutting()).expect("woodcutting");
    let repeat = engine.active_action().expect("second chop parked");
    assert!(repeat.context.tool.is_none());
    assert_eq!(repeat.duration_ms(), 2_000);
    assert_eq!(engine.state().counter(WoodcuttingBehavior::TREES_FELLED), 1);
}

#[test]
fn firemaking_unlocks_at_woodcutting_five() {
    let mut registry = registry();
    let firemaking = SkillId::from("firemaking");
    let host = Host::default();
    host.give("oak_log", 3);
    let rng = ScriptedRng::always(ScriptedRng::FAIL);
    let env = SkillEnv::with_rng(&rng).inventory(&host);

    assert_eq!(
        registry.perform_action(&firemaking, &"burn_oak".into(), ActionContext::new(), &env, Timestamp::ZERO),
        Err(ActionFailure::SkillLocked)
    );

    let almost = registry
        .engine(&woodcutting())
        .map(|engine| engine.total_experience_for_level(5) - 1)
        .expect("woodcutting");
    registry.grant_experience(&woodcutting(), almost).expect("grant");
    assert!(!registry.unlock_skill(&firemaking, &env));

    rng.push([ScriptedRng::PASS, ScriptedRng::FAIL]);
    registry
        .perform_action(&woodcutting(), &chop_oak(), ActionContext::new(), &env, Timestamp::ZERO)
        .expect("start");
    registry.tick(Timestamp(10_000), &env);

    assert!(registry.is_unlocked(&firemaking));
    assert!(registry.drain_events().iter().any(|event| matches!(
        event,
        SkillEvent::SkillUnlocked { skill_id } if skill_id == &firemaking
    )));

    rng.push([ScriptedRng::PASS, ScriptedRng::FAIL]);
    registry
        .perform_action(&firemaking, &"burn_oak".into(), ActionContext::new(), &env, Timestamp(10_000))
        .expect("burn");
    registry.tick(Timestamp(20_000), &env);
    assert_eq!(
        registry.engine(&firemaking).map(|engine| engine.state().experience()),
        Some(40)
    );
}

#[test]
fn fletching_needs_quest_and_player_level() {
    let mut registry = registry();
    let fletching = SkillId::from("fletching");
    let host = Host::default();
    let env = SkillEnv::empty().quests(&host).player(&host);

    host.complete("bowyers_apprentice");
    let quest = HostEvent::QuestCompleted {
        quest_id: "bowyers_apprentice".into(),
    };
    assert!(registry.handle_host_event(&quest, &env).is_empty());

    host.player_level.store(5, Ordering::SeqCst);
    let level_up = HostEvent::PlayerLevelUp { level: 5 };
    assert_eq!(registry.handle_host_event(&level_up, &env), vec![fletching.clone()]);
    assert!(registry.unlock_skill(&fletching, &env));
}

#[test]
fn magic_trees_need_the_elder_grove() {
    let mut registry = registry();
    raise_to(&mut registry, &woodcutting(), 75);
    let host = Host::default();
    let rng = ScriptedRng::success_without_critical();
    let env = SkillEnv::with_rng(&rng).quests(&host);
    let magic = ActionId::from("chop_magic");

    assert_eq!(
        registry.perform_action(&woodcutting(), &magic, ActionContext::new(), &env, Timestamp::ZERO),
        Err(ActionFailure::RequirementsNotMet)
    );

    host.complete("elder_grove");
    assert!(
        registry
            .perform_action(&woodcutting(), &magic, ActionContext::new(), &env, Timestamp::ZERO)
            .is_ok()
    );
}

#[test]
fn total_level_tracks_unlocked_skills() {
    let mut registry = registry();
    assert_eq!(registry.total_skill_level(), 1);
    raise_to(&mut registry, &woodcutting(), 5);
    registry.unlock_skill(&"firemaking".into(), &SkillEnv::empty());
    assert_eq!(registry.total_skill_level(), 6);
    assert_eq!(registry.highest_skill_level(), 5);
}
