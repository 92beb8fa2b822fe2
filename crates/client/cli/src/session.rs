//! Scripted idle session: chop a few trees, show what happens, save.

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;

use runtime::{RuntimeEvent, RuntimeHandle, SkillSummary};
use skill_content::WOODCUTTING;
use skill_core::{ActionContext, EquippedTool, SkillEvent};

use crate::config::CliConfig;

pub async fn run(handle: &RuntimeHandle, config: &CliConfig) -> Result<()> {
    let mut events = handle.subscribe();

    let axe = EquippedTool::new("bronze_axe", 0.1, 2, 3);
    let context = ActionContext::new().with_tool(axe).repeat(config.chops);
    let started = handle
        .perform_action(WOODCUTTING, "chop_oak", context)
        .await
        .context("failed to start chopping")?;
    println!(
        "Chopping oak {} time(s), {} ms per attempt",
        config.chops, started.duration_ms
    );

    let mut resolved = 0;
    while resolved < config.chops {
        match events.recv().await {
            Ok(event) => {
                if matches!(event, RuntimeEvent::ActionResolved(_)) {
                    resolved += 1;
                }
                render(&event);
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream lagged");
            }
            Err(RecvError::Closed) => break,
        }
        let idle = handle
            .query_skill(WOODCUTTING)
            .await?
            .is_some_and(|skill| !skill.busy);
        if idle && resolved > 0 {
            break;
        }
    }

    println!();
    for skill in handle.list_skills().await? {
        println!("{}", summary_line(&skill));
    }
    println!(
        "Inventory: {} oak log(s), {} gold",
        handle.item_count("oak_log").await?,
        handle.gold().await?
    );

    handle
        .save(config.save_slot.clone())
        .await
        .with_context(|| format!("failed to save slot {}", config.save_slot))?;
    Ok(())
}

fn render(event: &RuntimeEvent) {
    match event {
        RuntimeEvent::Skill(SkillEvent::LevelUp { skill_id, new_level }) => {
            println!("  * {skill_id} reached level {new_level}");
        }
        RuntimeEvent::Skill(SkillEvent::ActionUnlocked {
            skill_id,
            action_id,
        }) => println!("  * {skill_id} unlocked {action_id}"),
        RuntimeEvent::Skill(SkillEvent::SkillUnlocked { skill_id }) => {
            println!("  * new skill available: {skill_id}");
        }
        RuntimeEvent::Skill(SkillEvent::ToolBroken { tool_id, .. }) => {
            println!("  * your {tool_id} broke");
        }
        RuntimeEvent::ActionResolved(result) if result.success => {
            let critical = if result.is_critical() { " (critical!)" } else { "" };
            println!(
                "  {} succeeded{}: +{} xp, {} log(s)",
                result.action_id,
                critical,
                result.experience_for(&result.skill_id),
                result.item_amount("oak_log"),
            );
        }
        RuntimeEvent::ActionResolved(result) => {
            println!("  {} failed", result.action_id);
        }
        RuntimeEvent::Saved { slot, at } => println!("  saved to {slot} at {at}"),
        other => tracing::debug!(topic = other.topic(), "event"),
    }
}

fn summary_line(skill: &SkillSummary) -> String {
    let lock = if skill.unlocked { "" } else { " [locked]" };
    format!(
        "{:<12} level {:>2}  {:>5}/{:<5} xp  {:>5.1}%  {} action(s){}",
        skill.name,
        skill.level,
        skill.experience,
        skill.experience_to_next,
        skill.progress * 100.0,
        skill.statistics.actions_completed,
        lock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::{SkillId, SkillStatistics};

    #[test]
    fn summary_marks_locked_skills() {
        let skill = SkillSummary {
            id: SkillId::from("firemaking"),
            name: "Firemaking".into(),
            level: 1,
            experience: 0,
            experience_to_next: 120,
            progress: 0.0,
            unlocked: false,
            busy: false,
            remaining_ms: None,
            statistics: SkillStatistics::default(),
        };
        let line = summary_line(&skill);
        assert!(line.starts_with("Firemaking"));
        assert!(line.ends_with("[locked]"));
    }
}
