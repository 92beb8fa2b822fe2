/// Quest log owned by the host.
pub trait QuestOracle: Send + Sync {
    fn has_completed_quest(&self, quest: &str) -> bool;
}
