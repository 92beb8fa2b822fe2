/// Player progression owned by the host, used by `player-level` requirements.
pub trait PlayerOracle: Send + Sync {
    fn player_level(&self) -> u32;
}
