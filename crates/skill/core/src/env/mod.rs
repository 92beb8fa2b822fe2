//! Traits describing collaborators owned by the host.
//!
//! The engine never owns economy, inventory, quest, or player data. It reaches
//! them through the narrow oracle traits here, bundled in a [`SkillEnv`] that
//! the host builds for each call. The random source is part of the same
//! bundle so every draw is injectable.
mod economy;
mod error;
mod inventory;
mod levels;
mod player;
mod quests;
mod rng;

pub use economy::EconomyOracle;
pub use error::OracleError;
pub use inventory::InventoryOracle;
pub use levels::{LevelTable, SkillLevels};
pub use player::PlayerOracle;
pub use quests::QuestOracle;
pub use rng::{PcgRng, RngOracle, ScriptedRng, compute_seed};

/// Aggregates host collaborators required by requirement checks and resolution.
#[derive(Clone, Copy)]
pub struct SkillEnv<'a> {
    economy: Option<&'a dyn EconomyOracle>,
    inventory: Option<&'a dyn InventoryOracle>,
    quests: Option<&'a dyn QuestOracle>,
    player: Option<&'a dyn PlayerOracle>,
    skill_levels: Option<&'a dyn SkillLevels>,
    rng: Option<&'a dyn RngOracle>,
    seed: u64,
}

impl<'a> SkillEnv<'a> {
    pub fn empty() -> Self {
        Self {
            economy: None,
            inventory: None,
            quests: None,
            player: None,
            skill_levels: None,
            rng: None,
            seed: 0,
        }
    }

    /// Environment with only a random source, enough for skills whose actions
    /// gate on their own level alone.
    pub fn with_rng(rng: &'a dyn RngOracle) -> Self {
        Self::empty().rng(rng)
    }

    #[must_use]
    pub fn economy(mut self, economy: &'a dyn EconomyOracle) -> Self {
        self.economy = Some(economy);
        self
    }

    #[must_use]
    pub fn inventory(mut self, inventory: &'a dyn InventoryOracle) -> Self {
        self.inventory = Some(inventory);
        self
    }

    #[must_use]
    pub fn quests(mut self, quests: &'a dyn QuestOracle) -> Self {
        self.quests = Some(quests);
        self
    }

    #[must_use]
    pub fn player(mut self, player: &'a dyn PlayerOracle) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn skill_levels(mut self, skill_levels: &'a dyn SkillLevels) -> Self {
        self.skill_levels = Some(skill_levels);
        self
    }

    #[must_use]
    pub fn rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = Some(rng);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Re-borrows this environment with a shorter-lived level table.
    pub fn with_skill_levels<'b>(&self, skill_levels: &'b dyn SkillLevels) -> SkillEnv<'b>
    where
        'a: 'b,
    {
        SkillEnv {
            economy: self.economy,
            inventory: self.inventory,
            quests: self.quests,
            player: self.player,
            skill_levels: Some(skill_levels),
            rng: self.rng,
            seed: self.seed,
        }
    }

    /// Returns the EconomyOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EconomyNotAvailable` if no economy oracle was provided.
    pub fn economy_oracle(&self) -> Result<&'a dyn EconomyOracle, OracleError> {
        self.economy.ok_or(OracleError::EconomyNotAvailable)
    }

    /// Returns the InventoryOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::InventoryNotAvailable` if no inventory oracle was provided.
    pub fn inventory_oracle(&self) -> Result<&'a dyn InventoryOracle, OracleError> {
        self.inventory.ok_or(OracleError::InventoryNotAvailable)
    }

    /// Returns the QuestOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::QuestsNotAvailable` if no quest oracle was provided.
    pub fn quest_oracle(&self) -> Result<&'a dyn QuestOracle, OracleError> {
        self.quests.ok_or(OracleError::QuestsNotAvailable)
    }

    /// Returns the PlayerOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::PlayerNotAvailable` if no player oracle was provided.
    pub fn player_oracle(&self) -> Result<&'a dyn PlayerOracle, OracleError> {
        self.player.ok_or(OracleError::PlayerNotAvailable)
    }

    /// Returns the cross-skill level lookup, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SkillLevelsNotAvailable` if no table was provided.
    pub fn skill_level_oracle(&self) -> Result<&'a dyn SkillLevels, OracleError> {
        self.skill_levels.ok_or(OracleError::SkillLevelsNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng_oracle(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    pub fn session_seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SkillEnv<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for SkillEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillEnv")
            .field("economy", &self.economy.is_some())
            .field("inventory", &self.inventory.is_some())
            .field("quests", &self.quests.is_some())
            .field("player", &self.player.is_some())
            .field("skill_levels", &self.skill_levels.is_some())
            .field("rng", &self.rng.is_some())
            .field("seed", &self.seed)
            .finish()
    }
}
