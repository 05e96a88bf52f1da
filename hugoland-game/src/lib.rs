//! Hugoland Game Engine
//!
//! Platform-agnostic state engine for the Hugoland incremental RPG and trivia game.
//! This crate provides combat, items, the auction house, achievements and progression
//! without UI or platform-specific dependencies.

pub mod achievements;
pub mod auction;
pub mod combat;
pub mod constants;
pub mod economy;
pub mod equipment;
pub mod error;
pub mod items;
pub mod menu;
pub mod numbers;
pub mod session;
pub mod state;
pub mod storage;
pub mod tags;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rand_chacha::ChaCha20Rng;

// Re-export commonly used types
pub use achievements::{
    ACHIEVEMENT_DEFINITIONS, Achievement, AchievementReward, apply_achievement_unlocks,
    check_achievements, initialize_achievements, refresh_achievement_progress,
};
pub use auction::{
    AuctionHouse, AuctionItem, PurchaseReceipt, cancel_listing, expire_player_listings,
    format_countdown, generate_listings, list_item, purchase, suggested_price,
};
pub use combat::{AttackOutcome, Enemy, attack, generate_enemy, start_combat};
pub use constants::STORAGE_KEY;
pub use economy::{MiningYield, exchange_shiny_gems, mine_gem, research_cost, upgrade_research};
pub use equipment::{
    ChestReward, discard_item, equip_armor, equip_weapon, open_chest, sell_armor, sell_weapon,
    upgrade_armor, upgrade_weapon,
};
pub use error::{AuctionError, GameError, StorageError};
pub use items::{
    Armor, Equipment, ItemKind, Rarity, RarityWeights, Weapon, chest_rarity_weights,
    generate_armor, generate_equipment, generate_weapon,
};
pub use session::{
    Action, ActionOutcome, ActionPayload, GameSession, RngCursor, TickReport, resume_rng,
};
pub use state::{
    Cheat, GameModeKind, GameState, Inventory, PlayerStats, Settings, SettingsPatch,
    research_bonus,
};
pub use storage::{MemoryStorage, Migration, migrate};
pub use tags::{PlayerTag, TAG_DEFINITIONS, check_player_tags, initialize_player_tags};

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw JSON blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store a raw JSON blob under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_raw(&self, key: &str, json: &str) -> Result<(), Self::Error>;

    /// Delete whatever is stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete(&self, key: &str) -> Result<(), Self::Error>;
}

/// Main game engine for loading and saving game sessions
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine with the provided storage
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize and store the whole state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails. Failures are
    /// logged and not retried.
    pub fn save(&self, state: &GameState) -> anyhow::Result<()> {
        let result = serde_json::to_string(state)
            .map_err(StorageError::from)
            .context("serializing game state")
            .and_then(|json| {
                self.storage
                    .save_raw(STORAGE_KEY, &json)
                    .context("writing game state")
            });
        match &result {
            Ok(()) => log::debug!("game state saved"),
            Err(err) => log::error!("failed to save game state: {err:#}"),
        }
        result
    }

    /// Save a session and reset its auto-save clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the save fails. The clock is reset either way, so a failed
    /// save waits for the next interval.
    pub fn save_session(&self, session: &mut GameSession, now: DateTime<Utc>) -> anyhow::Result<()> {
        session.mark_saved(now);
        self.save(session.state())
    }

    /// Load and migrate the stored state, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be read, parsed or migrated.
    pub fn try_load(
        &self,
        now: DateTime<Utc>,
        rng: &mut ChaCha20Rng,
    ) -> anyhow::Result<Option<GameState>> {
        let Some(raw) = self
            .storage
            .load_raw(STORAGE_KEY)
            .context("reading saved game")?
        else {
            return Ok(None);
        };
        let mut value: serde_json::Value =
            serde_json::from_str(&raw).context("parsing saved game")?;
        migrate(&mut value, now, rng).context("migrating saved game")?;
        let state = serde_json::from_value(value).context("decoding saved game")?;
        Ok(Some(state))
    }

    /// Resume the stored game, or start a fresh one when nothing usable is stored.
    ///
    /// A resumed game continues the RNG stream recorded in its save, so a restart never
    /// replays draws the game already made.
    pub fn load_or_new(&self, seed: u64, now: DateTime<Utc>) -> GameSession {
        let mut rng = resume_rng(seed, now);
        match self.try_load(now, &mut rng) {
            Ok(Some(state)) => {
                log::info!("loaded saved game at zone {}", state.zone);
                GameSession::from_state(state, rng, seed, now)
            }
            Ok(None) => {
                log::info!("no saved game, starting fresh");
                GameSession::new(seed, now)
            }
            Err(err) => {
                log::error!("saved game unusable, starting fresh: {err:#}");
                GameSession::new(seed, now)
            }
        }
    }

    /// Remove the stored game.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage delete fails.
    pub fn delete_save(&self) -> Result<(), S::Error> {
        self.storage.delete(STORAGE_KEY)
    }
}
