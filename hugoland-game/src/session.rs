//! Single update queue: every player action and timer tick goes through [`GameSession`].
use chrono::{DateTime, TimeDelta, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::achievements::{
    Achievement, apply_achievement_unlocks, check_achievements, refresh_achievement_progress,
};
use crate::auction::{
    PurchaseReceipt, cancel_listing, expire_player_listings, format_countdown, list_item, purchase,
    refresh_pool,
};
use crate::combat::{AttackOutcome, Enemy, attack, start_combat};
use crate::constants::AUTO_SAVE_INTERVAL_SECS;
use crate::economy::{MiningYield, exchange_shiny_gems, mine_gem, upgrade_research};
use crate::equipment::{
    ChestReward, discard_item, equip_armor, equip_weapon, open_chest, sell_armor, sell_weapon,
    upgrade_armor, upgrade_weapon,
};
use crate::error::GameError;
use crate::items::{Equipment, ItemKind};
use crate::menu::{
    add_coins, add_gems, set_experience, set_game_mode, teleport_to_zone, toggle_cheat,
    update_settings,
};
use crate::state::{Cheat, GameModeKind, GameState, SettingsPatch};
use crate::tags::{PlayerTag, apply_tag_unlocks, check_player_tags};

/// A player intent, applied by [`GameSession::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    PurchaseAuctionItem { listing_id: String },
    ListItem { item_id: String, price: u64 },
    CancelListing { listing_id: String },
    EquipWeapon { id: String },
    EquipArmor { id: String },
    UpgradeWeapon { id: String },
    UpgradeArmor { id: String },
    SellWeapon { id: String },
    SellArmor { id: String },
    DiscardItem { id: String, kind: ItemKind },
    OpenChest { cost: u64 },
    StartCombat,
    Attack { hit: bool, category: String },
    MineGem,
    ExchangeShinyGems { amount: u64 },
    UpgradeResearch,
    UpdateSettings(SettingsPatch),
    SetGameMode { mode: GameModeKind },
    ToggleCheat { cheat: Cheat },
    AddCoins { amount: u64 },
    AddGems { amount: u64 },
    TeleportToZone { zone: u32 },
    SetExperience { experience: u64 },
    ResetGame,
}

/// Action-specific result data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    None,
    Purchased(PurchaseReceipt),
    Listed { listing_id: String },
    Cancelled { item_id: String },
    Upgraded(Equipment),
    Sold { coins: u64 },
    Chest(ChestReward),
    Encounter(Enemy),
    Attack(AttackOutcome),
    Mined(MiningYield),
    Exchanged { gems: u64 },
    Research { level: u32 },
    Cheat { enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub result: Result<ActionPayload, GameError>,
    pub achievements: Vec<Achievement>,
    pub tags: Vec<PlayerTag>,
}

impl ActionOutcome {
    fn rejected(err: GameError) -> Self {
        Self {
            result: Err(err),
            achievements: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// # Errors
    ///
    /// Returns the rejection reason of a failed action.
    pub fn into_result(self) -> Result<ActionPayload, GameError> {
        self.result
    }
}

/// What the one-second timer did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub refreshed: bool,
    pub expired_listings: Vec<String>,
    pub save_due: bool,
}

/// Position of a session's RNG stream, stored with each save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RngCursor {
    pub seed: u64,
    pub stream: u64,
    pub word_pos: u64,
}

impl RngCursor {
    #[must_use]
    pub fn capture(seed: u64, rng: &ChaCha20Rng) -> Self {
        Self {
            seed,
            stream: rng.get_stream(),
            word_pos: u64::try_from(rng.get_word_pos()).unwrap_or(u64::MAX),
        }
    }

    /// Rebuild the generator exactly where it was captured.
    #[must_use]
    pub fn restore(self) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(u128::from(self.word_pos));
        rng
    }
}

/// Generator for a save that carries no cursor. Stream 0 belongs to fresh games, so
/// resumes draw from a stream keyed on the load time.
#[must_use]
pub fn resume_rng(seed: u64, now: DateTime<Utc>) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let stream = u64::try_from(now.timestamp_millis()).unwrap_or_default().max(1);
    rng.set_stream(stream);
    rng
}

/// Owns the game state and its RNG stream.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    seed: u64,
    rng: ChaCha20Rng,
    last_save: DateTime<Utc>,
}

impl GameSession {
    /// Brand-new game seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = GameState::fresh(now, &mut rng);
        Self {
            state,
            seed,
            rng,
            last_save: now,
        }
    }

    /// Resume a loaded state. A saved cursor wins over `fallback`, which only serves
    /// saves written without one.
    #[must_use]
    pub fn from_state(state: GameState, fallback: ChaCha20Rng, seed: u64, now: DateTime<Utc>) -> Self {
        let (seed, rng) = match state.rng_cursor {
            Some(cursor) => (cursor.seed, cursor.restore()),
            None => (seed, fallback),
        };
        Self {
            state,
            seed,
            rng,
            last_save: now,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn with_state_mut<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut GameState) -> R,
    {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn rng_cursor(&self) -> RngCursor {
        RngCursor::capture(self.seed, &self.rng)
    }

    /// Reset the auto-save clock and stamp the state with the current RNG position.
    pub fn mark_saved(&mut self, now: DateTime<Utc>) {
        self.last_save = now;
        self.state.offline_progress.last_save_time = now;
        self.state.rng_cursor = Some(self.rng_cursor());
    }

    #[must_use]
    pub fn time_until_refresh(&self, now: DateTime<Utc>) -> TimeDelta {
        self.state.auction_house.time_until_refresh(now)
    }

    #[must_use]
    pub fn countdown(&self, now: DateTime<Utc>) -> String {
        format_countdown(self.time_until_refresh(now))
    }

    /// Apply one action, then evaluate achievements and tags if it succeeded.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> ActionOutcome {
        let payload = match self.apply(action, now) {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!("action rejected: {err}");
                return ActionOutcome::rejected(err);
            }
        };

        refresh_achievement_progress(&mut self.state);
        let achievements = check_achievements(&self.state, now);
        apply_achievement_unlocks(&mut self.state, &achievements);
        let tags = check_player_tags(&self.state, now);
        apply_tag_unlocks(&mut self.state, &tags);
        ActionOutcome {
            result: Ok(payload),
            achievements,
            tags,
        }
    }

    fn apply(&mut self, action: Action, now: DateTime<Utc>) -> Result<ActionPayload, GameError> {
        let state = &mut self.state;
        let rng = &mut self.rng;
        let payload = match action {
            Action::PurchaseAuctionItem { listing_id } => {
                ActionPayload::Purchased(purchase(state, &listing_id)?)
            }
            Action::ListItem { item_id, price } => ActionPayload::Listed {
                listing_id: list_item(state, &item_id, price, now, rng)?,
            },
            Action::CancelListing { listing_id } => ActionPayload::Cancelled {
                item_id: cancel_listing(state, &listing_id)?,
            },
            Action::EquipWeapon { id } => {
                equip_weapon(state, &id)?;
                ActionPayload::None
            }
            Action::EquipArmor { id } => {
                equip_armor(state, &id)?;
                ActionPayload::None
            }
            Action::UpgradeWeapon { id } => ActionPayload::Upgraded(upgrade_weapon(state, &id)?.into()),
            Action::UpgradeArmor { id } => ActionPayload::Upgraded(upgrade_armor(state, &id)?.into()),
            Action::SellWeapon { id } => ActionPayload::Sold {
                coins: sell_weapon(state, &id)?,
            },
            Action::SellArmor { id } => ActionPayload::Sold {
                coins: sell_armor(state, &id)?,
            },
            Action::DiscardItem { id, kind } => {
                discard_item(state, &id, kind)?;
                ActionPayload::None
            }
            Action::OpenChest { cost } => ActionPayload::Chest(open_chest(state, cost, rng)?),
            Action::StartCombat => ActionPayload::Encounter(start_combat(state, rng)?),
            Action::Attack { hit, category } => {
                ActionPayload::Attack(attack(state, hit, &category, rng)?)
            }
            Action::MineGem => ActionPayload::Mined(mine_gem(state, rng)),
            Action::ExchangeShinyGems { amount } => ActionPayload::Exchanged {
                gems: exchange_shiny_gems(state, amount)?,
            },
            Action::UpgradeResearch => ActionPayload::Research {
                level: upgrade_research(state)?,
            },
            Action::UpdateSettings(patch) => {
                update_settings(state, patch);
                ActionPayload::None
            }
            Action::SetGameMode { mode } => {
                set_game_mode(state, mode);
                ActionPayload::None
            }
            Action::ToggleCheat { cheat } => ActionPayload::Cheat {
                enabled: toggle_cheat(state, cheat),
            },
            Action::AddCoins { amount } => {
                add_coins(state, amount);
                ActionPayload::None
            }
            Action::AddGems { amount } => {
                add_gems(state, amount);
                ActionPayload::None
            }
            Action::TeleportToZone { zone } => {
                teleport_to_zone(state, zone)?;
                ActionPayload::None
            }
            Action::SetExperience { experience } => {
                set_experience(state, experience);
                ActionPayload::None
            }
            Action::ResetGame => {
                *state = GameState::fresh(now, rng);
                log::info!("game reset");
                ActionPayload::None
            }
        };
        Ok(payload)
    }

    /// One-second timer: refresh the auction pool when due and expire stale player listings.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let refreshed = self.state.auction_house.refresh_due(now);
        if refreshed {
            refresh_pool(&mut self.state, now, &mut self.rng);
        }
        let expired_listings = expire_player_listings(&mut self.state, now);
        TickReport {
            refreshed,
            expired_listings,
            save_due: self.save_due(now),
        }
    }

    #[must_use]
    pub fn save_due(&self, now: DateTime<Utc>) -> bool {
        now - self.last_save >= TimeDelta::seconds(AUTO_SAVE_INTERVAL_SECS)
    }
}
