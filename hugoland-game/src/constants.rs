//! Centralized balance and tuning constants for Hugoland game logic.
//!
//! Keeping them together means gameplay can only be adjusted via code
//! changes reviewed in version control.

// Persistence ---------------------------------------------------------------
pub const STORAGE_KEY: &str = "hugoland-game-state";
pub(crate) const AUTO_SAVE_INTERVAL_SECS: i64 = 10;

// Starting state ------------------------------------------------------------
pub(crate) const START_COINS: u64 = 500;
pub(crate) const START_GEMS: u64 = 50;
pub(crate) const START_HP: u32 = 100;
pub(crate) const START_ATK: u32 = 20;
pub(crate) const START_DEF: u32 = 10;
/// Saves with a base attack below this predate the attack doubling.
pub(crate) const DOUBLED_ATK_THRESHOLD: u64 = 20;
pub(crate) const START_SURVIVAL_LIVES: u32 = 3;
pub(crate) const START_EXPERIENCE_TO_NEXT: u64 = 100;
pub(crate) const MAX_OFFLINE_HOURS: u32 = 24;

// Auction house -------------------------------------------------------------
pub const AUCTION_REFRESH_SECS: i64 = 5 * 60;
pub(crate) const AUCTION_MIN_LISTINGS: usize = 4;
/// Exclusive upper bound, so at most twelve listings per refresh.
pub(crate) const AUCTION_MAX_LISTINGS_EXCLUSIVE: usize = 13;
pub(crate) const AUCTION_PRICE_MULT_MIN: f64 = 1.5;
pub(crate) const AUCTION_PRICE_MULT_MAX: f64 = 3.0;
pub(crate) const AUCTION_MIN_HOURS: u32 = 1;
pub(crate) const AUCTION_MAX_HOURS: u32 = 24;
pub(crate) const AUCTION_SELLER_SUFFIX_MAX: u32 = 999;
pub const PLAYER_SELLER_NAME: &str = "You";
pub const PLAYER_LISTING_HOURS: u32 = 24;
pub(crate) const SUGGESTED_PRICE_FACTOR: u64 = 2;
pub(crate) const SELLER_NAMES: [&str; 8] = [
    "Adventurer",
    "Knight",
    "Mage",
    "Warrior",
    "Rogue",
    "Paladin",
    "Archer",
    "Wizard",
];

// Identifiers ---------------------------------------------------------------
pub(crate) const ID_LEN: usize = 9;
pub(crate) const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// Equipment -----------------------------------------------------------------
pub(crate) const WEAPON_UPGRADE_ATK: u32 = 10;
pub(crate) const ARMOR_UPGRADE_DEF: u32 = 5;
pub(crate) const UPGRADE_COST_GROWTH: f64 = 1.5;
pub(crate) const WEAPON_ATK_MULTIPLIER: u32 = 2;
pub(crate) const RESEARCH_BONUS_PER_LEVEL: u32 = 5;
pub(crate) const RESEARCH_COST_PER_LEVEL: u64 = 100;

// Mining --------------------------------------------------------------------
pub(crate) const SHINY_GEM_CHANCE: f64 = 0.05;
pub(crate) const SHINY_GEM_EXCHANGE_RATE: u64 = 10;

// Combat --------------------------------------------------------------------
pub(crate) const COMBAT_LOG_LIMIT: usize = 10;
pub(crate) const VICTORY_COIN_BASE: u64 = 10;
pub(crate) const VICTORY_COIN_PER_ZONE: u64 = 2;
pub(crate) const VICTORY_GEM_MIN: u64 = 1;
pub(crate) const VICTORY_GEM_MAX: u64 = 3;
pub(crate) const VICTORY_XP_BASE: u64 = 20;
pub(crate) const VICTORY_XP_PER_ZONE: u64 = 5;
pub(crate) const LEVEL_XP_GROWTH: f64 = 1.5;
pub(crate) const STREAK_MULTIPLIER_STEP: u32 = 5;
pub(crate) const STREAK_MULTIPLIER_CAP: u32 = 5;
pub(crate) const ENEMY_HP_BASE: u32 = 50;
pub(crate) const ENEMY_HP_PER_ZONE: u32 = 15;
pub(crate) const ENEMY_ATK_BASE: u32 = 8;
pub(crate) const ENEMY_ATK_PER_ZONE: u32 = 4;
pub(crate) const ENEMY_DEF_BASE: u32 = 2;
pub(crate) const ENEMY_DEF_PER_ZONE: u32 = 2;
