//! Error taxonomy for game actions and persistence.

use thiserror::Error;

use crate::items::ItemKind;

/// Reasons an auction house operation can be rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuctionError {
    #[error("auction listing {0} not found")]
    ListingNotFound(String),
    #[error("not enough coins: listing costs {price}, you have {coins}")]
    InsufficientCoins { price: u64, coins: u64 },
    #[error("item {0} is not in your inventory")]
    NotInInventory(String),
    #[error("listing price must be a positive number of coins")]
    InvalidPrice,
}

/// Reasons a player action can be rejected. A rejected action leaves state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{kind} {id} not found in inventory")]
    ItemNotFound { kind: ItemKind, id: String },
    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },
    #[error("not enough gems: need {needed}, have {available}")]
    InsufficientGems { needed: u64, available: u64 },
    #[error("not enough shiny gems: need {needed}, have {available}")]
    InsufficientShinyGems { needed: u64, available: u64 },
    #[error("there is no enemy to attack")]
    NotInCombat,
    #[error("already fighting {0}")]
    AlreadyInCombat(String),
    #[error("zone must be at least 1")]
    InvalidZone,
    #[error(transparent)]
    Auction(#[from] AuctionError),
}

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save data could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("save migration failed: {0}")]
    Migration(String),
}
