//! Auction house: a public pool of generated listings plus the player's own listings.
//!
//! The public pool is thrown away and regenerated on a fixed five-minute cadence.
//! Player listings survive refreshes and leave only by cancellation or expiry.
//! Every operation validates before it mutates, so a rejected call leaves the
//! state exactly as it was.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AUCTION_MAX_HOURS, AUCTION_MAX_LISTINGS_EXCLUSIVE, AUCTION_MIN_HOURS, AUCTION_MIN_LISTINGS,
    AUCTION_PRICE_MULT_MAX, AUCTION_PRICE_MULT_MIN, AUCTION_REFRESH_SECS,
    AUCTION_SELLER_SUFFIX_MAX, PLAYER_LISTING_HOURS, PLAYER_SELLER_NAME, SELLER_NAMES,
    SUGGESTED_PRICE_FACTOR,
};
use crate::error::AuctionError;
use crate::items::{Equipment, ItemKind, generate_equipment, generate_id};
use crate::numbers::scale_floor;
use crate::state::GameState;

/// Time between two public pool refreshes.
#[must_use]
pub fn refresh_interval() -> TimeDelta {
    TimeDelta::seconds(AUCTION_REFRESH_SECS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItem {
    pub id: String,
    pub item: Equipment,
    pub price: u64,
    pub seller: String,
    /// Hours left on the listing as shown to the player.
    pub time_remaining: u32,
    pub listed_at: DateTime<Utc>,
}

impl AuctionItem {
    /// When the listing runs out, measured from `listed_at`.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.listed_at + TimeDelta::hours(i64::from(self.time_remaining))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionHouse {
    pub items: Vec<AuctionItem>,
    pub last_refresh: DateTime<Utc>,
    pub next_refresh: DateTime<Utc>,
    #[serde(default)]
    pub player_listings: Vec<AuctionItem>,
}

impl AuctionHouse {
    /// No listings, first refresh one interval from `now`.
    #[must_use]
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            items: Vec::new(),
            last_refresh: now,
            next_refresh: now + refresh_interval(),
            player_listings: Vec::new(),
        }
    }

    pub fn generated(now: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        Self {
            items: generate_listings(now, rng),
            ..Self::empty(now)
        }
    }

    #[must_use]
    pub fn refresh_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_refresh
    }

    /// Replace the public pool wholesale. Player listings are untouched.
    pub fn refresh(&mut self, now: DateTime<Utc>, rng: &mut impl Rng) {
        let mut fresh = generate_listings(now, rng);
        for listing in &mut fresh {
            while self.player_listings.iter().any(|p| p.id == listing.id) {
                listing.id = generate_id(rng);
            }
        }
        log::debug!(
            "auction pool refreshed: {} listings replaced by {}",
            self.items.len(),
            fresh.len()
        );
        self.items = fresh;
        self.last_refresh = now;
        self.next_refresh = now + refresh_interval();
    }

    /// Time left before the next refresh, never negative.
    #[must_use]
    pub fn time_until_refresh(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.next_refresh - now).max(TimeDelta::zero())
    }

    #[must_use]
    pub fn find_listing(&self, listing_id: &str) -> Option<&AuctionItem> {
        self.items.iter().find(|l| l.id == listing_id)
    }

    #[must_use]
    pub fn find_player_listing(&self, listing_id: &str) -> Option<&AuctionItem> {
        self.player_listings.iter().find(|l| l.id == listing_id)
    }

    fn id_taken(&self, id: &str) -> bool {
        self.items.iter().chain(&self.player_listings).any(|l| l.id == id)
    }
}

/// Render a countdown as `mm:ss`.
#[must_use]
pub fn format_countdown(remaining: TimeDelta) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Between four and twelve random listings priced off each item's sell price.
pub fn generate_listings(now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<AuctionItem> {
    let count = rng.gen_range(AUCTION_MIN_LISTINGS..AUCTION_MAX_LISTINGS_EXCLUSIVE);
    (0..count).map(|_| generate_listing(now, rng)).collect()
}

fn generate_listing(now: DateTime<Utc>, rng: &mut impl Rng) -> AuctionItem {
    let item = generate_equipment(rng);
    let multiplier = rng.gen_range(AUCTION_PRICE_MULT_MIN..AUCTION_PRICE_MULT_MAX);
    let price = scale_floor(item.sell_price(), multiplier);
    let time_remaining = rng.gen_range(AUCTION_MIN_HOURS..=AUCTION_MAX_HOURS);
    let seller = format!(
        "{}{}",
        SELLER_NAMES[rng.gen_range(0..SELLER_NAMES.len())],
        rng.gen_range(0..AUCTION_SELLER_SUFFIX_MAX)
    );
    AuctionItem {
        id: generate_id(rng),
        item,
        price,
        seller,
        time_remaining,
        listed_at: now,
    }
}

/// Asking price hint shown when listing an item.
#[must_use]
pub const fn suggested_price(item: &Equipment) -> u64 {
    item.sell_price().saturating_mul(SUGGESTED_PRICE_FACTOR)
}

/// What a successful purchase moved into the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub listing_id: String,
    pub item_id: String,
    pub kind: ItemKind,
    pub price: u64,
}

/// Buy a public listing, moving its item into the inventory.
///
/// # Errors
///
/// Returns [`AuctionError::ListingNotFound`] if the id is not in the public pool and
/// [`AuctionError::InsufficientCoins`] if the player cannot pay.
pub fn purchase(state: &mut GameState, listing_id: &str) -> Result<PurchaseReceipt, AuctionError> {
    let listing = state
        .auction_house
        .find_listing(listing_id)
        .ok_or_else(|| AuctionError::ListingNotFound(listing_id.to_string()))?;
    if !state.can_afford_coins(listing.price) {
        return Err(AuctionError::InsufficientCoins {
            price: listing.price,
            coins: state.coins,
        });
    }

    let pos = state
        .auction_house
        .items
        .iter()
        .position(|l| l.id == listing_id)
        .ok_or_else(|| AuctionError::ListingNotFound(listing_id.to_string()))?;
    let listing = state.auction_house.items.remove(pos);
    let receipt = PurchaseReceipt {
        listing_id: listing.id,
        item_id: listing.item.id().to_string(),
        kind: listing.item.kind(),
        price: listing.price,
    };
    state.spend_coins(listing.price);
    state.collection_book.record(&listing.item);
    state.inventory.insert(listing.item);
    state.statistics.auction_purchases += 1;
    state.statistics.auction_transactions += 1;
    log::debug!(
        "bought {} {} for {} coins",
        receipt.kind,
        receipt.item_id,
        receipt.price
    );
    Ok(receipt)
}

/// List an owned item for sale. Returns the new listing id.
///
/// # Errors
///
/// Returns [`AuctionError::InvalidPrice`] for a zero price and
/// [`AuctionError::NotInInventory`] if the player does not own the item.
pub fn list_item(
    state: &mut GameState,
    item_id: &str,
    price: u64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<String, AuctionError> {
    if price == 0 {
        return Err(AuctionError::InvalidPrice);
    }
    let (item, was_equipped) = state
        .inventory
        .take(item_id)
        .ok_or_else(|| AuctionError::NotInInventory(item_id.to_string()))?;
    if was_equipped {
        state.refresh_unequipped(item.kind());
    }

    let mut id = generate_id(rng);
    while state.auction_house.id_taken(&id) {
        id = generate_id(rng);
    }
    state.auction_house.player_listings.push(AuctionItem {
        id: id.clone(),
        item,
        price,
        seller: PLAYER_SELLER_NAME.to_string(),
        time_remaining: PLAYER_LISTING_HOURS,
        listed_at: now,
    });
    state.statistics.auction_transactions += 1;
    Ok(id)
}

/// Withdraw a player listing and return its item to the inventory.
///
/// # Errors
///
/// Returns [`AuctionError::ListingNotFound`] if the player has no listing with this id.
pub fn cancel_listing(state: &mut GameState, listing_id: &str) -> Result<String, AuctionError> {
    let pos = state
        .auction_house
        .player_listings
        .iter()
        .position(|l| l.id == listing_id)
        .ok_or_else(|| AuctionError::ListingNotFound(listing_id.to_string()))?;
    let listing = state.auction_house.player_listings.remove(pos);
    let item_id = listing.item.id().to_string();
    state.inventory.insert(listing.item);
    Ok(item_id)
}

/// Refresh the public pool, re-rolling any fresh item id the player already holds.
pub fn refresh_pool(state: &mut GameState, now: DateTime<Utc>, rng: &mut impl Rng) {
    state.auction_house.refresh(now, rng);
    let mut fresh = std::mem::take(&mut state.auction_house.items);
    for listing in &mut fresh {
        listing.item.reroll_id_clashes(state, rng);
    }
    state.auction_house.items = fresh;
}

/// Return every run-out player listing to the inventory. Returns the expired listing ids.
pub fn expire_player_listings(state: &mut GameState, now: DateTime<Utc>) -> Vec<String> {
    let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut state.auction_house.player_listings)
        .into_iter()
        .partition(|l| now >= l.expires_at());
    state.auction_house.player_listings = active;
    expired
        .into_iter()
        .map(|listing| {
            log::info!("listing {} expired unsold", listing.id);
            state.inventory.insert(listing.item);
            listing.id
        })
        .collect()
}
