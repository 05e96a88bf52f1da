//! Save blob migrations and the built-in in-memory storage.
use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::GameStorage;
use crate::auction::AuctionHouse;
use crate::constants::DOUBLED_ATK_THRESHOLD;
use crate::error::StorageError;

/// A fixup applied to an older save before it is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// The save predates the auction house.
    BackfillAuctionHouse,
    /// The save predates the doubled starting attack.
    DoubleBaseAttack,
}

/// Run every migration step, in order, over a parsed save. Returns the steps that applied.
///
/// # Errors
///
/// Returns [`StorageError::Migration`] if the save is not a JSON object or a step
/// cannot build its replacement data.
pub fn migrate(
    value: &mut Value,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<Vec<Migration>, StorageError> {
    let root = value
        .as_object_mut()
        .ok_or_else(|| StorageError::Migration("save root is not an object".to_string()))?;

    let mut applied = Vec::new();
    if backfill_auction_house(root, now, rng)? {
        applied.push(Migration::BackfillAuctionHouse);
    }
    if double_base_attack(root)? {
        applied.push(Migration::DoubleBaseAttack);
    }
    for step in &applied {
        log::info!("applied save migration {step:?}");
    }
    Ok(applied)
}

fn backfill_auction_house(
    root: &mut Map<String, Value>,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<bool, StorageError> {
    if root.get("auctionHouse").is_some_and(|v| !v.is_null()) {
        return Ok(false);
    }
    let house = serde_json::to_value(AuctionHouse::generated(now, rng))?;
    root.insert("auctionHouse".to_string(), house);
    Ok(true)
}

fn double_base_attack(root: &mut Map<String, Value>) -> Result<bool, StorageError> {
    let Some(stats) = root.get_mut("playerStats").and_then(Value::as_object_mut) else {
        return Ok(false);
    };
    let Some(base_atk) = stats.get("baseAtk").and_then(Value::as_u64) else {
        return Ok(false);
    };
    if base_atk >= DOUBLED_ATK_THRESHOLD {
        return Ok(false);
    }
    let atk = stats.get("atk").and_then(Value::as_u64).unwrap_or(base_atk);
    let doubled = atk
        .checked_mul(2)
        .ok_or_else(|| StorageError::Migration(format!("attack {atk} cannot be doubled")))?;
    stats.insert("baseAtk".to_string(), Value::from(base_atk * 2));
    stats.insert("atk".to_string(), Value::from(doubled));
    Ok(true)
}

/// Keeps save blobs in a shared map. Clones see the same saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn load_raw(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.saves.borrow().get(key).cloned())
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<(), Self::Error> {
        self.saves
            .borrow_mut()
            .insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.saves.borrow_mut().remove(key);
        Ok(())
    }
}
