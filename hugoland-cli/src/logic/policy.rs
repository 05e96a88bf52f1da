use std::fmt;

use clap::ValueEnum;
use hugoland_game::{Action, Equipment, GameState, ItemKind, research_cost, suggested_price};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Chest tier automated players buy when they have spare coins.
const BOT_CHEST_COST: u64 = 100;
/// Inventory size past which traders stop buying and start listing.
const TRADER_STOCK_LIMIT: usize = 6;
/// Trivia accuracy of the automated player.
const BOT_ACCURACY: f64 = 0.8;

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next action for the current state.
    fn next_action(&mut self, state: &GameState) -> Action;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameplayStrategy {
    /// Fight, gear up and upgrade
    Grinder,
    /// Work the auction house
    Trader,
    /// Mostly fight, trade every fourth action
    Balanced,
}

impl GameplayStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grinder => "Grinder",
            Self::Trader => "Trader",
            Self::Balanced => "Balanced",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Grinder => Box::new(GrinderPolicy::new(seed)),
            Self::Trader => Box::new(TraderPolicy),
            Self::Balanced => Box::new(BalancedPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct GrinderPolicy {
    rng: ChaCha20Rng,
}

impl GrinderPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct TraderPolicy;

struct BalancedPolicy {
    grinder: GrinderPolicy,
    trader: TraderPolicy,
    turn: u64,
}

impl BalancedPolicy {
    fn new(seed: u64) -> Self {
        Self {
            grinder: GrinderPolicy::new(seed),
            trader: TraderPolicy,
            turn: 0,
        }
    }
}

impl PlayerPolicy for GrinderPolicy {
    fn name(&self) -> &'static str {
        "Grinder"
    }

    fn next_action(&mut self, state: &GameState) -> Action {
        if state.in_combat {
            return Action::Attack {
                hit: self.rng.gen_bool(BOT_ACCURACY),
                category: "general".to_string(),
            };
        }
        if let Some(action) = gear_up(state) {
            return action;
        }
        if let Some(weapon) = &state.inventory.current_weapon
            && state.gems >= weapon.upgrade_cost
        {
            return Action::UpgradeWeapon {
                id: weapon.id.clone(),
            };
        }
        if state.coins >= research_cost(state.research.level) * 2 {
            return Action::UpgradeResearch;
        }
        if state.inventory.is_empty() && state.coins >= BOT_CHEST_COST {
            return Action::OpenChest {
                cost: BOT_CHEST_COST,
            };
        }
        Action::StartCombat
    }
}

impl PlayerPolicy for TraderPolicy {
    fn name(&self) -> &'static str {
        "Trader"
    }

    fn next_action(&mut self, state: &GameState) -> Action {
        if state.inventory.len() < TRADER_STOCK_LIMIT
            && let Some(listing) = state
                .auction_house
                .items
                .iter()
                .filter(|l| l.price <= state.coins)
                .min_by_key(|l| l.price)
        {
            return Action::PurchaseAuctionItem {
                listing_id: listing.id.clone(),
            };
        }
        if let Some((id, kind)) = surplus_item(state) {
            let item: Option<Equipment> = match kind {
                ItemKind::Weapon => state.inventory.find_weapon(id).cloned().map(Into::into),
                ItemKind::Armor => state.inventory.find_armor(id).cloned().map(Into::into),
            };
            if let Some(item) = item {
                return Action::ListItem {
                    item_id: id.to_string(),
                    price: suggested_price(&item),
                };
            }
        }
        Action::MineGem
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn next_action(&mut self, state: &GameState) -> Action {
        self.turn += 1;
        if !state.in_combat && self.turn % 4 == 0 {
            self.trader.next_action(state)
        } else {
            self.grinder.next_action(state)
        }
    }
}

/// Equip the strongest owned piece when it beats what is worn.
fn gear_up(state: &GameState) -> Option<Action> {
    let inventory = &state.inventory;
    let worn_atk = inventory.current_weapon.as_ref().map_or(0, |w| w.base_atk);
    if let Some(best) = inventory.weapons.iter().max_by_key(|w| w.base_atk)
        && (inventory.current_weapon.is_none() || best.base_atk > worn_atk)
    {
        return Some(Action::EquipWeapon {
            id: best.id.clone(),
        });
    }
    let worn_def = inventory.current_armor.as_ref().map_or(0, |a| a.base_def);
    if let Some(best) = inventory.armor.iter().max_by_key(|a| a.base_def)
        && (inventory.current_armor.is_none() || best.base_def > worn_def)
    {
        return Some(Action::EquipArmor {
            id: best.id.clone(),
        });
    }
    None
}

/// First owned item that is not currently worn.
fn surplus_item(state: &GameState) -> Option<(&str, ItemKind)> {
    let inventory = &state.inventory;
    let worn = |id: &str| {
        inventory.current_weapon.as_ref().is_some_and(|w| w.id == id)
            || inventory.current_armor.as_ref().is_some_and(|a| a.id == id)
    };
    inventory
        .weapons
        .iter()
        .map(|w| (w.id.as_str(), ItemKind::Weapon))
        .chain(inventory.armor.iter().map(|a| (a.id.as_str(), ItemKind::Armor)))
        .find(|&(id, _)| !worn(id))
}
