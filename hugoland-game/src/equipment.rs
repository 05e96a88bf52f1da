//! Inventory actions: equipping, upgrading, selling, discarding and chests.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ARMOR_UPGRADE_DEF, UPGRADE_COST_GROWTH, WEAPON_UPGRADE_ATK};
use crate::error::GameError;
use crate::items::{
    Armor, Equipment, ItemKind, Rarity, Weapon, chest_rarity_weights, generate_equipment_weighted,
};
use crate::numbers::scale_floor;
use crate::state::GameState;

fn weapon_missing(id: &str) -> GameError {
    GameError::ItemNotFound {
        kind: ItemKind::Weapon,
        id: id.to_string(),
    }
}

fn armor_missing(id: &str) -> GameError {
    GameError::ItemNotFound {
        kind: ItemKind::Armor,
        id: id.to_string(),
    }
}

/// Equip an owned weapon and recompute attack.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] if the weapon is not in the inventory.
pub fn equip_weapon(state: &mut GameState, id: &str) -> Result<(), GameError> {
    let weapon = state
        .inventory
        .find_weapon(id)
        .cloned()
        .ok_or_else(|| weapon_missing(id))?;
    state
        .player_stats
        .apply_weapon(Some(&weapon), state.research.level);
    state.inventory.current_weapon = Some(weapon);
    Ok(())
}

/// Equip an owned armor piece and recompute defense.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] if the armor is not in the inventory.
pub fn equip_armor(state: &mut GameState, id: &str) -> Result<(), GameError> {
    let armor = state
        .inventory
        .find_armor(id)
        .cloned()
        .ok_or_else(|| armor_missing(id))?;
    state
        .player_stats
        .apply_armor(Some(&armor), state.research.level);
    state.inventory.current_armor = Some(armor);
    Ok(())
}

fn charge_gems(state: &mut GameState, cost: u64) -> Result<(), GameError> {
    if !state.can_afford_gems(cost) {
        return Err(GameError::InsufficientGems {
            needed: cost,
            available: state.gems,
        });
    }
    state.spend_gems(cost);
    Ok(())
}

/// Spend the weapon's upgrade cost in gems to raise its level and attack.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] or [`GameError::InsufficientGems`].
pub fn upgrade_weapon(state: &mut GameState, id: &str) -> Result<Weapon, GameError> {
    let cost = state
        .inventory
        .find_weapon(id)
        .map(|w| w.upgrade_cost)
        .ok_or_else(|| weapon_missing(id))?;
    charge_gems(state, cost)?;

    let weapon = state
        .inventory
        .weapons
        .iter_mut()
        .find(|w| w.id == id)
        .ok_or_else(|| weapon_missing(id))?;
    weapon.level += 1;
    weapon.base_atk = weapon.base_atk.saturating_add(WEAPON_UPGRADE_ATK);
    weapon.upgrade_cost = scale_floor(weapon.upgrade_cost, UPGRADE_COST_GROWTH);
    let upgraded = weapon.clone();

    if state
        .inventory
        .current_weapon
        .as_ref()
        .is_some_and(|w| w.id == id)
    {
        state
            .player_stats
            .apply_weapon(Some(&upgraded), state.research.level);
        state.inventory.current_weapon = Some(upgraded.clone());
    }
    state.statistics.items_upgraded += 1;
    Ok(upgraded)
}

/// Spend the armor's upgrade cost in gems to raise its level and defense.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] or [`GameError::InsufficientGems`].
pub fn upgrade_armor(state: &mut GameState, id: &str) -> Result<Armor, GameError> {
    let cost = state
        .inventory
        .find_armor(id)
        .map(|a| a.upgrade_cost)
        .ok_or_else(|| armor_missing(id))?;
    charge_gems(state, cost)?;

    let armor = state
        .inventory
        .armor
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| armor_missing(id))?;
    armor.level += 1;
    armor.base_def = armor.base_def.saturating_add(ARMOR_UPGRADE_DEF);
    armor.upgrade_cost = scale_floor(armor.upgrade_cost, UPGRADE_COST_GROWTH);
    let upgraded = armor.clone();

    if state
        .inventory
        .current_armor
        .as_ref()
        .is_some_and(|a| a.id == id)
    {
        state
            .player_stats
            .apply_armor(Some(&upgraded), state.research.level);
        state.inventory.current_armor = Some(upgraded.clone());
    }
    state.statistics.items_upgraded += 1;
    Ok(upgraded)
}

fn remove_item(state: &mut GameState, id: &str, kind: ItemKind) -> Result<Equipment, GameError> {
    if state.inventory.kind_of(id) != Some(kind) {
        return Err(GameError::ItemNotFound {
            kind,
            id: id.to_string(),
        });
    }
    let (item, was_equipped) = state.inventory.take(id).ok_or_else(|| GameError::ItemNotFound {
        kind,
        id: id.to_string(),
    })?;
    if was_equipped {
        state.refresh_unequipped(kind);
    }
    Ok(item)
}

fn sell(state: &mut GameState, id: &str, kind: ItemKind) -> Result<u64, GameError> {
    let item = remove_item(state, id, kind)?;
    let price = item.sell_price();
    state.earn_coins(price);
    state.statistics.items_sold += 1;
    log::debug!("sold {kind} {id} for {price} coins");
    Ok(price)
}

/// Sell a weapon for its sell price. Returns the coins credited.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] if the weapon is not owned.
pub fn sell_weapon(state: &mut GameState, id: &str) -> Result<u64, GameError> {
    sell(state, id, ItemKind::Weapon)
}

/// Sell an armor piece for its sell price. Returns the coins credited.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] if the armor is not owned.
pub fn sell_armor(state: &mut GameState, id: &str) -> Result<u64, GameError> {
    sell(state, id, ItemKind::Armor)
}

/// Throw an item away without compensation.
///
/// # Errors
///
/// Returns [`GameError::ItemNotFound`] if no item of that kind has the id.
pub fn discard_item(state: &mut GameState, id: &str, kind: ItemKind) -> Result<(), GameError> {
    remove_item(state, id, kind).map(drop)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestReward {
    pub item: Equipment,
    pub rarity: Rarity,
    pub cost: u64,
}

/// Pay `cost` coins for a random item. Pricier chests roll rarer loot.
///
/// # Errors
///
/// Returns [`GameError::InsufficientCoins`] when the player cannot pay.
pub fn open_chest(
    state: &mut GameState,
    cost: u64,
    rng: &mut impl Rng,
) -> Result<ChestReward, GameError> {
    if !state.can_afford_coins(cost) {
        return Err(GameError::InsufficientCoins {
            needed: cost,
            available: state.coins,
        });
    }
    let mut item = generate_equipment_weighted(rng, &chest_rarity_weights(cost));
    item.reroll_id_clashes(state, rng);
    state.spend_coins(cost);
    state.collect_item(item.clone());
    state.statistics.chests_opened += 1;
    Ok(ChestReward {
        rarity: item.rarity(),
        item,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{generate_armor_with_rarity, generate_weapon_with_rarity};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn with_gear(seed: u64) -> (GameState, Weapon, Armor, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = GameState::default();
        let weapon = generate_weapon_with_rarity(&mut rng, Rarity::Rare);
        let armor = generate_armor_with_rarity(&mut rng, Rarity::Epic);
        state.inventory.insert(weapon.clone().into());
        state.inventory.insert(armor.clone().into());
        (state, weapon, armor, rng)
    }

    #[test]
    fn equipping_weapon_doubles_base_attack() {
        let (mut state, weapon, _, _) = with_gear(1);
        state.research.level = 3;
        equip_weapon(&mut state, &weapon.id).unwrap();
        assert_eq!(state.player_stats.atk, 20 * 2 + weapon.base_atk + 10);
        assert_eq!(state.inventory.current_weapon.as_ref(), Some(&weapon));
    }

    #[test]
    fn equipping_armor_adds_defense() {
        let (mut state, _, armor, _) = with_gear(2);
        equip_armor(&mut state, &armor.id).unwrap();
        assert_eq!(state.player_stats.def, 10 + armor.base_def);
    }

    #[test]
    fn equipping_unknown_item_fails() {
        let (mut state, _, armor, _) = with_gear(3);
        let before = state.clone();
        assert_eq!(
            equip_weapon(&mut state, &armor.id),
            Err(GameError::ItemNotFound {
                kind: ItemKind::Weapon,
                id: armor.id.clone(),
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn upgrade_keeps_equipped_copy_in_sync() {
        let (mut state, weapon, _, _) = with_gear(4);
        equip_weapon(&mut state, &weapon.id).unwrap();
        let upgraded = upgrade_weapon(&mut state, &weapon.id).unwrap();

        assert_eq!(upgraded.level, 2);
        assert_eq!(upgraded.base_atk, weapon.base_atk + 10);
        assert_eq!(upgraded.upgrade_cost, 15);
        assert_eq!(state.gems, 40);
        assert_eq!(state.inventory.current_weapon.as_ref(), Some(&upgraded));
        assert_eq!(state.player_stats.atk, 40 + upgraded.base_atk);
        assert_eq!(state.statistics.items_upgraded, 1);
    }

    #[test]
    fn upgrade_without_gems_fails_cleanly() {
        let (mut state, _, armor, _) = with_gear(5);
        state.gems = 3;
        let before = state.clone();
        assert_eq!(
            upgrade_armor(&mut state, &armor.id),
            Err(GameError::InsufficientGems {
                needed: 20,
                available: 3,
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn selling_equipped_armor_unequips_it() {
        let (mut state, _, armor, _) = with_gear(6);
        equip_armor(&mut state, &armor.id).unwrap();
        let credited = sell_armor(&mut state, &armor.id).unwrap();

        assert_eq!(credited, armor.sell_price);
        assert_eq!(state.coins, 500 + armor.sell_price);
        assert!(state.inventory.current_armor.is_none());
        assert_eq!(state.player_stats.def, 10);
        assert_eq!(state.statistics.items_sold, 1);
        assert!(sell_armor(&mut state, &armor.id).is_err());
    }

    #[test]
    fn discard_checks_kind() {
        let (mut state, weapon, _, _) = with_gear(7);
        assert!(discard_item(&mut state, &weapon.id, ItemKind::Armor).is_err());
        discard_item(&mut state, &weapon.id, ItemKind::Weapon).unwrap();
        assert!(!state.inventory.contains(&weapon.id));
        assert_eq!(state.coins, 500);
    }

    #[test]
    fn chest_charges_and_records_item() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut state = GameState::default();
        let reward = open_chest(&mut state, 100, &mut rng).unwrap();

        assert_eq!(state.coins, 400);
        assert_eq!(reward.rarity, reward.item.rarity());
        assert_ne!(reward.rarity, Rarity::Mythical);
        assert!(state.inventory.contains(reward.item.id()));
        assert_eq!(state.statistics.chests_opened, 1);
        assert_eq!(state.collection_book.distinct_items(), 1);
    }

    #[test]
    fn chest_never_duplicates_an_owned_id() {
        let (mut state, _, _, mut rng) = with_gear(9);
        let predicted = generate_equipment_weighted(&mut rng.clone(), &chest_rarity_weights(100));
        state.inventory.insert(predicted.clone());
        let before = state.inventory.len();

        let reward = open_chest(&mut state, 100, &mut rng).unwrap();
        assert_ne!(reward.item.id(), predicted.id());
        assert_eq!(state.inventory.len(), before + 1);
        assert!(state.inventory.contains(predicted.id()));
        assert!(state.inventory.contains(reward.item.id()));
    }

    #[test]
    fn chest_respects_infinite_coins() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut state = GameState::default();
        state.coins = 0;
        assert!(matches!(
            open_chest(&mut state, 1_000, &mut rng),
            Err(GameError::InsufficientCoins { .. })
        ));
        state.cheats.infinite_coins = true;
        open_chest(&mut state, 1_000, &mut rng).unwrap();
        assert_eq!(state.coins, 0);
    }
}
