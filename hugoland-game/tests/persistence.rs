use chrono::{DateTime, TimeDelta, Utc};
use hugoland_game::{
    Action, GameEngine, GameSession, GameStorage, MemoryStorage, STORAGE_KEY, generate_armor,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha20Rng;
use serde_json::{Value, json};

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// A save written before the auction house or the attack doubling existed.
fn legacy_save() -> Value {
    json!({
        "coins": 1234,
        "gems": 77,
        "zone": 8,
        "playerStats": {
            "hp": 80, "maxHp": 100, "atk": 10, "def": 10,
            "baseAtk": 10, "baseDef": 10, "baseHp": 100
        },
        "inventory": {
            "weapons": [{
                "id": "oldblade1", "name": "Worn Sword", "rarity": "common", "level": 2,
                "baseAtk": 12, "durability": 90, "maxDurability": 100,
                "sellPrice": 14, "upgradeCost": 7
            }],
            "armor": [],
            "currentWeapon": null,
            "currentArmor": null
        },
        "achievements": [{
            "id": "first_victory", "name": "First Victory", "description": "Win your first battle",
            "icon": "⚔️", "maxProgress": 1, "progress": 1, "unlocked": true,
            "unlockedAt": "2024-03-01T12:00:00.000Z", "reward": { "coins": 50, "gems": 5 }
        }],
        "adventureSkills": { "selectedSkill": null, "availableSkills": ["dodge"] },
        "friendCode": "HUGO-42",
        "statistics": { "totalVictories": 7, "coinsEarned": 300 }
    })
}

#[test]
fn session_roundtrips_through_storage() {
    let storage = MemoryStorage::new();
    let engine = GameEngine::new(storage.clone());
    let mut session = GameSession::new(5, epoch());
    let armor = generate_armor(&mut SmallRng::seed_from_u64(5));
    session.state_mut().inventory.armor.push(armor.clone());
    session.dispatch(Action::EquipArmor { id: armor.id.clone() }, epoch());
    session.dispatch(
        Action::ListItem {
            item_id: armor.id.clone(),
            price: 333,
        },
        epoch(),
    );
    session.dispatch(Action::OpenChest { cost: 100 }, epoch());

    let saved_at = epoch() + TimeDelta::seconds(10);
    engine.save_session(&mut session, saved_at).unwrap();
    assert!(storage.load_raw(STORAGE_KEY).unwrap().is_some());

    let restored = GameEngine::new(storage).load_or_new(99, saved_at);
    assert_eq!(restored.state(), session.state());
    assert_eq!(restored.state().offline_progress.last_save_time, saved_at);
    assert_eq!(restored.state().auction_house.player_listings.len(), 1);
}

#[test]
fn legacy_save_is_migrated_on_load() {
    let storage = MemoryStorage::new();
    storage
        .save_raw(STORAGE_KEY, &legacy_save().to_string())
        .unwrap();
    let engine = GameEngine::new(storage);
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    let state = engine.try_load(epoch(), &mut rng).unwrap().unwrap();

    assert_eq!(state.coins, 1234);
    assert_eq!(state.zone, 8);
    assert_eq!(state.player_stats.base_atk, 20);
    assert_eq!(state.player_stats.atk, 20);
    let house = &state.auction_house;
    assert!((4..=12).contains(&house.items.len()));
    assert_eq!(house.last_refresh, epoch());
    assert_eq!(house.next_refresh, epoch() + TimeDelta::minutes(5));
    assert!(house.player_listings.is_empty());
    assert_eq!(state.inventory.weapons[0].id, "oldblade1");
    assert!(state.achievements[0].unlocked);
    assert_eq!(state.statistics.total_victories, 7);
    assert_eq!(state.statistics.auction_purchases, 0);
    assert_eq!(state.research.level, 1);
    assert_eq!(state.adventure_skills["availableSkills"][0], "dodge");
}

#[test]
fn unmodelled_subtrees_survive_a_resave() {
    let storage = MemoryStorage::new();
    storage
        .save_raw(STORAGE_KEY, &legacy_save().to_string())
        .unwrap();
    let engine = GameEngine::new(storage.clone());
    let mut session = engine.load_or_new(2, epoch());
    engine.save_session(&mut session, epoch()).unwrap();

    let raw = storage.load_raw(STORAGE_KEY).unwrap().unwrap();
    let resaved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        resaved["adventureSkills"],
        json!({ "selectedSkill": null, "availableSkills": ["dodge"] })
    );
    assert_eq!(resaved["friendCode"], "HUGO-42");
    assert!(resaved["rngCursor"].is_object());
}

#[test]
fn overflowing_attack_falls_back_to_fresh_game() {
    let storage = MemoryStorage::new();
    let mut save = legacy_save();
    save["playerStats"]["atk"] = json!(u64::MAX);
    storage.save_raw(STORAGE_KEY, &save.to_string()).unwrap();
    let engine = GameEngine::new(storage);
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    assert!(engine.try_load(epoch(), &mut rng).is_err());
    assert_eq!(engine.load_or_new(5, epoch()).state().coins, 500);
}

#[test]
fn corrupt_save_falls_back_to_fresh_game() {
    let storage = MemoryStorage::new();
    storage.save_raw(STORAGE_KEY, "{\"coins\": \"lots\"").unwrap();
    let engine = GameEngine::new(storage);
    let session = engine.load_or_new(3, epoch());
    assert_eq!(session.state(), GameSession::new(3, epoch()).state());
}

#[test]
fn save_with_wrong_shape_falls_back_to_fresh_game() {
    let storage = MemoryStorage::new();
    storage
        .save_raw(STORAGE_KEY, r#"{"coins": -5, "zone": 1}"#)
        .unwrap();
    let engine = GameEngine::new(storage);
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    assert!(engine.try_load(epoch(), &mut rng).is_err());
    assert_eq!(engine.load_or_new(4, epoch()).state().coins, 500);
}
