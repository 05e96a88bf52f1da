use chrono::{DateTime, Utc};
use hugoland_game::{
    Action, ActionPayload, AttackOutcome, GameSession, GameState, Rarity, generate_weapon,
    research_bonus,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn achievement<'a>(state: &'a GameState, id: &str) -> &'a hugoland_game::Achievement {
    state
        .achievements
        .iter()
        .find(|a| a.id == id)
        .expect("achievement defined")
}

fn win_fight(session: &mut GameSession) -> AttackOutcome {
    assert!(session.dispatch(Action::StartCombat, epoch()).succeeded());
    loop {
        let payload = session
            .dispatch(
                Action::Attack {
                    hit: true,
                    category: "science".to_string(),
                },
                epoch(),
            )
            .into_result()
            .unwrap();
        let ActionPayload::Attack(outcome) = payload else {
            panic!("expected an attack outcome, got {payload:?}");
        };
        if outcome.ends_combat() {
            return outcome;
        }
    }
}

#[test]
fn first_victory_grants_reward_once() {
    let mut session = GameSession::new(21, epoch());
    let AttackOutcome::Victory { coins, gems, .. } = win_fight(&mut session) else {
        panic!("a full streak of hits should win");
    };
    let state = session.state();
    assert_eq!(state.zone, 2);
    assert!(achievement(state, "first_victory").unlocked);
    assert_eq!(state.coins, 500 + coins + 50);
    assert_eq!(state.gems, 50 + gems + 5);

    let coins_after_first = state.coins;
    let AttackOutcome::Victory { coins, .. } = win_fight(&mut session) else {
        panic!("second fight should also be won");
    };
    // Eleven straight hits earn the ten-streak reward, but no second victory bonus.
    let state = session.state();
    assert!(achievement(state, "streak_master_10").unlocked);
    assert_eq!(state.coins, coins_after_first + coins + 250);
}

#[test]
fn zone_fifty_unlocks_premium_and_its_tag() {
    let mut session = GameSession::new(22, epoch());
    let outcome = session.dispatch(Action::TeleportToZone { zone: 50 }, epoch());
    let unlocked: Vec<&str> = outcome.achievements.iter().map(|a| a.id.as_str()).collect();
    for id in ["first_victory", "zone_master_10", "zone_master_25", "zone_master_50"] {
        assert!(unlocked.contains(&id), "{id} missing from {unlocked:?}");
    }
    assert!(outcome.tags.iter().any(|t| t.id == "premium_member"));
    assert!(outcome.tags.iter().any(|t| t.id == "zone_explorer"));

    let state = session.state();
    assert!(state.is_premium);
    assert_eq!(state.coins, 500 + 50 + 200 + 500 + 1_000);
    assert!(!achievement(state, "zone_master_100").unlocked);
    assert_eq!(achievement(state, "zone_master_100").progress, 50);
}

#[test]
fn research_levels_feed_progress_and_stats() {
    let mut session = GameSession::new(23, epoch());
    session.dispatch(Action::AddCoins { amount: 10_000 }, epoch());
    for _ in 0..2 {
        assert!(session.dispatch(Action::UpgradeResearch, epoch()).succeeded());
    }
    assert_eq!(achievement(session.state(), "scholar_tier_5").progress, 3);

    let weapon = generate_weapon(&mut SmallRng::seed_from_u64(23));
    session.state_mut().inventory.weapons.push(weapon.clone());
    session.dispatch(Action::EquipWeapon { id: weapon.id.clone() }, epoch());
    for _ in 0..2 {
        session.dispatch(Action::UpgradeResearch, epoch());
    }

    let state = session.state();
    assert_eq!(state.research.level, 5);
    assert!(achievement(state, "scholar_tier_5").unlocked);
    assert_eq!(
        state.player_stats.atk,
        state.player_stats.base_atk * 2 + weapon.base_atk + research_bonus(5)
    );
    assert_eq!(state.player_stats.def, 10 + 20);
}

#[test]
fn chests_fill_the_collection_book() {
    let mut session = GameSession::new(24, epoch());
    session.dispatch(Action::AddCoins { amount: 50_000 }, epoch());
    let mut rarities = Vec::new();
    for _ in 0..10 {
        let payload = session
            .dispatch(Action::OpenChest { cost: 1_000 }, epoch())
            .into_result()
            .unwrap();
        let ActionPayload::Chest(reward) = payload else {
            panic!("expected a chest reward");
        };
        rarities.push(reward.rarity);
    }
    let state = session.state();
    assert_eq!(state.inventory.len(), 10);
    assert_eq!(state.statistics.chests_opened, 10);
    assert!(achievement(state, "chest_opener_10").unlocked);
    assert!(rarities.iter().all(|r| *r != Rarity::Common));
}

#[test]
fn losing_streak_ends_in_defeat_with_full_health() {
    let mut session = GameSession::new(25, epoch());
    session.dispatch(Action::TeleportToZone { zone: 30 }, epoch());
    session.dispatch(Action::StartCombat, epoch());
    let mut outcome = AttackOutcome::Miss { damage: 0 };
    while !outcome.ends_combat() {
        let payload = session
            .dispatch(
                Action::Attack {
                    hit: false,
                    category: "history".to_string(),
                },
                epoch(),
            )
            .into_result()
            .unwrap();
        if let ActionPayload::Attack(next) = payload {
            outcome = next;
        }
    }
    let state = session.state();
    assert!(matches!(outcome, AttackOutcome::Defeat { .. }));
    assert_eq!(state.player_stats.hp, state.player_stats.max_hp);
    assert_eq!(state.statistics.total_deaths, 1);
    assert_eq!(state.knowledge_streak.current, 0);
    assert!(
        !session
            .dispatch(
                Action::Attack {
                    hit: true,
                    category: "history".to_string(),
                },
                epoch(),
            )
            .succeeded()
    );
}
