//! Zone combat resolved one trivia answer at a time.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    COMBAT_LOG_LIMIT, ENEMY_ATK_BASE, ENEMY_ATK_PER_ZONE, ENEMY_DEF_BASE, ENEMY_DEF_PER_ZONE,
    ENEMY_HP_BASE, ENEMY_HP_PER_ZONE, LEVEL_XP_GROWTH, STREAK_MULTIPLIER_CAP,
    STREAK_MULTIPLIER_STEP, VICTORY_COIN_BASE, VICTORY_COIN_PER_ZONE, VICTORY_GEM_MAX,
    VICTORY_GEM_MIN, VICTORY_XP_BASE, VICTORY_XP_PER_ZONE,
};
use crate::error::GameError;
use crate::numbers::{percent, scale_floor};
use crate::state::GameState;

const ENEMY_NAMES: [&str; 10] = [
    "Goblin",
    "Skeleton",
    "Orc",
    "Troll",
    "Dark Elf",
    "Wraith",
    "Minotaur",
    "Basilisk",
    "Lich",
    "Dragon",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub zone: u32,
}

/// Enemy stats grow linearly with the zone.
pub fn generate_enemy(zone: u32, rng: &mut impl Rng) -> Enemy {
    let zone = zone.max(1);
    let hp = ENEMY_HP_BASE.saturating_add(zone.saturating_mul(ENEMY_HP_PER_ZONE));
    Enemy {
        name: ENEMY_NAMES[rng.gen_range(0..ENEMY_NAMES.len())].to_string(),
        hp,
        max_hp: hp,
        atk: ENEMY_ATK_BASE.saturating_add(zone.saturating_mul(ENEMY_ATK_PER_ZONE)),
        def: ENEMY_DEF_BASE.saturating_add(zone.saturating_mul(ENEMY_DEF_PER_ZONE)),
        zone,
    }
}

/// Result of one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AttackOutcome {
    /// Correct answer, enemy still standing.
    Hit { damage: u32 },
    /// Correct answer that finished the enemy.
    Victory {
        damage: u32,
        coins: u64,
        gems: u64,
        experience: u64,
        leveled_up: bool,
    },
    /// Wrong answer, player still standing.
    Miss { damage: u32 },
    /// Wrong answer that knocked the player out.
    Defeat { damage: u32 },
}

impl AttackOutcome {
    #[must_use]
    pub const fn ends_combat(self) -> bool {
        matches!(self, Self::Victory { .. } | Self::Defeat { .. })
    }
}

const fn damage(atk: u32, def: u32) -> u32 {
    let raw = atk.saturating_sub(def);
    if raw == 0 { 1 } else { raw }
}

fn push_log(state: &mut GameState, line: String) {
    state.combat_log.push(line);
    let overflow = state.combat_log.len().saturating_sub(COMBAT_LOG_LIMIT);
    if overflow > 0 {
        state.combat_log.drain(..overflow);
    }
}

/// Spawn an enemy for the current zone.
///
/// # Errors
///
/// Returns [`GameError::AlreadyInCombat`] while another enemy is alive.
pub fn start_combat(state: &mut GameState, rng: &mut impl Rng) -> Result<Enemy, GameError> {
    if state.in_combat
        && let Some(enemy) = &state.current_enemy
    {
        return Err(GameError::AlreadyInCombat(enemy.name.clone()));
    }
    let enemy = generate_enemy(state.zone, rng);
    state.combat_log = vec![format!("You encounter a {}!", enemy.name)];
    state.current_enemy = Some(enemy.clone());
    state.in_combat = true;
    Ok(enemy)
}

/// Resolve a trivia answer against the current enemy. `hit` means the answer was correct.
///
/// # Errors
///
/// Returns [`GameError::NotInCombat`] when there is no live enemy.
pub fn attack(
    state: &mut GameState,
    hit: bool,
    category: &str,
    rng: &mut impl Rng,
) -> Result<AttackOutcome, GameError> {
    if !state.in_combat || state.current_enemy.is_none() {
        return Err(GameError::NotInCombat);
    }
    record_answer(state, hit, category);
    let outcome = if hit {
        strike_enemy(state, rng)
    } else {
        take_hit(state)
    };
    Ok(outcome)
}

fn record_answer(state: &mut GameState, hit: bool, category: &str) {
    let stats = &mut state.statistics;
    stats.total_questions_answered += 1;
    let entry = stats
        .accuracy_by_category
        .entry(category.to_string())
        .or_default();
    entry.total += 1;
    if hit {
        stats.correct_answers += 1;
        entry.correct += 1;
    }
    stats.average_accuracy = percent(stats.correct_answers, stats.total_questions_answered);

    let streak = &mut state.knowledge_streak;
    if hit {
        streak.current += 1;
        streak.best = streak.best.max(streak.current);
        streak.multiplier = (1 + streak.current / STREAK_MULTIPLIER_STEP).min(STREAK_MULTIPLIER_CAP);
        stats.longest_streak = stats.longest_streak.max(streak.best);
    } else {
        streak.current = 0;
        streak.multiplier = 1;
    }
}

fn strike_enemy(state: &mut GameState, rng: &mut impl Rng) -> AttackOutcome {
    let atk = state.player_stats.atk;
    let Some(enemy) = state.current_enemy.as_mut() else {
        return AttackOutcome::Hit { damage: 0 };
    };
    let dealt = damage(atk, enemy.def);
    enemy.hp = enemy.hp.saturating_sub(dealt);
    let (name, defeated) = (enemy.name.clone(), enemy.hp == 0);
    state.statistics.total_damage_dealt += u64::from(dealt);

    if !defeated {
        push_log(state, format!("You hit the {name} for {dealt} damage."));
        return AttackOutcome::Hit { damage: dealt };
    }

    let zone = u64::from(state.zone);
    let coins = VICTORY_COIN_BASE + zone * VICTORY_COIN_PER_ZONE;
    let gems = rng.gen_range(VICTORY_GEM_MIN..=VICTORY_GEM_MAX);
    let experience = VICTORY_XP_BASE + zone * VICTORY_XP_PER_ZONE;
    state.earn_coins(coins);
    state.earn_gems(gems);
    state.statistics.total_victories += 1;
    state.zone = state.zone.saturating_add(1);
    state.statistics.zones_reached = state.statistics.zones_reached.max(state.zone);
    state.in_combat = false;
    state.current_enemy = None;
    let leveled_up = gain_experience(state, experience);
    push_log(
        state,
        format!("You defeated the {name}! +{coins} coins, +{gems} gems."),
    );
    log::debug!("victory over {name}, advancing to zone {}", state.zone);
    AttackOutcome::Victory {
        damage: dealt,
        coins,
        gems,
        experience,
        leveled_up,
    }
}

fn take_hit(state: &mut GameState) -> AttackOutcome {
    let def = state.player_stats.def;
    let Some(enemy) = state.current_enemy.as_ref() else {
        return AttackOutcome::Miss { damage: 0 };
    };
    let taken = damage(enemy.atk, def);
    let name = enemy.name.clone();
    let stats = &mut state.player_stats;
    stats.hp = stats.hp.saturating_sub(taken);
    state.statistics.total_damage_taken += u64::from(taken);

    if state.player_stats.hp > 0 {
        push_log(state, format!("The {name} hits you for {taken} damage."));
        return AttackOutcome::Miss { damage: taken };
    }

    state.statistics.total_deaths += 1;
    state.in_combat = false;
    state.current_enemy = None;
    state.player_stats.hp = state.player_stats.max_hp;
    push_log(state, format!("You were defeated by the {name}."));
    AttackOutcome::Defeat { damage: taken }
}

/// Add experience, levelling up as many times as it covers. Returns whether a level was gained.
pub(crate) fn gain_experience(state: &mut GameState, amount: u64) -> bool {
    let progression = &mut state.progression;
    progression.experience = progression.experience.saturating_add(amount);
    let mut leveled = false;
    while progression.experience_to_next > 0 && progression.experience >= progression.experience_to_next
    {
        progression.experience -= progression.experience_to_next;
        progression.level += 1;
        progression.skill_points += 1;
        progression.experience_to_next =
            scale_floor(progression.experience_to_next, LEVEL_XP_GROWTH);
        leveled = true;
    }
    leveled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn in_fight(seed: u64) -> (GameState, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = GameState::default();
        start_combat(&mut state, &mut rng).unwrap();
        (state, rng)
    }

    #[test]
    fn enemy_scales_with_zone() {
        let mut rng = SmallRng::seed_from_u64(1);
        let low = generate_enemy(1, &mut rng);
        let high = generate_enemy(10, &mut rng);
        assert_eq!(low.hp, 65);
        assert_eq!(low.max_hp, low.hp);
        assert_eq!(high.atk, 48);
        assert_eq!(high.def, 22);
        assert!(high.hp > low.hp);
    }

    #[test]
    fn cannot_start_two_fights() {
        let (mut state, mut rng) = in_fight(2);
        assert!(matches!(
            start_combat(&mut state, &mut rng),
            Err(GameError::AlreadyInCombat(_))
        ));
        assert_eq!(state.combat_log.len(), 1);
    }

    #[test]
    fn attack_outside_combat_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = GameState::default();
        let before = state.clone();
        assert_eq!(
            attack(&mut state, true, "science", &mut rng),
            Err(GameError::NotInCombat)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn correct_answers_clear_the_zone() {
        let (mut state, mut rng) = in_fight(4);
        // 20 atk against 4 def takes 65 hp down in five hits.
        let mut outcome = attack(&mut state, true, "math", &mut rng).unwrap();
        assert_eq!(outcome, AttackOutcome::Hit { damage: 16 });
        while !outcome.ends_combat() {
            outcome = attack(&mut state, true, "math", &mut rng).unwrap();
        }
        let AttackOutcome::Victory { coins, gems, .. } = outcome else {
            panic!("expected victory, got {outcome:?}");
        };
        assert_eq!(coins, 12);
        assert!((1..=3).contains(&gems));
        assert_eq!(state.zone, 2);
        assert_eq!(state.coins, 512);
        assert!(!state.in_combat);
        assert!(state.current_enemy.is_none());
        assert_eq!(state.statistics.total_victories, 1);
        assert_eq!(state.statistics.coins_earned, 12);
        assert_eq!(state.knowledge_streak.current, 5);
        assert_eq!(state.knowledge_streak.multiplier, 2);
        assert_eq!(state.progression.experience, 25);
    }

    #[test]
    fn wrong_answers_hurt_and_reset_streak() {
        let (mut state, mut rng) = in_fight(5);
        attack(&mut state, true, "history", &mut rng).unwrap();
        let outcome = attack(&mut state, false, "history", &mut rng).unwrap();
        // 12 atk against 10 def.
        assert_eq!(outcome, AttackOutcome::Miss { damage: 2 });
        assert_eq!(state.player_stats.hp, 98);
        assert_eq!(state.knowledge_streak.current, 0);
        assert_eq!(state.knowledge_streak.best, 1);
        let acc = state.statistics.accuracy_by_category["history"];
        assert_eq!((acc.correct, acc.total), (1, 2));
        assert!((state.statistics.average_accuracy - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn defeat_restores_health() {
        let (mut state, mut rng) = in_fight(6);
        state.player_stats.hp = 1;
        let outcome = attack(&mut state, false, "art", &mut rng).unwrap();
        assert!(matches!(outcome, AttackOutcome::Defeat { .. }));
        assert_eq!(state.player_stats.hp, state.player_stats.max_hp);
        assert_eq!(state.statistics.total_deaths, 1);
        assert!(!state.in_combat);
        assert_eq!(state.zone, 1);
    }

    #[test]
    fn combat_log_keeps_last_ten_lines() {
        let (mut state, mut rng) = in_fight(7);
        state.player_stats.hp = 10_000;
        for _ in 0..15 {
            attack(&mut state, false, "geo", &mut rng).unwrap();
        }
        assert_eq!(state.combat_log.len(), 10);
        assert!(state.combat_log.iter().all(|l| l.contains("hits you")));
    }

    #[test]
    fn experience_levels_up_with_growing_threshold() {
        let mut state = GameState::default();
        assert!(gain_experience(&mut state, 260));
        // 100 then 150 consumed, 10 left toward 225.
        assert_eq!(state.progression.level, 3);
        assert_eq!(state.progression.experience, 10);
        assert_eq!(state.progression.experience_to_next, 225);
        assert_eq!(state.progression.skill_points, 2);
        assert!(!gain_experience(&mut state, 5));
    }
}
