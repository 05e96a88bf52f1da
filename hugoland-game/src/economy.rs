//! Gem mining, shiny gem exchange and research upgrades.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{RESEARCH_COST_PER_LEVEL, SHINY_GEM_CHANCE, SHINY_GEM_EXCHANGE_RATE};
use crate::error::GameError;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiningYield {
    Gem,
    ShinyGem,
}

/// Mine once: usually a gem, occasionally a shiny gem.
pub fn mine_gem(state: &mut GameState, rng: &mut impl Rng) -> MiningYield {
    if rng.gen_bool(SHINY_GEM_CHANCE) {
        state.shiny_gems = state.shiny_gems.saturating_add(1);
        state.mining.total_shiny_gems_mined += 1;
        state.statistics.shiny_gems_earned += 1;
        MiningYield::ShinyGem
    } else {
        state.earn_gems(1);
        state.mining.total_gems_mined += 1;
        MiningYield::Gem
    }
}

/// Trade shiny gems for regular gems. Returns the gems received.
///
/// # Errors
///
/// Returns [`GameError::InsufficientShinyGems`] when `amount` exceeds the balance.
pub fn exchange_shiny_gems(state: &mut GameState, amount: u64) -> Result<u64, GameError> {
    if amount > state.shiny_gems {
        return Err(GameError::InsufficientShinyGems {
            needed: amount,
            available: state.shiny_gems,
        });
    }
    let gems = amount.saturating_mul(SHINY_GEM_EXCHANGE_RATE);
    state.shiny_gems -= amount;
    state.gems = state.gems.saturating_add(gems);
    Ok(gems)
}

/// Coins needed to advance research from `level`.
#[must_use]
pub fn research_cost(level: u32) -> u64 {
    RESEARCH_COST_PER_LEVEL.saturating_mul(u64::from(level))
}

/// Buy the next research level. Returns the new level.
///
/// # Errors
///
/// Returns [`GameError::InsufficientCoins`] when the player cannot pay.
pub fn upgrade_research(state: &mut GameState) -> Result<u32, GameError> {
    let cost = research_cost(state.research.level);
    if !state.can_afford_coins(cost) {
        return Err(GameError::InsufficientCoins {
            needed: cost,
            available: state.coins,
        });
    }
    state.spend_coins(cost);
    state.research.level += 1;
    state.research.total_spent = state.research.total_spent.saturating_add(cost);
    state.statistics.total_research_spent =
        state.statistics.total_research_spent.saturating_add(cost);
    state.recompute_equipment_stats();
    Ok(state.research.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn mining_tracks_both_yields() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut state = GameState::default();
        let mut shiny = 0;
        for _ in 0..400 {
            if mine_gem(&mut state, &mut rng) == MiningYield::ShinyGem {
                shiny += 1;
            }
        }
        assert_eq!(state.mining.total_shiny_gems_mined, shiny);
        assert_eq!(state.mining.total_gems_mined, 400 - shiny);
        assert_eq!(state.gems, 50 + 400 - shiny);
        assert_eq!(state.shiny_gems, shiny);
        assert!(shiny > 0 && shiny < 60);
    }

    #[test]
    fn exchange_converts_at_fixed_rate() {
        let mut state = GameState::default();
        state.shiny_gems = 3;
        assert_eq!(exchange_shiny_gems(&mut state, 2), Ok(20));
        assert_eq!(state.gems, 70);
        assert_eq!(state.shiny_gems, 1);
        assert_eq!(
            exchange_shiny_gems(&mut state, 5),
            Err(GameError::InsufficientShinyGems {
                needed: 5,
                available: 1,
            })
        );
    }

    #[test]
    fn research_raises_stats_and_cost() {
        let mut state = GameState::default();
        assert_eq!(upgrade_research(&mut state), Ok(2));
        assert_eq!(state.coins, 400);
        assert_eq!(state.player_stats.atk, 25);
        assert_eq!(state.player_stats.def, 15);
        assert_eq!(research_cost(state.research.level), 200);
        assert_eq!(upgrade_research(&mut state), Ok(3));
        assert_eq!(state.research.total_spent, 300);
        assert_eq!(state.statistics.total_research_spent, 300);
    }

    #[test]
    fn research_without_coins_is_rejected() {
        let mut state = GameState::default();
        state.coins = 99;
        let before = state.clone();
        assert!(upgrade_research(&mut state).is_err());
        assert_eq!(state, before);
    }
}
