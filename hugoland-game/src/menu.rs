//! Menu actions: settings, game modes, cheats and debug shortcuts.
use crate::error::GameError;
use crate::state::{Cheat, GameModeKind, GameState, SettingsPatch};

pub fn update_settings(state: &mut GameState, patch: SettingsPatch) {
    state.settings.apply(patch);
}

/// Switch game mode. Entering survival refills the lives.
pub fn set_game_mode(state: &mut GameState, mode: GameModeKind) {
    let game_mode = &mut state.game_mode;
    game_mode.current = mode;
    game_mode.speed_mode_active = mode == GameModeKind::Blitz;
    if mode == GameModeKind::Survival {
        game_mode.survival_lives = game_mode.max_survival_lives;
    }
}

/// Flip a cheat and return its new value.
pub fn toggle_cheat(state: &mut GameState, cheat: Cheat) -> bool {
    let enabled = state.cheats.toggle(cheat);
    log::warn!("cheat {cheat:?} is now {}", if enabled { "on" } else { "off" });
    enabled
}

pub fn add_coins(state: &mut GameState, amount: u64) {
    state.coins = state.coins.saturating_add(amount);
}

pub fn add_gems(state: &mut GameState, amount: u64) {
    state.gems = state.gems.saturating_add(amount);
}

/// Jump to a zone, abandoning any fight in progress.
///
/// # Errors
///
/// Returns [`GameError::InvalidZone`] for zone 0.
pub fn teleport_to_zone(state: &mut GameState, zone: u32) -> Result<(), GameError> {
    if zone == 0 {
        return Err(GameError::InvalidZone);
    }
    state.zone = zone;
    state.statistics.zones_reached = state.statistics.zones_reached.max(zone);
    state.in_combat = false;
    state.current_enemy = None;
    Ok(())
}

pub fn set_experience(state: &mut GameState, experience: u64) {
    state.progression.experience = experience;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survival_refills_lives() {
        let mut state = GameState::default();
        state.game_mode.survival_lives = 0;
        set_game_mode(&mut state, GameModeKind::Survival);
        assert_eq!(state.game_mode.current, GameModeKind::Survival);
        assert_eq!(state.game_mode.survival_lives, 3);
        assert!(!state.game_mode.speed_mode_active);

        set_game_mode(&mut state, GameModeKind::Blitz);
        assert!(state.game_mode.speed_mode_active);
    }

    #[test]
    fn teleport_rejects_zone_zero() {
        let mut state = GameState::default();
        assert_eq!(teleport_to_zone(&mut state, 0), Err(GameError::InvalidZone));
        teleport_to_zone(&mut state, 40).unwrap();
        assert_eq!(state.zone, 40);
        assert_eq!(state.statistics.zones_reached, 40);
    }

    #[test]
    fn cheats_toggle_back_and_forth() {
        let mut state = GameState::default();
        assert!(toggle_cheat(&mut state, Cheat::InfiniteGems));
        assert!(state.cheats.infinite_gems);
        assert!(!toggle_cheat(&mut state, Cheat::InfiniteGems));
    }
}
