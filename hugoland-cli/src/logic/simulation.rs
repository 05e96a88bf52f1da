use chrono::{DateTime, TimeDelta, Utc};
use hugoland_game::{GameEngine, GameSession, MemoryStorage};
use serde::Serialize;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};
use crate::logic::reports::StateSummary;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub rounds: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            rounds: 600,
        }
    }

    #[must_use]
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }
}

/// Counters collected over one simulated run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunTally {
    pub actions_succeeded: u64,
    pub actions_failed: u64,
    pub auction_refreshes: u64,
    pub expired_listings: u64,
    pub autosaves: u64,
    pub achievements_unlocked: Vec<String>,
    pub tags_unlocked: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub policy: String,
    pub rounds: u32,
    pub simulated_secs: i64,
    #[serde(flatten)]
    pub tally: RunTally,
    pub summary: StateSummary,
}

/// Deterministic harness: one policy action plus one simulated second per round.
pub struct Simulation {
    config: SimulationConfig,
    engine: GameEngine<MemoryStorage>,
    session: GameSession,
    policy: Box<dyn PlayerPolicy + Send>,
    clock: DateTime<Utc>,
    tally: RunTally,
}

impl Simulation {
    #[must_use]
    pub fn new(config: SimulationConfig, start: DateTime<Utc>) -> Self {
        let engine = GameEngine::new(MemoryStorage::new());
        let session = engine.load_or_new(config.seed, start);
        Self {
            policy: config.strategy.create_policy(config.seed),
            config,
            engine,
            session,
            clock: start,
            tally: RunTally::default(),
        }
    }

    /// Advance one round.
    pub fn step(&mut self) {
        let action = self.policy.next_action(self.session.state());
        let outcome = self.session.dispatch(action, self.clock);
        if outcome.succeeded() {
            self.tally.actions_succeeded += 1;
        } else {
            self.tally.actions_failed += 1;
        }
        self.tally
            .achievements_unlocked
            .extend(outcome.achievements.into_iter().map(|a| a.id));
        self.tally
            .tags_unlocked
            .extend(outcome.tags.into_iter().map(|t| t.id));

        self.clock += TimeDelta::seconds(1);
        let tick = self.session.tick(self.clock);
        if tick.refreshed {
            self.tally.auction_refreshes += 1;
        }
        self.tally.expired_listings += tick.expired_listings.len() as u64;
        if tick.save_due && self.engine.save_session(&mut self.session, self.clock).is_ok() {
            self.tally.autosaves += 1;
        }
    }

    #[must_use]
    pub fn run(mut self) -> SimulationReport {
        let start = self.clock;
        for _ in 0..self.config.rounds {
            self.step();
        }
        SimulationReport {
            seed: self.config.seed,
            strategy: self.config.strategy,
            policy: self.policy.name().to_string(),
            rounds: self.config.rounds,
            simulated_secs: (self.clock - start).num_seconds(),
            summary: StateSummary::from_state(self.session.state(), self.clock),
            tally: self.tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn grinder_makes_progress() {
        let report = Simulation::new(
            SimulationConfig::new(GameplayStrategy::Grinder, 7).with_rounds(600),
            start(),
        )
        .run();
        assert_eq!(report.simulated_secs, 600);
        assert_eq!(report.tally.auction_refreshes, 2);
        assert_eq!(report.tally.autosaves, 60);
        assert!(report.summary.zone > 1);
        assert!(report.tally.achievements_unlocked.contains(&"first_victory".to_string()));
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |seed| {
            Simulation::new(
                SimulationConfig::new(GameplayStrategy::Balanced, seed).with_rounds(300),
                start(),
            )
            .run()
        };
        let (a, b) = (run(11), run(11));
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.tally.actions_succeeded, b.tally.actions_succeeded);
    }

    #[test]
    fn trader_uses_the_auction_house() {
        let report = Simulation::new(
            SimulationConfig::new(GameplayStrategy::Trader, 5).with_rounds(120),
            start(),
        )
        .run();
        assert!(report.summary.inventory_items + report.summary.player_listings > 0);
        assert!(report.tally.actions_succeeded > 0);
    }
}
