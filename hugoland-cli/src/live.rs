use anyhow::{Context, Result};
use chrono::Utc;
use hugoland_game::{GameEngine, GameStorage};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::logic::policy::GameplayStrategy;
use crate::logic::reports::StateSummary;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const ACTION_PERIOD: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct LiveConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    /// Stop after this long; `None` runs until interrupted.
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    Deadline,
    Interrupted,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveReport {
    pub stopped: StopReason,
    pub actions: u64,
    pub rejected: u64,
    pub ticks: u64,
    pub auction_refreshes: u64,
    pub expired_listings: u64,
    pub autosaves: u64,
    pub failed_saves: u64,
    pub summary: StateSummary,
}

/// Drive a stored game on wall-clock timers until the deadline or ctrl-c, then save.
///
/// # Errors
///
/// Returns an error if the final save fails.
pub async fn run_live<S: GameStorage>(
    engine: &GameEngine<S>,
    config: LiveConfig,
) -> Result<LiveReport> {
    let mut session = engine.load_or_new(config.seed, Utc::now());
    let mut policy = config.strategy.create_policy(config.seed);
    log::info!(
        "live session started with {} at zone {}",
        policy.name(),
        session.state().zone
    );

    let mut ticker = time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut actor = time::interval(ACTION_PERIOD);
    actor.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let deadline = async move {
        match config.duration {
            Some(duration) => time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut report = LiveReport {
        stopped: StopReason::Deadline,
        actions: 0,
        rejected: 0,
        ticks: 0,
        auction_refreshes: 0,
        expired_listings: 0,
        autosaves: 0,
        failed_saves: 0,
        summary: StateSummary::from_state(session.state(), Utc::now()),
    };

    report.stopped = loop {
        tokio::select! {
            () = &mut deadline => break StopReason::Deadline,
            signal = &mut interrupt => {
                if let Err(err) = signal {
                    log::warn!("ctrl-c handler failed: {err}");
                }
                break StopReason::Interrupted;
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                let tick = session.tick(now);
                report.ticks += 1;
                if tick.refreshed {
                    report.auction_refreshes += 1;
                    log::info!("auction house refreshed");
                }
                for id in &tick.expired_listings {
                    log::info!("listing for {id} expired, item returned");
                }
                report.expired_listings += tick.expired_listings.len() as u64;
                if tick.save_due {
                    match engine.save_session(&mut session, now) {
                        Ok(()) => report.autosaves += 1,
                        Err(_) => report.failed_saves += 1,
                    }
                }
                log::debug!(
                    "zone {} | {} coins | refresh in {}",
                    session.state().zone,
                    session.state().coins,
                    session.countdown(now)
                );
            }
            _ = actor.tick() => {
                let action = policy.next_action(session.state());
                let outcome = session.dispatch(action, Utc::now());
                report.actions += 1;
                if let Err(err) = &outcome.result {
                    report.rejected += 1;
                    log::debug!("action rejected: {err}");
                }
                for achievement in &outcome.achievements {
                    log::info!("achievement unlocked: {}", achievement.name);
                }
                for tag in &outcome.tags {
                    log::info!("tag unlocked: {}", tag.name);
                }
            }
        }
    };

    let now = Utc::now();
    engine
        .save_session(&mut session, now)
        .context("final save failed")?;
    log::info!("live session stopped: {:?}", report.stopped);
    report.summary = StateSummary::from_state(session.state(), now);
    Ok(report)
}
