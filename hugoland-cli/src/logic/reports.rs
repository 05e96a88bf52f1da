use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use hugoland_game::GameState;
use hugoland_game::auction::format_countdown;
use serde::Serialize;
use std::io::Write;

use super::simulation::SimulationReport;

/// Snapshot of the headline numbers of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub coins: u64,
    pub gems: u64,
    pub shiny_gems: u64,
    pub zone: u32,
    pub level: u32,
    pub research_level: u32,
    pub inventory_items: usize,
    pub auction_listings: usize,
    pub player_listings: usize,
    pub victories: u64,
    pub deaths: u64,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub tags_unlocked: usize,
    pub next_refresh_in: String,
}

impl StateSummary {
    #[must_use]
    pub fn from_state(state: &GameState, now: DateTime<Utc>) -> Self {
        Self {
            coins: state.coins,
            gems: state.gems,
            shiny_gems: state.shiny_gems,
            zone: state.zone,
            level: state.progression.level,
            research_level: state.research.level,
            inventory_items: state.inventory.len(),
            auction_listings: state.auction_house.items.len(),
            player_listings: state.auction_house.player_listings.len(),
            victories: state.statistics.total_victories,
            deaths: state.statistics.total_deaths,
            achievements_unlocked: state.achievements.iter().filter(|a| a.unlocked).count(),
            achievements_total: state.achievements.len(),
            tags_unlocked: state.player_tags.iter().filter(|t| t.unlocked).count(),
            next_refresh_in: format_countdown(state.auction_house.time_until_refresh(now)),
        }
    }
}

pub fn write_summary(out: &mut dyn Write, summary: &StateSummary) -> Result<()> {
    writeln!(out, "💰 Coins: {}", summary.coins.to_string().yellow())?;
    writeln!(
        out,
        "💎 Gems: {} (shiny {})",
        summary.gems.to_string().cyan(),
        summary.shiny_gems
    )?;
    writeln!(
        out,
        "🗺️  Zone {} | Level {} | Research {}",
        summary.zone, summary.level, summary.research_level
    )?;
    writeln!(
        out,
        "⚔️  Victories: {} | Deaths: {}",
        summary.victories.to_string().green(),
        summary.deaths.to_string().red()
    )?;
    writeln!(
        out,
        "🎒 Inventory: {} items | Auction: {} listings, {} yours",
        summary.inventory_items, summary.auction_listings, summary.player_listings
    )?;
    writeln!(
        out,
        "🏆 Achievements: {}/{} | Tags: {}",
        summary.achievements_unlocked, summary.achievements_total, summary.tags_unlocked
    )?;
    writeln!(out, "⏱️  Auction refresh in {}", summary.next_refresh_in)?;
    Ok(())
}

pub fn generate_console_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(
        out,
        "Strategy: {} | Seed: {} | Rounds: {}",
        report.policy.bold(),
        report.seed,
        report.rounds
    )?;
    writeln!(out, "Simulated time: {}s", report.simulated_secs)?;

    let tally = &report.tally;
    let total = tally.actions_succeeded + tally.actions_failed;
    #[allow(clippy::cast_precision_loss)]
    let success_rate = if total == 0 {
        0.0
    } else {
        (tally.actions_succeeded as f64 / total as f64) * 100.0
    };
    writeln!(
        out,
        "Actions: {} ok, {} rejected ({success_rate:.1}% accepted)",
        tally.actions_succeeded.to_string().green(),
        tally.actions_failed.to_string().red()
    )?;
    writeln!(
        out,
        "Auction refreshes: {} | Expired listings: {} | Autosaves: {}",
        tally.auction_refreshes, tally.expired_listings, tally.autosaves
    )?;
    writeln!(out)?;
    write_summary(out, &report.summary)?;

    if !tally.achievements_unlocked.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🏅 Unlocked this run".bright_yellow().bold())?;
        for id in &tally.achievements_unlocked {
            writeln!(out, "  • {id}")?;
        }
        for id in &tally.tags_unlocked {
            writeln!(out, "  • tag: {id}")?;
        }
    }
    Ok(())
}

pub fn generate_json_report<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}
