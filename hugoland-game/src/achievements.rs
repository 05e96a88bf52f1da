//! Achievement definitions and the linear-scan evaluator.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// Game counters that achievements and tags are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Zones cleared, i.e. current zone minus one.
    ZonesCleared,
    Zone,
    DistinctItems,
    ResearchLevel,
    BestStreak,
    CoinsEarned,
    GemsEarned,
    ChestsOpened,
    Victories,
    GemsMined,
    CorrectAnswers,
    AuctionPurchases,
    AuctionTransactions,
    Premium,
}

impl Metric {
    #[must_use]
    pub fn value(self, state: &GameState) -> u64 {
        match self {
            Self::ZonesCleared => u64::from(state.zone.saturating_sub(1)),
            Self::Zone => u64::from(state.zone),
            Self::DistinctItems => state.collection_book.distinct_items(),
            Self::ResearchLevel => u64::from(state.research.level),
            Self::BestStreak => u64::from(state.knowledge_streak.best),
            Self::CoinsEarned => state.statistics.coins_earned,
            Self::GemsEarned => state.statistics.gems_earned,
            Self::ChestsOpened => state.statistics.chests_opened,
            Self::Victories => state.statistics.total_victories,
            Self::GemsMined => state.mining.total_gems_mined,
            Self::CorrectAnswers => state.statistics.correct_answers,
            Self::AuctionPurchases => state.statistics.auction_purchases,
            Self::AuctionTransactions => state.statistics.auction_transactions,
            Self::Premium => u64::from(state.is_premium),
        }
    }
}

/// Special reward that unlocks premium status.
pub const PREMIUM_ACCESS: &str = "Premium Access";

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub max_progress: u64,
    pub metric: Metric,
    pub coins: u64,
    pub gems: u64,
    pub special: Option<&'static str>,
}

impl AchievementDef {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        metric: Metric,
        max_progress: u64,
        (coins, gems): (u64, u64),
    ) -> Self {
        Self {
            id,
            name,
            description,
            icon,
            max_progress,
            metric,
            coins,
            gems,
            special: None,
        }
    }

    const fn with_special(mut self, special: &'static str) -> Self {
        self.special = Some(special);
        self
    }

    /// Clamped progress and whether the unlock condition holds.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> (u64, bool) {
        let value = self.metric.value(state);
        (value.min(self.max_progress), value >= self.max_progress)
    }

    fn reward(&self) -> AchievementReward {
        AchievementReward {
            coins: (self.coins > 0).then_some(self.coins),
            gems: (self.gems > 0).then_some(self.gems),
            special: self.special.map(str::to_string),
        }
    }

    fn instantiate(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            max_progress: self.max_progress,
            reward: self.reward(),
            unlocked: false,
            unlocked_at: None,
            progress: 0,
        }
    }
}

pub const ACHIEVEMENT_DEFINITIONS: [AchievementDef; 18] = [
    AchievementDef::new(
        "first_victory",
        "First Victory",
        "Win your first battle",
        "🏆",
        Metric::ZonesCleared,
        1,
        (50, 5),
    ),
    AchievementDef::new(
        "zone_master_10",
        "Zone Explorer",
        "Reach Zone 10",
        "🗺️",
        Metric::Zone,
        10,
        (200, 10),
    ),
    AchievementDef::new(
        "zone_master_25",
        "Zone Conqueror",
        "Reach Zone 25",
        "⚔️",
        Metric::Zone,
        25,
        (500, 25),
    ),
    AchievementDef::new(
        "zone_master_50",
        "Zone Legend",
        "Reach Zone 50 and unlock Premium",
        "👑",
        Metric::Zone,
        50,
        (1_000, 50),
    )
    .with_special(PREMIUM_ACCESS),
    AchievementDef::new(
        "zone_master_100",
        "Zone Master",
        "Reach Zone 100",
        "🏔️",
        Metric::Zone,
        100,
        (2_000, 100),
    ),
    AchievementDef::new(
        "collector_25",
        "Item Collector",
        "Collect 25 different items",
        "📦",
        Metric::DistinctItems,
        25,
        (300, 15),
    ),
    AchievementDef::new(
        "collector_50",
        "Master Collector",
        "Collect 50 different items",
        "🎒",
        Metric::DistinctItems,
        50,
        (750, 35),
    ),
    AchievementDef::new(
        "scholar_tier_5",
        "Scholar",
        "Reach Research Level 5",
        "🧠",
        Metric::ResearchLevel,
        5,
        (400, 20),
    ),
    AchievementDef::new(
        "scholar_tier_10",
        "Master Scholar",
        "Reach Research Level 10",
        "📚",
        Metric::ResearchLevel,
        10,
        (800, 40),
    ),
    AchievementDef::new(
        "streak_master_10",
        "Knowledge Streak",
        "Get 10 correct answers in a row",
        "🔥",
        Metric::BestStreak,
        10,
        (250, 12),
    ),
    AchievementDef::new(
        "streak_master_25",
        "Genius Streak",
        "Get 25 correct answers in a row",
        "⚡",
        Metric::BestStreak,
        25,
        (600, 30),
    ),
    AchievementDef::new(
        "wealthy_1000",
        "Coin Collector",
        "Earn 1000 total coins",
        "💰",
        Metric::CoinsEarned,
        1_000,
        (0, 20),
    ),
    AchievementDef::new(
        "wealthy_10000",
        "Rich Adventurer",
        "Earn 10,000 total coins",
        "💎",
        Metric::CoinsEarned,
        10_000,
        (0, 50),
    ),
    AchievementDef::new(
        "gem_collector_100",
        "Gem Collector",
        "Earn 100 total gems",
        "💎",
        Metric::GemsEarned,
        100,
        (500, 0),
    ),
    AchievementDef::new(
        "chest_opener_10",
        "Treasure Hunter",
        "Open 10 chests",
        "🗝️",
        Metric::ChestsOpened,
        10,
        (200, 10),
    ),
    AchievementDef::new(
        "warrior_100",
        "Warrior",
        "Win 100 battles",
        "⚔️",
        Metric::Victories,
        100,
        (1_000, 50),
    ),
    AchievementDef::new(
        "miner_100",
        "Gem Miner",
        "Mine 100 gems",
        "⛏️",
        Metric::GemsMined,
        100,
        (500, 25),
    ),
    AchievementDef::new(
        "trader_first",
        "First Trade",
        "Buy your first item from the auction house",
        "🏛️",
        Metric::AuctionPurchases,
        1,
        (100, 5),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AchievementReward {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coins: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gems: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub max_progress: u64,
    #[serde(default)]
    pub reward: AchievementReward,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: u64,
}

#[must_use]
pub fn initialize_achievements() -> Vec<Achievement> {
    ACHIEVEMENT_DEFINITIONS
        .iter()
        .map(AchievementDef::instantiate)
        .collect()
}

fn is_unlocked(state: &GameState, id: &str) -> bool {
    state
        .achievements
        .iter()
        .any(|a| a.id == id && a.unlocked)
}

/// Achievements whose condition now holds but that are not yet unlocked.
#[must_use]
pub fn check_achievements(state: &GameState, now: DateTime<Utc>) -> Vec<Achievement> {
    ACHIEVEMENT_DEFINITIONS
        .iter()
        .filter(|def| !is_unlocked(state, def.id))
        .filter_map(|def| {
            let (_, unlock) = def.evaluate(state);
            unlock.then(|| Achievement {
                unlocked: true,
                unlocked_at: Some(now),
                progress: def.max_progress,
                ..def.instantiate()
            })
        })
        .collect()
}

/// Write current progress onto every locked achievement.
pub fn refresh_achievement_progress(state: &mut GameState) {
    for def in &ACHIEVEMENT_DEFINITIONS {
        let (progress, _) = def.evaluate(state);
        if let Some(entry) = state
            .achievements
            .iter_mut()
            .find(|a| a.id == def.id && !a.unlocked)
        {
            entry.progress = progress;
        }
    }
}

/// Mark unlocks in state and grant their rewards. Already-unlocked entries are skipped.
pub fn apply_achievement_unlocks(state: &mut GameState, unlocks: &[Achievement]) {
    for unlock in unlocks {
        match state.achievements.iter_mut().find(|a| a.id == unlock.id) {
            Some(entry) if entry.unlocked => continue,
            Some(entry) => *entry = unlock.clone(),
            None => state.achievements.push(unlock.clone()),
        }
        state.coins = state.coins.saturating_add(unlock.reward.coins.unwrap_or(0));
        state.gems = state.gems.saturating_add(unlock.reward.gems.unwrap_or(0));
        if unlock.reward.special.as_deref() == Some(PREMIUM_ACCESS) {
            state.is_premium = true;
        }
        log::info!("achievement unlocked: {}", unlock.name);
    }
}
