//! Player tags: cosmetic titles unlocked by long-term milestones.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::Metric;
use crate::state::GameState;

#[derive(Debug, Clone, Copy)]
pub struct TagDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub metric: Metric,
    pub threshold: u64,
}

impl TagDef {
    #[must_use]
    pub fn is_met(&self, state: &GameState) -> bool {
        self.metric.value(state) >= self.threshold
    }

    fn instantiate(&self) -> PlayerTag {
        PlayerTag {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            color: self.color.to_string(),
            unlocked: false,
            unlocked_at: None,
        }
    }
}

pub const TAG_DEFINITIONS: [TagDef; 12] = [
    TagDef {
        id: "zone_explorer",
        name: "Zone Explorer",
        description: "Reach Zone 25",
        icon: "🗺️",
        color: "text-green-400",
        metric: Metric::Zone,
        threshold: 25,
    },
    TagDef {
        id: "zone_master",
        name: "Zone Master",
        description: "Reach Zone 100",
        icon: "🏔️",
        color: "text-blue-400",
        metric: Metric::Zone,
        threshold: 100,
    },
    TagDef {
        id: "coin_collector",
        name: "Coin Collector",
        description: "Earn 10,000 total coins",
        icon: "💰",
        color: "text-yellow-400",
        metric: Metric::CoinsEarned,
        threshold: 10_000,
    },
    TagDef {
        id: "gem_collector",
        name: "Gem Collector",
        description: "Earn 1,000 total gems",
        icon: "💎",
        color: "text-purple-400",
        metric: Metric::GemsEarned,
        threshold: 1_000,
    },
    TagDef {
        id: "knowledge_master",
        name: "Knowledge Master",
        description: "Answer 1,000 questions correctly",
        icon: "🧠",
        color: "text-blue-400",
        metric: Metric::CorrectAnswers,
        threshold: 1_000,
    },
    TagDef {
        id: "streak_master",
        name: "Streak Master",
        description: "Get 50 correct answers in a row",
        icon: "🔥",
        color: "text-orange-400",
        metric: Metric::BestStreak,
        threshold: 50,
    },
    TagDef {
        id: "warrior",
        name: "Warrior",
        description: "Win 500 battles",
        icon: "⚔️",
        color: "text-red-400",
        metric: Metric::Victories,
        threshold: 500,
    },
    TagDef {
        id: "collector",
        name: "Collector",
        description: "Collect 50 different items",
        icon: "📦",
        color: "text-cyan-400",
        metric: Metric::DistinctItems,
        threshold: 50,
    },
    TagDef {
        id: "miner",
        name: "Miner",
        description: "Mine 1,000 gems",
        icon: "⛏️",
        color: "text-gray-400",
        metric: Metric::GemsMined,
        threshold: 1_000,
    },
    TagDef {
        id: "scholar",
        name: "Scholar",
        description: "Reach Research Level 25",
        icon: "📚",
        color: "text-blue-400",
        metric: Metric::ResearchLevel,
        threshold: 25,
    },
    TagDef {
        id: "premium_member",
        name: "Premium Member",
        description: "Unlock Premium status",
        icon: "👑",
        color: "text-yellow-400",
        metric: Metric::Premium,
        threshold: 1,
    },
    TagDef {
        id: "trader",
        name: "Trader",
        description: "Complete 10 auction house transactions",
        icon: "🏛️",
        color: "text-indigo-400",
        metric: Metric::AuctionTransactions,
        threshold: 10,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTag {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[must_use]
pub fn initialize_player_tags() -> Vec<PlayerTag> {
    TAG_DEFINITIONS.iter().map(TagDef::instantiate).collect()
}

/// Tags whose milestone now holds but that are not yet unlocked.
#[must_use]
pub fn check_player_tags(state: &GameState, now: DateTime<Utc>) -> Vec<PlayerTag> {
    TAG_DEFINITIONS
        .iter()
        .filter(|def| {
            !state
                .player_tags
                .iter()
                .any(|t| t.id == def.id && t.unlocked)
        })
        .filter(|def| def.is_met(state))
        .map(|def| PlayerTag {
            unlocked: true,
            unlocked_at: Some(now),
            ..def.instantiate()
        })
        .collect()
}

pub fn apply_tag_unlocks(state: &mut GameState, unlocks: &[PlayerTag]) {
    for unlock in unlocks {
        match state.player_tags.iter_mut().find(|t| t.id == unlock.id) {
            Some(entry) => *entry = unlock.clone(),
            None => state.player_tags.push(unlock.clone()),
        }
        log::info!("player tag unlocked: {}", unlock.name);
    }
}
