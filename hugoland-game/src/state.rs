use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::achievements::{Achievement, initialize_achievements};
use crate::auction::AuctionHouse;
use crate::combat::Enemy;
use crate::constants::{
    MAX_OFFLINE_HOURS, RESEARCH_BONUS_PER_LEVEL, START_ATK, START_COINS, START_DEF,
    START_EXPERIENCE_TO_NEXT, START_GEMS, START_HP, START_SURVIVAL_LIVES, WEAPON_ATK_MULTIPLIER,
};
use crate::items::{Armor, Equipment, ItemKind, Rarity, Weapon};
use crate::session::RngCursor;
use crate::tags::{PlayerTag, initialize_player_tags};

/// Flat stat bonus granted by the research level. Level 1 grants nothing.
#[must_use]
pub const fn research_bonus(level: u32) -> u32 {
    level.saturating_sub(1).saturating_mul(RESEARCH_BONUS_PER_LEVEL)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub base_atk: u32,
    pub base_def: u32,
    pub base_hp: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: START_HP,
            max_hp: START_HP,
            atk: START_ATK,
            def: START_DEF,
            base_atk: START_ATK,
            base_def: START_DEF,
            base_hp: START_HP,
        }
    }
}

impl PlayerStats {
    /// Recompute attack. An equipped weapon doubles the base attack.
    pub fn apply_weapon(&mut self, weapon: Option<&Weapon>, research_level: u32) {
        let bonus = research_bonus(research_level);
        self.atk = match weapon {
            Some(w) => self
                .base_atk
                .saturating_mul(WEAPON_ATK_MULTIPLIER)
                .saturating_add(w.base_atk)
                .saturating_add(bonus),
            None => self.base_atk.saturating_add(bonus),
        };
    }

    pub fn apply_armor(&mut self, armor: Option<&Armor>, research_level: u32) {
        let bonus = research_bonus(research_level);
        self.def = self
            .base_def
            .saturating_add(armor.map_or(0, |a| a.base_def))
            .saturating_add(bonus);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub weapons: Vec<Weapon>,
    pub armor: Vec<Armor>,
    pub current_weapon: Option<Weapon>,
    pub current_armor: Option<Armor>,
}

impl Inventory {
    #[must_use]
    pub fn find_weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn find_armor(&self, id: &str) -> Option<&Armor> {
        self.armor.iter().find(|a| a.id == id)
    }

    /// Kind of the owned item with this id, if any.
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        if self.find_weapon(id).is_some() {
            Some(ItemKind::Weapon)
        } else if self.find_armor(id).is_some() {
            Some(ItemKind::Armor)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.kind_of(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len() + self.armor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty() && self.armor.is_empty()
    }

    /// Add an item to the list matching its kind.
    pub fn insert(&mut self, item: Equipment) {
        match item {
            Equipment::Weapon(w) => self.weapons.push(w),
            Equipment::Armor(a) => self.armor.push(a),
        }
    }

    /// Remove an item by id, clearing the matching equipment slot.
    ///
    /// Returns the item and whether it was equipped.
    pub fn take(&mut self, id: &str) -> Option<(Equipment, bool)> {
        if let Some(pos) = self.weapons.iter().position(|w| w.id == id) {
            let weapon = self.weapons.remove(pos);
            let equipped = self.current_weapon.as_ref().is_some_and(|w| w.id == id);
            if equipped {
                self.current_weapon = None;
            }
            return Some((weapon.into(), equipped));
        }
        if let Some(pos) = self.armor.iter().position(|a| a.id == id) {
            let armor = self.armor.remove(pos);
            let equipped = self.current_armor.as_ref().is_some_and(|a| a.id == id);
            if equipped {
                self.current_armor = None;
            }
            return Some((armor.into(), equipped));
        }
        None
    }

    /// Every owned item id, weapons first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.weapons
            .iter()
            .map(|w| w.id.as_str())
            .chain(self.armor.iter().map(|a| a.id.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Research {
    pub level: u32,
    pub total_spent: u64,
    pub available_upgrades: Vec<String>,
}

impl Default for Research {
    fn default() -> Self {
        Self {
            level: 1,
            total_spent: 0,
            available_upgrades: vec!["atk".to_string(), "def".to_string(), "hp".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RarityStats {
    pub common: u64,
    pub rare: u64,
    pub epic: u64,
    pub legendary: u64,
    pub mythical: u64,
}

impl RarityStats {
    fn bump(&mut self, rarity: Rarity) {
        let slot = match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Rare => &mut self.rare,
            Rarity::Epic => &mut self.epic,
            Rarity::Legendary => &mut self.legendary,
            Rarity::Mythical => &mut self.mythical,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Names of every item ever found, keyed by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CollectionBook {
    pub weapons: BTreeMap<String, bool>,
    pub armor: BTreeMap<String, bool>,
    pub total_weapons_found: u64,
    pub total_armor_found: u64,
    pub rarity_stats: RarityStats,
}

impl CollectionBook {
    /// Record a found item; the distinct totals only grow on a new name.
    pub fn record(&mut self, item: &Equipment) {
        self.rarity_stats.bump(item.rarity());
        let (book, total) = match item.kind() {
            ItemKind::Weapon => (&mut self.weapons, &mut self.total_weapons_found),
            ItemKind::Armor => (&mut self.armor, &mut self.total_armor_found),
        };
        if book.insert(item.name().to_string(), true).is_none() {
            *total += 1;
        }
    }

    #[must_use]
    pub const fn distinct_items(&self) -> u64 {
        self.total_weapons_found + self.total_armor_found
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStreak {
    pub current: u32,
    pub best: u32,
    pub multiplier: u32,
}

impl Default for KnowledgeStreak {
    fn default() -> Self {
        Self {
            current: 0,
            best: 0,
            multiplier: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameModeKind {
    #[default]
    Normal,
    Blitz,
    Bloodlust,
    Survival,
}

impl GameModeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Blitz => "blitz",
            Self::Bloodlust => "bloodlust",
            Self::Survival => "survival",
        }
    }
}

impl fmt::Display for GameModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameModeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "blitz" => Ok(Self::Blitz),
            "bloodlust" => Ok(Self::Bloodlust),
            "survival" => Ok(Self::Survival),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModeState {
    pub current: GameModeKind,
    pub speed_mode_active: bool,
    pub survival_lives: u32,
    pub max_survival_lives: u32,
}

impl Default for GameModeState {
    fn default() -> Self {
        Self {
            current: GameModeKind::Normal,
            speed_mode_active: false,
            survival_lives: START_SURVIVAL_LIVES,
            max_survival_lives: START_SURVIVAL_LIVES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryAccuracy {
    pub correct: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_questions_answered: u64,
    pub correct_answers: u64,
    pub total_play_time: u64,
    pub zones_reached: u32,
    pub items_collected: u64,
    pub coins_earned: u64,
    pub gems_earned: u64,
    pub shiny_gems_earned: u64,
    pub chests_opened: u64,
    pub accuracy_by_category: BTreeMap<String, CategoryAccuracy>,
    pub session_start_time: DateTime<Utc>,
    pub total_deaths: u64,
    pub total_victories: u64,
    pub longest_streak: u32,
    pub fastest_victory: u64,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub items_upgraded: u64,
    pub items_sold: u64,
    pub total_research_spent: u64,
    pub average_accuracy: f64,
    pub revivals: u64,
    pub auction_purchases: u64,
    pub auction_transactions: u64,
}

impl Statistics {
    fn starting(now: DateTime<Utc>) -> Self {
        Self {
            zones_reached: 1,
            session_start_time: now,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cheat {
    InfiniteCoins,
    InfiniteGems,
    ObtainAnyItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cheats {
    pub infinite_coins: bool,
    pub infinite_gems: bool,
    pub obtain_any_item: bool,
}

impl Cheats {
    pub fn toggle(&mut self, cheat: Cheat) -> bool {
        let slot = match cheat {
            Cheat::InfiniteCoins => &mut self.infinite_coins,
            Cheat::InfiniteGems => &mut self.infinite_gems,
            Cheat::ObtainAnyItem => &mut self.obtain_any_item,
        };
        *slot = !*slot;
        *slot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mining {
    pub total_gems_mined: u64,
    pub total_shiny_gems_mined: u64,
}

/// Carried through saves untouched; reward shapes are owned by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRewards {
    pub last_claim_date: Option<DateTime<Utc>>,
    pub current_streak: u32,
    pub max_streak: u32,
    pub available_reward: Option<serde_json::Value>,
    pub reward_history: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    pub skill_points: u32,
    pub unlocked_skills: Vec<String>,
    pub prestige_level: u32,
    pub prestige_points: u32,
    pub mastery_levels: BTreeMap<String, u32>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next: START_EXPERIENCE_TO_NEXT,
            skill_points: 0,
            unlocked_skills: Vec::new(),
            prestige_level: 0,
            prestige_points: 0,
            mastery_levels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfflineProgress {
    pub last_save_time: DateTime<Utc>,
    pub offline_coins: u64,
    pub offline_gems: u64,
    pub offline_time: u64,
    pub max_offline_hours: u32,
}

impl Default for OfflineProgress {
    fn default() -> Self {
        Self {
            last_save_time: DateTime::<Utc>::default(),
            offline_coins: 0,
            offline_gems: 0,
            offline_time: 0,
            max_offline_hours: MAX_OFFLINE_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub colorblind_mode: bool,
    pub dark_mode: bool,
    pub language: String,
    pub notifications: bool,
    pub snap_to_grid: bool,
    pub beauty_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colorblind_mode: false,
            dark_mode: true,
            language: "en".to_string(),
            notifications: true,
            snap_to_grid: false,
            beauty_mode: false,
        }
    }
}

/// Partial settings update; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub colorblind_mode: Option<bool>,
    pub dark_mode: Option<bool>,
    pub language: Option<String>,
    pub notifications: Option<bool>,
    pub snap_to_grid: Option<bool>,
    pub beauty_mode: Option<bool>,
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.colorblind_mode {
            self.colorblind_mode = v;
        }
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = patch.language {
            self.language = v;
        }
        if let Some(v) = patch.notifications {
            self.notifications = v;
        }
        if let Some(v) = patch.snap_to_grid {
            self.snap_to_grid = v;
        }
        if let Some(v) = patch.beauty_mode {
            self.beauty_mode = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    pub active_menu_skill: Option<serde_json::Value>,
    pub last_roll_time: Option<DateTime<Utc>>,
    pub play_time_this_session: u64,
    pub session_start_time: DateTime<Utc>,
}

/// The single aggregate root for a player's game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub coins: u64,
    pub gems: u64,
    #[serde(default)]
    pub shiny_gems: u64,
    pub zone: u32,
    pub player_stats: PlayerStats,
    pub inventory: Inventory,
    #[serde(default)]
    pub current_enemy: Option<Enemy>,
    #[serde(default)]
    pub in_combat: bool,
    #[serde(default)]
    pub combat_log: Vec<String>,
    #[serde(default)]
    pub research: Research,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default = "initialize_achievements")]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub collection_book: CollectionBook,
    #[serde(default)]
    pub knowledge_streak: KnowledgeStreak,
    #[serde(default)]
    pub game_mode: GameModeState,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub cheats: Cheats,
    #[serde(default)]
    pub mining: Mining,
    #[serde(default = "initialize_player_tags")]
    pub player_tags: Vec<PlayerTag>,
    #[serde(default)]
    pub daily_rewards: DailyRewards,
    #[serde(default)]
    pub progression: Progression,
    #[serde(default)]
    pub offline_progress: OfflineProgress,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub has_used_revival: bool,
    #[serde(default)]
    pub skills: Skills,
    /// Opaque to the engine; kept so the whole tree survives a resave.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub adventure_skills: serde_json::Value,
    pub auction_house: AuctionHouse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_cursor: Option<RngCursor>,
    /// Top-level keys this engine does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl GameState {
    /// Starting state with an empty auction pool.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            coins: START_COINS,
            gems: START_GEMS,
            shiny_gems: 0,
            zone: 1,
            player_stats: PlayerStats::default(),
            inventory: Inventory::default(),
            current_enemy: None,
            in_combat: false,
            combat_log: Vec::new(),
            research: Research::default(),
            is_premium: false,
            achievements: initialize_achievements(),
            collection_book: CollectionBook::default(),
            knowledge_streak: KnowledgeStreak::default(),
            game_mode: GameModeState::default(),
            statistics: Statistics::starting(now),
            cheats: Cheats::default(),
            mining: Mining::default(),
            player_tags: initialize_player_tags(),
            daily_rewards: DailyRewards::default(),
            progression: Progression::default(),
            offline_progress: OfflineProgress {
                last_save_time: now,
                ..OfflineProgress::default()
            },
            settings: Settings::default(),
            has_used_revival: false,
            skills: Skills {
                session_start_time: now,
                ..Skills::default()
            },
            adventure_skills: serde_json::Value::Null,
            auction_house: AuctionHouse::empty(now),
            rng_cursor: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Starting state with a freshly generated auction pool.
    pub fn fresh(now: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        let mut state = Self::new(now);
        state.auction_house = AuctionHouse::generated(now, rng);
        state
    }

    /// Recompute both equipment-derived stats from the current slots.
    pub fn recompute_equipment_stats(&mut self) {
        let level = self.research.level;
        self.player_stats
            .apply_weapon(self.inventory.current_weapon.as_ref(), level);
        self.player_stats
            .apply_armor(self.inventory.current_armor.as_ref(), level);
    }

    /// Recompute the stat tied to one slot after it was emptied.
    pub(crate) fn refresh_unequipped(&mut self, kind: ItemKind) {
        let level = self.research.level;
        match kind {
            ItemKind::Weapon => self.player_stats.apply_weapon(None, level),
            ItemKind::Armor => self.player_stats.apply_armor(None, level),
        }
    }

    /// Whether any container (inventory, public pool, player listings) holds an item with `id`.
    #[must_use]
    pub fn holds_item_id(&self, id: &str) -> bool {
        let house = &self.auction_house;
        self.inventory.contains(id)
            || house
                .items
                .iter()
                .chain(&house.player_listings)
                .any(|l| l.item.id() == id)
    }

    /// Debit coins unless the infinite-coins cheat is active.
    pub(crate) fn spend_coins(&mut self, amount: u64) {
        if !self.cheats.infinite_coins {
            self.coins -= amount;
        }
    }

    pub(crate) fn can_afford_coins(&self, amount: u64) -> bool {
        self.cheats.infinite_coins || self.coins >= amount
    }

    pub(crate) fn spend_gems(&mut self, amount: u64) {
        if !self.cheats.infinite_gems {
            self.gems -= amount;
        }
    }

    pub(crate) fn can_afford_gems(&self, amount: u64) -> bool {
        self.cheats.infinite_gems || self.gems >= amount
    }

    pub(crate) fn earn_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
        self.statistics.coins_earned = self.statistics.coins_earned.saturating_add(amount);
    }

    pub(crate) fn earn_gems(&mut self, amount: u64) {
        self.gems = self.gems.saturating_add(amount);
        self.statistics.gems_earned = self.statistics.gems_earned.saturating_add(amount);
    }

    /// Put a newly obtained item into the inventory and the collection book.
    pub(crate) fn collect_item(&mut self, item: Equipment) {
        self.collection_book.record(&item);
        self.statistics.items_collected += 1;
        self.inventory.insert(item);
    }

    #[must_use]
    pub fn unlocked_achievements(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{generate_armor_with_rarity, generate_weapon_with_rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn new_state_matches_starting_values() {
        let state = GameState::default();
        assert_eq!(state.coins, 500);
        assert_eq!(state.gems, 50);
        assert_eq!(state.zone, 1);
        assert_eq!(state.player_stats.atk, 20);
        assert_eq!(state.player_stats.base_atk, 20);
        assert_eq!(state.player_stats.def, 10);
        assert_eq!(state.research.level, 1);
        assert!(state.achievements.iter().all(|a| !a.unlocked));
        assert!(state.player_tags.iter().all(|t| !t.unlocked));
        assert!(state.auction_house.items.is_empty());
    }

    #[test]
    fn fresh_state_fills_auction_pool() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let state = GameState::fresh(Utc::now(), &mut rng);
        assert!((4..=12).contains(&state.auction_house.items.len()));
    }

    #[test]
    fn take_unequips_the_removed_item() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let weapon = generate_weapon_with_rarity(&mut rng, Rarity::Rare);
        let armor = generate_armor_with_rarity(&mut rng, Rarity::Common);
        let mut inventory = Inventory::default();
        inventory.current_weapon = Some(weapon.clone());
        inventory.insert(weapon.clone().into());
        inventory.insert(armor.clone().into());

        let (taken, equipped) = inventory.take(&weapon.id).expect("weapon owned");
        assert!(equipped);
        assert_eq!(taken.id(), weapon.id);
        assert!(inventory.current_weapon.is_none());
        assert_eq!(inventory.len(), 1);

        let (_, equipped) = inventory.take(&armor.id).expect("armor owned");
        assert!(!equipped);
        assert!(inventory.take("missing").is_none());
        assert!(inventory.is_empty());
    }

    #[test]
    fn collection_book_counts_distinct_names() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let weapon: Equipment = generate_weapon_with_rarity(&mut rng, Rarity::Epic).into();
        let mut book = CollectionBook::default();
        book.record(&weapon);
        book.record(&weapon);
        assert_eq!(book.total_weapons_found, 1);
        assert_eq!(book.rarity_stats.epic, 2);
        assert_eq!(book.distinct_items(), 1);
    }

    #[test]
    fn research_bonus_starts_at_zero() {
        assert_eq!(research_bonus(1), 0);
        assert_eq!(research_bonus(4), 15);
        assert_eq!(research_bonus(0), 0);
    }

    #[test]
    fn settings_patch_only_touches_given_fields() {
        let mut settings = Settings::default();
        settings.apply(SettingsPatch {
            language: Some("fr".to_string()),
            dark_mode: Some(false),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.language, "fr");
        assert!(!settings.dark_mode);
        assert!(settings.notifications);
    }

    #[test]
    fn statistics_backfill_missing_fields() {
        let stats: Statistics =
            serde_json::from_str(r#"{"totalVictories": 4, "coinsEarned": 90}"#).unwrap();
        assert_eq!(stats.total_victories, 4);
        assert_eq!(stats.auction_purchases, 0);
    }
}
