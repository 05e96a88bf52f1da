//! Equipment types and random item generation.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ID_ALPHABET, ID_LEN};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythical,
}

impl Rarity {
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythical,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Mythical => "mythical",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Epic => 2,
            Self::Legendary => 3,
            Self::Mythical => 4,
        }
    }

    const fn profile(self) -> RarityProfile {
        match self {
            Self::Common => RarityProfile {
                atk: (8, 15),
                def: (4, 8),
                sell: (10, 25),
                upgrade_cost: 5,
                durability: 100,
                prefixes: ["Rusty", "Worn", "Plain"],
            },
            Self::Rare => RarityProfile {
                atk: (16, 30),
                def: (9, 15),
                sell: (30, 60),
                upgrade_cost: 10,
                durability: 150,
                prefixes: ["Sturdy", "Fine", "Keen"],
            },
            Self::Epic => RarityProfile {
                atk: (31, 55),
                def: (16, 28),
                sell: (75, 150),
                upgrade_cost: 20,
                durability: 200,
                prefixes: ["Enchanted", "Runed", "Gleaming"],
            },
            Self::Legendary => RarityProfile {
                atk: (56, 90),
                def: (29, 45),
                sell: (200, 400),
                upgrade_cost: 40,
                durability: 300,
                prefixes: ["Ancient", "Heroic", "Dragonforged"],
            },
            Self::Mythical => RarityProfile {
                atk: (91, 150),
                def: (46, 75),
                sell: (500, 1_000),
                upgrade_cost: 80,
                durability: 500,
                prefixes: ["Celestial", "Voidtouched", "Eternal"],
            },
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rarity| rarity.as_str() == s)
            .ok_or(())
    }
}

/// Per-rarity stat envelope used by the generators.
struct RarityProfile {
    atk: (u32, u32),
    def: (u32, u32),
    sell: (u64, u64),
    upgrade_cost: u64,
    durability: u32,
    prefixes: [&'static str; 3],
}

/// Relative odds of each rarity, in [`Rarity::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeights(pub [u32; 5]);

impl RarityWeights {
    #[must_use]
    pub const fn weight(&self, rarity: Rarity) -> u32 {
        self.0[rarity.index()]
    }

    /// Roll a rarity. All-zero weights fall back to common.
    pub fn roll(&self, rng: &mut impl Rng) -> Rarity {
        let total: u32 = self.0.iter().sum();
        if total == 0 {
            return Rarity::Common;
        }
        let mut roll = rng.gen_range(0..total);
        for rarity in Rarity::ALL {
            let weight = self.weight(rarity);
            if roll < weight {
                return rarity;
            }
            roll -= weight;
        }
        Rarity::Common
    }
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self([50, 30, 15, 4, 1])
    }
}

/// Rarity odds for a chest; pricier chests lean toward rarer loot.
#[must_use]
pub const fn chest_rarity_weights(cost: u64) -> RarityWeights {
    match cost {
        0..100 => RarityWeights([70, 25, 5, 0, 0]),
        100..500 => RarityWeights([40, 35, 20, 5, 0]),
        500..1_000 => RarityWeights([15, 35, 35, 13, 2]),
        _ => RarityWeights([0, 20, 40, 30, 10]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub level: u32,
    pub base_atk: u32,
    pub durability: u32,
    pub max_durability: u32,
    pub sell_price: u64,
    pub upgrade_cost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub level: u32,
    pub base_def: u32,
    pub durability: u32,
    pub max_durability: u32,
    pub sell_price: u64,
    pub upgrade_cost: u64,
}

/// A piece of gear of either kind.
///
/// Untagged on the wire: a weapon is recognised by its `baseAtk` field and
/// an armor piece by its `baseDef` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Equipment {
    Weapon(Weapon),
    Armor(Armor),
}

impl Equipment {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Weapon(w) => &w.id,
            Self::Armor(a) => &a.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Weapon(w) => &w.name,
            Self::Armor(a) => &a.name,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Weapon(_) => ItemKind::Weapon,
            Self::Armor(_) => ItemKind::Armor,
        }
    }

    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        match self {
            Self::Weapon(w) => w.rarity,
            Self::Armor(a) => a.rarity,
        }
    }

    #[must_use]
    pub const fn sell_price(&self) -> u64 {
        match self {
            Self::Weapon(w) => w.sell_price,
            Self::Armor(a) => a.sell_price,
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Self::Weapon(w) => w.id = id,
            Self::Armor(a) => a.id = id,
        }
    }

    /// Re-roll the id until no container of `state` holds it.
    pub(crate) fn reroll_id_clashes(&mut self, state: &GameState, rng: &mut impl Rng) {
        while state.holds_item_id(self.id()) {
            self.set_id(generate_id(rng));
        }
    }
}

impl From<Weapon> for Equipment {
    fn from(value: Weapon) -> Self {
        Self::Weapon(value)
    }
}

impl From<Armor> for Equipment {
    fn from(value: Armor) -> Self {
        Self::Armor(value)
    }
}

const WEAPON_NAMES: [&str; 8] = [
    "Sword", "Axe", "Dagger", "Mace", "Spear", "Bow", "Staff", "Hammer",
];
const ARMOR_NAMES: [&str; 8] = [
    "Chestplate",
    "Helmet",
    "Gauntlets",
    "Greaves",
    "Shield",
    "Robe",
    "Mail",
    "Cloak",
];

/// Opaque 9-character base-36 token.
pub fn generate_id(rng: &mut impl Rng) -> String {
    (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

fn roll_name(rng: &mut impl Rng, profile: &RarityProfile, bases: &[&str]) -> String {
    let prefix = profile.prefixes[rng.gen_range(0..profile.prefixes.len())];
    let base = bases[rng.gen_range(0..bases.len())];
    format!("{prefix} {base}")
}

pub fn generate_weapon(rng: &mut impl Rng) -> Weapon {
    let rarity = RarityWeights::default().roll(rng);
    generate_weapon_with_rarity(rng, rarity)
}

pub fn generate_weapon_with_rarity(rng: &mut impl Rng, rarity: Rarity) -> Weapon {
    let profile = rarity.profile();
    Weapon {
        id: generate_id(rng),
        name: roll_name(rng, &profile, &WEAPON_NAMES),
        rarity,
        level: 1,
        base_atk: rng.gen_range(profile.atk.0..=profile.atk.1),
        durability: profile.durability,
        max_durability: profile.durability,
        sell_price: rng.gen_range(profile.sell.0..=profile.sell.1),
        upgrade_cost: profile.upgrade_cost,
    }
}

pub fn generate_armor(rng: &mut impl Rng) -> Armor {
    let rarity = RarityWeights::default().roll(rng);
    generate_armor_with_rarity(rng, rarity)
}

pub fn generate_armor_with_rarity(rng: &mut impl Rng, rarity: Rarity) -> Armor {
    let profile = rarity.profile();
    Armor {
        id: generate_id(rng),
        name: roll_name(rng, &profile, &ARMOR_NAMES),
        rarity,
        level: 1,
        base_def: rng.gen_range(profile.def.0..=profile.def.1),
        durability: profile.durability,
        max_durability: profile.durability,
        sell_price: rng.gen_range(profile.sell.0..=profile.sell.1),
        upgrade_cost: profile.upgrade_cost,
    }
}

/// Weapon or armor with even odds.
pub fn generate_equipment(rng: &mut impl Rng) -> Equipment {
    if rng.gen_bool(0.5) {
        generate_weapon(rng).into()
    } else {
        generate_armor(rng).into()
    }
}

/// Weapon or armor with even odds, rarity drawn from the given weights.
pub fn generate_equipment_weighted(rng: &mut impl Rng, weights: &RarityWeights) -> Equipment {
    let is_weapon = rng.gen_bool(0.5);
    let rarity = weights.roll(rng);
    if is_weapon {
        generate_weapon_with_rarity(rng, rarity).into()
    } else {
        generate_armor_with_rarity(rng, rarity).into()
    }
}
