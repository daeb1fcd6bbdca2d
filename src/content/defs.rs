//! Read-only content records: actions, classes, races, items, mobs, zones.
//!
//! These are plain values loaded once. The engine never mutates them.

use crate::combat::resist::{ResistMeta, ResistValues};
use crate::combat::types::{CasterStat, StatMods, Stats};
use crate::skills::magic::Specialization;
use crate::skills::weapon::WeaponType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Actions ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Spell,
    Ability,
    Utility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    #[serde(rename = "self")]
    SelfOnly,
    Ally,
    Enemy,
    AoeEnemies,
    #[serde(alias = "xt_enemy")]
    SecondaryEnemy,
}

/// Who may use an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedUsers {
    pub players: Vec<String>,
    pub mobs: bool,
}

impl AllowedUsers {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && !self.mobs
    }

    pub fn allows_class(&self, class: &str) -> bool {
        self.players.iter().any(|p| p == class)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCost {
    pub mana: f64,
    pub endurance: f64,
}

/// Extra max damage earned every `interval_levels`, up to `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBonus {
    pub interval_levels: u32,
    pub cap: f64,
}

impl LevelBonus {
    pub fn at_level(&self, level: u32) -> f64 {
        if self.interval_levels == 0 {
            return 0.0;
        }
        ((level / self.interval_levels) as f64).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffStat {
    Armor,
    Haste,
    Accuracy,
    Damage,
    Mitigation,
}

/// What an action does when it lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEffect {
    Damage {
        min: f64,
        max: f64,
        #[serde(default)]
        level_bonus: Option<LevelBonus>,
    },
    AreaDamage {
        min: f64,
        max: f64,
        max_targets: usize,
        /// Each extra target takes a smaller share.
        #[serde(default)]
        diminishing: bool,
        /// Roll the caster's weapon damage instead of `min..max`.
        #[serde(default)]
        uses_weapon_damage: bool,
    },
    Heal {
        min: f64,
        max: f64,
    },
    DamageOverTime {
        base: f64,
        max: f64,
        /// Caster levels per extra point of damage per tick. Zero disables scaling.
        #[serde(default)]
        levels_per_point: u32,
        duration_ticks: u32,
        #[serde(default)]
        armor_shred: f64,
    },
    Mesmerize {
        duration_ticks: u32,
    },
    Fear {
        level_cap: u32,
        base_duration_ticks: u32,
        bonus_at_level: u32,
        min_duration_ticks: u32,
    },
    Ward {
        amount: f64,
        duration_ticks: u32,
    },
    Buff {
        stat: BuffStat,
        amount: f64,
        duration_ticks: u32,
    },
    RestoreMana {
        fraction: f64,
    },
    Taunt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: String,
    pub name: String,
    pub kind: ActionKind,
    pub users: AllowedUsers,
    pub target: TargetMode,
    #[serde(default)]
    pub cooldown_ticks: u32,
    #[serde(default)]
    pub cost: ActionCost,
    /// Zero resolves instantly.
    #[serde(default)]
    pub cast_time_ticks: u32,
    #[serde(default)]
    pub specialization: Option<Specialization>,
    #[serde(default)]
    pub resist: Option<ResistMeta>,
    pub effect: ActionEffect,
}

// ── Classes and races ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedAction {
    pub action: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub key: String,
    pub name: String,
    pub role: String,
    /// Gold to recruit.
    pub cost: u64,
    pub base_hp: f64,
    pub weapon: WeaponType,
    pub weapon_damage: f64,
    pub weapon_delay: f64,
    #[serde(default)]
    pub caster_stat: Option<CasterStat>,
    #[serde(default)]
    pub base_mana: f64,
    #[serde(default)]
    pub mana_regen: f64,
    #[serde(default)]
    pub base_endurance: f64,
    #[serde(default)]
    pub endurance_regen: f64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub actions: Vec<LearnedAction>,
}

impl ClassDef {
    /// Action ids known at `level`, in table order.
    pub fn actions_at(&self, level: u32) -> Vec<String> {
        self.actions
            .iter()
            .filter(|a| a.level <= level)
            .map(|a| a.action.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceDef {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub stat_mods: StatMods,
    #[serde(default)]
    pub resist_mods: ResistValues,
}

// ── Items ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipBonus {
    pub stats: StatMods,
    pub damage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub equip: Option<EquipBonus>,
}

fn default_max_stack() -> u32 {
    1
}

// ── Mobs and zones ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub chance: f64,
    #[serde(default = "default_quantity")]
    pub min_qty: u32,
    #[serde(default = "default_quantity")]
    pub max_qty: u32,
}

fn default_quantity() -> u32 {
    1
}

fn default_delay() -> f64 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobDef {
    pub id: String,
    pub name: String,
    pub base_hp: f64,
    pub base_damage: f64,
    #[serde(default = "default_delay")]
    pub delay: f64,
    #[serde(default)]
    pub named: bool,
    /// Flat XP reward; when absent the zone formula applies.
    #[serde(default)]
    pub xp: Option<u64>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub resists: ResistValues,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub base_mana: f64,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEnemy {
    pub mob: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAreaDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub discovered: bool,
    #[serde(default)]
    pub discovery_chance: f64,
    #[serde(default)]
    pub weight_modifiers: BTreeMap<String, f64>,
}

fn default_kills_to_travel() -> u32 {
    crate::core::constants::KILLS_FOR_NEXT_ZONE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDef {
    pub number: u32,
    pub id: String,
    pub name: String,
    pub level_min: u32,
    pub level_max: u32,
    #[serde(default)]
    pub dungeon: bool,
    /// Chance that a second enemy joins a fresh encounter.
    #[serde(default)]
    pub aggro_chance: f64,
    #[serde(default = "default_kills_to_travel")]
    pub kills_to_travel: u32,
    pub enemies: Vec<ZoneEnemy>,
    #[serde(default)]
    pub sub_areas: Vec<SubAreaDef>,
}
