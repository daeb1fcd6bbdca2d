//! Tuning constants for combat, progression and spawn smoothing.
//!
//! Everything here is a pure number. Runtime knobs that a host may want to
//! change without a rebuild live in [`crate::core::config::EngineConfig`].

// ── Tick clock ──────────────────────────────────────────────────
pub const DEFAULT_TICK_MS: u64 = 3000;
pub const MAX_OFFLINE_SECONDS: u64 = 6 * 60 * 60;

// ── Hit chance ──────────────────────────────────────────────────
pub const BASE_HIT: f64 = 0.75;
pub const LEVEL_HIT_SLOPE: f64 = 0.03;
pub const BASE_HIT_MIN: f64 = 0.35;
pub const BASE_HIT_MAX: f64 = 0.90;
pub const HIT_MIN: f64 = 0.20;
pub const HIT_MAX: f64 = 0.95;

pub const ACCURACY_CAP: f64 = 100.0;
pub const ACCURACY_SOFT: f64 = 80.0;
pub const EVASION_CAP: f64 = 100.0;
pub const EVASION_SOFT: f64 = 80.0;
/// Keeps the accuracy/evasion ratio stable when both sides are near zero.
pub const STAT_ADJ_K: f64 = 50.0;

// ── Critical strikes ────────────────────────────────────────────
pub const CRIT_BASE: f64 = 0.05;
pub const CRIT_BONUS_MAX: f64 = 0.20;
pub const CRIT_CAP: f64 = 0.35;
pub const CRIT_MULT: f64 = 1.5;

// ── Damage, mitigation, pools ───────────────────────────────────
pub const STR_DAMAGE_PER_POINT: f64 = 0.02;
pub const AC_MITIGATION_M: f64 = 100.0;
pub const CON_HP_PER_POINT: f64 = 0.03;
pub const MANA_PER_PRIMARY: f64 = 10.0;
pub const MANA_REGEN_BASE: f64 = 1.0;
pub const MANA_REGEN_CAP: f64 = 6.0;
pub const MANA_REGEN_SOFT: f64 = 100.0;

// ── Merchant prices ─────────────────────────────────────────────
pub const CHA_CAP: f64 = 100.0;
pub const CHA_SOFT: f64 = 120.0;
pub const BUY_DISCOUNT_MAX: f64 = 0.10;
pub const SELL_BONUS_MAX: f64 = 0.10;

// ── Resists ─────────────────────────────────────────────────────
pub const RESIST_BASE: f64 = 50.0;
pub const RESIST_SCALE: f64 = 200.0;
pub const RESIST_MIN_CHANCE: f64 = 0.05;
pub const RESIST_MAX_CHANCE: f64 = 0.95;
pub const RESIST_PARTIAL_STRENGTH: f64 = 0.75;
pub const RESIST_PARTIAL_FLOOR: f64 = 0.10;

// ── Skill ledger ────────────────────────────────────────────────
pub const SKILL_CAP_PER_LEVEL: f64 = 5.0;
pub const HARD_SKILL_CAP: u32 = 300;
pub const SKILL_UP_MIN_PCT: f64 = 0.5;
pub const SKILL_UP_MAX_PCT: f64 = 6.0;
pub const SKILL_UP_DECAY: f64 = 0.99;
pub const TRIVIAL_GAP_LOW: u32 = 3;
pub const TRIVIAL_GAP_HIGH: u32 = 5;
/// Actor levels at or below this use [`TRIVIAL_GAP_LOW`].
pub const TRIVIAL_GAP_LEVEL_SPLIT: u32 = 10;

// ── Weapon skill ────────────────────────────────────────────────
pub const WEAPON_SKILL_FLOOR: f64 = 0.85;
pub const WEAPON_SKILL_RANGE: f64 = 0.15;

// ── Casting ─────────────────────────────────────────────────────
pub const INTERRUPT_BASE: f64 = 0.15;
pub const INTERRUPT_PER_HIT: f64 = 0.10;
pub const INTERRUPT_MIN: f64 = 0.03;
pub const INTERRUPT_MAX: f64 = 0.60;
pub const CHANNELING_REDUCTION_AT_CAP: f64 = 0.10;
pub const INTERRUPT_MANA_FRACTION: f64 = 0.5;

pub const SPEC_MANA_REDUCTION_AT_CAP: f64 = 0.10;
pub const SPEC_SKILL_UP_GATE: f64 = 0.5;

pub const QUALITY_PARTIAL_BASE: f64 = 0.12;
pub const QUALITY_RESIST_BASE: f64 = 0.04;
pub const QUALITY_MASTERY_REDUCTION_AT_CAP: f64 = 0.10;
pub const QUALITY_FULL_MULT: f64 = 1.0;
pub const QUALITY_PARTIAL_MULT: f64 = 0.5;
pub const QUALITY_RESISTED_MULT: f64 = 0.0;

// ── Swing timing ────────────────────────────────────────────────
/// Weapon delay units per tick.
pub const DELAY_UNITS_PER_TICK: f64 = 30.0;
pub const HASTE_MIN: f64 = -0.75;
pub const HASTE_MAX: f64 = 3.0;
pub const OVERFLOW_EXTRA_SWING_CAP: f64 = 0.5;
pub const OVERFLOW_DAMAGE_SLOPE: f64 = 0.2;
pub const OVERFLOW_DAMAGE_CAP: f64 = 0.1;
pub const OVERFLOW_PROC_SLOPE: f64 = 0.4;
pub const OVERFLOW_PROC_CAP: f64 = 0.2;

// ── Named spawn smoothing ───────────────────────────────────────
pub const OUTDOOR_NAMED_COOLDOWN: u32 = 10;
pub const OUTDOOR_NAMED_EXPECTED: u32 = 45;
pub const OUTDOOR_NAMED_PITY_CAP: f64 = 3.0;
pub const DUNGEON_NAMED_COOLDOWN: u32 = 6;
pub const DUNGEON_NAMED_EXPECTED: u32 = 30;
pub const DUNGEON_NAMED_PITY_CAP: f64 = 2.5;

// ── Zones and rewards ───────────────────────────────────────────
pub const KILLS_FOR_NEXT_ZONE: u32 = 10;
pub const MIN_SPAWN_WEIGHT: f64 = 0.01;
/// (zone, party slots) pairs, ascending.
pub const SLOT_UNLOCKS: [(u32, usize); 4] = [(1, 1), (2, 2), (4, 3), (6, 4)];

pub const XP_BASE: u64 = 5;
pub const XP_PER_ZONE: u64 = 3;
pub const XP_PER_LEVEL: u64 = 2;
pub const GOLD_BASE: u64 = 5;
pub const GOLD_PER_ZONE: u64 = 4;
pub const GOLD_PER_LEVEL: u64 = 1;

pub const LEVEL_UP_COST_BASE: f64 = 20.0;
pub const LEVEL_UP_COST_ZONE_SLOPE: f64 = 0.4;

// ── Threat ──────────────────────────────────────────────────────
pub const HEAL_THREAT_FRACTION: f64 = 0.5;

// ── Heroes and enemies ──────────────────────────────────────────
/// Max health and weapon damage grow by this factor per hero level.
pub const HERO_LEVEL_GROWTH: f64 = 1.25;
pub const ENEMY_HP_PER_LEVEL: f64 = 10.0;
pub const ENEMY_DAMAGE_PER_LEVEL: f64 = 1.0;
/// Dexterity and agility an enemy gains per level.
pub const ENEMY_STAT_PER_LEVEL: u32 = 2;

// ── Action resolution ───────────────────────────────────────────
/// Heals are only cast on allies below this health fraction.
pub const HEAL_THRESHOLD: f64 = 0.7;
/// Mana restoration is only used below this mana fraction.
pub const RESTORE_MANA_THRESHOLD: f64 = 0.5;
/// Each extra target of a diminishing area effect takes this much of the
/// previous share.
pub const AREA_FALLOFF: f64 = 0.75;
