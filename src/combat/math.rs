//! Pure combat formulas.
//!
//! Everything here is a function of its arguments. The only randomized
//! helpers are the `roll_*` functions at the bottom, which take the caller's
//! RNG so tests can pin outcomes.

use super::types::Stats;
use crate::core::constants::*;
use rand::Rng;

/// The slice of an actor the hit/crit/damage formulas care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatProfile {
    pub level: u32,
    pub stats: Stats,
    /// Base damage of one swing before strength and crits.
    pub base_damage: f64,
}

/// Diminishing-returns curve shared by every soft-capped stat.
///
/// Approaches `cap` as `stat` grows and equals `cap / 2` at `stat == soft`.
pub fn soft_cap(stat: f64, cap: f64, soft: f64) -> f64 {
    let stat = stat.max(0.0);
    if stat + soft <= 0.0 {
        return 0.0;
    }
    cap * stat / (stat + soft)
}

pub fn accuracy(stats: &Stats) -> f64 {
    soft_cap(stats.dexterity as f64, ACCURACY_CAP, ACCURACY_SOFT)
}

pub fn evasion(stats: &Stats) -> f64 {
    soft_cap(stats.agility as f64, EVASION_CAP, EVASION_SOFT)
}

/// Probability that a swing from `attacker` lands on `defender`.
///
/// The level gap sets a base chance inside [`BASE_HIT_MIN`, `BASE_HIT_MAX`];
/// the accuracy/evasion contest then shifts it, and the result is clamped to
/// [`HIT_MIN`, `HIT_MAX`].
pub fn hit_chance(attacker: &CombatProfile, defender: &CombatProfile) -> f64 {
    let level_diff = attacker.level as f64 - defender.level as f64;
    let base = (BASE_HIT + level_diff * LEVEL_HIT_SLOPE).clamp(BASE_HIT_MIN, BASE_HIT_MAX);

    let acc = accuracy(&attacker.stats);
    let eva = evasion(&defender.stats);
    let adjust = (acc - eva) / (acc + eva + STAT_ADJ_K);

    (base + adjust).clamp(HIT_MIN, HIT_MAX)
}

pub fn crit_chance(attacker: &CombatProfile) -> f64 {
    let bonus = accuracy(&attacker.stats) / ACCURACY_CAP * CRIT_BONUS_MAX;
    (CRIT_BASE + bonus).clamp(CRIT_BASE, CRIT_CAP)
}

/// Damage before mitigation.
pub fn raw_damage(base_damage: f64, strength: u32, is_crit: bool) -> f64 {
    let scaled = base_damage.max(0.0) * (1.0 + strength as f64 * STR_DAMAGE_PER_POINT);
    if is_crit {
        scaled * CRIT_MULT
    } else {
        scaled
    }
}

/// Fraction of incoming damage absorbed by armor.
pub fn mitigation_fraction(ac: u32) -> f64 {
    let ac = ac as f64;
    ac / (ac + AC_MITIGATION_M)
}

/// Damage after armor. Never below 1.
pub fn ac_mitigation(raw: f64, ac: u32) -> u32 {
    let after = (raw.max(0.0) * (1.0 - mitigation_fraction(ac))).floor();
    (after as u32).max(1)
}

pub fn max_hp(base: f64, constitution: u32) -> f64 {
    (base * (1.0 + constitution as f64 * CON_HP_PER_POINT)).floor()
}

pub fn max_mana(base: f64, primary: u32) -> f64 {
    base + primary as f64 * MANA_PER_PRIMARY
}

pub fn mana_regen_per_second(primary: u32) -> f64 {
    MANA_REGEN_BASE + soft_cap(primary as f64, MANA_REGEN_CAP, MANA_REGEN_SOFT)
}

fn charisma_effect(charisma: u32) -> f64 {
    soft_cap(charisma as f64, CHA_CAP, CHA_SOFT)
}

/// Merchant buy price after the charisma discount.
pub fn buy_price(base: f64, charisma: u32) -> f64 {
    base * (1.0 - BUY_DISCOUNT_MAX * charisma_effect(charisma) / 100.0)
}

/// Merchant payout after the charisma bonus.
pub fn sell_value(base: f64, charisma: u32) -> f64 {
    base * (1.0 + SELL_BONUS_MAX * charisma_effect(charisma) / 100.0)
}

// ── Rolls ───────────────────────────────────────────────────────

/// True with probability `chance`.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

/// Uniform float in `[min, max)`.
pub fn roll_range(min: f64, max: f64, rng: &mut impl Rng) -> f64 {
    if max <= min {
        return min;
    }
    min + (max - min) * rng.gen::<f64>()
}

/// Uniform integer in `[min, max]`.
///
/// Built on a single float draw so constant test sources always terminate.
pub fn roll_int(min: u32, max: u32, rng: &mut impl Rng) -> u32 {
    if max <= min {
        return min;
    }
    let span = (max - min + 1) as f64;
    let offset = (rng.gen::<f64>() * span).floor() as u32;
    (min + offset).min(max)
}
