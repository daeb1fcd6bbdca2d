//! Auto-attack timing from weapon delay and haste.
//!
//! Delay is measured in tenths of a second; one tick covers
//! [`DELAY_UNITS_PER_TICK`] units. Whatever speed a weapon would have beyond
//! one swing per tick turns into overflow bonuses instead of being lost.

use crate::core::constants::*;

/// Bonuses granted when the effective delay is shorter than one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowBonus {
    pub extra_swing_chance: f64,
    pub damage_mult: f64,
    pub proc_mult: f64,
}

impl Default for OverflowBonus {
    fn default() -> Self {
        Self {
            extra_swing_chance: 0.0,
            damage_mult: 1.0,
            proc_mult: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingTiming {
    pub ticks: u32,
    pub overflow: OverflowBonus,
}

pub fn clamp_haste(haste: f64) -> f64 {
    if haste.is_finite() {
        haste.clamp(HASTE_MIN, HASTE_MAX)
    } else {
        0.0
    }
}

pub fn effective_delay(delay: f64, haste: f64) -> f64 {
    delay.max(0.0) / (1.0 + clamp_haste(haste))
}

/// Ticks between swings. Always at least one.
pub fn swing_ticks(delay: f64, haste: f64) -> u32 {
    let ticks = (effective_delay(delay, haste) / DELAY_UNITS_PER_TICK).ceil();
    (ticks as u32).max(1)
}

pub fn overflow_bonus(delay: f64, haste: f64) -> OverflowBonus {
    if swing_ticks(delay, haste) != 1 {
        return OverflowBonus::default();
    }
    let effective = effective_delay(delay, haste);
    let overflow = ((DELAY_UNITS_PER_TICK - effective) / DELAY_UNITS_PER_TICK).max(0.0);
    let extra_swing_chance = overflow.clamp(0.0, OVERFLOW_EXTRA_SWING_CAP);
    let beyond = (overflow - OVERFLOW_EXTRA_SWING_CAP).max(0.0);

    OverflowBonus {
        extra_swing_chance,
        damage_mult: 1.0 + (beyond * OVERFLOW_DAMAGE_SLOPE).min(OVERFLOW_DAMAGE_CAP),
        proc_mult: 1.0 + (beyond * OVERFLOW_PROC_SLOPE).min(OVERFLOW_PROC_CAP),
    }
}

pub fn swing_timing(delay: f64, haste: f64) -> SwingTiming {
    SwingTiming {
        ticks: swing_ticks(delay, haste),
        overflow: overflow_bonus(delay, haste),
    }
}
