//! Resist resolution for spells and abilities.
//!
//! Every action may name a resist bucket. The target's resist in that bucket,
//! the caster's penetration, the action's difficulty and the level gap feed a
//! single probability; one draw decides the outcome.

use crate::core::constants::{
    RESIST_BASE, RESIST_PARTIAL_FLOOR, RESIST_PARTIAL_STRENGTH, RESIST_SCALE,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResistType {
    Magic,
    Elemental,
    Contagion,
    Physical,
}

impl ResistType {
    pub const ALL: [ResistType; 4] = [
        ResistType::Magic,
        ResistType::Elemental,
        ResistType::Contagion,
        ResistType::Physical,
    ];
}

impl fmt::Display for ResistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResistType::Magic => "magic",
            ResistType::Elemental => "elemental",
            ResistType::Contagion => "contagion",
            ResistType::Physical => "physical",
        };
        f.write_str(name)
    }
}

/// One value per resist bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistValues {
    pub magic: f64,
    pub elemental: f64,
    pub contagion: f64,
    pub physical: f64,
}

impl ResistValues {
    pub fn get(&self, kind: ResistType) -> f64 {
        match kind {
            ResistType::Magic => self.magic,
            ResistType::Elemental => self.elemental,
            ResistType::Contagion => self.contagion,
            ResistType::Physical => self.physical,
        }
    }

    fn slot(&mut self, kind: ResistType) -> &mut f64 {
        match kind {
            ResistType::Magic => &mut self.magic,
            ResistType::Elemental => &mut self.elemental,
            ResistType::Contagion => &mut self.contagion,
            ResistType::Physical => &mut self.physical,
        }
    }

    pub fn add(&mut self, kind: ResistType, amount: f64) {
        *self.slot(kind) += amount;
    }

    /// Replaces non-finite entries with zero. Returns how many were fixed.
    pub fn sanitize(&mut self) -> usize {
        let mut fixed = 0;
        for kind in ResistType::ALL {
            let slot = self.slot(kind);
            if !slot.is_finite() {
                *slot = 0.0;
                fixed += 1;
            }
        }
        fixed
    }
}

/// Resists, penetration, and the racial delta currently folded into
/// `resists`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistProfile {
    pub resists: ResistValues,
    pub spell_pen: ResistValues,
    pub racial_applied: ResistValues,
}

impl ResistProfile {
    /// Folds racial bonuses into `resists`.
    ///
    /// Any previously applied racial delta is backed out first, so calling
    /// this repeatedly (or after a race change) never stacks. Penetration is
    /// left alone.
    pub fn apply_racial(&mut self, racial: &ResistValues) {
        for kind in ResistType::ALL {
            let previous = self.racial_applied.get(kind);
            self.resists.add(kind, racial.get(kind) - previous);
        }
        self.racial_applied = *racial;
    }

    pub fn sanitize(&mut self) -> usize {
        self.resists.sanitize() + self.spell_pen.sanitize() + self.racial_applied.sanitize()
    }
}

/// Resist metadata attached to an action definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistMeta {
    #[serde(rename = "type")]
    pub resist_type: ResistType,
    #[serde(default)]
    pub difficulty: f64,
    /// Partial actions are reduced instead of negated.
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub min_chance: Option<f64>,
    #[serde(default)]
    pub max_chance: Option<f64>,
}

/// Anything that can cast at or be targeted by a resistible action.
pub trait Resistant {
    fn level(&self) -> u32;
    fn resist_profile(&self) -> &ResistProfile;
}

/// Outcome of one resist resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistRoll {
    pub resist_type: Option<ResistType>,
    pub chance: f64,
    pub resisted: bool,
    pub effect_multiplier: f64,
    pub partial_percent: u32,
    pub partial: bool,
}

impl ResistRoll {
    pub fn unresisted(resist_type: Option<ResistType>) -> Self {
        Self {
            resist_type,
            chance: 0.0,
            resisted: false,
            effect_multiplier: 1.0,
            partial_percent: 100,
            partial: false,
        }
    }

    /// Log line for a resisted or partially resisted action, if any.
    pub fn log_message(&self, action_name: &str) -> Option<String> {
        let kind = self.resist_type?;
        if self.partial && self.partial_percent < 100 {
            Some(format!(
                "{action_name} partially resisted ({kind}): {}% effect.",
                self.partial_percent
            ))
        } else if self.resisted {
            Some(format!("{action_name} was RESISTED ({kind})!"))
        } else {
            None
        }
    }
}

/// Level-gap term of the resist score. `diff` is target level minus caster
/// level.
pub fn level_diff_mod(diff: i64) -> f64 {
    if diff <= -5 {
        -20.0
    } else if diff <= 0 {
        diff as f64 * 2.0
    } else if diff <= 5 {
        diff as f64 * 6.0
    } else {
        30.0 + (diff - 5) as f64 * 12.0
    }
}

pub fn resist_chance(
    target_resist: f64,
    penetration: f64,
    difficulty: f64,
    level_mod: f64,
    min_chance: f64,
    max_chance: f64,
) -> f64 {
    let score = (target_resist - penetration) + difficulty + level_mod;
    ((score + RESIST_BASE) / RESIST_SCALE).clamp(min_chance, max_chance)
}

/// Resolves one application of an action against `target`.
///
/// `band` is the globally configured `(min, max)` chance, which the action's
/// own overrides take precedence over.
pub fn resolve(
    caster: &impl Resistant,
    target: &impl Resistant,
    meta: Option<&ResistMeta>,
    band: (f64, f64),
    rng: &mut impl Rng,
) -> ResistRoll {
    let Some(meta) = meta else {
        return ResistRoll::unresisted(None);
    };
    let kind = meta.resist_type;

    let diff = target.level() as i64 - caster.level() as i64;
    let min_chance = meta.min_chance.unwrap_or(band.0);
    let max_chance = meta.max_chance.unwrap_or(band.1);
    let chance = resist_chance(
        target.resist_profile().resists.get(kind),
        caster.resist_profile().spell_pen.get(kind),
        meta.difficulty,
        level_diff_mod(diff),
        min_chance,
        max_chance,
    );

    let roll_resisted = rng.gen::<f64>() < chance;

    if !meta.partial {
        return ResistRoll {
            resist_type: Some(kind),
            chance,
            resisted: roll_resisted,
            effect_multiplier: if roll_resisted { 0.0 } else { 1.0 },
            partial_percent: if roll_resisted { 0 } else { 100 },
            partial: false,
        };
    }

    let effect_multiplier = if roll_resisted {
        (1.0 - RESIST_PARTIAL_STRENGTH * chance).clamp(RESIST_PARTIAL_FLOOR, 1.0)
    } else {
        1.0
    };
    ResistRoll {
        resist_type: Some(kind),
        chance,
        resisted: false,
        effect_multiplier,
        partial_percent: (effect_multiplier * 100.0).round() as u32,
        partial: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    struct Dummy {
        level: u32,
        profile: ResistProfile,
    }

    impl Resistant for Dummy {
        fn level(&self) -> u32 {
            self.level
        }
        fn resist_profile(&self) -> &ResistProfile {
            &self.profile
        }
    }

    fn dummy(level: u32) -> Dummy {
        Dummy {
            level,
            profile: ResistProfile::default(),
        }
    }

    fn meta(partial: bool) -> ResistMeta {
        ResistMeta {
            resist_type: ResistType::Magic,
            difficulty: 0.0,
            partial,
            min_chance: None,
            max_chance: None,
        }
    }

    const BAND: (f64, f64) = (0.05, 0.95);

    #[test]
    fn test_level_diff_mod_bands() {
        assert_eq!(level_diff_mod(-10), -20.0);
        assert_eq!(level_diff_mod(-5), -20.0);
        assert_eq!(level_diff_mod(-3), -6.0);
        assert_eq!(level_diff_mod(0), 0.0);
        assert_eq!(level_diff_mod(3), 18.0);
        assert_eq!(level_diff_mod(5), 30.0);
        assert_eq!(level_diff_mod(7), 54.0);
    }

    #[test]
    fn test_resist_chance_clamps() {
        assert_eq!(resist_chance(0.0, 0.0, 0.0, 0.0, 0.05, 0.95), 0.25);
        assert_eq!(resist_chance(0.0, 0.0, -100.0, -20.0, 0.05, 0.95), 0.05);
        assert_eq!(resist_chance(400.0, 0.0, 0.0, 0.0, 0.05, 0.95), 0.95);
    }

    #[test]
    fn test_no_meta_always_lands() {
        let mut rng = StepRng::new(0, 0);
        let roll = resolve(&dummy(1), &dummy(50), None, BAND, &mut rng);
        assert!(!roll.resisted);
        assert_eq!(roll.effect_multiplier, 1.0);
        assert_eq!(roll.partial_percent, 100);
        assert_eq!(roll.chance, 0.0);
        assert!(roll.log_message("Fear").is_none());
    }

    #[test]
    fn test_binary_resist() {
        let mut always = StepRng::new(0, 0);
        let roll = resolve(&dummy(10), &dummy(10), Some(&meta(false)), BAND, &mut always);
        assert!(roll.resisted);
        assert_eq!(roll.effect_multiplier, 0.0);
        assert_eq!(roll.partial_percent, 0);
        assert_eq!(
            roll.log_message("Mesmerize").as_deref(),
            Some("Mesmerize was RESISTED (magic)!")
        );

        let mut never = StepRng::new(u64::MAX, 0);
        let roll = resolve(&dummy(10), &dummy(10), Some(&meta(false)), BAND, &mut never);
        assert!(!roll.resisted);
        assert_eq!(roll.effect_multiplier, 1.0);
    }

    #[test]
    fn test_partial_resist_reduces_but_never_negates() {
        let mut always = StepRng::new(0, 0);
        let roll = resolve(&dummy(10), &dummy(10), Some(&meta(true)), BAND, &mut always);
        assert!(!roll.resisted);
        // chance 0.25 -> 1 - 0.1875
        assert!((roll.effect_multiplier - 0.8125).abs() < 1e-9);
        assert_eq!(roll.partial_percent, 81);
        assert!(roll.log_message("Flame Lick").unwrap().contains("81%"));
    }

    #[test]
    fn test_partial_floor_at_max_chance() {
        let mut always = StepRng::new(0, 0);
        let mut target = dummy(10);
        target.profile.resists.magic = 1000.0;
        let roll = resolve(&dummy(10), &target, Some(&meta(true)), BAND, &mut always);
        assert!((roll.chance - 0.95).abs() < 1e-9);
        assert!((roll.effect_multiplier - 0.2875).abs() < 1e-9);
    }

    #[test]
    fn test_action_overrides_band() {
        let mut never = StepRng::new(u64::MAX, 0);
        let mut m = meta(false);
        m.min_chance = Some(0.5);
        let roll = resolve(&dummy(30), &dummy(1), Some(&m), BAND, &mut never);
        assert_eq!(roll.chance, 0.5);
    }

    #[test]
    fn test_penetration_lowers_chance() {
        let mut caster = dummy(10);
        caster.profile.spell_pen.magic = 40.0;
        let mut never = StepRng::new(u64::MAX, 0);
        let roll = resolve(&caster, &dummy(10), Some(&meta(false)), BAND, &mut never);
        assert!((roll.chance - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_apply_racial_is_idempotent() {
        let racial = ResistValues {
            magic: 5.0,
            contagion: 5.0,
            ..ResistValues::default()
        };
        let mut profile = ResistProfile::default();
        profile.resists.magic = 10.0;
        profile.spell_pen.magic = 2.0;

        profile.apply_racial(&racial);
        let once = profile.clone();
        profile.apply_racial(&racial);

        assert_eq!(profile, once);
        assert_eq!(profile.resists.magic, 15.0);
        assert_eq!(profile.resists.contagion, 5.0);
        assert_eq!(profile.spell_pen.magic, 2.0);
    }

    #[test]
    fn test_apply_racial_swaps_cleanly() {
        let dwarf = ResistValues {
            magic: 5.0,
            contagion: 5.0,
            ..ResistValues::default()
        };
        let troll = ResistValues {
            contagion: 10.0,
            ..ResistValues::default()
        };
        let mut profile = ResistProfile::default();
        profile.apply_racial(&dwarf);
        profile.apply_racial(&troll);
        assert_eq!(profile.resists.magic, 0.0);
        assert_eq!(profile.resists.contagion, 10.0);
    }

    #[test]
    fn test_sanitize_non_finite() {
        let mut profile = ResistProfile::default();
        profile.resists.magic = f64::NAN;
        profile.spell_pen.physical = f64::INFINITY;
        assert_eq!(profile.sanitize(), 2);
        assert_eq!(profile.resists.magic, 0.0);
        assert_eq!(profile.spell_pen.physical, 0.0);
    }
}
