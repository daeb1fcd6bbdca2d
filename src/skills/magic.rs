//! Magic skills: school mastery, specialization and channeling.
//!
//! Mastery (`school_*`) makes casts reliable, specialization (`spec_*`)
//! trims mana costs through a fractional bank, and channeling resists
//! interruption.

use super::ledger::{skill_cap, SkillLedger, SkillUp};
use crate::combat::math::roll_chance;
use crate::core::constants::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    Destruction,
    Restoration,
    Control,
    Enhancement,
    Summoning,
    Utility,
}

impl Specialization {
    pub const ALL: [Specialization; 6] = [
        Specialization::Destruction,
        Specialization::Restoration,
        Specialization::Control,
        Specialization::Enhancement,
        Specialization::Summoning,
        Specialization::Utility,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Specialization::Destruction => "destruction",
            Specialization::Restoration => "restoration",
            Specialization::Control => "control",
            Specialization::Enhancement => "enhancement",
            Specialization::Summoning => "summoning",
            Specialization::Utility => "utility",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Specialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialization::ALL
            .into_iter()
            .find(|spec| spec.key() == s)
            .ok_or_else(|| format!("unknown specialization '{s}'"))
    }
}

/// A magic skill id. Serialized as `school_<spec>`, `spec_<spec>` or
/// `channeling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MagicSkill {
    School(Specialization),
    Spec(Specialization),
    Channeling,
}

impl fmt::Display for MagicSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicSkill::School(spec) => write!(f, "school_{spec}"),
            MagicSkill::Spec(spec) => write!(f, "spec_{spec}"),
            MagicSkill::Channeling => f.write_str("channeling"),
        }
    }
}

impl From<MagicSkill> for String {
    fn from(skill: MagicSkill) -> Self {
        skill.to_string()
    }
}

impl TryFrom<String> for MagicSkill {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "channeling" {
            return Ok(MagicSkill::Channeling);
        }
        if let Some(rest) = s.strip_prefix("school_") {
            return rest.parse().map(MagicSkill::School);
        }
        if let Some(rest) = s.strip_prefix("spec_") {
            return rest.parse().map(MagicSkill::Spec);
        }
        Err(format!("unknown magic skill '{s}'"))
    }
}

/// Outcome quality of a completed cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastQuality {
    Full,
    Partial,
    Resisted,
}

impl CastQuality {
    pub fn multiplier(self) -> f64 {
        match self {
            CastQuality::Full => QUALITY_FULL_MULT,
            CastQuality::Partial => QUALITY_PARTIAL_MULT,
            CastQuality::Resisted => QUALITY_RESISTED_MULT,
        }
    }
}

pub fn class_magic_multiplier(class: &str) -> f64 {
    match class {
        "warrior" | "rogue" | "monk" => 0.70,
        "ranger" => 0.80,
        "paladin" | "shadowknight" => 0.90,
        "cleric" | "druid" | "shaman" => 1.05,
        "enchanter" | "wizard" | "magician" | "necromancer" => 1.10,
        _ => 1.0,
    }
}

pub fn class_channeling_multiplier(class: &str) -> f64 {
    match class {
        "warrior" | "rogue" | "monk" => 0.80,
        "ranger" => 0.85,
        "paladin" | "shadowknight" => 0.90,
        "cleric" | "druid" | "shaman" => 1.0,
        "enchanter" | "wizard" | "magician" | "necromancer" => 1.05,
        _ => 1.0,
    }
}

/// `(level, specialization)` unlock schedule per class.
pub fn specialization_unlocks(class: &str) -> &'static [(u32, Specialization)] {
    use Specialization::*;
    match class {
        "wizard" => &[
            (1, Destruction),
            (1, Utility),
            (6, Enhancement),
            (10, Control),
            (12, Summoning),
        ],
        "cleric" => &[(1, Restoration), (1, Enhancement), (1, Utility), (6, Control)],
        "enchanter" => &[
            (1, Control),
            (1, Enhancement),
            (1, Utility),
            (6, Restoration),
            (10, Destruction),
            (12, Summoning),
        ],
        "ranger" => &[(1, Enhancement), (1, Utility), (8, Control)],
        "warrior" => &[(1, Enhancement), (1, Utility)],
        _ => &[(1, Utility)],
    }
}

pub fn is_specialization_unlocked(class: &str, level: u32, spec: Specialization) -> bool {
    specialization_unlocks(class)
        .iter()
        .any(|&(at, s)| s == spec && level >= at)
}

pub fn magic_skill_cap(class: &str, level: u32, skill: MagicSkill) -> u32 {
    match skill {
        MagicSkill::Channeling => skill_cap(level, class_channeling_multiplier(class)),
        _ => skill_cap(level, class_magic_multiplier(class)),
    }
}

/// Interrupt probability for the next hit, given hits already taken during
/// the cast (including this one) and the channeling ratio.
pub fn interrupt_chance(hits: u32, channeling_ratio: f64) -> f64 {
    let base = (INTERRUPT_BASE + INTERRUPT_PER_HIT * hits as f64).min(INTERRUPT_MAX);
    let reduction = CHANNELING_REDUCTION_AT_CAP * channeling_ratio.clamp(0.0, 1.0);
    (base - reduction).clamp(INTERRUPT_MIN, INTERRUPT_MAX)
}

/// Splits the bad-outcome budget between partial and resisted and rolls
/// once. Mastery at cap removes [`QUALITY_MASTERY_REDUCTION_AT_CAP`] of it.
pub fn roll_quality(mastery_ratio: f64, rng: &mut impl Rng) -> CastQuality {
    let base_bad = QUALITY_PARTIAL_BASE + QUALITY_RESIST_BASE;
    let total_bad =
        (base_bad - QUALITY_MASTERY_REDUCTION_AT_CAP * mastery_ratio.clamp(0.0, 1.0)).max(0.0);
    let resist = total_bad * QUALITY_RESIST_BASE / base_bad;
    let partial = total_bad * QUALITY_PARTIAL_BASE / base_bad;

    let roll = rng.gen::<f64>();
    if roll < resist {
        CastQuality::Resisted
    } else if roll < resist + partial {
        CastQuality::Partial
    } else {
        CastQuality::Full
    }
}

/// Magic skill values plus the per-specialization mana bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicSkills {
    pub ledger: SkillLedger<MagicSkill>,
    pub mana_bank: BTreeMap<Specialization, f64>,
}

impl MagicSkills {
    /// Tracks channeling and the school/spec pair of every unlocked
    /// specialization, then repairs stored values.
    pub fn ensure(&mut self, class: &str, level: u32) -> usize {
        self.ledger.ensure(MagicSkill::Channeling);
        for spec in Specialization::ALL {
            if is_specialization_unlocked(class, level, spec) {
                self.ledger.ensure(MagicSkill::School(spec));
                self.ledger.ensure(MagicSkill::Spec(spec));
            }
        }
        for bank in self.mana_bank.values_mut() {
            if !bank.is_finite() || *bank < 0.0 {
                *bank = 0.0;
            }
        }
        self.ledger
            .sanitize(|skill| magic_skill_cap(class, level, *skill))
    }

    /// Skill ratio in [0, 1]. Locked specializations read as zero.
    pub fn ratio(&self, class: &str, level: u32, skill: MagicSkill) -> f64 {
        match skill {
            MagicSkill::School(spec) | MagicSkill::Spec(spec)
                if !is_specialization_unlocked(class, level, spec) =>
            {
                0.0
            }
            _ => self.ledger.ratio(&skill, magic_skill_cap(class, level, skill)),
        }
    }

    fn bank_step(&self, class: &str, level: u32, spec: Specialization, base_cost: f64) -> (f64, f64) {
        let ratio = self.ratio(class, level, MagicSkill::Spec(spec));
        let bank = self.mana_bank.get(&spec).copied().unwrap_or(0.0)
            + base_cost.max(0.0) * SPEC_MANA_REDUCTION_AT_CAP * ratio;
        let whole = bank.floor();
        ((base_cost - whole).max(0.0), bank - whole)
    }

    /// Cost the next cast would pay, without touching the bank.
    pub fn preview_mana_cost(&self, class: &str, level: u32, spec: Specialization, base_cost: f64) -> f64 {
        self.bank_step(class, level, spec, base_cost).0
    }

    /// Cost of this cast after specialization savings. Accrues the fractional
    /// saving and pays out whole points once they add up to at least one.
    pub fn final_mana_cost(&mut self, class: &str, level: u32, spec: Specialization, base_cost: f64) -> f64 {
        let (cost, carry) = self.bank_step(class, level, spec, base_cost);
        self.mana_bank.insert(spec, carry);
        cost
    }

    fn try_up(
        &mut self,
        class: &str,
        level: u32,
        skill: MagicSkill,
        target_level: Option<u32>,
        rate_mult: f64,
        rng: &mut impl Rng,
    ) -> Option<SkillUp<MagicSkill>> {
        let cap = magic_skill_cap(class, level, skill);
        self.ledger
            .try_increase(&skill, cap, level, target_level, rate_mult, rng)
    }

    /// Skill-ups earned by finishing a cast.
    ///
    /// Mastery always rolls, specialization only behind a coin flip, and
    /// channeling only when the caster was hit and still finished, with a
    /// second try when the first misses.
    pub fn on_cast_complete(
        &mut self,
        class: &str,
        level: u32,
        spec: Specialization,
        hits_taken: u32,
        target_level: Option<u32>,
        rate_mult: f64,
        rng: &mut impl Rng,
    ) -> Vec<SkillUp<MagicSkill>> {
        if !is_specialization_unlocked(class, level, spec) {
            return Vec::new();
        }
        let mut ups = Vec::new();

        if let Some(up) = self.try_up(class, level, MagicSkill::School(spec), target_level, rate_mult, rng) {
            ups.push(up);
        }
        if roll_chance(SPEC_SKILL_UP_GATE, rng) {
            if let Some(up) = self.try_up(class, level, MagicSkill::Spec(spec), target_level, rate_mult, rng) {
                ups.push(up);
            }
        }
        if hits_taken > 0 {
            let first = self.try_up(class, level, MagicSkill::Channeling, target_level, rate_mult, rng);
            let up = match first {
                Some(up) => Some(up),
                None if roll_chance(0.5, rng) => {
                    self.try_up(class, level, MagicSkill::Channeling, target_level, rate_mult, rng)
                }
                None => None,
            };
            ups.extend(up);
        }
        ups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn wizard(level: u32) -> MagicSkills {
        let mut skills = MagicSkills::default();
        skills.ensure("wizard", level);
        skills
    }

    #[test]
    fn test_skill_ids_round_trip_as_strings() {
        let json = serde_json::to_string(&MagicSkill::School(Specialization::Destruction)).unwrap();
        assert_eq!(json, "\"school_destruction\"");
        let back: MagicSkill = serde_json::from_str("\"spec_control\"").unwrap();
        assert_eq!(back, MagicSkill::Spec(Specialization::Control));
        assert!(serde_json::from_str::<MagicSkill>("\"spec_necromancy\"").is_err());
    }

    #[test]
    fn test_ensure_follows_unlocks() {
        let skills = wizard(1);
        assert!(skills.ledger.contains(&MagicSkill::School(Specialization::Destruction)));
        assert!(!skills.ledger.contains(&MagicSkill::Spec(Specialization::Control)));
        assert!(skills.ledger.contains(&MagicSkill::Channeling));
        let skills = wizard(10);
        assert!(skills.ledger.contains(&MagicSkill::Spec(Specialization::Control)));
    }

    #[test]
    fn test_caps_use_separate_multipliers() {
        assert_eq!(magic_skill_cap("wizard", 10, MagicSkill::School(Specialization::Destruction)), 55);
        assert_eq!(magic_skill_cap("wizard", 10, MagicSkill::Channeling), 52);
        assert_eq!(magic_skill_cap("warrior", 10, MagicSkill::Channeling), 40);
    }

    #[test]
    fn test_locked_spec_has_zero_ratio_and_no_reduction() {
        let mut skills = wizard(1);
        skills.ledger.set_raw(MagicSkill::Spec(Specialization::Control), 5.0);
        assert_eq!(skills.ratio("wizard", 1, MagicSkill::Spec(Specialization::Control)), 0.0);
        for _ in 0..50 {
            assert_eq!(skills.final_mana_cost("wizard", 1, Specialization::Control, 20.0), 20.0);
        }
    }

    #[test]
    fn test_mana_bank_pays_out_whole_points() {
        let mut skills = wizard(1);
        // Spec at cap: 10% of 7 banks 0.7 per cast.
        skills.ledger.set_raw(MagicSkill::Spec(Specialization::Destruction), 5.0);
        let costs: Vec<f64> = (0..3)
            .map(|_| skills.final_mana_cost("wizard", 1, Specialization::Destruction, 7.0))
            .collect();
        assert_eq!(costs, vec![7.0, 6.0, 6.0]);
        let carry = skills.mana_bank[&Specialization::Destruction];
        assert!((carry - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_preview_does_not_touch_bank() {
        let mut skills = wizard(1);
        skills.ledger.set_raw(MagicSkill::Spec(Specialization::Destruction), 5.0);
        assert_eq!(skills.preview_mana_cost("wizard", 1, Specialization::Destruction, 10.0), 9.0);
        assert!(skills.mana_bank.is_empty());
    }

    #[test]
    fn test_interrupt_chance_examples() {
        assert!((interrupt_chance(1, 0.0) - 0.25).abs() < 1e-9);
        assert!((interrupt_chance(1, 1.0) - 0.15).abs() < 1e-9);
        assert_eq!(interrupt_chance(20, 0.0), INTERRUPT_MAX);
        assert!(interrupt_chance(0, 1.0) >= INTERRUPT_MIN);
    }

    #[test]
    fn test_quality_roll_bands() {
        let mut low = StepRng::new(0, 0);
        assert_eq!(roll_quality(0.0, &mut low), CastQuality::Resisted);
        let mut high = StepRng::new(u64::MAX, 0);
        assert_eq!(roll_quality(0.0, &mut high), CastQuality::Full);
        // At full mastery only 6% bad outcomes remain; a zero roll still resists.
        let mut low = StepRng::new(0, 0);
        assert_eq!(roll_quality(1.0, &mut low), CastQuality::Resisted);
        assert_eq!(CastQuality::Partial.multiplier(), 0.5);
    }

    #[test]
    fn test_cast_complete_channeling_needs_hits() {
        let mut skills = wizard(5);
        let mut rng = StepRng::new(0, 0);
        let ups = skills.on_cast_complete("wizard", 5, Specialization::Destruction, 0, Some(5), 1.0, &mut rng);
        let ids: Vec<MagicSkill> = ups.iter().map(|u| u.skill).collect();
        assert_eq!(
            ids,
            vec![
                MagicSkill::School(Specialization::Destruction),
                MagicSkill::Spec(Specialization::Destruction)
            ]
        );

        let ups = skills.on_cast_complete("wizard", 5, Specialization::Destruction, 2, Some(5), 1.0, &mut rng);
        assert!(ups.iter().any(|u| u.skill == MagicSkill::Channeling));
    }

    #[test]
    fn test_cast_complete_nothing_when_spec_locked() {
        let mut skills = wizard(1);
        let mut rng = StepRng::new(0, 0);
        let ups = skills.on_cast_complete("wizard", 1, Specialization::Summoning, 3, None, 1.0, &mut rng);
        assert!(ups.is_empty());
    }
}
