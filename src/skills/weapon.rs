//! Weapon skills: types, class unlocks, caps and the melee damage scalar.

use super::ledger::{skill_cap, SkillLedger, SkillUp};
use crate::core::constants::{WEAPON_SKILL_FLOOR, WEAPON_SKILL_RANGE};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponType {
    #[serde(rename = "1h_slash")]
    OneHandSlash,
    #[serde(rename = "1h_blunt")]
    OneHandBlunt,
    #[serde(rename = "1h_pierce")]
    OneHandPierce,
    #[serde(rename = "2h_slash")]
    TwoHandSlash,
    #[serde(rename = "2h_blunt")]
    TwoHandBlunt,
    #[serde(rename = "2h_pierce")]
    TwoHandPierce,
    #[serde(rename = "hand_to_hand")]
    HandToHand,
    #[serde(rename = "archery")]
    Archery,
}

impl WeaponType {
    pub const ALL: [WeaponType; 8] = [
        WeaponType::OneHandSlash,
        WeaponType::OneHandBlunt,
        WeaponType::OneHandPierce,
        WeaponType::TwoHandSlash,
        WeaponType::TwoHandBlunt,
        WeaponType::TwoHandPierce,
        WeaponType::HandToHand,
        WeaponType::Archery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeaponType::OneHandSlash => "1H Slashing",
            WeaponType::OneHandBlunt => "1H Blunt",
            WeaponType::OneHandPierce => "1H Piercing",
            WeaponType::TwoHandSlash => "2H Slashing",
            WeaponType::TwoHandBlunt => "2H Blunt",
            WeaponType::TwoHandPierce => "2H Piercing",
            WeaponType::HandToHand => "Hand to Hand",
            WeaponType::Archery => "Archery",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type WeaponSkills = SkillLedger<WeaponType>;

/// Cap multiplier for weapon skills by class key. Unknown classes get 1.0.
pub fn class_weapon_multiplier(class: &str) -> f64 {
    match class {
        "warrior" | "monk" => 1.10,
        "rogue" | "ranger" => 1.05,
        "paladin" | "shadowknight" => 1.0,
        "cleric" | "druid" | "shaman" => 0.90,
        "enchanter" | "wizard" | "magician" | "necromancer" => 0.85,
        _ => 1.0,
    }
}

/// `(level, weapon)` unlock schedule per class.
pub fn weapon_unlocks(class: &str) -> &'static [(u32, WeaponType)] {
    use WeaponType::*;
    match class {
        "warrior" => &[
            (1, OneHandSlash),
            (1, OneHandBlunt),
            (1, OneHandPierce),
            (1, TwoHandSlash),
            (1, TwoHandBlunt),
            (1, HandToHand),
            (10, TwoHandPierce),
            (15, Archery),
        ],
        "cleric" => &[(1, OneHandBlunt), (1, HandToHand), (10, TwoHandBlunt)],
        "ranger" => &[
            (1, OneHandSlash),
            (1, OneHandBlunt),
            (1, HandToHand),
            (5, Archery),
            (10, TwoHandSlash),
        ],
        "wizard" | "enchanter" => &[(1, HandToHand), (1, OneHandPierce)],
        _ => &[(1, HandToHand)],
    }
}

pub fn is_weapon_unlocked(class: &str, level: u32, weapon: WeaponType) -> bool {
    weapon == WeaponType::HandToHand
        || weapon_unlocks(class)
            .iter()
            .any(|&(at, w)| w == weapon && level >= at)
}

pub fn weapon_skill_cap(class: &str, level: u32) -> u32 {
    skill_cap(level, class_weapon_multiplier(class))
}

/// Tracks every weapon unlocked at `level` and repairs stored values.
/// Returns the number of newly added skills.
pub fn ensure_weapon_skills(skills: &mut WeaponSkills, class: &str, level: u32) -> usize {
    let before = skills.len();
    for weapon in WeaponType::ALL {
        if is_weapon_unlocked(class, level, weapon) {
            skills.ensure(weapon);
        }
    }
    let cap = weapon_skill_cap(class, level);
    skills.sanitize(|_| cap);
    skills.len() - before
}

/// Multiplier on a hero's melee raw damage from weapon skill.
pub fn melee_damage_scalar(skill_ratio: f64) -> f64 {
    WEAPON_SKILL_FLOOR + WEAPON_SKILL_RANGE * skill_ratio.clamp(0.0, 1.0)
}

pub fn weapon_skill_ratio(skills: &WeaponSkills, class: &str, level: u32, weapon: WeaponType) -> f64 {
    skills.ratio(&weapon, weapon_skill_cap(class, level))
}

/// Skill-up attempt for a swing that connected.
pub fn try_weapon_skill_up(
    skills: &mut WeaponSkills,
    class: &str,
    level: u32,
    weapon: WeaponType,
    target_level: u32,
    rate_mult: f64,
    rng: &mut impl Rng,
) -> Option<SkillUp<WeaponType>> {
    if !is_weapon_unlocked(class, level, weapon) {
        return None;
    }
    let cap = weapon_skill_cap(class, level);
    skills.try_increase(&weapon, cap, level, Some(target_level), rate_mult, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_hand_to_hand_always_unlocked() {
        assert!(is_weapon_unlocked("wizard", 1, WeaponType::HandToHand));
        assert!(is_weapon_unlocked("unknown", 1, WeaponType::HandToHand));
    }

    #[test]
    fn test_warrior_unlock_schedule() {
        assert!(is_weapon_unlocked("warrior", 1, WeaponType::TwoHandSlash));
        assert!(!is_weapon_unlocked("warrior", 9, WeaponType::TwoHandPierce));
        assert!(is_weapon_unlocked("warrior", 10, WeaponType::TwoHandPierce));
        assert!(!is_weapon_unlocked("warrior", 14, WeaponType::Archery));
        assert!(is_weapon_unlocked("warrior", 15, WeaponType::Archery));
    }

    #[test]
    fn test_caps_by_class() {
        assert_eq!(weapon_skill_cap("warrior", 10), 55);
        assert_eq!(weapon_skill_cap("wizard", 10), 42);
        assert_eq!(weapon_skill_cap("cleric", 10), 45);
    }

    #[test]
    fn test_ensure_adds_unlocked_only() {
        let mut skills = WeaponSkills::default();
        assert_eq!(ensure_weapon_skills(&mut skills, "ranger", 1), 3);
        assert!(!skills.contains(&WeaponType::Archery));
        assert_eq!(ensure_weapon_skills(&mut skills, "ranger", 5), 1);
        assert!(skills.contains(&WeaponType::Archery));
    }

    #[test]
    fn test_ensure_clamps_after_cap_drop() {
        let mut skills = WeaponSkills::default();
        skills.set_raw(WeaponType::HandToHand, 250.0);
        ensure_weapon_skills(&mut skills, "wizard", 2);
        assert_eq!(skills.value(&WeaponType::HandToHand), Some(8.0));
    }

    #[test]
    fn test_melee_scalar_range() {
        assert_eq!(melee_damage_scalar(0.0), 0.85);
        assert_eq!(melee_damage_scalar(1.0), 1.0);
        assert_eq!(melee_damage_scalar(7.0), 1.0);
    }

    #[test]
    fn test_locked_weapon_never_skills_up() {
        let mut skills = WeaponSkills::default();
        skills.set_raw(WeaponType::Archery, 1.0);
        let mut rng = StepRng::new(0, 0);
        let up = try_weapon_skill_up(&mut skills, "cleric", 5, WeaponType::Archery, 5, 1.0, &mut rng);
        assert!(up.is_none());
    }
}
