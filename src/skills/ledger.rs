//! Per-actor skill values with caps and diminishing skill-ups.
//!
//! The ledger is generic over its key so weapon and magic skills share the
//! same cap, triviality and sanitization rules.

use crate::core::constants::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A successful skill-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillUp<K> {
    pub skill: K,
    pub value: u32,
}

/// `floor(min(5 × level × class_mult, HARD_SKILL_CAP))`, never below 1.
pub fn skill_cap(level: u32, class_mult: f64) -> u32 {
    let raw = (SKILL_CAP_PER_LEVEL * level.max(1) as f64 * class_mult).min(HARD_SKILL_CAP as f64);
    (raw.floor() as u32).max(1)
}

/// Whether `opposing_level` is too low to teach an actor of `actor_level`.
pub fn is_trivial(actor_level: u32, opposing_level: u32) -> bool {
    let gap = if actor_level <= TRIVIAL_GAP_LEVEL_SPLIT {
        TRIVIAL_GAP_LOW
    } else {
        TRIVIAL_GAP_HIGH
    };
    (opposing_level as i64) <= actor_level as i64 - gap as i64
}

/// Skill-up chance in percent at `value`, before the rate multiplier.
pub fn skill_up_chance_pct(value: f64) -> f64 {
    (SKILL_UP_MAX_PCT - SKILL_UP_MIN_PCT) * SKILL_UP_DECAY.powf(value) + SKILL_UP_MIN_PCT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLedger<K: Ord> {
    values: BTreeMap<K, f64>,
}

impl<K: Ord> Default for SkillLedger<K> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> SkillLedger<K> {
    /// Adds `skill` at 1 if it is not tracked yet.
    pub fn ensure(&mut self, skill: K) {
        self.values.entry(skill).or_insert(1.0);
    }

    pub fn contains(&self, skill: &K) -> bool {
        self.values.contains_key(skill)
    }

    pub fn value(&self, skill: &K) -> Option<f64> {
        self.values.get(skill).copied()
    }

    /// Direct write, used by loaders and tests. Run [`sanitize`](Self::sanitize) after.
    pub fn set_raw(&mut self, skill: K, value: f64) {
        self.values.insert(skill, value);
    }

    /// `value / cap`, or zero for an untracked skill.
    pub fn ratio(&self, skill: &K, cap: u32) -> f64 {
        match self.values.get(skill) {
            Some(v) if cap > 0 => (v / cap as f64).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Repairs every tracked value: non-finite or below 1 becomes 1, above
    /// cap is clamped to cap. Returns the number of repairs.
    pub fn sanitize(&mut self, cap_for: impl Fn(&K) -> u32) -> usize {
        let mut repaired = 0;
        for (skill, value) in self.values.iter_mut() {
            let cap = cap_for(skill) as f64;
            let fixed = if !value.is_finite() || *value < 1.0 {
                1.0
            } else if *value > cap {
                cap.max(1.0)
            } else {
                *value
            };
            if fixed != *value {
                *value = fixed;
                repaired += 1;
            }
        }
        if repaired > 0 {
            tracing::debug!(repaired, "sanitized skill values");
        }
        repaired
    }

    /// One skill-up attempt.
    ///
    /// No roll happens when the skill is untracked, already at `cap`, or the
    /// opposing level is trivial. On success the value grows by exactly one.
    pub fn try_increase(
        &mut self,
        skill: &K,
        cap: u32,
        actor_level: u32,
        opposing_level: Option<u32>,
        rate_mult: f64,
        rng: &mut impl Rng,
    ) -> Option<SkillUp<K>> {
        let value = *self.values.get(skill)?;
        if value >= cap as f64 {
            return None;
        }
        if let Some(opposing) = opposing_level {
            if is_trivial(actor_level, opposing) {
                return None;
            }
        }

        let chance = skill_up_chance_pct(value) * rate_mult;
        if rng.gen::<f64>() * 100.0 >= chance {
            return None;
        }

        let next = (value + 1.0).min(cap as f64);
        self.values.insert(skill.clone(), next);
        Some(SkillUp {
            skill: skill.clone(),
            value: next as u32,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_skill_cap() {
        assert_eq!(skill_cap(1, 1.0), 5);
        assert_eq!(skill_cap(10, 1.1), 55);
        assert_eq!(skill_cap(10, 0.85), 42);
        assert_eq!(skill_cap(100, 1.1), HARD_SKILL_CAP);
    }

    #[test]
    fn test_trivial_gap_switches_at_level_ten() {
        assert!(is_trivial(10, 7));
        assert!(!is_trivial(10, 8));
        assert!(is_trivial(11, 6));
        assert!(!is_trivial(11, 7));
        assert!(!is_trivial(1, 1));
    }

    #[test]
    fn test_chance_curve() {
        assert!((skill_up_chance_pct(0.0) - 6.0).abs() < 1e-9);
        assert!(skill_up_chance_pct(300.0) > SKILL_UP_MIN_PCT);
        assert!(skill_up_chance_pct(50.0) < skill_up_chance_pct(10.0));
    }

    #[test]
    fn test_try_increase_respects_cap() {
        let mut ledger: SkillLedger<&str> = SkillLedger::default();
        ledger.ensure("slash");
        let mut rng = always();
        for _ in 0..10 {
            ledger.try_increase(&"slash", 5, 1, None, 1.0, &mut rng);
        }
        assert_eq!(ledger.value(&"slash"), Some(5.0));
        assert!(ledger.try_increase(&"slash", 5, 1, None, 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_try_increase_skips_trivial_and_untracked() {
        let mut ledger: SkillLedger<&str> = SkillLedger::default();
        ledger.ensure("slash");
        let mut rng = always();
        assert!(ledger.try_increase(&"slash", 100, 20, Some(5), 1.0, &mut rng).is_none());
        assert!(ledger.try_increase(&"pierce", 100, 20, Some(20), 1.0, &mut rng).is_none());
        let up = ledger.try_increase(&"slash", 100, 20, Some(20), 1.0, &mut rng);
        assert_eq!(up, Some(SkillUp { skill: "slash", value: 2 }));
    }

    #[test]
    fn test_try_increase_fails_on_high_roll() {
        let mut ledger: SkillLedger<&str> = SkillLedger::default();
        ledger.ensure("slash");
        let mut rng = StepRng::new(u64::MAX, 0);
        assert!(ledger.try_increase(&"slash", 100, 1, None, 1.0, &mut rng).is_none());
        assert_eq!(ledger.value(&"slash"), Some(1.0));
    }

    #[test]
    fn test_sanitize_repairs() {
        let mut ledger: SkillLedger<&str> = SkillLedger::default();
        ledger.set_raw("a", f64::NAN);
        ledger.set_raw("b", -4.0);
        ledger.set_raw("c", 900.0);
        ledger.set_raw("d", 12.0);
        let repaired = ledger.sanitize(|_| 50);
        assert_eq!(repaired, 3);
        assert_eq!(ledger.value(&"a"), Some(1.0));
        assert_eq!(ledger.value(&"b"), Some(1.0));
        assert_eq!(ledger.value(&"c"), Some(50.0));
        assert_eq!(ledger.value(&"d"), Some(12.0));
    }

    #[test]
    fn test_ratio() {
        let mut ledger: SkillLedger<&str> = SkillLedger::default();
        ledger.set_raw("a", 25.0);
        assert_eq!(ledger.ratio(&"a", 50), 0.5);
        assert_eq!(ledger.ratio(&"missing", 50), 0.0);
    }
}
