//! Timed buffs and debuffs.
//!
//! All expiry checks go through [`EffectStore`]. An effect is live while
//! `now_ms < expires_at_ms`; reads ignore dead entries and
//! [`EffectStore::purge_expired`] drops them.

use super::types::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Cannot act. Broken by direct damage.
    Mesmerize,
    /// Cannot act.
    Fear,
    /// Temporary hit points absorbed before health.
    Ward,
    ArmorBonus,
    ArmorShred,
    /// Additive haste fraction; negative values slow.
    Haste,
    AccuracyBonus,
    DamageBonus,
    /// Fraction of incoming damage ignored.
    Mitigation,
    /// Damage dealt at the end of every tick.
    DamageOverTime,
}

impl EffectKind {
    pub fn is_crowd_control(self) -> bool {
        matches!(self, EffectKind::Mesmerize | EffectKind::Fear)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub expires_at_ms: u64,
    pub magnitude: f64,
    #[serde(default)]
    pub source: Option<ActorId>,
}

impl ActiveEffect {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectStore {
    effects: BTreeMap<String, ActiveEffect>,
}

impl EffectStore {
    /// Adds or refreshes `name`.
    pub fn set(&mut self, name: impl Into<String>, effect: ActiveEffect) {
        self.effects.insert(name.into(), effect);
    }

    pub fn get(&self, name: &str, now_ms: u64) -> Option<&ActiveEffect> {
        self.effects.get(name).filter(|e| e.is_active(now_ms))
    }

    pub fn is_active(&self, name: &str, now_ms: u64) -> bool {
        self.get(name, now_ms).is_some()
    }

    /// Magnitude of `name`, or zero when absent or expired.
    pub fn magnitude(&self, name: &str, now_ms: u64) -> f64 {
        self.get(name, now_ms).map_or(0.0, |e| e.magnitude)
    }

    pub fn has_kind(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.active(now_ms).any(|(_, e)| e.kind == kind)
    }

    /// Sum of magnitudes across live effects of `kind`.
    pub fn total(&self, kind: EffectKind, now_ms: u64) -> f64 {
        self.active(now_ms)
            .filter(|(_, e)| e.kind == kind)
            .map(|(_, e)| e.magnitude)
            .sum()
    }

    pub fn is_crowd_controlled(&self, now_ms: u64) -> bool {
        self.active(now_ms).any(|(_, e)| e.kind.is_crowd_control())
    }

    pub fn active(&self, now_ms: u64) -> impl Iterator<Item = (&str, &ActiveEffect)> {
        self.effects
            .iter()
            .filter(move |(_, e)| e.is_active(now_ms))
            .map(|(k, e)| (k.as_str(), e))
    }

    pub fn remove(&mut self, name: &str) -> Option<ActiveEffect> {
        self.effects.remove(name)
    }

    pub fn remove_kind(&mut self, kind: EffectKind) -> usize {
        let before = self.effects.len();
        self.effects.retain(|_, e| e.kind != kind);
        before - self.effects.len()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Drops expired effects and returns their names.
    pub fn purge_expired(&mut self, now_ms: u64) -> Vec<String> {
        let expired: Vec<String> = self
            .effects
            .iter()
            .filter(|(_, e)| !e.is_active(now_ms))
            .map(|(k, _)| k.clone())
            .collect();
        for name in &expired {
            self.effects.remove(name);
        }
        expired
    }

    /// Soaks `amount` with live wards, oldest name first. Returns what is left
    /// over for health. Depleted wards are removed.
    pub fn absorb(&mut self, amount: f64, now_ms: u64) -> f64 {
        let mut remaining = amount;
        let mut depleted = Vec::new();
        for (name, effect) in self.effects.iter_mut() {
            if remaining <= 0.0 {
                break;
            }
            if effect.kind != EffectKind::Ward || !effect.is_active(now_ms) {
                continue;
            }
            let soaked = effect.magnitude.min(remaining);
            effect.magnitude -= soaked;
            remaining -= soaked;
            if effect.magnitude <= 0.0 {
                depleted.push(name.clone());
            }
        }
        for name in depleted {
            self.effects.remove(&name);
        }
        remaining
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: EffectKind, expires_at_ms: u64, magnitude: f64) -> ActiveEffect {
        ActiveEffect {
            kind,
            expires_at_ms,
            magnitude,
            source: None,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let mut store = EffectStore::default();
        store.set("woodskin", effect(EffectKind::ArmorBonus, 9000, 5.0));
        assert!(store.is_active("woodskin", 8999));
        assert!(!store.is_active("woodskin", 9000));
        assert_eq!(store.magnitude("woodskin", 9000), 0.0);
    }

    #[test]
    fn test_totals_ignore_expired() {
        let mut store = EffectStore::default();
        store.set("a", effect(EffectKind::ArmorBonus, 6000, 5.0));
        store.set("b", effect(EffectKind::ArmorBonus, 3000, 7.0));
        store.set("c", effect(EffectKind::Haste, 6000, 0.2));
        assert_eq!(store.total(EffectKind::ArmorBonus, 0), 12.0);
        assert_eq!(store.total(EffectKind::ArmorBonus, 3000), 5.0);
    }

    #[test]
    fn test_purge_returns_names() {
        let mut store = EffectStore::default();
        store.set("mez", effect(EffectKind::Mesmerize, 3000, 1.0));
        store.set("fear", effect(EffectKind::Fear, 9000, 1.0));
        assert!(store.is_crowd_controlled(3000));
        let purged = store.purge_expired(3000);
        assert_eq!(purged, vec!["mez".to_string()]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ward_absorbs_then_depletes() {
        let mut store = EffectStore::default();
        store.set("arcane_shield", effect(EffectKind::Ward, 9000, 50.0));
        assert_eq!(store.absorb(30.0, 0), 0.0);
        assert_eq!(store.magnitude("arcane_shield", 0), 20.0);
        assert_eq!(store.absorb(35.0, 0), 15.0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_refresh_replaces() {
        let mut store = EffectStore::default();
        store.set("courage", effect(EffectKind::ArmorBonus, 3000, 4.0));
        store.set("courage", effect(EffectKind::ArmorBonus, 12000, 4.0));
        assert!(store.is_active("courage", 6000));
        assert_eq!(store.len(), 1);
    }
}
