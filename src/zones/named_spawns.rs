//! Named spawn smoothing: a cooldown after every named spawn and a pity ramp
//! after long droughts.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cadence parameters for one kind of zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnProfile {
    pub cooldown_kills: u32,
    pub expected_kills: u32,
    pub pity_cap: f64,
}

impl SpawnProfile {
    pub const OUTDOOR: SpawnProfile = SpawnProfile {
        cooldown_kills: OUTDOOR_NAMED_COOLDOWN,
        expected_kills: OUTDOOR_NAMED_EXPECTED,
        pity_cap: OUTDOOR_NAMED_PITY_CAP,
    };

    pub const DUNGEON: SpawnProfile = SpawnProfile {
        cooldown_kills: DUNGEON_NAMED_COOLDOWN,
        expected_kills: DUNGEON_NAMED_EXPECTED,
        pity_cap: DUNGEON_NAMED_PITY_CAP,
    };

    pub fn for_zone(dungeon: bool) -> Self {
        if dungeon {
            Self::DUNGEON
        } else {
            Self::OUTDOOR
        }
    }

    /// Multiplier for a tracker in this profile.
    pub fn multiplier(&self, tracker: &NamedTracker) -> f64 {
        if tracker.cooldown_remaining > 0 {
            return 0.0;
        }
        let expected = self.expected_kills.max(1);
        if tracker.kills_since_named <= expected {
            return 1.0;
        }
        let excess = (tracker.kills_since_named - expected) as f64;
        (1.0 + excess / expected as f64).min(self.pity_cap)
    }
}

/// Per-zone counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTracker {
    pub kills_since_named: u32,
    pub cooldown_remaining: u32,
}

/// Smoothing state for every zone the party has fought in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedSpawnController {
    zones: BTreeMap<String, NamedTracker>,
}

impl NamedSpawnController {
    pub fn tracker(&self, zone_id: &str) -> NamedTracker {
        self.zones.get(zone_id).copied().unwrap_or_default()
    }

    /// Weight multiplier for named candidates in `zone_id`: 0 during the
    /// cooldown, 1 until the expected gap, then a linear ramp up to the cap.
    pub fn multiplier(&self, zone_id: &str, profile: &SpawnProfile) -> f64 {
        profile.multiplier(&self.tracker(zone_id))
    }

    pub fn on_named_spawned(&mut self, zone_id: &str, profile: &SpawnProfile) {
        let tracker = self.zones.entry(zone_id.to_string()).or_default();
        tracker.kills_since_named = 0;
        tracker.cooldown_remaining = profile.cooldown_kills;
        tracing::info!(zone = zone_id, cooldown = profile.cooldown_kills, "named spawned");
    }

    /// A named kill only counts down the cooldown; a regular kill also
    /// lengthens the drought.
    pub fn on_mob_killed(&mut self, zone_id: &str, named: bool) {
        let tracker = self.zones.entry(zone_id.to_string()).or_default();
        if !named {
            tracker.kills_since_named += 1;
        }
        tracker.cooldown_remaining = tracker.cooldown_remaining.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.zones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: &str = "graveyard";

    #[test]
    fn test_fresh_zone_is_neutral() {
        let c = NamedSpawnController::default();
        assert_eq!(c.multiplier(ZONE, &SpawnProfile::OUTDOOR), 1.0);
    }

    #[test]
    fn test_cooldown_blocks_named() {
        let mut c = NamedSpawnController::default();
        c.on_named_spawned(ZONE, &SpawnProfile::OUTDOOR);
        assert_eq!(c.multiplier(ZONE, &SpawnProfile::OUTDOOR), 0.0);

        // The named kill itself counts toward the cooldown.
        c.on_mob_killed(ZONE, true);
        assert_eq!(c.tracker(ZONE).cooldown_remaining, 9);
        assert_eq!(c.tracker(ZONE).kills_since_named, 0);

        for _ in 0..8 {
            c.on_mob_killed(ZONE, false);
        }
        assert_eq!(c.multiplier(ZONE, &SpawnProfile::OUTDOOR), 0.0);
        c.on_mob_killed(ZONE, false);
        assert_eq!(c.multiplier(ZONE, &SpawnProfile::OUTDOOR), 1.0);
    }

    #[test]
    fn test_cooldown_never_negative() {
        let mut c = NamedSpawnController::default();
        for _ in 0..3 {
            c.on_mob_killed(ZONE, true);
        }
        assert_eq!(c.tracker(ZONE).cooldown_remaining, 0);
    }

    #[test]
    fn test_pity_ramp_and_cap() {
        let profile = SpawnProfile::OUTDOOR;
        let at = |kills| {
            profile.multiplier(&NamedTracker { kills_since_named: kills, cooldown_remaining: 0 })
        };
        assert_eq!(at(45), 1.0);
        assert!((at(54) - 1.2).abs() < 1e-9);
        assert!((at(90) - 2.0).abs() < 1e-9);
        assert_eq!(at(500), 3.0);
    }

    #[test]
    fn test_dungeon_profile_is_shorter() {
        let profile = SpawnProfile::for_zone(true);
        assert_eq!(profile.cooldown_kills, 6);
        let tracker = NamedTracker { kills_since_named: 1000, cooldown_remaining: 0 };
        assert_eq!(profile.multiplier(&tracker), 2.5);
    }

    #[test]
    fn test_zones_are_independent() {
        let mut c = NamedSpawnController::default();
        c.on_named_spawned(ZONE, &SpawnProfile::OUTDOOR);
        assert_eq!(c.multiplier("dark_forest", &SpawnProfile::OUTDOOR), 1.0);
    }
}
