//! Named spawn cadence harness.
//!
//! Drives the smoothing controller through thousands of kills and checks the
//! cooldown floor and the pity ramp, first in isolation and then through the
//! full tick engine.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tickrate::content::Content;
use tickrate::simulator::{run_simulation, SimConfig};
use tickrate::zones::{NamedSpawnController, SpawnProfile};

/// Chance that a given encounter rolls a named before smoothing.
const BASE_NAMED_CHANCE: f64 = 0.03;

struct Harness {
    controller: NamedSpawnController,
    profile: SpawnProfile,
    kills: u64,
    last_spawn: Option<u64>,
    gaps: Vec<u64>,
}

impl Harness {
    fn new(profile: SpawnProfile) -> Self {
        Self {
            controller: NamedSpawnController::default(),
            profile,
            kills: 0,
            last_spawn: None,
            gaps: Vec::new(),
        }
    }

    /// One encounter: roll, spawn, kill.
    fn encounter(&mut self, rng: &mut ChaCha8Rng) {
        let mult = self.controller.multiplier("zone", &self.profile);
        let named = rng.gen::<f64>() < (BASE_NAMED_CHANCE * mult).min(1.0);
        if named {
            self.controller.on_named_spawned("zone", &self.profile);
            if let Some(last) = self.last_spawn.replace(self.kills) {
                self.gaps.push(self.kills - last);
            }
        }
        self.controller.on_mob_killed("zone", named);
        self.kills += 1;
    }

    fn average_gap(&self) -> f64 {
        self.gaps.iter().sum::<u64>() as f64 / self.gaps.len() as f64
    }
}

#[test]
fn test_outdoor_cooldown_never_violated_over_10k_kills() {
    let mut harness = Harness::new(SpawnProfile::OUTDOOR);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..10_000 {
        harness.encounter(&mut rng);
    }

    let cooldown = SpawnProfile::OUTDOOR.cooldown_kills as u64;
    let violations = harness.gaps.iter().filter(|&&g| g < cooldown).count();
    assert_eq!(violations, 0);
    assert!(harness.gaps.len() > 50, "only {} spawns", harness.gaps.len());

    let avg = harness.average_gap();
    assert!(avg >= cooldown as f64);
    assert!(avg < 3.0 * SpawnProfile::OUTDOOR.expected_kills as f64, "avg gap {avg}");
}

#[test]
fn test_dungeon_cooldown_never_violated() {
    let mut harness = Harness::new(SpawnProfile::DUNGEON);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..10_000 {
        harness.encounter(&mut rng);
    }
    let cooldown = SpawnProfile::DUNGEON.cooldown_kills as u64;
    assert!(harness.gaps.iter().all(|&g| g >= cooldown));
}

#[test]
fn test_pity_ramp_bounds_droughts() {
    let profile = SpawnProfile::OUTDOOR;
    let mut controller = NamedSpawnController::default();
    let mut last = 1.0;
    for _ in 0..(profile.expected_kills * 4) {
        controller.on_mob_killed("zone", false);
        let mult = controller.multiplier("zone", &profile);
        assert!(mult >= last);
        assert!(mult <= profile.pity_cap);
        last = mult;
    }
    assert_eq!(last, profile.pity_cap);
}

#[test]
fn test_zones_keep_separate_trackers() {
    let profile = SpawnProfile::OUTDOOR;
    let mut controller = NamedSpawnController::default();
    controller.on_named_spawned("crypt", &profile);
    assert_eq!(controller.multiplier("crypt", &profile), 0.0);
    assert_eq!(controller.multiplier("meadow", &profile), 1.0);
}

#[test]
fn test_engine_spawns_respect_cooldown() {
    let content = Content::builtin();
    let config = SimConfig {
        seed: Some(31),
        max_ticks_per_run: 30_000,
        verbosity: 0,
        ..SimConfig::named_cadence(1)
    };
    let report = run_simulation(&config, &content).unwrap();
    assert_eq!(report.cooldown_violations, 0);
    assert!(report.avg_total_kills > 0.0);
}
