//! Main simulation runner driving the real tick engine.
//!
//! Statistics are tracked externally from [`TickResult`] events, the same
//! way a presentation layer would consume them.

use super::config::SimConfig;
use super::report::SimReport;
use crate::content::Content;
use crate::core::error::CombatError;
use crate::core::tick::{advance_tick, TickEvent, TickResult};
use crate::core::world::World;
use crate::zones::SpawnProfile;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Outcome of one simulated run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunStats {
    pub total_ticks: u64,
    pub final_zone: u32,
    pub party_levels: Vec<u32>,
    pub total_kills: u64,
    pub named_kills: u64,
    pub named_spawns: u64,
    pub wipes: u64,
    pub gold: u64,
    pub total_xp: u64,
    pub skill_ups: u64,
    /// Kills between consecutive named spawns in the same zone.
    pub named_gaps: Vec<u64>,
    /// Gaps shorter than the zone's cooldown.
    pub cooldown_violations: u64,
    pub best_weapon_skill: f64,
    pub best_magic_skill: f64,
}

impl RunStats {
    pub fn average_named_gap(&self) -> Option<f64> {
        if self.named_gaps.is_empty() {
            return None;
        }
        Some(self.named_gaps.iter().sum::<u64>() as f64 / self.named_gaps.len() as f64)
    }
}

/// Run every configured simulation and aggregate a report.
pub fn run_simulation(config: &SimConfig, content: &Content) -> Result<SimReport, CombatError> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, content, &mut rng)?;
        if config.verbosity >= 2 {
            tracing::info!(
                run = run_idx + 1,
                zone = run.final_zone,
                kills = run.total_kills,
                named = run.named_spawns,
                wipes = run.wipes,
                "run finished"
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// Tracks named spawn spacing per zone from the event stream.
#[derive(Debug, Default)]
struct NamedCadence {
    zone: u32,
    kills_in_zone: BTreeMap<u32, u64>,
    last_spawn: BTreeMap<u32, u64>,
    gaps: Vec<u64>,
    violations: u64,
}

impl NamedCadence {
    fn process_tick(&mut self, result: &TickResult, content: &Content) {
        for event in &result.events {
            match event {
                TickEvent::Kill { .. } => {
                    *self.kills_in_zone.entry(self.zone).or_default() += 1;
                }
                TickEvent::ZoneTravel { zone, .. } => self.zone = *zone,
                TickEvent::EnemySpawned { named: true, .. } => {
                    let now = self.kills_in_zone.get(&self.zone).copied().unwrap_or(0);
                    if let Some(last) = self.last_spawn.insert(self.zone, now) {
                        let gap = now - last;
                        let cooldown = content
                            .zone(self.zone)
                            .map(|z| SpawnProfile::for_zone(z.dungeon).cooldown_kills)
                            .unwrap_or(0);
                        if gap < cooldown as u64 {
                            self.violations += 1;
                            tracing::warn!(zone = self.zone, gap, cooldown, "named spawned inside cooldown");
                        }
                        self.gaps.push(gap);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Simulate a single run of `max_ticks_per_run` ticks.
fn simulate_single_run(
    config: &SimConfig,
    content: &Content,
    rng: &mut ChaCha8Rng,
) -> Result<RunStats, CombatError> {
    let mut world = World::new(config.engine.clone(), content, &config.party_refs())?;
    let mut cadence = NamedCadence {
        zone: world.progress.zone,
        ..NamedCadence::default()
    };

    for _ in 0..config.max_ticks_per_run {
        let result = advance_tick(&mut world, content, rng);
        cadence.process_tick(&result, content);
    }

    let best_weapon_skill = world
        .roster
        .party
        .iter()
        .flat_map(|h| h.weapon_skills.iter().map(|(_, v)| v))
        .fold(0.0, f64::max);
    let best_magic_skill = world
        .roster
        .party
        .iter()
        .flat_map(|h| h.magic_skills.ledger.iter().map(|(_, v)| v))
        .fold(0.0, f64::max);

    Ok(RunStats {
        total_ticks: world.tick,
        final_zone: world.progress.zone,
        party_levels: world.roster.party.iter().map(|h| h.level).collect(),
        total_kills: world.stats.kills,
        named_kills: world.stats.named_kills,
        named_spawns: world.stats.named_spawns,
        wipes: world.stats.wipes,
        gold: world.gold,
        total_xp: world.total_xp,
        skill_ups: world.stats.skill_ups,
        named_gaps: cadence.gaps,
        cooldown_violations: cadence.violations,
        best_weapon_skill,
        best_magic_skill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_run() {
        let content = Content::builtin();
        let config = SimConfig {
            num_runs: 1,
            seed: Some(12345),
            max_ticks_per_run: 2_000,
            verbosity: 0,
            ..Default::default()
        };

        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let stats = simulate_single_run(&config, &content, &mut rng).unwrap();

        assert_eq!(stats.total_ticks, 2_000);
        assert!(stats.total_kills > 0);
        assert!(stats.skill_ups > 0);
        assert!(stats.best_weapon_skill > 1.0);
        assert_eq!(stats.cooldown_violations, 0);
    }

    #[test]
    fn test_full_simulation() {
        let content = Content::builtin();
        let config = SimConfig {
            num_runs: 3,
            seed: Some(42),
            max_ticks_per_run: 1_000,
            verbosity: 0,
            ..Default::default()
        };

        let report = run_simulation(&config, &content).unwrap();

        assert_eq!(report.num_runs, 3);
        assert!(report.avg_total_kills > 0.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let content = Content::builtin();
        let config = SimConfig {
            num_runs: 1,
            seed: Some(9),
            max_ticks_per_run: 500,
            verbosity: 0,
            ..Default::default()
        };
        let a = run_simulation(&config, &content).unwrap();
        let b = run_simulation(&config, &content).unwrap();
        assert_eq!(a.run_stats[0].total_kills, b.run_stats[0].total_kills);
        assert_eq!(a.run_stats[0].gold, b.run_stats[0].gold);
    }

    #[test]
    fn test_unknown_class_fails_the_run() {
        let content = Content::builtin();
        let config = SimConfig {
            num_runs: 1,
            seed: Some(1),
            party: vec![("bard".into(), "human".into())],
            verbosity: 0,
            ..Default::default()
        };
        assert!(run_simulation(&config, &content).is_err());
    }
}
