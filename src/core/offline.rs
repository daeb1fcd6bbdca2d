//! Offline catch-up.
//!
//! Time spent away is replayed as discrete ticks through the normal tick
//! engine, capped at [`EngineConfig::max_catch_up_ticks`](super::config::EngineConfig).

use super::tick::{advance_tick, TickEvent};
use super::world::World;
use crate::content::Content;
use rand::Rng;
use serde::Serialize;

/// Report of an offline replay.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct OfflineReport {
    pub elapsed_ms: u64,
    pub ticks_simulated: u64,
    /// True when the elapsed time exceeded the catch-up cap.
    pub capped: bool,
    pub kills: u64,
    pub xp_gained: u64,
    pub gold_gained: u64,
    pub wipes: u64,
    pub skill_ups: u64,
    pub level_before: u32,
    pub level_after: u32,
}

/// Ticks owed for `elapsed_ms`, and whether the cap cut them short.
pub fn ticks_owed(elapsed_ms: u64, tick_ms: u64, cap: u64) -> (u64, bool) {
    let owed = elapsed_ms / tick_ms.max(1);
    (owed.min(cap), owed > cap)
}

fn party_levels(world: &World) -> u32 {
    world.roster.party.iter().map(|h| h.level).sum()
}

/// Replays the ticks owed for `elapsed_ms` of absence.
pub fn catch_up(world: &mut World, content: &Content, elapsed_ms: u64, rng: &mut impl Rng) -> OfflineReport {
    let (ticks, capped) = ticks_owed(elapsed_ms, world.config.tick_ms, world.config.max_catch_up_ticks);
    let mut report = OfflineReport {
        elapsed_ms,
        ticks_simulated: ticks,
        capped,
        level_before: party_levels(world),
        ..OfflineReport::default()
    };
    let (xp_before, gold_before) = (world.total_xp, world.gold);

    let mut gold_spent = 0;
    for _ in 0..ticks {
        let result = advance_tick(world, content, rng);
        report.kills += result.kills() as u64;
        report.skill_ups += result.skill_ups() as u64;
        report.wipes += u64::from(result.wiped());
        gold_spent += result
            .events
            .iter()
            .filter_map(|e| match e {
                TickEvent::LeveledUp { cost, .. } => Some(*cost),
                TickEvent::PartyWipe { gold_lost } => Some(*gold_lost),
                _ => None,
            })
            .sum::<u64>();
    }

    report.xp_gained = world.total_xp - xp_before;
    report.gold_gained = (world.gold + gold_spent).saturating_sub(gold_before);
    report.level_after = party_levels(world);
    if capped {
        tracing::info!(ticks, elapsed_ms, "offline catch-up capped");
    }
    report
}
