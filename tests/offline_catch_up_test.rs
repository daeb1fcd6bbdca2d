//! Offline catch-up integration tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tickrate::content::Content;
use tickrate::core::{advance_tick, catch_up, EngineConfig, World};

fn party() -> [(&'static str, &'static str); 2] {
    [("warrior", "human"), ("cleric", "dwarf")]
}

#[test]
fn test_catch_up_matches_live_play() {
    let content = Content::builtin();
    let mut offline = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let mut live = World::new(EngineConfig::default(), &content, &party()).unwrap();

    let report = catch_up(&mut offline, &content, 500 * 3000 + 1234, &mut ChaCha8Rng::seed_from_u64(6));

    let mut rng = ChaCha8Rng::seed_from_u64(6);
    for _ in 0..500 {
        advance_tick(&mut live, &content, &mut rng);
    }

    assert_eq!(report.ticks_simulated, 500);
    assert_eq!(offline.tick, live.tick);
    assert_eq!(offline.gold, live.gold);
    assert_eq!(offline.total_xp, live.total_xp);
    assert_eq!(report.kills, live.stats.kills);
    assert_eq!(report.wipes, live.stats.wipes);
}

#[test]
fn test_level_totals_never_drop() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let report = catch_up(&mut world, &content, 2 * 60 * 60 * 1000, &mut ChaCha8Rng::seed_from_u64(2));
    assert_eq!(report.level_before, 2);
    assert!(report.level_after >= report.level_before);
    assert!(report.gold_gained >= world.gold);
}

#[test]
fn test_short_absence_is_a_no_op() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let report = catch_up(&mut world, &content, 2_999, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(report.ticks_simulated, 0);
    assert_eq!(world.tick, 0);
    assert_eq!(report.kills, 0);
}
