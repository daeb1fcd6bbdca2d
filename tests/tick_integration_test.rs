//! Integration tests for advance_tick() over long seeded sessions.
//!
//! Uses seeded ChaCha8Rng for deterministic behavior.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tickrate::combat::{CombatEvent, Pool, Side};
use tickrate::content::Content;
use tickrate::core::{advance_tick, EngineConfig, TickEvent, World};

fn test_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn party() -> [(&'static str, &'static str); 3] {
    [("warrior", "human"), ("cleric", "dwarf"), ("wizard", "gnome")]
}

/// Run advance_tick in a loop, collecting all events
fn run_ticks(world: &mut World, content: &Content, rng: &mut ChaCha8Rng, count: usize) -> Vec<TickEvent> {
    let mut all_events = Vec::new();
    for _ in 0..count {
        all_events.extend(advance_tick(world, content, rng).events);
    }
    all_events
}

fn assert_world_sane(world: &World) {
    for actor in world.roster.party.iter().chain(&world.roster.enemies) {
        assert!(actor.health.current.is_finite());
        assert!(actor.health.current >= 0.0 && actor.health.current <= actor.health.max);
        if let Some(mana) = &actor.mana {
            assert!(mana.current >= 0.0 && mana.current <= mana.max);
        }
        if let Some(end) = &actor.endurance {
            assert!(end.current >= 0.0 && end.current <= end.max);
        }
    }
}

#[test]
fn test_same_seed_replays_identically() {
    let content = Content::builtin();
    let mut a = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let mut b = World::new(EngineConfig::default(), &content, &party()).unwrap();

    let events_a = run_ticks(&mut a, &content, &mut test_rng(77), 400);
    let events_b = run_ticks(&mut b, &content, &mut test_rng(77), 400);

    assert_eq!(events_a, events_b);
    assert_eq!(a.gold, b.gold);
    assert_eq!(a.total_xp, b.total_xp);
    assert_eq!(a.progress.zone, b.progress.zone);
}

#[test]
fn test_long_session_keeps_pools_in_bounds() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let mut rng = test_rng(3);
    for _ in 0..3_000 {
        advance_tick(&mut world, &content, &mut rng);
        assert_world_sane(&world);
    }
    assert_eq!(world.tick, 3_000);
    assert!(world.stats.kills > 0);
}

#[test]
fn test_kill_events_match_world_stats() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let events = run_ticks(&mut world, &content, &mut test_rng(8), 1_500);

    let kills = events.iter().filter(|e| matches!(e, TickEvent::Kill { .. })).count() as u64;
    let xp: u64 = events
        .iter()
        .filter_map(|e| match e {
            TickEvent::Kill { xp, .. } => Some(*xp),
            _ => None,
        })
        .sum();
    assert_eq!(kills, world.stats.kills);
    assert_eq!(xp, world.total_xp);
}

#[test]
fn test_party_swings_and_casts() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let events = run_ticks(&mut world, &content, &mut test_rng(21), 600);

    assert!(events
        .iter()
        .any(|e| matches!(e, TickEvent::Combat(CombatEvent::Damage { .. }))));
    assert!(events
        .iter()
        .any(|e| matches!(e, TickEvent::Combat(CombatEvent::CastStarted { .. }))));
}

#[test]
fn test_auto_level_spends_gold() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &[("warrior", "human")]).unwrap();
    let events = run_ticks(&mut world, &content, &mut test_rng(5), 2_000);

    let levels: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            TickEvent::LeveledUp { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert!(!levels.is_empty());
    assert!(levels.windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(world.roster.party[0].level, *levels.last().unwrap());
}

#[test]
fn test_manual_mode_stays_put() {
    let content = Content::builtin();
    let config = EngineConfig {
        auto_travel: false,
        auto_level: false,
        ..EngineConfig::default()
    };
    let mut world = World::new(config, &content, &party()).unwrap();
    let events = run_ticks(&mut world, &content, &mut test_rng(13), 1_000);

    assert_eq!(world.progress.zone, 1);
    assert!(world.roster.party.iter().all(|h| h.level == 1));
    assert!(!events.iter().any(|e| matches!(e, TickEvent::ZoneTravel { .. })));
    assert!(!events.iter().any(|e| matches!(e, TickEvent::LeveledUp { .. })));
}

#[test]
fn test_encounter_always_resumes() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    let mut rng = test_rng(99);
    for _ in 0..500 {
        advance_tick(&mut world, &content, &mut rng);
        assert!(world.roster.any_alive(Side::Party));
        assert!(!world.roster.enemies.is_empty());
    }
}

#[test]
fn test_world_survives_serde_round_trip() {
    let content = Content::builtin();
    let mut world = World::new(EngineConfig::default(), &content, &party()).unwrap();
    run_ticks(&mut world, &content, &mut test_rng(4), 300);

    let json = serde_json::to_string(&world).unwrap();
    let mut restored: World = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.restore(&content).unwrap(), 0);
    assert_eq!(restored.tick, world.tick);
    assert_eq!(restored.gold, world.gold);

    for (a, b) in world.roster.party.iter().zip(&restored.roster.party) {
        assert_eq!(a.level, b.level);
        assert_eq!(a.resists, b.resists);
        assert!((a.health.current - b.health.current).abs() < 1e-6);
    }
    let result = advance_tick(&mut restored, &content, &mut test_rng(1));
    assert_eq!(restored.tick, world.tick + 1);
    assert!(!result.events.is_empty() || restored.roster.any_alive(Side::Enemies));
}

#[test]
fn test_reaching_rolling_hills_unlocks_third_slot() {
    let content = Content::builtin();
    let config = EngineConfig {
        auto_level: false,
        ..EngineConfig::default()
    };
    let mut world = World::new(config, &content, &[("warrior", "human")]).unwrap();
    let hero = &mut world.roster.party[0];
    hero.health = Pool::full(1_000_000.0);
    hero.weapon.damage = 1_000.0;

    let mut rng = test_rng(12);
    let mut events = Vec::new();
    for _ in 0..20_000 {
        events.extend(advance_tick(&mut world, &content, &mut rng).events);
        if world.progress.zone >= 4 {
            break;
        }
    }

    assert_eq!(world.progress.zone, 4);
    assert!(events
        .iter()
        .any(|e| matches!(e, TickEvent::ZoneTravel { zone: 4, .. })));
    let unlocks: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            TickEvent::SlotUnlocked { slots } => Some(*slots),
            _ => None,
        })
        .collect();
    assert_eq!(unlocks, vec![2, 3]);
    assert_eq!(world.progress.slots_unlocked, 3);
}
