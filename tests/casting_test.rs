//! Cast lifecycle tests against real heroes built from the built-in content.
//!
//! Timing is checked on the engine clock (`tick * tick_ms`), and interrupts
//! are pinned with constant RNG sources.

use rand::rngs::mock::StepRng;
use tickrate::combat::casting::{cancel_cast, on_damaged, start_cast, tick_cast, CastRequest};
use tickrate::combat::{Actor, CastTick};
use tickrate::content::Content;
use tickrate::core::constants::DEFAULT_TICK_MS;
use tickrate::party::create_hero;
use tickrate::skills::{CastQuality, Specialization};

fn wizard() -> Actor {
    create_hero(&Content::builtin(), 1, "wizard", "gnome").unwrap()
}

fn bolt(cast_time_ticks: u32) -> CastRequest<'static> {
    CastRequest {
        action_id: "test_bolt",
        action_name: "Test Bolt",
        target: Some(2),
        specialization: Some(Specialization::Destruction),
        mana_cost: 10.0,
        endurance_cost: 0.0,
        cooldown_ticks: 3,
        cast_time_ticks,
    }
}

fn at_tick(tick: u64) -> u64 {
    tick * DEFAULT_TICK_MS
}

#[test]
fn test_cast_completes_exactly_at_end_tick() {
    let mut hero = wizard();
    let mut rng = StepRng::new(u64::MAX, 0);
    start_cast(&mut hero, &bolt(2), at_tick(10), DEFAULT_TICK_MS, false).unwrap();

    match tick_cast(&mut hero, at_tick(11), Some(1), 1.0, &mut rng) {
        CastTick::Casting { remaining_ms } => assert_eq!(remaining_ms, DEFAULT_TICK_MS),
        other => panic!("expected cast in progress, got {other:?}"),
    }
    assert!(hero.is_casting());

    match tick_cast(&mut hero, at_tick(12), Some(1), 1.0, &mut rng) {
        CastTick::Completed { cast, quality, .. } => {
            assert_eq!(cast.action_id, "test_bolt");
            assert_eq!(quality, CastQuality::Full);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert!(!hero.is_casting());
    assert_eq!(tick_cast(&mut hero, at_tick(13), None, 1.0, &mut rng), CastTick::Idle);
}

#[test]
fn test_cost_and_cooldown_committed_at_start() {
    let mut hero = wizard();
    let before = hero.mana.as_ref().unwrap().current;
    start_cast(&mut hero, &bolt(2), 0, DEFAULT_TICK_MS, false).unwrap();
    assert_eq!(hero.mana.as_ref().unwrap().current, before - 10.0);
    assert_eq!(hero.cooldown("test_bolt"), 3);
}

#[test]
fn test_second_cast_is_rejected_while_casting() {
    let mut hero = wizard();
    start_cast(&mut hero, &bolt(2), 0, DEFAULT_TICK_MS, false).unwrap();
    assert!(start_cast(&mut hero, &bolt(1), 0, DEFAULT_TICK_MS, false).is_err());
}

#[test]
fn test_unaffordable_cast_leaves_actor_untouched() {
    let mut hero = wizard();
    if let Some(pool) = hero.mana.as_mut() {
        pool.current = 5.0;
    }
    assert!(start_cast(&mut hero, &bolt(2), 0, DEFAULT_TICK_MS, false).is_err());
    assert!(!hero.is_casting());
    assert_eq!(hero.cooldown("test_bolt"), 0);
    assert_eq!(hero.mana.as_ref().unwrap().current, 5.0);
}

#[test]
fn test_interrupted_cast_is_reaped_next_tick() {
    let mut hero = wizard();
    let mut always = StepRng::new(0, 0);
    start_cast(&mut hero, &bolt(3), 0, DEFAULT_TICK_MS, false).unwrap();

    assert!(on_damaged(&mut hero, 12.0, &mut always));
    // A second hit on an already interrupted cast does nothing.
    assert!(!on_damaged(&mut hero, 12.0, &mut always));

    match tick_cast(&mut hero, at_tick(1), Some(1), 1.0, &mut always) {
        CastTick::Interrupted(cast) => assert_eq!(cast.hits_taken, 1),
        other => panic!("expected interruption, got {other:?}"),
    }
    assert!(!hero.is_casting());
}

#[test]
fn test_deferred_cost_loses_half_on_interrupt() {
    let mut hero = wizard();
    let mut always = StepRng::new(0, 0);
    let before = hero.mana.as_ref().unwrap().current;
    start_cast(&mut hero, &bolt(3), 0, DEFAULT_TICK_MS, true).unwrap();
    assert_eq!(hero.mana.as_ref().unwrap().current, before);

    assert!(on_damaged(&mut hero, 5.0, &mut always));
    assert_eq!(hero.mana.as_ref().unwrap().current, before - 5.0);
}

#[test]
fn test_zero_damage_hits_never_interrupt() {
    let mut hero = wizard();
    let mut always = StepRng::new(0, 0);
    start_cast(&mut hero, &bolt(3), 0, DEFAULT_TICK_MS, false).unwrap();
    assert!(!on_damaged(&mut hero, 0.0, &mut always));
    assert_eq!(hero.casting.as_ref().unwrap().hits_taken, 0);
}

#[test]
fn test_cancel_gives_no_refund() {
    let mut hero = wizard();
    let before = hero.mana.as_ref().unwrap().current;
    start_cast(&mut hero, &bolt(2), 0, DEFAULT_TICK_MS, false).unwrap();
    assert!(cancel_cast(&mut hero).is_some());
    assert_eq!(hero.mana.as_ref().unwrap().current, before - 10.0);
    assert!(cancel_cast(&mut hero).is_none());
}
