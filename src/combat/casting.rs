//! Per-actor cast lifecycle: idle → casting → completed | interrupted.
//!
//! A cast is committed at start (cooldown set, cost paid unless deferred),
//! can be interrupted by damage with one roll per hit, and resolves with a
//! quality roll once the clock reaches its end time. Interrupted casts are
//! reaped on the next [`tick_cast`].

use super::math::roll_chance;
use super::types::{Actor, ActorId};
use crate::core::constants::INTERRUPT_MANA_FRACTION;
use crate::core::error::{CombatError, ResourceKind};
use crate::skills::ledger::SkillUp;
use crate::skills::magic::{interrupt_chance, roll_quality, CastQuality, MagicSkill, Specialization};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastingState {
    pub action_id: String,
    pub target: Option<ActorId>,
    #[serde(default)]
    pub specialization: Option<Specialization>,
    /// Mana this cast is responsible for.
    pub mana_cost: f64,
    pub endurance_cost: f64,
    /// True when the cost is only charged at completion.
    #[serde(default)]
    pub cost_deferred: bool,
    pub started_at_ms: u64,
    pub ends_at_ms: u64,
    #[serde(default)]
    pub hits_taken: u32,
    #[serde(default)]
    pub interrupted: bool,
}

/// What starting a cast needs to know about the action.
#[derive(Debug, Clone)]
pub struct CastRequest<'a> {
    pub action_id: &'a str,
    pub action_name: &'a str,
    pub target: Option<ActorId>,
    pub specialization: Option<Specialization>,
    pub mana_cost: f64,
    pub endurance_cost: f64,
    pub cooldown_ticks: u32,
    pub cast_time_ticks: u32,
}

/// Result of advancing a cast by one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum CastTick {
    Idle,
    Casting { remaining_ms: u64 },
    Interrupted(CastingState),
    Completed {
        cast: CastingState,
        quality: CastQuality,
        skill_ups: Vec<SkillUp<MagicSkill>>,
    },
}

/// Mana the actor would pay for `request`, after specialization savings.
pub fn effective_mana_cost(actor: &Actor, request: &CastRequest<'_>) -> f64 {
    match (actor.class_key(), request.specialization) {
        (Some(class), Some(spec)) if request.mana_cost > 0.0 => {
            actor
                .magic_skills
                .preview_mana_cost(class, actor.level, spec, request.mana_cost)
        }
        _ => request.mana_cost,
    }
}

/// Fails without side effects when either pool is short.
pub fn check_affordable(actor: &Actor, request: &CastRequest<'_>) -> Result<(), CombatError> {
    let mana = effective_mana_cost(actor, request);
    for (resource, needed) in [
        (ResourceKind::Mana, mana),
        (ResourceKind::Endurance, request.endurance_cost),
    ] {
        if needed > 0.0 && !actor.pool(resource).map_or(false, |p| p.can_afford(needed)) {
            return Err(CombatError::InsufficientResource {
                actor: actor.name.clone(),
                action: request.action_name.to_string(),
                resource,
                needed,
                available: actor.available(resource),
            });
        }
    }
    Ok(())
}

/// Pays the cost and sets the cooldown of an action. Returns the mana cost
/// after specialization savings. When `defer` is set, only the bank and
/// cooldown move; the caller charges the returned amount later.
pub fn commit_action(
    actor: &mut Actor,
    request: &CastRequest<'_>,
    defer: bool,
) -> Result<f64, CombatError> {
    if !actor.is_alive() {
        return Err(CombatError::InvalidState(format!(
            "{} cannot act while dead",
            actor.name
        )));
    }
    check_affordable(actor, request)?;

    let level = actor.level;
    let mana = match (actor.class_key().map(str::to_owned), request.specialization) {
        (Some(class), Some(spec)) if request.mana_cost > 0.0 => actor
            .magic_skills
            .final_mana_cost(&class, level, spec, request.mana_cost),
        _ => request.mana_cost,
    };

    if !defer {
        if let Some(pool) = actor.mana.as_mut() {
            pool.drain(mana);
        }
        if let Some(pool) = actor.endurance.as_mut() {
            pool.drain(request.endurance_cost);
        }
    }
    if request.cooldown_ticks > 0 {
        actor
            .cooldowns
            .insert(request.action_id.to_string(), request.cooldown_ticks);
    }
    Ok(mana)
}

/// Starts a cast that completes `cast_time_ticks` ticks from `now_ms`.
pub fn start_cast(
    actor: &mut Actor,
    request: &CastRequest<'_>,
    now_ms: u64,
    tick_ms: u64,
    defer_cost: bool,
) -> Result<(), CombatError> {
    if actor.is_casting() {
        return Err(CombatError::InvalidState(format!(
            "{} is already casting",
            actor.name
        )));
    }
    let mana_cost = commit_action(actor, request, defer_cost)?;
    let ends_at_ms = now_ms + request.cast_time_ticks.max(1) as u64 * tick_ms;

    actor.casting = Some(CastingState {
        action_id: request.action_id.to_string(),
        target: request.target,
        specialization: request.specialization,
        mana_cost,
        endurance_cost: request.endurance_cost,
        cost_deferred: defer_cost,
        started_at_ms: now_ms,
        ends_at_ms,
        hits_taken: 0,
        interrupted: false,
    });
    Ok(())
}

/// Registers a damaging hit against a casting actor. Returns true when this
/// hit interrupted the cast.
pub fn on_damaged(actor: &mut Actor, amount: f64, rng: &mut impl Rng) -> bool {
    if amount <= 0.0 {
        return false;
    }
    let channeling = match actor.class_key() {
        Some(class) => actor
            .magic_skills
            .ratio(class, actor.level, MagicSkill::Channeling),
        None => 0.0,
    };
    let Some(cast) = actor.casting.as_mut() else {
        return false;
    };
    if cast.interrupted {
        return false;
    }

    cast.hits_taken += 1;
    let chance = interrupt_chance(cast.hits_taken, channeling);
    if !roll_chance(chance, rng) {
        return false;
    }

    cast.interrupted = true;
    if cast.cost_deferred {
        let lost = (cast.mana_cost * INTERRUPT_MANA_FRACTION).round();
        if let Some(pool) = actor.mana.as_mut() {
            pool.drain(lost);
        }
    }
    tracing::debug!(actor = %actor.name, chance, "cast interrupted");
    true
}

/// Drops the active cast without completing it. No refund.
pub fn cancel_cast(actor: &mut Actor) -> Option<CastingState> {
    actor.casting.take()
}

/// Advances the cast by one tick.
///
/// On completion this charges any deferred cost, rolls quality from school
/// mastery and runs the completion skill-ups. `target_level` feeds the
/// trivial-target rule; pass `None` for self-targeted utility.
pub fn tick_cast(
    actor: &mut Actor,
    now_ms: u64,
    target_level: Option<u32>,
    rate_mult: f64,
    rng: &mut impl Rng,
) -> CastTick {
    let Some(cast) = actor.casting.as_ref() else {
        return CastTick::Idle;
    };
    if cast.interrupted {
        return match actor.casting.take() {
            Some(cast) => CastTick::Interrupted(cast),
            None => CastTick::Idle,
        };
    }
    if now_ms < cast.ends_at_ms {
        return CastTick::Casting {
            remaining_ms: cast.ends_at_ms - now_ms,
        };
    }

    let Some(cast) = actor.casting.take() else {
        return CastTick::Idle;
    };
    if cast.cost_deferred {
        if let Some(pool) = actor.mana.as_mut() {
            pool.drain(cast.mana_cost);
        }
        if let Some(pool) = actor.endurance.as_mut() {
            pool.drain(cast.endurance_cost);
        }
    }

    let level = actor.level;
    let (quality, skill_ups) = match (actor.class_key().map(str::to_owned), cast.specialization) {
        (Some(class), Some(spec)) => {
            let mastery = actor
                .magic_skills
                .ratio(&class, level, MagicSkill::School(spec));
            let quality = roll_quality(mastery, rng);
            let ups = actor.magic_skills.on_cast_complete(
                &class,
                level,
                spec,
                cast.hits_taken,
                target_level,
                rate_mult,
                rng,
            );
            (quality, ups)
        }
        _ => (CastQuality::Full, Vec::new()),
    };

    CastTick::Completed {
        cast,
        quality,
        skill_ups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::test_support::hero;
    use rand::rngs::mock::StepRng;

    fn fireblast(cast_time_ticks: u32) -> CastRequest<'static> {
        CastRequest {
            action_id: "fireblast",
            action_name: "Fireblast",
            target: Some(10),
            specialization: Some(Specialization::Destruction),
            mana_cost: 10.0,
            endurance_cost: 0.0,
            cooldown_ticks: 3,
            cast_time_ticks,
        }
    }

    fn wizard() -> Actor {
        let mut a = hero(1, "wizard");
        a.magic_skills.ensure("wizard", a.level);
        a
    }

    #[test]
    fn test_start_pays_cost_and_sets_cooldown() {
        let mut a = wizard();
        start_cast(&mut a, &fireblast(1), 0, 3000, false).unwrap();
        assert_eq!(a.mana.unwrap().current, 90.0);
        assert_eq!(a.cooldown("fireblast"), 3);
        assert_eq!(a.casting.as_ref().unwrap().ends_at_ms, 3000);
    }

    #[test]
    fn test_start_fails_without_side_effects() {
        let mut a = wizard();
        a.mana = Some(crate::combat::types::Pool { current: 4.0, max: 100.0 });
        let err = start_cast(&mut a, &fireblast(1), 0, 3000, false).unwrap_err();
        assert!(matches!(err, CombatError::InsufficientResource { resource: ResourceKind::Mana, .. }));
        assert_eq!(a.mana.unwrap().current, 4.0);
        assert_eq!(a.cooldown("fireblast"), 0);
        assert!(a.casting.is_none());
        assert!(a.magic_skills.mana_bank.is_empty());
    }

    #[test]
    fn test_second_cast_is_invalid() {
        let mut a = wizard();
        start_cast(&mut a, &fireblast(2), 0, 3000, false).unwrap();
        let err = start_cast(&mut a, &fireblast(1), 0, 3000, false).unwrap_err();
        assert!(matches!(err, CombatError::InvalidState(_)));
    }

    #[test]
    fn test_completes_exactly_at_end_time() {
        let mut a = wizard();
        let mut rng = StepRng::new(u64::MAX, 0);
        start_cast(&mut a, &fireblast(2), 30_000, 3000, false).unwrap();
        assert_eq!(
            tick_cast(&mut a, 33_000, Some(5), 1.0, &mut rng),
            CastTick::Casting { remaining_ms: 3000 }
        );
        match tick_cast(&mut a, 36_000, Some(5), 1.0, &mut rng) {
            CastTick::Completed { quality, .. } => assert_eq!(quality, CastQuality::Full),
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(tick_cast(&mut a, 39_000, Some(5), 1.0, &mut rng), CastTick::Idle);
    }

    #[test]
    fn test_damage_interrupts_and_is_reaped_next_tick() {
        let mut a = wizard();
        let mut always = StepRng::new(0, 0);
        start_cast(&mut a, &fireblast(2), 0, 3000, true).unwrap();
        assert_eq!(a.mana.unwrap().current, 100.0);

        assert!(!on_damaged(&mut a, 0.0, &mut always));
        assert!(on_damaged(&mut a, 5.0, &mut always));
        // Half of the reserved 10 mana is lost.
        assert_eq!(a.mana.unwrap().current, 95.0);
        assert!(!on_damaged(&mut a, 5.0, &mut always));

        match tick_cast(&mut a, 3000, Some(5), 1.0, &mut always) {
            CastTick::Interrupted(cast) => assert_eq!(cast.hits_taken, 1),
            other => panic!("expected interruption, got {other:?}"),
        }
        assert!(a.casting.is_none());
    }

    #[test]
    fn test_failed_interrupt_counts_hits() {
        let mut a = wizard();
        let mut never = StepRng::new(u64::MAX, 0);
        start_cast(&mut a, &fireblast(1), 0, 3000, false).unwrap();
        assert!(!on_damaged(&mut a, 5.0, &mut never));
        assert!(!on_damaged(&mut a, 5.0, &mut never));
        assert_eq!(a.casting.as_ref().unwrap().hits_taken, 2);
    }

    #[test]
    fn test_deferred_cost_paid_on_completion() {
        let mut a = wizard();
        let mut never = StepRng::new(u64::MAX, 0);
        start_cast(&mut a, &fireblast(1), 0, 3000, true).unwrap();
        let result = tick_cast(&mut a, 3000, Some(5), 1.0, &mut never);
        assert!(matches!(result, CastTick::Completed { .. }));
        assert_eq!(a.mana.unwrap().current, 90.0);
    }

    #[test]
    fn test_skill_ups_only_on_completion() {
        let mut a = wizard();
        let mut always = StepRng::new(0, 0);
        start_cast(&mut a, &fireblast(1), 0, 3000, false).unwrap();
        let school = MagicSkill::School(Specialization::Destruction);
        assert_eq!(a.magic_skills.ledger.value(&school), Some(1.0));
        match tick_cast(&mut a, 3000, Some(5), 1.0, &mut always) {
            CastTick::Completed { skill_ups, .. } => {
                assert!(skill_ups.iter().any(|u| u.skill == school))
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(a.magic_skills.ledger.value(&school), Some(2.0));
    }
}
