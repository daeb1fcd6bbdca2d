//! Action selection and resolution, auto-attacks and periodic damage.
//!
//! Every action effect is a variant of [`ActionEffect`]; resolution is one
//! `match`. Failures never escape: a missing definition is logged and the
//! next action in the priority list is tried, and so is an action the actor
//! cannot afford.

use super::casting::{commit_action, start_cast, on_damaged, cancel_cast, CastRequest};
use super::effects::{ActiveEffect, EffectKind};
use super::events::CombatEvent;
use super::math::{ac_mitigation, crit_chance, hit_chance, raw_damage, roll_chance, roll_range};
use super::resist::{self, ResistRoll};
use super::swing::swing_timing;
use super::types::{Actor, ActorId, Roster, Side};
use crate::content::{ActionDef, ActionEffect, BuffStat, Content, TargetMode};
use crate::core::config::EngineConfig;
use crate::core::constants::*;
use crate::core::error::CombatError;
use crate::skills::magic::CastQuality;
use crate::skills::weapon::{melee_damage_scalar, try_weapon_skill_up, weapon_skill_ratio};
use rand::Rng;

/// What resolution needs besides the roster.
#[derive(Debug, Clone, Copy)]
pub struct ActionEnv<'a> {
    pub content: &'a Content,
    pub config: &'a EngineConfig,
    pub now_ms: u64,
}

impl ActionEnv<'_> {
    fn ticks_to_ms(&self, ticks: u32) -> u64 {
        ticks as u64 * self.config.tick_ms
    }

    fn resist_band(&self) -> (f64, f64) {
        (self.config.resist_min_chance, self.config.resist_max_chance)
    }
}

/// Outcome of one application of damage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageResult {
    pub dealt: u32,
    pub absorbed: u32,
    pub broke_mesmerize: bool,
    pub interrupted: bool,
    pub killed: bool,
}

fn buff_kind(stat: BuffStat) -> EffectKind {
    match stat {
        BuffStat::Armor => EffectKind::ArmorBonus,
        BuffStat::Haste => EffectKind::Haste,
        BuffStat::Accuracy => EffectKind::AccuracyBonus,
        BuffStat::Damage => EffectKind::DamageBonus,
        BuffStat::Mitigation => EffectKind::Mitigation,
    }
}

/// Whether `actor` is allowed to use `def` at all.
pub fn usable_by(def: &ActionDef, actor: &Actor) -> bool {
    match actor.class_key() {
        Some(class) => def.users.allows_class(class),
        None => def.users.mobs,
    }
}

// ── Targeting ───────────────────────────────────────────────────

/// Picks the target of `def` for `actor`. `None` means the action has
/// nothing to do right now. Area actions target `Some(actor.id)` and resolve
/// their victims at resolution time.
pub fn pick_target(roster: &Roster, actor: &Actor, def: &ActionDef, now_ms: u64) -> Option<ActorId> {
    let allies = actor.side();
    let key = def.id.as_str();
    let target = match def.target {
        TargetMode::SelfOnly => Some(actor.id),
        TargetMode::Ally => match def.effect {
            ActionEffect::Heal { .. } => roster
                .most_injured_ally(allies)
                .filter(|a| a.health.fraction() < HEAL_THRESHOLD)
                .map(|a| a.id),
            _ => roster
                .living(allies)
                .find(|a| !a.effects.is_active(key, now_ms))
                .map(|a| a.id),
        },
        TargetMode::Enemy => roster.primary_target(actor),
        TargetMode::SecondaryEnemy => roster.secondary_target(actor),
        TargetMode::AoeEnemies => roster.any_alive(allies.opponent()).then_some(actor.id),
    }?;
    let target_actor = roster.get(target)?;
    is_useful(roster, actor, target_actor, def, now_ms).then_some(target)
}

fn is_useful(roster: &Roster, actor: &Actor, target: &Actor, def: &ActionDef, now_ms: u64) -> bool {
    let key = def.id.as_str();
    match &def.effect {
        ActionEffect::Damage { .. } | ActionEffect::AreaDamage { .. } | ActionEffect::Heal { .. } => true,
        ActionEffect::DamageOverTime { .. } => !target.effects.is_active(key, now_ms),
        ActionEffect::Mesmerize { .. } => !target.effects.is_crowd_controlled(now_ms),
        ActionEffect::Fear { level_cap, .. } => {
            target.level <= *level_cap && !target.effects.is_crowd_controlled(now_ms)
        }
        ActionEffect::Ward { .. } | ActionEffect::Buff { .. } => !target.effects.is_active(key, now_ms),
        ActionEffect::RestoreMana { .. } => actor
            .mana
            .map_or(false, |m| m.fraction() < RESTORE_MANA_THRESHOLD),
        ActionEffect::Taunt => roster.primary_target(target) != Some(actor.id),
    }
}

/// The request handed to the casting state machine.
pub fn cast_request<'a>(def: &'a ActionDef, target: Option<ActorId>) -> CastRequest<'a> {
    CastRequest {
        action_id: &def.id,
        action_name: &def.name,
        target,
        specialization: def.specialization,
        mana_cost: def.cost.mana,
        endurance_cost: def.cost.endurance,
        cooldown_ticks: def.cooldown_ticks,
        cast_time_ticks: def.cast_time_ticks,
    }
}

/// Lets `actor_id` use the first ready, useful and affordable action in its
/// priority list: cast-time actions start a cast, instant ones resolve now.
pub fn act(env: &ActionEnv<'_>, roster: &mut Roster, actor_id: ActorId, rng: &mut impl Rng) -> Vec<CombatEvent> {
    let Some(actor) = roster.get(actor_id) else {
        return Vec::new();
    };
    if !actor.is_alive() || actor.is_casting() || actor.effects.is_crowd_controlled(env.now_ms) {
        return Vec::new();
    }

    for action_id in actor.actions.clone() {
        let def = match env.content.action(&action_id) {
            Ok(def) => def,
            Err(err) => {
                tracing::warn!(%err, "skipping action");
                continue;
            }
        };
        let Some(actor) = roster.get(actor_id) else {
            return Vec::new();
        };
        if !usable_by(def, actor) || actor.cooldown(&def.id) > 0 {
            continue;
        }
        let Some(target) = pick_target(roster, actor, def, env.now_ms) else {
            continue;
        };
        let actor_name = actor.name.clone();
        let request = cast_request(def, Some(target));
        let Some(actor) = roster.get_mut(actor_id) else {
            return Vec::new();
        };

        let committed = if def.cast_time_ticks > 0 {
            start_cast(actor, &request, env.now_ms, env.config.tick_ms, env.config.defer_cast_cost)
                .map(|()| None)
        } else {
            commit_action(actor, &request, false).map(|_| Some(()))
        };
        match committed {
            Ok(None) => {
                return vec![CombatEvent::CastStarted {
                    actor: actor_name,
                    action: def.name.clone(),
                    ticks: def.cast_time_ticks,
                }];
            }
            Ok(Some(())) => {
                return resolve_action(env, roster, actor_id, def, Some(target), CastQuality::Full, rng);
            }
            Err(err @ CombatError::InsufficientResource { .. }) => {
                tracing::debug!(%err, "action skipped");
            }
            Err(err) => {
                tracing::debug!(%err, "action rejected");
                return Vec::new();
            }
        }
    }
    Vec::new()
}

// ── Resolution ──────────────────────────────────────────────────

/// Damage after the target's mitigation buffs and wards. Breaks mesmerize
/// when `direct`, adds threat for hero sources, rolls cast interruption and
/// cancels the target's cast if it dies.
pub fn apply_damage(
    env: &ActionEnv<'_>,
    roster: &mut Roster,
    source: ActorId,
    target: ActorId,
    amount: f64,
    direct: bool,
    rng: &mut impl Rng,
) -> Option<DamageResult> {
    let source_is_hero = roster.get(source).map_or(false, Actor::is_hero);
    let now = env.now_ms;
    let victim = roster.get_mut(target)?;
    if !victim.is_alive() || amount <= 0.0 {
        return None;
    }

    let mitigation = victim.effects.total(EffectKind::Mitigation, now).clamp(0.0, 1.0);
    let incoming = (amount * (1.0 - mitigation)).round();
    let remaining = victim.effects.absorb(incoming, now);
    let absorbed = incoming - remaining;
    let dealt = victim.health.drain(remaining);

    let mut result = DamageResult {
        dealt: dealt.round() as u32,
        absorbed: absorbed.round() as u32,
        ..DamageResult::default()
    };
    if direct && dealt > 0.0 && victim.effects.remove_kind(EffectKind::Mesmerize) > 0 {
        result.broke_mesmerize = true;
    }
    if source_is_hero && !victim.is_hero() {
        victim.add_threat(source, dealt + absorbed);
    }
    result.interrupted = on_damaged(victim, dealt, rng);
    if !victim.is_alive() {
        cancel_cast(victim);
        result.killed = true;
    }
    Some(result)
}

fn damage_event(
    env: &ActionEnv<'_>,
    roster: &mut Roster,
    caster: &Caster,
    def: &ActionDef,
    target: ActorId,
    amount: f64,
    rng: &mut impl Rng,
    events: &mut Vec<CombatEvent>,
) {
    let target_name = roster.get(target).map(|t| t.name.clone()).unwrap_or_default();
    if let Some(result) = apply_damage(env, roster, caster.id, target, amount, true, rng) {
        events.push(CombatEvent::Damage {
            source: caster.name.clone(),
            target: target_name.clone(),
            action: def.name.clone(),
            amount: result.dealt,
            absorbed: result.absorbed,
        });
        if result.broke_mesmerize {
            events.push(CombatEvent::MesmerizeBroken { target: target_name });
        }
    }
}

/// The caster fields resolution needs after the roster is borrowed mutably.
#[derive(Debug, Clone)]
struct Caster {
    id: ActorId,
    name: String,
    level: u32,
    side: Side,
    strength: u32,
    weapon_damage: f64,
}

/// Rolls resist for `def` against `target`, pushing a log event when the
/// effect was reduced. Returns the multiplier to apply.
fn roll_resist(
    env: &ActionEnv<'_>,
    roster: &Roster,
    caster: ActorId,
    target: ActorId,
    def: &ActionDef,
    rng: &mut impl Rng,
    events: &mut Vec<CombatEvent>,
) -> f64 {
    let (Some(c), Some(t)) = (roster.get(caster), roster.get(target)) else {
        return 0.0;
    };
    if c.side() == t.side() {
        return 1.0;
    }
    let roll: ResistRoll = resist::resolve(c, t, def.resist.as_ref(), env.resist_band(), rng);
    if roll.resisted || roll.partial_percent < 100 {
        tracing::debug!(action = %def.id, chance = roll.chance, "resist roll");
        events.push(CombatEvent::Resisted {
            target: t.name.clone(),
            action: def.name.clone(),
            roll,
        });
    }
    roll.effect_multiplier
}

fn apply_effect(
    env: &ActionEnv<'_>,
    roster: &mut Roster,
    caster: ActorId,
    target: ActorId,
    name: &str,
    kind: EffectKind,
    magnitude: f64,
    ticks: u32,
    events: &mut Vec<CombatEvent>,
) {
    let Some(victim) = roster.get_mut(target) else {
        return;
    };
    if !victim.is_alive() || ticks == 0 {
        return;
    }
    victim.effects.set(
        name,
        ActiveEffect {
            kind,
            expires_at_ms: env.now_ms + env.ticks_to_ms(ticks),
            magnitude,
            source: Some(caster),
        },
    );
    events.push(CombatEvent::EffectApplied {
        target: victim.name.clone(),
        effect: name.to_string(),
        ticks,
    });
}

/// Applies a committed or completed action. `quality` comes from the cast
/// quality roll; instants resolve at [`CastQuality::Full`].
pub fn resolve_action(
    env: &ActionEnv<'_>,
    roster: &mut Roster,
    caster_id: ActorId,
    def: &ActionDef,
    target: Option<ActorId>,
    quality: CastQuality,
    rng: &mut impl Rng,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let Some(actor) = roster.get(caster_id) else {
        return events;
    };
    let profile = actor.profile(env.now_ms);
    let caster = Caster {
        id: caster_id,
        name: actor.name.clone(),
        level: actor.level,
        side: actor.side(),
        strength: profile.stats.strength,
        weapon_damage: profile.base_damage,
    };

    if quality != CastQuality::Full {
        events.push(CombatEvent::CastQuality {
            actor: caster.name.clone(),
            action: def.name.clone(),
            quality,
        });
    }
    let scale = quality.multiplier();
    if scale <= 0.0 {
        return events;
    }

    let single = target.filter(|&t| roster.get(t).map_or(false, Actor::is_alive));
    let physical = def.specialization.is_none();

    match &def.effect {
        ActionEffect::Damage { min, max, level_bonus } => {
            let Some(target) = single else { return events };
            let mult = roll_resist(env, roster, caster.id, target, def, rng, &mut events);
            if mult <= 0.0 {
                return events;
            }
            let bonus = level_bonus.map_or(0.0, |b| b.at_level(caster.level));
            let mut amount = roll_range(*min, max + bonus, rng);
            if physical {
                let armor = roster.get(target).map_or(0, |t| t.effective_stats(env.now_ms).armor);
                amount = ac_mitigation(raw_damage(amount, caster.strength, false), armor) as f64;
            }
            damage_event(env, roster, &caster, def, target, amount * scale * mult, rng, &mut events);
        }
        ActionEffect::AreaDamage { min, max, max_targets, diminishing, uses_weapon_damage } => {
            let victims: Vec<ActorId> = roster
                .living(caster.side.opponent())
                .take(*max_targets)
                .map(|a| a.id)
                .collect();
            let mut share = 1.0;
            for victim in victims {
                let mult = roll_resist(env, roster, caster.id, victim, def, rng, &mut events);
                if mult > 0.0 {
                    let mut amount = if *uses_weapon_damage {
                        caster.weapon_damage
                    } else {
                        roll_range(*min, *max, rng)
                    };
                    if physical {
                        let armor = roster.get(victim).map_or(0, |t| t.effective_stats(env.now_ms).armor);
                        amount = ac_mitigation(raw_damage(amount, caster.strength, false), armor) as f64;
                    }
                    let amount = (amount * share * scale * mult).max(1.0);
                    damage_event(env, roster, &caster, def, victim, amount, rng, &mut events);
                }
                if *diminishing {
                    share *= AREA_FALLOFF;
                }
            }
        }
        ActionEffect::Heal { min, max } => {
            let Some(target) = single else { return events };
            let amount = (roll_range(*min, *max, rng) * scale).round();
            let Some(patient) = roster.get_mut(target) else { return events };
            let healed = patient.health.restore(amount);
            let patient_name = patient.name.clone();
            if caster.side == Side::Party {
                for enemy in roster.enemies.iter_mut().filter(|e| e.is_alive()) {
                    enemy.add_threat(caster.id, healed * HEAL_THREAT_FRACTION);
                }
            }
            events.push(CombatEvent::Heal {
                source: caster.name.clone(),
                target: patient_name,
                action: def.name.clone(),
                amount: healed.round() as u32,
            });
        }
        ActionEffect::DamageOverTime { base, max, levels_per_point, duration_ticks, armor_shred } => {
            let Some(target) = single else { return events };
            let mult = roll_resist(env, roster, caster.id, target, def, rng, &mut events);
            if mult <= 0.0 {
                return events;
            }
            let growth = if *levels_per_point > 0 {
                (caster.level / levels_per_point) as f64
            } else {
                0.0
            };
            let per_tick = (base + growth).min(*max) * scale * mult;
            apply_effect(env, roster, caster.id, target, &def.id, EffectKind::DamageOverTime, per_tick, *duration_ticks, &mut events);
            if *armor_shred > 0.0 {
                let shred = format!("{}_shred", def.id);
                if let Some(victim) = roster.get_mut(target) {
                    victim.effects.set(
                        shred,
                        ActiveEffect {
                            kind: EffectKind::ArmorShred,
                            expires_at_ms: env.now_ms + env.ticks_to_ms(*duration_ticks),
                            magnitude: armor_shred * mult,
                            source: Some(caster.id),
                        },
                    );
                }
            }
        }
        ActionEffect::Mesmerize { duration_ticks } => {
            let Some(target) = single else { return events };
            if roll_resist(env, roster, caster.id, target, def, rng, &mut events) <= 0.0 {
                return events;
            }
            apply_effect(env, roster, caster.id, target, &def.id, EffectKind::Mesmerize, 1.0, *duration_ticks, &mut events);
        }
        ActionEffect::Fear { level_cap, base_duration_ticks, bonus_at_level, min_duration_ticks } => {
            let Some(target) = single else { return events };
            let Some(victim) = roster.get(target) else { return events };
            if victim.level > *level_cap {
                events.push(CombatEvent::Immune {
                    target: victim.name.clone(),
                    action: def.name.clone(),
                });
                return events;
            }
            if roll_resist(env, roster, caster.id, target, def, rng, &mut events) <= 0.0 {
                return events;
            }
            let bonus = u32::from(caster.level >= *bonus_at_level);
            let ticks = (base_duration_ticks + bonus).max(*min_duration_ticks);
            apply_effect(env, roster, caster.id, target, &def.id, EffectKind::Fear, 1.0, ticks, &mut events);
        }
        ActionEffect::Ward { amount, duration_ticks } => {
            let Some(target) = single else { return events };
            apply_effect(env, roster, caster.id, target, &def.id, EffectKind::Ward, amount * scale, *duration_ticks, &mut events);
        }
        ActionEffect::Buff { stat, amount, duration_ticks } => {
            let Some(target) = single else { return events };
            apply_effect(env, roster, caster.id, target, &def.id, buff_kind(*stat), amount * scale, *duration_ticks, &mut events);
        }
        ActionEffect::RestoreMana { fraction } => {
            let Some(actor) = roster.get_mut(caster.id) else { return events };
            if let Some(pool) = actor.mana.as_mut() {
                let restored = pool.restore(pool.max * fraction * scale);
                events.push(CombatEvent::ManaRestored {
                    actor: caster.name.clone(),
                    amount: restored.round() as u32,
                });
            }
        }
        ActionEffect::Taunt => {
            let Some(target) = single else { return events };
            let Some(enemy) = roster.get_mut(target) else { return events };
            let top = enemy.top_threat();
            enemy.threat.insert(caster.id, top + 1.0);
            events.push(CombatEvent::Taunted {
                actor: caster.name.clone(),
                target: enemy.name.clone(),
            });
        }
    }
    events
}

// ── Auto-attacks ────────────────────────────────────────────────

/// Resolves the actor's basic attack when its swing timer is ready, then
/// resets the timer from weapon delay and haste. Sub-tick delays may add an
/// extra swing, scale damage and raise the weapon skill-up chance.
pub fn auto_attack(env: &ActionEnv<'_>, roster: &mut Roster, attacker_id: ActorId, rng: &mut impl Rng) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    let Some(attacker) = roster.get(attacker_id) else {
        return events;
    };
    if !attacker.is_alive()
        || attacker.swing_cooldown > 0
        || attacker.effects.is_crowd_controlled(env.now_ms)
    {
        return events;
    }
    let Some(target_id) = roster.primary_target(attacker) else {
        return events;
    };

    let timing = swing_timing(attacker.weapon.delay, attacker.haste(env.now_ms));
    let swings = if roll_chance(timing.overflow.extra_swing_chance, rng) { 2 } else { 1 };

    for swing in 0..swings {
        let (Some(attacker), Some(defender)) = (roster.get(attacker_id), roster.get(target_id)) else {
            break;
        };
        if !defender.is_alive() {
            break;
        }
        let attack = attacker.profile(env.now_ms);
        let defense = defender.profile(env.now_ms);
        let attacker_name = attacker.name.clone();
        let defender_name = defender.name.clone();
        let defender_level = defender.level;

        if !roll_chance(hit_chance(&attack, &defense), rng) {
            events.push(CombatEvent::Miss {
                attacker: attacker_name,
                target: defender_name,
            });
            continue;
        }
        let crit = roll_chance(crit_chance(&attack), rng);
        let mut raw = raw_damage(attack.base_damage * timing.overflow.damage_mult, attack.stats.strength, crit);
        if let Some(class) = attacker.class_key() {
            let ratio = weapon_skill_ratio(&attacker.weapon_skills, class, attacker.level, attacker.weapon.kind);
            raw *= melee_damage_scalar(ratio);
        }
        let damage = ac_mitigation(raw, defense.stats.armor);

        if let Some(result) = apply_damage(env, roster, attacker_id, target_id, damage as f64, true, rng) {
            events.push(CombatEvent::Swing {
                attacker: attacker_name.clone(),
                target: defender_name.clone(),
                damage: result.dealt + result.absorbed,
                crit,
                extra: swing > 0,
            });
            if result.broke_mesmerize {
                events.push(CombatEvent::MesmerizeBroken { target: defender_name });
            }
        }

        if let Some(attacker) = roster.get_mut(attacker_id) {
            let Some(class) = attacker.class_key().map(str::to_owned) else {
                continue;
            };
            let (level, weapon) = (attacker.level, attacker.weapon.kind);
            let rate = env.config.skill_up_rate_mult * timing.overflow.proc_mult;
            if let Some(up) = try_weapon_skill_up(&mut attacker.weapon_skills, &class, level, weapon, defender_level, rate, rng) {
                events.push(CombatEvent::SkillUp {
                    actor: attacker_name,
                    skill: up.skill.to_string(),
                    value: up.value,
                });
            }
        }
    }

    if let Some(attacker) = roster.get_mut(attacker_id) {
        attacker.swing_cooldown = timing.ticks;
    }
    events
}

// ── Periodic damage ─────────────────────────────────────────────

/// Deals one tick of every live damage-over-time effect. This damage does
/// not break mesmerize.
pub fn tick_damage_over_time(env: &ActionEnv<'_>, roster: &mut Roster, rng: &mut impl Rng) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    for id in roster.ids() {
        let Some(actor) = roster.get(id) else { continue };
        if !actor.is_alive() {
            continue;
        }
        let name = actor.name.clone();
        let dots: Vec<(String, f64, ActorId)> = actor
            .effects
            .active(env.now_ms)
            .filter(|(_, e)| e.kind == EffectKind::DamageOverTime)
            .map(|(key, e)| (key.to_string(), e.magnitude, e.source.unwrap_or(id)))
            .collect();
        for (effect, magnitude, source) in dots {
            if let Some(result) = apply_damage(env, roster, source, id, magnitude, false, rng) {
                events.push(CombatEvent::DamageOverTime {
                    target: name.clone(),
                    effect,
                    amount: result.dealt,
                });
            }
        }
    }
    events
}
