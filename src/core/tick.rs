//! The per-tick orchestration function.
//!
//! [`advance_tick`] processes one fixed-length tick of the current encounter
//! and returns a [`TickResult`] describing what happened, so a presentation
//! layer can render without the engine depending on any UI types. Nothing
//! in here fails: missing definitions and unaffordable actions are logged
//! and skipped, and the world is left consistent at the end of every tick.

use super::constants::*;
use super::world::{Spawn, World};
use crate::combat::actions::{act, auto_attack, resolve_action, tick_damage_over_time, ActionEnv};
use crate::combat::casting::{tick_cast, CastTick};
use crate::combat::events::CombatEvent;
use crate::combat::math::mana_regen_per_second;
use crate::combat::types::{ActorId, ActorKind, Roster, Side};
use crate::content::Content;
use crate::items::roll_loot;
use crate::zones::roll_discoveries;
use rand::Rng;
use std::collections::BTreeSet;

/// A single event produced by a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Combat ──────────────────────────────────────────────────
    Combat(CombatEvent),

    // ── Encounter ───────────────────────────────────────────────
    EnemySpawned {
        name: String,
        level: u32,
        named: bool,
        add: bool,
    },
    Kill {
        enemy: String,
        named: bool,
        xp: u64,
        gold: u64,
    },
    Loot {
        item: String,
        quantity: u32,
    },
    /// The party was wiped out and paid the soft penalty.
    PartyWipe { gold_lost: u64 },
    /// A downed hero got back up after the encounter was cleared.
    Revived { hero: String },

    // ── Progression ─────────────────────────────────────────────
    SubAreaDiscovered { zone: String, sub_area: String },
    ZoneTravel { zone: u32, name: String },
    SlotUnlocked { slots: usize },
    LeveledUp { hero: String, level: u32, cost: u64 },
}

impl TickEvent {
    pub fn message(&self) -> String {
        match self {
            TickEvent::Combat(event) => event.message(),
            TickEvent::EnemySpawned { name, level, named, add } => match (named, add) {
                (true, _) => format!("{name} (level {level}) has appeared!"),
                (false, true) => format!("A level {level} {name} joins the fight!"),
                (false, false) => format!("A level {level} {name} approaches."),
            },
            TickEvent::Kill { enemy, xp, gold, .. } => {
                format!("{enemy} defeated: +{xp} XP, +{gold} gold.")
            }
            TickEvent::Loot { item, quantity } => format!("Looted {quantity}x {item}."),
            TickEvent::PartyWipe { gold_lost } => {
                format!("The party has been wiped out! Lost {gold_lost} gold.")
            }
            TickEvent::Revived { hero } => format!("{hero} gets back up."),
            TickEvent::SubAreaDiscovered { zone, sub_area } => {
                format!("You discovered {sub_area} in {zone}!")
            }
            TickEvent::ZoneTravel { zone, name } => format!("The party travels to {name} (zone {zone})."),
            TickEvent::SlotUnlocked { slots } => format!("A new party slot is open ({slots} total)."),
            TickEvent::LeveledUp { hero, level, cost } => {
                format!("{hero} reached level {level} for {cost} gold.")
            }
        }
    }
}

/// Result of processing a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Events produced during this tick, in chronological order.
    pub events: Vec<TickEvent>,
}

impl TickResult {
    fn combat(&mut self, events: Vec<CombatEvent>) {
        self.events.extend(events.into_iter().map(TickEvent::Combat));
    }

    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TickEvent::Kill { .. }))
            .count()
    }

    pub fn skill_ups(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TickEvent::Combat(CombatEvent::SkillUp { .. })))
            .count()
    }

    pub fn wiped(&self) -> bool {
        self.events.iter().any(|e| matches!(e, TickEvent::PartyWipe { .. }))
    }
}

fn spawn_events(spawns: Vec<Spawn>, result: &mut TickResult) {
    for spawn in spawns {
        result.events.push(TickEvent::EnemySpawned {
            name: spawn.name,
            level: spawn.level,
            named: spawn.named,
            add: spawn.add,
        });
    }
}

fn respawn(world: &mut World, content: &Content, rng: &mut impl Rng, result: &mut TickResult) {
    match world.spawn_encounter(content, rng) {
        Ok(spawns) => spawn_events(spawns, result),
        Err(err) => tracing::warn!(%err, "could not spawn an encounter"),
    }
}

/// Processes one tick.
///
/// For every living actor, in party-then-enemy order: cooldowns and regen,
/// cast progress, action choice, auto-attacks, then periodic damage and
/// effect expiry. Deaths are settled last: kills pay out and may clear the
/// encounter, and a dead party pays the wipe penalty. A fresh encounter is
/// spawned whenever the enemy side is empty.
///
/// `rng` is any [`Rng`]; pass a seeded `rand_chacha::ChaCha8Rng` for
/// reproducible runs.
pub fn advance_tick(world: &mut World, content: &Content, rng: &mut impl Rng) -> TickResult {
    let mut result = TickResult::default();

    if world.roster.enemies.is_empty() {
        respawn(world, content, rng, &mut result);
    }

    world.tick += 1;
    let now_ms = world.now_ms();
    let heroes_up: BTreeSet<ActorId> = world.roster.living(Side::Party).map(|a| a.id).collect();

    {
        let env = ActionEnv {
            content,
            config: &world.config,
            now_ms,
        };
        let roster = &mut world.roster;

        // ── 1. Cooldowns and regeneration ───────────────────────
        regenerate(roster, env.config.tick_seconds());

        // ── 2. Cast progress ────────────────────────────────────
        for id in roster.ids() {
            let events = advance_cast(&env, roster, id, rng);
            result.combat(events);
        }

        // ── 3. Actions ──────────────────────────────────────────
        for id in roster.ids() {
            let events = act(&env, roster, id, rng);
            result.combat(events);
        }

        // ── 4. Auto-attacks ─────────────────────────────────────
        for id in roster.ids() {
            let events = auto_attack(&env, roster, id, rng);
            result.combat(events);
        }

        // ── 5. Periodic damage and expiry ───────────────────────
        let events = tick_damage_over_time(&env, roster, rng);
        result.combat(events);
        for actor in roster.party.iter_mut().chain(roster.enemies.iter_mut()) {
            actor.effects.purge_expired(now_ms);
        }
    }

    // ── 6. Deaths, rewards and encounter turnover ───────────────
    for hero in world.roster.party.iter().filter(|h| !h.is_alive() && heroes_up.contains(&h.id)) {
        result.combat(vec![CombatEvent::Died {
            name: hero.name.clone(),
            hero: true,
        }]);
    }
    settle_kills(world, content, rng, &mut result);

    if !world.roster.any_alive(Side::Party) {
        wipe(world, &mut result);
        respawn(world, content, rng, &mut result);
    } else if !world.roster.any_alive(Side::Enemies) {
        encounter_cleared(world, content, &mut result);
        respawn(world, content, rng, &mut result);
    }

    world.stats.skill_ups += result.skill_ups() as u64;
    result
}

fn regenerate(roster: &mut Roster, tick_seconds: f64) {
    for actor in roster.party.iter_mut().chain(roster.enemies.iter_mut()) {
        if !actor.is_alive() {
            continue;
        }
        actor.tick_cooldowns();
        if actor.caster_stat.is_some() {
            let per_tick = mana_regen_per_second(actor.caster_stat_value()) * tick_seconds + actor.mana_regen;
            if let Some(pool) = actor.mana.as_mut() {
                pool.restore(per_tick);
            }
        }
        let endurance = actor.endurance_regen;
        if let Some(pool) = actor.endurance.as_mut() {
            pool.restore(endurance);
        }
    }
}

fn advance_cast(env: &ActionEnv<'_>, roster: &mut Roster, id: ActorId, rng: &mut impl Rng) -> Vec<CombatEvent> {
    let Some(actor) = roster.get(id) else {
        return Vec::new();
    };
    if !actor.is_alive() {
        return Vec::new();
    }
    let Some(cast) = actor.casting.as_ref() else {
        return Vec::new();
    };
    let side = actor.side();
    let target_level = cast
        .target
        .and_then(|t| roster.get(t))
        .filter(|t| t.side() != side)
        .map(|t| t.level);

    let Some(actor) = roster.get_mut(id) else {
        return Vec::new();
    };
    let name = actor.name.clone();
    let action_name = |action_id: &str| {
        env.content
            .action(action_id)
            .map_or_else(|_| action_id.to_string(), |def| def.name.clone())
    };

    match tick_cast(actor, env.now_ms, target_level, env.config.skill_up_rate_mult, rng) {
        CastTick::Idle | CastTick::Casting { .. } => Vec::new(),
        CastTick::Interrupted(cast) => vec![CombatEvent::CastInterrupted {
            actor: name,
            action: action_name(&cast.action_id),
        }],
        CastTick::Completed { cast, quality, skill_ups } => {
            let mut events: Vec<CombatEvent> = skill_ups
                .into_iter()
                .map(|up| CombatEvent::SkillUp {
                    actor: name.clone(),
                    skill: up.skill.to_string(),
                    value: up.value,
                })
                .collect();
            let def = match env.content.action(&cast.action_id) {
                Ok(def) => def,
                Err(err) => {
                    tracing::warn!(%err, "completed cast has no definition");
                    return events;
                }
            };
            let target_alive = cast
                .target
                .map_or(true, |t| roster.get(t).map_or(false, |a| a.is_alive()));
            if !target_alive {
                events.push(CombatEvent::CastFizzled {
                    actor: name,
                    action: def.name.clone(),
                });
                return events;
            }
            events.extend(resolve_action(env, roster, id, def, cast.target, quality, rng));
            events
        }
    }
}

/// Pays out every dead enemy and removes it from the encounter.
fn settle_kills(world: &mut World, content: &Content, rng: &mut impl Rng, result: &mut TickResult) {
    let (dead, living): (Vec<_>, Vec<_>) = std::mem::take(&mut world.roster.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    world.roster.enemies = living;
    if dead.is_empty() {
        return;
    }
    let zone = match world.zone(content) {
        Ok(zone) => zone,
        Err(err) => {
            tracing::warn!(%err, "kills outside a known zone earn nothing");
            return;
        }
    };
    let zone_number = zone.number as u64;

    for enemy in dead {
        let ActorKind::Enemy { mob_id, named } = &enemy.kind else {
            continue;
        };
        let level = enemy.level as u64;
        let mob = content.mob(mob_id);
        if let Err(err) = &mob {
            tracing::warn!(%err, "killed enemy has no definition");
        }
        let xp = mob
            .as_ref()
            .ok()
            .and_then(|m| m.xp)
            .unwrap_or(XP_BASE + zone_number * XP_PER_ZONE + level * XP_PER_LEVEL);
        let gold = GOLD_BASE + zone_number * GOLD_PER_ZONE + level * GOLD_PER_LEVEL;

        world.gold += gold;
        world.total_xp += xp;
        world.stats.kills += 1;
        if *named {
            world.stats.named_kills += 1;
        }
        result.combat(vec![CombatEvent::Died {
            name: enemy.name.clone(),
            hero: false,
        }]);
        result.events.push(TickEvent::Kill {
            enemy: enemy.name.clone(),
            named: *named,
            xp,
            gold,
        });

        if let Ok(mob) = mob {
            for drop in roll_loot(content, &mob.loot, rng) {
                let Ok(item) = content.item(&drop.item) else {
                    continue;
                };
                world.inventory.add(item, drop.quantity);
                result.events.push(TickEvent::Loot {
                    item: item.name.clone(),
                    quantity: drop.quantity,
                });
            }
        }

        world.named.on_mob_killed(&zone.id, *named);
        world.progress.record_kill();
        for sub in roll_discoveries(zone, world.progress.discovery_mut(zone.number), rng) {
            tracing::info!(zone = %zone.id, sub_area = %sub.id, "sub-area discovered");
            result.events.push(TickEvent::SubAreaDiscovered {
                zone: zone.name.clone(),
                sub_area: sub.name.clone(),
            });
        }
    }
}

/// Soft penalty: gold loss, local kill progress reset, partial health.
fn wipe(world: &mut World, result: &mut TickResult) {
    let gold_lost = (world.gold as f64 * world.config.wipe_gold_loss).floor() as u64;
    world.gold -= gold_lost.min(world.gold);
    world.progress.reset_zone_kills();
    world.stats.wipes += 1;
    let restore = world.config.wipe_restore_fraction;
    for hero in &mut world.roster.party {
        hero.health.current = (hero.health.max * restore).max(1.0).min(hero.health.max);
        hero.effects.clear();
        hero.casting = None;
        hero.swing_cooldown = 0;
    }
    world.roster.enemies.clear();
    tracing::info!(gold_lost, zone = world.progress.zone, "party wiped");
    result.events.push(TickEvent::PartyWipe { gold_lost });
}

/// Revives downed heroes, then applies the auto-travel, slot and
/// auto-level policies.
fn encounter_cleared(world: &mut World, content: &Content, result: &mut TickResult) {
    let revive = world.config.revive_fraction;
    for hero in world.roster.party.iter_mut().filter(|h| !h.is_alive()) {
        hero.health.current = (hero.health.max * revive).max(1.0).min(hero.health.max);
        hero.effects.clear();
        hero.casting = None;
        result.events.push(TickEvent::Revived { hero: hero.name.clone() });
    }

    if world.config.auto_travel {
        let ready = world
            .zone(content)
            .map_or(false, |zone| world.progress.can_travel(zone));
        if ready && content.zone(world.progress.zone + 1).is_ok() {
            match world.progress.travel(content) {
                Ok(zone) => {
                    let name = content.zone(zone).map_or_else(|_| zone.to_string(), |z| z.name.clone());
                    result.events.push(TickEvent::ZoneTravel { zone, name });
                }
                Err(err) => tracing::debug!(%err, "travel refused"),
            }
        }
    }
    if let Some(slots) = world.progress.check_slot_unlocks() {
        result.events.push(TickEvent::SlotUnlocked { slots });
    }

    if world.config.auto_level {
        while let Some(hero) = world.next_auto_level() {
            let cost = match world.level_up_price(hero) {
                Ok(cost) => cost,
                Err(_) => break,
            };
            match world.level_up(content, hero) {
                Ok(level) => {
                    let name = world.roster.get(hero).map(|h| h.name.clone()).unwrap_or_default();
                    result.events.push(TickEvent::LeveledUp { hero: name, level, cost });
                }
                Err(err) => {
                    tracing::warn!(%err, "auto level failed");
                    break;
                }
            }
        }
    }
}
