//! The simulation context: everything one tick reads and mutates.
//!
//! A [`World`] is owned by its caller and passed explicitly to
//! [`advance_tick`](super::tick::advance_tick). It serializes verbatim; call
//! [`World::restore`] after loading.

use super::config::EngineConfig;
use super::error::CombatError;
use crate::combat::casting::CastingState;
use crate::combat::effects::EffectKind;
use crate::combat::math::{roll_chance, roll_int};
use crate::combat::types::{Actor, ActorId, ActorKind, Pool, Roster, Side};
use crate::content::{Content, ZoneDef};
use crate::items::Inventory;
use crate::party::{apply_level_up, create_enemy, create_hero, level_up_cost, refresh_hero};
use crate::skills::magic::magic_skill_cap;
use crate::skills::weapon::weapon_skill_cap;
use crate::zones::{pick_enemy, NamedSpawnController, SpawnProfile, ZoneProgress};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals kept for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub kills: u64,
    pub named_kills: u64,
    pub named_spawns: u64,
    pub encounters: u64,
    pub wipes: u64,
    pub skill_ups: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub config: EngineConfig,
    /// Ticks processed so far. The simulation clock is `tick * tick_ms`.
    pub tick: u64,
    pub roster: Roster,
    pub progress: ZoneProgress,
    pub named: NamedSpawnController,
    pub gold: u64,
    pub total_xp: u64,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub stats: WorldStats,
    next_actor_id: ActorId,
}

/// An enemy that just joined the encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawn {
    pub id: ActorId,
    pub name: String,
    pub level: u32,
    pub named: bool,
    /// Joined through the zone's aggro chance rather than as the primary.
    pub add: bool,
}

/// Remaining time of one live effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSnapshot {
    pub name: String,
    pub kind: EffectKind,
    pub magnitude: f64,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastSnapshot {
    pub action_id: String,
    pub target: Option<ActorId>,
    pub remaining_ms: u64,
    pub interrupted: bool,
}

/// Read-only view of one actor for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub name: String,
    pub level: u32,
    pub side: Side,
    pub health: Pool,
    pub mana: Option<Pool>,
    pub endurance: Option<Pool>,
    pub effects: Vec<EffectSnapshot>,
    pub casting: Option<CastSnapshot>,
    pub cooldowns: BTreeMap<String, u32>,
}

impl World {
    /// A world in zone 1 with one level 1 hero per `(class, race)` pair.
    /// The starting party is not bound by slot unlocks.
    pub fn new(
        config: EngineConfig,
        content: &Content,
        party: &[(&str, &str)],
    ) -> Result<Self, CombatError> {
        if party.is_empty() {
            return Err(CombatError::InvalidState("a party needs at least one hero".into()));
        }
        let mut world = Self {
            config,
            tick: 0,
            roster: Roster::default(),
            progress: ZoneProgress::default(),
            named: NamedSpawnController::default(),
            gold: 0,
            total_xp: 0,
            inventory: Inventory::default(),
            stats: WorldStats::default(),
            next_actor_id: 1,
        };
        for (class, race) in party {
            let id = world.allocate_id();
            world.roster.party.push(create_hero(content, id, class, race)?);
        }
        world.progress.slots_unlocked = world.progress.slots_unlocked.max(party.len());
        Ok(world)
    }

    pub fn now_ms(&self) -> u64 {
        self.tick * self.config.tick_ms
    }

    pub fn zone<'a>(&self, content: &'a Content) -> Result<&'a ZoneDef, CombatError> {
        content.zone(self.progress.zone)
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = self.next_actor_id;
        self.next_actor_id += 1;
        id
    }

    /// Hires a new level 1 hero into a free slot.
    pub fn recruit(&mut self, content: &Content, class: &str, race: &str) -> Result<ActorId, CombatError> {
        if self.roster.party.len() >= self.progress.slots_unlocked {
            return Err(CombatError::InvalidState(format!(
                "all {} party slots are filled",
                self.progress.slots_unlocked
            )));
        }
        let cost = content.class(class)?.cost;
        if self.gold < cost {
            return Err(CombatError::InvalidState(format!(
                "recruiting a {class} costs {cost} gold, have {}",
                self.gold
            )));
        }
        let id = self.allocate_id();
        let hero = create_hero(content, id, class, race)?;
        tracing::info!(hero = %hero.name, cost, "recruited");
        self.gold -= cost;
        self.roster.party.push(hero);
        Ok(id)
    }

    /// Gold price of the next level for `hero`.
    pub fn level_up_price(&self, hero: ActorId) -> Result<u64, CombatError> {
        let actor = self
            .roster
            .party
            .iter()
            .find(|a| a.id == hero)
            .ok_or_else(|| CombatError::InvalidState(format!("no hero with id {hero}")))?;
        Ok(level_up_cost(actor.level, self.progress.zone))
    }

    /// Buys one level for `hero`. Returns the new level.
    pub fn level_up(&mut self, content: &Content, hero: ActorId) -> Result<u32, CombatError> {
        let cost = self.level_up_price(hero)?;
        if self.gold < cost {
            return Err(CombatError::InvalidState(format!(
                "level up costs {cost} gold, have {}",
                self.gold
            )));
        }
        let actor = self
            .roster
            .party
            .iter_mut()
            .find(|a| a.id == hero)
            .ok_or_else(|| CombatError::InvalidState(format!("no hero with id {hero}")))?;
        apply_level_up(actor, content)?;
        self.gold -= cost;
        Ok(actor.level)
    }

    /// Cheapest affordable level up, if any: the lowest-level living hero.
    pub fn next_auto_level(&self) -> Option<ActorId> {
        let hero = self
            .roster
            .living(Side::Party)
            .min_by_key(|a| (a.level, a.id))?;
        let cost = level_up_cost(hero.level, self.progress.zone);
        (self.gold >= cost).then_some(hero.id)
    }

    /// Fills the enemy side with a fresh encounter: one primary enemy picked
    /// with named smoothing, plus one non-named add on the zone's aggro
    /// roll.
    pub fn spawn_encounter(&mut self, content: &Content, rng: &mut impl Rng) -> Result<Vec<Spawn>, CombatError> {
        let zone = content.zone(self.progress.zone)?;
        let profile = SpawnProfile::for_zone(zone.dungeon);
        let discovery = self.progress.discovery(zone.number);
        let multiplier = self.named.multiplier(&zone.id, &profile);

        let primary = pick_enemy(content, zone, &discovery, multiplier, rng).ok_or_else(|| {
            CombatError::InvalidState(format!("{} has no spawnable enemies", zone.name))
        })?;
        let mut picks = vec![(primary, false)];
        if roll_chance(zone.aggro_chance, rng) {
            if let Some(add) = pick_enemy(content, zone, &discovery, 0.0, rng) {
                picks.push((add, true));
            }
        }

        self.roster.enemies.clear();
        self.stats.encounters += 1;
        let mut spawns = Vec::with_capacity(picks.len());
        for (mob, add) in picks {
            let level = roll_int(zone.level_min, zone.level_max, rng);
            let id = self.allocate_id();
            if mob.named {
                self.named.on_named_spawned(&zone.id, &profile);
                self.stats.named_spawns += 1;
            }
            tracing::debug!(mob = %mob.id, level, add, "enemy spawned");
            spawns.push(Spawn {
                id,
                name: mob.name.clone(),
                level,
                named: mob.named,
                add,
            });
            self.roster.enemies.push(create_enemy(mob, id, level));
        }
        Ok(spawns)
    }

    pub fn snapshot(&self) -> Vec<ActorSnapshot> {
        let now = self.now_ms();
        self.roster
            .party
            .iter()
            .chain(self.roster.enemies.iter())
            .map(|actor| snapshot_actor(actor, now))
            .collect()
    }

    /// Repairs a freshly loaded world: skill ledgers are sanitized against
    /// current caps, pools clamped, expired effects purged and racial
    /// resists re-applied without stacking. Returns the number of repaired
    /// values.
    pub fn restore(&mut self, content: &Content) -> Result<usize, CombatError> {
        let now = self.now_ms();
        let mut repaired = 0;
        for actor in self.roster.party.iter_mut().chain(self.roster.enemies.iter_mut()) {
            for pool in [Some(&mut actor.health), actor.mana.as_mut(), actor.endurance.as_mut()]
                .into_iter()
                .flatten()
            {
                repaired += usize::from(pool.sanitize());
            }
            actor.effects.purge_expired(now);
            repaired += actor.resists.sanitize();

            if let ActorKind::Hero { class, .. } = &actor.kind {
                let (class, level) = (class.clone(), actor.level);
                let weapon_cap = weapon_skill_cap(&class, level);
                repaired += actor.weapon_skills.sanitize(|_| weapon_cap);
                repaired += actor
                    .magic_skills
                    .ledger
                    .sanitize(|skill| magic_skill_cap(&class, level, *skill));
                refresh_hero(actor, content)?;
            }
        }
        let highest = self.roster.ids().into_iter().max().unwrap_or(0);
        self.next_actor_id = self.next_actor_id.max(highest + 1);
        if repaired > 0 {
            tracing::debug!(repaired, "sanitized loaded world");
        }
        Ok(repaired)
    }
}

fn snapshot_actor(actor: &Actor, now: u64) -> ActorSnapshot {
    ActorSnapshot {
        id: actor.id,
        name: actor.name.clone(),
        level: actor.level,
        side: actor.side(),
        health: actor.health,
        mana: actor.mana,
        endurance: actor.endurance,
        effects: actor
            .effects
            .active(now)
            .map(|(name, e)| EffectSnapshot {
                name: name.to_string(),
                kind: e.kind,
                magnitude: e.magnitude,
                remaining_ms: e.expires_at_ms.saturating_sub(now),
            })
            .collect(),
        casting: actor.casting.as_ref().map(|cast: &CastingState| CastSnapshot {
            action_id: cast.action_id.clone(),
            target: cast.target,
            remaining_ms: cast.ends_at_ms.saturating_sub(now),
            interrupted: cast.interrupted,
        }),
        cooldowns: actor.cooldowns.clone(),
    }
}
