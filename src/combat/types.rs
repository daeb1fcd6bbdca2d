//! Combat participants and the roster that owns them.

use super::casting::CastingState;
use super::effects::{EffectKind, EffectStore};
use super::math::CombatProfile;
use super::resist::{ResistProfile, Resistant};
use crate::core::error::ResourceKind;
use crate::skills::magic::MagicSkills;
use crate::skills::weapon::{WeaponSkills, WeaponType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ActorId = u32;

/// Base attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub strength: u32,
    pub constitution: u32,
    pub dexterity: u32,
    pub agility: u32,
    pub armor: u32,
    pub wisdom: u32,
    pub intelligence: u32,
    pub charisma: u32,
}

/// Signed attribute adjustments from races and equipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatMods {
    pub strength: i32,
    pub constitution: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub armor: i32,
    pub wisdom: i32,
    pub intelligence: i32,
    pub charisma: i32,
}

fn apply_mod(base: u32, delta: i32) -> u32 {
    (base as i64 + delta as i64).max(0) as u32
}

impl Stats {
    pub fn with_mods(self, mods: &StatMods) -> Stats {
        Stats {
            strength: apply_mod(self.strength, mods.strength),
            constitution: apply_mod(self.constitution, mods.constitution),
            dexterity: apply_mod(self.dexterity, mods.dexterity),
            agility: apply_mod(self.agility, mods.agility),
            armor: apply_mod(self.armor, mods.armor),
            wisdom: apply_mod(self.wisdom, mods.wisdom),
            intelligence: apply_mod(self.intelligence, mods.intelligence),
            charisma: apply_mod(self.charisma, mods.charisma),
        }
    }
}

impl std::ops::AddAssign for StatMods {
    fn add_assign(&mut self, other: StatMods) {
        self.strength += other.strength;
        self.constitution += other.constitution;
        self.dexterity += other.dexterity;
        self.agility += other.agility;
        self.armor += other.armor;
        self.wisdom += other.wisdom;
        self.intelligence += other.intelligence;
        self.charisma += other.charisma;
    }
}

/// Which attribute feeds a caster's mana pool and regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasterStat {
    Intelligence,
    Wisdom,
}

impl CasterStat {
    pub fn value(self, stats: &Stats) -> u32 {
        match self {
            CasterStat::Intelligence => stats.intelligence,
            CasterStat::Wisdom => stats.wisdom,
        }
    }
}

/// A bounded resource. `current` always stays in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub current: f64,
    pub max: f64,
}

impl Pool {
    pub fn full(max: f64) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.current >= amount
    }

    /// Removes up to `amount` and returns what was actually removed.
    pub fn drain(&mut self, amount: f64) -> f64 {
        let taken = amount.max(0.0).min(self.current);
        self.current -= taken;
        taken
    }

    /// Adds up to `amount` and returns what was actually added.
    pub fn restore(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    /// Changes the maximum, keeping the same filled fraction.
    pub fn rescale(&mut self, max: f64) {
        let fraction = if self.max > 0.0 { self.fraction() } else { 1.0 };
        self.max = max.max(0.0);
        self.current = (self.max * fraction).clamp(0.0, self.max);
    }

    /// Pulls `current` back into range. Returns true when it changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.current;
        if !self.max.is_finite() || self.max < 0.0 {
            self.max = 0.0;
        }
        if !self.current.is_finite() {
            self.current = self.max;
        }
        self.current = self.current.clamp(0.0, self.max);
        before != self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    Enemies,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Party => Side::Enemies,
            Side::Enemies => Side::Party,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActorKind {
    Hero {
        class: String,
        race: String,
        #[serde(default)]
        equipment: Vec<String>,
    },
    Enemy {
        mob_id: String,
        #[serde(default)]
        named: bool,
    },
}

/// Weapon fields that drive auto-attacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponType,
    pub damage: f64,
    /// Delay in tenths of a second.
    pub delay: f64,
}

/// A hero or an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub level: u32,
    pub kind: ActorKind,

    pub health: Pool,
    #[serde(default)]
    pub mana: Option<Pool>,
    #[serde(default)]
    pub endurance: Option<Pool>,
    #[serde(default)]
    pub caster_stat: Option<CasterStat>,
    /// Flat mana regained each tick on top of the stat-driven rate.
    #[serde(default)]
    pub mana_regen: f64,
    #[serde(default)]
    pub endurance_regen: f64,

    pub stats: Stats,
    pub weapon: Weapon,

    /// Usable action ids in priority order.
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub cooldowns: BTreeMap<String, u32>,
    #[serde(default)]
    pub swing_cooldown: u32,

    #[serde(default)]
    pub effects: EffectStore,
    #[serde(default)]
    pub casting: Option<CastingState>,

    #[serde(default)]
    pub weapon_skills: WeaponSkills,
    #[serde(default)]
    pub magic_skills: MagicSkills,
    #[serde(default)]
    pub resists: ResistProfile,

    /// Enemy-only: accumulated threat per hero.
    #[serde(default)]
    pub threat: BTreeMap<ActorId, f64>,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_hero(&self) -> bool {
        matches!(self.kind, ActorKind::Hero { .. })
    }

    pub fn side(&self) -> Side {
        if self.is_hero() {
            Side::Party
        } else {
            Side::Enemies
        }
    }

    pub fn class_key(&self) -> Option<&str> {
        match &self.kind {
            ActorKind::Hero { class, .. } => Some(class),
            ActorKind::Enemy { .. } => None,
        }
    }

    pub fn is_casting(&self) -> bool {
        self.casting.is_some()
    }

    /// Stats with live armor buffs and shreds applied.
    pub fn effective_stats(&self, now_ms: u64) -> Stats {
        let mut stats = self.stats;
        let armor = stats.armor as f64 + self.effects.total(EffectKind::ArmorBonus, now_ms)
            - self.effects.total(EffectKind::ArmorShred, now_ms);
        stats.armor = armor.max(0.0) as u32;
        let dex = stats.dexterity as f64 + self.effects.total(EffectKind::AccuracyBonus, now_ms);
        stats.dexterity = dex.max(0.0) as u32;
        stats
    }

    pub fn profile(&self, now_ms: u64) -> CombatProfile {
        let bonus = 1.0 + self.effects.total(EffectKind::DamageBonus, now_ms);
        CombatProfile {
            level: self.level,
            stats: self.effective_stats(now_ms),
            base_damage: self.weapon.damage * bonus.max(0.0),
        }
    }

    pub fn haste(&self, now_ms: u64) -> f64 {
        self.effects.total(EffectKind::Haste, now_ms)
    }

    pub fn caster_stat_value(&self) -> u32 {
        self.caster_stat.map_or(0, |stat| stat.value(&self.stats))
    }

    pub fn pool(&self, resource: ResourceKind) -> Option<&Pool> {
        match resource {
            ResourceKind::Mana => self.mana.as_ref(),
            ResourceKind::Endurance => self.endurance.as_ref(),
        }
    }

    pub fn available(&self, resource: ResourceKind) -> f64 {
        self.pool(resource).map_or(0.0, |p| p.current)
    }

    pub fn cooldown(&self, action_id: &str) -> u32 {
        self.cooldowns.get(action_id).copied().unwrap_or(0)
    }

    /// Decrements every action cooldown and the swing timer, floored at 0.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
        self.swing_cooldown = self.swing_cooldown.saturating_sub(1);
    }

    pub fn add_threat(&mut self, hero: ActorId, amount: f64) {
        if amount > 0.0 {
            *self.threat.entry(hero).or_insert(0.0) += amount;
        }
    }

    pub fn top_threat(&self) -> f64 {
        self.threat.values().copied().fold(0.0, f64::max)
    }
}

impl Resistant for Actor {
    fn level(&self) -> u32 {
        self.level
    }

    fn resist_profile(&self) -> &ResistProfile {
        &self.resists
    }
}

/// Both sides of the current fight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub party: Vec<Actor>,
    pub enemies: Vec<Actor>,
}

impl Roster {
    pub fn side(&self, side: Side) -> &[Actor] {
        match side {
            Side::Party => &self.party,
            Side::Enemies => &self.enemies,
        }
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.party.iter().chain(self.enemies.iter()).find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.party
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|a| a.id == id)
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.party.iter().chain(self.enemies.iter()).map(|a| a.id).collect()
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Actor> {
        self.side(side).iter().filter(|a| a.is_alive())
    }

    pub fn any_alive(&self, side: Side) -> bool {
        self.living(side).next().is_some()
    }

    /// Who an actor on `side` swings at: enemies pick the living hero with
    /// the most threat (party order breaks ties); heroes pick the first
    /// living enemy.
    pub fn primary_target(&self, attacker: &Actor) -> Option<ActorId> {
        match attacker.side() {
            Side::Party => self.living(Side::Enemies).next().map(|a| a.id),
            Side::Enemies => {
                let mut best: Option<(ActorId, f64)> = None;
                for hero in self.living(Side::Party) {
                    let threat = attacker.threat.get(&hero.id).copied().unwrap_or(0.0);
                    if best.map_or(true, |(_, t)| threat > t) {
                        best = Some((hero.id, threat));
                    }
                }
                best.map(|(id, _)| id)
            }
        }
    }

    /// First living opponent other than the primary target.
    pub fn secondary_target(&self, attacker: &Actor) -> Option<ActorId> {
        let primary = self.primary_target(attacker)?;
        self.living(attacker.side().opponent())
            .map(|a| a.id)
            .find(|&id| id != primary)
    }

    /// Living ally (self included) with the lowest health fraction.
    pub fn most_injured_ally(&self, side: Side) -> Option<&Actor> {
        self.living(side).min_by(|a, b| {
            a.health
                .fraction()
                .partial_cmp(&b.health.fraction())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn actor(id: ActorId, name: &str, kind: ActorKind) -> Actor {
        Actor {
            id,
            name: name.to_string(),
            level: 5,
            kind,
            health: Pool::full(100.0),
            mana: Some(Pool::full(100.0)),
            endurance: Some(Pool::full(100.0)),
            caster_stat: Some(CasterStat::Intelligence),
            mana_regen: 0.0,
            endurance_regen: 0.0,
            stats: Stats::default(),
            weapon: Weapon {
                kind: WeaponType::HandToHand,
                damage: 10.0,
                delay: 30.0,
            },
            actions: Vec::new(),
            cooldowns: BTreeMap::new(),
            swing_cooldown: 0,
            effects: EffectStore::default(),
            casting: None,
            weapon_skills: WeaponSkills::default(),
            magic_skills: MagicSkills::default(),
            resists: ResistProfile::default(),
            threat: BTreeMap::new(),
        }
    }

    pub fn hero(id: ActorId, class: &str) -> Actor {
        actor(
            id,
            class,
            ActorKind::Hero {
                class: class.to_string(),
                race: "human".to_string(),
                equipment: Vec::new(),
            },
        )
    }

    pub fn enemy(id: ActorId, mob_id: &str) -> Actor {
        let mut a = actor(
            id,
            mob_id,
            ActorKind::Enemy {
                mob_id: mob_id.to_string(),
                named: false,
            },
        );
        a.mana = None;
        a.endurance = None;
        a.caster_stat = None;
        a
    }
}
