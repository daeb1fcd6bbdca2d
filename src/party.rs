//! Hero and enemy construction from content, plus level-up pricing.

use crate::combat::effects::EffectStore;
use crate::combat::math::{max_hp, max_mana};
use crate::combat::resist::ResistProfile;
use crate::combat::types::{Actor, ActorId, ActorKind, Pool, Stats, Weapon};
use crate::content::{normalize_race_key, Content, MobDef};
use crate::core::constants::*;
use crate::core::error::CombatError;
use crate::items::equipment_bonus;
use crate::skills::magic::MagicSkills;
use crate::skills::weapon::{ensure_weapon_skills, WeaponSkills, WeaponType};
use std::collections::BTreeMap;

/// `HERO_LEVEL_GROWTH^(level - 1)`.
pub fn level_growth(level: u32) -> f64 {
    HERO_LEVEL_GROWTH.powi(level.saturating_sub(1) as i32)
}

/// Gold to raise a hero from `level` while the party is in `zone`.
pub fn level_up_cost(level: u32, zone: u32) -> u64 {
    (LEVEL_UP_COST_BASE * level as f64 * (1.0 + zone as f64 * LEVEL_UP_COST_ZONE_SLOPE)).floor()
        as u64
}

/// A level 1 hero of `class_key`. The race falls back to human when
/// unknown.
pub fn create_hero(
    content: &Content,
    id: ActorId,
    class_key: &str,
    race_key: &str,
) -> Result<Actor, CombatError> {
    let class = content.class(class_key)?;
    let race = content.race(race_key)?;
    let mut hero = Actor {
        id,
        name: format!("{} {}", race.name, class.name),
        level: 1,
        kind: ActorKind::Hero {
            class: class.key.clone(),
            race: race.key.clone(),
            equipment: Vec::new(),
        },
        health: Pool::full(0.0),
        mana: None,
        endurance: None,
        caster_stat: class.caster_stat,
        mana_regen: class.mana_regen,
        endurance_regen: class.endurance_regen,
        stats: Stats::default(),
        weapon: Weapon {
            kind: class.weapon,
            damage: class.weapon_damage,
            delay: class.weapon_delay,
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
    };
    refresh_hero(&mut hero, content)?;
    if let Some(pool) = hero.mana.as_mut() {
        pool.current = pool.max;
    }
    if let Some(pool) = hero.endurance.as_mut() {
        pool.current = pool.max;
    }
    hero.health.current = hero.health.max;
    Ok(hero)
}

/// Recomputes everything a hero derives from class, race, level and
/// equipment. Pools keep their filled fraction, skills are extended with
/// new unlocks and sanitized, and racial resists are re-applied without
/// stacking.
pub fn refresh_hero(hero: &mut Actor, content: &Content) -> Result<(), CombatError> {
    let ActorKind::Hero { class, race, equipment } = &mut hero.kind else {
        return Err(CombatError::InvalidState(format!("{} is not a hero", hero.name)));
    };
    *race = normalize_race_key(race);
    let class = content.class(class)?;
    let race = content.race(race)?;
    let gear = equipment_bonus(content, equipment);

    let growth = level_growth(hero.level);
    let mut mods = race.stat_mods;
    mods += gear.stats;
    hero.stats = class.stats.with_mods(&mods);

    hero.health.rescale(max_hp(class.base_hp * growth, hero.stats.constitution));
    hero.caster_stat = class.caster_stat;
    hero.mana = match class.caster_stat {
        Some(stat) if class.base_mana > 0.0 => {
            let max = max_mana(class.base_mana, stat.value(&hero.stats));
            let mut pool = hero.mana.unwrap_or(Pool::full(max));
            pool.rescale(max);
            Some(pool)
        }
        _ => None,
    };
    hero.endurance = if class.base_endurance > 0.0 {
        let mut pool = hero.endurance.unwrap_or(Pool::full(class.base_endurance));
        pool.rescale(class.base_endurance);
        Some(pool)
    } else {
        None
    };
    hero.mana_regen = class.mana_regen;
    hero.endurance_regen = class.endurance_regen;

    hero.weapon = Weapon {
        kind: class.weapon,
        damage: class.weapon_damage * growth + gear.damage,
        delay: class.weapon_delay,
    };
    hero.actions = class.actions_at(hero.level);

    ensure_weapon_skills(&mut hero.weapon_skills, &class.key, hero.level);
    hero.magic_skills.ensure(&class.key, hero.level);
    hero.resists.sanitize();
    hero.resists.apply_racial(&race.resist_mods);
    Ok(())
}

/// Raises a hero one level and refreshes derived values. The health and
/// mana gained by the new maximums are granted immediately.
pub fn apply_level_up(hero: &mut Actor, content: &Content) -> Result<(), CombatError> {
    let before_hp = hero.health.max;
    hero.level += 1;
    refresh_hero(hero, content)?;
    let gained = (hero.health.max - before_hp).max(0.0);
    if hero.is_alive() {
        hero.health.restore(gained);
    }
    tracing::debug!(hero = %hero.name, level = hero.level, "level up");
    Ok(())
}

/// An enemy of `mob` at `level`.
pub fn create_enemy(mob: &MobDef, id: ActorId, level: u32) -> Actor {
    let level = level.max(1);
    let mut stats = mob.stats;
    stats.dexterity += level * ENEMY_STAT_PER_LEVEL;
    stats.agility += level * ENEMY_STAT_PER_LEVEL;

    let mut resists = ResistProfile::default();
    resists.resists = mob.resists;

    Actor {
        id,
        name: mob.name.clone(),
        level,
        kind: ActorKind::Enemy {
            mob_id: mob.id.clone(),
            named: mob.named,
        },
        health: Pool::full(mob.base_hp + level as f64 * ENEMY_HP_PER_LEVEL),
        mana: (mob.base_mana > 0.0).then(|| Pool::full(mob.base_mana)),
        endurance: None,
        caster_stat: None,
        mana_regen: 0.0,
        endurance_regen: 0.0,
        stats,
        weapon: Weapon {
            kind: WeaponType::HandToHand,
            damage: mob.base_damage + level as f64 * ENEMY_DAMAGE_PER_LEVEL,
            delay: mob.delay,
        },
        actions: mob.actions.clone(),
        cooldowns: BTreeMap::new(),
        swing_cooldown: 0,
        effects: EffectStore::default(),
        casting: None,
        weapon_skills: WeaponSkills::default(),
        magic_skills: MagicSkills::default(),
        resists,
        threat: BTreeMap::new(),
    }
}
