//! Built-in content set: five classes, twelve races, six zones.
//!
//! Hosts can replace all of it with a TOML file (see [`super::Content::load_toml`]).

use super::defs::*;
use crate::combat::resist::{ResistMeta, ResistType, ResistValues};
use crate::combat::types::{CasterStat, StatMods, Stats};
use crate::skills::magic::Specialization;
use crate::skills::weapon::WeaponType;
use std::collections::BTreeMap;

fn players(classes: &[&str], mobs: bool) -> AllowedUsers {
    AllowedUsers {
        players: classes.iter().map(|c| c.to_string()).collect(),
        mobs,
    }
}

fn mana(amount: f64) -> ActionCost {
    ActionCost { mana: amount, endurance: 0.0 }
}

fn endurance(amount: f64) -> ActionCost {
    ActionCost { mana: 0.0, endurance: amount }
}

fn resist(resist_type: ResistType, difficulty: f64, partial: bool) -> Option<ResistMeta> {
    Some(ResistMeta {
        resist_type,
        difficulty,
        partial,
        min_chance: None,
        max_chance: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn action(
    id: &str,
    name: &str,
    kind: ActionKind,
    users: AllowedUsers,
    target: TargetMode,
    cooldown_ticks: u32,
    cost: ActionCost,
    cast_time_ticks: u32,
    specialization: Option<Specialization>,
    resist: Option<ResistMeta>,
    effect: ActionEffect,
) -> ActionDef {
    ActionDef {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        users,
        target,
        cooldown_ticks,
        cost,
        cast_time_ticks,
        specialization,
        resist,
        effect,
    }
}

pub fn actions() -> Vec<ActionDef> {
    use ActionKind::*;
    use TargetMode::*;

    vec![
        // Wizard
        action(
            "fireblast", "Fireblast", Spell, players(&["wizard"], true), Enemy, 3, mana(10.0), 1,
            Some(Specialization::Destruction), resist(ResistType::Elemental, 0.0, true),
            ActionEffect::Damage {
                min: 12.0,
                max: 20.0,
                level_bonus: Some(LevelBonus { interval_levels: 2, cap: 5.0 }),
            },
        ),
        action(
            "iceblast", "Iceblast", Spell, players(&["wizard"], true), Enemy, 4, mana(18.0), 2,
            Some(Specialization::Destruction), resist(ResistType::Elemental, 5.0, true),
            ActionEffect::Damage {
                min: 18.0,
                max: 30.0,
                level_bonus: Some(LevelBonus { interval_levels: 2, cap: 9.0 }),
            },
        ),
        action(
            "rain_of_fire", "Rain of Fire", Ability, players(&["wizard"], false), AoeEnemies, 8,
            mana(30.0), 2, Some(Specialization::Destruction), resist(ResistType::Elemental, 0.0, true),
            ActionEffect::AreaDamage {
                min: 10.0,
                max: 16.0,
                max_targets: 99,
                diminishing: true,
                uses_weapon_damage: false,
            },
        ),
        action(
            "arcane_shield", "Arcane Shield", Ability, players(&["wizard"], false), SelfOnly, 15,
            mana(25.0), 1, Some(Specialization::Enhancement), None,
            ActionEffect::Ward { amount: 50.0, duration_ticks: 10 },
        ),
        action(
            "gather_mana", "Gather Mana", Utility, players(&["wizard"], false), SelfOnly, 12,
            ActionCost::default(), 1, Some(Specialization::Utility), None,
            ActionEffect::RestoreMana { fraction: 0.25 },
        ),
        // Ranger
        action(
            "shot", "Shot", Ability, players(&["ranger"], false), Enemy, 1, endurance(1.0), 0,
            None, None,
            ActionEffect::Damage {
                min: 2.0,
                max: 2.0,
                level_bonus: Some(LevelBonus { interval_levels: 2, cap: 3.0 }),
            },
        ),
        action(
            "flame_lick", "Flame Lick", Spell, players(&["ranger"], true), Enemy, 6, mana(12.0), 1,
            Some(Specialization::Control), resist(ResistType::Elemental, 0.0, true),
            ActionEffect::DamageOverTime {
                base: 1.0,
                max: 3.0,
                levels_per_point: 3,
                duration_ticks: 6,
                armor_shred: 3.0,
            },
        ),
        action(
            "salve", "Salve", Ability, players(&["ranger"], false), Ally, 5, endurance(8.0), 0,
            None, None,
            ActionEffect::Heal { min: 5.0, max: 9.0 },
        ),
        action(
            "woodskin", "Woodskin", Ability, players(&["ranger"], false), Ally, 1, mana(10.0), 1,
            Some(Specialization::Enhancement), None,
            ActionEffect::Buff { stat: BuffStat::Armor, amount: 5.0, duration_ticks: 20 },
        ),
        action(
            "hawk_eye", "Hawk Eye", Ability, players(&["ranger"], false), SelfOnly, 1, mana(45.0), 1,
            Some(Specialization::Enhancement), None,
            ActionEffect::Buff { stat: BuffStat::Accuracy, amount: 15.0, duration_ticks: 20 },
        ),
        // Cleric
        action(
            "minor_heal", "Minor Heal", Ability, players(&["cleric"], false), Ally, 4, mana(10.0), 1,
            Some(Specialization::Restoration), None,
            ActionEffect::Heal { min: 10.0, max: 20.0 },
        ),
        action(
            "courage", "Courage", Ability, players(&["cleric"], false), Ally, 1, mana(12.0), 1,
            Some(Specialization::Enhancement), None,
            ActionEffect::Buff { stat: BuffStat::Armor, amount: 3.0, duration_ticks: 20 },
        ),
        action(
            "fear", "Fear", Spell, players(&["cleric", "enchanter"], true), Enemy, 7, mana(40.0), 1,
            Some(Specialization::Control), resist(ResistType::Magic, 0.0, false),
            ActionEffect::Fear {
                level_cap: 52,
                base_duration_ticks: 2,
                bonus_at_level: 9,
                min_duration_ticks: 1,
            },
        ),
        action(
            "divine_focus", "Divine Focus", Ability, players(&["cleric"], false), SelfOnly, 12,
            mana(25.0), 1, Some(Specialization::Enhancement), None,
            ActionEffect::Buff { stat: BuffStat::Mitigation, amount: 0.25, duration_ticks: 4 },
        ),
        action(
            "healing", "Healing", Ability, players(&["cleric"], false), Ally, 12, mana(65.0), 2,
            Some(Specialization::Restoration), None,
            ActionEffect::Heal { min: 95.0, max: 175.0 },
        ),
        // Enchanter
        action(
            "feedback", "Feedback", Ability, players(&["enchanter"], false), Enemy, 3, mana(7.0), 1,
            Some(Specialization::Utility), resist(ResistType::Magic, 0.0, true),
            ActionEffect::Damage { min: 3.0, max: 6.0, level_bonus: None },
        ),
        action(
            "mesmerize", "Mesmerize", Spell, players(&["enchanter"], true), SecondaryEnemy, 6,
            mana(20.0), 1, Some(Specialization::Control), resist(ResistType::Magic, 0.0, false),
            ActionEffect::Mesmerize { duration_ticks: 4 },
        ),
        action(
            "suffocate", "Suffocate", Ability, players(&["enchanter"], false), Enemy, 6, mana(15.0), 1,
            Some(Specialization::Control), resist(ResistType::Magic, 0.0, true),
            ActionEffect::DamageOverTime {
                base: 2.0,
                max: 4.0,
                levels_per_point: 4,
                duration_ticks: 5,
                armor_shred: 0.0,
            },
        ),
        action(
            "lesser_rune", "Lesser Rune", Ability, players(&["enchanter"], false), SelfOnly, 8,
            mana(25.0), 1, Some(Specialization::Enhancement), None,
            ActionEffect::Ward { amount: 30.0, duration_ticks: 20 },
        ),
        // Warrior
        action(
            "kick", "Kick", Ability, players(&["warrior"], false), Enemy, 4, endurance(5.0), 0,
            None, None,
            ActionEffect::Damage { min: 2.0, max: 7.0, level_bonus: None },
        ),
        action(
            "shield_bash", "Shield Bash", Ability, players(&["warrior"], false), Enemy, 8,
            endurance(12.0), 0, None, None,
            ActionEffect::Damage { min: 10.0, max: 14.0, level_bonus: None },
        ),
        action(
            "taunt", "Taunt", Ability, players(&["warrior"], false), Enemy, 10, endurance(1.0), 0,
            None, None, ActionEffect::Taunt,
        ),
        action(
            "fortify", "Fortify", Ability, players(&["warrior"], false), SelfOnly, 12,
            endurance(15.0), 0, None, None,
            ActionEffect::Buff { stat: BuffStat::Mitigation, amount: 0.2, duration_ticks: 4 },
        ),
        action(
            "cleave", "Cleave", Ability, players(&["warrior"], false), AoeEnemies, 5,
            endurance(25.0), 0, None, None,
            ActionEffect::AreaDamage {
                min: 0.0,
                max: 0.0,
                max_targets: 3,
                diminishing: false,
                uses_weapon_damage: true,
            },
        ),
    ]
}

fn learned(list: &[(&str, u32)]) -> Vec<LearnedAction> {
    list.iter()
        .map(|&(action, level)| LearnedAction { action: action.to_string(), level })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn stats(
    strength: u32,
    constitution: u32,
    dexterity: u32,
    agility: u32,
    armor: u32,
    wisdom: u32,
    intelligence: u32,
    charisma: u32,
) -> Stats {
    Stats {
        strength,
        constitution,
        dexterity,
        agility,
        armor,
        wisdom,
        intelligence,
        charisma,
    }
}

pub fn classes() -> Vec<ClassDef> {
    vec![
        ClassDef {
            key: "warrior".into(),
            name: "Warrior".into(),
            role: "Tank".into(),
            cost: 30,
            base_hp: 120.0,
            weapon: WeaponType::OneHandSlash,
            weapon_damage: 8.0,
            weapon_delay: 30.0,
            caster_stat: None,
            base_mana: 0.0,
            mana_regen: 0.0,
            base_endurance: 100.0,
            endurance_regen: 4.0,
            stats: stats(12, 12, 8, 8, 12, 4, 4, 6),
            actions: learned(&[
                ("taunt", 1),
                ("kick", 1),
                ("shield_bash", 3),
                ("fortify", 5),
                ("cleave", 8),
            ]),
        },
        ClassDef {
            key: "cleric".into(),
            name: "Cleric".into(),
            role: "Healer".into(),
            cost: 35,
            base_hp: 90.0,
            weapon: WeaponType::OneHandBlunt,
            weapon_damage: 5.0,
            weapon_delay: 36.0,
            caster_stat: Some(CasterStat::Wisdom),
            base_mana: 60.0,
            mana_regen: 1.0,
            base_endurance: 0.0,
            endurance_regen: 0.0,
            stats: stats(6, 8, 6, 6, 10, 14, 6, 8),
            actions: learned(&[
                ("healing", 10),
                ("minor_heal", 1),
                ("divine_focus", 4),
                ("fear", 6),
                ("courage", 2),
            ]),
        },
        ClassDef {
            key: "wizard".into(),
            name: "Wizard".into(),
            role: "Nuker".into(),
            cost: 40,
            base_hp: 70.0,
            weapon: WeaponType::OneHandPierce,
            weapon_damage: 4.0,
            weapon_delay: 28.0,
            caster_stat: Some(CasterStat::Intelligence),
            base_mana: 80.0,
            mana_regen: 1.0,
            base_endurance: 0.0,
            endurance_regen: 0.0,
            stats: stats(4, 6, 8, 8, 4, 6, 16, 6),
            actions: learned(&[
                ("arcane_shield", 4),
                ("rain_of_fire", 10),
                ("iceblast", 6),
                ("fireblast", 1),
                ("gather_mana", 2),
            ]),
        },
        ClassDef {
            key: "ranger".into(),
            name: "Ranger".into(),
            role: "DPS".into(),
            cost: 35,
            base_hp: 85.0,
            weapon: WeaponType::OneHandSlash,
            weapon_damage: 7.0,
            weapon_delay: 30.0,
            caster_stat: Some(CasterStat::Wisdom),
            base_mana: 40.0,
            mana_regen: 3.0,
            base_endurance: 80.0,
            endurance_regen: 3.0,
            stats: stats(9, 9, 12, 10, 8, 8, 6, 6),
            actions: learned(&[
                ("salve", 2),
                ("hawk_eye", 8),
                ("woodskin", 5),
                ("flame_lick", 3),
                ("shot", 1),
            ]),
        },
        ClassDef {
            key: "enchanter".into(),
            name: "Enchanter".into(),
            role: "Support".into(),
            cost: 38,
            base_hp: 75.0,
            weapon: WeaponType::OneHandPierce,
            weapon_damage: 4.0,
            weapon_delay: 30.0,
            caster_stat: Some(CasterStat::Intelligence),
            base_mana: 80.0,
            mana_regen: 1.0,
            base_endurance: 0.0,
            endurance_regen: 0.0,
            stats: stats(5, 6, 8, 8, 4, 6, 14, 12),
            actions: learned(&[
                ("mesmerize", 2),
                ("lesser_rune", 6),
                ("fear", 8),
                ("suffocate", 4),
                ("feedback", 1),
            ]),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn race(
    key: &str,
    name: &str,
    strength: i32,
    constitution: i32,
    agility: i32,
    dexterity: i32,
    wisdom: i32,
    intelligence: i32,
    charisma: i32,
    resist_mods: ResistValues,
) -> RaceDef {
    RaceDef {
        key: key.to_string(),
        name: name.to_string(),
        stat_mods: StatMods {
            strength,
            constitution,
            dexterity,
            agility,
            armor: 0,
            wisdom,
            intelligence,
            charisma,
        },
        resist_mods,
    }
}

fn resists(magic: f64, elemental: f64, contagion: f64, physical: f64) -> ResistValues {
    ResistValues { magic, elemental, contagion, physical }
}

pub fn races() -> Vec<RaceDef> {
    vec![
        race("human", "Human", 0, 0, 0, 0, 0, 0, 0, resists(1.0, 1.0, 1.0, 1.0)),
        race("noetian", "Noetian", -2, -1, -1, -1, 1, 3, -1, resists(5.0, 0.0, 0.0, 0.0)),
        race("barbarian", "Barbarian", 3, 2, 1, -1, -1, -2, -2, resists(0.0, 0.0, 5.0, 0.0)),
        race("halfling", "Halfling", -1, 0, 2, 2, 1, -1, -3, resists(0.0, 0.0, 5.0, 0.0)),
        race("dwarf", "Dwarf", 2, 2, -1, 2, 1, -2, -3, resists(5.0, 0.0, 5.0, 0.0)),
        race("gnome", "Gnome", -2, -1, 1, 1, -1, 2, -2, resists(5.0, 0.0, 0.0, 0.0)),
        race("half_elf", "Half-Elf", -1, -1, 2, 1, -2, 0, 0, resists(0.0, 0.0, 3.0, 0.0)),
        race("wood_elf", "Wood Elf", -1, -1, 2, 1, 1, 0, 0, ResistValues::default()),
        race("high_elf", "High Elf", -2, -1, 1, -1, 2, 2, 1, resists(3.0, 0.0, 0.0, 0.0)),
        race("dark_elf", "Dark Elf", -2, -1, 2, 0, 1, 2, -2, resists(5.0, 0.0, 0.0, 0.0)),
        race("ogre", "Ogre", 6, 5, -1, -1, -1, -2, -4, resists(3.0, 0.0, 0.0, 0.0)),
        race("troll", "Troll", 3, 3, 1, 0, -2, -2, -4, resists(0.0, 0.0, 10.0, 0.0)),
    ]
}

fn item(id: &str, name: &str, max_stack: u32, value: u64, equip: Option<EquipBonus>) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        max_stack,
        value,
        equip,
    }
}

fn gear(stats: StatMods, damage: f64) -> Option<EquipBonus> {
    Some(EquipBonus { stats, damage })
}

pub fn items() -> Vec<ItemDef> {
    vec![
        item("health_potion", "Health Potion", 99, 12, None),
        item("health_potion_small", "Small Health Potion", 99, 5, None),
        item("mana_potion", "Mana Potion", 99, 12, None),
        item("mana_potion_small", "Small Mana Potion", 99, 5, None),
        item("copper_ore", "Copper Ore", 50, 2, None),
        item("bone_chips", "Bone Chips", 20, 1, None),
        item(
            "iron_sword",
            "Iron Sword",
            1,
            40,
            gear(StatMods { strength: 2, ..StatMods::default() }, 3.0),
        ),
        item(
            "wooden_shield",
            "Wooden Shield",
            1,
            15,
            gear(StatMods { armor: 2, ..StatMods::default() }, 0.0),
        ),
        item("stick", "Stick", 1, 1, gear(StatMods::default(), 1.0)),
        item("rusty_dagger", "Rusty Dagger", 1, 6, gear(StatMods::default(), 2.0)),
        item(
            "enchanted_branch",
            "Enchanted Branch",
            1,
            60,
            gear(StatMods { intelligence: 1, ..StatMods::default() }, 3.0),
        ),
        item(
            "steel_mace",
            "Steel Mace",
            1,
            55,
            gear(StatMods { strength: 1, ..StatMods::default() }, 4.0),
        ),
        // Rolling Hills
        item("ridge_stone", "Ridge Stone", 20, 2, None),
        item("rusty_spear", "Rusty Spear", 1, 20, gear(StatMods::default(), 3.0)),
        item(
            "cloth_leggings",
            "Cloth Leggings",
            1,
            14,
            gear(StatMods { armor: 2, ..StatMods::default() }, 0.0),
        ),
        item(
            "stone_hurler_sling",
            "Stone Hurler's Sling",
            1,
            70,
            gear(StatMods { dexterity: 3, ..StatMods::default() }, 3.0),
        ),
        item(
            "ridgewatch_banner",
            "Ridgewatch Banner",
            1,
            65,
            gear(StatMods { charisma: 3, constitution: 1, ..StatMods::default() }, 0.0),
        ),
        item(
            "commander_insignia",
            "Commander's Insignia",
            1,
            60,
            gear(StatMods { strength: 2, wisdom: 1, ..StatMods::default() }, 0.0),
        ),
        item(
            "hill_captains_blade",
            "Hill Captain's Blade",
            1,
            140,
            gear(StatMods { strength: 3, dexterity: 2, ..StatMods::default() }, 6.0),
        ),
        item(
            "ridgewatch_vest",
            "Ridgewatch Vest",
            1,
            110,
            gear(StatMods { armor: 8, constitution: 2, ..StatMods::default() }, 0.0),
        ),
        item(
            "arvok_signet",
            "Arvok's Signet",
            1,
            120,
            gear(StatMods { strength: 2, agility: 2, ..StatMods::default() }, 0.0),
        ),
        item(
            "earthshaker_hammer",
            "Earthshaker Hammer",
            1,
            160,
            gear(StatMods { strength: 4, ..StatMods::default() }, 7.0),
        ),
        item(
            "earthshaker_girdle",
            "Earthshaker Girdle",
            1,
            120,
            gear(StatMods { armor: 6, constitution: 3, ..StatMods::default() }, 0.0),
        ),
        item(
            "stone_ward_amulet",
            "Stone Ward Amulet",
            1,
            130,
            gear(StatMods { armor: 4, wisdom: 3, ..StatMods::default() }, 0.0),
        ),
        // Cornfields
        item("rusty_sword", "Rusty Sword", 1, 22, gear(StatMods::default(), 4.0)),
        item(
            "cloth_wraps",
            "Cloth Wraps",
            1,
            12,
            gear(StatMods { armor: 1, agility: 1, ..StatMods::default() }, 0.0),
        ),
        item(
            "tattered_robe",
            "Tattered Robe",
            1,
            18,
            gear(StatMods { armor: 1, intelligence: 1, ..StatMods::default() }, 0.0),
        ),
        // Hallowbone Castle
        item(
            "bonekings_talisman",
            "Boneking's Talisman",
            1,
            220,
            gear(StatMods { intelligence: 4, wisdom: 4, ..StatMods::default() }, 0.0),
        ),
        item(
            "ritual_robes",
            "Ritual Robes",
            1,
            180,
            gear(StatMods { armor: 5, intelligence: 3, ..StatMods::default() }, 0.0),
        ),
    ]
}

fn loot(item: &str, chance: f64, min_qty: u32, max_qty: u32) -> LootEntry {
    LootEntry {
        item: item.to_string(),
        chance,
        min_qty,
        max_qty,
    }
}

fn mob(id: &str, name: &str, base_hp: f64, base_damage: f64) -> MobDef {
    MobDef {
        id: id.to_string(),
        name: name.to_string(),
        base_hp,
        base_damage,
        delay: 30.0,
        named: false,
        xp: None,
        stats: Stats::default(),
        resists: ResistValues::default(),
        actions: Vec::new(),
        base_mana: 0.0,
        loot: Vec::new(),
    }
}

pub fn mobs() -> Vec<MobDef> {
    let mut list = vec![
        // Zone 1
        MobDef {
            loot: vec![loot("bone_chips", 0.3, 1, 3), loot("stick", 0.05, 1, 1)],
            ..mob("skeleton", "Decaying Skeleton", 30.0, 3.0)
        },
        MobDef {
            loot: vec![loot("rusty_dagger", 0.04, 1, 1)],
            ..mob("gnoll_scout", "Gnoll Scout", 35.0, 4.0)
        },
        mob("young_orc", "Young Orc", 40.0, 4.0),
        MobDef {
            stats: Stats { agility: 10, ..Stats::default() },
            ..mob("rabid_wolf", "Rabid Wolf", 35.0, 5.0)
        },
        MobDef {
            resists: resists(10.0, 0.0, 0.0, 0.0),
            ..mob("phantom", "Phantom", 25.0, 6.0)
        },
        MobDef {
            named: true,
            xp: Some(150),
            stats: Stats { armor: 10, ..Stats::default() },
            resists: resists(10.0, 5.0, 10.0, 0.0),
            actions: vec!["fear".into()],
            base_mana: 80.0,
            loot: vec![loot("iron_sword", 0.35, 1, 1), loot("wooden_shield", 0.25, 1, 1)],
            ..mob("gravecaller_maldor", "Gravecaller Maldor", 90.0, 7.0)
        },
        // Zone 2
        mob("forest_ghoul", "Forest Ghoul", 40.0, 4.0),
        MobDef {
            actions: vec!["flame_lick".into()],
            base_mana: 40.0,
            ..mob("shadow_sprite", "Shadow Sprite", 35.0, 5.0)
        },
        MobDef {
            stats: Stats { armor: 15, ..Stats::default() },
            ..mob("cursed_treant", "Cursed Treant", 50.0, 3.0)
        },
        mob("werewolf", "Werewolf", 45.0, 6.0),
        MobDef {
            named: true,
            xp: Some(180),
            resists: resists(15.0, 15.0, 0.0, 0.0),
            loot: vec![loot("enchanted_branch", 0.4, 1, 1)],
            ..mob("wood_spirit", "Wood Spirit", 38.0, 7.0)
        },
        // Zone 3
        MobDef {
            stats: Stats { armor: 20, ..Stats::default() },
            ..mob("skeletal_knight", "Skeletal Knight", 55.0, 6.0)
        },
        MobDef {
            loot: vec![loot("copper_ore", 0.2, 1, 4)],
            ..mob("orc_centurion", "Orc Centurion", 60.0, 7.0)
        },
        mob("dark_wolf", "Dark Wolf", 50.0, 7.0),
        MobDef {
            actions: vec!["fireblast".into()],
            base_mana: 60.0,
            ..mob("bloodsaber_acolyte", "Bloodsaber Acolyte", 45.0, 8.0)
        },
        MobDef {
            actions: vec!["mesmerize".into()],
            base_mana: 60.0,
            resists: resists(20.0, 0.0, 0.0, 0.0),
            ..mob("castle_specter", "Castle Specter", 48.0, 9.0)
        },
        MobDef {
            named: true,
            xp: Some(260),
            stats: Stats { armor: 30, strength: 10, ..Stats::default() },
            resists: resists(10.0, 10.0, 10.0, 10.0),
            loot: vec![loot("steel_mace", 0.4, 1, 1)],
            ..mob("sir_rothgar", "Sir Rothgar the Hollow", 140.0, 10.0)
        },
        // Zone 4
        MobDef {
            loot: vec![loot("rusty_spear", 0.05, 1, 1), loot("cloth_leggings", 0.05, 1, 1)],
            ..mob("hill_skirmisher", "Hill Skirmisher", 62.0, 7.0)
        },
        MobDef {
            loot: vec![loot("ridge_stone", 0.12, 1, 2), loot("copper_ore", 0.2, 1, 4)],
            ..mob("ridge_bandit", "Ridge Bandit", 58.0, 8.0)
        },
        MobDef {
            stats: Stats { armor: 15, ..Stats::default() },
            loot: vec![loot("ridge_stone", 0.25, 1, 3)],
            ..mob("rock_scrabbler", "Rock Scrabbler", 52.0, 6.0)
        },
        MobDef {
            stats: Stats { dexterity: 15, ..Stats::default() },
            loot: vec![loot("stone_hurler_sling", 0.24, 1, 1)],
            ..mob("stone_hurler", "Stone Hurler", 70.0, 9.0)
        },
        MobDef {
            stats: Stats { armor: 20, ..Stats::default() },
            actions: vec!["fear".into()],
            base_mana: 80.0,
            loot: vec![loot("ridgewatch_banner", 0.19, 1, 1), loot("commander_insignia", 0.17, 1, 1)],
            ..mob("ridgewatch_commander", "Ridgewatch Commander", 80.0, 9.0)
        },
        MobDef {
            named: true,
            xp: Some(340),
            stats: Stats { armor: 30, strength: 12, ..Stats::default() },
            resists: resists(10.0, 10.0, 5.0, 5.0),
            loot: vec![
                loot("hill_captains_blade", 0.35, 1, 1),
                loot("ridgewatch_vest", 0.25, 1, 1),
                loot("arvok_signet", 0.28, 1, 1),
            ],
            ..mob("captain_arvok", "Captain Arvok", 170.0, 12.0)
        },
        MobDef {
            named: true,
            xp: Some(380),
            delay: 40.0,
            stats: Stats { armor: 40, strength: 15, ..Stats::default() },
            resists: resists(20.0, 5.0, 15.0, 10.0),
            loot: vec![
                loot("earthshaker_hammer", 0.18, 1, 1),
                loot("earthshaker_girdle", 0.16, 1, 1),
                loot("stone_ward_amulet", 0.14, 1, 1),
            ],
            ..mob("ancient_earthshaker", "Ancient Earthshaker", 200.0, 14.0)
        },
        // Zone 5
        MobDef {
            loot: vec![loot("rusty_sword", 0.06, 1, 1), loot("copper_ore", 0.18, 1, 5)],
            ..mob("cornfield_raider", "Cornfield Raider", 68.0, 9.0)
        },
        MobDef {
            stats: Stats { agility: 15, ..Stats::default() },
            loot: vec![loot("cloth_wraps", 0.08, 1, 1), loot("tattered_robe", 0.08, 1, 1)],
            ..mob("field_gnawer", "Field Gnawer", 60.0, 8.0)
        },
        // Zone 6
        MobDef {
            actions: vec!["fireblast".into()],
            base_mana: 90.0,
            resists: resists(10.0, 0.0, 10.0, 0.0),
            loot: vec![loot("enchanted_branch", 0.06, 1, 1), loot("mana_potion", 0.06, 1, 2)],
            ..mob("hallowbone_warpriest", "Hallowbone Warpriest", 75.0, 10.0)
        },
        MobDef {
            named: true,
            xp: Some(520),
            stats: Stats { armor: 45, strength: 15, ..Stats::default() },
            resists: resists(25.0, 20.0, 20.0, 15.0),
            actions: vec!["fear".into(), "iceblast".into()],
            base_mana: 150.0,
            loot: vec![loot("bonekings_talisman", 0.5, 1, 1), loot("ritual_robes", 0.3, 1, 1)],
            ..mob("bone_king", "The Bone King", 260.0, 15.0)
        },
    ];
    for mob in list.iter_mut().filter(|m| !m.named) {
        mob.loot.push(loot("health_potion_small", 0.05, 1, 1));
    }
    list
}

fn enemy(mob: &str, weight: f64) -> ZoneEnemy {
    ZoneEnemy { mob: mob.to_string(), weight }
}

fn sub_area(id: &str, name: &str, discovered: bool, discovery_chance: f64, mods: &[(&str, f64)]) -> SubAreaDef {
    SubAreaDef {
        id: id.to_string(),
        name: name.to_string(),
        discovered,
        discovery_chance,
        weight_modifiers: mods
            .iter()
            .map(|&(mob, m)| (mob.to_string(), m))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn zones() -> Vec<ZoneDef> {
    vec![
        ZoneDef {
            number: 1,
            id: "graveyard".into(),
            name: "Graveyard".into(),
            level_min: 1,
            level_max: 4,
            dungeon: false,
            aggro_chance: 0.01,
            kills_to_travel: 10,
            enemies: vec![
                enemy("skeleton", 1.0),
                enemy("gnoll_scout", 1.0),
                enemy("young_orc", 1.0),
                enemy("rabid_wolf", 1.0),
                enemy("gravecaller_maldor", 0.09),
            ],
            sub_areas: vec![
                sub_area(
                    "open_graves",
                    "Open Graves",
                    true,
                    0.0,
                    &[("young_orc", 1.2), ("rabid_wolf", 0.8)],
                ),
                sub_area(
                    "unknown_tomb",
                    "Unknown Tomb",
                    false,
                    0.05,
                    &[("skeleton", 2.0), ("gnoll_scout", 1.1), ("young_orc", 0.9), ("rabid_wolf", 0.8)],
                ),
            ],
        },
        ZoneDef {
            number: 2,
            id: "dark_forest".into(),
            name: "Dark Forest".into(),
            level_min: 2,
            level_max: 5,
            dungeon: false,
            aggro_chance: 0.05,
            kills_to_travel: 10,
            enemies: vec![
                enemy("forest_ghoul", 1.0),
                enemy("shadow_sprite", 1.0),
                enemy("cursed_treant", 1.0),
                enemy("werewolf", 1.0),
                enemy("wood_spirit", 0.0),
            ],
            sub_areas: vec![
                sub_area("open_world", "Open World", true, 0.0, &[]),
                sub_area(
                    "shadowed_glen",
                    "Shadowed Glen",
                    false,
                    0.04,
                    &[("shadow_sprite", 1.5), ("forest_ghoul", 0.9), ("cursed_treant", 1.1), ("wood_spirit", 0.12)],
                ),
                sub_area(
                    "blighted_thicket",
                    "Blighted Thicket",
                    false,
                    0.03,
                    &[("cursed_treant", 1.6), ("shadow_sprite", 0.8), ("wood_spirit", 0.18)],
                ),
            ],
        },
        ZoneDef {
            number: 3,
            id: "ruined_castle".into(),
            name: "Ruined Castle".into(),
            level_min: 3,
            level_max: 6,
            dungeon: true,
            aggro_chance: 0.05,
            kills_to_travel: 12,
            enemies: vec![
                enemy("skeletal_knight", 1.0),
                enemy("orc_centurion", 1.0),
                enemy("dark_wolf", 1.0),
                enemy("bloodsaber_acolyte", 1.0),
                enemy("castle_specter", 0.6),
                enemy("sir_rothgar", 0.12),
            ],
            sub_areas: vec![
                sub_area(
                    "outer_keep",
                    "Outer Keep",
                    true,
                    0.0,
                    &[("skeletal_knight", 1.1), ("orc_centurion", 1.1), ("dark_wolf", 0.9), ("bloodsaber_acolyte", 0.9)],
                ),
                sub_area(
                    "forgotten_halls",
                    "Forgotten Halls",
                    false,
                    0.025,
                    &[("dark_wolf", 1.4), ("bloodsaber_acolyte", 1.1), ("orc_centurion", 0.9)],
                ),
                sub_area(
                    "deep_crypts",
                    "Deep Crypts",
                    false,
                    0.02,
                    &[("bloodsaber_acolyte", 1.6), ("skeletal_knight", 1.2), ("castle_specter", 1.5)],
                ),
            ],
        },
        ZoneDef {
            number: 4,
            id: "rolling_hills".into(),
            name: "Rolling Hills".into(),
            level_min: 6,
            level_max: 8,
            dungeon: false,
            aggro_chance: 0.03,
            kills_to_travel: 12,
            enemies: vec![
                enemy("hill_skirmisher", 1.0),
                enemy("dark_wolf", 0.9),
                enemy("ridge_bandit", 0.8),
                enemy("rock_scrabbler", 0.7),
                enemy("stone_hurler", 0.13),
                enemy("ridgewatch_commander", 0.092),
                enemy("captain_arvok", 0.034),
                enemy("ancient_earthshaker", 0.023),
            ],
            sub_areas: vec![
                sub_area(
                    "open_world",
                    "Open World",
                    true,
                    0.0,
                    &[("stone_hurler", 0.0), ("ridgewatch_commander", 0.0)],
                ),
                sub_area(
                    "ridgewatch",
                    "Ridgewatch Slopes",
                    false,
                    0.04,
                    &[
                        ("hill_skirmisher", 1.2),
                        ("dark_wolf", 0.9),
                        ("stone_hurler", 2.8),
                        ("ridgewatch_commander", 2.7),
                        ("captain_arvok", 0.0),
                        ("ancient_earthshaker", 0.0),
                    ],
                ),
                sub_area(
                    "stonewatch_ruins",
                    "Stonewatch Ruins",
                    false,
                    0.03,
                    &[
                        ("hill_skirmisher", 1.3),
                        ("dark_wolf", 0.8),
                        ("stone_hurler", 0.0),
                        ("ridgewatch_commander", 0.0),
                        ("captain_arvok", 3.0),
                        ("ancient_earthshaker", 2.9),
                    ],
                ),
            ],
        },
        ZoneDef {
            number: 5,
            id: "cornfields".into(),
            name: "Cornfields".into(),
            level_min: 8,
            level_max: 11,
            dungeon: false,
            aggro_chance: 0.035,
            kills_to_travel: 14,
            enemies: vec![enemy("cornfield_raider", 1.0), enemy("field_gnawer", 0.9)],
            sub_areas: vec![
                sub_area("open_world", "Open World", true, 0.0, &[]),
                sub_area(
                    "fenceline",
                    "Fenceline",
                    false,
                    0.0,
                    &[("cornfield_raider", 1.1)],
                ),
                sub_area(
                    "deep_rows",
                    "Deep Rows",
                    false,
                    0.03,
                    &[("cornfield_raider", 1.3), ("field_gnawer", 0.8)],
                ),
            ],
        },
        ZoneDef {
            number: 6,
            id: "hallowbone_castle".into(),
            name: "Hallowbone Castle".into(),
            level_min: 9,
            level_max: 12,
            dungeon: true,
            aggro_chance: 0.05,
            kills_to_travel: 15,
            enemies: vec![enemy("hallowbone_warpriest", 1.0), enemy("bone_king", 0.0)],
            sub_areas: vec![
                sub_area("open_world", "Open World", true, 0.03, &[]),
                sub_area(
                    "lower_halls",
                    "Lower Halls",
                    false,
                    0.02,
                    &[("hallowbone_warpriest", 1.2)],
                ),
                sub_area(
                    "throne_of_bone",
                    "Throne of Bone",
                    false,
                    0.01,
                    &[("bone_king", 0.25)],
                ),
            ],
        },
    ]
}
