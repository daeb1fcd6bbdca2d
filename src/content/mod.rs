//! Read-only content tables and their accessors.
//!
//! The engine only reads content through [`Content`]. Lookups return
//! [`CombatError::MissingDefinition`] so callers can log and skip.

pub mod builtin;
pub mod defs;

pub use defs::*;

use crate::core::error::{CombatError, ConfigError, ConfigResult, DefinitionKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Race key used when a hero's race is empty or unknown.
pub const DEFAULT_RACE: &str = "human";

/// On-disk shape: one array of tables per record type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    pub actions: Vec<ActionDef>,
    pub classes: Vec<ClassDef>,
    pub races: Vec<RaceDef>,
    pub items: Vec<ItemDef>,
    pub mobs: Vec<MobDef>,
    pub zones: Vec<ZoneDef>,
}

#[derive(Debug, Clone, Default)]
pub struct Content {
    actions: BTreeMap<String, ActionDef>,
    classes: BTreeMap<String, ClassDef>,
    races: BTreeMap<String, RaceDef>,
    items: BTreeMap<String, ItemDef>,
    mobs: BTreeMap<String, MobDef>,
    zones: BTreeMap<u32, ZoneDef>,
}

impl Content {
    /// The reference content set.
    pub fn builtin() -> Self {
        let file = ContentFile {
            actions: builtin::actions(),
            classes: builtin::classes(),
            races: builtin::races(),
            items: builtin::items(),
            mobs: builtin::mobs(),
            zones: builtin::zones(),
        };
        Self::index(file)
    }

    pub fn load_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_toml(&text)
    }

    pub fn parse_toml(text: &str) -> ConfigResult<Self> {
        let file: ContentFile = toml::from_str(text)?;
        Self::from_file(file)
    }

    /// Validates and indexes a content file.
    pub fn from_file(file: ContentFile) -> ConfigResult<Self> {
        validate(&file)?;
        Ok(Self::index(file))
    }

    fn index(file: ContentFile) -> Self {
        Self {
            actions: file.actions.into_iter().map(|d| (d.id.clone(), d)).collect(),
            classes: file.classes.into_iter().map(|d| (d.key.clone(), d)).collect(),
            races: file.races.into_iter().map(|d| (d.key.clone(), d)).collect(),
            items: file.items.into_iter().map(|d| (d.id.clone(), d)).collect(),
            mobs: file.mobs.into_iter().map(|d| (d.id.clone(), d)).collect(),
            zones: file.zones.into_iter().map(|d| (d.number, d)).collect(),
        }
    }

    pub fn action(&self, id: &str) -> Result<&ActionDef, CombatError> {
        self.actions
            .get(id)
            .ok_or_else(|| CombatError::missing(DefinitionKind::Action, id))
    }

    pub fn item(&self, id: &str) -> Result<&ItemDef, CombatError> {
        self.items
            .get(id)
            .ok_or_else(|| CombatError::missing(DefinitionKind::Item, id))
    }

    pub fn mob(&self, id: &str) -> Result<&MobDef, CombatError> {
        self.mobs
            .get(id)
            .ok_or_else(|| CombatError::missing(DefinitionKind::Mob, id))
    }

    pub fn zone(&self, number: u32) -> Result<&ZoneDef, CombatError> {
        self.zones
            .get(&number)
            .ok_or_else(|| CombatError::missing(DefinitionKind::Zone, number.to_string()))
    }

    pub fn class(&self, key: &str) -> Result<&ClassDef, CombatError> {
        self.classes
            .get(key)
            .ok_or_else(|| CombatError::missing(DefinitionKind::Class, key))
    }

    /// Race by key after normalization, falling back to [`DEFAULT_RACE`].
    pub fn race(&self, key: &str) -> Result<&RaceDef, CombatError> {
        let key = normalize_race_key(key);
        self.races
            .get(&key)
            .or_else(|| self.races.get(DEFAULT_RACE))
            .ok_or_else(|| CombatError::missing(DefinitionKind::Race, key))
    }

    pub fn zone_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.zones.keys().copied()
    }

    pub fn class_keys(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn max_zone(&self) -> u32 {
        self.zones.keys().next_back().copied().unwrap_or(1)
    }
}

/// `"  Half Elf "` → `"half_elf"`. Empty input maps to [`DEFAULT_RACE`].
pub fn normalize_race_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        let ch = if ch == ' ' || ch == '-' { '_' } else { ch.to_ascii_lowercase() };
        if ch == '_' && key.ends_with('_') {
            continue;
        }
        key.push(ch);
    }
    let key = key.trim_matches('_');
    if key.is_empty() {
        DEFAULT_RACE.to_string()
    } else {
        key.to_string()
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> ConfigResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::Validation(format!("duplicate {kind} '{id}'")));
        }
    }
    Ok(())
}

fn validate(file: &ContentFile) -> ConfigResult<()> {
    check_unique("action", file.actions.iter().map(|a| a.id.as_str()))?;
    check_unique("class", file.classes.iter().map(|c| c.key.as_str()))?;
    check_unique("race", file.races.iter().map(|r| r.key.as_str()))?;
    check_unique("item", file.items.iter().map(|i| i.id.as_str()))?;
    check_unique("mob", file.mobs.iter().map(|m| m.id.as_str()))?;

    let mut numbers = BTreeSet::new();
    for zone in &file.zones {
        if !numbers.insert(zone.number) {
            return Err(ConfigError::Validation(format!("duplicate zone {}", zone.number)));
        }
        if zone.enemies.is_empty() {
            return Err(ConfigError::Validation(format!(
                "zone '{}' has no enemies",
                zone.id
            )));
        }
        if zone.level_min > zone.level_max {
            return Err(ConfigError::Validation(format!(
                "zone '{}' has level_min above level_max",
                zone.id
            )));
        }
    }

    for action in &file.actions {
        if action.users.is_empty() {
            return Err(ConfigError::Validation(format!(
                "action '{}' declares no users",
                action.id
            )));
        }
        if action.cost.mana < 0.0 || action.cost.endurance < 0.0 {
            return Err(ConfigError::Validation(format!(
                "action '{}' has a negative cost",
                action.id
            )));
        }
    }

    for item in &file.items {
        if item.max_stack == 0 {
            return Err(ConfigError::Validation(format!(
                "item '{}' has max_stack 0",
                item.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_content_is_valid() {
        let content = Content::builtin();
        let file = ContentFile {
            actions: builtin::actions(),
            classes: builtin::classes(),
            races: builtin::races(),
            items: builtin::items(),
            mobs: builtin::mobs(),
            zones: builtin::zones(),
        };
        assert!(validate(&file).is_ok());
        assert_eq!(content.max_zone(), 6);
    }

    #[test]
    fn test_builtin_references_resolve() {
        let content = Content::builtin();
        for class in content.classes.values() {
            for learned in &class.actions {
                let action = content.action(&learned.action).unwrap();
                assert!(
                    action.users.allows_class(&class.key),
                    "{} cannot use {}",
                    class.key,
                    action.id
                );
            }
        }
        for zone in content.zones.values() {
            for enemy in &zone.enemies {
                assert!(content.mob(&enemy.mob).is_ok(), "missing mob {}", enemy.mob);
            }
        }
        for mob in content.mobs.values() {
            for entry in &mob.loot {
                assert!(content.item(&entry.item).is_ok(), "missing item {}", entry.item);
            }
            for action in &mob.actions {
                assert!(content.action(action).unwrap().users.mobs);
            }
        }
    }

    #[test]
    fn test_missing_lookup_is_typed() {
        let content = Content::builtin();
        let err = content.action("nope").unwrap_err();
        assert!(matches!(
            err,
            CombatError::MissingDefinition { kind: DefinitionKind::Action, .. }
        ));
        assert!(content.zone(99).is_err());
    }

    #[test]
    fn test_normalize_race_key() {
        assert_eq!(normalize_race_key("  Half Elf "), "half_elf");
        assert_eq!(normalize_race_key("Dark--Elf"), "dark_elf");
        assert_eq!(normalize_race_key("wood _ elf"), "wood_elf");
        assert_eq!(normalize_race_key(""), "human");
    }

    #[test]
    fn test_unknown_race_falls_back_to_human() {
        let content = Content::builtin();
        assert_eq!(content.race("Lizardfolk").unwrap().key, "human");
        assert_eq!(content.race("High Elf").unwrap().key, "high_elf");
    }

    #[test]
    fn test_parse_rejects_userless_action() {
        let text = r#"
            [[actions]]
            id = "poke"
            name = "Poke"
            kind = "ability"
            target = "enemy"
            effect = { type = "damage", min = 1, max = 2 }
        "#;
        let err = Content::parse_toml(text).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("poke")));
    }

    #[test]
    fn test_parse_minimal_zone() {
        let text = r#"
            [[mobs]]
            id = "rat"
            name = "Rat"
            base_hp = 10
            base_damage = 1

            [[zones]]
            number = 1
            id = "cellar"
            name = "Cellar"
            level_min = 1
            level_max = 2
            enemies = [{ mob = "rat", weight = 1.0 }]
        "#;
        let content = Content::parse_toml(text).unwrap();
        let zone = content.zone(1).unwrap();
        assert_eq!(zone.kills_to_travel, 10);
        assert!(zone.sub_areas.is_empty());
        assert_eq!(content.mob("rat").unwrap().delay, 30.0);
    }

    #[test]
    fn test_parse_rejects_empty_zone() {
        let text = r#"
            [[zones]]
            number = 1
            id = "void"
            name = "Void"
            level_min = 1
            level_max = 1
            enemies = []
        "#;
        assert!(Content::parse_toml(text).is_err());
    }
}
