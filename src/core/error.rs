//! Error types for the simulation core and its configuration loaders.
//!
//! Nothing in here is fatal to a running simulation: the tick engine turns
//! every [`CombatError`] into a log event and moves on.

use std::fmt;
use thiserror::Error;

/// Which pool an action draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Mana,
    Endurance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Mana => write!(f, "mana"),
            ResourceKind::Endurance => write!(f, "endurance"),
        }
    }
}

/// Kind of content record a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Action,
    Item,
    Mob,
    Zone,
    Class,
    Race,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefinitionKind::Action => "action",
            DefinitionKind::Item => "item",
            DefinitionKind::Mob => "mob",
            DefinitionKind::Zone => "zone",
            DefinitionKind::Class => "class",
            DefinitionKind::Race => "race",
        };
        f.write_str(name)
    }
}

/// Recoverable failures inside a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    #[error("{actor} lacks {resource} for {action} (needs {needed}, has {available:.0})")]
    InsufficientResource {
        actor: String,
        action: String,
        resource: ResourceKind,
        needed: f64,
        available: f64,
    },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("missing {kind} definition '{id}'")]
    MissingDefinition { kind: DefinitionKind, id: String },
}

impl CombatError {
    pub fn missing(kind: DefinitionKind, id: impl Into<String>) -> Self {
        CombatError::MissingDefinition {
            kind,
            id: id.into(),
        }
    }
}

/// Errors from loading engine configuration or content tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_resource_message() {
        let err = CombatError::InsufficientResource {
            actor: "Ayla".into(),
            action: "Fireblast".into(),
            resource: ResourceKind::Mana,
            needed: 10.0,
            available: 4.0,
        };
        assert_eq!(
            err.to_string(),
            "Ayla lacks mana for Fireblast (needs 10, has 4)"
        );
    }

    #[test]
    fn test_missing_definition_message() {
        let err = CombatError::missing(DefinitionKind::Item, "mystery_orb");
        assert_eq!(err.to_string(), "missing item definition 'mystery_orb'");
    }
}
