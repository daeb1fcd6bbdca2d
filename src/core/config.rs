//! Runtime knobs for the simulation engine.
//!
//! Hosts may load these from TOML; every field has a default so a partial
//! file is enough.

use super::constants::{
    DEFAULT_TICK_MS, MAX_OFFLINE_SECONDS, RESIST_MAX_CHANCE, RESIST_MIN_CHANCE,
};
use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of one tick in milliseconds.
    pub tick_ms: u64,
    /// Multiplies every skill-up chance. Lets long ticks keep the same
    /// per-minute progression as short ones.
    pub skill_up_rate_mult: f64,
    /// Upper bound on ticks replayed by offline catch-up.
    pub max_catch_up_ticks: u64,
    /// Fraction of gold lost on a party wipe.
    pub wipe_gold_loss: f64,
    /// Fraction of max health every hero gets back after a wipe.
    pub wipe_restore_fraction: f64,
    /// Fraction of max health a downed hero returns with once the
    /// encounter is cleared.
    pub revive_fraction: f64,
    pub resist_min_chance: f64,
    pub resist_max_chance: f64,
    /// Charge cast costs at completion instead of at cast start.
    pub defer_cast_cost: bool,
    /// Travel to the next zone as soon as the kill requirement is met.
    pub auto_travel: bool,
    /// Spend gold on hero levels whenever affordable.
    pub auto_level: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            skill_up_rate_mult: 1.0,
            max_catch_up_ticks: MAX_OFFLINE_SECONDS * 1000 / DEFAULT_TICK_MS,
            wipe_gold_loss: 0.15,
            wipe_restore_fraction: 0.5,
            revive_fraction: 0.25,
            resist_min_chance: RESIST_MIN_CHANCE,
            resist_max_chance: RESIST_MAX_CHANCE,
            defer_cast_cost: false,
            auto_travel: true,
            auto_level: true,
        }
    }
}

impl EngineConfig {
    pub fn load_toml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_toml(&text)
    }

    pub fn parse_toml(text: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Validation("tick_ms must be positive".into()));
        }
        if !self.skill_up_rate_mult.is_finite() || self.skill_up_rate_mult < 0.0 {
            return Err(ConfigError::Validation(
                "skill_up_rate_mult must be a non-negative number".into(),
            ));
        }
        for (name, value) in [
            ("wipe_gold_loss", self.wipe_gold_loss),
            ("wipe_restore_fraction", self.wipe_restore_fraction),
            ("revive_fraction", self.revive_fraction),
            ("resist_min_chance", self.resist_min_chance),
            ("resist_max_chance", self.resist_max_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.resist_min_chance > self.resist_max_chance {
            return Err(ConfigError::Validation(
                "resist_min_chance exceeds resist_max_chance".into(),
            ));
        }
        Ok(())
    }

    /// Tick length in seconds, for per-second rates.
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_ms, 3000);
        assert_eq!(config.max_catch_up_ticks, 7200);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::parse_toml("tick_ms = 1000\nauto_level = false\n").unwrap();
        assert_eq!(config.tick_ms, 1000);
        assert!(!config.auto_level);
        assert_eq!(config.wipe_gold_loss, 0.15);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let err = EngineConfig::parse_toml("tick_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        let err = EngineConfig::parse_toml("wipe_gold_loss = 1.5").unwrap_err();
        assert!(err.to_string().contains("wipe_gold_loss"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = EngineConfig::parse_toml("tick_ms = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
