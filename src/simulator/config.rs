//! Simulation configuration.

use crate::core::config::EngineConfig;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses
    /// `seed + i`.
    pub seed: Option<u64>,

    /// Ticks simulated per run
    pub max_ticks_per_run: u64,

    /// Starting party as `(class, race)` pairs
    pub party: Vec<(String, String)>,

    /// Engine knobs shared by every run
    pub engine: EngineConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_ticks_per_run: 20_000,
            party: vec![
                ("warrior".into(), "human".into()),
                ("cleric".into(), "dwarf".into()),
                ("wizard".into(), "gnome".into()),
            ],
            engine: EngineConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Long single-zone runs for checking named spawn cadence.
    pub fn named_cadence(num_runs: u32) -> Self {
        Self {
            num_runs,
            max_ticks_per_run: 100_000,
            engine: EngineConfig {
                auto_travel: false,
                ..EngineConfig::default()
            },
            ..Default::default()
        }
    }

    pub fn party_refs(&self) -> Vec<(&str, &str)> {
        self.party
            .iter()
            .map(|(class, race)| (class.as_str(), race.as_str()))
            .collect()
    }
}
