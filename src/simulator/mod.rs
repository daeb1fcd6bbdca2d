//! Balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded worlds through the real tick engine to analyze:
//! - Kill and wipe rates per party composition
//! - Named spawn cadence against the smoothing cooldowns
//! - Skill progression over long sessions

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, RunStats};
