//! Simulation context, tick engine and the ambient plumbing around them.

pub mod config;
pub mod constants;
pub mod error;
pub mod offline;
pub mod tick;
pub mod world;

pub use config::EngineConfig;
pub use error::{CombatError, ConfigError};
pub use offline::{catch_up, OfflineReport};
pub use tick::{advance_tick, TickEvent, TickResult};
pub use world::{ActorSnapshot, World};
