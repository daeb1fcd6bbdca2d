//! Zones: enemy selection, sub-area discovery, named spawn smoothing and
//! travel.

pub mod named_spawns;
pub mod progression;
pub mod selection;

pub use named_spawns::{NamedSpawnController, NamedTracker, SpawnProfile};
pub use progression::{slots_for_zone, ZoneProgress};
pub use selection::{active_sub_area, pick_enemy, roll_discoveries, Discovery};
