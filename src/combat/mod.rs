//! Combat resolution: formulas, resists, swing timing, casting and actions.

pub mod actions;
pub mod casting;
pub mod effects;
pub mod events;
pub mod math;
pub mod resist;
pub mod swing;
pub mod types;

pub use actions::{act, auto_attack, resolve_action, tick_damage_over_time, ActionEnv};
pub use casting::{CastTick, CastingState};
pub use effects::{ActiveEffect, EffectKind, EffectStore};
pub use events::CombatEvent;
pub use types::*;
