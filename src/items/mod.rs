//! Items: loot rolls, the party inventory and equipment bonuses.

pub mod equipment;
pub mod inventory;
pub mod loot;

pub use equipment::equipment_bonus;
pub use inventory::{Inventory, ItemStack};
pub use loot::{roll_loot, LootDrop};
