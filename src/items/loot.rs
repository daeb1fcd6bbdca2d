//! Loot table rolls.

use crate::combat::math::{roll_chance, roll_int};
use crate::content::{Content, LootEntry};
use rand::Rng;

/// One dropped stack, before it reaches the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootDrop {
    pub item: String,
    pub quantity: u32,
}

/// Rolls every entry independently. Entries naming unknown items are
/// logged and skipped.
pub fn roll_loot(content: &Content, table: &[LootEntry], rng: &mut impl Rng) -> Vec<LootDrop> {
    let mut drops = Vec::new();
    for entry in table {
        if let Err(err) = content.item(&entry.item) {
            tracing::warn!(%err, "skipping loot entry");
            continue;
        }
        if !roll_chance(entry.chance, rng) {
            continue;
        }
        let quantity = roll_int(entry.min_qty, entry.max_qty.max(entry.min_qty), rng);
        if quantity > 0 {
            drops.push(LootDrop {
                item: entry.item.clone(),
                quantity,
            });
        }
    }
    drops
}
