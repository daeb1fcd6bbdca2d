//! Shared party inventory made of bounded stacks.

use crate::content::ItemDef;
use crate::core::error::CombatError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    /// Tops up existing stacks of `def` to `max_stack`, then opens new
    /// stacks for the rest.
    pub fn add(&mut self, def: &ItemDef, mut quantity: u32) {
        let max = def.max_stack.max(1);
        for stack in self.stacks.iter_mut().filter(|s| s.item == def.id) {
            if quantity == 0 {
                return;
            }
            let room = max.saturating_sub(stack.quantity);
            let moved = room.min(quantity);
            stack.quantity += moved;
            quantity -= moved;
        }
        while quantity > 0 {
            let moved = quantity.min(max);
            self.stacks.push(ItemStack {
                item: def.id.clone(),
                quantity: moved,
            });
            quantity -= moved;
        }
    }

    pub fn count(&self, item: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.item == item)
            .map(|s| s.quantity)
            .sum()
    }

    /// Takes `quantity` of `item`, emptying later stacks first.
    pub fn remove(&mut self, item: &str, mut quantity: u32) -> Result<(), CombatError> {
        let have = self.count(item);
        if have < quantity {
            return Err(CombatError::InvalidState(format!(
                "need {quantity} {item}, have {have}"
            )));
        }
        for stack in self.stacks.iter_mut().rev().filter(|s| s.item == item) {
            let taken = stack.quantity.min(quantity);
            stack.quantity -= taken;
            quantity -= taken;
            if quantity == 0 {
                break;
            }
        }
        self.stacks.retain(|s| s.quantity > 0);
        Ok(())
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ore() -> ItemDef {
        ItemDef {
            id: "copper_ore".into(),
            name: "Copper Ore".into(),
            max_stack: 50,
            value: 2,
            equip: None,
        }
    }

    #[test]
    fn test_overflow_opens_new_stack() {
        let mut inv = Inventory::default();
        inv.add(&ore(), 45);
        inv.add(&ore(), 10);
        assert_eq!(inv.stacks().len(), 2);
        assert_eq!(inv.stacks()[0].quantity, 50);
        assert_eq!(inv.stacks()[1].quantity, 5);
        assert_eq!(inv.count("copper_ore"), 55);
    }

    #[test]
    fn test_large_add_splits() {
        let mut inv = Inventory::default();
        inv.add(&ore(), 120);
        let sizes: Vec<u32> = inv.stacks().iter().map(|s| s.quantity).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn test_remove() {
        let mut inv = Inventory::default();
        inv.add(&ore(), 60);
        inv.remove("copper_ore", 15).unwrap();
        assert_eq!(inv.count("copper_ore"), 45);
        assert_eq!(inv.stacks().len(), 1);
        assert!(inv.remove("copper_ore", 100).is_err());
        assert_eq!(inv.count("copper_ore"), 45);
    }
}
