//! Stat bonuses from equipped items.

use crate::content::{Content, EquipBonus};

/// Sums the bonuses of every equipped item id. Unknown ids and items that
/// cannot be equipped are logged and ignored.
pub fn equipment_bonus(content: &Content, equipped: &[String]) -> EquipBonus {
    let mut total = EquipBonus::default();
    for id in equipped {
        match content.item(id) {
            Ok(def) => match &def.equip {
                Some(bonus) => {
                    total.stats += bonus.stats;
                    total.damage += bonus.damage;
                }
                None => tracing::warn!(item = %id, "item is not equippable"),
            },
            Err(err) => tracing::warn!(%err, "ignoring equipped item"),
        }
    }
    total
}
