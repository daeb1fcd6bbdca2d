//! Zone kill progress, travel and party slot unlocks.

use super::selection::Discovery;
use crate::content::{Content, ZoneDef};
use crate::core::constants::SLOT_UNLOCKS;
use crate::core::error::CombatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Party slots available once `zone` has been reached.
pub fn slots_for_zone(zone: u32) -> usize {
    SLOT_UNLOCKS
        .iter()
        .filter(|&&(at, _)| zone >= at)
        .map(|&(_, slots)| slots)
        .max()
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProgress {
    /// Current zone number.
    pub zone: u32,
    pub kills_this_zone: u32,
    pub total_kills: u64,
    /// Highest zone ever reached.
    pub highest_zone: u32,
    pub slots_unlocked: usize,
    #[serde(default)]
    pub discovery: BTreeMap<u32, Discovery>,
}

impl Default for ZoneProgress {
    fn default() -> Self {
        Self {
            zone: 1,
            kills_this_zone: 0,
            total_kills: 0,
            highest_zone: 1,
            slots_unlocked: slots_for_zone(1),
            discovery: BTreeMap::new(),
        }
    }
}

impl ZoneProgress {
    pub fn record_kill(&mut self) {
        self.kills_this_zone += 1;
        self.total_kills += 1;
    }

    pub fn can_travel(&self, zone: &ZoneDef) -> bool {
        self.kills_this_zone >= zone.kills_to_travel
    }

    pub fn discovery(&self, zone: u32) -> Discovery {
        self.discovery.get(&zone).cloned().unwrap_or_default()
    }

    pub fn discovery_mut(&mut self, zone: u32) -> &mut Discovery {
        self.discovery.entry(zone).or_default()
    }

    /// Moves to the next zone. Fails when the kill requirement is unmet or
    /// there is nowhere further to go.
    pub fn travel(&mut self, content: &Content) -> Result<u32, CombatError> {
        let current = content.zone(self.zone)?;
        if !self.can_travel(current) {
            return Err(CombatError::InvalidState(format!(
                "need {} kills in {} to travel, have {}",
                current.kills_to_travel, current.name, self.kills_this_zone
            )));
        }
        let next = self.zone + 1;
        content.zone(next)?;
        self.zone = next;
        self.kills_this_zone = 0;
        self.highest_zone = self.highest_zone.max(next);
        tracing::info!(zone = next, "travelled to next zone");
        Ok(next)
    }

    /// Raises the slot count for the current zone. Returns the new count
    /// when it grew.
    pub fn check_slot_unlocks(&mut self) -> Option<usize> {
        let slots = slots_for_zone(self.highest_zone.max(self.zone));
        if slots > self.slots_unlocked {
            self.slots_unlocked = slots;
            Some(slots)
        } else {
            None
        }
    }

    /// Wipe penalty: the local kill streak is lost.
    pub fn reset_zone_kills(&mut self) {
        self.kills_this_zone = 0;
    }
}
