//! Weighted enemy selection and sub-area discovery.

use crate::content::{Content, MobDef, SubAreaDef, ZoneDef};
use crate::core::constants::MIN_SPAWN_WEIGHT;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which sub-areas of one zone have been found. Entries absent here fall
/// back to the sub-area's own `discovered` default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discovery {
    found: BTreeMap<String, bool>,
}

impl Discovery {
    pub fn is_discovered(&self, sub: &SubAreaDef) -> bool {
        self.found.get(&sub.id).copied().unwrap_or(sub.discovered)
    }

    pub fn mark(&mut self, sub_id: &str) {
        self.found.insert(sub_id.to_string(), true);
    }
}

/// The first discovered sub-area, if any.
pub fn active_sub_area<'a>(zone: &'a ZoneDef, discovery: &Discovery) -> Option<&'a SubAreaDef> {
    zone.sub_areas.iter().find(|sub| discovery.is_discovered(sub))
}

/// One spawn candidate and its final weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub mob: &'a MobDef,
    pub weight: f64,
}

/// Candidate weights for the zone's pool.
///
/// Each natural weight is multiplied by the active sub-area's modifier and
/// floored at [`MIN_SPAWN_WEIGHT`]; named candidates are then scaled by
/// `named_multiplier`. Pool entries with no mob definition are skipped.
pub fn candidates<'a>(
    content: &'a Content,
    zone: &ZoneDef,
    discovery: &Discovery,
    named_multiplier: f64,
) -> Vec<Candidate<'a>> {
    let modifiers = active_sub_area(zone, discovery).map(|sub| &sub.weight_modifiers);
    zone.enemies
        .iter()
        .filter_map(|entry| {
            let mob = match content.mob(&entry.mob) {
                Ok(mob) => mob,
                Err(err) => {
                    tracing::warn!(zone = %zone.id, %err, "skipping spawn entry");
                    return None;
                }
            };
            let modifier = modifiers
                .and_then(|m| m.get(&entry.mob))
                .copied()
                .unwrap_or(1.0);
            let mut weight = (entry.weight * modifier).max(MIN_SPAWN_WEIGHT);
            if mob.named {
                weight *= named_multiplier.max(0.0);
            }
            Some(Candidate { mob, weight })
        })
        .collect()
}

/// Draws one candidate proportionally to its weight. Zero-weight
/// candidates are never picked.
pub fn pick_weighted<'a>(candidates: &[Candidate<'a>], rng: &mut impl Rng) -> Option<&'a MobDef> {
    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return None;
    }
    let roll = rng.gen::<f64>() * total;
    let mut accum = 0.0;
    let mut last = None;
    for candidate in candidates.iter().filter(|c| c.weight > 0.0) {
        accum += candidate.weight;
        last = Some(candidate.mob);
        if roll < accum {
            return Some(candidate.mob);
        }
    }
    // Float rounding can leave `roll` at or past the final sum.
    last
}

/// Picks the next enemy for `zone`.
pub fn pick_enemy<'a>(
    content: &'a Content,
    zone: &ZoneDef,
    discovery: &Discovery,
    named_multiplier: f64,
    rng: &mut impl Rng,
) -> Option<&'a MobDef> {
    let pool = candidates(content, zone, discovery, named_multiplier);
    pick_weighted(&pool, rng)
}

/// Rolls every undiscovered sub-area once. Returns the newly found ones.
pub fn roll_discoveries<'a>(
    zone: &'a ZoneDef,
    discovery: &mut Discovery,
    rng: &mut impl Rng,
) -> Vec<&'a SubAreaDef> {
    let mut found = Vec::new();
    for sub in &zone.sub_areas {
        if discovery.is_discovered(sub) {
            continue;
        }
        if rng.gen::<f64>() < sub.discovery_chance {
            discovery.mark(&sub.id);
            found.push(sub);
        }
    }
    found
}
