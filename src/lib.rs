//! Tickrate - deterministic idle RPG combat and progression engine.
//!
//! The engine is driven by [`core::advance_tick`]: each call resolves one
//! fixed-duration tick for a [`core::World`] against immutable
//! [`content::Content`] and returns the events that happened.

pub mod build_info;
pub mod combat;
pub mod content;
pub mod core;
pub mod items;
pub mod party;
pub mod simulator;
pub mod skills;
pub mod zones;
