//! Skill progression: the shared ledger plus weapon and magic rules.

pub mod ledger;
pub mod magic;
pub mod weapon;

pub use ledger::{skill_cap, SkillLedger, SkillUp};
pub use magic::{CastQuality, MagicSkill, MagicSkills, Specialization};
pub use weapon::{WeaponSkills, WeaponType};
