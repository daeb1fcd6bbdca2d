//! Structured combat log.
//!
//! The engine never renders. Every observable combat outcome becomes one
//! [`CombatEvent`], and [`CombatEvent::message`] gives the default log line.

use super::resist::ResistRoll;
use crate::skills::magic::CastQuality;

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// An auto-attack landed.
    Swing {
        attacker: String,
        target: String,
        damage: u32,
        crit: bool,
        /// Granted by the sub-tick overflow bonus.
        extra: bool,
    },
    Miss {
        attacker: String,
        target: String,
    },
    CastStarted {
        actor: String,
        action: String,
        ticks: u32,
    },
    CastInterrupted {
        actor: String,
        action: String,
    },
    /// The cast target died or vanished before completion.
    CastFizzled {
        actor: String,
        action: String,
    },
    /// A completed cast came out weaker than intended.
    CastQuality {
        actor: String,
        action: String,
        quality: CastQuality,
    },
    Damage {
        source: String,
        target: String,
        action: String,
        amount: u32,
        absorbed: u32,
    },
    Heal {
        source: String,
        target: String,
        action: String,
        amount: u32,
    },
    Resisted {
        target: String,
        action: String,
        roll: ResistRoll,
    },
    EffectApplied {
        target: String,
        effect: String,
        ticks: u32,
    },
    /// The target is above the effect's level cap.
    Immune {
        target: String,
        action: String,
    },
    MesmerizeBroken {
        target: String,
    },
    DamageOverTime {
        target: String,
        effect: String,
        amount: u32,
    },
    Taunted {
        actor: String,
        target: String,
    },
    ManaRestored {
        actor: String,
        amount: u32,
    },
    SkillUp {
        actor: String,
        skill: String,
        value: u32,
    },
    Died {
        name: String,
        hero: bool,
    },
}

impl CombatEvent {
    pub fn message(&self) -> String {
        match self {
            CombatEvent::Swing { attacker, target, damage, crit, extra } => {
                let tag = match (crit, extra) {
                    (true, true) => " (extra swing, CRITICAL)",
                    (true, false) => " (CRITICAL)",
                    (false, true) => " (extra swing)",
                    (false, false) => "",
                };
                format!("{attacker} hits {target} for {damage}{tag}.")
            }
            CombatEvent::Miss { attacker, target } => format!("{attacker} misses {target}."),
            CombatEvent::CastStarted { actor, action, ticks } => {
                format!("{actor} begins casting {action} ({ticks} ticks).")
            }
            CombatEvent::CastInterrupted { actor, action } => {
                format!("{actor}'s {action} is interrupted!")
            }
            CombatEvent::CastFizzled { actor, action } => {
                format!("{actor}'s {action} fizzles with no target.")
            }
            CombatEvent::CastQuality { actor, action, quality } => match quality {
                CastQuality::Resisted => format!("{actor}'s {action} fails to take hold."),
                _ => format!("{actor}'s {action} only partially takes hold."),
            },
            CombatEvent::Damage { source, target, action, amount, absorbed } => {
                if *absorbed > 0 {
                    format!("{source}'s {action} hits {target} for {amount} ({absorbed} absorbed).")
                } else {
                    format!("{source}'s {action} hits {target} for {amount}.")
                }
            }
            CombatEvent::Heal { source, target, action, amount } => {
                format!("{source}'s {action} heals {target} for {amount}.")
            }
            CombatEvent::Resisted { target, action, roll } => roll
                .log_message(action)
                .unwrap_or_else(|| format!("{target} shrugs off {action}.")),
            CombatEvent::EffectApplied { target, effect, ticks } => {
                format!("{target} is affected by {effect} for {ticks} ticks.")
            }
            CombatEvent::Immune { target, action } => format!("{target} is immune to {action}."),
            CombatEvent::MesmerizeBroken { target } => format!("{target} snaps out of the trance!"),
            CombatEvent::DamageOverTime { target, effect, amount } => {
                format!("{target} takes {amount} damage from {effect}.")
            }
            CombatEvent::Taunted { actor, target } => {
                format!("{actor} taunts {target}, drawing its attention.")
            }
            CombatEvent::ManaRestored { actor, amount } => {
                format!("{actor} gathers {amount} mana.")
            }
            CombatEvent::SkillUp { actor, skill, value } => {
                format!("{actor} has become better at {skill}! ({value})")
            }
            CombatEvent::Died { name, hero } => {
                if *hero {
                    format!("{name} has fallen!")
                } else {
                    format!("{name} has been slain!")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::resist::{ResistRoll, ResistType};

    #[test]
    fn test_swing_message_tags() {
        let event = CombatEvent::Swing {
            attacker: "Warrior".into(),
            target: "Skeleton".into(),
            damage: 12,
            crit: true,
            extra: false,
        };
        assert_eq!(event.message(), "Warrior hits Skeleton for 12 (CRITICAL).");
    }

    #[test]
    fn test_resist_message_uses_roll() {
        let mut roll = ResistRoll::unresisted(Some(ResistType::Magic));
        roll.resisted = true;
        roll.effect_multiplier = 0.0;
        roll.partial_percent = 0;
        let event = CombatEvent::Resisted {
            target: "Phantom".into(),
            action: "Mesmerize".into(),
            roll,
        };
        assert_eq!(event.message(), "Mesmerize was RESISTED (magic)!");
    }
}
