//! Narrative outcomes produced by round resolution

use crate::types::{Action, Player};

/// One observable thing that happened during a round.
///
/// Events carry slots rather than names; [`RoundEvent::describe`] renders
/// them against the two display names in slot order.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    ClosedIn { player: Player },
    CloseInFailed { player: Player },
    Retreated { player: Player },
    RetreatFailed { player: Player },
    CorneredSelf { player: Player },
    EscapedCorner { player: Player },
    EscapeFailed { player: Player },
    Landed { attacker: Player, strike: Action, damage: f64 },
    Missed { attacker: Player, strike: Action },
    CaughtRetreating { attacker: Player, strike: Action, damage: f64 },
    Blocked { attacker: Player, strike: Action, damage: f64 },
    BlockBroken { attacker: Player, strike: Action, damage: f64 },
    Dodged { attacker: Player, strike: Action },
    CaughtDodging { attacker: Player, strike: Action, damage: f64 },
    Braced { player: Player },
    Weaved { player: Player },
    Rested { player: Player },
}

impl RoundEvent {
    /// Render this event as commentary, given display names in slot order.
    pub fn describe(&self, names: [&str; 2]) -> String {
        let name = |p: Player| names[p.index()];
        let foe = |p: Player| names[p.other().index()];
        match self {
            RoundEvent::ClosedIn { player } => {
                format!("{} closes the distance on {}!", name(*player), foe(*player))
            }
            RoundEvent::CloseInFailed { player } => {
                format!("{} fails to close the distance.", name(*player))
            }
            RoundEvent::Retreated { player } => {
                format!("{} backs away from {}!", name(*player), foe(*player))
            }
            RoundEvent::RetreatFailed { player } => {
                format!("{} fails to retreat!", name(*player))
            }
            RoundEvent::CorneredSelf { player } => {
                format!("{} retreats straight into the corner!", name(*player))
            }
            RoundEvent::EscapedCorner { player } => {
                format!("{} slips out of the corner!", name(*player))
            }
            RoundEvent::EscapeFailed { player } => {
                format!("{} is trapped in the corner!", name(*player))
            }
            RoundEvent::Landed { attacker, strike, damage } => format!(
                "{} lands a {} on {}! Damage: {:.1}",
                name(*attacker),
                strike,
                foe(*attacker),
                damage
            ),
            RoundEvent::Missed { attacker, strike } => {
                format!("{} throws a {} but misses!", name(*attacker), strike)
            }
            RoundEvent::CaughtRetreating { attacker, strike, damage } => format!(
                "{} clips {} with a {} on the retreat! Damage: {:.1}",
                name(*attacker),
                foe(*attacker),
                strike,
                damage
            ),
            RoundEvent::Blocked { attacker, strike, damage } => format!(
                "{} throws a {}, but {} blocks it! Damage: {:.1}",
                name(*attacker),
                strike,
                foe(*attacker),
                damage
            ),
            RoundEvent::BlockBroken { attacker, strike, damage } => format!(
                "{}'s {} breaks through {}'s guard! Damage: {:.1}",
                name(*attacker),
                strike,
                foe(*attacker),
                damage
            ),
            RoundEvent::Dodged { attacker, strike } => format!(
                "{} throws a {}, but {} slips it!",
                name(*attacker),
                strike,
                foe(*attacker)
            ),
            RoundEvent::CaughtDodging { attacker, strike, damage } => format!(
                "{} catches {} mid-dodge with a {}! Damage: {:.1}",
                name(*attacker),
                foe(*attacker),
                strike,
                damage
            ),
            RoundEvent::Braced { player } => format!("{} covers up.", name(*player)),
            RoundEvent::Weaved { player } => {
                format!("{} stays light on their feet.", name(*player))
            }
            RoundEvent::Rested { player } => format!("{} takes a breather.", name(*player)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_slot_names() {
        let event = RoundEvent::Landed {
            attacker: Player::P2,
            strike: Action::Hook,
            damage: 28.5,
        };
        let text = event.describe(["Alice", "Bob"]);
        assert_eq!(text, "Bob lands a hook on Alice! Damage: 28.5");
    }
}
