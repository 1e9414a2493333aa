//! Movement phase: repositioning attempts, resolved before any strike

use super::events::RoundEvent;
use crate::dice::Dice;
use crate::types::{Action, Distance, Player, RoundState, StatSheet};

const MOVE_COST: f64 = 5.0;
const ESCAPE_COST: f64 = 10.0;
const CORNER_BACKFIRE_CHANCE: f64 = 0.1;

/// Resolve one player's movement action against the current distance.
///
/// The second mover observes the first mover's updated distance; an attempt
/// made moot by that update (e.g. closing in when already close) is a no-op
/// and costs nothing. Every real attempt costs stamina whether or not it
/// succeeds.
pub(crate) fn resolve(
    state: &mut RoundState,
    player: Player,
    action: Action,
    sheet: &StatSheet,
    dice: &mut dyn Dice,
    events: &mut Vec<RoundEvent>,
) {
    match action {
        Action::MoveCloser if state.distance != Distance::Close => {
            state.fighter_mut(player).stamina -= MOVE_COST;
            if dice.roll() < 0.4 * sheet.footwork {
                state.distance = Distance::Close;
                events.push(RoundEvent::ClosedIn { player });
            } else {
                events.push(RoundEvent::CloseInFailed { player });
            }
        }
        Action::MoveAway if state.distance == Distance::Close => {
            state.fighter_mut(player).stamina -= MOVE_COST;
            if dice.roll() < CORNER_BACKFIRE_CHANCE {
                state.distance = Distance::Cornered(player);
                events.push(RoundEvent::CorneredSelf { player });
            } else if dice.roll() < 0.4 * sheet.footwork {
                state.distance = Distance::Far;
                events.push(RoundEvent::Retreated { player });
            } else {
                events.push(RoundEvent::RetreatFailed { player });
            }
        }
        Action::EscapeCorner if state.distance.is_cornered(player) => {
            state.fighter_mut(player).stamina -= ESCAPE_COST;
            let fighter = state.fighter(player);
            let escape_chance = (fighter.health / sheet.max_health * sheet.footwork) / 3.0;
            if dice.roll() < escape_chance {
                state.distance = Distance::Far;
                events.push(RoundEvent::EscapedCorner { player });
            } else {
                events.push(RoundEvent::EscapeFailed { player });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceDice;
    use crate::types::Archetype;

    fn far_state() -> (RoundState, StatSheet) {
        let sheet = Archetype::Swarmer.stat_sheet();
        let state = RoundState::opening([&sheet, &sheet]);
        (state, sheet)
    }

    #[test]
    fn test_move_closer_success_and_cost() {
        let (mut state, sheet) = far_state();
        let mut dice = SequenceDice::new([0.0]);
        let mut events = Vec::new();
        resolve(&mut state, Player::P1, Action::MoveCloser, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Close);
        assert_eq!(state.fighter(Player::P1).stamina, 95.0);
        assert_eq!(events, vec![RoundEvent::ClosedIn { player: Player::P1 }]);
    }

    #[test]
    fn test_move_closer_failure_still_costs() {
        let (mut state, sheet) = far_state();
        // 0.4 * 1.2 footwork = 0.48; roll above it
        let mut dice = SequenceDice::new([0.6]);
        let mut events = Vec::new();
        resolve(&mut state, Player::P1, Action::MoveCloser, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Far);
        assert_eq!(state.fighter(Player::P1).stamina, 95.0);
    }

    #[test]
    fn test_move_away_backfires_into_corner() {
        let (mut state, sheet) = far_state();
        state.distance = Distance::Close;
        let mut dice = SequenceDice::new([0.05]);
        let mut events = Vec::new();
        resolve(&mut state, Player::P2, Action::MoveAway, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Cornered(Player::P2));
        assert_eq!(events, vec![RoundEvent::CorneredSelf { player: Player::P2 }]);
    }

    #[test]
    fn test_move_away_success_after_backfire_roll() {
        let (mut state, sheet) = far_state();
        state.distance = Distance::Close;
        // First roll clears the 10% backfire, second clears 0.4 * footwork
        let mut dice = SequenceDice::new([0.5, 0.1]);
        let mut events = Vec::new();
        resolve(&mut state, Player::P1, Action::MoveAway, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Far);
        assert_eq!(state.fighter(Player::P1).stamina, 95.0);
    }

    #[test]
    fn test_escape_corner_chance_scales_with_health() {
        let (mut state, sheet) = far_state();
        state.distance = Distance::Cornered(Player::P1);
        state.fighter_mut(Player::P1).health = sheet.max_health / 2.0;
        // chance = (0.5 * 1.2) / 3 = 0.2
        let mut dice = SequenceDice::new([0.19]);
        let mut events = Vec::new();
        resolve(&mut state, Player::P1, Action::EscapeCorner, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Far);
        assert_eq!(state.fighter(Player::P1).stamina, 90.0);

        state.distance = Distance::Cornered(Player::P1);
        let mut dice = SequenceDice::new([0.21]);
        resolve(&mut state, Player::P1, Action::EscapeCorner, &sheet, &mut dice, &mut events);
        assert_eq!(state.distance, Distance::Cornered(Player::P1));
    }

    #[test]
    fn test_moot_attempt_is_free_noop() {
        let (mut state, sheet) = far_state();
        state.distance = Distance::Close;
        let mut dice = SequenceDice::new([0.0]);
        let mut events = Vec::new();
        // Already close: the attempt evaporates, no cost, no roll consumed
        resolve(&mut state, Player::P1, Action::MoveCloser, &sheet, &mut dice, &mut events);
        assert_eq!(state.fighter(Player::P1).stamina, 100.0);
        assert!(events.is_empty());
        assert_eq!(dice.roll(), 0.0);
    }
}
