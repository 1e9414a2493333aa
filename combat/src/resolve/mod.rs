//! Simultaneous round resolution
//!
//! Both submitted actions are resolved against the current state in a fixed
//! order: movement P1, movement P2, then strike/stance P1, strike/stance P2.
//! Later steps observe the already-updated distance. The order is a
//! documented tie-break, not a fairness guarantee, and is relied on by
//! deterministic tests.

mod events;
mod movement;
mod strike;

pub use events::RoundEvent;

use crate::dice::Dice;
use crate::types::{Action, Player, RoundState, StatSheet};

/// Everything a resolved round reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub events: Vec<RoundEvent>,
    /// Players whose health or stamina bottomed out this round, slot order.
    pub down: Vec<Player>,
}

/// Resolve one round of simultaneous actions, mutating `state` in place.
///
/// Dice consumption order is fixed: movement P1 (up to two rolls for a
/// retreat), movement P2, then one defence-or-hit roll per striking player,
/// P1 first. Health and stamina are clamped to their bounds afterwards.
pub fn resolve_round(
    state: &mut RoundState,
    actions: [Action; 2],
    sheets: [&StatSheet; 2],
    dice: &mut dyn Dice,
) -> RoundOutcome {
    let mut events = Vec::new();

    for player in Player::both() {
        movement::resolve(
            state,
            player,
            actions[player.index()],
            sheets[player.index()],
            dice,
            &mut events,
        );
    }

    for player in Player::both() {
        strike::resolve(state, player, actions, sheets, dice, &mut events);
    }

    for player in Player::both() {
        state.fighter_mut(player).clamp(sheets[player.index()]);
    }

    RoundOutcome {
        events,
        down: state.downed(),
    }
}
