//! Domain types for match state and resolution

mod action;
mod distance;
mod fighter;
mod round;

pub use action::{Action, StrikeProfile};
pub use distance::{Distance, Player};
pub use fighter::{Archetype, FighterId, FighterProfile, StatSheet};
pub use round::{FighterState, RoundState, STAMINA_MAX};
