//! Error taxonomy for room, matchmaking and match operations

use ringside_combat::{Action, Distance};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Unknown fighter: {0}")]
    UnknownFighter(ringside_combat::FighterId),

    #[error("Fighter is already in an active match")]
    AlreadyInMatch,

    #[error("Fighter already has an open room")]
    RoomAlreadyExists,

    #[error("No such room: {0}")]
    RoomNotFound(String),

    #[error("Cannot join your own room")]
    SelfJoin,

    #[error("Room is not waiting for an opponent")]
    RoomNotWaiting,

    #[error("Room already has an opponent")]
    RoomFull,

    #[error("No room ready to start")]
    NoReadyRoom,

    #[error("Fighter is already searching for an opponent")]
    AlreadySearching,

    #[error("Match is not active")]
    MatchNotActive,

    #[error("Fighter is not a participant in this match")]
    NotParticipant,

    #[error("{action} is not legal at distance {distance}")]
    IllegalAction { action: Action, distance: Distance },

    #[error("Deadline expired")]
    DeadlineExpired,

    #[error("Fighter is not down")]
    NotDown,

    #[error("Waiting on a knockdown recovery")]
    RecoveryPending,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
