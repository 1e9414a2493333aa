//! Persistent records for rooms, matches and knockdowns

use std::fmt;

use ringside_combat::{Action, FighterId, Player, RoundState};
use tokio::time::Instant;

/// Unique match identifier, allocated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match {}", self.0)
    }
}

/// Six-character invite code for a private room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomToken(pub String);

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Created, waiting for an opponent to join.
    Waiting,
    /// Opponent joined, waiting for the creator to start.
    Ready,
    /// Fight started.
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Active,
    Finished,
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Opponent failed to rise from a knockdown.
    Knockout { winner: FighterId },
    /// Time cap reached; higher remaining health wins.
    Decision { winner: FighterId },
    Draw,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub token: RoomToken,
    pub creator: FighterId,
    pub opponent: Option<FighterId>,
    pub created_at: Instant,
    pub status: RoomStatus,
}

#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: MatchId,
    /// Slot order is fixed at creation: players[0] is P1.
    pub players: [FighterId; 2],
    pub status: MatchStatus,
    pub started_at: Instant,
    pub state: RoundState,
    /// Actions received for the current round, by slot.
    pub pending: [Option<Action>; 2],
    /// Current round's submission deadline.
    pub deadline: Instant,
    pub verdict: Option<Verdict>,
}

impl MatchRecord {
    /// Which slot a fighter occupies, if any.
    pub fn player_slot(&self, fighter: FighterId) -> Option<Player> {
        Player::both()
            .into_iter()
            .find(|p| self.players[p.index()] == fighter)
    }
}

/// An unresolved knockdown: the fighter must attempt to rise by `deadline`.
#[derive(Debug, Clone)]
pub struct KnockdownRecord {
    pub match_id: MatchId,
    pub player: Player,
    pub deadline: Instant,
}
