//! Private rooms: create with an invite token, join, start the fight.
//!
//! Rooms are check-then-update over the store, so the coordinator serializes
//! its operations behind one gate mutex. Expiry is lazy: a room past its TTL
//! is deleted the next time anyone touches it.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use ringside_combat::FighterId;

use crate::engine::Engine;
use crate::error::ArenaError;
use crate::records::{MatchId, RoomRecord, RoomStatus, RoomToken};

/// A room nobody joins disappears after this long.
pub const ROOM_TTL: Duration = Duration::from_secs(300);
const TOKEN_LEN: usize = 6;
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub struct RoomCoordinator {
    engine: Engine,
    gate: Mutex<()>,
}

impl RoomCoordinator {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            gate: Mutex::new(()),
        }
    }

    /// Open a room and hand back its invite token.
    pub fn create_room(&self, creator: FighterId) -> Result<RoomToken, ArenaError> {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.engine
            .profiles()
            .lookup(creator)
            .ok_or(ArenaError::UnknownFighter(creator))?;
        if self.engine.store().active_match_of(creator).is_some() {
            return Err(ArenaError::AlreadyInMatch);
        }
        if let Some(existing) = self.engine.store().open_room_of(creator) {
            if !self.expire_if_stale(&existing)? {
                return Err(ArenaError::RoomAlreadyExists);
            }
        }

        let mut token = generate_token();
        while self.engine.store().get_room(&token.0).is_ok() {
            token = generate_token();
        }
        self.engine.store().insert_room(RoomRecord {
            token: token.clone(),
            creator,
            opponent: None,
            created_at: self.engine.clock().now(),
            status: RoomStatus::Waiting,
        })?;
        debug!(%token, "room created");
        Ok(token)
    }

    /// Join a waiting room by token. The creator is told to start the fight.
    pub fn join_room(&self, joiner: FighterId, token: &str) -> Result<(), ArenaError> {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.engine
            .profiles()
            .lookup(joiner)
            .ok_or(ArenaError::UnknownFighter(joiner))?;
        if self.engine.store().active_match_of(joiner).is_some() {
            return Err(ArenaError::AlreadyInMatch);
        }

        let mut room = self
            .engine
            .store()
            .get_room(token)
            .map_err(|_| ArenaError::RoomNotFound(token.to_string()))?;
        if self.expire_if_stale(&room)? {
            return Err(ArenaError::RoomNotFound(token.to_string()));
        }
        if room.creator == joiner {
            return Err(ArenaError::SelfJoin);
        }
        match room.status {
            RoomStatus::Waiting => {}
            RoomStatus::Ready | RoomStatus::Active => return Err(ArenaError::RoomFull),
            _ => return Err(ArenaError::RoomNotWaiting),
        }

        room.opponent = Some(joiner);
        room.status = RoomStatus::Ready;
        self.engine.store().update_room(room.clone())?;

        let joiner_name = self
            .engine
            .profiles()
            .lookup(joiner)
            .map(|p| p.name)
            .unwrap_or_else(|| joiner.to_string());
        self.engine.notifier().send(
            room.creator,
            &format!("{joiner_name} has entered your ring. Start the fight when ready."),
            &[],
        );
        Ok(())
    }

    /// Creator kicks off the match against the fighter who joined.
    pub fn start_fight(&self, creator: FighterId) -> Result<MatchId, ArenaError> {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let mut room = self
            .engine
            .store()
            .ready_room_of(creator)
            .ok_or(ArenaError::NoReadyRoom)?;
        let opponent = room.opponent.ok_or(ArenaError::NoReadyRoom)?;

        let id = self.engine.create_match(creator, opponent)?;
        room.status = RoomStatus::Active;
        self.engine.store().update_room(room)?;
        Ok(id)
    }

    /// Deletes the room if its TTL lapsed before an opponent arrived.
    /// Returns whether it was cleared.
    fn expire_if_stale(&self, room: &RoomRecord) -> Result<bool, ArenaError> {
        if room.status == RoomStatus::Waiting
            && self.engine.clock().now() >= room.created_at + ROOM_TTL
        {
            debug!(token = %room.token, "room expired");
            self.engine.store().delete_room(&room.token.0)?;
            return Ok(true);
        }
        Ok(false)
    }
}

fn generate_token() -> RoomToken {
    let mut rng = rand::thread_rng();
    let token = (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    RoomToken(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        for _ in 0..50 {
            let token = generate_token();
            assert_eq!(token.0.len(), TOKEN_LEN);
            assert!(token
                .0
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }
}
