//! Storage seam for rooms, matches and knockdown records
//!
//! The engine only talks to the [`Store`] trait; [`MemoryStore`] is the
//! in-process implementation. All methods are synchronous and short so they
//! can be called while holding per-match locks.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use ringside_combat::{FighterId, Player};
use thiserror::Error;

use crate::records::{KnockdownRecord, MatchId, MatchRecord, MatchStatus, RoomRecord, RoomStatus};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    Conflict,
}

/// Persistence operations the engine and coordinators depend on.
pub trait Store: Send + Sync {
    fn insert_room(&self, room: RoomRecord) -> Result<(), StoreError>;
    fn get_room(&self, token: &str) -> Result<RoomRecord, StoreError>;
    fn update_room(&self, room: RoomRecord) -> Result<(), StoreError>;
    fn delete_room(&self, token: &str) -> Result<(), StoreError>;

    /// The fighter's own room in `Waiting` or `Ready` state, if any.
    fn open_room_of(&self, creator: FighterId) -> Option<RoomRecord>;
    /// The `Ready` room this fighter created, if any.
    fn ready_room_of(&self, creator: FighterId) -> Option<RoomRecord>;
    /// All non-finished rooms the fighter participates in.
    fn open_rooms_with(&self, fighter: FighterId) -> Vec<RoomRecord>;

    /// Fails with `Conflict` if the id is taken or either participant is
    /// already in an active match; the check and the insert are atomic.
    fn insert_match(&self, record: MatchRecord) -> Result<(), StoreError>;
    fn get_match(&self, id: MatchId) -> Result<MatchRecord, StoreError>;
    fn update_match(&self, record: MatchRecord) -> Result<(), StoreError>;

    /// The active match this fighter is in, if any.
    fn active_match_of(&self, fighter: FighterId) -> Option<MatchRecord>;

    fn insert_knockdown(&self, record: KnockdownRecord) -> Result<(), StoreError>;
    fn knockdowns_of(&self, id: MatchId) -> Vec<KnockdownRecord>;
    fn delete_knockdown(&self, id: MatchId, player: Player) -> Result<(), StoreError>;
    fn delete_knockdowns(&self, id: MatchId);
}

/// Hash-map backed store for a single process.
#[derive(Default)]
pub struct MemoryStore {
    rooms: Mutex<HashMap<String, RoomRecord>>,
    matches: Mutex<HashMap<MatchId, MatchRecord>>,
    knockdowns: Mutex<Vec<KnockdownRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_room(&self, room: RoomRecord) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if rooms.contains_key(&room.token.0) {
            return Err(StoreError::Conflict);
        }
        rooms.insert(room.token.0.clone(), room);
        Ok(())
    }

    fn get_room(&self, token: &str) -> Result<RoomRecord, StoreError> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn update_room(&self, room: RoomRecord) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        match rooms.get_mut(&room.token.0) {
            Some(slot) => {
                *slot = room;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_room(&self, token: &str) -> Result<(), StoreError> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn open_room_of(&self, creator: FighterId) -> Option<RoomRecord> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|r| {
                r.creator == creator
                    && matches!(r.status, RoomStatus::Waiting | RoomStatus::Ready)
            })
            .cloned()
    }

    fn ready_room_of(&self, creator: FighterId) -> Option<RoomRecord> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|r| r.creator == creator && r.status == RoomStatus::Ready)
            .cloned()
    }

    fn open_rooms_with(&self, fighter: FighterId) -> Vec<RoomRecord> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| {
                r.status != RoomStatus::Finished
                    && (r.creator == fighter || r.opponent == Some(fighter))
            })
            .cloned()
            .collect()
    }

    fn insert_match(&self, record: MatchRecord) -> Result<(), StoreError> {
        let mut matches = self.matches.lock().unwrap_or_else(PoisonError::into_inner);
        if matches.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        let busy = matches.values().any(|m| {
            m.status == MatchStatus::Active
                && record.players.iter().any(|p| m.player_slot(*p).is_some())
        });
        if busy {
            return Err(StoreError::Conflict);
        }
        matches.insert(record.id, record);
        Ok(())
    }

    fn get_match(&self, id: MatchId) -> Result<MatchRecord, StoreError> {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn update_match(&self, record: MatchRecord) -> Result<(), StoreError> {
        let mut matches = self.matches.lock().unwrap_or_else(PoisonError::into_inner);
        match matches.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn active_match_of(&self, fighter: FighterId) -> Option<MatchRecord> {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|m| m.status == MatchStatus::Active && m.player_slot(fighter).is_some())
            .cloned()
    }

    fn insert_knockdown(&self, record: KnockdownRecord) -> Result<(), StoreError> {
        let mut knockdowns = self
            .knockdowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if knockdowns
            .iter()
            .any(|k| k.match_id == record.match_id && k.player == record.player)
        {
            return Err(StoreError::Conflict);
        }
        knockdowns.push(record);
        Ok(())
    }

    fn knockdowns_of(&self, id: MatchId) -> Vec<KnockdownRecord> {
        self.knockdowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|k| k.match_id == id)
            .cloned()
            .collect()
    }

    fn delete_knockdown(&self, id: MatchId, player: Player) -> Result<(), StoreError> {
        let mut knockdowns = self
            .knockdowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = knockdowns.len();
        knockdowns.retain(|k| !(k.match_id == id && k.player == player));
        if knockdowns.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn delete_knockdowns(&self, id: MatchId) {
        self.knockdowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|k| k.match_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RoomToken;
    use tokio::time::Instant;

    fn room(token: &str, creator: u64, status: RoomStatus) -> RoomRecord {
        RoomRecord {
            token: RoomToken(token.to_string()),
            creator: FighterId(creator),
            opponent: None,
            created_at: Instant::now(),
            status,
        }
    }

    #[tokio::test]
    async fn test_room_crud() {
        let store = MemoryStore::new();
        store.insert_room(room("ABC123", 1, RoomStatus::Waiting)).unwrap();
        assert!(matches!(
            store.insert_room(room("ABC123", 2, RoomStatus::Waiting)),
            Err(StoreError::Conflict)
        ));

        let mut fetched = store.get_room("ABC123").unwrap();
        assert_eq!(fetched.creator, FighterId(1));

        fetched.status = RoomStatus::Ready;
        store.update_room(fetched).unwrap();
        assert_eq!(store.get_room("ABC123").unwrap().status, RoomStatus::Ready);
        assert!(store.ready_room_of(FighterId(1)).is_some());

        store.delete_room("ABC123").unwrap();
        assert!(matches!(store.get_room("ABC123"), Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_open_rooms_with_skips_closed() {
        let store = MemoryStore::new();
        store.insert_room(room("AAAAAA", 1, RoomStatus::Waiting)).unwrap();
        store.insert_room(room("BBBBBB", 1, RoomStatus::Finished)).unwrap();
        let mut joined = room("CCCCCC", 2, RoomStatus::Ready);
        joined.opponent = Some(FighterId(1));
        store.insert_room(joined).unwrap();

        let open = store.open_rooms_with(FighterId(1));
        assert_eq!(open.len(), 2);
        assert!(open.iter().all(|r| r.token.0 != "BBBBBB"));
    }

    #[tokio::test]
    async fn test_insert_match_rejects_busy_fighters() {
        use ringside_combat::{Archetype, RoundState};

        let sheets = [
            Archetype::Swarmer.stat_sheet(),
            Archetype::OutBoxer.stat_sheet(),
        ];
        let record = |id: u64, p1: u64, p2: u64, status: MatchStatus| MatchRecord {
            id: MatchId(id),
            players: [FighterId(p1), FighterId(p2)],
            status,
            started_at: Instant::now(),
            state: RoundState::opening([&sheets[0], &sheets[1]]),
            pending: [None, None],
            deadline: Instant::now(),
            verdict: None,
        };

        let store = MemoryStore::new();
        store.insert_match(record(1, 1, 2, MatchStatus::Active)).unwrap();
        // Fighter 2 is still fighting.
        assert!(matches!(
            store.insert_match(record(2, 2, 3, MatchStatus::Active)),
            Err(StoreError::Conflict)
        ));

        let mut done = store.get_match(MatchId(1)).unwrap();
        done.status = MatchStatus::Finished;
        store.update_match(done).unwrap();
        store.insert_match(record(2, 2, 3, MatchStatus::Active)).unwrap();
    }

    #[tokio::test]
    async fn test_knockdown_records() {
        let store = MemoryStore::new();
        let record = KnockdownRecord {
            match_id: MatchId(7),
            player: Player::P1,
            deadline: Instant::now(),
        };
        store.insert_knockdown(record.clone()).unwrap();
        assert!(matches!(
            store.insert_knockdown(record),
            Err(StoreError::Conflict)
        ));
        assert_eq!(store.knockdowns_of(MatchId(7)).len(), 1);

        store.delete_knockdown(MatchId(7), Player::P1).unwrap();
        assert!(matches!(
            store.delete_knockdown(MatchId(7), Player::P1),
            Err(StoreError::NotFound)
        ));
        store.delete_knockdowns(MatchId(7));
    }
}
