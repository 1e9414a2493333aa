//! Open matchmaking: search the pool, get paired or give up after a window.
//!
//! Searchers park on a oneshot channel in a shared queue. Whoever arrives
//! next pops the oldest live waiter, creates the match and sends the id
//! through the channel. A waiter that times out pulls itself back out of the
//! queue; a pairing that loses that race is rolled back.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use ringside_combat::FighterId;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

use crate::engine::Engine;
use crate::error::ArenaError;
use crate::records::MatchId;

/// How long a searcher waits in the pool before giving up.
pub const SEARCH_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Paired(MatchId),
    /// Nobody turned up within the search window.
    NoOpponent,
}

struct Waiter {
    fighter: FighterId,
    tx: oneshot::Sender<MatchId>,
}

pub struct Matchmaker {
    engine: Engine,
    queue: Mutex<Vec<Waiter>>,
}

impl Matchmaker {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Look for an opponent, pairing immediately if the pool has one.
    pub async fn search(&self, fighter: FighterId) -> Result<SearchOutcome, ArenaError> {
        self.engine
            .profiles()
            .lookup(fighter)
            .ok_or(ArenaError::UnknownFighter(fighter))?;
        if self.engine.store().active_match_of(fighter).is_some() {
            return Err(ArenaError::AlreadyInMatch);
        }

        // Pop the oldest waiter still listening, or park ourselves. Both
        // the decision and the queue mutation happen under one lock, so two
        // concurrent searchers cannot both see an empty pool and both park.
        let mut rx = loop {
            let popped = {
                let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
                if queue.iter().any(|w| w.fighter == fighter) {
                    return Err(ArenaError::AlreadySearching);
                }
                match queue.iter().position(|w| !w.tx.is_closed()) {
                    Some(i) => queue.remove(i),
                    None => {
                        let (tx, rx) = oneshot::channel();
                        queue.push(Waiter { fighter, tx });
                        break rx;
                    }
                }
            };

            match self.engine.create_match(popped.fighter, fighter) {
                Ok(id) => {
                    if popped.tx.send(id).is_err() {
                        // The opponent gave up between pairing and delivery.
                        debug!(match_id = id.0, "paired with a vanished waiter, rolling back");
                        let _ = self.engine.force_terminate(id);
                        continue;
                    }
                    return Ok(SearchOutcome::Paired(id));
                }
                // The waiter got into a match some other way; skip them,
                // unless it is the searcher who is no longer eligible.
                Err(ArenaError::AlreadyInMatch | ArenaError::UnknownFighter(_)) => {
                    if self.engine.store().active_match_of(fighter).is_some() {
                        return Err(ArenaError::AlreadyInMatch);
                    }
                }
                Err(err) => return Err(err),
            }
        };

        match timeout(SEARCH_WINDOW, &mut rx).await {
            Ok(Ok(id)) => Ok(SearchOutcome::Paired(id)),
            Ok(Err(_)) => Ok(SearchOutcome::NoOpponent),
            Err(_) => {
                self.queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|w| w.fighter != fighter);
                // A pairer may have popped us right at the deadline.
                match rx.try_recv() {
                    Ok(id) => Ok(SearchOutcome::Paired(id)),
                    Err(_) => Ok(SearchOutcome::NoOpponent),
                }
            }
        }
    }
}
