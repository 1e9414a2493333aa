//! Match lifecycle: creation, action intake, round deadlines, knockdowns
//! and termination.
//!
//! [`Engine`] is a cheap-to-clone handle over shared state. Each live match
//! is a `Bout` behind its own mutex; the registry mutex is only ever held
//! long enough to clone the bout's `Arc`, so bout locks are never acquired
//! while the registry is held.
//!
//! Deadlines are enforced by spawned sleeper tasks carrying the match id and
//! the epoch they were armed at. Every state transition bumps the epoch, so
//! a sleeper that lost the race finds a mismatch and does nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ringside_combat::{
    knockdown, resolve_round, Action, Dice, FighterId, FighterProfile, Player, RoundState,
    ThreadDice,
};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::clock::{Clock, TokioClock};
use crate::error::ArenaError;
use crate::notify::{round_prompt, status_line, Notifier};
use crate::profile::ProfileLookup;
use crate::records::{KnockdownRecord, MatchId, MatchRecord, MatchStatus, RoomStatus, Verdict};
use crate::store::{Store, StoreError};

/// How long fighters have to submit a round action.
pub const ROUND_DEADLINE: Duration = Duration::from_secs(30);
/// Wall-clock cap on a match; hitting it sends the fight to the scorecards.
pub const MATCH_TIME_CAP: Duration = Duration::from_secs(180);
/// How long a downed fighter has to attempt to rise.
pub const KNOCKDOWN_WINDOW: Duration = Duration::from_secs(10);

type DiceFactory = dyn Fn() -> Box<dyn Dice + Send> + Send + Sync;

/// An unresolved stand-up attempt window.
struct PendingStand {
    deadline: Instant,
    /// `None` until the fighter rolls or the window lapses.
    result: Option<bool>,
}

/// Live state of one match, guarded by its own mutex.
struct Bout {
    record: MatchRecord,
    profiles: [FighterProfile; 2],
    /// Bumped on every transition; sleeper tasks check it before acting.
    epoch: u64,
    knockdowns: [Option<PendingStand>; 2],
    dice: Box<dyn Dice + Send>,
}

struct EngineInner {
    store: Arc<dyn Store>,
    profiles: Arc<dyn ProfileLookup>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    dice_factory: Box<DiceFactory>,
    bouts: Mutex<HashMap<MatchId, Arc<Mutex<Bout>>>>,
    next_id: AtomicU64,
}

/// Handle to the match engine. Clone freely; all clones share state.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

/// Configures the non-default seams before the engine starts running.
pub struct EngineBuilder {
    store: Arc<dyn Store>,
    profiles: Arc<dyn ProfileLookup>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    dice_factory: Box<DiceFactory>,
}

impl EngineBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Dice source for each new match; defaults to the thread RNG.
    pub fn dice_factory(
        mut self,
        factory: impl Fn() -> Box<dyn Dice + Send> + Send + Sync + 'static,
    ) -> Self {
        self.dice_factory = Box::new(factory);
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            inner: Arc::new(EngineInner {
                store: self.store,
                profiles: self.profiles,
                notifier: self.notifier,
                clock: self.clock,
                dice_factory: self.dice_factory,
                bouts: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }
}

impl Engine {
    pub fn new(
        store: Arc<dyn Store>,
        profiles: Arc<dyn ProfileLookup>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::builder(store, profiles, notifier).build()
    }

    pub fn builder(
        store: Arc<dyn Store>,
        profiles: Arc<dyn ProfileLookup>,
        notifier: Arc<dyn Notifier>,
    ) -> EngineBuilder {
        EngineBuilder {
            store,
            profiles,
            notifier,
            clock: Arc::new(TokioClock),
            dice_factory: Box::new(|| Box::new(ThreadDice) as Box<dyn Dice + Send>),
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn Store> {
        &self.inner.store
    }

    pub(crate) fn profiles(&self) -> &Arc<dyn ProfileLookup> {
        &self.inner.profiles
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Snapshot of a match record, for queries and assertions.
    pub fn match_record(&self, id: MatchId) -> Result<MatchRecord, ArenaError> {
        Ok(self.inner.store.get_match(id)?)
    }

    /// Start a match between two registered fighters.
    ///
    /// Validates that both exist and neither is already fighting, persists
    /// the opening state, arms the first round deadline and prompts both.
    pub fn create_match(&self, a: FighterId, b: FighterId) -> Result<MatchId, ArenaError> {
        let profile_a = self
            .inner
            .profiles
            .lookup(a)
            .ok_or(ArenaError::UnknownFighter(a))?;
        let profile_b = self
            .inner
            .profiles
            .lookup(b)
            .ok_or(ArenaError::UnknownFighter(b))?;
        let id = MatchId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = self.inner.clock.now();
        let record = MatchRecord {
            id,
            players: [a, b],
            status: MatchStatus::Active,
            started_at: now,
            state: RoundState::opening([&profile_a.stats, &profile_b.stats]),
            pending: [None, None],
            deadline: now + ROUND_DEADLINE,
            verdict: None,
        };
        // The store rejects the insert atomically if either fighter is
        // already in an active match; a separate pre-check would race.
        self.inner
            .store
            .insert_match(record.clone())
            .map_err(|err| match err {
                StoreError::Conflict => ArenaError::AlreadyInMatch,
                err => ArenaError::Storage(err),
            })?;

        let bout = Arc::new(Mutex::new(Bout {
            record,
            profiles: [profile_a, profile_b],
            epoch: 0,
            knockdowns: [None, None],
            dice: (self.inner.dice_factory)(),
        }));
        self.inner
            .bouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&bout));
        self.prompt_players(&bout.lock().unwrap_or_else(PoisonError::into_inner));
        self.arm_round_timer(id, 0, now + ROUND_DEADLINE);
        debug!(match_id = id.0, "match created");
        Ok(id)
    }

    /// Record a fighter's action for the current round.
    ///
    /// Resolves the round as soon as both actions are in. A submission after
    /// the deadline forces resolution with missing actions defaulted to
    /// [`Action::Rest`] and reports `DeadlineExpired` to the caller.
    pub fn submit_action(
        &self,
        fighter: FighterId,
        id: MatchId,
        action: Action,
    ) -> Result<(), ArenaError> {
        let bout = self.bout(id)?;
        let mut bout = bout.lock().unwrap_or_else(PoisonError::into_inner);
        if bout.record.status != MatchStatus::Active {
            return Err(ArenaError::MatchNotActive);
        }
        let slot = bout
            .record
            .player_slot(fighter)
            .ok_or(ArenaError::NotParticipant)?;
        if bout.knockdowns.iter().any(Option::is_some) {
            return Err(ArenaError::RecoveryPending);
        }
        if self.inner.clock.now() >= bout.record.deadline {
            self.resolve_now(&mut bout);
            return Err(ArenaError::DeadlineExpired);
        }
        if !action.legal_at(bout.record.state.distance, slot) {
            return Err(ArenaError::IllegalAction {
                action,
                distance: bout.record.state.distance,
            });
        }

        bout.record.pending[slot.index()] = Some(action);
        if bout.record.pending.iter().all(Option::is_some) {
            self.resolve_now(&mut bout);
        } else if let Err(err) = self.inner.store.update_match(bout.record.clone()) {
            warn!(match_id = id.0, %err, "failed to persist pending action");
        }
        Ok(())
    }

    /// Roll the downed fighter's single attempt to beat the count.
    ///
    /// Returns whether they rose. A late attempt counts as a failure.
    pub fn attempt_stand(&self, fighter: FighterId, id: MatchId) -> Result<bool, ArenaError> {
        let bout = self.bout(id)?;
        let mut bout = bout.lock().unwrap_or_else(PoisonError::into_inner);
        if bout.record.status != MatchStatus::Active {
            return Err(ArenaError::MatchNotActive);
        }
        let slot = bout
            .record
            .player_slot(fighter)
            .ok_or(ArenaError::NotParticipant)?;
        let deadline = match &bout.knockdowns[slot.index()] {
            Some(pending) if pending.result.is_none() => pending.deadline,
            _ => return Err(ArenaError::NotDown),
        };
        if self.inner.clock.now() > deadline {
            self.count_out(&mut bout, slot);
            return Err(ArenaError::DeadlineExpired);
        }

        let sheet = bout.profiles[slot.index()].stats.clone();
        let stood = {
            let Bout { record, dice, .. } = &mut *bout;
            knockdown::attempt_stand(record.state.fighter_mut(slot), &sheet, dice.as_mut())
        };
        if let Some(pending) = &mut bout.knockdowns[slot.index()] {
            pending.result = Some(stood);
        }
        if stood {
            if let Err(err) = self.inner.store.delete_knockdown(id, slot) {
                warn!(match_id = id.0, %err, "failed to delete knockdown record");
            }
            let name = bout.profiles[slot.index()].name.clone();
            self.notify_both(&bout, &format!("{name} beats the count!"));
        } else {
            let name = bout.profiles[slot.index()].name.clone();
            self.notify_both(&bout, &format!("{name} cannot get up!"));
        }
        self.settle_knockdowns(&mut bout);
        Ok(stood)
    }

    /// Abort a match regardless of its state of play.
    pub fn force_terminate(&self, id: MatchId) -> Result<(), ArenaError> {
        let bout = self.bout(id)?;
        let mut bout = bout.lock().unwrap_or_else(PoisonError::into_inner);
        if bout.record.status != MatchStatus::Active {
            return Err(ArenaError::MatchNotActive);
        }
        self.finish(&mut bout, Verdict::Aborted);
        Ok(())
    }

    fn bout(&self, id: MatchId) -> Result<Arc<Mutex<Bout>>, ArenaError> {
        // Clone out of the registry so the bout lock is taken after release.
        self.inner
            .bouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(ArenaError::MatchNotActive)
    }

    fn arm_round_timer(&self, id: MatchId, epoch: u64, deadline: Instant) {
        let engine = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            engine.on_round_deadline(id, epoch);
        });
    }

    fn arm_knockdown_timer(&self, id: MatchId, player: Player, epoch: u64, deadline: Instant) {
        let engine = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            engine.on_knockdown_deadline(id, player, epoch);
        });
    }

    fn on_round_deadline(&self, id: MatchId, epoch: u64) {
        let Ok(bout) = self.bout(id) else {
            debug!(match_id = id.0, "round timer fired for a finished match");
            return;
        };
        let mut bout = bout.lock().unwrap_or_else(PoisonError::into_inner);
        if bout.record.status != MatchStatus::Active || bout.epoch != epoch {
            debug!(match_id = id.0, epoch, "stale round timer");
            return;
        }
        debug!(match_id = id.0, round = bout.record.state.round, "deadline hit, forcing resolution");
        self.resolve_now(&mut bout);
    }

    fn on_knockdown_deadline(&self, id: MatchId, player: Player, epoch: u64) {
        let Ok(bout) = self.bout(id) else {
            debug!(match_id = id.0, "knockdown timer fired for a finished match");
            return;
        };
        let mut bout = bout.lock().unwrap_or_else(PoisonError::into_inner);
        if bout.record.status != MatchStatus::Active || bout.epoch != epoch {
            debug!(match_id = id.0, epoch, "stale knockdown timer");
            return;
        }
        if matches!(&bout.knockdowns[player.index()], Some(p) if p.result.is_none()) {
            let name = bout.profiles[player.index()].name.clone();
            self.notify_both(&bout, &format!("{name} is counted out!"));
            self.count_out(&mut bout, player);
        }
    }

    /// Resolve the current round with whatever actions are in.
    fn resolve_now(&self, bout: &mut Bout) {
        let now = self.inner.clock.now();
        if now >= bout.record.started_at + MATCH_TIME_CAP {
            self.finish_on_points(bout);
            return;
        }

        let actions = [
            bout.record.pending[0].take().unwrap_or(Action::Rest),
            bout.record.pending[1].take().unwrap_or(Action::Rest),
        ];
        let outcome = resolve_round(
            &mut bout.record.state,
            actions,
            [&bout.profiles[0].stats, &bout.profiles[1].stats],
            bout.dice.as_mut(),
        );

        let names = [
            bout.profiles[0].name.as_str(),
            bout.profiles[1].name.as_str(),
        ];
        let summary = outcome
            .events
            .iter()
            .map(|e| e.describe(names))
            .collect::<Vec<_>>()
            .join("\n");
        self.notify_both(bout, &summary);

        bout.epoch += 1;
        if outcome.down.is_empty() {
            bout.record.state.round += 1;
            bout.record.deadline = now + ROUND_DEADLINE;
            self.arm_round_timer(bout.record.id, bout.epoch, bout.record.deadline);
            self.prompt_players(bout);
        } else {
            for player in outcome.down {
                let deadline = now + KNOCKDOWN_WINDOW;
                bout.knockdowns[player.index()] = Some(PendingStand {
                    deadline,
                    result: None,
                });
                if let Err(err) = self.inner.store.insert_knockdown(KnockdownRecord {
                    match_id: bout.record.id,
                    player,
                    deadline,
                }) {
                    warn!(match_id = bout.record.id.0, %err, "failed to persist knockdown");
                }
                self.arm_knockdown_timer(bout.record.id, player, bout.epoch, deadline);
                let downed = bout.record.players[player.index()];
                self.inner.notifier.send(
                    downed,
                    "You are down! Try to beat the count (10 seconds)",
                    &[],
                );
                let other = bout.record.players[player.other().index()];
                let name = &bout.profiles[player.index()].name;
                self.inner
                    .notifier
                    .send(other, &format!("{name} goes down!"), &[]);
            }
        }
        if let Err(err) = self.inner.store.update_match(bout.record.clone()) {
            warn!(match_id = bout.record.id.0, %err, "failed to persist round result");
        }
    }

    /// Mark a lapsed or failed stand-up window as a count-out loss.
    fn count_out(&self, bout: &mut Bout, player: Player) {
        if let Some(pending) = &mut bout.knockdowns[player.index()] {
            pending.result = Some(false);
        }
        self.settle_knockdowns(bout);
    }

    /// Once every open knockdown window has an outcome, resume or finish.
    fn settle_knockdowns(&self, bout: &mut Bout) {
        if bout
            .knockdowns
            .iter()
            .any(|k| matches!(k, Some(p) if p.result.is_none()))
        {
            return;
        }
        let failed: Vec<Player> = Player::both()
            .into_iter()
            .filter(|p| {
                matches!(&bout.knockdowns[p.index()], Some(pending) if pending.result == Some(false))
            })
            .collect();

        match failed.as_slice() {
            [] => {
                // Everyone rose. Same round number, fresh deadline.
                bout.knockdowns = [None, None];
                bout.record.pending = [None, None];
                bout.epoch += 1;
                bout.record.deadline = self.inner.clock.now() + ROUND_DEADLINE;
                self.arm_round_timer(bout.record.id, bout.epoch, bout.record.deadline);
                if let Err(err) = self.inner.store.update_match(bout.record.clone()) {
                    warn!(match_id = bout.record.id.0, %err, "failed to persist resumed round");
                }
                self.prompt_players(bout);
            }
            [loser] => {
                let winner = bout.record.players[loser.other().index()];
                self.finish(bout, Verdict::Knockout { winner });
            }
            _ => self.finish(bout, Verdict::Draw),
        }
    }

    /// Scorecards: more remaining health wins, equal is a draw.
    fn finish_on_points(&self, bout: &mut Bout) {
        let healths = [
            bout.record.state.fighter(Player::P1).health,
            bout.record.state.fighter(Player::P2).health,
        ];
        let verdict = if healths[0] > healths[1] {
            Verdict::Decision {
                winner: bout.record.players[0],
            }
        } else if healths[1] > healths[0] {
            Verdict::Decision {
                winner: bout.record.players[1],
            }
        } else {
            Verdict::Draw
        };
        self.finish(bout, verdict);
    }

    fn finish(&self, bout: &mut Bout, verdict: Verdict) {
        bout.record.status = MatchStatus::Finished;
        bout.record.verdict = Some(verdict);
        bout.epoch += 1;
        if let Err(err) = self.inner.store.update_match(bout.record.clone()) {
            warn!(match_id = bout.record.id.0, %err, "failed to persist verdict");
        }
        self.inner.store.delete_knockdowns(bout.record.id);

        // Close out any room the participants still share.
        for fighter in bout.record.players {
            for mut room in self.inner.store.open_rooms_with(fighter) {
                room.status = RoomStatus::Finished;
                if let Err(err) = self.inner.store.update_room(room) {
                    warn!(match_id = bout.record.id.0, %err, "failed to close room");
                }
            }
        }

        let text = match verdict {
            Verdict::Knockout { winner } => {
                let name = self.name_of(bout, winner);
                format!("Knockout! {name} wins the fight.")
            }
            Verdict::Decision { winner } => {
                let name = self.name_of(bout, winner);
                format!(
                    "The final bell. {name} wins on points.\n{}\n{}",
                    status_line(&bout.profiles[0], &bout.record.state, Player::P1),
                    status_line(&bout.profiles[1], &bout.record.state, Player::P2),
                )
            }
            Verdict::Draw => "The fight is a draw.".to_string(),
            Verdict::Aborted => "The fight has been stopped.".to_string(),
        };
        self.notify_both(bout, &text);

        self.inner
            .bouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&bout.record.id);
        debug!(match_id = bout.record.id.0, ?verdict, "match finished");
    }

    /// Send the round prompt plus each fighter's legal action menu.
    fn prompt_players(&self, bout: &Bout) {
        let prompt = round_prompt([&bout.profiles[0], &bout.profiles[1]], &bout.record.state);
        for player in Player::both() {
            let actions = Action::available(bout.record.state.distance, player);
            self.inner
                .notifier
                .send(bout.record.players[player.index()], &prompt, &actions);
        }
    }

    fn notify_both(&self, bout: &Bout, text: &str) {
        for fighter in bout.record.players {
            self.inner.notifier.send(fighter, text, &[]);
        }
    }

    fn name_of(&self, bout: &Bout, fighter: FighterId) -> String {
        bout.record
            .player_slot(fighter)
            .map(|p| bout.profiles[p.index()].name.clone())
            .unwrap_or_else(|| fighter.to_string())
    }
}
