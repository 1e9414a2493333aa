//! Async orchestration for ringside matches.
//!
//! Everything timing- and pairing-related lives here, on top of the pure
//! resolution in `ringside-combat`:
//!
//! - [`Engine`] runs matches: action intake, round deadlines, knockdown
//!   windows, the match time cap and termination
//! - [`RoomCoordinator`] pairs fighters through token-invite rooms
//! - [`Matchmaker`] pairs fighters through an open search pool
//!
//! External concerns are traits the embedding application implements:
//! [`Store`] for persistence, [`ProfileLookup`] for fighter identities,
//! [`Notifier`] for outbound messages and [`Clock`] for time. In-process
//! implementations of each are provided.

pub mod clock;
pub mod engine;
pub mod error;
pub mod matchmaker;
pub mod notify;
pub mod profile;
pub mod records;
pub mod rooms;
pub mod store;

pub use clock::{Clock, TokioClock};
pub use engine::{Engine, EngineBuilder, KNOCKDOWN_WINDOW, MATCH_TIME_CAP, ROUND_DEADLINE};
pub use error::ArenaError;
pub use matchmaker::{Matchmaker, SearchOutcome, SEARCH_WINDOW};
pub use notify::{NullNotifier, Notifier, RecordingNotifier, SentMessage};
pub use profile::{MemoryProfiles, ProfileLookup};
pub use records::{
    KnockdownRecord, MatchId, MatchRecord, MatchStatus, RoomRecord, RoomStatus, RoomToken, Verdict,
};
pub use rooms::{RoomCoordinator, ROOM_TTL};
pub use store::{MemoryStore, Store, StoreError};
