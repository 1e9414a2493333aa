//! Domain types and round resolution for turn-based boxing matches.
//!
//! This crate is the pure core: no clocks, no channels, no storage. Given
//! both fighters' actions for a round it resolves movement, strikes and
//! stances deterministically modulo the injected [`Dice`] source.
//!
//! # Overview
//!
//! `ringside-combat` sits below `ringside-arena` (orchestration):
//!
//! ```text
//! ringside-arena (rooms, matchmaking, timers) ── drives ──┐
//!                                                         ▼
//! ringside-combat (types + resolution) ← THIS CRATE
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Archetype`] - Fighter presets (Swarmer, Out-boxer, Counter-puncher)
//! - [`StatSheet`], [`FighterProfile`] - Permanent fighter attributes
//! - [`Action`] - The nine per-round choices, with legality by distance
//! - [`Distance`], [`Player`] - Positioning and slot identity
//! - [`RoundState`], [`FighterState`] - Mutable in-match resources
//!
//! ## Resolution
//! - [`resolve_round`] - Apply both fighters' actions for one round
//! - [`RoundOutcome`], [`RoundEvent`] - What happened, for commentary
//! - [`knockdown`] - Stand-up chance and recovery formulas
//! - [`Dice`] - Randomness seam ([`ThreadDice`], [`SeededDice`], [`SequenceDice`])
//!
//! # Example Usage
//!
//! ```ignore
//! use ringside_combat::{resolve_round, Action, Archetype, RoundState, ThreadDice};
//!
//! let sheets = [
//!     Archetype::Swarmer.stat_sheet(),
//!     Archetype::OutBoxer.stat_sheet(),
//! ];
//! let mut state = RoundState::opening([&sheets[0], &sheets[1]]);
//! let mut dice = ThreadDice;
//!
//! let outcome = resolve_round(
//!     &mut state,
//!     [Action::MoveCloser, Action::Jab],
//!     [&sheets[0], &sheets[1]],
//!     &mut dice,
//! );
//! for event in &outcome.events {
//!     println!("{}", event.describe(["Rocky", "Apollo"]));
//! }
//! ```

pub mod dice;
pub mod knockdown;
pub mod resolve;
pub mod types;

// Re-export main types at crate root for convenience
pub use dice::{Dice, SeededDice, SequenceDice, ThreadDice};
pub use resolve::{resolve_round, RoundEvent, RoundOutcome};
pub use types::{
    Action, Archetype, Distance, FighterId, FighterProfile, FighterState, Player, RoundState,
    StatSheet, StrikeProfile, STAMINA_MAX,
};
