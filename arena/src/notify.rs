//! Outbound messaging seam
//!
//! The engine narrates matches through a [`Notifier`]; delivery is
//! fire-and-forget. [`RecordingNotifier`] captures everything for tests.

use std::sync::{Mutex, PoisonError};

use ringside_combat::{Action, Distance, FighterId, FighterProfile, Player, RoundState};

/// Delivers a message (and the action menu, when one applies) to a fighter.
pub trait Notifier: Send + Sync {
    fn send(&self, to: FighterId, text: &str, actions: &[Action]);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn send(&self, _to: FighterId, _text: &str, _actions: &[Action]) {}
}

/// One captured message.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: FighterId,
    pub text: String,
    pub actions: Vec<Action>,
}

/// Keeps every sent message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, to: FighterId, text: &str, actions: &[Action]) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMessage {
                to,
                text: text.to_string(),
                actions: actions.to_vec(),
            });
    }
}

/// One fighter's scoreboard line.
pub fn status_line(profile: &FighterProfile, state: &RoundState, player: Player) -> String {
    let fighter = state.fighter(player);
    format!(
        "{} ({}): health {:.1}/{:.1}, stamina {:.1}/100",
        profile.name, profile.archetype, fighter.health, profile.stats.max_health, fighter.stamina
    )
}

/// The between-rounds prompt: round header, distances, both scoreboards.
pub fn round_prompt(profiles: [&FighterProfile; 2], state: &RoundState) -> String {
    let distance = match state.distance {
        Distance::Cornered(p) => format!("{} is cornered", profiles[p.index()].name),
        other => other.to_string(),
    };
    format!(
        "Round {}\nDistance: {}\n{}\n{}\nChoose your action (30 seconds)",
        state.round,
        distance,
        status_line(profiles[0], state, Player::P1),
        status_line(profiles[1], state, Player::P2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_combat::Archetype;

    #[test]
    fn test_round_prompt_format() {
        let p1 = FighterProfile::new(FighterId(1), "Rocky", Archetype::Swarmer);
        let p2 = FighterProfile::new(FighterId(2), "Apollo", Archetype::OutBoxer);
        let state = RoundState::opening([&p1.stats, &p2.stats]);

        let prompt = round_prompt([&p1, &p2], &state);
        assert!(prompt.starts_with("Round 1\nDistance: far\n"));
        assert!(prompt.contains("Rocky (Swarmer): health 195.0/195.0, stamina 100.0/100"));
        assert!(prompt.contains("Apollo (Out-boxer): health 300.0/300.0"));
        assert!(prompt.ends_with("Choose your action (30 seconds)"));
    }

    #[test]
    fn test_recording_notifier_captures() {
        let notifier = RecordingNotifier::new();
        notifier.send(FighterId(5), "hello", &[Action::Jab]);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, FighterId(5));
        assert_eq!(sent[0].actions, vec![Action::Jab]);
    }
}
