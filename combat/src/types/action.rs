//! The per-round action menu and its distance legality table

use super::distance::{Distance, Player};

/// One action chosen per round from a small fixed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Jab,
    Uppercut,
    Hook,
    Dodge,
    Block,
    MoveCloser,
    MoveAway,
    EscapeCorner,
    Rest,
}

/// Base numbers for one strike variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeProfile {
    pub base_damage: f64,
    pub stamina_cost: f64,
    pub base_hit_chance: f64,
}

const JAB: StrikeProfile = StrikeProfile {
    base_damage: 10.0,
    stamina_cost: 6.0,
    base_hit_chance: 0.9,
};

const UPPERCUT: StrikeProfile = StrikeProfile {
    base_damage: 25.0,
    stamina_cost: 19.0,
    base_hit_chance: 0.6,
};

const HOOK: StrikeProfile = StrikeProfile {
    base_damage: 19.0,
    stamina_cost: 15.0,
    base_hit_chance: 0.75,
};

impl Action {
    /// The strike table entry, if this action is a strike.
    pub fn strike(self) -> Option<StrikeProfile> {
        match self {
            Action::Jab => Some(JAB),
            Action::Uppercut => Some(UPPERCUT),
            Action::Hook => Some(HOOK),
            _ => None,
        }
    }

    pub fn is_strike(self) -> bool {
        self.strike().is_some()
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::MoveCloser | Action::MoveAway | Action::EscapeCorner
        )
    }

    /// Whether this action may be submitted by `player` at `distance`.
    ///
    /// Power strikes only land in close; movement depends on where you
    /// already are; only the cornered fighter may try to escape the corner.
    pub fn legal_at(self, distance: Distance, player: Player) -> bool {
        match self {
            Action::Jab | Action::Dodge | Action::Block | Action::Rest => true,
            Action::Uppercut | Action::Hook => distance == Distance::Close,
            Action::MoveCloser => distance != Distance::Close,
            Action::MoveAway => distance == Distance::Close,
            Action::EscapeCorner => distance.is_cornered(player),
        }
    }

    /// All actions legal for `player` at `distance`, in menu order.
    pub fn available(distance: Distance, player: Player) -> Vec<Action> {
        [
            Action::Jab,
            Action::Uppercut,
            Action::Hook,
            Action::Dodge,
            Action::Block,
            Action::MoveCloser,
            Action::MoveAway,
            Action::EscapeCorner,
            Action::Rest,
        ]
        .into_iter()
        .filter(|a| a.legal_at(distance, player))
        .collect()
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Jab => "jab",
            Action::Uppercut => "uppercut",
            Action::Hook => "hook",
            Action::Dodge => "dodge",
            Action::Block => "block",
            Action::MoveCloser => "move closer",
            Action::MoveAway => "move away",
            Action::EscapeCorner => "escape the corner",
            Action::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_table() {
        assert_eq!(Action::Jab.strike().unwrap().base_damage, 10.0);
        assert_eq!(Action::Uppercut.strike().unwrap().stamina_cost, 19.0);
        assert_eq!(Action::Hook.strike().unwrap().base_hit_chance, 0.75);
        assert!(Action::Rest.strike().is_none());
    }

    #[test]
    fn test_power_strikes_need_close() {
        for action in [Action::Uppercut, Action::Hook] {
            assert!(action.legal_at(Distance::Close, Player::P1));
            assert!(!action.legal_at(Distance::Far, Player::P1));
            assert!(!action.legal_at(Distance::Cornered(Player::P1), Player::P1));
        }
        // The jab works everywhere
        assert!(Action::Jab.legal_at(Distance::Far, Player::P1));
        assert!(Action::Jab.legal_at(Distance::Cornered(Player::P2), Player::P1));
    }

    #[test]
    fn test_movement_legality() {
        assert!(!Action::MoveCloser.legal_at(Distance::Close, Player::P1));
        assert!(Action::MoveCloser.legal_at(Distance::Far, Player::P1));
        assert!(Action::MoveCloser.legal_at(Distance::Cornered(Player::P1), Player::P1));

        assert!(Action::MoveAway.legal_at(Distance::Close, Player::P1));
        assert!(!Action::MoveAway.legal_at(Distance::Far, Player::P1));
        assert!(!Action::MoveAway.legal_at(Distance::Cornered(Player::P2), Player::P1));
    }

    #[test]
    fn test_escape_corner_only_when_cornered() {
        assert!(Action::EscapeCorner.legal_at(Distance::Cornered(Player::P2), Player::P2));
        assert!(!Action::EscapeCorner.legal_at(Distance::Cornered(Player::P2), Player::P1));
        assert!(!Action::EscapeCorner.legal_at(Distance::Far, Player::P1));
        assert!(!Action::EscapeCorner.legal_at(Distance::Close, Player::P1));
    }

    #[test]
    fn test_available_menu() {
        let far = Action::available(Distance::Far, Player::P1);
        assert!(far.contains(&Action::Jab));
        assert!(far.contains(&Action::MoveCloser));
        assert!(!far.contains(&Action::Uppercut));
        assert!(!far.contains(&Action::MoveAway));
        assert!(!far.contains(&Action::EscapeCorner));

        let cornered = Action::available(Distance::Cornered(Player::P1), Player::P1);
        assert!(cornered.contains(&Action::EscapeCorner));

        let close = Action::available(Distance::Close, Player::P2);
        assert!(close.contains(&Action::Hook));
        assert!(close.contains(&Action::MoveAway));
        assert!(!close.contains(&Action::MoveCloser));
    }
}
