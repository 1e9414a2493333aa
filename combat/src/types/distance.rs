//! Match slots and the spatial relationship between fighters

/// One of the two ordered match slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// The opposing slot.
    pub fn other(self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Array index for per-player state.
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// Both slots, in resolution order.
    pub fn both() -> [Player; 2] {
        [Player::P1, Player::P2]
    }
}

/// The current spatial relationship between the two fighters.
///
/// Distance gates which actions are legal and modifies hit and damage
/// outcomes: a cornered fighter is easier to hit (x1.1) and takes more
/// damage (x1.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distance {
    Far,
    Close,
    /// The named player is trapped against the ropes.
    Cornered(Player),
}

impl Distance {
    /// Whether the given player is the one trapped in a corner.
    pub fn is_cornered(&self, player: Player) -> bool {
        matches!(self, Distance::Cornered(p) if *p == player)
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Far => "far",
            Distance::Close => "close",
            Distance::Cornered(_) => "cornered",
        }
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
