//! In-match mutable state: per-fighter resources and the round counter

use super::distance::{Distance, Player};
use super::fighter::StatSheet;

/// Upper bound for stamina; health is bounded by the profile's max_health.
pub const STAMINA_MAX: f64 = 100.0;

/// One fighter's in-match resources, distinct from the profile's
/// permanent maximums.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterState {
    pub health: f64,
    pub stamina: f64,
}

impl FighterState {
    /// Full health and stamina for the opening bell.
    pub fn fresh(sheet: &StatSheet) -> Self {
        Self {
            health: sheet.max_health,
            stamina: STAMINA_MAX,
        }
    }

    /// Clamp health to `[0, max_health]` and stamina to `[0, 100]`.
    pub fn clamp(&mut self, sheet: &StatSheet) {
        self.health = self.health.clamp(0.0, sheet.max_health);
        self.stamina = self.stamina.clamp(0.0, STAMINA_MAX);
    }

    /// A fighter is down once health or stamina bottoms out.
    pub fn is_down(&self) -> bool {
        self.health <= 0.0 || self.stamina <= 0.0
    }
}

/// The mutable state one round of resolution operates on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// Current round number, starting at 1.
    pub round: u32,
    pub distance: Distance,
    fighters: [FighterState; 2],
}

impl RoundState {
    /// Opening state: round 1, far apart, both fighters fresh.
    pub fn opening(sheets: [&StatSheet; 2]) -> Self {
        Self {
            round: 1,
            distance: Distance::Far,
            fighters: [FighterState::fresh(sheets[0]), FighterState::fresh(sheets[1])],
        }
    }

    pub fn fighter(&self, player: Player) -> &FighterState {
        &self.fighters[player.index()]
    }

    pub fn fighter_mut(&mut self, player: Player) -> &mut FighterState {
        &mut self.fighters[player.index()]
    }

    /// Players currently down, in slot order.
    pub fn downed(&self) -> Vec<Player> {
        Player::both()
            .into_iter()
            .filter(|p| self.fighter(*p).is_down())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fighter::Archetype;

    #[test]
    fn test_opening_state() {
        let sheet = Archetype::Swarmer.stat_sheet();
        let state = RoundState::opening([&sheet, &sheet]);
        assert_eq!(state.round, 1);
        assert_eq!(state.distance, Distance::Far);
        assert_eq!(state.fighter(Player::P1).health, 195.0);
        assert_eq!(state.fighter(Player::P2).stamina, STAMINA_MAX);
        assert!(state.downed().is_empty());
    }

    #[test]
    fn test_clamp_bounds() {
        let sheet = Archetype::CounterPuncher.stat_sheet();
        let mut fighter = FighterState {
            health: -12.0,
            stamina: 180.0,
        };
        fighter.clamp(&sheet);
        assert_eq!(fighter.health, 0.0);
        assert_eq!(fighter.stamina, STAMINA_MAX);

        let mut fighter = FighterState {
            health: 9_000.0,
            stamina: -3.0,
        };
        fighter.clamp(&sheet);
        assert_eq!(fighter.health, sheet.max_health);
        assert_eq!(fighter.stamina, 0.0);
    }

    #[test]
    fn test_down_on_either_resource() {
        let up = FighterState {
            health: 10.0,
            stamina: 10.0,
        };
        assert!(!up.is_down());
        let hurt = FighterState {
            health: 0.0,
            stamina: 50.0,
        };
        assert!(hurt.is_down());
        let gassed = FighterState {
            health: 50.0,
            stamina: 0.0,
        };
        assert!(gassed.is_down());
    }
}
