//! Stand-up formulas for a downed fighter

use crate::dice::Dice;
use crate::types::{FighterState, StatSheet, STAMINA_MAX};

/// A fighter who beats the count never rises below this fraction of max health.
pub const STAND_HEALTH_FLOOR: f64 = 0.2;
/// Stamina restored on rising, capped at [`STAMINA_MAX`].
pub const STAND_STAMINA_BONUS: f64 = 40.0;

/// Probability of beating the count: `min(0.8, 0.4 x will)`.
pub fn stand_chance(sheet: &StatSheet) -> f64 {
    (0.4 * sheet.will).min(0.8)
}

/// Roll the single stand-up attempt.
///
/// On success the fighter's health is floored to 20% of max (never reduced)
/// and stamina recovers by 40, capped. On failure nothing changes; the match
/// goes to termination.
pub fn attempt_stand(fighter: &mut FighterState, sheet: &StatSheet, dice: &mut dyn Dice) -> bool {
    if dice.roll() < stand_chance(sheet) {
        fighter.health = fighter.health.max(STAND_HEALTH_FLOOR * sheet.max_health);
        fighter.stamina = (fighter.stamina + STAND_STAMINA_BONUS).min(STAMINA_MAX);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SequenceDice;
    use crate::types::Archetype;

    #[test]
    fn test_stand_chance_capped() {
        // Swarmer will 1.5 -> 0.6; a will of 2.5 would cap at 0.8
        assert!((stand_chance(&Archetype::Swarmer.stat_sheet()) - 0.6).abs() < 1e-12);
        let mut iron = Archetype::Swarmer.stat_sheet();
        iron.will = 2.5;
        assert_eq!(stand_chance(&iron), 0.8);
    }

    #[test]
    fn test_rising_floors_health_and_restores_stamina() {
        let sheet = Archetype::Swarmer.stat_sheet();
        let mut fighter = FighterState {
            health: 0.0,
            stamina: 12.0,
        };
        let mut dice = SequenceDice::new([0.0]);
        assert!(attempt_stand(&mut fighter, &sheet, &mut dice));
        assert_eq!(fighter.health, 0.2 * 195.0);
        assert_eq!(fighter.stamina, 52.0);
    }

    #[test]
    fn test_rising_never_reduces_health() {
        // Down on stamina, not health
        let sheet = Archetype::OutBoxer.stat_sheet();
        let mut fighter = FighterState {
            health: 250.0,
            stamina: 0.0,
        };
        let mut dice = SequenceDice::new([0.0]);
        assert!(attempt_stand(&mut fighter, &sheet, &mut dice));
        assert_eq!(fighter.health, 250.0);
        assert_eq!(fighter.stamina, 40.0);
    }

    #[test]
    fn test_failed_attempt_changes_nothing() {
        let sheet = Archetype::CounterPuncher.stat_sheet();
        let mut fighter = FighterState {
            health: 0.0,
            stamina: 5.0,
        };
        // will 1.0 -> chance 0.4
        let mut dice = SequenceDice::new([0.5]);
        assert!(!attempt_stand(&mut fighter, &sheet, &mut dice));
        assert_eq!(fighter.health, 0.0);
        assert_eq!(fighter.stamina, 5.0);
    }
}
