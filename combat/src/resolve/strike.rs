//! Action phase: strikes, defensive stances and resting
//!
//! One parameterized pass per player, applied P1 then P2, so the formulas
//! exist exactly once and are symmetric by construction.

use super::events::RoundEvent;
use crate::dice::Dice;
use crate::types::{Action, Player, RoundState, StatSheet, StrikeProfile, STAMINA_MAX};

const DODGE_COST: f64 = 10.0;
const BLOCK_COST: f64 = 5.0;
const REST_RECOVERY: f64 = 30.0;

const HIT_CHANCE_CAP: f64 = 0.95;
const DEFENSE_CHANCE_CAP: f64 = 0.8;
const CORNERED_HIT_BONUS: f64 = 1.1;
const CORNERED_DAMAGE_BONUS: f64 = 1.5;
const HOOK_BLOCK_PENALTY: f64 = 1.5;

/// Resolve one player's non-movement action.
///
/// Strikes roll against the opponent's chosen defence; stance costs (and the
/// rest recovery) are charged here, in the owner's own turn, exactly once.
pub(crate) fn resolve(
    state: &mut RoundState,
    attacker: Player,
    actions: [Action; 2],
    sheets: [&StatSheet; 2],
    dice: &mut dyn Dice,
    events: &mut Vec<RoundEvent>,
) {
    let action = actions[attacker.index()];
    let sheet = sheets[attacker.index()];

    if let Some(profile) = action.strike() {
        state.fighter_mut(attacker).stamina -= profile.stamina_cost;
        let defender = attacker.other();
        resolve_strike(
            state,
            attacker,
            action,
            profile,
            actions[defender.index()],
            sheet,
            sheets[defender.index()],
            dice,
            events,
        );
        return;
    }

    match action {
        Action::Dodge => {
            state.fighter_mut(attacker).stamina -= DODGE_COST;
            events.push(RoundEvent::Weaved { player: attacker });
        }
        Action::Block => {
            state.fighter_mut(attacker).stamina -= BLOCK_COST;
            events.push(RoundEvent::Braced { player: attacker });
        }
        Action::Rest => {
            let fighter = state.fighter_mut(attacker);
            fighter.stamina = (fighter.stamina + REST_RECOVERY * sheet.stamina_rate).min(STAMINA_MAX);
            events.push(RoundEvent::Rested { player: attacker });
        }
        // Movement was handled in the movement phase
        _ => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_strike(
    state: &mut RoundState,
    attacker: Player,
    strike: Action,
    profile: StrikeProfile,
    defense: Action,
    atk: &StatSheet,
    def: &StatSheet,
    dice: &mut dyn Dice,
    events: &mut Vec<RoundEvent>,
) {
    let defender = attacker.other();
    let cornered = state.distance.is_cornered(defender);
    let unblocked = clean_damage(strike, &profile, atk);

    match defense {
        Action::Block => {
            let health_fraction = state.fighter(defender).health / def.max_health;
            let block_chance = (0.4 * def.strength * health_fraction).min(DEFENSE_CHANCE_CAP);
            let penalty = if strike == Action::Hook { HOOK_BLOCK_PENALTY } else { 1.0 };
            if dice.roll() < block_chance {
                let damage = 0.05 * unblocked * penalty;
                apply_damage(state, defender, damage);
                events.push(RoundEvent::Blocked { attacker, strike, damage });
            } else {
                let mut damage = 0.5 * unblocked * penalty;
                if strike == Action::Uppercut {
                    damage *= 2.0;
                }
                if cornered {
                    damage *= CORNERED_DAMAGE_BONUS;
                }
                apply_damage(state, defender, damage);
                events.push(RoundEvent::BlockBroken { attacker, strike, damage });
            }
        }
        Action::Dodge => {
            let dodge_chance = (0.4 * def.reaction * def.punch_speed).min(DEFENSE_CHANCE_CAP);
            if dice.roll() < dodge_chance {
                events.push(RoundEvent::Dodged { attacker, strike });
            } else {
                let mut damage = unblocked;
                if cornered {
                    damage *= CORNERED_DAMAGE_BONUS;
                }
                apply_damage(state, defender, damage);
                events.push(RoundEvent::CaughtDodging { attacker, strike, damage });
            }
        }
        _ => {
            let mut chance = hit_chance(strike, &profile, atk);
            if cornered {
                chance *= CORNERED_HIT_BONUS;
            }
            if dice.roll() < chance {
                let mut damage = unblocked;
                if matches!(strike, Action::Hook | Action::Uppercut) && defense == Action::Rest {
                    damage *= 2.0;
                }
                if cornered {
                    damage *= CORNERED_DAMAGE_BONUS;
                }
                if defense == Action::MoveAway {
                    damage /= 4.0;
                    apply_damage(state, defender, damage);
                    events.push(RoundEvent::CaughtRetreating { attacker, strike, damage });
                } else {
                    apply_damage(state, defender, damage);
                    events.push(RoundEvent::Landed { attacker, strike, damage });
                }
            } else {
                events.push(RoundEvent::Missed { attacker, strike });
            }
        }
    }
}

/// Damage before any defensive or positional modifier: the jab scales with
/// hand speed, the power strikes with strength.
fn clean_damage(strike: Action, profile: &StrikeProfile, atk: &StatSheet) -> f64 {
    match strike {
        Action::Jab => profile.base_damage * atk.punch_speed,
        _ => profile.base_damage * atk.strength,
    }
}

fn hit_chance(strike: Action, profile: &StrikeProfile, atk: &StatSheet) -> f64 {
    let raw = match strike {
        Action::Jab => 0.75 * atk.reaction * atk.punch_speed / 1.7,
        _ => profile.base_hit_chance * atk.punch_speed * atk.strength / 1.7,
    };
    raw.min(HIT_CHANCE_CAP)
}

/// Every point of damage also drains a tenth of a point of stamina.
fn apply_damage(state: &mut RoundState, victim: Player, damage: f64) {
    let fighter = state.fighter_mut(victim);
    fighter.health -= damage;
    fighter.stamina -= damage / 10.0;
}
