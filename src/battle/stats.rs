//! Damage formula and the probability checks used by move resolution.

use crate::battle::rng::RandomSource;
use crate::combatant::Combatant;
use schema::{Effectiveness, MonType, TypeChart};

/// Lower bound of the random damage spread; the upper bound is 1.0.
pub const MIN_RANDOM_FACTOR: f64 = 0.85;
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Type effectiveness of an attack type against a combatant's current types.
pub fn effectiveness(
    chart: &TypeChart,
    attack_type: MonType,
    defender: &Combatant,
) -> Effectiveness {
    chart.effectiveness(attack_type, &defender.types)
}

pub fn base_damage(power: u16, attack: u16, defense: u16) -> f64 {
    (power as f64 * (attack as f64 / defense.max(1) as f64)) / 5.0 + 2.0
}

/// Damage for one hit, flooring after each multiplier.
pub fn calculate_damage(
    power: u16,
    attack: u16,
    defense: u16,
    random_factor: f64,
    multiplier: f64,
    is_crit: bool,
) -> u16 {
    let base = base_damage(power, attack, defense);
    let mut damage = (base * random_factor).floor();
    damage = (damage * multiplier).floor();
    if is_crit {
        damage = (damage * CRIT_MULTIPLIER).floor();
    }
    damage as u16
}

/// Maps a uniform draw onto the `[0.85, 1.0]` damage spread.
pub fn random_factor(draw: f64) -> f64 {
    MIN_RANDOM_FACTOR + (1.0 - MIN_RANDOM_FACTOR) * draw
}

pub fn move_hits(accuracy: f64, rng: &mut dyn RandomSource) -> bool {
    rng.next() < accuracy
}

/// Moves without a crit chance never draw.
pub fn move_is_critical_hit(crit_chance: Option<f64>, rng: &mut dyn RandomSource) -> bool {
    match crit_chance {
        Some(chance) if chance > 0.0 => rng.next() < chance,
        _ => false,
    }
}
