//! Decision policies: the CPU opponent and the player's auto-battle.

use crate::battle::rng::RandomSource;
use crate::battle::state::{BattleSession, GamePhase};
use crate::combatant::Combatant;
use crate::player::{BattleSide, PlayerAction, Side};
use ordered_float::OrderedFloat;
use schema::TypeChart;

/// A trait for any system that can decide on a battle action.
pub trait Behavior {
    /// Inspects the session and decides on the next action for `side`.
    ///
    /// Returns `None` when the side has nothing it can do.
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        rng: &mut dyn RandomSource,
    ) -> Option<PlayerAction>;
}

/// The CPU opponent: a uniformly random move among those with uses left.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMoveAI;

impl Behavior for RandomMoveAI {
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        rng: &mut dyn RandomSource,
    ) -> Option<PlayerAction> {
        let usable = session.active(side)?.usable_moves();
        if usable.is_empty() {
            return None;
        }
        let move_index = usable[rng.next_index(usable.len())];
        Some(PlayerAction::UseMove { move_index })
    }
}

/// Replacement after a faint: the first living member in team order.
pub fn choose_replacement(side: &BattleSide) -> Option<usize> {
    side.first_living()
}

/// Deterministic policy that plays on the player's behalf while auto-battle is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoBattleAI;

impl AutoBattleAI {
    pub fn new() -> Self {
        Self
    }

    /// Super-effective moves win over the rest; within a group the highest power wins and ties
    /// go to loadout order.
    ///
    /// A sleeping or stunned combatant always picks its first move, since the action is going
    /// to be blocked anyway.
    pub fn choose_move(
        &self,
        attacker: &Combatant,
        defender: &Combatant,
        chart: &TypeChart,
    ) -> Option<usize> {
        if attacker.blocking_status().is_some() {
            return Some(0);
        }

        let usable = attacker.usable_moves();
        let super_effective: Vec<usize> = usable
            .iter()
            .copied()
            .filter(|&index| {
                chart
                    .effectiveness(attacker.moves[index].template.move_type, &defender.types)
                    .is_super_effective()
            })
            .collect();

        let pool = if super_effective.is_empty() {
            &usable
        } else {
            &super_effective
        };
        // `max_by_key` keeps the last maximum, so walk the pool backwards.
        pool.iter()
            .rev()
            .copied()
            .max_by_key(|&index| attacker.moves[index].template.power)
    }

    /// How well `candidate` would fare against `opponent`.
    ///
    /// Adds the multiplier of every candidate move that is super effective, +2 for each opponent
    /// type the candidate resists and -2 for each opponent type it is weak to.
    pub fn score_switch_candidate(
        &self,
        candidate: &Combatant,
        opponent: &Combatant,
        chart: &TypeChart,
    ) -> f64 {
        let offense: f64 = candidate
            .moves
            .iter()
            .map(|slot| {
                chart
                    .effectiveness(slot.template.move_type, &opponent.types)
                    .multiplier
            })
            .filter(|&multiplier| multiplier > 1.0)
            .sum();

        let defense: f64 = opponent
            .types
            .iter()
            .map(|&attack_type| chart.effectiveness(attack_type, &candidate.types).multiplier)
            .map(|multiplier| {
                if multiplier < 1.0 {
                    2.0
                } else if multiplier > 1.0 {
                    -2.0
                } else {
                    0.0
                }
            })
            .sum();

        offense + defense
    }

    /// Best positively-scored living member, else the first living one that isn't active.
    pub fn choose_switch(
        &self,
        side: &BattleSide,
        opponent: &Combatant,
        chart: &TypeChart,
    ) -> Option<usize> {
        let candidates = side.switch_candidates();
        let best = candidates
            .iter()
            .rev()
            .copied()
            .map(|index| {
                let score = self.score_switch_candidate(&side.team[index], opponent, chart);
                (index, score)
            })
            .filter(|&(_, score)| score > 0.0)
            .max_by_key(|&(_, score)| OrderedFloat(score))
            .map(|(index, _)| index);

        best.or_else(|| candidates.first().copied())
    }
}

impl Behavior for AutoBattleAI {
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        _rng: &mut dyn RandomSource,
    ) -> Option<PlayerAction> {
        let own = session.side(side);
        let opponent = session.active(side.opponent())?;

        match session.phase {
            GamePhase::ForcedSwitch => self
                .choose_switch(own, opponent, &session.type_chart)
                .map(|team_index| PlayerAction::SwitchMon { team_index }),
            GamePhase::Fight => self
                .choose_move(own.active()?, opponent, &session.type_chart)
                .map(|move_index| PlayerAction::UseMove { move_index }),
            _ => None,
        }
    }
}
