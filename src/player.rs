use crate::combatant::Combatant;
use crate::errors::BattleStateError;
use serde::{Deserialize, Serialize};

/// Number of combatants on each side.
pub const TEAM_SIZE: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // Index into the active combatant's move list.
    UseMove { move_index: usize },

    // Index into the player's team.
    SwitchMon { team_index: usize },

    UseItem { item: String, target_index: usize },

    Forfeit,
}

/// The two sides of a battle. Also used as the index into per-side arrays.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Cpu,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Cpu => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BattleSide {
    pub team: Vec<Combatant>,
    pub active_index: usize,
}

impl BattleSide {
    pub fn new(team: Vec<Combatant>) -> Self {
        Self {
            team,
            active_index: 0,
        }
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.team.get(self.active_index)
    }

    pub fn has_living(&self) -> bool {
        self.team.iter().any(|mon| !mon.is_fainted())
    }

    pub fn first_living(&self) -> Option<usize> {
        self.team.iter().position(|mon| !mon.is_fainted())
    }

    /// Living, non-active team members the side could switch to.
    pub fn switch_candidates(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(index, mon)| *index != self.active_index && !mon.is_fainted())
            .map(|(index, _)| index)
            .collect()
    }

    /// Change the active index. Never reorders the team.
    pub fn switch_to(&mut self, new_index: usize, side: Side) -> Result<(), BattleStateError> {
        match self.team.get(new_index) {
            Some(mon) if !mon.is_fainted() => {
                self.active_index = new_index;
                Ok(())
            }
            Some(_) => Err(BattleStateError::InconsistentState(format!(
                "{:?} tried to switch to fainted team member {}",
                side, new_index
            ))),
            None => Err(BattleStateError::InvalidTeamIndex {
                side,
                index: new_index,
            }),
        }
    }
}
