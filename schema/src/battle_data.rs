use crate::MonType;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Persistent status conditions a move can inflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Burn,
    Poison,
    Sleep,
    Stun,
}

impl StatusKind {
    /// Turns a freshly applied status lasts.
    pub fn initial_turns(self) -> u8 {
        match self {
            StatusKind::Sleep | StatusKind::Stun => 3,
            StatusKind::Burn | StatusKind::Poison => 4,
        }
    }

    /// Sleep and stun skip the holder's action instead of dealing damage.
    pub fn blocks_action(self) -> bool {
        matches!(self, StatusKind::Sleep | StatusKind::Stun)
    }

    /// Fraction of max HP lost per tick, as a divisor.
    pub fn tick_divisor(self) -> Option<u16> {
        match self {
            StatusKind::Burn => Some(16),
            StatusKind::Poison => Some(8),
            StatusKind::Sleep | StatusKind::Stun => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    pub kind: StatusKind,
    pub chance: f64,
}

/// Immutable move definition shared by every combatant that knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTemplate {
    pub name: String,
    pub power: u16,
    pub move_type: MonType,
    pub accuracy: f64,
    pub max_uses: u8,
    #[serde(default)]
    pub crit_chance: Option<f64>,
    #[serde(default)]
    pub effect: Option<SecondaryEffect>,
    #[serde(default)]
    pub description: String,
}

impl MoveTemplate {
    pub fn is_damaging(&self) -> bool {
        self.power > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal { amount: u16 },
    CureStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effect: ItemEffect,
}
