use crate::battle::state::GamePhase;
use crate::player::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the portfolio-mon battle engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleEngineError {
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// An action the player is not allowed to take right now.
///
/// Display text is what the player sees in the battle log.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionError {
    #[error("A turn is already being resolved.")]
    TurnInProgress,

    #[error("It's not your turn!")]
    NotPlayerTurn,

    #[error("That can't be done during {0}.")]
    WrongPhase(GamePhase),

    #[error("You must choose a Project to send out!")]
    SwitchRequired,

    #[error("That move doesn't exist!")]
    InvalidMoveIndex(usize),

    #[error("There's no PP left for {move_name}!")]
    NoUsesLeft { move_name: String },

    #[error("There's no Project in slot {0}!")]
    InvalidTeamIndex(usize),

    #[error("{mon} has fainted and can't battle!")]
    SwitchTargetFainted { mon: String },

    #[error("{mon} is already in battle!")]
    SwitchTargetActive { mon: String },

    #[error("There's no item called {item}!")]
    UnknownItem { item: String },

    #[error("You're out of {item}!")]
    ItemDepleted { item: String },

    #[error("{mon}'s HP is already full!")]
    HpAlreadyFull { mon: String },

    #[error("{mon} has no status condition!")]
    NoStatusToCure { mon: String },

    #[error("{mon} has fainted and can't use items!")]
    ItemTargetFainted { mon: String },

    #[error("Choose exactly 3 Projects to continue! ({selected} selected)")]
    InvalidTeamSize { selected: usize },

    #[error("There's no Project with id {0}!")]
    UnknownMon(u32),

    #[error("{mon} is already on your team!")]
    DuplicateMon { mon: String },

    #[error("Your team is already full!")]
    TeamFull,
}

impl ActionError {
    /// Whether the rejection is echoed into the battle log.
    pub fn is_logged(&self) -> bool {
        !matches!(self, ActionError::TurnInProgress | ActionError::NotPlayerTurn)
    }
}

/// Invariant violations found while applying commands. These indicate a bug in the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleStateError {
    #[error("{0:?} has no team")]
    EmptyTeam(Side),

    #[error("{side:?} has no team member at index {index}")]
    InvalidTeamIndex { side: Side, index: usize },

    #[error("{side:?} team member {index} has no move at index {move_index}")]
    InvalidMoveIndex {
        side: Side,
        index: usize,
        move_index: usize,
    },

    #[error("Inventory has no entry for {0}")]
    MissingInventoryEntry(String),

    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
}

/// Errors in the static catalog data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Failed to parse {source_name}: {message}")]
    Parse {
        source_name: &'static str,
        message: String,
    },

    #[error("Duplicate mon id {0}")]
    DuplicateMon(u32),

    #[error("Mon not found: {0}")]
    MonNotFound(u32),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Malformed catalog data: {0}")]
    MalformedData(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
