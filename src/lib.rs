// In: src/lib.rs

//! Portfolio Mon Battle Engine
//!
//! A turn-based battle system where each combatant is a portfolio project. Resolution is
//! synchronous and deterministic under an injected random source; pacing and the auto-battle
//! timer live in an optional async driver.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod player;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Static data definitions.
pub use schema::{
    BaseStats, Effectiveness, ItemDefinition, ItemEffect, MonTemplate, MonType, MoveTemplate,
    SecondaryEffect, StatusKind, TypeChart,
};

// --- From this crate's modules (`src/`) ---

// Runner and driver: the two ways to play a battle.
pub use battle::driver::BattleDriver;
pub use battle::rng::{RandomSource, SeededRng, TurnRng};
pub use battle::runner::{BattleRunner, PlaybackMode, TurnResult};
pub use battle::state::{BattleEvent, BattleSession, GamePhase, Notification, Winner};

// Core runtime types for a battle.
pub use catalog::Catalog;
pub use combatant::{Combatant, StatusCondition};
pub use config::{BattleConfig, PacingConfig};
pub use inventory::Inventory;
pub use player::{PlayerAction, Side, TEAM_SIZE};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, CatalogError, CatalogResult,
    ConfigError,
};
