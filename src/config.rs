//! Runtime configuration, loaded from RON.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../data/config.ron");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// When the player's active mon faints to its own burn or poison before
    /// the CPU has acted, end the round there instead of letting the CPU act
    /// after the forced switch.
    pub status_faint_ends_round: bool,
    /// Item name and quantity the player starts each battle with.
    pub starting_inventory: Vec<(String, u32)>,
    pub pacing: PacingConfig,
    /// Fixed seed for the random source; `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// How long a presentation layer dwells on events. Never consulted by resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub event_ms: u64,
    pub faint_ms: u64,
    pub auto_battle_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            event_ms: 600,
            faint_ms: 1500,
            auto_battle_interval_ms: 1500,
        }
    }
}

impl PacingConfig {
    pub fn event_delay(&self) -> Duration {
        Duration::from_millis(self.event_ms)
    }

    pub fn faint_delay(&self) -> Duration {
        Duration::from_millis(self.faint_ms)
    }

    pub fn auto_battle_interval(&self) -> Duration {
        Duration::from_millis(self.auto_battle_interval_ms)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            status_faint_ends_round: true,
            starting_inventory: vec![
                ("Code Snippet".to_string(), 5),
                ("API Key".to_string(), 3),
                ("Server Patch".to_string(), 1),
                ("System Restore".to_string(), 1),
                ("Debugger".to_string(), 2),
            ],
            pacing: PacingConfig::default(),
            seed: None,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The configuration shipped in `data/config.ron`.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_ron_str(DEFAULT_CONFIG)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundled_config_matches_default() {
        let bundled = BattleConfig::bundled().expect("bundled config should parse");
        assert_eq!(bundled, BattleConfig::default());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = BattleConfig::from_ron_str("(status_faint_ends_round: false)")
            .expect("partial config should parse");
        assert!(!config.status_faint_ends_round);
        assert_eq!(config.pacing, PacingConfig::default());
        assert_eq!(config.starting_inventory.len(), 5);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = BattleConfig::from_ron_str("(status_faint_ends_round: maybe)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = BattleConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
