use crate::{MonType, MoveTemplate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spd: u16,
}

/// Catalog entry for one portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonTemplate {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub types: Vec<MonType>,
    pub stats: BaseStats,
    pub moves: Vec<MoveTemplate>,
}
