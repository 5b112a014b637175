//! Static, read-only game data: the project roster, the type chart, and items.

use crate::errors::{CatalogError, CatalogResult};
use schema::{ItemDefinition, MonTemplate, TypeChart};
use std::collections::HashSet;
use std::sync::LazyLock;

const MONS_RON: &str = include_str!("../data/mons.ron");
const TYPE_CHART_RON: &str = include_str!("../data/type_chart.ron");
const ITEMS_RON: &str = include_str!("../data/items.ron");

static STANDARD_CATALOG: LazyLock<CatalogResult<Catalog>> =
    LazyLock::new(|| Catalog::from_ron_strs(MONS_RON, TYPE_CHART_RON, ITEMS_RON));

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    mons: Vec<MonTemplate>,
    type_chart: TypeChart,
    items: Vec<ItemDefinition>,
}

impl Catalog {
    /// The catalog bundled under `data/`, parsed once per process.
    pub fn standard() -> CatalogResult<&'static Catalog> {
        STANDARD_CATALOG.as_ref().map_err(Clone::clone)
    }

    pub fn new(
        mons: Vec<MonTemplate>,
        type_chart: TypeChart,
        items: Vec<ItemDefinition>,
    ) -> CatalogResult<Self> {
        let catalog = Self {
            mons,
            type_chart,
            items,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_ron_strs(mons: &str, type_chart: &str, items: &str) -> CatalogResult<Self> {
        let mons: Vec<MonTemplate> = parse("mons", mons)?;
        let type_chart: TypeChart = parse("type chart", type_chart)?;
        let items: Vec<ItemDefinition> = parse("items", items)?;
        Self::new(mons, type_chart, items)
    }

    pub fn mons(&self) -> &[MonTemplate] {
        &self.mons
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    pub fn mon(&self, id: u32) -> CatalogResult<&MonTemplate> {
        self.mons
            .iter()
            .find(|mon| mon.id == id)
            .ok_or(CatalogError::MonNotFound(id))
    }

    pub fn item(&self, name: &str) -> CatalogResult<&ItemDefinition> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| CatalogError::ItemNotFound(name.to_string()))
    }

    fn validate(&self) -> CatalogResult<()> {
        let mut seen = HashSet::new();
        for mon in &self.mons {
            if !seen.insert(mon.id) {
                return Err(CatalogError::DuplicateMon(mon.id));
            }
            if mon.types.is_empty() || mon.types.len() > 2 {
                return Err(CatalogError::MalformedData(format!(
                    "{} must have one or two types, found {}",
                    mon.name,
                    mon.types.len()
                )));
            }
            if mon.moves.is_empty() {
                return Err(CatalogError::MalformedData(format!(
                    "{} has no moves",
                    mon.name
                )));
            }
            if mon.stats.hp == 0 || mon.stats.def == 0 {
                return Err(CatalogError::MalformedData(format!(
                    "{} needs non-zero hp and def",
                    mon.name
                )));
            }
            for move_ in &mon.moves {
                let chances = [
                    Some(move_.accuracy),
                    move_.crit_chance,
                    move_.effect.map(|effect| effect.chance),
                ];
                if chances
                    .iter()
                    .flatten()
                    .any(|chance| !(0.0..=1.0).contains(chance))
                {
                    return Err(CatalogError::MalformedData(format!(
                        "{}'s {} has a probability outside 0..=1",
                        mon.name, move_.name
                    )));
                }
            }
        }

        if self.type_chart.matchups().any(|m| m.multiplier < 0.0) {
            return Err(CatalogError::MalformedData(
                "type chart contains a negative multiplier".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    source_name: &'static str,
    text: &str,
) -> CatalogResult<T> {
    ron::from_str(text).map_err(|e| CatalogError::Parse {
        source_name,
        message: e.to_string(),
    })
}
