use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum MonType {
    #[serde(rename = "AI")]
    #[strum(serialize = "AI")]
    Ai,
    Data,
    Web,
    Design,
    Hardware,
    Health,
    Mobile,
    Game,
}

/// One non-neutral cell of the type chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMatchup {
    pub attacker: MonType,
    pub defender: MonType,
    pub multiplier: f64,
}

/// Attacker-type x defender-type multiplier lookup. Pairs that are not listed are neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeMatchup>", into = "Vec<TypeMatchup>")]
pub struct TypeChart {
    cells: HashMap<(MonType, MonType), f64>,
}

impl From<Vec<TypeMatchup>> for TypeChart {
    fn from(matchups: Vec<TypeMatchup>) -> Self {
        let cells = matchups
            .into_iter()
            .map(|m| ((m.attacker, m.defender), m.multiplier))
            .collect();
        Self { cells }
    }
}

impl From<TypeChart> for Vec<TypeMatchup> {
    fn from(chart: TypeChart) -> Self {
        let mut matchups: Vec<TypeMatchup> = chart
            .cells
            .into_iter()
            .map(|((attacker, defender), multiplier)| TypeMatchup {
                attacker,
                defender,
                multiplier,
            })
            .collect();
        matchups.sort_by_key(|m| (m.attacker, m.defender));
        matchups
    }
}

impl TypeChart {
    /// Single-cell lookup; absent entries are neutral.
    pub fn multiplier(&self, attacking: MonType, defending: MonType) -> f64 {
        self.cells
            .get(&(attacking, defending))
            .copied()
            .unwrap_or(1.0)
    }

    /// Composite multiplier of an attack type against a one- or two-typed defender.
    pub fn effectiveness(&self, attacking: MonType, defender_types: &[MonType]) -> Effectiveness {
        let multiplier = defender_types
            .iter()
            .map(|&defending| self.multiplier(attacking, defending))
            .product();
        Effectiveness { multiplier }
    }

    pub fn matchups(&self) -> impl Iterator<Item = TypeMatchup> + '_ {
        self.cells
            .iter()
            .map(|(&(attacker, defender), &multiplier)| TypeMatchup {
                attacker,
                defender,
                multiplier,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effectiveness {
    pub multiplier: f64,
}

impl Effectiveness {
    pub fn is_super_effective(&self) -> bool {
        self.multiplier > 1.0
    }

    pub fn is_not_very_effective(&self) -> bool {
        self.multiplier > 0.0 && self.multiplier < 1.0
    }

    pub fn is_immune(&self) -> bool {
        self.multiplier == 0.0
    }

    /// Battle-log text for this matchup, `None` when neutral.
    pub fn message(&self) -> Option<&'static str> {
        if self.is_super_effective() {
            Some("It's super effective!")
        } else if self.is_not_very_effective() {
            Some("It's not very effective...")
        } else if self.is_immune() {
            Some("It had no effect...")
        } else {
            None
        }
    }
}
