use crate::catalog::Catalog;
use crate::errors::CatalogResult;
use schema::ItemDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item: ItemDefinition,
    pub quantity: u32,
}

/// The player's items, keyed by item name. Quantities only go down during a battle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    entries: BTreeMap<String, InventoryEntry>,
}

impl Inventory {
    /// Builds an inventory from `(name, quantity)` pairs, resolving each name in the catalog.
    pub fn from_catalog(catalog: &Catalog, stock: &[(String, u32)]) -> CatalogResult<Self> {
        let mut entries = BTreeMap::new();
        for (name, quantity) in stock {
            let item = catalog.item(name)?.clone();
            entries.insert(
                name.clone(),
                InventoryEntry {
                    item,
                    quantity: *quantity,
                },
            );
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&InventoryEntry> {
        self.entries.get(name)
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.entries.get(name).map_or(0, |entry| entry.quantity)
    }

    /// Spend one of `name`. Returns false if none were left.
    pub fn consume(&mut self, name: &str) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) if entry.quantity > 0 => {
                entry.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }
}
