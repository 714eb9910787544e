//! Read-side helpers used by list, lend and settings screens.

use serde::Serialize;

use kitshelf_core::{Entity, ItemId};

use crate::item::Item;
use crate::state::InventoryState;
use crate::taxonomy::{Category, Location, find_by_name};

/// Counts shown on the inventory overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub lent_items: usize,
    pub available_items: usize,
    pub total_quantity: i64,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl InventoryState {
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items().iter().find(|i| i.id() == id)
    }

    /// Free-text search over name, barcode, category and location.
    ///
    /// An all-whitespace query matches everything. Otherwise the query is
    /// matched as typed, surrounding spaces included.
    pub fn search_items(&self, query: &str) -> Vec<&Item> {
        if query.trim().is_empty() {
            return self.items().iter().collect();
        }
        let query = query.to_lowercase();

        self.items()
            .iter()
            .filter(|i| {
                contains_ci(&i.name, &query)
                    || contains_ci(&i.barcode, &query)
                    || contains_ci(&i.category, &query)
                    || contains_ci(&i.location, &query)
            })
            .collect()
    }

    /// Items that can be lent right now, filtered on name, barcode or category.
    pub fn available_items(&self, query: &str) -> Vec<&Item> {
        let blank = query.trim().is_empty();
        let query = query.to_lowercase();

        self.items()
            .iter()
            .filter(|i| !i.is_lent())
            .filter(|i| {
                blank
                    || contains_ci(&i.name, &query)
                    || contains_ci(&i.barcode, &query)
                    || contains_ci(&i.category, &query)
            })
            .collect()
    }

    pub fn lent_items(&self) -> Vec<&Item> {
        self.items().iter().filter(|i| i.is_lent()).collect()
    }

    /// `total_quantity` saturates at the `i64` bounds.
    pub fn summary(&self) -> InventorySummary {
        let lent_items = self.items().iter().filter(|i| i.is_lent()).count();
        InventorySummary {
            total_items: self.items().len(),
            lent_items,
            available_items: self.items().len() - lent_items,
            total_quantity: self.items().iter().fold(0i64, |total, i| total.saturating_add(i.quantity)),
        }
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        find_by_name(self.categories(), name)
    }

    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        find_by_name(self.locations(), name)
    }
}
