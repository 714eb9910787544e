//! In-memory inventory state and its transitions.
//!
//! Every transition is a pure function of the current state and its arguments
//! (the clock is passed in). A transition returns the [`InventoryEvent`]
//! describing what changed, or `None` when there was nothing to change
//! (unknown id). Persisting and notifying are the store's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitshelf_core::{CategoryId, Entity, ItemId, LocationId};

use crate::event::InventoryEvent;
use crate::item::{Item, LoanTerms};
use crate::taxonomy::{Category, Location, default_categories, default_locations};

/// The three collections, insertion-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default = "default_categories")]
    categories: Vec<Category>,
    #[serde(default = "default_locations")]
    locations: Vec<Location>,
}

impl Default for InventoryState {
    /// Fresh install: no items, seeded categories and locations.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            categories: default_categories(),
            locations: default_locations(),
        }
    }
}

impl InventoryState {
    pub fn from_parts(items: Vec<Item>, categories: Vec<Category>, locations: Vec<Location>) -> Self {
        Self {
            items,
            categories,
            locations,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Append an item. Duplicate barcodes are allowed.
    ///
    /// An item whose id is already present is ignored: ids stay unique.
    pub fn add_item(&mut self, item: Item) -> Option<InventoryEvent> {
        if self.items.iter().any(|i| i.id() == item.id()) {
            tracing::warn!(item_id = %item.id(), "ignoring item with duplicate id");
            return None;
        }
        let item_id = item.id().clone();
        self.items.push(item);
        Some(InventoryEvent::ItemAdded { item_id })
    }

    /// Replace the item with the same id. The stored creation timestamp is kept.
    pub fn update_item(&mut self, mut item: Item) -> Option<InventoryEvent> {
        let slot = self.items.iter_mut().find(|i| i.id() == item.id())?;
        item.keep_date_added_of(slot);
        let item_id = item.id().clone();
        *slot = item;
        Some(InventoryEvent::ItemUpdated { item_id })
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Option<InventoryEvent> {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        (self.items.len() != before).then(|| InventoryEvent::ItemRemoved { item_id: id.clone() })
    }

    /// Mark an item as lent, stamping `date_lent` with `now`.
    ///
    /// Lending an item that is already lent replaces the previous lending info.
    pub fn lend_item(&mut self, id: &ItemId, terms: LoanTerms, now: DateTime<Utc>) -> Option<InventoryEvent> {
        let item = self.item_mut(id)?;
        if item.is_lent() {
            tracing::debug!(item_id = %id, "re-lending item; previous lending info replaced");
        }
        let borrower = terms.borrower.clone();
        item.lend(terms.into_info(now));
        Some(InventoryEvent::ItemLent {
            item_id: id.clone(),
            borrower,
        })
    }

    /// Mark an item as available again and discard its lending info.
    pub fn return_item(&mut self, id: &ItemId) -> Option<InventoryEvent> {
        let item = self.item_mut(id)?;
        item.mark_returned();
        Some(InventoryEvent::ItemReturned { item_id: id.clone() })
    }

    /// Append a category. Name uniqueness is the caller's concern
    /// (see [`crate::validation::validate_taxonomy_name`]).
    pub fn add_category(&mut self, category: Category) -> Option<InventoryEvent> {
        if self.categories.iter().any(|c| c.id == category.id) {
            tracing::warn!(category_id = %category.id, "ignoring category with duplicate id");
            return None;
        }
        let category_id = category.id.clone();
        self.categories.push(category);
        Some(InventoryEvent::CategoryAdded { category_id })
    }

    /// Remove a category. Items naming it keep the stale name.
    pub fn remove_category(&mut self, id: &CategoryId) -> Option<InventoryEvent> {
        let before = self.categories.len();
        self.categories.retain(|c| &c.id != id);
        (self.categories.len() != before).then(|| InventoryEvent::CategoryRemoved { category_id: id.clone() })
    }

    pub fn add_location(&mut self, location: Location) -> Option<InventoryEvent> {
        if self.locations.iter().any(|l| l.id == location.id) {
            tracing::warn!(location_id = %location.id, "ignoring location with duplicate id");
            return None;
        }
        let location_id = location.id.clone();
        self.locations.push(location);
        Some(InventoryEvent::LocationAdded { location_id })
    }

    /// Remove a location. Items naming it keep the stale name.
    pub fn remove_location(&mut self, id: &LocationId) -> Option<InventoryEvent> {
        let before = self.locations.len();
        self.locations.retain(|l| &l.id != id);
        (self.locations.len() != before).then(|| InventoryEvent::LocationRemoved { location_id: id.clone() })
    }

    /// First item whose barcode equals `barcode` exactly.
    pub fn get_item_by_barcode(&self, barcode: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.barcode == barcode)
    }

    fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id() == id)
    }
}
