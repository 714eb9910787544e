//! Change notifications emitted by state transitions.

use serde::{Deserialize, Serialize};

use kitshelf_core::{CategoryId, ItemId, LocationId};

/// One observable change to the inventory state.
///
/// Transitions that find nothing to change (unknown id) produce no event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ItemAdded { item_id: ItemId },
    ItemUpdated { item_id: ItemId },
    ItemRemoved { item_id: ItemId },
    ItemLent { item_id: ItemId, borrower: String },
    ItemReturned { item_id: ItemId },
    CategoryAdded { category_id: CategoryId },
    CategoryRemoved { category_id: CategoryId },
    LocationAdded { location_id: LocationId },
    LocationRemoved { location_id: LocationId },
    /// The whole state was replaced (defaults restored).
    Reset,
}

impl InventoryEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded { .. } => "inventory.item.added",
            InventoryEvent::ItemUpdated { .. } => "inventory.item.updated",
            InventoryEvent::ItemRemoved { .. } => "inventory.item.removed",
            InventoryEvent::ItemLent { .. } => "inventory.item.lent",
            InventoryEvent::ItemReturned { .. } => "inventory.item.returned",
            InventoryEvent::CategoryAdded { .. } => "inventory.category.added",
            InventoryEvent::CategoryRemoved { .. } => "inventory.category.removed",
            InventoryEvent::LocationAdded { .. } => "inventory.location.added",
            InventoryEvent::LocationRemoved { .. } => "inventory.location.removed",
            InventoryEvent::Reset => "inventory.reset",
        }
    }
}
