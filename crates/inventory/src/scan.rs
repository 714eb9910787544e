//! Barcode scan workflow: debounce raw scanner events and decide what a
//! scanned code means for the current screen.

use kitshelf_core::{Entity, ItemId};

use crate::state::InventoryState;

/// Lets exactly one scan through until it is explicitly re-armed.
///
/// Camera scanners fire the same code many times per second; the first one
/// wins and the rest are dropped until the user dismisses the result.
#[derive(Debug, Default)]
pub struct ScanGate {
    scanned: bool,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload if the gate is open, closing it.
    pub fn accept<'a>(&mut self, payload: &'a str) -> Option<&'a str> {
        if self.scanned {
            return None;
        }
        self.scanned = true;
        Some(payload)
    }

    pub fn is_armed(&self) -> bool {
        !self.scanned
    }

    /// Re-arm after the user dismissed the previous result.
    pub fn reset(&mut self) {
        self.scanned = false;
    }
}

/// Which screen asked for the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPurpose {
    /// General lookup (also used by the add-item flow).
    Lookup,
    /// Picking an item to lend.
    Lend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Lookup hit: show the item.
    KnownItem(ItemId),
    /// Lookup miss: offer to add a new item with this barcode.
    NewItem { barcode: String },
    /// Lend hit on an available item.
    ReadyToLend(ItemId),
    /// Lend hit on an item that is out with someone.
    AlreadyLent {
        item_id: ItemId,
        name: String,
        borrower: String,
    },
    /// Lend miss.
    NotFound { barcode: String },
}

/// Interpret a scanned barcode. Matching is exact and takes the first item
/// with that barcode.
pub fn resolve_scan(state: &InventoryState, barcode: &str, purpose: ScanPurpose) -> ScanOutcome {
    let found = state.get_item_by_barcode(barcode);
    tracing::debug!(barcode, ?purpose, found = found.is_some(), "resolving scan");

    match (purpose, found) {
        (ScanPurpose::Lookup, Some(item)) => ScanOutcome::KnownItem(item.id().clone()),
        (ScanPurpose::Lookup, None) => ScanOutcome::NewItem {
            barcode: barcode.to_string(),
        },
        (ScanPurpose::Lend, Some(item)) => match item.lending_info() {
            Some(info) => ScanOutcome::AlreadyLent {
                item_id: item.id().clone(),
                name: item.name.clone(),
                borrower: info.borrower.clone(),
            },
            None => ScanOutcome::ReadyToLend(item.id().clone()),
        },
        (ScanPurpose::Lend, None) => ScanOutcome::NotFound {
            barcode: barcode.to_string(),
        },
    }
}
