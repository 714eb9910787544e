//! Inventory domain module.
//!
//! Items, lending, categories and locations, implemented purely as
//! deterministic domain logic (no IO, no storage). The store crate wraps
//! [`InventoryState`] with persistence and change notifications.

pub mod event;
pub mod item;
pub mod query;
pub mod scan;
pub mod state;
pub mod taxonomy;
pub mod validation;

pub use event::InventoryEvent;
pub use item::{Item, LendingInfo, LoanTerms};
pub use query::InventorySummary;
pub use scan::{ScanGate, ScanOutcome, ScanPurpose, resolve_scan};
pub use state::InventoryState;
pub use taxonomy::{Category, Location, Named, default_categories, default_locations};
pub use validation::{ItemDraft, LendRequest, validate_taxonomy_name};
