//! Persisted snapshot document.
//!
//! ```text
//! {"state": {"items": [...], "categories": [...], "locations": [...]}, "version": 0}
//! ```

use serde::{Deserialize, Serialize};

use kitshelf_inventory::InventoryState;

use crate::error::SnapshotError;

/// Version written by this build. Documents with a higher version are refused.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a InventoryState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: serde_json::Value,
    #[serde(default)]
    version: u32,
}

pub fn encode(state: &InventoryState) -> Result<String, SnapshotError> {
    serde_json::to_string(&EnvelopeRef {
        state,
        version: SNAPSHOT_VERSION,
    })
    .map_err(SnapshotError::Encode)
}

pub fn decode(raw: &str) -> Result<InventoryState, SnapshotError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(SnapshotError::Decode)?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    serde_json::from_value(envelope.state).map_err(SnapshotError::Decode)
}
