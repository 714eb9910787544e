//! Process-wide logging setup for hosts embedding the inventory store.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! host's call, once, at startup.

pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};

/// Initialize logging with defaults (JSON, `info`, overridable via `RUST_LOG`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&LogConfig::default());
}
