//! `kitshelf-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory
//! model and the store (no IO, no persistence concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ItemId, LocationId};
