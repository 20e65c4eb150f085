//! Durable registry of known ADK servers.
//!
//! Provides:
//! - `JsonFileRegistry` - name → URL entries persisted as one JSON document
//! - `Listing` - explicit empty-result indicator for listings

pub mod store;

pub use store::{JsonFileRegistry, Listing};
