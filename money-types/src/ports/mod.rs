//! Port traits (interfaces for adapters).
//!
//! These are the contracts that storage adapters must implement.
//! The cast service depends on these traits, not concrete implementations.

mod store;

pub use store::RecordStore;
