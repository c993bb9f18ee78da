//! Persistence layer for Wellbeing Monitor.
//!
//! This crate contains:
//! - The local key-value store abstraction and its backends
//! - Typed repositories over the store (goals, streak, monitor state,
//!   analysis cache)
//!
//! The store is treated exactly as the platform offers it: string keys
//! to string values, no queries, no transactions. Every repository
//! owns a disjoint key prefix and does read-modify-write with
//! last-writer-wins semantics.

pub mod repositories;
pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
