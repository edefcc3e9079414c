//! Session-scoped event storage.
//!
//! # Responsibility
//! - Deduplicate incoming events by id.
//! - Index admitted events by author.
//!
//! # Invariants
//! - Nothing in this module is persisted.

pub mod event_cache;
