//! Persistence sink contracts and implementations.
//!
//! # Responsibility
//! - Define the whole-blob key/value contract the bookmark store writes to.
//! - Keep SQLite details behind that contract.
//!
//! # Invariants
//! - `save` either replaces the whole value for a key or changes nothing.
//! - Failures surface as `SinkError`, never as panics.

pub mod kv_repo;
