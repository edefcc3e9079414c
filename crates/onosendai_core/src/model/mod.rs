//! Domain model for visualized protocol events.
//!
//! # Responsibility
//! - Define the event record received from the relay layer.
//! - Define handle types that link events to their scene projections.
//!
//! # Invariants
//! - An `Event` is immutable once admitted to the cache.
//! - Scene objects refer to events by id, never by ownership.

pub mod event;
pub mod visual;
