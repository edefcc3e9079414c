//! Scene-side interaction state.
//!
//! # Responsibility
//! - Track scene objects created for cached events.
//! - Resolve one-hop reply threads among visualized events.
//! - Hold the selection state machine and its connected-node ring.
//! - Remember which events were read this session.
//!
//! # Invariants
//! - Every cross-reference is a `VisualId` handle or an event id string.
//! - At most one object is selected at a time.

pub mod cycle;
pub mod read_marks;
pub mod selection;
pub mod thread;
pub mod visuals;
