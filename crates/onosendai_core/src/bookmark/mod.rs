//! Durable user bookmarks.
//!
//! # Responsibility
//! - Keep the user's bookmarked events independent of the session cache.
//! - Persist the whole bookmark mapping through a `KvSink`.
//!
//! # See also
//! - `repo::kv_repo` for the sink contract.

pub mod store;
