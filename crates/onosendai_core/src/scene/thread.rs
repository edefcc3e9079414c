//! One-hop reply thread resolution.
//!
//! # Responsibility
//! - Find the declared parent and direct replies of a focal event.
//!
//! # Invariants
//! - A relation is returned only when the related event is cached and has a
//!   scene object.
//! - Replies are scanned only when the focal event declares no parent.
//! - No transitive closure: only immediate neighbors are resolved.
//!
//! The reply scan walks the whole cache on every call. That is linear in the
//! cache size and happens once per selection.

use crate::cache::event_cache::EventCache;
use crate::model::event::{Event, ParentRef};
use crate::model::visual::VisualId;
use crate::scene::visuals::VisualRegistry;

/// Renderable neighbors of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadLinks {
    pub parent: Option<VisualId>,
    /// Direct replies in cache iteration order.
    pub replies: Vec<VisualId>,
}

impl ThreadLinks {
    pub fn is_empty(&self) -> bool {
        self.parent.is_none() && self.replies.is_empty()
    }

    /// Parent first, then replies.
    pub fn connected(&self) -> Vec<VisualId> {
        self.parent
            .iter()
            .chain(self.replies.iter())
            .copied()
            .collect()
    }
}

/// Resolves the parent and direct replies of `event`.
pub fn resolve_thread(event: &Event, cache: &EventCache, visuals: &VisualRegistry) -> ThreadLinks {
    match event.parent_ref() {
        ParentRef::Declared(parent_id) => ThreadLinks {
            parent: renderable(parent_id, cache, visuals),
            replies: Vec::new(),
        },
        ParentRef::DeclaredWithoutId => ThreadLinks::default(),
        ParentRef::Undeclared => ThreadLinks {
            parent: None,
            replies: cache
                .iter()
                .filter(|candidate| candidate.id != event.id && candidate.is_reply_to(&event.id))
                .filter_map(|reply| renderable(&reply.id, cache, visuals))
                .collect(),
        },
    }
}

fn renderable(event_id: &str, cache: &EventCache, visuals: &VisualRegistry) -> Option<VisualId> {
    if !cache.is_loaded(event_id) {
        return None;
    }
    visuals.by_event(event_id).map(|object| object.handle)
}
