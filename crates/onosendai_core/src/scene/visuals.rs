//! Registry of scene objects keyed by handle and by event id.

use crate::model::visual::{Position, VisualId, VisualizedObject};
use std::collections::HashMap;

/// Owns every `VisualizedObject` of the current session.
///
/// Handles come from a counter that is never reset, so clearing the
/// registry cannot make an old handle point at a new object.
#[derive(Debug, Default)]
pub struct VisualRegistry {
    next_handle: u64,
    objects: HashMap<VisualId, VisualizedObject>,
    by_event: HashMap<String, VisualId>,
}

impl VisualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new object for `event_id` and returns its handle.
    ///
    /// Callers only do this after a successful cache admission, so an id is
    /// registered at most once between clears.
    pub fn insert(&mut self, event_id: impl Into<String>, position: Position) -> VisualId {
        let handle = VisualId(self.next_handle);
        self.next_handle += 1;

        let event_id = event_id.into();
        self.by_event.insert(event_id.clone(), handle);
        self.objects.insert(
            handle,
            VisualizedObject {
                handle,
                event_id,
                position,
            },
        );
        handle
    }

    pub fn get(&self, handle: VisualId) -> Option<&VisualizedObject> {
        self.objects.get(&handle)
    }

    pub fn contains(&self, handle: VisualId) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn by_event(&self, event_id: &str) -> Option<&VisualizedObject> {
        self.by_event
            .get(event_id)
            .and_then(|handle| self.objects.get(handle))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Removes every object and returns the released handles in order.
    pub fn clear(&mut self) -> Vec<VisualId> {
        let mut handles: Vec<VisualId> = self.objects.keys().copied().collect();
        handles.sort();
        self.objects.clear();
        self.by_event.clear();
        handles
    }
}
