//! Deduplicating event cache with an author index.
//!
//! # Responsibility
//! - Admit each distinct event id exactly once.
//! - Keep an arrival-ordered list of event ids per author.
//!
//! # Invariants
//! - `admit` of an id already present mutates nothing and returns `false`.
//! - The author index is derived from cache contents and can be rebuilt
//!   without losing arrival order.
//! - Iteration order is sorted by event id, stable for the whole session.

use crate::model::event::Event;
use std::collections::{BTreeMap, HashMap};

/// In-memory cache of every event currently visualized.
#[derive(Debug, Default)]
pub struct EventCache {
    events: BTreeMap<String, Event>,
    /// Admitted ids, oldest first.
    arrivals: Vec<String>,
    by_author: HashMap<String, Vec<String>>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits one event.
    ///
    /// Returns `true` when the event is new. The caller must then create
    /// exactly one scene object for it.
    pub fn admit(&mut self, event: Event) -> bool {
        if self.events.contains_key(event.id.as_str()) {
            return false;
        }

        self.by_author
            .entry(event.author.clone())
            .or_default()
            .push(event.id.clone());
        self.arrivals.push(event.id.clone());
        self.events.insert(event.id.clone(), event);
        true
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    /// Number of distinct cached events.
    pub fn count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event ids by one author, in arrival order.
    pub fn events_by_author(&self, author: &str) -> &[String] {
        self.by_author
            .get(author)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct authors seen.
    pub fn author_count(&self) -> usize {
        self.by_author.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Rebuilds the author index from cache contents, in arrival order.
    pub fn rebuild_author_index(&mut self) {
        let mut by_author: HashMap<String, Vec<String>> = HashMap::new();
        for event in self.arrivals.iter().filter_map(|id| self.events.get(id)) {
            by_author
                .entry(event.author.clone())
                .or_default()
                .push(event.id.clone());
        }
        self.by_author = by_author;
    }

    /// Drops every cached event and the author index.
    pub fn clear(&mut self) {
        self.events.clear();
        self.arrivals.clear();
        self.by_author.clear();
    }
}
