//! Bookmark store with whole-mapping persistence.
//!
//! # Responsibility
//! - Hydrate bookmarks from the sink at startup.
//! - Apply add/remove in memory, then persist the full mapping.
//!
//! # Invariants
//! - The persisted blob is a JSON object `{ event_id: event }` that matches
//!   the in-memory mapping as of the last successful write.
//! - A failed write is reported as `false` and never rolled back in memory.
//! - A missing or unparseable blob hydrates as an empty mapping.
//! - Event fields this build does not model are written back unchanged.
//! - No automatic retry.

use crate::model::event::Event;
use crate::repo::kv_repo::{KvSink, SinkError};
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key the bookmark mapping is stored under unless configured otherwise.
pub const DEFAULT_BOOKMARK_KEY: &str = "bookmarks";

type BookmarkMap = BTreeMap<String, Event>;

/// Why a persisted blob could not be hydrated.
#[derive(Debug)]
pub enum BookmarkHydrateError {
    Sink(SinkError),
    Corrupt(String),
}

impl Display for BookmarkHydrateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sink(err) => write!(f, "bookmark load failed: {err}"),
            Self::Corrupt(message) => write!(f, "stored bookmarks are unreadable: {message}"),
        }
    }
}

impl Error for BookmarkHydrateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sink(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

/// Why a bookmark write was not durable.
#[derive(Debug)]
pub enum BookmarkPersistError {
    Encode(String),
    Sink(SinkError),
}

impl Display for BookmarkPersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(message) => write!(f, "bookmark encode failed: {message}"),
            Self::Sink(err) => write!(f, "bookmark save failed: {err}"),
        }
    }
}

impl Error for BookmarkPersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sink(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

/// User bookmarks backed by a persistence sink.
pub struct BookmarkStore<S: KvSink> {
    sink: S,
    key: String,
    bookmarks: BookmarkMap,
    last_error: Option<BookmarkPersistError>,
}

impl<S: KvSink> BookmarkStore<S> {
    /// Hydrates from `sink` under `DEFAULT_BOOKMARK_KEY`.
    pub fn hydrate(sink: S) -> Self {
        Self::hydrate_with_key(sink, DEFAULT_BOOKMARK_KEY)
    }

    /// Hydrates from `sink` under `key`.
    ///
    /// Never fails: unreadable state is logged and replaced by an empty
    /// mapping. The stale blob stays in the sink until the next write.
    pub fn hydrate_with_key(sink: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let bookmarks = match load_bookmarks(&sink, &key) {
            Ok(bookmarks) => {
                info!(
                    "event=bookmarks_hydrate module=bookmark status=ok count={}",
                    bookmarks.len()
                );
                bookmarks
            }
            Err(err) => {
                warn!(
                    "event=bookmarks_hydrate module=bookmark status=degraded error_code={} error={err}",
                    hydrate_error_code(&err)
                );
                BookmarkMap::new()
            }
        };

        Self {
            sink,
            key,
            bookmarks,
            last_error: None,
        }
    }

    pub fn is_bookmarked(&self, event_id: &str) -> bool {
        self.bookmarks.contains_key(event_id)
    }

    pub fn get(&self, event_id: &str) -> Option<&Event> {
        self.bookmarks.get(event_id)
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Bookmarked events sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.bookmarks.values()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Error from the most recent failed write, cleared by a successful one.
    pub fn last_error(&self) -> Option<&BookmarkPersistError> {
        self.last_error.as_ref()
    }

    /// Bookmarks a copy of `event` and persists the mapping.
    ///
    /// `Event` carries no scene state, so the copy is the full record.
    /// Returns `false` when the write was rejected; the bookmark is still
    /// present in memory for this session.
    pub fn add(&mut self, event: &Event) -> bool {
        self.bookmarks.insert(event.id.clone(), event.clone());
        self.persist("add", &event.id)
    }

    /// Removes a bookmark and persists the mapping.
    ///
    /// Same return contract as `add`.
    pub fn remove(&mut self, event_id: &str) -> bool {
        self.bookmarks.remove(event_id);
        self.persist("remove", event_id)
    }

    /// Flips membership of `event`; returns `(now_bookmarked, durable)`.
    pub fn toggle(&mut self, event: &Event) -> (bool, bool) {
        if self.is_bookmarked(&event.id) {
            (false, self.remove(&event.id))
        } else {
            (true, self.add(event))
        }
    }

    fn persist(&mut self, op: &'static str, event_id: &str) -> bool {
        let result = serde_json::to_vec(&self.bookmarks)
            .map_err(|err| BookmarkPersistError::Encode(err.to_string()))
            .and_then(|bytes| {
                self.sink
                    .save(&self.key, &bytes)
                    .map_err(BookmarkPersistError::Sink)
            });

        match result {
            Ok(()) => {
                info!(
                    "event=bookmarks_persist module=bookmark status=ok op={op} event_id={event_id} count={}",
                    self.bookmarks.len()
                );
                self.last_error = None;
                true
            }
            Err(err) => {
                warn!(
                    "event=bookmarks_persist module=bookmark status=error op={op} event_id={event_id} error={err}"
                );
                self.last_error = Some(err);
                false
            }
        }
    }
}

fn load_bookmarks<S: KvSink>(sink: &S, key: &str) -> Result<BookmarkMap, BookmarkHydrateError> {
    let Some(bytes) = sink.load(key).map_err(BookmarkHydrateError::Sink)? else {
        return Ok(BookmarkMap::new());
    };
    serde_json::from_slice::<BookmarkMap>(&bytes)
        .map_err(|err| BookmarkHydrateError::Corrupt(err.to_string()))
}

fn hydrate_error_code(err: &BookmarkHydrateError) -> &'static str {
    match err {
        BookmarkHydrateError::Sink(_) => "bookmarks_load_failed",
        BookmarkHydrateError::Corrupt(_) => "bookmarks_corrupt",
    }
}
