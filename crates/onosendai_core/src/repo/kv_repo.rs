//! Key/value sink contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Load and store opaque byte blobs under string keys.
//! - Enforce an optional per-value quota the way device storage does.
//!
//! # Invariants
//! - A rejected `save` leaves the previous value untouched.
//! - `load` of an unknown key is `Ok(None)`, not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SinkResult<T> = Result<T, SinkError>;

/// Persistence sink failure.
#[derive(Debug)]
pub enum SinkError {
    /// Value exceeds the configured storage quota.
    QuotaExceeded {
        key: String,
        size: usize,
        quota: usize,
    },
    /// Sink refused the operation without a storage error.
    Unavailable(String),
    Db(DbError),
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { key, size, quota } => write!(
                f,
                "value for `{key}` is {size} bytes, storage quota is {quota} bytes"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SinkError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SinkError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable whole-blob key/value store.
pub trait KvSink {
    fn load(&self, key: &str) -> SinkResult<Option<Vec<u8>>>;
    fn save(&self, key: &str, value: &[u8]) -> SinkResult<()>;
}

impl<T: KvSink + ?Sized> KvSink for &T {
    fn load(&self, key: &str) -> SinkResult<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &[u8]) -> SinkResult<()> {
        (**self).save(key, value)
    }
}

impl<T: KvSink + ?Sized> KvSink for Box<T> {
    fn load(&self, key: &str) -> SinkResult<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &[u8]) -> SinkResult<()> {
        (**self).save(key, value)
    }
}

fn check_quota(key: &str, value: &[u8], quota: Option<usize>) -> SinkResult<()> {
    match quota {
        Some(quota) if value.len() > quota => Err(SinkError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

/// SQLite-backed sink over the `kv_store` table.
pub struct SqliteKvSink<'conn> {
    conn: &'conn Connection,
    quota: Option<usize>,
}

impl<'conn> SqliteKvSink<'conn> {
    /// Wraps a migrated connection from `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn, quota: None }
    }

    /// Rejects values larger than `quota` bytes.
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }
}

impl KvSink for SqliteKvSink<'_> {
    fn load(&self, key: &str) -> SinkResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &[u8]) -> SinkResult<()> {
        check_quota(key, value, self.quota)?;

        // single-statement upsert: readers see the old blob or the new one
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local sink for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvSink {
    entries: RefCell<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
    writes: Cell<usize>,
}

impl MemoryKvSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Stores raw bytes without quota checks, e.g. a blob left by an older build.
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.into());
    }

    /// Number of accepted `save` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KvSink for MemoryKvSink {
    fn load(&self, key: &str) -> SinkResult<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> SinkResult<()> {
        check_quota(key, value, self.quota)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KvSink, MemoryKvSink, SinkError, SqliteKvSink};
    use crate::db::open_db_in_memory;

    #[test]
    fn memory_sink_round_trips_and_counts_writes() {
        let sink = MemoryKvSink::new();
        assert_eq!(sink.load("k").unwrap(), None);

        sink.save("k", b"one").unwrap();
        sink.save("k", b"two").unwrap();
        assert_eq!(sink.load("k").unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(sink.write_count(), 2);
    }

    #[test]
    fn memory_sink_quota_keeps_previous_value() {
        let sink = MemoryKvSink::with_quota(4);
        sink.save("k", b"abcd").unwrap();

        let err = sink.save("k", b"abcde").unwrap_err();
        assert!(matches!(
            err,
            SinkError::QuotaExceeded {
                size: 5,
                quota: 4,
                ..
            }
        ));
        assert_eq!(sink.load("k").unwrap().as_deref(), Some(&b"abcd"[..]));
    }

    #[test]
    fn sqlite_sink_upserts_whole_value() {
        let conn = open_db_in_memory().unwrap();
        let sink = SqliteKvSink::new(&conn);

        sink.save("bookmarks", b"{}").unwrap();
        sink.save("bookmarks", b"{\"a\":1}").unwrap();
        assert_eq!(
            sink.load("bookmarks").unwrap().as_deref(),
            Some(&b"{\"a\":1}"[..])
        );
        assert_eq!(sink.load("missing").unwrap(), None);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn sqlite_sink_quota_rejects_without_writing() {
        let conn = open_db_in_memory().unwrap();
        let sink = SqliteKvSink::new(&conn).with_quota(Some(2));

        let err = sink.save("bookmarks", b"too long").unwrap_err();
        assert!(matches!(err, SinkError::QuotaExceeded { .. }));
        assert!(err.to_string().contains("quota"));
        assert_eq!(sink.load("bookmarks").unwrap(), None);
    }
}
