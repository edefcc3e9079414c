//! Event visualization and interaction core for ONOSENDAI.
//! This crate owns event admission, world placement, selection, reply
//! threads, and bookmark persistence; engines and UIs plug in through traits.

pub mod bookmark;
pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod scene;
pub mod service;
pub mod space;

pub use bookmark::store::{
    BookmarkHydrateError, BookmarkPersistError, BookmarkStore, DEFAULT_BOOKMARK_KEY,
};
pub use cache::event_cache::EventCache;
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{Event, EventError, ParentRef};
pub use model::visual::{
    ConnectorId, ConnectorKind, Position, Treatment, VisualId, VisualizedObject,
};
pub use render::headless::{HeadlessPresenter, HeadlessRenderer};
pub use render::{InspectorView, PresentationSink, RenderCapability};
pub use repo::kv_repo::{KvSink, MemoryKvSink, SinkError, SinkResult, SqliteKvSink};
pub use scene::cycle::{CameraWaypoint, CycleDirection};
pub use scene::read_marks::ReadMarks;
pub use scene::selection::{Selection, Transition};
pub use scene::thread::{resolve_thread, ThreadLinks};
pub use service::ingest::IngestSender;
pub use service::scene_service::{FrameInput, IngestOutcome, SceneController, TickReport};
pub use space::coords::{map_fingerprint, map_to_position, WORLD_DOWNSCALE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
