//! Scene controller: the single owner of all interaction state.
//!
//! # Responsibility
//! - Admit events into the cache and create one scene object per new event.
//! - Drive the selection state machine from per-tick pointer input.
//! - Run selection buildup/teardown side effects through the render and
//!   presentation capabilities.
//! - Route inspector bookmark actions to the bookmark store.
//!
//! # Invariants
//! - All state is owned by one controller value; nothing is global.
//! - Hit results are used for the tick they arrive in and never stored.
//! - At most one scene object carries a selected treatment.
//! - Teardown always completes before the next buildup starts.

use crate::bookmark::store::BookmarkStore;
use crate::cache::event_cache::EventCache;
use crate::config::{CoreConfig, DEFAULT_CYCLE_CAMERA_DISTANCE};
use crate::model::event::{Event, EventError};
use crate::model::visual::{
    ConnectorId, ConnectorKind, Position, Treatment, VisualId, VisualizedObject,
};
use crate::render::{InspectorView, PresentationSink, RenderCapability};
use crate::repo::kv_repo::KvSink;
use crate::scene::cycle::{CameraWaypoint, ConnectedRing, CycleDirection};
use crate::scene::read_marks::ReadMarks;
use crate::scene::selection::{Selection, Transition};
use crate::scene::thread::{resolve_thread, ThreadLinks};
use crate::scene::visuals::VisualRegistry;
use crate::service::ingest::{IngestQueue, IngestSender};
use crate::space::coords::map_to_position;
use log::{debug, info, warn};
use uuid::Uuid;

/// Input edges gathered by the engine for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Object under the pointer this tick.
    pub hit: Option<VisualId>,
    pub pointer_up: bool,
    /// Inspector dismiss action.
    pub dismiss: bool,
    pub cycle: CycleDirection,
    /// Current camera eye, used to skip a waypoint the camera already sits at.
    pub camera: Option<Position>,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    /// Events taken from the ingestion queue.
    pub drained: usize,
    /// Drained events that were new to the cache.
    pub admitted: usize,
    pub selection_changed: bool,
    pub waypoint: Option<CameraWaypoint>,
}

/// Result of ingesting one raw relay payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Admitted(VisualId),
    Duplicate,
    Malformed(EventError),
}

/// Owns cache, scene registry, selection and bookmarks for one session.
pub struct SceneController<R, P, S>
where
    R: RenderCapability,
    P: PresentationSink,
    S: KvSink,
{
    session_id: Uuid,
    renderer: R,
    presenter: P,
    cache: EventCache,
    visuals: VisualRegistry,
    selection: Selection,
    read_marks: ReadMarks,
    bookmarks: BookmarkStore<S>,
    connectors: Vec<ConnectorId>,
    next_connector: u64,
    ring: ConnectedRing,
    ingest: IngestQueue,
    frame: u64,
    camera_distance: f64,
}

impl<R, P, S> SceneController<R, P, S>
where
    R: RenderCapability,
    P: PresentationSink,
    S: KvSink,
{
    /// Creates a controller and hydrates bookmarks from `sink`.
    pub fn new(renderer: R, presenter: P, sink: S) -> Self {
        Self::from_parts(
            renderer,
            presenter,
            BookmarkStore::hydrate(sink),
            DEFAULT_CYCLE_CAMERA_DISTANCE,
        )
    }

    /// Creates a controller using the bookmark key and camera distance from
    /// `config`.
    pub fn with_config(renderer: R, presenter: P, sink: S, config: &CoreConfig) -> Self {
        Self::from_parts(
            renderer,
            presenter,
            BookmarkStore::hydrate_with_key(sink, config.bookmark_key.clone()),
            config.cycle_camera_distance,
        )
    }

    fn from_parts(
        renderer: R,
        presenter: P,
        bookmarks: BookmarkStore<S>,
        camera_distance: f64,
    ) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            "event=session_start module=scene status=ok session_id={session_id} bookmarks={}",
            bookmarks.len()
        );
        Self {
            session_id,
            renderer,
            presenter,
            cache: EventCache::new(),
            visuals: VisualRegistry::new(),
            selection: Selection::Idle,
            read_marks: ReadMarks::new(),
            bookmarks,
            connectors: Vec::new(),
            next_connector: 0,
            ring: ConnectedRing::new(),
            ingest: IngestQueue::new(),
            frame: 0,
            camera_distance,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Admits `event` and creates its scene object.
    ///
    /// Returns the new handle, or `None` for a duplicate id.
    pub fn visualize(&mut self, event: Event) -> Option<VisualId> {
        let event_id = event.id.clone();
        let position = map_to_position(&event);
        let treatment = self.initial_treatment(&event_id);

        if !self.cache.admit(event) {
            debug!("event=visualize module=scene status=duplicate event_id={event_id}");
            return None;
        }

        let handle = self.visuals.insert(event_id, position);
        self.renderer.create_visual(handle, position, treatment);
        Some(handle)
    }

    /// Decodes one relay JSON payload and visualizes it.
    ///
    /// A malformed payload affects only itself.
    pub fn ingest_json(&mut self, raw: &str) -> IngestOutcome {
        match Event::from_json(raw) {
            Ok(event) => match self.visualize(event) {
                Some(handle) => IngestOutcome::Admitted(handle),
                None => IngestOutcome::Duplicate,
            },
            Err(err) => {
                warn!("event=ingest module=scene status=malformed error={err}");
                IngestOutcome::Malformed(err)
            }
        }
    }

    /// Producer handle for background relay tasks.
    pub fn ingest_sender(&self) -> IngestSender {
        self.ingest.sender()
    }

    /// Runs one update tick.
    ///
    /// Order: drain queued events, then dismiss, then pointer-up, then
    /// cycling. A dismiss on the same tick as a pointer-up wins and the
    /// pointer-up is ignored.
    pub fn tick(&mut self, input: FrameInput) -> TickReport {
        self.frame += 1;

        let queued = self.ingest.drain();
        let drained = queued.len();
        let admitted = queued
            .into_iter()
            .filter_map(|event| self.visualize(event))
            .count();

        let selection_changed = if input.dismiss {
            self.dismiss()
        } else if input.pointer_up {
            self.pointer_up(input.hit)
        } else {
            false
        };

        let waypoint = self.cycle_from(input.cycle, input.camera);

        TickReport {
            frame: self.frame,
            drained,
            admitted,
            selection_changed,
            waypoint,
        }
    }

    /// Applies a pointer-up with this tick's hit result.
    ///
    /// Handles that no longer resolve (e.g. from before a clear) count as
    /// no hit. Returns whether the selection changed.
    pub fn pointer_up(&mut self, hit: Option<VisualId>) -> bool {
        let hit = hit.filter(|handle| self.visuals.contains(*handle));
        let transition = self.selection.on_pointer_up(hit);
        self.apply(transition)
    }

    /// Applies the inspector dismiss action. Returns whether a selection
    /// was released.
    pub fn dismiss(&mut self) -> bool {
        let transition = self.selection.on_dismiss();
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::Stay => return false,
            Transition::Select { previous, next } => {
                if let Some(previous) = previous {
                    self.teardown(previous);
                }
                self.buildup(next);
            }
            Transition::Release(current) => self.teardown(current),
        }
        self.selection.apply(transition);
        true
    }

    fn buildup(&mut self, handle: VisualId) {
        let Some(object) = self.visuals.get(handle) else {
            return;
        };
        let Some(event) = self.cache.get(&object.event_id) else {
            return;
        };

        self.read_marks
            .record(event.id.clone(), event.fingerprint.clone());

        let bookmarked = self.bookmarks.is_bookmarked(&event.id);
        self.presenter.open_inspector(&InspectorView {
            event_id: event.id.clone(),
            content: event.content.clone(),
            author: event.author.trim().to_string(),
            position: object.position,
            bookmarked,
        });

        let links = resolve_thread(event, &self.cache, &self.visuals);
        let related = links
            .parent
            .map(|parent| (parent, ConnectorKind::ToParent))
            .into_iter()
            .chain(links.replies.iter().map(|reply| (*reply, ConnectorKind::ToReply)));
        for (other, kind) in related {
            let Some(target) = self.visuals.get(other) else {
                continue;
            };
            let connector = ConnectorId(self.next_connector);
            self.next_connector += 1;
            self.renderer
                .connect(connector, object.position, target.position, kind);
            self.connectors.push(connector);
        }
        self.ring.reset(links.connected());

        self.renderer
            .set_treatment(handle, Treatment::selected(bookmarked));

        debug!(
            "event=selection_buildup module=scene session_id={} handle={handle} event_id={} connectors={}",
            self.session_id,
            event.id,
            self.connectors.len()
        );
    }

    fn teardown(&mut self, handle: VisualId) {
        if let Some(object) = self.visuals.get(handle) {
            let bookmarked = self.bookmarks.is_bookmarked(&object.event_id);
            self.renderer
                .set_treatment(handle, Treatment::released(bookmarked));
        }
        for connector in self.connectors.drain(..) {
            self.renderer.disconnect(connector);
        }
        self.ring.clear();
        self.presenter.close_inspector();
        debug!(
            "event=selection_teardown module=scene session_id={} handle={handle}",
            self.session_id
        );
    }

    /// Steps through the neighbors of the current selection.
    pub fn cycle(&mut self, direction: CycleDirection) -> Option<CameraWaypoint> {
        self.cycle_from(direction, None)
    }

    /// Like `cycle`, but keeps stepping past nodes whose waypoint eye equals
    /// `camera`. Returns `None` when every node is already framed from there.
    pub fn cycle_from(
        &mut self,
        direction: CycleDirection,
        camera: Option<Position>,
    ) -> Option<CameraWaypoint> {
        if self.selection.is_idle() {
            return None;
        }
        // one extra step: the first step of a fresh ring does not rotate
        for _ in 0..=self.ring.len() {
            let target = self.ring.step(direction)?;
            let object = self.visuals.get(target)?;
            let waypoint = CameraWaypoint::framing(target, object.position, self.camera_distance);
            if camera != Some(waypoint.eye) {
                return Some(waypoint);
            }
        }
        None
    }

    /// Toggles the bookmark of the current selection.
    ///
    /// Returns `None` when nothing is selected, otherwise whether the change
    /// was persisted. The toggle takes effect in memory either way.
    pub fn toggle_bookmark(&mut self) -> Option<bool> {
        let handle = self.selection.current()?;
        let object = self.visuals.get(handle)?;
        let event = self.cache.get(&object.event_id)?;

        let (bookmarked, durable) = self.bookmarks.toggle(event);
        self.renderer
            .set_treatment(handle, Treatment::selected(bookmarked));
        self.presenter.set_bookmark_toggle(&event.id, bookmarked);
        if !durable {
            warn!(
                "event=bookmark_toggle module=scene status=not_durable session_id={} event_id={}",
                self.session_id, event.id
            );
        }
        Some(durable)
    }

    /// Thread links of a cached, visualized event.
    pub fn thread_of(&self, event_id: &str) -> Option<ThreadLinks> {
        let event = self.cache.get(event_id)?;
        Some(resolve_thread(event, &self.cache, &self.visuals))
    }

    /// Drops every cached event and scene object.
    ///
    /// Read marks and bookmarks survive; handles issued before the clear
    /// stop resolving.
    pub fn clear(&mut self) {
        self.dismiss();
        for handle in self.visuals.clear() {
            self.renderer.remove_visual(handle);
        }
        self.cache.clear();
        info!(
            "event=session_clear module=scene status=ok session_id={}",
            self.session_id
        );
    }

    fn initial_treatment(&self, event_id: &str) -> Treatment {
        if self.bookmarks.is_bookmarked(event_id) {
            Treatment::Bookmarked
        } else if self.read_marks.contains(event_id) {
            Treatment::Visited
        } else {
            Treatment::Default
        }
    }

    /// Number of distinct cached events.
    pub fn event_count(&self) -> usize {
        self.cache.count()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Scene object of the current selection.
    pub fn selected(&self) -> Option<&VisualizedObject> {
        self.selection
            .current()
            .and_then(|handle| self.visuals.get(handle))
    }

    pub fn visual(&self, handle: VisualId) -> Option<&VisualizedObject> {
        self.visuals.get(handle)
    }

    pub fn visual_for_event(&self, event_id: &str) -> Option<&VisualizedObject> {
        self.visuals.by_event(event_id)
    }

    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    pub fn read_marks(&self) -> &ReadMarks {
        &self.read_marks
    }

    pub fn bookmarks(&self) -> &BookmarkStore<S> {
        &self.bookmarks
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}
