//! Engine-free adapters that keep scene and inspector state in memory.
//!
//! Used by the replay CLI and by tests to observe exactly what the core
//! asked the engine to do.

use super::{InspectorView, PresentationSink, RenderCapability};
use crate::model::visual::{ConnectorId, ConnectorKind, Position, Treatment, VisualId};
use log::trace;
use std::collections::BTreeMap;

/// One live connector line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorLine {
    pub from: Position,
    pub to: Position,
    pub kind: ConnectorKind,
}

/// In-memory scene: primitives with their treatment, and connector lines.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    visuals: BTreeMap<VisualId, (Position, Treatment)>,
    connectors: BTreeMap<ConnectorId, ConnectorLine>,
    created: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn treatment(&self, handle: VisualId) -> Option<Treatment> {
        self.visuals.get(&handle).map(|(_, treatment)| *treatment)
    }

    pub fn position(&self, handle: VisualId) -> Option<Position> {
        self.visuals.get(&handle).map(|(position, _)| *position)
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    /// Total `create_visual` calls, including visuals later removed.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Primitives currently carrying a selected treatment.
    pub fn selected(&self) -> Vec<VisualId> {
        self.visuals
            .iter()
            .filter(|(_, (_, treatment))| treatment.is_selected())
            .map(|(handle, _)| *handle)
            .collect()
    }

    pub fn connectors(&self) -> impl Iterator<Item = &ConnectorLine> {
        self.connectors.values()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }
}

impl RenderCapability for HeadlessRenderer {
    fn create_visual(&mut self, handle: VisualId, position: Position, treatment: Treatment) {
        trace!("event=render_create module=render handle={handle} treatment={treatment:?}");
        self.visuals.insert(handle, (position, treatment));
        self.created += 1;
    }

    fn set_treatment(&mut self, handle: VisualId, treatment: Treatment) {
        if let Some(entry) = self.visuals.get_mut(&handle) {
            entry.1 = treatment;
        }
    }

    fn connect(&mut self, connector: ConnectorId, from: Position, to: Position, kind: ConnectorKind) {
        self.connectors
            .insert(connector, ConnectorLine { from, to, kind });
    }

    fn disconnect(&mut self, connector: ConnectorId) {
        self.connectors.remove(&connector);
    }

    fn remove_visual(&mut self, handle: VisualId) {
        self.visuals.remove(&handle);
    }
}

/// In-memory inspector panel.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    inspector: Option<InspectorView>,
    opened: usize,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// View currently shown, if the inspector is open.
    pub fn inspector(&self) -> Option<&InspectorView> {
        self.inspector.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.inspector.is_some()
    }

    pub fn open_count(&self) -> usize {
        self.opened
    }
}

impl PresentationSink for HeadlessPresenter {
    fn open_inspector(&mut self, view: &InspectorView) {
        self.inspector = Some(view.clone());
        self.opened += 1;
    }

    fn close_inspector(&mut self) {
        self.inspector = None;
    }

    fn set_bookmark_toggle(&mut self, event_id: &str, bookmarked: bool) {
        if let Some(view) = self.inspector.as_mut() {
            if view.event_id == event_id {
                view.bookmarked = bookmarked;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessPresenter, HeadlessRenderer};
    use crate::model::visual::{ConnectorId, ConnectorKind, Position, Treatment, VisualId};
    use crate::render::{InspectorView, PresentationSink, RenderCapability};

    #[test]
    fn renderer_tracks_treatments_and_connectors() {
        let mut renderer = HeadlessRenderer::new();
        renderer.create_visual(VisualId(0), Position::ORIGIN, Treatment::Default);
        renderer.set_treatment(VisualId(0), Treatment::Selected);
        renderer.connect(
            ConnectorId(0),
            Position::ORIGIN,
            Position::new(1.0, 1.0, 1.0),
            ConnectorKind::ToReply,
        );

        assert_eq!(renderer.selected(), vec![VisualId(0)]);
        assert_eq!(renderer.connector_count(), 1);

        renderer.disconnect(ConnectorId(0));
        renderer.remove_visual(VisualId(0));
        assert_eq!(renderer.connector_count(), 0);
        assert_eq!(renderer.visual_count(), 0);
        assert_eq!(renderer.created_count(), 1);
    }

    #[test]
    fn bookmark_toggle_only_updates_matching_inspector() {
        let mut presenter = HeadlessPresenter::new();
        presenter.open_inspector(&InspectorView {
            event_id: "e1".to_string(),
            content: String::new(),
            author: "p1".to_string(),
            position: Position::ORIGIN,
            bookmarked: false,
        });

        presenter.set_bookmark_toggle("e2", true);
        assert!(!presenter.inspector().unwrap().bookmarked);
        presenter.set_bookmark_toggle("e1", true);
        assert!(presenter.inspector().unwrap().bookmarked);

        presenter.close_inspector();
        assert!(!presenter.is_open());
        assert_eq!(presenter.open_count(), 1);
    }
}
