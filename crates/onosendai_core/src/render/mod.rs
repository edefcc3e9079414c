//! Capability seams toward the rendering engine and the inspector UI.
//!
//! # Responsibility
//! - Define the only calls the core makes into a rendering engine.
//! - Define the view data handed to the inspector presentation layer.
//!
//! # Invariants
//! - The core never touches engine primitives directly; adapters implement
//!   these traits over whichever engine is in use.
//! - Calls are synchronous and happen inside one update tick.

pub mod headless;

use crate::model::visual::{ConnectorId, ConnectorKind, Position, Treatment, VisualId};

/// Scene mutations requested by the core.
pub trait RenderCapability {
    /// Creates one primitive for `handle` at `position`.
    fn create_visual(&mut self, handle: VisualId, position: Position, treatment: Treatment);
    fn set_treatment(&mut self, handle: VisualId, treatment: Treatment);
    /// Draws a connector line between two positions.
    fn connect(&mut self, connector: ConnectorId, from: Position, to: Position, kind: ConnectorKind);
    fn disconnect(&mut self, connector: ConnectorId);
    /// Destroys a primitive on session clear.
    fn remove_visual(&mut self, handle: VisualId);
}

/// Inspector panel requests.
pub trait PresentationSink {
    fn open_inspector(&mut self, view: &InspectorView);
    fn close_inspector(&mut self);
    /// Updates the bookmark toggle affordance of the open inspector.
    fn set_bookmark_toggle(&mut self, event_id: &str, bookmarked: bool);
}

/// Data the inspector needs to show one selected event.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    pub event_id: String,
    pub content: String,
    /// Author id with surrounding whitespace removed.
    pub author: String,
    pub position: Position,
    pub bookmarked: bool,
}

impl InspectorView {
    /// Plain-text body shown in the inspector panel.
    pub fn message(&self) -> String {
        format!(
            "event:{}\n\n{}\n\npubkey:{}\n\n[{}x]\n[{}y]\n[{}z]",
            self.event_id,
            self.content,
            self.author,
            self.position.x,
            self.position.y,
            self.position.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::InspectorView;
    use crate::model::visual::Position;

    #[test]
    fn message_lists_id_content_author_and_coordinates() {
        let view = InspectorView {
            event_id: "e1".to_string(),
            content: "hello".to_string(),
            author: "p1".to_string(),
            position: Position::new(1.5, 0.0, 2048.0),
            bookmarked: false,
        };
        assert_eq!(
            view.message(),
            "event:e1\n\nhello\n\npubkey:p1\n\n[1.5x]\n[0y]\n[2048z]"
        );
    }
}
