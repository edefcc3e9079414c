//! Scene-side handles and value types.
//!
//! A `VisualizedObject` is the projection of one cached event into world
//! space. It stores the event id and never owns the event.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Non-owning handle to a scene object created through the render capability.
///
/// Handles are never reused within one controller, so a handle that outlived
/// a cache clear simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u64);

impl Display for VisualId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle to one connector line between two scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectorId(pub u64);

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Visual treatment requested from the renderer.
///
/// Material, scale and spin per treatment are renderer decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treatment {
    /// Never read, not bookmarked.
    Default,
    /// Read earlier in this session.
    Visited,
    Bookmarked,
    /// Active selection.
    Selected,
    /// Active selection that is also bookmarked.
    SelectedBookmarked,
}

impl Treatment {
    pub fn is_selected(self) -> bool {
        matches!(self, Self::Selected | Self::SelectedBookmarked)
    }

    /// Treatment for the active selection.
    pub fn selected(bookmarked: bool) -> Self {
        if bookmarked {
            Self::SelectedBookmarked
        } else {
            Self::Selected
        }
    }

    /// Treatment for an object that was selected and then released.
    pub fn released(bookmarked: bool) -> Self {
        if bookmarked {
            Self::Bookmarked
        } else {
            Self::Visited
        }
    }
}

/// Which relation a connector line draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    ToParent,
    ToReply,
}

/// Scene projection of one cached event.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizedObject {
    pub handle: VisualId,
    pub event_id: String,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::{Position, Treatment};

    #[test]
    fn selected_and_released_treatments_follow_bookmark_state() {
        assert_eq!(Treatment::selected(false), Treatment::Selected);
        assert_eq!(Treatment::selected(true), Treatment::SelectedBookmarked);
        assert_eq!(Treatment::released(false), Treatment::Visited);
        assert_eq!(Treatment::released(true), Treatment::Bookmarked);
        assert!(Treatment::SelectedBookmarked.is_selected());
        assert!(!Treatment::Bookmarked.is_selected());
    }

    #[test]
    fn offset_moves_each_axis() {
        let moved = Position::new(1.0, 2.0, 3.0).offset(0.5, -2.0, 10.0);
        assert_eq!(moved, Position::new(1.5, 0.0, 13.0));
    }
}
