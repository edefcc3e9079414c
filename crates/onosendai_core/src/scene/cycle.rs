//! Camera cycling through the neighbors of the active selection.
//!
//! The first step after a selection shows the head of the ring without
//! rotating; every later step rotates one position in the requested
//! direction before showing the head.

use crate::model::visual::{Position, VisualId};
use std::collections::VecDeque;

/// Requested cycling direction for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleDirection {
    #[default]
    None,
    Forward,
    Backward,
}

/// Camera placement that frames one connected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraWaypoint {
    pub target: VisualId,
    pub eye: Position,
    pub look_at: Position,
}

impl CameraWaypoint {
    /// Places the eye above and behind `position` at `distance`.
    pub fn framing(target: VisualId, position: Position, distance: f64) -> Self {
        Self {
            target,
            eye: position.offset(0.0, distance / 2.0, distance),
            look_at: position,
        }
    }
}

/// Ring of nodes connected to the current selection.
#[derive(Debug, Default)]
pub struct ConnectedRing {
    nodes: VecDeque<VisualId>,
    cycling: bool,
}

impl ConnectedRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ring for a new selection.
    pub fn reset(&mut self, nodes: Vec<VisualId>) {
        self.nodes = nodes.into();
        self.cycling = false;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cycling = false;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Advances the ring and returns the node to frame.
    pub fn step(&mut self, direction: CycleDirection) -> Option<VisualId> {
        if direction == CycleDirection::None || self.nodes.is_empty() {
            return None;
        }

        if self.cycling {
            match direction {
                CycleDirection::Forward => self.nodes.rotate_left(1),
                CycleDirection::Backward => self.nodes.rotate_right(1),
                CycleDirection::None => {}
            }
        }
        self.cycling = true;
        self.nodes.front().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraWaypoint, ConnectedRing, CycleDirection};
    use crate::model::visual::{Position, VisualId};

    fn ring() -> ConnectedRing {
        let mut ring = ConnectedRing::new();
        ring.reset(vec![VisualId(1), VisualId(2), VisualId(3)]);
        ring
    }

    #[test]
    fn first_step_shows_head_without_rotating() {
        let mut ring = ring();
        assert_eq!(ring.step(CycleDirection::Forward), Some(VisualId(1)));
        assert_eq!(ring.step(CycleDirection::Forward), Some(VisualId(2)));
        assert_eq!(ring.step(CycleDirection::Forward), Some(VisualId(3)));
        assert_eq!(ring.step(CycleDirection::Forward), Some(VisualId(1)));
    }

    #[test]
    fn backward_step_wraps_to_tail() {
        let mut ring = ring();
        assert_eq!(ring.step(CycleDirection::Backward), Some(VisualId(1)));
        assert_eq!(ring.step(CycleDirection::Backward), Some(VisualId(3)));
    }

    #[test]
    fn no_direction_or_empty_ring_yields_nothing() {
        let mut ring = ring();
        assert_eq!(ring.step(CycleDirection::None), None);

        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.step(CycleDirection::Forward), None);
    }

    #[test]
    fn reset_restarts_at_head() {
        let mut ring = ring();
        ring.step(CycleDirection::Forward);
        ring.step(CycleDirection::Forward);
        ring.reset(vec![VisualId(9)]);
        assert_eq!(ring.step(CycleDirection::Forward), Some(VisualId(9)));
    }

    #[test]
    fn waypoint_frames_node_from_above_and_behind() {
        let waypoint = CameraWaypoint::framing(VisualId(4), Position::new(10.0, 20.0, 30.0), 50.0);
        assert_eq!(waypoint.eye, Position::new(10.0, 45.0, 80.0));
        assert_eq!(waypoint.look_at, Position::new(10.0, 20.0, 30.0));
    }
}
