//! Pointer-driven selection state machine.
//!
//! # Responsibility
//! - Decide which transition a pointer-up or dismiss produces.
//!
//! # Invariants
//! - At most one object is selected.
//! - Re-selecting the active object is a no-op.
//! - Pointer-up with no hit never changes state.
//!
//! Side effects (treatments, connectors, inspector) belong to the caller,
//! which applies them from the returned `Transition`.

use crate::model::visual::VisualId;

/// Current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(VisualId),
}

/// Outcome of one input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do.
    Stay,
    /// Tear down `previous` (when present), then build up `next`.
    Select {
        previous: Option<VisualId>,
        next: VisualId,
    },
    /// Tear down the released object and go idle.
    Release(VisualId),
}

impl Selection {
    pub fn current(self) -> Option<VisualId> {
        match self {
            Self::Idle => None,
            Self::Selected(handle) => Some(handle),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    /// Transition for a pointer-up with this tick's hit result.
    pub fn on_pointer_up(self, hit: Option<VisualId>) -> Transition {
        let Some(target) = hit else {
            return Transition::Stay;
        };
        match self {
            Self::Selected(current) if current == target => Transition::Stay,
            _ => Transition::Select {
                previous: self.current(),
                next: target,
            },
        }
    }

    /// Transition for an explicit dismiss action.
    pub fn on_dismiss(self) -> Transition {
        match self {
            Self::Idle => Transition::Stay,
            Self::Selected(current) => Transition::Release(current),
        }
    }

    /// Moves to the state a transition ends in.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Select { next, .. } => *self = Self::Selected(next),
            Transition::Release(_) => *self = Self::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, Transition};
    use crate::model::visual::VisualId;

    const A: VisualId = VisualId(1);
    const B: VisualId = VisualId(2);

    #[test]
    fn idle_pointer_up_on_target_selects_it() {
        let mut selection = Selection::Idle;
        let transition = selection.on_pointer_up(Some(A));
        assert_eq!(
            transition,
            Transition::Select {
                previous: None,
                next: A,
            }
        );
        selection.apply(transition);
        assert_eq!(selection, Selection::Selected(A));
    }

    #[test]
    fn switching_targets_tears_down_previous() {
        let mut selection = Selection::Selected(A);
        let transition = selection.on_pointer_up(Some(B));
        assert_eq!(
            transition,
            Transition::Select {
                previous: Some(A),
                next: B,
            }
        );
        selection.apply(transition);
        assert_eq!(selection.current(), Some(B));
    }

    #[test]
    fn reclicking_active_selection_is_a_no_op() {
        let selection = Selection::Selected(A);
        assert_eq!(selection.on_pointer_up(Some(A)), Transition::Stay);
    }

    #[test]
    fn pointer_up_without_hit_keeps_state() {
        assert_eq!(Selection::Idle.on_pointer_up(None), Transition::Stay);
        assert_eq!(Selection::Selected(A).on_pointer_up(None), Transition::Stay);
    }

    #[test]
    fn dismiss_releases_only_when_selected() {
        assert_eq!(Selection::Idle.on_dismiss(), Transition::Stay);

        let mut selection = Selection::Selected(B);
        let transition = selection.on_dismiss();
        assert_eq!(transition, Transition::Release(B));
        selection.apply(transition);
        assert!(selection.is_idle());
    }
}
