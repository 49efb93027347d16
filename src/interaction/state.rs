use serde::{Deserialize, Serialize};

use crate::error::PlacementRejection;
use crate::models::Interval;
use crate::placement::Edge;

use super::axis::PointerPosition;
use super::surface::SurfaceId;

/// Gesture in progress on the bound surface.
///
/// Creation runs `Idle -> Pending -> Previewing -> Idle`, resizing runs
/// `Idle -> Resizing -> Idle`. Terminal results (committed, cancelled,
/// rolled back) are reported as [`GestureOutcome`]s, not kept as states.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pointer is down on empty space but has not moved past the drag threshold.
    Pending {
        origin: PointerPosition,
        origin_pct: f64,
    },
    Previewing {
        origin: PointerPosition,
        origin_pct: f64,
        current_pct: f64,
    },
    /// `original` is the pre-gesture interval, restored on rollback.
    Resizing {
        interval_id: String,
        edge: Edge,
        original: Interval,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Pending { .. } => "pending",
            GestureState::Previewing { .. } => "previewing",
            GestureState::Resizing { .. } => "resizing",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// The platform aborted the pointer (e.g. touch cancel).
    Cancel,
}

/// A raw pointer event addressed to one surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointerEvent {
    pub surface: SurfaceId,
    pub kind: PointerKind,
    pub position: PointerPosition,
}

impl PointerEvent {
    pub fn new(surface: SurfaceId, kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            surface,
            kind,
            position: PointerPosition::new(x, y),
        }
    }

    pub fn down(surface: SurfaceId, x: f64, y: f64) -> Self {
        Self::new(surface, PointerKind::Down, x, y)
    }

    pub fn moved(surface: SurfaceId, x: f64, y: f64) -> Self {
        Self::new(surface, PointerKind::Move, x, y)
    }

    pub fn up(surface: SurfaceId, x: f64, y: f64) -> Self {
        Self::new(surface, PointerKind::Up, x, y)
    }

    pub fn cancel(surface: SurfaceId) -> Self {
        Self::new(surface, PointerKind::Cancel, 0.0, 0.0)
    }
}

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Inert surface, no selection, or nothing to do in the current state.
    Ignored,
    Pending,
    PreviewUpdated { start: u32, end: u32, valid: bool },
    Created(Interval),
    /// Create commit failed; the preview was discarded.
    Rejected(PlacementRejection),
    Cancelled,
    ResizeStarted { interval_id: String, edge: Edge },
    Resized(Interval),
    /// This move was invalid; the edge snapped back and the gesture continues.
    ResizeRejected(PlacementRejection),
    ResizeFinished(Interval),
    RolledBack(Interval),
}

impl GestureOutcome {
    /// Whether the store was changed by this event.
    pub fn mutated_store(&self) -> bool {
        matches!(
            self,
            GestureOutcome::Created(_) | GestureOutcome::Resized(_) | GestureOutcome::RolledBack(_)
        )
    }
}
