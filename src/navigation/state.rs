use serde::{Deserialize, Serialize};

use crate::interaction::TimelineSurface;
use crate::models::ActivityDescriptor;

/// Lifecycle of one timeline's visual state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimelinePhase {
    #[default]
    Uninitialized,
    Active,
    /// Visited before; its surface sits in the retained pool.
    Inactive,
}

/// Per-timeline runtime bookkeeping. Interval data is kept in the
/// `IntervalStore`, never here.
#[derive(Debug, Clone, Default)]
pub struct TimelineRuntimeState {
    pub phase: TimelinePhase,
    pub retained: Option<TimelineSurface>,
}

/// Where the respondent is in the sequence of timelines.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub keys: Vec<String>,
    /// `None` before the first timeline has been entered.
    pub index: Option<usize>,
    pub active_surface: Option<TimelineSurface>,
    /// Cleared on every successful transition.
    pub selected_activity: Option<ActivityDescriptor>,
}

impl NavigationState {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    pub fn active_key(&self) -> Option<&str> {
        self.index
            .and_then(|index| self.keys.get(index))
            .map(String::as_str)
    }
}
