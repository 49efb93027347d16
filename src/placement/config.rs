use crate::store::MIN_DURATION_MINUTES;
use crate::timescale::DEFAULT_STEP;

/// Grid and duration rules applied to create and resize requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Snapping grid in minutes
    pub step_minutes: u32,

    /// Shortest interval a gesture may produce; clicks produce exactly this
    pub min_duration_minutes: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP,
            min_duration_minutes: MIN_DURATION_MINUTES,
        }
    }
}
