use serde::{Deserialize, Serialize};

use crate::error::PlacementRejection;
use crate::log_debug;
use crate::models::{ActivityDescriptor, Interval};
use crate::placement::config::PlacementConfig;
use crate::store::IntervalStore;
use crate::timescale;

const ENABLE_LOGS: bool = false;

/// Which boundary of an interval a resize gesture moves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Edge {
    Start,
    End,
}

/// Turns raw gesture minutes into validated store mutations.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: PlacementConfig,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    fn snap(&self, raw: u32) -> u32 {
        timescale::snap(f64::from(raw), self.config.step_minutes)
    }

    /// Snap and order a create span, extending the end to the minimum
    /// duration when the drag was too short.
    pub fn create_span(&self, raw_start: u32, raw_end: u32) -> (u32, u32) {
        let a = self.snap(raw_start);
        let b = self.snap(raw_end);
        let (start, mut end) = if a <= b { (a, b) } else { (b, a) };

        if end - start < self.config.min_duration_minutes {
            end = start.saturating_add(self.config.min_duration_minutes);
        }
        (start, end)
    }

    /// Validate a create span without mutating anything (live preview).
    pub fn check_create(
        &self,
        store: &IntervalStore,
        timeline_key: &str,
        raw_start: u32,
        raw_end: u32,
    ) -> Result<(u32, u32), PlacementRejection> {
        reject_outside_window(raw_start, raw_end)?;
        let (start, end) = self.create_span(raw_start, raw_end);
        store.check_placement(timeline_key, start, end, None)?;
        Ok((start, end))
    }

    pub fn evaluate_create(
        &self,
        store: &mut IntervalStore,
        timeline_key: &str,
        raw_start: u32,
        raw_end: u32,
        descriptor: &ActivityDescriptor,
    ) -> Result<Interval, PlacementRejection> {
        reject_outside_window(raw_start, raw_end)?;
        let (start, end) = self.create_span(raw_start, raw_end);
        let interval = Interval::from_descriptor(timeline_key, start, end, descriptor);
        store.add(timeline_key, interval.clone())?;

        log_debug!(
            "Placed {} on {} at {}-{}",
            interval.display_label(),
            timeline_key,
            start,
            end
        );
        Ok(interval)
    }

    /// A click without drag: a minimum-length interval at the click.
    pub fn evaluate_click(
        &self,
        store: &mut IntervalStore,
        timeline_key: &str,
        raw_start: u32,
        descriptor: &ActivityDescriptor,
    ) -> Result<Interval, PlacementRejection> {
        reject_outside_window(raw_start, raw_start)?;
        let raw_end = raw_start.saturating_add(self.config.min_duration_minutes);
        self.evaluate_create(store, timeline_key, raw_start, raw_end, descriptor)
    }

    /// New `(start, end)` for moving `edge` of `current` to `raw_boundary`,
    /// holding the other boundary fixed.
    pub fn resize_span(
        &self,
        current: &Interval,
        edge: Edge,
        raw_boundary: u32,
    ) -> Result<(u32, u32), PlacementRejection> {
        let moved = self.snap(raw_boundary);
        let (start, end) = match edge {
            Edge::Start => (moved, current.end),
            Edge::End => (current.start, moved),
        };

        if end <= start || end - start < self.config.min_duration_minutes {
            return Err(PlacementRejection::TooShort);
        }
        Ok((start, end))
    }

    pub fn evaluate_resize(
        &self,
        store: &mut IntervalStore,
        timeline_key: &str,
        interval_id: &str,
        edge: Edge,
        raw_boundary: u32,
    ) -> Result<Interval, PlacementRejection> {
        let current = store
            .get(timeline_key, interval_id)
            .ok_or_else(|| PlacementRejection::UnknownInterval {
                id: interval_id.to_string(),
            })?;
        let (start, end) = self.resize_span(current, edge, raw_boundary)?;
        store.replace(timeline_key, interval_id, start, end)
    }
}

/// Raw minutes past the window end never reach span arithmetic.
fn reject_outside_window(raw_start: u32, raw_end: u32) -> Result<(), PlacementRejection> {
    if raw_start > timescale::WINDOW_END || raw_end > timescale::WINDOW_END {
        return Err(PlacementRejection::OutOfBounds);
    }
    Ok(())
}
