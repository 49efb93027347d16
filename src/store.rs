//! Per-timeline interval sets with validation gating every mutation.
//!
//! All values are absolute minutes inside the 240..=1680 window, so overlap
//! is a plain half-open comparison. Every mutation validates first and
//! applies second; a rejected call leaves the store untouched.

use std::collections::HashMap;

use crate::error::PlacementRejection;
use crate::models::Interval;
use crate::timescale::{self, WINDOW_MINUTES};

/// Shortest interval the store accepts.
pub const MIN_DURATION_MINUTES: u32 = 10;

#[derive(Debug, Clone)]
pub struct IntervalStore {
    /// Insertion order is creation order, not start order.
    timelines: HashMap<String, Vec<Interval>>,
    min_duration: u32,
}

impl Default for IntervalStore {
    fn default() -> Self {
        Self::new(MIN_DURATION_MINUTES)
    }
}

impl IntervalStore {
    pub fn new(min_duration: u32) -> Self {
        Self {
            timelines: HashMap::new(),
            min_duration: min_duration.max(1),
        }
    }

    pub fn min_duration(&self) -> u32 {
        self.min_duration
    }

    /// Validate `[start, end)` against duration, window and every other
    /// interval of the timeline except `exclude_id`.
    pub fn check_placement(
        &self,
        timeline_key: &str,
        start: u32,
        end: u32,
        exclude_id: Option<&str>,
    ) -> Result<(), PlacementRejection> {
        if end <= start || end - start < self.min_duration {
            return Err(PlacementRejection::TooShort);
        }
        if !timescale::within_window(start, end) {
            return Err(PlacementRejection::OutOfBounds);
        }

        let conflict = self
            .intervals(timeline_key)
            .iter()
            .filter(|existing| Some(existing.id.as_str()) != exclude_id)
            .find(|existing| existing.overlaps(start, end));

        match conflict {
            Some(existing) => Err(PlacementRejection::Overlaps {
                with: existing.id.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn can_place(
        &self,
        timeline_key: &str,
        start: u32,
        end: u32,
        exclude_id: Option<&str>,
    ) -> bool {
        self.check_placement(timeline_key, start, end, exclude_id)
            .is_ok()
    }

    /// Append an interval to `timeline_key`. The interval is re-keyed to the
    /// timeline it is stored under.
    pub fn add(&mut self, timeline_key: &str, mut interval: Interval) -> Result<(), PlacementRejection> {
        self.check_placement(timeline_key, interval.start, interval.end, None)?;
        interval.timeline_key = timeline_key.to_string();
        self.timelines
            .entry(timeline_key.to_string())
            .or_default()
            .push(interval);
        Ok(())
    }

    /// Move both boundaries of an existing interval, keeping its position in
    /// insertion order.
    pub fn replace(
        &mut self,
        timeline_key: &str,
        id: &str,
        new_start: u32,
        new_end: u32,
    ) -> Result<Interval, PlacementRejection> {
        if self.get(timeline_key, id).is_none() {
            return Err(PlacementRejection::UnknownInterval { id: id.to_string() });
        }
        self.check_placement(timeline_key, new_start, new_end, Some(id))?;

        let interval = self
            .timelines
            .get_mut(timeline_key)
            .and_then(|intervals| intervals.iter_mut().find(|interval| interval.id == id))
            .ok_or_else(|| PlacementRejection::UnknownInterval { id: id.to_string() })?;
        interval.start = new_start;
        interval.end = new_end;
        Ok(interval.clone())
    }

    pub fn remove(&mut self, timeline_key: &str, id: &str) -> Option<Interval> {
        let intervals = self.timelines.get_mut(timeline_key)?;
        let index = intervals.iter().position(|interval| interval.id == id)?;
        Some(intervals.remove(index))
    }

    /// Remove the most recently created interval ("undo last").
    pub fn remove_last(&mut self, timeline_key: &str) -> Option<Interval> {
        self.timelines.get_mut(timeline_key)?.pop()
    }

    pub fn clear(&mut self, timeline_key: &str) -> Vec<Interval> {
        self.timelines
            .get_mut(timeline_key)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn get(&self, timeline_key: &str, id: &str) -> Option<&Interval> {
        self.intervals(timeline_key)
            .iter()
            .find(|interval| interval.id == id)
    }

    /// Intervals of a timeline in creation order.
    pub fn intervals(&self, timeline_key: &str) -> &[Interval] {
        self.timelines
            .get(timeline_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Intervals of a timeline ordered by start minute.
    pub fn sorted_intervals(&self, timeline_key: &str) -> Vec<Interval> {
        let mut intervals = self.intervals(timeline_key).to_vec();
        intervals.sort_by_key(|interval| interval.start);
        intervals
    }

    /// Covered minutes. Intervals never overlap, so the sum is exact.
    pub fn coverage(&self, timeline_key: &str) -> u32 {
        self.intervals(timeline_key)
            .iter()
            .map(Interval::duration_minutes)
            .sum()
    }

    pub fn meets_coverage(&self, timeline_key: &str, min_coverage: u32) -> bool {
        self.coverage(timeline_key) >= min_coverage
    }

    /// Whether the whole 24-hour window is covered.
    pub fn is_saturated(&self, timeline_key: &str) -> bool {
        self.coverage(timeline_key) >= WINDOW_MINUTES
    }
}
