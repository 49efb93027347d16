//! Visual surface of one timeline.
//!
//! A surface is the rendered representation only: percentages, labels and
//! colors derived from intervals. Interval data lives in the store and is
//! never read back from a surface.

use serde::{Deserialize, Serialize};

use crate::error::PlacementRejection;
use crate::models::{ActivityColor, Interval};
use crate::placement::Edge;
use crate::timescale;

use super::axis::{PointerPosition, SurfaceLayout};

/// Opaque handle identifying one built surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    pub interval_id: String,
    pub start_pct: f64,
    pub end_pct: f64,
    pub label: String,
    pub color: ActivityColor,
}

impl RenderedBlock {
    fn from_interval(interval: &Interval) -> Self {
        Self {
            interval_id: interval.id.clone(),
            start_pct: timescale::minutes_to_percentage(interval.start),
            end_pct: timescale::minutes_to_percentage(interval.end),
            label: interval.display_label(),
            color: interval.color.clone(),
        }
    }
}

/// Uncommitted rectangle drawn while a create gesture is dragging.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBlock {
    pub start: u32,
    pub end: u32,
    pub start_pct: f64,
    pub end_pct: f64,
    pub valid: bool,
}

/// What sits under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Empty,
    Body { interval_id: String },
    Edge { interval_id: String, edge: Edge },
}

#[derive(Debug, Clone)]
pub struct TimelineSurface {
    id: SurfaceId,
    timeline_key: String,
    layout: SurfaceLayout,
    blocks: Vec<RenderedBlock>,
    preview: Option<PreviewBlock>,
    feedback: Option<PlacementRejection>,
}

impl TimelineSurface {
    /// Build a surface from scratch, rendering `intervals`.
    pub fn build(
        id: SurfaceId,
        timeline_key: &str,
        layout: SurfaceLayout,
        intervals: &[Interval],
    ) -> Self {
        let mut surface = Self {
            id,
            timeline_key: timeline_key.to_string(),
            layout,
            blocks: Vec::new(),
            preview: None,
            feedback: None,
        };
        surface.sync(intervals);
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn timeline_key(&self) -> &str {
        &self.timeline_key
    }

    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: SurfaceLayout) {
        self.layout = layout;
    }

    pub fn blocks(&self) -> &[RenderedBlock] {
        &self.blocks
    }

    pub fn block(&self, interval_id: &str) -> Option<&RenderedBlock> {
        self.blocks
            .iter()
            .find(|block| block.interval_id == interval_id)
    }

    /// Draw or redraw the block for `interval`.
    pub fn render_interval(&mut self, interval: &Interval) {
        let block = RenderedBlock::from_interval(interval);
        match self
            .blocks
            .iter_mut()
            .find(|existing| existing.interval_id == interval.id)
        {
            Some(existing) => *existing = block,
            None => self.blocks.push(block),
        }
    }

    pub fn remove_block(&mut self, interval_id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.interval_id != interval_id);
        self.blocks.len() != before
    }

    /// Replace every block with a fresh rendering of `intervals`.
    pub fn sync(&mut self, intervals: &[Interval]) {
        self.blocks = intervals.iter().map(RenderedBlock::from_interval).collect();
    }

    pub fn preview(&self) -> Option<&PreviewBlock> {
        self.preview.as_ref()
    }

    pub fn set_preview(&mut self, start: u32, end: u32, valid: bool) {
        self.preview = Some(PreviewBlock {
            start,
            end,
            start_pct: timescale::minutes_to_percentage(start),
            end_pct: timescale::minutes_to_percentage(end),
            valid,
        });
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// Transient invalid-placement indicator; cleared by the next accepted
    /// change or the next gesture.
    pub fn feedback(&self) -> Option<&PlacementRejection> {
        self.feedback.as_ref()
    }

    pub fn flag_invalid(&mut self, rejection: PlacementRejection) {
        self.feedback = Some(rejection);
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    /// Resolve the pointer to an edge handle, a block body, or empty space.
    /// A handle only reaches into its own block; edges win over bodies and
    /// among edges the nearest wins.
    pub fn hit_test(&self, position: PointerPosition, handle_px: f64) -> HitTarget {
        if !self.layout.geometry.contains(position) {
            return HitTarget::Empty;
        }
        let along = self.layout.axis.along(position);

        let mut nearest: Option<(f64, &RenderedBlock, Edge)> = None;
        for block in &self.blocks {
            let candidates = [
                (self.layout.pixel_at(block.start_pct), Edge::Start),
                (self.layout.pixel_at(block.end_pct), Edge::End),
            ];
            for (pixel, edge) in candidates {
                let inward = match edge {
                    Edge::Start => along >= pixel,
                    Edge::End => along <= pixel,
                };
                let distance = (along - pixel).abs();
                if !inward || distance > handle_px {
                    continue;
                }
                if nearest.map_or(true, |(best, _, _)| distance < best) {
                    nearest = Some((distance, block, edge));
                }
            }
        }
        if let Some((_, block, edge)) = nearest {
            return HitTarget::Edge {
                interval_id: block.interval_id.clone(),
                edge,
            };
        }

        self.blocks
            .iter()
            .find(|block| {
                let start = self.layout.pixel_at(block.start_pct);
                let end = self.layout.pixel_at(block.end_pct);
                along >= start && along < end
            })
            .map_or(HitTarget::Empty, |block| HitTarget::Body {
                interval_id: block.interval_id.clone(),
            })
    }
}
