use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::{ActivityColor, ActivityDescriptor};

/// A placed activity on one timeline, in absolute minutes `[start, end)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub id: String,
    pub timeline_key: String,
    pub start: u32,
    pub end: u32,
    pub labels: Vec<String>,
    pub category: String,
    pub color: ActivityColor,
    pub parent_label: Option<String>,
    pub is_custom_input: bool,
    pub original_selection: Option<String>,
}

impl Interval {
    pub fn from_descriptor(
        timeline_key: &str,
        start: u32,
        end: u32,
        descriptor: &ActivityDescriptor,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timeline_key: timeline_key.to_string(),
            start,
            end,
            labels: descriptor.labels.clone(),
            category: descriptor.category.clone(),
            color: descriptor.color.clone(),
            parent_label: descriptor.parent_label.clone(),
            is_custom_input: descriptor.is_custom_input,
            original_selection: descriptor.original_selection.clone(),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start.max(start) < self.end.min(end)
    }

    pub fn display_label(&self) -> String {
        self.labels.join(" | ")
    }
}
