//! Flat records for the submission collaborator, one per interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Interval;
use crate::store::IntervalStore;
use crate::timescale;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub timeline_key: String,
    pub activity: String,
    pub labels: Vec<String>,
    pub category: String,
    /// Clock time, e.g. "23:30" or "02:00(+1)".
    pub start_time: String,
    pub end_time: String,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub duration_minutes: u32,
    pub parent_label: Option<String>,
    pub is_custom_input: bool,
    pub original_selection: Option<String>,
}

impl From<&Interval> for ExportRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            timeline_key: interval.timeline_key.clone(),
            activity: interval.display_label(),
            labels: interval.labels.clone(),
            category: interval.category.clone(),
            start_time: timescale::format_start(interval.start),
            end_time: timescale::format_end(interval.end),
            start_minutes: interval.start,
            end_minutes: interval.end,
            duration_minutes: interval.duration_minutes(),
            parent_label: interval.parent_label.clone(),
            is_custom_input: interval.is_custom_input,
            original_selection: interval.original_selection.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub records: Vec<ExportRecord>,
}

/// Records for every timeline in `keys` order, each timeline sorted by start.
pub fn export_records(keys: &[String], store: &IntervalStore) -> Vec<ExportRecord> {
    keys.iter()
        .flat_map(|key| store.sorted_intervals(key))
        .map(|interval| ExportRecord::from(&interval))
        .collect()
}

pub fn export_document(
    keys: &[String],
    store: &IntervalStore,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        exported_at,
        records: export_records(keys, store),
    }
}

pub fn export_json(keys: &[String], store: &IntervalStore) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export_document(keys, store, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityColor, ActivityDescriptor};
    use chrono::TimeZone;

    fn descriptor(label: &str) -> ActivityDescriptor {
        ActivityDescriptor {
            labels: vec![label.into()],
            category: "Leisure".into(),
            color: ActivityColor::Solid("#336699".into()),
            parent_label: Some("Reading".into()),
            is_custom_input: false,
            original_selection: Some("Reading > Paper book".into()),
        }
    }

    fn store() -> IntervalStore {
        let mut store = IntervalStore::default();
        for (key, start, end, label) in [
            ("devices", 300, 360, "Phone"),
            ("primary", 1500, 1680, "Sleeping"),
            ("primary", 240, 300, "Paper book"),
        ] {
            let interval = Interval::from_descriptor(key, start, end, &descriptor(label));
            store.add(key, interval).unwrap();
        }
        store
    }

    #[test]
    fn records_follow_navigation_order_then_start() {
        let keys = vec!["primary".to_string(), "devices".to_string()];
        let records = export_records(&keys, &store());

        let order: Vec<(&str, u32)> = records
            .iter()
            .map(|record| (record.timeline_key.as_str(), record.start_minutes))
            .collect();
        assert_eq!(order, vec![("primary", 240), ("primary", 1500), ("devices", 300)]);
    }

    #[test]
    fn clock_strings_use_next_day_marker() {
        let keys = vec!["primary".to_string()];
        let records = export_records(&keys, &store());

        assert_eq!(records[0].start_time, "04:00");
        assert_eq!(records[0].end_time, "05:00");
        assert_eq!(records[1].start_time, "01:00(+1)");
        assert_eq!(records[1].end_time, "04:00(+1)");
        assert_eq!(records[1].duration_minutes, 180);
        assert_eq!(records[0].parent_label.as_deref(), Some("Reading"));
    }

    #[test]
    fn document_is_camel_case() {
        let keys = vec!["devices".to_string()];
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_value(export_document(&keys, &store(), at)).unwrap();

        assert_eq!(json["exportedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["records"][0]["timelineKey"], "devices");
        assert_eq!(json["records"][0]["activity"], "Phone");
        assert_eq!(json["records"][0]["durationMinutes"], 60);
    }
}
