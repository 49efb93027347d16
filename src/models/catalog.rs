//! Timeline definitions as loaded from survey configuration.
//!
//! Definitions are immutable once loaded. Field names follow the JSON
//! configuration document (camelCase, kebab-case selection modes).

use serde::{Deserialize, Serialize};

/// How many activities a single interval may carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    #[default]
    SingleChoice,
    MultipleChoice,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::SingleChoice => "single-choice",
            SelectionMode::MultipleChoice => "multiple-choice",
        }
    }
}

/// One configured timeline (e.g. "primary activity", "device use").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDefinition {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mode: SelectionMode,
    /// Minutes that must be covered before the respondent may advance.
    #[serde(default, alias = "minCoverageMinutes")]
    pub min_coverage: u32,
    pub categories: Vec<Category>,
}

impl TimelineDefinition {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Look up an activity by category and activity name.
    pub fn activity(&self, category: &str, activity: &str) -> Option<(&Category, &Activity)> {
        let category = self.category(category)?;
        let activity = category.activity(activity)?;
        Some((category, activity))
    }

    pub fn activity_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.activities.len())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub activities: Vec<Activity>,
}

impl Category {
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub examples: Option<String>,
    #[serde(default)]
    pub is_custom_input: bool,
    #[serde(default)]
    pub child_items: Vec<ChildItem>,
}

impl Activity {
    pub fn child(&self, name: &str) -> Option<&ChildItem> {
        self.child_items.iter().find(|child| child.name == name)
    }
}

/// Sub-option of an activity (e.g. "Reading" -> "Paper book").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildItem {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_custom_input: bool,
}

/// Whole survey configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyConfig {
    pub timelines: Vec<TimelineDefinition>,
}

impl SurveyConfig {
    pub fn keys(&self) -> Vec<String> {
        self.timelines.iter().map(|timeline| timeline.key.clone()).collect()
    }

    pub fn timeline(&self, key: &str) -> Option<&TimelineDefinition> {
        self.timelines.iter().find(|timeline| timeline.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r##"{
        "timelines": [{
            "key": "primary",
            "name": "Primary activity",
            "mode": "multiple-choice",
            "minCoverageMinutes": 1440,
            "categories": [{
                "name": "Leisure",
                "activities": [
                    {"name": "Reading", "color": "#aabbcc",
                     "childItems": [{"name": "Paper book"}, {"name": "Other", "isCustomInput": true}]},
                    {"name": "Something else", "color": "#112233", "isCustomInput": true}
                ]
            }]
        }]
    }"##;

    #[test]
    fn parses_configuration_document() {
        let config: SurveyConfig = serde_json::from_str(DOCUMENT).unwrap();
        let timeline = config.timeline("primary").unwrap();

        assert_eq!(timeline.mode, SelectionMode::MultipleChoice);
        assert_eq!(timeline.min_coverage, 1440);
        assert_eq!(timeline.description, "");
        assert_eq!(timeline.activity_count(), 2);

        let (_, reading) = timeline.activity("Leisure", "Reading").unwrap();
        assert!(!reading.is_custom_input);
        assert!(reading.child("Other").unwrap().is_custom_input);
        assert!(reading.child("Paper book").unwrap().color.is_none());
    }

    #[test]
    fn mode_defaults_to_single_choice() {
        let timeline: TimelineDefinition =
            serde_json::from_str(r#"{"key":"k","name":"n","categories":[]}"#).unwrap();
        assert_eq!(timeline.mode, SelectionMode::SingleChoice);
        assert_eq!(timeline.min_coverage, 0);
    }
}
