//! The "selected, not yet placed" activity handed from the picker to the
//! interaction layer.

use serde::{Deserialize, Serialize};

use super::catalog::{Activity, Category, ChildItem};

/// Fill of an interval block: one color, or a gradient when several
/// activities share the interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ActivityColor {
    Solid(String),
    Gradient(Vec<String>),
}

impl ActivityColor {
    pub fn from_colors(mut colors: Vec<String>) -> Self {
        if colors.len() == 1 {
            ActivityColor::Solid(colors.remove(0))
        } else {
            ActivityColor::Gradient(colors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptor {
    /// One label, or several in multiple-choice mode.
    pub labels: Vec<String>,
    pub category: String,
    pub color: ActivityColor,
    /// Activity name when a child item was picked.
    pub parent_label: Option<String>,
    /// True when the label was typed by the respondent.
    pub is_custom_input: bool,
    /// Catalog path of what was picked, kept for export provenance.
    pub original_selection: Option<String>,
}

impl ActivityDescriptor {
    pub fn from_activity(category: &Category, activity: &Activity) -> Self {
        Self {
            labels: vec![activity.name.clone()],
            category: category.name.clone(),
            color: ActivityColor::Solid(activity.color.clone()),
            parent_label: None,
            is_custom_input: false,
            original_selection: Some(activity.name.clone()),
        }
    }

    /// A child item inherits its parent's color unless it defines one.
    pub fn from_child(category: &Category, activity: &Activity, child: &ChildItem) -> Self {
        let color = child.color.clone().unwrap_or_else(|| activity.color.clone());
        Self {
            labels: vec![child.name.clone()],
            category: category.name.clone(),
            color: ActivityColor::Solid(color),
            parent_label: Some(activity.name.clone()),
            is_custom_input: child.is_custom_input,
            original_selection: Some(format!("{} > {}", activity.name, child.name)),
        }
    }

    /// Free text typed into an activity that accepts custom input.
    pub fn custom(category: &Category, activity: &Activity, text: &str) -> Self {
        Self {
            labels: vec![text.trim().to_string()],
            category: category.name.clone(),
            color: ActivityColor::Solid(activity.color.clone()),
            parent_label: None,
            is_custom_input: true,
            original_selection: Some(activity.name.clone()),
        }
    }

    /// Several activities placed as one interval (multiple-choice timelines).
    ///
    /// Returns `None` for an empty selection.
    pub fn from_activities(selections: &[(&Category, &Activity)]) -> Option<Self> {
        if selections.is_empty() {
            return None;
        }

        let labels: Vec<String> = selections
            .iter()
            .map(|(_, activity)| activity.name.clone())
            .collect();
        let colors = selections
            .iter()
            .map(|(_, activity)| activity.color.clone())
            .collect();

        let mut categories: Vec<&str> = Vec::new();
        for (category, _) in selections {
            if !categories.contains(&category.name.as_str()) {
                categories.push(category.name.as_str());
            }
        }

        Some(Self {
            original_selection: Some(labels.join(" | ")),
            labels,
            category: categories.join(" | "),
            color: ActivityColor::from_colors(colors),
            parent_label: None,
            is_custom_input: false,
        })
    }

    pub fn display_label(&self) -> String {
        self.labels.join(" | ")
    }
}
