//! Checks applied to every timeline definition before it is used.

use crate::error::{ConfigError, ConfigResult};
use crate::models::{SurveyConfig, TimelineDefinition};
use crate::timescale::{DEFAULT_STEP, WINDOW_MINUTES};

const MAX_NAME_LENGTH: usize = 200;

pub fn validate_color(color: &str) -> Result<(), String> {
    let Some(hex_part) = color.strip_prefix('#') else {
        return Err(format!("invalid color {color}: must be hex (#RRGGBB)"));
    };

    if hex_part.len() != 6 && hex_part.len() != 8 {
        return Err(format!("invalid color {color}: must be #RRGGBB or #RRGGBBAA"));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid color {color}: must be hex (#RRGGBB)"));
    }

    Ok(())
}

fn validate_name(name: &str, what: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{what} name is empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(format!("{what} name too long (max {MAX_NAME_LENGTH} chars)"));
    }
    Ok(())
}

pub fn validate_min_coverage(minutes: u32) -> Result<(), String> {
    if minutes > WINDOW_MINUTES {
        return Err(format!("minCoverage {minutes} exceeds {WINDOW_MINUTES}"));
    }
    if minutes % DEFAULT_STEP != 0 {
        return Err(format!("minCoverage {minutes} is not a multiple of {DEFAULT_STEP}"));
    }
    Ok(())
}

pub fn validate_definition(definition: &TimelineDefinition) -> ConfigResult<()> {
    let key = definition.key.as_str();
    let invalid = |details: String| ConfigError::invalid(key, details);

    if key.trim().is_empty() {
        return Err(ConfigError::invalid("<empty>", "timeline key is empty"));
    }
    validate_name(&definition.name, "timeline").map_err(invalid)?;
    validate_min_coverage(definition.min_coverage).map_err(invalid)?;

    if definition.categories.is_empty() {
        return Err(invalid("no categories".into()));
    }

    for category in &definition.categories {
        validate_name(&category.name, "category").map_err(invalid)?;
        if category.activities.is_empty() {
            return Err(invalid(format!("category {} has no activities", category.name)));
        }

        for activity in &category.activities {
            validate_name(&activity.name, "activity").map_err(invalid)?;
            validate_color(&activity.color).map_err(invalid)?;

            for child in &activity.child_items {
                validate_name(&child.name, "child item").map_err(invalid)?;
                if let Some(color) = &child.color {
                    validate_color(color).map_err(invalid)?;
                }
            }
        }
    }

    Ok(())
}

/// Validate every timeline and reject duplicate keys.
pub fn validate_config(config: &SurveyConfig) -> ConfigResult<()> {
    if config.timelines.is_empty() {
        return Err(ConfigError::NoTimelines);
    }

    let mut seen: Vec<&str> = Vec::with_capacity(config.timelines.len());
    for timeline in &config.timelines {
        if seen.contains(&timeline.key.as_str()) {
            return Err(ConfigError::invalid(&timeline.key, "duplicate timeline key"));
        }
        seen.push(timeline.key.as_str());
        validate_definition(timeline)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SurveyConfig {
        serde_json::from_str(json).unwrap()
    }

    const VALID: &str = r##"{"timelines":[{"key":"primary","name":"Primary","minCoverage":1440,
        "categories":[{"name":"Sleep","activities":[{"name":"Sleeping","color":"#102030"}]}]}]}"##;

    #[test]
    fn colors() {
        assert!(validate_color("#a1b2c3").is_ok());
        assert!(validate_color("#a1b2c3ff").is_ok());
        assert!(validate_color("a1b2c3").is_err());
        assert!(validate_color("#a1b2c").is_err());
        assert!(validate_color("#zzzzzz").is_err());
    }

    #[test]
    fn coverage_must_be_on_grid() {
        assert!(validate_min_coverage(0).is_ok());
        assert!(validate_min_coverage(1440).is_ok());
        assert!(validate_min_coverage(1450).is_err());
        assert!(validate_min_coverage(125).is_err());
    }

    #[test]
    fn accepts_valid_document() {
        assert!(validate_config(&parse(VALID)).is_ok());
    }

    #[test]
    fn rejects_bad_documents() {
        let empty = parse(r#"{"timelines":[]}"#);
        assert!(matches!(validate_config(&empty), Err(ConfigError::NoTimelines)));

        let bad_color = VALID.replace("#102030", "red");
        let err = validate_config(&parse(&bad_color)).unwrap_err();
        assert_eq!(err.code(), "CFG-1003");
        assert!(err.to_string().contains("primary"));

        let no_activities = parse(
            r#"{"timelines":[{"key":"k","name":"n","categories":[{"name":"c","activities":[]}]}]}"#,
        );
        assert!(validate_config(&no_activities).is_err());

        let mut duplicated = parse(VALID);
        duplicated.timelines.push(duplicated.timelines[0].clone());
        assert!(validate_config(&duplicated).is_err());
    }
}
