//! Scripted sessions: a JSON list of picker, pointer and navigation steps
//! fed through a [`Survey`], for reproducing respondent sessions offline.

use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::TimelineSource;
use crate::interaction::{GestureOutcome, PointerEvent, PointerKind, SurfaceGeometry};
use crate::models::{ActivityDescriptor, TimelineDefinition};
use crate::navigation::NavOutcome;
use crate::survey::Survey;
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

/// One catalog entry, addressed by category and activity name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub category: String,
    pub activity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Single-choice pick, optionally narrowed to a child item or given
    /// free text for a custom-input activity.
    Select {
        category: String,
        activity: String,
        #[serde(default)]
        child: Option<String>,
        #[serde(default)]
        custom: Option<String>,
    },
    /// Multiple-choice pick.
    SelectMany { picks: Vec<Pick> },
    Deselect,
    /// Pointer event on whichever surface is active when the step runs.
    Pointer { kind: PointerKind, x: f64, y: f64 },
    Next,
    Back,
    Undo,
    Clear,
    Layout {
        narrow: bool,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Malformed replay script")
    }
}

/// Tally of what a replay did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub steps: usize,
    pub created: usize,
    pub rejected: usize,
    /// Pointer steps that changed the interval store.
    pub mutations: usize,
    pub transitions: usize,
    pub refusals: usize,
}

/// Run `script` against `survey`. The clock advances by one cooldown
/// window per step, so navigation steps are never debounced.
pub async fn replay<S: TimelineSource>(
    survey: &mut Survey<S>,
    script: &Script,
) -> Result<ReplaySummary> {
    let tick = survey.settings().navigation_cooldown() + Duration::from_millis(1);
    let mut now = Instant::now();
    let mut summary = ReplaySummary::default();

    for (index, step) in script.steps.iter().enumerate() {
        now += tick;
        summary.steps += 1;

        match step {
            ScriptStep::Select {
                category,
                activity,
                child,
                custom,
            } => {
                let definition = active_definition(survey)?;
                let descriptor = describe(
                    &definition,
                    category,
                    activity,
                    child.as_deref(),
                    custom.as_deref(),
                )
                .with_context(|| format!("step {index}"))?;
                survey.set_selected_activity(Some(descriptor));
            }
            ScriptStep::SelectMany { picks } => {
                let definition = active_definition(survey)?;
                let descriptor = describe_many(&definition, picks)
                    .with_context(|| format!("step {index}"))?;
                survey.set_selected_activity(Some(descriptor));
            }
            ScriptStep::Deselect => survey.set_selected_activity(None),
            ScriptStep::Pointer { kind, x, y } => {
                let surface = survey
                    .active_surface()
                    .map(|surface| surface.id())
                    .ok_or_else(|| anyhow!("step {index}: no active timeline"))?;
                let outcome = survey.handle_pointer(PointerEvent::new(surface, *kind, *x, *y));
                log_debug!("step {}: {:?}", index, outcome);
                if outcome.mutated_store() {
                    summary.mutations += 1;
                }
                match outcome {
                    GestureOutcome::Created(_) => summary.created += 1,
                    GestureOutcome::Rejected(_) => summary.rejected += 1,
                    _ => {}
                }
            }
            ScriptStep::Next => {
                let outcome = survey.go_next_at(now).await?;
                tally(&mut summary, &outcome);
            }
            ScriptStep::Back => {
                let outcome = survey.go_back_at(now).await?;
                tally(&mut summary, &outcome);
            }
            ScriptStep::Undo => {
                survey.undo_last();
            }
            ScriptStep::Clear => {
                survey.clear_active();
            }
            ScriptStep::Layout {
                narrow,
                width,
                height,
            } => survey.set_layout(*narrow, SurfaceGeometry::new(*width, *height)),
        }
    }

    log_info!(
        "Replayed {} steps: {} created, {} rejected, {} transitions",
        summary.steps,
        summary.created,
        summary.rejected,
        summary.transitions
    );
    Ok(summary)
}

fn tally(summary: &mut ReplaySummary, outcome: &NavOutcome) {
    match outcome {
        NavOutcome::Moved(_) => summary.transitions += 1,
        NavOutcome::Refused(_) => summary.refusals += 1,
    }
}

fn active_definition<S: TimelineSource>(survey: &Survey<S>) -> Result<TimelineDefinition> {
    survey
        .active_definition()
        .cloned()
        .ok_or_else(|| anyhow!("no active timeline"))
}

fn describe(
    definition: &TimelineDefinition,
    category: &str,
    activity: &str,
    child: Option<&str>,
    custom: Option<&str>,
) -> Result<ActivityDescriptor> {
    let (category, activity) = definition
        .activity(category, activity)
        .ok_or_else(|| anyhow!("unknown activity {category}/{activity} in {}", definition.key))?;

    match (child, custom) {
        (Some(child_name), _) => {
            let child = activity
                .child(child_name)
                .ok_or_else(|| anyhow!("unknown child item {child_name}"))?;
            Ok(ActivityDescriptor::from_child(category, activity, child))
        }
        (None, Some(text)) => {
            if !activity.is_custom_input {
                bail!("{} does not accept free text", activity.name);
            }
            Ok(ActivityDescriptor::custom(category, activity, text))
        }
        (None, None) => Ok(ActivityDescriptor::from_activity(category, activity)),
    }
}

fn describe_many(definition: &TimelineDefinition, picks: &[Pick]) -> Result<ActivityDescriptor> {
    let selections = picks
        .iter()
        .map(|pick| {
            definition
                .activity(&pick.category, &pick.activity)
                .ok_or_else(|| anyhow!("unknown activity {}/{}", pick.category, pick.activity))
        })
        .collect::<Result<Vec<_>>>()?;
    ActivityDescriptor::from_activities(&selections).ok_or_else(|| anyhow!("empty selection"))
}
