use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};
use crate::interaction::{SurfaceId, SurfaceLayout, TimelineSurface};
use crate::models::{ActivityDescriptor, TimelineDefinition};
use crate::store::IntervalStore;
use crate::{log_debug, log_info};

use super::cooldown::Cooldown;
use super::state::{NavigationState, TimelinePhase, TimelineRuntimeState};

const ENABLE_LOGS: bool = true;

/// Why a navigation request did nothing. Not an error.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NavigationRefusal {
    /// Another transition happened inside the cooldown window.
    Debounced,
    AtLastTimeline,
    AtFirstTimeline,
    /// `go_back` before the first timeline was entered.
    NotStarted,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub from: Option<String>,
    pub to: String,
    pub index: usize,
    pub surface: SurfaceId,
    /// True when the surface came from the retained pool instead of a rebuild.
    pub restored: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "result", content = "detail")]
pub enum NavOutcome {
    Moved(Transition),
    Refused(NavigationRefusal),
}

impl NavOutcome {
    pub fn moved(&self) -> Option<&Transition> {
        match self {
            NavOutcome::Moved(transition) => Some(transition),
            NavOutcome::Refused(_) => None,
        }
    }
}

/// Owns the ordered timelines, the active surface and the retained pool.
#[derive(Debug, Clone)]
pub struct TimelineNavigator {
    state: NavigationState,
    runtime: HashMap<String, TimelineRuntimeState>,
    definitions: HashMap<String, Arc<TimelineDefinition>>,
    cooldown: Cooldown,
    layout: SurfaceLayout,
    next_surface: u64,
}

impl TimelineNavigator {
    pub fn new(keys: Vec<String>, layout: SurfaceLayout, cooldown: Duration) -> Self {
        let runtime = keys
            .iter()
            .map(|key| (key.clone(), TimelineRuntimeState::default()))
            .collect();

        Self {
            state: NavigationState::new(keys),
            runtime,
            definitions: HashMap::new(),
            cooldown: Cooldown::new(cooldown),
            layout,
            next_surface: 1,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.state.keys
    }

    pub fn index(&self) -> Option<usize> {
        self.state.index
    }

    pub fn active_key(&self) -> Option<&str> {
        self.state.active_key()
    }

    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    pub fn phase(&self, key: &str) -> TimelinePhase {
        self.runtime
            .get(key)
            .map(|runtime| runtime.phase)
            .unwrap_or_default()
    }

    pub fn has_definition(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn definition(&self, key: &str) -> Option<&Arc<TimelineDefinition>> {
        self.definitions.get(key)
    }

    pub fn active_definition(&self) -> Option<&Arc<TimelineDefinition>> {
        self.active_key().and_then(|key| self.definitions.get(key))
    }

    /// Cache a fetched definition. Only keys in the navigation order are accepted.
    pub fn register_definition(&mut self, definition: TimelineDefinition) -> ConfigResult<()> {
        if !self.runtime.contains_key(&definition.key) {
            return Err(ConfigError::MissingTimeline {
                key: definition.key,
            });
        }
        self.definitions
            .insert(definition.key.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn active_surface(&self) -> Option<&TimelineSurface> {
        self.state.active_surface.as_ref()
    }

    pub fn active_surface_mut(&mut self) -> Option<&mut TimelineSurface> {
        self.state.active_surface.as_mut()
    }

    pub fn retained_surface(&self, key: &str) -> Option<&TimelineSurface> {
        self.runtime
            .get(key)
            .and_then(|runtime| runtime.retained.as_ref())
    }

    pub fn selected_activity(&self) -> Option<&ActivityDescriptor> {
        self.state.selected_activity.as_ref()
    }

    pub fn set_selected_activity(&mut self, descriptor: Option<ActivityDescriptor>) {
        self.state.selected_activity = descriptor;
    }

    /// Split borrow of the pieces a gesture needs.
    pub fn gesture_parts(
        &mut self,
    ) -> Option<(&mut TimelineSurface, &mut Option<ActivityDescriptor>)> {
        let NavigationState {
            active_surface,
            selected_activity,
            ..
        } = &mut self.state;
        active_surface
            .as_mut()
            .map(|surface| (surface, selected_activity))
    }

    /// Key `go_next` would move to, or why it would refuse.
    pub fn next_target(&self, now: Instant) -> Result<&str, NavigationRefusal> {
        if !self.cooldown.is_ready(now) {
            return Err(NavigationRefusal::Debounced);
        }
        let target = self.state.index.map_or(0, |index| index + 1);
        self.state
            .keys
            .get(target)
            .map(String::as_str)
            .ok_or(NavigationRefusal::AtLastTimeline)
    }

    /// Key `go_back` would move to, or why it would refuse.
    pub fn previous_target(&self, now: Instant) -> Result<&str, NavigationRefusal> {
        if !self.cooldown.is_ready(now) {
            return Err(NavigationRefusal::Debounced);
        }
        match self.state.index {
            None => Err(NavigationRefusal::NotStarted),
            Some(0) => Err(NavigationRefusal::AtFirstTimeline),
            Some(index) => Ok(self.state.keys[index - 1].as_str()),
        }
    }

    /// Advance to the next timeline. Its definition must already be
    /// registered; the caller fetches it first.
    pub fn go_next(&mut self, now: Instant, store: &IntervalStore) -> ConfigResult<NavOutcome> {
        let target = match self.next_target(now) {
            Ok(key) => key.to_string(),
            Err(refusal) => {
                log_debug!("go_next refused: {:?}", refusal);
                return Ok(NavOutcome::Refused(refusal));
            }
        };
        let index = self.state.index.map_or(0, |index| index + 1);
        self.transition(now, index, target, store)
    }

    /// Return to the previous timeline.
    pub fn go_back(&mut self, now: Instant, store: &IntervalStore) -> ConfigResult<NavOutcome> {
        let target = match self.previous_target(now) {
            Ok(key) => key.to_string(),
            Err(refusal) => {
                log_debug!("go_back refused: {:?}", refusal);
                return Ok(NavOutcome::Refused(refusal));
            }
        };
        let index = self.state.index.map_or(0, |index| index.saturating_sub(1));
        self.transition(now, index, target, store)
    }

    fn transition(
        &mut self,
        now: Instant,
        index: usize,
        target: String,
        store: &IntervalStore,
    ) -> ConfigResult<NavOutcome> {
        if !self.definitions.contains_key(&target) {
            return Err(ConfigError::MissingTimeline { key: target });
        }

        let from = self.retire_active();
        if let Some(current) = self.state.index {
            // Timelines at or after the one being left stay restorable.
            for key in self.state.keys.iter().skip(current) {
                if let Some(runtime) = self.runtime.get_mut(key) {
                    if runtime.phase == TimelinePhase::Active {
                        runtime.phase = TimelinePhase::Inactive;
                    }
                }
            }
        }

        let (surface, restored) = self.activate(&target, store);
        let surface_id = surface.id();
        self.state.active_surface = Some(surface);
        self.state.index = Some(index);
        self.state.selected_activity = None;
        self.cooldown.mark(now);

        log_info!(
            "Timeline {} -> {} ({})",
            from.as_deref().unwrap_or("<start>"),
            target,
            if restored { "restored" } else { "built" }
        );

        Ok(NavOutcome::Moved(Transition {
            from,
            to: target,
            index,
            surface: surface_id,
            restored,
        }))
    }

    /// Move the active surface into the retained pool.
    fn retire_active(&mut self) -> Option<String> {
        let mut surface = self.state.active_surface.take()?;
        surface.clear_preview();
        surface.clear_feedback();

        let key = surface.timeline_key().to_string();
        let runtime = self.runtime.entry(key.clone()).or_default();
        runtime.phase = TimelinePhase::Inactive;
        runtime.retained = Some(surface);
        Some(key)
    }

    /// Reuse the retained surface for `key`, or build one from the store.
    fn activate(&mut self, key: &str, store: &IntervalStore) -> (TimelineSurface, bool) {
        let layout = self.layout;
        let surface_id = SurfaceId(self.next_surface);
        let runtime = self.runtime.entry(key.to_string()).or_default();
        runtime.phase = TimelinePhase::Active;

        match runtime.retained.take() {
            Some(mut surface) => {
                surface.set_layout(layout);
                (surface, true)
            }
            None => {
                self.next_surface += 1;
                let surface =
                    TimelineSurface::build(surface_id, key, layout, store.intervals(key));
                (surface, false)
            }
        }
    }

    /// Apply a new axis/geometry to the active and every retained surface.
    pub fn set_layout(&mut self, layout: SurfaceLayout) {
        self.layout = layout;
        if let Some(surface) = self.state.active_surface.as_mut() {
            surface.set_layout(layout);
        }
        for runtime in self.runtime.values_mut() {
            if let Some(surface) = runtime.retained.as_mut() {
                surface.set_layout(layout);
            }
        }
    }

    /// Let the next transition through immediately.
    pub fn reset_cooldown(&mut self) {
        self.cooldown.reset();
    }
}
