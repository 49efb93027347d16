//! Single entry point for the picker and UI shell.
//!
//! `Survey` owns the interval store and wires the navigator, the gesture
//! controller and the configuration source together. Every mutation runs to
//! completion inside one `&mut self` call; the only suspension point is the
//! definition fetch when a timeline is entered for the first time.

use std::time::Instant;

use crate::catalog::{ensure_key, validation, TimelineSource};
use crate::error::{ConfigError, ConfigResult};
use crate::export::{self, ExportRecord};
use crate::interaction::{
    GestureContext, GestureOutcome, InteractionController, PointerEvent, SurfaceGeometry,
    SurfaceLayout, TimelineSurface,
};
use crate::models::{ActivityDescriptor, Interval, TimelineDefinition};
use crate::navigation::{NavOutcome, TimelineNavigator};
use crate::placement::PlacementEngine;
use crate::settings::EngineSettings;
use crate::store::IntervalStore;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

pub struct Survey<S: TimelineSource> {
    source: S,
    settings: EngineSettings,
    store: IntervalStore,
    engine: PlacementEngine,
    navigator: TimelineNavigator,
    controller: InteractionController,
}

impl<S: TimelineSource> Survey<S> {
    /// Fetch the timeline order and enter the first timeline.
    pub async fn bootstrap(source: S, settings: EngineSettings) -> ConfigResult<Self> {
        settings
            .validate()
            .map_err(|err| ConfigError::Settings {
                details: err.to_string(),
            })?;
        let keys = source.fetch_keys().await?;
        if keys.is_empty() {
            return Err(ConfigError::NoTimelines);
        }
        log_info!("Survey starting with timelines {:?}", keys);

        let mut survey = Self {
            navigator: TimelineNavigator::new(
                keys,
                SurfaceLayout::default(),
                settings.navigation_cooldown(),
            ),
            store: IntervalStore::new(settings.min_duration_minutes),
            engine: PlacementEngine::new(settings.placement()),
            controller: InteractionController::new(settings.interaction()),
            settings,
            source,
        };
        survey.go_next_at(Instant::now()).await?;
        // Entering the first timeline is not a user action.
        survey.navigator.reset_cooldown();
        Ok(survey)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    pub fn navigator(&self) -> &TimelineNavigator {
        &self.navigator
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn active_timeline_key(&self) -> Option<&str> {
        self.navigator.active_key()
    }

    pub fn active_definition(&self) -> Option<&TimelineDefinition> {
        self.navigator.active_definition().map(|definition| definition.as_ref())
    }

    pub fn active_intervals(&self) -> &[Interval] {
        match self.active_timeline_key() {
            Some(key) => self.store.intervals(key),
            None => &[],
        }
    }

    pub fn active_surface(&self) -> Option<&TimelineSurface> {
        self.navigator.active_surface()
    }

    pub fn set_selected_activity(&mut self, descriptor: Option<ActivityDescriptor>) {
        self.navigator.set_selected_activity(descriptor);
    }

    pub fn selected_activity(&self) -> Option<&ActivityDescriptor> {
        self.navigator.selected_activity()
    }

    pub fn coverage(&self) -> u32 {
        self.active_timeline_key()
            .map_or(0, |key| self.store.coverage(key))
    }

    /// True once the active timeline meets its minimum coverage.
    pub fn can_advance(&self) -> bool {
        match (self.active_timeline_key(), self.active_definition()) {
            (Some(key), Some(definition)) => {
                self.store.meets_coverage(key, definition.min_coverage)
            }
            _ => false,
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.active_timeline_key()
            .is_some_and(|key| self.store.is_saturated(key))
    }

    pub async fn go_next(&mut self) -> ConfigResult<NavOutcome> {
        self.go_next_at(Instant::now()).await
    }

    /// Advance at `now`. Refusals are `Ok(NavOutcome::Refused(_))`; only a
    /// failed definition fetch is an error, and it leaves every piece of
    /// state as it was.
    pub async fn go_next_at(&mut self, now: Instant) -> ConfigResult<NavOutcome> {
        let target = match self.navigator.next_target(now) {
            Ok(key) => key.to_string(),
            Err(refusal) => return Ok(NavOutcome::Refused(refusal)),
        };
        self.ensure_definition(&target).await?;

        self.cancel_gesture();
        let outcome = self.navigator.go_next(now, &self.store)?;
        self.rebind(&outcome);
        Ok(outcome)
    }

    pub async fn go_back(&mut self) -> ConfigResult<NavOutcome> {
        self.go_back_at(Instant::now()).await
    }

    pub async fn go_back_at(&mut self, now: Instant) -> ConfigResult<NavOutcome> {
        let target = match self.navigator.previous_target(now) {
            Ok(key) => key.to_string(),
            Err(refusal) => return Ok(NavOutcome::Refused(refusal)),
        };
        self.ensure_definition(&target).await?;

        self.cancel_gesture();
        let outcome = self.navigator.go_back(now, &self.store)?;
        self.rebind(&outcome);
        Ok(outcome)
    }

    /// Remove the most recently created interval on the active timeline.
    pub fn undo_last(&mut self) -> Option<Interval> {
        self.cancel_gesture();
        let key = self.active_timeline_key()?.to_string();
        let removed = self.store.remove_last(&key)?;
        if let Some(surface) = self.navigator.active_surface_mut() {
            surface.remove_block(&removed.id);
            surface.clear_feedback();
        }
        log_info!("Undid interval {} on {}", removed.id, key);
        Some(removed)
    }

    /// Remove every interval on the active timeline.
    pub fn clear_active(&mut self) -> Vec<Interval> {
        self.cancel_gesture();
        let Some(key) = self.active_timeline_key().map(str::to_string) else {
            return Vec::new();
        };
        let removed = self.store.clear(&key);
        if let Some(surface) = self.navigator.active_surface_mut() {
            surface.sync(&[]);
            surface.clear_feedback();
        }
        log_info!("Cleared {} intervals on {}", removed.len(), key);
        removed
    }

    /// Route a pointer event to the active surface's gesture machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> GestureOutcome {
        let Some((surface, selection)) = self.navigator.gesture_parts() else {
            return GestureOutcome::Ignored;
        };
        self.controller.handle(
            event,
            GestureContext {
                surface,
                store: &mut self.store,
                engine: &self.engine,
                selection,
            },
        )
    }

    /// Switch between the wide (horizontal) and narrow (vertical) layout.
    pub fn set_layout(&mut self, narrow_layout: bool, geometry: SurfaceGeometry) {
        self.cancel_gesture();
        self.navigator
            .set_layout(SurfaceLayout::new(narrow_layout, geometry));
    }

    pub fn export_records(&self) -> Vec<ExportRecord> {
        export::export_records(self.navigator.keys(), &self.store)
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        export::export_json(self.navigator.keys(), &self.store)
    }

    async fn ensure_definition(&mut self, key: &str) -> ConfigResult<()> {
        if self.navigator.has_definition(key) {
            return Ok(());
        }
        let definition = match self.source.fetch_definition(key).await {
            Ok(definition) => definition,
            Err(err) => {
                log_error!("Failed to load timeline {}: {}", key, err);
                return Err(err);
            }
        };
        ensure_key(key, &definition)?;
        validation::validate_definition(&definition)?;
        log_info!(
            "Loaded timeline {} ({}, {} activities)",
            key,
            definition.mode.as_str(),
            definition.activity_count()
        );
        self.navigator.register_definition(definition)
    }

    fn cancel_gesture(&mut self) -> GestureOutcome {
        let Some((surface, selection)) = self.navigator.gesture_parts() else {
            return GestureOutcome::Ignored;
        };
        self.controller.force_cancel(GestureContext {
            surface,
            store: &mut self.store,
            engine: &self.engine,
            selection,
        })
    }

    fn rebind(&mut self, outcome: &NavOutcome) {
        if let Some(transition) = outcome.moved() {
            self.controller.bind(transition.surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticSource;
    use crate::navigation::NavigationRefusal;
    use std::time::Duration;

    const DOCUMENT: &str = r##"{"timelines":[
        {"key":"primary","name":"Primary","minCoverage":60,
         "categories":[{"name":"Sleep","activities":[{"name":"Sleeping","color":"#102030"}]}]},
        {"key":"devices","name":"Devices",
         "categories":[{"name":"Screens","activities":[{"name":"Phone","color":"#405060"}]}]}
    ]}"##;

    async fn survey() -> Survey<StaticSource> {
        let source = StaticSource::from_json(DOCUMENT).unwrap();
        Survey::bootstrap(source, EngineSettings::default()).await.unwrap()
    }

    fn sleeping(survey: &Survey<StaticSource>) -> ActivityDescriptor {
        let definition = survey.active_definition().unwrap();
        let (category, activity) = definition.activity("Sleep", "Sleeping").unwrap();
        ActivityDescriptor::from_activity(category, activity)
    }

    /// Drag across pixels `from..to` of the default 1440px strip.
    fn drag(survey: &mut Survey<StaticSource>, from: f64, to: f64) -> GestureOutcome {
        let id = survey.active_surface().unwrap().id();
        survey.handle_pointer(PointerEvent::down(id, from, 40.0));
        survey.handle_pointer(PointerEvent::moved(id, to, 40.0));
        survey.handle_pointer(PointerEvent::up(id, to, 40.0))
    }

    #[tokio::test]
    async fn bootstrap_enters_first_timeline() {
        let survey = survey().await;
        assert_eq!(survey.active_timeline_key(), Some("primary"));
        assert_eq!(survey.navigator().index(), Some(0));
        assert_eq!(
            survey.controller().bound_surface(),
            survey.active_surface().map(TimelineSurface::id)
        );
        assert!(!survey.can_advance());
    }

    #[tokio::test]
    async fn bootstrap_rejects_invalid_settings() {
        let source = StaticSource::from_json(DOCUMENT).unwrap();
        let settings = EngineSettings {
            min_duration_minutes: 0,
            ..EngineSettings::default()
        };
        let err = Survey::bootstrap(source, settings).await.err().unwrap();
        assert_eq!(err.code(), "CFG-1007");
        assert!(err.to_string().contains("minDurationMinutes"));
    }

    #[tokio::test]
    async fn drag_creates_and_coverage_unlocks_advance() {
        let mut survey = survey().await;
        let descriptor = sleeping(&survey);
        survey.set_selected_activity(Some(descriptor));

        let outcome = drag(&mut survey, 0.0, 60.0);
        assert!(matches!(outcome, GestureOutcome::Created(_)));
        assert_eq!(survey.coverage(), 60);
        assert!(survey.can_advance());
        assert!(survey.selected_activity().is_none());
    }

    #[tokio::test]
    async fn undo_and_clear_update_store_and_surface() {
        let mut survey = survey().await;
        for (from, to) in [(0.0, 60.0), (100.0, 200.0)] {
            let descriptor = sleeping(&survey);
            survey.set_selected_activity(Some(descriptor));
            drag(&mut survey, from, to);
        }
        assert_eq!(survey.active_intervals().len(), 2);

        let undone = survey.undo_last().unwrap();
        assert_eq!(undone.start, 340);
        assert_eq!(survey.active_surface().unwrap().blocks().len(), 1);

        assert_eq!(survey.clear_active().len(), 1);
        assert!(survey.active_intervals().is_empty());
        assert!(survey.active_surface().unwrap().blocks().is_empty());
        assert!(survey.undo_last().is_none());
    }

    #[tokio::test]
    async fn navigation_is_debounced_and_clears_selection() {
        let mut survey = survey().await;
        let start = Instant::now();
        let descriptor = sleeping(&survey);
        survey.set_selected_activity(Some(descriptor));

        let outcome = survey.go_next_at(start).await.unwrap();
        assert!(outcome.moved().is_some());
        assert!(survey.selected_activity().is_none());

        let outcome = survey.go_back_at(start + Duration::from_millis(200)).await.unwrap();
        assert_eq!(outcome, NavOutcome::Refused(NavigationRefusal::Debounced));
        assert_eq!(survey.active_timeline_key(), Some("devices"));

        let outcome = survey.go_next_at(start + Duration::from_secs(2)).await.unwrap();
        assert_eq!(outcome, NavOutcome::Refused(NavigationRefusal::AtLastTimeline));
    }

    #[tokio::test]
    async fn events_on_retired_surface_are_inert() {
        let mut survey = survey().await;
        let old_surface = survey.active_surface().unwrap().id();
        survey.go_next_at(Instant::now()).await.unwrap();

        let descriptor = ActivityDescriptor {
            labels: vec!["Phone".into()],
            category: "Screens".into(),
            color: crate::models::ActivityColor::Solid("#405060".into()),
            parent_label: None,
            is_custom_input: false,
            original_selection: None,
        };
        survey.set_selected_activity(Some(descriptor));
        let outcome = survey.handle_pointer(PointerEvent::down(old_surface, 10.0, 10.0));
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(survey.store().intervals("primary").is_empty());
    }
}
