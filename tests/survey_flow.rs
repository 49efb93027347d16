use std::io::Write;
use std::time::{Duration, Instant};

use timeuse_lib::catalog::{FileSource, StaticSource, TimelineSource};
use timeuse_lib::error::{ConfigError, ConfigResult, PlacementRejection};
use timeuse_lib::interaction::{GestureOutcome, PointerEvent, SurfaceGeometry};
use timeuse_lib::models::{ActivityDescriptor, TimelineDefinition};
use timeuse_lib::navigation::{NavOutcome, NavigationRefusal, TimelinePhase};
use timeuse_lib::settings::EngineSettings;
use timeuse_lib::survey::Survey;

const DOCUMENT: &str = r##"{"timelines":[
    {"key":"primary","name":"Primary activity","minCoverage":120,
     "categories":[{"name":"Personal care","activities":[
        {"name":"Sleeping","color":"#000088"},
        {"name":"Eating","color":"#884400"}]}]},
    {"key":"secondary","name":"Secondary activity",
     "categories":[{"name":"Media","activities":[{"name":"Radio","color":"#008800"}]}]},
    {"key":"devices","name":"Device use",
     "categories":[{"name":"Screens","activities":[{"name":"Phone","color":"#880000"}]}]}
]}"##;

const LATER: Duration = Duration::from_secs(2);

fn select(survey: &mut Survey<impl TimelineSource>, category: &str, activity: &str) {
    let definition = survey.active_definition().unwrap();
    let (category, activity) = definition.activity(category, activity).unwrap();
    let descriptor = ActivityDescriptor::from_activity(category, activity);
    survey.set_selected_activity(Some(descriptor));
}

/// Drag on the default 1440px strip, where pixel `p` is minute `240 + p`.
fn drag(survey: &mut Survey<impl TimelineSource>, from: f64, to: f64) -> GestureOutcome {
    let id = survey.active_surface().unwrap().id();
    survey.handle_pointer(PointerEvent::down(id, from, 40.0));
    survey.handle_pointer(PointerEvent::moved(id, to, 40.0));
    survey.handle_pointer(PointerEvent::up(id, to, 40.0))
}

async fn static_survey() -> Survey<StaticSource> {
    let source = StaticSource::from_json(DOCUMENT).unwrap();
    Survey::bootstrap(source, EngineSettings::default()).await.unwrap()
}

#[tokio::test]
async fn go_next_at_last_timeline_is_a_no_op() {
    let mut survey = static_survey().await;
    let mut now = Instant::now();
    for _ in 0..2 {
        now += LATER;
        assert!(survey.go_next_at(now).await.unwrap().moved().is_some());
    }
    let surface = survey.active_surface().unwrap().id();

    now += LATER;
    let outcome = survey.go_next_at(now).await.unwrap();
    assert_eq!(outcome, NavOutcome::Refused(NavigationRefusal::AtLastTimeline));
    assert_eq!(survey.navigator().index(), Some(2));
    assert_eq!(survey.active_surface().unwrap().id(), surface);
}

#[tokio::test]
async fn next_then_back_preserves_interval_identity() {
    let mut survey = static_survey().await;
    select(&mut survey, "Personal care", "Sleeping");
    drag(&mut survey, 0.0, 120.0);
    select(&mut survey, "Personal care", "Eating");
    drag(&mut survey, 300.0, 240.0);

    let before: Vec<_> = survey.active_intervals().to_vec();
    let surface = survey.active_surface().unwrap().id();
    assert_eq!(before.len(), 2);

    let now = Instant::now();
    survey.go_next_at(now).await.unwrap();
    assert_eq!(survey.navigator().phase("primary"), TimelinePhase::Inactive);

    let outcome = survey.go_back_at(now + LATER).await.unwrap();
    let transition = outcome.moved().unwrap();
    assert!(transition.restored);
    assert_eq!(transition.surface, surface);
    assert_eq!(survey.active_intervals(), before.as_slice());
    assert_eq!(survey.navigator().phase("secondary"), TimelinePhase::Inactive);
}

#[tokio::test]
async fn selection_never_survives_navigation() {
    let mut survey = static_survey().await;
    let now = Instant::now();

    select(&mut survey, "Personal care", "Sleeping");
    survey.go_next_at(now).await.unwrap();
    assert!(survey.selected_activity().is_none());

    select(&mut survey, "Media", "Radio");
    survey.go_back_at(now + LATER).await.unwrap();
    assert!(survey.selected_activity().is_none());
}

#[tokio::test]
async fn backwards_drag_is_ordered_and_overlap_rejected() {
    let mut survey = static_survey().await;
    select(&mut survey, "Personal care", "Sleeping");
    let outcome = drag(&mut survey, 180.0, 60.0);
    let GestureOutcome::Created(interval) = outcome else {
        panic!("expected a created interval, got {outcome:?}");
    };
    assert_eq!((interval.start, interval.end), (300, 420));

    select(&mut survey, "Personal care", "Eating");
    // Starts on empty space and drags back across the existing block.
    let outcome = drag(&mut survey, 200.0, 100.0);
    assert!(matches!(
        outcome,
        GestureOutcome::Rejected(PlacementRejection::Overlaps { .. })
    ));
    assert_eq!(survey.active_intervals().len(), 1);
    // A failed commit keeps the selection for another try.
    assert!(survey.selected_activity().is_some());
}

#[tokio::test]
async fn navigation_mid_gesture_discards_the_preview() {
    let mut survey = static_survey().await;
    select(&mut survey, "Personal care", "Sleeping");
    let id = survey.active_surface().unwrap().id();
    survey.handle_pointer(PointerEvent::down(id, 0.0, 40.0));
    survey.handle_pointer(PointerEvent::moved(id, 90.0, 40.0));
    assert!(survey.active_surface().unwrap().preview().is_some());

    survey.go_next_at(Instant::now()).await.unwrap();
    assert!(survey.controller().is_idle());
    assert!(survey.store().intervals("primary").is_empty());
    assert!(survey.navigator().retained_surface("primary").unwrap().preview().is_none());
}

#[tokio::test]
async fn narrow_layout_maps_the_vertical_axis() {
    let mut survey = static_survey().await;
    survey.set_layout(true, SurfaceGeometry::new(60.0, 720.0));
    select(&mut survey, "Personal care", "Sleeping");

    let id = survey.active_surface().unwrap().id();
    // 720px for 1440 minutes: two minutes per pixel along y.
    survey.handle_pointer(PointerEvent::down(id, 30.0, 0.0));
    survey.handle_pointer(PointerEvent::moved(id, 55.0, 30.0));
    let outcome = survey.handle_pointer(PointerEvent::up(id, 10.0, 30.0));
    let GestureOutcome::Created(interval) = outcome else {
        panic!("expected a created interval, got {outcome:?}");
    };
    assert_eq!((interval.start, interval.end), (240, 300));
}

#[tokio::test]
async fn coverage_gates_advance_and_export_is_ordered() {
    let mut survey = static_survey().await;
    select(&mut survey, "Personal care", "Sleeping");
    drag(&mut survey, 60.0, 120.0);
    assert!(!survey.can_advance());
    select(&mut survey, "Personal care", "Eating");
    drag(&mut survey, 0.0, 60.0);
    assert_eq!(survey.coverage(), 120);
    assert!(survey.can_advance());
    assert!(!survey.is_saturated());

    survey.go_next_at(Instant::now()).await.unwrap();
    select(&mut survey, "Media", "Radio");
    drag(&mut survey, 1380.0, 1440.0);

    let records = survey.export_records();
    let summary: Vec<_> = records
        .iter()
        .map(|record| (record.timeline_key.as_str(), record.start_time.as_str(), record.end_time.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("primary", "04:00", "05:00"),
            ("primary", "05:00", "06:00"),
            ("secondary", "03:00(+1)", "04:00(+1)"),
        ]
    );

    let json: serde_json::Value = serde_json::from_str(&survey.export_json().unwrap()).unwrap();
    assert_eq!(json["records"].as_array().unwrap().len(), 3);
    assert!(json["exportedAt"].is_string());
}

#[tokio::test]
async fn file_source_drives_a_survey() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();

    let mut survey = Survey::bootstrap(FileSource::new(file.path()), EngineSettings::default())
        .await
        .unwrap();
    assert_eq!(survey.active_definition().unwrap().name, "Primary activity");
    assert!(survey.go_next_at(Instant::now()).await.unwrap().moved().is_some());
    assert_eq!(survey.active_timeline_key(), Some("secondary"));
}

/// Serves the key list but cannot deliver one definition.
struct FlakySource {
    inner: StaticSource,
    broken: &'static str,
}

impl TimelineSource for FlakySource {
    async fn fetch_keys(&self) -> ConfigResult<Vec<String>> {
        self.inner.fetch_keys().await
    }

    async fn fetch_definition(&self, key: &str) -> ConfigResult<TimelineDefinition> {
        if key == self.broken {
            return Err(ConfigError::MissingTimeline { key: key.to_string() });
        }
        self.inner.fetch_definition(key).await
    }
}

#[tokio::test]
async fn failed_fetch_blocks_navigation_without_side_effects() {
    let source = FlakySource {
        inner: StaticSource::from_json(DOCUMENT).unwrap(),
        broken: "secondary",
    };
    let mut survey = Survey::bootstrap(source, EngineSettings::default()).await.unwrap();
    select(&mut survey, "Personal care", "Sleeping");
    let surface = survey.active_surface().unwrap().id();

    let err = survey.go_next_at(Instant::now()).await.unwrap_err();
    assert_eq!(err.code(), "CFG-1004");
    assert_eq!(survey.active_timeline_key(), Some("primary"));
    assert_eq!(survey.active_surface().unwrap().id(), surface);
    assert!(survey.selected_activity().is_some());
    assert_eq!(survey.navigator().phase("secondary"), TimelinePhase::Uninitialized);
}
