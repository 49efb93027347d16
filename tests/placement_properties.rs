use proptest::prelude::*;

use timeuse_lib::models::{ActivityColor, ActivityDescriptor};
use timeuse_lib::placement::{Edge, PlacementEngine};
use timeuse_lib::store::IntervalStore;
use timeuse_lib::timescale::{self, DAY_OFFSET, WINDOW_END};

const KEY: &str = "primary";

fn descriptor() -> ActivityDescriptor {
    ActivityDescriptor {
        labels: vec!["Walking".into()],
        category: "Travel".into(),
        color: ActivityColor::Solid("#22aa22".into()),
        parent_label: None,
        is_custom_input: false,
        original_selection: None,
    }
}

proptest! {
    #[test]
    fn accepted_creates_never_overlap(spans in prop::collection::vec((DAY_OFFSET..WINDOW_END, DAY_OFFSET..WINDOW_END), 1..40)) {
        let engine = PlacementEngine::default();
        let mut store = IntervalStore::default();
        for (a, b) in spans {
            let _ = engine.evaluate_create(&mut store, KEY, a, b, &descriptor());
        }

        let intervals = store.sorted_intervals(KEY);
        for pair in intervals.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
        for interval in &intervals {
            prop_assert!(interval.duration_minutes() >= 10);
            prop_assert!(timescale::within_window(interval.start, interval.end));
        }
        let total: u32 = intervals.iter().map(|interval| interval.duration_minutes()).sum();
        prop_assert_eq!(total, store.coverage(KEY));
    }

    #[test]
    fn click_places_minimum_interval_at_snapped_start(percent in 0.0f64..99.0) {
        let engine = PlacementEngine::default();
        let mut store = IntervalStore::default();
        let start = timescale::position_to_minutes(percent, false);

        let interval = engine.evaluate_click(&mut store, KEY, start, &descriptor()).unwrap();
        prop_assert_eq!(interval.start, start);
        prop_assert_eq!(interval.end, start + 10);
    }

    #[test]
    fn rejected_resize_leaves_store_untouched(boundary in DAY_OFFSET..=WINDOW_END) {
        let engine = PlacementEngine::default();
        let mut store = IntervalStore::default();
        let a = engine.evaluate_create(&mut store, KEY, 300, 360, &descriptor()).unwrap();
        engine.evaluate_create(&mut store, KEY, 420, 480, &descriptor()).unwrap();
        let before = store.intervals(KEY).to_vec();

        if engine.evaluate_resize(&mut store, KEY, &a.id, Edge::End, boundary).is_err() {
            prop_assert_eq!(store.intervals(KEY), before.as_slice());
        } else {
            let resized = store.get(KEY, &a.id).unwrap();
            prop_assert!(resized.end <= 420);
            prop_assert!(resized.end >= resized.start + 10);
        }
    }
}
