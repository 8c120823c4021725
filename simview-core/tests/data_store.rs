use proptest::prelude::*;
use simview_core::plotter::{Sample, WindowedDataStore};
use simview_core::StoreError;

fn store_from_times(times: &[f64]) -> WindowedDataStore {
    let mut store = WindowedDataStore::new(1);
    for (idx, t) in times.iter().enumerate() {
        store.push(Sample::new(*t, vec![idx as f64])).unwrap();
    }
    store
}

/// Non-decreasing timestamps built from non-negative steps.
fn sorted_times() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u8..5, 0..60).prop_map(|steps| {
        let mut t = 0.0;
        steps
            .into_iter()
            .map(|step| {
                t += step as f64 * 0.25;
                t
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn slice_is_exactly_the_half_open_window(
        times in sorted_times(),
        t1 in -1.0f64..20.0,
        span in 0.0f64..10.0,
    ) {
        let store = store_from_times(&times);
        let t2 = t1 + span;
        let slice = store.visible_slice(t1, t2);

        let expected: Vec<f64> = times.iter().copied().filter(|t| *t >= t1 && *t < t2).collect();
        let actual: Vec<f64> = slice.times().collect();
        prop_assert_eq!(&actual, &expected);

        if let Some(first) = slice.get(0) {
            prop_assert_eq!(store.get(slice.first_index()), Some(first));
        }
    }

    #[test]
    fn evict_removes_all_and_only_older_samples(times in sorted_times(), cut in -1.0f64..20.0) {
        let mut store = store_from_times(&times);
        let older = times.iter().filter(|t| **t < cut).count();

        prop_assert_eq!(store.evict_before(cut), older);
        prop_assert_eq!(store.len(), times.len() - older);
        if let Some(first) = store.first_time() {
            prop_assert!(first >= cut);
        }
    }

    #[test]
    fn late_sample_is_rejected_without_side_effects(times in sorted_times(), back in 0.01f64..5.0) {
        prop_assume!(!times.is_empty());
        let mut store = store_from_times(&times);
        let last = *times.last().unwrap();
        let before: Vec<Sample> = store.iter().cloned().collect();

        let result = store.push(Sample::new(last - back, vec![0.0]));
        let is_order_violation = matches!(result, Err(StoreError::OrderViolation { .. }));
        prop_assert!(is_order_violation);
        let after: Vec<Sample> = store.iter().cloned().collect();
        prop_assert_eq!(before, after);
    }
}

#[test]
fn ramp_window_three_to_seven() {
    let mut store = WindowedDataStore::new(1);
    for t in 0..=10 {
        store.push(Sample::new(t as f64, vec![t as f64])).unwrap();
    }
    let slice = store.visible_slice(3.0, 7.0);
    let values: Vec<f64> = slice.column(0).collect();
    assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);
    assert_eq!(slice.times().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn reset_then_any_slice_is_empty() {
    let mut store = WindowedDataStore::new(1);
    for t in 0..=10 {
        store.push(Sample::new(t as f64, vec![t as f64])).unwrap();
    }
    store.reset();
    for (t1, t2) in [(0.0, 10.0), (3.0, 7.0), (f64::NEG_INFINITY, f64::INFINITY)] {
        assert!(store.visible_slice(t1, t2).is_empty());
    }
}
