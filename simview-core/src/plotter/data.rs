use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One timestamped point with a value per plotted dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    time: f64,
    values: Box<[f64]>,
}

impl Sample {
    pub fn new(time: f64, values: impl Into<Box<[f64]>>) -> Self {
        Self {
            time,
            values: values.into(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }
}

/// Time-ordered samples for one plot.
///
/// Timestamps never decrease, so both eviction and slicing locate their cut
/// points with a binary search instead of scanning.
#[derive(Debug, Clone)]
pub struct WindowedDataStore {
    dimensions: usize,
    samples: VecDeque<Sample>,
}

impl WindowedDataStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            samples: VecDeque::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_time(&self) -> Option<f64> {
        self.samples.front().map(Sample::time)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.samples.back().map(Sample::time)
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Appends a sample. On error the store is left untouched.
    pub fn push(&mut self, sample: Sample) -> Result<(), StoreError> {
        if !sample.time.is_finite() {
            return Err(StoreError::InvalidTimestamp(sample.time));
        }
        if sample.dimensions() != self.dimensions {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimensions,
                actual: sample.dimensions(),
            });
        }
        if let Some(last) = self.last_time() {
            if sample.time < last {
                return Err(StoreError::OrderViolation {
                    timestamp: sample.time,
                    last,
                });
            }
        }
        self.samples.push_back(sample);
        Ok(())
    }

    /// Removes every sample older than `t`; returns how many were dropped.
    /// No sample is older than NaN, so a NaN `t` removes nothing.
    pub fn evict_before(&mut self, t: f64) -> usize {
        if t.is_nan() {
            return 0;
        }
        let cut = self.lower_bound(t);
        self.samples.drain(..cut);
        cut
    }

    /// Samples with `t1 <= time < t2`, in time order. Empty when either
    /// bound is NaN.
    pub fn visible_slice(&self, t1: f64, t2: f64) -> VisibleSlice<'_> {
        if t1.is_nan() || t2.is_nan() {
            let len = self.samples.len();
            return VisibleSlice {
                samples: &self.samples,
                start: len,
                end: len,
            };
        }
        let start = self.lower_bound(t1);
        let end = self.lower_bound(t2).max(start);
        VisibleSlice {
            samples: &self.samples,
            start,
            end,
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Index of the first sample with `time >= t`. Callers filter NaN.
    fn lower_bound(&self, t: f64) -> usize {
        self.samples.partition_point(|sample| sample.time < t)
    }
}

/// A contiguous run of samples borrowed from a [`WindowedDataStore`].
#[derive(Debug, Clone, Copy)]
pub struct VisibleSlice<'a> {
    samples: &'a VecDeque<Sample>,
    start: usize,
    end: usize,
}

impl<'a> VisibleSlice<'a> {
    /// Position of the first returned sample within the store, for callers
    /// keeping parallel per-sample arrays.
    pub fn first_index(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn get(&self, offset: usize) -> Option<&'a Sample> {
        if offset < self.len() {
            self.samples.get(self.start + offset)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.range(self.start..self.end)
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + 'a {
        self.iter().map(Sample::time)
    }

    /// Values of one dimension across the slice.
    pub fn column(&self, dimension: usize) -> impl Iterator<Item = f64> + 'a {
        self.iter()
            .filter_map(move |sample| sample.values().get(dimension).copied())
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(store: &mut WindowedDataStore, count: usize) {
        for t in 0..count {
            store.push(Sample::new(t as f64, vec![t as f64])).unwrap();
        }
    }

    #[test]
    fn slice_selects_half_open_window() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 11);

        let slice = store.visible_slice(3.0, 7.0);
        assert_eq!(slice.first_index(), 3);
        assert_eq!(slice.column(0).collect::<Vec<_>>(), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(slice.times().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn nan_bound_evicts_nothing() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 11);
        assert_eq!(store.evict_before(f64::NAN), 0);
        assert_eq!(store.len(), 11);
    }

    #[test]
    fn nan_upper_bound_selects_nothing() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 11);
        assert!(store.visible_slice(3.0, f64::NAN).is_empty());
        assert!(store.visible_slice(f64::NAN, f64::NAN).is_empty());
    }

    #[test]
    fn empty_range_is_not_an_error() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 5);
        assert!(store.visible_slice(20.0, 30.0).is_empty());
        assert!(store.visible_slice(3.0, 1.0).is_empty());
        assert!(store.visible_slice(f64::NAN, 3.0).is_empty());
    }

    #[test]
    fn equal_timestamps_are_accepted() {
        let mut store = WindowedDataStore::new(2);
        store.push(Sample::new(1.0, vec![0.0, 1.0])).unwrap();
        store.push(Sample::new(1.0, vec![2.0, 3.0])).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.visible_slice(1.0, 1.5).len(), 2);
    }

    #[test]
    fn out_of_order_push_leaves_store_unchanged() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 4);
        let err = store.push(Sample::new(1.5, vec![0.0])).unwrap_err();
        assert_eq!(
            err,
            StoreError::OrderViolation {
                timestamp: 1.5,
                last: 3.0
            }
        );
        assert_eq!(store.len(), 4);
        assert_eq!(store.last_time(), Some(3.0));
    }

    #[test]
    fn push_rejects_wrong_width_and_non_finite_time() {
        let mut store = WindowedDataStore::new(2);
        assert!(matches!(
            store.push(Sample::new(0.0, vec![1.0])),
            Err(StoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            store.push(Sample::new(f64::NAN, vec![1.0, 2.0])),
            Err(StoreError::InvalidTimestamp(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn evict_trims_prefix_only() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 11);
        assert_eq!(store.evict_before(4.5), 5);
        assert_eq!(store.first_time(), Some(5.0));
        assert_eq!(store.evict_before(0.0), 0);
        assert_eq!(store.evict_before(100.0), 6);
        assert!(store.is_empty());
    }

    #[test]
    fn slice_index_is_relative_to_current_contents() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 10);
        store.evict_before(4.0);
        let slice = store.visible_slice(6.0, 8.0);
        assert_eq!(slice.first_index(), 2);
        assert_eq!(store.get(slice.first_index()).map(Sample::time), Some(6.0));
    }

    #[test]
    fn reset_empties_every_slice() {
        let mut store = WindowedDataStore::new(1);
        ramp(&mut store, 10);
        store.reset();
        assert!(store.visible_slice(f64::NEG_INFINITY, f64::INFINITY).is_empty());
        store.push(Sample::new(0.0, vec![0.0])).unwrap();
    }
}
