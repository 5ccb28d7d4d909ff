//! Windowed per-player time series.
//!
//! Every windowing operation in this crate produces a `TimeSeries`: one shared
//! grid of uniform window starts plus one sample vector per player, all the
//! same length. An empty series (zero windows) is the "no data" marker and is
//! distinct from a populated series of zeros.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    window_sec: u32,
    /// Window start times in seconds: `0, w, 2w, ...`.
    times: Vec<f64>,
    values: BTreeMap<PlayerId, Vec<f64>>,
}

impl TimeSeries {
    /// Build a series from per-player sample vectors.
    ///
    /// All vectors must share one length; that length defines the window grid.
    pub fn new(window_sec: u32, values: BTreeMap<PlayerId, Vec<f64>>) -> Self {
        assert!(window_sec > 0, "window_sec must be positive");
        let len = values.values().next().map_or(0, Vec::len);
        assert!(
            values.values().all(|v| v.len() == len),
            "per-player series must share one window grid",
        );
        let w = f64::from(window_sec);
        Self {
            window_sec,
            times: (0..len).map(|i| i as f64 * w).collect(),
            values,
        }
    }

    /// The documented "no data" marker.
    pub fn empty(window_sec: u32) -> Self {
        Self::new(window_sec, BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    pub fn window_sec(&self) -> u32 {
        self.window_sec
    }

    /// Number of windows. Identical for every player in the series.
    pub fn window_count(&self) -> usize {
        self.times.len()
    }

    /// Shared window start timestamps, in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.values.keys().copied()
    }

    pub fn get(&self, player: PlayerId) -> Option<&[f64]> {
        self.values.get(&player).map(Vec::as_slice)
    }

    pub fn values(&self) -> &BTreeMap<PlayerId, Vec<f64>> {
        &self.values
    }
}

/// How bucketed samples are aggregated across windows.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Accumulate {
    /// Each window holds the sum of its own samples.
    PerWindow,
    /// Running sum across windows, offset by a starting value.
    Cumulative { start: f64 },
}

/// Number of uniform windows needed to cover `[0, max_t]`.
pub(crate) fn window_count(max_t: f64, window_sec: u32) -> usize {
    (max_t / f64::from(window_sec)).ceil() as usize
}

/// Bucket `(time, player, weight)` samples into uniform windows.
///
/// The grid length is `ceil(max_sample_time / window_sec)`; a sample landing
/// exactly on the trailing edge is clamped into the final window. Only players
/// contributing at least one sample appear in the result; a call with no
/// samples (or samples only at time zero) returns the empty marker.
pub(crate) fn bucket_samples(
    window_sec: u32,
    samples: &[(f64, PlayerId, f64)],
    accumulate: Accumulate,
) -> TimeSeries {
    assert!(window_sec > 0, "window_sec must be positive");
    let max_t = samples.iter().map(|s| s.0).fold(0.0_f64, f64::max);
    let len = window_count(max_t, window_sec);
    if samples.is_empty() || len == 0 {
        return TimeSeries::empty(window_sec);
    }

    let w = f64::from(window_sec);
    let mut values: BTreeMap<PlayerId, Vec<f64>> = BTreeMap::new();
    for &(t, player, weight) in samples {
        let idx = ((t / w).floor() as usize).min(len - 1);
        values.entry(player).or_insert_with(|| vec![0.0; len])[idx] += weight;
    }

    if let Accumulate::Cumulative { start } = accumulate {
        for series in values.values_mut() {
            let mut running = start;
            for v in series.iter_mut() {
                running += *v;
                *v = running;
            }
        }
    }

    TimeSeries::new(window_sec, values)
}
