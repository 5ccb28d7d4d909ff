//! Sync-substream scanning: ground-truth resource stock snapshots.
//!
//! Alongside the command stream, the replay container carries periodic
//! synchronization records. In the DE format a `SYNC` record's payload is a
//! map from player id to a state dict including `total_res`, plus one
//! `current_time` field; in older formats the payload is an opaque blob and
//! carries nothing we can read. This is the authoritative source for live
//! stock levels; the heuristic balance reconstruction in `aoe_core` is the
//! fallback when it is absent or empty.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use aoe_core::{PlayerId, TimeSeries};

/// One decoded low-level record from the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Record type tag, e.g. `SYNC`, `OP`, `CHAT`.
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// Per-player `(time_sec, total_resources)` observations, time-sorted.
pub type SyncObservations = BTreeMap<PlayerId, Vec<(f64, f64)>>;

/// Read a record dump, one JSON record per line.
///
/// Malformed lines are skipped individually; only end of file terminates the
/// scan. Open and read failures propagate.
pub fn read_sync_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!(line = index + 1, %err, "skipping malformed record");
            }
        }
    }
    Ok(records)
}

/// Pull per-player stock observations out of the `SYNC` records.
///
/// Records of other kinds, opaque payloads, and entries missing `current_time`
/// or `total_res` are skipped without aborting the scan.
pub fn sync_observations(records: &[RawRecord]) -> SyncObservations {
    let mut observations: SyncObservations = BTreeMap::new();
    for record in records {
        if record.kind != "SYNC" {
            continue;
        }
        let Value::Object(map) = &record.payload else {
            continue;
        };
        let Some(time) = map.get("current_time").and_then(Value::as_f64) else {
            continue;
        };
        for (key, entry) in map {
            let Ok(player) = key.parse::<PlayerId>() else {
                continue;
            };
            let Some(total) = entry.get("total_res").and_then(Value::as_f64) else {
                continue;
            };
            observations.entry(player).or_default().push((time, total));
        }
    }
    for points in observations.values_mut() {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    observations
}

/// Resample observations onto uniform windows.
///
/// Each window holds the latest observation within it, carried forward across
/// empty windows; windows before a player's first observation are back-filled
/// with that first value.
pub fn resample_observations(observations: &SyncObservations, window_sec: u32) -> TimeSeries {
    let w = f64::from(window_sec.max(1));
    let max_t = observations
        .values()
        .flat_map(|points| points.iter().map(|p| p.0))
        .fold(0.0_f64, f64::max);
    let len = (max_t / w).ceil() as usize;
    if len == 0 {
        return TimeSeries::empty(window_sec);
    }

    let mut values = BTreeMap::new();
    for (&player, points) in observations {
        if points.is_empty() {
            continue;
        }
        let mut series = Vec::with_capacity(len);
        let mut next = 0;
        let mut current = points[0].1;
        for window in 0..len {
            let end = (window + 1) as f64 * w;
            // The final window also swallows an observation on its trailing edge.
            while next < points.len() && (points[next].0 < end || window + 1 == len) {
                current = points[next].1;
                next += 1;
            }
            series.push(current);
        }
        values.insert(player, series);
    }
    TimeSeries::new(window_sec, values)
}

/// Scan a record dump and produce the per-player total-resource stock series.
pub fn sync_total_resources_timeseries(path: &Path, window_sec: u32) -> Result<TimeSeries> {
    let records = read_sync_records(path)?;
    let observations = sync_observations(&records);
    Ok(resample_observations(&observations, window_sec))
}
