//! `aoe_extract` — IO-bound extraction of decoded replay side-channels.
//!
//! The replay-decoding collaborator dumps decoded structures as JSON; this
//! crate turns them into engine inputs: sync-stream stock snapshots, postgame
//! resource totals, and the decoded match itself. All reads are scoped: open,
//! fully consume, close.

mod postgame;
mod sync;

pub use postgame::{extract_resource_totals, resource_totals_postgame};
pub use sync::{
    read_sync_records, resample_observations, sync_observations,
    sync_total_resources_timeseries, RawRecord, SyncObservations,
};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use aoe_core::Match;

/// Load a decoded match from the collaborator's JSON dump.
pub fn load_match(path: &Path) -> Result<Match> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
