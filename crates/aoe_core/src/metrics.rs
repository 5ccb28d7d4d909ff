//! Windowed per-player metrics over a decoded match.
//!
//! Each operation is one pass over the action stream: classify an action,
//! derive a numeric contribution, bucket it into uniform windows. Resource
//! flows are an approximate reconstruction: passive gathering is invisible in
//! the action stream, so spend and balance curves are heuristics, not truth.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::costs;
use crate::error::MetricsError;
use crate::model::{Action, Match, PlayerId, Resource, ResourceDelta, ResourceTotals};
use crate::payload::{self, BUILDING_NAME_KEYS, TECH_NAME_KEYS};
use crate::series::{bucket_samples, window_count, Accumulate, TimeSeries};

/// Event-type names the replay parser uses for production orders.
/// Case-sensitive: these are the parser's canonical identifiers.
fn is_production_event(kind: &str) -> bool {
    kind.contains("TRAIN") || kind.contains("CREATE") || kind.contains("QUEUE") || kind == "ORDER"
}

/// Lobby-default starting stock for a resource, used when a caller has no
/// better value for a balance curve's offset.
pub fn default_starting_stock(resource: Resource) -> f64 {
    match resource {
        Resource::Food | Resource::Wood | Resource::Stone => 200.0,
        Resource::Gold => 100.0,
    }
}

/// Tuning for town-center idle detection.
#[derive(Debug, Clone, Copy)]
pub struct IdleParams {
    /// Seconds a town center takes to produce one villager when queued.
    pub base_prod_time: f64,
    /// Gap between production events at or beyond which the queue is
    /// considered to have sat empty.
    pub gap_threshold: f64,
}

impl Default for IdleParams {
    fn default() -> Self {
        Self {
            base_prod_time: 25.0,
            gap_threshold: 27.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Production metrics
// ---------------------------------------------------------------------------

/// Final tally of matched production events per player, independent of time.
/// Every match player appears, zero-initialized.
pub fn villager_counts(game: &Match, villager_pattern: &Regex) -> BTreeMap<PlayerId, u32> {
    let mut counts: BTreeMap<PlayerId, u32> =
        game.players.iter().map(|p| (p.number, 0)).collect();
    for action in &game.actions {
        if !is_production_event(&action.kind) {
            continue;
        }
        if !payload::payload_matches(&action.payload, villager_pattern) {
            continue;
        }
        let Some(player) = action.player else {
            continue;
        };
        *counts.entry(player).or_insert(0) += payload::payload_count(&action.payload);
    }
    counts
}

/// Actions per minute, normalized regardless of window width. Players with an
/// action anywhere in the match get a full series (zeros for quiet windows);
/// players with no attributed actions at all are absent.
pub fn apm_timeseries(game: &Match, window_sec: u32) -> TimeSeries {
    let per_action = 60.0 / f64::from(window_sec.max(1));
    let samples: Vec<(f64, PlayerId, f64)> = game
        .actions
        .iter()
        .filter_map(|a| a.player.map(|player| (a.seconds(), player, per_action)))
        .collect();
    bucket_samples(window_sec, &samples, Accumulate::PerWindow)
}

/// Units of the matched category queued per window, weighted by repeat count.
pub fn unit_created_timeseries(game: &Match, unit_pattern: &Regex, window_sec: u32) -> TimeSeries {
    let mut samples = Vec::new();
    for action in &game.actions {
        if !is_production_event(&action.kind) {
            continue;
        }
        if !payload::payload_matches(&action.payload, unit_pattern) {
            continue;
        }
        let Some(player) = action.player else {
            continue;
        };
        samples.push((
            action.seconds(),
            player,
            f64::from(payload::payload_count(&action.payload)),
        ));
    }
    bucket_samples(window_sec, &samples, Accumulate::PerWindow)
}

// ---------------------------------------------------------------------------
// Town-center idle detection
// ---------------------------------------------------------------------------

/// Idle seconds detected between successive villager-production events,
/// stamped at the event that closed each gap.
fn idle_increments(
    game: &Match,
    villager_pattern: &Regex,
    params: IdleParams,
) -> Vec<(f64, PlayerId, f64)> {
    let mut last: BTreeMap<PlayerId, f64> = BTreeMap::new();
    let mut increments = Vec::new();
    for action in &game.actions {
        if !is_production_event(&action.kind) {
            continue;
        }
        if !payload::payload_matches(&action.payload, villager_pattern) {
            continue;
        }
        let Some(player) = action.player else {
            continue;
        };
        let t = action.seconds();
        if let Some(prev) = last.get(&player) {
            let gap = t - prev;
            if gap >= params.gap_threshold {
                increments.push((t, player, (gap - params.base_prod_time).max(0.0)));
            }
        }
        // The first matched event only starts the tracking window.
        last.insert(player, t);
    }
    increments
}

/// Total estimated seconds each player's town-center production queue sat
/// empty. Every match player appears, zero-initialized.
pub fn tc_idle_time(
    game: &Match,
    villager_pattern: &Regex,
    params: IdleParams,
) -> BTreeMap<PlayerId, f64> {
    let mut idle: BTreeMap<PlayerId, f64> =
        game.players.iter().map(|p| (p.number, 0.0)).collect();
    for (_, player, inc) in idle_increments(game, villager_pattern, params) {
        *idle.entry(player).or_insert(0.0) += inc;
    }
    idle
}

/// Cumulative idle curve per player: monotonically non-decreasing, zero before
/// a player's first detected gap, flat after the last one. Players with no
/// detected gaps are absent.
pub fn tc_idle_cumulative_timeseries(
    game: &Match,
    villager_pattern: &Regex,
    window_sec: u32,
    params: IdleParams,
) -> TimeSeries {
    let increments = idle_increments(game, villager_pattern, params);
    bucket_samples(window_sec, &increments, Accumulate::Cumulative { start: 0.0 })
}

// ---------------------------------------------------------------------------
// Resource spend modeling
// ---------------------------------------------------------------------------

enum ActionClass {
    Production,
    Build,
    Research,
    MarketBuy,
    MarketSell,
}

/// Classification precedence: production, build, research, market.
fn classify(kind: &str) -> Option<ActionClass> {
    if is_production_event(kind) {
        return Some(ActionClass::Production);
    }
    if kind.contains("BUILD") {
        return Some(ActionClass::Build);
    }
    if kind.contains("RESEARCH") {
        return Some(ActionClass::Research);
    }
    if kind.contains("BUY") {
        return Some(ActionClass::MarketBuy);
    }
    if kind.contains("SELL") {
        return Some(ActionClass::MarketSell);
    }
    None
}

const MARKET_RESOURCE_KEYS: &[&str] = &["resource", "resource_name", "commodity"];

fn market_resource(payload: &Value) -> Option<Resource> {
    payload::name_from_keys(payload, MARKET_RESOURCE_KEYS)?.parse().ok()
}

fn market_amount(payload: &Value) -> Option<f64> {
    let amount = match payload.get("amount")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (amount > 0.0).then_some(amount)
}

/// Signed stock change caused by one action, when it can be derived.
///
/// `None` means "no delta": either the action is not economic, or its name
/// could not be resolved against the cost tables. Callers must skip it, never
/// treat it as zero.
pub fn action_resource_delta(action: &Action) -> Option<ResourceDelta> {
    match classify(&action.kind)? {
        ActionClass::Production => {
            let name = payload::unit_name(&action.payload)?;
            let cost = costs::unit_cost(&name)?;
            Some(ResourceDelta::spend(
                cost,
                payload::payload_count(&action.payload),
            ))
        }
        ActionClass::Build => {
            let name = payload::name_from_keys(&action.payload, BUILDING_NAME_KEYS)
                .or_else(|| payload::unit_name(&action.payload))?;
            Some(ResourceDelta::spend(costs::building_cost(&name)?, 1))
        }
        ActionClass::Research => {
            let name = payload::name_from_keys(&action.payload, TECH_NAME_KEYS)?;
            Some(ResourceDelta::spend(costs::tech_cost(&name)?, 1))
        }
        ActionClass::MarketBuy => Some(ResourceDelta::market(
            market_resource(&action.payload)?,
            market_amount(&action.payload)?,
        )),
        ActionClass::MarketSell => Some(ResourceDelta::market(
            market_resource(&action.payload)?,
            -market_amount(&action.payload)?,
        )),
    }
}

/// Collect `(time, player, weight)` rows from delta-producing actions.
/// `weight` returning `None` drops the row entirely.
fn delta_samples<F>(game: &Match, mut weight: F) -> Vec<(f64, PlayerId, f64)>
where
    F: FnMut(ResourceDelta) -> Option<f64>,
{
    let mut samples = Vec::new();
    for action in &game.actions {
        let Some(player) = action.player else {
            continue;
        };
        let Some(delta) = action_resource_delta(action) else {
            continue;
        };
        if let Some(w) = weight(delta) {
            samples.push((action.seconds(), player, w));
        }
    }
    samples
}

/// Spend per window for one resource, as positive magnitudes.
pub fn resource_spend_timeseries(
    game: &Match,
    resource: &str,
    window_sec: u32,
) -> Result<TimeSeries, MetricsError> {
    let resource: Resource = resource.parse()?;
    let samples = delta_samples(game, |delta| {
        let v = delta.get(resource);
        (v < 0.0).then_some(-v)
    });
    Ok(bucket_samples(window_sec, &samples, Accumulate::PerWindow))
}

/// Approximate stock level for one resource: cumulative signed deltas offset
/// by `start_at`. Inexact by design: passive gathering, the dominant income
/// source, is not observable from the action stream.
pub fn resource_balance_timeseries(
    game: &Match,
    resource: &str,
    window_sec: u32,
    start_at: f64,
) -> Result<TimeSeries, MetricsError> {
    let resource: Resource = resource.parse()?;
    let samples = delta_samples(game, |delta| Some(delta.get(resource)));
    Ok(bucket_samples(
        window_sec,
        &samples,
        Accumulate::Cumulative { start: start_at },
    ))
}

/// Spend magnitude summed across all four resources: an overall economic
/// activity proxy.
pub fn total_spend_timeseries(game: &Match, window_sec: u32, cumulative: bool) -> TimeSeries {
    let samples = delta_samples(game, |delta| {
        let m = delta.spend_magnitude();
        (m > 0.0).then_some(m)
    });
    let accumulate = if cumulative {
        Accumulate::Cumulative { start: 0.0 }
    } else {
        Accumulate::PerWindow
    };
    bucket_samples(window_sec, &samples, accumulate)
}

/// Approximate combined stock across all resources, offset by the lobby
/// default starting stocks. Fallback for when the sync stream yields nothing.
pub fn approximate_total_balance_timeseries(game: &Match, window_sec: u32) -> TimeSeries {
    let start: f64 = Resource::ALL.iter().map(|&r| default_starting_stock(r)).sum();
    let samples = delta_samples(game, |delta| Some(delta.total()));
    bucket_samples(window_sec, &samples, Accumulate::Cumulative { start })
}

/// Straight line from zero to the authoritative postgame total over the match
/// duration. A deliberately crude stand-in for the unavailable true curve.
/// Players missing from `totals` get a flat zero line.
pub fn resource_cumulative_timeseries(
    game: &Match,
    totals: &BTreeMap<PlayerId, ResourceTotals>,
    resource: &str,
    window_sec: u32,
) -> Result<TimeSeries, MetricsError> {
    let resource: Resource = resource.parse()?;
    let len = window_count(game.duration.as_secs_f64(), window_sec.max(1));
    if len == 0 {
        return Ok(TimeSeries::empty(window_sec));
    }
    let mut values = BTreeMap::new();
    for player in &game.players {
        let total = totals
            .get(&player.number)
            .map_or(0.0, |t| t.get(resource));
        let series = if len == 1 {
            vec![0.0]
        } else {
            (0..len)
                .map(|i| total * i as f64 / (len - 1) as f64)
                .collect()
        };
        values.insert(player.number, series);
    }
    Ok(TimeSeries::new(window_sec, values))
}
