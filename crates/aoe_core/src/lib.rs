//! `aoe_core` — event-derived metrics over decoded RTS replays.
//!
//! No IO, no caches. Every operation is a pure function over an
//! already-decoded `Match` and returns before the next call starts.

mod costs;
mod error;
mod events;
pub mod metrics;
mod model;
mod patterns;
mod payload;
mod series;

pub use costs::{building_cost, tech_cost, unit_cost};
pub use error::MetricsError;
pub use events::{important_events, EventKind, ImportantEvent};
pub use metrics::{
    action_resource_delta, apm_timeseries, approximate_total_balance_timeseries,
    default_starting_stock, resource_balance_timeseries, resource_cumulative_timeseries,
    resource_spend_timeseries, tc_idle_cumulative_timeseries, tc_idle_time,
    total_spend_timeseries, unit_created_timeseries, villager_counts, IdleParams,
};
pub use model::{
    Action, Match, Player, PlayerId, Resource, ResourceCost, ResourceDelta, ResourceTotals,
};
pub use patterns::{augment_unit_patterns, base_unit_patterns};
pub use payload::{
    name_from_keys, payload_count, payload_matches, unit_name, BUILDING_NAME_KEYS, TECH_NAME_KEYS,
};
pub use series::TimeSeries;

#[cfg(test)]
mod test_fixtures;
