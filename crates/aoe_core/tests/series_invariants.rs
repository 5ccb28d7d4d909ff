//! Cross-operation invariants: shared window grids and "no data" markers.

use std::collections::BTreeMap;
use std::time::Duration;

use regex::Regex;
use serde_json::json;

use aoe_core::{
    apm_timeseries, approximate_total_balance_timeseries, resource_balance_timeseries,
    resource_cumulative_timeseries, resource_spend_timeseries, tc_idle_cumulative_timeseries,
    total_spend_timeseries, unit_created_timeseries, Action, IdleParams, Match, Player, TimeSeries,
};

fn villager_pattern() -> Regex {
    Regex::new(r"(?i)villager|aldean").unwrap()
}

fn sample_match() -> Match {
    let mk = |t: f64, player: u8, kind: &str, payload: serde_json::Value| Action {
        timestamp: Duration::from_secs_f64(t),
        player: Some(player),
        kind: kind.to_string(),
        payload,
    };
    let actions = vec![
        mk(5.0, 1, "DE_QUEUE", json!({"unit": {"name": "Villager"}})),
        mk(40.0, 1, "DE_QUEUE", json!({"unit": {"name": "Villager"}})),
        mk(95.0, 1, "DE_QUEUE", json!({"unit": {"name": "Villager"}})),
        mk(50.0, 2, "BUILD", json!({"building": "House"})),
        mk(130.0, 2, "RESEARCH", json!({"technology": "Loom"})),
        mk(200.0, 2, "SELL", json!({"resource": "wood", "amount": 100})),
        mk(210.0, 1, "MOVE", serde_json::Value::Null),
    ];
    Match {
        players: vec![
            Player {
                number: 1,
                name: "One".to_string(),
                color_id: Some(0),
            },
            Player {
                number: 2,
                name: "Two".to_string(),
                color_id: Some(1),
            },
        ],
        actions,
        duration: Duration::from_secs(210),
    }
}

fn empty_match() -> Match {
    Match {
        players: vec![Player {
            number: 1,
            name: "One".to_string(),
            color_id: None,
        }],
        actions: vec![],
        duration: Duration::ZERO,
    }
}

fn assert_shared_grid(ts: &TimeSeries, window_sec: u32) {
    let n = ts.window_count();
    assert_eq!(ts.times().len(), n);
    for (i, t) in ts.times().iter().enumerate() {
        assert!((t - i as f64 * f64::from(window_sec)).abs() < 1e-9);
    }
    for player in ts.players().collect::<Vec<_>>() {
        assert_eq!(ts.get(player).unwrap().len(), n);
    }
}

#[test]
fn every_operation_shares_one_grid_per_call() {
    let m = sample_match();
    for window_sec in [15, 30, 60, 90] {
        assert_shared_grid(&apm_timeseries(&m, window_sec), window_sec);
        assert_shared_grid(
            &unit_created_timeseries(&m, &villager_pattern(), window_sec),
            window_sec,
        );
        assert_shared_grid(
            &tc_idle_cumulative_timeseries(&m, &villager_pattern(), window_sec, IdleParams::default()),
            window_sec,
        );
        assert_shared_grid(
            &resource_spend_timeseries(&m, "food", window_sec).unwrap(),
            window_sec,
        );
        assert_shared_grid(
            &resource_balance_timeseries(&m, "wood", window_sec, 200.0).unwrap(),
            window_sec,
        );
        assert_shared_grid(&total_spend_timeseries(&m, window_sec, true), window_sec);
        assert_shared_grid(&approximate_total_balance_timeseries(&m, window_sec), window_sec);
        assert_shared_grid(
            &resource_cumulative_timeseries(&m, &BTreeMap::new(), "gold", window_sec).unwrap(),
            window_sec,
        );
    }
}

#[test]
fn window_count_is_ceil_of_latest_contribution() {
    let m = sample_match();
    // Latest attributed action is at 210s.
    assert_eq!(apm_timeseries(&m, 60).window_count(), 4);
    assert_eq!(apm_timeseries(&m, 90).window_count(), 3);
    // Latest villager production is at 95s.
    let units = unit_created_timeseries(&m, &villager_pattern(), 60);
    assert_eq!(units.window_count(), 2);
}

#[test]
fn empty_match_yields_no_data_everywhere() {
    let m = empty_match();
    assert!(apm_timeseries(&m, 60).is_empty());
    assert!(unit_created_timeseries(&m, &villager_pattern(), 60).is_empty());
    assert!(
        tc_idle_cumulative_timeseries(&m, &villager_pattern(), 60, IdleParams::default())
            .is_empty()
    );
    assert!(resource_spend_timeseries(&m, "food", 60).unwrap().is_empty());
    assert!(resource_balance_timeseries(&m, "food", 60, 0.0)
        .unwrap()
        .is_empty());
    assert!(total_spend_timeseries(&m, 60, true).is_empty());
    assert!(approximate_total_balance_timeseries(&m, 60).is_empty());
    assert!(
        resource_cumulative_timeseries(&m, &BTreeMap::new(), "food", 60)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn no_data_is_distinct_from_zeros() {
    let m = sample_match();
    // Nothing in the match spends stone: the spend series is the empty marker.
    let spend = resource_spend_timeseries(&m, "stone", 60).unwrap();
    assert!(spend.is_empty());
    // The balance series still has a grid: flat starting stock, zero flow.
    let balance = resource_balance_timeseries(&m, "stone", 60, 200.0).unwrap();
    assert!(!balance.is_empty());
    assert!(balance
        .get(1)
        .unwrap()
        .iter()
        .all(|v| (*v - 200.0).abs() < 1e-9));

    let empty = TimeSeries::empty(60);
    assert!(empty.is_empty());
    assert_eq!(empty.window_count(), 0);
}
