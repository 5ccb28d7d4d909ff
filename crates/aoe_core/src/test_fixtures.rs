//! Shared builders for synthetic matches used across unit tests.

use std::time::Duration;

use regex::Regex;
use serde_json::{json, Value};

use crate::model::{Action, Match, Player, PlayerId};

pub fn villager_pattern() -> Regex {
    Regex::new(r"(?i)villager|aldean").unwrap()
}

pub fn players(n: u8) -> Vec<Player> {
    (1..=n)
        .map(|i| Player {
            number: i,
            name: format!("Player {i}"),
            color_id: Some(i - 1),
        })
        .collect()
}

pub fn action(t: f64, player: PlayerId, kind: &str, payload: Value) -> Action {
    Action {
        timestamp: Duration::from_secs_f64(t),
        player: Some(player),
        kind: kind.to_string(),
        payload,
    }
}

/// An attributed action with no economic meaning.
pub fn plain(t: f64, player: PlayerId) -> Action {
    action(t, player, "MOVE", Value::Null)
}

pub fn unattributed(t: f64, kind: &str) -> Action {
    Action {
        timestamp: Duration::from_secs_f64(t),
        player: None,
        kind: kind.to_string(),
        payload: Value::Null,
    }
}

pub fn train(t: f64, player: PlayerId, unit: &str) -> Action {
    action(t, player, "DE_QUEUE", json!({"unit": {"name": unit}}))
}

pub fn train_n(t: f64, player: PlayerId, unit: &str, count: u32) -> Action {
    action(
        t,
        player,
        "DE_QUEUE",
        json!({"unit": {"name": unit}, "count": count}),
    )
}

pub fn build(t: f64, player: PlayerId, building: &str) -> Action {
    action(t, player, "BUILD", json!({"building": building}))
}

pub fn research(t: f64, player: PlayerId, tech: &str) -> Action {
    action(t, player, "RESEARCH", json!({"technology": tech}))
}

pub fn market(t: f64, player: PlayerId, kind: &str, resource: &str, amount: f64) -> Action {
    action(
        t,
        player,
        kind,
        json!({"resource": resource, "amount": amount}),
    )
}

/// A match whose duration is the latest action timestamp.
pub fn game(player_count: u8, actions: Vec<Action>) -> Match {
    let duration = actions
        .iter()
        .map(|a| a.timestamp)
        .max()
        .unwrap_or_default();
    Match {
        players: players(player_count),
        actions,
        duration,
    }
}
