//! Probes over loosely-typed action payloads.
//!
//! Payload shapes vary across replay format and game versions, so every
//! accessor here is a fixed-priority list of capability checks returning an
//! optional value. Absence is the expected steady state, never an error.

use regex::Regex;
use serde_json::Value;

/// Maximum nesting depth traversed by [`payload_matches`]. Unit names sit at
/// most one or two map levels deep; anything deeper is not worth chasing.
const MAX_MATCH_DEPTH: u8 = 2;

/// Name fields tried, in order, for build actions.
pub const BUILDING_NAME_KEYS: &[&str] = &["building", "object_name", "item", "name"];

/// Name fields tried, in order, for research actions.
pub const TECH_NAME_KEYS: &[&str] = &["technology", "tech", "object_name", "item", "name"];

/// One capability check against a payload map.
enum Probe {
    /// A name-like key inside a nested object, e.g. `payload.unit.name`.
    Nested(&'static str, &'static str),
    /// A top-level key.
    Top(&'static str),
}

const UNIT_NAME_PROBES: &[Probe] = &[
    Probe::Nested("unit", "name"),
    Probe::Nested("unit", "unit_name"),
    Probe::Top("unit_name"),
    Probe::Top("object_name"),
    Probe::Top("item"),
];

fn non_empty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn run_probe(payload: &Value, probe: &Probe) -> Option<String> {
    let value = match probe {
        Probe::Nested(outer, inner) => payload.get(outer)?.get(inner)?,
        Probe::Top(key) => payload.get(key)?,
    };
    non_empty_string(value)
}

/// The first non-empty unit name reachable from the payload, if any.
pub fn unit_name(payload: &Value) -> Option<String> {
    UNIT_NAME_PROBES
        .iter()
        .find_map(|probe| run_probe(payload, probe))
}

/// The first non-empty string among the given top-level keys, in order.
pub fn name_from_keys(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(non_empty_string))
}

/// Whether the payload's unit name, or any string within two map levels of
/// nesting, matches `pattern`.
pub fn payload_matches(payload: &Value, pattern: &Regex) -> bool {
    if unit_name(payload).is_some_and(|name| pattern.is_match(&name)) {
        return true;
    }
    nested_string_matches(payload, pattern, 0)
}

fn nested_string_matches(value: &Value, pattern: &Regex, depth: u8) -> bool {
    match value {
        Value::Object(map) if depth < MAX_MATCH_DEPTH => map
            .values()
            .any(|v| nested_string_matches(v, pattern, depth + 1)),
        Value::String(s) => pattern.is_match(s),
        _ => false,
    }
}

const COUNT_KEYS: &[&str] = &["count", "amount", "quantity", "num", "n"];

/// Repeat count of the payload: the first positive integer among the known
/// count-like keys, accepting integers, floats, and numeric strings. Defaults
/// to 1 when nothing usable is present.
pub fn payload_count(payload: &Value) -> u32 {
    for key in COUNT_KEYS {
        let Some(value) = payload.get(key) else {
            continue;
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if let Some(n) = parsed {
            if let Ok(count) = u32::try_from(n) {
                if count > 0 {
                    return count;
                }
            }
        }
    }
    1
}
