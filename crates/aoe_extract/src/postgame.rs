//! Best-effort extraction of postgame resource totals.
//!
//! Postgame summaries vary wildly across format and game versions, so this is
//! shape probing, not schema parsing: known per-player containers first, then
//! a recursive scan of the whole structure. Nothing found is an empty mapping,
//! never an error; only file access and JSON decoding can fail.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use aoe_core::{PlayerId, Resource, ResourceTotals};

const CONTAINER_KEYS: &[&str] = &["players", "achievements", "leaderboard"];
const PLAYER_ID_KEYS: &[&str] = &["player_id", "player", "number", "id"];

/// Groupings worth descending into when the resource keys are not at this
/// level directly.
const GROUP_KEY_HINTS: &[&str] = &["collected", "economy", "achievement", "resource"];
const MAX_GROUP_DEPTH: u8 = 3;

/// A candidate per-player totals record, with its explicit id when one exists.
type Bucket = (Option<PlayerId>, ResourceTotals);

/// Extract per-player end-of-game resource totals from a decoded postgame
/// dump. An empty mapping means "no postgame truth available".
pub fn resource_totals_postgame(path: &Path) -> Result<BTreeMap<PlayerId, ResourceTotals>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(extract_resource_totals(&data))
}

/// Pure extraction over an already-decoded postgame structure.
pub fn extract_resource_totals(data: &Value) -> BTreeMap<PlayerId, ResourceTotals> {
    // Known per-player containers first.
    for key in CONTAINER_KEYS {
        if let Some(container) = data.get(key) {
            let buckets = collect_buckets(container);
            if !buckets.is_empty() {
                return assign_players(buckets);
            }
        }
    }

    // Generic deep scan of the whole structure.
    let mut buckets = Vec::new();
    deep_scan(data, &mut buckets);
    if !buckets.is_empty() {
        return assign_players(buckets);
    }

    // Last resort: player achievement records under a summary object.
    if let Some(players) = data.get("summary").and_then(|s| s.get("players")) {
        let buckets = collect_buckets(players);
        if !buckets.is_empty() {
            return assign_players(buckets);
        }
    }

    BTreeMap::new()
}

fn collect_buckets(container: &Value) -> Vec<Bucket> {
    match container {
        Value::Array(items) => items.iter().filter_map(bucket_from).collect(),
        // Maps keyed by player id, e.g. {"1": {...}, "2": {...}}.
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| {
                bucket_from(value).map(|(id, totals)| (id.or_else(|| parse_id(key)), totals))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn bucket_from(value: &Value) -> Option<Bucket> {
    let map = value.as_object()?;
    let totals = totals_from_map(map, 0)?;
    Some((explicit_player_id(map), totals))
}

/// A map is a totals record when all four resources are readable, either from
/// direct or suffixed keys at this level or under a recognized grouping.
fn totals_from_map(map: &Map<String, Value>, depth: u8) -> Option<ResourceTotals> {
    let mut totals = ResourceTotals::default();
    let mut hits = 0;
    for resource in Resource::ALL {
        if let Some(value) = resource_value(map, resource) {
            totals.set(resource, value);
            hits += 1;
        }
    }
    if hits == 4 {
        return Some(totals);
    }
    if depth >= MAX_GROUP_DEPTH {
        return None;
    }
    for (key, value) in map {
        let normalized = key.to_lowercase();
        if GROUP_KEY_HINTS.iter().any(|hint| normalized.contains(hint)) {
            if let Some(inner) = value.as_object() {
                if let Some(found) = totals_from_map(inner, depth + 1) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Read one resource from a map: exact key, `<resource>_*`, or `*_<resource>`,
/// case-insensitive.
fn resource_value(map: &Map<String, Value>, resource: Resource) -> Option<f64> {
    let name = resource.name();
    for (key, value) in map {
        let key = key.to_lowercase();
        let matched = key == name
            || key.starts_with(&format!("{name}_"))
            || key.ends_with(&format!("_{name}"));
        if matched {
            if let Some(v) = numeric(value) {
                return Some(v);
            }
        }
    }
    None
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_id(text: &str) -> Option<PlayerId> {
    text.trim().parse::<PlayerId>().ok().filter(|id| *id > 0)
}

fn explicit_player_id(map: &Map<String, Value>) -> Option<PlayerId> {
    for key in PLAYER_ID_KEYS {
        let Some(value) = map.get(*key) else {
            continue;
        };
        let id = match value {
            Value::Number(n) => n.as_u64().and_then(|v| PlayerId::try_from(v).ok()),
            Value::String(s) => parse_id(s),
            _ => None,
        };
        if let Some(id) = id {
            if id > 0 {
                return Some(id);
            }
        }
    }
    None
}

/// Recursively probe every map for a totals record. A matched record is not
/// descended into further.
fn deep_scan(value: &Value, buckets: &mut Vec<Bucket>) {
    match value {
        Value::Object(map) => {
            if let Some(totals) = totals_from_map(map, 0) {
                buckets.push((explicit_player_id(map), totals));
                return;
            }
            for inner in map.values() {
                deep_scan(inner, buckets);
            }
        }
        Value::Array(items) => {
            for inner in items {
                deep_scan(inner, buckets);
            }
        }
        _ => {}
    }
}

/// Explicit ids always take precedence; positional assignment (first bucket
/// becomes player 1) applies only when ids are absent from every bucket.
fn assign_players(buckets: Vec<Bucket>) -> BTreeMap<PlayerId, ResourceTotals> {
    let mut out = BTreeMap::new();
    if buckets.iter().any(|(id, _)| id.is_some()) {
        for (id, totals) in buckets {
            if let Some(id) = id {
                out.entry(id).or_insert(totals);
            }
        }
    } else {
        for (index, (_, totals)) in buckets.into_iter().enumerate() {
            if let Ok(id) = PlayerId::try_from(index + 1) {
                out.insert(id, totals);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_players_container_with_direct_keys() {
        let data = json!({
            "players": [
                {"food": 9000, "wood": 8000, "gold": 3000, "stone": 1200},
                {"food": 7000, "wood": 6000, "gold": 2500, "stone": 900},
            ],
        });
        let totals = extract_resource_totals(&data);
        assert_eq!(totals.len(), 2);
        assert!((totals[&1].food - 9000.0).abs() < f64::EPSILON);
        assert!((totals[&2].stone - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_ids_beat_positional_order() {
        let data = json!({
            "players": [
                {"player_id": 2, "food": 1, "wood": 2, "gold": 3, "stone": 4},
                {"player_id": 1, "food": 5, "wood": 6, "gold": 7, "stone": 8},
            ],
        });
        let totals = extract_resource_totals(&data);
        assert!((totals[&1].food - 5.0).abs() < f64::EPSILON);
        assert!((totals[&2].food - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_idless_buckets_dropped_when_any_id_exists() {
        let data = json!({
            "players": [
                {"player_id": 3, "food": 1, "wood": 1, "gold": 1, "stone": 1},
                {"food": 2, "wood": 2, "gold": 2, "stone": 2},
            ],
        });
        let totals = extract_resource_totals(&data);
        assert_eq!(totals.len(), 1);
        assert!(totals.contains_key(&3));
    }

    #[test]
    fn test_map_keyed_by_player_id() {
        let data = json!({
            "achievements": {
                "2": {"food": 10, "wood": 20, "gold": 30, "stone": 40},
                "1": {"food": 1, "wood": 2, "gold": 3, "stone": 4},
            },
        });
        let totals = extract_resource_totals(&data);
        assert!((totals[&2].gold - 30.0).abs() < f64::EPSILON);
        assert!((totals[&1].wood - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_suffixed_resource_keys() {
        let data = json!({
            "players": [
                {"food_collected": 9000, "wood_collected": 8000,
                 "gold_collected": 3000, "stone_collected": 1200},
            ],
        });
        let totals = extract_resource_totals(&data);
        assert!((totals[&1].gold - 3000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nested_economy_grouping() {
        let data = json!({
            "players": [
                {
                    "player": 1,
                    "economy": {"total_food": 100, "total_wood": 200,
                                 "total_gold": 300, "total_stone": 400},
                },
            ],
        });
        let totals = extract_resource_totals(&data);
        assert!((totals[&1].stone - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deep_scan_finds_buried_records() {
        let data = json!({
            "version": 63,
            "stats": {
                "teams": [
                    [
                        {"id": 1, "food": 1.0, "wood": 2.0, "gold": 3.0, "stone": 4.0},
                        {"id": 2, "food": 5.0, "wood": 6.0, "gold": 7.0, "stone": 8.0},
                    ],
                ],
            },
        });
        let totals = extract_resource_totals(&data);
        assert_eq!(totals.len(), 2);
        assert!((totals[&2].wood - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_incomplete_records_do_not_match() {
        // Three of four resources is not a totals record.
        let data = json!({
            "players": [{"food": 1, "wood": 2, "gold": 3}],
        });
        assert!(extract_resource_totals(&data).is_empty());
    }

    #[test]
    fn test_nothing_found_is_empty_not_error() {
        assert!(extract_resource_totals(&json!({"chat": ["gg"]})).is_empty());
        assert!(extract_resource_totals(&Value::Null).is_empty());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let data = json!({
            "players": [
                {"food": "9000", "wood": "8000", "gold": "3000", "stone": "1200"},
            ],
        });
        let totals = extract_resource_totals(&data);
        assert!((totals[&1].food - 9000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_file_based_extraction_and_io_errors() {
        let data = json!({
            "players": [
                {"player_id": 1, "food": 1, "wood": 2, "gold": 3, "stone": 4},
            ],
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data.to_string().as_bytes()).unwrap();
        let totals = resource_totals_postgame(file.path()).unwrap();
        assert_eq!(totals.len(), 1);

        let err = resource_totals_postgame(Path::new("/nonexistent/postgame.json")).unwrap_err();
        assert!(err.to_string().contains("postgame.json"));
    }
}
