//! Milestone extraction from research and build actions.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Match, PlayerId};
use crate::payload::{name_from_keys, BUILDING_NAME_KEYS, TECH_NAME_KEYS};

/// What a milestone marks on a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Feudal, Castle, or Imperial Age research.
    Age,
    /// Castle construction.
    Castle,
    /// An elite-tier unit upgrade.
    Elite,
    /// One of the fixed high-impact technologies.
    Tech,
    /// An additional town center going up.
    Tc,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportantEvent {
    pub time_sec: f64,
    pub player: PlayerId,
    /// Original payload text, preserved for display.
    pub label: String,
    pub kind: EventKind,
}

/// High-impact technologies worth annotating even though they are not age-ups.
const KEY_TECHS: &[&str] = &[
    "wheelbarrow",
    "hand cart",
    "bracer",
    "chemistry",
    "conscription",
    "ballistics",
    "siege engineers",
    "architecture",
    "thumb ring",
];

fn classify_research(label: &str) -> Option<EventKind> {
    let lower = label.to_lowercase();
    if lower.contains("feudal age") || lower.contains("castle age") || lower.contains("imperial age")
    {
        return Some(EventKind::Age);
    }
    if lower.starts_with("elite ") {
        return Some(EventKind::Elite);
    }
    if KEY_TECHS.iter().any(|tech| lower.contains(tech)) {
        return Some(EventKind::Tech);
    }
    None
}

fn classify_build(label: &str) -> Option<EventKind> {
    let lower = label.to_lowercase();
    if lower.contains("castle") {
        return Some(EventKind::Castle);
    }
    if lower.contains("town center") || lower.contains("town centre") {
        return Some(EventKind::Tc);
    }
    None
}

/// Scan research and build actions for milestones, deduplicated per
/// `(player, label)` keeping the earliest occurrence, sorted by time.
pub fn important_events(game: &Match) -> Vec<ImportantEvent> {
    let mut found = Vec::new();
    for action in &game.actions {
        let Some(player) = action.player else {
            continue;
        };
        let classified = if action.kind.contains("RESEARCH") {
            name_from_keys(&action.payload, TECH_NAME_KEYS)
                .and_then(|label| classify_research(&label).map(|kind| (label, kind)))
        } else if action.kind.contains("BUILD") {
            name_from_keys(&action.payload, BUILDING_NAME_KEYS)
                .and_then(|label| classify_build(&label).map(|kind| (label, kind)))
        } else {
            None
        };
        if let Some((label, kind)) = classified {
            found.push(ImportantEvent {
                time_sec: action.seconds(),
                player,
                label,
                kind,
            });
        }
    }

    found.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
    let mut seen = HashSet::new();
    found.retain(|event| seen.insert((event.player, event.label.clone())));
    found
}
