//! Static cost tables with fuzzy name resolution.
//!
//! Three independent tables (units, buildings, technologies) map normalized
//! names to exact resource costs. Resolution is a two-stage pipeline: callers
//! classify an action first (patterns, event kinds) and only then resolve the
//! cost here. Absence means "no cost known", never zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ResourceCost;

const fn cost(food: u32, wood: u32, gold: u32, stone: u32) -> ResourceCost {
    ResourceCost::new(food, wood, gold, stone)
}

// Minimal but practical cost tables for common units/buildings/techs.
// Values are from standard RM; civ/tech discounts not applied.
const UNIT_COSTS: &[(&str, ResourceCost)] = &[
    // Eco / infantry / archers
    ("villager", cost(50, 0, 0, 0)),
    ("militia", cost(60, 0, 20, 0)),
    ("man-at-arms", cost(60, 0, 20, 0)), // trained as militia pre-upgrade; kept for matching
    ("spearman", cost(35, 25, 0, 0)),
    ("pikeman", cost(35, 25, 0, 0)),
    ("halberdier", cost(35, 25, 0, 0)),
    ("archer", cost(0, 25, 45, 0)),
    ("crossbowman", cost(0, 25, 45, 0)),
    ("skirmisher", cost(25, 35, 0, 0)),
    ("elite skirmisher", cost(25, 35, 0, 0)),
    ("hand cannoneer", cost(45, 0, 50, 0)),
    ("cavalry archer", cost(0, 40, 60, 0)),
    // Cavalry / camels / eagles
    ("scout", cost(80, 0, 0, 0)),
    ("scout cavalry", cost(80, 0, 0, 0)),
    ("light cavalry", cost(80, 0, 0, 0)),
    ("hussar", cost(80, 0, 0, 0)),
    ("knight", cost(60, 0, 75, 0)),
    ("cavalier", cost(60, 0, 75, 0)),
    ("paladin", cost(60, 0, 75, 0)),
    ("camel", cost(55, 0, 60, 0)),
    ("camel rider", cost(55, 0, 60, 0)),
    ("eagle", cost(20, 0, 50, 0)),
    ("eagle scout", cost(20, 0, 50, 0)),
    ("eagle warrior", cost(20, 0, 50, 0)),
    // Siege (common)
    ("battering ram", cost(0, 160, 75, 0)),
    ("mangonel", cost(0, 160, 135, 0)),
    ("onager", cost(0, 160, 135, 0)),
    ("scorpion", cost(0, 75, 75, 0)),
    ("siege ram", cost(0, 0, 0, 0)), // upgrade, not a unit cost
];

const BUILDING_COSTS: &[(&str, ResourceCost)] = &[
    ("house", cost(0, 25, 0, 0)),
    ("lumber camp", cost(0, 100, 0, 0)),
    ("mill", cost(0, 100, 0, 0)),
    ("mining camp", cost(0, 100, 0, 0)),
    ("barracks", cost(0, 175, 0, 0)),
    ("archery range", cost(0, 175, 0, 0)),
    ("stable", cost(0, 175, 0, 0)),
    ("blacksmith", cost(0, 150, 0, 0)),
    ("market", cost(0, 175, 0, 0)),
    ("monastery", cost(0, 175, 0, 0)),
    ("siege workshop", cost(0, 200, 0, 0)),
    ("university", cost(0, 200, 0, 0)),
    ("town center", cost(0, 275, 0, 100)),
    ("watch tower", cost(0, 25, 0, 125)),
    ("guard tower", cost(0, 25, 0, 125)),
    ("keep", cost(0, 25, 0, 125)),
    ("castle", cost(0, 0, 0, 650)),
    // walls / gates omitted
];

const TECH_COSTS: &[(&str, ResourceCost)] = &[
    // Economy
    ("loom", cost(0, 0, 50, 0)),
    ("double-bit axe", cost(0, 100, 0, 0)),
    ("bow saw", cost(100, 150, 0, 0)),
    ("two-man saw", cost(300, 300, 0, 0)),
    ("horse collar", cost(75, 75, 0, 0)),
    ("heavy plow", cost(125, 125, 0, 0)),
    ("crop rotation", cost(250, 250, 0, 0)),
    ("wheelbarrow", cost(175, 50, 0, 0)),
    ("hand cart", cost(300, 200, 0, 0)),
    ("gold mining", cost(100, 75, 0, 0)),
    ("gold shaft mining", cost(200, 150, 0, 0)),
    ("stone mining", cost(100, 75, 0, 0)),
    ("stone shaft mining", cost(200, 150, 0, 0)),
    // Vision / town
    ("town watch", cost(75, 0, 0, 0)),
    ("town patrol", cost(300, 0, 100, 0)),
    // Blacksmith (archery)
    ("fletching", cost(50, 0, 100, 0)),
    ("bodkin arrow", cost(200, 0, 100, 0)),
    ("bracer", cost(300, 0, 200, 0)),
    // Blacksmith (melee)
    ("forging", cost(150, 0, 0, 0)),
    ("iron casting", cost(220, 0, 120, 0)),
    ("blast furnace", cost(275, 0, 225, 0)),
    // Armor (inf/cav/arch)
    ("scale mail armor", cost(100, 0, 0, 0)),
    ("chain mail armor", cost(200, 0, 0, 0)),
    ("plate mail armor", cost(300, 0, 0, 0)),
    ("scale barding armor", cost(150, 0, 0, 0)),
    ("chain barding armor", cost(250, 0, 0, 0)),
    ("plate barding armor", cost(350, 0, 0, 0)),
    ("leather archer armor", cost(100, 0, 0, 0)),
    ("chain archer armor", cost(150, 0, 0, 0)),
    ("ring archer armor", cost(250, 0, 0, 0)),
];

/// One table with its per-key whole-word patterns precompiled.
struct CostTable {
    entries: Vec<(&'static str, Regex, ResourceCost)>,
}

impl CostTable {
    fn new(raw: &'static [(&'static str, ResourceCost)]) -> Self {
        let entries = raw
            .iter()
            .map(|&(key, cost)| {
                let word = Regex::new(&format!(r"\b{}\b", regex::escape(key)))
                    .expect("cost key pattern compiles");
                (key, word, cost)
            })
            .collect();
        Self { entries }
    }

    /// Resolve a name, first match wins: exact, substring either direction,
    /// whole-word search of the key inside the query.
    fn lookup(&self, name: &str) -> Option<ResourceCost> {
        let n = name.trim().to_lowercase();
        if n.is_empty() {
            return None;
        }
        for (key, _, cost) in &self.entries {
            if *key == n {
                return Some(*cost);
            }
        }
        for (key, _, cost) in &self.entries {
            if n.contains(*key) || key.contains(n.as_str()) {
                return Some(*cost);
            }
        }
        for (_, word, cost) in &self.entries {
            if word.is_match(&n) {
                return Some(*cost);
            }
        }
        None
    }
}

static UNIT_TABLE: Lazy<CostTable> = Lazy::new(|| CostTable::new(UNIT_COSTS));
static BUILDING_TABLE: Lazy<CostTable> = Lazy::new(|| CostTable::new(BUILDING_COSTS));
static TECH_TABLE: Lazy<CostTable> = Lazy::new(|| CostTable::new(TECH_COSTS));

/// Cost to train one unit of the named type, if known.
pub fn unit_cost(name: &str) -> Option<ResourceCost> {
    UNIT_TABLE.lookup(name)
}

/// Cost to place the named building, if known.
pub fn building_cost(name: &str) -> Option<ResourceCost> {
    BUILDING_TABLE.lookup(name)
}

/// Cost to research the named technology, if known.
pub fn tech_cost(name: &str) -> Option<ResourceCost> {
    TECH_TABLE.lookup(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup_is_case_and_whitespace_invariant() {
        let expected = cost(0, 25, 45, 0);
        assert_eq!(unit_cost("Crossbowman"), Some(expected));
        assert_eq!(unit_cost("crossbowman"), Some(expected));
        assert_eq!(unit_cost("  CROSSBOWMAN  "), Some(expected));
    }

    #[test]
    fn test_partial_name_resolves_via_substring() {
        // "crossbowman" is contained in the localized/upgraded label.
        assert_eq!(unit_cost("Elite Crossbowman"), unit_cost("crossbowman"));
        assert_eq!(building_cost("Town Center (new)"), Some(cost(0, 275, 0, 100)));
    }

    #[test]
    fn test_key_resolves_inside_longer_query() {
        assert_eq!(tech_cost("researching bracer now"), Some(cost(300, 0, 200, 0)));
    }

    #[test]
    fn test_unknown_names_are_absent_not_zero() {
        assert_eq!(unit_cost("Trebuchet"), None);
        assert_eq!(building_cost("Wonder"), None);
        assert_eq!(tech_cost(""), None);
    }

    #[test]
    fn test_tables_are_independent() {
        assert_eq!(unit_cost("castle"), None);
        assert_eq!(building_cost("castle"), Some(cost(0, 0, 0, 650)));
    }
}
