//! Unit-category matchers.
//!
//! Curated case-insensitive patterns mapping canonical unit categories to the
//! English and Spanish spellings seen in localized replay payloads.

use std::collections::BTreeMap;

use regex::Regex;

fn pat(re: &str) -> Regex {
    Regex::new(re).expect("unit pattern compiles")
}

/// The default catalog of canonical unit categories.
pub fn base_unit_patterns() -> BTreeMap<String, Regex> {
    let entries: [(&str, &str); 17] = [
        ("Villager", r"(?i)villager|aldean"),
        ("Archer", r"(?i)archer|arquero"),
        ("Crossbowman", r"(?i)crossbow|ballestero"),
        ("Skirmisher", r"(?i)skirm|guerrillero|hostigador"),
        ("Militia", r"(?i)militia|milicia|man.?at.?arms|hombre.?de.?armas"),
        ("Long Swordsman", r"(?i)long\s*sword|espad[oó]n|longsword"),
        ("Spearman", r"(?i)spearman|lancero"),
        ("Pikeman", r"(?i)pike|piquero"),
        ("Scout", r"(?i)scout|explorador|light\s*cav"),
        ("Knight", r"(?i)knight|caballero"),
        ("Cavalier", r"(?i)cavalier|caballero\s*mejorado"),
        ("Paladin", r"(?i)paladin|palad[ií]n"),
        ("Camel", r"(?i)camel|camello"),
        ("Eagle", r"(?i)eagle|[áa]guila"),
        ("Cavalry Archer", r"(?i)cavalry\s*archer|arquero\s*a\s*caballo"),
        ("Hand Cannoneer", r"(?i)hand\s*cannoneer|arcabucero|ca[ñn]onero\s*de\s*mano"),
        ("Hussar", r"(?i)hussar|husar"),
    ];
    entries
        .iter()
        .map(|&(name, re)| (name.to_string(), pat(re)))
        .collect()
}

/// Insert default patterns for any canonical category missing from `patterns`,
/// leaving caller-supplied entries untouched.
pub fn augment_unit_patterns(patterns: &mut BTreeMap<String, Regex>) {
    for (name, re) in base_unit_patterns() {
        patterns.entry(name).or_insert(re);
    }
}
