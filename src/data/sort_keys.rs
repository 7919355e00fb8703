//! Canonical entry ordering for data files
//!
//! Keys operate on raw JSON entries so files can be sorted without
//! round-tripping them through the typed model (which would drop fields the
//! model does not know about). Unknown enum values sort after known ones.

use serde_json::Value;
use std::cmp::Ordering;

/// SR+ is unranked and sorts with unknown qualities, matching existing data files
pub const QUALITY_ORDER: &[&str] = &["UR", "SSR EX", "SSR+", "SSR", "SR", "R", "N"];
pub const CLASS_ORDER: &[&str] = &["Guardian", "Priest", "Assassin", "Warrior", "Archer", "Mage"];
pub const STATE_ORDER: &[&str] = &[
    "Buff",
    "Debuff",
    "Special",
    "Control",
    "Elemental",
    "Blessing",
    "Exclusive",
];
pub const RESOURCE_CATEGORY_ORDER: &[&str] =
    &["Currency", "Gift", "Item", "Material", "Summoning", "Shard"];
pub const TIER_ORDER: &[&str] = &["S+", "S", "A", "B", "C", "D"];

/// Rank given to values missing from an order table
const FALLBACK_RANK: usize = 999;

/// One component of a composite sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyPart {
    Rank(usize),
    Text(String),
}

pub type SortKey = Vec<KeyPart>;

pub type SortKeyFn = fn(&Value) -> SortKey;

fn field<'a>(entry: &'a Value, name: &str) -> &'a str {
    entry.get(name).and_then(Value::as_str).unwrap_or("")
}

fn rank(order: &[&str], entry: &Value, name: &str) -> KeyPart {
    let value = field(entry, name);
    KeyPart::Rank(order.iter().position(|o| *o == value).unwrap_or(FALLBACK_RANK))
}

fn lower(entry: &Value, name: &str) -> KeyPart {
    KeyPart::Text(field(entry, name).to_lowercase())
}

pub fn character_sort_key(c: &Value) -> SortKey {
    vec![
        rank(CLASS_ORDER, c, "character_class"),
        rank(QUALITY_ORDER, c, "quality"),
        lower(c, "name"),
    ]
}

pub fn wyrmspell_sort_key(w: &Value) -> SortKey {
    vec![lower(w, "type"), rank(QUALITY_ORDER, w, "quality"), lower(w, "name")]
}

pub fn resource_sort_key(r: &Value) -> SortKey {
    vec![
        rank(RESOURCE_CATEGORY_ORDER, r, "category"),
        rank(QUALITY_ORDER, r, "quality"),
        lower(r, "name"),
    ]
}

pub fn status_effect_sort_key(se: &Value) -> SortKey {
    vec![rank(STATE_ORDER, se, "type"), lower(se, "name")]
}

pub fn useful_link_sort_key(l: &Value) -> SortKey {
    vec![lower(l, "application"), lower(l, "name")]
}

pub fn artifact_sort_key(a: &Value) -> SortKey {
    vec![rank(QUALITY_ORDER, a, "quality"), lower(a, "name")]
}

pub fn noble_phantasm_sort_key(np: &Value) -> SortKey {
    vec![lower(np, "character"), lower(np, "name")]
}

pub fn faction_sort_key(f: &Value) -> SortKey {
    vec![lower(f, "name")]
}

/// Sort key for a data file, if the file has a canonical order.
/// Files without one keep their insertion order.
pub fn sort_key_for(filename: &str) -> Option<SortKeyFn> {
    let key: SortKeyFn = match filename {
        "factions.json" => faction_sort_key,
        "characters.json" => character_sort_key,
        "wyrmspells.json" => wyrmspell_sort_key,
        "resources.json" => resource_sort_key,
        "status-effects.json" => status_effect_sort_key,
        "useful-links.json" => useful_link_sort_key,
        "artifacts.json" => artifact_sort_key,
        "noble_phantasm.json" => noble_phantasm_sort_key,
        _ => return None,
    };
    Some(key)
}

/// Stable sort of entries by a key function
pub fn sort_entries(entries: &mut [Value], key: SortKeyFn) {
    entries.sort_by(|a, b| compare_by(key, a, b));
}

fn compare_by(key: SortKeyFn, a: &Value, b: &Value) -> Ordering {
    key(a).cmp(&key(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(entries: &[Value]) -> Vec<&str> {
        entries.iter().map(|e| e["name"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_characters_sort_by_class_then_quality_then_name() {
        let mut entries = vec![
            json!({"name": "zed", "character_class": "Mage", "quality": "UR"}),
            json!({"name": "Bo", "character_class": "Guardian", "quality": "SSR"}),
            json!({"name": "al", "character_class": "Guardian", "quality": "SSR"}),
            json!({"name": "Cy", "character_class": "Guardian", "quality": "UR"}),
        ];
        sort_entries(&mut entries, character_sort_key);
        assert_eq!(names(&entries), vec!["Cy", "al", "Bo", "zed"]);
    }

    #[test]
    fn test_unknown_values_sort_last() {
        let mut entries = vec![
            json!({"name": "Mystery", "type": "Weird"}),
            json!({"name": "Shield", "type": "Buff"}),
            json!({"name": "Untyped"}),
        ];
        sort_entries(&mut entries, status_effect_sort_key);
        assert_eq!(names(&entries), vec!["Shield", "Mystery", "Untyped"]);
    }

    #[test]
    fn test_sr_plus_sorts_after_ranked_qualities() {
        let mut entries = vec![
            json!({"name": "Plus", "quality": "SR+"}),
            json!({"name": "Common", "quality": "N"}),
            json!({"name": "Rare", "quality": "SR"}),
        ];
        sort_entries(&mut entries, artifact_sort_key);
        assert_eq!(names(&entries), vec!["Rare", "Common", "Plus"]);
    }

    #[test]
    fn test_files_without_key_keep_order() {
        assert!(sort_key_for("codes.json").is_none());
        assert!(sort_key_for("teams.json").is_none());
        assert!(sort_key_for("characters.json").is_some());
    }
}
