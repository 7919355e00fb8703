//! Integration tests for data file normalization
//!
//! These tests verify that:
//! - Only new or changed entries get a fresh `last_updated`
//! - Sorting follows each file's canonical order and keeps unknown fields
//! - Missing and non-array files are handled without failing the run

use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dtwiki::data::normalize::{normalize_all, normalize_file, NormalizeMode};

const NOW: i64 = 1_700_000_000;

fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dtwiki-normalize-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, file: &str, value: &Value) {
    std::fs::write(dir.join(file), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read(dir: &Path, file: &str) -> Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join(file)).unwrap()).unwrap()
}

fn no_baseline() -> HashMap<String, Vec<Value>> {
    HashMap::new()
}

#[test]
fn test_only_changed_entries_are_bumped() {
    let dir = data_dir("bump");
    let committed = json!([
        {"name": "Burn", "type": "Debuff", "effect": "old text", "last_updated": 100},
        {"name": "Shield", "type": "Buff", "effect": "absorbs", "last_updated": 100},
    ]);
    write(
        &dir,
        "status-effects.json",
        &json!([
            {"name": "Burn", "type": "Debuff", "effect": "new text", "last_updated": 100},
            {"name": "Shield", "type": "Buff", "effect": "absorbs", "last_updated": 100},
            {"name": "Stun", "type": "Control", "effect": "skip a turn"},
        ]),
    );

    let mut baseline = HashMap::new();
    baseline.insert(
        "status-effects.json".to_string(),
        committed.as_array().unwrap().clone(),
    );

    let report = normalize_file(&dir, "status-effects.json", NOW, NormalizeMode::SortAndTimestamps, &baseline).unwrap();
    assert!(report.exists && report.sorted && report.timestamped);
    assert_eq!(report.bumped, 2);
    assert_eq!(report.skipped_unchanged, 1);
    assert_eq!(report.summary(), "sorted, bumped 2, skipped 1 unchanged");

    let entries = read(&dir, "status-effects.json");
    let by_name = |name: &str| entries.as_array().unwrap().iter().find(|e| e["name"] == name).unwrap().clone();
    assert_eq!(by_name("Burn")["last_updated"], NOW);
    assert_eq!(by_name("Shield")["last_updated"], 100);
    assert_eq!(by_name("Stun")["last_updated"], NOW);

    // Buff, Debuff, Control
    let order: Vec<&str> = entries.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["Shield", "Burn", "Stun"]);
}

#[test]
fn test_unchanged_entry_without_timestamp_gets_one() {
    let dir = data_dir("missing-ts");
    let entry = json!({"name": "Elara", "character_class": "Priest"});
    write(&dir, "characters.json", &json!([entry.clone()]));

    let mut baseline = HashMap::new();
    baseline.insert("characters.json".to_string(), vec![entry]);

    let report = normalize_file(&dir, "characters.json", NOW, NormalizeMode::TimestampsOnly, &baseline).unwrap();
    assert_eq!(report.bumped, 1);
    assert!(!report.sorted);
    assert_eq!(read(&dir, "characters.json")[0]["last_updated"], NOW);
}

#[test]
fn test_codes_match_on_code_field() {
    let dir = data_dir("codes");
    let committed = vec![json!({"code": "GIFT", "active": true, "last_updated": 5})];
    write(
        &dir,
        "codes.json",
        &json!([
            {"code": "GIFT", "active": true, "last_updated": 5},
            {"code": "NEW", "active": true},
        ]),
    );

    let mut baseline = HashMap::new();
    baseline.insert("codes.json".to_string(), committed);

    let report = normalize_file(&dir, "codes.json", NOW, NormalizeMode::SortAndTimestamps, &baseline).unwrap();
    assert_eq!(report.bumped, 1);
    assert!(!report.sorted, "codes keep insertion order");

    let entries = read(&dir, "codes.json");
    assert_eq!(entries[0]["last_updated"], 5);
    assert_eq!(entries[1]["code"], "NEW");
}

#[test]
fn test_sort_only_keeps_unknown_fields_and_order() {
    let dir = data_dir("sort-only");
    write(
        &dir,
        "characters.json",
        &json!([
            {"name": "Zed", "character_class": "Mage", "quality": "UR", "custom": {"b": 1, "a": 2}},
            {"name": "Ann", "character_class": "Guardian", "quality": "SR"},
        ]),
    );

    let report = normalize_file(&dir, "characters.json", NOW, NormalizeMode::SortOnly, &no_baseline()).unwrap();
    assert!(report.sorted && !report.timestamped);

    let contents = std::fs::read_to_string(dir.join("characters.json")).unwrap();
    assert!(contents.ends_with("}\n]\n"), "two-space pretty print with trailing newline");
    assert!(!contents.contains("last_updated"));

    let entries = read(&dir, "characters.json");
    assert_eq!(entries[0]["name"], "Ann");
    let custom_keys: Vec<&String> = entries[1]["custom"].as_object().unwrap().keys().collect();
    assert_eq!(custom_keys, vec!["b", "a"], "object key order is preserved");
}

#[test]
fn test_non_ascii_is_written_as_is() {
    let dir = data_dir("unicode");
    write(&dir, "factions.json", &json!([{"name": "Wild Spirit", "wyrm": "Emerald Whelp", "description": "森の守護者"}]));

    normalize_file(&dir, "factions.json", NOW, NormalizeMode::SortOnly, &no_baseline()).unwrap();
    let contents = std::fs::read_to_string(dir.join("factions.json")).unwrap();
    assert!(contents.contains("森の守護者"));
}

#[test]
fn test_normalize_all_handles_missing_and_non_array_files() {
    let dir = data_dir("all");
    write(&dir, "changelog.json", &json!({"latest": "1.2.0"}));
    write(&dir, "artifacts.json", &json!([{"name": "B", "quality": "SR"}, {"name": "A", "quality": "UR"}]));

    // Every *.json in the directory, in name order
    let reports = normalize_all(&dir, &[], NOW, NormalizeMode::SortAndTimestamps, &no_baseline()).unwrap();
    let files: Vec<&str> = reports.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(files, vec!["artifacts.json", "changelog.json"]);
    assert_eq!(reports[1].summary(), "no-op");
    assert_eq!(read(&dir, "changelog.json"), json!({"latest": "1.2.0"}));
    assert_eq!(read(&dir, "artifacts.json")[0]["name"], "A");

    let reports = normalize_all(
        &dir,
        &["teams.json".to_string()],
        NOW,
        NormalizeMode::SortAndTimestamps,
        &no_baseline(),
    )
    .unwrap();
    assert!(!reports[0].exists);
}
