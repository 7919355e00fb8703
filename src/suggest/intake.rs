//! Extract, validate, normalize and append a suggested entry

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use super::SuggestionLabel;
use crate::builder::zones::TEAM_SLOTS;
use crate::data::model::{Character, Code, StatusEffect, Team, Tier, TierList, UsefulLink, Wyrmspell};
use crate::data::write_data_file;

fn json_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)```json\s*\n(.*?)\n\s*```").expect("fenced json pattern is valid")
    })
}

/// Parse the first fenced ```json block in an issue body
pub fn extract_json_block(body: &str) -> Result<Value, String> {
    let captures = json_block_pattern()
        .captures(body)
        .ok_or_else(|| "No ```json code block found in the issue body.".to_string())?;
    let raw = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON in issue body: {}", e))
}

/// Null, false, zero, and empty strings, arrays or objects count as missing
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

pub fn validate(label: SuggestionLabel, data: &Value) -> Result<(), String> {
    if !data.is_object() {
        return Err("Suggestion JSON must be an object.".to_string());
    }

    let missing: Vec<&str> = label
        .required_fields()
        .iter()
        .copied()
        .filter(|field| is_blank(data.get(*field)))
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "Missing required fields for '{}': {}",
            label,
            missing.join(", ")
        ));
    }

    match label {
        SuggestionLabel::TierList => validate_tier_entries(data),
        SuggestionLabel::Team => validate_team_members(data),
        _ => Ok(()),
    }
}

fn validate_tier_entries(data: &Value) -> Result<(), String> {
    let entries = match data.get("entries") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err("Tier list must have at least one entry.".to_string()),
    };

    for (i, entry) in entries.iter().enumerate() {
        if is_blank(entry.get("character_name")) {
            return Err(format!("Entry {} is missing 'character_name'.", i));
        }
        let tier = match entry.get("tier") {
            Some(Value::String(tier)) if !tier.is_empty() => tier,
            _ => return Err(format!("Entry {} is missing 'tier'.", i)),
        };
        tier.parse::<Tier>().map_err(|e| format!("Entry {}: {}", i, e))?;
    }
    Ok(())
}

fn validate_team_members(data: &Value) -> Result<(), String> {
    let members = match data.get("members") {
        Some(Value::Array(members)) if !members.is_empty() => members,
        _ => return Err("Team must have at least one member.".to_string()),
    };
    if members.len() > TEAM_SLOTS as usize {
        return Err(format!(
            "Team has {} members, at most {} are allowed.",
            members.len(),
            TEAM_SLOTS
        ));
    }

    let mut orders = HashSet::new();
    for (i, member) in members.iter().enumerate() {
        if is_blank(member.get("character_name")) {
            return Err(format!("Member {} is missing 'character_name'.", i));
        }
        match member.get("overdrive_order") {
            None | Some(Value::Null) => {}
            Some(value) => {
                let order = value
                    .as_u64()
                    .filter(|o| (1..=TEAM_SLOTS as u64).contains(o))
                    .ok_or_else(|| {
                        format!("Member {} has overdrive_order {}, expected 1-{}.", i, value, TEAM_SLOTS)
                    })?;
                if !orders.insert(order) {
                    return Err(format!("Member {} repeats overdrive_order {}.", i, order));
                }
            }
        }
    }
    Ok(())
}

fn field(data: &Value, key: &str, default: Value) -> Value {
    match data.get(key) {
        Some(value) => value.clone(),
        None => default,
    }
}

fn text(data: &Value, key: &str) -> Value {
    field(data, key, json!(""))
}

/// Reshape a validated suggestion into the data file's entry layout
pub fn normalize_for_json(label: SuggestionLabel, data: &Value) -> Value {
    match label {
        SuggestionLabel::Codes => json!({
            "code": data["code"],
            "active": field(data, "active", json!(true)),
        }),
        SuggestionLabel::Wyrmspell => json!({
            "name": data["name"],
            "effect": text(data, "effect"),
            "type": text(data, "type"),
        }),
        SuggestionLabel::StatusEffect => json!({
            "name": data["name"],
            "type": text(data, "type"),
            "effect": text(data, "effect"),
            "remark": text(data, "remark"),
        }),
        SuggestionLabel::Links => json!({
            "icon": text(data, "icon"),
            "application": text(data, "application"),
            "name": data["name"],
            "description": text(data, "description"),
            "link": data["link"],
        }),
        SuggestionLabel::Character => json!({
            "name": data["name"],
            "title": text(data, "title"),
            "quality": text(data, "quality"),
            "character_class": text(data, "character_class"),
            "factions": field(data, "factions", json!([])),
            "is_global": field(data, "is_global", json!(true)),
            "subclasses": field(data, "subclasses", json!([])),
            "height": text(data, "height"),
            "weight": text(data, "weight"),
            "origin": text(data, "origin"),
            "lore": text(data, "lore"),
            "quote": text(data, "quote"),
            "talent": field(data, "talent", Value::Null),
            "skills": field(data, "skills", json!([])),
            "noble_phantasm": field(data, "noble_phantasm", Value::Null),
        }),
        SuggestionLabel::TierList => {
            let entries: Vec<Value> = list(data, "entries")
                .iter()
                .map(|e| {
                    json!({
                        "character_name": text(e, "character_name"),
                        "tier": text(e, "tier"),
                        "note": text(e, "note"),
                    })
                })
                .collect();
            json!({
                "name": data["name"],
                "author": text(data, "author"),
                "content_type": text(data, "content_type"),
                "description": text(data, "description"),
                "entries": entries,
            })
        }
        SuggestionLabel::Team => {
            let members: Vec<Value> = list(data, "members")
                .iter()
                .map(|m| {
                    json!({
                        "character_name": text(m, "character_name"),
                        "overdrive_order": field(m, "overdrive_order", Value::Null),
                        "substitutes": field(m, "substitutes", json!([])),
                        "note": text(m, "note"),
                    })
                })
                .collect();
            let spells = match data.get("wyrmspells") {
                Some(spells @ Value::Object(_)) => spells.clone(),
                _ => json!({}),
            };
            json!({
                "name": data["name"],
                "author": text(data, "author"),
                "content_type": text(data, "content_type"),
                "description": text(data, "description"),
                "faction": text(data, "faction"),
                "members": members,
                "wyrmspells": {
                    "breach": text(&spells, "breach"),
                    "refuge": text(&spells, "refuge"),
                    "wildcry": text(&spells, "wildcry"),
                    "dragons_call": text(&spells, "dragons_call"),
                },
            })
        }
    }
}

/// Refuse entries the catalog loader would not read back
pub fn check_entry(label: SuggestionLabel, entry: &Value) -> Result<(), String> {
    match label {
        SuggestionLabel::Codes => parses_as::<Code>(label, entry),
        SuggestionLabel::Character => parses_as::<Character>(label, entry),
        SuggestionLabel::Wyrmspell => parses_as::<Wyrmspell>(label, entry),
        SuggestionLabel::StatusEffect => parses_as::<StatusEffect>(label, entry),
        SuggestionLabel::Links => parses_as::<UsefulLink>(label, entry),
        SuggestionLabel::TierList => parses_as::<TierList>(label, entry),
        SuggestionLabel::Team => parses_as::<Team>(label, entry),
    }
}

fn parses_as<T: DeserializeOwned>(label: SuggestionLabel, entry: &Value) -> Result<(), String> {
    serde_json::from_value::<T>(entry.clone())
        .map(|_| ())
        .map_err(|e| format!("Suggested {} does not match {}: {}", label, label.data_file(), e))
}

fn list<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Append `entry` to an existing data file. Returns the new entry count.
pub fn append_entry(path: &Path, entry: Value) -> Result<usize, String> {
    if !path.exists() {
        return Err(format!("Data file not found: {}", path.display()));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let mut entries: Vec<Value> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    entries.push(entry);
    write_data_file(path, &entries)?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_block() {
        let body = "Some words\n\n```json\n{\"code\": \"A\"}\n```\n\n```json\n{\"code\": \"B\"}\n```";
        assert_eq!(extract_json_block(body).unwrap(), json!({"code": "A"}));
    }

    #[test]
    fn test_missing_block_is_error() {
        let err = extract_json_block("no code here").unwrap_err();
        assert!(err.contains("No ```json code block"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = extract_json_block("```json\n{not json}\n```").unwrap_err();
        assert!(err.starts_with("Invalid JSON"));
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let err = validate(SuggestionLabel::Links, &json!({"name": "", "link": "x"})).unwrap_err();
        assert!(err.contains("name"));
        assert!(!err.contains("link"));
    }

    #[test]
    fn test_mistyped_fields_are_refused() {
        let data = json!({"name": "T", "members": [{"character_name": "A", "substitutes": "B"}]});
        validate(SuggestionLabel::Team, &data).unwrap();
        let entry = normalize_for_json(SuggestionLabel::Team, &data);
        let err = check_entry(SuggestionLabel::Team, &entry).unwrap_err();
        assert!(err.contains("teams.json"), "{}", err);

        let link = normalize_for_json(SuggestionLabel::Links, &json!({"name": 7, "link": "https://x"}));
        assert!(check_entry(SuggestionLabel::Links, &link).is_err());

        let code = normalize_for_json(SuggestionLabel::Codes, &json!({"code": "GIFT"}));
        assert!(check_entry(SuggestionLabel::Codes, &code).is_ok());
    }

    #[test]
    fn test_codes_default_active() {
        let entry = normalize_for_json(SuggestionLabel::Codes, &json!({"code": "GIFT"}));
        assert_eq!(entry, json!({"code": "GIFT", "active": true}));
    }
}
