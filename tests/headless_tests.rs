//! Integration tests for headless execution
//!
//! These tests verify that:
//! - Build configs replay moves and export the snippet
//! - Refused moves are reported without aborting the build
//! - Tasks run to completion inside a windowless app

use serde_json::json;
use std::path::PathBuf;

use dtwiki::builder::SynergyConfig;
use dtwiki::data::catalog::{CHARACTERS_FILE, TEAMS_FILE};
use dtwiki::data::model::{Team, TierList};
use dtwiki::data::normalize::NormalizeMode;
use dtwiki::headless::{execute_build, run_headless, run_headless_with, BuildMode, HeadlessBuildConfig, HeadlessOutcome, HeadlessTask};
use dtwiki::suggest::SuggestOutcome;

/// Data directory with a small character roster
fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dtwiki-headless-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let characters = json!([
        {"name": "Brann", "character_class": "Guardian", "factions": ["Wild Spirit"]},
        {"name": "Celes", "character_class": "Priest", "factions": ["Wild Spirit"]},
        {"name": "Astra", "character_class": "Mage", "factions": ["Arcane Wisdom"]},
        {"name": "Fenn", "character_class": "Archer", "factions": ["Wild Spirit"]},
    ]);
    std::fs::write(dir.join(CHARACTERS_FILE), characters.to_string()).unwrap();
    dir
}

/// Helper to create a build config from JSON
fn config(value: serde_json::Value) -> HeadlessBuildConfig {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_team_build_replays_moves() {
    let dir = data_dir("team");
    let config = config(json!({
        "mode": "team",
        "name": "Wild Wall",
        "faction": "Wild Spirit",
        "moves": [
            {"entity": "Brann", "to": "slot-0"},
            {"entity": "Celes", "to": "slot-1"},
            {"entity": "Astra", "to": "slot-1"},
            {"entity": "Fenn", "to": "slot-2"},
        ],
        "overdrive": [{"entity": "Fenn", "order": 1}],
    }));

    let result = execute_build(&config, &dir, &SynergyConfig::default()).unwrap();
    assert_eq!(result.mode, BuildMode::Team);
    assert_eq!(result.issue_title, "[Team] Wild Wall");
    assert!(result.rejected.is_empty(), "{:?}", result.rejected);

    let team: Team = serde_json::from_str(&result.snippet).unwrap();
    let members: Vec<&str> = team.members.iter().map(|m| m.character_name.as_str()).collect();
    assert_eq!(members, vec!["Brann", "Astra", "Fenn"], "Celes was bumped to the bench");
    assert_eq!(team.members[2].overdrive_order, Some(1));
    assert!(result.synergy.is_some());
}

#[test]
fn test_refused_moves_are_reported() {
    let dir = data_dir("rejected");
    let config = config(json!({
        "mode": "team",
        "bench_capacity": 0,
        "moves": [
            {"entity": "Brann", "to": "slot-0"},
            {"entity": "Celes", "to": "slot-0"},
            {"entity": "Nobody", "to": "slot-3"},
        ],
        "overdrive": [{"entity": "Astra", "order": 1}],
    }));

    let result = execute_build(&config, &dir, &SynergyConfig::default()).unwrap();
    assert_eq!(result.rejected.len(), 3, "{:?}", result.rejected);
    assert!(result.rejected[0].contains("full"));
    assert!(result.rejected[1].contains("unknown character"));
    assert!(result.rejected[2].contains("not in a team slot"));

    let team: Team = serde_json::from_str(&result.snippet).unwrap();
    assert_eq!(team.members.len(), 1);
    assert_eq!(team.members[0].character_name, "Brann");
}

#[test]
fn test_tier_list_build_writes_output() {
    let dir = data_dir("tier");
    let output = dir.join("tier-list.json");
    let config = config(json!({
        "mode": "tier_list",
        "name": "Arena",
        "roster": ["Brann", "Celes", "Astra"],
        "moves": [
            {"entity": "Astra", "to": "S"},
            {"entity": "Brann", "to": "S"},
            {"entity": "Celes", "to": "S", "index": 0},
        ],
        "output_path": output.to_string_lossy(),
    }));

    let result = execute_build(&config, &dir, &SynergyConfig::default()).unwrap();
    assert!(result.synergy.is_none());
    assert_eq!(result.issue_title, "[Tier List] Arena");

    let written: TierList = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let names: Vec<&str> = written.entries.iter().map(|e| e.character_name.as_str()).collect();
    assert_eq!(names, vec!["Celes", "Astra", "Brann"]);
}

#[test]
fn test_config_validation() {
    let tier_zone_in_team = config(json!({"mode": "team", "moves": [{"entity": "Brann", "to": "S+"}]}));
    assert!(tier_zone_in_team.validate().is_err());

    let slot_in_tier_list = config(json!({"mode": "tier_list", "moves": [{"entity": "Brann", "to": "slot-0"}]}));
    assert!(slot_in_tier_list.validate().is_err());

    let bad_slot = config(json!({"moves": [{"entity": "Brann", "to": "slot-6"}]}));
    assert!(bad_slot.validate().unwrap_err().contains("slot-0 to slot-5"));

    let bad_order = config(json!({"overdrive": [{"entity": "Brann", "order": 7}]}));
    assert!(bad_order.validate().is_err());

    let bad_faction = config(json!({"faction": "Nowhere"}));
    assert!(bad_faction.validate().is_err());
}

#[test]
fn test_run_headless_scores_team_file() {
    let dir = data_dir("score");
    let team_path = dir.join("team.json");
    std::fs::write(
        &team_path,
        json!({"name": "Pair", "members": [{"character_name": "Brann"}, {"character_name": "Celes"}]}).to_string(),
    )
    .unwrap();

    let outcome = run_headless(
        HeadlessTask::Score {
            team_path,
            data_dir: dir,
        },
        false,
    )
    .unwrap();

    let HeadlessOutcome::Scored(reports) = outcome else {
        panic!("expected scores");
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "Pair");
    assert!(reports[0].1.score > 0);
}

#[test]
fn test_run_headless_reports_task_errors() {
    let dir = data_dir("missing-team");
    let result = run_headless(
        HeadlessTask::Score {
            team_path: dir.join("absent.json"),
            data_dir: dir,
        },
        false,
    );
    assert!(result.unwrap_err().contains("absent.json"));
}

#[test]
fn test_run_headless_suggest_writes_outputs() {
    let dir = data_dir("suggest");
    std::fs::write(dir.join(TEAMS_FILE), "[]\n").unwrap();
    let event_path = dir.join("event.json");
    let body = "```json\n{\"name\": \"Solo\", \"members\": [{\"character_name\": \"Brann\"}]}\n```";
    std::fs::write(&event_path, json!({"issue": {"number": 1, "title": "[Team] Solo", "body": body}}).to_string())
        .unwrap();
    let output_file = dir.join("outputs.txt");

    let outcome = run_headless(
        HeadlessTask::Suggest {
            event_path,
            data_dir: dir.clone(),
            output_file: Some(output_file.clone()),
        },
        false,
    )
    .unwrap();

    assert!(matches!(
        outcome,
        HeadlessOutcome::Suggested(SuggestOutcome::Applied { total_entries: 1, .. })
    ));
    assert_eq!(
        std::fs::read_to_string(&output_file).unwrap(),
        "json_file=teams.json\nlabel=team\n"
    );
}

#[test]
fn test_run_headless_normalize_sorts_characters() {
    let dir = data_dir("normalize");
    let outcome = run_headless(
        HeadlessTask::Normalize {
            data_dir: dir.clone(),
            files: vec![CHARACTERS_FILE.to_string()],
            mode: NormalizeMode::SortOnly,
        },
        false,
    )
    .unwrap();

    let HeadlessOutcome::Normalized(reports) = outcome else {
        panic!("expected normalize reports");
    };
    assert!(reports[0].sorted);

    let sorted: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join(CHARACTERS_FILE)).unwrap()).unwrap();
    let names: Vec<&str> = sorted
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Brann", "Celes", "Fenn", "Astra"]);
}

#[test]
fn test_broken_synergy_weights_only_fail_scoring_tasks() {
    let dir = data_dir("broken-weights");
    let weights = dir.join("synergy.ron");
    std::fs::write(&weights, "(weights: oops").unwrap();

    let outcome = run_headless_with(
        HeadlessTask::Normalize {
            data_dir: dir.clone(),
            files: vec![CHARACTERS_FILE.to_string()],
            mode: NormalizeMode::SortOnly,
        },
        false,
        &weights,
    )
    .unwrap();
    assert!(matches!(outcome, HeadlessOutcome::Normalized(_)));

    let team_path = dir.join("team.json");
    std::fs::write(&team_path, json!({"name": "Solo", "members": [{"character_name": "Brann"}]}).to_string())
        .unwrap();
    let err = run_headless_with(HeadlessTask::Score { team_path, data_dir: dir }, false, &weights).unwrap_err();
    assert!(err.contains("synergy config"), "{}", err);
}
