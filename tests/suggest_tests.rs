//! Integration tests for the suggestion intake
//!
//! These tests verify that:
//! - Builder exports survive the issue round trip into the data files
//! - Invalid suggestions are refused without touching the data file
//! - Step outputs and issue events are read and written as expected

use std::path::{Path, PathBuf};

use dtwiki::builder::{issue_title, to_issue_body, TeamBuilder, TierListBuilder, ZoneId};
use dtwiki::data::catalog::{TEAMS_FILE, TIER_LISTS_FILE};
use dtwiki::data::model::Tier;
use dtwiki::data::Catalog;
use dtwiki::suggest::{process_issue, read_event, write_outputs, Issue, SuggestOutcome, SuggestionLabel};

/// Fresh data directory seeded with empty team and tier list files
fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dtwiki-suggest-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(TEAMS_FILE), "[]\n").unwrap();
    std::fs::write(dir.join(TIER_LISTS_FILE), "[]\n").unwrap();
    dir
}

fn issue(title: &str, body: &str) -> Issue {
    Issue {
        number: Some(42),
        title: title.to_string(),
        body: Some(body.to_string()),
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_exported_team_is_appended() {
    let dir = data_dir("team");
    let mut builder = TeamBuilder::new(["Astra", "Brann", "Celes"]);
    builder.meta.name = "Trio".to_string();
    builder.assign("Astra", ZoneId::Slot(0)).unwrap();
    builder.assign("Celes", ZoneId::Slot(1)).unwrap();
    builder.toggle_overdrive("Celes").unwrap();

    let json = builder.export().unwrap();
    let title = issue_title(SuggestionLabel::Team, &builder.meta.name);
    let body = to_issue_body(SuggestionLabel::Team, &json);

    let outcome = process_issue(&issue(&title, &body), &dir).unwrap();
    assert_eq!(
        outcome,
        SuggestOutcome::Applied {
            label: SuggestionLabel::Team,
            json_file: TEAMS_FILE.to_string(),
            total_entries: 1,
        }
    );

    let catalog = Catalog::load(&dir).unwrap();
    assert_eq!(catalog.teams.len(), 1);
    assert_eq!(catalog.teams[0], builder.to_team());
}

#[test]
fn test_exported_tier_list_is_appended() {
    let dir = data_dir("tier");
    let mut builder = TierListBuilder::new(["Astra", "Brann"]);
    builder.meta.name = "Arena".to_string();
    builder.assign("Brann", ZoneId::Tier(Tier::SPlus)).unwrap();
    builder.assign("Astra", ZoneId::Tier(Tier::C)).unwrap();

    let body = to_issue_body(SuggestionLabel::TierList, &builder.export().unwrap());
    process_issue(&issue("[Tier List] Arena", &body), &dir).unwrap();
    process_issue(&issue("[Tier List] Arena again", &body), &dir).unwrap();

    let catalog = Catalog::load(&dir).unwrap();
    assert_eq!(catalog.tier_lists.len(), 2);
    assert_eq!(catalog.tier_lists[0].entries[0].tier, Tier::SPlus);
    assert!(read(&dir.join(TIER_LISTS_FILE)).ends_with("]\n"));
}

#[test]
fn test_title_without_prefix_is_skipped() {
    let dir = data_dir("skip");
    let outcome = process_issue(&issue("Bug: crash on launch", "```json\n{}\n```"), &dir).unwrap();
    assert_eq!(outcome, SuggestOutcome::Skipped);
    assert_eq!(read(&dir.join(TEAMS_FILE)), "[]\n");
}

#[test]
fn test_invalid_team_leaves_file_untouched() {
    let dir = data_dir("invalid");
    let body = "```json\n{\"name\": \"Dupes\", \"members\": [\
        {\"character_name\": \"Astra\", \"overdrive_order\": 1},\
        {\"character_name\": \"Brann\", \"overdrive_order\": 1}]}\n```";

    let err = process_issue(&issue("[Team] Dupes", body), &dir).unwrap_err();
    assert!(err.contains("repeats overdrive_order"), "{}", err);
    assert_eq!(read(&dir.join(TEAMS_FILE)), "[]\n");
}

#[test]
fn test_missing_block_and_missing_file_are_errors() {
    let dir = data_dir("errors");
    let err = process_issue(&issue("[Team] Nothing", "no code here"), &dir).unwrap_err();
    assert!(err.contains("No ```json code block"), "{}", err);

    let body = "```json\n{\"code\": \"GIFT2024\"}\n```";
    let err = process_issue(&issue("[Code] GIFT2024", body), &dir).unwrap_err();
    assert!(err.contains("codes.json"), "{}", err);
}

#[test]
fn test_event_and_outputs() {
    let dir = data_dir("event");
    let event_path = dir.join("event.json");
    std::fs::write(
        &event_path,
        r#"{"action": "labeled", "issue": {"number": 7, "title": "[Link] Map", "body": null}}"#,
    )
    .unwrap();

    let event = read_event(&event_path).unwrap();
    assert_eq!(event.issue.number, Some(7));
    assert_eq!(event.issue.body, None);

    let output = dir.join("output.txt");
    std::fs::write(&output, "existing=1\n").unwrap();
    write_outputs(&output, &[("json_file", "useful-links.json"), ("label", "links")]).unwrap();
    assert_eq!(read(&output), "existing=1\njson_file=useful-links.json\nlabel=links\n");
}

#[test]
fn test_mistyped_member_is_refused_and_catalog_still_loads() {
    let dir = data_dir("mistyped");
    let body = "```json\n{\"name\": \"Subs\", \"members\": [\
        {\"character_name\": \"Astra\", \"substitutes\": \"Brann\", \"overdrive_order\": 1}]}\n```";

    let err = process_issue(&issue("[Team] Subs", body), &dir).unwrap_err();
    assert!(err.contains("teams.json"), "{}", err);
    assert_eq!(read(&dir.join(TEAMS_FILE)), "[]\n");

    let body = "```json\n{\"name\": \"Numbers\", \"members\": [{\"character_name\": 5}]}\n```";
    assert!(process_issue(&issue("[Team] Numbers", body), &dir).is_err());

    let catalog = Catalog::load(&dir).unwrap();
    assert!(catalog.teams.is_empty());
}
