//! Integration tests for team synergy scoring
//!
//! These tests verify that:
//! - Empty and complete teams land at the ends of the scale
//! - Each signal reacts to the composition it measures
//! - Recommendations name what is missing

use serde_json::json;

use dtwiki::builder::{score_builder, score_team, SignalKind, SynergyConfig, TeamBuilder, ZoneId};
use dtwiki::data::model::{Character, FactionName, Team};
use dtwiki::data::Catalog;

fn character(name: &str, class: &str, factions: &[&str]) -> Character {
    serde_json::from_value(json!({
        "name": name,
        "character_class": class,
        "quality": "SSR",
        "factions": factions,
    }))
    .unwrap()
}

fn catalog() -> Catalog {
    Catalog::from_characters(vec![
        character("Brann", "Guardian", &["Wild Spirit"]),
        character("Celes", "Priest", &["Wild Spirit", "Sanctum Glory"]),
        character("Astra", "Mage", &["Wild Spirit"]),
        character("Fenn", "Archer", &["Wild Spirit"]),
        character("Garr", "Warrior", &["Wild Spirit"]),
        character("Ivy", "Assassin", &["Wild Spirit"]),
        character("Mira", "Mage", &["Arcane Wisdom"]),
        character("Nox", "Mage", &["Arcane Wisdom"]),
    ])
}

/// Team record with the first `overdrive` members given an order
fn team(members: &[&str], overdrive: usize, faction: Option<&str>) -> Team {
    let members: Vec<_> = members
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let order = if i < overdrive { Some(i + 1) } else { None };
            json!({ "character_name": name, "overdrive_order": order })
        })
        .collect();
    serde_json::from_value(json!({
        "name": "Test Team",
        "faction": faction.unwrap_or(""),
        "members": members,
    }))
    .unwrap()
}

#[test]
fn test_empty_team_scores_zero() {
    let report = score_team(&team(&[], 0, None), &catalog(), &SynergyConfig::default());

    assert_eq!(report.score, 0);
    assert_eq!(report.signals.len(), 5);
    assert_eq!(report.recommendations.len(), 1);
    assert!(report.recommendations[0].contains("Add characters"));
}

#[test]
fn test_balanced_team_scores_full() {
    let members = ["Brann", "Celes", "Astra", "Fenn", "Garr", "Ivy"];
    let report = score_team(
        &team(&members, 3, Some("Wild Spirit")),
        &catalog(),
        &SynergyConfig::default(),
    );

    assert_eq!(report.score, 100, "signals: {:?}", report.signals);
    assert!(report.recommendations.is_empty(), "{:?}", report.recommendations);
}

#[test]
fn test_missing_roles_are_recommended() {
    let report = score_team(
        &team(&["Astra", "Mira", "Nox"], 1, None),
        &catalog(),
        &SynergyConfig::default(),
    );

    let roles = report.signal(SignalKind::RoleCoverage).unwrap();
    assert_eq!(roles.value, 0.0);
    assert!(report.recommendations.iter().any(|r| r.contains("Guardian or Warrior")));
    assert!(report.recommendations.iter().any(|r| r.contains("Priest")));

    let diversity = report.signal(SignalKind::ClassDiversity).unwrap();
    assert!((diversity.value - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_overdrive_oversaturation_is_flagged() {
    let members = ["Brann", "Celes", "Astra", "Fenn", "Garr", "Ivy"];
    let report = score_team(&team(&members, 6, None), &catalog(), &SynergyConfig::default());

    let saturation = report.signal(SignalKind::OverdriveSaturation).unwrap();
    assert_eq!(saturation.value, 0.0);
    assert!(report.recommendations.iter().any(|r| r.contains("saturate the gauge")));
}

#[test]
fn test_chosen_faction_overrides_most_shared() {
    let members = ["Brann", "Celes", "Astra"];
    let catalog = catalog();
    let config = SynergyConfig::default();

    let auto = score_team(&team(&members, 0, None), &catalog, &config);
    assert_eq!(auto.signal(SignalKind::FactionOverlap).unwrap().value, 1.0);

    let chosen = score_team(&team(&members, 0, Some("Arcane Wisdom")), &catalog, &config);
    assert_eq!(chosen.signal(SignalKind::FactionOverlap).unwrap().value, 0.0);
    assert!(chosen.score < auto.score);
}

#[test]
fn test_unknown_members_are_ignored() {
    let catalog = catalog();
    let config = SynergyConfig::default();
    let with_unknown = score_team(&team(&["Brann", "Nobody"], 0, None), &catalog, &config);
    let without = score_team(&team(&["Brann"], 0, None), &catalog, &config);

    assert_eq!(with_unknown.score, without.score);
    assert_eq!(
        with_unknown.signal(SignalKind::RosterFill).unwrap().detail,
        "1/6 slots filled"
    );
}

#[test]
fn test_builder_score_matches_exported_team() {
    let catalog = catalog();
    let config = SynergyConfig::default();
    let mut builder = TeamBuilder::from_catalog(&catalog);
    builder.meta.faction = Some(FactionName::WildSpirit);
    for (i, name) in ["Brann", "Celes", "Astra", "Mira"].iter().enumerate() {
        builder.assign(name, ZoneId::Slot(i as u8)).unwrap();
    }
    builder.toggle_overdrive("Astra").unwrap();
    builder.assign("Nox", ZoneId::Bench).unwrap();

    let live = score_builder(&builder, &catalog, &config);
    let exported = score_team(&builder.to_team(), &catalog, &config);
    assert_eq!(live, exported);
}

#[test]
fn test_small_team_measures_overdrive_against_configured_ideal() {
    let report = score_team(
        &team(&["Brann", "Celes"], 2, None),
        &catalog(),
        &SynergyConfig::default(),
    );

    let saturation = report.signal(SignalKind::OverdriveSaturation).unwrap();
    assert!((saturation.value - 2.0 / 3.0).abs() < 1e-6, "{:?}", saturation);
    assert_eq!(saturation.detail, "2 overdrive users (ideal 3)");
}
