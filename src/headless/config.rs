//! JSON configuration parsing for headless builds
//!
//! A build config replays a sequence of drag-and-drop moves against a
//! builder and writes the exported snippet, without opening a window.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::builder::zones::{ZoneId, TEAM_SLOTS};
use crate::data::model::{FactionName, TeamWyrmspells, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    #[default]
    Team,
    TierList,
}

/// One drop: move `entity` into zone `to` ("available", "bench", "slot-0".."slot-5", or a tier label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildMove {
    pub entity: String,
    pub to: String,
    /// Position within the zone (tier lists only)
    #[serde(default)]
    pub index: Option<usize>,
}

/// Overdrive order request for a team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdriveRequest {
    pub entity: String,
    pub order: u8,
}

/// Headless build configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessBuildConfig {
    #[serde(default)]
    pub mode: BuildMode,
    /// Character names to build from (default: every character in the catalog)
    #[serde(default)]
    pub roster: Option<Vec<String>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    /// Team faction (team mode only)
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub wyrmspells: TeamWyrmspells,
    /// Maximum bench size (team mode only; default: unbounded)
    #[serde(default)]
    pub bench_capacity: Option<usize>,
    #[serde(default)]
    pub moves: Vec<BuildMove>,
    /// Applied after all moves (team mode only)
    #[serde(default)]
    pub overdrive: Vec<OverdriveRequest>,
    /// Write the exported snippet here instead of stdout
    #[serde(default)]
    pub output_path: Option<String>,
}

impl HeadlessBuildConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: HeadlessBuildConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (i, step) in self.moves.iter().enumerate() {
            let zone = Self::parse_zone(&step.to).map_err(|e| format!("moves[{}]: {}", i, e))?;
            match (self.mode, zone) {
                (BuildMode::Team, ZoneId::Tier(_)) => {
                    return Err(format!("moves[{}]: tier zones are not used in team mode", i));
                }
                (BuildMode::TierList, ZoneId::Slot(_) | ZoneId::Bench) => {
                    return Err(format!(
                        "moves[{}]: '{}' is only used in team mode (tier lists use available, {})",
                        i,
                        step.to,
                        Self::tier_labels().join(", ")
                    ));
                }
                _ => {}
            }
        }

        if self.mode == BuildMode::TierList {
            if !self.overdrive.is_empty() {
                return Err("overdrive is only used in team mode".to_string());
            }
            if self.faction.is_some() || self.bench_capacity.is_some() {
                return Err("faction and bench_capacity are only used in team mode".to_string());
            }
        }

        for request in &self.overdrive {
            if request.order == 0 || request.order > TEAM_SLOTS {
                return Err(format!(
                    "overdrive order {} for '{}' is out of range (1-{})",
                    request.order, request.entity, TEAM_SLOTS
                ));
            }
        }

        self.parse_faction()?;
        Ok(())
    }

    pub fn parse_zone(name: &str) -> Result<ZoneId, String> {
        name.parse::<ZoneId>()
    }

    /// Faction by name; empty means none
    pub fn parse_faction(&self) -> Result<Option<FactionName>, String> {
        match self.faction.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => FactionName::from_name(name).map(Some).ok_or_else(|| {
                format!(
                    "Unknown faction: '{}'. Valid factions: {}",
                    name,
                    FactionName::all()
                        .iter()
                        .map(|f| f.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }),
        }
    }

    /// Tier labels accepted in `moves[].to`
    pub fn tier_labels() -> Vec<&'static str> {
        Tier::all().iter().map(|t| t.label()).collect()
    }
}
