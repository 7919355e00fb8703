//! Loading the wiki database from a `data/` directory
//!
//! Every data file is a JSON array. A file that is missing loads as an
//! empty list (the wiki still works with partial data); a file that exists
//! but does not parse is an error naming the file.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::model::{
    self, Artifact, Character, Code, Faction, Gear, GoldenAlliance, Howlkin, NoblePhantasm,
    StatusEffect, Subclass, Team, TierList, UsefulLink, Wyrmspell,
};

pub const CHARACTERS_FILE: &str = "characters.json";
pub const FACTIONS_FILE: &str = "factions.json";
pub const ARTIFACTS_FILE: &str = "artifacts.json";
pub const GEAR_FILE: &str = "gear.json";
pub const STATUS_EFFECTS_FILE: &str = "status-effects.json";
pub const WYRMSPELLS_FILE: &str = "wyrmspells.json";
pub const NOBLE_PHANTASMS_FILE: &str = "noble_phantasm.json";
pub const HOWLKINS_FILE: &str = "howlkins.json";
pub const GOLDEN_ALLIANCES_FILE: &str = "golden_alliances.json";
pub const SUBCLASSES_FILE: &str = "subclasses.json";
pub const RESOURCES_FILE: &str = "resources.json";
pub const CODES_FILE: &str = "codes.json";
pub const USEFUL_LINKS_FILE: &str = "useful-links.json";
pub const TIER_LISTS_FILE: &str = "tier-lists.json";
pub const TEAMS_FILE: &str = "teams.json";

/// The full wiki database held in memory
#[derive(Resource, Debug, Clone, Default)]
pub struct Catalog {
    /// Directory the catalog was loaded from
    pub data_dir: PathBuf,
    pub characters: Vec<Character>,
    pub factions: Vec<Faction>,
    pub artifacts: Vec<Artifact>,
    pub gear: Vec<Gear>,
    pub status_effects: Vec<StatusEffect>,
    pub wyrmspells: Vec<Wyrmspell>,
    pub noble_phantasms: Vec<NoblePhantasm>,
    pub howlkins: Vec<Howlkin>,
    pub golden_alliances: Vec<GoldenAlliance>,
    pub subclasses: Vec<Subclass>,
    /// In-game items and currencies (not Bevy resources)
    pub resources: Vec<model::Resource>,
    pub codes: Vec<Code>,
    pub useful_links: Vec<UsefulLink>,
    pub tier_lists: Vec<TierList>,
    pub teams: Vec<Team>,
}

impl Catalog {
    /// Load every known data file from `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self, String> {
        let catalog = Self {
            data_dir: data_dir.to_path_buf(),
            characters: load_list(data_dir, CHARACTERS_FILE)?,
            factions: load_list(data_dir, FACTIONS_FILE)?,
            artifacts: load_list(data_dir, ARTIFACTS_FILE)?,
            gear: load_list(data_dir, GEAR_FILE)?,
            status_effects: load_list(data_dir, STATUS_EFFECTS_FILE)?,
            wyrmspells: load_list(data_dir, WYRMSPELLS_FILE)?,
            noble_phantasms: load_list(data_dir, NOBLE_PHANTASMS_FILE)?,
            howlkins: load_list(data_dir, HOWLKINS_FILE)?,
            golden_alliances: load_list(data_dir, GOLDEN_ALLIANCES_FILE)?,
            subclasses: load_list(data_dir, SUBCLASSES_FILE)?,
            resources: load_list(data_dir, RESOURCES_FILE)?,
            codes: load_list(data_dir, CODES_FILE)?,
            useful_links: load_list(data_dir, USEFUL_LINKS_FILE)?,
            tier_lists: load_list(data_dir, TIER_LISTS_FILE)?,
            teams: load_list(data_dir, TEAMS_FILE)?,
        };

        info!(
            "Loaded catalog from {:?}: {} characters, {} tier lists, {} teams",
            data_dir,
            catalog.characters.len(),
            catalog.tier_lists.len(),
            catalog.teams.len()
        );

        Ok(catalog)
    }

    /// Build a catalog holding only characters (builders and tests need nothing else)
    pub fn from_characters(characters: Vec<Character>) -> Self {
        Self {
            characters,
            ..Default::default()
        }
    }

    /// Case-insensitive character lookup
    pub fn character(&self, name: &str) -> Option<&Character> {
        let name = name.trim();
        self.characters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn character_names(&self) -> Vec<String> {
        self.characters.iter().map(|c| c.name.clone()).collect()
    }
}

/// Read one JSON array file. Missing files load as empty.
pub fn load_list<T: DeserializeOwned>(data_dir: &Path, filename: &str) -> Result<Vec<T>, String> {
    let path = data_dir.join(filename);
    if !path.exists() {
        warn!("Data file {:?} not found, treating as empty", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", filename, e))
}

/// Why the catalog is empty, shown on the main menu
#[derive(Resource, Debug, Clone, Default)]
pub struct CatalogStatus {
    pub error: Option<String>,
}

/// Loads the catalog at startup. A broken data directory leaves the wiki
/// running with an empty catalog and the error recorded in `CatalogStatus`.
pub struct CatalogPlugin {
    pub data_dir: PathBuf,
}

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        let (catalog, status) = match Catalog::load(&self.data_dir) {
            Ok(catalog) => (catalog, CatalogStatus::default()),
            Err(e) => {
                error!("Failed to load catalog: {}", e);
                let catalog = Catalog {
                    data_dir: self.data_dir.clone(),
                    ..Default::default()
                };
                (catalog, CatalogStatus { error: Some(e) })
            }
        };
        app.insert_resource(catalog).insert_resource(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CharacterClass;

    fn temp_data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dtwiki-catalog-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = temp_data_dir("missing");
        let catalog = Catalog::load(&dir).unwrap();
        assert!(catalog.characters.is_empty());
        assert!(catalog.teams.is_empty());
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let dir = temp_data_dir("malformed");
        std::fs::write(dir.join(CODES_FILE), "[{").unwrap();
        let err = Catalog::load(&dir).unwrap_err();
        assert!(err.contains("codes.json"), "error should name the file: {}", err);
    }

    #[test]
    fn test_character_lookup_is_case_insensitive() {
        let dir = temp_data_dir("lookup");
        std::fs::write(
            dir.join(CHARACTERS_FILE),
            r#"[{"name": "Elara", "character_class": "Priest"}]"#,
        )
        .unwrap();
        let catalog = Catalog::load(&dir).unwrap();
        let elara = catalog.character("  elara ").unwrap();
        assert_eq!(elara.character_class, CharacterClass::Priest);
        assert!(catalog.character("Nobody").is_none());
    }
}
