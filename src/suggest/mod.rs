//! Community suggestion intake
//!
//! Suggestions arrive as GitHub issues whose title starts with a bracketed
//! prefix and whose body carries a fenced JSON block. A matching issue is
//! validated, normalized and appended to the label's data file.

pub mod github;
pub mod intake;

use bevy::prelude::*;
use std::path::Path;

use crate::data::catalog::{
    CHARACTERS_FILE, CODES_FILE, STATUS_EFFECTS_FILE, TEAMS_FILE, TIER_LISTS_FILE, USEFUL_LINKS_FILE,
    WYRMSPELLS_FILE,
};
pub use github::{read_event, write_outputs, Issue, IssueEvent};
pub use intake::{append_entry, check_entry, extract_json_block, normalize_for_json, validate};

/// Kind of suggestion, derived from the issue title prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionLabel {
    Codes,
    Character,
    Wyrmspell,
    StatusEffect,
    Links,
    TierList,
    Team,
}

impl SuggestionLabel {
    pub fn all() -> &'static [SuggestionLabel] {
        &[
            SuggestionLabel::Codes,
            SuggestionLabel::Character,
            SuggestionLabel::Wyrmspell,
            SuggestionLabel::StatusEffect,
            SuggestionLabel::Links,
            SuggestionLabel::TierList,
            SuggestionLabel::Team,
        ]
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            SuggestionLabel::Codes => "[Code]",
            SuggestionLabel::Character => "[Character]",
            SuggestionLabel::Wyrmspell => "[Wyrmspell]",
            SuggestionLabel::StatusEffect => "[Status Effect]",
            SuggestionLabel::Links => "[Link]",
            SuggestionLabel::TierList => "[Tier List]",
            SuggestionLabel::Team => "[Team]",
        }
    }

    /// Issue label name
    pub fn name(&self) -> &'static str {
        match self {
            SuggestionLabel::Codes => "codes",
            SuggestionLabel::Character => "character",
            SuggestionLabel::Wyrmspell => "wyrmspell",
            SuggestionLabel::StatusEffect => "status-effect",
            SuggestionLabel::Links => "links",
            SuggestionLabel::TierList => "tier-list",
            SuggestionLabel::Team => "team",
        }
    }

    pub fn data_file(&self) -> &'static str {
        match self {
            SuggestionLabel::Codes => CODES_FILE,
            SuggestionLabel::Character => CHARACTERS_FILE,
            SuggestionLabel::Wyrmspell => WYRMSPELLS_FILE,
            SuggestionLabel::StatusEffect => STATUS_EFFECTS_FILE,
            SuggestionLabel::Links => USEFUL_LINKS_FILE,
            SuggestionLabel::TierList => TIER_LISTS_FILE,
            SuggestionLabel::Team => TEAMS_FILE,
        }
    }

    /// Fields that must be present and non-empty
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            SuggestionLabel::Codes => &["code"],
            SuggestionLabel::Character => &["name"],
            SuggestionLabel::Wyrmspell => &["name"],
            SuggestionLabel::StatusEffect => &["name"],
            SuggestionLabel::Links => &["name", "link"],
            SuggestionLabel::TierList => &["name", "entries"],
            SuggestionLabel::Team => &["name", "members"],
        }
    }

    /// Label for an issue title, if it carries a known prefix
    pub fn from_title(title: &str) -> Option<SuggestionLabel> {
        Self::all()
            .iter()
            .copied()
            .find(|label| title.starts_with(label.prefix()))
    }
}

impl std::fmt::Display for SuggestionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of processing one issue
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestOutcome {
    /// Title has no suggestion prefix; nothing to do
    Skipped,
    Applied {
        label: SuggestionLabel,
        json_file: String,
        total_entries: usize,
    },
}

/// Process an issue against the data directory
pub fn process_issue(issue: &Issue, data_dir: &Path) -> Result<SuggestOutcome, String> {
    info!(
        "Processing issue #{}: {}",
        issue.number.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
        issue.title
    );

    let Some(label) = SuggestionLabel::from_title(&issue.title) else {
        info!("No suggestion prefix found in title, skipping");
        return Ok(SuggestOutcome::Skipped);
    };
    info!("Matched label: {}", label);

    let data = extract_json_block(issue.body.as_deref().unwrap_or(""))?;
    validate(label, &data)?;
    debug!("Validation passed for {}", label);

    let entry = normalize_for_json(label, &data);
    check_entry(label, &entry)?;
    let total_entries = append_entry(&data_dir.join(label.data_file()), entry)?;
    info!("Updated {} (+1 entry, total {})", label.data_file(), total_entries);

    Ok(SuggestOutcome::Applied {
        label,
        json_file: label.data_file().to_string(),
        total_entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_title() {
        assert_eq!(SuggestionLabel::from_title("[Code] ABC123"), Some(SuggestionLabel::Codes));
        assert_eq!(
            SuggestionLabel::from_title("[Status Effect] Burn"),
            Some(SuggestionLabel::StatusEffect)
        );
        assert_eq!(SuggestionLabel::from_title("[Tier List] PvP"), Some(SuggestionLabel::TierList));
        assert_eq!(SuggestionLabel::from_title("Bug: crash on load"), None);
        // Prefix must lead the title
        assert_eq!(SuggestionLabel::from_title("Re: [Team] x"), None);
    }

    #[test]
    fn test_every_label_has_required_fields() {
        for label in SuggestionLabel::all() {
            assert!(!label.required_fields().is_empty(), "{}", label);
            assert!(label.data_file().ends_with(".json"));
        }
    }
}
