//! Submission snippets
//!
//! Builders export to the same JSON shape the data files use, and the
//! snippet is wrapped in an issue body the suggestion intake can parse.

use serde::Serialize;

use super::team::TeamBuilder;
use super::tier_list::TierListBuilder;
use crate::suggest::SuggestionLabel;

impl TeamBuilder {
    /// Pretty JSON for the current team, members in slot order
    pub fn export(&self) -> Result<String, String> {
        to_snippet(&self.to_team())
    }
}

impl TierListBuilder {
    /// Pretty JSON for the ranked entries
    pub fn export(&self) -> Result<String, String> {
        to_snippet(&self.to_tier_list())
    }
}

fn to_snippet<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize snippet: {}", e))
}

/// Issue title for a submission, e.g. `[Team] Burst Mages`
pub fn issue_title(label: SuggestionLabel, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        label.prefix().to_string()
    } else {
        format!("{} {}", label.prefix(), name)
    }
}

/// Issue body wrapping `json` in a fenced block
pub fn to_issue_body(label: SuggestionLabel, json: &str) -> String {
    format!(
        "{} submission\n\n```json\n{}\n```\n",
        label.prefix(),
        json.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_title_uses_prefix() {
        assert_eq!(issue_title(SuggestionLabel::Team, "Burst Mages"), "[Team] Burst Mages");
        assert_eq!(issue_title(SuggestionLabel::TierList, "  "), "[Tier List]");
    }

    #[test]
    fn test_issue_body_is_fenced() {
        let body = to_issue_body(SuggestionLabel::Team, "{\"name\": \"x\"}\n");
        assert!(body.starts_with("[Team] submission"));
        assert!(body.contains("```json\n{\"name\": \"x\"}\n```"));
    }

    #[test]
    fn test_empty_team_exports() {
        let builder = TeamBuilder::new(["Elysia"]);
        let json = builder.export().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["members"], serde_json::json!([]));
        assert_eq!(value["faction"], "");
        assert!(value.get("last_updated").is_none());
    }
}
