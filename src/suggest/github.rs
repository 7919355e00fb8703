//! GitHub Actions plumbing: the triggering event and step outputs

use serde::Deserialize;
use std::io::Write;
use std::path::Path;

pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueEvent {
    #[serde(default)]
    pub issue: Issue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: String,
    /// GitHub sends `null` for an empty body
    #[serde(default)]
    pub body: Option<String>,
}

pub fn read_event(path: &Path) -> Result<IssueEvent, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read event {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse event {}: {}", path.display(), e))
}

/// Append `name=value` lines to the step output file
pub fn write_outputs(path: &Path, outputs: &[(&str, &str)]) -> Result<(), String> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;

    for (name, value) in outputs {
        writeln!(file, "{}={}", name, value).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }
    Ok(())
}
