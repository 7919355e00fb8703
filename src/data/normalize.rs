//! Data file normalization
//!
//! Sorts entries into their canonical order and bumps `last_updated` on
//! entries that are new or changed since the last commit. Entries are
//! matched to their committed version by an identity field.

use bevy::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use super::sort_keys::{sort_entries, sort_key_for};
use super::write_data_file;

const TIMESTAMP_FIELD: &str = "last_updated";

/// Which normalization passes to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    #[default]
    SortAndTimestamps,
    SortOnly,
    TimestampsOnly,
}

impl NormalizeMode {
    pub fn sorts(&self) -> bool {
        !matches!(self, NormalizeMode::TimestampsOnly)
    }

    pub fn timestamps(&self) -> bool {
        !matches!(self, NormalizeMode::SortOnly)
    }

    pub fn description(&self) -> &'static str {
        match self {
            NormalizeMode::SortAndTimestamps => "sort + timestamps",
            NormalizeMode::SortOnly => "sort only",
            NormalizeMode::TimestampsOnly => "timestamps only",
        }
    }
}

/// Source of the previously committed version of a data file
pub trait Baseline {
    /// Committed entries for `filename`, or empty if there is no committed version
    fn committed_entries(&self, filename: &str) -> Vec<Value>;
}

/// Reads committed data files with `git show HEAD:data/<file>`
#[derive(Debug, Clone)]
pub struct GitHead {
    pub repo_root: PathBuf,
}

impl Baseline for GitHead {
    fn committed_entries(&self, filename: &str) -> Vec<Value> {
        let output = Command::new("git")
            .args(["show", &format!("HEAD:data/{}", filename)])
            .current_dir(&self.repo_root)
            .output();

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(_) => {
                debug!("{} is not committed yet", filename);
                return Vec::new();
            }
            Err(e) => {
                debug!("git unavailable ({}), no baseline for {}", e, filename);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Value>(&output.stdout) {
            Ok(Value::Array(entries)) => entries,
            _ => Vec::new(),
        }
    }
}

/// In-memory baseline keyed by file name
impl Baseline for HashMap<String, Vec<Value>> {
    fn committed_entries(&self, filename: &str) -> Vec<Value> {
        self.get(filename).cloned().unwrap_or_default()
    }
}

/// Outcome of normalizing one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub filename: String,
    pub exists: bool,
    pub sorted: bool,
    pub timestamped: bool,
    pub bumped: usize,
    pub skipped_unchanged: usize,
}

impl NormalizeReport {
    /// One-line human summary, e.g. `sorted, bumped 2, skipped 5 unchanged`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.sorted {
            parts.push("sorted".to_string());
        }
        if self.timestamped {
            parts.push(format!("bumped {}", self.bumped));
            if self.skipped_unchanged > 0 {
                parts.push(format!("skipped {} unchanged", self.skipped_unchanged));
            }
        }
        if parts.is_empty() {
            parts.push("no-op".to_string());
        }
        parts.join(", ")
    }
}

/// Field used to match an entry with its committed version
pub fn identity_key(filename: &str) -> &'static str {
    match filename {
        "changelog.json" => "version",
        "codes.json" => "code",
        _ => "name",
    }
}

fn without_timestamp(entry: &Map<String, Value>) -> Map<String, Value> {
    let mut stripped = entry.clone();
    stripped.remove(TIMESTAMP_FIELD);
    stripped
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Normalize a single file under `data_dir`
pub fn normalize_file(
    data_dir: &Path,
    filename: &str,
    now: i64,
    mode: NormalizeMode,
    baseline: &dyn Baseline,
) -> Result<NormalizeReport, String> {
    let mut report = NormalizeReport {
        filename: filename.to_string(),
        ..Default::default()
    };

    let path = data_dir.join(filename);
    if !path.exists() {
        return Ok(report);
    }
    report.exists = true;

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let parsed: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", filename, e))?;

    let mut entries = match parsed {
        Value::Array(entries) => entries,
        other => {
            write_data_file(&path, &other)?;
            return Ok(report);
        }
    };

    if mode.timestamps() && entries.iter().any(Value::is_object) {
        report.timestamped = true;
        bump_timestamps(filename, &mut entries, now, baseline, &mut report);
    }

    if mode.sorts() {
        if let Some(key) = sort_key_for(filename) {
            sort_entries(&mut entries, key);
            report.sorted = true;
        }
    }

    write_data_file(&path, &Value::Array(entries))?;
    Ok(report)
}

fn bump_timestamps(
    filename: &str,
    entries: &mut [Value],
    now: i64,
    baseline: &dyn Baseline,
    report: &mut NormalizeReport,
) {
    let id_key = identity_key(filename);

    let committed: HashMap<String, Map<String, Value>> = baseline
        .committed_entries(filename)
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(obj) => {
                let identity = obj.get(id_key).filter(|v| !v.is_null())?.to_string();
                Some((identity, obj))
            }
            _ => None,
        })
        .collect();

    for entry in entries.iter_mut() {
        let Some(obj) = entry.as_object_mut() else {
            continue;
        };

        let committed_entry = obj
            .get(id_key)
            .filter(|v| !v.is_null())
            .and_then(|identity| committed.get(&identity.to_string()));

        let changed = match committed_entry {
            None => true,
            Some(old) => without_timestamp(obj) != without_timestamp(old),
        };

        if changed || !obj.contains_key(TIMESTAMP_FIELD) {
            obj.insert(TIMESTAMP_FIELD.to_string(), Value::from(now));
            report.bumped += 1;
        }
    }

    let timestamped = entries
        .iter()
        .filter(|e| e.get(TIMESTAMP_FIELD).is_some())
        .count();
    report.skipped_unchanged = timestamped.saturating_sub(report.bumped);
}

/// Files to normalize: the given list, or every `*.json` in `data_dir`
pub fn resolve_targets(data_dir: &Path, files: &[String]) -> Result<Vec<String>, String> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let read = std::fs::read_dir(data_dir)
        .map_err(|e| format!("Failed to list {}: {}", data_dir.display(), e))?;

    let mut names: Vec<String> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();
    Ok(names)
}

/// Normalize every target file, stopping at the first unreadable one
pub fn normalize_all(
    data_dir: &Path,
    files: &[String],
    now: i64,
    mode: NormalizeMode,
    baseline: &dyn Baseline,
) -> Result<Vec<NormalizeReport>, String> {
    let targets = resolve_targets(data_dir, files)?;
    let mut reports = Vec::with_capacity(targets.len());

    for filename in targets {
        let report = normalize_file(data_dir, &filename, now, mode, baseline)?;
        if report.exists {
            info!("{}: {}", filename, report.summary());
        } else {
            warn!("SKIP {}: file not found", filename);
        }
        reports.push(report);
    }

    Ok(reports)
}
