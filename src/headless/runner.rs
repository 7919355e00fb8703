//! Headless task execution
//!
//! Runs wiki maintenance and builder tasks inside a minimal Bevy app: no
//! window, one update, results read back out of the world.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::builder::export::issue_title;
use crate::builder::synergy::{score_builder, score_team, SynergyReport};
use crate::builder::synergy_config::{load_synergy_config, SynergyConfig, SYNERGY_CONFIG_PATH};
use crate::builder::team::{TeamBuilder, TeamMeta};
use crate::builder::tier_list::{TierListBuilder, TierListMeta};
use crate::data::model::Team;
use crate::data::normalize::{normalize_all, unix_now, GitHead, NormalizeMode, NormalizeReport};
use crate::data::Catalog;
use crate::suggest::{self, SuggestOutcome, SuggestionLabel};

use super::config::{BuildMode, HeadlessBuildConfig};

/// A unit of headless work
#[derive(Debug, Clone)]
pub enum HeadlessTask {
    /// Replay a build config and export the snippet
    Build {
        config: HeadlessBuildConfig,
        data_dir: PathBuf,
    },
    /// Score one team, or every team in a teams file
    Score { team_path: PathBuf, data_dir: PathBuf },
    Normalize {
        data_dir: PathBuf,
        files: Vec<String>,
        mode: NormalizeMode,
    },
    /// Process a suggestion issue event
    Suggest {
        event_path: PathBuf,
        data_dir: PathBuf,
        /// Step output file to append `json_file=`/`label=` to
        output_file: Option<PathBuf>,
    },
}

impl HeadlessTask {
    pub fn name(&self) -> &'static str {
        match self {
            HeadlessTask::Build { .. } => "build",
            HeadlessTask::Score { .. } => "score",
            HeadlessTask::Normalize { .. } => "normalize",
            HeadlessTask::Suggest { .. } => "suggest",
        }
    }
}

/// Result of a headless build
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub mode: BuildMode,
    /// Exported JSON snippet
    pub snippet: String,
    pub issue_title: String,
    /// Synergy estimate (team mode only)
    pub synergy: Option<SynergyReport>,
    /// Moves the builder refused, with the reason
    pub rejected: Vec<String>,
    /// Where the snippet was written, if not stdout
    pub output_path: Option<String>,
}

#[derive(Debug, Clone)]
pub enum HeadlessOutcome {
    Built(BuildResult),
    Scored(Vec<(String, SynergyReport)>),
    Normalized(Vec<NormalizeReport>),
    Suggested(SuggestOutcome),
}

/// Resource to track the headless task
#[derive(Resource)]
pub struct HeadlessRunState {
    pub task: Option<HeadlessTask>,
    /// Synergy weights, read only by tasks that score teams
    pub synergy_path: PathBuf,
    pub result: Option<Result<HeadlessOutcome, String>>,
}

/// Plugin for headless task execution
pub struct HeadlessPlugin {
    pub task: HeadlessTask,
    pub synergy_path: PathBuf,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HeadlessRunState {
            task: Some(self.task.clone()),
            synergy_path: self.synergy_path.clone(),
            result: None,
        })
        .add_systems(Update, headless_execute_task)
        .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

fn headless_execute_task(mut state: ResMut<HeadlessRunState>) {
    let Some(task) = state.task.take() else {
        return;
    };

    info!("Running headless task: {}", task.name());
    let result = execute(task, &state.synergy_path);
    if let Err(e) = &result {
        error!("Headless task failed: {}", e);
    }
    state.result = Some(result);
}

/// Exit the app once the task has produced a result
fn headless_exit_on_complete(state: Res<HeadlessRunState>, mut exit: EventWriter<AppExit>) {
    if state.result.is_some() {
        exit.send(AppExit::Success);
    }
}

fn execute(task: HeadlessTask, synergy_path: &Path) -> Result<HeadlessOutcome, String> {
    match task {
        HeadlessTask::Build { config, data_dir } => {
            let synergy = load_synergy_config(synergy_path)?;
            execute_build(&config, &data_dir, &synergy).map(HeadlessOutcome::Built)
        }
        HeadlessTask::Score { team_path, data_dir } => {
            let synergy = load_synergy_config(synergy_path)?;
            let catalog = Catalog::load(&data_dir)?;
            let teams = load_teams(&team_path)?;
            let reports = teams
                .iter()
                .map(|team| (team.name.clone(), score_team(team, &catalog, &synergy)))
                .collect();
            Ok(HeadlessOutcome::Scored(reports))
        }
        HeadlessTask::Normalize { data_dir, files, mode } => {
            let baseline = GitHead {
                repo_root: repo_root(&data_dir),
            };
            info!("Normalizing {} ({})", data_dir.display(), mode.description());
            normalize_all(&data_dir, &files, unix_now(), mode, &baseline).map(HeadlessOutcome::Normalized)
        }
        HeadlessTask::Suggest {
            event_path,
            data_dir,
            output_file,
        } => {
            let event = suggest::read_event(&event_path)?;
            let outcome = suggest::process_issue(&event.issue, &data_dir)?;
            if let (SuggestOutcome::Applied { label, json_file, .. }, Some(output)) = (&outcome, &output_file) {
                suggest::write_outputs(output, &[("json_file", json_file.as_str()), ("label", label.name())])?;
            }
            Ok(HeadlessOutcome::Suggested(outcome))
        }
    }
}

/// `data/` lives at the repository root
fn repo_root(data_dir: &Path) -> PathBuf {
    match data_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A single team object or an array of teams
fn load_teams(path: &Path) -> Result<Vec<Team>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let teams = if value.is_array() {
        serde_json::from_value::<Vec<Team>>(value)
    } else {
        serde_json::from_value::<Team>(value).map(|team| vec![team])
    };
    teams.map_err(|e| format!("Invalid team in {}: {}", path.display(), e))
}

/// Replay a build config against a fresh builder
pub fn execute_build(
    config: &HeadlessBuildConfig,
    data_dir: &Path,
    synergy: &SynergyConfig,
) -> Result<BuildResult, String> {
    config.validate()?;
    let catalog = Catalog::load(data_dir)?;
    let roster = config.roster.clone().unwrap_or_else(|| catalog.character_names());
    let mut rejected = Vec::new();

    let (snippet, label, synergy_report) = match config.mode {
        BuildMode::Team => {
            let mut builder = TeamBuilder::new(roster);
            if let Some(max) = config.bench_capacity {
                builder = builder.with_bench_capacity(max).map_err(|e| e.to_string())?;
            }
            builder.meta = TeamMeta {
                name: config.name.clone(),
                author: config.author.clone(),
                content_type: config.content_type.clone(),
                description: config.description.clone(),
                faction: config.parse_faction()?,
                wyrmspells: config.wyrmspells.clone(),
            };

            for step in &config.moves {
                let zone = HeadlessBuildConfig::parse_zone(&step.to)?;
                if let Err(e) = builder.assign(&step.entity, zone) {
                    warn!("Rejected {} -> {}: {}", step.entity, step.to, e);
                    rejected.push(format!("{} -> {}: {}", step.entity, step.to, e));
                }
            }
            for request in &config.overdrive {
                if let Err(e) = builder.set_overdrive_order(&request.entity, request.order) {
                    warn!("Rejected overdrive {} for {}: {}", request.order, request.entity, e);
                    rejected.push(format!("overdrive {}: {}", request.entity, e));
                }
            }

            let report = score_builder(&builder, &catalog, synergy);
            (builder.export()?, SuggestionLabel::Team, Some(report))
        }
        BuildMode::TierList => {
            let mut builder = TierListBuilder::new(roster);
            builder.meta = TierListMeta {
                name: config.name.clone(),
                author: config.author.clone(),
                content_type: config.content_type.clone(),
                description: config.description.clone(),
            };

            for step in &config.moves {
                let zone = HeadlessBuildConfig::parse_zone(&step.to)?;
                if let Err(e) = builder.assign_at(&step.entity, zone, step.index) {
                    warn!("Rejected {} -> {}: {}", step.entity, step.to, e);
                    rejected.push(format!("{} -> {}: {}", step.entity, step.to, e));
                }
            }

            (builder.export()?, SuggestionLabel::TierList, None)
        }
    };

    if let Some(path) = &config.output_path {
        let mut contents = snippet.clone();
        contents.push('\n');
        std::fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        info!("Snippet saved to {}", path);
    }

    Ok(BuildResult {
        mode: config.mode,
        snippet,
        issue_title: issue_title(label, &config.name),
        synergy: synergy_report,
        rejected,
        output_path: config.output_path.clone(),
    })
}

/// Run a task in a windowless app. `with_logging` installs the log plugin,
/// which can only happen once per process.
pub fn run_headless(task: HeadlessTask, with_logging: bool) -> Result<HeadlessOutcome, String> {
    run_headless_with(task, with_logging, Path::new(SYNERGY_CONFIG_PATH))
}

/// Like [`run_headless`], reading synergy weights from `synergy_path`.
/// A broken weights file fails `build` and `score` only.
pub fn run_headless_with(
    task: HeadlessTask,
    with_logging: bool,
    synergy_path: &Path,
) -> Result<HeadlessOutcome, String> {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_once()));
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(HeadlessPlugin {
        task,
        synergy_path: synergy_path.to_path_buf(),
    });

    app.finish();
    app.cleanup();
    app.update();

    app.world_mut()
        .remove_resource::<HeadlessRunState>()
        .and_then(|state| state.result)
        .unwrap_or_else(|| Err("Headless task produced no result".to_string()))
}

/// Print a task's outcome for the terminal
pub fn print_outcome(outcome: &HeadlessOutcome) {
    match outcome {
        HeadlessOutcome::Built(result) => {
            println!("{}", result.issue_title);
            match &result.output_path {
                Some(path) => println!("Snippet saved to: {}", path),
                None => println!("{}", result.snippet),
            }
            for rejection in &result.rejected {
                println!("  rejected: {}", rejection);
            }
            if let Some(report) = &result.synergy {
                print_report(report);
            }
        }
        HeadlessOutcome::Scored(reports) => {
            for (name, report) in reports {
                println!("{}", name);
                print_report(report);
            }
        }
        HeadlessOutcome::Normalized(reports) => {
            for report in reports {
                if report.exists {
                    println!("  {}: {}", report.filename, report.summary());
                } else {
                    println!("  SKIP {}: file not found", report.filename);
                }
            }
        }
        HeadlessOutcome::Suggested(SuggestOutcome::Skipped) => {
            println!("No suggestion prefix found in title. Skipping.");
        }
        HeadlessOutcome::Suggested(SuggestOutcome::Applied {
            label,
            json_file,
            total_entries,
        }) => {
            println!("Updated {} (+1 {} entry, total {})", json_file, label, total_entries);
        }
    }
}

fn print_report(report: &SynergyReport) {
    println!("  Synergy: {}/100", report.score);
    for signal in &report.signals {
        println!(
            "    {:<22} {:>5.1}/{:<4} {}",
            signal.kind.name(),
            signal.points,
            signal.weight,
            signal.detail
        );
    }
    for rec in &report.recommendations {
        println!("  - {}", rec);
    }
}
