//! Command-line interface for dtwiki
//!
//! With no subcommand the wiki window opens; subcommands run headless.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::data::normalize::NormalizeMode;
use crate::headless::{HeadlessBuildConfig, HeadlessTask};
use crate::suggest::github::{EVENT_PATH_ENV, OUTPUT_ENV};

/// Dragon Traveler wiki: database browser, tier list and team builders
#[derive(Parser, Debug)]
#[command(name = "dtwiki")]
#[command(about = "Dragon Traveler wiki database and builders")]
#[command(version)]
pub struct Args {
    /// Directory holding the wiki's JSON data files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON build config and print the exported snippet
    Build {
        #[arg(value_name = "CONFIG_FILE")]
        config: PathBuf,
        /// Write the snippet here instead of stdout
        #[arg(long, value_name = "OUTPUT_PATH")]
        output: Option<PathBuf>,
    },
    /// Score a team file (one team or an array of teams)
    Score {
        #[arg(value_name = "TEAM_FILE")]
        team: PathBuf,
    },
    /// Sort data files and bump last_updated on changed entries
    Normalize {
        /// Files to normalize (default: every *.json in the data directory)
        files: Vec<String>,
        #[arg(long, conflicts_with = "timestamps_only")]
        sort_only: bool,
        #[arg(long)]
        timestamps_only: bool,
    },
    /// Apply a suggestion issue to the data files
    Suggest {
        /// Issue event JSON
        #[arg(long, env = EVENT_PATH_ENV, value_name = "EVENT_FILE")]
        event: PathBuf,
        /// Step output file
        #[arg(long, env = OUTPUT_ENV, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
}

pub const DEFAULT_DATA_DIR: &str = "data";

impl Args {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// The headless task for the subcommand, or `None` for the GUI
    pub fn headless_task(&self) -> Result<Option<HeadlessTask>, String> {
        let data_dir = self.data_dir();
        let Some(command) = &self.command else {
            return Ok(None);
        };

        let task = match command {
            Command::Build { config, output } => {
                let mut config = HeadlessBuildConfig::load_from_file(config)?;
                if let Some(output) = output {
                    config.output_path = Some(output.to_string_lossy().into_owned());
                }
                HeadlessTask::Build { config, data_dir }
            }
            Command::Score { team } => HeadlessTask::Score {
                team_path: team.clone(),
                data_dir,
            },
            Command::Normalize {
                files,
                sort_only,
                timestamps_only,
            } => {
                let mode = match (sort_only, timestamps_only) {
                    (true, _) => NormalizeMode::SortOnly,
                    (_, true) => NormalizeMode::TimestampsOnly,
                    _ => NormalizeMode::SortAndTimestamps,
                };
                HeadlessTask::Normalize {
                    data_dir,
                    files: files.clone(),
                    mode,
                }
            }
            Command::Suggest { event, output } => HeadlessTask::Suggest {
                event_path: event.clone(),
                data_dir,
                output_file: output.clone(),
            },
        };
        Ok(Some(task))
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_gui() {
        let args = Args::try_parse_from(["dtwiki"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.data_dir(), PathBuf::from("data"));
        assert!(args.headless_task().unwrap().is_none());
    }

    #[test]
    fn test_normalize_flags() {
        let args = Args::try_parse_from(["dtwiki", "normalize", "codes.json", "--sort-only", "--data-dir", "d"])
            .unwrap();
        match args.headless_task().unwrap() {
            Some(HeadlessTask::Normalize { data_dir, files, mode }) => {
                assert_eq!(data_dir, PathBuf::from("d"));
                assert_eq!(files, vec!["codes.json".to_string()]);
                assert_eq!(mode, NormalizeMode::SortOnly);
            }
            other => panic!("unexpected task: {:?}", other),
        }
    }

    #[test]
    fn test_sort_only_conflicts_with_timestamps_only() {
        assert!(Args::try_parse_from(["dtwiki", "normalize", "--sort-only", "--timestamps-only"]).is_err());
    }
}
