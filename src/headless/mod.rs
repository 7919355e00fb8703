//! Headless mode for scripted use
//!
//! Runs builder replays, synergy scoring, data normalization and
//! suggestion intake without a window, suitable for CI jobs.
//!
//! ## Usage
//!
//! ```bash
//! dtwiki build build_config.json
//! dtwiki score data/teams.json
//! dtwiki normalize characters.json --sort-only
//! dtwiki suggest --event "$GITHUB_EVENT_PATH"
//! ```
//!
//! ## Build configuration
//!
//! ```json
//! {
//!   "mode": "team",
//!   "name": "Burst Mages",
//!   "faction": "Arcane Wisdom",
//!   "moves": [
//!     { "entity": "Elysia", "to": "slot-0" },
//!     { "entity": "Zephyr", "to": "slot-1" }
//!   ],
//!   "overdrive": [{ "entity": "Elysia", "order": 1 }]
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{BuildMode, BuildMove, HeadlessBuildConfig, OverdriveRequest};
pub use runner::{execute_build, print_outcome, run_headless, run_headless_with, BuildResult, HeadlessOutcome, HeadlessTask};
