//! dtwiki - Dragon Traveler community wiki
//!
//! Loads the wiki's JSON database, browses it, and builds tier lists and
//! team compositions by drag and drop. Builders export submission snippets
//! that the suggestion intake appends back into the data files.
//!
//! This library exposes the modules for the binary, tests and tooling.

pub mod builder;
pub mod cli;
pub mod data;
pub mod headless;
pub mod keybindings;
pub mod settings;
pub mod states;
pub mod suggest;
pub mod ui;

// Re-export commonly used types
pub use builder::{SynergyConfig, SynergyReport, TeamBuilder, TierListBuilder, ZoneId};
pub use data::Catalog;
pub use headless::{HeadlessBuildConfig, HeadlessTask};
pub use suggest::SuggestionLabel;
