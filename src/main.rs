//! dtwiki - Dragon Traveler community wiki
//!
//! Opens the wiki window by default. Subcommands (`build`, `score`,
//! `normalize`, `suggest`) run headless and exit.

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_egui::EguiPlugin;

use dtwiki::builder::SynergyConfigPlugin;
use dtwiki::cli::parse_args;
use dtwiki::data::catalog::CatalogPlugin;
use dtwiki::headless::{print_outcome, run_headless};
use dtwiki::settings::{SettingsPlugin, WikiSettings};
use dtwiki::states::{StatesPlugin, WikiState};
use dtwiki::ui::UiPlugin;

fn main() {
    let args = parse_args();

    let task = match args.headless_task() {
        Ok(task) => task,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(task) = task {
        println!("Running headless {}", task.name());
        match run_headless(task, true) {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let settings = WikiSettings::load();
    let data_dir = args.data_dir.clone().unwrap_or_else(|| settings.data_dir.clone());
    let (width, height) = settings.resolution.dimensions();

    App::new()
        // Window comes from the saved settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dragon Traveler Wiki".to_string(),
                resolution: (width, height).into(),
                mode: settings.window_mode.to_bevy(),
                present_mode: if settings.vsync {
                    PresentMode::AutoVsync
                } else {
                    PresentMode::AutoNoVsync
                },
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            EguiPlugin,
            SettingsPlugin { settings },
            CatalogPlugin { data_dir },
            SynergyConfigPlugin,
            UiPlugin,
            StatesPlugin,
        ))
        // Start in the main menu state
        .init_state::<WikiState>()
        .run();
}
