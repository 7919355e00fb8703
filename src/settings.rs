//! User settings
//!
//! Window, browsing and keybinding preferences, persisted to `settings.ron`.

use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::DEFAULT_DATA_DIR;
use crate::keybindings::Keybindings;

pub const SETTINGS_PATH: &str = "settings.ron";
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiSettings {
    pub window_mode: WindowModeOption,
    pub resolution: ResolutionOption,
    pub vsync: bool,
    pub keybindings: Keybindings,
    /// Data directory used when `--data-dir` is not given
    pub data_dir: PathBuf,
    /// Rows per page in the database browser
    pub page_size: usize,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeOption::Windowed,
            resolution: ResolutionOption::HD720,
            vsync: true,
            keybindings: Keybindings::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            page_size: 20,
        }
    }
}

/// Tracks whether a change needs a restart to take effect
#[derive(Resource, Default)]
pub struct PendingSettingsRestart {
    pub restart_required: bool,
    previous: WikiSettings,
}

impl PendingSettingsRestart {
    /// Window mode, resolution and data directory only apply on restart
    pub fn check_restart_needed(&mut self, new_settings: &WikiSettings) -> bool {
        let needs_restart = self.previous.window_mode != new_settings.window_mode
            || self.previous.resolution != new_settings.resolution
            || self.previous.data_dir != new_settings.data_dir;

        self.previous = new_settings.clone();
        self.restart_required = needs_restart;
        needs_restart
    }
}

impl WikiSettings {
    /// Load from `path`, falling back to defaults when missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match ron::from_str::<WikiSettings>(&contents) {
                Ok(mut settings) => {
                    if !PAGE_SIZES.contains(&settings.page_size) {
                        warn!("Unsupported page size {}, using 20", settings.page_size);
                        settings.page_size = 20;
                    }
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_PATH))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(Path::new(SETTINGS_PATH))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowModeOption {
    Windowed,
    BorderlessFullscreen,
}

impl WindowModeOption {
    pub fn to_bevy(&self) -> WindowMode {
        match self {
            WindowModeOption::Windowed => WindowMode::Windowed,
            WindowModeOption::BorderlessFullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowModeOption::Windowed => "Windowed",
            WindowModeOption::BorderlessFullscreen => "Borderless Fullscreen",
        }
    }

    pub fn all() -> [WindowModeOption; 2] {
        [WindowModeOption::Windowed, WindowModeOption::BorderlessFullscreen]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOption {
    HD720,
    HD1080,
    QHD1440,
}

impl ResolutionOption {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            ResolutionOption::HD720 => (1280.0, 720.0),
            ResolutionOption::HD1080 => (1920.0, 1080.0),
            ResolutionOption::QHD1440 => (2560.0, 1440.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOption::HD720 => "1280 × 720",
            ResolutionOption::HD1080 => "1920 × 1080",
            ResolutionOption::QHD1440 => "2560 × 1440",
        }
    }

    pub fn all() -> [ResolutionOption; 3] {
        [ResolutionOption::HD720, ResolutionOption::HD1080, ResolutionOption::QHD1440]
    }
}

/// Loads settings and saves them whenever they change
pub struct SettingsPlugin {
    pub settings: WikiSettings,
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        app.insert_resource(settings.keybindings.clone())
            .insert_resource(PendingSettingsRestart {
                restart_required: false,
                previous: settings.clone(),
            })
            .insert_resource(settings)
            .add_systems(Update, (save_settings_on_change, apply_runtime_settings, sync_keybindings));
    }
}

fn save_settings_on_change(settings: Res<WikiSettings>, mut pending_restart: ResMut<PendingSettingsRestart>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    let needs_restart = pending_restart.check_restart_needed(&settings);
    match settings.save() {
        Err(e) => error!("Failed to save settings: {}", e),
        Ok(()) if needs_restart => info!("Settings changed (restart required)"),
        Ok(()) => debug!("Settings changed and applied"),
    }
}

/// VSync applies without a restart
fn apply_runtime_settings(
    settings: Res<WikiSettings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    pending_restart: Res<PendingSettingsRestart>,
) {
    if !settings.is_changed() || settings.is_added() || pending_restart.restart_required {
        return;
    }
    if let Ok(mut window) = windows.get_single_mut() {
        window.present_mode = if settings.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };
    }
}

fn sync_keybindings(settings: Res<WikiSettings>, mut keybindings: ResMut<Keybindings>) {
    if settings.is_changed() && !settings.is_added() && *keybindings != settings.keybindings {
        *keybindings = settings.keybindings.clone();
        info!("Synced keybindings from settings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("dtwiki-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.ron");

        let settings = WikiSettings {
            page_size: 50,
            data_dir: PathBuf::from("wiki/data"),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(WikiSettings::load_from(&path), settings);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: WikiSettings = ron::from_str("(vsync: false)").unwrap();
        assert!(!settings.vsync);
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn test_data_dir_change_needs_restart() {
        let mut pending = PendingSettingsRestart::default();
        let mut settings = WikiSettings::default();
        assert!(!pending.check_restart_needed(&settings));
        settings.data_dir = PathBuf::from("elsewhere");
        assert!(pending.check_restart_needed(&settings));
    }
}
