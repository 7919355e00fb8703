//! Screen state management
//!
//! Defines the wiki's screens and transitions between them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub mod database_ui;
pub mod team_builder_ui;
pub mod tier_list_ui;

use crate::builder::{TeamBuilder, TierListBuilder};
use crate::data::catalog::CatalogStatus;
use crate::data::Catalog;
use crate::keybindings::{bindable_keys, key_label, KeyBinding, Keybindings, WikiAction};
use crate::settings::{PendingSettingsRestart, ResolutionOption, WikiSettings, WindowModeOption, PAGE_SIZES};
use crate::ui::{apply_dark_style, colors, fonts, screen_frame, screen_header};

use database_ui::DatabaseView;
use team_builder_ui::TeamBuilderView;
use tier_list_ui::TierListView;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WikiState {
    #[default]
    MainMenu,
    /// Searchable browser over every data file
    Database,
    TierListBuilder,
    TeamBuilder,
    Options,
}

pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DatabaseView>()
            .init_resource::<TierListView>()
            .init_resource::<TeamBuilderView>()
            .init_resource::<RebindState>()
            .add_systems(Startup, init_builders)
            .add_systems(Update, navigation_keys)
            .add_systems(Update, main_menu_ui.run_if(in_state(WikiState::MainMenu)))
            .add_systems(Update, database_ui::database_ui.run_if(in_state(WikiState::Database)))
            .add_systems(
                Update,
                tier_list_ui::tier_list_ui.run_if(in_state(WikiState::TierListBuilder)),
            )
            .add_systems(
                Update,
                team_builder_ui::team_builder_ui.run_if(in_state(WikiState::TeamBuilder)),
            )
            .add_systems(Update, (rebind_capture, options_ui).chain().run_if(in_state(WikiState::Options)));
    }
}

/// Builders start with the whole catalog in their pools
fn init_builders(mut commands: Commands, catalog: Res<Catalog>) {
    commands.insert_resource(TeamBuilder::from_catalog(&catalog));
    commands.insert_resource(TierListBuilder::from_catalog(&catalog));
}

/// Global shortcuts, ignored while a text field has focus
fn navigation_keys(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    state: Res<State<WikiState>>,
    rebind: Res<RebindState>,
    mut next_state: ResMut<NextState<WikiState>>,
) {
    if rebind.action.is_some() || contexts.ctx_mut().wants_keyboard_input() {
        return;
    }

    if keybindings.action_just_pressed(WikiAction::Back, &keyboard) && *state.get() != WikiState::MainMenu {
        next_state.set(WikiState::MainMenu);
    } else if keybindings.action_just_pressed(WikiAction::OpenDatabase, &keyboard) {
        next_state.set(WikiState::Database);
    } else if keybindings.action_just_pressed(WikiAction::OpenTierListBuilder, &keyboard) {
        next_state.set(WikiState::TierListBuilder);
    } else if keybindings.action_just_pressed(WikiAction::OpenTeamBuilder, &keyboard) {
        next_state.set(WikiState::TeamBuilder);
    }
}

// ============================================================================
// Main Menu
// ============================================================================

fn main_menu_ui(
    mut contexts: EguiContexts,
    catalog: Res<Catalog>,
    status: Res<CatalogStatus>,
    mut next_state: ResMut<NextState<WikiState>>,
    mut exit_events: EventWriter<AppExit>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_style(ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(colors::BACKGROUND))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading(egui::RichText::new("DRAGON TRAVELER WIKI").size(64.0).color(colors::TITLE));
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{} characters • {} tier lists • {} teams",
                        catalog.characters.len(),
                        catalog.tier_lists.len(),
                        catalog.teams.len()
                    ))
                    .size(20.0)
                    .color(colors::SUBTITLE),
                );

                if let Some(error) = &status.error {
                    ui.add_space(10.0);
                    ui.label(egui::RichText::new(format!("⚠ {}", error)).size(fonts::BODY).color(colors::ERROR));
                }

                ui.add_space(50.0);

                let button_size = egui::vec2(320.0, 56.0);
                let entries = [
                    ("DATABASE", Some(WikiState::Database)),
                    ("TIER LIST BUILDER", Some(WikiState::TierListBuilder)),
                    ("TEAM BUILDER", Some(WikiState::TeamBuilder)),
                    ("OPTIONS", Some(WikiState::Options)),
                    ("EXIT", None),
                ];
                for (label, target) in entries {
                    let button = egui::Button::new(egui::RichText::new(label).size(26.0).color(colors::BUTTON_TEXT));
                    if ui.add_sized(button_size, button).clicked() {
                        match target {
                            Some(state) => {
                                info!("{} pressed - transitioning to {:?}", label, state);
                                next_state.set(state);
                            }
                            None => {
                                info!("Exit pressed - quitting application");
                                exit_events.send(AppExit::Success);
                            }
                        }
                    }
                    ui.add_space(10.0);
                }
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::RIGHT), |ui| {
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(14.0)
                        .color(egui::Color32::from_rgb(102, 102, 102)),
                );
            });
        });
}

// ============================================================================
// Options
// ============================================================================

/// Action waiting for its new key
#[derive(Resource, Default)]
pub struct RebindState {
    pub action: Option<WikiAction>,
    pub conflict: Option<String>,
}

/// Take the next bindable key press for the pending action
fn rebind_capture(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut rebind: ResMut<RebindState>,
    mut settings: ResMut<WikiSettings>,
) {
    let Some(action) = rebind.action else {
        return;
    };
    let Some(key) = bindable_keys().find(|key| keyboard.just_pressed(*key)) else {
        return;
    };

    if key == KeyCode::Escape && action != WikiAction::Back {
        rebind.action = None;
        rebind.conflict = None;
        return;
    }

    match settings.keybindings.is_key_bound(key, Some(action)) {
        Some(other) => {
            rebind.conflict = Some(format!("{} is already bound to {}", key_label(key), other.description()));
        }
        None => {
            settings.keybindings.set(action, KeyBinding::new(key));
            info!("Bound {:?} to {}", action, key_label(key));
            rebind.action = None;
            rebind.conflict = None;
        }
    }
}

fn option_group(ui: &mut egui::Ui, title: &str, note: Option<&str>, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.set_min_width(580.0);
        ui.add_space(8.0);
        ui.label(egui::RichText::new(title).size(fonts::HEADER).color(colors::TITLE));
        if let Some(note) = note {
            ui.label(egui::RichText::new(note).size(fonts::SMALL).color(colors::MUTED));
        }
        ui.add_space(8.0);
        add_contents(ui);
        ui.add_space(8.0);
    });
    ui.add_space(16.0);
}

fn choice_button(ui: &mut egui::Ui, label: &str, selected: bool, width: f32) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).size(17.0).color(if selected {
        egui::Color32::WHITE
    } else {
        egui::Color32::from_rgb(180, 180, 180)
    }))
    .min_size(egui::vec2(width, 36.0))
    .fill(if selected {
        egui::Color32::from_rgb(60, 60, 80)
    } else {
        egui::Color32::from_rgb(40, 40, 50)
    });
    ui.add(button).clicked()
}

fn options_ui(
    mut contexts: EguiContexts,
    mut next_state: ResMut<NextState<WikiState>>,
    mut settings: ResMut<WikiSettings>,
    mut rebind: ResMut<RebindState>,
    pending_restart: Res<PendingSettingsRestart>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_style(ctx);

    egui::CentralPanel::default().frame(screen_frame()).show(ctx, |ui| {
        if screen_header(ui, "OPTIONS") {
            next_state.set(WikiState::MainMenu);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.allocate_ui_with_layout(
                    egui::vec2(600.0, ui.available_height()),
                    egui::Layout::top_down(egui::Align::LEFT),
                    |ui| {
                        option_group(ui, "Window Mode", Some("(Requires restart)"), |ui| {
                            ui.horizontal(|ui| {
                                for mode in WindowModeOption::all() {
                                    if choice_button(ui, mode.as_str(), settings.window_mode == mode, 280.0) {
                                        settings.window_mode = mode;
                                    }
                                }
                            });
                        });

                        option_group(ui, "Resolution", Some("(Requires restart • Windowed mode only)"), |ui| {
                            ui.horizontal(|ui| {
                                for resolution in ResolutionOption::all() {
                                    if choice_button(ui, resolution.as_str(), settings.resolution == resolution, 180.0)
                                    {
                                        settings.resolution = resolution;
                                    }
                                }
                            });
                        });

                        option_group(ui, "VSync", Some("Applied immediately"), |ui| {
                            let label = if settings.vsync { "On" } else { "Off" };
                            let mut vsync = settings.vsync;
                            if ui.checkbox(&mut vsync, egui::RichText::new(label).size(17.0)).changed() {
                                settings.vsync = vsync;
                            }
                        });

                        option_group(ui, "Database Page Size", None, |ui| {
                            ui.horizontal(|ui| {
                                for size in PAGE_SIZES {
                                    if choice_button(ui, &size.to_string(), settings.page_size == size, 80.0) {
                                        settings.page_size = size;
                                    }
                                }
                            });
                        });

                        option_group(ui, "Data Directory", Some("(Requires restart)"), |ui| {
                            let mut dir = settings.data_dir.to_string_lossy().into_owned();
                            let response = ui.add(egui::TextEdit::singleline(&mut dir).desired_width(400.0));
                            if response.lost_focus() && dir != settings.data_dir.to_string_lossy() {
                                settings.data_dir = dir.into();
                            }
                        });

                        option_group(ui, "Keybindings", Some("Click a binding, then press the new key"), |ui| {
                            render_keybindings(ui, &mut settings, &mut rebind);
                        });

                        if pending_restart.restart_required {
                            ui.label(
                                egui::RichText::new("⚠ Restart required for some settings to apply")
                                    .size(18.0)
                                    .color(colors::WARNING),
                            );
                        }
                    },
                );
            });
        });
    });
}

/// Takes the `ResMut`s so that only real edits mark settings as changed
fn render_keybindings(ui: &mut egui::Ui, settings: &mut ResMut<WikiSettings>, rebind: &mut ResMut<RebindState>) {
    let mut category = "";
    egui::Grid::new("keybindings").num_columns(2).spacing([40.0, 6.0]).show(ui, |ui| {
        for action in WikiAction::all() {
            if action.category() != category {
                category = action.category();
                ui.label(egui::RichText::new(category).size(fonts::BODY).color(colors::SUBTITLE));
                ui.end_row();
            }

            ui.label(action.description());
            let waiting = rebind.action == Some(*action);
            let text = if waiting {
                "Press a key…".to_string()
            } else {
                settings.keybindings.binding_display(*action)
            };
            if ui.add(egui::Button::new(text).min_size(egui::vec2(140.0, 24.0))).clicked() {
                rebind.action = Some(*action);
                rebind.conflict = None;
            }
            ui.end_row();
        }
    });

    if let Some(conflict) = &rebind.conflict {
        ui.label(egui::RichText::new(conflict).color(colors::ERROR));
    }

    ui.add_space(8.0);
    if ui.button("Reset to defaults").clicked() {
        settings.keybindings.reset_to_defaults();
        rebind.action = None;
        rebind.conflict = None;
    }
}
