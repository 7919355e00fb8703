//! Team builder screen
//!
//! Six team slots, a bench and the available pool. Drops go through
//! `TeamBuilder::assign`; the slot cards show overdrive priority and the
//! side panel scores the current composition.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::WikiState;
use crate::builder::{score_builder, AssignOutcome, Placement, SynergyConfig, SynergyReport, TeamBuilder, ZoneId};
use crate::data::browse::Searchable;
use crate::data::model::{FactionName, WyrmspellType};
use crate::data::Catalog;
use crate::keybindings::{Keybindings, WikiAction};
use crate::suggest::SuggestionLabel;
use crate::ui::{
    apply_dark_style, class_of, colors, draggable_character, drop_zone, export_window, fonts, screen_frame,
    screen_header, ExportPreview,
};

const CHIP_WIDTH: f32 = 150.0;
const SLOT_SIZE: egui::Vec2 = egui::vec2(190.0, 96.0);

#[derive(Resource, Debug, Default)]
pub struct TeamBuilderView {
    pub pool_filter: String,
    pub export: Option<ExportPreview>,
    /// Catalog team picked for loading
    pub load_choice: Option<usize>,
    /// Slot occupant whose note is being edited
    pub note_target: Option<String>,
    pub status: Option<String>,
}

/// Status line describing what a drop did
fn describe(entity: &str, target: ZoneId, outcome: &AssignOutcome) -> Option<String> {
    match &outcome.placement {
        Placement::Unchanged => None,
        Placement::Inserted | Placement::Moved { .. } => None,
        Placement::Swapped { with } => Some(format!("{} swapped with {}", entity, with)),
        Placement::Bumped { occupant } => Some(format!("{} took {}, {} moved to the bench", entity, target, occupant)),
    }
}

fn open_export(builder: &TeamBuilder, view: &mut TeamBuilderView) {
    match builder.export() {
        Ok(json) => {
            info!("Exported team '{}' ({} members)", builder.meta.name, builder.member_count());
            view.export = Some(ExportPreview::new(SuggestionLabel::Team, &builder.meta.name, &json));
        }
        Err(e) => {
            error!("Team export failed: {}", e);
            view.status = Some(e);
        }
    }
}

fn clear_builder(builder: &mut TeamBuilder, view: &mut TeamBuilderView) {
    builder.clear();
    view.note_target = None;
    view.status = Some("Cleared".to_string());
}

fn pool_matches(catalog: &Catalog, name: &str, filter: &str) -> bool {
    match catalog.character(name) {
        Some(character) => character.matches_query(filter),
        None => name.to_lowercase().contains(&filter.trim().to_lowercase()),
    }
}

/// One slot card. Returns the character released onto it.
fn render_slot(
    ui: &mut egui::Ui,
    index: u8,
    builder: &mut TeamBuilder,
    catalog: &Catalog,
    view: &mut TeamBuilderView,
) -> Option<String> {
    let occupant = builder.slot(index).cloned();
    let ((), released) = drop_zone(ui, SLOT_SIZE, |ui| {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(format!("Slot {}", index + 1))
                    .size(fonts::SMALL)
                    .color(colors::MUTED),
            );
            let Some(name) = occupant else {
                ui.label(egui::RichText::new("Drop a character").color(colors::SUBTITLE));
                return;
            };

            draggable_character(ui, &name, class_of(catalog, &name), CHIP_WIDTH);
            ui.horizontal(|ui| {
                let order = builder.overdrive_order(&name);
                let label = match order {
                    Some(order) => egui::RichText::new(format!("OD {}", order)).color(colors::OVERDRIVE),
                    None => egui::RichText::new("OD -").color(colors::MUTED),
                };
                if ui.small_button(label).on_hover_text("Toggle overdrive").clicked() {
                    if let Err(e) = builder.toggle_overdrive(&name) {
                        view.status = Some(e.to_string());
                    }
                }
                if let Some(order) = order {
                    if order > 1 && ui.small_button("▲").on_hover_text("Overdrive earlier").clicked() {
                        let _ = builder.set_overdrive_order(&name, order - 1);
                    }
                    if (order as usize) < builder.overdrive().len()
                        && ui.small_button("▼").on_hover_text("Overdrive later").clicked()
                    {
                        let _ = builder.set_overdrive_order(&name, order + 1);
                    }
                }
                if ui.small_button("✎").on_hover_text("Edit note").clicked() {
                    view.note_target = Some(name.clone());
                }
            });
        });
    });
    released
}

fn render_synergy(ui: &mut egui::Ui, report: &SynergyReport) {
    let color = match report.score {
        70..=100 => colors::GOOD,
        40..=69 => colors::WARNING,
        _ => colors::ERROR,
    };
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Synergy").color(colors::SUBTITLE));
        ui.label(egui::RichText::new(format!("{}/100", report.score)).size(fonts::HEADER).color(color));
    });
    for signal in &report.signals {
        ui.horizontal(|ui| {
            ui.add(egui::ProgressBar::new(signal.value).desired_width(80.0));
            ui.label(egui::RichText::new(signal.kind.name()).size(fonts::SMALL));
            ui.label(egui::RichText::new(&signal.detail).size(fonts::SMALL).color(colors::MUTED));
        });
    }
    for recommendation in &report.recommendations {
        ui.label(egui::RichText::new(format!("• {}", recommendation)).size(fonts::SMALL).color(colors::WARNING));
    }
}

fn wyrmspell_picker(ui: &mut egui::Ui, catalog: &Catalog, spell_type: WyrmspellType, value: &mut String) {
    ui.label(spell_type.name());
    let selected = if value.is_empty() { "None" } else { value.as_str() };
    egui::ComboBox::from_id_salt(("team-wyrmspell", spell_type.name()))
        .selected_text(selected.to_string())
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), "None");
            for spell in catalog.wyrmspells.iter().filter(|s| s.spell_type == spell_type) {
                ui.selectable_value(value, spell.name.clone(), &spell.name);
            }
        });
    ui.end_row();
}

fn render_details(
    ui: &mut egui::Ui,
    builder: &mut TeamBuilder,
    view: &mut TeamBuilderView,
    catalog: &Catalog,
    synergy: &SynergyConfig,
) {
    ui.heading(egui::RichText::new("Details").color(colors::TITLE));
    ui.add_space(6.0);

    egui::Grid::new("team-meta").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut builder.meta.name);
        ui.end_row();
        ui.label("Author");
        ui.text_edit_singleline(&mut builder.meta.author);
        ui.end_row();
        ui.label("Content");
        ui.text_edit_singleline(&mut builder.meta.content_type);
        ui.end_row();

        ui.label("Faction");
        egui::ComboBox::from_id_salt("team-faction")
            .selected_text(builder.meta.faction.map(|f| f.name()).unwrap_or("None"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut builder.meta.faction, None, "None");
                for faction in FactionName::all() {
                    ui.selectable_value(&mut builder.meta.faction, Some(*faction), faction.name());
                }
            });
        ui.end_row();

        let spells = &mut builder.meta.wyrmspells;
        wyrmspell_picker(ui, catalog, WyrmspellType::Breach, &mut spells.breach);
        wyrmspell_picker(ui, catalog, WyrmspellType::Refuge, &mut spells.refuge);
        wyrmspell_picker(ui, catalog, WyrmspellType::Wildcry, &mut spells.wildcry);
        wyrmspell_picker(ui, catalog, WyrmspellType::DragonsCall, &mut spells.dragons_call);
    });
    ui.label("Description");
    ui.add(egui::TextEdit::multiline(&mut builder.meta.description).desired_rows(3));

    if let Some(target) = view.note_target.clone() {
        if builder.locate(&target).is_some_and(|z| z.is_slot()) {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(format!("Note for {}", target)).color(colors::SUBTITLE));
            let mut note = builder.note(&target).to_string();
            if ui.text_edit_singleline(&mut note).changed() {
                if let Err(e) = builder.set_note(&target, note) {
                    view.status = Some(e.to_string());
                }
            }
        } else {
            view.note_target = None;
        }
    }

    ui.add_space(10.0);
    ui.separator();
    render_synergy(ui, &score_builder(builder, catalog, synergy));

    ui.add_space(10.0);
    ui.separator();
    ui.label(egui::RichText::new("Load existing").color(colors::SUBTITLE));
    let current = view
        .load_choice
        .and_then(|i| catalog.teams.get(i))
        .map(|t| t.name.as_str())
        .unwrap_or("Choose a team");
    egui::ComboBox::from_id_salt("team-load")
        .selected_text(current)
        .show_ui(ui, |ui| {
            for (index, team) in catalog.teams.iter().enumerate() {
                ui.selectable_value(&mut view.load_choice, Some(index), &team.name);
            }
        });
    if let Some(team) = view.load_choice.and_then(|i| catalog.teams.get(i)) {
        if ui.button("Load").clicked() {
            info!("Loading team '{}'", team.name);
            builder.load_team(team);
            view.note_target = None;
            view.status = Some(format!("Loaded '{}'", team.name));
        }
    }

    ui.add_space(10.0);
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Export").clicked() {
            open_export(builder, view);
        }
        if ui.button("Clear").clicked() {
            clear_builder(builder, view);
        }
    });

    if let Some(status) = &view.status {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(status).color(colors::WARNING));
    }
}

#[allow(clippy::too_many_arguments)]
pub fn team_builder_ui(
    mut contexts: EguiContexts,
    mut builder: ResMut<TeamBuilder>,
    mut view: ResMut<TeamBuilderView>,
    catalog: Res<Catalog>,
    synergy: Res<SynergyConfig>,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut next_state: ResMut<NextState<WikiState>>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_style(ctx);

    if !ctx.wants_keyboard_input() {
        if keybindings.action_just_pressed(WikiAction::ClearBuilder, &keyboard) {
            clear_builder(&mut builder, &mut view);
        }
        if keybindings.action_just_pressed(WikiAction::ExportSnippet, &keyboard) {
            open_export(&builder, &mut view);
        }
    }

    egui::SidePanel::right("team-details")
        .resizable(false)
        .default_width(340.0)
        .frame(screen_frame())
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_details(ui, &mut builder, &mut view, &catalog, &synergy);
            });
        });

    let mut drop: Option<(String, ZoneId)> = None;

    egui::CentralPanel::default().frame(screen_frame()).show(ctx, |ui| {
        if screen_header(ui, "TEAM BUILDER") {
            next_state.set(WikiState::MainMenu);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label(egui::RichText::new("Team").size(fonts::HEADER).color(colors::SUBTITLE));
            for row in 0..2u8 {
                ui.horizontal(|ui| {
                    for column in 0..3u8 {
                        let index = row * 3 + column;
                        if let Some(entity) = render_slot(ui, index, &mut builder, &catalog, &mut view) {
                            drop = Some((entity, ZoneId::Slot(index)));
                        }
                    }
                });
                ui.add_space(6.0);
            }

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Bench").size(fonts::HEADER).color(colors::SUBTITLE));
            let width = ui.available_width() - 12.0;
            let ((), released) = drop_zone(ui, egui::vec2(width, 40.0), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for name in builder.bench() {
                        draggable_character(ui, name, class_of(&catalog, name), CHIP_WIDTH);
                    }
                });
            });
            if let Some(entity) = released {
                drop = Some((entity, ZoneId::Bench));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Available").size(fonts::HEADER).color(colors::SUBTITLE));
                ui.add(egui::TextEdit::singleline(&mut view.pool_filter).hint_text("filter"));
            });
            let ((), released) = drop_zone(ui, egui::vec2(width, 120.0), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for name in builder.available() {
                        if pool_matches(&catalog, name, &view.pool_filter) {
                            draggable_character(ui, name, class_of(&catalog, name), CHIP_WIDTH);
                        }
                    }
                });
            });
            if let Some(entity) = released {
                drop = Some((entity, ZoneId::Available));
            }
        });
    });

    if let Some(preview) = view.export.clone() {
        let mut open = true;
        export_window(ctx, &preview, &mut open);
        if !open {
            view.export = None;
        }
    }

    if let Some((entity, target)) = drop {
        match builder.assign(&entity, target) {
            Ok(outcome) => view.status = describe(&entity, target, &outcome),
            Err(e) => {
                warn!("Team drop refused: {}", e);
                view.status = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_reports_swaps_and_bumps() {
        let mut builder = TeamBuilder::new(["Astra", "Brann", "Celes"]);
        builder.assign("Astra", ZoneId::Slot(0)).unwrap();
        builder.assign("Brann", ZoneId::Slot(1)).unwrap();

        let outcome = builder.assign("Astra", ZoneId::Slot(1)).unwrap();
        assert_eq!(
            describe("Astra", ZoneId::Slot(1), &outcome).as_deref(),
            Some("Astra swapped with Brann")
        );

        let outcome = builder.assign("Celes", ZoneId::Slot(0)).unwrap();
        assert_eq!(
            describe("Celes", ZoneId::Slot(0), &outcome).as_deref(),
            Some("Celes took slot-0, Brann moved to the bench")
        );
    }
}
