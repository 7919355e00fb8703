//! Tier list builder screen
//!
//! Six tier rows above the available pool. Chips are dragged between
//! them; releasing on a chip inserts before it, releasing on empty row
//! space appends.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::WikiState;
use crate::builder::{TierListBuilder, ZoneId};
use crate::data::browse::Searchable;
use crate::data::model::Tier;
use crate::data::Catalog;
use crate::keybindings::{Keybindings, WikiAction};
use crate::suggest::SuggestionLabel;
use crate::ui::{
    apply_dark_style, class_of, colors, draggable_character, drop_zone, export_window, fonts, screen_frame,
    screen_header, tier_color, DraggedCharacter, ExportPreview,
};

const CHIP_WIDTH: f32 = 140.0;

#[derive(Resource, Debug, Default)]
pub struct TierListView {
    pub pool_filter: String,
    pub export: Option<ExportPreview>,
    /// Catalog tier list picked for loading
    pub load_choice: Option<usize>,
    /// Character whose note is being edited
    pub note_target: Option<String>,
    pub status: Option<String>,
}

/// Where a released chip should go
struct Drop {
    entity: String,
    zone: ZoneId,
    index: Option<usize>,
}

fn open_export(builder: &TierListBuilder, view: &mut TierListView) {
    match builder.export() {
        Ok(json) => {
            info!("Exported tier list '{}' ({} entries)", builder.meta.name, builder.ranked_count());
            view.export = Some(ExportPreview::new(SuggestionLabel::TierList, &builder.meta.name, &json));
        }
        Err(e) => {
            error!("Tier list export failed: {}", e);
            view.status = Some(e);
        }
    }
}

/// Pool chips shown for the current filter
fn pool_matches(catalog: &Catalog, name: &str, filter: &str) -> bool {
    match catalog.character(name) {
        Some(character) => character.matches_query(filter),
        None => name.to_lowercase().contains(&filter.trim().to_lowercase()),
    }
}

fn render_tier_row(
    ui: &mut egui::Ui,
    tier: Tier,
    builder: &TierListBuilder,
    catalog: &Catalog,
    drop: &mut Option<Drop>,
) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(56.0, 44.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 6.0, tier_color(tier));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            tier.label(),
            egui::FontId::proportional(fonts::HEADER),
            colors::BACKGROUND,
        );

        let zone = ZoneId::Tier(tier);
        let width = ui.available_width() - 12.0;
        let ((), released) = drop_zone(ui, egui::vec2(width, 32.0), |ui| {
            ui.horizontal_wrapped(|ui| {
                for (index, name) in builder.tier(tier).iter().enumerate() {
                    let response = draggable_character(ui, name, class_of(catalog, name), CHIP_WIDTH);
                    if let Some(payload) = response.dnd_release_payload::<DraggedCharacter>() {
                        *drop = Some(Drop {
                            entity: payload.0.clone(),
                            zone,
                            index: Some(index),
                        });
                    }
                }
            });
        });
        if let (Some(entity), None) = (released, drop.as_ref()) {
            *drop = Some(Drop {
                entity,
                zone,
                index: None,
            });
        }
    });
}

fn render_details(ui: &mut egui::Ui, builder: &mut TierListBuilder, view: &mut TierListView, catalog: &Catalog) {
    ui.heading(egui::RichText::new("Details").color(colors::TITLE));
    ui.add_space(6.0);

    egui::Grid::new("tier-list-meta").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut builder.meta.name);
        ui.end_row();
        ui.label("Author");
        ui.text_edit_singleline(&mut builder.meta.author);
        ui.end_row();
        ui.label("Content");
        ui.text_edit_singleline(&mut builder.meta.content_type);
        ui.end_row();
    });
    ui.label("Description");
    ui.add(egui::TextEdit::multiline(&mut builder.meta.description).desired_rows(3));

    ui.add_space(10.0);
    ui.separator();
    ui.label(egui::RichText::new("Notes").color(colors::SUBTITLE));

    let ranked: Vec<String> = Tier::all()
        .iter()
        .flat_map(|t| builder.tier(*t).iter().cloned())
        .collect();
    if view.note_target.as_ref().is_some_and(|t| !ranked.contains(t)) {
        view.note_target = None;
    }
    egui::ComboBox::from_id_salt("tier-note-target")
        .selected_text(view.note_target.as_deref().unwrap_or("Pick a character"))
        .show_ui(ui, |ui| {
            for name in &ranked {
                ui.selectable_value(&mut view.note_target, Some(name.clone()), name);
            }
        });
    if let Some(target) = view.note_target.clone() {
        let mut note = builder.note(&target).to_string();
        if ui.text_edit_singleline(&mut note).changed() {
            if let Err(e) = builder.set_note(&target, note) {
                view.status = Some(e.to_string());
            }
        }
    }

    ui.add_space(10.0);
    ui.separator();
    ui.label(egui::RichText::new("Load existing").color(colors::SUBTITLE));
    let current = view
        .load_choice
        .and_then(|i| catalog.tier_lists.get(i))
        .map(|l| l.name.as_str())
        .unwrap_or("Choose a tier list");
    egui::ComboBox::from_id_salt("tier-list-load")
        .selected_text(current)
        .show_ui(ui, |ui| {
            for (index, list) in catalog.tier_lists.iter().enumerate() {
                ui.selectable_value(&mut view.load_choice, Some(index), &list.name);
            }
        });
    if let Some(list) = view.load_choice.and_then(|i| catalog.tier_lists.get(i)) {
        if ui.button("Load").clicked() {
            info!("Loading tier list '{}'", list.name);
            builder.load_tier_list(list);
            view.status = Some(format!("Loaded '{}'", list.name));
        }
    }

    ui.add_space(10.0);
    ui.separator();
    ui.label(format!("{} ranked, {} unranked", builder.ranked_count(), builder.available().len()));
    ui.horizontal(|ui| {
        if ui.button("Export").clicked() {
            open_export(builder, view);
        }
        if ui.button("Clear").clicked() {
            builder.clear();
            view.note_target = None;
            view.status = Some("Cleared".to_string());
        }
    });

    if let Some(status) = &view.status {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(status).color(colors::WARNING));
    }
}

pub fn tier_list_ui(
    mut contexts: EguiContexts,
    mut builder: ResMut<TierListBuilder>,
    mut view: ResMut<TierListView>,
    catalog: Res<Catalog>,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut next_state: ResMut<NextState<WikiState>>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_style(ctx);

    if !ctx.wants_keyboard_input() {
        if keybindings.action_just_pressed(WikiAction::ClearBuilder, &keyboard) {
            builder.clear();
            view.note_target = None;
            view.status = Some("Cleared".to_string());
        }
        if keybindings.action_just_pressed(WikiAction::ExportSnippet, &keyboard) {
            open_export(&builder, &mut view);
        }
    }

    egui::SidePanel::right("tier-list-details")
        .resizable(false)
        .default_width(320.0)
        .frame(screen_frame())
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_details(ui, &mut builder, &mut view, &catalog);
            });
        });

    let mut drop: Option<Drop> = None;

    egui::CentralPanel::default().frame(screen_frame()).show(ctx, |ui| {
        if screen_header(ui, "TIER LIST BUILDER") {
            next_state.set(WikiState::MainMenu);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for tier in Tier::all() {
                render_tier_row(ui, *tier, &builder, &catalog, &mut drop);
                ui.add_space(4.0);
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Available").size(fonts::HEADER).color(colors::SUBTITLE));
                ui.add(egui::TextEdit::singleline(&mut view.pool_filter).hint_text("filter"));
            });
            let width = ui.available_width() - 12.0;
            let ((), released) = drop_zone(ui, egui::vec2(width, 120.0), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for name in builder.available() {
                        if pool_matches(&catalog, name, &view.pool_filter) {
                            draggable_character(ui, name, class_of(&catalog, name), CHIP_WIDTH);
                        }
                    }
                });
            });
            if let (Some(entity), None) = (released, drop.as_ref()) {
                drop = Some(Drop {
                    entity,
                    zone: ZoneId::Available,
                    index: None,
                });
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

    if let Some(drop) = drop {
        match builder.assign_at(&drop.entity, drop.zone, drop.index) {
            Ok(()) => view.status = None,
            Err(e) => {
                warn!("Tier list drop refused: {}", e);
                view.status = Some(e.to_string());
            }
        }
    }
}
