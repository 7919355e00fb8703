//! Shared UI setup and styling
//!
//! Every screen is drawn with egui; this module owns the camera egui
//! renders through plus the palette and chrome the screens share.

use bevy::prelude::*;
use bevy_egui::egui;

use crate::builder::{issue_title, to_issue_body};
use crate::data::model::{CharacterClass, Quality, Tier};
use crate::data::Catalog;
use crate::suggest::SuggestionLabel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui);
    }
}

fn setup_ui(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("UI system initialized");
}

/// Common colors used throughout the UI
pub mod colors {
    use bevy_egui::egui::Color32;

    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 30);
    pub const PANEL: Color32 = Color32::from_rgb(32, 32, 44);
    pub const SLOT: Color32 = Color32::from_rgb(51, 51, 64);
    pub const SLOT_FILLED: Color32 = Color32::from_rgb(64, 77, 89);
    pub const TITLE: Color32 = Color32::from_rgb(230, 204, 153);
    pub const SUBTITLE: Color32 = Color32::from_rgb(153, 140, 128);
    pub const BUTTON_TEXT: Color32 = Color32::from_rgb(230, 217, 191);
    pub const MUTED: Color32 = Color32::from_rgb(150, 150, 150);
    pub const WARNING: Color32 = Color32::from_rgb(230, 170, 80);
    pub const ERROR: Color32 = Color32::from_rgb(220, 90, 90);
    pub const GOOD: Color32 = Color32::from_rgb(110, 200, 120);
    pub const OVERDRIVE: Color32 = Color32::from_rgb(240, 120, 40);
}

/// Font sizes used throughout the UI
pub mod fonts {
    pub const TITLE: f32 = 42.0;
    pub const HEADER: f32 = 24.0;
    pub const BODY: f32 = 16.0;
    pub const SMALL: f32 = 13.0;
}

pub fn class_color(class: CharacterClass) -> egui::Color32 {
    match class {
        CharacterClass::Guardian => egui::Color32::from_rgb(200, 170, 90),
        CharacterClass::Priest => egui::Color32::from_rgb(240, 240, 210),
        CharacterClass::Assassin => egui::Color32::from_rgb(170, 110, 200),
        CharacterClass::Warrior => egui::Color32::from_rgb(200, 100, 80),
        CharacterClass::Archer => egui::Color32::from_rgb(120, 190, 90),
        CharacterClass::Mage => egui::Color32::from_rgb(100, 150, 230),
        CharacterClass::Unknown => colors::MUTED,
    }
}

pub fn quality_color(quality: Quality) -> egui::Color32 {
    match quality {
        Quality::Ur => egui::Color32::from_rgb(255, 90, 90),
        Quality::SsrEx | Quality::SsrPlus | Quality::Ssr => egui::Color32::from_rgb(255, 200, 60),
        Quality::SrPlus | Quality::Sr => egui::Color32::from_rgb(190, 120, 240),
        Quality::R => egui::Color32::from_rgb(90, 150, 240),
        Quality::N | Quality::Unknown => colors::MUTED,
    }
}

pub fn tier_color(tier: Tier) -> egui::Color32 {
    match tier {
        Tier::SPlus => egui::Color32::from_rgb(255, 110, 110),
        Tier::S => egui::Color32::from_rgb(255, 170, 90),
        Tier::A => egui::Color32::from_rgb(255, 220, 110),
        Tier::B => egui::Color32::from_rgb(150, 220, 120),
        Tier::C => egui::Color32::from_rgb(110, 180, 240),
        Tier::D => egui::Color32::from_rgb(170, 150, 220),
    }
}

/// Dark theme applied by every screen
pub fn apply_dark_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.window_fill = colors::BACKGROUND;
    style.visuals.panel_fill = colors::BACKGROUND;
    ctx.set_style(style);
}

pub fn screen_frame() -> egui::Frame {
    egui::Frame::none().fill(colors::BACKGROUND).inner_margin(egui::Margin {
        left: 15.0,
        right: 15.0,
        top: 20.0,
        bottom: 20.0,
    })
}

/// Back button in the top-left plus a centered title. Returns true when back was clicked.
pub fn screen_header(ui: &mut egui::Ui, title: &str) -> bool {
    let mut back = false;
    ui.add_space(10.0);

    let back_rect = egui::Rect::from_min_size(egui::pos2(20.0, 20.0), egui::vec2(80.0, 36.0));
    ui.allocate_new_ui(egui::UiBuilder::new().max_rect(back_rect), |ui| {
        if ui.button(egui::RichText::new("← BACK").size(20.0)).clicked() {
            back = true;
        }
    });

    ui.vertical_centered(|ui| {
        ui.heading(egui::RichText::new(title).size(fonts::TITLE).color(colors::TITLE));
    });
    ui.add_space(20.0);
    back
}

/// Character chip used by both builders
pub fn character_chip(ui: &mut egui::Ui, name: &str, class: CharacterClass, width: f32) -> egui::Response {
    let color = class_color(class);
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, 28.0), egui::Sense::hover());
    let fill = if response.hovered() {
        colors::SLOT_FILLED
    } else {
        colors::SLOT
    };
    ui.painter().rect_filled(rect, 6.0, fill);
    ui.painter().rect_stroke(rect, 6.0, egui::Stroke::new(1.5, color.gamma_multiply(0.7)));
    ui.painter().text(
        rect.left_center() + egui::vec2(8.0, 0.0),
        egui::Align2::LEFT_CENTER,
        name,
        egui::FontId::proportional(fonts::BODY),
        color,
    );
    response
}

/// Drag payload carried by character chips
#[derive(Debug, Clone, PartialEq)]
pub struct DraggedCharacter(pub String);

pub fn class_of(catalog: &Catalog, name: &str) -> CharacterClass {
    catalog
        .character(name)
        .map(|c| c.character_class)
        .unwrap_or_default()
}

/// Character chip that can be dragged onto a drop zone.
/// Drops released on the chip itself are read with `dnd_release_payload`.
pub fn draggable_character(ui: &mut egui::Ui, name: &str, class: CharacterClass, width: f32) -> egui::Response {
    let id = egui::Id::new(("drag-character", name));
    ui.dnd_drag_source(id, DraggedCharacter(name.to_string()), |ui| {
        character_chip(ui, name, class, width)
    })
    .response
}

/// Labelled drop target. Returns the character released onto it, if any.
pub fn drop_zone<R>(
    ui: &mut egui::Ui,
    min_size: egui::Vec2,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> (R, Option<String>) {
    let frame = egui::Frame::none()
        .fill(colors::PANEL)
        .rounding(6.0)
        .inner_margin(6.0);
    let (inner, payload) = ui.dnd_drop_zone::<DraggedCharacter, R>(frame, |ui| {
        ui.set_min_size(min_size);
        add_contents(ui)
    });
    (inner.inner, payload.map(|p| p.0.clone()))
}

/// Issue title and body ready to paste into a new suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPreview {
    pub title: String,
    pub body: String,
}

impl ExportPreview {
    pub fn new(label: SuggestionLabel, name: &str, json: &str) -> Self {
        Self {
            title: issue_title(label, name),
            body: to_issue_body(label, json),
        }
    }
}

/// Floating window showing an export. `open` is cleared when closed.
pub fn export_window(ctx: &egui::Context, preview: &ExportPreview, open: &mut bool) {
    egui::Window::new("Export")
        .open(open)
        .default_width(520.0)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Issue title:").color(colors::MUTED));
                ui.label(egui::RichText::new(&preview.title).strong());
                if ui.small_button("Copy").clicked() {
                    ui.ctx().copy_text(preview.title.clone());
                }
            });
            ui.separator();
            egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                let mut body = preview.body.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut body)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
            if ui.button("Copy issue body").clicked() {
                ui.ctx().copy_text(preview.body.clone());
            }
        });
}
