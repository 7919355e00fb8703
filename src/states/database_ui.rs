//! Database browser
//!
//! One tab per data file. Every tab has free-text search and pagination;
//! the character tab adds quality/class/faction filters and sorting.
//! Tier lists and teams can be opened in their builders.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::WikiState;
use crate::builder::synergy::score_team;
use crate::builder::{SynergyConfig, TeamBuilder, TierListBuilder};
use crate::data::browse::{paginate, CharacterFilter, CharacterSort, Searchable};
use crate::data::model::{
    self, Artifact, Character, CharacterClass, Code, Faction, FactionName, Gear, GoldenAlliance, Howlkin,
    NoblePhantasm, Quality, StatusEffect, Subclass, Team, TierList, UsefulLink, Wyrmspell,
};
use crate::data::Catalog;
use crate::keybindings::{Keybindings, WikiAction};
use crate::settings::WikiSettings;
use crate::ui::{apply_dark_style, class_color, colors, fonts, quality_color, screen_frame, screen_header, tier_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseTab {
    #[default]
    Characters,
    Factions,
    Artifacts,
    Gear,
    StatusEffects,
    Wyrmspells,
    NoblePhantasms,
    Howlkins,
    GoldenAlliances,
    Subclasses,
    Resources,
    Codes,
    Links,
    TierLists,
    Teams,
}

impl DatabaseTab {
    pub fn all() -> &'static [DatabaseTab] {
        &[
            DatabaseTab::Characters,
            DatabaseTab::Factions,
            DatabaseTab::Artifacts,
            DatabaseTab::Gear,
            DatabaseTab::StatusEffects,
            DatabaseTab::Wyrmspells,
            DatabaseTab::NoblePhantasms,
            DatabaseTab::Howlkins,
            DatabaseTab::GoldenAlliances,
            DatabaseTab::Subclasses,
            DatabaseTab::Resources,
            DatabaseTab::Codes,
            DatabaseTab::Links,
            DatabaseTab::TierLists,
            DatabaseTab::Teams,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatabaseTab::Characters => "Characters",
            DatabaseTab::Factions => "Factions",
            DatabaseTab::Artifacts => "Artifacts",
            DatabaseTab::Gear => "Gear",
            DatabaseTab::StatusEffects => "Status Effects",
            DatabaseTab::Wyrmspells => "Wyrmspells",
            DatabaseTab::NoblePhantasms => "Noble Phantasms",
            DatabaseTab::Howlkins => "Howlkins",
            DatabaseTab::GoldenAlliances => "Golden Alliances",
            DatabaseTab::Subclasses => "Subclasses",
            DatabaseTab::Resources => "Resources",
            DatabaseTab::Codes => "Codes",
            DatabaseTab::Links => "Links",
            DatabaseTab::TierLists => "Tier Lists",
            DatabaseTab::Teams => "Teams",
        }
    }
}

/// Browser state kept across visits
#[derive(Resource, Debug, Default)]
pub struct DatabaseView {
    pub tab: DatabaseTab,
    /// Search text for non-character tabs; characters use `filter.text`
    pub query: String,
    pub filter: CharacterFilter,
    pub sort: CharacterSort,
    /// 1-based
    pub page: usize,
    focus_search: bool,
}

impl DatabaseView {
    fn switch_tab(&mut self, tab: DatabaseTab) {
        if self.tab != tab {
            self.tab = tab;
            self.query.clear();
            self.page = 1;
        }
    }
}

/// How a record is shown in the browser
trait DatabaseEntry: Searchable {
    fn title(&self) -> String;
    fn subtitle(&self) -> String {
        String::new()
    }
    fn accent(&self) -> egui::Color32 {
        colors::TITLE
    }
    fn details(&self, ui: &mut egui::Ui);
}

fn detail_line(ui: &mut egui::Ui, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(format!("{}:", label)).color(colors::MUTED));
        ui.label(value);
    });
}

impl DatabaseEntry for Character {
    fn title(&self) -> String {
        if self.title.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.title)
        }
    }

    fn subtitle(&self) -> String {
        let factions: Vec<&str> = self.factions.iter().map(|f| f.name()).collect();
        format!(
            "{} • {} • {}{}",
            self.quality.name(),
            self.character_class.name(),
            factions.join(", "),
            if self.is_global { "" } else { " • CN only" }
        )
    }

    fn accent(&self) -> egui::Color32 {
        class_color(self.character_class)
    }

    fn details(&self, ui: &mut egui::Ui) {
        detail_line(ui, "Subclasses", &self.subclasses.join(", "));
        detail_line(ui, "Origin", &self.origin);
        detail_line(ui, "Height", &self.height);
        detail_line(ui, "Weight", &self.weight);
        detail_line(ui, "Noble Phantasm", self.noble_phantasm.as_deref().unwrap_or(""));
        if !self.quote.is_empty() {
            ui.label(egui::RichText::new(format!("“{}”", self.quote)).italics());
        }
        for skill in &self.skills {
            detail_line(ui, &skill.name, &skill.description);
        }
        if !self.lore.is_empty() {
            ui.label(egui::RichText::new(&self.lore).size(fonts::SMALL).color(colors::MUTED));
        }
    }
}

impl DatabaseEntry for Faction {
    fn title(&self) -> String {
        self.name.name().to_string()
    }
    fn subtitle(&self) -> String {
        self.wyrm.name().to_string()
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.description);
        detail_line(ui, "Recommended artifacts", &self.recommended_artifacts.join(", "));
    }
}

impl DatabaseEntry for Artifact {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        format!("{} • {}×{}", self.quality.name(), self.width, self.height)
    }
    fn accent(&self) -> egui::Color32 {
        quality_color(self.quality)
    }
    fn details(&self, ui: &mut egui::Ui) {
        for effect in &self.effect {
            detail_line(ui, &format!("Lv {}", effect.level), &effect.description);
        }
        for treasure in &self.treasures {
            detail_line(ui, &treasure.name, treasure.character_class.name());
        }
        detail_line(ui, "Lore", &self.lore);
    }
}

impl DatabaseEntry for Gear {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        format!("{} • {}", self.set, self.gear_type)
    }
    fn details(&self, ui: &mut egui::Ui) {
        for (stat, value) in &self.stats {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            detail_line(ui, stat, &value);
        }
        if let Some(bonus) = &self.set_bonus {
            detail_line(ui, &format!("{}-piece bonus", bonus.quantity), &bonus.description);
        }
        detail_line(ui, "Lore", &self.lore);
    }
}

impl DatabaseEntry for StatusEffect {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.effect_type.name().to_string()
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.effect);
        detail_line(ui, "Remark", &self.remark);
    }
}

impl DatabaseEntry for Wyrmspell {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        format!("{} • {}", self.spell_type.name(), self.quality.name())
    }
    fn accent(&self) -> egui::Color32 {
        quality_color(self.quality)
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.effect);
    }
}

impl DatabaseEntry for NoblePhantasm {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.character.clone().unwrap_or_else(|| "General".to_string())
    }
    fn details(&self, ui: &mut egui::Ui) {
        for effect in &self.effects {
            let label = effect.tier.clone().unwrap_or_else(|| "Effect".to_string());
            detail_line(ui, &label, &effect.description);
        }
        for skill in &self.skills {
            detail_line(ui, &format!("Lv {}", skill.level), &skill.description);
        }
        detail_line(ui, "Lore", &self.lore);
    }
}

impl DatabaseEntry for Howlkin {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.quality.name().to_string()
    }
    fn accent(&self) -> egui::Color32 {
        quality_color(self.quality)
    }
    fn details(&self, ui: &mut egui::Ui) {
        for (stat, value) in &self.basic_stats {
            detail_line(ui, stat, &value.to_string());
        }
        detail_line(ui, "Passive", &self.passive_effect);
    }
}

impl DatabaseEntry for GoldenAlliance {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.howlkins.join(", ")
    }
    fn details(&self, ui: &mut egui::Ui) {
        for effect in &self.effects {
            detail_line(ui, &format!("Lv {}", effect.level), &effect.stats.join(", "));
        }
    }
}

impl DatabaseEntry for Subclass {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        format!("{} • Tier {}", self.character_class.name(), self.tier)
    }
    fn accent(&self) -> egui::Color32 {
        class_color(self.character_class)
    }
    fn details(&self, ui: &mut egui::Ui) {
        detail_line(ui, "Bonuses", &self.bonuses.join(", "));
        ui.label(&self.effect);
    }
}

impl DatabaseEntry for model::Resource {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.category.clone()
    }
    fn accent(&self) -> egui::Color32 {
        quality_color(self.quality)
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.description);
    }
}

impl DatabaseEntry for Code {
    fn title(&self) -> String {
        self.code.clone()
    }
    fn subtitle(&self) -> String {
        if self.active { "Active" } else { "Expired" }.to_string()
    }
    fn accent(&self) -> egui::Color32 {
        if self.active {
            colors::GOOD
        } else {
            colors::MUTED
        }
    }
    fn details(&self, ui: &mut egui::Ui) {
        for (reward, amount) in &self.rewards {
            detail_line(ui, reward, &amount.to_string());
        }
        if ui.small_button("Copy code").clicked() {
            ui.ctx().copy_text(self.code.clone());
        }
    }
}

impl DatabaseEntry for UsefulLink {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        self.application.clone()
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.description);
        ui.hyperlink(&self.link);
    }
}

impl DatabaseEntry for TierList {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        format!("{} • {} • {} entries", self.author, self.content_type, self.entries.len())
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.description);
        for tier in crate::data::model::Tier::all() {
            let names: Vec<&str> = self
                .entries
                .iter()
                .filter(|e| e.tier == *tier)
                .map(|e| e.character_name.as_str())
                .collect();
            if !names.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(tier.label()).strong().color(tier_color(*tier)));
                    ui.label(names.join(", "));
                });
            }
        }
    }
}

impl DatabaseEntry for Team {
    fn title(&self) -> String {
        self.name.clone()
    }
    fn subtitle(&self) -> String {
        let faction = self.faction.map(|f| f.name()).unwrap_or("Mixed");
        format!("{} • {} • {}", self.author, self.content_type, faction)
    }
    fn details(&self, ui: &mut egui::Ui) {
        ui.label(&self.description);
        for member in &self.members {
            let overdrive = member
                .overdrive_order
                .map(|o| format!(" [OD {}]", o))
                .unwrap_or_default();
            detail_line(ui, &format!("{}{}", member.character_name, overdrive), &member.note);
        }
    }
}

/// Request raised by a row button
enum RowAction {
    OpenTierList(usize),
    OpenTeam(usize),
}

fn no_extra<T>(_: &T) -> Option<String> {
    None
}

/// Render a searchable, paginated list. `open` adds an "Open in builder" button.
fn render_entries<T: DatabaseEntry>(
    ui: &mut egui::Ui,
    items: &[T],
    query: &str,
    page: &mut usize,
    page_size: usize,
    open: Option<fn(usize) -> RowAction>,
    extra: impl Fn(&T) -> Option<String>,
) -> Option<RowAction> {
    let matched: Vec<(usize, &T)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches_query(query))
        .collect();
    let shown = paginate(&matched, *page, page_size);
    *page = shown.page;

    let mut action = None;
    render_pager(ui, page, shown.total_pages, shown.total_items);
    ui.add_space(6.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, item) in shown.items {
            egui::Frame::none()
                .fill(colors::PANEL)
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let header = egui::RichText::new(item.title()).size(fonts::BODY).color(item.accent());
                    egui::CollapsingHeader::new(header)
                        .id_salt(("db-row", index))
                        .show(ui, |ui| item.details(ui));
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(item.subtitle()).size(fonts::SMALL).color(colors::MUTED));
                        if let Some(extra) = extra(item) {
                            ui.label(egui::RichText::new(extra).size(fonts::SMALL).color(colors::WARNING));
                        }
                        if let Some(open) = open {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("Open in builder").clicked() {
                                    action = Some(open(index));
                                }
                            });
                        }
                    });
                });
            ui.add_space(4.0);
        }
    });

    action
}

fn render_pager(ui: &mut egui::Ui, page: &mut usize, total_pages: usize, total_items: usize) {
    ui.horizontal(|ui| {
        if ui.add_enabled(*page > 1, egui::Button::new("◀")).clicked() {
            *page -= 1;
        }
        ui.label(format!("Page {} / {}", page, total_pages));
        if ui.add_enabled(*page < total_pages, egui::Button::new("▶")).clicked() {
            *page += 1;
        }
        ui.label(egui::RichText::new(format!("{} results", total_items)).color(colors::MUTED));
    });
}

fn render_character_filters(ui: &mut egui::Ui, view: &mut DatabaseView) {
    ui.horizontal_wrapped(|ui| {
        ui.label("Quality:");
        for quality in Quality::all() {
            let selected = view.filter.qualities.contains(quality);
            if ui
                .selectable_label(selected, egui::RichText::new(quality.name()).color(quality_color(*quality)))
                .clicked()
            {
                CharacterFilter::toggle(&mut view.filter.qualities, *quality);
                view.page = 1;
            }
        }
    });
    ui.horizontal_wrapped(|ui| {
        ui.label("Class:");
        for class in CharacterClass::all() {
            let selected = view.filter.classes.contains(class);
            if ui
                .selectable_label(selected, egui::RichText::new(class.name()).color(class_color(*class)))
                .clicked()
            {
                CharacterFilter::toggle(&mut view.filter.classes, *class);
                view.page = 1;
            }
        }
    });
    ui.horizontal_wrapped(|ui| {
        ui.label("Faction:");
        for faction in FactionName::all() {
            let selected = view.filter.factions.contains(faction);
            if ui.selectable_label(selected, faction.name()).clicked() {
                CharacterFilter::toggle(&mut view.filter.factions, *faction);
                view.page = 1;
            }
        }
    });
    ui.horizontal(|ui| {
        if ui.checkbox(&mut view.filter.global_only, "Global only").changed() {
            view.page = 1;
        }
        ui.separator();
        ui.label("Sort:");
        for sort in CharacterSort::all() {
            if ui.selectable_label(view.sort == *sort, sort.name()).clicked() {
                view.sort = *sort;
            }
        }
        if !view.filter.is_empty() && ui.button("Clear filters").clicked() {
            view.filter = CharacterFilter::default();
            view.page = 1;
        }
    });
}

fn render_characters(ui: &mut egui::Ui, catalog: &Catalog, view: &mut DatabaseView, page_size: usize) {
    render_character_filters(ui, view);
    ui.add_space(6.0);

    let mut matched = view.filter.apply(&catalog.characters);
    view.sort.apply(&mut matched);
    let shown = paginate(&matched, view.page, page_size);
    view.page = shown.page;

    render_pager(ui, &mut view.page, shown.total_pages, shown.total_items);
    ui.add_space(6.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for character in shown.items {
            egui::Frame::none()
                .fill(colors::PANEL)
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let header = egui::RichText::new(character.title())
                        .size(fonts::BODY)
                        .color(character.accent());
                    egui::CollapsingHeader::new(header)
                        .id_salt(("character", &character.name))
                        .show(ui, |ui| character.details(ui));
                    ui.label(
                        egui::RichText::new(character.subtitle())
                            .size(fonts::SMALL)
                            .color(quality_color(character.quality)),
                    );
                });
            ui.add_space(4.0);
        }
    });
}

#[allow(clippy::too_many_arguments)]
pub fn database_ui(
    mut contexts: EguiContexts,
    mut view: ResMut<DatabaseView>,
    catalog: Res<Catalog>,
    settings: Res<WikiSettings>,
    synergy: Res<SynergyConfig>,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut team_builder: ResMut<TeamBuilder>,
    mut tier_builder: ResMut<TierListBuilder>,
    mut next_state: ResMut<NextState<WikiState>>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_style(ctx);
    let page_size = settings.page_size;
    if view.page == 0 {
        view.page = 1;
    }

    if !ctx.wants_keyboard_input() {
        if keybindings.action_just_pressed(WikiAction::NextPage, &keyboard) {
            view.page += 1;
        }
        if keybindings.action_just_pressed(WikiAction::PrevPage, &keyboard) {
            view.page = view.page.saturating_sub(1).max(1);
        }
        if keybindings.action_just_pressed(WikiAction::FocusSearch, &keyboard) {
            view.focus_search = true;
        }
    }

    let mut action = None;

    egui::CentralPanel::default().frame(screen_frame()).show(ctx, |ui| {
        if screen_header(ui, "DATABASE") {
            next_state.set(WikiState::MainMenu);
        }

        ui.horizontal_wrapped(|ui| {
            for tab in DatabaseTab::all() {
                if ui.selectable_label(view.tab == *tab, tab.name()).clicked() {
                    view.switch_tab(*tab);
                }
            }
        });
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Search:");
            let view = &mut *view;
            let text = if view.tab == DatabaseTab::Characters {
                &mut view.filter.text
            } else {
                &mut view.query
            };
            let response = ui.add(egui::TextEdit::singleline(text).desired_width(320.0));
            if response.changed() {
                view.page = 1;
            }
            if view.focus_search {
                response.request_focus();
                view.focus_search = false;
            }
        });
        ui.add_space(6.0);

        let view = &mut *view;
        if view.tab == DatabaseTab::Characters {
            render_characters(ui, &catalog, view, page_size);
            return;
        }
        let query = view.query.clone();
        let page = &mut view.page;
        action = match view.tab {
            DatabaseTab::Characters => None,
            DatabaseTab::Factions => render_entries(ui, &catalog.factions, &query, page, page_size, None, no_extra),
            DatabaseTab::Artifacts => render_entries(ui, &catalog.artifacts, &query, page, page_size, None, no_extra),
            DatabaseTab::Gear => render_entries(ui, &catalog.gear, &query, page, page_size, None, no_extra),
            DatabaseTab::StatusEffects => {
                render_entries(ui, &catalog.status_effects, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::Wyrmspells => {
                render_entries(ui, &catalog.wyrmspells, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::NoblePhantasms => {
                render_entries(ui, &catalog.noble_phantasms, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::Howlkins => render_entries(ui, &catalog.howlkins, &query, page, page_size, None, no_extra),
            DatabaseTab::GoldenAlliances => {
                render_entries(ui, &catalog.golden_alliances, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::Subclasses => {
                render_entries(ui, &catalog.subclasses, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::Resources => render_entries(ui, &catalog.resources, &query, page, page_size, None, no_extra),
            DatabaseTab::Codes => render_entries(ui, &catalog.codes, &query, page, page_size, None, no_extra),
            DatabaseTab::Links => {
                render_entries(ui, &catalog.useful_links, &query, page, page_size, None, no_extra)
            }
            DatabaseTab::TierLists => render_entries(
                ui,
                &catalog.tier_lists,
                &query,
                page,
                page_size,
                Some(RowAction::OpenTierList),
                no_extra,
            ),
            DatabaseTab::Teams => render_entries(
                ui,
                &catalog.teams,
                &query,
                page,
                page_size,
                Some(RowAction::OpenTeam),
                |team: &Team| Some(format!("Synergy {}/100", score_team(team, &catalog, &synergy).score)),
            ),
        };
    });

    match action {
        Some(RowAction::OpenTierList(index)) => {
            if let Some(list) = catalog.tier_lists.get(index) {
                info!("Opening tier list '{}' in the builder", list.name);
                tier_builder.load_tier_list(list);
                next_state.set(WikiState::TierListBuilder);
            }
        }
        Some(RowAction::OpenTeam(index)) => {
            if let Some(team) = catalog.teams.get(index) {
                info!("Opening team '{}' in the builder", team.name);
                team_builder.load_team(team);
                next_state.set(WikiState::TeamBuilder);
            }
        }
        None => {}
    }
}
