//! In-memory filtering, sorting and pagination for the database browser

use super::model::{
    Artifact, Character, CharacterClass, Code, Faction, FactionName, Gear, GoldenAlliance, Howlkin,
    NoblePhantasm, Quality, StatusEffect, Subclass, Team, TierList, UsefulLink, Wyrmspell,
};

/// Records that can be matched against a free-text query
pub trait Searchable {
    /// Text the query is matched against (case-insensitive)
    fn search_text(&self) -> String;

    /// Every whitespace-separated query term must appear in the search text
    fn matches_query(&self, query: &str) -> bool {
        let haystack = self.search_text().to_lowercase();
        query
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }
}

impl Searchable for Character {
    fn search_text(&self) -> String {
        let factions: Vec<&str> = self.factions.iter().map(|f| f.name()).collect();
        format!(
            "{} {} {} {} {}",
            self.name,
            self.title,
            self.character_class.name(),
            self.quality.name(),
            factions.join(" ")
        )
    }
}

impl Searchable for Faction {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name.name(), self.wyrm.name(), self.description)
    }
}

impl Searchable for Artifact {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.quality.name(), self.lore)
    }
}

impl Searchable for Gear {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.set, self.gear_type)
    }
}

impl Searchable for StatusEffect {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.effect_type.name(), self.effect)
    }
}

impl Searchable for Wyrmspell {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.effect)
    }
}

impl Searchable for NoblePhantasm {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.character.as_deref().unwrap_or(""))
    }
}

impl Searchable for Howlkin {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.passive_effect)
    }
}

impl Searchable for GoldenAlliance {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.howlkins.join(" "))
    }
}

impl Searchable for Subclass {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.character_class.name())
    }
}

impl Searchable for super::model::Resource {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.category, self.description)
    }
}

impl Searchable for Code {
    fn search_text(&self) -> String {
        self.code.clone()
    }
}

impl Searchable for UsefulLink {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.application, self.description)
    }
}

impl Searchable for TierList {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.author, self.content_type)
    }
}

impl Searchable for Team {
    fn search_text(&self) -> String {
        let members: Vec<&str> = self.members.iter().map(|m| m.character_name.as_str()).collect();
        format!("{} {} {} {}", self.name, self.author, self.content_type, members.join(" "))
    }
}

/// Free-text search over any searchable records
pub fn search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches_query(query)).collect()
}

/// Character browser filter. Empty selections do not restrict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterFilter {
    pub text: String,
    pub qualities: Vec<Quality>,
    pub classes: Vec<CharacterClass>,
    /// Matches characters belonging to any of these factions
    pub factions: Vec<FactionName>,
    pub global_only: bool,
}

impl CharacterFilter {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.qualities.is_empty()
            && self.classes.is_empty()
            && self.factions.is_empty()
            && !self.global_only
    }

    pub fn matches(&self, character: &Character) -> bool {
        if self.global_only && !character.is_global {
            return false;
        }
        if !self.qualities.is_empty() && !self.qualities.contains(&character.quality) {
            return false;
        }
        if !self.classes.is_empty() && !self.classes.contains(&character.character_class) {
            return false;
        }
        if !self.factions.is_empty() && !self.factions.iter().any(|f| character.has_faction(*f)) {
            return false;
        }
        character.matches_query(&self.text)
    }

    pub fn apply<'a>(&self, characters: &'a [Character]) -> Vec<&'a Character> {
        characters.iter().filter(|c| self.matches(c)).collect()
    }

    /// Toggle membership of a value in one of the filter's selections
    pub fn toggle<T: PartialEq + Copy>(selection: &mut Vec<T>, value: T) {
        if let Some(pos) = selection.iter().position(|v| *v == value) {
            selection.remove(pos);
        } else {
            selection.push(value);
        }
    }
}

/// Character list orderings offered by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSort {
    /// Class, then quality, then name (the data file order)
    #[default]
    ClassThenQuality,
    Name,
    Quality,
}

impl CharacterSort {
    pub fn all() -> &'static [CharacterSort] {
        &[CharacterSort::ClassThenQuality, CharacterSort::Name, CharacterSort::Quality]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterSort::ClassThenQuality => "Class",
            CharacterSort::Name => "Name",
            CharacterSort::Quality => "Quality",
        }
    }

    pub fn apply(&self, characters: &mut [&Character]) {
        // Unknown variants sit last in both enums, so declaration order is rank order
        fn class_rank(c: &Character) -> usize {
            c.character_class as usize
        }
        fn quality_rank(c: &Character) -> usize {
            c.quality as usize
        }
        match self {
            CharacterSort::ClassThenQuality => characters.sort_by_key(|c| {
                (class_rank(c), quality_rank(c), c.name.to_lowercase())
            }),
            CharacterSort::Name => characters.sort_by_key(|c| c.name.to_lowercase()),
            CharacterSort::Quality => {
                characters.sort_by_key(|c| (quality_rank(c), c.name.to_lowercase()))
            }
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown (after clamping)
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out a 1-based page. Out-of-range pages clamp to the nearest valid one.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);

    Page {
        items: items[start.min(end)..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(name: &str, class: CharacterClass, quality: Quality, factions: &[FactionName]) -> Character {
        let mut c: Character = serde_json::from_value(serde_json::json!({ "name": name })).unwrap();
        c.character_class = class;
        c.quality = quality;
        c.factions = factions.to_vec();
        c
    }

    fn roster() -> Vec<Character> {
        vec![
            character("Astra", CharacterClass::Mage, Quality::Ur, &[FactionName::ArcaneWisdom]),
            character("Brann", CharacterClass::Guardian, Quality::Ssr, &[FactionName::WildSpirit]),
            character("Celes", CharacterClass::Priest, Quality::Ur, &[FactionName::SanctumGlory, FactionName::WildSpirit]),
            character("Dax", CharacterClass::Guardian, Quality::Sr, &[]),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let chars = roster();
        let filter = CharacterFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&chars).len(), 4);
    }

    #[test]
    fn test_filter_combines_criteria() {
        let chars = roster();
        let filter = CharacterFilter {
            qualities: vec![Quality::Ur],
            factions: vec![FactionName::WildSpirit],
            ..Default::default()
        };
        let names: Vec<&str> = filter.apply(&chars).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Celes"]);
    }

    #[test]
    fn test_text_search_matches_class_and_name_terms() {
        let chars = roster();
        let filter = CharacterFilter {
            text: "guardian br".to_string(),
            ..Default::default()
        };
        let names: Vec<&str> = filter.apply(&chars).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Brann"]);
    }

    #[test]
    fn test_toggle_selection() {
        let mut classes = vec![CharacterClass::Mage];
        CharacterFilter::toggle(&mut classes, CharacterClass::Priest);
        CharacterFilter::toggle(&mut classes, CharacterClass::Mage);
        assert_eq!(classes, vec![CharacterClass::Priest]);
    }

    #[test]
    fn test_sort_class_then_quality() {
        let chars = roster();
        let mut refs: Vec<&Character> = chars.iter().collect();
        CharacterSort::ClassThenQuality.apply(&mut refs);
        let names: Vec<&str> = refs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Brann", "Dax", "Celes", "Astra"]);
    }

    #[test]
    fn test_paginate_clamps_pages() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 3);

        let last = paginate(&items, 99, 3);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![7]);

        let first = paginate(&items, 0, 3);
        assert_eq!(first.page, 1);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 10);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
