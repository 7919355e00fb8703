//! Remappable keyboard shortcuts
//!
//! Bindings are stored in `settings.ron` by key name, e.g. `"KeyE"`.

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Every action that can be bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WikiAction {
    // Navigation
    Back,
    OpenDatabase,
    OpenTierListBuilder,
    OpenTeamBuilder,

    // Browsing
    FocusSearch,
    NextPage,
    PrevPage,

    // Builders
    ClearBuilder,
    ExportSnippet,
}

impl WikiAction {
    pub fn description(&self) -> &'static str {
        match self {
            WikiAction::Back => "Back / Main Menu",
            WikiAction::OpenDatabase => "Open Database",
            WikiAction::OpenTierListBuilder => "Open Tier List Builder",
            WikiAction::OpenTeamBuilder => "Open Team Builder",
            WikiAction::FocusSearch => "Focus Search",
            WikiAction::NextPage => "Next Page",
            WikiAction::PrevPage => "Previous Page",
            WikiAction::ClearBuilder => "Clear Builder",
            WikiAction::ExportSnippet => "Export Snippet",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            WikiAction::Back
            | WikiAction::OpenDatabase
            | WikiAction::OpenTierListBuilder
            | WikiAction::OpenTeamBuilder => "Navigation",
            WikiAction::FocusSearch | WikiAction::NextPage | WikiAction::PrevPage => "Browsing",
            WikiAction::ClearBuilder | WikiAction::ExportSnippet => "Builders",
        }
    }

    pub fn all() -> &'static [WikiAction] {
        &[
            WikiAction::Back,
            WikiAction::OpenDatabase,
            WikiAction::OpenTierListBuilder,
            WikiAction::OpenTeamBuilder,
            WikiAction::FocusSearch,
            WikiAction::NextPage,
            WikiAction::PrevPage,
            WikiAction::ClearBuilder,
            WikiAction::ExportSnippet,
        ]
    }
}

/// Bindable keys: code, stored name, display label
const KEYS: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Escape, "Escape", "ESC"),
    (KeyCode::Enter, "Enter", "ENTER"),
    (KeyCode::Space, "Space", "SPACE"),
    (KeyCode::Tab, "Tab", "TAB"),
    (KeyCode::Backspace, "Backspace", "BACKSPACE"),
    (KeyCode::Delete, "Delete", "DEL"),
    (KeyCode::Slash, "Slash", "/"),
    (KeyCode::PageUp, "PageUp", "PGUP"),
    (KeyCode::PageDown, "PageDown", "PGDN"),
    (KeyCode::ArrowUp, "ArrowUp", "↑"),
    (KeyCode::ArrowDown, "ArrowDown", "↓"),
    (KeyCode::ArrowLeft, "ArrowLeft", "←"),
    (KeyCode::ArrowRight, "ArrowRight", "→"),
    (KeyCode::KeyA, "KeyA", "A"),
    (KeyCode::KeyB, "KeyB", "B"),
    (KeyCode::KeyC, "KeyC", "C"),
    (KeyCode::KeyD, "KeyD", "D"),
    (KeyCode::KeyE, "KeyE", "E"),
    (KeyCode::KeyF, "KeyF", "F"),
    (KeyCode::KeyG, "KeyG", "G"),
    (KeyCode::KeyH, "KeyH", "H"),
    (KeyCode::KeyI, "KeyI", "I"),
    (KeyCode::KeyJ, "KeyJ", "J"),
    (KeyCode::KeyK, "KeyK", "K"),
    (KeyCode::KeyL, "KeyL", "L"),
    (KeyCode::KeyM, "KeyM", "M"),
    (KeyCode::KeyN, "KeyN", "N"),
    (KeyCode::KeyO, "KeyO", "O"),
    (KeyCode::KeyP, "KeyP", "P"),
    (KeyCode::KeyQ, "KeyQ", "Q"),
    (KeyCode::KeyR, "KeyR", "R"),
    (KeyCode::KeyS, "KeyS", "S"),
    (KeyCode::KeyT, "KeyT", "T"),
    (KeyCode::KeyU, "KeyU", "U"),
    (KeyCode::KeyV, "KeyV", "V"),
    (KeyCode::KeyW, "KeyW", "W"),
    (KeyCode::KeyX, "KeyX", "X"),
    (KeyCode::KeyY, "KeyY", "Y"),
    (KeyCode::KeyZ, "KeyZ", "Z"),
    (KeyCode::Digit1, "Digit1", "1"),
    (KeyCode::Digit2, "Digit2", "2"),
    (KeyCode::Digit3, "Digit3", "3"),
    (KeyCode::Digit4, "Digit4", "4"),
    (KeyCode::Digit5, "Digit5", "5"),
    (KeyCode::Digit6, "Digit6", "6"),
    (KeyCode::Digit7, "Digit7", "7"),
    (KeyCode::Digit8, "Digit8", "8"),
    (KeyCode::Digit9, "Digit9", "9"),
    (KeyCode::Digit0, "Digit0", "0"),
    (KeyCode::F1, "F1", "F1"),
    (KeyCode::F2, "F2", "F2"),
    (KeyCode::F3, "F3", "F3"),
    (KeyCode::F4, "F4", "F4"),
    (KeyCode::F5, "F5", "F5"),
];

pub fn key_from_name(name: &str) -> Option<KeyCode> {
    KEYS.iter().find(|(_, stored, _)| *stored == name).map(|(key, _, _)| *key)
}

pub fn key_stored_name(key: KeyCode) -> Option<&'static str> {
    KEYS.iter().find(|(k, _, _)| *k == key).map(|(_, stored, _)| *stored)
}

/// Short label for a key
pub fn key_label(key: KeyCode) -> &'static str {
    KEYS.iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, _, label)| *label)
        .unwrap_or("???")
}

/// Every bindable key, for the rebinding UI
pub fn bindable_keys() -> impl Iterator<Item = KeyCode> {
    KEYS.iter().map(|(key, _, _)| *key)
}

/// Primary key plus optional alternate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub primary: KeyCode,
    #[serde(default, with = "option_keycode_serde")]
    pub secondary: Option<KeyCode>,
}

mod keycode_serde {
    use super::*;

    pub fn serialize<S: Serializer>(key: &KeyCode, serializer: S) -> Result<S::Ok, S::Error> {
        match key_stored_name(*key) {
            Some(name) => serializer.serialize_str(name),
            None => Err(serde::ser::Error::custom(format!("unbindable key {:?}", key))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(deserializer)?;
        key_from_name(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown key '{}'", name)))
    }
}

mod option_keycode_serde {
    use super::*;

    pub fn serialize<S: Serializer>(key: &Option<KeyCode>, serializer: S) -> Result<S::Ok, S::Error> {
        match key.and_then(key_stored_name) {
            Some(name) => serializer.serialize_some(name),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<KeyCode>, D::Error> {
        let name: Option<String> = Option::deserialize(deserializer)?;
        name.map(|n| key_from_name(&n).ok_or_else(|| serde::de::Error::custom(format!("unknown key '{}'", n))))
            .transpose()
    }
}

impl KeyBinding {
    pub fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize, PartialEq)]
pub struct Keybindings {
    bindings: HashMap<WikiAction, KeyBinding>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::create_defaults()
    }
}

impl Keybindings {
    pub fn create_defaults() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(WikiAction::Back, KeyBinding::new(KeyCode::Escape));
        bindings.insert(WikiAction::OpenDatabase, KeyBinding::new(KeyCode::Digit1));
        bindings.insert(WikiAction::OpenTierListBuilder, KeyBinding::new(KeyCode::Digit2));
        bindings.insert(WikiAction::OpenTeamBuilder, KeyBinding::new(KeyCode::Digit3));

        bindings.insert(WikiAction::FocusSearch, KeyBinding::with_secondary(KeyCode::Slash, KeyCode::KeyF));
        bindings.insert(
            WikiAction::NextPage,
            KeyBinding::with_secondary(KeyCode::PageDown, KeyCode::ArrowRight),
        );
        bindings.insert(
            WikiAction::PrevPage,
            KeyBinding::with_secondary(KeyCode::PageUp, KeyCode::ArrowLeft),
        );

        bindings.insert(WikiAction::ClearBuilder, KeyBinding::new(KeyCode::Delete));
        bindings.insert(WikiAction::ExportSnippet, KeyBinding::new(KeyCode::KeyE));

        Self { bindings }
    }

    pub fn get(&self, action: WikiAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    pub fn set(&mut self, action: WikiAction, binding: KeyBinding) {
        self.bindings.insert(action, binding);
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::create_defaults();
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: WikiAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action).is_some_and(|binding| {
            keyboard.just_pressed(binding.primary)
                || binding.secondary.is_some_and(|key| keyboard.just_pressed(key))
        })
    }

    /// Action already using `key`, ignoring `exclude_action`
    pub fn is_key_bound(&self, key: KeyCode, exclude_action: Option<WikiAction>) -> Option<WikiAction> {
        self.bindings
            .iter()
            .find(|(action, binding)| Some(**action) != exclude_action && binding.matches(key))
            .map(|(action, _)| *action)
    }

    pub fn binding_display(&self, action: WikiAction) -> String {
        match self.get(action) {
            Some(KeyBinding {
                primary,
                secondary: Some(secondary),
            }) => format!("{} / {}", key_label(*primary), key_label(*secondary)),
            Some(binding) => key_label(binding.primary).to_string(),
            None => "Unbound".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_default() {
        let bindings = Keybindings::default();
        for action in WikiAction::all() {
            assert!(bindings.get(*action).is_some(), "{:?} unbound", action);
        }
    }

    #[test]
    fn test_bindings_survive_ron() {
        let bindings = Keybindings::default();
        let text = ron::to_string(&bindings).unwrap();
        let parsed: Keybindings = ron::from_str(&text).unwrap();
        assert_eq!(parsed, bindings);
    }

    #[test]
    fn test_conflict_detection() {
        let bindings = Keybindings::default();
        assert_eq!(bindings.is_key_bound(KeyCode::KeyE, None), Some(WikiAction::ExportSnippet));
        assert_eq!(bindings.is_key_bound(KeyCode::KeyE, Some(WikiAction::ExportSnippet)), None);
    }

    #[test]
    fn test_display_shows_both_keys() {
        let bindings = Keybindings::default();
        assert_eq!(bindings.binding_display(WikiAction::NextPage), "PGDN / →");
    }
}
