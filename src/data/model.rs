//! Wiki data model
//!
//! Serde types for every file under `data/`. Fields that community
//! submissions may omit carry `#[serde(default)]` so partially filled
//! entries still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Character and item rarity, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Quality {
    #[serde(rename = "UR")]
    Ur,
    #[serde(rename = "SSR EX")]
    SsrEx,
    #[serde(rename = "SSR+")]
    SsrPlus,
    #[serde(rename = "SSR")]
    Ssr,
    #[serde(rename = "SR+")]
    SrPlus,
    #[serde(rename = "SR")]
    Sr,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "N")]
    N,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Quality {
    pub fn all() -> &'static [Quality] {
        &[
            Quality::Ur,
            Quality::SsrEx,
            Quality::SsrPlus,
            Quality::Ssr,
            Quality::SrPlus,
            Quality::Sr,
            Quality::R,
            Quality::N,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quality::Ur => "UR",
            Quality::SsrEx => "SSR EX",
            Quality::SsrPlus => "SSR+",
            Quality::Ssr => "SSR",
            Quality::SrPlus => "SR+",
            Quality::Sr => "SR",
            Quality::R => "R",
            Quality::N => "N",
            Quality::Unknown => "Unknown",
        }
    }
}

/// Playable character classes, in the game's display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterClass {
    Guardian,
    Priest,
    Assassin,
    Warrior,
    Archer,
    Mage,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CharacterClass {
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Guardian,
            CharacterClass::Priest,
            CharacterClass::Assassin,
            CharacterClass::Warrior,
            CharacterClass::Archer,
            CharacterClass::Mage,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Guardian => "Guardian",
            CharacterClass::Priest => "Priest",
            CharacterClass::Assassin => "Assassin",
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Archer => "Archer",
            CharacterClass::Mage => "Mage",
            CharacterClass::Unknown => "Unknown",
        }
    }

    /// Classes that hold the front row
    pub fn is_frontline(&self) -> bool {
        matches!(self, CharacterClass::Guardian | CharacterClass::Warrior)
    }

    /// Classes that keep the team alive
    pub fn is_sustain(&self) -> bool {
        matches!(self, CharacterClass::Priest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactionName {
    #[serde(rename = "Elemental Echo")]
    ElementalEcho,
    #[serde(rename = "Wild Spirit")]
    WildSpirit,
    #[serde(rename = "Arcane Wisdom")]
    ArcaneWisdom,
    #[serde(rename = "Sanctum Glory")]
    SanctumGlory,
    #[serde(rename = "Otherworld Return")]
    OtherworldReturn,
    #[serde(rename = "Illusion Veil")]
    IllusionVeil,
    #[serde(other)]
    Unknown,
}

impl FactionName {
    pub fn all() -> &'static [FactionName] {
        &[
            FactionName::ElementalEcho,
            FactionName::WildSpirit,
            FactionName::ArcaneWisdom,
            FactionName::SanctumGlory,
            FactionName::OtherworldReturn,
            FactionName::IllusionVeil,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FactionName::ElementalEcho => "Elemental Echo",
            FactionName::WildSpirit => "Wild Spirit",
            FactionName::ArcaneWisdom => "Arcane Wisdom",
            FactionName::SanctumGlory => "Sanctum Glory",
            FactionName::OtherworldReturn => "Otherworld Return",
            FactionName::IllusionVeil => "Illusion Veil",
            FactionName::Unknown => "Unknown",
        }
    }

    /// Look up a faction by its display name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<FactionName> {
        FactionName::all()
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wyrm {
    #[serde(rename = "Fire Whelp")]
    FireWhelp,
    #[serde(rename = "Butterfly Whelp")]
    ButterflyWhelp,
    #[serde(rename = "Emerald Whelp")]
    EmeraldWhelp,
    #[serde(rename = "Shadow Whelp")]
    ShadowWhelp,
    #[serde(rename = "Light Whelp")]
    LightWhelp,
    #[serde(rename = "Dark Whelp")]
    DarkWhelp,
    #[serde(other)]
    Unknown,
}

impl Wyrm {
    pub fn name(&self) -> &'static str {
        match self {
            Wyrm::FireWhelp => "Fire Whelp",
            Wyrm::ButterflyWhelp => "Butterfly Whelp",
            Wyrm::EmeraldWhelp => "Emerald Whelp",
            Wyrm::ShadowWhelp => "Shadow Whelp",
            Wyrm::LightWhelp => "Light Whelp",
            Wyrm::DarkWhelp => "Dark Whelp",
            Wyrm::Unknown => "Unknown",
        }
    }
}

/// Tier list buckets, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "S+")]
    SPlus,
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn all() -> &'static [Tier] {
        &[Tier::SPlus, Tier::S, Tier::A, Tier::B, Tier::C, Tier::D]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::SPlus => "S+",
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }

    /// Position of this tier in the ranking (0 = best)
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::all()
            .iter()
            .copied()
            .find(|t| t.label() == s.trim())
            .ok_or_else(|| format!("Unknown tier: '{}'. Valid tiers: S+, S, A, B, C, D", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StatusEffectType {
    Buff,
    Debuff,
    Special,
    Control,
    Elemental,
    Blessing,
    Exclusive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl StatusEffectType {
    pub fn all() -> &'static [StatusEffectType] {
        &[
            StatusEffectType::Buff,
            StatusEffectType::Debuff,
            StatusEffectType::Special,
            StatusEffectType::Control,
            StatusEffectType::Elemental,
            StatusEffectType::Blessing,
            StatusEffectType::Exclusive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusEffectType::Buff => "Buff",
            StatusEffectType::Debuff => "Debuff",
            StatusEffectType::Special => "Special",
            StatusEffectType::Control => "Control",
            StatusEffectType::Elemental => "Elemental",
            StatusEffectType::Blessing => "Blessing",
            StatusEffectType::Exclusive => "Exclusive",
            StatusEffectType::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WyrmspellType {
    Breach,
    Refuge,
    Wildcry,
    #[serde(rename = "Dragon's Call")]
    DragonsCall,
    #[default]
    #[serde(other)]
    Unknown,
}

impl WyrmspellType {
    pub fn name(&self) -> &'static str {
        match self {
            WyrmspellType::Breach => "Breach",
            WyrmspellType::Refuge => "Refuge",
            WyrmspellType::Wildcry => "Wildcry",
            WyrmspellType::DragonsCall => "Dragon's Call",
            WyrmspellType::Unknown => "Unknown",
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub character_class: CharacterClass,
    #[serde(default)]
    pub factions: Vec<FactionName>,
    #[serde(default = "default_true")]
    pub is_global: bool,
    #[serde(default)]
    pub subclasses: Vec<String>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub quote: String,
    /// Free-form talent block; its layout changes between game versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talent: Option<serde_json::Value>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noble_phantasm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

impl Character {
    pub fn has_faction(&self, faction: FactionName) -> bool {
        self.factions.contains(&faction)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Faction {
    pub name: FactionName,
    pub wyrm: Wyrm,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommended_artifacts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactEffect {
    pub level: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactTreasure {
    pub name: String,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub character_class: CharacterClass,
    #[serde(default)]
    pub effect: Vec<ArtifactEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_global: bool,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub effect: Vec<ArtifactEffect>,
    /// Footprint on the artifact board, in cells
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub treasures: Vec<ArtifactTreasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GearSetBonus {
    pub quantity: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gear {
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(rename = "type", default)]
    pub gear_type: String,
    #[serde(default)]
    pub lore: String,
    /// Stat values are numbers or percentage strings
    #[serde(default)]
    pub stats: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_bonus: Option<GearSetBonus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEffect {
    #[serde(default)]
    pub icon: String,
    pub name: String,
    #[serde(rename = "type", alias = "state", default)]
    pub effect_type: StatusEffectType,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wyrmspell {
    pub name: String,
    #[serde(default)]
    pub effect: String,
    #[serde(rename = "type", default)]
    pub spell_type: WyrmspellType,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoblePhantasmEffect {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub tier_level: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoblePhantasmSkill {
    pub level: u32,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub tier_level: Option<u32>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoblePhantasm {
    pub name: String,
    /// Owning character, if the phantasm is exclusive
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default = "default_true")]
    pub is_global: bool,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub effects: Vec<NoblePhantasmEffect>,
    #[serde(default)]
    pub skills: Vec<NoblePhantasmSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Howlkin {
    pub name: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub basic_stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub passive_effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoldenAllianceEffect {
    pub level: u32,
    #[serde(default)]
    pub stats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoldenAlliance {
    pub name: String,
    #[serde(default)]
    pub howlkins: Vec<String>,
    #[serde(default)]
    pub effects: Vec<GoldenAllianceEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subclass {
    pub name: String,
    #[serde(rename = "class", default)]
    pub character_class: CharacterClass,
    #[serde(default)]
    pub tier: u32,
    #[serde(default)]
    pub bonuses: Vec<String>,
    #[serde(default)]
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

/// Redemption code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Code {
    pub code: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub rewards: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsefulLink {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub application: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierEntry {
    pub character_name: String,
    pub tier: Tier,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TierList {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entries: Vec<TierEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub character_name: String,
    /// Overdrive priority (1-6), absent when the member does not overdrive
    #[serde(default)]
    pub overdrive_order: Option<u8>,
    #[serde(default)]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TeamWyrmspells {
    #[serde(default)]
    pub breach: String,
    #[serde(default)]
    pub refuge: String,
    #[serde(default)]
    pub wildcry: String,
    #[serde(default)]
    pub dragons_call: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "blank_faction")]
    pub faction: Option<FactionName>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub wyrmspells: TeamWyrmspells,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

/// Teams store "no faction" as an empty string
mod blank_faction {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<FactionName>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(faction) => s.serialize_str(faction.name()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FactionName>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(FactionName::from_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_quality_and_class_fall_back() {
        let json = r#"{"name": "Nova", "quality": "LR", "character_class": "Bard"}"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.quality, Quality::Unknown);
        assert_eq!(character.character_class, CharacterClass::Unknown);
        assert!(character.is_global, "is_global defaults to true");
    }

    #[test]
    fn test_team_blank_faction() {
        let json = r#"{"name": "Burn", "faction": "", "members": []}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.faction, None);

        let out = serde_json::to_value(&team).unwrap();
        assert_eq!(out["faction"], "");

        let json = r#"{"name": "Burn", "faction": "Wild Spirit"}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.faction, Some(FactionName::WildSpirit));
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("S+".parse::<Tier>(), Ok(Tier::SPlus));
        assert_eq!(" D ".parse::<Tier>(), Ok(Tier::D));
        assert!("Z".parse::<Tier>().is_err());
        assert!(Tier::SPlus.rank() < Tier::D.rank());
    }

    #[test]
    fn test_status_effect_accepts_state_alias() {
        let json = r#"{"name": "Burn", "state": "Debuff"}"#;
        let effect: StatusEffect = serde_json::from_str(json).unwrap();
        assert_eq!(effect.effect_type, StatusEffectType::Debuff);
    }
}
