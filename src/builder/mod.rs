//! Drag-and-drop builders
//!
//! The zone registry is shared by the tier list and team builders; the
//! UI only ever calls `assign` and renders what the registry reports.

pub mod export;
pub mod synergy;
pub mod synergy_config;
pub mod team;
pub mod tier_list;
pub mod zones;

pub use export::{issue_title, to_issue_body};
pub use synergy::{score_builder, score_roster, score_team, SignalKind, SynergyReport, SynergySignal};
pub use synergy_config::{SynergyConfig, SynergyConfigPlugin};
pub use team::{AssignOutcome, Placement, TeamBuilder, TeamMeta};
pub use tier_list::{TierListBuilder, TierListMeta};
pub use zones::{AssignError, Capacity, EntityId, ZoneId, ZoneRegistry, TEAM_SLOTS};
