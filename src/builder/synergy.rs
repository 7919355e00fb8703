//! Team synergy scoring
//!
//! A linear heuristic over simple counts: how full the team is, how many
//! classes it mixes, whether it has a frontline and sustain, how many
//! members share a faction and how many overdrive users it runs. Each
//! signal is a strength in `0..=1` scaled by its weight.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::synergy_config::SynergyConfig;
use super::team::TeamBuilder;
use super::zones::TEAM_SLOTS;
use crate::data::model::{Character, CharacterClass, FactionName, Team};
use crate::data::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    RosterFill,
    ClassDiversity,
    RoleCoverage,
    FactionOverlap,
    OverdriveSaturation,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::RosterFill => "Roster fill",
            SignalKind::ClassDiversity => "Class diversity",
            SignalKind::RoleCoverage => "Role coverage",
            SignalKind::FactionOverlap => "Faction overlap",
            SignalKind::OverdriveSaturation => "Overdrive saturation",
        }
    }
}

/// One scored signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergySignal {
    pub kind: SignalKind,
    /// Strength in 0..=1
    pub value: f32,
    pub weight: f32,
    /// `value * weight`
    pub points: f32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyReport {
    /// Overall score, 0..=100
    pub score: u8,
    pub signals: Vec<SynergySignal>,
    pub recommendations: Vec<String>,
}

impl SynergyReport {
    pub fn signal(&self, kind: SignalKind) -> Option<&SynergySignal> {
        self.signals.iter().find(|s| s.kind == kind)
    }
}

/// Score a roster of resolved characters
pub fn score_roster(
    roster: &[&Character],
    overdrive_count: usize,
    faction: Option<FactionName>,
    config: &SynergyConfig,
) -> SynergyReport {
    let n = roster.len();
    let weights = &config.weights;
    let slots = TEAM_SLOTS as usize;

    // Roster fill
    let fill = (n as f32 / slots as f32).min(1.0);

    // Class diversity
    let classes: HashSet<CharacterClass> = roster
        .iter()
        .map(|c| c.character_class)
        .filter(|c| *c != CharacterClass::Unknown)
        .collect();
    let diversity_target = n.min(config.ideal_classes);
    let diversity = if diversity_target == 0 {
        0.0
    } else {
        (classes.len() as f32 / diversity_target as f32).min(1.0)
    };

    // Role coverage
    let has_frontline = roster.iter().any(|c| c.character_class.is_frontline());
    let has_sustain = roster.iter().any(|c| c.character_class.is_sustain());
    let roles = 0.5 * has_frontline as u8 as f32 + 0.5 * has_sustain as u8 as f32;

    // Faction overlap: the chosen faction, or the most shared one
    let mut faction_counts: BTreeMap<FactionName, usize> = BTreeMap::new();
    for character in roster {
        for f in character.factions.iter().filter(|f| **f != FactionName::Unknown) {
            *faction_counts.entry(*f).or_default() += 1;
        }
    }
    let (focus_faction, shared) = match faction {
        Some(f) => (Some(f), faction_counts.get(&f).copied().unwrap_or(0)),
        None => faction_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(f, count)| (Some(*f), *count))
            .unwrap_or((None, 0)),
    };
    let overlap = if n == 0 { 0.0 } else { shared as f32 / n as f32 };

    // Overdrive saturation
    let ideal_overdrive = config.ideal_overdrive.max(1);
    let saturation = if n == 0 {
        0.0
    } else {
        let distance = (overdrive_count as f32 - ideal_overdrive as f32).abs();
        (1.0 - distance / ideal_overdrive as f32).clamp(0.0, 1.0)
    };

    let faction_label = focus_faction.map(|f| f.name()).unwrap_or("any faction");
    let signals = vec![
        signal(
            SignalKind::RosterFill,
            fill,
            weights.roster_fill,
            format!("{}/{} slots filled", n, slots),
        ),
        signal(
            SignalKind::ClassDiversity,
            diversity,
            weights.class_diversity,
            format!("{} distinct classes", classes.len()),
        ),
        signal(
            SignalKind::RoleCoverage,
            roles,
            weights.role_coverage,
            format!(
                "frontline: {}, sustain: {}",
                if has_frontline { "yes" } else { "no" },
                if has_sustain { "yes" } else { "no" }
            ),
        ),
        signal(
            SignalKind::FactionOverlap,
            overlap,
            weights.faction_overlap,
            format!("{}/{} members in {}", shared, n, faction_label),
        ),
        signal(
            SignalKind::OverdriveSaturation,
            saturation,
            weights.overdrive_saturation,
            format!("{} overdrive users (ideal {})", overdrive_count, ideal_overdrive),
        ),
    ];

    let total: f32 = signals.iter().map(|s| s.points).sum();
    let score = total.round().clamp(0.0, 100.0) as u8;

    let recommendations = if n == 0 {
        vec!["Add characters to the team slots to get a synergy estimate.".to_string()]
    } else {
        let mut recs = Vec::new();
        let weak = |kind: SignalKind| {
            signals
                .iter()
                .any(|s| s.kind == kind && s.value < config.weak_signal_threshold)
        };

        if weak(SignalKind::RosterFill) {
            recs.push(format!("Fill the remaining {} team slot(s).", slots.saturating_sub(n)));
        }
        if weak(SignalKind::ClassDiversity) {
            let missing: Vec<&str> = CharacterClass::all()
                .iter()
                .filter(|c| !classes.contains(*c))
                .map(|c| c.name())
                .collect();
            recs.push(format!(
                "Only {} distinct classes; consider adding one of: {}.",
                classes.len(),
                missing.join(", ")
            ));
        }
        if !has_frontline {
            recs.push("Add a Guardian or Warrior to hold the front line.".to_string());
        }
        if !has_sustain {
            recs.push("Add a Priest for sustain.".to_string());
        }
        if weak(SignalKind::FactionOverlap) {
            recs.push(format!(
                "Only {} of {} members share {}; lean into a single faction for its bonuses.",
                shared, n, faction_label
            ));
        }
        if weak(SignalKind::OverdriveSaturation) {
            if overdrive_count < ideal_overdrive {
                recs.push(format!(
                    "Assign overdrive order to {} more member(s).",
                    ideal_overdrive - overdrive_count
                ));
            } else {
                recs.push(format!(
                    "{} overdrive users saturate the gauge; trim to about {}.",
                    overdrive_count, ideal_overdrive
                ));
            }
        }
        recs
    };

    SynergyReport {
        score,
        signals,
        recommendations,
    }
}

fn signal(kind: SignalKind, value: f32, weight: f32, detail: String) -> SynergySignal {
    SynergySignal {
        kind,
        value,
        weight,
        points: value * weight,
        detail,
    }
}

/// Score the team builder's current composition. Slot occupants missing
/// from the catalog are left out of the roster.
pub fn score_builder(builder: &TeamBuilder, catalog: &Catalog, config: &SynergyConfig) -> SynergyReport {
    let roster: Vec<&Character> = builder
        .members()
        .into_iter()
        .filter_map(|(_, name)| catalog.character(name))
        .collect();
    score_roster(&roster, builder.overdrive().len(), builder.meta.faction, config)
}

/// Score a stored team record
pub fn score_team(team: &Team, catalog: &Catalog, config: &SynergyConfig) -> SynergyReport {
    let roster: Vec<&Character> = team
        .members
        .iter()
        .filter_map(|m| catalog.character(&m.character_name))
        .collect();
    let overdrive_count = team
        .members
        .iter()
        .filter(|m| m.overdrive_order.is_some())
        .count();
    score_roster(&roster, overdrive_count, team.faction, config)
}
