//! Team builder assignment engine
//!
//! Characters move between the available pool, the bench and six
//! single-occupant team slots. Dropping onto an occupied slot either swaps
//! (when the dragged character came from another slot) or bumps the
//! occupant to the bench. A subset of slot occupants carries an overdrive
//! priority, kept as a compact 1..=k ordering.

use bevy::prelude::*;
use std::collections::HashMap;

use super::zones::{AssignError, Capacity, EntityId, ZoneId, ZoneRegistry, TEAM_SLOTS};
use crate::data::model::{FactionName, Team, TeamMember, TeamWyrmspells};
use crate::data::Catalog;

/// What a successful assignment did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Source and target were the same zone
    Unchanged,
    /// Placed from a pool into an empty slot
    Inserted,
    /// Moved into an empty slot or onto a pool
    Moved { from: ZoneId },
    /// Slot-to-slot drop onto an occupant, who took the vacated slot
    Swapped { with: EntityId },
    /// Pool-to-slot drop onto an occupant, who went to the bench
    Bumped { occupant: EntityId },
}

/// Placement plus the overdrive ordering after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOutcome {
    pub placement: Placement,
    pub overdrive: Vec<EntityId>,
}

/// Submission metadata edited alongside the composition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamMeta {
    pub name: String,
    pub author: String,
    pub content_type: String,
    pub description: String,
    pub faction: Option<FactionName>,
    pub wyrmspells: TeamWyrmspells,
}

#[derive(Resource, Debug, Clone)]
pub struct TeamBuilder {
    /// Roster in its original order; `clear` restores the pool to it
    roster: Vec<EntityId>,
    zones: ZoneRegistry,
    overdrive: Vec<EntityId>,
    notes: HashMap<EntityId, String>,
    substitutes: HashMap<EntityId, Vec<String>>,
    pub meta: TeamMeta,
}

impl Default for TeamBuilder {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl TeamBuilder {
    /// Start with every roster character in the available pool. Duplicates are dropped.
    pub fn new<I, S>(roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<EntityId> = Vec::new();
        for name in roster {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let mut builder = Self {
            roster: unique,
            zones: ZoneRegistry::new(),
            overdrive: Vec::new(),
            notes: HashMap::new(),
            substitutes: HashMap::new(),
            meta: TeamMeta::default(),
        };
        builder.reset_zones(Capacity::Unbounded);
        builder
    }

    /// Roster taken from every character in the catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.character_names())
    }

    /// Cap the bench. Fails if the bench already holds more than `max`.
    pub fn with_bench_capacity(mut self, max: usize) -> Result<Self, AssignError> {
        if self.bench().len() > max {
            return Err(AssignError::ZoneFull(ZoneId::Bench));
        }
        self.zones.set_capacity(ZoneId::Bench, Capacity::Fixed(max))?;
        Ok(self)
    }

    fn reset_zones(&mut self, bench_capacity: Capacity) {
        let mut zones = ZoneRegistry::new()
            .with_zone(ZoneId::Available, Capacity::Unbounded)
            .with_zone(ZoneId::Bench, bench_capacity);
        for slot in ZoneId::team_slots() {
            zones = zones.with_zone(slot, Capacity::Fixed(1));
        }
        for name in &self.roster {
            // Roster names are unique and the pool is unbounded
            let _ = zones.insert(name, ZoneId::Available, None);
        }
        self.zones = zones;
    }

    /// Drag `entity` onto `target`. On error nothing changes.
    pub fn assign(&mut self, entity: &str, target: ZoneId) -> Result<AssignOutcome, AssignError> {
        let from = self
            .zones
            .locate(entity)
            .ok_or_else(|| AssignError::UnknownEntity(entity.to_string()))?;
        if !self.zones.has_zone(target) {
            return Err(AssignError::UnknownZone(target));
        }

        if from == target {
            return Ok(self.outcome(Placement::Unchanged));
        }

        // Work on a copy so a refused move leaves the builder untouched
        let mut next = self.zones.clone();
        let placement = match target {
            ZoneId::Slot(_) => {
                let occupant = next.occupants(target).first().cloned();
                match occupant {
                    None => {
                        next.remove(entity);
                        next.insert(entity, target, None)?;
                        if from.is_slot() {
                            Placement::Moved { from }
                        } else {
                            Placement::Inserted
                        }
                    }
                    Some(occupant) if from.is_slot() => {
                        next.remove(entity);
                        next.remove(&occupant);
                        next.insert(entity, target, None)?;
                        next.insert(&occupant, from, None)?;
                        Placement::Swapped { with: occupant }
                    }
                    Some(occupant) => {
                        next.remove(entity);
                        next.remove(&occupant);
                        next.insert(&occupant, ZoneId::Bench, None)?;
                        next.insert(entity, target, None)?;
                        Placement::Bumped { occupant }
                    }
                }
            }
            _ => {
                next.remove(entity);
                next.insert(entity, target, None)?;
                Placement::Moved { from }
            }
        };

        self.zones = next;
        self.sync_overdrive();

        debug!("Team builder: {} -> {} ({:?})", entity, target, placement);
        Ok(self.outcome(placement))
    }

    fn outcome(&self, placement: Placement) -> AssignOutcome {
        AssignOutcome {
            placement,
            overdrive: self.overdrive.clone(),
        }
    }

    /// Drop overdrive orders of anyone who left the team slots
    fn sync_overdrive(&mut self) {
        let zones = &self.zones;
        self.overdrive
            .retain(|e| zones.locate(e).map(|z| z.is_slot()).unwrap_or(false));
    }

    fn require_in_team(&self, entity: &str) -> Result<(), AssignError> {
        match self.zones.locate(entity) {
            Some(zone) if zone.is_slot() => Ok(()),
            Some(_) => Err(AssignError::NotInTeam(entity.to_string())),
            None => Err(AssignError::UnknownEntity(entity.to_string())),
        }
    }

    /// Add `entity` at the end of the overdrive order, or remove it if it
    /// already has one. Returns the new order, `None` when removed.
    pub fn toggle_overdrive(&mut self, entity: &str) -> Result<Option<u8>, AssignError> {
        self.require_in_team(entity)?;
        if let Some(pos) = self.overdrive.iter().position(|e| e == entity) {
            self.overdrive.remove(pos);
            Ok(None)
        } else {
            self.overdrive.push(entity.to_string());
            Ok(Some(self.overdrive.len() as u8))
        }
    }

    /// Move `entity` to overdrive position `order`, shifting the others.
    /// The order is clamped to `1..=k`; returns the order actually taken.
    pub fn set_overdrive_order(&mut self, entity: &str, order: u8) -> Result<u8, AssignError> {
        self.require_in_team(entity)?;
        self.overdrive.retain(|e| e != entity);
        let index = (order.max(1) as usize - 1).min(self.overdrive.len());
        self.overdrive.insert(index, entity.to_string());
        Ok(index as u8 + 1)
    }

    pub fn overdrive_order(&self, entity: &str) -> Option<u8> {
        self.overdrive
            .iter()
            .position(|e| e == entity)
            .map(|i| i as u8 + 1)
    }

    pub fn overdrive(&self) -> &[EntityId] {
        &self.overdrive
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    pub fn locate(&self, entity: &str) -> Option<ZoneId> {
        self.zones.locate(entity)
    }

    pub fn slot(&self, index: u8) -> Option<&EntityId> {
        self.zones.occupants(ZoneId::Slot(index)).first()
    }

    /// Slot occupants in slot order
    pub fn members(&self) -> Vec<(u8, &EntityId)> {
        (0..TEAM_SLOTS)
            .filter_map(|i| self.slot(i).map(|e| (i, e)))
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members().len()
    }

    pub fn available(&self) -> &[EntityId] {
        self.zones.occupants(ZoneId::Available)
    }

    pub fn bench(&self) -> &[EntityId] {
        self.zones.occupants(ZoneId::Bench)
    }

    pub fn set_note(&mut self, entity: &str, note: impl Into<String>) -> Result<(), AssignError> {
        if self.zones.locate(entity).is_none() {
            return Err(AssignError::UnknownEntity(entity.to_string()));
        }
        let note = note.into();
        if note.is_empty() {
            self.notes.remove(entity);
        } else {
            self.notes.insert(entity.to_string(), note);
        }
        Ok(())
    }

    pub fn note(&self, entity: &str) -> &str {
        self.notes.get(entity).map(String::as_str).unwrap_or("")
    }

    pub fn set_substitutes(&mut self, entity: &str, substitutes: Vec<String>) -> Result<(), AssignError> {
        if self.zones.locate(entity).is_none() {
            return Err(AssignError::UnknownEntity(entity.to_string()));
        }
        self.substitutes.insert(entity.to_string(), substitutes);
        Ok(())
    }

    pub fn substitutes(&self, entity: &str) -> &[String] {
        self.substitutes.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Return every character to the pool and drop overdrive, notes and substitutes.
    /// Metadata and the bench capacity are kept.
    pub fn clear(&mut self) {
        let bench_capacity = self
            .zones
            .zone(ZoneId::Bench)
            .map(|z| z.capacity)
            .unwrap_or(Capacity::Unbounded);
        self.reset_zones(bench_capacity);
        self.overdrive.clear();
        self.notes.clear();
        self.substitutes.clear();
    }

    /// Load an existing team. Members missing from the roster or listed twice
    /// are skipped; members past the sixth go to the bench.
    pub fn load_team(&mut self, team: &Team) {
        self.clear();
        self.meta = TeamMeta {
            name: team.name.clone(),
            author: team.author.clone(),
            content_type: team.content_type.clone(),
            description: team.description.clone(),
            faction: team.faction,
            wyrmspells: team.wyrmspells.clone(),
        };

        let mut next_slot = 0u8;
        for member in &team.members {
            let name = member.character_name.as_str();
            match self.zones.locate(name) {
                None => {
                    warn!("Team '{}': unknown character '{}' skipped", team.name, name);
                    continue;
                }
                Some(ZoneId::Available) => {}
                Some(_) => {
                    warn!("Team '{}': duplicate member '{}' skipped", team.name, name);
                    continue;
                }
            }

            let target = if next_slot < TEAM_SLOTS {
                next_slot += 1;
                ZoneId::Slot(next_slot - 1)
            } else {
                ZoneId::Bench
            };
            if let Err(e) = self.assign(name, target) {
                warn!("Team '{}': could not place '{}': {}", team.name, name, e);
                continue;
            }

            let _ = self.set_note(name, member.note.clone());
            if !member.substitutes.is_empty() {
                let _ = self.set_substitutes(name, member.substitutes.clone());
            }
        }

        let mut ordered: Vec<(u8, &str)> = team
            .members
            .iter()
            .filter_map(|m| m.overdrive_order.map(|o| (o, m.character_name.as_str())))
            .collect();
        ordered.sort_by_key(|(order, _)| *order);
        for (_, name) in ordered {
            if self.require_in_team(name).is_ok() && self.overdrive_order(name).is_none() {
                self.overdrive.push(name.to_string());
            }
        }
    }

    /// Snapshot the composition as a team record, members in slot order
    pub fn to_team(&self) -> Team {
        let members = self
            .members()
            .into_iter()
            .map(|(_, name)| TeamMember {
                character_name: name.clone(),
                overdrive_order: self.overdrive_order(name),
                substitutes: self.substitutes(name).to_vec(),
                note: self.note(name).to_string(),
            })
            .collect();

        Team {
            name: self.meta.name.clone(),
            author: self.meta.author.clone(),
            content_type: self.meta.content_type.clone(),
            description: self.meta.description.clone(),
            faction: self.meta.faction,
            members,
            wyrmspells: self.meta.wyrmspells.clone(),
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TeamBuilder {
        TeamBuilder::new(["Astra", "Brann", "Celes", "Dax", "Eira", "Fenn", "Gale"])
    }

    #[test]
    fn test_duplicates_in_roster_are_dropped() {
        let builder = TeamBuilder::new(["Astra", "Astra", "Brann"]);
        assert_eq!(builder.available().len(), 2);
    }

    #[test]
    fn test_same_zone_is_unchanged() {
        let mut b = builder();
        let outcome = b.assign("Astra", ZoneId::Available).unwrap();
        assert_eq!(outcome.placement, Placement::Unchanged);
    }

    #[test]
    fn test_tier_zone_is_unknown_here() {
        let mut b = builder();
        let err = b
            .assign("Astra", ZoneId::Tier(crate::data::model::Tier::S))
            .unwrap_err();
        assert!(matches!(err, AssignError::UnknownZone(_)));
    }

    #[test]
    fn test_overdrive_requires_team_slot() {
        let mut b = builder();
        assert_eq!(
            b.toggle_overdrive("Astra"),
            Err(AssignError::NotInTeam("Astra".to_string()))
        );
        assert_eq!(
            b.toggle_overdrive("Nobody"),
            Err(AssignError::UnknownEntity("Nobody".to_string()))
        );
    }

    #[test]
    fn test_clear_restores_roster_order() {
        let mut b = builder();
        b.assign("Celes", ZoneId::Slot(0)).unwrap();
        b.assign("Astra", ZoneId::Bench).unwrap();
        b.toggle_overdrive("Celes").unwrap();
        b.clear();
        assert_eq!(b.available(), builder().available());
        assert!(b.overdrive().is_empty());
    }
}
