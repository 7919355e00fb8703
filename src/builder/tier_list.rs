//! Tier list builder
//!
//! Characters are dragged from the available pool into six ordered tier
//! buckets. Position inside a bucket is meaningful, so drops can target an
//! index, which doubles as reordering within a bucket.

use bevy::prelude::*;
use std::collections::HashMap;

use super::zones::{AssignError, Capacity, EntityId, ZoneId, ZoneRegistry};
use crate::data::model::{Tier, TierEntry, TierList};
use crate::data::Catalog;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierListMeta {
    pub name: String,
    pub author: String,
    pub content_type: String,
    pub description: String,
}

#[derive(Resource, Debug, Clone)]
pub struct TierListBuilder {
    roster: Vec<EntityId>,
    zones: ZoneRegistry,
    notes: HashMap<EntityId, String>,
    pub meta: TierListMeta,
}

impl Default for TierListBuilder {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl TierListBuilder {
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
            notes: HashMap::new(),
            meta: TierListMeta::default(),
        };
        builder.reset_zones();
        builder
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.character_names())
    }

    fn reset_zones(&mut self) {
        let mut zones = ZoneRegistry::new().with_zone(ZoneId::Available, Capacity::Unbounded);
        for tier in Tier::all() {
            zones = zones.with_zone(ZoneId::Tier(*tier), Capacity::Unbounded);
        }
        for name in &self.roster {
            let _ = zones.insert(name, ZoneId::Available, None);
        }
        self.zones = zones;
    }

    /// Append `entity` to the end of `target`
    pub fn assign(&mut self, entity: &str, target: ZoneId) -> Result<(), AssignError> {
        self.assign_at(entity, target, None)
    }

    /// Place `entity` at `index` in `target` (clamped; `None` appends).
    /// Within the same zone this reorders.
    pub fn assign_at(&mut self, entity: &str, target: ZoneId, index: Option<usize>) -> Result<(), AssignError> {
        if self.zones.locate(entity).is_none() {
            return Err(AssignError::UnknownEntity(entity.to_string()));
        }
        if !self.zones.has_zone(target) {
            return Err(AssignError::UnknownZone(target));
        }

        let mut next = self.zones.clone();
        next.remove(entity);
        next.insert(entity, target, index)?;
        self.zones = next;

        if target == ZoneId::Available {
            self.notes.remove(entity);
        }
        debug!("Tier list: {} -> {} at {:?}", entity, target, index);
        Ok(())
    }

    pub fn tier_of(&self, entity: &str) -> Option<Tier> {
        match self.zones.locate(entity)? {
            ZoneId::Tier(tier) => Some(tier),
            _ => None,
        }
    }

    pub fn tier(&self, tier: Tier) -> &[EntityId] {
        self.zones.occupants(ZoneId::Tier(tier))
    }

    pub fn available(&self) -> &[EntityId] {
        self.zones.occupants(ZoneId::Available)
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn ranked_count(&self) -> usize {
        Tier::all().iter().map(|t| self.tier(*t).len()).sum()
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

    pub fn clear(&mut self) {
        self.reset_zones();
        self.notes.clear();
    }

    /// Load an existing tier list, skipping characters not in the roster
    pub fn load_tier_list(&mut self, list: &TierList) {
        self.clear();
        self.meta = TierListMeta {
            name: list.name.clone(),
            author: list.author.clone(),
            content_type: list.content_type.clone(),
            description: list.description.clone(),
        };

        for entry in &list.entries {
            let name = entry.character_name.as_str();
            match self.assign(name, ZoneId::Tier(entry.tier)) {
                Ok(()) => {
                    let _ = self.set_note(name, entry.note.clone());
                }
                Err(e) => warn!("Tier list '{}': {} skipped ({})", list.name, name, e),
            }
        }
    }

    /// Ranked entries in tier order, then bucket position
    pub fn to_tier_list(&self) -> TierList {
        let entries = Tier::all()
            .iter()
            .flat_map(|tier| {
                self.tier(*tier).iter().map(move |name| TierEntry {
                    character_name: name.clone(),
                    tier: *tier,
                    note: self.note(name).to_string(),
                })
            })
            .collect();

        TierList {
            name: self.meta.name.clone(),
            author: self.meta.author.clone(),
            content_type: self.meta.content_type.clone(),
            description: self.meta.description.clone(),
            entries,
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TierListBuilder {
        TierListBuilder::new(["Astra", "Brann", "Celes", "Dax"])
    }

    #[test]
    fn test_index_inserts_and_reorders() {
        let mut b = builder();
        b.assign("Astra", ZoneId::Tier(Tier::S)).unwrap();
        b.assign("Brann", ZoneId::Tier(Tier::S)).unwrap();
        b.assign_at("Celes", ZoneId::Tier(Tier::S), Some(0)).unwrap();
        assert_eq!(b.tier(Tier::S), ["Celes", "Astra", "Brann"]);

        // Moving within the same bucket is a reorder
        b.assign_at("Brann", ZoneId::Tier(Tier::S), Some(1)).unwrap();
        assert_eq!(b.tier(Tier::S), ["Celes", "Brann", "Astra"]);

        // Out-of-range indices clamp to the end
        b.assign_at("Dax", ZoneId::Tier(Tier::S), Some(99)).unwrap();
        assert_eq!(b.tier(Tier::S).last().map(String::as_str), Some("Dax"));
        assert!(b.available().is_empty());
    }

    #[test]
    fn test_team_zones_do_not_exist() {
        let mut b = builder();
        let err = b.assign("Astra", ZoneId::Slot(0)).unwrap_err();
        assert_eq!(err, AssignError::UnknownZone(ZoneId::Slot(0)));
        assert_eq!(b.available().len(), 4);
    }

    #[test]
    fn test_returning_to_pool_drops_note() {
        let mut b = builder();
        b.assign("Astra", ZoneId::Tier(Tier::A)).unwrap();
        b.set_note("Astra", "great on bosses").unwrap();
        assert_eq!(b.note("Astra"), "great on bosses");

        b.assign("Astra", ZoneId::Available).unwrap();
        assert_eq!(b.note("Astra"), "");
        assert_eq!(b.tier_of("Astra"), None);
    }

    #[test]
    fn test_export_orders_by_tier_then_position() {
        let mut b = builder();
        b.assign("Dax", ZoneId::Tier(Tier::D)).unwrap();
        b.assign("Brann", ZoneId::Tier(Tier::SPlus)).unwrap();
        b.assign("Astra", ZoneId::Tier(Tier::D)).unwrap();

        let list = b.to_tier_list();
        let names: Vec<&str> = list.entries.iter().map(|e| e.character_name.as_str()).collect();
        assert_eq!(names, vec!["Brann", "Dax", "Astra"]);
        assert_eq!(b.ranked_count(), 3);
    }

    #[test]
    fn test_load_skips_unknown_characters() {
        let list = TierList {
            name: "Arena".to_string(),
            entries: vec![
                TierEntry {
                    character_name: "Celes".to_string(),
                    tier: Tier::S,
                    note: "heals".to_string(),
                },
                TierEntry {
                    character_name: "Nobody".to_string(),
                    tier: Tier::A,
                    note: String::new(),
                },
            ],
            ..Default::default()
        };

        let mut b = builder();
        b.assign("Astra", ZoneId::Tier(Tier::B)).unwrap();
        b.load_tier_list(&list);

        assert_eq!(b.meta.name, "Arena");
        assert_eq!(b.tier(Tier::S), ["Celes"]);
        assert_eq!(b.note("Celes"), "heals");
        assert!(b.tier(Tier::B).is_empty(), "load starts from a cleared builder");
        assert_eq!(b.ranked_count(), 1);
    }
}
