//! Zone registry for the builders
//!
//! A zone is a named drop target (the available pool, the bench, a team
//! slot or a tier bucket) holding an ordered list of entity ids. The
//! registry guarantees an entity sits in at most one zone at a time.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::data::model::Tier;

/// Number of team slots in a team composition
pub const TEAM_SLOTS: u8 = 6;

/// Entities are identified by character name
pub type EntityId = String;

/// Named drop zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneId {
    /// Pool of everything not yet placed
    Available,
    /// Holding area for team candidates that are not in a slot
    Bench,
    /// Team slot 0-5
    Slot(u8),
    /// Tier list bucket
    Tier(Tier),
}

impl ZoneId {
    /// All six team slots in order
    pub fn team_slots() -> impl Iterator<Item = ZoneId> {
        (0..TEAM_SLOTS).map(ZoneId::Slot)
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, ZoneId::Slot(_))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Available => f.write_str("available"),
            ZoneId::Bench => f.write_str("bench"),
            ZoneId::Slot(i) => write!(f, "slot-{}", i),
            ZoneId::Tier(tier) => f.write_str(tier.label()),
        }
    }
}

impl FromStr for ZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "available" => return Ok(ZoneId::Available),
            "bench" => return Ok(ZoneId::Bench),
            _ => {}
        }

        if let Some(index) = s.strip_prefix("slot-") {
            return match index.parse::<u8>() {
                Ok(i) if i < TEAM_SLOTS => Ok(ZoneId::Slot(i)),
                _ => Err(format!(
                    "Unknown slot: '{}'. Valid slots: slot-0 to slot-{}",
                    s,
                    TEAM_SLOTS - 1
                )),
            };
        }

        s.parse::<Tier>()
            .map(ZoneId::Tier)
            .map_err(|_| format!("Unknown zone: '{}'", s))
    }
}

/// How many entities a zone accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Unbounded,
    Fixed(usize),
}

impl Capacity {
    pub fn allows(&self, count: usize) -> bool {
        match self {
            Capacity::Unbounded => true,
            Capacity::Fixed(max) => count <= *max,
        }
    }
}

/// Why a placement was refused. The registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    UnknownEntity(EntityId),
    UnknownZone(ZoneId),
    ZoneFull(ZoneId),
    AlreadyPlaced { entity: EntityId, zone: ZoneId },
    /// Overdrive orders only apply to team slot occupants
    NotInTeam(EntityId),
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignError::UnknownEntity(entity) => write!(f, "unknown character '{}'", entity),
            AssignError::UnknownZone(zone) => write!(f, "zone '{}' does not exist here", zone),
            AssignError::ZoneFull(zone) => write!(f, "zone '{}' is full", zone),
            AssignError::AlreadyPlaced { entity, zone } => {
                write!(f, "'{}' is already placed in '{}'", entity, zone)
            }
            AssignError::NotInTeam(entity) => write!(f, "'{}' is not in a team slot", entity),
        }
    }
}

impl std::error::Error for AssignError {}

/// A single zone and its occupants, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub capacity: Capacity,
    occupants: SmallVec<[EntityId; 6]>,
}

impl Zone {
    pub fn new(id: ZoneId, capacity: Capacity) -> Self {
        Self {
            id,
            capacity,
            occupants: SmallVec::new(),
        }
    }

    pub fn occupants(&self) -> &[EntityId] {
        &self.occupants
    }

    pub fn is_full(&self) -> bool {
        !self.capacity.allows(self.occupants.len() + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.occupants.iter().any(|e| e == entity)
    }
}

/// Ordered set of zones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style zone registration. Registering an id twice replaces its capacity.
    pub fn with_zone(mut self, id: ZoneId, capacity: Capacity) -> Self {
        match self.zone_mut(id) {
            Some(zone) => zone.capacity = capacity,
            None => self.zones.push(Zone::new(id, capacity)),
        }
        self
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    pub fn has_zone(&self, id: ZoneId) -> bool {
        self.zone(id).is_some()
    }

    pub fn set_capacity(&mut self, id: ZoneId, capacity: Capacity) -> Result<(), AssignError> {
        let zone = self.zone_mut(id).ok_or(AssignError::UnknownZone(id))?;
        zone.capacity = capacity;
        Ok(())
    }

    /// Occupants of a zone, empty if the zone does not exist
    pub fn occupants(&self, id: ZoneId) -> &[EntityId] {
        self.zone(id).map(Zone::occupants).unwrap_or(&[])
    }

    pub fn is_full(&self, id: ZoneId) -> bool {
        self.zone(id).map(Zone::is_full).unwrap_or(true)
    }

    /// Zone currently holding `entity`
    pub fn locate(&self, entity: &str) -> Option<ZoneId> {
        self.zones.iter().find(|z| z.contains(entity)).map(|z| z.id)
    }

    /// Zone and position of `entity`
    pub fn position(&self, entity: &str) -> Option<(ZoneId, usize)> {
        self.zones.iter().find_map(|z| {
            z.occupants
                .iter()
                .position(|e| e == entity)
                .map(|index| (z.id, index))
        })
    }

    /// Place an entity that is not in any zone. `index` is clamped to the
    /// zone length; `None` appends.
    pub fn insert(&mut self, entity: &str, id: ZoneId, index: Option<usize>) -> Result<(), AssignError> {
        if let Some(zone) = self.locate(entity) {
            return Err(AssignError::AlreadyPlaced {
                entity: entity.to_string(),
                zone,
            });
        }

        let zone = self.zone_mut(id).ok_or(AssignError::UnknownZone(id))?;
        if zone.is_full() {
            return Err(AssignError::ZoneFull(id));
        }

        let index = index.unwrap_or(zone.occupants.len()).min(zone.occupants.len());
        zone.occupants.insert(index, entity.to_string());
        Ok(())
    }

    /// Take an entity out of whatever zone holds it
    pub fn remove(&mut self, entity: &str) -> Option<(ZoneId, usize)> {
        let (id, index) = self.position(entity)?;
        let zone = self.zone_mut(id)?;
        zone.occupants.remove(index);
        Some((id, index))
    }

    /// Every placed entity, zone by zone
    pub fn entities(&self) -> impl Iterator<Item = &EntityId> {
        self.zones.iter().flat_map(|z| z.occupants.iter())
    }

    pub fn len(&self) -> usize {
        self.zones.iter().map(|z| z.occupants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id_round_trip() {
        for id in [
            ZoneId::Available,
            ZoneId::Bench,
            ZoneId::Slot(0),
            ZoneId::Slot(5),
            ZoneId::Tier(Tier::SPlus),
            ZoneId::Tier(Tier::D),
        ] {
            assert_eq!(id.to_string().parse::<ZoneId>(), Ok(id));
        }
    }

    #[test]
    fn test_zone_id_rejects_unknown() {
        assert!("slot-6".parse::<ZoneId>().is_err());
        assert!("slot-x".parse::<ZoneId>().is_err());
        assert!("graveyard".parse::<ZoneId>().is_err());
    }

    #[test]
    fn test_insert_respects_capacity() {
        let mut zones = ZoneRegistry::new()
            .with_zone(ZoneId::Available, Capacity::Unbounded)
            .with_zone(ZoneId::Slot(0), Capacity::Fixed(1));

        zones.insert("Astra", ZoneId::Slot(0), None).unwrap();
        assert_eq!(
            zones.insert("Brann", ZoneId::Slot(0), None),
            Err(AssignError::ZoneFull(ZoneId::Slot(0)))
        );
        assert_eq!(zones.locate("Brann"), None);
    }

    #[test]
    fn test_entity_lives_in_one_zone() {
        let mut zones = ZoneRegistry::new()
            .with_zone(ZoneId::Available, Capacity::Unbounded)
            .with_zone(ZoneId::Bench, Capacity::Unbounded);

        zones.insert("Astra", ZoneId::Available, None).unwrap();
        let err = zones.insert("Astra", ZoneId::Bench, None).unwrap_err();
        assert!(matches!(err, AssignError::AlreadyPlaced { .. }));
        assert_eq!(zones.len(), 1);
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let mut zones = ZoneRegistry::new().with_zone(ZoneId::Tier(Tier::A), Capacity::Unbounded);
        zones.insert("A1", ZoneId::Tier(Tier::A), None).unwrap();
        zones.insert("A2", ZoneId::Tier(Tier::A), Some(99)).unwrap();
        zones.insert("A0", ZoneId::Tier(Tier::A), Some(0)).unwrap();
        assert_eq!(zones.occupants(ZoneId::Tier(Tier::A)), &["A0", "A1", "A2"]);

        assert_eq!(zones.remove("A1"), Some((ZoneId::Tier(Tier::A), 1)));
        assert_eq!(zones.remove("A1"), None);
    }
}
