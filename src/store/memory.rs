use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::events::{filter_events, EventFilter, ManeuverEvent};
use crate::race::{Boat, BoatId, RaceConfig, RaceId};
use crate::store::{RaceProvider, StoreError, TrackStore};
use crate::track::{window_points, RawFix, TrackPoint};

#[derive(Debug, Default)]
pub struct MemoryStore {
    races: HashMap<RaceId, RaceConfig>,
    boats: HashMap<BoatId, Boat>,
    raw: HashMap<BoatId, Vec<RawFix>>,
    points: HashMap<BoatId, Vec<TrackPoint>>,
    events: HashMap<BoatId, Vec<ManeuverEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_race(&mut self, race: RaceConfig) {
        self.races.insert(race.id, race);
    }

    /// Register a boat; its race must already be known.
    pub fn insert_boat(&mut self, boat: Boat) -> Result<(), StoreError> {
        if !self.races.contains_key(&boat.race_id) {
            return Err(StoreError::RaceNotFound(boat.race_id));
        }
        self.boats.insert(boat.id, boat);
        Ok(())
    }

    pub fn boat(&self, id: BoatId) -> Result<&Boat, StoreError> {
        self.boats.get(&id).ok_or(StoreError::BoatNotFound(id))
    }

    /// Boats of a race ordered by id.
    pub fn boats_in_race(&self, race: RaceId) -> Vec<&Boat> {
        let mut boats: Vec<&Boat> = self.boats.values().filter(|b| b.race_id == race).collect();
        boats.sort_by_key(|b| b.id);
        boats
    }

    /// Append uploaded fixes to a boat's raw track.
    pub fn append_raw_fixes(&mut self, boat: BoatId, fixes: Vec<RawFix>) -> Result<(), StoreError> {
        self.boat(boat)?;
        self.raw.entry(boat).or_default().extend(fixes);
        Ok(())
    }

    /// The full resampled track of a boat.
    pub fn track(&self, boat: BoatId) -> Result<&[TrackPoint], StoreError> {
        self.boat(boat)?;
        Ok(self.points.get(&boat).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl TrackStore for MemoryStore {
    fn raw_fixes(&self, boat: BoatId) -> Result<Vec<RawFix>, StoreError> {
        self.boat(boat)?;
        Ok(self.raw.get(&boat).cloned().unwrap_or_default())
    }

    fn write_points(&mut self, boat: BoatId, points: Vec<TrackPoint>) -> Result<(), StoreError> {
        self.boat(boat)?;
        self.points.insert(boat, points);
        Ok(())
    }

    fn points(
        &self,
        boat: BoatId,
        t0: DateTime<Utc>,
        t1: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>, StoreError> {
        Ok(window_points(self.track(boat)?, t0, t1).to_vec())
    }

    fn replace_events(
        &mut self,
        boat: BoatId,
        mut events: Vec<ManeuverEvent>,
    ) -> Result<(), StoreError> {
        self.boat(boat)?;
        events.sort_by_key(|e| e.timestamp);
        self.events.insert(boat, events);
        Ok(())
    }

    fn events(
        &self,
        boat: BoatId,
        filter: &EventFilter,
    ) -> Result<Vec<ManeuverEvent>, StoreError> {
        self.boat(boat)?;
        Ok(self
            .events
            .get(&boat)
            .map(|events| filter_events(events, filter))
            .unwrap_or_default())
    }
}

impl RaceProvider for MemoryStore {
    fn race_for_boat(&self, boat: BoatId) -> Result<RaceConfig, StoreError> {
        let race_id = self.boat(boat)?.race_id;
        self.races
            .get(&race_id)
            .cloned()
            .ok_or(StoreError::RaceNotFound(race_id))
    }
}
