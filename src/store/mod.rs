//! Persistence seams for tracks, events and race configuration.
//!
//! The analysis core never touches storage directly; it goes through
//! [`TrackStore`] and [`RaceProvider`]. [`MemoryStore`] implements both and is
//! what the CLI and the tests use.

mod error;
mod memory;

use chrono::{DateTime, Utc};

use crate::events::{EventFilter, ManeuverEvent};
use crate::race::{BoatId, RaceConfig};
use crate::track::{RawFix, TrackPoint};

pub use error::StoreError;
pub use memory::MemoryStore;

pub trait TrackStore {
    /// Raw fixes uploaded for a boat, in arrival order.
    fn raw_fixes(&self, boat: BoatId) -> Result<Vec<RawFix>, StoreError>;

    /// Replace the resampled track of a boat.
    fn write_points(&mut self, boat: BoatId, points: Vec<TrackPoint>) -> Result<(), StoreError>;

    /// Resampled points with `t0 <= timestamp <= t1`, ordered by time.
    fn points(
        &self,
        boat: BoatId,
        t0: DateTime<Utc>,
        t1: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>, StoreError>;

    /// Replace the detected events of a boat.
    fn replace_events(
        &mut self,
        boat: BoatId,
        events: Vec<ManeuverEvent>,
    ) -> Result<(), StoreError>;

    fn events(&self, boat: BoatId, filter: &EventFilter)
        -> Result<Vec<ManeuverEvent>, StoreError>;
}

pub trait RaceProvider {
    fn race_for_boat(&self, boat: BoatId) -> Result<RaceConfig, StoreError>;
}
