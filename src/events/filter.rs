use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{ManeuverEvent, ManeuverKind};

/// Selection of events by inclusive time bounds and kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub t0: Option<DateTime<Utc>>,
    pub t1: Option<DateTime<Utc>>,
    pub kind: Option<ManeuverKind>,
}

impl EventFilter {
    pub fn between(t0: DateTime<Utc>, t1: DateTime<Utc>) -> Self {
        Self {
            t0: Some(t0),
            t1: Some(t1),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: ManeuverKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, event: &ManeuverEvent) -> bool {
        self.t0.map_or(true, |t0| event.timestamp >= t0)
            && self.t1.map_or(true, |t1| event.timestamp <= t1)
            && self.kind.map_or(true, |k| event.kind == k)
    }
}

pub fn filter_events(events: &[ManeuverEvent], filter: &EventFilter) -> Vec<ManeuverEvent> {
    events
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Tack and gybe counts over one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub tacks: usize,
    pub gybes: usize,
}

impl EventCounts {
    /// Count events of each kind with `t0 <= timestamp <= t1`.
    pub fn tally(events: &[ManeuverEvent], t0: DateTime<Utc>, t1: DateTime<Utc>) -> Self {
        let window = EventFilter::between(t0, t1);
        events
            .iter()
            .filter(|e| window.matches(e))
            .fold(Self::default(), |mut counts, e| {
                match e.kind {
                    ManeuverKind::Tack => counts.tacks += 1,
                    ManeuverKind::Gybe => counts.gybes += 1,
                }
                counts
            })
    }
}
