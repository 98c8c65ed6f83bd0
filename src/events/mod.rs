mod detector;
mod filter;
mod types;

pub use detector::{detect_events, DetectorParams};
pub use filter::{filter_events, EventCounts, EventFilter};
pub use types::{ManeuverEvent, ManeuverKind};
