mod error;
mod reference;
mod types;

pub use error::ReferenceError;
pub use reference::{resolve_reference, ReferenceMode};
pub use types::{Boat, BoatId, Mark, MarkId, RaceConfig, RaceId};
