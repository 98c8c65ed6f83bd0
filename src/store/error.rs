use thiserror::Error;

use crate::race::{BoatId, RaceId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Boat not found: {0}")]
    BoatNotFound(BoatId),
    #[error("Race not found: {0}")]
    RaceNotFound(RaceId),
}
