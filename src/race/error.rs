use thiserror::Error;

use crate::race::MarkId;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("race does not have a true wind direction configured")]
    MissingConfiguration,
    #[error("invalid mark id: {0}")]
    InvalidMark(MarkId),
    #[error("no marks defined for race")]
    NoMarksDefined,
    #[error("mark reference needs at least one track point in the window")]
    EmptyWindow,
    #[error("unknown reference mode: {0} (expected 'twd' or 'mark')")]
    UnknownMode(String),
}
