use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track contains no fixes with timestamps")]
    EmptyTrack,
    #[error("malformed input in {file}: {message}")]
    MalformedInput { file: String, message: String },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
