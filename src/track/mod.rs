mod error;
mod gpx_file;
mod resample;
mod types;
mod window;

pub use error::TrackError;
pub use gpx_file::{parse_gpx, read_gpx_file};
pub use resample::{resample, ResampleParams};
pub use types::{RawFix, TrackPoint};
pub use window::{downsample, window_points};
