mod compare;
mod export;
mod window;

pub use compare::{compare, ComparisonResult};
pub use export::write_statistics_csv;
pub use window::{compute_window_statistics, distance_sailed, height_gain, vmg, WindowStatistics};
