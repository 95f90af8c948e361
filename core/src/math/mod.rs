pub mod ramp;
pub mod stats;

pub use ramp::HeatColor;
pub use stats::StatsHelper;
