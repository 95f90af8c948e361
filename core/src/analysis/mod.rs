pub mod aggregate;
pub mod histogram;
pub mod overlap;
pub mod recommend;

pub use aggregate::flatten_floor;
pub use histogram::ChannelHistogram;
pub use overlap::{
    groupings_for_floor, ChannelIntensity, GroupingPolicy, HeatSegment, OverlapProfile,
};
pub use recommend::{evaluate, resolve_my_channel, Verdict};
