//! Scan aggregation and channel-conflict analysis for the Wi-Fi mesh survey tool.
//!
//! A house is modelled as floors of rooms, each room holding its latest scan.
//! Per floor the engine flattens the scans, counts access points per channel,
//! builds an overlap profile for the heatmap and evaluates the channel
//! recommendation against the access point the device is associated with.
//! Everything here is synchronous and works on a borrowed snapshot; radio
//! access sits behind [`provider::ScanProvider`].

pub mod analysis;
pub mod math;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod report;
pub mod telemetry;

pub use analysis::{ChannelHistogram, GroupingPolicy, OverlapProfile, Verdict};
pub use model::{AccessPointRecord, Floor, House, Room};
pub use prelude::{BestChannel, Channel, RecommendationError, ScanError};
pub use provider::{ProviderSnapshot, ScanProvider};
pub use report::{HouseReport, ReportBuilder};
