//! Channel overlap profile used to drive the interference heatmap.
//!
//! A grouping is one source of interference: a room's observed channels, a
//! neighbouring network's channels, or a set supplied by the scan provider.
//! Each channel is scored by how many groupings contain it, normalised against
//! the most contested channel.

use crate::math::{HeatColor, StatsHelper};
use crate::model::Floor;
use crate::prelude::Channel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How groupings are derived from a floor when the provider supplies none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// One grouping per room: the channels heard in that room.
    #[default]
    RoomChannels,
    /// One grouping per network (SSID, or BSSID when hidden): its channels on the floor.
    NetworkChannels,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelIntensity {
    pub channel: Channel,
    /// Number of groupings containing the channel.
    pub count: usize,
    pub ratio: f32,
}

/// One equal-width bar segment of the rendered heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatSegment {
    pub channel: Channel,
    pub ratio: f32,
    pub x: f32,
    pub width: f32,
    pub color: HeatColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlapProfile {
    entries: Vec<ChannelIntensity>,
    max_count: usize,
}

impl OverlapProfile {
    pub fn from_groupings<G, C>(groupings: G) -> Self
    where
        G: IntoIterator<Item = C>,
        C: IntoIterator<Item = Channel>,
    {
        let mut counts: BTreeMap<Channel, usize> = BTreeMap::new();
        for grouping in groupings {
            // Membership, not multiplicity.
            let members: BTreeSet<Channel> = grouping.into_iter().collect();
            for channel in members {
                *counts.entry(channel).or_insert(0) += 1;
            }
        }

        let max_count = counts.values().copied().max().unwrap_or(0);
        if max_count == 0 {
            return Self::default();
        }

        let entries = counts
            .into_iter()
            .map(|(channel, count)| ChannelIntensity {
                channel,
                count,
                ratio: StatsHelper::ratio(count, max_count),
            })
            .collect();

        Self { entries, max_count }
    }

    /// Entries in ascending channel order.
    pub fn entries(&self) -> &[ChannelIntensity] {
        &self.entries
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ratio(&self, channel: Channel) -> Option<f32> {
        self.entries
            .iter()
            .find(|entry| entry.channel == channel)
            .map(|entry| entry.ratio)
    }

    /// Lays the profile out as equal-width segments, left to right by channel.
    pub fn segments(&self, total_width: f32) -> Vec<HeatSegment> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        let width = total_width / self.entries.len() as f32;
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| HeatSegment {
                channel: entry.channel,
                ratio: entry.ratio,
                x: idx as f32 * width,
                width,
                color: HeatColor::from_ratio(entry.ratio),
            })
            .collect()
    }
}

/// Builds groupings for a floor according to `policy`.
pub fn groupings_for_floor(floor: &Floor, policy: GroupingPolicy) -> Vec<BTreeSet<Channel>> {
    match policy {
        GroupingPolicy::RoomChannels => floor
            .rooms
            .iter()
            .map(|room| {
                room.access_points
                    .iter()
                    .filter_map(|record| record.channel_number())
                    .collect::<BTreeSet<_>>()
            })
            .filter(|channels| !channels.is_empty())
            .collect(),
        GroupingPolicy::NetworkChannels => {
            let mut networks: BTreeMap<String, BTreeSet<Channel>> = BTreeMap::new();
            for record in floor.rooms.iter().flat_map(|room| room.access_points.iter()) {
                let Some(channel) = record.channel_number() else {
                    continue;
                };
                let key = match (&record.ssid, &record.bssid) {
                    (Some(ssid), _) if !ssid.is_empty() => format!("ssid:{}", ssid),
                    (_, Some(bssid)) => format!("bssid:{}", bssid.trim().to_ascii_lowercase()),
                    _ => continue,
                };
                networks.entry(key).or_default().insert(channel);
            }
            networks.into_values().collect()
        }
    }
}
