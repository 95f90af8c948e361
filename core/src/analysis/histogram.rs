use crate::model::AccessPointRecord;
use crate::prelude::Channel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Access points per channel, iterated in ascending channel order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHistogram {
    counts: BTreeMap<Channel, usize>,
    skipped: usize,
}

impl ChannelHistogram {
    /// Counts records with a parseable channel; the rest are skipped.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AccessPointRecord>,
    {
        let mut histogram = Self::default();
        for record in records {
            match record.channel_number() {
                Some(channel) => *histogram.counts.entry(channel).or_insert(0) += 1,
                None => histogram.skipped += 1,
            }
        }
        histogram
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.counts.get(&channel).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, usize)> + '_ {
        self.counts.iter().map(|(&channel, &count)| (channel, count))
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.counts.keys().copied()
    }

    /// Number of records that contributed a channel.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Records left out because their channel was missing or malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Busiest channel; ties resolve to the lowest channel number.
    pub fn busiest(&self) -> Option<(Channel, usize)> {
        self.iter()
            .fold(None, |best: Option<(Channel, usize)>, (channel, count)| {
                match best {
                    Some((_, top)) if top >= count => best,
                    _ => Some((channel, count)),
                }
            })
    }
}
