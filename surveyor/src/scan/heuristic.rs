//! Best-channel pick used by the bundled scan providers.
//!
//! Interference on a channel is the sum of `signal + 100` over the access
//! points heard on it above a signal floor, excluding the associated access
//! point and its sibling radios. When the device's own channel is known the
//! pick stays on it unless a channel in the same band is clearly quieter.

use meshcore::prelude::{BestChannel, Channel, RecommendationError};
use meshcore::AccessPointRecord;
use std::collections::BTreeMap;

/// Access points weaker than this are ignored.
pub const SIGNAL_FLOOR_DBM: f32 = -80.0;
/// Interference margin tolerated before recommending a move.
pub const STAY_MARGIN: f32 = 10.0;
const MISSING_SIGNAL_DBM: f32 = -90.0;
const FALLBACK_CHANNEL: Channel = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    TwoPointFour,
    Five,
    Other,
}

impl Band {
    pub fn from_frequency(freq_mhz: u32) -> Self {
        match freq_mhz {
            2401..=2495 => Band::TwoPointFour,
            5150..=5895 => Band::Five,
            _ => Band::Other,
        }
    }
}

/// 2.4 and 5 GHz frequency to channel; `None` for anything else.
pub fn frequency_to_channel(freq_mhz: u32) -> Option<Channel> {
    match freq_mhz {
        2484 => Some(14),
        2412..=2472 if (freq_mhz - 2407) % 5 == 0 => Some((freq_mhz - 2407) / 5),
        5160..=5885 if freq_mhz % 5 == 0 => Some((freq_mhz - 5000) / 5),
        _ => None,
    }
}

/// Parses `aa:bb:cc:dd:ee:ff` (or dash separated) into bytes.
pub fn parse_mac(value: &str) -> Option<[u8; 6]> {
    let parts: Vec<&str> = value.trim().split(|c: char| c == ':' || c == '-').collect();
    if parts.len() != 6 {
        return None;
    }
    let mut bytes = [0u8; 6];
    for (slot, part) in bytes.iter_mut().zip(parts) {
        *slot = u8::from_str_radix(part, 16).ok()?;
    }
    Some(bytes)
}

/// Mesh nodes and multi-radio routers share the middle four address bytes.
fn same_device(a: &[u8; 6], b: &[u8; 6]) -> bool {
    a[1..=4] == b[1..=4]
}

fn is_own_radio(record: &AccessPointRecord, connected: Option<&str>) -> bool {
    let (Some(connected), Some(bssid)) = (connected, record.bssid.as_deref()) else {
        return false;
    };
    match (parse_mac(connected), parse_mac(bssid)) {
        (Some(own), Some(other)) => own == other || same_device(&own, &other),
        _ => record.bssid_matches(connected),
    }
}

/// Lowest weight wins; ties go to the lower channel.
fn quietest<I>(candidates: I) -> Option<(Channel, f32)>
where
    I: IntoIterator<Item = (Channel, f32)>,
{
    candidates
        .into_iter()
        .fold(None, |best: Option<(Channel, f32)>, (channel, weight)| match best {
            Some((best_channel, best_weight))
                if best_weight < weight || (best_weight == weight && best_channel <= channel) =>
            {
                best
            }
            _ => Some((channel, weight)),
        })
}

pub fn best_channel(records: &[AccessPointRecord], connected: Option<&str>) -> BestChannel {
    if records.is_empty() {
        return Err(RecommendationError::new(
            "no access points visible; cannot recommend a channel",
        ));
    }

    let current = connected.and_then(|bssid| {
        records
            .iter()
            .find(|record| record.bssid_matches(bssid))
            .and_then(|record| {
                let channel = record.channel_number()?;
                let freq = record.freq_mhz?;
                Some((channel, Band::from_frequency(freq)))
            })
    });

    let mut weight: BTreeMap<(Band, Channel), f32> = BTreeMap::new();
    for record in records {
        let (Some(channel), Some(freq)) = (record.channel_number(), record.freq_mhz) else {
            continue;
        };
        let signal = record.signal_dbm.unwrap_or(MISSING_SIGNAL_DBM);
        if signal < SIGNAL_FLOOR_DBM || is_own_radio(record, connected) {
            continue;
        }
        *weight
            .entry((Band::from_frequency(freq), channel))
            .or_insert(0.0) += (signal + 100.0).max(0.0);
    }

    if let Some((current_channel, current_band)) = current {
        let in_band = weight
            .iter()
            .filter(|((band, _), _)| *band == current_band)
            .map(|((_, channel), w)| (*channel, *w));
        let current_weight = weight
            .get(&(current_band, current_channel))
            .copied()
            .unwrap_or(0.0);

        return Ok(match quietest(in_band) {
            Some((best, best_weight)) if current_weight > best_weight + STAY_MARGIN => best,
            _ => current_channel,
        });
    }

    Ok(quietest(weight.iter().map(|((_, channel), w)| (*channel, *w)))
        .map(|(channel, _)| channel)
        .unwrap_or(FALLBACK_CHANNEL))
}
