use crate::model::AccessPointRecord;
use crate::prelude::{BestChannel, Channel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-floor recommendation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The provider could not compute a best channel.
    NoRecommendation { reason: String },
    /// The associated access point is heard on this floor on the best channel.
    AlreadyOptimal,
    Recommend { channel: Channel },
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::NoRecommendation { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoRecommendation { reason } => write!(f, "ERROR ({})", reason),
            Verdict::AlreadyOptimal => write!(f, "**On the best channel already!**"),
            Verdict::Recommend { channel } => write!(f, "{}", channel),
        }
    }
}

/// Channel of the first record carrying `connected_bssid`.
///
/// Only the first match is considered; if it has no usable channel the
/// device's channel is unknown for this set of records.
pub fn resolve_my_channel(
    records: &[AccessPointRecord],
    connected_bssid: Option<&str>,
) -> Option<Channel> {
    let target = connected_bssid.map(str::trim).filter(|b| !b.is_empty())?;
    records
        .iter()
        .find(|record| record.bssid_matches(target))
        .and_then(AccessPointRecord::channel_number)
}

/// Combines the provider's best channel with the device's observed channel.
///
/// An unresolvable association never counts as optimal.
pub fn evaluate(
    records: &[AccessPointRecord],
    best_channel: &BestChannel,
    connected_bssid: Option<&str>,
) -> Verdict {
    let best = match best_channel {
        Ok(channel) => *channel,
        Err(err) => {
            return Verdict::NoRecommendation {
                reason: err.to_string(),
            }
        }
    };

    match resolve_my_channel(records, connected_bssid) {
        Some(mine) if mine == best => Verdict::AlreadyOptimal,
        _ => Verdict::Recommend { channel: best },
    }
}
