use crate::prelude::Channel;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Channel value exactly as the scan delivered it.
///
/// Scanners and hand-edited house files disagree on whether a channel is a
/// number or a string, so the raw value is kept and parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelValue {
    Number(serde_json::Number),
    Text(String),
}

impl ChannelValue {
    /// Positive integer channel, or `None` when the value does not parse.
    pub fn number(&self) -> Option<Channel> {
        match self {
            ChannelValue::Number(n) => {
                if let Some(v) = n.as_u64() {
                    positive(v)
                } else {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f <= f64::from(Channel::MAX))
                        .map(|f| f as Channel)
                }
            }
            ChannelValue::Text(s) => s.trim().parse::<u64>().ok().and_then(positive),
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelValue::Number(n) => write!(f, "{}", n),
            ChannelValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<Channel> for ChannelValue {
    fn from(channel: Channel) -> Self {
        ChannelValue::Number(channel.into())
    }
}

fn positive(v: u64) -> Option<Channel> {
    Channel::try_from(v).ok().filter(|c| *c > 0)
}

/// A single access point observed during a room scan.
///
/// Every field is optional; scanners routinely omit values and the analysis
/// code skips what it cannot use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessPointRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub ssid: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub bssid: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_u32"
    )]
    pub freq_mhz: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f32"
    )]
    pub signal_dbm: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_channel"
    )]
    pub channel: Option<ChannelValue>,
}

impl AccessPointRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = Some(ssid.into());
        self
    }

    pub fn with_bssid(mut self, bssid: impl Into<String>) -> Self {
        self.bssid = Some(bssid.into());
        self
    }

    pub fn with_frequency(mut self, freq_mhz: u32) -> Self {
        self.freq_mhz = Some(freq_mhz);
        self
    }

    pub fn with_signal(mut self, signal_dbm: f32) -> Self {
        self.signal_dbm = Some(signal_dbm);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Stores a channel exactly as a scanner reported it.
    pub fn with_raw_channel(mut self, channel: ChannelValue) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Parsed channel number; `None` when missing or malformed.
    pub fn channel_number(&self) -> Option<Channel> {
        self.channel.as_ref().and_then(ChannelValue::number)
    }

    /// Case-insensitive BSSID comparison.
    pub fn bssid_matches(&self, other: &str) -> bool {
        self.bssid
            .as_deref()
            .map(|own| own.trim().eq_ignore_ascii_case(other.trim()))
            .unwrap_or(false)
    }

    /// Hidden networks advertise no SSID or an empty one.
    pub fn is_hidden(&self) -> bool {
        self.ssid.as_deref().map_or(true, str::is_empty)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(|v| v as f32),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_channel<'de, D>(deserializer: D) -> Result<Option<ChannelValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => Some(ChannelValue::Number(n)),
        Some(Value::String(s)) => Some(ChannelValue::Text(s)),
        _ => None,
    })
}
