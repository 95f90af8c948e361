//! Linux provider that shells out to `iw`.
//!
//! `iw dev <iface> scan` needs CAP_NET_ADMIN; `scan dump` reads the kernel's
//! cached results and usually works unprivileged.

use crate::scan::heuristic::{self, frequency_to_channel};
use log::{info, warn};
use meshcore::prelude::{BestChannel, Channel, RecommendationError, ScanError};
use meshcore::{AccessPointRecord, Room, ScanProvider};
use std::process::Command;

pub struct IwScanProvider {
    interface: String,
    use_dump: bool,
}

impl IwScanProvider {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            use_dump: false,
        }
    }

    /// Read cached results instead of triggering a new scan.
    pub fn use_cached(mut self) -> Self {
        self.use_dump = true;
        self
    }

    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new("iw")
            .args(args)
            .output()
            .map_err(|e| format!("failed to run `iw {}`: {}", args.join(" "), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("iw exited with {}: {}", output.status, stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn scan_now(&self) -> Result<Vec<AccessPointRecord>, String> {
        let args = if self.use_dump {
            vec!["dev", self.interface.as_str(), "scan", "dump"]
        } else {
            vec!["dev", self.interface.as_str(), "scan"]
        };
        self.run(&args).map(|stdout| parse_scan_output(&stdout))
    }
}

impl ScanProvider for IwScanProvider {
    fn scan(&self, room: &Room) -> Result<Vec<AccessPointRecord>, ScanError> {
        info!("scanning {} on {}", room.name, self.interface);
        self.scan_now().map_err(ScanError::new)
    }

    fn compute_best_channel(&self) -> BestChannel {
        let records = self.scan_now().map_err(RecommendationError::new)?;
        let connected = self.connected_bssid();
        heuristic::best_channel(&records, connected.as_deref())
    }

    fn connected_bssid(&self) -> Option<String> {
        match self.run(&["dev", self.interface.as_str(), "link"]) {
            Ok(stdout) => parse_link_output(&stdout),
            Err(err) => {
                warn!("could not read association for {}: {}", self.interface, err);
                None
            }
        }
    }
}

#[derive(Default)]
struct BssStanza {
    bssid: Option<String>,
    ssid: Option<String>,
    signal_dbm: Option<f32>,
    freq_mhz: Option<u32>,
    channel: Option<Channel>,
}

impl BssStanza {
    fn into_record(self) -> AccessPointRecord {
        let channel = self
            .channel
            .or_else(|| self.freq_mhz.and_then(frequency_to_channel));
        AccessPointRecord {
            ssid: self.ssid,
            bssid: self.bssid,
            freq_mhz: self.freq_mhz,
            signal_dbm: self.signal_dbm,
            channel: channel.map(Into::into),
        }
    }
}

/// Parses `iw dev <iface> scan` output into one record per BSS stanza.
pub fn parse_scan_output(output: &str) -> Vec<AccessPointRecord> {
    let mut records = Vec::new();
    let mut current: Option<BssStanza> = None;

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("BSS ") {
            if let Some(stanza) = current.take() {
                records.push(stanza.into_record());
            }
            // "BSS aa:bb:cc:dd:ee:ff(on wlan0) -- associated"
            let mac_end = rest
                .find(|c: char| !c.is_ascii_hexdigit() && c != ':')
                .unwrap_or(rest.len());
            let mac = &rest[..mac_end];
            if mac.len() == 17 {
                current = Some(BssStanza {
                    bssid: Some(mac.to_ascii_lowercase()),
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(stanza) = current.as_mut() else {
            continue;
        };
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("SSID:") {
            stanza.ssid = Some(rest.trim().to_string());
        } else if let Some(rest) = trimmed.strip_prefix("signal:") {
            stanza.signal_dbm = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(rest) = trimmed.strip_prefix("freq:") {
            // newer iw prints "freq: 2412.0"
            stanza.freq_mhz = rest
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| *f > 0.0)
                .map(|f| f.round() as u32);
        } else if let Some(rest) = trimmed.strip_prefix("DS Parameter set: channel") {
            stanza.channel = rest.trim().parse().ok();
        } else if let Some(rest) = trimmed.strip_prefix("* primary channel:") {
            if stanza.channel.is_none() {
                stanza.channel = rest.trim().parse().ok();
            }
        }
    }

    if let Some(stanza) = current.take() {
        records.push(stanza.into_record());
    }
    records
}

/// Extracts the BSSID from `iw dev <iface> link`; `None` when not connected.
pub fn parse_link_output(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Connected to ")?;
        let mac = rest.split(|c: char| c.is_whitespace() || c == '(').next()?;
        heuristic::parse_mac(mac).map(|_| mac.to_ascii_lowercase())
    })
}
