use crate::scan::heuristic;
use meshcore::prelude::{BestChannel, Channel, ScanError};
use meshcore::{AccessPointRecord, Room, ScanProvider};
use rand::{rngs::StdRng, Rng, SeedableRng};

const CHANNEL_PLAN: [(Channel, u32); 8] = [
    (1, 2412),
    (6, 2437),
    (11, 2462),
    (3, 2422),
    (36, 5180),
    (44, 5220),
    (149, 5745),
    (157, 5785),
];
const HOME_SSID: &str = "MeshHome";
const SENSITIVITY_DBM: f32 = -92.0;

#[derive(Debug, Clone)]
struct NeighbourAp {
    ssid: String,
    bssid: String,
    channel: Channel,
    freq_mhz: u32,
    tx_dbm: f32,
}

impl NeighbourAp {
    fn record(&self, signal_dbm: f32) -> AccessPointRecord {
        AccessPointRecord::new()
            .with_ssid(self.ssid.clone())
            .with_bssid(self.bssid.clone())
            .with_frequency(self.freq_mhz)
            .with_signal((signal_dbm * 10.0).round() / 10.0)
            .with_channel(self.channel)
    }
}

/// Deterministic stand-in for a radio.
///
/// The first generated access point is the home network the device is
/// associated with. Each room hears the neighbourhood through its own,
/// name-seeded attenuation, so repeated scans of a room agree.
pub struct SyntheticProvider {
    seed: u64,
    neighbourhood: Vec<NeighbourAp>,
    associated: bool,
}

impl SyntheticProvider {
    pub fn new(seed: u64, access_points: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let neighbourhood = (0..access_points)
            .map(|idx| {
                let (channel, freq_mhz) = CHANNEL_PLAN[rng.gen_range(0..CHANNEL_PLAN.len())];
                let mut mac = [0u8; 6];
                rng.fill(&mut mac[..]);
                // locally administered, unicast
                mac[0] = (mac[0] | 0x02) & 0xfe;
                let ssid = match idx {
                    0 => HOME_SSID.to_string(),
                    i if i % 5 == 4 => String::new(),
                    i => format!("Neighbour-{:02}", i),
                };
                NeighbourAp {
                    ssid,
                    bssid: format_mac(&mac),
                    channel,
                    freq_mhz,
                    tx_dbm: rng.gen_range(-70.0..-30.0),
                }
            })
            .collect();

        Self {
            seed,
            neighbourhood,
            associated: true,
        }
    }

    /// Simulates a device that is not associated with any access point.
    #[cfg(test)]
    pub fn without_association(mut self) -> Self {
        self.associated = false;
        self
    }

    fn room_seed(&self, room: &Room) -> u64 {
        // FNV-1a keeps room seeds stable across runs and platforms.
        room.name.bytes().fold(0xcbf2_9ce4_8422_2325u64 ^ self.seed, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
    }

    fn full_view(&self) -> Vec<AccessPointRecord> {
        self.neighbourhood
            .iter()
            .map(|ap| ap.record(ap.tx_dbm))
            .collect()
    }
}

impl ScanProvider for SyntheticProvider {
    fn scan(&self, room: &Room) -> Result<Vec<AccessPointRecord>, ScanError> {
        let mut rng = StdRng::seed_from_u64(self.room_seed(room));
        Ok(self
            .neighbourhood
            .iter()
            .filter_map(|ap| {
                let signal = ap.tx_dbm - rng.gen_range(0.0f32..30.0);
                (signal >= SENSITIVITY_DBM).then(|| ap.record(signal))
            })
            .collect())
    }

    fn compute_best_channel(&self) -> BestChannel {
        let connected = self.connected_bssid();
        heuristic::best_channel(&self.full_view(), connected.as_deref())
    }

    fn connected_bssid(&self) -> Option<String> {
        if !self.associated {
            return None;
        }
        self.neighbourhood.first().map(|ap| ap.bssid.clone())
    }
}

fn format_mac(bytes: &[u8; 6]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_are_deterministic_per_room() {
        let provider = SyntheticProvider::new(7, 12);
        let kitchen = Room::new("Kitchen");
        let first = provider.scan(&kitchen).unwrap();
        let second = provider.scan(&Room::new("Kitchen")).unwrap();
        assert_eq!(first, second);
        assert!(first.len() <= 12);
        assert!(first.iter().all(|r| r.channel_number().is_some()));
    }

    #[test]
    fn home_network_is_associated() {
        let provider = SyntheticProvider::new(3, 6);
        let bssid = provider.connected_bssid().unwrap();
        assert_eq!(heuristic::parse_mac(&bssid).map(|m| m[0] & 0x03), Some(0x02));
        assert!(provider.compute_best_channel().is_ok());
        assert_eq!(provider.without_association().connected_bssid(), None);
    }

    #[test]
    fn empty_neighbourhood_cannot_recommend() {
        let provider = SyntheticProvider::new(1, 0);
        assert!(provider.scan(&Room::new("Den")).unwrap().is_empty());
        assert!(provider.compute_best_channel().is_err());
        assert_eq!(provider.connected_bssid(), None);
    }
}
