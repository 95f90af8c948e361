//! Contract for the radio-side collaborator that feeds the analysis engine.

use crate::model::{AccessPointRecord, Floor, House, Room, RoomId};
use crate::prelude::{BestChannel, Channel, ModelError, ScanError};

/// Capability supplying scans, the best-channel pick and the association.
///
/// All calls may block. Callers must not start a second scan of the same room
/// while one is outstanding.
pub trait ScanProvider {
    /// Fresh scan for `room`. An empty result is a successful scan.
    fn scan(&self, room: &Room) -> Result<Vec<AccessPointRecord>, ScanError>;

    fn compute_best_channel(&self) -> BestChannel;

    /// BSSID of the associated access point; `None` when not associated.
    fn connected_bssid(&self) -> Option<String>;

    /// Interference groupings for the overlap profile of `floor`.
    ///
    /// `None` lets the configured grouping policy derive them from scan data.
    fn channel_groupings(&self, _floor: &Floor) -> Option<Vec<Vec<Channel>>> {
        None
    }
}

/// Provider answers gathered once per report and shared by every floor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSnapshot {
    pub best_channel: BestChannel,
    pub connected_bssid: Option<String>,
}

impl ProviderSnapshot {
    pub fn new(best_channel: BestChannel, connected_bssid: Option<String>) -> Self {
        Self {
            best_channel,
            connected_bssid: connected_bssid.filter(|b| !b.trim().is_empty()),
        }
    }

    pub fn capture(provider: &dyn ScanProvider) -> Self {
        Self::new(provider.compute_best_channel(), provider.connected_bssid())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Scans one room and stores the result, replacing the previous scan.
///
/// A failed scan leaves the room's existing data untouched.
pub fn scan_room(
    house: &mut House,
    room: RoomId,
    provider: &dyn ScanProvider,
) -> Result<usize, SurveyError> {
    let target = house
        .room(room)
        .ok_or_else(|| ModelError::UnknownRoom(room.to_string()))?;
    let records = provider.scan(target)?;
    Ok(house.record_scan(room, records)?)
}
