use crate::workflow::config::SurveyConfig;
use log::{info, warn};
use meshcore::provider::scan_room;
use meshcore::{House, HouseReport, ReportBuilder, ScanProvider};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurveySummary {
    pub rooms_scanned: usize,
    pub rooms_failed: usize,
    pub access_points: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: SurveyConfig,
}

impl Runner {
    pub fn new(config: SurveyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Scans every room in order. A failed room keeps its previous results.
    pub fn scan_house(&self, house: &mut House, provider: &dyn ScanProvider) -> SurveySummary {
        let targets: Vec<_> = house
            .rooms()
            .map(|(floor, room)| (room.id, format!("{} / {}", floor.name, room.name)))
            .collect();

        let mut summary = SurveySummary::default();
        for (room, label) in targets {
            match scan_room(house, room, provider) {
                Ok(count) => {
                    info!("{}: {} access points", label, count);
                    summary.rooms_scanned += 1;
                    summary.access_points += count;
                }
                Err(err) => {
                    warn!("{}: {}", label, err);
                    summary.rooms_failed += 1;
                }
            }
        }
        summary
    }

    pub fn report(&self, house: &House, provider: &dyn ScanProvider) -> HouseReport {
        ReportBuilder::new(self.config.grouping).build_with_provider(house, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::synthetic::SyntheticProvider;
    use crate::workflow::house_file::parse_layout;
    use meshcore::model::Room;
    use meshcore::prelude::{BestChannel, ScanError};
    use meshcore::AccessPointRecord;

    struct OfflineProvider;

    impl ScanProvider for OfflineProvider {
        fn scan(&self, _room: &Room) -> Result<Vec<AccessPointRecord>, ScanError> {
            Err(ScanError::new("radio off"))
        }

        fn compute_best_channel(&self) -> BestChannel {
            Ok(1)
        }

        fn connected_bssid(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn runner_scans_every_room() {
        let runner = Runner::new(SurveyConfig::default());
        let provider = SyntheticProvider::new(11, 10);
        let mut house = House::with_layout("Home", parse_layout("Kitchen,Lounge;Study"));

        let summary = runner.scan_house(&mut house, &provider);
        assert_eq!(summary.rooms_scanned, 3);
        assert_eq!(summary.rooms_failed, 0);
        let stored: usize = house.rooms().map(|(_, room)| room.access_points.len()).sum();
        assert_eq!(summary.access_points, stored);

        let report = runner.report(&house, &provider);
        assert_eq!(report.floors.len(), 2);
    }

    #[test]
    fn failed_scans_are_counted_and_skipped() {
        let runner = Runner::new(SurveyConfig::default());
        let mut house = House::with_layout("Home", parse_layout("Kitchen"));
        let summary = runner.scan_house(&mut house, &OfflineProvider);
        assert_eq!(summary.rooms_scanned, 0);
        assert_eq!(summary.rooms_failed, 1);
        assert!(house.rooms().all(|(_, room)| !room.is_scanned()));
    }
}
