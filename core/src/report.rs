//! Per-floor channel reports built from a borrowed house snapshot.

use crate::analysis::{
    evaluate, flatten_floor, groupings_for_floor, ChannelHistogram, GroupingPolicy,
    OverlapProfile, Verdict,
};
use crate::math::StatsHelper;
use crate::model::{Floor, FloorId, House};
use crate::prelude::Channel;
use crate::provider::{ProviderSnapshot, ScanProvider};
use crate::telemetry::{AnalysisMetrics, LogManager};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorReport {
    pub floor_id: FloorId,
    pub name: String,
    pub access_point_count: usize,
    pub mean_signal_dbm: Option<f32>,
    pub histogram: ChannelHistogram,
    pub overlap: OverlapProfile,
    pub verdict: Verdict,
}

impl FloorReport {
    pub fn has_data(&self) -> bool {
        self.access_point_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseReport {
    pub house_name: String,
    pub floors: Vec<FloorReport>,
}

/// Runs aggregation, histogram, overlap and recommendation for each floor.
pub struct ReportBuilder {
    policy: GroupingPolicy,
    logger: LogManager,
    metrics: Arc<AnalysisMetrics>,
}

impl ReportBuilder {
    pub fn new(policy: GroupingPolicy) -> Self {
        Self {
            policy,
            logger: LogManager::new("report"),
            metrics: Arc::new(AnalysisMetrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<AnalysisMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<AnalysisMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Builds a report asking `provider` once for best channel and association.
    pub fn build_with_provider(&self, house: &House, provider: &dyn ScanProvider) -> HouseReport {
        let snapshot = ProviderSnapshot::capture(provider);
        self.assemble(house, &snapshot, |floor| provider.channel_groupings(floor))
    }

    /// Builds a report from already captured provider answers.
    pub fn build(&self, house: &House, snapshot: &ProviderSnapshot) -> HouseReport {
        self.assemble(house, snapshot, |_| None)
    }

    fn assemble<F>(&self, house: &House, snapshot: &ProviderSnapshot, groupings: F) -> HouseReport
    where
        F: Fn(&Floor) -> Option<Vec<Vec<Channel>>>,
    {
        if let Err(err) = &snapshot.best_channel {
            self.logger
                .degrade(&format!("no channel recommendation available: {}", err));
        }

        let floors = house
            .floors
            .iter()
            .map(|floor| self.floor(floor, snapshot, groupings(floor)))
            .collect();

        HouseReport {
            house_name: house.display_name().to_string(),
            floors,
        }
    }

    /// Report for a single floor; provider groupings win over the policy.
    pub fn floor(
        &self,
        floor: &Floor,
        snapshot: &ProviderSnapshot,
        groupings: Option<Vec<Vec<Channel>>>,
    ) -> FloorReport {
        let records = flatten_floor(floor);
        let histogram = ChannelHistogram::from_records(&records);

        let overlap = match groupings {
            Some(groupings) => OverlapProfile::from_groupings(groupings),
            None => OverlapProfile::from_groupings(groupings_for_floor(floor, self.policy)),
        };

        let verdict = evaluate(
            &records,
            &snapshot.best_channel,
            snapshot.connected_bssid.as_deref(),
        );

        let signals: Vec<f32> = records.iter().filter_map(|r| r.signal_dbm).collect();

        self.metrics
            .record_floor(histogram.total(), histogram.skipped());
        if verdict.is_failure() && !records.is_empty() {
            self.metrics.record_recommendation_failure();
        }
        if histogram.skipped() > 0 {
            self.logger.degrade(&format!(
                "{}: skipped {} access points without a usable channel",
                floor.name,
                histogram.skipped()
            ));
        }
        self.logger.record(&format!(
            "{}: {} access points on {} channels, verdict {}",
            floor.name,
            records.len(),
            histogram.channels().count(),
            verdict
        ));

        FloorReport {
            floor_id: floor.id,
            name: floor.name.clone(),
            access_point_count: records.len(),
            mean_signal_dbm: StatsHelper::mean(&signals),
            histogram,
            overlap,
            verdict,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(GroupingPolicy::default())
    }
}

impl fmt::Display for HouseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.floors.is_empty() {
            return writeln!(f, "No house configured yet.");
        }
        for floor in &self.floors {
            write!(f, "{}", floor)?;
        }
        Ok(())
    }
}

impl fmt::Display for FloorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        if !self.has_data() {
            writeln!(f, "  No scan data.")?;
            return writeln!(f);
        }

        writeln!(f, "  Total APs detected: {}", self.access_point_count)?;
        writeln!(f, "  Channel usage:")?;
        if self.histogram.is_empty() {
            writeln!(f, "    (no channel data)")?;
        }
        for (channel, count) in self.histogram.iter() {
            writeln!(f, "    Ch {}: {} APs", channel, count)?;
        }
        writeln!(f, "  Recommended channel: {}", self.verdict)?;
        writeln!(f)
    }
}

/// Per-room listing of raw scan rows.
pub struct ScanListing<'a>(pub &'a House);

impl fmt::Display for ScanListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.floors.is_empty() {
            return writeln!(f, "No house data yet.");
        }
        for floor in &self.0.floors {
            writeln!(f, "=== {} ===", floor.name)?;
            for room in &floor.rooms {
                writeln!(f, "--- {} ---", room.name)?;
                if room.access_points.is_empty() {
                    writeln!(f, "  (No data)")?;
                }
                for ap in &room.access_points {
                    let ssid = match ap.ssid.as_deref() {
                        Some(ssid) if !ssid.is_empty() => ssid,
                        _ => "<hidden>",
                    };
                    let bssid = match ap.bssid.as_deref() {
                        Some(bssid) if !bssid.is_empty() => bssid,
                        _ => "<unknown>",
                    };
                    let channel = ap
                        .channel
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    let signal = ap
                        .signal_dbm
                        .map(|s| format!("{:.1}", s))
                        .unwrap_or_default();
                    writeln!(
                        f,
                        "  SSID: {} | BSSID: {} | Ch: {} | Signal: {} dBm",
                        ssid, bssid, channel, signal
                    )?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessPointRecord;
    use crate::prelude::RecommendationError;

    fn surveyed_house() -> House {
        let mut house = House::with_layout("Home", vec![vec!["Kitchen", "Hall"], vec!["Loft"]]);
        let kitchen = house.floors[0].rooms[0].id;
        let hall = house.floors[0].rooms[1].id;
        house
            .record_scan(
                kitchen,
                vec![
                    AccessPointRecord::new()
                        .with_ssid("Home")
                        .with_bssid("aa:bb:cc:dd:ee:ff")
                        .with_signal(-40.0)
                        .with_channel(6),
                    AccessPointRecord::new()
                        .with_ssid("Neighbour")
                        .with_bssid("11:22:33:44:55:66")
                        .with_signal(-60.0)
                        .with_channel(1),
                ],
            )
            .unwrap();
        house
            .record_scan(
                hall,
                vec![
                    AccessPointRecord::new()
                        .with_bssid("22:22:33:44:55:66")
                        .with_channel(6),
                    AccessPointRecord::new().with_ssid("Broken"),
                ],
            )
            .unwrap();
        house
    }

    #[test]
    fn report_covers_every_floor() {
        let house = surveyed_house();
        let snapshot = ProviderSnapshot::new(Ok(6), Some("AA:BB:CC:DD:EE:FF".into()));
        let builder = ReportBuilder::default();
        let report = builder.build(&house, &snapshot);

        assert_eq!(report.floors.len(), 2);
        let ground = &report.floors[0];
        assert_eq!(ground.access_point_count, 4);
        assert_eq!(ground.histogram.total(), 3);
        assert_eq!(ground.verdict, Verdict::AlreadyOptimal);
        assert_eq!(ground.overlap.ratio(6), Some(1.0));
        assert_eq!(ground.overlap.ratio(1), Some(0.5));
        assert_eq!(ground.mean_signal_dbm, Some(-50.0));

        let loft = &report.floors[1];
        assert!(!loft.has_data());
        assert!(loft.histogram.is_empty());
        assert!(loft.overlap.is_empty());
        assert_eq!(loft.verdict, Verdict::Recommend { channel: 6 });

        let metrics = builder.metrics().snapshot();
        assert_eq!(metrics.floors_analyzed, 2);
        assert_eq!(metrics.records_skipped, 1);
    }

    #[test]
    fn recommendation_failure_keeps_histogram() {
        let house = surveyed_house();
        let snapshot = ProviderSnapshot::new(
            Err(RecommendationError::new("scan socket unavailable")),
            None,
        );
        let builder = ReportBuilder::default();
        let report = builder.build(&house, &snapshot);
        let text = report.to_string();

        assert!(text.contains(
            "=== Floor 1 ===\n  Total APs detected: 4\n  Channel usage:\n    Ch 1: 1 APs\n    Ch 6: 2 APs\n"
        ));
        assert!(!text.contains("Mean signal"));
        assert!(text.contains("  Recommended channel: ERROR (scan socket unavailable)"));
        assert!(text.contains("=== Floor 2 ===\n  No scan data."));
        assert_eq!(builder.metrics().snapshot().recommendation_failures, 1);
    }

    #[test]
    fn recommendation_line_variants() {
        let house = surveyed_house();
        let builder = ReportBuilder::default();

        let optimal = builder.build(
            &house,
            &ProviderSnapshot::new(Ok(6), Some("aa:bb:cc:dd:ee:ff".into())),
        );
        assert!(optimal
            .to_string()
            .contains("Recommended channel: **On the best channel already!**"));

        let moved = builder.build(&house, &ProviderSnapshot::new(Ok(11), None));
        assert!(moved.to_string().contains("Recommended channel: 11"));
    }

    #[test]
    fn house_without_floors_renders_placeholder() {
        let report = ReportBuilder::default().build(&House::new(""), &ProviderSnapshot::new(Ok(1), None));
        assert_eq!(report.house_name, "Untitled House");
        assert_eq!(report.to_string(), "No house configured yet.\n");
        assert_eq!(ScanListing(&House::new("")).to_string(), "No house data yet.\n");
    }

    #[test]
    fn scan_listing_marks_hidden_and_unscanned() {
        let house = surveyed_house();
        let listing = ScanListing(&house).to_string();
        assert!(listing.contains(
            "  SSID: Home | BSSID: aa:bb:cc:dd:ee:ff | Ch: 6 | Signal: -40.0 dBm"
        ));
        assert!(listing.contains("  SSID: <hidden> | BSSID: 22:22:33:44:55:66 | Ch: 6 | Signal:  dBm"));
        assert!(listing.contains("--- Loft ---\n  (No data)"));
    }

    struct GroupingProvider;

    impl ScanProvider for GroupingProvider {
        fn scan(
            &self,
            _room: &crate::model::Room,
        ) -> Result<Vec<AccessPointRecord>, crate::prelude::ScanError> {
            Ok(Vec::new())
        }

        fn compute_best_channel(&self) -> crate::prelude::BestChannel {
            Ok(11)
        }

        fn connected_bssid(&self) -> Option<String> {
            None
        }

        fn channel_groupings(&self, _floor: &Floor) -> Option<Vec<Vec<Channel>>> {
            Some(vec![vec![1, 6], vec![6, 11], vec![1, 11]])
        }
    }

    #[test]
    fn provider_groupings_override_policy() {
        let house = surveyed_house();
        let report = ReportBuilder::default().build_with_provider(&house, &GroupingProvider);
        let ground = &report.floors[0];
        assert_eq!(ground.overlap.entries().len(), 3);
        assert!(ground.overlap.entries().iter().all(|e| e.ratio == 1.0));
        assert_eq!(ground.verdict, Verdict::Recommend { channel: 11 });
    }
}
