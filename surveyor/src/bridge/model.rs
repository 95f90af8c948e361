use meshcore::analysis::{HeatSegment, Verdict};
use meshcore::prelude::Channel;
use meshcore::HouseReport;
use serde::{Deserialize, Serialize};
use std::fmt;

const BAR_CELLS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub channel: Channel,
    pub access_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorModel {
    pub name: String,
    pub access_point_count: usize,
    pub mean_signal_dbm: Option<f32>,
    pub channels: Vec<ChannelRow>,
    pub heatmap: Vec<HeatSegment>,
    pub verdict: Verdict,
    pub recommendation: String,
}

/// What the HTTP bridge serves: a report flattened for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub house_name: String,
    pub floors: Vec<FloorModel>,
}

impl ReportModel {
    pub fn from_report(report: &HouseReport, heatmap_width: f32) -> Self {
        let floors = report
            .floors
            .iter()
            .map(|floor| FloorModel {
                name: floor.name.clone(),
                access_point_count: floor.access_point_count,
                mean_signal_dbm: floor.mean_signal_dbm,
                channels: floor
                    .histogram
                    .iter()
                    .map(|(channel, access_points)| ChannelRow {
                        channel,
                        access_points,
                    })
                    .collect(),
                heatmap: floor.overlap.segments(heatmap_width),
                verdict: floor.verdict.clone(),
                recommendation: floor.verdict.to_string(),
            })
            .collect();

        Self {
            house_name: report.house_name.clone(),
            floors,
        }
    }

    /// Terminal rendering of the heatmap, one bar per channel.
    pub fn heatmap_text(&self) -> HeatmapText<'_> {
        HeatmapText(self)
    }
}

pub struct HeatmapText<'a>(&'a ReportModel);

impl fmt::Display for HeatmapText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for floor in &self.0.floors {
            writeln!(f, "=== {} ===", floor.name)?;
            if floor.heatmap.is_empty() {
                writeln!(f, "  No channel overlap data.")?;
                continue;
            }
            for segment in &floor.heatmap {
                let filled = (segment.ratio.clamp(0.0, 1.0) * BAR_CELLS as f32).round() as usize;
                writeln!(
                    f,
                    "  Ch {:>3} |{}{}| {:.2} {}",
                    segment.channel,
                    "#".repeat(filled),
                    " ".repeat(BAR_CELLS - filled),
                    segment.ratio,
                    segment.color.to_hex()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcore::{AccessPointRecord, House, ProviderSnapshot, ReportBuilder};

    fn sample_report() -> HouseReport {
        let mut house = House::with_layout("Flat", vec![vec!["Kitchen", "Hall"]]);
        let ids: Vec<_> = house.rooms().map(|(_, room)| room.id).collect();
        house
            .record_scan(
                ids[0],
                vec![
                    AccessPointRecord::new().with_bssid("aa:aa:aa:aa:aa:01").with_channel(1),
                    AccessPointRecord::new().with_bssid("aa:aa:aa:aa:aa:02").with_channel(6),
                ],
            )
            .unwrap();
        house
            .record_scan(
                ids[1],
                vec![AccessPointRecord::new().with_bssid("aa:aa:aa:aa:aa:03").with_channel(1)],
            )
            .unwrap();
        ReportBuilder::default().build(&house, &ProviderSnapshot::new(Ok(11), None))
    }

    #[test]
    fn model_flattens_report() {
        let model = ReportModel::from_report(&sample_report(), 200.0);
        assert_eq!(model.house_name, "Flat");
        let floor = &model.floors[0];
        assert_eq!(floor.access_point_count, 3);
        assert_eq!(
            floor.channels,
            vec![
                ChannelRow { channel: 1, access_points: 2 },
                ChannelRow { channel: 6, access_points: 1 },
            ]
        );
        assert_eq!(floor.heatmap.len(), 2);
        assert_eq!(floor.heatmap[1].x, 100.0);
        assert_eq!(floor.recommendation, "11");
    }

    #[test]
    fn heatmap_text_draws_bars() {
        let text = ReportModel::from_report(&sample_report(), 200.0)
            .heatmap_text()
            .to_string();
        assert!(text.contains("=== Floor 1 ==="));
        assert!(text.contains(&format!("  Ch   1 |{}| 1.00 #ff0000", "#".repeat(BAR_CELLS))));
        assert!(text.contains("  Ch   6 |##########          | 0.50 #800080"));
    }
}
