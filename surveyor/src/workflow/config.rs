use anyhow::Context;
use clap::ValueEnum;
use meshcore::GroupingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Synthetic,
    Iw,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub provider: ProviderKind,
    pub interface: String,
    /// Use `iw ... scan dump` instead of triggering a fresh scan.
    pub cached_scan: bool,
    pub seed: u64,
    pub synthetic_access_points: usize,
    pub grouping: GroupingPolicy,
    pub heatmap_width: f32,
    pub bind: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Synthetic,
            interface: "wlan0".to_string(),
            cached_scan: false,
            seed: 42,
            synthetic_access_points: 12,
            grouping: GroupingPolicy::RoomChannels,
            heatmap_width: 500.0,
            bind: "127.0.0.1:9000".to_string(),
        }
    }
}

impl SurveyConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading survey config {}", path_ref.display()))?;
        let config: SurveyConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing survey config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn with_overrides(
        mut self,
        provider: Option<ProviderKind>,
        interface: Option<String>,
        seed: Option<u64>,
        bind: Option<String>,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }
        if let Some(interface) = interface {
            self.interface = interface;
        }
        if let Some(seed) = seed {
            self.seed = seed;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }
}
