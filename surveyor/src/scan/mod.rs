pub mod heuristic;
pub mod iw;
pub mod synthetic;

use crate::workflow::config::{ProviderKind, SurveyConfig};
use iw::IwScanProvider;
use meshcore::ScanProvider;
use synthetic::SyntheticProvider;

pub fn build_provider(config: &SurveyConfig) -> Box<dyn ScanProvider> {
    match config.provider {
        ProviderKind::Synthetic => Box::new(SyntheticProvider::new(
            config.seed,
            config.synthetic_access_points,
        )),
        ProviderKind::Iw => {
            let provider = IwScanProvider::new(config.interface.clone());
            if config.cached_scan {
                Box::new(provider.use_cached())
            } else {
                Box::new(provider)
            }
        }
    }
}
