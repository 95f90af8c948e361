use std::sync::Mutex;

/// Counters describing what the last analyses did with their input.
pub struct AnalysisMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub floors_analyzed: usize,
    pub records_counted: usize,
    pub records_skipped: usize,
    pub recommendation_failures: usize,
}

#[derive(Default)]
struct Metrics {
    floors_analyzed: usize,
    records_counted: usize,
    records_skipped: usize,
    recommendation_failures: usize,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_floor(&self, counted: usize, skipped: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.floors_analyzed += 1;
            metrics.records_counted += counted;
            metrics.records_skipped += skipped;
        }
    }

    pub fn record_recommendation_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.recommendation_failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                floors_analyzed: metrics.floors_analyzed,
                records_counted: metrics.records_counted,
                records_skipped: metrics.records_skipped,
                recommendation_failures: metrics.recommendation_failures,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for AnalysisMetrics {
    fn default() -> Self {
        Self::new()
    }
}
