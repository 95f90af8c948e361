pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f32]) -> Option<f32> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f32>() / samples.len() as f32)
    }

    /// `count / max` in [0, 1]; zero when `max` is zero.
    pub fn ratio(count: usize, max: usize) -> f32 {
        if max == 0 {
            return 0.0;
        }
        (count.min(max) as f64 / max as f64) as f32
    }
}
