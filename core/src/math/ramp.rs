use serde::{Deserialize, Serialize};

/// RGB color on the cold-to-hot interference ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HeatColor {
    pub const COLD: HeatColor = HeatColor { r: 0, g: 0, b: 255 };
    pub const HOT: HeatColor = HeatColor { r: 255, g: 0, b: 0 };

    /// Blue at 0, red at 1. Out-of-range ratios are clamped.
    pub fn from_ratio(ratio: f32) -> Self {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        Self {
            r: channel_value(ratio),
            g: 0,
            b: channel_value(1.0 - ratio),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn channel_value(weight: f32) -> u8 {
    (255.0 * weight).round() as u8
}
