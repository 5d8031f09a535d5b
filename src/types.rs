use serde::{Deserialize, Serialize};

use crate::{
    insights::{BufferedEstimate, SpeedBand},
    options::Preset,
};

pub use crate::features::DeliveryInput as PredictRequest;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpeedOut {
    pub band: String,
    pub label: String,
    pub emoji: String,
}

impl From<SpeedBand> for SpeedOut {
    fn from(b: SpeedBand) -> Self {
        Self {
            band: b.key().to_string(),
            label: b.label().to_string(),
            emoji: b.emoji().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuickInfo {
    pub is_peak_hour: bool,
    pub peak_label: String,
    pub traffic: String,
    pub traffic_indicator: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BufferOut {
    pub buffer_minutes: f64,
    pub buffered_minutes: f64,
}

impl From<BufferedEstimate> for BufferOut {
    fn from(b: BufferedEstimate) -> Self {
        Self {
            buffer_minutes: b.buffer_minutes,
            buffered_minutes: b.buffered_minutes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictResponse {
    /// Wall-clock milliseconds when the prediction was made.
    pub t: i64,
    pub minutes: f64,
    pub headline: String,
    pub arrival: Option<String>,
    pub buffer: BufferOut,
    pub speed: SpeedOut,
    pub quick_info: QuickInfo,
    pub insights: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthOut {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct PresetsOut {
    pub default: &'static str,
    pub presets: Vec<Preset>,
}
