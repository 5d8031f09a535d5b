//! Presentation of a predicted delivery time: arrival clock, buffer, speed band and
//! the conditions that push the estimate up or down.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::features::DeliveryInput;

pub const BUFFER_RATE: f64 = 0.15;

pub const IDEAL_CONDITIONS: &str = "✨ Ideal conditions: nothing is slowing this delivery down";

/// `now + minutes` on a 12-hour clock, e.g. `01:45 PM`. Calendar-correct across
/// hour and day rollover; `None` only if the result leaves chrono's range.
pub fn format_arrival(now: NaiveDateTime, minutes: f64) -> Option<String> {
    let ms = (minutes * 60_000.0).round();
    if !ms.is_finite() {
        return None;
    }
    let arrival = now.checked_add_signed(Duration::try_milliseconds(ms as i64)?)?;
    Some(arrival.format("%I:%M %p").to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferedEstimate {
    pub buffer_minutes: f64,
    pub buffered_minutes: f64,
}

impl BufferedEstimate {
    pub fn new(minutes: f64) -> Self {
        let buffer = minutes * BUFFER_RATE;
        Self {
            buffer_minutes: buffer.round(),
            buffered_minutes: (minutes + buffer).round(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedBand {
    SuperFast,
    GoodTime,
    TakesAWhile,
    LongWait,
}

impl SpeedBand {
    pub fn classify(minutes: f64) -> Self {
        if minutes < 20.0 {
            SpeedBand::SuperFast
        } else if minutes < 30.0 {
            SpeedBand::GoodTime
        } else if minutes < 45.0 {
            SpeedBand::TakesAWhile
        } else {
            SpeedBand::LongWait
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SpeedBand::SuperFast => "super_fast",
            SpeedBand::GoodTime => "good_time",
            SpeedBand::TakesAWhile => "takes_a_while",
            SpeedBand::LongWait => "long_wait",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedBand::SuperFast => "Super Fast",
            SpeedBand::GoodTime => "Good Time",
            SpeedBand::TakesAWhile => "Takes a While",
            SpeedBand::LongWait => "Long Wait",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            SpeedBand::SuperFast => "🚀",
            SpeedBand::GoodTime => "👍",
            SpeedBand::TakesAWhile => "⏳",
            SpeedBand::LongWait => "🐢",
        }
    }
}

fn is_one_of(label: &str, options: &[&str]) -> bool {
    let label = label.trim();
    options.iter().any(|o| label.eq_ignore_ascii_case(o))
}

/// One line per condition that applies, checked in a fixed order. Empty when
/// nothing applies.
pub fn contributing_factors(input: &DeliveryInput, peak: bool) -> Vec<String> {
    let mut out = Vec::new();
    if peak {
        out.push(format!("🔥 Peak hour ({}:00) means more orders in the queue", input.order_hour));
    }
    if is_one_of(&input.traffic, &["High", "Jam"]) {
        out.push(format!("🚦 {} traffic slows the rider down", input.traffic.trim()));
    }
    if is_one_of(&input.weather, &["Stormy", "Sandstorms", "Sandstorm"]) {
        out.push(format!("🌪 {} weather makes the ride slower", input.weather.trim()));
    }
    if is_one_of(&input.festival, &["Yes"]) {
        out.push("🎊 Festival day: expect extra demand".to_string());
    }
    if input.multiple_deliveries > 1 {
        out.push(format!(
            "📦 {} deliveries bundled in this trip",
            input.multiple_deliveries
        ));
    }
    if input.distance_km > 5.0 {
        out.push(format!("📍 Long distance ({:.1} km)", input.distance_km));
    }
    if input.distance_km < 2.0 {
        out.push(format!("📍 Short distance ({:.1} km) keeps it quick", input.distance_km));
    }
    out
}

/// `contributing_factors`, or the single ideal-conditions line when there are none.
pub fn insight_lines(input: &DeliveryInput, peak: bool) -> Vec<String> {
    let factors = contributing_factors(input, peak);
    if factors.is_empty() {
        vec![IDEAL_CONDITIONS.to_string()]
    } else {
        factors
    }
}

pub fn peak_label(peak: bool) -> &'static str {
    if peak {
        "🔥 Peak Hour"
    } else {
        "✅ Off Peak"
    }
}

/// Uses the same trimmed, case-insensitive matching as `contributing_factors`.
pub fn traffic_indicator(traffic: &str) -> &'static str {
    [("Low", "🟢"), ("Medium", "🟡"), ("High", "🟠"), ("Jam", "🔴")]
        .into_iter()
        .find(|(level, _)| is_one_of(traffic, &[*level]))
        .map_or("⚪", |(_, dot)| dot)
}

pub fn headline(minutes: f64) -> String {
    format!("⏱ {:.0} minutes", minutes)
}
