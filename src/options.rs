use serde::Serialize;

use crate::{
    artifacts::ModelState,
    encoders::{Category, EncoderSet},
};

/// Selectable labels for each categorical input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOptions {
    pub weather: Vec<String>,
    pub traffic: Vec<String>,
    pub order_type: Vec<String>,
    pub vehicle: Vec<String>,
    pub city: Vec<String>,
    pub festival: Vec<String>,
    /// Set when the lists are the built-in fallback rather than the encoders' classes.
    pub degraded: bool,
}

/// Illustrative labels shown while the encoders are unavailable.
fn fallback_labels(category: Category) -> &'static [&'static str] {
    match category {
        Category::Weather => &["Sunny", "Cloudy", "Fog", "Windy", "Stormy", "Sandstorms"],
        Category::Traffic => &["Low", "Medium", "High", "Jam"],
        Category::OrderType => &["Snack", "Meal", "Drinks", "Buffet"],
        Category::Vehicle => &["motorcycle", "scooter", "electric_scooter", "bicycle"],
        Category::City => &["Urban", "Metropolitan", "Semi-Urban"],
        Category::Festival => &["No", "Yes"],
    }
}

impl CategoryOptions {
    pub fn from_encoders(encoders: &EncoderSet) -> Self {
        Self::build(|c| encoders.get(c).classes().to_vec(), false)
    }

    pub fn fallback() -> Self {
        Self::build(
            |c| fallback_labels(c).iter().map(|s| s.to_string()).collect(),
            true,
        )
    }

    pub fn for_state(state: &ModelState) -> Self {
        match state.artifacts() {
            Ok(a) => Self::from_encoders(&a.encoders),
            Err(_) => Self::fallback(),
        }
    }

    fn build(labels: impl Fn(Category) -> Vec<String>, degraded: bool) -> Self {
        Self {
            weather: labels(Category::Weather),
            traffic: labels(Category::Traffic),
            order_type: labels(Category::OrderType),
            vehicle: labels(Category::Vehicle),
            city: labels(Category::City),
            festival: labels(Category::Festival),
            degraded,
        }
    }
}

/// Quick-start values for the numeric inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub title: &'static str,
    pub distance_km: f64,
    pub age: u32,
    pub rating: f64,
    pub multiple_deliveries: u32,
    pub order_hour: u32,
    pub is_weekend: bool,
}

pub const DEFAULT_PRESET: &str = "urban_lunch";

pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "urban_lunch",
            title: "🏙️ Urban Lunch",
            distance_km: 5.2,
            age: 28,
            rating: 4.5,
            multiple_deliveries: 2,
            order_hour: 13,
            is_weekend: false,
        },
        Preset {
            name: "late_night",
            title: "🌃 Late Night",
            distance_km: 3.1,
            age: 25,
            rating: 4.7,
            multiple_deliveries: 0,
            order_hour: 23,
            is_weekend: true,
        },
        Preset {
            name: "weekend_dinner",
            title: "🏡 Weekend Dinner",
            distance_km: 7.8,
            age: 32,
            rating: 4.3,
            multiple_deliveries: 1,
            order_hour: 20,
            is_weekend: true,
        },
    ]
}

pub fn preset(name: &str) -> Option<Preset> {
    presets().into_iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_marked_degraded() {
        let opts = CategoryOptions::for_state(&ModelState::default());
        assert!(opts.degraded);
        assert_eq!(opts.traffic, vec!["Low", "Medium", "High", "Jam"]);
        assert_eq!(opts.festival, vec!["No", "Yes"]);
    }

    #[test]
    fn default_preset_exists() {
        let p = preset(DEFAULT_PRESET).unwrap();
        assert_eq!(p.order_hour, 13);
        assert!(preset("brunch").is_none());
        assert_eq!(presets().len(), 3);
    }
}
