//! Input validation, derived features and assembly of the model's feature record.

use serde::{Deserialize, Serialize};

use crate::{
    encoders::{Category, EncoderSet},
    error::EtaError,
    model::Regressor,
};

/// Column order the model was trained on.
pub const FEATURE_NAMES: [&str; 13] = [
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "Weatherconditions_encoded",
    "Road_traffic_density_encoded",
    "is_peak_hour",
    "is_weekend",
    "delivery_distance_km",
    "Type_of_order_encoded",
    "Type_of_vehicle_encoded",
    "Festival_encoded",
    "City_encoded",
    "multiple_deliveries",
    "order_hour",
];

/// Raw values for one prediction, as the user entered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryInput {
    pub age: u32,
    pub rating: f64,
    pub distance_km: f64,
    pub multiple_deliveries: u32,
    pub order_hour: u32,
    pub is_weekend: bool,
    pub weather: String,
    pub traffic: String,
    pub order_type: String,
    pub vehicle: String,
    pub city: String,
    pub festival: String,
}

impl DeliveryInput {
    pub fn label(&self, category: Category) -> &str {
        match category {
            Category::Weather => &self.weather,
            Category::Traffic => &self.traffic,
            Category::OrderType => &self.order_type,
            Category::Vehicle => &self.vehicle,
            Category::City => &self.city,
            Category::Festival => &self.festival,
        }
    }

    /// Range checks for the numeric fields. Categorical labels are left to the encoders.
    pub fn validate(&self) -> Result<(), EtaError> {
        if !(18..=60).contains(&self.age) {
            return Err(EtaError::InvalidInput(format!("age {} outside 18..=60", self.age)));
        }
        if !self.rating.is_finite() || !(1.0..=5.0).contains(&self.rating) {
            return Err(EtaError::InvalidInput(format!(
                "rating {} outside 1.0..=5.0",
                self.rating
            )));
        }
        if !self.distance_km.is_finite() || !(0.1..=50.0).contains(&self.distance_km) {
            return Err(EtaError::InvalidInput(format!(
                "distance {} km outside 0.1..=50.0",
                self.distance_km
            )));
        }
        if self.multiple_deliveries > 3 {
            return Err(EtaError::InvalidInput(format!(
                "multiple deliveries {} outside 0..=3",
                self.multiple_deliveries
            )));
        }
        if self.order_hour > 23 {
            return Err(EtaError::InvalidInput(format!(
                "order hour {} outside 0..=23",
                self.order_hour
            )));
        }
        Ok(())
    }
}

/// Lunch window 11-14 or dinner window 18-22, both inclusive.
pub fn is_peak_hour(hour: u32) -> bool {
    (11..=14).contains(&hour) || (18..=22).contains(&hour)
}

/// The fixed 13-field record handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub age: f64,
    pub rating: f64,
    pub weather_code: f64,
    pub traffic_code: f64,
    pub is_peak_hour: f64,
    pub is_weekend: f64,
    pub distance_km: f64,
    pub order_type_code: f64,
    pub vehicle_code: f64,
    pub festival_code: f64,
    pub city_code: f64,
    pub multiple_deliveries: f64,
    pub order_hour: f64,
}

impl FeatureRecord {
    /// Values in `FEATURE_NAMES` order.
    pub fn values(&self) -> [f64; 13] {
        [
            self.age,
            self.rating,
            self.weather_code,
            self.traffic_code,
            self.is_peak_hour,
            self.is_weekend,
            self.distance_km,
            self.order_type_code,
            self.vehicle_code,
            self.festival_code,
            self.city_code,
            self.multiple_deliveries,
            self.order_hour,
        ]
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }

    /// Encodes the categorical labels and derives the peak/weekend flags.
    pub fn assemble(input: &DeliveryInput, encoders: &EncoderSet) -> Result<Self, EtaError> {
        let code = |c: Category| -> Result<f64, EtaError> {
            encoders.get(c).transform(input.label(c)).map(f64::from)
        };

        Ok(Self {
            age: f64::from(input.age),
            rating: input.rating,
            weather_code: code(Category::Weather)?,
            traffic_code: code(Category::Traffic)?,
            is_peak_hour: if is_peak_hour(input.order_hour) { 1.0 } else { 0.0 },
            is_weekend: if input.is_weekend { 1.0 } else { 0.0 },
            distance_km: input.distance_km,
            order_type_code: code(Category::OrderType)?,
            vehicle_code: code(Category::Vehicle)?,
            festival_code: code(Category::Festival)?,
            city_code: code(Category::City)?,
            multiple_deliveries: f64::from(input.multiple_deliveries),
            order_hour: f64::from(input.order_hour),
        })
    }
}

/// Validates, assembles and runs a single-record batch through the model.
/// The returned minutes are not clamped.
pub fn predict_minutes(
    input: &DeliveryInput,
    encoders: &EncoderSet,
    model: &dyn Regressor,
) -> Result<(FeatureRecord, f64), EtaError> {
    input.validate()?;
    let record = FeatureRecord::assemble(input, encoders)?;
    let out = model.predict(std::slice::from_ref(&record))?;
    match out.as_slice() {
        [minutes] => Ok((record, *minutes)),
        other => Err(EtaError::Model(format!(
            "expected 1 prediction, got {}",
            other.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_hour_windows() {
        let peak: Vec<u32> = (0..24).filter(|h| is_peak_hour(*h)).collect();
        assert_eq!(peak, vec![11, 12, 13, 14, 18, 19, 20, 21, 22]);
    }

    fn input() -> DeliveryInput {
        DeliveryInput {
            age: 28,
            rating: 4.5,
            distance_km: 5.2,
            multiple_deliveries: 2,
            order_hour: 13,
            is_weekend: false,
            weather: "Sunny".into(),
            traffic: "Low".into(),
            order_type: "Meal".into(),
            vehicle: "motorcycle".into(),
            city: "Metropolitan".into(),
            festival: "No".into(),
        }
    }

    #[test]
    fn validate_accepts_bounds() {
        let mut i = input();
        i.age = 18;
        i.rating = 5.0;
        i.distance_km = 0.1;
        i.multiple_deliveries = 3;
        i.order_hour = 23;
        assert!(i.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let cases: [fn(&mut DeliveryInput); 8] = [
            |i| i.age = 17,
            |i| i.age = 61,
            |i| i.rating = 0.9,
            |i| i.rating = f64::NAN,
            |i| i.distance_km = 0.0,
            |i| i.distance_km = 50.5,
            |i| i.multiple_deliveries = 4,
            |i| i.order_hour = 24,
        ];
        for mutate in cases {
            let mut i = input();
            mutate(&mut i);
            assert!(
                matches!(i.validate(), Err(EtaError::InvalidInput(_))),
                "accepted {i:?}"
            );
        }
    }

    #[test]
    fn named_values_follow_feature_order() {
        let rec = FeatureRecord {
            age: 1.0,
            rating: 2.0,
            weather_code: 3.0,
            traffic_code: 4.0,
            is_peak_hour: 5.0,
            is_weekend: 6.0,
            distance_km: 7.0,
            order_type_code: 8.0,
            vehicle_code: 9.0,
            festival_code: 10.0,
            city_code: 11.0,
            multiple_deliveries: 12.0,
            order_hour: 13.0,
        };
        let named: Vec<_> = rec.named().collect();
        assert_eq!(named[0], ("Delivery_person_Age", 1.0));
        assert_eq!(named[6], ("delivery_distance_km", 7.0));
        assert_eq!(named[12], ("order_hour", 13.0));
    }
}
