use std::{collections::HashMap, fs, path::Path};

use crate::error::{ArtifactError, EtaError};

/// The six categorical inputs the model consumes as integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Weather,
    Traffic,
    OrderType,
    Vehicle,
    City,
    Festival,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Weather,
        Category::Traffic,
        Category::OrderType,
        Category::Vehicle,
        Category::City,
        Category::Festival,
    ];

    /// Column name the encoder was fitted on; also the key in the encoder artifact.
    pub fn artifact_key(self) -> &'static str {
        match self {
            Category::Weather => "Weatherconditions",
            Category::Traffic => "Road_traffic_density",
            Category::OrderType => "Type_of_order",
            Category::Vehicle => "Type_of_vehicle",
            Category::City => "City",
            Category::Festival => "Festival",
        }
    }
}

/// Fitted label -> code mapping. The code of a label is its position in `classes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    feature: &'static str,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Builds an encoder, rejecting empty or duplicated class lists.
    pub fn new(feature: &'static str, classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err(format!("encoder {} has no classes", feature));
        }
        for (i, c) in classes.iter().enumerate() {
            if classes[..i].contains(c) {
                return Err(format!("encoder {} lists {:?} twice", feature, c));
            }
        }
        Ok(Self { feature, classes })
    }

    pub fn feature(&self) -> &'static str {
        self.feature
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, label: &str) -> Result<u32, EtaError> {
        self.classes
            .iter()
            .position(|c| c == label)
            .map(|i| i as u32)
            .ok_or_else(|| EtaError::UnknownCategory {
                feature: self.feature,
                label: label.to_string(),
            })
    }
}

/// One encoder slot per categorical feature.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    pub weather: LabelEncoder,
    pub traffic: LabelEncoder,
    pub order_type: LabelEncoder,
    pub vehicle: LabelEncoder,
    pub city: LabelEncoder,
    pub festival: LabelEncoder,
}

impl EncoderSet {
    pub fn get(&self, category: Category) -> &LabelEncoder {
        match category {
            Category::Weather => &self.weather,
            Category::Traffic => &self.traffic,
            Category::OrderType => &self.order_type,
            Category::Vehicle => &self.vehicle,
            Category::City => &self.city,
            Category::Festival => &self.festival,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &txt)
    }

    pub(crate) fn from_json(path: &Path, txt: &str) -> Result<Self, ArtifactError> {
        let mut raw: HashMap<String, Vec<String>> =
            serde_json::from_str(txt).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut take = |category: Category| -> Result<LabelEncoder, ArtifactError> {
            let key = category.artifact_key();
            let classes = raw
                .remove(key)
                .ok_or_else(|| ArtifactError::schema(path, format!("missing encoder {}", key)))?;
            LabelEncoder::new(key, classes).map_err(|reason| ArtifactError::schema(path, reason))
        };

        Ok(Self {
            weather: take(Category::Weather)?,
            traffic: take(Category::Traffic)?,
            order_type: take(Category::OrderType)?,
            vehicle: take(Category::Vehicle)?,
            city: take(Category::City)?,
            festival: take(Category::Festival)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic() -> LabelEncoder {
        LabelEncoder::new(
            "Road_traffic_density",
            vec!["High".into(), "Jam".into(), "Low".into(), "Medium".into()],
        )
        .unwrap()
    }

    #[test]
    fn transform_is_stable_and_injective() {
        let enc = traffic();
        let codes: Vec<u32> = enc
            .classes()
            .iter()
            .map(|c| enc.transform(c).unwrap())
            .collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
        assert_eq!(enc.transform("Low").unwrap(), enc.transform("Low").unwrap());
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = traffic().transform("Gridlock").unwrap_err();
        match err {
            EtaError::UnknownCategory { feature, label } => {
                assert_eq!(feature, "Road_traffic_density");
                assert_eq!(label, "Gridlock");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_empty_classes() {
        assert!(LabelEncoder::new("City", vec![]).is_err());
        assert!(LabelEncoder::new("City", vec!["Urban".into(), "Urban".into()]).is_err());
    }

    #[test]
    fn missing_encoder_is_schema_error() {
        let txt = r#"{"Weatherconditions": ["Sunny"], "City": ["Urban"]}"#;
        let err = EncoderSet::from_json(Path::new("enc.json"), txt).unwrap_err();
        assert!(matches!(err, ArtifactError::Schema { .. }));
        assert!(err.to_string().contains("Road_traffic_density"));
    }
}
