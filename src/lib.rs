//! Delivery time estimation service.
//!
//! Loads a gradient-boosted tree model and its label encoders once at startup,
//! turns a delivery's attributes into the model's 13-field feature record, and
//! dresses the predicted minutes up with an arrival time, a safety buffer and
//! the conditions behind the estimate.

pub mod artifacts;
pub mod config;
pub mod encoders;
pub mod error;
pub mod features;
pub mod insights;
pub mod model;
pub mod options;
pub mod server;
pub mod types;

pub use artifacts::{load_artifacts, Artifacts, ModelState};
pub use config::ServiceConfig;
pub use encoders::{Category, EncoderSet, LabelEncoder};
pub use error::{ArtifactError, EtaError};
pub use features::{is_peak_hour, predict_minutes, DeliveryInput, FeatureRecord, FEATURE_NAMES};
pub use model::{Regressor, TreeEnsemble};
