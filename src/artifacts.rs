//! Loading of the model and encoder artifacts, and the state the service keeps them in.

use std::{fmt, sync::Arc};

use tracing::{error, info, warn};

use crate::{
    config::ServiceConfig,
    encoders::EncoderSet,
    error::{ArtifactError, EtaError},
    model::{Regressor, TreeEnsemble},
};

/// The immutable pair every prediction reads from.
pub struct Artifacts {
    pub model: Box<dyn Regressor>,
    pub encoders: EncoderSet,
}

impl Artifacts {
    pub fn new(model: Box<dyn Regressor>, encoders: EncoderSet) -> Self {
        Self { model, encoders }
    }
}

#[derive(Clone, Default)]
pub enum ModelState {
    #[default]
    Uninitialized,
    Ready(Arc<Artifacts>),
    Failed {
        reason: String,
    },
}

impl ModelState {
    /// The one gate in front of every prediction.
    pub fn artifacts(&self) -> Result<&Arc<Artifacts>, EtaError> {
        match self {
            ModelState::Ready(a) => Ok(a),
            ModelState::Failed { reason } => Err(EtaError::NotLoaded(reason.clone())),
            ModelState::Uninitialized => {
                Err(EtaError::NotLoaded("artifacts have not been loaded yet".to_string()))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            ModelState::Uninitialized => "uninitialized",
            ModelState::Ready(_) => "ready",
            ModelState::Failed { .. } => "failed",
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ModelState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelState")
            .field("status", &self.status())
            .field("reason", &self.failure())
            .finish()
    }
}

/// Reads both artifacts from their configured paths.
pub fn try_load(cfg: &ServiceConfig) -> Result<Artifacts, ArtifactError> {
    let model = TreeEnsemble::load(&cfg.model_path)?;
    info!(
        path = %cfg.model_path.display(),
        trees = model.tree_count(),
        base_score = model.base_score(),
        "loaded model"
    );
    let encoders = EncoderSet::load(&cfg.encoders_path)?;
    info!(path = %cfg.encoders_path.display(), "loaded label encoders");
    Ok(Artifacts::new(Box::new(model), encoders))
}

/// Runs the loader once and records the outcome; never panics on bad artifacts.
pub fn load_artifacts(cfg: &ServiceConfig) -> ModelState {
    match try_load(cfg) {
        Ok(a) => ModelState::Ready(Arc::new(a)),
        Err(e) => {
            error!(error = %e, "model files not found or failed to load");
            ModelState::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Startup policy: with `halt_on_load_failure` a failed load is fatal, otherwise
/// the service comes up degraded and `/predict` refuses until restarted.
pub fn startup_state(cfg: &ServiceConfig) -> anyhow::Result<ModelState> {
    let state = load_artifacts(cfg);
    if let ModelState::Failed { reason } = &state {
        if cfg.halt_on_load_failure {
            anyhow::bail!("cannot start without model artifacts: {}", reason);
        }
        warn!("serving in degraded mode; /predict will answer 503 until restarted with valid artifacts");
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_paths() -> ServiceConfig {
        ServiceConfig {
            model_path: "/nonexistent/delivery_time_model.json".into(),
            encoders_path: "/nonexistent/label_encoders.json".into(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn missing_files_leave_state_failed() {
        let state = load_artifacts(&missing_paths());
        assert_eq!(state.status(), "failed");
        assert!(state.failure().unwrap().contains("delivery_time_model.json"));
        assert!(matches!(state.artifacts(), Err(EtaError::NotLoaded(_))));
    }

    #[test]
    fn uninitialized_refuses_predictions() {
        let state = ModelState::default();
        assert!(!state.is_ready());
        assert!(matches!(state.artifacts(), Err(EtaError::NotLoaded(_))));
    }

    #[test]
    fn halt_policy_refuses_to_start() {
        let cfg = ServiceConfig {
            halt_on_load_failure: true,
            ..missing_paths()
        };
        let err = startup_state(&cfg).unwrap_err();
        assert!(err.to_string().contains("cannot start without model artifacts"));
        assert!(err.to_string().contains("delivery_time_model.json"));
    }

    #[test]
    fn degrade_policy_starts_failed() {
        let state = startup_state(&missing_paths()).unwrap();
        assert_eq!(state.status(), "failed");
        assert!(matches!(state.artifacts(), Err(EtaError::NotLoaded(_))));
    }
}
