use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, net::SocketAddr, path::PathBuf};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub encoders_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Exit at startup instead of serving degraded when artifacts fail to load.
    pub halt_on_load_failure: bool,
    /// Log every assembled feature record.
    pub log_predictions: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("delivery_time_model.json"),
            encoders_path: PathBuf::from("label_encoders.json"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            halt_on_load_failure: false,
            log_predictions: false,
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path))
    }

    /// Optional JSON file from `ETA_CONFIG`, then environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var("ETA_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|k| env::var(k).ok())?;
        Ok(cfg)
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(p) = get("MODEL_PATH") {
            self.model_path = PathBuf::from(p);
        }
        if let Some(p) = get("ENCODERS_PATH") {
            self.encoders_path = PathBuf::from(p);
        }
        if let Some(a) = get("BIND_ADDR") {
            self.bind_addr = a
                .parse()
                .with_context(|| format!("BIND_ADDR {:?} is not a socket address", a))?;
        }
        if let Some(p) = get("PORT") {
            let port: u16 = p.parse().with_context(|| format!("PORT {:?} is not a port", p))?;
            self.bind_addr.set_port(port);
        }
        if let Some(v) = get("HALT_ON_LOAD_FAILURE") {
            self.halt_on_load_failure = flag(&v);
        }
        if let Some(v) = get("LOG_PRED") {
            self.log_predictions = flag(&v);
        }
        Ok(())
    }
}

fn flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("MODEL_PATH", "/srv/model.json"),
            ("PORT", "9000"),
            ("HALT_ON_LOAD_FAILURE", "true"),
            ("LOG_PRED", "1"),
        ]
        .into_iter()
        .collect();
        let mut cfg = ServiceConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(cfg.encoders_path, PathBuf::from("label_encoders.json"));
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.halt_on_load_failure);
        assert!(cfg.log_predictions);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut cfg = ServiceConfig::default();
        assert!(cfg
            .apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ServiceConfig = serde_json::from_str(r#"{"halt_on_load_failure": true}"#).unwrap();
        assert!(cfg.halt_on_load_failure);
        assert_eq!(cfg.bind_addr.port(), 8080);
    }
}
