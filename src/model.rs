use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    error::{ArtifactError, EtaError},
    features::{FeatureRecord, FEATURE_NAMES},
};

/// Anything that maps a batch of feature records to predicted minutes, one per record.
pub trait Regressor: Send + Sync {
    fn predict(&self, batch: &[FeatureRecord]) -> Result<Vec<f64>, EtaError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_missing_left() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Walks from the root; `value < threshold` goes left, NaN follows `missing_left`.
    /// Children always sit after their parent, so the walk terminates.
    fn score(&self, row: &[f64; 13]) -> f64 {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let x = row[*feature];
                    let go_left = if x.is_nan() { *missing_left } else { x < *threshold };
                    i = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// Artifact layout before the structural checks have run.
#[derive(Debug, Deserialize)]
struct RawEnsemble {
    feature_names: Vec<String>,
    #[serde(default)]
    base_score: f64,
    trees: Vec<Tree>,
}

/// Gradient-boosted regression trees: `base_score + Σ tree leaves`.
///
/// Only obtainable through the checks in `TryFrom<RawEnsemble>`, so every split
/// indexes inside the record and every child points forward.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawEnsemble")]
pub struct TreeEnsemble {
    base_score: f64,
    trees: Vec<Tree>,
}

impl TryFrom<RawEnsemble> for TreeEnsemble {
    type Error = String;

    fn try_from(raw: RawEnsemble) -> Result<Self, Self::Error> {
        if raw.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(format!(
                "feature_names {:?} do not match expected {:?}",
                raw.feature_names, FEATURE_NAMES
            ));
        }
        if raw.trees.is_empty() {
            return Err("model has no trees".to_string());
        }
        for (t, tree) in raw.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }
            for (id, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= FEATURE_NAMES.len() {
                        return Err(format!("tree {} node {}: feature {} out of range", t, id, feature));
                    }
                    if threshold.is_nan() {
                        return Err(format!("tree {} node {}: NaN threshold", t, id));
                    }
                    for child in [left, right] {
                        if *child <= id || *child >= tree.nodes.len() {
                            return Err(format!("tree {} node {}: bad child {}", t, id, child));
                        }
                    }
                }
            }
        }
        Ok(Self {
            base_score: raw.base_score,
            trees: raw.trees,
        })
    }
}

impl TreeEnsemble {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawEnsemble =
            serde_json::from_str(&txt).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        TreeEnsemble::try_from(raw).map_err(|reason| ArtifactError::schema(path, reason))
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, batch: &[FeatureRecord]) -> Result<Vec<f64>, EtaError> {
        Ok(batch
            .iter()
            .map(|rec| {
                let row = rec.values();
                self.base_score + self.trees.iter().map(|t| t.score(&row)).sum::<f64>()
            })
            .collect())
    }
}
