//! Pre-trained pair scoring model.
//!
//! A maximum-entropy (logistic) model over the [`Feature`] vector:
//! `confidence = sigmoid(bias + Σ wᵢ·xᵢ)`. Weights are trained elsewhere and
//! shipped as JSON:
//!
//! ```json
//! { "bias": -2.0, "weights": { "token_overlap": 4.5, "diff_num": -2.1, ... } }
//! ```
//!
//! Every feature must have a weight. Load once at startup and share as
//! `Arc<ScoringModel>`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use genemap_common::{GeneMapError, Result};

use crate::features::{Feature, FeatureVector};

/// Confidence given to an exact normalized match without consulting the model.
pub const PERFECT_SCORE: f64 = 1.0;

/// Serialized form of the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    bias: f64,
    weights: BTreeMap<String, f64>,
}

/// Logistic weight vector, one weight per [`Feature`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    bias: f64,
    weights: [f64; Feature::COUNT],
}

impl ScoringModel {
    // ── Constructors ──────────────────────────────────────────────────────────

    pub fn new(bias: f64, weights: [f64; Feature::COUNT]) -> Result<Self> {
        if !bias.is_finite() {
            return Err(GeneMapError::ModelLoad(format!("bias is not finite: {bias}")));
        }
        if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(GeneMapError::ModelLoad(format!(
                "weight for {} is not finite: {w}",
                Feature::ALL[i]
            )));
        }
        Ok(Self { bias, weights })
    }

    /// Parse the JSON weight file.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json)
            .map_err(|e| GeneMapError::ModelLoad(format!("invalid model JSON: {e}")))?;

        let mut weights = [0.0; Feature::COUNT];
        let mut seen = [false; Feature::COUNT];
        for (name, weight) in &file.weights {
            let feature = Feature::from_name(name)
                .ok_or_else(|| GeneMapError::ModelLoad(format!("unknown feature {name:?}")))?;
            weights[feature as usize] = *weight;
            seen[feature as usize] = true;
        }
        let missing: Vec<&str> = Feature::ALL
            .iter()
            .zip(seen.iter())
            .filter(|(_, s)| !**s)
            .map(|(f, _)| f.name())
            .collect();
        if !missing.is_empty() {
            return Err(GeneMapError::ModelLoad(format!(
                "model has no weight for: {}",
                missing.join(", ")
            )));
        }

        Self::new(file.bias, weights)
    }

    /// Read and parse a JSON weight file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GeneMapError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            "Scoring model loaded from {}: {} features, bias {:.3}",
            path.display(),
            Feature::COUNT,
            model.bias
        );
        Ok(model)
    }

    // ── Scoring ───────────────────────────────────────────────────────────────

    /// Probability in [0, 1] that the pair names the same gene.
    pub fn score(&self, features: &FeatureVector) -> f64 {
        let z = self.bias
            + self
                .weights
                .iter()
                .zip(features.as_array().iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(z)
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights[feature as usize]
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Serialize back to the JSON weight format.
    pub fn to_json(&self) -> Result<String> {
        let file = ModelFile {
            bias: self.bias,
            weights: Feature::ALL
                .iter()
                .map(|f| (f.name().to_string(), self.weight(*f)))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
