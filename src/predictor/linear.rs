use crate::model::{FeatureVector, PredictError};
use crate::predictor::traits::{Predictor, check_columns};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("failed to read model weights {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model weights: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model has {columns} columns but {coefficients} coefficients")]
    LengthMismatch { columns: usize, coefficients: usize },
    #[error("model has no columns")]
    Empty,
}

/// Exported linear regression: `{"columns": [...], "intercept": f, "coefficients": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearWeights {
    pub columns: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearPredictor {
    weights: LinearWeights,
}

impl LinearPredictor {
    pub fn new(weights: LinearWeights) -> Result<Self, WeightsError> {
        if weights.columns.is_empty() {
            return Err(WeightsError::Empty);
        }
        if weights.columns.len() != weights.coefficients.len() {
            return Err(WeightsError::LengthMismatch {
                columns: weights.columns.len(),
                coefficients: weights.coefficients.len(),
            });
        }
        Ok(Self { weights })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WeightsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| WeightsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let weights: LinearWeights = serde_json::from_str(&content)?;
        let predictor = Self::new(weights)?;
        info!(
            "Loaded linear model with {} columns from {}",
            predictor.weights.columns.len(),
            path.display()
        );
        Ok(predictor)
    }
}

#[async_trait::async_trait]
impl Predictor for LinearPredictor {
    fn name(&self) -> &str {
        "linear"
    }

    fn expected_columns(&self) -> Option<&[String]> {
        Some(self.weights.columns.as_slice())
    }

    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        check_columns(&self.weights.columns, features)?;
        let price = self.weights.intercept
            + features
                .values()
                .iter()
                .zip(&self.weights.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        if !price.is_finite() {
            return Err(PredictError::InvalidResponse(format!(
                "model produced non-finite price {price}"
            )));
        }
        Ok(price)
    }
}
