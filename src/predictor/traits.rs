use crate::model::{FeatureVector, PredictError};

/// The trained model behind the normalizer. Whatever owns the weights only
/// has to score one fixed-layout row at a time.
#[async_trait::async_trait]
pub trait Predictor: Send + Sync {
    fn name(&self) -> &str;

    /// Column order the model was trained on, when the predictor knows it.
    fn expected_columns(&self) -> Option<&[String]> {
        None
    }

    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError>;
}

/// Fails with [`PredictError::SchemaMismatch`] unless `features` has exactly
/// the `expected` columns in the same order.
pub fn check_columns(expected: &[String], features: &FeatureVector) -> Result<(), PredictError> {
    if expected == features.columns() {
        Ok(())
    } else {
        Err(PredictError::SchemaMismatch {
            expected: expected.to_vec(),
            actual: features.columns().to_vec(),
        })
    }
}
