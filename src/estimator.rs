// Normalizer + predictor: one payload in, one price (or one rejection) out.
use crate::config::{AppConfig, PredictorConfig, SchemaConfig};
use crate::geocode::GeocodeTable;
use crate::model::{ErrorReport, NormalizeError, ParserError, PredictError, PropertyRecord};
use crate::normalizer::{FeatureSchema, Normalizer, SchemaError};
use crate::parser::{Parser, PayloadParser};
use crate::predictor::{LinearPredictor, Predictor, RemotePredictor, WeightsError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Start-up failures. Any of these stops the service before it scores anything.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Weights(#[from] WeightsError),
    #[error(transparent)]
    Predictor(#[from] PredictError),
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error(transparent)]
    Payload(#[from] ParserError),
    #[error(transparent)]
    Invalid(#[from] NormalizeError),
    #[error("prediction failed: {0}")]
    Internal(#[from] PredictError),
}

impl EstimateError {
    pub fn kind(&self) -> &'static str {
        match self {
            EstimateError::Payload(ParserError::InvalidPayload(_)) => "InvalidPayload",
            EstimateError::Payload(ParserError::DuplicateField { .. }) => "DuplicateField",
            EstimateError::Invalid(e) => e.kind(),
            EstimateError::Internal(_) => "InternalError",
        }
    }

    /// HTTP-style status the calling layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            EstimateError::Payload(_) => 400,
            EstimateError::Invalid(_) => 422,
            EstimateError::Internal(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            status: self.status(),
            message: self.to_string(),
        }
    }
}

/// One output line per input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub line: usize,
    pub scored_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

pub struct PriceEstimator {
    parser: PayloadParser,
    normalizer: Normalizer,
    predictor: Arc<dyn Predictor>,
}

impl PriceEstimator {
    /// Refuses to pair a predictor with a schema it was not trained on.
    pub fn new(normalizer: Normalizer, predictor: Arc<dyn Predictor>) -> Result<Self, PredictError> {
        if let Some(expected) = predictor.expected_columns() {
            let actual = normalizer.schema().columns();
            if expected != actual {
                return Err(PredictError::SchemaMismatch {
                    expected: expected.to_vec(),
                    actual: actual.to_vec(),
                });
            }
        }
        Ok(Self {
            parser: PayloadParser::new(),
            normalizer,
            predictor,
        })
    }

    /// Wires geocode table, schema and predictor from configuration. A missing
    /// or unreadable geocode table degrades to default coordinates.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let geocoder = match &config.geocode_path {
            Some(path) => GeocodeTable::load(path).unwrap_or_else(|e| {
                warn!("Geocode table unavailable, using default coordinates: {}", e);
                GeocodeTable::empty()
            }),
            None => {
                warn!("No geocode table configured, using default coordinates");
                GeocodeTable::empty()
            }
        };

        let schema = match &config.schema {
            SchemaConfig::Standard => FeatureSchema::standard(),
            SchemaConfig::Compact => FeatureSchema::compact(),
            SchemaConfig::Columns { path } => FeatureSchema::load(path)?,
        };

        let predictor: Arc<dyn Predictor> = match &config.predictor {
            PredictorConfig::Linear { weights_path } => Arc::new(LinearPredictor::load(weights_path)?),
            PredictorConfig::Remote {
                url,
                timeout_seconds,
            } => Arc::new(RemotePredictor::new(
                url.clone(),
                Duration::from_secs(*timeout_seconds),
            )?),
        };

        info!(
            "Serving schema '{}' ({} columns) with {} predictor",
            schema.name(),
            schema.len(),
            predictor.name()
        );
        let normalizer = Normalizer::new(Arc::new(geocoder), schema);
        Ok(Self::new(normalizer, predictor)?)
    }

    pub async fn estimate(&self, record: &PropertyRecord) -> Result<f64, EstimateError> {
        let features = self.normalizer.normalize(record)?;
        let price = self.predictor.predict(&features).await?;
        Ok(price)
    }

    pub async fn estimate_payload(&self, payload: &str) -> Result<f64, EstimateError> {
        let record = self.parser.parse(payload)?;
        self.estimate(&record).await
    }

    /// Scores one raw input line; failures become an error report, never a panic.
    pub async fn score_line(&self, line: usize, payload: &str) -> ScoreLine {
        let result = self.estimate_payload(payload).await;
        let scored_at = Utc::now();
        match result {
            Ok(price) => {
                debug!("Line {}: {:.2} € via {}", line, price, self.predictor.name());
                ScoreLine {
                    line,
                    scored_at,
                    price: Some(price),
                    error: None,
                }
            }
            Err(e) => {
                if e.is_client_error() {
                    debug!("Line {} rejected: {}", line, e);
                } else {
                    warn!("Line {} failed: {}", line, e);
                }
                ScoreLine {
                    line,
                    scored_at,
                    price: None,
                    error: Some(e.report()),
                }
            }
        }
    }
}
