use crate::model::{FeatureVector, PredictError};
use crate::predictor::traits::Predictor;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scores rows on a model server that owns the trained regressor.
pub struct RemotePredictor {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    columns: &'a [String],
    values: &'a [f64],
}

/// Model servers answer either with a bare number or `{"prediction": n}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Bare(f64),
    Wrapped { prediction: f64 },
}

impl RemotePredictor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictError> {
        let client = Client::builder()
            .user_agent(concat!("immo-predict/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PredictError::Http(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl Predictor for RemotePredictor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let body = PredictRequest {
            columns: features.columns(),
            values: features.values(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::InvalidResponse(format!("status {status}")));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        parse_response(&text)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> PredictError {
    if e.is_timeout() {
        PredictError::Timeout
    } else {
        PredictError::Http(e.to_string())
    }
}

fn parse_response(body: &str) -> Result<f64, PredictError> {
    let price = match serde_json::from_str::<PredictResponse>(body) {
        Ok(PredictResponse::Bare(p)) | Ok(PredictResponse::Wrapped { prediction: p }) => p,
        Err(e) => return Err(PredictError::InvalidResponse(e.to_string())),
    };
    if !price.is_finite() {
        return Err(PredictError::InvalidResponse(format!(
            "non-finite prediction {price}"
        )));
    }
    Ok(price)
}
