//! Price estimation for Belgian residential property.
//!
//! A client payload is translated to a canonical [`PropertyRecord`], turned
//! into a fixed-layout [`FeatureVector`] by the [`Normalizer`], and scored by
//! a [`Predictor`] that owns the trained regression model.

pub mod config;
pub mod estimator;
pub mod geocode;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod predictor;
pub mod utils;

pub use estimator::{EstimateError, PriceEstimator, ScoreLine, SetupError};
pub use model::{FeatureVector, NormalizeError, PropertyRecord};
pub use normalizer::{FeatureSchema, Normalizer, normalize_all};
pub use predictor::Predictor;
