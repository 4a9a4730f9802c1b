//! Column layouts a trained model can expect, and assembly of the final row.

use crate::model::FeatureVector;
use crate::normalizer::contract::column_default;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Every column the normalizer produces, in training order.
pub const STANDARD_COLUMNS: &[&str] = &[
    "area",
    "property_type",
    "rooms_number",
    "zip_code",
    "land_area",
    "garden",
    "garden_area",
    "equipped_kitchen",
    "swimming_pool",
    "furnished",
    "open_fire",
    "terrace",
    "terrace_area",
    "facades_number",
    "building_state",
    "province",
    "subtype",
    "epc_score",
    "bathroom_count",
    "toilet_count",
    "has_attic",
    "has_air_conditioning",
    "has_armored_door",
    "has_visiophone",
    "has_office",
    "has_basement",
    "has_dressing_room",
    "has_dining_room",
    "has_lift",
    "has_heat_pump",
    "has_photovoltaic_panels",
    "has_living_room",
    "has_parking",
    "latitude",
    "longitude",
];

/// Layout of the small linear model trained on the four required fields.
pub const COMPACT_COLUMNS: &[&str] = &[
    "area",
    "rooms_number",
    "zip_code",
    "property_type",
    "garden",
    "terrace",
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read feature columns {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("feature columns must be a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feature schema '{0}' has no columns")]
    Empty(String),
    #[error("feature schema lists column '{0}' twice")]
    DuplicateColumn(String),
}

/// Fixed, ordered column list. Each column carries the value used when the
/// normalizer did not produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    name: String,
    columns: Arc<[String]>,
    defaults: Vec<f64>,
}

impl FeatureSchema {
    pub fn standard() -> Self {
        Self::from_static("standard", STANDARD_COLUMNS)
    }

    pub fn compact() -> Self {
        Self::from_static("compact", COMPACT_COLUMNS)
    }

    fn from_static(name: &str, columns: &[&str]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let defaults = columns
            .iter()
            .map(|c| column_default(c).unwrap_or(0.0))
            .collect();
        Self {
            name: name.to_string(),
            columns: columns.into(),
            defaults,
        }
    }

    /// Builds a schema from column names exported at training time.
    pub fn from_columns(name: &str, columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty(name.to_string()));
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        let schema = Self::from_static(name, &columns.iter().map(String::as_str).collect::<Vec<_>>());
        let synthesized = schema.synthesized_columns();
        if !synthesized.is_empty() {
            warn!(
                "Schema '{}': {} column(s) are never produced and will be filled with 0: {:?}",
                name,
                synthesized.len(),
                synthesized
            );
        }
        Ok(schema)
    }

    /// Loads a JSON array of column names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let columns: Vec<String> = serde_json::from_str(&content)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("columns");
        Self::from_columns(name, columns)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns the normalizer never produces.
    pub fn synthesized_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !STANDARD_COLUMNS.contains(c))
            .collect()
    }

    /// Selects `produced` values in schema order; absent columns take their default.
    pub fn assemble(&self, produced: &[(&str, f64)]) -> FeatureVector {
        let values = self
            .columns
            .iter()
            .zip(&self.defaults)
            .map(|(column, default)| {
                produced
                    .iter()
                    .find(|(name, _)| *name == column.as_str())
                    .map_or(*default, |(_, value)| *value)
            })
            .collect();
        FeatureVector::new(Arc::clone(&self.columns), values)
    }
}
