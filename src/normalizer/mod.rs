// Feature normalizer: raw property record -> fixed-order numeric row.

pub mod contract;
pub mod encoding;
pub mod schema;

pub use contract::CleanRecord;
pub use schema::{FeatureSchema, SchemaError};

use crate::geocode::GeocodeTable;
use crate::model::{FeatureVector, NormalizeError, PropertyRecord};
use encoding::{EPC_SCORES, PROVINCES, SUBTYPES};
use std::sync::Arc;
use tracing::debug;

/// Pure and stateless past construction: the geocode table and schema are
/// shared read-only, so one instance serves concurrent callers.
#[derive(Debug, Clone)]
pub struct Normalizer {
    geocoder: Arc<GeocodeTable>,
    schema: FeatureSchema,
}

impl Normalizer {
    pub fn new(geocoder: Arc<GeocodeTable>, schema: FeatureSchema) -> Self {
        Self { geocoder, schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn normalize(&self, record: &PropertyRecord) -> Result<FeatureVector, NormalizeError> {
        let clean = CleanRecord::from_record(record)?;
        let mut produced = encode(&clean);

        let point = self.geocoder.resolve(clean.zip_code);
        produced.push(("latitude", point.latitude));
        produced.push(("longitude", point.longitude));

        debug!(
            "Normalized record: {} columns produced, {} expected by '{}'",
            produced.len(),
            self.schema.len(),
            self.schema.name()
        );
        Ok(self.schema.assemble(&produced))
    }
}

/// Normalizes every record independently; one bad record never affects the others.
pub fn normalize_all(
    records: &[PropertyRecord],
    normalizer: &Normalizer,
) -> Vec<Result<FeatureVector, NormalizeError>> {
    records.iter().map(|r| normalizer.normalize(r)).collect()
}

fn encode(clean: &CleanRecord) -> Vec<(&'static str, f64)> {
    let mut produced = Vec::with_capacity(clean.optional.len() + 10);
    produced.extend([
        ("area", clean.area),
        ("property_type", f64::from(clean.property_type.code())),
        ("rooms_number", clean.rooms_number as f64),
        ("zip_code", clean.zip_code as f64),
        ("building_state", f64::from(clean.building_state.code())),
        ("province", f64::from(PROVINCES.encode(&clean.province))),
        ("subtype", f64::from(SUBTYPES.encode(&clean.subtype))),
        ("epc_score", f64::from(EPC_SCORES.encode(&clean.epc_score))),
    ]);
    produced.extend(clean.optional.iter().copied());
    produced
}
