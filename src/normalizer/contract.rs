//! The canonical request contract: which fields are required, their coarse
//! types, and the documented default of every optional field.

use crate::geocode::DEFAULT_COORDINATES;
use crate::model::{CoarseType, NormalizeError, PropertyRecord};
use crate::normalizer::encoding::{BuildingState, EPC_SCORES, PROVINCES, PropertyType, SUBTYPES};
use serde_json::Value;

pub const REQUIRED_FIELDS: &[(&str, CoarseType)] = &[
    ("area", CoarseType::Number),
    ("property-type", CoarseType::String),
    ("rooms-number", CoarseType::Integer),
    ("zip-code", CoarseType::Integer),
];

pub const DEFAULT_BUILDING_STATE: &str = "GOOD";
pub const DEFAULT_PROVINCE: &str = "Brussels";
pub const DEFAULT_SUBTYPE: &str = "APARTMENT";
pub const DEFAULT_EPC_SCORE: &str = "C";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Number(f64),
    Integer(i64),
    Flag(bool),
}

impl Fallback {
    fn expected(self) -> CoarseType {
        match self {
            Fallback::Number(_) => CoarseType::Number,
            Fallback::Integer(_) => CoarseType::Integer,
            Fallback::Flag(_) => CoarseType::Boolean,
        }
    }

    fn encoded(self) -> f64 {
        match self {
            Fallback::Number(n) => n,
            Fallback::Integer(n) => n as f64,
            Fallback::Flag(b) => flag(b),
        }
    }
}

/// An optional numeric or boolean field that maps one-to-one onto a column.
#[derive(Debug, Clone, Copy)]
pub struct OptionalField {
    pub key: &'static str,
    pub column: &'static str,
    pub fallback: Fallback,
}

impl OptionalField {
    const fn new(key: &'static str, column: &'static str, fallback: Fallback) -> Self {
        Self {
            key,
            column,
            fallback,
        }
    }
}

pub const OPTIONAL_FIELDS: &[OptionalField] = &[
    OptionalField::new("land-area", "land_area", Fallback::Number(0.0)),
    OptionalField::new("garden", "garden", Fallback::Flag(false)),
    OptionalField::new("garden-area", "garden_area", Fallback::Number(0.0)),
    OptionalField::new("equipped-kitchen", "equipped_kitchen", Fallback::Flag(false)),
    OptionalField::new("swimming-pool", "swimming_pool", Fallback::Flag(false)),
    OptionalField::new("furnished", "furnished", Fallback::Flag(false)),
    OptionalField::new("open-fire", "open_fire", Fallback::Flag(false)),
    OptionalField::new("terrace", "terrace", Fallback::Flag(false)),
    OptionalField::new("terrace-area", "terrace_area", Fallback::Number(0.0)),
    OptionalField::new("facades-number", "facades_number", Fallback::Integer(1)),
    OptionalField::new("bathroom-count", "bathroom_count", Fallback::Number(1.0)),
    OptionalField::new("toilet-count", "toilet_count", Fallback::Number(1.0)),
    OptionalField::new("has-attic", "has_attic", Fallback::Flag(false)),
    OptionalField::new("has-air-conditioning", "has_air_conditioning", Fallback::Flag(false)),
    OptionalField::new("has-armored-door", "has_armored_door", Fallback::Flag(false)),
    OptionalField::new("has-visiophone", "has_visiophone", Fallback::Flag(false)),
    OptionalField::new("has-office", "has_office", Fallback::Flag(false)),
    OptionalField::new("has-basement", "has_basement", Fallback::Flag(false)),
    OptionalField::new("has-dressing-room", "has_dressing_room", Fallback::Flag(false)),
    OptionalField::new("has-dining-room", "has_dining_room", Fallback::Flag(false)),
    OptionalField::new("has-lift", "has_lift", Fallback::Flag(false)),
    OptionalField::new("has-heat-pump", "has_heat_pump", Fallback::Flag(false)),
    OptionalField::new(
        "has-photovoltaic-panels",
        "has_photovoltaic_panels",
        Fallback::Flag(false),
    ),
    OptionalField::new("has-living-room", "has_living_room", Fallback::Flag(true)),
    OptionalField::new("has-parking", "has_parking", Fallback::Flag(false)),
];

/// A record that passed validation, with every optional field filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub area: f64,
    pub property_type: PropertyType,
    pub rooms_number: i64,
    pub zip_code: i64,
    pub building_state: BuildingState,
    pub province: String,
    pub subtype: String,
    pub epc_score: String,
    pub full_address: String,
    /// One entry per [`OPTIONAL_FIELDS`] item, in the same order.
    pub optional: Vec<(&'static str, f64)>,
}

impl CleanRecord {
    /// Validates required fields and enum values, then fills defaults.
    /// Fails fast on the first violation.
    pub fn from_record(record: &PropertyRecord) -> Result<Self, NormalizeError> {
        for &(field, expected) in REQUIRED_FIELDS {
            let value = record.get(field).ok_or(NormalizeError::MissingField(field))?;
            if !matches_type(value, expected) {
                return Err(NormalizeError::InvalidType { field, expected });
            }
        }

        let property_type = parse_property_type(record)?;
        let building_state = parse_building_state(record)?;

        let area = record
            .get("area")
            .and_then(Value::as_f64)
            .ok_or(NormalizeError::InvalidType {
                field: "area",
                expected: CoarseType::Number,
            })?;
        let rooms_number = integer(record, "rooms-number")?;
        let zip_code = integer(record, "zip-code")?;

        let optional = OPTIONAL_FIELDS
            .iter()
            .map(|f| Ok((f.column, optional_value(record, f)?)))
            .collect::<Result<Vec<_>, NormalizeError>>()?;

        Ok(Self {
            area,
            property_type,
            rooms_number,
            zip_code,
            building_state,
            province: optional_text(record, "province", DEFAULT_PROVINCE)?,
            subtype: optional_text(record, "subtype", DEFAULT_SUBTYPE)?,
            epc_score: optional_text(record, "epc-score", DEFAULT_EPC_SCORE)?,
            full_address: optional_text(record, "full-address", "")?,
            optional,
        })
    }
}

/// Documented default for a column the normalizer produces, encoded as the
/// model sees it. Required columns and unknown names have none.
pub fn column_default(column: &str) -> Option<f64> {
    if let Some(field) = OPTIONAL_FIELDS.iter().find(|f| f.column == column) {
        return Some(field.fallback.encoded());
    }
    let default: f64 = match column {
        "building_state" => BuildingState::parse(DEFAULT_BUILDING_STATE)?.code().into(),
        "province" => PROVINCES.encode(DEFAULT_PROVINCE).into(),
        "subtype" => SUBTYPES.encode(DEFAULT_SUBTYPE).into(),
        "epc_score" => EPC_SCORES.encode(DEFAULT_EPC_SCORE).into(),
        "latitude" => DEFAULT_COORDINATES.latitude,
        "longitude" => DEFAULT_COORDINATES.longitude,
        _ => return None,
    };
    Some(default)
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn matches_type(value: &Value, expected: CoarseType) -> bool {
    match expected {
        CoarseType::Integer => value.is_i64() || value.is_u64(),
        CoarseType::Number => value.is_number(),
        CoarseType::String => value.is_string(),
        CoarseType::Boolean => as_flag(value).is_some(),
    }
}

/// Booleans, plus the integers 0 and 1 that form submissions send.
fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn integer(record: &PropertyRecord, field: &'static str) -> Result<i64, NormalizeError> {
    record
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(NormalizeError::InvalidType {
            field,
            expected: CoarseType::Integer,
        })
}

fn parse_property_type(record: &PropertyRecord) -> Result<PropertyType, NormalizeError> {
    let label = record.get("property-type").and_then(Value::as_str).unwrap_or_default();
    PropertyType::parse(label).ok_or_else(|| NormalizeError::InvalidEnum {
        field: "property-type",
        value: label.to_string(),
        accepted: PropertyType::ACCEPTED,
    })
}

fn parse_building_state(record: &PropertyRecord) -> Result<BuildingState, NormalizeError> {
    let label = optional_text(record, "building-state", DEFAULT_BUILDING_STATE)?;
    BuildingState::parse(&label).ok_or(NormalizeError::InvalidEnum {
        field: "building-state",
        value: label,
        accepted: BuildingState::ACCEPTED,
    })
}

fn optional_text(
    record: &PropertyRecord,
    field: &'static str,
    default: &str,
) -> Result<String, NormalizeError> {
    match record.get(field) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(NormalizeError::InvalidType {
            field,
            expected: CoarseType::String,
        }),
    }
}

fn optional_value(record: &PropertyRecord, field: &OptionalField) -> Result<f64, NormalizeError> {
    let Some(value) = record.get(field.key) else {
        return Ok(field.fallback.encoded());
    };
    let expected = field.fallback.expected();
    let parsed = match expected {
        CoarseType::Boolean => as_flag(value).map(flag),
        CoarseType::Integer => value.as_i64().map(|n| n as f64),
        _ => value.as_f64(),
    };
    parsed.ok_or(NormalizeError::InvalidType {
        field: field.key,
        expected,
    })
}
