// Boundary translation: client payload -> canonical PropertyRecord
use crate::model::{ParserError, PropertyRecord};
use crate::utils::to_kebab_case;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

pub trait Parser {
    fn parse(&self, payload: &str) -> Result<PropertyRecord, ParserError>;
}

/// Field names used by the camelCase API variant and the form front end,
/// keyed to their canonical name. Their snake_case spellings match too.
/// Names that only differ by casing style (`bathroomCount`, `has_lift`) are
/// handled by kebab-casing instead.
const ALIASES: &[(&str, &str)] = &[
    ("type", "property-type"),
    ("propertyType", "property-type"),
    ("postCode", "zip-code"),
    ("postcode", "zip-code"),
    ("zipCode", "zip-code"),
    ("habitableSurface", "area"),
    ("bedroomCount", "rooms-number"),
    ("roomsNumber", "rooms-number"),
    ("landSurface", "land-area"),
    ("hasGarden", "garden"),
    ("gardenSurface", "garden-area"),
    ("hasTerrace", "terrace"),
    ("terraceSurface", "terrace-area"),
    ("hasSwimmingPool", "swimming-pool"),
    ("hasFireplace", "open-fire"),
    ("hasEquippedKitchen", "equipped-kitchen"),
    ("isFurnished", "furnished"),
    ("buildingCondition", "building-state"),
    ("buildingState", "building-state"),
    ("facadeCount", "facades-number"),
    ("facadesNumber", "facades-number"),
    ("epcScore", "epc-score"),
    ("fullAddress", "full-address"),
];

pub struct PayloadParser {
    aliases: HashMap<String, &'static str>,
}

impl PayloadParser {
    pub fn new() -> Self {
        let aliases = ALIASES
            .iter()
            .flat_map(|&(alias, canonical)| {
                [(alias.to_string(), canonical), (to_kebab_case(alias), canonical)]
            })
            .collect();
        Self { aliases }
    }

    pub fn canonical_key(&self, key: &str) -> String {
        if let Some(canonical) = self.aliases.get(key) {
            return canonical.to_string();
        }
        let kebab = to_kebab_case(key);
        match self.aliases.get(&kebab) {
            Some(canonical) => canonical.to_string(),
            None => kebab,
        }
    }

    /// Translates an already-decoded JSON object.
    pub fn parse_value(&self, payload: Value) -> Result<PropertyRecord, ParserError> {
        match payload {
            Value::Object(map) => self.translate(map),
            other => Err(ParserError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    fn translate(&self, map: Map<String, Value>) -> Result<PropertyRecord, ParserError> {
        let mut origins: HashMap<String, String> = HashMap::new();
        let mut record = PropertyRecord::new();
        for (key, value) in map {
            // null reads as absent, so it never competes with another spelling
            if value.is_null() {
                continue;
            }
            let canonical = self.canonical_key(&key);
            if let Some(first) = origins.get(&canonical) {
                return Err(ParserError::DuplicateField {
                    canonical,
                    first: first.clone(),
                    second: key,
                });
            }
            if canonical != key {
                debug!("Payload field {:?} read as {:?}", key, canonical);
            }
            origins.insert(canonical.clone(), key);
            record.insert(canonical, value);
        }
        Ok(record)
    }
}

impl Default for PayloadParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PayloadParser {
    fn parse(&self, payload: &str) -> Result<PropertyRecord, ParserError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ParserError::InvalidPayload(e.to_string()))?;
        self.parse_value(value)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hyphenated_payload_passes_through() {
        let record = PayloadParser::new()
            .parse(r#"{"area": 120, "property-type": "HOUSE", "rooms-number": 4, "zip-code": 1000}"#)
            .unwrap();
        assert_eq!(record.get("rooms-number"), Some(&json!(4)));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_camel_case_variant_is_translated() {
        let record = PayloadParser::new()
            .parse_value(json!({
                "type": "APARTMENT",
                "bedroomCount": 2,
                "postCode": 5330,
                "habitableSurface": 125.0,
                "buildingCondition": "GOOD",
                "gardenSurface": 0.0,
                "hasTerrace": true,
                "epcScore": "C",
                "bathroomCount": 1,
                "hasPhotovoltaicPanels": false
            }))
            .unwrap();
        assert_eq!(record.get("property-type"), Some(&json!("APARTMENT")));
        assert_eq!(record.get("rooms-number"), Some(&json!(2)));
        assert_eq!(record.get("zip-code"), Some(&json!(5330)));
        assert_eq!(record.get("area"), Some(&json!(125.0)));
        assert_eq!(record.get("building-state"), Some(&json!("GOOD")));
        assert_eq!(record.get("terrace"), Some(&json!(true)));
        assert_eq!(record.get("epc-score"), Some(&json!("C")));
        assert_eq!(record.get("bathroom-count"), Some(&json!(1)));
        assert_eq!(record.get("has-photovoltaic-panels"), Some(&json!(false)));
    }

    #[test]
    fn test_snake_case_keys_are_kebab_cased() {
        let parser = PayloadParser::new();
        assert_eq!(parser.canonical_key("rooms_number"), "rooms-number");
        assert_eq!(parser.canonical_key("zip_code"), "zip-code");
        assert_eq!(parser.canonical_key("has_lift"), "has-lift");
    }

    #[test]
    fn test_two_names_for_one_field_are_rejected() {
        let err = PayloadParser::new()
            .parse_value(json!({"zip-code": 1000, "postCode": 1000}))
            .unwrap_err();
        assert!(matches!(
            err,
            ParserError::DuplicateField { ref canonical, .. } if canonical == "zip-code"
        ));
    }

    #[test]
    fn test_null_alias_does_not_collide() {
        let record = PayloadParser::new()
            .parse(r#"{"area": 120, "property-type": "HOUSE", "rooms-number": 4, "zip-code": 1000, "postCode": null}"#)
            .unwrap();
        assert_eq!(record.get("zip-code"), Some(&json!(1000)));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_snake_case_aliases_are_translated() {
        let parser = PayloadParser::new();
        assert_eq!(parser.canonical_key("habitable_surface"), "area");
        assert_eq!(parser.canonical_key("bedroom_count"), "rooms-number");
        assert_eq!(parser.canonical_key("post_code"), "zip-code");

        let record = parser
            .parse(r#"{"habitable_surface": 95.0, "type": "HOUSE", "bedroom_count": 3, "post_code": 1000}"#)
            .unwrap();
        assert_eq!(record.get("area"), Some(&json!(95.0)));
        assert_eq!(record.get("rooms-number"), Some(&json!(3)));
        assert_eq!(record.get("zip-code"), Some(&json!(1000)));
    }

    #[test]
    fn test_non_object_payloads() {
        let parser = PayloadParser::new();
        assert_eq!(
            parser.parse("[1, 2]"),
            Err(ParserError::InvalidPayload(
                "expected a JSON object, got array".into()
            ))
        );
        assert!(matches!(
            parser.parse("{not json"),
            Err(ParserError::InvalidPayload(_))
        ));
    }
}
