use immo_predict::geocode::GeocodeTable;
use immo_predict::normalizer::contract::{
    DEFAULT_BUILDING_STATE, DEFAULT_EPC_SCORE, DEFAULT_PROVINCE, DEFAULT_SUBTYPE, Fallback,
    OPTIONAL_FIELDS,
};
use immo_predict::{FeatureSchema, Normalizer, PropertyRecord};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn normalizer(schema: FeatureSchema) -> Normalizer {
    Normalizer::new(Arc::new(GeocodeTable::empty()), schema)
}

fn record(area: f64, kind: &str, rooms: i64, zip: i64) -> PropertyRecord {
    [
        ("area", json!(area)),
        ("property-type", json!(kind)),
        ("rooms-number", json!(rooms)),
        ("zip-code", json!(zip)),
    ]
    .into_iter()
    .collect()
}

fn with_explicit_defaults(mut record: PropertyRecord) -> PropertyRecord {
    for field in OPTIONAL_FIELDS {
        let value: Value = match field.fallback {
            Fallback::Number(n) => json!(n),
            Fallback::Integer(n) => json!(n),
            Fallback::Flag(b) => json!(b),
        };
        record.insert(field.key, value);
    }
    record.insert("building-state", json!(DEFAULT_BUILDING_STATE));
    record.insert("province", json!(DEFAULT_PROVINCE));
    record.insert("subtype", json!(DEFAULT_SUBTYPE));
    record.insert("epc-score", json!(DEFAULT_EPC_SCORE));
    record.insert("full-address", json!(""));
    record
}

fn kind() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["APARTMENT", "HOUSE", "OTHERS", "house", "Apartment"])
}

proptest! {
    #[test]
    fn normalizing_twice_is_bit_identical(
        area in 10.0f64..2_000.0,
        kind in kind(),
        rooms in 0i64..12,
        zip in 1000i64..9999,
    ) {
        let n = normalizer(FeatureSchema::standard());
        let input = record(area, kind, rooms, zip);
        let first = n.normalize(&input).unwrap();
        let second = n.normalize(&input).unwrap();
        let first_bits: Vec<u64> = first.values().iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u64> = second.values().iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn absent_optionals_equal_explicit_defaults(
        area in 10.0f64..2_000.0,
        kind in kind(),
        rooms in 0i64..12,
        zip in 1000i64..9999,
    ) {
        let n = normalizer(FeatureSchema::standard());
        let bare = n.normalize(&record(area, kind, rooms, zip)).unwrap();
        let explicit = n
            .normalize(&with_explicit_defaults(record(area, kind, rooms, zip)))
            .unwrap();
        prop_assert_eq!(bare, explicit);
    }

    #[test]
    fn layout_never_depends_on_the_record(
        area in 10.0f64..2_000.0,
        kind in kind(),
        rooms in 0i64..12,
        zip in 1000i64..9999,
        garden in any::<bool>(),
    ) {
        for schema in [FeatureSchema::standard(), FeatureSchema::compact()] {
            let n = normalizer(schema.clone());
            let mut input = record(area, kind, rooms, zip);
            input.insert("garden", json!(garden));
            let vector = n.normalize(&input).unwrap();
            prop_assert_eq!(vector.columns(), schema.columns());
            prop_assert_eq!(vector.len(), schema.len());
            prop_assert!(vector.values().iter().all(|v| v.is_finite()));
        }
    }
}
