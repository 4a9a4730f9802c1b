use immo_predict::geocode::GeocodeTable;
use immo_predict::normalizer::schema::STANDARD_COLUMNS;
use immo_predict::predictor::LinearPredictor;
use immo_predict::{FeatureSchema, Normalizer, PriceEstimator};
use std::path::PathBuf;
use std::sync::Arc;

fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn estimator() -> PriceEstimator {
    let geocoder = GeocodeTable::load(asset("data/georef-belgium-postal-codes.csv")).unwrap();
    let predictor = LinearPredictor::load(asset("model/weights.json")).unwrap();
    let normalizer = Normalizer::new(Arc::new(geocoder), FeatureSchema::compact());
    PriceEstimator::new(normalizer, Arc::new(predictor)).unwrap()
}

#[test]
fn georef_sample_keeps_first_row_per_code() {
    let table = GeocodeTable::load(asset("data/georef-belgium-postal-codes.csv")).unwrap();
    assert_eq!(table.len(), 12);
    let liege = table.lookup(4000).unwrap();
    assert_eq!(liege.latitude, 50.6325574);
}

#[test]
fn exported_columns_are_all_produced() {
    let schema = FeatureSchema::load(asset("model/feature_columns.json")).unwrap();
    assert_eq!(schema.len(), 20);
    assert!(schema.synthesized_columns().is_empty());
    assert!(
        schema
            .columns()
            .iter()
            .all(|c| STANDARD_COLUMNS.contains(&c.as_str()))
    );
}

#[tokio::test]
async fn shipped_weights_price_a_house() {
    let price = estimator()
        .estimate_payload(r#"{"area": 120, "property-type": "HOUSE", "rooms-number": 4, "zip-code": 1000}"#)
        .await
        .unwrap();
    assert!((price - 333_808.0).abs() < 1e-6, "got {price}");
}

#[tokio::test]
async fn sample_input_yields_one_line_per_record() {
    let estimator = estimator();
    let input = std::fs::read_to_string(asset("data/sample-properties.jsonl")).unwrap();
    let mut outcomes = Vec::new();
    for (index, payload) in input.lines().enumerate() {
        if payload.trim().is_empty() {
            continue;
        }
        outcomes.push(estimator.score_line(index + 1, payload).await);
    }

    let lines: Vec<usize> = outcomes.iter().map(|o| o.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 6]);
    assert!(outcomes[0].price.is_some());
    assert!(outcomes[1].price.is_some());
    assert_eq!(outcomes[2].error.as_ref().unwrap().kind, "MissingFieldError");
    assert_eq!(outcomes[3].error.as_ref().unwrap().kind, "InvalidEnumError");
    assert!(outcomes[4].price.is_some());
}
