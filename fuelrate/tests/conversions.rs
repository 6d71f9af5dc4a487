//! End-to-end conversions through the public API

use std::sync::Arc;

use fuelrate::{
    ConversionEngine, ConversionOutcome, ConversionRequest, DensityContext, DensityUnit,
    DisabledRateProvider, ErrorKind, FuelType, StaticRateProvider, StepStage, ToolInput,
};

fn engine() -> ConversionEngine {
    let rates = StaticRateProvider::new()
        .with_rate("USD", "EUR", 0.92)
        .with_rate("USD", "NIS", 3.7)
        .as_of("2026-01-15T00:00:00Z");
    ConversionEngine::with_rate_provider(Arc::new(rates))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[tokio::test]
async fn price_per_gallon_in_euros_per_litre() {
    let result = engine().convert_text("2.3 USD/USG to EUR/L").await.unwrap();

    assert!(close(result.value, 0.558988));
    assert_eq!(result.unit, "EUR/L");
    assert_eq!(result.meta.exchange_rate, Some(0.92));
    assert_eq!(result.meta.timestamp.as_deref(), Some("2026-01-15T00:00:00Z"));
    assert!(result.explanation.starts_with("Converted 2.3 USD/USG to 0.558988 EUR/L"));
}

#[tokio::test]
async fn ratio_quote_in_shekels_per_litre() {
    let result = engine().convert_text("4 USD for 2 gallons to NIS/L").await.unwrap();
    let expected = 2.0 * 3.7 / 3.785411784;
    assert!(close(result.value, expected));

    let stages: Vec<StepStage> = result.meta.steps.iter().map(|s| s.stage).collect();
    assert_eq!(stages, vec![StepStage::Normalize, StepStage::Unit, StepStage::Currency]);
}

#[tokio::test]
async fn litres_of_jet_fuel_to_kilograms() {
    let engine = engine();
    let result = engine.convert_text("1000 L of Jet A-1 to kg").await.unwrap();
    assert!(close(result.value, 804.0));
    assert!(result.explanation.contains("Jet A-1 default"));

    // An explicit density wins over the fuel default
    let request = ConversionRequest::unit(1000.0, "L", "kg").with_density(DensityContext {
        density: Some(0.79),
        density_unit: Some(DensityUnit::KgPerL),
        fuel_type: Some(FuelType::JetA1),
    });
    let result = engine.convert(&request).await.unwrap();
    assert!(close(result.value, 790.0));
}

#[tokio::test]
async fn implausible_density_is_rejected() {
    let request = ConversionRequest::unit(1000.0, "L", "kg").with_density(DensityContext::explicit(1.5, DensityUnit::KgPerL));
    let err = engine().convert(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[tokio::test]
async fn structured_input_round_trip() {
    let input: ToolInput = serde_json::from_value(serde_json::json!({
        "value": 2.3,
        "fromRateUnit": "USD/USG",
        "toRateUnit": "USD/MT",
        "fuelType": "jet_a1"
    }))
    .unwrap();

    let result = engine().convert_input(&input).await.unwrap();
    assert!(close(result.value, 2.3 * 1000.0 / 0.804 / 3.785411784));
    assert!(result.meta.density.is_some());
}

#[tokio::test]
async fn errors_are_tagged_at_the_boundary() {
    let engine = engine();
    let cases = [
        ("5 furlongs to m", "UNKNOWN_UNIT"),
        ("5 L to m", "INCOMPATIBLE_DIMENSION"),
        ("100 XYZ to USD", "UNSUPPORTED_CURRENCY"),
        ("1000 ¥ to USD", "AMBIGUOUS_CURRENCY"),
        ("1000 L to kg", "DENSITY_REQUIRED"),
        ("100 USD to CHF", "RATE_UNAVAILABLE"),
        ("-5 ft to m", "INVALID_VALUE"),
        ("five feet", "INVALID_REQUEST"),
    ];

    for (input, code) in cases {
        let outcome = engine.run_text(input).await;
        match &outcome {
            ConversionOutcome::Failure(error) => assert_eq!(error.error.code(), code, "{}", input),
            ConversionOutcome::Success(result) => panic!("{} unexpectedly converted to {}", input, result.formatted),
        }
    }
}

#[tokio::test]
async fn physical_units_work_without_a_rate_source() {
    let engine = ConversionEngine::with_rate_provider(Arc::new(DisabledRateProvider::default()));

    let result = engine.convert_text("2.3 USD/USG to USD/L").await.unwrap();
    assert!(close(result.value, 0.607596));

    let err = engine.convert_text("100 USD to EUR").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
}

#[tokio::test]
async fn dimension_mismatch_lists_valid_units() {
    match engine().run_text("5 L to m").await {
        ConversionOutcome::Failure(error) => {
            assert_eq!(error.error, ErrorKind::IncompatibleDimension);
            let from_units = error.details["fromDimensionUnits"].as_array().unwrap();
            let to_units = error.details["toDimensionUnits"].as_array().unwrap();
            assert!(from_units.iter().any(|u| u == "USG"));
            assert!(to_units.iter().any(|u| u == "ft"));
        }
        ConversionOutcome::Success(result) => panic!("converted to {}", result.formatted),
    }
}

#[tokio::test]
async fn decimal_commas_are_rejected() {
    let engine = engine();
    let err = engine.convert_text("1,5 L to mL").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let result = engine.convert_text("1,250.5 USG to L").await.unwrap();
    assert!(close(result.value, 1250.5 * 3.785411784));
}
