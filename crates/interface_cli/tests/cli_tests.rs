//! End-to-end runs of CLI commands over JSON scenarios

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::path::PathBuf;

use app_quote::EngineConfig;
use core_kernel::Currency;
use interface_cli::{run, run_quote, CliError, Command, Scenario};
use test_utils::{init_test_tracing, PricingFixtures, TemporalFixtures};

fn canonical_scenario_json(promo: &str) -> String {
    format!(
        r#"{{
            "now": "{now}",
            "reference_data": {data},
            "request": {{
                "product_template_id": "WINDOW-PVC-2",
                "width_cm": "100",
                "height_cm": "100",
                "selected_option_ids": ["SILL"],
                "currency": "RUB",
                "promo_code": "{promo}",
                "region": "RU-MOW"
            }}
        }}"#,
        now = TemporalFixtures::now().to_rfc3339(),
        data = PricingFixtures::reference_data_json(),
        promo = promo,
    )
}

fn amount(money: &Value) -> Decimal {
    money["amount"].as_str().unwrap().parse().unwrap()
}

fn write_scenario(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quote-engine-{}-{}.json", std::process::id(), name));
    std::fs::write(&path, json).unwrap();
    path
}

#[tokio::test]
async fn test_quote_scenario_prints_882() {
    init_test_tracing();
    let scenario = Scenario::from_json(&canonical_scenario_json("big1000")).unwrap();

    let output = run_quote(&scenario, &EngineConfig::default()).await.unwrap();

    assert_eq!(amount(&output["total"]), dec!(882));
    assert_eq!(output["total"]["currency"], "RUB");
    assert_eq!(output["price_book_version"], 1);
    assert_eq!(output["decision_trace"][0]["step"], "BASE_PRICE");
}

#[tokio::test]
async fn test_quote_command_reads_the_file() {
    init_test_tracing();
    let path = write_scenario("quote", &canonical_scenario_json("BIG1000"));

    let output = run(&Command::Quote { scenario: path.clone() }, &EngineConfig::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(amount(&output["discount"]), dec!(315));
}

#[tokio::test]
async fn test_validate_promo_command() {
    init_test_tracing();
    let path = write_scenario("validate", &canonical_scenario_json("BIG1000"));

    let output = run(
        &Command::ValidatePromo {
            scenario: path.clone(),
            code: "min5000".to_string(),
            subtotal: dec!(1050),
            currency: Currency::RUB,
        },
        &EngineConfig::default(),
    )
    .await
    .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(output["valid"], false);
    assert_eq!(output["error_code"], "PROMO_BELOW_MINIMUM_SUBTOTAL");
    assert_eq!(output["reason"], "below minimum subtotal");
}

#[tokio::test]
async fn test_strict_mode_surfaces_the_promo_code_error() {
    init_test_tracing();
    let scenario = Scenario::from_json(&canonical_scenario_json("NOPE")).unwrap();
    let config = EngineConfig {
        strict_promo_codes: true,
        ..EngineConfig::default()
    };

    let err = run_quote(&scenario, &config).await.unwrap_err();
    let response = err.to_response();

    assert_eq!(response.error, "PROMO_NOT_FOUND");
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_scenario_without_request_cannot_be_quoted() {
    let scenario = Scenario::from_json(&format!(
        r#"{{ "reference_data": {} }}"#,
        PricingFixtures::reference_data_json()
    ))
    .unwrap();

    let err = run_quote(&scenario, &EngineConfig::default()).await.unwrap_err();
    assert!(matches!(err, CliError::Scenario(_)));
}

#[tokio::test]
async fn test_missing_scenario_file() {
    let err = run(
        &Command::Quote {
            scenario: PathBuf::from("/nonexistent/quote-engine.json"),
        },
        &EngineConfig::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_response().error, "io_error");
}
