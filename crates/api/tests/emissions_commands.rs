//! Emissions commands over the built-in factor catalogue

mod support;

use serde_json::json;
use support::TestApp;
use vsme_api::{
    calculate_emissions, lookup_emission_factor, save_module_data, summarize_emissions,
    validate_module_data, FactorLookupRequest,
};
use vsme_common::testing::assert_approx_eq;
use vsme_core::ActivityEntry;
use vsme_domain::{Config, FactorCategory, SaveStatus, Unit};

fn irish_app() -> TestApp {
    let mut config = Config::default();
    config.emissions.default_country = Some("IE".into());
    TestApp::with_config(config)
}

fn entries() -> Vec<ActivityEntry> {
    serde_json::from_value(json!([
        {
            "kind": "stationary_combustion",
            "fuelType": "natural_gas",
            "activity": { "quantity": 50000, "unit": "kWh" }
        },
        {
            "kind": "purchased_electricity",
            "activity": { "quantity": 80, "unit": "MWh" }
        }
    ]))
    .unwrap()
}

#[tokio::test]
async fn grid_factor_lookup() {
    let app = irish_app();
    let factor = lookup_emission_factor(
        &app.ctx,
        FactorLookupRequest {
            category: FactorCategory::Electricity,
            fuel_or_energy_type: "grid".into(),
            unit: Unit::KWh,
            country: Some("IE".into()),
            preferred_source: None,
        },
    )
    .await
    .unwrap();
    assert_approx_eq(factor.total_co2e_factor, 0.295, 1e-9);
}

#[tokio::test]
async fn unknown_factor_is_not_found() {
    let app = irish_app();
    let request: FactorLookupRequest = serde_json::from_value(json!({
        "category": "stationary_combustion",
        "fuelOrEnergyType": "whale_oil",
        "unit": "L"
    }))
    .unwrap();
    let err = lookup_emission_factor(&app.ctx, request).await.unwrap_err();
    assert!(err.starts_with("Not found"), "{err}");
}

#[tokio::test]
async fn summary_feeds_a_valid_b3_save() {
    let app = irish_app();
    let report = summarize_emissions(&app.ctx, entries()).await.unwrap();
    assert_eq!(report.records.len(), 2);
    assert_approx_eq(report.summary.scope2_location_based, 23_600.0, 1e-6);
    assert_approx_eq(report.module_data["scope2LocationBased"].as_f64().unwrap(), 23.6, 1e-9);

    let validation = validate_module_data(&app.ctx, "b3", report.module_data.clone()).await.unwrap();
    assert!(validation.is_valid, "{:?}", validation.errors);

    let saved = save_module_data(&app.ctx, "b3", "r-1", report.module_data.clone()).await.unwrap();
    assert_eq!(saved.status, SaveStatus::Saved);
    assert_eq!(app.remote.document("r-1", "b3"), Some(report.module_data));
}

#[tokio::test]
async fn electricity_needs_a_country() {
    let app = TestApp::new();
    assert!(calculate_emissions(&app.ctx, entries()).await.is_err());

    let records = calculate_emissions(&irish_app().ctx, entries()).await.unwrap();
    assert_eq!(records.len(), 2);
}
