//! Activity entries through the calculator into a validated B3 module

use std::sync::Arc;

use serde_json::json;
use vsme_common::testing::{assert_approx_eq, assert_relative_eq};
use vsme_core::{
    completion_status, validate_module, ActivityEntry, EmissionFactorCatalog, EmissionsCalculator,
    EmissionsSummary,
};
use vsme_domain::{Scope, SourceCategory};

fn entries() -> Vec<ActivityEntry> {
    serde_json::from_value(json!([
        {
            "kind": "stationary_combustion",
            "fuelType": "natural_gas",
            "activity": { "quantity": 50000, "unit": "kWh", "dataSource": "gas bills" }
        },
        {
            "kind": "mobile_distance",
            "fuelType": "diesel",
            "activity": { "quantity": 12000, "unit": "km" },
            "fuelEfficiency": 15.0,
            "fuelUnit": "L"
        },
        {
            "kind": "fugitive_mass_balance",
            "refrigerant": "R-410A",
            "inventory": {
                "beginningInventory": 20,
                "purchases": 5,
                "salesTransfers": 0,
                "endingInventory": 22
            }
        },
        {
            "kind": "purchased_electricity",
            "activity": { "quantity": 80, "unit": "MWh", "dataQuality": "measured" }
        }
    ]))
    .unwrap()
}

#[test]
fn activity_entries_produce_a_valid_b3_module() {
    let calculator =
        EmissionsCalculator::new(Arc::new(EmissionFactorCatalog::builtin())).with_country("IE");
    let records = calculator.calculate_all(&entries()).unwrap();
    assert_eq!(records.len(), 4);

    let electricity = records
        .iter()
        .find(|r| r.source_category == SourceCategory::PurchasedElectricity)
        .unwrap();
    assert_eq!(electricity.source_category.scope(), Scope::Scope2);
    assert_approx_eq(electricity.total_co2e(), 80_000.0 * 0.295, 1e-6);

    let summary = EmissionsSummary::from_records(&records);
    assert_eq!(summary.record_count, 4);
    assert!(summary.scope1_total > 0.0);
    assert_approx_eq(summary.scope2_location_based, 23_600.0, 1e-6);

    let module = summary.to_module_data();
    assert_approx_eq(module["scope2LocationBased"].as_f64().unwrap(), 23.6, 1e-9);
    assert_relative_eq(module["scope1Total"].as_f64().unwrap(), summary.scope1_total / 1000.0, 1e-12);
    assert!(module["totalEnergyConsumption"].as_f64().unwrap() > 80.0);

    let validation = validate_module("b3", &module);
    assert!(validation.is_valid, "{:?}", validation.errors);
    assert_eq!(validation.score, 75);

    let completion = completion_status("b3", &module);
    assert_eq!(completion.completion_percentage, 100);
}

#[test]
fn one_bad_entry_fails_the_batch() {
    let calculator =
        EmissionsCalculator::new(Arc::new(EmissionFactorCatalog::builtin())).with_country("IE");
    let mut batch = entries();
    batch.push(
        serde_json::from_value(json!({
            "kind": "mobile_fuel",
            "fuelType": "diesel",
            "activity": { "quantity": -5, "unit": "L" }
        }))
        .unwrap(),
    );

    assert!(calculator.calculate_all(&batch).is_err());
}
