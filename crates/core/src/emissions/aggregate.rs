//! Roll activity records up into scope totals

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vsme_domain::{ActivityRecord, Dimension, Scope, SourceCategory, Unit};

use super::units::convert;

const KG_PER_TONNE: f64 = 1000.0;

/// Scope-level totals of a set of activity records, in kg CO2e.
///
/// Scope 2 is kept as two parallel figures; market-based is only summed from
/// records that carry one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsSummary {
    pub scope1_total: f64,
    pub scope2_location_based: f64,
    pub scope2_market_based: f64,
    pub by_category: BTreeMap<SourceCategory, f64>,
    /// Activity reported in an energy unit, in MWh
    pub total_energy_mwh: f64,
    pub record_count: usize,
    pub warnings: Vec<String>,
}

impl EmissionsSummary {
    /// Aggregate records by scope and source category
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let mut summary = Self::default();

        for record in records {
            let total = record.total_co2e();
            *summary.by_category.entry(record.source_category).or_insert(0.0) += total;

            match record.source_category.scope() {
                Scope::Scope1 => summary.scope1_total += total,
                Scope::Scope2 => {
                    summary.scope2_location_based += total;
                    match &record.electricity {
                        Some(dual) => {
                            summary.scope2_market_based += dual.market_based.total_co2e_emissions;
                        }
                        None => summary.warnings.push(format!(
                            "Record {} has no market-based figure",
                            record.id
                        )),
                    }
                }
            }

            let data = &record.activity_data;
            if data.unit.dimension() == Dimension::Energy {
                if let Ok(mwh) = convert(data.quantity, data.unit, Unit::MWh) {
                    summary.total_energy_mwh += mwh;
                }
            }
            summary.warnings.extend(record.warnings.iter().cloned());
            summary.record_count += 1;
        }

        summary
    }

    /// B3 module payload. Emissions in tonnes CO2e, energy in MWh.
    pub fn to_module_data(&self) -> Value {
        let mut data = json!({
            "scope1Total": self.scope1_total / KG_PER_TONNE,
            "scope2LocationBased": self.scope2_location_based / KG_PER_TONNE,
            "scope2MarketBased": self.scope2_market_based / KG_PER_TONNE,
        });
        if self.total_energy_mwh > 0.0 {
            data["totalEnergyConsumption"] = json!(self.total_energy_mwh);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vsme_common::testing::assert_approx_eq;
    use vsme_domain::{ActivityData, DataQuality};

    use super::*;
    use crate::emissions::{ActivityEntry, EmissionFactorCatalog, EmissionsCalculator};

    fn records() -> Vec<ActivityRecord> {
        let calculator =
            EmissionsCalculator::new(Arc::new(EmissionFactorCatalog::builtin())).with_country("IE");
        calculator
            .calculate_all(&[
                ActivityEntry::PurchasedElectricity {
                    activity: ActivityData {
                        quantity: 10_000.0,
                        unit: Unit::KWh,
                        data_source: "meter".into(),
                        data_quality: DataQuality::Measured,
                    },
                    country: None,
                    supplier_factor: Some(0.1),
                },
                ActivityEntry::StationaryCombustion {
                    fuel_type: "natural_gas".into(),
                    activity: ActivityData {
                        quantity: 2_000.0,
                        unit: Unit::KWh,
                        data_source: "bill".into(),
                        data_quality: DataQuality::Measured,
                    },
                    preferred_source: None,
                },
            ])
            .unwrap()
    }

    #[test]
    fn splits_scopes_and_keeps_dual_scope2() {
        let summary = EmissionsSummary::from_records(&records());
        assert_approx_eq(summary.scope2_location_based, 2950.0, 1e-9);
        assert_approx_eq(summary.scope2_market_based, 1000.0, 1e-9);
        assert_approx_eq(summary.scope1_total, 409.4, 1e-9);
        assert_approx_eq(summary.total_energy_mwh, 12.0, 1e-9);
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.by_category.len(), 2);
    }

    #[test]
    fn module_data_is_in_tonnes() {
        let data = EmissionsSummary::from_records(&records()).to_module_data();
        assert_approx_eq(data["scope2LocationBased"].as_f64().unwrap(), 2.95, 1e-12);
        assert_approx_eq(data["totalEnergyConsumption"].as_f64().unwrap(), 12.0, 1e-9);
    }

    #[test]
    fn empty_records_give_zero_totals() {
        let summary = EmissionsSummary::from_records(&[]);
        assert_eq!(summary.scope1_total, 0.0);
        assert!(summary.to_module_data().get("totalEnergyConsumption").is_none());
    }
}
