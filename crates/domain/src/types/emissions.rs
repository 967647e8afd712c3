//! Emission factor, activity and calculation result types
//!
//! All emission quantities are kilograms (of the gas, or of CO2e for totals).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use super::units::Unit;
use crate::constants::{
    UNCERTAINTY_CALCULATED_PCT, UNCERTAINTY_ESTIMATED_PCT, UNCERTAINTY_MEASURED_PCT,
};
use crate::impl_domain_status_conversions;

/// Kind of activity an emission factor applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    StationaryCombustion,
    MobileCombustion,
    Refrigerant,
    Electricity,
}

impl_domain_status_conversions!(FactorCategory {
    StationaryCombustion => "stationary_combustion" | "stationary",
    MobileCombustion => "mobile_combustion" | "mobile",
    Refrigerant => "refrigerant" | "fugitive",
    Electricity => "electricity",
});

/// Publisher of an emission factor.
///
/// Declaration order is the fixed tie-break priority used by factor lookup:
/// official national inventories first, generic or user-supplied data last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FactorSource {
    /// Official national inventory agency (e.g. SEAI, EPA Ireland)
    National,
    /// UK government GHG conversion factors (DESNZ, formerly DEFRA)
    Desnz,
    /// US EPA emission factor hub
    Epa,
    /// IPCC guidelines defaults
    Ipcc,
    /// Association of Issuing Bodies residual mix
    Aib,
    /// International Energy Agency
    Iea,
    /// User-supplied or otherwise generic source
    Custom,
}

impl FactorSource {
    /// Lower value wins when everything else is equal
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl_domain_status_conversions!(FactorSource {
    National => "national",
    Desnz => "desnz" | "defra",
    Epa => "epa",
    Ipcc => "ipcc",
    Aib => "aib",
    Iea => "iea",
    Custom => "custom",
});

/// Immutable reference record converting one unit of activity into emissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    pub category: FactorCategory,
    pub fuel_or_energy_type: String,
    /// Denominator unit: the factor is kg per one `unit` of activity
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub source: FactorSource,
    pub source_year: u16,
    pub co2_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ch4_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n2o_factor: Option<f64>,
    pub total_co2e_factor: f64,
    pub methodology: String,
}

impl EmissionFactor {
    /// Whether the factor carries per-gas CH4/N2O components
    pub fn has_gas_breakdown(&self) -> bool {
        self.ch4_factor.is_some() || self.n2o_factor.is_some()
    }
}

/// How trustworthy the activity quantity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    /// Metered or invoiced
    Measured,
    /// Derived from other measured data
    #[default]
    Calculated,
    /// Best guess
    Estimated,
}

impl DataQuality {
    /// Uncertainty attached to calculation results of this quality
    pub fn uncertainty_percentage(self) -> f64 {
        match self {
            Self::Measured => UNCERTAINTY_MEASURED_PCT,
            Self::Calculated => UNCERTAINTY_CALCULATED_PCT,
            Self::Estimated => UNCERTAINTY_ESTIMATED_PCT,
        }
    }
}

impl_domain_status_conversions!(DataQuality {
    Measured => "measured" | "metered",
    Calculated => "calculated",
    Estimated => "estimated" | "estimate",
});

/// Raw activity as entered on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub data_source: String,
    #[serde(default)]
    pub data_quality: DataQuality,
}

/// Formula used to produce a calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    FuelBased,
    DistanceBased,
    MassBalance,
    Screening,
    LocationBased,
    MarketBased,
}

impl_domain_status_conversions!(CalculationMethod {
    FuelBased => "fuel_based",
    DistanceBased => "distance_based",
    MassBalance => "mass_balance",
    Screening => "screening",
    LocationBased => "location_based",
    MarketBased => "market_based",
});

/// Emissions produced by a single calculation, in kg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub co2_emissions: f64,
    pub ch4_emissions: f64,
    pub n2o_emissions: f64,
    pub total_co2e_emissions: f64,
    pub calculation_date: DateTime<Utc>,
    pub method: CalculationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_percentage: Option<f64>,
}

/// GHG Protocol scope of an emission source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Scope1,
    Scope2,
}

/// Emission source category of an activity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    StationaryCombustion,
    MobileCombustion,
    FugitiveEmissions,
    PurchasedElectricity,
}

impl SourceCategory {
    /// Scope the category reports under
    pub fn scope(self) -> Scope {
        match self {
            Self::StationaryCombustion | Self::MobileCombustion | Self::FugitiveEmissions => {
                Scope::Scope1
            }
            Self::PurchasedElectricity => Scope::Scope2,
        }
    }
}

impl_domain_status_conversions!(SourceCategory {
    StationaryCombustion => "stationary_combustion",
    MobileCombustion => "mobile_combustion",
    FugitiveEmissions => "fugitive_emissions" | "fugitive",
    PurchasedElectricity => "purchased_electricity" | "electricity",
});

/// One logged emission-producing event with its calculated emissions.
///
/// `emission_factors` is a copy taken at calculation time, so later changes to
/// the factor catalogue never alter historical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: Uuid,
    pub source_category: SourceCategory,
    pub activity_data: ActivityData,
    pub emission_factors: EmissionFactor,
    pub calculation_results: CalculationResults,
    /// Dual location/market figures; only set for purchased electricity,
    /// where `calculation_results` holds the location-based figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<ElectricityEmissions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ActivityRecord {
    /// Build a record, snapshotting the factor used
    pub fn new(
        source_category: SourceCategory,
        activity_data: ActivityData,
        factor: &EmissionFactor,
        calculation_results: CalculationResults,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_category,
            activity_data,
            emission_factors: factor.clone(),
            calculation_results,
            electricity: None,
            warnings: Vec::new(),
        }
    }

    /// Attach the market-based counterpart of an electricity record
    pub fn with_electricity(mut self, electricity: ElectricityEmissions) -> Self {
        self.electricity = Some(electricity);
        self
    }

    /// Attach data-quality warnings produced during calculation
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Total CO2e of this record in kg
    pub fn total_co2e(&self) -> f64 {
        self.calculation_results.total_co2e_emissions
    }
}

/// Which contractual instrument backs a market-based figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum MarketBasis {
    SupplierSpecific,
    ResidualMix,
}

/// Dual-reported purchased electricity emissions. The two figures are never
/// merged into one total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ElectricityEmissions {
    pub location_based: CalculationResults,
    pub market_based: CalculationResults,
    pub market_basis: MarketBasis,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diesel() -> EmissionFactor {
        EmissionFactor {
            category: FactorCategory::StationaryCombustion,
            fuel_or_energy_type: "diesel".into(),
            unit: Unit::Litre,
            country: None,
            source: FactorSource::Desnz,
            source_year: 2024,
            co2_factor: 2.5,
            ch4_factor: None,
            n2o_factor: None,
            total_co2e_factor: 2.51,
            methodology: "test".into(),
        }
    }

    #[test]
    fn source_priority_follows_declaration_order() {
        assert!(FactorSource::National.priority() < FactorSource::Desnz.priority());
        assert!(FactorSource::Ipcc.priority() < FactorSource::Custom.priority());
        assert_eq!("DEFRA".parse::<FactorSource>().unwrap(), FactorSource::Desnz);
    }

    #[test]
    fn categories_map_to_scopes() {
        assert_eq!(SourceCategory::FugitiveEmissions.scope(), Scope::Scope1);
        assert_eq!(SourceCategory::PurchasedElectricity.scope(), Scope::Scope2);
    }

    #[test]
    fn record_snapshots_factor() {
        let mut factor = diesel();
        let results = CalculationResults {
            co2_emissions: 25.0,
            ch4_emissions: 0.0,
            n2o_emissions: 0.0,
            total_co2e_emissions: 25.1,
            calculation_date: Utc::now(),
            method: CalculationMethod::FuelBased,
            uncertainty_percentage: None,
        };
        let data = ActivityData {
            quantity: 10.0,
            unit: Unit::Litre,
            data_source: "invoice".into(),
            data_quality: DataQuality::Measured,
        };
        let record =
            ActivityRecord::new(SourceCategory::StationaryCombustion, data, &factor, results);

        factor.total_co2e_factor = 99.0;
        assert_eq!(record.emission_factors.total_co2e_factor, 2.51);
    }

    #[test]
    fn factor_json_uses_camel_case() {
        let json = serde_json::to_value(diesel()).unwrap();
        assert_eq!(json["fuelOrEnergyType"], "diesel");
        assert_eq!(json["unit"], "L");
        assert_eq!(json["category"], "stationary_combustion");
        assert!(json.get("ch4Factor").is_none());
    }
}
