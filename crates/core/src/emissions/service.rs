//! Emissions calculation service - factor lookup plus formulas

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vsme_domain::{
    ActivityData, ActivityRecord, DataQuality, EmissionFactor, FactorCategory,
    FactorSource, Result, SourceCategory, Unit, VsmeError,
};

use super::calculator::{self, GwpSet, RefrigerantInventory};
use super::factors::{EmissionFactorCatalog, FactorQuery};

/// One raw activity as submitted from an emissions form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityEntry {
    StationaryCombustion {
        #[serde(rename = "fuelType")]
        fuel_type: String,
        activity: ActivityData,
        #[serde(default, rename = "preferredSource")]
        preferred_source: Option<FactorSource>,
    },
    MobileFuel {
        #[serde(rename = "fuelType")]
        fuel_type: String,
        activity: ActivityData,
    },
    MobileDistance {
        #[serde(rename = "fuelType")]
        fuel_type: String,
        /// Distance travelled, in a distance unit
        activity: ActivityData,
        /// Distance per one `fuel_unit` of fuel
        #[serde(default, rename = "fuelEfficiency")]
        fuel_efficiency: Option<f64>,
        #[serde(rename = "fuelUnit")]
        fuel_unit: Unit,
    },
    FugitiveMassBalance {
        refrigerant: String,
        inventory: RefrigerantInventory,
        #[serde(default, rename = "dataQuality")]
        data_quality: DataQuality,
    },
    FugitiveScreening {
        refrigerant: String,
        #[serde(rename = "capacityKg")]
        capacity_kg: f64,
        #[serde(rename = "screeningFactor")]
        screening_factor: f64,
        #[serde(default, rename = "dataQuality")]
        data_quality: DataQuality,
    },
    PurchasedElectricity {
        activity: ActivityData,
        /// Overrides the calculator's default country
        #[serde(default)]
        country: Option<String>,
        /// Contractual supplier intensity in kgCO2e/kWh
        #[serde(default, rename = "supplierFactor")]
        supplier_factor: Option<f64>,
    },
}

/// Turns [`ActivityEntry`] values into [`ActivityRecord`]s
#[derive(Debug, Clone)]
pub struct EmissionsCalculator {
    catalog: Arc<EmissionFactorCatalog>,
    gwp: GwpSet,
    country: Option<String>,
}

impl EmissionsCalculator {
    /// AR5 GWPs and no default country
    pub fn new(catalog: Arc<EmissionFactorCatalog>) -> Self {
        Self { catalog, gwp: GwpSet::default(), country: None }
    }

    /// Use a different GWP set (AR5 by default)
    pub fn with_gwp(mut self, gwp: GwpSet) -> Self {
        self.gwp = gwp;
        self
    }

    /// Default country for country-specific factors
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn catalog(&self) -> &EmissionFactorCatalog {
        &self.catalog
    }

    /// Calculate one activity. Lookup and calculation errors are returned
    /// as-is; nothing defaults to zero.
    #[instrument(skip(self, entry), fields(kind = entry_kind(entry)))]
    pub fn calculate(&self, entry: &ActivityEntry) -> Result<ActivityRecord> {
        let record = match entry {
            ActivityEntry::StationaryCombustion { fuel_type, activity, preferred_source } => {
                let mut query =
                    self.query(FactorCategory::StationaryCombustion, fuel_type, activity.unit);
                query.preferred_source = *preferred_source;
                let factor = self.catalog.lookup_in_dimension(&query)?;
                let results =
                    calculator::fuel_combustion(activity.quantity, activity.unit, &factor, self.gwp)?;
                ActivityRecord::new(
                    SourceCategory::StationaryCombustion,
                    activity.clone(),
                    &factor,
                    calculator::with_uncertainty(results, activity.data_quality),
                )
            }
            ActivityEntry::MobileFuel { fuel_type, activity } => {
                let query = self.query(FactorCategory::MobileCombustion, fuel_type, activity.unit);
                let factor = self.catalog.lookup_in_dimension(&query)?;
                let results =
                    calculator::fuel_combustion(activity.quantity, activity.unit, &factor, self.gwp)?;
                ActivityRecord::new(
                    SourceCategory::MobileCombustion,
                    activity.clone(),
                    &factor,
                    calculator::with_uncertainty(results, activity.data_quality),
                )
            }
            ActivityEntry::MobileDistance { fuel_type, activity, fuel_efficiency, fuel_unit } => {
                let query = self.query(FactorCategory::MobileCombustion, fuel_type, *fuel_unit);
                let factor = self.catalog.lookup_in_dimension(&query)?;
                let results = calculator::mobile_distance(
                    activity.quantity,
                    activity.unit,
                    *fuel_efficiency,
                    *fuel_unit,
                    &factor,
                    self.gwp,
                )?;
                ActivityRecord::new(
                    SourceCategory::MobileCombustion,
                    activity.clone(),
                    &factor,
                    calculator::with_uncertainty(results, activity.data_quality),
                )
            }
            ActivityEntry::FugitiveMassBalance { refrigerant, inventory, data_quality } => {
                let factor = self.catalog.refrigerant_gwp(refrigerant)?;
                let outcome = calculator::fugitive_mass_balance(inventory, &factor)?;
                let activity = ActivityData {
                    quantity: calculator::mass_balance(inventory)?.released_kg,
                    unit: Unit::Kilogram,
                    data_source: "mass_balance".to_string(),
                    data_quality: *data_quality,
                };
                ActivityRecord::new(
                    SourceCategory::FugitiveEmissions,
                    activity,
                    &factor,
                    calculator::with_uncertainty(outcome.results, *data_quality),
                )
                .with_warnings(outcome.warnings)
            }
            ActivityEntry::FugitiveScreening {
                refrigerant,
                capacity_kg,
                screening_factor,
                data_quality,
            } => {
                let factor = self.catalog.refrigerant_gwp(refrigerant)?;
                let results =
                    calculator::fugitive_screening(*capacity_kg, *screening_factor, &factor)?;
                let activity = ActivityData {
                    quantity: capacity_kg * screening_factor,
                    unit: Unit::Kilogram,
                    data_source: "screening".to_string(),
                    data_quality: *data_quality,
                };
                ActivityRecord::new(
                    SourceCategory::FugitiveEmissions,
                    activity,
                    &factor,
                    calculator::with_uncertainty(results, *data_quality),
                )
            }
            ActivityEntry::PurchasedElectricity { activity, country, supplier_factor } => {
                self.electricity(activity, country.as_deref(), *supplier_factor)?
            }
        };

        debug!(
            record_id = %record.id,
            total_co2e_kg = record.total_co2e(),
            "activity emissions calculated"
        );
        Ok(record)
    }

    /// Calculate a batch, stopping at the first error
    pub fn calculate_all(&self, entries: &[ActivityEntry]) -> Result<Vec<ActivityRecord>> {
        entries.iter().map(|entry| self.calculate(entry)).collect()
    }

    fn electricity(
        &self,
        activity: &ActivityData,
        country: Option<&str>,
        supplier_factor: Option<f64>,
    ) -> Result<ActivityRecord> {
        let country = country.or(self.country.as_deref()).ok_or_else(|| {
            VsmeError::Validation(
                "A country is required for purchased electricity".to_string(),
            )
        })?;
        let grid = self.catalog.grid_factor(country)?;
        let supplier = supplier_factor.map(|intensity| EmissionFactor {
            category: FactorCategory::Electricity,
            fuel_or_energy_type: "supplier_specific".to_string(),
            unit: Unit::KWh,
            country: Some(country.to_string()),
            source: FactorSource::Custom,
            source_year: grid.source_year,
            co2_factor: intensity,
            ch4_factor: None,
            n2o_factor: None,
            total_co2e_factor: intensity,
            methodology: "Supplier-specific contractual instrument".to_string(),
        });
        // Residual mix is only needed without a supplier factor
        let residual = match supplier {
            Some(_) => None,
            None => Some(self.catalog.residual_mix_factor(country)?),
        };

        let emissions = calculator::purchased_electricity(
            activity.quantity,
            activity.unit,
            &grid,
            supplier.as_ref(),
            residual.as_ref(),
        )?;
        let location =
            calculator::with_uncertainty(emissions.location_based.clone(), activity.data_quality);
        let record =
            ActivityRecord::new(SourceCategory::PurchasedElectricity, activity.clone(), &grid, location);
        Ok(record.with_electricity(emissions))
    }

    fn query(&self, category: FactorCategory, fuel_type: &str, unit: Unit) -> FactorQuery {
        let query = FactorQuery::new(category, fuel_type, unit);
        match &self.country {
            Some(country) => query.with_country(country.clone()),
            None => query,
        }
    }
}

fn entry_kind(entry: &ActivityEntry) -> &'static str {
    match entry {
        ActivityEntry::StationaryCombustion { .. } => "stationary_combustion",
        ActivityEntry::MobileFuel { .. } => "mobile_fuel",
        ActivityEntry::MobileDistance { .. } => "mobile_distance",
        ActivityEntry::FugitiveMassBalance { .. } => "fugitive_mass_balance",
        ActivityEntry::FugitiveScreening { .. } => "fugitive_screening",
        ActivityEntry::PurchasedElectricity { .. } => "purchased_electricity",
    }
}
