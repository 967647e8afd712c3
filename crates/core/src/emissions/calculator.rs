//! Activity emission formulas
//!
//! Every formula converts the activity quantity into the factor's declared
//! unit first and then multiplies. All results are kilograms. Negative
//! inputs are rejected up front; a negative or non-finite output is treated
//! as a calculation defect and never returned.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use vsme_domain::constants::{GWP_CH4_AR5, GWP_CH4_AR6, GWP_N2O_AR5, GWP_N2O_AR6};
use vsme_domain::{
    CalculationMethod, CalculationResults, DataQuality, Dimension, ElectricityEmissions,
    EmissionFactor, MarketBasis, Result, Unit, VsmeError,
};

use super::units::{convert, ensure_quantity};

/// Global warming potentials applied to CH4 and N2O masses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpSet {
    pub ch4: f64,
    pub n2o: f64,
}

impl GwpSet {
    /// IPCC Fifth Assessment Report, 100-year horizon
    pub const AR5: Self = Self { ch4: GWP_CH4_AR5, n2o: GWP_N2O_AR5 };
    /// IPCC Sixth Assessment Report, 100-year horizon
    pub const AR6: Self = Self { ch4: GWP_CH4_AR6, n2o: GWP_N2O_AR6 };
}

impl Default for GwpSet {
    fn default() -> Self {
        Self::AR5
    }
}

/// Opening/closing refrigerant stock and movements over the period, in kg
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefrigerantInventory {
    pub beginning_inventory: f64,
    pub purchases: f64,
    pub sales_transfers: f64,
    pub ending_inventory: f64,
}

/// Refrigerant mass released according to a mass balance
#[derive(Debug, Clone, PartialEq)]
pub struct MassBalance {
    pub released_kg: f64,
    pub warnings: Vec<String>,
}

/// Calculation results together with non-blocking data-quality warnings
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationOutcome {
    pub results: CalculationResults,
    pub warnings: Vec<String>,
}

/// Fuel-based combustion (stationary or mobile).
///
/// With per-gas CH4/N2O factors the total is `co2 + ch4×GWP + n2o×GWP`,
/// otherwise `quantity × total_co2e_factor`.
pub fn fuel_combustion(
    quantity: f64,
    unit: Unit,
    factor: &EmissionFactor,
    gwp: GwpSet,
) -> Result<CalculationResults> {
    let quantity = ensure_quantity("quantity", quantity)?;
    let in_factor_unit = convert(quantity, unit, factor.unit)?;
    apply_factor(in_factor_unit, factor, gwp, CalculationMethod::FuelBased)
}

/// Distance-based mobile combustion: `fuel = distance / fuel_efficiency`.
///
/// `fuel_efficiency` is distance travelled per one `fuel_unit` of fuel,
/// measured in the activity's own `distance_unit` (km/L for km, mi/L for
/// miles). `distance_unit` must be a distance.
pub fn mobile_distance(
    distance: f64,
    distance_unit: Unit,
    fuel_efficiency: Option<f64>,
    fuel_unit: Unit,
    factor: &EmissionFactor,
    gwp: GwpSet,
) -> Result<CalculationResults> {
    if distance_unit.dimension() != Dimension::Distance {
        return Err(VsmeError::Validation(format!("{distance_unit} is not a distance unit")));
    }
    let distance = ensure_quantity("distance", distance)?;
    let efficiency = match fuel_efficiency {
        Some(value) if value.is_finite() && value > 0.0 => value,
        Some(value) => {
            return Err(VsmeError::Calculation(format!(
                "Fuel efficiency must be a positive number, got {value}"
            )))
        }
        None => {
            return Err(VsmeError::Calculation(
                "Fuel efficiency is required for distance-based calculation".to_string(),
            ))
        }
    };

    let fuel = distance / efficiency;
    let in_factor_unit = convert(fuel, fuel_unit, factor.unit)?;
    apply_factor(in_factor_unit, factor, gwp, CalculationMethod::DistanceBased)
}

/// `released = beginning + purchases − sales/transfers − ending`, clamped to
/// zero with a warning when the raw balance is negative.
pub fn mass_balance(inventory: &RefrigerantInventory) -> Result<MassBalance> {
    let beginning = ensure_quantity("beginningInventory", inventory.beginning_inventory)?;
    let purchases = ensure_quantity("purchases", inventory.purchases)?;
    let sales = ensure_quantity("salesTransfers", inventory.sales_transfers)?;
    let ending = ensure_quantity("endingInventory", inventory.ending_inventory)?;

    let raw = beginning + purchases - sales - ending;
    if raw < 0.0 {
        return Ok(MassBalance {
            released_kg: 0.0,
            warnings: vec![format!(
                "Refrigerant mass balance is negative ({raw} kg); emissions set to 0"
            )],
        });
    }
    Ok(MassBalance { released_kg: raw, warnings: Vec::new() })
}

/// Fugitive emissions from a refrigerant mass balance
pub fn fugitive_mass_balance(
    inventory: &RefrigerantInventory,
    refrigerant_factor: &EmissionFactor,
) -> Result<CalculationOutcome> {
    let balance = mass_balance(inventory)?;
    let released = convert(balance.released_kg, Unit::Kilogram, refrigerant_factor.unit)?;
    let results = apply_factor(
        released,
        refrigerant_factor,
        GwpSet::default(),
        CalculationMethod::MassBalance,
    )?;
    Ok(CalculationOutcome { results, warnings: balance.warnings })
}

/// Screening method: `released = capacity × screening_factor`, then × GWP
pub fn fugitive_screening(
    capacity_kg: f64,
    screening_factor: f64,
    refrigerant_factor: &EmissionFactor,
) -> Result<CalculationResults> {
    let capacity = ensure_quantity("capacity", capacity_kg)?;
    let rate = ensure_quantity("screeningFactor", screening_factor)?;
    let released = convert(capacity * rate, Unit::Kilogram, refrigerant_factor.unit)?;
    apply_factor(released, refrigerant_factor, GwpSet::default(), CalculationMethod::Screening)
}

/// Dual-reported purchased electricity.
///
/// Location-based uses the grid factor. Market-based uses the supplier
/// factor when available, otherwise the residual mix. The two are never
/// summed.
pub fn purchased_electricity(
    consumption: f64,
    unit: Unit,
    grid_factor: &EmissionFactor,
    supplier_factor: Option<&EmissionFactor>,
    residual_mix_factor: Option<&EmissionFactor>,
) -> Result<ElectricityEmissions> {
    let consumption = ensure_quantity("consumption", consumption)?;

    let location_based = apply_factor(
        convert(consumption, unit, grid_factor.unit)?,
        grid_factor,
        GwpSet::default(),
        CalculationMethod::LocationBased,
    )?;

    let (market_factor, market_basis) = match (supplier_factor, residual_mix_factor) {
        (Some(factor), _) => (factor, MarketBasis::SupplierSpecific),
        (None, Some(factor)) => (factor, MarketBasis::ResidualMix),
        (None, None) => {
            return Err(VsmeError::NotFound(
                "No supplier-specific or residual mix factor for market-based electricity"
                    .to_string(),
            ))
        }
    };
    let market_based = apply_factor(
        convert(consumption, unit, market_factor.unit)?,
        market_factor,
        GwpSet::default(),
        CalculationMethod::MarketBased,
    )?;

    Ok(ElectricityEmissions { location_based, market_based, market_basis })
}

/// Attach the uncertainty implied by the activity's data quality
pub fn with_uncertainty(mut results: CalculationResults, quality: DataQuality) -> CalculationResults {
    results.uncertainty_percentage = Some(quality.uncertainty_percentage());
    results
}

fn apply_factor(
    quantity: f64,
    factor: &EmissionFactor,
    gwp: GwpSet,
    method: CalculationMethod,
) -> Result<CalculationResults> {
    let co2 = quantity * factor.co2_factor;
    let ch4 = quantity * factor.ch4_factor.unwrap_or(0.0);
    let n2o = quantity * factor.n2o_factor.unwrap_or(0.0);
    let total = if factor.has_gas_breakdown() {
        co2 + ch4 * gwp.ch4 + n2o * gwp.n2o
    } else {
        quantity * factor.total_co2e_factor
    };

    for (gas, value) in [("CO2", co2), ("CH4", ch4), ("N2O", n2o), ("CO2e", total)] {
        if !value.is_finite() || value < 0.0 {
            return Err(VsmeError::Calculation(format!(
                "{gas} emissions for {} came out as {value}",
                factor.fuel_or_energy_type
            )));
        }
    }

    Ok(CalculationResults {
        co2_emissions: co2,
        ch4_emissions: ch4,
        n2o_emissions: n2o,
        total_co2e_emissions: total,
        calculation_date: Utc::now(),
        method,
        uncertainty_percentage: None,
    })
}
