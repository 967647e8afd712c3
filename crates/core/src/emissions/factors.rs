//! Emission factor catalogue and lookup
//!
//! The catalogue is reference data: it is built once (from the seed table
//! below or from a file loaded by the infra layer) and only ever queried.
//! Lookup never invents a factor. When nothing matches the descriptor the
//! caller gets [`VsmeError::NotFound`], because a silent zero would
//! understate emissions.

use std::cmp::Reverse;

use tracing::debug;
use vsme_domain::{EmissionFactor, FactorCategory, FactorSource, Result, Unit, VsmeError};

/// Fuel type used for location-based grid electricity factors
pub const GRID_ELECTRICITY: &str = "grid";
/// Fuel type used for residual-mix (market-based fallback) factors
pub const RESIDUAL_MIX: &str = "residual_mix";

/// Descriptor of the factor a calculation needs
#[derive(Debug, Clone, PartialEq)]
pub struct FactorQuery {
    pub category: FactorCategory,
    pub fuel_or_energy_type: String,
    pub unit: Unit,
    pub country: Option<String>,
    pub preferred_source: Option<FactorSource>,
}

impl FactorQuery {
    pub fn new(category: FactorCategory, fuel_or_energy_type: impl Into<String>, unit: Unit) -> Self {
        Self {
            category,
            fuel_or_energy_type: fuel_or_energy_type.into(),
            unit,
            country: None,
            preferred_source: None,
        }
    }

    /// Restrict to factors for a country (name or ISO code)
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Prefer a publisher when several factors match
    pub fn with_preferred_source(mut self, source: FactorSource) -> Self {
        self.preferred_source = Some(source);
        self
    }

    fn describe(&self) -> String {
        let mut descriptor =
            format!("{}/{}/{}", self.category, self.fuel_or_energy_type, self.unit);
        if let Some(country) = &self.country {
            descriptor.push_str(&format!(" in {country}"));
        }
        descriptor
    }
}

/// Read-only set of emission factors
#[derive(Debug, Clone, Default)]
pub struct EmissionFactorCatalog {
    factors: Vec<EmissionFactor>,
}

impl EmissionFactorCatalog {
    /// Catalogue over exactly the given factors
    pub fn new(factors: Vec<EmissionFactor>) -> Self {
        Self { factors }
    }

    /// Catalogue seeded with the bundled reference factors
    pub fn builtin() -> Self {
        Self::new(seed().iter().map(SeedFactor::to_factor).collect())
    }

    /// Add factors on top of the existing ones (e.g. a custom file)
    pub fn extend(&mut self, factors: impl IntoIterator<Item = EmissionFactor>) {
        self.factors.extend(factors);
    }

    /// Number of factors held
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// All factors, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EmissionFactor> {
        self.factors.iter()
    }

    /// Select the single best factor for `query`.
    ///
    /// 1. category, type (case-insensitive) and unit must match
    /// 2. with a country, only that country's factors count; when it has none
    ///    the country-agnostic ones are used instead
    /// 3. the preferred source wins if present, otherwise the newest
    ///    `source_year`, then the fixed source priority
    pub fn lookup(&self, query: &FactorQuery) -> Result<EmissionFactor> {
        self.select(query, |unit| unit == query.unit)
            .ok_or_else(|| not_found(query))
    }

    /// Like [`lookup`](Self::lookup), but when the exact unit has no factor
    /// any factor published in a unit of the same dimension is accepted.
    ///
    /// Callers convert the activity quantity into the returned factor's unit.
    pub fn lookup_in_dimension(&self, query: &FactorQuery) -> Result<EmissionFactor> {
        if let Some(factor) = self.select(query, |unit| unit == query.unit) {
            return Ok(factor);
        }
        let dimension = query.unit.dimension();
        self.select(query, |unit| unit.dimension() == dimension)
            .ok_or_else(|| not_found(query))
    }

    fn select(&self, query: &FactorQuery, unit_matches: impl Fn(Unit) -> bool) -> Option<EmissionFactor> {
        let wanted_type = query.fuel_or_energy_type.trim().to_lowercase();
        let matching: Vec<&EmissionFactor> = self
            .factors
            .iter()
            .filter(|f| {
                f.category == query.category
                    && unit_matches(f.unit)
                    && f.fuel_or_energy_type.to_lowercase() == wanted_type
            })
            .collect();

        let candidates = match query.country.as_deref() {
            Some(country) => {
                let code = normalize_country(country);
                let national: Vec<&EmissionFactor> = matching
                    .iter()
                    .copied()
                    .filter(|f| f.country.as_deref().is_some_and(|c| normalize_country(c) == code))
                    .collect();
                if national.is_empty() {
                    matching.into_iter().filter(|f| f.country.is_none()).collect()
                } else {
                    national
                }
            }
            None => matching,
        };

        let preferred = query
            .preferred_source
            .and_then(|source| pick(candidates.iter().copied().filter(|f| f.source == source)));

        let factor = preferred.or_else(|| pick(candidates.into_iter()))?;
        debug!(
            descriptor = %query.describe(),
            unit = %factor.unit,
            source = %factor.source,
            source_year = factor.source_year,
            "emission factor selected"
        );
        Some(factor.clone())
    }

    /// Location-based grid factor (kgCO2e/kWh) for a country
    pub fn grid_factor(&self, country: &str) -> Result<EmissionFactor> {
        self.lookup(
            &FactorQuery::new(FactorCategory::Electricity, GRID_ELECTRICITY, Unit::KWh)
                .with_country(country),
        )
    }

    /// Residual-mix factor (kgCO2e/kWh) for a country
    pub fn residual_mix_factor(&self, country: &str) -> Result<EmissionFactor> {
        self.lookup(
            &FactorQuery::new(FactorCategory::Electricity, RESIDUAL_MIX, Unit::KWh)
                .with_country(country),
        )
    }

    /// GWP of a refrigerant gas expressed as kgCO2e per kg released
    pub fn refrigerant_gwp(&self, gas: &str) -> Result<EmissionFactor> {
        self.lookup(&FactorQuery::new(FactorCategory::Refrigerant, normalize_gas(gas), Unit::Kilogram))
    }
}

fn not_found(query: &FactorQuery) -> VsmeError {
    VsmeError::NotFound(format!("No emission factor for {}", query.describe()))
}

fn pick<'a>(candidates: impl Iterator<Item = &'a EmissionFactor>) -> Option<&'a EmissionFactor> {
    candidates.max_by_key(|f| (f.source_year, Reverse(f.source.priority())))
}

/// Map common country names to ISO 3166 alpha-2 codes
fn normalize_country(country: &str) -> String {
    let lowered = country.trim().to_lowercase();
    let code = match lowered.as_str() {
        "ireland" | "republic of ireland" | "eire" => "IE",
        "united kingdom" | "uk" | "great britain" | "britain" => "GB",
        "france" => "FR",
        "germany" | "deutschland" => "DE",
        "netherlands" | "the netherlands" | "holland" => "NL",
        "spain" => "ES",
        "italy" => "IT",
        "united states" | "usa" | "united states of america" => "US",
        _ => return lowered.to_uppercase(),
    };
    code.to_string()
}

/// `"R134a"`, `"r-134a"` and `"HFC-134a"` all refer to the same gas
fn normalize_gas(gas: &str) -> String {
    let compact: String =
        gas.trim().to_uppercase().chars().filter(|c| !matches!(c, '-' | ' ' | '_')).collect();
    let stripped = compact.strip_prefix("HFC").unwrap_or(&compact);
    match stripped.strip_prefix('R') {
        Some(rest) => format!("R-{rest}"),
        None => format!("R-{stripped}"),
    }
}

struct SeedFactor {
    category: FactorCategory,
    fuel: &'static str,
    unit: Unit,
    country: Option<&'static str>,
    source: FactorSource,
    year: u16,
    co2: f64,
    ch4: Option<f64>,
    n2o: Option<f64>,
    total: f64,
    methodology: &'static str,
}

impl SeedFactor {
    fn to_factor(&self) -> EmissionFactor {
        EmissionFactor {
            category: self.category,
            fuel_or_energy_type: self.fuel.to_string(),
            unit: self.unit,
            country: self.country.map(str::to_string),
            source: self.source,
            source_year: self.year,
            co2_factor: self.co2,
            ch4_factor: self.ch4,
            n2o_factor: self.n2o,
            total_co2e_factor: self.total,
            methodology: self.methodology.to_string(),
        }
    }
}

fn combustion(
    category: FactorCategory,
    fuel: &'static str,
    unit: Unit,
    source: FactorSource,
    year: u16,
    co2: f64,
    total: f64,
) -> SeedFactor {
    SeedFactor {
        category,
        fuel,
        unit,
        country: None,
        source,
        year,
        co2,
        ch4: None,
        n2o: None,
        total,
        methodology: "GHG conversion factors, gross calorific value basis",
    }
}

fn electricity(
    fuel: &'static str,
    country: &'static str,
    source: FactorSource,
    year: u16,
    total: f64,
) -> SeedFactor {
    SeedFactor {
        category: FactorCategory::Electricity,
        fuel,
        unit: Unit::KWh,
        country: Some(country),
        source,
        year,
        co2: total,
        ch4: None,
        n2o: None,
        total,
        methodology: "Grid average or residual mix intensity",
    }
}

fn refrigerant(gas: &'static str, co2: f64, gwp: f64) -> SeedFactor {
    SeedFactor {
        category: FactorCategory::Refrigerant,
        fuel: gas,
        unit: Unit::Kilogram,
        country: None,
        source: FactorSource::Ipcc,
        year: 2014,
        co2,
        ch4: None,
        n2o: None,
        total: gwp,
        methodology: "IPCC AR5 100-year GWP",
    }
}

fn seed() -> Vec<SeedFactor> {
    use FactorCategory::{MobileCombustion as Mobile, StationaryCombustion as Stationary};

    vec![
        // Stationary combustion, aggregate factors
        combustion(Stationary, "diesel", Unit::Litre, FactorSource::Desnz, 2024, 2.631_27, 2.658_15),
        combustion(Stationary, "gas_oil", Unit::Litre, FactorSource::Desnz, 2024, 2.736_81, 2.758_57),
        combustion(Stationary, "kerosene", Unit::Litre, FactorSource::Desnz, 2024, 2.527_18, 2.540_38),
        combustion(Stationary, "lpg", Unit::Litre, FactorSource::Desnz, 2024, 1.555_37, 1.557_13),
        combustion(Stationary, "natural_gas", Unit::KWh, FactorSource::Desnz, 2024, 0.182_53, 0.182_90),
        combustion(Stationary, "natural_gas", Unit::CubicMetre, FactorSource::Desnz, 2024, 2.035_05, 2.039_15),
        combustion(Stationary, "coal", Unit::Tonne, FactorSource::Desnz, 2024, 2_388.49, 2_403.84),
        combustion(Stationary, "wood_pellets", Unit::Tonne, FactorSource::Desnz, 2024, 0.0, 51.56),
        SeedFactor {
            category: Stationary,
            fuel: "natural_gas",
            unit: Unit::KWh,
            country: Some("IE"),
            source: FactorSource::National,
            year: 2023,
            co2: 0.2047,
            ch4: None,
            n2o: None,
            total: 0.2047,
            methodology: "National inventory net calorific value factors",
        },
        // IPCC 2006 defaults with per-gas components (74.1 t CO2, 3 kg CH4,
        // 0.6 kg N2O per TJ at 36 MJ/L)
        SeedFactor {
            category: Stationary,
            fuel: "diesel",
            unit: Unit::Litre,
            country: None,
            source: FactorSource::Ipcc,
            year: 2006,
            co2: 2.6676,
            ch4: Some(0.000_108),
            n2o: Some(0.000_021_6),
            total: 2.676_348,
            methodology: "IPCC 2006 Tier 1 stationary combustion defaults",
        },
        // Mobile combustion
        SeedFactor {
            category: Mobile,
            fuel: "diesel",
            unit: Unit::Litre,
            country: None,
            source: FactorSource::Desnz,
            year: 2024,
            co2: 2.624_9,
            ch4: Some(0.000_009),
            n2o: Some(0.000_124),
            total: 2.658_012,
            methodology: "GHG conversion factors, average biofuel blend",
        },
        SeedFactor {
            category: Mobile,
            fuel: "petrol",
            unit: Unit::Litre,
            country: None,
            source: FactorSource::Desnz,
            year: 2024,
            co2: 2.339_7,
            ch4: Some(0.000_31),
            n2o: Some(0.000_02),
            total: 2.353_68,
            methodology: "GHG conversion factors, average biofuel blend",
        },
        combustion(Mobile, "lpg", Unit::Litre, FactorSource::Desnz, 2024, 1.555_37, 1.557_13),
        combustion(Mobile, "cng", Unit::Kilogram, FactorSource::Desnz, 2024, 2.540_17, 2.551_01),
        // Purchased electricity, location based
        electricity(GRID_ELECTRICITY, "IE", FactorSource::National, 2023, 0.295),
        electricity(GRID_ELECTRICITY, "GB", FactorSource::Desnz, 2024, 0.207_05),
        electricity(GRID_ELECTRICITY, "FR", FactorSource::Iea, 2022, 0.056_9),
        electricity(GRID_ELECTRICITY, "DE", FactorSource::Iea, 2022, 0.381),
        electricity(GRID_ELECTRICITY, "NL", FactorSource::Iea, 2022, 0.328),
        electricity(GRID_ELECTRICITY, "ES", FactorSource::Iea, 2022, 0.174),
        electricity(GRID_ELECTRICITY, "IT", FactorSource::Iea, 2022, 0.315),
        electricity(GRID_ELECTRICITY, "US", FactorSource::Epa, 2023, 0.371_2),
        // Purchased electricity, residual mix
        electricity(RESIDUAL_MIX, "IE", FactorSource::Aib, 2023, 0.391_8),
        electricity(RESIDUAL_MIX, "GB", FactorSource::Aib, 2023, 0.361_7),
        electricity(RESIDUAL_MIX, "FR", FactorSource::Aib, 2023, 0.040_6),
        electricity(RESIDUAL_MIX, "DE", FactorSource::Aib, 2023, 0.699_2),
        electricity(RESIDUAL_MIX, "NL", FactorSource::Aib, 2023, 0.456_1),
        electricity(RESIDUAL_MIX, "ES", FactorSource::Aib, 2023, 0.262_0),
        electricity(RESIDUAL_MIX, "IT", FactorSource::Aib, 2023, 0.457_5),
        // Refrigerants
        refrigerant("R-134A", 0.0, 1_300.0),
        refrigerant("R-404A", 0.0, 3_922.0),
        refrigerant("R-407C", 0.0, 1_774.0),
        refrigerant("R-410A", 0.0, 2_088.0),
        refrigerant("R-32", 0.0, 677.0),
        refrigerant("R-22", 0.0, 1_760.0),
        refrigerant("R-290", 0.0, 3.0),
        refrigerant("R-717", 0.0, 0.0),
        refrigerant("R-744", 1.0, 1.0),
    ]
}
