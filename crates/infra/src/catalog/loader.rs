//! Emission factor file loader
//!
//! Accepts TOML with a `[[factors]]` array of tables, or JSON holding either
//! a bare array or `{ "factors": [...] }`. Field names follow the camelCase
//! JSON shape of [`EmissionFactor`].

use std::path::Path;

use serde::Deserialize;
use tracing::info;
use vsme_core::EmissionFactorCatalog;
use vsme_domain::{EmissionFactor, Result, VsmeError};

#[derive(Deserialize)]
#[serde(untagged)]
enum FactorFile {
    Table { factors: Vec<EmissionFactor> },
    List(Vec<EmissionFactor>),
}

/// Built-in catalogue plus the factors of `path`, when given
pub fn load_catalog(path: Option<&Path>) -> Result<EmissionFactorCatalog> {
    let mut catalog = EmissionFactorCatalog::builtin();
    if let Some(path) = path {
        let extra = load_factor_file(path)?;
        info!(path = %path.display(), count = extra.len(), "loaded emission factor file");
        catalog.extend(extra);
    }
    Ok(catalog)
}

/// Parse a JSON or TOML factor file
pub fn load_factor_file(path: &Path) -> Result<Vec<EmissionFactor>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        VsmeError::Config(format!("Failed to read factor file {}: {e}", path.display()))
    })?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    parse_factors(&contents, extension)
}

/// Parse and sanity-check factors. Negative or non-finite figures are
/// rejected rather than silently producing wrong totals.
pub fn parse_factors(contents: &str, format: &str) -> Result<Vec<EmissionFactor>> {
    let file: FactorFile = match format {
        "toml" => toml::from_str(contents)
            .map_err(|e| VsmeError::Config(format!("Invalid factor TOML: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| VsmeError::Config(format!("Invalid factor JSON: {e}")))?,
        other => return Err(VsmeError::Config(format!("Unsupported factor file format: {other}"))),
    };
    let factors = match file {
        FactorFile::Table { factors } | FactorFile::List(factors) => factors,
    };

    for factor in &factors {
        check_factor(factor)?;
    }
    Ok(factors)
}

fn check_factor(factor: &EmissionFactor) -> Result<()> {
    let name = &factor.fuel_or_energy_type;
    if name.trim().is_empty() {
        return Err(VsmeError::Config("Emission factor without fuelOrEnergyType".into()));
    }
    let figures = [Some(factor.co2_factor), factor.ch4_factor, factor.n2o_factor]
        .into_iter()
        .flatten()
        .chain(std::iter::once(factor.total_co2e_factor));
    for value in figures {
        if !value.is_finite() || value < 0.0 {
            return Err(VsmeError::Config(format!("Emission factor {name} has invalid value {value}")));
        }
    }
    Ok(())
}
