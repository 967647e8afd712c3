//! Emissions commands: factor lookup, calculation and B3 roll-up

use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use tracing::info;
use vsme_core::{ActivityEntry, EmissionsSummary, FactorQuery};
use vsme_domain::{
    ActivityRecord, EmissionFactor, FactorCategory, FactorSource, Unit, VsmeError,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Factor descriptor as sent by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FactorLookupRequest {
    pub category: FactorCategory,
    pub fuel_or_energy_type: String,
    pub unit: Unit,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub preferred_source: Option<FactorSource>,
}

impl From<FactorLookupRequest> for FactorQuery {
    fn from(request: FactorLookupRequest) -> Self {
        let mut query =
            FactorQuery::new(request.category, request.fuel_or_energy_type, request.unit);
        if let Some(country) = request.country {
            query = query.with_country(country);
        }
        if let Some(source) = request.preferred_source {
            query = query.with_preferred_source(source);
        }
        query
    }
}

/// Calculated records, their totals and the matching B3 payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsReport {
    pub records: Vec<ActivityRecord>,
    pub summary: EmissionsSummary,
    /// Ready to save as module `b3`
    pub module_data: Value,
}

/// Best catalogue factor for an exact unit
pub async fn lookup_emission_factor(
    ctx: &AppContext,
    request: FactorLookupRequest,
) -> Result<EmissionFactor, String> {
    execute_command("emissions::lookup_emission_factor", || async {
        ctx.calculator.catalog().lookup(&FactorQuery::from(request))
    })
    .await
}

/// Calculate every entry; one failing entry fails the batch
pub async fn calculate_emissions(
    ctx: &AppContext,
    entries: Vec<ActivityEntry>,
) -> Result<Vec<ActivityRecord>, String> {
    execute_command("emissions::calculate_emissions", || async {
        ctx.calculator.calculate_all(&entries)
    })
    .await
}

/// Calculate, aggregate by scope and build `b3` module data
pub async fn summarize_emissions(
    ctx: &AppContext,
    entries: Vec<ActivityEntry>,
) -> Result<EmissionsReport, String> {
    execute_command("emissions::summarize_emissions", || async {
        let records = ctx.calculator.calculate_all(&entries)?;
        let summary = EmissionsSummary::from_records(&records);
        info!(
            records = summary.record_count,
            scope1_kg = summary.scope1_total,
            scope2_location_kg = summary.scope2_location_based,
            "emissions summarized"
        );
        let module_data = summary.to_module_data();
        Ok::<_, VsmeError>(EmissionsReport { records, summary, module_data })
    })
    .await
}
