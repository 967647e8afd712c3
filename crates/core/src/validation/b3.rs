//! B3 - energy and greenhouse gas emissions

use serde_json::Value;
use vsme_common::is_filled;
use vsme_domain::constants::B3_VALID_SCORE;
use vsme_domain::{Result, ValidationResult};

use super::{check_non_negative, require_object, ModuleKind};

const REQUIRED: [&str; 2] = ["scope1Total", "scope2LocationBased"];
const OPTIONAL: [&str; 3] = ["scope2MarketBased", "scope3Total", "totalEnergyConsumption"];

pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    let fields = require_object(data, ModuleKind::B3)?;
    let mut result = ValidationResult::valid(0);

    for field in REQUIRED {
        if is_filled(fields.get(field)) {
            check_non_negative(data, field, &mut result);
        } else {
            result.push_error(format!("{field} is required"));
        }
    }
    for field in OPTIONAL {
        check_non_negative(data, field, &mut result);
    }

    if !is_filled(fields.get("scope2MarketBased")) {
        result.push_warning(
            "scope2MarketBased is missing; report market-based scope 2 next to location-based",
        );
    }
    if !is_filled(fields.get("totalEnergyConsumption")) {
        result.push_warning("totalEnergyConsumption is missing");
    }

    let score = if result.is_valid { B3_VALID_SCORE } else { 0 };
    Ok(result.with_score(score))
}
