//! B8 - workforce general characteristics

use serde_json::{Map, Value};
use vsme_common::{is_filled, number_at};
use vsme_domain::constants::{B8_WARNING_SCORE, SCORE_MAX};
use vsme_domain::{Result, ValidationResult};

use super::{check_non_negative, require_object, ModuleKind};

const BREAKDOWNS: [&str; 2] = ["employeesByContract", "employeesByGender"];

pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    let fields = require_object(data, ModuleKind::B8)?;
    let mut result = ValidationResult::valid(0);

    let total = if is_filled(fields.get("totalEmployees")) {
        check_non_negative(data, "totalEmployees", &mut result)
    } else {
        result.push_error("totalEmployees is required");
        None
    };

    for breakdown in BREAKDOWNS {
        match fields.get(breakdown) {
            None | Some(Value::Null) => {}
            Some(Value::Object(groups)) => check_breakdown(breakdown, groups, total, &mut result),
            Some(_) => result.push_error(format!("{breakdown} must be an object")),
        }
    }

    let score = match (result.is_valid, result.warnings.is_empty()) {
        (false, _) => 0,
        (true, true) => SCORE_MAX,
        (true, false) => B8_WARNING_SCORE,
    };
    Ok(result.with_score(score))
}

fn check_breakdown(
    name: &str,
    groups: &Map<String, Value>,
    total: Option<f64>,
    result: &mut ValidationResult,
) {
    let mut sum = 0.0;
    for (group, value) in groups {
        if value.is_null() {
            continue;
        }
        match number_at(value, "") {
            Some(count) if count.is_finite() && count >= 0.0 => sum += count,
            Some(_) => result.push_error(format!("{name}.{group} must not be negative")),
            None => result.push_error(format!("{name}.{group} must be a number")),
        }
    }

    if let Some(total) = total {
        if !groups.is_empty() && (sum - total).abs() > f64::EPSILON {
            result.push_warning(format!("{name} adds up to {sum} but totalEmployees is {total}"));
        }
    }
}
