//! B1 - basis for preparation

use serde_json::Value;
use vsme_common::{has_content, is_filled};
use vsme_domain::constants::SCORE_MAX;
use vsme_domain::{Result, ValidationResult};

use super::{require_object, ModuleKind};

const REPORTING_OPTIONS: [&str; 2] = ["basic", "basic_and_comprehensive"];
const REPORTING_BASES: [&str; 2] = ["individual", "consolidated"];

pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    let fields = require_object(data, ModuleKind::B1)?;
    let mut result = ValidationResult::valid(0);

    let option = check_selection(
        fields.get("reportingOption"),
        "reportingOption",
        &REPORTING_OPTIONS,
        &mut result,
    );
    let basis =
        check_selection(fields.get("reportingBasis"), "reportingBasis", &REPORTING_BASES, &mut result);

    if basis == Some("consolidated") && !fields.get("subsidiaries").is_some_and(has_content) {
        result.push_warning("Consolidated reporting without any subsidiaries listed");
    }

    let score = if option.is_some() && basis.is_some() { SCORE_MAX } else { 0 };
    Ok(result.with_score(score))
}

/// Returns the canonical option when the selection is valid
fn check_selection(
    value: Option<&Value>,
    field: &str,
    allowed: &[&'static str],
    result: &mut ValidationResult,
) -> Option<&'static str> {
    if !is_filled(value) {
        result.push_error(format!("{field} is required"));
        return None;
    }
    let chosen = value.and_then(Value::as_str).map(|s| s.trim().to_lowercase());
    let matched = chosen.and_then(|c| allowed.iter().copied().find(|a| *a == c));
    if matched.is_none() {
        result.push_error(format!("{field} must be one of: {}", allowed.join(", ")));
    }
    matched
}
