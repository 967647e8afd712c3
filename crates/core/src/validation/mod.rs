//! Per-module validation rules
//!
//! Each VSME module kind is bound to one validator function. Validators are
//! pure: they read the payload and return errors, warnings and a score, and
//! calling them twice with the same data yields the same result.

mod b0;
mod b1;
mod b2;
mod b3;
mod b8;
mod generic;
mod kind;

use serde_json::{Map, Value};
use tracing::warn;
use vsme_domain::{Result, ValidationResult, VsmeError};

pub use kind::ModuleKind;

/// Signature shared by every module validator
pub type ValidatorFn = fn(&Value) -> Result<ValidationResult>;

/// Validate `data` for `module_id`.
///
/// A validator that fails outright (for instance because the payload is not
/// an object) is reported as a single validation error with a zero score;
/// the failure never propagates to the caller.
pub fn validate_module(module_id: &str, data: &Value) -> ValidationResult {
    let kind = ModuleKind::from_id(module_id);
    match (kind.validator())(data) {
        Ok(result) => result,
        Err(err) => {
            warn!(module_id, error = %err, "validator failed");
            ValidationResult::invalid(format!("Validation failed: {}", err.message()))
        }
    }
}

fn require_object<'a>(data: &'a Value, kind: ModuleKind) -> Result<&'a Map<String, Value>> {
    data.as_object().ok_or_else(|| {
        VsmeError::Validation(format!("{} data must be an object", kind.label()))
    })
}

/// Percentage of `part` in `whole`, rounded, 0 when `whole` is 0
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part as f64 * 100.0 / whole as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Check an optional numeric field: absent or null is fine, anything else
/// must be a non-negative number
fn check_non_negative(data: &Value, field: &str, result: &mut ValidationResult) -> Option<f64> {
    let raw = data.get(field)?;
    if raw.is_null() {
        return None;
    }
    match vsme_common::number_at(data, field) {
        Some(value) if value.is_finite() && value >= 0.0 => Some(value),
        Some(_) => {
            result.push_error(format!("{field} must not be negative"));
            None
        }
        None => {
            result.push_error(format!("{field} must be a number"));
            None
        }
    }
}
