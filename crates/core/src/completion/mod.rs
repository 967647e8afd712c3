//! Required-versus-completed field coverage per module

mod required;

use serde_json::Value;
use vsme_common::{has_content, is_filled, resolve_path};
use vsme_domain::{CompletionStatus, ValidationStatus};

pub use required::required_fields;

use crate::validation::ModuleKind;

/// Field coverage of `data` against an explicit list of dotted paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoverage {
    pub completed: Vec<String>,
    pub missing: Vec<String>,
    pub percentage: u8,
}

/// A field is completed when its path resolves to something other than
/// null or an empty string. A broken path counts as missing.
pub fn completion_for_fields<S: AsRef<str>>(required: &[S], data: &Value) -> FieldCoverage {
    let (completed, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .map(|field| field.as_ref().to_string())
        .partition(|field| is_filled(resolve_path(data, field)));

    let percentage = if required.is_empty() {
        if has_content(data) {
            100
        } else {
            0
        }
    } else {
        let pct = (completed.len() as f64 * 100.0 / required.len() as f64).round();
        pct.clamp(0.0, 100.0) as u8
    };

    FieldCoverage { completed, missing, percentage }
}

/// Locally computed completion status for a module.
///
/// The result is an approximation; it always carries
/// [`ValidationStatus::NotValidated`] because no authoritative validation
/// took place.
pub fn completion_status(module_id: &str, data: &Value) -> CompletionStatus {
    let required = required_fields(ModuleKind::from_id(module_id));
    let coverage = completion_for_fields(required, data);

    CompletionStatus {
        module_id: module_id.to_string(),
        required_fields: required.iter().map(|f| (*f).to_string()).collect(),
        completed_fields: coverage.completed,
        missing_fields: coverage.missing,
        completion_percentage: coverage.percentage,
        validation_status: ValidationStatus::NotValidated,
        last_updated: None,
    }
}
