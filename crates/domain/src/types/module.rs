//! Per-report module data, validation and completion types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::SCORE_MAX;
use crate::impl_domain_status_conversions;

/// Validation state of a module as last computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Warning,
    /// No authoritative (backend) validation available
    #[default]
    NotValidated,
}

impl_domain_status_conversions!(ValidationStatus {
    Valid => "valid",
    Invalid => "invalid",
    Warning => "warning",
    NotValidated => "not_validated" | "not-validated",
});

/// Data entered for one module of one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ModuleData {
    pub report_id: String,
    pub module_id: String,
    /// Arbitrary nested form fields
    pub data: Value,
    pub completion_percentage: u8,
    pub validation_status: ValidationStatus,
    pub last_updated: DateTime<Utc>,
}

/// Outcome of validating one module's data. Computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// 0..=100
    pub score: u8,
}

impl ValidationResult {
    /// Empty, valid result with the given score
    pub fn valid(score: u8) -> Self {
        Self { is_valid: true, errors: Vec::new(), warnings: Vec::new(), score: score.min(SCORE_MAX) }
    }

    /// Invalid result carrying a single error
    pub fn invalid(error: impl Into<String>) -> Self {
        Self { is_valid: false, errors: vec![error.into()], warnings: Vec::new(), score: 0 }
    }

    /// Record an error; the result becomes invalid
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Record a warning; validity is unaffected
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Clamp and set the score
    pub fn with_score(mut self, score: u8) -> Self {
        self.score = score.min(SCORE_MAX);
        self
    }

    /// Status summarising this result
    pub fn status(&self) -> ValidationStatus {
        if !self.is_valid {
            ValidationStatus::Invalid
        } else if self.warnings.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Warning
        }
    }
}

/// Required-versus-completed field coverage for a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub module_id: String,
    pub required_fields: Vec<String>,
    pub completed_fields: Vec<String>,
    pub missing_fields: Vec<String>,
    /// `round(100 * completed / required)`, always within 0..=100
    pub completion_percentage: u8,
    #[serde(default)]
    pub validation_status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}
