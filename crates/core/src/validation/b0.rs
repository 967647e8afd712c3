//! B0 - general information about the undertaking

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use vsme_common::is_filled;
use vsme_domain::{Result, ValidationResult};

use super::{check_non_negative, percentage, require_object, ModuleKind};

const REQUIRED: [&str; 4] = ["companyName", "registrationNumber", "naceCode", "staffCount"];

/// NACE Rev. 2 code, optionally with the section letter: `01.11`, `A01.1`, `10`
static NACE_CODE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-U]?\d{2}(\.\d{1,2})?$").expect("NACE_CODE pattern is valid")
});

pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    let fields = require_object(data, ModuleKind::B0)?;
    let mut result = ValidationResult::valid(0);

    let mut present = 0;
    for field in REQUIRED {
        if is_filled(fields.get(field)) {
            present += 1;
        } else {
            result.push_error(format!("{field} is required"));
        }
    }

    if let Some(code) = fields.get("naceCode").filter(|v| is_filled(Some(*v))) {
        let valid = code.as_str().is_some_and(|c| NACE_CODE.is_match(c.trim()));
        if !valid {
            result.push_error("naceCode has an invalid format (expected e.g. 01.11 or A01.11)");
        }
    }

    if is_filled(fields.get("staffCount")) {
        if let Some(staff) = check_non_negative(data, "staffCount", &mut result) {
            if staff == 0.0 {
                result.push_warning("staffCount is 0; check the headcount");
            }
        }
    }
    check_non_negative(data, "turnover", &mut result);
    check_non_negative(data, "balanceSheetTotal", &mut result);

    Ok(result.with_score(percentage(present, REQUIRED.len())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn complete() -> Value {
        json!({
            "companyName": "Acme",
            "registrationNumber": "123",
            "naceCode": "01.11",
            "staffCount": 10
        })
    }

    #[test]
    fn complete_general_information_is_valid() {
        let result = validate(&complete()).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.score, 100);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn malformed_nace_code_mentions_format() {
        let mut data = complete();
        data["naceCode"] = json!("0111");
        let result = validate(&data).unwrap();
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("format")));
    }

    #[test]
    fn nace_code_with_section_letter_accepted() {
        for code in ["A01.11", "10", "C10.5"] {
            let mut data = complete();
            data["naceCode"] = json!(code);
            assert!(validate(&data).unwrap().is_valid, "{code}");
        }
    }

    #[test]
    fn score_is_share_of_required_fields() {
        let result = validate(&json!({ "companyName": "Acme", "naceCode": "" })).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.score, 25);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn negative_staff_count_is_an_error() {
        let mut data = complete();
        data["staffCount"] = json!(-3);
        assert!(!validate(&data).unwrap().is_valid);
    }

    #[test]
    fn zero_staff_is_a_warning() {
        let mut data = complete();
        data["staffCount"] = json!(0);
        let result = validate(&data).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn optional_financials_must_not_be_negative() {
        let mut data = complete();
        data["turnover"] = json!(-1);
        assert!(!validate(&data).unwrap().is_valid);
    }
}
