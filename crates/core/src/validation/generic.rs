use serde_json::Value;
use vsme_common::has_content;
use vsme_domain::constants::GENERIC_PRESENT_SCORE;
use vsme_domain::{Result, ValidationResult};

/// Only checks that some data was entered
pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    if has_content(data) {
        Ok(ValidationResult::valid(GENERIC_PRESENT_SCORE))
    } else {
        Ok(ValidationResult::invalid("No data provided"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn present_data_scores_fifty() {
        let result = validate(&json!({ "notes": "x" })).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn empty_data_scores_zero() {
        for data in [json!(null), json!({}), json!([]), json!("  ")] {
            let result = validate(&data).unwrap();
            assert!(!result.is_valid);
            assert_eq!(result.score, 0);
            assert_eq!(result.errors, vec!["No data provided".to_string()]);
        }
    }
}
