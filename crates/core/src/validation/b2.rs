//! B2 - practices, policies and future initiatives

use serde_json::Value;
use vsme_common::is_filled;
use vsme_domain::{Result, ValidationResult};

use super::{percentage, require_object, ModuleKind};

/// Sustainability topics a B2 disclosure may address
pub const TOPICS: [&str; 10] = [
    "climateChange",
    "pollution",
    "waterAndMarineResources",
    "biodiversityAndEcosystems",
    "resourceUseAndCircularEconomy",
    "ownWorkforce",
    "workersInValueChain",
    "affectedCommunities",
    "consumersAndEndUsers",
    "businessConduct",
];

const COMMITMENT_FLAGS: [&str; 3] = ["hasPolicy", "hasPractice", "hasFutureInitiative"];

pub(super) fn validate(data: &Value) -> Result<ValidationResult> {
    let fields = require_object(data, ModuleKind::B2)?;
    let mut result = ValidationResult::valid(0);

    let practices = match fields.get("practices") {
        None | Some(Value::Null) => {
            result.push_error("practices is required");
            return Ok(result);
        }
        Some(Value::Object(practices)) => practices,
        Some(_) => {
            result.push_error("practices must be an object keyed by sustainability topic");
            return Ok(result);
        }
    };

    let mut addressed = 0;
    for (topic, entry) in practices {
        if !TOPICS.contains(&topic.as_str()) {
            result.push_warning(format!("Unknown sustainability topic: {topic}"));
            continue;
        }
        let flagged = |flag: &str| entry.get(flag).and_then(Value::as_bool).unwrap_or(false);
        let described = is_filled(entry.get("description"));

        if flagged("hasPolicy") && !described {
            result.push_warning(format!("{topic} has a policy but no description"));
        }
        if COMMITMENT_FLAGS.iter().any(|flag| flagged(*flag)) || described {
            addressed += 1;
        }
    }

    if addressed == 0 {
        result.push_warning("No sustainability topic is addressed yet");
    }
    Ok(result.with_score(percentage(addressed, TOPICS.len())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn score_counts_addressed_topics() {
        let result = validate(&json!({
            "practices": {
                "climateChange": { "hasPolicy": true, "description": "Energy plan" },
                "pollution": { "hasPractice": true },
                "ownWorkforce": { "hasPolicy": false }
            }
        }))
        .unwrap();
        assert!(result.is_valid);
        assert_eq!(result.score, 20);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn policy_without_description_warns() {
        let result = validate(&json!({
            "practices": { "businessConduct": { "hasPolicy": true, "description": "" } }
        }))
        .unwrap();
        assert!(result.is_valid);
        assert_eq!(result.score, 10);
        assert_eq!(result.warnings, vec!["businessConduct has a policy but no description".to_string()]);
    }

    #[test]
    fn non_object_practices_is_an_error() {
        let result = validate(&json!({ "practices": ["climateChange"] })).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn unknown_topics_only_warn() {
        let result = validate(&json!({ "practices": { "astrology": { "hasPolicy": true } } })).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.score, 0);
        assert_eq!(result.warnings.len(), 2);
    }
}
