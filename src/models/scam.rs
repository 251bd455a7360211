use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
pub struct ScamCheckRequest {
    pub text: Option<String>,
}

/// Classification verdict relayed from the provider. Unlike the scheme
/// pipeline, nothing is filled in here: a field the provider omitted stays
/// absent in the response.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ScamVerdict {
    #[serde(rename = "isScam", skip_serializing_if = "Option::is_none")]
    pub is_scam: Option<bool>,
    #[serde(rename = "riskLevel", skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScamVerdict {
    /// Total mapping: never fails, never substitutes defaults.
    pub fn from_provider(value: &Value) -> Self {
        ScamVerdict {
            is_scam: value.get("isScam").and_then(Value::as_bool),
            risk_level: value
                .get("riskLevel")
                .and_then(Value::as_str)
                .map(str::to_owned),
            reason: value
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_verdict_round_trips_unmodified() {
        let provider = json!({
            "isScam": true,
            "riskLevel": "High",
            "reason": "Lottery prize bait"
        });

        let verdict = ScamVerdict::from_provider(&provider);

        assert_eq!(serde_json::to_value(&verdict).unwrap(), provider);
    }

    #[test]
    fn missing_fields_stay_absent() {
        let verdict = ScamVerdict::from_provider(&json!({"isScam": false}));

        assert_eq!(verdict.is_scam, Some(false));
        assert_eq!(verdict.risk_level, None);
        assert_eq!(verdict.reason, None);

        let serialized = serde_json::to_value(&verdict).unwrap();
        assert_eq!(serialized, json!({"isScam": false}));
    }

    #[test]
    fn off_domain_risk_level_is_relayed_as_is() {
        let verdict = ScamVerdict::from_provider(&json!({"riskLevel": "severe"}));

        assert_eq!(verdict.risk_level.as_deref(), Some("severe"));
    }
}
