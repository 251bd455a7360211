use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Checklist substituted for any scheme the provider returns without one.
pub const DEFAULT_REQUIRED_DOCUMENTS: [&str; 4] = [
    "Aadhaar Card",
    "Income Certificate",
    "Residence Proof",
    "Bank Passbook",
];

#[derive(Clone, Debug, Deserialize)]
pub struct SchemeSearchRequest {
    pub query: Option<String>,
    pub language: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Scheme {
    pub name: String,
    pub description: String,
    pub eligibility: String,
    pub documents: Vec<String>,
    pub apply_link: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SchemeSearchResult {
    pub message: String,
    pub schemes: Vec<Scheme>,
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

impl Scheme {
    /// Total mapping from whatever the provider sent. Every field is optional
    /// on the wire; a missing, non-array or empty `documents` list is replaced
    /// with the default checklist, anything else is kept unmodified.
    pub fn from_provider(value: &Value) -> Self {
        let documents: Vec<String> = value
            .get("documents")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let documents = if documents.is_empty() {
            DEFAULT_REQUIRED_DOCUMENTS
                .iter()
                .map(|d| (*d).to_owned())
                .collect()
        } else {
            documents
        };

        Scheme {
            name: string_field(value, "name"),
            description: string_field(value, "description"),
            eligibility: string_field(value, "eligibility"),
            documents,
            apply_link: string_field(value, "apply_link"),
        }
    }
}

impl SchemeSearchResult {
    pub fn from_provider(value: &Value) -> Self {
        let schemes = value
            .get("schemes")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Scheme::from_provider).collect())
            .unwrap_or_default();

        SchemeSearchResult {
            message: string_field(value, "message"),
            schemes,
        }
    }

    /// Fallback body for a failed provider round trip. Always renderable by
    /// the frontend: a non-empty message and an empty scheme list.
    pub fn failure() -> Self {
        SchemeSearchResult {
            message: "Server error".to_owned(),
            schemes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_documents_are_replaced_with_the_default_checklist() {
        let scheme = Scheme::from_provider(&json!({
            "name": "PM-KISAN",
            "description": "Income support for farmers",
            "eligibility": "Small and marginal farmers",
            "documents": [],
            "apply_link": "https://pmkisan.gov.in"
        }));

        assert_eq!(
            scheme.documents,
            vec![
                "Aadhaar Card",
                "Income Certificate",
                "Residence Proof",
                "Bank Passbook"
            ]
        );
    }

    #[test]
    fn missing_documents_are_replaced_with_the_default_checklist() {
        let scheme = Scheme::from_provider(&json!({
            "name": "PM-KISAN"
        }));

        assert_eq!(scheme.documents.len(), 4);
        assert_eq!(scheme.documents[0], "Aadhaar Card");
    }

    #[test]
    fn provider_documents_are_kept_unmodified() {
        let scheme = Scheme::from_provider(&json!({
            "name": "Ujjwala Yojana",
            "documents": ["BPL Card", "Aadhaar Card"]
        }));

        assert_eq!(scheme.documents, vec!["BPL Card", "Aadhaar Card"]);
    }

    #[test]
    fn every_scheme_in_a_mapped_result_has_documents() {
        let result = SchemeSearchResult::from_provider(&json!({
            "message": "Found 3 schemes",
            "schemes": [
                {"name": "A", "documents": ["Ration Card"]},
                {"name": "B", "documents": []},
                {"name": "C"}
            ]
        }));

        assert_eq!(result.message, "Found 3 schemes");
        assert_eq!(result.schemes.len(), 3);
        for scheme in &result.schemes {
            assert!(!scheme.documents.is_empty());
        }
    }

    #[test]
    fn unusable_provider_payload_maps_to_an_empty_result() {
        let result = SchemeSearchResult::from_provider(&json!("not an object"));

        assert_eq!(result.message, "");
        assert!(result.schemes.is_empty());
    }

    #[test]
    fn failure_result_is_renderable() {
        let result = SchemeSearchResult::failure();

        assert!(!result.message.is_empty());
        assert!(result.schemes.is_empty());
    }
}
