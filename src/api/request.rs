//! Operation request model
//!
//! Requests arrive through an external HTTP layer as a set of query
//! parameters plus an optional JSON body. A field can be supplied either
//! way; a non-blank query value takes precedence over a same-named body
//! property, and blank values count as missing.

use serde_json::Value;
use std::collections::HashMap;

/// A request to one of the boundary operations
#[derive(Debug, Clone, Default)]
pub struct OperationRequest {
    /// Query parameters
    pub query: HashMap<String, String>,

    /// Parsed JSON body, if any
    pub body: Option<Value>,
}

impl OperationRequest {
    /// Build a request from query parameters only
    pub fn from_query(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            query: pairs.into_iter().collect(),
            body: None,
        }
    }

    /// Build a request from a JSON body only
    pub fn from_body(body: Value) -> Self {
        Self {
            query: HashMap::new(),
            body: Some(body),
        }
    }

    /// Look up a field by name: query parameter first, then the JSON body
    /// property. Returns `None` when neither source has a non-blank value.
    pub fn field(&self, name: &str) -> Option<String> {
        if let Some(value) = self.query.get(name) {
            if !value.trim().is_empty() {
                return Some(value.clone());
            }
        }

        self.body
            .as_ref()
            .and_then(|body| body.get(name))
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_wins_over_body() {
        let mut request = OperationRequest::from_body(json!({"ts": "from-body"}));
        request.query.insert("ts".to_string(), "from-query".to_string());

        assert_eq!(request.field("ts").as_deref(), Some("from-query"));
    }

    #[test]
    fn test_blank_query_falls_through_to_body() {
        let mut request = OperationRequest::from_body(json!({"ts": "from-body"}));
        request.query.insert("ts".to_string(), "   ".to_string());

        assert_eq!(request.field("ts").as_deref(), Some("from-body"));
    }

    #[test]
    fn test_blank_body_value_is_missing() {
        let request = OperationRequest::from_body(json!({"ts": ""}));
        assert_eq!(request.field("ts"), None);
    }

    #[test]
    fn test_non_string_body_value_is_missing() {
        let request = OperationRequest::from_body(json!({"ts": 42}));
        assert_eq!(request.field("ts"), None);
    }

    #[test]
    fn test_absent_everywhere() {
        let request = OperationRequest::default();
        assert_eq!(request.field("ts"), None);
    }
}
