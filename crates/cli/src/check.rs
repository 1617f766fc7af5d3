//! Request model and evaluation for the checker binary.

use lingshu_core::{
    DataHandler, EvaluateOptions, Evaluation, Record, RuleSet, TagSchema, ToolkitError,
};
use serde::Deserialize;

/// A JSON check request.
///
/// ```json
/// {
///   "data": { "step": "2" },
///   "schema": { "step": { "tag": "validNumber", "fallback": 1 } },
///   "defaultValue": { "step": 1 },
///   "strict": false
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(default)]
    pub data: Record,
    #[serde(default)]
    pub schema: Option<TagSchema>,
    #[serde(default)]
    pub default_value: Option<Record>,
    /// Overrides the configured strict flag when present.
    #[serde(default)]
    pub strict: Option<bool>,
}

/// Evaluate a request. `strict_default` applies when the request does not
/// set `strict` itself.
pub fn check(request: &CheckRequest, strict_default: bool) -> Result<Evaluation, ToolkitError> {
    let rules: Option<RuleSet> = request.schema.as_ref().map(|schema| schema.to_rules().into());

    let mut options = EvaluateOptions::new().strict(request.strict.unwrap_or(strict_default));
    if let Some(defaults) = &request.default_value {
        options = options.default_value(defaults.clone());
    }

    tracing::debug!(
        fields = request.data.len(),
        strict = options.strict,
        "Evaluating check request"
    );

    DataHandler::new(&request.data)
        .maybe_rules(rules.as_ref())
        .options(options)
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CheckRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn evaluates_schema_with_defaults() {
        let req = request(json!({
            "data": { "label": "", "step": "x" },
            "schema": { "label": "validString", "step": { "tag": "validNumber", "fallback": 1 } },
            "defaultValue": { "label": "untitled", "extra": true }
        }));

        let out = check(&req, false).unwrap();

        assert_eq!(out.result["label"], json!("untitled"));
        assert_eq!(out.result["step"], json!(1));
        assert_eq!(out.result["extra"], json!(true));
        assert_eq!(out.errors, vec!["label is not valid"]);
    }

    #[test]
    fn missing_schema_is_rejected() {
        let err = check(&request(json!({ "data": { "a": 1 } })), false).unwrap_err();
        assert_eq!(err.message(), "rules is required");
    }

    #[test]
    fn request_strict_overrides_config() {
        let req = request(json!({
            "data": { "a": 1 },
            "schema": { "a": "string" },
            "strict": false
        }));
        assert!(check(&req, true).is_ok());

        let req = request(json!({ "data": { "a": 1 }, "schema": { "a": "string" } }));
        assert_matches!(check(&req, true), Err(ToolkitError::InvalidArgument { .. }));
    }
}
