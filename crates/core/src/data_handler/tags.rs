//! Built-in type-tag rules and the mapping helper that assembles them.
//!
//! A tag either fails the field outright (`tag.rule()`) or swaps the bad
//! value for a fallback through [`transform`](super::Actions::transform)
//! without recording an error (`tag.with_fallback(..)` /
//! `tag.with_fallback_fn(..)`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rules::{FieldRule, FieldRules};
use crate::error::ToolkitError;

/// Named value checks.
///
/// `Function` and `Symbol` have no JSON representation, so they never
/// match and always take the failure (or fallback) path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeTag {
    NotNullable,
    String,
    ValidString,
    Number,
    ValidNumber,
    Boolean,
    Object,
    Array,
    Function,
    Symbol,
}

impl TypeTag {
    pub const ALL: [TypeTag; 10] = [
        TypeTag::NotNullable,
        TypeTag::String,
        TypeTag::ValidString,
        TypeTag::Number,
        TypeTag::ValidNumber,
        TypeTag::Boolean,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::Function,
        TypeTag::Symbol,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::NotNullable => "notNullable",
            TypeTag::String => "string",
            TypeTag::ValidString => "validString",
            TypeTag::Number => "number",
            TypeTag::ValidNumber => "validNumber",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Function => "function",
            TypeTag::Symbol => "symbol",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Whether `value` (`None` = absent) satisfies this tag.
    pub fn matches(self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            TypeTag::NotNullable => !value.is_null(),
            TypeTag::String => value.is_string(),
            TypeTag::ValidString => value.as_str().is_some_and(|s| !s.is_empty()),
            TypeTag::Number => value.is_number(),
            TypeTag::ValidNumber => value.as_f64().is_some_and(f64::is_finite),
            TypeTag::Boolean => value.is_boolean(),
            TypeTag::Object => value.is_object(),
            TypeTag::Array => value.is_array(),
            TypeTag::Function | TypeTag::Symbol => false,
        }
    }

    /// Rule without fallback: mismatches are reported and the field is
    /// dropped (or reset to its default value).
    pub fn rule(self) -> FieldRule {
        self.build(Fallback::None)
    }

    /// Rule replacing mismatches with `fallback`. A `null` fallback means no
    /// fallback at all.
    pub fn with_fallback(self, fallback: impl Into<Value>) -> FieldRule {
        match fallback.into() {
            Value::Null => self.build(Fallback::None),
            value => self.build(Fallback::Value(value)),
        }
    }

    /// Rule replacing mismatches with `compute(original)`.
    pub fn with_fallback_fn<F>(self, compute: F) -> FieldRule
    where
        F: Fn(Option<&Value>) -> Value + Send + Sync + 'static,
    {
        self.build(Fallback::Compute(Arc::new(compute)))
    }

    fn build(self, fallback: Fallback) -> FieldRule {
        FieldRule::new(move |value, actions, _| {
            if self.matches(value) {
                return true;
            }
            match &fallback {
                Fallback::None => false,
                Fallback::Value(replacement) => {
                    actions.transform(replacement.clone());
                    true
                }
                Fallback::Compute(compute) => {
                    actions.transform(compute(value));
                    true
                }
            }
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            ToolkitError::invalid_argument("typeTag", format!("{s} is not a valid type"))
        })
    }
}

enum Fallback {
    None,
    Value(Value),
    Compute(Arc<dyn Fn(Option<&Value>) -> Value + Send + Sync>),
}

/// One entry accepted by [`define_rules`]: a tag name or a ready rule.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    Tag(String),
    Rule(FieldRule),
}

impl From<&str> for RuleSpec {
    fn from(name: &str) -> Self {
        RuleSpec::Tag(name.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(name: String) -> Self {
        RuleSpec::Tag(name)
    }
}

impl From<TypeTag> for RuleSpec {
    fn from(tag: TypeTag) -> Self {
        RuleSpec::Rule(tag.rule())
    }
}

impl From<FieldRule> for RuleSpec {
    fn from(rule: FieldRule) -> Self {
        RuleSpec::Rule(rule)
    }
}

/// Build a field rule mapping from tag names and custom rules.
///
/// Unknown tag names are logged and skipped, so those fields are never
/// evaluated.
pub fn define_rules<I, K, S>(entries: I) -> FieldRules
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<RuleSpec>,
{
    let mut rules = FieldRules::new();
    for (key, spec) in entries {
        let key = key.into();
        match spec.into() {
            RuleSpec::Rule(rule) => rules.insert(key, rule),
            RuleSpec::Tag(name) => match TypeTag::from_name(&name) {
                Some(tag) => rules.insert(key, tag.rule()),
                None => {
                    tracing::warn!(field = %key, tag = %name, "Unknown type tag, field skipped");
                }
            },
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_names_round_trip() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
            assert_eq!(tag.name().parse::<TypeTag>().unwrap(), tag);
        }
        assert!(TypeTag::from_name("string1").is_none());
        assert!("string1".parse::<TypeTag>().is_err());
    }

    #[test]
    fn serde_names_match_tag_names() {
        let tag: TypeTag = serde_json::from_value(json!("validNumber")).unwrap();
        assert_eq!(tag, TypeTag::ValidNumber);
        assert_eq!(serde_json::to_value(TypeTag::NotNullable).unwrap(), json!("notNullable"));
    }

    #[test]
    fn not_nullable_rejects_null_and_absent_only() {
        assert!(TypeTag::NotNullable.matches(Some(&json!(""))));
        assert!(TypeTag::NotNullable.matches(Some(&json!(0))));
        assert!(!TypeTag::NotNullable.matches(Some(&Value::Null)));
        assert!(!TypeTag::NotNullable.matches(None));
    }

    #[test]
    fn valid_string_requires_content() {
        assert!(TypeTag::ValidString.matches(Some(&json!("a"))));
        assert!(!TypeTag::ValidString.matches(Some(&json!(""))));
        assert!(TypeTag::String.matches(Some(&json!(""))));
    }

    #[test]
    fn structural_tags() {
        assert!(TypeTag::Object.matches(Some(&json!({}))));
        assert!(!TypeTag::Object.matches(Some(&json!([]))));
        assert!(TypeTag::Array.matches(Some(&json!([1]))));
        assert!(TypeTag::Boolean.matches(Some(&json!(false))));
        assert!(!TypeTag::Number.matches(Some(&json!("1"))));
        assert!(TypeTag::ValidNumber.matches(Some(&json!(1.5))));
    }

    #[test]
    fn function_and_symbol_never_match() {
        assert!(!TypeTag::Function.matches(Some(&json!("fn"))));
        assert!(!TypeTag::Symbol.matches(Some(&json!({}))));
    }

    #[test]
    fn define_rules_skips_unknown_tags() {
        let rules = define_rules([
            ("str", RuleSpec::from("string1")),
            ("num", RuleSpec::from("number")),
            ("bool", TypeTag::Boolean.into()),
        ]);
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["num", "bool"]);
    }
}
