//! Declarative tag schemas loaded from JSON.
//!
//! ```json
//! { "min": { "tag": "validNumber", "fallback": 0 }, "label": "validString" }
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::rules::FieldRules;
use super::tags::{define_rules, RuleSpec, TypeTag};
use crate::types::Record;

/// One field entry of a [`TagSchema`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagEntry {
    Name(String),
    Detailed {
        tag: String,
        #[serde(default)]
        fallback: Option<Value>,
    },
}

/// Ordered field-name to tag mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSchema {
    entries: Vec<(String, TagEntry)>,
}

impl TagSchema {
    pub fn entries(&self) -> &[(String, TagEntry)] {
        &self.entries
    }

    /// Build the field rules. Unknown tags are skipped with a warning, the
    /// same way [`define_rules`] treats them.
    pub fn to_rules(&self) -> FieldRules {
        define_rules(
            self.entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.to_spec())),
        )
    }
}

impl TagEntry {
    fn to_spec(&self) -> RuleSpec {
        match self {
            TagEntry::Name(name) => RuleSpec::from(name.as_str()),
            TagEntry::Detailed {
                tag,
                fallback: Some(fallback),
            } => match TypeTag::from_name(tag) {
                Some(known) => RuleSpec::Rule(known.with_fallback(fallback.clone())),
                None => RuleSpec::from(tag.as_str()),
            },
            TagEntry::Detailed { tag, .. } => RuleSpec::from(tag.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for TagSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Record::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .map(|(key, value)| {
                TagEntry::deserialize(value)
                    .map(|entry| (key, entry))
                    .map_err(D::Error::custom)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_names_and_detailed_entries_in_order() {
        let schema: TagSchema = serde_json::from_value(json!({
            "label": "validString",
            "min": { "tag": "validNumber", "fallback": 0 },
            "max": { "tag": "validNumber" }
        }))
        .unwrap();

        assert_eq!(
            schema.entries(),
            &[
                ("label".to_string(), TagEntry::Name("validString".into())),
                (
                    "min".to_string(),
                    TagEntry::Detailed {
                        tag: "validNumber".into(),
                        fallback: Some(json!(0)),
                    }
                ),
                (
                    "max".to_string(),
                    TagEntry::Detailed {
                        tag: "validNumber".into(),
                        fallback: None,
                    }
                ),
            ]
        );
    }

    #[test]
    fn rejects_non_object_schema() {
        assert!(serde_json::from_value::<TagSchema>(json!(["string"])).is_err());
        assert!(serde_json::from_value::<TagSchema>(json!({"a": 1})).is_err());
    }

    #[test]
    fn unknown_tags_are_dropped_from_rules() {
        let schema: TagSchema = serde_json::from_value(json!({
            "a": "string1",
            "b": { "tag": "nope", "fallback": 1 },
            "c": "boolean"
        }))
        .unwrap();

        let rules = schema.to_rules();
        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["c"]);
    }
}
