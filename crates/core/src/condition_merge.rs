//! Conditional merging of objects or arrays.
//!
//! Each [`ConditionItem`] contributes its `value` when its condition holds
//! and its `fallback` (or nothing) otherwise. Objects merge by key
//! assignment, arrays by appending. The container kind of the result is
//! taken from the first item's `value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolkitError;

const FN_NAME: &str = "conditionMerge";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConditionItemRepr")]
pub struct ConditionItem {
    pub condition: bool,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Value>,
}

impl ConditionItem {
    pub fn new(condition: bool, value: Value) -> Self {
        Self {
            condition,
            value,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Value) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Accepted wire shapes: `[condition, value, fallback?]` or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConditionItemRepr {
    Tuple(bool, Value, Option<Value>),
    Pair(bool, Value),
    Object {
        condition: bool,
        value: Value,
        #[serde(default)]
        fallback: Option<Value>,
    },
}

impl From<ConditionItemRepr> for ConditionItem {
    fn from(repr: ConditionItemRepr) -> Self {
        match repr {
            ConditionItemRepr::Tuple(condition, value, fallback)
            | ConditionItemRepr::Object {
                condition,
                value,
                fallback,
            } => Self {
                condition,
                value,
                fallback,
            },
            ConditionItemRepr::Pair(condition, value) => Self::new(condition, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

fn container_of(value: &Value) -> Option<Container> {
    match value {
        Value::Object(_) => Some(Container::Object),
        Value::Array(_) => Some(Container::Array),
        _ => None,
    }
}

/// Merge the chosen side of every item into one object or array.
pub fn condition_merge(items: &[ConditionItem]) -> Result<Value, ToolkitError> {
    let first = items
        .first()
        .ok_or_else(|| ToolkitError::invalid_argument(FN_NAME, "input must not be empty"))?;

    for item in items {
        let valid_value = container_of(&item.value).is_some();
        let valid_fallback = item
            .fallback
            .as_ref()
            .map_or(true, |fallback| container_of(fallback).is_some());
        if !(valid_value && valid_fallback) {
            return Err(ToolkitError::invalid_argument(
                FN_NAME,
                "value and fallback must be an array or object",
            ));
        }
    }

    let mut result = match container_of(&first.value) {
        Some(Container::Array) => Value::Array(Vec::new()),
        _ => Value::Object(Default::default()),
    };

    for item in items {
        let chosen = if item.condition {
            Some(&item.value)
        } else {
            item.fallback.as_ref()
        };
        let Some(chosen) = chosen else {
            continue;
        };
        match (&mut result, chosen) {
            (Value::Object(target), Value::Object(source)) => {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            (Value::Array(target), Value::Array(source)) => {
                target.extend(source.iter().cloned());
            }
            _ => {
                return Err(ToolkitError::invalid_argument(
                    FN_NAME,
                    "all values must share the container kind of the first value",
                ));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn merges_objects_by_condition() {
        let merged = condition_merge(&[
            ConditionItem::new(true, json!({"a": 1})),
            ConditionItem::new(false, json!({"b": 2})).with_fallback(json!({"c": 3})),
            ConditionItem::new(false, json!({"d": 4})),
            ConditionItem::new(true, json!({"a": 5})),
        ])
        .unwrap();

        assert_eq!(merged, json!({"a": 5, "c": 3}));
    }

    #[test]
    fn appends_arrays() {
        let merged = condition_merge(&[
            ConditionItem::new(true, json!([1, 2])),
            ConditionItem::new(false, json!([3])).with_fallback(json!([4])),
            ConditionItem::new(false, json!([5])),
        ])
        .unwrap();

        assert_eq!(merged, json!([1, 2, 4]));
    }

    #[test]
    fn false_first_item_still_sets_container_kind() {
        let merged = condition_merge(&[ConditionItem::new(false, json!([1]))]).unwrap();
        assert_eq!(merged, json!([]));
    }

    #[test]
    fn rejects_scalar_values() {
        let err = condition_merge(&[ConditionItem::new(true, json!(1))]).unwrap_err();
        assert_matches!(
            err,
            ToolkitError::InvalidArgument { function: "conditionMerge", ref message }
                if message == "value and fallback must be an array or object"
        );

        let err = condition_merge(&[ConditionItem::new(true, json!({})).with_fallback(json!("x"))])
            .unwrap_err();
        assert_eq!(err.message(), "value and fallback must be an array or object");
    }

    #[test]
    fn rejects_mixed_containers_and_empty_input() {
        assert!(condition_merge(&[
            ConditionItem::new(true, json!({})),
            ConditionItem::new(true, json!([1])),
        ])
        .is_err());
        assert!(condition_merge(&[]).is_err());
    }

    #[test]
    fn deserializes_tuple_and_object_forms() {
        let items: Vec<ConditionItem> = serde_json::from_value(json!([
            [true, {"a": 1}],
            [false, {"b": 2}, {"c": 3}],
            {"condition": true, "value": {"d": 4}}
        ]))
        .unwrap();

        assert_eq!(items[0], ConditionItem::new(true, json!({"a": 1})));
        assert_eq!(items[1].fallback, Some(json!({"c": 3})));
        assert_eq!(condition_merge(&items).unwrap(), json!({"a": 1, "c": 3, "d": 4}));
    }
}
