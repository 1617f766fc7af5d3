//! Option sanitizers for the counter and controllable-value hooks.
//!
//! The hook wrappers hand over whatever the caller passed as options; these
//! helpers run it through the data handler and return typed, safe values.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::data_handler::{define_rules, evaluate, EvaluateOptions, FieldRule, RuleSet, TypeTag};
use crate::error::ToolkitError;
use crate::types::Record;

/* --------------------------------------------------------------------------
   Counter
   -------------------------------------------------------------------------- */

pub const DEFAULT_COUNTER_MIN: f64 = f64::NEG_INFINITY;
pub const DEFAULT_COUNTER_MAX: f64 = f64::INFINITY;
pub const DEFAULT_COUNTER_STEP: f64 = 1.0;

static COUNTER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    define_rules([
        ("min", numeric_fallback("min", DEFAULT_COUNTER_MIN)),
        ("max", numeric_fallback("max", DEFAULT_COUNTER_MAX)),
        ("step", numeric_fallback("step", DEFAULT_COUNTER_STEP)),
    ])
    .into()
});

/// Bounds and step of a numeric counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CounterOptions {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            min: DEFAULT_COUNTER_MIN,
            max: DEFAULT_COUNTER_MAX,
            step: DEFAULT_COUNTER_STEP,
        }
    }
}

impl CounterOptions {
    /// Sanitize loose counter options.
    ///
    /// Missing fields take their default. Non-numeric values are coerced
    /// like JavaScript's `Number()` and fall back to the default when that
    /// yields NaN.
    pub fn sanitize(raw: &Record) -> Result<Self, ToolkitError> {
        let evaluation = evaluate(raw, &COUNTER_RULES, &EvaluateOptions::default())?;
        let read = |key: &str, default: f64| {
            evaluation
                .result
                .get(key)
                .and_then(json_to_f64)
                .unwrap_or(default)
        };
        Ok(Self {
            min: read("min", DEFAULT_COUNTER_MIN),
            max: read("max", DEFAULT_COUNTER_MAX),
            step: read("step", DEFAULT_COUNTER_STEP),
        })
    }

    /// Clamp `value` into `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// The step used by increment/decrement; always non-negative.
    pub fn step_size(&self) -> f64 {
        self.step.abs()
    }
}

fn numeric_fallback(field: &'static str, default: f64) -> FieldRule {
    TypeTag::ValidNumber.with_fallback_fn(move |value| {
        let coerced = match value {
            None => default,
            Some(raw) => {
                tracing::warn!(field, value = %raw, "Counter option is not a number, coercing");
                coerce_number(raw).unwrap_or(default)
            }
        };
        f64_to_json(coerced)
    })
}

const POS_INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

/// JSON has no infinities; they travel as the strings `"Infinity"` and
/// `"-Infinity"` between the rule and [`json_to_f64`].
fn f64_to_json(number: f64) -> Value {
    match Number::from_f64(number) {
        Some(number) => Value::Number(number),
        None if number == f64::INFINITY => Value::from(POS_INFINITY),
        None if number == f64::NEG_INFINITY => Value::from(NEG_INFINITY),
        None => Value::Null,
    }
}

fn json_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if text == POS_INFINITY => Some(f64::INFINITY),
        Value::String(text) if text == NEG_INFINITY => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// `Number(value)` semantics for JSON values; `None` stands for NaN.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => parse_numeric_literal(text)?,
        Value::Array(_) | Value::Object(_) => return None,
    };
    (!number.is_nan()).then_some(number)
}

/// Parse a string the way JavaScript's `StringToNumber` does.
///
/// Accepts blank input (0), signed decimal literals with optional fraction
/// and exponent, `Infinity` with an optional sign, and unsigned
/// `0x` / `0o` / `0b` integers. Spellings only Rust accepts (`inf`, `NaN`,
/// `infinity`) are rejected.
fn parse_numeric_literal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&text[2..], radix);
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned == POS_INFINITY {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let decimal_only = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    let starts_mantissa = unsigned.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.');
    if !decimal_only || !starts_mantissa {
        return None;
    }
    text.parse::<f64>().ok()
}

fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/* --------------------------------------------------------------------------
   Controllable value
   -------------------------------------------------------------------------- */

pub const DEFAULT_VALUE_PROP_NAME: &str = "defaultValue";
pub const VALUE_PROP_NAME: &str = "value";
pub const TRIGGER_PROP_NAME: &str = "onChange";

static CONTROLLABLE_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    define_rules([
        (
            "defaultValuePropName",
            TypeTag::ValidString.with_fallback(DEFAULT_VALUE_PROP_NAME),
        ),
        ("valuePropName", TypeTag::ValidString.with_fallback(VALUE_PROP_NAME)),
        ("trigger", TypeTag::ValidString.with_fallback(TRIGGER_PROP_NAME)),
    ])
    .into()
});

/// Which props carry the value, its initial default and the change trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllableValueOptions {
    pub default_value: Option<Value>,
    pub default_value_prop_name: String,
    pub value_prop_name: String,
    pub trigger: String,
}

impl Default for ControllableValueOptions {
    fn default() -> Self {
        Self {
            default_value: None,
            default_value_prop_name: DEFAULT_VALUE_PROP_NAME.to_string(),
            value_prop_name: VALUE_PROP_NAME.to_string(),
            trigger: TRIGGER_PROP_NAME.to_string(),
        }
    }
}

/// Outcome of resolving a component's props against the options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlledValue {
    /// The value prop is present, so the parent owns the state.
    pub controlled: bool,
    pub value: Option<Value>,
    pub trigger: String,
}

impl ControllableValueOptions {
    pub fn sanitize(raw: &Record) -> Result<Self, ToolkitError> {
        let mut result = evaluate(raw, &CONTROLLABLE_RULES, &EvaluateOptions::default())?.result;
        let mut take = |key: &str, default: &str| match result.shift_remove(key) {
            Some(Value::String(name)) => name,
            _ => default.to_string(),
        };
        Ok(Self {
            default_value_prop_name: take("defaultValuePropName", DEFAULT_VALUE_PROP_NAME),
            value_prop_name: take("valuePropName", VALUE_PROP_NAME),
            trigger: take("trigger", TRIGGER_PROP_NAME),
            default_value: raw.get("defaultValue").cloned(),
        })
    }

    /// Pick the initial value from `props`.
    ///
    /// A present value prop (even `null`) makes the component controlled.
    /// Otherwise the default-value prop is used, then `default_value`.
    pub fn resolve(&self, props: &Record) -> ControlledValue {
        let controlled = props.contains_key(&self.value_prop_name);
        let value = if controlled {
            props.get(&self.value_prop_name).cloned()
        } else {
            props
                .get(&self.default_value_prop_name)
                .cloned()
                .or_else(|| self.default_value.clone())
        };
        ControlledValue {
            controlled,
            value,
            trigger: self.trigger.clone(),
        }
    }
}
