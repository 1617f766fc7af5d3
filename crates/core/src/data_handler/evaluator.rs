//! Rule evaluator: pure logic over an in-memory record.

use super::actions::{Actions, Ledger};
use super::rules::{EvaluateOptions, Evaluation, Outcome, RuleSet};
use crate::error::ToolkitError;
use crate::types::Record;

const FN_NAME: &str = "dataHandler";

/// Evaluate `rules` against `data` and return the sanitized record.
///
/// Every selected field is evaluated even after earlier failures. Errors are
/// then reported per `options`, queued transforms are applied, and failed
/// fields are reset to their default (or removed when there is none).
pub fn evaluate(
    data: &Record,
    rules: &RuleSet,
    options: &EvaluateOptions,
) -> Result<Evaluation, ToolkitError> {
    let default_value = options.default_value.as_ref();
    let mut working = merge_defaults(default_value, data);
    let mut ledger = Ledger::default();

    match rules {
        RuleSet::Record(rule) => {
            for key in working.keys() {
                let mut actions = Actions::new(key, &mut ledger);
                let outcome = rule.check(working.get(key), key, &mut actions, &working);
                settle(&mut ledger, key, outcome);
            }
        }
        RuleSet::Fields(fields) => {
            for (key, rule) in fields.iter() {
                let mut actions = Actions::new(key, &mut ledger);
                let outcome = rule.check(working.get(key), &mut actions, &working);
                settle(&mut ledger, key, outcome);
            }
        }
    }

    let Ledger {
        errors,
        transforms,
        failed_keys,
    } = ledger;

    report_errors(&errors, options)?;

    for (key, value) in transforms {
        working.insert(key, value);
    }

    for key in &failed_keys {
        match default_value.and_then(|defaults| defaults.get(key)) {
            Some(fallback) => {
                working.insert(key.clone(), fallback.clone());
            }
            None => {
                working.shift_remove(key);
            }
        }
    }

    tracing::debug!(
        fields = working.len(),
        errors = errors.len(),
        "Data handler evaluation complete"
    );

    Ok(Evaluation {
        result: working,
        errors,
    })
}

fn merge_defaults(default_value: Option<&Record>, data: &Record) -> Record {
    let mut merged = default_value.cloned().unwrap_or_default();
    for (key, value) in data {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn settle(ledger: &mut Ledger, key: &str, outcome: Outcome) {
    if outcome == Outcome::Invalid {
        ledger.add_error(key, None);
    }
}

fn report_errors(errors: &[String], options: &EvaluateOptions) -> Result<(), ToolkitError> {
    if errors.is_empty() {
        return Ok(());
    }
    if let Some(handler) = &options.error_handler {
        handler(errors);
    } else if options.strict {
        return Err(ToolkitError::invalid_argument(FN_NAME, errors.join("\n")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handler::rules::{FieldRule, FieldRules};
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object fixture, got {other}"),
        }
    }

    #[test]
    fn record_rule_visits_merged_keys() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let rules = RuleSet::record(move |_, key, _, _| {
            sink.lock().unwrap().push(key.to_string());
        });
        let options = EvaluateOptions::new().default_value(record(json!({"a": 0, "b": 0})));

        evaluate(&record(json!({"b": 1, "c": 2})), &rules, &options).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn field_rules_leave_unlisted_fields_alone() {
        let rules: RuleSet = FieldRules::new()
            .with("num", FieldRule::new(|v, _, _| v.is_some_and(Value::is_number)))
            .into();

        let out = evaluate(
            &record(json!({"num": 1, "other": "x"})),
            &rules,
            &EvaluateOptions::new(),
        )
        .unwrap();

        assert_eq!(out.result, record(json!({"num": 1, "other": "x"})));
        assert!(out.errors.is_empty());
    }

    #[test]
    fn listed_but_absent_field_sees_no_value() {
        let rules: RuleSet = FieldRules::new()
            .with("missing", FieldRule::new(|v, _, _| v.is_none()))
            .into();

        let out = evaluate(&Record::new(), &rules, &EvaluateOptions::new()).unwrap();

        assert!(out.result.is_empty());
        assert!(out.errors.is_empty());
    }

    #[test]
    fn failed_field_is_removed_in_place() {
        let rules: RuleSet = FieldRules::new()
            .with("b", FieldRule::new(|_, _, _| false))
            .into();

        let out = evaluate(
            &record(json!({"a": 1, "b": 2, "c": 3})),
            &rules,
            &EvaluateOptions::new(),
        )
        .unwrap();

        assert_eq!(out.result.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn strict_failure_does_not_call_rules_twice() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = RuleSet::record(move |_, _, _, _| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            false
        });

        let err = evaluate(
            &record(json!({"a": 1, "b": 2})),
            &rules,
            &EvaluateOptions::new().strict(true),
        )
        .unwrap_err();

        assert_eq!(err.message(), "a is not valid\nb is not valid");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
