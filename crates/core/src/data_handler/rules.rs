//! Rule, rule-set, option and result types for the data handler.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::actions::Actions;
use crate::types::Record;

/// Verdict returned by a rule.
///
/// Rules usually return `bool` or `()`; both convert into an `Outcome`.
/// Only an explicit `false` marks the field invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

impl From<bool> for Outcome {
    fn from(valid: bool) -> Self {
        if valid {
            Outcome::Valid
        } else {
            Outcome::Invalid
        }
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Valid
    }
}

type FieldFn = dyn Fn(Option<&Value>, &mut Actions<'_>, &Record) -> Outcome + Send + Sync;
type RecordFn = dyn Fn(Option<&Value>, &str, &mut Actions<'_>, &Record) -> Outcome + Send + Sync;

/// A rule bound to a single field: `(value, actions, whole_record)`.
///
/// `value` is `None` when the field is absent from the working record.
#[derive(Clone)]
pub struct FieldRule(Arc<FieldFn>);

impl FieldRule {
    pub fn new<F, R>(rule: F) -> Self
    where
        F: Fn(Option<&Value>, &mut Actions<'_>, &Record) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        Self(Arc::new(
            move |value: Option<&Value>, actions: &mut Actions<'_>, record: &Record| {
                rule(value, actions, record).into()
            },
        ))
    }

    pub(crate) fn check(
        &self,
        value: Option<&Value>,
        actions: &mut Actions<'_>,
        record: &Record,
    ) -> Outcome {
        (self.0)(value, actions, record)
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldRule")
    }
}

/// A rule applied to every field of the record: `(value, key, actions, whole_record)`.
#[derive(Clone)]
pub struct RecordRule(Arc<RecordFn>);

impl RecordRule {
    pub fn new<F, R>(rule: F) -> Self
    where
        F: Fn(Option<&Value>, &str, &mut Actions<'_>, &Record) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        Self(Arc::new(
            move |value: Option<&Value>, key: &str, actions: &mut Actions<'_>, record: &Record| {
                rule(value, key, actions, record).into()
            },
        ))
    }

    pub(crate) fn check(
        &self,
        value: Option<&Value>,
        key: &str,
        actions: &mut Actions<'_>,
        record: &Record,
    ) -> Outcome {
        (self.0)(value, key, actions, record)
    }
}

impl fmt::Debug for RecordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecordRule")
    }
}

/// Ordered field-name to rule mapping. Inserting an existing key replaces
/// its rule in place.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    entries: Vec<(String, FieldRule)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: FieldRule) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((key, rule)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldRule> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRule)> for FieldRules {
    fn from_iter<I: IntoIterator<Item = (K, FieldRule)>>(iter: I) -> Self {
        let mut rules = FieldRules::new();
        for (key, rule) in iter {
            rules.insert(key, rule);
        }
        rules
    }
}

/// The two accepted rule-set shapes, resolved once per evaluation.
#[derive(Debug, Clone)]
pub enum RuleSet {
    /// One rule for every key of the merged working record.
    Record(RecordRule),
    /// One rule per listed key; unlisted keys are left untouched.
    Fields(FieldRules),
}

impl RuleSet {
    /// Shorthand for a whole-record rule set.
    pub fn record<F, R>(rule: F) -> Self
    where
        F: Fn(Option<&Value>, &str, &mut Actions<'_>, &Record) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        RuleSet::Record(RecordRule::new(rule))
    }
}

impl From<RecordRule> for RuleSet {
    fn from(rule: RecordRule) -> Self {
        RuleSet::Record(rule)
    }
}

impl From<FieldRules> for RuleSet {
    fn from(rules: FieldRules) -> Self {
        RuleSet::Fields(rules)
    }
}

pub type ErrorHandler = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Per-call evaluation options.
#[derive(Clone, Default)]
pub struct EvaluateOptions {
    /// Fail the call when any field error was recorded.
    pub strict: bool,
    /// Receives all collected errors instead of the strict failure.
    pub error_handler: Option<ErrorHandler>,
    /// Pre-seeds absent fields and replaces fields that failed validation.
    pub default_value: Option<Record>,
}

impl EvaluateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn default_value(mut self, default_value: Record) -> Self {
        self.default_value = Some(default_value);
        self
    }
}

impl fmt::Debug for EvaluateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluateOptions")
            .field("strict", &self.strict)
            .field("error_handler", &self.error_handler.is_some())
            .field("default_value", &self.default_value)
            .finish()
    }
}

/// Sanitized record plus the ordered field error messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub result: Record,
    pub errors: Vec<String>,
}
