//! Per-field capabilities handed to rules, and the call ledger behind them.

use std::collections::HashSet;

use serde_json::Value;

/// Bookkeeping for one evaluation call.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    pub(crate) errors: Vec<String>,
    pub(crate) transforms: Vec<(String, Value)>,
    pub(crate) failed_keys: HashSet<String>,
}

impl Ledger {
    /// Records an error for `key` unless one was already recorded.
    pub(crate) fn add_error(&mut self, key: &str, message: Option<String>) {
        if !self.failed_keys.insert(key.to_string()) {
            return;
        }
        self.errors.push(message.unwrap_or_else(|| default_message(key)));
    }

    pub(crate) fn add_transform(&mut self, key: &str, value: Value) {
        self.transforms.push((key.to_string(), value));
    }

    pub(crate) fn has_failed(&self, key: &str) -> bool {
        self.failed_keys.contains(key)
    }
}

pub(crate) fn default_message(key: &str) -> String {
    format!("{key} is not valid")
}

/// Actions available to a rule while it evaluates one field.
///
/// An `Actions` is scoped to a single key and only lives for the duration
/// of one rule invocation.
pub struct Actions<'a> {
    key: &'a str,
    ledger: &'a mut Ledger,
}

impl<'a> Actions<'a> {
    pub(crate) fn new(key: &'a str, ledger: &'a mut Ledger) -> Self {
        Self { key, ledger }
    }

    /// The field this context is scoped to.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Records the default error for this field when `condition` is false.
    ///
    /// Returns `condition` unchanged so a rule can end with
    /// `actions.assert(...)`.
    pub fn assert(&mut self, condition: bool) -> bool {
        if !condition {
            self.ledger.add_error(self.key, None);
        }
        condition
    }

    /// Like [`assert`](Self::assert) with a custom message.
    pub fn assert_with(&mut self, condition: bool, message: impl Into<String>) -> bool {
        if !condition {
            self.ledger.add_error(self.key, Some(message.into()));
        }
        condition
    }

    /// Queues a replacement value for this field.
    ///
    /// Ignored once the field has failed; a later failure also discards it.
    pub fn transform(&mut self, value: impl Into<Value>) {
        if !self.ledger.has_failed(self.key) {
            self.ledger.add_transform(self.key, value.into());
        }
    }
}
