//! Data validation and transformation engine.
//!
//! A [`RuleSet`] is evaluated against a loose [`Record`]. Rules report
//! failures through [`Actions::assert`] (or by returning `false`) and queue
//! replacements through [`Actions::transform`]. A failed field always ends
//! up with its default value, or no value at all, even when a transform was
//! queued for it.
//!
//! ```rust
//! use lingshu_core::{define_rules, DataHandler, RuleSet, TypeTag};
//! use serde_json::json;
//!
//! let data = json!({ "step": "x" }).as_object().cloned().unwrap_or_default();
//! let rules: RuleSet = define_rules([("step", TypeTag::ValidNumber.with_fallback(1))]).into();
//!
//! let out = DataHandler::new(&data).rules(&rules).run().unwrap();
//! assert_eq!(out.result["step"], json!(1));
//! ```

mod actions;
pub mod evaluator;
pub mod rules;
pub mod schema;
pub mod tags;

pub use actions::Actions;
pub use evaluator::evaluate;
pub use rules::{
    ErrorHandler, EvaluateOptions, Evaluation, FieldRule, FieldRules, Outcome, RecordRule, RuleSet,
};
pub use schema::{TagEntry, TagSchema};
pub use tags::{define_rules, RuleSpec, TypeTag};

use crate::error::ToolkitError;
use crate::types::Record;

/// Builder front end for [`evaluate`].
///
/// Running without rules is a contract violation and fails with
/// [`ToolkitError::InvalidArgument`].
#[derive(Debug)]
pub struct DataHandler<'a> {
    data: &'a Record,
    rules: Option<&'a RuleSet>,
    options: EvaluateOptions,
}

impl<'a> DataHandler<'a> {
    pub fn new(data: &'a Record) -> Self {
        Self {
            data,
            rules: None,
            options: EvaluateOptions::default(),
        }
    }

    pub fn rules(mut self, rules: &'a RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn maybe_rules(mut self, rules: Option<&'a RuleSet>) -> Self {
        self.rules = rules;
        self
    }

    pub fn options(mut self, options: EvaluateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<Evaluation, ToolkitError> {
        let rules = self
            .rules
            .ok_or_else(|| ToolkitError::invalid_argument("dataHandler", "rules is required"))?;
        evaluate(self.data, rules, &self.options)
    }
}
