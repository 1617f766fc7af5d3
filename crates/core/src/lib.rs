//! Lingshu toolkit core.
//!
//! Runtime validation and coercion of loose option records, plus the small
//! helpers the UI hook wrappers build on:
//!
//! - [`data_handler`] — rule evaluation with per-field error collection,
//!   queued transforms and default-value fallback.
//! - [`data_handler::tags`] — the built-in type-tag rule library.
//! - [`condition_merge`] — conditional merging of objects or arrays.
//! - [`options`] — sanitizers for counter and controllable-value options.

pub mod condition_merge;
pub mod data_handler;
pub mod error;
pub mod options;
pub mod types;

pub use condition_merge::{condition_merge, ConditionItem};
pub use data_handler::{
    define_rules, evaluate, Actions, DataHandler, EvaluateOptions, Evaluation, FieldRule,
    FieldRules, Outcome, RecordRule, RuleSet, RuleSpec, TagSchema, TypeTag,
};
pub use error::ToolkitError;
pub use types::Record;
