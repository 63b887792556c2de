//! Submit-time validation of answers
//!
//! Rules are derived from the schema: required flags (suppressed while a
//! question's dependency is off), per-option validity and a few format
//! checks.

pub mod fields;
pub mod rules;

pub use fields::{
    EMAIL_VALIDATION_MESSAGE, NUMBER_VALIDATION_MESSAGE, PHONE_VALIDATION_MESSAGE, field_name,
    field_path, initial_value, validate_section, visible_questions,
};
pub use rules::{OptionRule, OptionRules, RuleCache};
