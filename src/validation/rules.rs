//! Per-option validity tables
//!
//! Every option-bearing question maps each selectable value to the rule of
//! the option that produces it. Switch questions map `true` to the checked
//! side and `false` to the unchecked side.

use crate::schema::{OptionLeaf, Question, QuestionKind};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRule {
    pub valid_option: bool,
    pub valid_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRules {
    by_value: HashMap<String, OptionRule>,
}

/// Table key of a submitted scalar
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl OptionRules {
    /// Rule table for option-bearing questions, `None` for everything else
    pub fn for_question(question: &Question) -> Option<Self> {
        let mut by_value = HashMap::new();
        let mut insert = |key: String, leaf: &OptionLeaf| {
            by_value.insert(
                key,
                OptionRule {
                    valid_option: leaf.valid_option,
                    valid_message: leaf.invalid_message().to_string(),
                },
            );
        };

        match &question.kind {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Checkboxes { options }
            | QuestionKind::Dropdown { options, .. } => {
                for leaf in options {
                    insert(leaf.value.clone(), leaf);
                }
            }
            QuestionKind::Switch { options: [checked, unchecked] } => {
                insert("true".to_string(), checked);
                insert("false".to_string(), unchecked);
            }
            _ => return None,
        }

        Some(Self { by_value })
    }

    pub fn rule(&self, value: &Value) -> Option<&OptionRule> {
        self.by_value.get(&value_key(value))
    }

    /// Message of the first invalid choice in `value`
    ///
    /// Arrays (checkboxes, multi-select dropdowns) are checked element by
    /// element. Unknown values pass.
    pub fn check(&self, value: &Value) -> Result<(), &str> {
        let invalid = |v: &Value| {
            self.rule(v)
                .filter(|rule| !rule.valid_option)
                .map(|rule| rule.valid_message.as_str())
        };

        let failure = match value {
            Value::Array(items) => items.iter().find_map(invalid),
            Value::Null => None,
            scalar => invalid(scalar),
        };

        match failure {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

/// Rule tables memoised by question id
///
/// Reordering options re-keys the question, so a stale entry is never
/// looked up again; editing options in place requires [`RuleCache::invalidate`].
#[derive(Debug, Clone, Default)]
pub struct RuleCache {
    rules: HashMap<u64, Option<OptionRules>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules_for(&mut self, question: &Question) -> Option<&OptionRules> {
        self.rules
            .entry(question.id)
            .or_insert_with(|| OptionRules::for_question(question))
            .as_ref()
    }

    pub fn invalidate(&mut self, id: u64) {
        self.rules.remove(&id);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
