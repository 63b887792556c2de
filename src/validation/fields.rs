//! Field paths, initial values and submit-time checks for a section

use super::rules::RuleCache;
use crate::dependency::{DependencyResolver, is_truthy, lookup};
use crate::error::ValidationError;
use crate::schema::{Question, QuestionKind, QuestionType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Message key surfaced for a malformed number answer
pub const NUMBER_VALIDATION_MESSAGE: &str = "number-validation-message";
pub const EMAIL_VALIDATION_MESSAGE: &str = "email-validation-message";
pub const PHONE_VALIDATION_MESSAGE: &str = "phone-validation-message";

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s\-()]+$").unwrap());

static MISSING: Value = Value::Null;

/// Path segments under which a question's answer is stored
///
/// `name` wins over `question`; cascader answers live under `cascader`.
/// Returns `None` for questions with neither.
pub fn field_path(question: &Question) -> Option<Vec<String>> {
    let key = question.field_key()?;
    let mut path: Vec<String> = key.split('.').map(str::to_string).collect();
    if question.question_type() == QuestionType::Cascader {
        path.insert(0, "cascader".to_string());
    }
    Some(path)
}

pub fn field_name(question: &Question) -> Option<String> {
    field_path(question).map(|path| path.join("."))
}

/// Questions that get rendered, in order
///
/// Questions without a field are skipped except static text. Hidden fields
/// are dropped when `filter_hidden` is set, unless the form is read-only.
pub fn visible_questions(questions: &[Question], read_only: bool, filter_hidden: bool) -> Vec<&Question> {
    questions
        .iter()
        .filter(|q| q.field_key().is_some() || q.question_type() == QuestionType::StaticText)
        .filter(|q| read_only || !filter_hidden || !q.hidden_field)
        .collect()
}

/// Value a field starts with, taken from previously saved answers
pub fn initial_value(question: &Question, data: &Value) -> Value {
    let Some(key) = question.field_key() else {
        return Value::Null;
    };

    match &question.kind {
        QuestionKind::Switch { .. } => lookup(data, key).cloned().unwrap_or(Value::Bool(false)),
        QuestionKind::Cascader { stages, .. } => {
            let gathered: Map<String, Value> = stages
                .iter()
                .filter_map(|stage| {
                    lookup(data, stage)
                        .filter(|v| is_truthy(v))
                        .map(|v| (stage.clone(), v.clone()))
                })
                .collect();
            Value::Object(gathered)
        }
        QuestionKind::DatePicker => lookup(data, key)
            .filter(|v| is_truthy(v))
            .cloned()
            .unwrap_or(Value::Null),
        _ => lookup(data, key).cloned().unwrap_or(Value::Null),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Check one visible section at submit time
///
/// `values` are the answers as entered, nested by field path. Every failing
/// field contributes one error; an empty vector means the section passes.
pub fn validate_section(
    questions: &[Question],
    values: &Value,
    persisted: &Value,
    resolver: &DependencyResolver,
    cache: &mut RuleCache,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for question in visible_questions(questions, false, true) {
        let Some(field) = field_name(question) else {
            continue;
        };
        let value = lookup(values, &field).unwrap_or(&MISSING);

        if resolver.effective_required(question, persisted) && is_blank(value) {
            errors.push(ValidationError::new(
                field,
                format!("{} is required", question.question),
            ));
            continue;
        }

        if let Some(rules) = cache.rules_for(question) {
            if let Err(message) = rules.check(value) {
                errors.push(ValidationError::new(field, message));
                continue;
            }
        }

        let Some(text) = as_text(value).filter(|t| !t.is_empty()) else {
            continue;
        };
        let format_error = if question.question_type() == QuestionType::Number
            && !NUMBER_PATTERN.is_match(&text)
        {
            Some(NUMBER_VALIDATION_MESSAGE)
        } else if question.question == "Email" && !EMAIL_PATTERN.is_match(&text) {
            Some(EMAIL_VALIDATION_MESSAGE)
        } else if question.question == "Phone Number" && !PHONE_PATTERN.is_match(&text) {
            Some(PHONE_VALIDATION_MESSAGE)
        } else {
            None
        };

        if let Some(message) = format_error {
            errors.push(ValidationError::new(field, message));
        }
    }

    if !errors.is_empty() {
        log::debug!("Section failed validation on {} fields", errors.len());
    }
    errors
}
