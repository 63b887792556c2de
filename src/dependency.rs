//! Field enablement driven by `depend` references
//!
//! A question that names another field in `depend` is only enabled while
//! that field is truthy. Only fields that some question depends on are
//! tracked.

use crate::schema::Question;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// JSON-value truthiness: `null`, `false`, `0` and `""` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Read `a.b.c` out of nested objects; numeric segments index arrays
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    targets: BTreeSet<String>,
    live: HashMap<String, Value>,
}

impl DependencyResolver {
    pub fn new<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Self {
        let mut resolver = Self::default();
        resolver.retarget(questions);
        resolver
    }

    /// Recompute tracked targets, dropping live values nobody depends on
    pub fn retarget<'a>(&mut self, questions: impl IntoIterator<Item = &'a Question>) {
        self.targets = questions
            .into_iter()
            .filter_map(|q| q.depend.as_deref())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        let targets = &self.targets;
        self.live.retain(|name, _| targets.contains(name));
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    /// Record a switch change; returns whether a tracked value changed
    pub fn record(&mut self, name: &str, value: Value) -> bool {
        if !self.is_tracked(name) {
            return false;
        }
        if self.live.get(name) == Some(&value) {
            return false;
        }
        debug!("Dependency target '{}' is now {}", name, value);
        self.live.insert(name.to_string(), value);
        true
    }

    pub fn live_value(&self, name: &str) -> Option<&Value> {
        self.live.get(name)
    }

    /// Live value once the user touched the field, persisted data before that
    pub fn value_of<'a>(&'a self, name: &str, persisted: &'a Value) -> Option<&'a Value> {
        self.live.get(name).or_else(|| lookup(persisted, name))
    }

    pub fn is_enabled(&self, question: &Question, persisted: &Value) -> bool {
        match question.depend.as_deref().filter(|d| !d.is_empty()) {
            None => true,
            Some(depend) => self.value_of(depend, persisted).is_some_and(is_truthy),
        }
    }

    /// A disabled question is never required
    pub fn effective_required(&self, question: &Question, persisted: &Value) -> bool {
        question.required && self.is_enabled(question, persisted)
    }
}
