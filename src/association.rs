//! Association index built from dot-separated field names
//!
//! Question names such as `person.first_name` are grouped by their first
//! segment. The index is derived data: rebuild it from the current
//! questions whenever they change and never persist it.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

const MAX_SUGGESTIONS: usize = 15;

/// Group identity of a label: the exact text before the first dot
pub fn group_of(label: &str) -> &str {
    label.split_once('.').map(|(group, _)| group).unwrap_or(label)
}

/// Split a name into `(group, field)` on its first dot
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_once('.').unwrap_or((name, ""))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationGroup {
    pub name: String,
    pub fields: Vec<String>,
}

impl AssociationGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationIndex {
    groups: Vec<AssociationGroup>,
}

impl AssociationIndex {
    /// Merge question names into the host-supplied groups
    ///
    /// Existing groups keep their position, new groups are appended in the
    /// order they are first seen. A bare `group` name contributes an empty
    /// field.
    pub fn build<'a>(
        existing: &[AssociationGroup],
        names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut groups = existing.to_vec();

        for name in names.into_iter().filter(|n| !n.is_empty()) {
            let (group, field) = split_name(name);
            let position = match groups.iter().position(|g| g.name == group) {
                Some(position) => position,
                None => {
                    groups.push(AssociationGroup::new(group));
                    groups.len() - 1
                }
            };

            let fields = &mut groups[position].fields;
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[AssociationGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&AssociationGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Selectable keys: `group.field`, or bare `group` for the empty field
    pub fn suggestions(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.fields.iter().map(move |field| {
                    if field.is_empty() {
                        group.name.clone()
                    } else {
                        format!("{}.{}", group.name, field)
                    }
                })
            })
            .collect()
    }

    /// Suggestions restricted to one group, used while a cascade is locked
    pub fn suggestions_in(&self, group: &str) -> Vec<String> {
        self.suggestions()
            .into_iter()
            .filter(|s| group_of(s) == group)
            .collect()
    }

    /// Fuzzy-ranked suggestions for typed input (best first)
    pub fn search(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(String, i64)> = self
            .suggestions()
            .into_iter()
            .filter_map(|key| matcher.fuzzy_match(&key, query).map(|score| (key, score)))
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(key, _)| key)
            .collect()
    }
}
