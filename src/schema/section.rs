use super::question::{Question, association_for};
use super::types::QuestionType;
use crate::association::{AssociationGroup, AssociationIndex};
use crate::error::SchemaError;
use crate::ids::IdGenerator;
use crate::reorder::reorder;
use serde::{Deserialize, Serialize};

/// Ordered group of questions, shown as one page or step
///
/// `with_condition` is derived from the questions and recomputed on every
/// change to them; there is no setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SectionWire")]
pub struct Section {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    questions: Vec<Question>,
    with_condition: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionWire {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    questions: Vec<Question>,
}

impl From<SectionWire> for Section {
    fn from(wire: SectionWire) -> Self {
        let mut section = Section::new(wire.id, wire.name);
        section.description = wire.description;
        section.set_questions(wire.questions);
        section
    }
}

impl Section {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            questions: Vec::new(),
            with_condition: false,
        }
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.set_questions(questions);
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// True iff some question is a terms-and-conditions question
    pub fn with_condition(&self) -> bool {
        self.with_condition
    }

    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.refresh();
    }

    pub fn question(&self, index: usize) -> Result<&Question, SchemaError> {
        self.questions.get(index).ok_or(SchemaError::QuestionIndex {
            index,
            len: self.questions.len(),
        })
    }

    /// Apply `edit` to one question, then recompute derived state
    pub fn edit_question<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Question) -> Result<R, SchemaError>,
    ) -> Result<R, SchemaError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(SchemaError::QuestionIndex { index, len })?;
        let result = edit(question);
        self.refresh();
        result
    }

    /// Append a fresh default question and return its index
    pub fn add_question(&mut self, ids: &dyn IdGenerator) -> usize {
        self.questions.push(Question::new(ids.next_id()));
        self.refresh();
        self.questions.len() - 1
    }

    pub fn insert_question(&mut self, index: usize, question: Question) -> Result<(), SchemaError> {
        if index > self.questions.len() {
            return Err(self.missing(index));
        }
        self.questions.insert(index, question);
        self.refresh();
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize) -> Result<Question, SchemaError> {
        if index >= self.questions.len() {
            return Err(self.missing(index));
        }
        let removed = self.questions.remove(index);
        self.refresh();
        Ok(removed)
    }

    pub fn set_question(&mut self, index: usize, question: Question) -> Result<(), SchemaError> {
        self.edit_question(index, |slot| {
            *slot = question;
            Ok(())
        })
    }

    /// Same-section move; re-keys the section so renderers rebuild it
    pub fn reorder_questions(
        &mut self,
        from: usize,
        to: usize,
        ids: &dyn IdGenerator,
    ) -> Result<(), SchemaError> {
        self.questions = reorder(&self.questions, from, to)?;
        self.id = ids.next_id();
        Ok(())
    }

    /// Association suggestions offered to questions in this section
    pub fn association_index(&self, existing: &[AssociationGroup]) -> AssociationIndex {
        association_for(existing, &self.questions)
    }

    /// Switch questions another question may depend on: `(key, label)`
    pub fn dependency_candidates(&self) -> Vec<(String, String)> {
        self.questions
            .iter()
            .filter(|q| q.question_type() == QuestionType::Switch && !q.question.trim().is_empty())
            .filter_map(|q| {
                q.field_key()
                    .map(|key| (key.to_string(), q.question.clone()))
            })
            .collect()
    }

    pub(crate) fn replace_questions_unkeyed(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.refresh();
    }

    fn missing(&self, index: usize) -> SchemaError {
        SchemaError::QuestionIndex {
            index,
            len: self.questions.len(),
        }
    }

    fn refresh(&mut self) {
        self.with_condition = self
            .questions
            .iter()
            .any(|q| q.question_type() == QuestionType::TermCondition);
    }
}
