//! The schema document: an ordered list of sections
//!
//! The first section owns the form's title. Structural edits that the
//! renderer must rebuild from scratch (reorders, cross-section moves,
//! pastes) hand the changed container a fresh id.

use super::drag::{DragAction, DragOutcome};
use super::question::Question;
use super::section::Section;
use super::types::QuestionType;
use crate::config::EditorConfig;
use crate::error::SchemaError;
use crate::ids::IdGenerator;
use crate::reorder::move_between;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Form {
    pub name: String,
    #[serde(default)]
    sections: Vec<Section>,
}

impl Form {
    pub fn new(name: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            name: name.into(),
            sections,
        }
    }

    /// Blank form with one titled section
    pub fn with_first_section(name: impl Into<String>, ids: &dyn IdGenerator) -> Self {
        let name = name.into();
        Self {
            sections: vec![Section::new(ids.next_id(), name.clone())],
            name,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Result<&Section, SchemaError> {
        self.sections.get(index).ok_or(SchemaError::NoSuchSection {
            index,
            len: self.sections.len(),
        })
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut Section, SchemaError> {
        let len = self.sections.len();
        self.sections
            .get_mut(index)
            .ok_or(SchemaError::NoSuchSection { index, len })
    }

    pub fn question(&self, section: usize, index: usize) -> Result<&Question, SchemaError> {
        self.section(section)?
            .question(index)
            .map_err(|err| renumber(err, section))
    }

    /// Append an empty section and return its index
    pub fn add_section(&mut self, ids: &dyn IdGenerator) -> usize {
        self.sections.push(Section::new(ids.next_id(), ""));
        debug!("Added section {}", self.sections.len() - 1);
        self.sections.len() - 1
    }

    pub fn remove_section(&mut self, index: usize) -> Result<Section, SchemaError> {
        self.section(index)?;
        if self.sections.len() == 1 {
            return Err(SchemaError::LastSection);
        }
        let removed = self.sections.remove(index);
        if index == 0 {
            self.name = self.sections[0].name.clone();
        }
        debug!("Removed section {}", index);
        Ok(removed)
    }

    /// Replace a section; section 0 also renames the form
    pub fn set_section(&mut self, index: usize, section: Section) -> Result<(), SchemaError> {
        let slot = self.section_mut(index)?;
        *slot = section;
        if index == 0 {
            self.name = self.sections[0].name.clone();
        }
        Ok(())
    }

    pub fn rename_section(&mut self, index: usize, name: &str) -> Result<(), SchemaError> {
        self.section_mut(index)?.name = name.to_string();
        if index == 0 {
            self.name = name.to_string();
        }
        Ok(())
    }

    pub fn set_description(&mut self, index: usize, description: Option<&str>) -> Result<(), SchemaError> {
        self.section_mut(index)?.description =
            description.filter(|d| !d.is_empty()).map(str::to_string);
        Ok(())
    }

    /// Append a default question to `section`; returns its index
    pub fn add_question(&mut self, section: usize, ids: &dyn IdGenerator) -> Result<usize, SchemaError> {
        Ok(self.section_mut(section)?.add_question(ids))
    }

    pub fn remove_question(&mut self, section: usize, index: usize) -> Result<Question, SchemaError> {
        self.section_mut(section)?
            .remove_question(index)
            .map_err(|err| renumber(err, section))
    }

    pub fn set_question(
        &mut self,
        section: usize,
        index: usize,
        question: Question,
    ) -> Result<(), SchemaError> {
        self.section_mut(section)?
            .set_question(index, question)
            .map_err(|err| renumber(err, section))
    }

    /// Edit one question in place; section state is recomputed afterwards
    pub fn edit_question<R>(
        &mut self,
        section: usize,
        index: usize,
        edit: impl FnOnce(&mut Question) -> Result<R, SchemaError>,
    ) -> Result<R, SchemaError> {
        self.section_mut(section)?
            .edit_question(index, edit)
            .map_err(|err| renumber(err, section))
    }

    /// Change a question's type, limited to the types the editor offers
    pub fn change_type(
        &mut self,
        section: usize,
        index: usize,
        ty: QuestionType,
        config: &EditorConfig,
    ) -> Result<(), SchemaError> {
        if !config.is_available(ty) {
            return Err(SchemaError::TypeUnavailable(ty.to_string()));
        }
        self.edit_question(section, index, |question| {
            question.set_type(ty);
            Ok(())
        })
    }

    /// Reorder a question's options and re-key the question
    pub fn reorder_options(
        &mut self,
        section: usize,
        question: usize,
        from: usize,
        to: usize,
        ids: &dyn IdGenerator,
    ) -> Result<(), SchemaError> {
        self.edit_question(section, question, |q| {
            q.reorder_options(from, to)?;
            q.id = ids.next_id();
            Ok(())
        })
    }

    /// Reorder questions inside one section and re-key the section
    pub fn reorder_questions(
        &mut self,
        section: usize,
        from: usize,
        to: usize,
        ids: &dyn IdGenerator,
    ) -> Result<(), SchemaError> {
        self.section_mut(section)?.reorder_questions(from, to, ids)
    }

    /// Move a question into another section
    ///
    /// Both sections get fresh ids, source first. Moving within one section
    /// goes through [`Form::reorder_questions`] instead.
    pub fn move_question(
        &mut self,
        from_section: usize,
        from: usize,
        to_section: usize,
        to: usize,
        ids: &dyn IdGenerator,
    ) -> Result<(), SchemaError> {
        if from_section == to_section {
            return self.reorder_questions(from_section, from, to, ids);
        }

        let (source, dest) = move_between(
            self.section(from_section)?.questions(),
            self.section(to_section)?.questions(),
            from,
            to,
        )?;

        let source_section = self.section_mut(from_section)?;
        source_section.replace_questions_unkeyed(source);
        source_section.id = ids.next_id();

        let dest_section = self.section_mut(to_section)?;
        dest_section.replace_questions_unkeyed(dest);
        dest_section.id = ids.next_id();

        debug!(
            "Moved question {}:{} to {}:{}",
            from_section, from, to_section, to
        );
        Ok(())
    }

    /// Apply a finished drag and return the `(section, question)` to focus
    ///
    /// A drop outside any list changes nothing and returns `None`.
    pub fn apply_drag(
        &mut self,
        drag: &DragOutcome,
        ids: &dyn IdGenerator,
    ) -> Result<Option<(usize, usize)>, SchemaError> {
        let Some(action) = drag.action() else {
            return Ok(None);
        };

        let focus = match action {
            DragAction::ReorderOptions {
                section,
                question,
                from,
                to,
            } => {
                self.reorder_options(section, question, from, to, ids)?;
                (section, question)
            }
            DragAction::ReorderQuestions { section, from, to } => {
                self.reorder_questions(section, from, to, ids)?;
                (section, to)
            }
            DragAction::MoveQuestion {
                from_section,
                from,
                to_section,
                to,
            } => {
                self.move_question(from_section, from, to_section, to, ids)?;
                (to_section, to)
            }
        };
        Ok(Some(focus))
    }

    /// Replace every section, e.g. after a paste
    pub fn replace_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
        if let Some(first) = self.sections.first() {
            self.name = first.name.clone();
        }
    }

    /// Switch questions of `section` that others may depend on
    pub fn dependency_candidates(&self, section: usize) -> Result<Vec<(String, String)>, SchemaError> {
        Ok(self.section(section)?.dependency_candidates())
    }

    /// Every question across all sections, in order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions().iter())
    }
}

/// Report section errors by position rather than by section id
fn renumber(err: SchemaError, section: usize) -> SchemaError {
    match err {
        SchemaError::QuestionIndex { index, len } => SchemaError::NoSuchQuestion {
            section,
            index,
            len,
        },
        other => other,
    }
}
