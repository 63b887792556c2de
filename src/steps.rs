//! Multi-section forms filled in one step at a time
//!
//! [`StepTemplate`] decides which steps the step bar shows. Long forms
//! collapse to first, middle and last step, with the middle one drawn as
//! an ellipsis; the current step is always shown. [`FormProgress`] walks
//! the sections, validating and collecting answers on the way.

use crate::config::EditorConfig;
use crate::dependency::DependencyResolver;
use crate::error::ProgressError;
use crate::schema::Section;
use crate::validation::{RuleCache, validate_section};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the rendered step bar; all indices are 0-based steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSlot {
    Step(usize),
    /// Placeholder for the collapsed steps, jumps to the middle step
    Ellipsis(usize),
    Active(usize),
}

impl StepSlot {
    pub fn step(&self) -> usize {
        match self {
            StepSlot::Step(i) | StepSlot::Ellipsis(i) | StepSlot::Active(i) => *i,
        }
    }
}

/// Step-bar layout computed once from `(step_count, limit)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTemplate {
    step_count: usize,
    limit: usize,
    slots: Vec<Option<StepSlot>>,
}

impl StepTemplate {
    pub fn new(step_count: usize, limit: usize) -> Self {
        let mut slots = vec![None; step_count];
        if step_count <= limit {
            for (i, slot) in slots.iter_mut().enumerate() {
                *slot = Some(StepSlot::Step(i));
            }
        } else {
            slots[0] = Some(StepSlot::Step(0));
            slots[step_count - 1] = Some(StepSlot::Step(step_count - 1));
            if let Some(middle) = Self::middle_of(step_count) {
                slots[middle] = Some(StepSlot::Ellipsis(middle));
            }
        }
        Self {
            step_count,
            limit,
            slots,
        }
    }

    /// Ellipsis position, `None` when it would land on the first or last step
    fn middle_of(step_count: usize) -> Option<usize> {
        let middle = step_count.div_ceil(2).saturating_sub(1);
        (middle > 0 && middle + 1 < step_count).then_some(middle)
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_collapsed(&self) -> bool {
        self.step_count > self.limit
    }

    /// Visible slots while on `current`, having come from `last`
    ///
    /// The step just left disappears again unless it is one of the fixed
    /// slots; leaving the middle step restores its ellipsis.
    pub fn window(&self, current: usize, last: usize) -> StepWindow {
        let mut slots = self.slots.clone();

        if self.is_collapsed() && last < self.step_count {
            if Self::middle_of(self.step_count) == Some(last) {
                slots[last] = Some(StepSlot::Ellipsis(last));
            } else if last != 0 && last != self.step_count - 1 {
                slots[last] = None;
            }
        }

        if let Some(slot) = slots.get_mut(current) {
            *slot = Some(StepSlot::Active(current));
        }

        StepWindow {
            slots: slots.into_iter().flatten().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepWindow {
    slots: Vec<StepSlot>,
}

impl StepWindow {
    pub fn slots(&self) -> &[StepSlot] {
        &self.slots
    }

    /// Step a click on the `position`-th visible slot leads to
    pub fn target_of(&self, position: usize) -> Option<usize> {
        self.slots.get(position).map(StepSlot::step)
    }
}

/// Answers collected for one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnswers {
    pub name: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Advanced(usize),
    Completed(Vec<SectionAnswers>),
}

pub struct FormProgress {
    sections: Vec<Section>,
    current: usize,
    last: usize,
    answers: Vec<Option<SectionAnswers>>,
    terms_accepted: bool,
    read_only: bool,
    template: StepTemplate,
    resolver: DependencyResolver,
    rules: RuleCache,
}

impl FormProgress {
    pub fn new(sections: Vec<Section>, config: &EditorConfig) -> Result<Self, ProgressError> {
        if sections.is_empty() {
            return Err(ProgressError::NoSections);
        }
        let template = StepTemplate::new(sections.len(), config.step_limit);
        let resolver = DependencyResolver::new(sections[0].questions());
        Ok(Self {
            answers: vec![None; sections.len()],
            sections,
            current: 0,
            last: 0,
            terms_accepted: false,
            read_only: false,
            template,
            resolver,
            rules: RuleCache::new(),
        })
    }

    /// Viewing previous answers: no validation, terms count as accepted
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.terms_accepted = true;
        self
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.sections.len()
    }

    pub fn section(&self) -> &Section {
        &self.sections[self.current]
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Feed a switch change of the current section to the resolver
    pub fn record(&mut self, name: &str, value: Value) -> bool {
        self.resolver.record(name, value)
    }

    pub fn accept_terms(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn can_advance(&self) -> bool {
        if self.read_only {
            return !self.is_last();
        }
        !(self.section().with_condition() && !self.terms_accepted)
    }

    /// Answers already given for `step`, used to prefill it on return
    pub fn answers_for(&self, step: usize) -> Option<&Value> {
        self.answers.get(step)?.as_ref().map(|a| &a.data)
    }

    pub fn window(&self) -> StepWindow {
        self.template.window(self.current, self.last)
    }

    /// Validate the current section and move on, or finish on the last one
    pub fn next(&mut self, values: &Value, persisted: &Value) -> Result<Progress, ProgressError> {
        if self.read_only {
            if self.is_last() {
                return Err(ProgressError::ReadOnlyEnd);
            }
            self.go_to(self.current + 1);
            return Ok(Progress::Advanced(self.current));
        }

        if !self.can_advance() {
            return Err(ProgressError::TermsNotAccepted);
        }

        let section = &self.sections[self.current];
        let errors = validate_section(
            section.questions(),
            values,
            persisted,
            &self.resolver,
            &mut self.rules,
        );
        if !errors.is_empty() {
            return Err(ProgressError::Invalid(errors));
        }

        self.answers[self.current] = Some(SectionAnswers {
            name: section.name.clone(),
            data: values.clone(),
        });

        if self.is_last() {
            let answers: Vec<SectionAnswers> = self.answers.iter().flatten().cloned().collect();
            info!("Form completed with {} sections", answers.len());
            return Ok(Progress::Completed(answers));
        }

        self.go_to(self.current + 1);
        self.terms_accepted = false;
        Ok(Progress::Advanced(self.current))
    }

    pub fn prev(&mut self) -> usize {
        if self.current > 0 {
            self.go_to(self.current - 1);
        }
        self.current
    }

    /// Pick a step from the step bar (read-only forms only)
    pub fn jump_to(&mut self, step: usize) -> Result<(), ProgressError> {
        if !self.read_only {
            return Err(ProgressError::JumpNotAllowed);
        }
        if step >= self.sections.len() {
            return Err(ProgressError::NoSuchStep {
                index: step,
                len: self.sections.len(),
            });
        }
        self.go_to(step);
        Ok(())
    }

    fn go_to(&mut self, step: usize) {
        self.last = self.current;
        self.current = step;
        self.resolver = DependencyResolver::new(self.sections[step].questions());
        debug!("Moved from step {} to step {}", self.last, self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Question, QuestionType};
    use serde_json::json;

    #[test]
    fn test_short_forms_show_every_step() {
        let template = StepTemplate::new(3, 3);
        assert_eq!(
            template.window(1, 0).slots(),
            &[StepSlot::Step(0), StepSlot::Active(1), StepSlot::Step(2)]
        );

        let wide = StepTemplate::new(5, 5);
        assert_eq!(wide.window(2, 1).slots().len(), 5);
    }

    #[test]
    fn test_long_forms_collapse_around_middle() {
        let template = StepTemplate::new(6, 3);
        assert!(template.is_collapsed());

        let window = template.window(0, 0);
        assert_eq!(
            window.slots(),
            &[StepSlot::Active(0), StepSlot::Ellipsis(2), StepSlot::Step(5)]
        );
        assert_eq!(window.target_of(1), Some(2));
        assert_eq!(window.target_of(3), None);

        let window = template.window(1, 0);
        assert_eq!(
            window.slots(),
            &[
                StepSlot::Step(0),
                StepSlot::Active(1),
                StepSlot::Ellipsis(2),
                StepSlot::Step(5)
            ]
        );

        let window = template.window(3, 2);
        assert_eq!(
            window.slots(),
            &[
                StepSlot::Step(0),
                StepSlot::Ellipsis(2),
                StepSlot::Active(3),
                StepSlot::Step(5)
            ]
        );
    }

    #[test]
    fn test_tiny_limits_keep_first_and_last() {
        let template = StepTemplate::new(2, 1);
        assert!(template.is_collapsed());
        assert_eq!(
            template.window(0, 0).slots(),
            &[StepSlot::Active(0), StepSlot::Step(1)]
        );
        assert_eq!(
            template.window(1, 0).slots(),
            &[StepSlot::Step(0), StepSlot::Active(1)]
        );

        let single = StepTemplate::new(1, 0);
        assert_eq!(single.window(0, 0).slots(), &[StepSlot::Active(0)]);
    }

    fn section(id: u64, name: &str, questions: Vec<Question>) -> Section {
        Section::new(id, name).with_questions(questions)
    }

    fn required_short(id: u64, text: &str) -> Question {
        let mut question = Question::new(id);
        question.set_type(QuestionType::ShortAnswer);
        question.question = text.to_string();
        question.required = true;
        question
    }

    fn terms(id: u64) -> Question {
        let mut question = Question::new(id);
        question.set_type(QuestionType::TermCondition);
        question.set_text("<p>Be nice</p>").unwrap();
        question
    }

    #[test]
    fn test_progress_validates_and_collects() {
        let sections = vec![
            section(1, "About you", vec![required_short(2, "Name")]),
            section(3, "Work", vec![required_short(4, "Company")]),
        ];
        let mut progress = FormProgress::new(sections, &EditorConfig::default()).unwrap();

        let err = progress.next(&json!({}), &json!({})).unwrap_err();
        assert!(matches!(err, ProgressError::Invalid(ref errors) if errors.len() == 1));

        assert_eq!(
            progress.next(&json!({ "Name": "Ada" }), &json!({})).unwrap(),
            Progress::Advanced(1)
        );
        assert_eq!(progress.answers_for(0), Some(&json!({ "Name": "Ada" })));

        assert_eq!(progress.prev(), 0);
        assert_eq!(progress.prev(), 0);
        progress.next(&json!({ "Name": "Ada L." }), &json!({})).unwrap();

        match progress.next(&json!({ "Company": "Engines" }), &json!({})).unwrap() {
            Progress::Completed(answers) => {
                assert_eq!(
                    answers,
                    vec![
                        SectionAnswers {
                            name: "About you".into(),
                            data: json!({ "Name": "Ada L." })
                        },
                        SectionAnswers {
                            name: "Work".into(),
                            data: json!({ "Company": "Engines" })
                        },
                    ]
                );
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_terms_block_until_accepted() {
        let sections = vec![
            section(1, "Terms", vec![terms(2)]),
            section(3, "Next", vec![terms(4)]),
        ];
        let mut progress = FormProgress::new(sections, &EditorConfig::default()).unwrap();

        assert!(!progress.can_advance());
        assert_eq!(
            progress.next(&json!({}), &json!({})),
            Err(ProgressError::TermsNotAccepted)
        );

        progress.accept_terms(true);
        assert_eq!(progress.next(&json!({}), &json!({})).unwrap(), Progress::Advanced(1));
        assert!(!progress.can_advance());
    }

    #[test]
    fn test_read_only_walks_without_validation() {
        let sections = vec![
            section(1, "A", vec![required_short(2, "Name"), terms(3)]),
            section(4, "B", vec![]),
            section(5, "C", vec![]),
        ];
        let mut progress = FormProgress::new(sections.clone(), &EditorConfig::default())
            .unwrap()
            .read_only();

        assert!(progress.can_advance());
        assert_eq!(progress.next(&json!({}), &json!({})).unwrap(), Progress::Advanced(1));
        progress.jump_to(2).unwrap();
        assert_eq!(progress.next(&json!({}), &json!({})), Err(ProgressError::ReadOnlyEnd));
        assert!(matches!(progress.jump_to(7), Err(ProgressError::NoSuchStep { .. })));

        let mut editable = FormProgress::new(sections, &EditorConfig::default()).unwrap();
        assert_eq!(editable.jump_to(1), Err(ProgressError::JumpNotAllowed));
    }

    #[test]
    fn test_empty_form_is_rejected() {
        assert!(matches!(
            FormProgress::new(Vec::new(), &EditorConfig::default()),
            Err(ProgressError::NoSections)
        ));
    }
}
