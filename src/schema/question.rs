//! Questions and their type-specific payloads
//!
//! In memory a question's options live inside [`QuestionKind`], so a
//! cascader can only ever hold a tree and a dropdown only a flat list. On
//! the wire the flat `{ type, options, stages, multipleMode }` shape is
//! kept; conversion goes through [`QuestionWire`].

use super::types::{OptionLeaf, QuestionType};
use crate::association::{AssociationGroup, AssociationIndex};
use crate::cascade::{OptionTree, StageManager};
use crate::error::SchemaError;
use crate::reorder::reorder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which half of a switch question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSide {
    Checked,
    Unchecked,
}

impl SwitchSide {
    fn index(self) -> usize {
        match self {
            SwitchSide::Checked => 0,
            SwitchSide::Unchecked => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            SwitchSide::Checked => SwitchSide::Unchecked,
            SwitchSide::Unchecked => SwitchSide::Checked,
        }
    }
}

/// Type tag together with the payload that type carries
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<OptionLeaf> },
    Checkboxes { options: Vec<OptionLeaf> },
    Dropdown { options: Vec<OptionLeaf>, multiple_mode: bool },
    Cascader { stages: Vec<String>, tree: OptionTree },
    /// `[checked, unchecked]`
    Switch { options: [OptionLeaf; 2] },
    TermCondition { text: String },
    StaticText { text: String },
    FileUpload { attachments: Vec<String> },
    Camera { attachments: Vec<String> },
    Signature { attachments: Vec<String> },
    ShortAnswer,
    Number,
    DatePicker,
    PhoneNumber,
    Birthday,
    Rating,
}

impl Default for QuestionKind {
    fn default() -> Self {
        QuestionKind::MultipleChoice {
            options: default_options(),
        }
    }
}

fn default_options() -> Vec<OptionLeaf> {
    vec![OptionLeaf::new("Option 1")]
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::Checkboxes { .. } => QuestionType::Checkboxes,
            QuestionKind::Dropdown { .. } => QuestionType::Dropdown,
            QuestionKind::Cascader { .. } => QuestionType::Cascader,
            QuestionKind::Switch { .. } => QuestionType::Switch,
            QuestionKind::TermCondition { .. } => QuestionType::TermCondition,
            QuestionKind::StaticText { .. } => QuestionType::StaticText,
            QuestionKind::FileUpload { .. } => QuestionType::FileUpload,
            QuestionKind::Camera { .. } => QuestionType::Camera,
            QuestionKind::Signature { .. } => QuestionType::Signature,
            QuestionKind::ShortAnswer => QuestionType::ShortAnswer,
            QuestionKind::Number => QuestionType::Number,
            QuestionKind::DatePicker => QuestionType::DatePicker,
            QuestionKind::PhoneNumber => QuestionType::PhoneNumber,
            QuestionKind::Birthday => QuestionType::Birthday,
            QuestionKind::Rating => QuestionType::Rating,
        }
    }

    /// Payload for `ty`, reusing what can be carried over from `self`
    pub fn converted_to(&self, ty: QuestionType) -> QuestionKind {
        if self.question_type() == ty {
            return self.clone();
        }

        let carried = match self {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Checkboxes { options }
            | QuestionKind::Dropdown { options, .. } => options.clone(),
            QuestionKind::Switch { options } => options.to_vec(),
            _ => default_options(),
        };

        match ty {
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice { options: carried },
            QuestionType::Checkboxes => QuestionKind::Checkboxes { options: carried },
            QuestionType::Dropdown => QuestionKind::Dropdown {
                options: carried,
                multiple_mode: false,
            },
            QuestionType::Switch => QuestionKind::Switch {
                options: switch_pair(carried),
            },
            QuestionType::Cascader => QuestionKind::Cascader {
                stages: Vec::new(),
                tree: OptionTree::new(),
            },
            QuestionType::TermCondition => QuestionKind::TermCondition { text: String::new() },
            QuestionType::StaticText => QuestionKind::StaticText { text: String::new() },
            QuestionType::FileUpload => QuestionKind::FileUpload { attachments: Vec::new() },
            QuestionType::Camera => QuestionKind::Camera { attachments: Vec::new() },
            QuestionType::Signature => QuestionKind::Signature { attachments: Vec::new() },
            QuestionType::ShortAnswer => QuestionKind::ShortAnswer,
            QuestionType::Number => QuestionKind::Number,
            QuestionType::DatePicker => QuestionKind::DatePicker,
            QuestionType::PhoneNumber => QuestionKind::PhoneNumber,
            QuestionType::Birthday => QuestionKind::Birthday,
            QuestionType::Rating => QuestionKind::Rating,
        }
    }
}

fn switch_pair(options: Vec<OptionLeaf>) -> [OptionLeaf; 2] {
    let mut options = options.into_iter();
    let checked = options.next().unwrap_or_else(|| OptionLeaf::new(""));
    let unchecked = options.next().unwrap_or_else(|| OptionLeaf::new(""));
    [checked, unchecked]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    pub id: u64,
    pub question: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub unique: bool,
    pub hidden_field: bool,
    /// Name of the switch question that gates this one
    pub depend: Option<String>,
    /// Dotted association name, e.g. `person.email`
    pub name: Option<String>,
    pub show_in_details: bool,
    pub kind: QuestionKind,
}

impl Question {
    /// Fresh multiple-choice question with a single default option
    pub fn new(id: u64) -> Self {
        Self {
            id,
            question: String::new(),
            placeholder: None,
            required: false,
            unique: false,
            hidden_field: false,
            depend: None,
            name: None,
            show_in_details: false,
            kind: QuestionKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: QuestionKind) -> Self {
        self.hidden_field |= kind.question_type().forces_hidden();
        self.kind = kind;
        self
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Key under which answers to this question are stored
    pub fn field_key(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(Some(self.question.as_str()).filter(|q| !q.is_empty()))
    }

    pub fn set_type(&mut self, ty: QuestionType) {
        self.kind = self.kind.converted_to(ty);
        if ty.forces_hidden() {
            self.hidden_field = true;
        }
    }

    /// Unique answers imply a required answer
    pub fn set_unique(&mut self, unique: bool) {
        self.unique = unique;
        if unique {
            self.required = true;
        }
    }

    pub fn required_editable(&self) -> bool {
        !(self.unique || self.question_type() == QuestionType::TermCondition)
    }

    pub fn set_required(&mut self, required: bool) -> Result<(), SchemaError> {
        if !self.required_editable() {
            return Err(SchemaError::RequiredLocked(self.question_type().to_string()));
        }
        self.required = required;
        Ok(())
    }

    pub fn set_depend(&mut self, depend: Option<&str>) {
        self.depend = depend.filter(|d| !d.is_empty()).map(str::to_string);
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.filter(|n| !n.is_empty()).map(str::to_string);
    }

    /// Flat option list, including both switch states
    pub fn options(&self) -> Option<&[OptionLeaf]> {
        match &self.kind {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Checkboxes { options }
            | QuestionKind::Dropdown { options, .. } => Some(options),
            QuestionKind::Switch { options } => Some(options),
            _ => None,
        }
    }

    fn option_list_mut(&mut self) -> Result<&mut Vec<OptionLeaf>, SchemaError> {
        let ty = self.question_type();
        match &mut self.kind {
            QuestionKind::MultipleChoice { options }
            | QuestionKind::Checkboxes { options }
            | QuestionKind::Dropdown { options, .. } => Ok(options),
            _ => Err(SchemaError::WrongKind(ty.to_string())),
        }
    }

    fn option_mut(&mut self, index: usize) -> Result<&mut OptionLeaf, SchemaError> {
        let options = self.option_list_mut()?;
        let len = options.len();
        options
            .get_mut(index)
            .ok_or(SchemaError::NoSuchOption { index, len })
    }

    /// Append an empty, valid option
    pub fn add_option(&mut self) -> Result<usize, SchemaError> {
        let options = self.option_list_mut()?;
        options.push(OptionLeaf::new(""));
        Ok(options.len() - 1)
    }

    pub fn remove_option(&mut self, index: usize) -> Result<OptionLeaf, SchemaError> {
        let options = self.option_list_mut()?;
        if index >= options.len() {
            return Err(SchemaError::NoSuchOption {
                index,
                len: options.len(),
            });
        }
        Ok(options.remove(index))
    }

    pub fn set_option_value(&mut self, index: usize, value: &str) -> Result<(), SchemaError> {
        self.option_mut(index)?.value = value.trim().to_string();
        Ok(())
    }

    /// Toggle validity; a lone option must stay selectable
    pub fn set_option_validity(&mut self, index: usize, valid: bool) -> Result<(), SchemaError> {
        if self.option_list_mut()?.len() <= 1 {
            return Err(SchemaError::SingleOption);
        }
        self.option_mut(index)?.valid_option = valid;
        Ok(())
    }

    pub fn set_valid_message(&mut self, index: usize, message: &str) -> Result<(), SchemaError> {
        self.option_mut(index)?.valid_message = Some(message.trim().to_string());
        Ok(())
    }

    pub fn reorder_options(&mut self, from: usize, to: usize) -> Result<(), SchemaError> {
        let options = self.option_list_mut()?;
        *options = reorder(options, from, to)?;
        Ok(())
    }

    fn switch_mut(&mut self) -> Result<&mut [OptionLeaf; 2], SchemaError> {
        let ty = self.question_type();
        match &mut self.kind {
            QuestionKind::Switch { options } => Ok(options),
            _ => Err(SchemaError::WrongKind(ty.to_string())),
        }
    }

    pub fn set_switch_label(&mut self, side: SwitchSide, label: &str) -> Result<(), SchemaError> {
        self.switch_mut()?[side.index()].value = label.trim().to_string();
        Ok(())
    }

    /// At most one switch state may be marked invalid
    pub fn set_switch_validity(&mut self, side: SwitchSide, valid: bool) -> Result<(), SchemaError> {
        let options = self.switch_mut()?;
        if !valid && !options[side.other().index()].valid_option {
            return Err(SchemaError::BothSwitchStatesInvalid);
        }
        options[side.index()].valid_option = valid;
        Ok(())
    }

    pub fn set_switch_message(&mut self, side: SwitchSide, message: &str) -> Result<(), SchemaError> {
        self.switch_mut()?[side.index()].valid_message = Some(message.trim().to_string());
        Ok(())
    }

    /// Whether the validity toggle of `side` may be switched off
    pub fn switch_toggle_enabled(&self, side: SwitchSide) -> bool {
        match &self.kind {
            QuestionKind::Switch { options } => options[side.other().index()].valid_option,
            _ => false,
        }
    }

    pub fn set_multiple_mode(&mut self, enabled: bool) -> Result<(), SchemaError> {
        match &mut self.kind {
            QuestionKind::Dropdown { multiple_mode, .. } => {
                *multiple_mode = enabled;
                Ok(())
            }
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    pub fn set_text(&mut self, html: &str) -> Result<(), SchemaError> {
        match &mut self.kind {
            QuestionKind::TermCondition { text } | QuestionKind::StaticText { text } => {
                *text = html.to_string();
                Ok(())
            }
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    pub fn attachments(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::FileUpload { attachments }
            | QuestionKind::Camera { attachments }
            | QuestionKind::Signature { attachments } => Some(attachments),
            _ => None,
        }
    }

    pub fn attachments_mut(&mut self) -> Result<&mut Vec<String>, SchemaError> {
        match &mut self.kind {
            QuestionKind::FileUpload { attachments }
            | QuestionKind::Camera { attachments }
            | QuestionKind::Signature { attachments } => Ok(attachments),
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    pub fn stages(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Cascader { stages, .. } => stages,
            _ => &[],
        }
    }

    pub fn cascade_tree(&self) -> Option<&OptionTree> {
        match &self.kind {
            QuestionKind::Cascader { tree, .. } => Some(tree),
            _ => None,
        }
    }

    pub fn set_cascade_tree(&mut self, new_tree: OptionTree) -> Result<(), SchemaError> {
        match &mut self.kind {
            QuestionKind::Cascader { tree, .. } => {
                *tree = new_tree;
                Ok(())
            }
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    /// Working stage slots for the cascade editor
    pub fn stage_manager(&self, expert: bool) -> Result<StageManager, SchemaError> {
        match &self.kind {
            QuestionKind::Cascader { stages, .. } => Ok(StageManager::new(stages, expert)),
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    /// Take over the slots once they are complete; returns whether stages changed
    ///
    /// The tree never stays deeper than the committed stage list, so levels
    /// left over after slots collapse are pruned.
    pub fn commit_stages(&mut self, manager: &StageManager) -> Result<bool, SchemaError> {
        let Some(committed) = manager.committed() else {
            return Ok(false);
        };
        match &mut self.kind {
            QuestionKind::Cascader { stages, tree } => {
                let changed = *stages != committed;
                if tree.depth() > committed.len() {
                    *tree = tree.prune_depth(committed.len());
                }
                *stages = committed;
                Ok(changed)
            }
            other => Err(SchemaError::WrongKind(other.question_type().to_string())),
        }
    }

    /// Remove the last stage and prune the tree to match
    pub fn remove_stage(&mut self, manager: &mut StageManager) -> Result<(), SchemaError> {
        let tree = self
            .cascade_tree()
            .ok_or_else(|| SchemaError::WrongKind(self.question_type().to_string()))?;
        let pruned = manager.remove_stage(tree)?;
        self.set_cascade_tree(pruned)?;
        if let QuestionKind::Cascader { stages, .. } = &mut self.kind {
            stages.truncate(manager.len());
            if let Some(committed) = manager.committed() {
                *stages = committed;
            }
        }
        Ok(())
    }
}

/// Association suggestions for one question, from its sibling questions
pub fn association_for(existing: &[AssociationGroup], siblings: &[Question]) -> AssociationIndex {
    AssociationIndex::build(
        existing,
        siblings.iter().filter_map(|q| q.name.as_deref()),
    )
}

/// Flat persisted shape of a question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWire {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub hidden_field: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub options: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_mode: Option<bool>,
    #[serde(default)]
    pub show_in_details: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn decode<T: serde::de::DeserializeOwned + Default>(
    ty: QuestionType,
    options: Value,
) -> Result<T, String> {
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options)
        .map_err(|e| format!("options do not match question type '{}': {}", ty, e))
}

impl TryFrom<QuestionWire> for Question {
    type Error = String;

    fn try_from(wire: QuestionWire) -> Result<Self, Self::Error> {
        let ty = wire.question_type;
        let list = |options: Value| -> Result<Vec<OptionLeaf>, String> {
            if options.is_null() {
                return Ok(default_options());
            }
            decode(ty, options)
        };

        let kind = match ty {
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                options: list(wire.options)?,
            },
            QuestionType::Checkboxes => QuestionKind::Checkboxes {
                options: list(wire.options)?,
            },
            QuestionType::Dropdown => QuestionKind::Dropdown {
                options: list(wire.options)?,
                multiple_mode: wire.multiple_mode.unwrap_or(false),
            },
            QuestionType::Switch => QuestionKind::Switch {
                options: switch_pair(decode(ty, wire.options)?),
            },
            QuestionType::Cascader => QuestionKind::Cascader {
                stages: wire.stages,
                tree: decode(ty, wire.options)?,
            },
            QuestionType::TermCondition => QuestionKind::TermCondition {
                text: decode(ty, wire.options)?,
            },
            QuestionType::StaticText => QuestionKind::StaticText {
                text: decode(ty, wire.options)?,
            },
            QuestionType::FileUpload => QuestionKind::FileUpload {
                attachments: decode(ty, wire.options)?,
            },
            QuestionType::Camera => QuestionKind::Camera {
                attachments: decode(ty, wire.options)?,
            },
            QuestionType::Signature => QuestionKind::Signature {
                attachments: decode(ty, wire.options)?,
            },
            QuestionType::ShortAnswer => QuestionKind::ShortAnswer,
            QuestionType::Number => QuestionKind::Number,
            QuestionType::DatePicker => QuestionKind::DatePicker,
            QuestionType::PhoneNumber => QuestionKind::PhoneNumber,
            QuestionType::Birthday => QuestionKind::Birthday,
            QuestionType::Rating => QuestionKind::Rating,
        };

        Ok(Question {
            id: wire.id,
            question: wire.question,
            placeholder: non_empty(wire.placeholder),
            required: wire.required,
            unique: wire.unique,
            hidden_field: wire.hidden_field || ty.forces_hidden(),
            depend: non_empty(wire.depend),
            name: non_empty(wire.name),
            show_in_details: wire.show_in_details,
            kind,
        })
    }
}

impl From<Question> for QuestionWire {
    fn from(question: Question) -> Self {
        let question_type = question.question_type();
        let mut stages = Vec::new();
        let mut multiple_mode = None;

        let leaves = |options: &[OptionLeaf]| Value::Array(options.iter().map(Value::from).collect());
        let strings = |items: Vec<String>| Value::Array(items.into_iter().map(Value::String).collect());

        let options = match question.kind {
            QuestionKind::MultipleChoice { options } | QuestionKind::Checkboxes { options } => {
                leaves(&options)
            }
            QuestionKind::Dropdown {
                options,
                multiple_mode: mode,
            } => {
                multiple_mode = Some(mode);
                leaves(&options)
            }
            QuestionKind::Switch { options } => leaves(&options),
            QuestionKind::Cascader { stages: s, tree } => {
                stages = s;
                tree.to_value()
            }
            QuestionKind::TermCondition { text } | QuestionKind::StaticText { text } => {
                Value::String(text)
            }
            QuestionKind::FileUpload { attachments }
            | QuestionKind::Camera { attachments }
            | QuestionKind::Signature { attachments } => strings(attachments),
            QuestionKind::ShortAnswer
            | QuestionKind::Number
            | QuestionKind::DatePicker
            | QuestionKind::PhoneNumber
            | QuestionKind::Birthday
            | QuestionKind::Rating => Value::Array(Vec::new()),
        };

        QuestionWire {
            id: question.id,
            question_type,
            question: question.question,
            placeholder: question.placeholder,
            required: question.required,
            unique: question.unique,
            hidden_field: question.hidden_field,
            depend: question.depend,
            name: question.name,
            stages,
            options,
            multiple_mode,
            show_in_details: question.show_in_details,
        }
    }
}
