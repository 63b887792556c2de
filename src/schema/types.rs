//! Question types and flat answer options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Message shown for an invalid option that has none of its own
pub const DEFAULT_INVALID_MESSAGE: &str = "not valid";

/// Closed set of question types, in their wire spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Checkboxes,
    Dropdown,
    Cascader,
    Switch,
    TermCondition,
    FileUpload,
    StaticText,
    ShortAnswer,
    Number,
    DatePicker,
    PhoneNumber,
    Birthday,
    Camera,
    Signature,
    Rating,
}

impl QuestionType {
    pub const ALL: [QuestionType; 16] = [
        QuestionType::MultipleChoice,
        QuestionType::Checkboxes,
        QuestionType::Dropdown,
        QuestionType::Cascader,
        QuestionType::Switch,
        QuestionType::TermCondition,
        QuestionType::FileUpload,
        QuestionType::StaticText,
        QuestionType::ShortAnswer,
        QuestionType::Number,
        QuestionType::DatePicker,
        QuestionType::PhoneNumber,
        QuestionType::Birthday,
        QuestionType::Camera,
        QuestionType::Signature,
        QuestionType::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Checkboxes => "checkboxes",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Cascader => "cascader",
            QuestionType::Switch => "switch",
            QuestionType::TermCondition => "term-condition",
            QuestionType::FileUpload => "file-upload",
            QuestionType::StaticText => "static-text",
            QuestionType::ShortAnswer => "short-answer",
            QuestionType::Number => "number",
            QuestionType::DatePicker => "date-picker",
            QuestionType::PhoneNumber => "phone-number",
            QuestionType::Birthday => "birthday",
            QuestionType::Camera => "camera",
            QuestionType::Signature => "signature",
            QuestionType::Rating => "rating",
        }
    }

    /// Options are a flat list of [`OptionLeaf`] the user picks from
    pub fn has_option_list(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkboxes | QuestionType::Dropdown
        )
    }

    /// Options hold rich text rather than choices
    pub fn is_text_content(&self) -> bool {
        matches!(self, QuestionType::StaticText | QuestionType::TermCondition)
    }

    /// Options hold uploaded media sources
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            QuestionType::FileUpload | QuestionType::Camera | QuestionType::Signature
        )
    }

    /// Captured in the background and hidden from the rendered form
    pub fn forces_hidden(&self) -> bool {
        matches!(self, QuestionType::Camera | QuestionType::Signature)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal answer option with its validity rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LeafRepr")]
pub struct OptionLeaf {
    pub value: String,
    pub valid_option: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_message: Option<String>,
}

impl OptionLeaf {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            valid_option: true,
            valid_message: None,
        }
    }

    pub fn invalid(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            valid_option: false,
            valid_message: Some(message.into()),
        }
    }

    /// Error surfaced when this option is submitted while invalid
    pub fn invalid_message(&self) -> &str {
        self.valid_message.as_deref().unwrap_or(DEFAULT_INVALID_MESSAGE)
    }
}

impl From<&OptionLeaf> for Value {
    fn from(leaf: &OptionLeaf) -> Self {
        let mut map = Map::new();
        map.insert("value".into(), Value::String(leaf.value.clone()));
        map.insert("validOption".into(), Value::Bool(leaf.valid_option));
        if let Some(message) = &leaf.valid_message {
            map.insert("validMessage".into(), Value::String(message.clone()));
        }
        Value::Object(map)
    }
}

/// Stored options are sometimes bare strings
#[derive(Deserialize)]
#[serde(untagged)]
enum LeafRepr {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Full {
        #[serde(default)]
        value: String,
        #[serde(default = "default_true")]
        valid_option: bool,
        #[serde(default)]
        valid_message: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl From<LeafRepr> for OptionLeaf {
    fn from(repr: LeafRepr) -> Self {
        match repr {
            LeafRepr::Plain(value) => OptionLeaf::new(value),
            LeafRepr::Full {
                value,
                valid_option,
                valid_message,
            } => OptionLeaf {
                value,
                valid_option,
                valid_message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_question_type_wire_names() {
        for ty in QuestionType::ALL {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json, json!(ty.as_str()));
            let back: QuestionType = serde_json::from_value(json).unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn test_leaf_accepts_plain_strings_and_defaults() {
        let leaves: Vec<OptionLeaf> = serde_json::from_value(json!([
            "Yes",
            { "value": "No" },
            { "value": "Maybe", "validOption": false, "validMessage": "pick one" }
        ]))
        .unwrap();

        assert_eq!(leaves[0], OptionLeaf::new("Yes"));
        assert!(leaves[1].valid_option);
        assert_eq!(leaves[1].invalid_message(), DEFAULT_INVALID_MESSAGE);
        assert_eq!(leaves[2], OptionLeaf::invalid("Maybe", "pick one"));
    }

    #[test]
    fn test_leaf_serializes_camel_case() {
        let json = serde_json::to_value(OptionLeaf::new("A")).unwrap();
        assert_eq!(json, json!({ "value": "A", "validOption": true }));
    }
}
