//! Typed errors for the schema engine
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures an operation can produce. Collaborator boundaries (saving,
//! uploads, config files) use `anyhow` instead.

use crate::cascade::Address;
use thiserror::Error;

/// An address did not resolve to a node in an option tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The operation needs at least one index
    #[error("address is empty")]
    Empty,

    /// Some segment of the address points past the end of its list
    #[error("address {address} does not resolve (segment {depth} out of range)")]
    Unresolved { address: Address, depth: usize },
}

/// Index out of range for a list reorder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("source index {index} out of range for list of length {len}")]
    Source { index: usize, len: usize },

    #[error("destination index {index} out of range for list of length {len}")]
    Destination { index: usize, len: usize },
}

/// Stage editing failures for cascade questions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("stage slot {index} does not exist ({len} slots)")]
    NoSuchSlot { index: usize, len: usize },

    #[error("stage '{label}' belongs to group '{found}', but this cascade uses '{expected}'")]
    GroupMismatch {
        label: String,
        expected: String,
        found: String,
    },

    #[error("no stage governs depth {depth}")]
    NoStageForDepth { depth: usize },

    #[error("there are no stages to remove")]
    NothingToRemove,

    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Clipboard paste/copy failures, surfaced to the user as warnings
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard entry '{key}' expired {overdue_ms} ms ago, copy again")]
    Expired { key: String, overdue_ms: i64 },

    #[error("nothing to paste")]
    Empty,

    #[error("clipboard entry '{key}' could not be read: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("nothing to copy")]
    NothingToCopy,

    #[error("failed to encode clipboard entry: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Structural edit failures on the schema document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("section {index} does not exist ({len} sections)")]
    NoSuchSection { index: usize, len: usize },

    #[error("question {index} does not exist in section {section} ({len} questions)")]
    NoSuchQuestion {
        section: usize,
        index: usize,
        len: usize,
    },

    /// Raised by a lone [`Section`](crate::schema::Section), which does not know its position
    #[error("question {index} does not exist ({len} questions)")]
    QuestionIndex { index: usize, len: usize },

    #[error("option {index} does not exist ({len} options)")]
    NoSuchOption { index: usize, len: usize },

    #[error("the last remaining section cannot be removed")]
    LastSection,

    #[error("question type '{0}' is not available in this editor")]
    TypeUnavailable(String),

    #[error("'{0}' questions do not carry this kind of options")]
    WrongKind(String),

    #[error("required is fixed for '{0}' questions that are unique or terms")]
    RequiredLocked(String),

    #[error("validity cannot be toggled on a single option")]
    SingleOption,

    #[error("both switch states cannot be invalid at the same time")]
    BothSwitchStatesInvalid,

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// A single failed field at submit time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted field path the error belongs to
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Reasons a multi-step form cannot move on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("the form has no sections")]
    NoSections,

    #[error("terms and conditions must be accepted first")]
    TermsNotAccepted,

    #[error("{} fields failed validation", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("a read-only form cannot be submitted")]
    ReadOnlyEnd,

    #[error("steps can only be picked directly on a read-only form")]
    JumpNotAllowed,

    #[error("step {index} does not exist ({len} steps)")]
    NoSuchStep { index: usize, len: usize },
}
