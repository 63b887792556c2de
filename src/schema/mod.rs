//! Schema document: forms, sections, questions and their options

pub mod drag;
pub mod form;
pub mod question;
pub mod section;
pub mod types;

pub use drag::{DragOutcome, DropLocation, DropTarget};
pub use form::Form;
pub use question::{Question, QuestionKind, QuestionWire, SwitchSide, association_for};
pub use section::Section;
pub use types::{DEFAULT_INVALID_MESSAGE, OptionLeaf, QuestionType};
