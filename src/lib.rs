//! Schema mutation engine for dynamic, multi-section forms
//!
//! A [`Form`] is an ordered list of sections holding questions. Edits go
//! through the form so derived state (the form title, `withCondition`,
//! container ids after reorders) stays consistent. Cascade questions carry
//! an option tree that is edited by [`cascade::Address`] and shares
//! structure between snapshots.

pub mod association;
pub mod cascade;
pub mod clipboard;
pub mod config;
pub mod dependency;
pub mod error;
pub mod ids;
pub mod media;
pub mod persistence;
pub mod reorder;
pub mod schema;
pub mod steps;
pub mod validation;

pub use association::{AssociationGroup, AssociationIndex};
pub use cascade::{Address, OptionNode, OptionTree, StageManager};
pub use clipboard::{Clipboard, ClipboardStore, MemoryClipboard};
pub use config::EditorConfig;
pub use dependency::DependencyResolver;
pub use error::{
    AddressError, ClipboardError, ProgressError, ReorderError, SchemaError, StageError,
    ValidationError,
};
pub use ids::{Clock, ClockIds, IdGenerator, ManualClock, SequentialIds, SystemClock};
pub use persistence::{AutoSaver, SaveSink, SaveStatus};
pub use schema::{
    DragOutcome, DropLocation, DropTarget, Form, OptionLeaf, Question, QuestionKind,
    QuestionType, Section,
};
pub use steps::{FormProgress, Progress, StepTemplate};
