//! Saving the document through a host-provided sink

pub mod logging;
pub mod saver;

pub use saver::{AutoSaver, ErrorNotifier, LogOnly, MemorySink, SaveSink, SaveStatus};
