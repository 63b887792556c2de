//! Copy and paste of form parts with a time-to-live
//!
//! Entries are checked lazily on paste; nothing evicts them in the
//! background.

pub mod codec;
pub mod store;

pub use codec::{Clipboard, ClipboardEntry};
pub use store::{ClipboardStore, MemoryClipboard};
