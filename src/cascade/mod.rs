//! Cascade option trees
//!
//! A cascader question offers one drill-down level per stage. This module
//! holds the tree itself, the addresses used to reach into it and the
//! stage bookkeeping that keeps tree depth in line with the stage count.

pub mod address;
pub mod stages;
pub mod tree;

pub use address::Address;
pub use stages::StageManager;
pub use tree::{OptionNode, OptionTree, generated_label};
