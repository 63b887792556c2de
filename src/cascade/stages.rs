//! Stage slots of a cascade question
//!
//! A stage names one level of the option tree. While the user is picking
//! stages some slots may still be empty; the question only sees the stage
//! list once every slot holds a label.

use super::address::Address;
use super::tree::{OptionNode, OptionTree, generated_label};
use crate::association::group_of;
use crate::error::{AddressError, StageError};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageManager {
    slots: Vec<Option<String>>,
    /// Association group every stage must come from (non-expert mode)
    group: Option<String>,
    expert: bool,
}

impl StageManager {
    pub fn new(stages: &[String], expert: bool) -> Self {
        let group = stages.first().map(|s| group_of(s).to_string());
        let mut manager = Self {
            slots: stages.iter().cloned().map(Some).collect(),
            group,
            expert,
        };
        manager.dedup();
        manager
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Stage labels, but only once no slot is left empty
    pub fn committed(&self) -> Option<Vec<String>> {
        self.slots.iter().cloned().collect()
    }

    /// Append an empty slot (collapses into an existing empty slot)
    pub fn add_stage(&mut self) {
        self.slots.push(None);
        self.dedup();
    }

    /// Fill or clear slot `index`
    pub fn select(&mut self, index: usize, label: Option<&str>) -> Result<(), StageError> {
        if index >= self.slots.len() {
            return Err(StageError::NoSuchSlot {
                index,
                len: self.slots.len(),
            });
        }

        match label.map(str::trim).filter(|l| !l.is_empty()) {
            None => {
                self.slots[index] = None;
                self.release_group();
            }
            Some(label) => {
                let chosen = group_of(label);
                if !self.expert {
                    if let Some(expected) = self.group.as_deref() {
                        let others_filled = self
                            .slots
                            .iter()
                            .enumerate()
                            .any(|(i, slot)| i != index && slot.is_some());
                        if expected != chosen && others_filled {
                            return Err(StageError::GroupMismatch {
                                label: label.to_string(),
                                expected: expected.to_string(),
                                found: chosen.to_string(),
                            });
                        }
                    }
                }
                self.group = Some(chosen.to_string());
                self.slots[index] = Some(label.to_string());
            }
        }

        self.dedup();
        log::debug!("Stage slots now {:?}", self.slots);
        Ok(())
    }

    /// Drop the last stage and cut the tree down to the remaining levels
    pub fn remove_stage(&mut self, tree: &OptionTree) -> Result<OptionTree, StageError> {
        if self.slots.pop().is_none() {
            return Err(StageError::NothingToRemove);
        }
        self.release_group();
        Ok(tree.prune_depth(self.slots.len()))
    }

    /// Whether the option tree can be edited with the current slots
    pub fn options_editable(&self) -> bool {
        if !self.slots.iter().any(Option::is_some) {
            return false;
        }
        if self.expert {
            return true;
        }
        match self.group.as_deref() {
            Some(group) => self
                .slots
                .iter()
                .all(|slot| slot.as_deref().is_some_and(|s| group_of(s) == group)),
            None => false,
        }
    }

    pub fn stage_for_depth(&self, depth: usize) -> Result<&str, StageError> {
        self.slots
            .get(depth)
            .and_then(|slot| slot.as_deref())
            .ok_or(StageError::NoStageForDepth { depth })
    }

    /// Add an auto-labelled option under `address`
    ///
    /// The label comes from the stage governing the new node's depth and
    /// the node's own address.
    pub fn add_generated_option(
        &self,
        tree: &OptionTree,
        address: &Address,
    ) -> Result<OptionTree, StageError> {
        let stage = self.stage_for_depth(address.len())?;
        let index = if address.is_empty() {
            tree.len()
        } else {
            tree.get(address)
                .ok_or_else(|| AddressError::Unresolved {
                    address: address.clone(),
                    depth: address.len() - 1,
                })?
                .children()
                .len()
        };

        let label = generated_label(stage, &address.child(index));
        Ok(tree.insert_child(address, OptionNode::labelled(label))?)
    }

    fn release_group(&mut self) {
        let still_used = match self.group.as_deref() {
            Some(group) => self
                .slots
                .iter()
                .flatten()
                .any(|s| group_of(s) == group),
            None => return,
        };
        if !still_used {
            self.group = None;
        }
    }

    fn dedup(&mut self) {
        let mut seen: Vec<Option<String>> = Vec::with_capacity(self.slots.len());
        for slot in self.slots.drain(..) {
            if !seen.contains(&slot) {
                seen.push(slot);
            }
        }
        self.slots = seen;
    }
}
