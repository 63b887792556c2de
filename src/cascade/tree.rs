//! Address-based editing of the cascade option tree
//!
//! Every edit returns a new [`OptionTree`] and leaves the receiver alone.
//! Child lists sit behind `Arc`, so a copy shares all untouched subtrees
//! with its source and only the lists along the edited path are cloned.

use super::address::Address;
use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

type NodeList = Arc<Vec<OptionNode>>;

/// One choice at one cascade level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionNode {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<NodeList>,
}

impl OptionNode {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            children: None,
        }
    }

    /// Node whose value and label are the same text
    pub fn labelled(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    pub fn with_children(mut self, children: Vec<OptionNode>) -> Self {
        self.children = Some(Arc::new(children));
        self
    }

    /// Child nodes; absent and empty read the same
    pub fn children(&self) -> &[OptionNode] {
        self.children.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the child list exists at all, even if empty
    pub fn has_children_list(&self) -> bool {
        self.children.is_some()
    }
}

impl From<&OptionNode> for Value {
    fn from(node: &OptionNode) -> Self {
        let mut map = Map::new();
        map.insert("value".into(), Value::String(node.value.clone()));
        map.insert("label".into(), Value::String(node.label.clone()));
        if let Some(children) = &node.children {
            map.insert(
                "children".into(),
                Value::Array(children.iter().map(Value::from).collect()),
            );
        }
        Value::Object(map)
    }
}

/// Label given to an option nobody has renamed yet
pub fn generated_label(stage: &str, address: &Address) -> String {
    format!("{} option {}", stage, address)
}

/// Top-level list of a cascade; depth 0 is this list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTree {
    nodes: NodeList,
}

impl OptionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<OptionNode>) -> Self {
        Self {
            nodes: Arc::new(nodes),
        }
    }

    pub fn nodes(&self) -> &[OptionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels in use: 0 for an empty tree, 1 for roots only
    pub fn depth(&self) -> usize {
        fn levels(nodes: &[OptionNode]) -> usize {
            if nodes.is_empty() {
                return 0;
            }
            1 + nodes.iter().map(|n| levels(n.children())).max().unwrap_or(0)
        }
        levels(&self.nodes)
    }

    /// Node at `address`, or `None` if any index is out of range
    pub fn get(&self, address: &Address) -> Option<&OptionNode> {
        let (first, rest) = address.indices().split_first()?;
        let mut node = self.nodes.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    /// Append `node` to the list at `address` (the top-level list when empty)
    pub fn insert_child(&self, address: &Address, node: OptionNode) -> Result<Self, AddressError> {
        let mut next = self.clone();
        if address.is_empty() {
            Arc::make_mut(&mut next.nodes).push(node);
        } else {
            let parent = resolve_mut(&mut next.nodes, address)?;
            let children = parent.children.get_or_insert_with(Default::default);
            Arc::make_mut(children).push(node);
        }
        log::debug!("Inserted cascade option under [{}]", address);
        Ok(next)
    }

    pub fn set_value(
        &self,
        address: &Address,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, AddressError> {
        let mut next = self.clone();
        let node = resolve_mut(&mut next.nodes, address)?;
        node.value = value.into();
        node.label = label.into();
        Ok(next)
    }

    /// Rename an option in place; blank text leaves the tree unchanged
    pub fn rename(&self, address: &Address, text: &str) -> Result<Self, AddressError> {
        let text = text.trim();
        if text.is_empty() {
            self.get(address).ok_or_else(|| AddressError::Unresolved {
                address: address.clone(),
                depth: first_unresolved(self, address),
            })?;
            return Ok(self.clone());
        }
        self.set_value(address, text, text)
    }

    /// Delete the node at `address`
    ///
    /// A parent left without children keeps an empty child list.
    pub fn remove(&self, address: &Address) -> Result<Self, AddressError> {
        let (parent_address, index) = address.split_last().ok_or(AddressError::Empty)?;
        let unresolved = || AddressError::Unresolved {
            address: address.clone(),
            depth: address.len() - 1,
        };

        let mut next = self.clone();
        if parent_address.is_empty() {
            if index >= next.nodes.len() {
                return Err(unresolved());
            }
            Arc::make_mut(&mut next.nodes).remove(index);
        } else {
            let parent = resolve_mut(&mut next.nodes, &parent_address)?;
            let children = parent.children.as_mut().ok_or_else(unresolved)?;
            if index >= children.len() {
                return Err(unresolved());
            }
            Arc::make_mut(children).remove(index);
        }
        log::debug!("Removed cascade option [{}]", address);
        Ok(next)
    }

    /// Drop every child list hanging below depth `max_depth - 1`
    ///
    /// Nodes at depth `max_depth - 1` lose their `children` field
    /// entirely. Called with the stage count left after a stage removal;
    /// a count of zero is treated like one so roots survive.
    pub fn prune_depth(&self, max_depth: usize) -> Self {
        let levels = max_depth.max(1);
        if self.depth() <= levels && !has_children_list_at(&self.nodes, 0, levels - 1) {
            return self.clone();
        }

        fn prune(list: &mut NodeList, depth: usize, cut_at: usize) {
            for node in Arc::make_mut(list).iter_mut() {
                if depth >= cut_at {
                    node.children = None;
                } else if let Some(children) = node.children.as_mut() {
                    prune(children, depth + 1, cut_at);
                }
            }
        }

        let mut next = self.clone();
        prune(&mut next.nodes, 0, levels - 1);
        log::debug!("Pruned cascade tree to {} level(s)", levels);
        next
    }

    /// JSON form of the tree, identical to its serde output
    pub fn to_value(&self) -> Value {
        Value::Array(self.nodes.iter().map(Value::from).collect())
    }

    /// Every node paired with its address, depth first
    pub fn walk(&self) -> Vec<(Address, &OptionNode)> {
        fn visit<'a>(
            nodes: &'a [OptionNode],
            address: &Address,
            out: &mut Vec<(Address, &'a OptionNode)>,
        ) {
            for (index, node) in nodes.iter().enumerate() {
                let here = address.child(index);
                visit(node.children(), &here, out);
                out.push((here, node));
            }
        }

        let mut out = Vec::new();
        visit(&self.nodes, &Address::root(), &mut out);
        out.sort_by(|a, b| a.0.indices().cmp(b.0.indices()));
        out
    }
}

fn resolve_mut<'a>(
    list: &'a mut NodeList,
    address: &Address,
) -> Result<&'a mut OptionNode, AddressError> {
    let unresolved = |depth| AddressError::Unresolved {
        address: address.clone(),
        depth,
    };
    let (first, rest) = address.indices().split_first().ok_or(AddressError::Empty)?;

    let mut node = Arc::make_mut(list)
        .get_mut(*first)
        .ok_or_else(|| unresolved(0))?;
    for (offset, index) in rest.iter().enumerate() {
        let children = node.children.as_mut().ok_or_else(|| unresolved(offset + 1))?;
        node = Arc::make_mut(children)
            .get_mut(*index)
            .ok_or_else(|| unresolved(offset + 1))?;
    }
    Ok(node)
}

fn first_unresolved(tree: &OptionTree, address: &Address) -> usize {
    let mut nodes = tree.nodes();
    for (depth, index) in address.indices().iter().enumerate() {
        match nodes.get(*index) {
            Some(node) => nodes = node.children(),
            None => return depth,
        }
    }
    address.len()
}

fn has_children_list_at(nodes: &[OptionNode], depth: usize, target: usize) -> bool {
    nodes.iter().any(|node| {
        if depth == target {
            node.has_children_list()
        } else {
            has_children_list_at(node.children(), depth + 1, target)
        }
    })
}
