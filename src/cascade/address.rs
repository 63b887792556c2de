use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of child indices from the top-level list down to a node
///
/// The empty address names the top-level list itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<usize>);

impl Address {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Parent address and the index within the parent's list
    pub fn split_last(&self) -> Option<(Address, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), *last))
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl From<Vec<usize>> for Address {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Address {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Address {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

/// Dot-joined, e.g. `0.2.1`
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_with_dots() {
        assert_eq!(Address::from([0, 2, 1]).to_string(), "0.2.1");
        assert_eq!(Address::root().to_string(), "");
    }

    #[test]
    fn test_child_and_split_last() {
        let address = Address::from([1]).child(3);
        assert_eq!(address.indices(), &[1, 3]);

        let (parent, last) = address.split_last().unwrap();
        assert_eq!(parent, Address::from([1]));
        assert_eq!(last, 3);
        assert!(Address::root().split_last().is_none());
    }
}
