//! List reordering used by drag and drop
//!
//! The same two moves serve options within a question, questions within a
//! section and questions across sections.

use crate::error::ReorderError;

/// Move the element at `from` so it ends up at `to`
///
/// Both indices must lie in `0..list.len()`; nothing is clamped.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Result<Vec<T>, ReorderError> {
    let len = list.len();
    if from >= len {
        return Err(ReorderError::Source { index: from, len });
    }
    if to >= len {
        return Err(ReorderError::Destination { index: to, len });
    }

    let mut result = list.to_vec();
    let moved = result.remove(from);
    result.insert(to, moved);
    Ok(result)
}

/// Move an element from one list into another
///
/// `to` may equal `dest.len()` to append, so an empty destination can
/// receive an element. Same-list moves belong to [`reorder`].
pub fn move_between<T: Clone>(
    source: &[T],
    dest: &[T],
    from: usize,
    to: usize,
) -> Result<(Vec<T>, Vec<T>), ReorderError> {
    if from >= source.len() {
        return Err(ReorderError::Source {
            index: from,
            len: source.len(),
        });
    }
    if to > dest.len() {
        return Err(ReorderError::Destination {
            index: to,
            len: dest.len(),
        });
    }

    let mut source = source.to_vec();
    let mut dest = dest.to_vec();
    let moved = source.remove(from);
    dest.insert(to, moved);
    Ok((source, dest))
}
