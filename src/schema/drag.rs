//! Drag-and-drop results routed to the form

/// The list a drag started in or was dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Options of one question
    Options { section: usize, question: usize },
    /// Questions of one section
    Questions { section: usize },
}

impl DropTarget {
    pub fn section(&self) -> usize {
        match self {
            DropTarget::Options { section, .. } | DropTarget::Questions { section } => *section,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub target: DropTarget,
    pub index: usize,
}

impl DropLocation {
    pub fn new(target: DropTarget, index: usize) -> Self {
        Self { target, index }
    }
}

/// Finished drag; `destination` is `None` when dropped outside any list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOutcome {
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

impl DragOutcome {
    pub fn new(source: DropLocation, destination: Option<DropLocation>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// What a drag should do to the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragAction {
    ReorderOptions {
        section: usize,
        question: usize,
        from: usize,
        to: usize,
    },
    ReorderQuestions {
        section: usize,
        from: usize,
        to: usize,
    },
    MoveQuestion {
        from_section: usize,
        from: usize,
        to_section: usize,
        to: usize,
    },
}

impl DragOutcome {
    /// Classify the drag by where it started and landed
    pub(crate) fn action(&self) -> Option<DragAction> {
        let destination = self.destination?;
        let from = self.source.index;
        let to = destination.index;

        Some(match (self.source.target, destination.target) {
            (DropTarget::Options { section, question }, _) => DragAction::ReorderOptions {
                section,
                question,
                from,
                to,
            },
            (DropTarget::Questions { section }, target) if target.section() == section => {
                DragAction::ReorderQuestions { section, from, to }
            }
            (DropTarget::Questions { section }, target) => DragAction::MoveQuestion {
                from_section: section,
                from,
                to_section: target.section(),
                to,
            },
        })
    }
}
