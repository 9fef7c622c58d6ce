//! Two-phase node selection for edge creation.
//!
//! The first node click arms a node; the second either completes an edge
//! (different node) or disarms (same node).

use px_core::id::NodeId;

/// Selection state: nothing pending, or one node armed as the first endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed(NodeId),
}

/// What a node click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The clicked node is now armed.
    Armed(NodeId),
    /// The armed node was clicked again and released.
    Deselected(NodeId),
    /// A second, different node was clicked: connect `from` to `to`.
    EdgeRequested { from: NodeId, to: NodeId },
}

impl Selection {
    /// Feed a node click through the state machine.
    pub fn click(&mut self, clicked: NodeId) -> SelectionOutcome {
        match *self {
            Selection::Idle => {
                *self = Selection::Armed(clicked);
                SelectionOutcome::Armed(clicked)
            }
            Selection::Armed(armed) if armed == clicked => {
                *self = Selection::Idle;
                SelectionOutcome::Deselected(clicked)
            }
            Selection::Armed(armed) => {
                *self = Selection::Idle;
                SelectionOutcome::EdgeRequested {
                    from: armed,
                    to: clicked,
                }
            }
        }
    }

    pub fn armed(&self) -> Option<NodeId> {
        match self {
            Selection::Idle => None,
            Selection::Armed(id) => Some(*id),
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Selection::Armed(_))
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    /// Drop the selection if it points at `id` (which is being removed).
    /// Returns `true` if the selection was cleared.
    pub fn forget(&mut self, id: NodeId) -> bool {
        if self.armed() == Some(id) {
            self.clear();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (NodeId, NodeId) {
        (NodeId::intern("n1"), NodeId::intern("n2"))
    }

    #[test]
    fn first_click_arms() {
        let (a, _) = ids();
        let mut sel = Selection::Idle;
        assert_eq!(sel.click(a), SelectionOutcome::Armed(a));
        assert_eq!(sel.armed(), Some(a));
    }

    #[test]
    fn self_click_deselects() {
        let (a, _) = ids();
        let mut sel = Selection::Armed(a);
        assert_eq!(sel.click(a), SelectionOutcome::Deselected(a));
        assert_eq!(sel, Selection::Idle);
    }

    #[test]
    fn second_node_requests_edge_in_click_order() {
        let (a, b) = ids();
        let mut sel = Selection::Idle;
        sel.click(b);
        assert_eq!(
            sel.click(a),
            SelectionOutcome::EdgeRequested { from: b, to: a }
        );
        assert!(!sel.is_armed());
    }

    #[test]
    fn forget_only_matching_node() {
        let (a, b) = ids();
        let mut sel = Selection::Armed(a);
        assert!(!sel.forget(b));
        assert!(sel.is_armed());
        assert!(sel.forget(a));
        assert_eq!(sel, Selection::Idle);
    }
}
