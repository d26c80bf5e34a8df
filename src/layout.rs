use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::ast::NodeId;
use crate::matcher::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Reached from the root.
    Tree,
    /// Appended after the tree with a guessed depth.
    Orphan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub node: NodeId,
    pub depth: usize,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisitKind {
    /// The child is an ancestor of the parent.
    Cycle,
    /// The child was already placed under another branch.
    SharedChild,
}

/// An edge whose child had already been visited. The child is not printed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revisit {
    pub parent: NodeId,
    pub child: NodeId,
    pub kind: RevisitKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traversal {
    pub headings: Vec<Heading>,
    pub depths: HashMap<NodeId, usize>,
    pub revisits: Vec<Revisit>,
}

impl Traversal {
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.depths.get(&id).copied()
    }
}

enum Step {
    Enter {
        node: NodeId,
        parent: Option<NodeId>,
        depth: usize,
    },
    Leave(NodeId),
}

/// Pre-order walk from `root` at depth 1. Each node is placed once, at its
/// first visit; later edges into it are recorded as revisits.
pub fn traverse(tree: &Tree, root: NodeId) -> Traversal {
    let mut traversal = Traversal::default();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![Step::Enter {
        node: root,
        parent: None,
        depth: 1,
    }];

    while let Some(step) = stack.pop() {
        let (node, parent, depth) = match step {
            Step::Leave(node) => {
                on_path.remove(&node);
                continue;
            }
            Step::Enter {
                node,
                parent,
                depth,
            } => (node, parent, depth),
        };

        if traversal.depths.contains_key(&node) {
            if let Some(parent) = parent {
                let kind = if on_path.contains(&node) {
                    RevisitKind::Cycle
                } else {
                    RevisitKind::SharedChild
                };
                warn!(parent = parent.0, child = node.0, ?kind, "node reached twice");
                traversal.revisits.push(Revisit {
                    parent,
                    child: node,
                    kind,
                });
            }
            continue;
        }

        traversal.depths.insert(node, depth);
        traversal.headings.push(Heading {
            node,
            depth,
            placement: Placement::Tree,
        });
        on_path.insert(node);
        stack.push(Step::Leave(node));
        for &child in tree.children(node).iter().rev() {
            stack.push(Step::Enter {
                node: child,
                parent: Some(node),
                depth: depth + 1,
            });
        }
    }

    traversal
}
