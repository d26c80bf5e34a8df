use tracing::{debug, warn};

use crate::ast::{Diagram, NodeId};
use crate::error::Error;
use crate::matcher::Tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    pub root: NodeId,
    /// Other parents that are nobody's child. Their subtrees are not walked.
    pub ignored_roots: Vec<NodeId>,
}

/// Pick the outline root: the earliest node that has children but no parent,
/// or the first extracted node when every parent is also a child.
pub fn resolve(diagram: &Diagram, tree: &Tree) -> Result<Forest, Error> {
    let first = diagram.nodes.first().ok_or(Error::EmptyDiagram)?.id;

    let children = tree.child_set();
    let mut candidates = tree.parents().into_iter().filter(|p| !children.contains(p));

    let Some(root) = candidates.next() else {
        debug!(root = %diagram.name(first), "no parent without a parent, using first node as root");
        return Ok(Forest {
            root: first,
            ignored_roots: Vec::new(),
        });
    };

    let ignored_roots: Vec<NodeId> = candidates.collect();
    if !ignored_roots.is_empty() {
        warn!(
            root = %diagram.name(root),
            ignored = ignored_roots.len(),
            "diagram has several roots, only the first is walked"
        );
    }
    Ok(Forest {
        root,
        ignored_roots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Edge, Node, Point};
    use pretty_assertions::assert_eq;

    fn diagram(count: usize) -> Diagram {
        Diagram {
            nodes: (0..count)
                .map(|i| Node {
                    id: NodeId(i),
                    name: format!("N{i}"),
                    anchor: Point::new(i as f64 * 10.0, 0.0),
                    size: None,
                    color: None,
                })
                .collect(),
            connectors: Vec::new(),
            ..Diagram::default()
        }
    }

    fn tree(pairs: &[(usize, usize)]) -> Tree {
        Tree::from_edges(
            pairs
                .iter()
                .map(|&(p, c)| Edge {
                    parent: NodeId(p),
                    child: NodeId(c),
                })
                .collect(),
        )
    }

    #[test]
    fn resolve_single_root() {
        let forest = resolve(&diagram(3), &tree(&[(1, 0), (0, 2)])).unwrap();
        assert_eq!(forest.root, NodeId(1));
        assert!(forest.ignored_roots.is_empty());
    }

    #[test]
    fn resolve_isolated_nodes_are_not_roots() {
        // N0 has no edges at all; the root must come from the edge set.
        let forest = resolve(&diagram(3), &tree(&[(2, 1)])).unwrap();
        assert_eq!(forest.root, NodeId(2));
    }

    #[test]
    fn resolve_several_roots_picks_earliest() {
        let forest = resolve(&diagram(4), &tree(&[(3, 2), (1, 0)])).unwrap();
        assert_eq!(forest.root, NodeId(1));
        assert_eq!(forest.ignored_roots, vec![NodeId(3)]);
    }

    #[test]
    fn resolve_no_edges_falls_back_to_first_node() {
        let forest = resolve(&diagram(2), &tree(&[])).unwrap();
        assert_eq!(forest.root, NodeId(0));
    }

    #[test]
    fn resolve_cycle_falls_back_to_first_node() {
        let forest = resolve(&diagram(3), &tree(&[(1, 2), (2, 1)])).unwrap();
        assert_eq!(forest.root, NodeId(0));
    }

    #[test]
    fn resolve_empty_diagram_is_an_error() {
        let err = resolve(&diagram(0), &tree(&[])).unwrap_err();
        assert!(matches!(err, Error::EmptyDiagram));
    }
}
