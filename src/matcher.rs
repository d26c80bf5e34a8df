use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::ast::*;

/// Which point of a node a connector endpoint is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AnchorMode {
    /// The node's translate position, for both ends of a connector.
    #[default]
    Origin,
    /// Right-edge midpoint for a connector's start, left-edge midpoint for its end.
    Edges,
}

/// Parent to children mapping, children in connector order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub edges: Vec<Edge>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl Tree {
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for edge in &edges {
            children.entry(edge.parent).or_default().push(edge.child);
        }
        Self { edges, children }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents(&self) -> BTreeSet<NodeId> {
        self.edges.iter().map(|e| e.parent).collect()
    }

    pub fn child_set(&self) -> BTreeSet<NodeId> {
        self.edges.iter().map(|e| e.child).collect()
    }
}

/// Which connector ends an anchor index is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    Both,
    Start,
    End,
}

/// A node whose anchor coordinate was taken over by a later node.
/// The hidden node can no longer be matched at the ends named by `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadowed {
    pub hidden: NodeId,
    pub by: NodeId,
    pub side: AnchorSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matching {
    pub tree: Tree,
    pub shadowed: Vec<Shadowed>,
}

struct AnchorIndex {
    entries: Vec<(Point, NodeId)>,
}

impl AnchorIndex {
    fn build(
        nodes: &[Node],
        anchor: fn(&Node) -> Point,
        side: AnchorSide,
        shadowed: &mut Vec<Shadowed>,
    ) -> Self {
        let mut entries: Vec<(Point, NodeId)> = Vec::with_capacity(nodes.len());
        let mut slots: HashMap<(u64, u64), usize> = HashMap::new();
        for node in nodes {
            let point = anchor(node);
            // + 0.0 folds -0.0 into 0.0
            let key = ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits());
            match slots.get(&key) {
                Some(&slot) => {
                    let hidden = entries[slot].1;
                    warn!(
                        hidden = hidden.0,
                        by = node.id.0,
                        ?side,
                        x = point.x,
                        y = point.y,
                        "two nodes share an anchor coordinate, keeping the later one"
                    );
                    let entry = Shadowed {
                        hidden,
                        by: node.id,
                        side,
                    };
                    if !shadowed.contains(&entry) {
                        shadowed.push(entry);
                    }
                    entries[slot].1 = node.id;
                }
                None => {
                    slots.insert(key, entries.len());
                    entries.push((point, node.id));
                }
            }
        }
        Self { entries }
    }

    /// Closest anchor by Manhattan distance; ties go to the earliest node.
    fn nearest(&self, target: Point) -> Option<NodeId> {
        self.entries
            .iter()
            .min_by(|(a, a_id), (b, b_id)| {
                a.manhattan(&target)
                    .total_cmp(&b.manhattan(&target))
                    .then(a_id.cmp(b_id))
            })
            .map(|(_, id)| *id)
    }
}

pub fn match_edges(diagram: &Diagram, mode: AnchorMode) -> Matching {
    let mut shadowed = Vec::new();
    let (starts, ends) = match mode {
        AnchorMode::Origin => {
            let index =
                AnchorIndex::build(&diagram.nodes, |n| n.anchor, AnchorSide::Both, &mut shadowed);
            (index, None)
        }
        AnchorMode::Edges => {
            let starts = AnchorIndex::build(
                &diagram.nodes,
                Node::right_edge,
                AnchorSide::Start,
                &mut shadowed,
            );
            let ends = AnchorIndex::build(
                &diagram.nodes,
                Node::left_edge,
                AnchorSide::End,
                &mut shadowed,
            );
            (starts, Some(ends))
        }
    };
    let ends = ends.as_ref().unwrap_or(&starts);

    let mut edges = Vec::with_capacity(diagram.connectors.len());
    for connector in &diagram.connectors {
        let (Some(parent), Some(child)) = (starts.nearest(connector.start), ends.nearest(connector.end))
        else {
            continue;
        };
        debug!(
            parent = %diagram.name(parent),
            child = %diagram.name(child),
            "matched connector"
        );
        edges.push(Edge { parent, child });
    }

    Matching {
        tree: Tree::from_edges(edges),
        shadowed,
    }
}
