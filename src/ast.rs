use std::collections::HashMap;

/// Position of a node in extraction order. This is the real key of a node;
/// labels are display text and may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub anchor: Point,
    /// Width and height of the node's box, when it has a sized `rect`.
    pub size: Option<(f64, f64)>,
    pub color: Option<String>,
}

impl Node {
    /// Midpoint of the left edge, where incoming connectors end.
    pub fn left_edge(&self) -> Point {
        match self.size {
            Some((_, h)) => Point::new(self.anchor.x, self.anchor.y + h / 2.0),
            None => self.anchor,
        }
    }

    /// Midpoint of the right edge, where outgoing connectors start.
    pub fn right_edge(&self) -> Point {
        match self.size {
            Some((w, h)) => Point::new(self.anchor.x + w, self.anchor.y + h / 2.0),
            None => self.anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTransform,
    BadTransform(String),
    MissingLabel,
    TooFewCoordinates(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Index of the element among its kind (node groups or connectors).
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub connectors: Vec<Connector>,
    pub skipped_nodes: Vec<Skipped>,
    pub skipped_connectors: Vec<Skipped>,
    /// Labels seen more than once, in order of first collision.
    pub duplicate_names: Vec<String>,
    /// Label to node. A repeated label points at the node extracted last.
    pub names: HashMap<String, NodeId>,
}

impl Diagram {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Last node extracted with this label.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Append a node and point its label at it.
    pub fn push_node(&mut self, node: Node) {
        self.names.insert(node.name.clone(), node.id);
        self.nodes.push(node);
    }
}
