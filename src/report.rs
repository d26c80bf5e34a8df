use std::fmt;

use crate::ast::Diagram;
use crate::display_width::{max_width, pad_to};
use crate::forest::Forest;
use crate::layout::{Heading, RevisitKind, Traversal};
use crate::matcher::{AnchorSide, Matching};

/// Summary of how much of the diagram the outline recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total: usize,
    pub resolved: usize,
    /// Orphan labels with the depth they were appended at.
    pub orphans: Vec<(String, usize)>,
    pub skipped_nodes: usize,
    pub skipped_connectors: usize,
    pub duplicate_names: Vec<String>,
    /// (hidden, kept) labels of nodes sharing an anchor coordinate, and the
    /// connector ends at which the hidden node can no longer be matched.
    pub shadowed: Vec<(String, String, AnchorSide)>,
    /// (parent, child) labels of edges closing a cycle.
    pub cycles: Vec<(String, String)>,
    /// (parent, child) labels of edges into an already placed node.
    pub shared_children: Vec<(String, String)>,
    pub ignored_roots: Vec<String>,
}

impl Report {
    pub fn build(
        diagram: &Diagram,
        matching: &Matching,
        forest: &Forest,
        traversal: &Traversal,
        orphans: &[Heading],
    ) -> Self {
        let name = |id| diagram.name(id).to_string();
        let revisits = |kind: RevisitKind| -> Vec<(String, String)> {
            traversal
                .revisits
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| (name(r.parent), name(r.child)))
                .collect()
        };

        Self {
            total: diagram.nodes.len(),
            resolved: traversal.headings.len(),
            orphans: orphans.iter().map(|h| (name(h.node), h.depth)).collect(),
            skipped_nodes: diagram.skipped_nodes.len(),
            skipped_connectors: diagram.skipped_connectors.len(),
            duplicate_names: diagram.duplicate_names.clone(),
            shadowed: matching
                .shadowed
                .iter()
                .map(|s| (name(s.hidden), name(s.by), s.side))
                .collect(),
            cycles: revisits(RevisitKind::Cycle),
            shared_children: revisits(RevisitKind::SharedChild),
            ignored_roots: forest.ignored_roots.iter().map(|&id| name(id)).collect(),
        }
    }

    pub fn orphaned(&self) -> usize {
        self.orphans.len()
    }

    /// Percentage of nodes placed by the traversal; 0 for an empty diagram.
    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total nodes:     {}", self.total)?;
        writeln!(f, "Resolved:        {}", self.resolved)?;
        writeln!(f, "Orphaned:        {}", self.orphaned())?;
        write!(f, "Resolution rate: {:.2}%", self.resolution_rate())?;

        if !self.orphans.is_empty() {
            write!(f, "\nOrphaned nodes:")?;
            let width = max_width(self.orphans.iter().map(|(n, _)| n.as_str()));
            for (name, depth) in &self.orphans {
                write!(f, "\n  - {}  (depth {depth})", pad_to(name, width))?;
            }
        }
        if self.skipped_nodes > 0 {
            write!(f, "\nSkipped node groups: {}", self.skipped_nodes)?;
        }
        if self.skipped_connectors > 0 {
            write!(f, "\nSkipped connectors: {}", self.skipped_connectors)?;
        }
        list(f, "Duplicate labels:", self.duplicate_names.iter().cloned())?;
        list(
            f,
            "Shadowed anchors:",
            self.shadowed.iter().map(|(hidden, by, side)| match side {
                AnchorSide::Both => format!("{hidden} (hidden by {by})"),
                AnchorSide::Start => format!("{hidden} (hidden by {by} at connector starts)"),
                AnchorSide::End => format!("{hidden} (hidden by {by} at connector ends)"),
            }),
        )?;
        list(
            f,
            "Cycles:",
            self.cycles.iter().map(|(p, c)| format!("{p} -> {c}")),
        )?;
        list(
            f,
            "Shared children:",
            self.shared_children.iter().map(|(p, c)| format!("{p} -> {c}")),
        )?;
        list(f, "Ignored roots:", self.ignored_roots.iter().cloned())
    }
}

fn list(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    items: impl Iterator<Item = String>,
) -> fmt::Result {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return Ok(());
    }
    write!(f, "\n{title}")?;
    for item in items {
        write!(f, "\n  - {item}")?;
    }
    Ok(())
}
