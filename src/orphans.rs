use std::collections::HashMap;

use tracing::debug;

use crate::ast::Diagram;
use crate::layout::{Heading, Placement, Traversal};

/// Headings for every node the traversal never reached, in extraction order.
///
/// An orphan sharing its color with placed nodes takes the shallowest depth
/// seen for that color; any other orphan goes to depth 1.
pub fn reconcile(diagram: &Diagram, traversal: &Traversal) -> Vec<Heading> {
    let mut color_depths: HashMap<&str, usize> = HashMap::new();
    for heading in &traversal.headings {
        if let Some(color) = diagram.node(heading.node).color.as_deref() {
            color_depths
                .entry(color)
                .and_modify(|d| *d = (*d).min(heading.depth))
                .or_insert(heading.depth);
        }
    }

    diagram
        .nodes
        .iter()
        .filter(|node| traversal.depth(node.id).is_none())
        .map(|node| {
            let depth = node
                .color
                .as_deref()
                .and_then(|color| color_depths.get(color).copied())
                .unwrap_or(1);
            debug!(name = %node.name, depth, "placing orphan");
            Heading {
                node: node.id,
                depth,
                placement: Placement::Orphan,
            }
        })
        .collect()
}
