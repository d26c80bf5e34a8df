use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::ast::*;
use crate::parser::{parse_translate, scan_numbers};

static NODE_GROUP: LazyLock<Selector> = LazyLock::new(|| selector("g.node"));
static NODE_NAME: LazyLock<Selector> = LazyLock::new(|| selector("text.node-name"));
static SHAPE: LazyLock<Selector> =
    LazyLock::new(|| selector("rect, circle, ellipse, polygon, path"));
static RECT: LazyLock<Selector> = LazyLock::new(|| selector("rect"));
static CONNECTOR: LazyLock<Selector> = LazyLock::new(|| selector("path.link"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector must parse")
}

/// Parse an exported mind-map page and extract its nodes and connectors.
pub fn parse_document(input: &str) -> Diagram {
    extract(&Html::parse_document(input))
}

pub fn extract(document: &Html) -> Diagram {
    let mut diagram = Diagram::default();

    for (index, group) in document.select(&NODE_GROUP).enumerate() {
        let node = match extract_node(group, NodeId(diagram.nodes.len())) {
            Ok(node) => node,
            Err(reason) => {
                debug!(index, ?reason, "skipping node group");
                diagram.skipped_nodes.push(Skipped { index, reason });
                continue;
            }
        };
        if let Some(previous) = diagram.lookup(&node.name) {
            warn!(
                name = %node.name,
                previous = previous.0,
                current = node.id.0,
                "duplicate node label, name lookup now resolves to the later node"
            );
            if !diagram.duplicate_names.contains(&node.name) {
                diagram.duplicate_names.push(node.name.clone());
            }
        }
        debug!(
            id = node.id.0,
            name = %node.name,
            x = node.anchor.x,
            y = node.anchor.y,
            color = node.color.as_deref().unwrap_or("-"),
            "extracted node"
        );
        diagram.push_node(node);
    }

    for (index, path) in document.select(&CONNECTOR).enumerate() {
        match extract_connector(path) {
            Ok(connector) => diagram.connectors.push(connector),
            Err(reason) => {
                debug!(index, ?reason, "skipping connector");
                diagram.skipped_connectors.push(Skipped { index, reason });
            }
        }
    }

    diagram
}

fn extract_node(group: ElementRef, id: NodeId) -> Result<Node, SkipReason> {
    let transform = group
        .value()
        .attr("transform")
        .filter(|t| !t.trim().is_empty())
        .ok_or(SkipReason::MissingTransform)?;
    let label = group
        .select(&NODE_NAME)
        .next()
        .ok_or(SkipReason::MissingLabel)?;
    // Wrapped labels must stay on one heading line.
    let name = label
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        return Err(SkipReason::MissingLabel);
    }
    let anchor =
        parse_translate(transform).ok_or_else(|| SkipReason::BadTransform(transform.to_string()))?;

    Ok(Node {
        id,
        name,
        anchor,
        size: size_of(group),
        color: group.select(&SHAPE).find_map(fill).or_else(|| fill(label)),
    })
}

fn extract_connector(path: ElementRef) -> Result<Connector, SkipReason> {
    let numbers = scan_numbers(path.value().attr("d").unwrap_or(""));
    let n = numbers.len();
    if n < 4 {
        return Err(SkipReason::TooFewCoordinates(n));
    }
    Ok(Connector {
        start: Point::new(numbers[0], numbers[1]),
        end: Point::new(numbers[n - 2], numbers[n - 1]),
    })
}

fn size_of(group: ElementRef) -> Option<(f64, f64)> {
    let rect = group.select(&RECT).next()?.value();
    let width = rect.attr("width")?.trim().parse().ok()?;
    let height = rect.attr("height")?.trim().parse().ok()?;
    Some((width, height))
}

/// The `fill` attribute, or a `fill:` declaration in the inline style.
fn fill(element: ElementRef) -> Option<String> {
    let element = element.value();
    element
        .attr("fill")
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .or_else(|| element.attr("style").and_then(style_fill))
}

fn style_fill(style: &str) -> Option<String> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(property, _)| property.trim().eq_ignore_ascii_case("fill"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(diagram: &Diagram) -> Vec<&str> {
        diagram.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn extract_node_position_and_label() {
        let diagram = parse_document(
            r#"<svg><g class="node" transform="translate(10, 20)">
                 <rect width="80" height="30" fill="red"></rect>
                 <text class="node-name">  Root  </text>
               </g></svg>"#,
        );
        assert_eq!(names(&diagram), vec!["Root"]);
        let node = &diagram.nodes[0];
        assert_eq!(node.id, NodeId(0));
        assert_eq!(node.anchor, Point::new(10.0, 20.0));
        assert_eq!(node.size, Some((80.0, 30.0)));
        assert_eq!(node.color.as_deref(), Some("red"));
    }

    #[test]
    fn extract_label_joins_text_fragments() {
        let diagram = parse_document(
            r#"<svg><g class="node" transform="translate(0,0)">
                 <text class="node-name"><tspan> Big </tspan><tspan>Idea </tspan></text>
               </g></svg>"#,
        );
        assert_eq!(names(&diagram), vec!["Big Idea"]);
    }

    #[test]
    fn extract_label_collapses_line_breaks() {
        let diagram = parse_document(
            "<svg><g class=\"node\" transform=\"translate(0,0)\">
                 <text class=\"node-name\">
                     Long label that
                     wraps\there
                 </text>
               </g></svg>",
        );
        assert_eq!(names(&diagram), vec!["Long label that wraps here"]);
    }

    #[test]
    fn extract_color_from_first_shape_defining_one() {
        let diagram = parse_document(
            r#"<svg><g class="node" transform="translate(0,0)">
                 <rect width="10" height="10"></rect>
                 <circle r="3" style="stroke: black; fill: #abc"></circle>
                 <text class="node-name" fill="blue">A</text>
               </g></svg>"#,
        );
        assert_eq!(diagram.nodes[0].color.as_deref(), Some("#abc"));
    }

    #[test]
    fn extract_color_falls_back_to_label() {
        let diagram = parse_document(
            r#"<svg><g class="node" transform="translate(0,0)">
                 <rect width="10" height="10"></rect>
                 <text class="node-name" fill="blue">A</text>
               </g></svg>"#,
        );
        assert_eq!(diagram.nodes[0].color.as_deref(), Some("blue"));
    }

    #[test]
    fn extract_without_color() {
        let diagram = parse_document(
            r#"<svg><g class="node" transform="translate(0,0)">
                 <text class="node-name">A</text>
               </g></svg>"#,
        );
        assert_eq!(diagram.nodes[0].color, None);
        assert_eq!(diagram.nodes[0].size, None);
    }

    #[test]
    fn extract_skips_malformed_groups() {
        let diagram = parse_document(
            r#"<svg>
                 <g class="node"><text class="node-name">NoTransform</text></g>
                 <g class="node" transform="translate(1, 2)"></g>
                 <g class="node" transform="translate(1, 2)"><text class="node-name">  </text></g>
                 <g class="node" transform="rotate(5)"><text class="node-name">Bad</text></g>
                 <g class="node" transform="translate(3, 4)"><text class="node-name">Good</text></g>
               </svg>"#,
        );
        assert_eq!(names(&diagram), vec!["Good"]);
        assert_eq!(diagram.nodes[0].id, NodeId(0));
        let reasons: Vec<&SkipReason> = diagram.skipped_nodes.iter().map(|s| &s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &SkipReason::MissingTransform,
                &SkipReason::MissingLabel,
                &SkipReason::MissingLabel,
                &SkipReason::BadTransform("rotate(5)".to_string()),
            ]
        );
    }

    #[test]
    fn extract_keeps_duplicate_labels_as_distinct_nodes() {
        let diagram = parse_document(
            r#"<svg>
                 <g class="node" transform="translate(0, 0)"><text class="node-name">Same</text></g>
                 <g class="node" transform="translate(50, 0)"><text class="node-name">Same</text></g>
               </svg>"#,
        );
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.duplicate_names, vec!["Same".to_string()]);
        assert_eq!(diagram.lookup("Same"), Some(NodeId(1)));
        assert_eq!(diagram.lookup("Missing"), None);
    }

    #[test]
    fn extract_connectors_use_first_and_last_pair() {
        let diagram = parse_document(
            r#"<svg>
                 <path class="link" d="M10,20C15,20 15,40 30,40"></path>
                 <path class="link" d="M1,2"></path>
                 <path class="link"></path>
                 <path d="M0,0L5,5"></path>
               </svg>"#,
        );
        assert_eq!(
            diagram.connectors,
            vec![Connector {
                start: Point::new(10.0, 20.0),
                end: Point::new(30.0, 40.0),
            }]
        );
        let reasons: Vec<&SkipReason> =
            diagram.skipped_connectors.iter().map(|s| &s.reason).collect();
        assert_eq!(
            reasons,
            vec![&SkipReason::TooFewCoordinates(2), &SkipReason::TooFewCoordinates(0)]
        );
    }

    #[test]
    fn extract_from_html_page() {
        let diagram = parse_document(
            r#"<!DOCTYPE html><html><body><div><svg><g>
                 <path class="link" d="M0,0L10,0"></path>
                 <g class="node" transform="translate(0,0)"><text class="node-name">A</text></g>
               </g></svg></div></body></html>"#,
        );
        assert_eq!(names(&diagram), vec!["A"]);
        assert_eq!(diagram.connectors.len(), 1);
    }

    #[test]
    fn style_fill_ignores_other_properties() {
        assert_eq!(style_fill("stroke: red; FILL : green"), Some("green".to_string()));
        assert_eq!(style_fill("stroke: red"), None);
        assert_eq!(style_fill("fill:"), None);
    }
}
