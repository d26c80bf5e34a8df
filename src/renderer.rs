use crate::ast::Diagram;
use crate::layout::Heading;

const MARKER: char = '#';

/// One `#`-heading line per entry, joined by newlines with no trailing newline.
/// `max_level` caps the number of markers without changing recorded depths.
pub fn render(diagram: &Diagram, headings: &[Heading], max_level: Option<usize>) -> String {
    headings
        .iter()
        .map(|h| heading_line(diagram.name(h.node), h.depth, max_level))
        .collect::<Vec<_>>()
        .join("\n")
}

fn heading_line(name: &str, depth: usize, max_level: Option<usize>) -> String {
    let level = match max_level {
        Some(max) => depth.min(max.max(1)),
        None => depth,
    };
    let mut line = String::with_capacity(level + 1 + name.len());
    line.extend(std::iter::repeat_n(MARKER, level));
    line.push(' ');
    line.push_str(name);
    line
}
