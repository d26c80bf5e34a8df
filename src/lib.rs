pub mod ast;
pub mod display_width;
pub mod error;
pub mod extractor;
pub mod forest;
pub mod layout;
pub mod matcher;
pub mod orphans;
pub mod parser;
pub mod renderer;
pub mod report;

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

pub use error::Error;
pub use layout::{Heading, Placement};
pub use matcher::AnchorMode;
pub use report::Report;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub anchor: AnchorMode,
    /// Cap on heading markers per line. `None` writes one marker per level.
    pub max_level: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub markdown: String,
    /// Tree headings in traversal order, then orphans in extraction order.
    pub headings: Vec<Heading>,
    pub report: Report,
}

pub fn convert(input: &str) -> Result<Conversion, Error> {
    convert_with_options(input, &Options::default())
}

pub fn convert_with_options(input: &str, options: &Options) -> Result<Conversion, Error> {
    let diagram = extractor::parse_document(input);
    let matching = matcher::match_edges(&diagram, options.anchor);
    let forest = forest::resolve(&diagram, &matching.tree)?;
    let traversal = layout::traverse(&matching.tree, forest.root);
    let orphans = orphans::reconcile(&diagram, &traversal);
    let report = Report::build(&diagram, &matching, &forest, &traversal, &orphans);

    let mut headings = traversal.headings;
    headings.extend(orphans);
    let markdown = renderer::render(&diagram, &headings, options.max_level);

    info!(
        total = report.total,
        resolved = report.resolved,
        orphaned = report.orphaned(),
        root = %diagram.name(forest.root),
        "converted mind map"
    );
    Ok(Conversion {
        markdown,
        headings,
        report,
    })
}

/// Convert the file at `input` and write the outline to `output`.
///
/// The outline is written to a temporary file next to `output` and renamed
/// into place, so `output` is either fully written or left untouched.
pub fn convert_file(input: &Path, output: &Path, options: &Options) -> Result<Report, Error> {
    let source = fs::read_to_string(input).map_err(|source| Error::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let conversion = convert_with_options(&source, options)?;
    write_atomically(output, &conversion.markdown)?;
    Ok(conversion.report)
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
