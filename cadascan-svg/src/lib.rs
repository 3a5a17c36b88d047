//! SVG boundary for the `Cadascan` system.
//!
//! Two kinds of SVG files are read:
//!
//! - **Documents**: cadastre exports converted to SVG, consumed as a flat
//!   stream of `<path d=... style=...>` elements. Group transforms are
//!   intentionally ignored — the paths of interest all live in one group.
//! - **Reference glyph libraries**: hand-labeled files where each `<path>`
//!   carries its recognized text in a `<title>` child. Paths without a
//!   title are skipped; a library without a single titled path is an
//!   error.
//!
//! Glyph libraries can also be written back out, so a library edited as
//! data round-trips through the same format.

use std::fmt;
use std::io;
use std::path::Path as FilePath;

use svg::node::element::tag;
use svg::parser::Event;
use svg::Document;

use cadascan_path::{PathError, VectorPath};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error reading or writing an SVG file.
#[derive(Debug)]
pub enum SvgError {
    /// Underlying file I/O failed.
    Io(io::Error),
    /// The XML stream itself is malformed.
    Malformed(String),
    /// A `d` attribute could not be parsed as path data.
    Path(PathError),
    /// A glyph library contained no titled paths.
    NoGlyphs,
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Malformed(message) => write!(f, "malformed SVG: {message}"),
            Self::Path(e) => write!(f, "invalid path data: {e}"),
            Self::NoGlyphs => write!(f, "no titled glyph paths in reference file"),
        }
    }
}

impl std::error::Error for SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Path(e) => Some(e),
            Self::Malformed(_) | Self::NoGlyphs => None,
        }
    }
}

impl From<io::Error> for SvgError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PathError> for SvgError {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}

// ---------------------------------------------------------------------------
// Document reading
// ---------------------------------------------------------------------------

/// Read every `<path>` of a document file, in source order.
pub fn read_document_paths(path: &FilePath) -> Result<Vec<VectorPath>, SvgError> {
    let mut content = String::new();
    let parser = svg::open(path, &mut content)?;
    collect_document_paths(parser)
}

/// Read every `<path>` of an in-memory document, in source order.
pub fn read_document_paths_str(content: &str) -> Result<Vec<VectorPath>, SvgError> {
    collect_document_paths(svg::read(content)?)
}

fn collect_document_paths(
    parser: svg::parser::Parser<'_>,
) -> Result<Vec<VectorPath>, SvgError> {
    let mut paths = Vec::new();
    for event in parser {
        match event {
            Event::Tag(tag::Path, tag::Type::Start | tag::Type::Empty, attributes) => {
                let Some(data) = attributes.get("d") else {
                    continue;
                };
                let style = attributes
                    .get("style")
                    .map(|s| s.replace(' ', ""))
                    .unwrap_or_default();
                paths.push(VectorPath::from_svg(data, &style)?);
            }
            Event::Error(e) => return Err(SvgError::Malformed(e.to_string())),
            _ => {}
        }
    }
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Glyph library reading
// ---------------------------------------------------------------------------

/// Read a labeled reference glyph library file.
///
/// The recognized text of each glyph is the content of the `<title>` child
/// of its `<path>`.
pub fn read_glyph_library(path: &FilePath) -> Result<Vec<(String, VectorPath)>, SvgError> {
    let mut content = String::new();
    let parser = svg::open(path, &mut content)?;
    collect_glyphs(parser)
}

/// Read a labeled reference glyph library from memory.
pub fn read_glyph_library_str(content: &str) -> Result<Vec<(String, VectorPath)>, SvgError> {
    collect_glyphs(svg::read(content)?)
}

fn collect_glyphs(
    parser: svg::parser::Parser<'_>,
) -> Result<Vec<(String, VectorPath)>, SvgError> {
    let mut glyphs = Vec::new();
    let mut pending_data: Option<String> = None;
    let mut pending_label: Option<String> = None;
    let mut in_title = false;

    for event in parser {
        match event {
            Event::Tag(tag::Path, tag::Type::Start, attributes) => {
                pending_data = attributes.get("d").map(|d| d.to_string());
                pending_label = None;
            }
            Event::Tag(tag::Path, tag::Type::End, _) => {
                if let (Some(data), Some(label)) = (pending_data.take(), pending_label.take()) {
                    glyphs.push((label, VectorPath::from_svg(&data, "")?));
                }
            }
            Event::Tag(tag::Title, tag::Type::Start, _) => in_title = true,
            Event::Tag(tag::Title, tag::Type::End, _) => in_title = false,
            Event::Text(text) if in_title => {
                pending_label = Some(text.trim().to_owned());
            }
            Event::Error(e) => return Err(SvgError::Malformed(e.to_string())),
            _ => {}
        }
    }

    if glyphs.is_empty() {
        return Err(SvgError::NoGlyphs);
    }
    Ok(glyphs)
}

// ---------------------------------------------------------------------------
// Glyph library writing
// ---------------------------------------------------------------------------

/// Build the SVG document for a glyph library.
#[must_use]
pub fn glyph_library_document(glyphs: &[(String, VectorPath)]) -> Document {
    let mut document = Document::new()
        .set("xml:space", "preserve")
        .set("width", "1488.75")
        .set("height", "1052.5");
    for (label, path) in glyphs {
        let element = svg::node::element::Path::new()
            .set(
                "style",
                "fill:#000000;fill-opacity:1;fill-rule:nonzero;stroke:none",
            )
            .set("d", path.to_path_data())
            .add(svg::node::element::Title::new(label.as_str()));
        document = document.add(element);
    }
    document
}

/// Write a glyph library file.
pub fn write_glyph_library(
    path: &FilePath,
    glyphs: &[(String, VectorPath)],
) -> Result<(), SvgError> {
    svg::save(path, &glyph_library_document(glyphs))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
