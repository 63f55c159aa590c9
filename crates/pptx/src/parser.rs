//! PPTX slide text extraction.
//!
//! Walks every slide of a deck in presentation order and turns each shape of
//! the slide's shape tree into a text block: text frames verbatim, tables
//! flattened row by row, and chart titles prefixed with `Chart: `.

use crate::chart::parse_chart_title;
use crate::rels::{self, Relationship};
use crate::text::TextCollector;
use crate::xml::local_name;
use pdfconv_core::{Error, ExtractedSlideContent, Result, ShapeContent, SlideContent};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Main part used when the package has no root relationships.
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Elements that are shapes when they appear directly in a shape tree.
const SHAPE_ELEMENTS: &[&[u8]] = &[
    b"sp",
    b"graphicFrame",
    b"grpSp",
    b"pic",
    b"cxnSp",
    b"contentPart",
];

/// Extracts displayable text from PPTX slide decks.
pub struct SlideExtractor;

impl SlideExtractor {
    /// Create a new slide extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every slide of the deck at `deck_path`.
    pub fn extract(&self, deck_path: &Path) -> Result<ExtractedSlideContent> {
        log::debug!("Extracting slide text from {}", deck_path.display());
        let file = File::open(deck_path)?;
        self.extract_from(BufReader::new(file))
    }

    /// Extract the text of every slide of a deck read from `reader`.
    pub fn extract_from<R: Read + Seek>(&self, reader: R) -> Result<ExtractedSlideContent> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Not a slide deck container: {}", e)))?;

        let presentation_part = self.presentation_part(&mut archive)?;
        let slide_parts = self.get_slide_order(&mut archive, &presentation_part)?;
        log::debug!("Found {} slides", slide_parts.len());

        let mut content = ExtractedSlideContent::new();
        for (idx, slide_part) in slide_parts.iter().enumerate() {
            let slide = self.extract_slide(&mut archive, slide_part, idx + 1)?;
            content.add_slide(slide);
        }

        Ok(content)
    }

    /// Locate the presentation part through the package root relationships.
    fn presentation_part<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<String> {
        if let Some(xml) = read_optional_part(archive, "_rels/.rels")? {
            let root_rels = rels::parse_relationships(&xml)?;
            if let Some(rel) = rels::find_by_type(&root_rels, "officeDocument") {
                return Ok(rels::resolve_target("", &rel.target));
            }
        }

        Ok(DEFAULT_PRESENTATION_PART.to_string())
    }

    /// Slide part names in the order of the presentation's slide id list.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        presentation_part: &str,
    ) -> Result<Vec<String>> {
        let presentation_xml = read_part(archive, presentation_part)?;
        let slide_ids = parse_slide_id_list(&presentation_xml)?;
        if slide_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rels_xml = read_part(archive, &rels::rels_path_for(presentation_part))?;
        let presentation_rels = rels::parse_relationships(&rels_xml)?;

        slide_ids
            .iter()
            .map(|id| {
                rels::find_by_id(&presentation_rels, id)
                    .map(|rel| rels::resolve_target(presentation_part, &rel.target))
                    .ok_or_else(|| {
                        Error::ParseError(format!("Slide relationship '{}' not found", id))
                    })
            })
            .collect()
    }

    /// Extract the text blocks of a single slide.
    fn extract_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_part: &str,
        index: usize,
    ) -> Result<SlideContent> {
        let xml = read_part(archive, slide_part)?;
        let shapes = parse_shape_tree(&xml)
            .map_err(|e| Error::ParseError(format!("{}: {}", slide_part, e)))?;

        let mut slide = SlideContent::new(index);
        let mut slide_rels: Option<Vec<Relationship>> = None;

        for shape in shapes {
            let content = match shape {
                RawShape::Content(content) => content,
                RawShape::Chart { rel_id } => {
                    if slide_rels.is_none() {
                        let rels_path = rels::rels_path_for(slide_part);
                        slide_rels = Some(match read_optional_part(archive, &rels_path)? {
                            Some(xml) => rels::parse_relationships(&xml)?,
                            None => Vec::new(),
                        });
                    }

                    let chart_part = slide_rels
                        .as_deref()
                        .and_then(|r| rels::find_by_id(r, &rel_id))
                        .map(|rel| rels::resolve_target(slide_part, &rel.target))
                        .ok_or_else(|| {
                            Error::ParseError(format!(
                                "Chart relationship '{}' not found for {}",
                                rel_id, slide_part
                            ))
                        })?;

                    let chart_xml = read_part(archive, &chart_part)?;
                    ShapeContent::Chart {
                        title: parse_chart_title(&chart_xml)?,
                    }
                }
            };
            slide.add_shape(&content);
        }

        log::debug!(
            "Slide {}: {} shapes, {} with text",
            index,
            slide.blocks.len(),
            slide.non_empty_blocks().count()
        );

        Ok(slide)
    }
}

impl Default for SlideExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A shape as read from slide XML. Charts still need their part resolved.
#[derive(Debug, PartialEq)]
enum RawShape {
    Content(ShapeContent),
    Chart { rel_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    TextFrame,
    GraphicFrame,
    Other,
}

/// Accumulates one top-level shape while its XML is being read.
#[derive(Debug)]
struct ShapeBuilder {
    kind: ShapeKind,
    depth: usize,
    text: TextCollector,
    table: Option<Vec<Vec<TextCollector>>>,
    chart_rel: Option<String>,
}

impl ShapeBuilder {
    fn from_element(name: &[u8], depth: usize) -> Option<Self> {
        let kind = match name {
            b"sp" => ShapeKind::TextFrame,
            b"graphicFrame" => ShapeKind::GraphicFrame,
            n if SHAPE_ELEMENTS.contains(&n) => ShapeKind::Other,
            _ => return None,
        };

        Some(Self {
            kind,
            depth,
            text: TextCollector::new(),
            table: None,
            chart_rel: None,
        })
    }

    /// Where text runs currently go: the open table cell or the text frame.
    fn text_target(&mut self) -> Option<&mut TextCollector> {
        match (&mut self.table, self.kind) {
            (Some(table), _) => table.last_mut().and_then(|row| row.last_mut()),
            (None, ShapeKind::TextFrame) => Some(&mut self.text),
            (None, _) => None,
        }
    }

    fn element(&mut self, e: &BytesStart, local: &[u8]) {
        match local {
            b"tbl" if self.kind == ShapeKind::GraphicFrame => {
                self.table = Some(Vec::new());
            }
            b"tr" => {
                if let Some(table) = self.table.as_mut() {
                    table.push(Vec::new());
                }
            }
            b"tc" => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.last_mut()) {
                    row.push(TextCollector::new());
                }
            }
            b"chart" if self.kind == ShapeKind::GraphicFrame && self.chart_rel.is_none() => {
                self.chart_rel = rels::referenced_id(e);
            }
            b"p" => {
                if let Some(target) = self.text_target() {
                    target.start_paragraph();
                }
            }
            b"br" => {
                if let Some(target) = self.text_target() {
                    target.line_break();
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> RawShape {
        match self.kind {
            ShapeKind::TextFrame => RawShape::Content(ShapeContent::TextFrame(self.text.into_text())),
            ShapeKind::GraphicFrame => {
                if let Some(table) = self.table {
                    let rows = table
                        .into_iter()
                        .map(|row| row.into_iter().map(TextCollector::into_text).collect())
                        .collect();
                    RawShape::Content(ShapeContent::Table(rows))
                } else if let Some(rel_id) = self.chart_rel {
                    RawShape::Chart { rel_id }
                } else {
                    RawShape::Content(ShapeContent::None)
                }
            }
            ShapeKind::Other => RawShape::Content(ShapeContent::None),
        }
    }
}

/// Read the top-level shapes of a slide's `<p:spTree>`, in document order.
///
/// Group shapes are not descended into.
fn parse_shape_tree(xml: &str) -> Result<Vec<RawShape>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut tree_seen = false;
    let mut current: Option<ShapeBuilder> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some(shape) = current.as_mut() {
                    if local == b"t" {
                        in_text = true;
                    } else {
                        shape.element(e, local);
                    }
                } else if let Some(tree) = tree_depth {
                    if depth == tree + 1 {
                        current = ShapeBuilder::from_element(local, depth);
                    }
                } else if !tree_seen && local == b"spTree" {
                    tree_depth = Some(depth);
                    tree_seen = true;
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some(shape) = current.as_mut() {
                    shape.element(e, local);
                } else if tree_depth == Some(depth) {
                    if let Some(shape) = ShapeBuilder::from_element(local, depth + 1) {
                        shapes.push(shape.finish());
                    }
                } else if !tree_seen && local == b"spTree" {
                    tree_seen = true;
                    break;
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(target) = current.as_mut().and_then(|s| s.text_target()) {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::XmlError(format!("Bad slide text: {}", e)))?;
                        target.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"t" {
                    in_text = false;
                }

                if current.as_ref().map(|s| s.depth) == Some(depth) {
                    if let Some(shape) = current.take() {
                        shapes.push(shape.finish());
                    }
                }

                if tree_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    if !tree_seen {
        return Err(Error::ParseError("No <p:spTree> found in slide".to_string()));
    }

    Ok(shapes)
}

/// Relationship ids of `<p:sldId>` entries, in list order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut ids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                if let Some(id) = rels::referenced_id(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Read a required part from the ZIP archive.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    read_optional_part(archive, path)?
        .ok_or_else(|| Error::ParseError(format!("Missing part '{}' in slide deck", path)))
}

/// Read a part that may be absent.
fn read_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(Error::ZipError(format!("Failed to open '{}': {}", path, e)));
        }
    };

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ParseError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(Some(content))
}
