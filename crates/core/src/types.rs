//! Domain types for conversion requests and extracted slide content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The kind of document a conversion request starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// Presentation slide decks (.pptx).
    Slides,
    /// Word-processing documents (.docx).
    WordDoc,
    /// Raster images, one page each.
    Images,
}

impl InputKind {
    /// All input kinds in selector order.
    pub const ALL: [InputKind; 3] = [InputKind::Slides, InputKind::WordDoc, InputKind::Images];

    /// Human-readable label, as shown in a format selector.
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Slides => "PPT File",
            InputKind::WordDoc => "Word File",
            InputKind::Images => "Image File",
        }
    }

    /// File extensions offered by the file picker for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            InputKind::Slides => &["ppt", "pptx"],
            InputKind::WordDoc => &["doc", "docx"],
            InputKind::Images => &["png", "jpg", "jpeg"],
        }
    }

    /// Whether the file picker for this kind would offer `path`.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions().iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// Whether every selected input is converted, or only the first one.
    pub fn uses_all_inputs(&self) -> bool {
        matches!(self, InputKind::Images)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slides" | "ppt" | "pptx" | "ppt file" => Ok(InputKind::Slides),
            "word" | "worddoc" | "doc" | "docx" | "word file" => Ok(InputKind::WordDoc),
            "images" | "image" | "image file" => Ok(InputKind::Images),
            other => Err(format!(
                "unknown input kind '{}' (expected slides, word or images)",
                other
            )),
        }
    }
}

/// A single conversion: which converter, which inputs, and where the PDF goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Selected input kind.
    pub input_kind: InputKind,

    /// Selected input files, in selection order.
    pub input_paths: Vec<PathBuf>,

    /// Target PDF path.
    pub output_path: PathBuf,
}

impl ConversionRequest {
    /// Create a new request.
    pub fn new(
        input_kind: InputKind,
        input_paths: impl IntoIterator<Item = impl Into<PathBuf>>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_kind,
            input_paths: input_paths.into_iter().map(Into::into).collect(),
            output_path: output_path.into(),
        }
    }

    /// The inputs the converter for this kind actually reads.
    ///
    /// Slides and word documents convert only the first selected file.
    pub fn effective_inputs(&self) -> &[PathBuf] {
        if self.input_kind.uses_all_inputs() {
            &self.input_paths
        } else {
            let end = self.input_paths.len().min(1);
            &self.input_paths[..end]
        }
    }

    /// Selected inputs that will not be converted.
    pub fn ignored_inputs(&self) -> &[PathBuf] {
        &self.input_paths[self.effective_inputs().len()..]
    }
}

/// Outcome of a conversion, for reporting back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Input kind that was converted.
    pub input_kind: InputKind,

    /// Inputs that were read.
    pub converted: Vec<PathBuf>,

    /// Target PDF path.
    pub output_path: PathBuf,

    /// Whether the conversion succeeded.
    pub success: bool,

    /// Status message suitable for a status label.
    pub message: String,
}

impl ConversionReport {
    /// Status text for a successful conversion.
    pub const SUCCESS_MESSAGE: &'static str = "Conversion Completed Successfully";

    /// Report a successful conversion.
    pub fn succeeded(request: &ConversionRequest) -> Self {
        Self {
            input_kind: request.input_kind,
            converted: request.effective_inputs().to_vec(),
            output_path: request.output_path.clone(),
            success: true,
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Report a failed conversion with the failure text.
    pub fn failed(request: &ConversionRequest, error: &impl fmt::Display) -> Self {
        Self {
            input_kind: request.input_kind,
            converted: Vec::new(),
            output_path: request.output_path.clone(),
            success: false,
            message: error.to_string(),
        }
    }
}

/// Text extracted from one shape, classified by what the shape can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeContent {
    /// A shape with a text frame; paragraphs joined by newlines.
    TextFrame(String),
    /// A table as rows of cell texts.
    Table(Vec<Vec<String>>),
    /// A chart; `title` is `None` when the chart has no title.
    Chart { title: Option<String> },
    /// A shape with no displayable text (pictures, connectors, groups).
    None,
}

impl ShapeContent {
    /// Flatten the shape into the text block that goes into the PDF.
    ///
    /// Table cells are each followed by a single space and every row ends
    /// with a newline. Cell boundaries are not escaped.
    pub fn text(&self) -> String {
        match self {
            ShapeContent::TextFrame(text) => text.clone(),
            ShapeContent::Table(rows) => {
                let mut table_text = String::new();
                for row in rows {
                    for cell in row {
                        table_text.push_str(cell);
                        table_text.push(' ');
                    }
                    table_text.push('\n');
                }
                table_text
            }
            ShapeContent::Chart { title: Some(title) } => format!("Chart: {}", title),
            ShapeContent::Chart { title: None } | ShapeContent::None => String::new(),
        }
    }
}

/// Text blocks of a single slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    /// 1-based position of the slide in the deck.
    pub index: usize,

    /// One block per shape, in shape order. Blocks may be empty.
    pub blocks: Vec<String>,
}

impl SlideContent {
    /// Create an empty slide entry.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            blocks: Vec::new(),
        }
    }

    /// Append the text of one shape.
    pub fn add_shape(&mut self, shape: &ShapeContent) {
        self.blocks.push(shape.text());
    }

    /// Heading label for this slide.
    pub fn heading(&self) -> String {
        format!("Slide {}", self.index)
    }

    /// Blocks that carry visible text.
    pub fn non_empty_blocks(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .map(|b| b.as_str())
            .filter(|b| !b.trim().is_empty())
    }
}

/// Text of every slide in a deck, in slide order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSlideContent {
    /// Slides in presentation order.
    pub slides: Vec<SlideContent>,
}

impl ExtractedSlideContent {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide.
    pub fn add_slide(&mut self, slide: SlideContent) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
