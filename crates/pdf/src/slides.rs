//! Slide text composition: a heading per slide followed by its text blocks,
//! flowed across as many pages as needed.

use crate::fonts::{encode_win_ansi, FontFace};
use crate::writer::PdfWriter;
use lopdf::content::{Content, Operation};
use lopdf::Object;
use pdfconv_core::{ExtractedSlideContent, PageSize, Result};
use std::path::Path;

/// Font, size, and spacing of one kind of block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFace,
    pub size: f32,
    pub leading: f32,
    pub space_after: f32,
}

impl TextStyle {
    /// Style of the `Slide N` headings.
    pub const HEADING: TextStyle = TextStyle {
        font: FontFace::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        space_after: 6.0,
    };

    /// Style of slide text.
    pub const BODY: TextStyle = TextStyle {
        font: FontFace::Helvetica,
        size: 10.0,
        leading: 12.0,
        space_after: 0.0,
    };
}

/// One laid-out line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font: FontFace,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// Lays extracted slide text out as a flowing document.
#[derive(Debug, Clone)]
pub struct SlideComposer {
    page_size: PageSize,
    margin: f32,
    block_spacing: f32,
    heading: TextStyle,
    body: TextStyle,
}

impl SlideComposer {
    /// Create a composer for US Letter pages with one-inch margins.
    pub fn new() -> Self {
        Self {
            page_size: PageSize::LETTER,
            margin: 72.0,
            block_spacing: 12.0,
            heading: TextStyle::HEADING,
            body: TextStyle::BODY,
        }
    }

    /// Set the output page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Write `content` as a PDF to `output_path`.
    pub fn compose(&self, content: &ExtractedSlideContent, output_path: &Path) -> Result<()> {
        let pages = self.layout(content);
        log::debug!(
            "Composing {} slides onto {} pages",
            content.len(),
            pages.len()
        );

        let mut writer = PdfWriter::new();
        for lines in pages {
            let resources = writer.font_resources(&[self.body.font, self.heading.font]);
            writer.add_page(self.page_size, page_content(&lines), resources)?;
        }
        writer.save(output_path, self.page_size)
    }

    /// Lay out all slides; one entry of placed lines per page.
    pub fn layout(&self, content: &ExtractedSlideContent) -> Vec<Vec<PlacedLine>> {
        let mut flow = Flow::new(self);

        for slide in &content.slides {
            flow.paragraph(&slide.heading(), self.heading);
            flow.space(self.heading.space_after);

            for block in slide.non_empty_blocks() {
                flow.space(self.block_spacing);
                flow.paragraph(block, self.body);
            }
        }

        flow.finish()
    }

    fn text_width(&self) -> f32 {
        self.page_size.width - 2.0 * self.margin
    }
}

impl Default for SlideComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over the current page. Starts a new page when a line no longer
/// fits above the bottom margin.
struct Flow<'a> {
    composer: &'a SlideComposer,
    pages: Vec<Vec<PlacedLine>>,
    y: f32,
}

impl<'a> Flow<'a> {
    fn new(composer: &'a SlideComposer) -> Self {
        Self {
            composer,
            pages: vec![Vec::new()],
            y: composer.page_size.height - composer.margin,
        }
    }

    fn top(&self) -> f32 {
        self.composer.page_size.height - self.composer.margin
    }

    fn bottom(&self) -> f32 {
        self.composer.margin
    }

    fn page_is_empty(&self) -> bool {
        self.pages.last().map(|p| p.is_empty()).unwrap_or(true)
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = self.top();
    }

    /// Vertical space; dropped at the top of a page.
    fn space(&mut self, amount: f32) {
        if self.page_is_empty() {
            return;
        }
        self.y -= amount;
        if self.y < self.bottom() {
            self.new_page();
        }
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) {
        let width = self.composer.text_width();
        for line in wrap_text(text, style.font, style.size, width) {
            if self.y - style.leading < self.bottom() && !self.page_is_empty() {
                self.new_page();
            }
            self.y -= style.leading;

            let placed = PlacedLine {
                text: line,
                font: style.font,
                size: style.size,
                x: self.composer.margin,
                y: self.y + (style.leading - style.size),
            };
            if let Some(page) = self.pages.last_mut() {
                page.push(placed);
            }
        }
    }

    fn finish(self) -> Vec<Vec<PlacedLine>> {
        let mut pages = self.pages;
        if pages.len() > 1 && pages.last().map(|p| p.is_empty()).unwrap_or(false) {
            pages.pop();
        }
        pages
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Embedded newlines are hard breaks; runs of spaces collapse; trailing
/// whitespace is dropped. Words wider than the line are split by character.
pub fn wrap_text(text: &str, font: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for hard_line in text.trim_end().split('\n') {
        let mut current = String::new();
        let mut has_words = false;

        for word in hard_line.split_whitespace() {
            has_words = true;
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if font.text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if font.text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    let mut next = current.clone();
                    next.push(ch);
                    if font.text_width(&next, size) > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    } else {
                        current = next;
                    }
                }
            }
        }

        if has_words {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }

    lines
}

/// Content stream drawing the given lines.
fn page_content(lines: &[PlacedLine]) -> Content {
    let mut operations = Vec::new();

    for line in lines.iter().filter(|l| !l.text.is_empty()) {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.font.resource_name().as_bytes().to_vec()),
                Object::Real(line.size),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{page_strings, pdf_pages};
    use pdfconv_core::SlideContent;

    fn deck(slides: &[&[&str]]) -> ExtractedSlideContent {
        let mut content = ExtractedSlideContent::new();
        for (idx, blocks) in slides.iter().enumerate() {
            let mut slide = SlideContent::new(idx + 1);
            slide.blocks = blocks.iter().map(|b| b.to_string()).collect();
            content.add_slide(slide);
        }
        content
    }

    fn headings(lines: &[PlacedLine]) -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.font == FontFace::HelveticaBold)
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn test_wrap_text_hard_breaks_and_blank_lines() {
        let lines = wrap_text("one  two\n\nthree\n", FontFace::Helvetica, 10.0, 400.0);
        assert_eq!(lines, vec!["one two", "", "three"]);
    }

    #[test]
    fn test_wrap_text_breaks_long_lines() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let lines = wrap_text(&text, FontFace::Helvetica, 10.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(FontFace::Helvetica.text_width(line, 10.0) <= 200.0, "{}", line);
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_text_splits_oversized_word() {
        let word = "x".repeat(100);
        let lines = wrap_text(&word, FontFace::Helvetica, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_heading_for_every_slide() {
        let content = deck(&[&["Welcome"], &[], &["", "  "], &["Chart: Sales", "a b \n"]]);
        let pages = SlideComposer::new().layout(&content);
        let all: Vec<PlacedLine> = pages.into_iter().flatten().collect();

        assert_eq!(headings(&all), vec!["Slide 1", "Slide 2", "Slide 3", "Slide 4"]);
        let body: Vec<&str> = all
            .iter()
            .filter(|l| l.font == FontFace::Helvetica)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(body, vec!["Welcome", "Chart: Sales", "a b"]);
    }

    #[test]
    fn test_block_spacing() {
        let content = deck(&[&["first", "second"]]);
        let composer = SlideComposer::new();
        let lines: Vec<PlacedLine> = composer.layout(&content).into_iter().flatten().collect();

        let heading = &lines[0];
        assert_eq!(heading.y, 792.0 - 72.0 - 22.0 + 4.0);
        assert_eq!(lines[1].y, heading.y - 4.0 - 6.0 - 12.0 - 12.0 + 2.0);
        assert_eq!(lines[1].y - lines[2].y, 24.0);
    }

    #[test]
    fn test_content_flows_onto_new_pages() {
        let many: Vec<String> = (0..120).map(|i| format!("Line {}", i)).collect();
        let blocks: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
        let content = deck(&[&blocks, &["tail"]]);
        let composer = SlideComposer::new();
        let pages = composer.layout(&content);

        assert!(pages.len() >= 3);
        for page in &pages {
            assert!(!page.is_empty());
            for line in page {
                assert!(line.y >= 72.0 && line.y <= 792.0 - 72.0, "{:?}", line);
            }
        }
        let all: Vec<PlacedLine> = pages.into_iter().flatten().collect();
        assert_eq!(headings(&all), vec!["Slide 1", "Slide 2"]);
    }

    #[test]
    fn test_compose_writes_headings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        let content = deck(&[&["Agenda\nItem one"], &[], &["Caf\u{e9}"]]);

        SlideComposer::new().compose(&content, &path).unwrap();

        let pages = pdf_pages(&path);
        assert_eq!(pages.len(), 1);
        let strings = page_strings(&path, 1);
        assert_eq!(
            strings,
            vec!["Slide 1", "Agenda", "Item one", "Slide 2", "Slide 3", "Caf\u{e9}"]
        );
    }

    #[test]
    fn test_compose_empty_deck_has_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        SlideComposer::new()
            .compose(&ExtractedSlideContent::new(), &path)
            .unwrap();
        assert_eq!(pdf_pages(&path).len(), 1);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.pdf");
        let second = dir.path().join("b.pdf");
        let content = deck(&[&["Same"], &["input"]]);

        SlideComposer::new().compose(&content, &first).unwrap();
        SlideComposer::new().compose(&content, &second).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn test_compose_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.pdf");
        let err = SlideComposer::new()
            .compose(&deck(&[&["x"]]), &path)
            .unwrap_err();
        assert!(matches!(err, pdfconv_core::Error::WriteError(_)));
    }
}
