//! Routes a conversion request to the matching converter.

use crate::word::{DocumentConverter, SofficeConverter};
use pdfconv_core::{
    ConversionError, ConversionReport, ConversionRequest, Error, InputKind, PageSize, Result,
};
use pdfconv_pdf::{ImageComposer, SlideComposer};
use pdfconv_pptx::SlideExtractor;
use std::path::{Path, PathBuf};

/// Converts requests of any [`InputKind`] into a single PDF.
pub struct Dispatcher {
    page_size: PageSize,
    document_converter: Box<dyn DocumentConverter>,
}

impl Dispatcher {
    /// Create a dispatcher with Letter pages and LibreOffice for documents.
    pub fn new() -> Self {
        Self {
            page_size: PageSize::default(),
            document_converter: Box::new(SofficeConverter::new()),
        }
    }

    /// Page size for slide and image output.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Replace the word-processing converter.
    pub fn with_document_converter(mut self, converter: Box<dyn DocumentConverter>) -> Self {
        self.document_converter = converter;
        self
    }

    /// Run one conversion.
    ///
    /// Slides and word documents read only the first input path; images use
    /// every path in order. On failure any partially written output is left
    /// in place.
    pub fn convert(&self, request: &ConversionRequest) -> std::result::Result<(), ConversionError> {
        self.dispatch(request).map_err(|e| {
            log::debug!("{} conversion failed: {}", request.input_kind, e);
            ConversionError::from(e)
        })
    }

    /// Run one conversion and describe the outcome.
    pub fn run(&self, request: &ConversionRequest) -> ConversionReport {
        match self.convert(request) {
            Ok(()) => ConversionReport::succeeded(request),
            Err(e) => ConversionReport::failed(request, &e),
        }
    }

    fn dispatch(&self, request: &ConversionRequest) -> Result<()> {
        let inputs = request.effective_inputs();
        let first = inputs.first().ok_or(Error::EmptyRequest)?;

        for ignored in request.ignored_inputs() {
            log::warn!(
                "{} converts one file at a time; ignoring {}",
                request.input_kind,
                ignored.display()
            );
        }

        let output = request.output_path.as_path();
        match request.input_kind {
            InputKind::Slides => self.convert_slides(first, output),
            InputKind::WordDoc => self.document_converter.convert(first, output),
            InputKind::Images => self.convert_images(inputs, output),
        }
    }

    fn convert_slides(&self, deck_path: &Path, output: &Path) -> Result<()> {
        let content = SlideExtractor::new().extract(deck_path)?;
        log::debug!("Extracted {} slides from {}", content.len(), deck_path.display());

        SlideComposer::new()
            .with_page_size(self.page_size)
            .compose(&content, output)
    }

    fn convert_images(&self, image_paths: &[PathBuf], output: &Path) -> Result<()> {
        ImageComposer::new()
            .with_page_size(self.page_size)
            .compose(image_paths, output)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::content::Content;
    use lopdf::{Document, Object};
    use pdfconv_pptx::testing::{table_shape, text_shape, DeckBuilder};
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records every call and writes a fixed payload.
    struct StubConverter {
        calls: Rc<RefCell<Vec<PathBuf>>>,
        fail: bool,
    }

    impl DocumentConverter for StubConverter {
        fn convert(&self, doc_path: &Path, output_path: &Path) -> Result<()> {
            self.calls.borrow_mut().push(doc_path.to_path_buf());
            if self.fail {
                return Err(Error::ConversionError("source file could not be loaded".into()));
            }
            fs::write(output_path, b"%PDF-1.4 stub")?;
            Ok(())
        }
    }

    fn stub(fail: bool) -> (Box<StubConverter>, Rc<RefCell<Vec<PathBuf>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Box::new(StubConverter {
                calls: Rc::clone(&calls),
                fail,
            }),
            calls,
        )
    }

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(width, height, Rgb([40, 90, 160]))
            .save(&path)
            .unwrap();
        path
    }

    fn write_deck(dir: &TempDir, name: &str, deck: DeckBuilder) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, deck.build().unwrap()).unwrap();
        path
    }

    fn shown_text(path: &Path) -> Vec<String> {
        let doc = Document::load(path).unwrap();
        let mut strings = Vec::new();
        for page_id in doc.get_pages().into_values() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations.into_iter().filter(|op| op.operator == "Tj") {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    strings.push(bytes.iter().map(|&b| b as char).collect());
                }
            }
        }
        strings
    }

    #[test]
    fn test_images_one_page_each() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_png(&dir, "wide.png", 300, 100),
            write_png(&dir, "tall.png", 100, 300),
            write_png(&dir, "square.png", 50, 50),
        ];
        let output = dir.path().join("album.pdf");

        let request = ConversionRequest::new(InputKind::Images, inputs, &output);
        Dispatcher::new().convert(&request).unwrap();

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_slides_headings_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let deck = DeckBuilder::new()
            .slide(&[text_shape(&["Quarterly review"])])
            .slide(&[])
            .slide(&[table_shape(&[&["Region", "Sales"], &["North", "12"]])]);
        let deck_path = write_deck(&dir, "review.pptx", deck);
        let output = dir.path().join("review.pdf");

        let request = ConversionRequest::new(InputKind::Slides, [&deck_path], &output);
        Dispatcher::new().convert(&request).unwrap();

        let text = shown_text(&output);
        let headings: Vec<&String> = text.iter().filter(|s| s.starts_with("Slide ")).collect();
        assert_eq!(headings, vec!["Slide 1", "Slide 2", "Slide 3"]);
        assert!(text.contains(&"Quarterly review".to_string()));
        assert!(text.contains(&"Region Sales".to_string()));
        assert!(text.contains(&"North 12".to_string()));
    }

    #[test]
    fn test_slides_first_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_deck(
            &dir,
            "first.pptx",
            DeckBuilder::new().slide(&[text_shape(&["from the first deck"])]),
        );
        let second = write_deck(
            &dir,
            "second.pptx",
            DeckBuilder::new().slide(&[text_shape(&["from the second deck"])]),
        );
        let output = dir.path().join("out.pdf");

        let request = ConversionRequest::new(InputKind::Slides, [&first, &second], &output);
        Dispatcher::new().convert(&request).unwrap();

        let text = shown_text(&output);
        assert!(text.contains(&"from the first deck".to_string()));
        assert!(!text.contains(&"from the second deck".to_string()));
    }

    #[test]
    fn test_word_delegates_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("letter.pdf");
        let (converter, calls) = stub(false);

        let request = ConversionRequest::new(
            InputKind::WordDoc,
            [dir.path().join("letter.docx"), dir.path().join("memo.docx")],
            &output,
        );
        let report = Dispatcher::new()
            .with_document_converter(converter)
            .run(&request);

        assert!(report.success);
        assert_eq!(report.message, ConversionReport::SUCCESS_MESSAGE);
        assert_eq!(*calls.borrow(), vec![dir.path().join("letter.docx")]);
        assert_eq!(fs::read(&output).unwrap(), b"%PDF-1.4 stub");
    }

    #[test]
    fn test_word_failure_message() {
        let dir = tempfile::tempdir().unwrap();
        let (converter, _calls) = stub(true);
        let request = ConversionRequest::new(
            InputKind::WordDoc,
            [dir.path().join("broken.docx")],
            dir.path().join("broken.pdf"),
        );

        let err = Dispatcher::new()
            .with_document_converter(converter)
            .convert(&request)
            .unwrap_err();
        assert!(matches!(err.cause(), Error::ConversionError(_)));
        assert_eq!(
            err.to_string(),
            "Conversion failed. Error: Document conversion error: source file could not be loaded"
        );
    }

    #[test]
    fn test_empty_request_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nothing.pdf");
        let (converter, calls) = stub(false);

        let request = ConversionRequest::new(InputKind::WordDoc, Vec::<PathBuf>::new(), &output);
        let err = Dispatcher::new()
            .with_document_converter(converter)
            .convert(&request)
            .unwrap_err();

        assert!(matches!(err.cause(), Error::EmptyRequest));
        assert!(calls.borrow().is_empty());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_inputs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        for kind in [InputKind::Slides, InputKind::Images] {
            let request = ConversionRequest::new(
                kind,
                [missing.with_extension(kind.extensions()[1])],
                dir.path().join("out.pdf"),
            );
            let report = Dispatcher::new().run(&request);
            assert!(!report.success, "{} should fail", kind);
            assert!(report.message.starts_with("Conversion failed. Error: "));
            assert!(report.converted.is_empty());
        }
    }

    #[test]
    fn test_not_a_deck_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("notes.pptx");
        fs::write(&fake, "plain text, not a zip").unwrap();

        let request = ConversionRequest::new(InputKind::Slides, [&fake], dir.path().join("out.pdf"));
        let err = Dispatcher::new().convert(&request).unwrap_err();
        assert!(err.cause().is_parse_error());
    }

    #[test]
    fn test_same_input_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let deck_path = write_deck(
            &dir,
            "deck.pptx",
            DeckBuilder::new()
                .slide(&[text_shape(&["Agenda", "Welcome"])])
                .slide_with_chart(&[], Some("Revenue")),
        );
        let image = write_png(&dir, "photo.png", 64, 48);
        let dispatcher = Dispatcher::new();

        let first = dir.path().join("a.pdf");
        let second = dir.path().join("b.pdf");
        dispatcher
            .convert(&ConversionRequest::new(InputKind::Slides, [&deck_path], &first))
            .unwrap();
        dispatcher
            .convert(&ConversionRequest::new(InputKind::Slides, [&deck_path], &second))
            .unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

        dispatcher
            .convert(&ConversionRequest::new(InputKind::Images, [&image], &first))
            .unwrap();
        dispatcher
            .convert(&ConversionRequest::new(InputKind::Images, [&image], &second))
            .unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_page_size_applies() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_png(&dir, "photo.png", 10, 10);
        let output = dir.path().join("a4.pdf");

        Dispatcher::new()
            .with_page_size(PageSize::A4)
            .convert(&ConversionRequest::new(InputKind::Images, [&image], &output))
            .unwrap();

        let doc = Document::load(&output).unwrap();
        let page_id = doc.get_pages()[&1];
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        let height = media_box[3].as_float().unwrap();
        assert!((height - 841.8898).abs() < 0.01);
    }
}
