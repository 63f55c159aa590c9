//! Accumulates the text of a DrawingML text body.

/// Collects runs into paragraphs joined by newlines.
#[derive(Debug, Default, Clone)]
pub(crate) struct TextCollector {
    text: String,
    paragraphs: usize,
}

impl TextCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Called on every `<a:p>`; separates it from the previous paragraph.
    pub(crate) fn start_paragraph(&mut self) {
        if self.paragraphs > 0 {
            self.text.push('\n');
        }
        self.paragraphs += 1;
    }

    /// Called on `<a:br>`.
    pub(crate) fn line_break(&mut self) {
        self.text.push('\n');
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}
