//! Error types for document-to-PDF conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting documents to PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The slide deck is malformed or not a slide-deck container.
    #[error("Slide deck parsing error: {0}")]
    ParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// An input image could not be decoded.
    #[error("Image error: {0}")]
    ImageError(String),

    /// The output PDF could not be created or written.
    #[error("Failed to write PDF: {0}")]
    WriteError(String),

    /// The external document converter failed.
    #[error("Document conversion error: {0}")]
    ConversionError(String),

    /// The request named no input files.
    #[error("No input files were selected")]
    EmptyRequest,
}

impl Error {
    /// True for failures that originate in reading the slide deck container.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::ParseError(_) | Error::ZipError(_) | Error::XmlError(_)
        )
    }
}

/// The single failure signal surfaced to callers of the dispatcher.
///
/// Every underlying [`Error`] is collapsed into this type; the source is kept
/// for logging but callers only need the message.
#[derive(Error, Debug)]
#[error("Conversion failed. Error: {source}")]
pub struct ConversionError {
    #[from]
    source: Error,
}

impl ConversionError {
    /// The underlying failure.
    pub fn cause(&self) -> &Error {
        &self.source
    }
}
