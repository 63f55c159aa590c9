//! Conversion entry point: one request in, one PDF out.
//!
//! [`Dispatcher`] picks the path for the request's input kind:
//!
//! - slide decks are parsed with [`pdfconv_pptx::SlideExtractor`] and laid
//!   out with [`pdfconv_pdf::SlideComposer`]
//! - word-processing documents go to a [`DocumentConverter`]
//! - images are placed one per page by [`pdfconv_pdf::ImageComposer`]

pub mod dispatcher;
pub mod word;

pub use dispatcher::Dispatcher;
pub use word::{DocumentConverter, SofficeConverter};
