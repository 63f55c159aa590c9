//! PPTX (Office Open XML) slide text extraction.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! per-slide text blocks ready for PDF composition.

pub mod chart;
pub mod parser;
pub mod rels;
mod text;
mod xml;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

pub use parser::SlideExtractor;
