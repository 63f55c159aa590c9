//! Core domain types, errors, and page geometry for converting slide decks,
//! word-processing documents, and images to PDF.

pub mod error;
pub mod layout;
pub mod types;

pub use error::{ConversionError, Error, Result};
pub use layout::{fit_to_page, FittedImage, PageSize};
pub use types::{
    ConversionReport, ConversionRequest, ExtractedSlideContent, InputKind, ShapeContent,
    SlideContent,
};
