//! PDF composition backends.
//!
//! [`SlideComposer`] flows extracted slide text into a paginated document;
//! [`ImageComposer`] puts each image on its own page. Both write through
//! [`PdfWriter`].

pub mod fonts;
pub mod images;
pub mod slides;
pub mod writer;

#[cfg(test)]
mod test_util;

pub use fonts::FontFace;
pub use images::ImageComposer;
pub use slides::{SlideComposer, TextStyle};
pub use writer::PdfWriter;
