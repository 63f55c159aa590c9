//! Low-level PDF assembly on top of `lopdf`.
//!
//! Collects pages, fonts, and image XObjects into one document and writes it
//! out. The output carries no timestamps, so identical input produces
//! identical bytes.

use crate::fonts::FontFace;
use image::RgbImage;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use pdfconv_core::{Error, PageSize, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const PDF_VERSION: &str = "1.5";

/// Builds a PDF document page by page.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<ObjectId>,
    fonts: BTreeMap<FontFace, ObjectId>,
}

impl PdfWriter {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            fonts: BTreeMap::new(),
        }
    }

    /// Object id of a font, adding the font on first use.
    pub fn font(&mut self, face: FontFace) -> ObjectId {
        if let Some(id) = self.fonts.get(&face) {
            return *id;
        }

        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.fonts.insert(face, id);
        id
    }

    /// Font resources for a page that uses the given faces.
    pub fn font_resources(&mut self, faces: &[FontFace]) -> Dictionary {
        let mut fonts = Dictionary::new();
        for face in faces {
            let id = self.font(*face);
            fonts.set(face.resource_name(), id);
        }
        dictionary! { "Font" => fonts }
    }

    /// Embed an RGB image as an image XObject.
    pub fn add_image(&mut self, image: &RgbImage) -> Result<ObjectId> {
        let (width, height) = image.dimensions();
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.as_raw().clone(),
        );
        stream
            .compress()
            .map_err(|e| Error::WriteError(format!("Failed to compress image data: {}", e)))?;

        Ok(self.doc.add_object(stream))
    }

    /// Append a page with the given content stream and resources.
    pub fn add_page(&mut self, size: PageSize, content: Content, resources: Dictionary) -> Result<()> {
        let encoded = content
            .encode()
            .map_err(|e| Error::WriteError(format!("Failed to encode page content: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));
        let resources_id = self.doc.add_object(resources);

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(size.width),
                Object::Real(size.height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.pages.push(page_id);
        Ok(())
    }

    /// Finish the page tree and write the document to `path`.
    ///
    /// A document without pages gets one blank page of `blank_size`.
    pub fn save(mut self, path: &Path, blank_size: PageSize) -> Result<()> {
        if self.pages.is_empty() {
            self.add_page(blank_size, Content { operations: Vec::new() }, Dictionary::new())?;
        }

        let kids: Vec<Object> = self.pages.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.pages.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let file = File::create(path)
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save_to(&mut writer)
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))?;
        writer
            .flush()
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))?;

        log::debug!("Wrote {} pages to {}", self.pages.len(), path.display());
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
