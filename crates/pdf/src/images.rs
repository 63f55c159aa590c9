//! Image composition: one page per image, scaled to fit and centered.

use crate::writer::PdfWriter;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object};
use pdfconv_core::{fit_to_page, Error, FittedImage, PageSize, Result};
use std::path::Path;

/// Resource name of the image drawn on each page.
const IMAGE_RESOURCE: &str = "Im1";

/// Places raster images onto fixed-size PDF pages.
#[derive(Debug, Clone)]
pub struct ImageComposer {
    page_size: PageSize,
}

impl ImageComposer {
    /// Create a composer for US Letter pages.
    pub fn new() -> Self {
        Self {
            page_size: PageSize::LETTER,
        }
    }

    /// Set the output page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Write one page per image, in the given order, to `output_path`.
    ///
    /// Stops at the first image that cannot be decoded.
    pub fn compose<P: AsRef<Path>>(&self, image_paths: &[P], output_path: &Path) -> Result<()> {
        let mut writer = PdfWriter::new();

        for path in image_paths {
            let path = path.as_ref();
            let image = load_rgb(path)?;
            let (width, height) = image.dimensions();
            let fitted = fit_to_page(width, height, self.page_size);
            log::debug!(
                "{}: {}x{} px placed at {:.1}x{:.1} pt",
                path.display(),
                width,
                height,
                fitted.width,
                fitted.height
            );

            let image_id = writer.add_image(&image)?;
            let resources = dictionary! {
                "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
            };
            writer.add_page(self.page_size, image_content(&fitted), resources)?;
        }

        writer.save(output_path, self.page_size)
    }
}

impl Default for ImageComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file to 8-bit RGB, flattening transparency onto white.
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)
        .map_err(|e| Error::ImageError(format!("{}: {}", path.display(), e)))?;
    Ok(flatten_alpha(image))
}

fn flatten_alpha(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let pixel = rgba.get_pixel(x, y);
        let alpha = pixel[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
    })
}

/// Content stream drawing the page image into its fitted box.
fn image_content(fitted: &FittedImage) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(fitted.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(fitted.height),
                    Object::Real(fitted.x),
                    Object::Real(fitted.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}
