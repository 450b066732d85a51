//! Bitmap → single-page landscape PDF.
//!
//! The composed bitmap is embedded losslessly (PNG, no recompression).
//! The declared page size is the bitmap divided back down by the capture
//! scale, so a 4× capture still produces a page physically identical to
//! the 1200×848 design canvas.

use std::error::Error;

use genpdf::elements::Image as PdfImage;
use genpdf::Document;
use image::{DynamicImage, RgbaImage};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use tempfile::NamedTempFile;

use super::RenderError;
use crate::config;

/// CSS reference resolution the design canvas is expressed in.
const PAGE_DPI: f64 = 96.0;
const MM_PER_INCH: f64 = 25.4;

pub fn px_to_mm(px: u32) -> f64 {
    px as f64 / PAGE_DPI * MM_PER_INCH
}

pub fn export_pdf(bitmap: &RgbaImage, scale: u32) -> Result<Vec<u8>, RenderError> {
    let scale = scale.max(1);
    let page_w_px = bitmap.width() / scale;
    let page_h_px = bitmap.height() / scale;

    let tmp = write_png_tempfile(bitmap)?;

    let mut doc = configure_document(page_w_px, page_h_px)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let mut img =
        PdfImage::from_path(tmp.path()).map_err(|e| RenderError::Pdf(e.to_string()))?;
    // The bitmap carries `scale`× the page's pixel density.
    img.set_dpi(PAGE_DPI * scale as f64);
    doc.push(img);

    let mut out = Vec::new();
    doc.render(&mut out)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    // `tmp` must outlive `render`, which reads the image back.
    drop(tmp);
    Ok(out)
}

/// Flatten alpha over white and encode as 8-bit RGB PNG into a temp file
/// for genpdf to embed.
fn write_png_tempfile(bitmap: &RgbaImage) -> Result<NamedTempFile, RenderError> {
    let (w, h) = bitmap.dimensions();
    let mut background = RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, bitmap, 0, 0);
    let rgb = DynamicImage::ImageRgba8(background).to_rgb8();
    let raw = rgb.into_raw();

    let mut tmp = NamedTempFile::new()?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        writer
            .write_image_data(&raw)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
    }
    Ok(tmp)
}

fn configure_document(page_w_px: u32, page_h_px: u32) -> Result<Document, Box<dyn Error>> {
    let font_family = load_font()?;
    let mut doc = Document::new(font_family);
    doc.set_title("Certificate");
    doc.set_paper_size(genpdf::Size::new(px_to_mm(page_w_px), px_to_mm(page_h_px)));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(0);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

/// genpdf requires a font family even for an image-only page. Use Arial
/// from the fonts directory, falling back to LiberationSans.
fn load_font() -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, Box<dyn Error>> {
    let dir = config::fonts_dir();
    if let Ok(family) = genpdf::fonts::from_files(&dir, "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(&dir, "LiberationSans", None).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_scale_invariant() {
        // A 4x capture of the 1200x848 canvas declares the same physical
        // page as a 1x capture.
        let w_4x = px_to_mm((super::super::BASE_WIDTH * 4) / 4);
        let w_1x = px_to_mm(super::super::BASE_WIDTH);
        assert_eq!(w_4x, w_1x);
        assert!((px_to_mm(1200) - 317.5).abs() < 1e-9);
        assert!((px_to_mm(848) - 224.366_666_666).abs() < 1e-6);
    }

    #[test]
    fn png_tempfile_is_valid_png() {
        let bitmap = RgbaImage::from_pixel(8, 4, image::Rgba([1, 2, 3, 255]));
        let tmp = write_png_tempfile(&bitmap).unwrap();
        let decoded = image::open(tmp.path()).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 4);
    }
}
