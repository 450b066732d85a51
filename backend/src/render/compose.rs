//! The raster compositor: background + fields → one bitmap.
//!
//! Every field is anchored by its center — the (x%, y%) coordinate is the
//! middle of the rendered box, not its top-left corner — and fields are
//! drawn in array order, later entries on top. The background fills the
//! frame exactly (templates are pre-cropped to the target aspect ratio,
//! so no letterboxing). Every referenced asset is read and fully decoded
//! before a single pixel is placed for it; a missing or undecodable asset
//! aborts the whole render.

use std::fs;

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use image::imageops::FilterType;
use image::{imageops, DynamicImage, Rgba, RgbaImage};

use common::model::field::{Field, FieldContent};

use super::fonts::FontLibrary;
use super::{qr, RenderError, RenderJob, BASE_HEIGHT, BASE_WIDTH, PT_TO_PX};
use crate::{config, storage};

pub fn compose(job: &RenderJob) -> Result<RgbaImage, RenderError> {
    let width = BASE_WIDTH * job.scale;
    let height = BASE_HEIGHT * job.scale;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    if let Some(url) = &job.template.image_url {
        let background = load_asset(url)?
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgba8();
        imageops::overlay(&mut canvas, &background, 0, 0);
    }

    let mut fonts = FontLibrary::new(config::fonts_dir());
    for field in &job.template.fields {
        let cx = field.x / 100.0 * width as f64;
        let cy = field.y / 100.0 * height as f64;
        let box_px = field.font_size as f64 * PT_TO_PX * job.scale as f64;

        match &field.content {
            FieldContent::Text => {
                let value = text_value(job, field);
                draw_text(&mut canvas, &mut fonts, field, &value, cx, cy, job.scale)?;
            }
            FieldContent::Image { asset_url, .. } => {
                let asset = load_asset(asset_url)?;
                let scaled = scale_to_height(&asset, box_px.round() as u32);
                overlay_centered(&mut canvas, &scaled, cx, cy);
            }
            FieldContent::VerificationQr => {
                let code = qr::qr_image(&job.verify_url(), box_px.round().max(1.0) as u32)?;
                overlay_centered(&mut canvas, &code, cx, cy);
            }
        }
    }
    Ok(canvas)
}

/// The text a field renders: the supplied value, or a bracketed
/// placeholder token so missing data is visible instead of silently
/// blank.
fn text_value(job: &RenderJob, field: &Field) -> String {
    job.values
        .get(&field.id)
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("{{{}}}", field.label))
}

fn load_asset(url: &str) -> Result<DynamicImage, RenderError> {
    let path =
        storage::resolve(url).ok_or_else(|| RenderError::AssetUnavailable(url.to_string()))?;
    let bytes = fs::read(&path).map_err(|_| RenderError::AssetUnavailable(url.to_string()))?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Height-constrained scaling with automatic width.
fn scale_to_height(img: &DynamicImage, target_h: u32) -> RgbaImage {
    let target_h = target_h.max(1);
    let (w, h) = (img.width().max(1), img.height().max(1));
    let target_w = ((w as f64 * target_h as f64 / h as f64).round() as u32).max(1);
    imageops::resize(&img.to_rgba8(), target_w, target_h, FilterType::Lanczos3)
}

fn overlay_centered(canvas: &mut RgbaImage, img: &RgbaImage, cx: f64, cy: f64) {
    let x = (cx - img.width() as f64 / 2.0).round() as i64;
    let y = (cy - img.height() as f64 / 2.0).round() as i64;
    imageops::overlay(canvas, img, x, y);
}

fn draw_text(
    canvas: &mut RgbaImage,
    fonts: &mut FontLibrary,
    field: &Field,
    text: &str,
    cx: f64,
    cy: f64,
    scale: u32,
) -> Result<(), RenderError> {
    let font = fonts.face(&field.font_family, &field.font_weight)?;
    let px_height = (field.font_size as f64 * PT_TO_PX * scale as f64) as f32;
    let color = parse_hex_color(&field.color);

    let scaled = font.as_scaled(px_height);
    let ascent = scaled.ascent();
    let line_height = ascent - scaled.descent();

    // Values keep embedded newlines; the block is centered as a whole and
    // each line centered horizontally.
    let lines: Vec<&str> = text.split('\n').collect();
    let block_height = line_height * lines.len() as f32;
    let mut line_top = cy as f32 - block_height / 2.0;

    for line in lines {
        let (glyphs, line_width) = layout_line(&font, px_height, line);
        let origin_x = cx as f32 - line_width / 2.0;
        let baseline = line_top + ascent;
        for (id, gx) in glyphs {
            let glyph = id.with_scale_and_position(px_height, point(origin_x + gx, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;
                    blend_pixel(canvas, x, y, color, coverage);
                });
            }
        }
        line_top += line_height;
    }
    Ok(())
}

/// Kerned horizontal layout of one line: glyph ids with their x offsets,
/// plus the total advance width.
fn layout_line(font: &FontArc, px_height: f32, line: &str) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(px_height);
    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev_id) = prev {
            caret += scaled.kern(prev_id, id);
        }
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    (glyphs, caret)
}

fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        dst.0[c] =
            (dst.0[c] as f32 * (1.0 - coverage) + color.0[c] as f32 * coverage).round() as u8;
    }
    dst.0[3] = 255;
}

/// Parse `#rrggbb` (or `#rgb`); anything unparseable falls back to black.
pub fn parse_hex_color(hex: &str) -> Rgba<u8> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Rgba([0, 0, 0, 255]);
    }
    let channels = match hex.len() {
        6 => [&hex[0..2], &hex[2..4], &hex[4..6]]
            .map(|s| u8::from_str_radix(s, 16).ok()),
        3 => {
            let expand = |s: &str| u8::from_str_radix(&s.repeat(2), 16).ok();
            [expand(&hex[0..1]), expand(&hex[1..2]), expand(&hex[2..3])]
        }
        _ => [None, None, None],
    };
    match channels {
        [Some(r), Some(g), Some(b)] => Rgba([r, g, b, 255]),
        _ => Rgba([0, 0, 0, 255]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_long_short_and_invalid_forms() {
        assert_eq!(parse_hex_color("#333333"), Rgba([0x33, 0x33, 0x33, 255]));
        assert_eq!(parse_hex_color("#fff"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("bad"), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_hex_color(""), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn height_scaling_keeps_aspect_ratio() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            100,
            Rgba([10, 20, 30, 255]),
        ));
        let scaled = scale_to_height(&img, 50);
        assert_eq!(scaled.dimensions(), (100, 50));
    }

    #[test]
    fn centered_overlay_places_the_box_around_the_anchor() {
        let mut canvas = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let patch = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        overlay_centered(&mut canvas, &patch, 50.0, 50.0);
        assert_eq!(*canvas.get_pixel(45, 45), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(54, 54), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(44, 50), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(55, 50), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn blending_mixes_toward_the_text_color() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        blend_pixel(&mut canvas, 0, 0, Rgba([0, 0, 0, 255]), 1.0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        blend_pixel(&mut canvas, 1, 1, Rgba([0, 0, 0, 255]), 0.5);
        assert_eq!(canvas.get_pixel(1, 1).0[0], 128);
        // Out-of-bounds writes are ignored.
        blend_pixel(&mut canvas, -1, 5, Rgba([0, 0, 0, 255]), 1.0);
    }
}
