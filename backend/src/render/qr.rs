//! QR rendering for verification payloads.

use image::imageops::FilterType;
use image::{imageops, Rgba, RgbaImage};
use qrcode::{Color, QrCode};

use super::RenderError;

/// Quiet-zone width, in modules, on each side of the code.
const QUIET_MODULES: usize = 2;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render `payload` as a QR code bitmap of exactly `side`×`side` px.
pub fn qr_image(payload: &str, side: u32) -> Result<RgbaImage, RenderError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
    let modules = code.width();
    let colors = code.to_colors();

    let total = modules + QUIET_MODULES * 2;
    let side = side.max(total as u32);
    let cell = (side as usize / total).max(1);
    let dim = (cell * total) as u32;

    let mut img = RgbaImage::from_pixel(dim, dim, LIGHT);
    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = i % modules;
        let my = i / modules;
        let x0 = ((mx + QUIET_MODULES) * cell) as u32;
        let y0 = ((my + QUIET_MODULES) * cell) as u32;
        for dy in 0..cell as u32 {
            for dx in 0..cell as u32 {
                img.put_pixel(x0 + dx, y0 + dy, DARK);
            }
        }
    }

    if dim != side {
        img = imageops::resize(&img, side, side, FilterType::Nearest);
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_exactly_the_requested_side() {
        let img = qr_image("https://example.org/verify/abcd-1234", 300).unwrap();
        assert_eq!(img.dimensions(), (300, 300));
    }

    #[test]
    fn output_contains_dark_and_light_pixels() {
        let img = qr_image("payload", 150).unwrap();
        let has_dark = img.pixels().any(|p| *p == DARK);
        let has_light = img.pixels().any(|p| *p == LIGHT);
        assert!(has_dark && has_light);
    }

    #[test]
    fn different_payloads_produce_different_codes() {
        let a = qr_image("https://example.org/verify/aaa", 120).unwrap();
        let b = qr_image("https://example.org/verify/bbb", 120).unwrap();
        assert_ne!(a.into_raw(), b.into_raw());
    }
}
