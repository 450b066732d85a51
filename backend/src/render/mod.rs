//! Server-side certificate rendering.
//!
//! A [`RenderJob`] is an explicit value object carrying everything one
//! generation needs: the template snapshot, the field values, and the
//! freshly allocated verification id. Jobs own no shared buffers, so the
//! batch driver's strictly sequential execution is a policy choice rather
//! than a data-race guard.
//!
//! The geometry contract: the design canvas is exactly 1200×848 logical
//! px. The compositor rasterizes at `scale`× that size purely for
//! print-quality headroom; the PDF exporter divides the page geometry
//! back down by the same factor, so the physical output is dimensionally
//! identical to the design canvas regardless of capture scale.

pub mod compose;
pub mod fonts;
pub mod pdf;
pub mod qr;

use std::collections::HashMap;

use common::model::template::Template;

use crate::config;

/// Logical width of the design canvas, px.
pub const BASE_WIDTH: u32 = 1200;
/// Logical height of the design canvas, px.
pub const BASE_HEIGHT: u32 = 848;
/// Bitmap resolution multiplier applied during capture.
pub const CAPTURE_SCALE: u32 = 4;

/// Conversion from a field's point size to design-canvas pixels.
pub const PT_TO_PX: f64 = 1.25;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no usable font for family \"{0}\"")]
    FontUnavailable(String),
    #[error("asset {0} could not be read")]
    AssetUnavailable(String),
    #[error("asset decode failed: {0}")]
    AssetDecode(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("QR encoding failed: {0}")]
    Qr(String),
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// One certificate generation, start to finish.
pub struct RenderJob {
    pub template: Template,
    /// Field id → value for this certificate.
    pub values: HashMap<String, String>,
    /// The verification id the QR payload embeds; allocated before the
    /// render so preview and output agree.
    pub verification_id: String,
    pub scale: u32,
}

impl RenderJob {
    pub fn new(
        template: Template,
        values: HashMap<String, String>,
        verification_id: String,
    ) -> Self {
        RenderJob {
            template,
            values,
            verification_id,
            scale: CAPTURE_SCALE,
        }
    }

    /// The URL the QR code points at.
    pub fn verify_url(&self) -> String {
        format!("{}/verify/{}", config::public_base_url(), self.verification_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_url_embeds_the_verification_id() {
        let job = RenderJob::new(
            Template {
                id: "t1".to_string(),
                name: "Excellence Award".to_string(),
                image_url: None,
                fields: Vec::new(),
                created_at: None,
            },
            HashMap::new(),
            "abcd-1234".to_string(),
        );
        assert!(job.verify_url().ends_with("/verify/abcd-1234"));
        assert_eq!(job.scale, CAPTURE_SCALE);
    }
}
