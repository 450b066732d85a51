//! The placeable elements of a certificate template.
//!
//! A `Field` is anchored on the template by percentage coordinates so the
//! same field list renders correctly on the interactive editor canvas
//! (arbitrary on-screen size) and on the fixed-resolution export canvas.
//! What a field *is* lives in [`FieldContent`], one variant per kind, so
//! render and mapping code can match on the variant instead of comparing
//! type strings.

use serde::{Deserialize, Serialize};

/// Fields never shrink below this size, in points.
pub const MIN_FONT_SIZE: u32 = 8;

/// Label under which QR fields are offered in the editor palette.
pub const QR_FIELD_LABEL: &str = "Verification QR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Opaque unique id within the template.
    pub id: String,
    /// Human-readable label; the de-facto unique key used for value mapping.
    pub label: String,
    /// Horizontal anchor as a percentage (0-100) of the template width.
    /// The anchor is the field's *center*, not its top-left corner.
    pub x: f64,
    /// Vertical anchor as a percentage (0-100) of the template height.
    pub y: f64,
    /// Point size for text; pixel height for image and QR fields.
    pub font_size: u32,
    /// CSS-style numeric weight ("400", "700", ...).
    pub font_weight: String,
    /// Hex color, e.g. "#333333".
    pub color: String,
    pub font_family: String,
    #[serde(flatten)]
    pub content: FieldContent,
}

/// What a field renders as. The kind is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldContent {
    /// A text label filled in with a per-certificate value.
    Text,
    /// An uploaded raster asset (signature or logo), drawn at
    /// `font_size` px height with automatic width.
    Image { role: AssetRole, asset_url: String },
    /// A QR code pointing at the certificate's verification URL.
    VerificationQr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    Signature,
    Logo,
}

impl AssetRole {
    pub fn label(self) -> &'static str {
        match self {
            AssetRole::Signature => "Signature",
            AssetRole::Logo => "Logo",
        }
    }
}

/// Partial update of a field's position/size/style, applied through
/// [`crate::model::template::Template::update_field`] so clamping cannot
/// be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_size: Option<u32>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub font_family: Option<String>,
}

impl Field {
    /// Whether this field takes a per-certificate value in the generate
    /// form / spreadsheet mapping (only text fields do).
    pub fn takes_input(&self) -> bool {
        matches!(self.content, FieldContent::Text)
    }

    pub fn is_qr(&self) -> bool {
        matches!(self.content, FieldContent::VerificationQr)
    }

    /// Re-establish the coordinate and size invariants after any mutation.
    pub fn clamp(&mut self) {
        self.x = crate::geometry::clamp_percent(self.x);
        self.y = crate::geometry::clamp_percent(self.y);
        self.font_size = self.font_size.max(MIN_FONT_SIZE);
    }

    pub fn apply(&mut self, patch: &FieldPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(weight) = &patch.font_weight {
            self.font_weight = weight.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        self.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field() -> Field {
        Field {
            id: "f1".to_string(),
            label: "Recipient Name".to_string(),
            x: 40.0,
            y: 45.0,
            font_size: 22,
            font_weight: "700".to_string(),
            color: "#333333".to_string(),
            font_family: "Playfair Display".to_string(),
            content: FieldContent::Text,
        }
    }

    #[test]
    fn patch_clamps_position_and_size() {
        let mut field = text_field();
        field.apply(&FieldPatch {
            x: Some(130.0),
            y: Some(-4.0),
            font_size: Some(2),
            ..FieldPatch::default()
        });
        assert_eq!(field.x, 100.0);
        assert_eq!(field.y, 0.0);
        assert_eq!(field.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn content_tag_round_trips() {
        let field = Field {
            content: FieldContent::Image {
                role: AssetRole::Signature,
                asset_url: "/files/assets/sig.png".to_string(),
            },
            ..text_field()
        };
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains(r#""type":"image""#));
        assert!(json.contains(r#""role":"signature""#));
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
