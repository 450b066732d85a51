//! The fixed font palette and the default-font suggestion heuristic.
//!
//! The suggestion is purely cosmetic string matching on the template name
//! and field label; it is kept isolated here so the render and persistence
//! layers never depend on it and it can be replaced by an explicit
//! field-role mapping later without touching the compositor.

use crate::model::field::QR_FIELD_LABEL;

/// Serif families offered in the editor's property panel.
pub const SERIF_FONTS: [&str; 5] = [
    "Playfair Display",
    "Lora",
    "Cinzel",
    "Bodoni Moda",
    "Times New Roman",
];

/// Sans-serif families offered in the editor's property panel.
pub const SANS_FONTS: [&str; 5] = ["Montserrat", "Open Sans", "Raleway", "Inter", "DM Sans"];

/// QR fields always get a neutral sans face.
pub const QR_FONT: &str = "Arial";

/// Suggest a default font family for a new field.
///
/// Templates named like formal awards bias serif faces (a display serif
/// for the recipient name, a secondary serif for everything else);
/// templates named like modern/tech events bias a geometric sans. Users
/// can override the suggestion per field.
pub fn suggest_font(template_name: &str, field_label: &str) -> &'static str {
    if field_label == QR_FIELD_LABEL {
        return QR_FONT;
    }
    let name = template_name.to_lowercase();
    if name.contains("award") || name.contains("appreciation") || name.contains("diploma") {
        return if field_label == "Recipient Name" {
            "Playfair Display"
        } else {
            "Lora"
        };
    }
    if name.contains("modern") || name.contains("tech") || name.contains("startup") {
        return "Montserrat";
    }
    "Playfair Display"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diploma_templates_bias_serif() {
        assert_eq!(suggest_font("Spring Diploma 2026", "Recipient Name"), "Playfair Display");
        assert_eq!(suggest_font("Spring Diploma 2026", "Paper Title"), "Lora");
        assert_eq!(suggest_font("Certificate of Appreciation", "Date"), "Lora");
    }

    #[test]
    fn qr_always_gets_neutral_sans() {
        assert_eq!(suggest_font("Spring Diploma 2026", QR_FIELD_LABEL), QR_FONT);
        assert_eq!(suggest_font("Tech Startup Meetup", QR_FIELD_LABEL), QR_FONT);
        assert_eq!(suggest_font("", QR_FIELD_LABEL), QR_FONT);
    }

    #[test]
    fn modern_templates_bias_geometric_sans() {
        assert_eq!(suggest_font("Modern Tech Summit", "Recipient Name"), "Montserrat");
    }

    #[test]
    fn classic_serif_is_the_default() {
        assert_eq!(suggest_font("Plain Certificate", "Venue"), "Playfair Display");
    }
}
