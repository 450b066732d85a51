//! Certificate templates: a background image plus an ordered field list.
//!
//! All field mutations go through the methods here so the coordinate and
//! uniqueness invariants hold regardless of which side (editor or backend)
//! performs them. Fields render in array order; later entries are drawn on
//! top. Saving replaces the stored field list wholesale — there is no
//! merge with concurrent editors, the last writer wins.

use serde::{Deserialize, Serialize};

use crate::model::field::{AssetRole, Field, FieldContent, FieldPatch, QR_FIELD_LABEL};
use crate::model::fonts::suggest_font;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// The certificate face. `None` until a background has been uploaded.
    pub image_url: Option<String>,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Template {
    /// Add a text field (or, for the dedicated palette label, a QR field).
    ///
    /// Labels are the keys later used for value mapping, so a second field
    /// with the same label is refused: the list is left untouched and
    /// `None` is returned for the caller to surface a warning.
    pub fn add_field(&mut self, id: impl Into<String>, label: &str) -> Option<&Field> {
        if self.fields.iter().any(|f| f.label == label) {
            return None;
        }
        let is_qr = label == QR_FIELD_LABEL;
        let field = Field {
            id: id.into(),
            label: label.to_string(),
            x: 40.0,
            y: 45.0,
            font_size: if is_qr { 80 } else { 22 },
            font_weight: "700".to_string(),
            color: if is_qr { "#000000" } else { "#333333" }.to_string(),
            font_family: suggest_font(&self.name, label).to_string(),
            content: if is_qr {
                FieldContent::VerificationQr
            } else {
                FieldContent::Text
            },
        };
        self.fields.push(field);
        self.fields.last()
    }

    /// Add an uploaded signature/logo asset, centered on the canvas.
    pub fn add_asset_field(
        &mut self,
        id: impl Into<String>,
        role: AssetRole,
        asset_url: impl Into<String>,
    ) -> &Field {
        let field = Field {
            id: id.into(),
            label: role.label().to_string(),
            x: 50.0,
            y: 50.0,
            font_size: match role {
                AssetRole::Signature => 60,
                AssetRole::Logo => 80,
            },
            font_weight: "400".to_string(),
            color: "#ffffff".to_string(),
            font_family: suggest_font(&self.name, role.label()).to_string(),
            content: FieldContent::Image {
                role,
                asset_url: asset_url.into(),
            },
        };
        self.fields.push(field);
        self.fields.last().expect("just pushed")
    }

    /// Partial position/size/style update; numeric values are clamped.
    /// Returns `false` when the field does not exist.
    pub fn update_field(&mut self, field_id: &str, patch: &FieldPatch) -> bool {
        match self.fields.iter_mut().find(|f| f.id == field_id) {
            Some(field) => {
                field.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove_field(&mut self, field_id: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != field_id);
        self.fields.len() != before
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fonts::QR_FONT;

    fn template(name: &str) -> Template {
        Template {
            id: "t1".to_string(),
            name: name.to_string(),
            image_url: Some("/files/templates/bg.png".to_string()),
            fields: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn duplicate_labels_are_refused() {
        let mut t = template("Excellence Award");
        assert!(t.add_field("f1", "Recipient Name").is_some());
        assert!(t.add_field("f2", "Recipient Name").is_none());
        assert_eq!(t.fields.len(), 1);
        assert_eq!(t.fields[0].id, "f1");
    }

    #[test]
    fn qr_palette_label_creates_a_qr_field_with_neutral_font() {
        let mut t = template("Excellence Diploma");
        let field = t.add_field("f1", QR_FIELD_LABEL).unwrap();
        assert!(field.is_qr());
        assert_eq!(field.font_size, 80);
        assert_eq!(field.font_family, QR_FONT);
    }

    #[test]
    fn diploma_name_defaults_new_text_fields_to_serif() {
        let mut t = template("Excellence Diploma");
        let name = t.add_field("f1", "Recipient Name").unwrap().font_family.clone();
        let other = t.add_field("f2", "Paper Title").unwrap().font_family.clone();
        assert_eq!(name, "Playfair Display");
        assert_eq!(other, "Lora");
    }

    #[test]
    fn asset_fields_center_and_size_by_role() {
        let mut t = template("Anything");
        let sig = t
            .add_asset_field("a1", AssetRole::Signature, "/files/assets/s.png")
            .clone();
        assert_eq!((sig.x, sig.y), (50.0, 50.0));
        assert_eq!(sig.font_size, 60);
        let logo = t
            .add_asset_field("a2", AssetRole::Logo, "/files/assets/l.png")
            .clone();
        assert_eq!(logo.font_size, 80);
        assert_eq!(t.fields.len(), 2);
    }

    #[test]
    fn update_missing_field_is_a_noop() {
        let mut t = template("Anything");
        assert!(!t.update_field("nope", &FieldPatch::default()));
    }

    #[test]
    fn field_list_round_trips_through_json() {
        let mut t = template("Excellence Award");
        t.add_field("f1", "Recipient Name");
        t.add_field("f2", "Category");
        t.add_field("f3", QR_FIELD_LABEL);
        t.add_asset_field("f4", AssetRole::Logo, "/files/assets/l.png");
        let json = serde_json::to_string(&t.fields).unwrap();
        let back: Vec<Field> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t.fields);
    }
}
