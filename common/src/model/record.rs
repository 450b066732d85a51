//! Generation records: the immutable provenance row written after a
//! certificate has been rendered and its document uploaded.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::field::Field;

/// Category recorded when a template has no category-labelled field or the
/// row carries no value for it.
pub const DEFAULT_CATEGORY: &str = "Default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// The verification id (distinct from the template id); also the QR
    /// payload path segment.
    pub id: String,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    pub template_id: String,
    /// Joined in for history display; templates may have been deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    pub category: String,
    pub file_url: String,
    /// Field values at generation time, keyed by field label, plus the
    /// contact info supplied with the request.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub created_at: String,
}

/// The recipient's display name: the value of whichever field's label
/// contains "name" (case-insensitive).
pub fn derive_recipient_name(fields: &[Field], values: &HashMap<String, String>) -> String {
    fields
        .iter()
        .find(|f| f.label.to_lowercase().contains("name"))
        .and_then(|f| values.get(&f.id))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "recipient".to_string())
}

/// The record category: the value of whichever field's label contains
/// "category", falling back to [`DEFAULT_CATEGORY`].
pub fn derive_category(fields: &[Field], values: &HashMap<String, String>) -> String {
    fields
        .iter()
        .find(|f| f.label.to_lowercase().contains("category"))
        .and_then(|f| values.get(&f.id))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Strip everything but ASCII digits from a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Build the `wa.me` deep link with the pre-filled verification message.
/// Returns `None` when the record has no usable phone number.
pub fn whatsapp_link(record: &GenerationRecord, verify_url: &str) -> Option<String> {
    let digits = normalize_phone(record.recipient_phone.as_deref()?);
    if digits.is_empty() {
        return None;
    }
    let message = format!(
        "Hello {}, your certificate for {} is ready! You can verify and download it here: {}",
        record.recipient_name, record.category, verify_url
    );
    Some(format!(
        "https://wa.me/{}?text={}",
        digits,
        percent_encode(&message)
    ))
}

/// Percent-encode a query value. Unreserved characters pass through,
/// everything else is encoded byte-wise.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::FieldContent;

    fn field(id: &str, label: &str) -> Field {
        Field {
            id: id.to_string(),
            label: label.to_string(),
            x: 40.0,
            y: 45.0,
            font_size: 22,
            font_weight: "700".to_string(),
            color: "#333333".to_string(),
            font_family: "Lora".to_string(),
            content: FieldContent::Text,
        }
    }

    fn record(phone: Option<&str>) -> GenerationRecord {
        GenerationRecord {
            id: "abc".to_string(),
            recipient_name: "Jane Doe".to_string(),
            recipient_email: None,
            recipient_phone: phone.map(str::to_string),
            template_id: "t1".to_string(),
            template_name: None,
            category: "Innovation".to_string(),
            file_url: "/files/certificates/cert.pdf".to_string(),
            metadata: BTreeMap::new(),
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn recipient_name_comes_from_the_name_labelled_field() {
        let fields = vec![field("f1", "Paper Title"), field("f2", "Recipient Name")];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), "On Certificates".to_string());
        values.insert("f2".to_string(), "Jane Doe".to_string());
        assert_eq!(derive_recipient_name(&fields, &values), "Jane Doe");
    }

    #[test]
    fn category_defaults_when_absent() {
        let fields = vec![field("f1", "Recipient Name")];
        let values = HashMap::new();
        assert_eq!(derive_category(&fields, &values), DEFAULT_CATEGORY);
    }

    #[test]
    fn phone_normalization_strips_non_digits() {
        assert_eq!(normalize_phone("+91 98765-43210"), "919876543210");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn whatsapp_link_encodes_the_message() {
        let link = whatsapp_link(&record(Some("+1 (555) 010-0101")), "https://example.org/verify/abc")
            .unwrap();
        assert!(link.starts_with("https://wa.me/15550100101?text=Hello%20Jane%20Doe"));
        assert!(link.contains("https%3A%2F%2Fexample.org%2Fverify%2Fabc"));
    }

    #[test]
    fn whatsapp_link_requires_a_phone_number() {
        assert!(whatsapp_link(&record(None), "u").is_none());
        assert!(whatsapp_link(&record(Some("--")), "u").is_none());
    }
}
