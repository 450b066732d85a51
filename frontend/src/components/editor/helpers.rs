//! Small utilities shared by the editor's update and view modules.

use common::model::field::Field;
use web_sys::FormData;

/// Labels offered in the palette. "Verification QR" creates the QR field;
/// everything else is a plain text field.
pub const FIELD_PALETTE: [&str; 9] = [
    "Recipient Name",
    "Affiliation",
    "Paper Title",
    "Conference Name",
    "Date",
    "Venue",
    "Category",
    "Cert No",
    "Verification QR",
];

/// Digest of the serialized field list, for dirty tracking.
pub fn fields_digest(fields: &[Field]) -> String {
    let json = serde_json::to_string(fields).unwrap_or_default();
    format!("{:x}", md5::compute(json))
}

/// Multipart body with a single `file` part.
pub fn single_file_form(file: &web_sys::File) -> Option<FormData> {
    let form = FormData::new().ok()?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .ok()?;
    Some(form)
}

/// Read a number out of an input's value, ignoring partial entry noise.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
