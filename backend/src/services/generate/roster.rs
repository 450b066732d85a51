//! Recipient roster parsing and column mapping.
//!
//! The uploaded spreadsheet is CSV with an auto-detected delimiter.
//! Column mapping is deliberately forgiving: headers are matched to field
//! labels case-insensitively after trimming, unmatched fields are simply
//! left unset for that row (ad-hoc sheets have gaps, that is expected),
//! and contact columns are recognized through a small alias set.

use std::collections::HashMap;

use common::model::field::Field;
use common::requests::ContactInfo;
use rayon::prelude::*;

const EMAIL_ALIASES: [&str; 2] = ["email", "recipient email"];
const PHONE_ALIASES: [&str; 3] = ["phone", "recipient phone", "whatsapp"];

#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    /// 1-based data row number (header excluded).
    pub index: usize,
    /// Trimmed header → trimmed cell value.
    pub values: HashMap<String, String>,
}

/// Pick the delimiter that occurs most often in the header line.
pub fn detect_delimiter(header_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .max_by_key(|&d| header_line.matches(d as char).count())
        .unwrap_or(b',')
}

pub fn parse_roster(bytes: &[u8]) -> Result<Vec<RosterRow>, String> {
    let text = std::str::from_utf8(bytes).map_err(|_| "Roster is not valid UTF-8".to_string())?;
    let text = text.trim_start_matches('\u{feff}');
    let header_line = text.lines().next().ok_or("Roster is empty")?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err("Roster header row is empty".to_string());
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("Row {}: {}", i + 2, e))?;
        let mut values = HashMap::new();
        for (j, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if let Some(cell) = record.get(j) {
                values.insert(header.clone(), cell.trim().to_string());
            }
        }
        rows.push(RosterRow {
            index: i + 1,
            values,
        });
    }

    // Ad-hoc sheets usually end with blank lines; drop fully-empty rows.
    let rows: Vec<RosterRow> = rows
        .into_par_iter()
        .filter(|row| row.values.values().any(|v| !v.is_empty()))
        .collect();
    if rows.is_empty() {
        return Err("Roster has no data rows".to_string());
    }
    Ok(rows)
}

/// Field id → value for one row, matched by trimmed, case-insensitive
/// header equality with the field label. Unmatched fields are left unset.
pub fn map_row_values(fields: &[Field], row: &RosterRow) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for field in fields.iter().filter(|f| f.takes_input()) {
        let needle = field.label.trim().to_lowercase();
        let hit = row
            .values
            .iter()
            .find(|(header, _)| header.trim().to_lowercase() == needle)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty());
        if let Some(value) = hit {
            values.insert(field.id.clone(), value);
        }
    }
    values
}

/// Per-row contact info; roster columns override the session default.
pub fn contact_for_row(row: &RosterRow, default: &ContactInfo) -> ContactInfo {
    let find = |aliases: &[&str]| {
        row.values
            .iter()
            .find(|(header, _)| aliases.contains(&header.trim().to_lowercase().as_str()))
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };
    ContactInfo {
        email: find(&EMAIL_ALIASES).unwrap_or_else(|| default.email.clone()),
        phone: find(&PHONE_ALIASES).unwrap_or_else(|| default.phone.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::field::{Field, FieldContent};

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

    #[test]
    fn delimiter_detection_prefers_the_most_frequent() {
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("a|b|c,d"), b'|');
    }

    #[test]
    fn mapping_is_case_and_whitespace_insensitive() {
        let roster = parse_roster(b" Recipient Name ,CATEGORY\nJane Doe,Innovation\n").unwrap();
        let fields = vec![field("f1", "Recipient Name"), field("f2", "Category")];
        let values = map_row_values(&fields, &roster[0]);
        assert_eq!(values.get("f1").unwrap(), "Jane Doe");
        assert_eq!(values.get("f2").unwrap(), "Innovation");
    }

    #[test]
    fn unmatched_fields_are_left_unset() {
        let roster = parse_roster(b"Recipient Name\nJane Doe\n").unwrap();
        let fields = vec![field("f1", "Recipient Name"), field("f2", "Category")];
        let values = map_row_values(&fields, &roster[0]);
        assert!(values.contains_key("f1"));
        assert!(!values.contains_key("f2"));
    }

    #[test]
    fn contact_aliases_override_the_session_default() {
        let roster =
            parse_roster(b"Recipient Name,Recipient Email,WhatsApp\nJane,jane@x.org,5550100\n")
                .unwrap();
        let default = ContactInfo {
            email: "fallback@x.org".to_string(),
            phone: String::new(),
        };
        let contact = contact_for_row(&roster[0], &default);
        assert_eq!(contact.email, "jane@x.org");
        assert_eq!(contact.phone, "5550100");

        let roster = parse_roster(b"Recipient Name\nJane\n").unwrap();
        let contact = contact_for_row(&roster[0], &default);
        assert_eq!(contact.email, "fallback@x.org");
    }

    #[test]
    fn rows_with_only_empty_cells_are_dropped_and_indexes_kept() {
        let roster = parse_roster(b"Name,Email\nA,a@x.org\n,\nB,b@x.org\n").unwrap();
        let indexes: Vec<usize> = roster.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 3]);
        let names: Vec<&str> = roster.iter().map(|r| r.values["Name"].as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn semicolon_sheets_parse() {
        let roster = parse_roster(b"Recipient Name;Category\nJane;Innovation\n").unwrap();
        assert_eq!(roster[0].values.get("Category").unwrap(), "Innovation");
    }

    #[test]
    fn empty_rosters_are_rejected() {
        assert!(parse_roster(b"").is_err());
        assert!(parse_roster(b"Name\n\n\n").is_err());
    }
}
